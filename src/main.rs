use anyhow::Context;
use pixie_batch::utils::{format_file_size, size_change_percent};
use pixie_batch::{BatchProcessor, BatchResult, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_args();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_target(false)
        .init();

    let config = cli.to_config();
    let processor = BatchProcessor::new(config).with_progress(cli.progress);

    let result = processor
        .run_batch(&cli.input, &cli.output)
        .with_context(|| format!("batch resize of {} failed", cli.input.display()))?;

    print_summary(&cli, &result);
    Ok(())
}

fn print_summary(cli: &Cli, result: &BatchResult) {
    if result.is_empty() {
        println!("No images found in '{}'", cli.input.display());
        return;
    }

    println!("{}", "-".repeat(60));
    println!("Found:     {}", result.total_found);
    println!("Succeeded: {}", result.succeeded);
    println!("Failed:    {}", result.failed);

    for failure in &result.failures {
        println!("  {}: {}", failure.path.display(), failure.reason);
    }

    if result.succeeded > 0 {
        println!(
            "Size:      {} -> {} ({:+.1}%)",
            format_file_size(result.bytes_before),
            format_file_size(result.bytes_after),
            size_change_percent(result.bytes_before, result.bytes_after)
        );
        println!("Output:    {}", cli.output.display());
    }
}
