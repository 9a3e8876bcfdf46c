// pixie/src/cli.rs
use crate::core::{BatchConfig, OutputFormat, OutputSpec, ResizeSpec, DEFAULT_QUALITY};
use clap::{ArgGroup, Parser, ValueEnum};
use std::ffi::OsString;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "pixie-batch",
    version,
    about = "Batch image resizer - resize and convert images in bulk",
    after_help = "Examples:\n  \
        pixie-batch -i input -o output -w 800\n  \
        pixie-batch -i images -o resized -w 1920 -ht 1080 --no-aspect\n  \
        pixie-batch -i photos -o compressed -w 1200 -f JPEG -q 85\n  \
        pixie-batch -i input -o output -w 500 --prefix thumb_ --suffix _small"
)]
#[command(group(ArgGroup::new("size").required(true).multiple(true).args(["width", "height"])))]
pub struct Cli {
    /// Input folder containing images
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output folder for resized images
    #[arg(short, long)]
    pub output: PathBuf,

    /// Target width in pixels
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub width: Option<u32>,

    /// Target height in pixels (also accepted as -ht)
    #[arg(short = 'H', long, value_parser = clap::value_parser!(u32).range(1..))]
    pub height: Option<u32>,

    /// Do not maintain aspect ratio when both sides are given
    #[arg(long)]
    pub no_aspect: bool,

    /// Quality for lossy formats (1-100)
    #[arg(short, long, default_value_t = DEFAULT_QUALITY, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: u8,

    /// Output image format; defaults to the source format
    #[arg(short, long, value_enum, ignore_case = true)]
    pub format: Option<Format>,

    /// Prefix for output filenames
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    pub prefix: String,

    /// Suffix for output filenames (before the extension)
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    pub suffix: String,

    /// Run a lossless optimisation pass over PNG output
    #[arg(long)]
    pub optimize_png: bool,

    /// Show a progress bar
    #[arg(long)]
    pub progress: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    #[value(name = "JPEG", alias = "jpg")]
    Jpeg,
    #[value(name = "PNG")]
    Png,
    #[value(name = "BMP")]
    Bmp,
    #[value(name = "WEBP")]
    WebP,
    #[value(name = "TIFF", alias = "tif")]
    Tiff,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Jpeg => OutputFormat::Jpeg,
            Format::Png => OutputFormat::Png,
            Format::Bmp => OutputFormat::Bmp,
            Format::WebP => OutputFormat::WebP,
            Format::Tiff => OutputFormat::Tiff,
        }
    }
}

impl Cli {
    /// Parse the process arguments, accepting `-ht` for `--height`.
    pub fn parse_args() -> Self {
        Self::parse_from(normalize_args(std::env::args_os()))
    }

    pub fn to_config(&self) -> BatchConfig {
        BatchConfig {
            resize: ResizeSpec::new(self.width, self.height, !self.no_aspect),
            output: OutputSpec {
                format: self.format.map(OutputFormat::from),
                quality: self.quality,
                prefix: self.prefix.clone(),
                suffix: self.suffix.clone(),
                optimize_png: self.optimize_png,
            },
        }
    }
}

/// Options whose next argument is a value and must not be rewritten.
const VALUE_OPTIONS: [&str; 14] = [
    "-i", "--input", "-o", "--output", "-w", "--width", "-H", "--height", "-q", "--quality",
    "-f", "--format", "--prefix", "--suffix",
];

/// Rewrite `-ht VALUE`, `-ht=VALUE` and `-ht<digits>` to `--height`. Values
/// of other options and arguments after `--` are left alone.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut out = Vec::new();
    let mut passthrough = false;
    let mut expects_value = false;

    for arg in args.into_iter().map(Into::into) {
        if passthrough || expects_value {
            expects_value = false;
            out.push(arg);
            continue;
        }

        let rewritten = match arg.to_str() {
            Some("--") => {
                passthrough = true;
                None
            }
            Some("-ht") => {
                expects_value = true;
                Some(OsString::from("--height"))
            }
            Some(s) => match s.strip_prefix("-ht") {
                Some(value) if value.starts_with('=') => {
                    Some(OsString::from(format!("--height{}", value)))
                }
                Some(digits) if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
                    Some(OsString::from(format!("--height={}", digits)))
                }
                _ => {
                    expects_value = VALUE_OPTIONS.contains(&s);
                    None
                }
            },
            None => None,
        };

        out.push(rewritten.unwrap_or(arg));
    }

    out
}
