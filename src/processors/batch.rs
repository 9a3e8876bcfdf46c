// pixie/src/processors/batch.rs
use crate::core::{
    BatchConfig, BatchResult, ImageProcessor, OutputSpec, ProcessedImage, ResizeError, ResizeSpec,
    Result,
};
use crate::processors::scanner::list_images;
use crate::utils::output_path;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub struct BatchProcessor {
    config: BatchConfig,
    processor: ImageProcessor,
    show_progress: bool,
}

impl BatchProcessor {
    pub fn new(config: BatchConfig) -> Self {
        Self {
            config,
            processor: ImageProcessor::new(),
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Process every image in `input_dir` into `output_dir`. Only fatal
    /// errors are returned; per-file failures land in the result.
    pub fn run_batch(&self, input_dir: &Path, output_dir: &Path) -> Result<BatchResult> {
        self.config.validate()?;

        if !input_dir.is_dir() {
            return Err(ResizeError::DirectoryNotFound(input_dir.to_path_buf()));
        }
        ensure_output_dir(output_dir)?;

        let image_paths = list_images(input_dir)?;
        if image_paths.is_empty() {
            log::warn!("No images found in {}", input_dir.display());
            return Ok(BatchResult::default());
        }

        self.log_plan(image_paths.len(), input_dir, output_dir);

        let pb = self.create_progress_bar(image_paths.len());
        let mut result = BatchResult {
            total_found: image_paths.len(),
            ..Default::default()
        };
        let mut claimed: HashMap<PathBuf, PathBuf> = HashMap::new();

        for input_path in &image_paths {
            if let Some(pb) = &pb {
                pb.set_message(display_name(input_path));
            }

            match self.process_one(input_path, output_dir, &mut claimed) {
                Ok(image) => {
                    log::info!(
                        "Resized: {} ({}x{} -> {}x{})",
                        display_name(input_path),
                        image.outcome.source_dimensions.0,
                        image.outcome.source_dimensions.1,
                        image.outcome.output_dimensions.0,
                        image.outcome.output_dimensions.1,
                    );
                    result.record_success(image);
                }
                Err(e) => {
                    log::error!("Error processing {}: {}", input_path.display(), e);
                    result.record_failure(input_path.clone(), e.to_string());
                }
            }

            if let Some(pb) = &pb {
                pb.inc(1);
            }
        }

        if let Some(pb) = pb {
            pb.finish_with_message(format!(
                "{} succeeded, {} failed",
                result.succeeded, result.failed
            ));
        }

        Ok(result)
    }

    fn process_one(
        &self,
        input_path: &Path,
        output_dir: &Path,
        claimed: &mut HashMap<PathBuf, PathBuf>,
    ) -> Result<ProcessedImage> {
        let output = output_path(input_path, output_dir, &self.config.output)?;

        if let Some(previous) = claimed.insert(output.clone(), input_path.to_path_buf()) {
            log::warn!(
                "{} and {} both map to {}; the later file wins",
                previous.display(),
                input_path.display(),
                output.display()
            );
        }

        let outcome = self.processor.transform(
            input_path,
            &output,
            &self.config.resize,
            &self.config.output,
        )?;

        Ok(ProcessedImage {
            input: input_path.to_path_buf(),
            output,
            outcome,
        })
    }

    fn log_plan(&self, count: usize, input_dir: &Path, output_dir: &Path) {
        let resize = &self.config.resize;
        let side = |v: Option<u32>| v.map_or_else(|| "auto".to_string(), |v| v.to_string());

        log::info!("Found {} images in {}", count, input_dir.display());
        log::info!("Output folder: {}", output_dir.display());
        log::info!(
            "Target size: {}x{}, maintain aspect ratio: {}",
            side(resize.width),
            side(resize.height),
            resize.keep_aspect
        );
        if let Some(format) = self.config.output.format {
            log::info!("Output format: {} (quality {})", format, self.config.output.quality);
        }
    }

    fn create_progress_bar(&self, total: usize) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }

        let pb = ProgressBar::new(total as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
            .map(|style| style.progress_chars("#>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        pb.set_style(style);
        Some(pb)
    }
}

/// Batch run with an explicit resize and output spec.
pub fn run_batch(
    input_dir: &Path,
    output_dir: &Path,
    resize: &ResizeSpec,
    output: &OutputSpec,
) -> Result<BatchResult> {
    BatchProcessor::new(BatchConfig::new(*resize, output.clone())).run_batch(input_dir, output_dir)
}

fn ensure_output_dir(output_dir: &Path) -> Result<()> {
    if output_dir.exists() && !output_dir.is_dir() {
        return Err(ResizeError::OutputCreation {
            path: output_dir.to_path_buf(),
            source: std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                "path exists and is not a directory",
            ),
        });
    }

    std::fs::create_dir_all(output_dir).map_err(|source| ResizeError::OutputCreation {
        path: output_dir.to_path_buf(),
        source,
    })
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
