// pixie/src/core/mod.rs
pub mod format;
pub mod processor;

pub use format::OutputFormat;
pub use processor::ImageProcessor;

use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_QUALITY: u8 = 95;
pub const MAX_DIMENSION: u32 = 100_000;

/// Requested output size. Missing sides are derived from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeSpec {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub keep_aspect: bool,
}

impl Default for ResizeSpec {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            keep_aspect: true,
        }
    }
}

impl ResizeSpec {
    pub fn new(width: Option<u32>, height: Option<u32>, keep_aspect: bool) -> Self {
        Self { width, height, keep_aspect }
    }

    pub fn is_pass_through(&self) -> bool {
        self.width.is_none() && self.height.is_none()
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("width", self.width), ("height", self.height)] {
            match value {
                Some(0) => {
                    return Err(ResizeError::InvalidArgument(format!(
                        "{} must be a positive number of pixels",
                        name
                    )))
                }
                Some(v) if v > MAX_DIMENSION => {
                    return Err(ResizeError::InvalidArgument(format!(
                        "{} {} too large (max {} pixels)",
                        name, v, MAX_DIMENSION
                    )))
                }
                _ => {}
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSpec {
    /// `None` keeps the source format.
    pub format: Option<OutputFormat>,
    /// Only used by lossy encoders.
    pub quality: u8,
    pub prefix: String,
    pub suffix: String,
    pub optimize_png: bool,
}

impl Default for OutputSpec {
    fn default() -> Self {
        Self {
            format: None,
            quality: DEFAULT_QUALITY,
            prefix: String::new(),
            suffix: String::new(),
            optimize_png: false,
        }
    }
}

impl OutputSpec {
    pub fn validate(&self) -> Result<()> {
        if self.quality == 0 || self.quality > 100 {
            return Err(ResizeError::InvalidArgument(
                "Quality must be between 1 and 100".to_string(),
            ));
        }

        for (name, value) in [("prefix", &self.prefix), ("suffix", &self.suffix)] {
            if value.contains('/') || value.contains('\\') {
                return Err(ResizeError::InvalidArgument(format!(
                    "{} must not contain path separators: {:?}",
                    name, value
                )));
            }
        }

        Ok(())
    }
}

/// Everything one batch run needs. Built fresh for every run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchConfig {
    pub resize: ResizeSpec,
    pub output: OutputSpec,
}

impl BatchConfig {
    pub fn new(resize: ResizeSpec, output: OutputSpec) -> Self {
        Self { resize, output }
    }

    pub fn validate(&self) -> Result<()> {
        self.resize.validate()?;
        self.output.validate()
    }
}

/// Result of one successful transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformOutcome {
    pub source_dimensions: (u32, u32),
    pub output_dimensions: (u32, u32),
    pub bytes_before: u64,
    pub bytes_after: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedImage {
    pub input: PathBuf,
    pub output: PathBuf,
    pub outcome: TransformOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Summary of a batch run. Entries are kept in scan order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchResult {
    pub total_found: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub failures: Vec<FileFailure>,
    pub processed: Vec<ProcessedImage>,
    pub bytes_before: u64,
    pub bytes_after: u64,
}

impl BatchResult {
    pub(crate) fn record_success(&mut self, image: ProcessedImage) {
        self.succeeded += 1;
        self.bytes_before += image.outcome.bytes_before;
        self.bytes_after += image.outcome.bytes_after;
        self.processed.push(image);
    }

    pub(crate) fn record_failure(&mut self, path: PathBuf, reason: String) {
        self.failed += 1;
        self.failures.push(FileFailure { path, reason });
    }

    pub fn is_empty(&self) -> bool {
        self.total_found == 0
    }
}

#[derive(Error, Debug)]
pub enum ResizeError {
    #[error("Input directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("Cannot create output directory {}: {source}", .path.display())]
    OutputCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Image too large: {0}")]
    TooLarge(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ResizeError {
    /// Errors that stop a whole run rather than a single file.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ResizeError::DirectoryNotFound(_)
                | ResizeError::OutputCreation { .. }
                | ResizeError::InvalidArgument(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ResizeError>;
