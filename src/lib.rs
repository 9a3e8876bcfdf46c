mod cli;
mod core;
mod processors;
pub mod utils;

pub use cli::{normalize_args, Cli, Format};
pub use crate::core::format::{is_supported_extension, is_supported_path, INPUT_EXTENSIONS};
pub use crate::core::processor::{target_format, transform};
pub use crate::core::{
    BatchConfig, BatchResult, FileFailure, ImageProcessor, OutputFormat, OutputSpec,
    ProcessedImage, ResizeError, ResizeSpec, Result, TransformOutcome, DEFAULT_QUALITY,
    MAX_DIMENSION,
};
pub use processors::{
    flatten_onto, list_images, reconcile, run_batch, BatchProcessor, Compressor, Loader,
    ResizeMode, Resizer,
};

// Re-export commonly used types
pub use image::DynamicImage;
