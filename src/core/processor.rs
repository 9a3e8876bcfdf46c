// pixie/src/core/processor.rs
use super::{OutputFormat, OutputSpec, ResizeError, ResizeSpec, Result, TransformOutcome};
use crate::processors::{Compressor, Loader, ResizeMode, Resizer};
use image::GenericImageView;
use std::path::Path;

/// Decodes, resizes and re-encodes a single image.
#[derive(Debug, Clone, Default)]
pub struct ImageProcessor {
    loader: Loader,
    resizer: Resizer,
}

impl ImageProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transform<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: Q,
        resize: &ResizeSpec,
        output: &OutputSpec,
    ) -> Result<TransformOutcome> {
        let input_path = input_path.as_ref();
        let output_path = output_path.as_ref();

        let format = target_format(input_path, output.format)?;
        let bytes_before = std::fs::metadata(input_path)
            .map_err(|e| ResizeError::Decode(format!("cannot read {}: {}", input_path.display(), e)))?
            .len();

        let image = self.loader.load(input_path)?;
        let source_dimensions = image.dimensions();

        let image = self.resizer.resize(image, ResizeMode::from_spec(resize))?;
        let output_dimensions = image.dimensions();

        let compressor = Compressor::new(output.quality).with_png_optimization(output.optimize_png);
        let bytes_after = compressor.save(image, output_path, format)?;

        Ok(TransformOutcome {
            source_dimensions,
            output_dimensions,
            bytes_before,
            bytes_after,
        })
    }
}

/// The requested format, or the one matching the source extension.
pub fn target_format(input_path: &Path, requested: Option<OutputFormat>) -> Result<OutputFormat> {
    if let Some(format) = requested {
        return Ok(format);
    }

    let ext = input_path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("");

    OutputFormat::from_extension(ext).ok_or_else(|| {
        ResizeError::UnsupportedFormat(format!(
            "unrecognised source format '{}' of {}; choose an output format",
            ext,
            input_path.display()
        ))
    })
}

/// Run one transform with a default processor.
pub fn transform<P: AsRef<Path>, Q: AsRef<Path>>(
    input_path: P,
    output_path: Q,
    resize: &ResizeSpec,
    output: &OutputSpec,
) -> Result<TransformOutcome> {
    ImageProcessor::new().transform(input_path, output_path, resize, output)
}
