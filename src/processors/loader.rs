// pixie/src/processors/loader.rs
use crate::core::{ResizeError, Result, MAX_DIMENSION};
use image::{DynamicImage, GenericImageView, ImageReader};
use std::path::Path;

#[derive(Debug, Clone)]
pub struct Loader {
    max_dimensions: Option<(u32, u32)>,
}

impl Loader {
    pub fn new() -> Self {
        Self {
            max_dimensions: Some((MAX_DIMENSION, MAX_DIMENSION)),
        }
    }

    pub fn with_max_dimensions(mut self, width: u32, height: u32) -> Self {
        self.max_dimensions = Some((width, height));
        self
    }

    /// Decode the file at `path`. The format is sniffed from the content,
    /// so a mislabelled extension still decodes.
    pub fn load(&self, path: &Path) -> Result<DynamicImage> {
        log::debug!("Loading image from: {}", path.display());

        self.validate_path(path)?;

        let image = ImageReader::open(path)
            .map_err(|e| ResizeError::Decode(format!("cannot open {}: {}", path.display(), e)))?
            .with_guessed_format()
            .map_err(|e| ResizeError::Decode(format!("cannot read {}: {}", path.display(), e)))?
            .decode()
            .map_err(|e| ResizeError::Decode(format!("failed to decode {}: {}", path.display(), e)))?;

        let (width, height) = image.dimensions();
        if let Some((max_w, max_h)) = self.max_dimensions {
            if width > max_w || height > max_h {
                return Err(ResizeError::Decode(format!(
                    "image dimensions {}x{} exceed maximum {}x{}",
                    width, height, max_w, max_h
                )));
            }
        }

        log::debug!(
            "Loaded image: {}x{} pixels, color: {:?}",
            width,
            height,
            image.color()
        );

        Ok(image)
    }

    fn validate_path(&self, path: &Path) -> Result<()> {
        let metadata = path.metadata().map_err(|e| {
            ResizeError::Decode(format!("cannot read {}: {}", path.display(), e))
        })?;

        if !metadata.is_file() {
            return Err(ResizeError::Decode(format!(
                "not a regular file: {}",
                path.display()
            )));
        }

        if metadata.len() == 0 {
            return Err(ResizeError::Decode(format!("file is empty: {}", path.display())));
        }

        Ok(())
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    #[test]
    fn loads_by_content_not_extension() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("actually_png.jpg");
        RgbImage::new(4, 3)
            .save_with_format(&path, image::ImageFormat::Png)
            .unwrap();

        let image = Loader::new().load(&path).unwrap();
        assert_eq!(image.dimensions(), (4, 3));
    }

    #[test]
    fn empty_and_missing_files_are_decode_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let empty = tmp.path().join("empty.png");
        std::fs::write(&empty, b"").unwrap();

        let loader = Loader::new();
        assert!(matches!(loader.load(&empty), Err(ResizeError::Decode(_))));
        assert!(matches!(
            loader.load(&tmp.path().join("missing.png")),
            Err(ResizeError::Decode(_))
        ));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("noise.png");
        std::fs::write(&path, b"definitely not a png").unwrap();

        assert!(matches!(Loader::new().load(&path), Err(ResizeError::Decode(_))));
    }

    #[test]
    fn oversized_images_are_refused() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("wide.png");
        RgbImage::new(20, 2).save(&path).unwrap();

        let loader = Loader::new().with_max_dimensions(10, 10);
        assert!(matches!(loader.load(&path), Err(ResizeError::Decode(_))));
    }
}
