// pixie/src/processors/compressor.rs
use crate::core::{OutputFormat, ResizeError, Result};
use image::codecs::gif::GifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, DynamicImage, Frame, Rgb, RgbImage};
use oxipng::{optimize_from_memory, Options};
use std::io::{Cursor, Write};
use std::path::Path;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

pub struct Compressor {
    quality: u8,
    optimize_png: bool,
}

impl Compressor {
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
            optimize_png: false,
        }
    }

    pub fn with_png_optimization(mut self, optimize: bool) -> Self {
        self.optimize_png = optimize;
        self
    }

    /// Encode `image` as `format` and place it at `path`. Returns the number
    /// of bytes written. Nothing is left at `path` when any step fails.
    pub fn save(&self, image: DynamicImage, path: &Path, format: OutputFormat) -> Result<u64> {
        log::debug!(
            "Saving image to {} as {}, quality: {}",
            path.display(),
            format,
            if format.is_lossy() { self.quality.to_string() } else { "n/a".to_string() }
        );

        let image = reconcile(image, format);
        let data = self.encode(&image, format)?;
        drop(image);

        write_atomic(path, &data)?;
        log::debug!("Saved image: {} ({} bytes)", path.display(), data.len());

        Ok(data.len() as u64)
    }

    pub fn encode(&self, image: &DynamicImage, format: OutputFormat) -> Result<Vec<u8>> {
        match format {
            OutputFormat::Jpeg => self.encode_jpeg(image),
            OutputFormat::WebP => self.encode_webp(image),
            OutputFormat::Png => {
                let data = encode_with_image(image, format)?;
                if self.optimize_png {
                    optimize_from_memory(&data, &Options::default())
                        .map_err(|e| ResizeError::Encode(format!("PNG optimization failed: {}", e)))
                } else {
                    Ok(data)
                }
            }
            OutputFormat::Gif => encode_gif(image),
            OutputFormat::Bmp | OutputFormat::Tiff => encode_with_image(image, format),
        }
    }

    fn encode_jpeg(&self, image: &DynamicImage) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut buffer, self.quality);
        image
            .write_with_encoder(encoder)
            .map_err(|e| ResizeError::Encode(format!("JPEG encode failed: {}", e)))?;
        Ok(buffer)
    }

    fn encode_webp(&self, image: &DynamicImage) -> Result<Vec<u8>> {
        let (width, height) = (image.width(), image.height());
        let encoder = match image {
            DynamicImage::ImageRgba8(rgba) => webp::Encoder::from_rgba(rgba.as_raw(), width, height),
            DynamicImage::ImageRgb8(rgb) => webp::Encoder::from_rgb(rgb.as_raw(), width, height),
            other => {
                return Err(ResizeError::Encode(format!(
                    "WebP encoder cannot take {:?} pixels",
                    other.color()
                )))
            }
        };

        let memory = encoder
            .encode_simple(false, self.quality as f32)
            .map_err(|e| ResizeError::Encode(format!("WebP encode failed: {:?}", e)))?;
        Ok(memory.to_vec())
    }
}

/// Single-frame gif; colours are quantised to a palette by the encoder.
fn encode_gif(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    {
        let mut encoder = GifEncoder::new(&mut buffer);
        encoder
            .encode_frame(Frame::new(image.to_rgba8()))
            .map_err(|e| ResizeError::Encode(format!("GIF encode failed: {}", e)))?;
    }
    Ok(buffer)
}

fn encode_with_image(image: &DynamicImage, format: OutputFormat) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, format.image_format())
        .map_err(|e| ResizeError::Encode(format!("{} encode failed: {}", format, e)))?;
    Ok(buffer.into_inner())
}

/// Bring the pixel layout in line with what `format` can store. Alpha is
/// flattened onto white for formats without transparency.
pub fn reconcile(image: DynamicImage, format: OutputFormat) -> DynamicImage {
    let color = image.color();

    if color.has_alpha() && !format.supports_alpha() {
        log::debug!("Flattening {:?} onto white for {}", color, format);
        return DynamicImage::ImageRgb8(flatten_onto(&image, WHITE));
    }

    let is_float = matches!(color, ColorType::Rgb32F | ColorType::Rgba32F);
    match format {
        OutputFormat::Png if !is_float => image,
        OutputFormat::Gif => into_rgba8(image),
        OutputFormat::WebP => {
            if color.has_alpha() {
                into_rgba8(image)
            } else {
                into_rgb8(image)
            }
        }
        _ if color.has_alpha() => into_rgba8(image),
        _ if !color.has_color() && !is_float => match image {
            DynamicImage::ImageLuma8(_) => image,
            other => DynamicImage::ImageLuma8(other.to_luma8()),
        },
        _ => into_rgb8(image),
    }
}

fn into_rgb8(image: DynamicImage) -> DynamicImage {
    match image {
        DynamicImage::ImageRgb8(_) => image,
        other => DynamicImage::ImageRgb8(other.to_rgb8()),
    }
}

fn into_rgba8(image: DynamicImage) -> DynamicImage {
    match image {
        DynamicImage::ImageRgba8(_) => image,
        other => DynamicImage::ImageRgba8(other.into_rgba8()),
    }
}

/// Composite `image` over an opaque `background`.
pub fn flatten_onto(image: &DynamicImage, background: Rgb<u8>) -> RgbImage {
    let rgba = image.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let alpha = a as u32;
        let blend = |fg: u8, bg: u8| -> u8 {
            ((fg as u32 * alpha + bg as u32 * (255 - alpha) + 127) / 255) as u8
        };
        Rgb([
            blend(r, background[0]),
            blend(g, background[1]),
            blend(b, background[2]),
        ])
    })
}

/// Write `data` to a hidden temp file next to `path` and rename it into place.
fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = tempfile::Builder::new()
        .prefix(".pixie-")
        .suffix(".part")
        .tempfile_in(dir)
        .map_err(|e| ResizeError::Encode(format!("cannot create temp file in {}: {}", dir.display(), e)))?;

    temp.write_all(data)
        .and_then(|_| temp.as_file().sync_all())
        .map_err(|e| ResizeError::Encode(format!("cannot write {}: {}", path.display(), e)))?;

    temp.persist(path)
        .map_err(|e| ResizeError::Encode(format!("cannot move output into {}: {}", path.display(), e.error)))?;

    Ok(())
}
