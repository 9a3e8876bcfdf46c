// pixie/src/core/format.rs
use super::{ResizeError, Result};
use image::ImageFormat;
use std::fmt;
use std::path::Path;

/// Extensions accepted as input, lowercase and without the leading dot.
pub const INPUT_EXTENSIONS: [&str; 8] = [
    "jpg", "jpeg", "png", "bmp", "gif", "tiff", "tif", "webp",
];

/// Formats the tool can write. `Gif` is only chosen when a gif source keeps
/// its own format; it is not offered as a conversion target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Jpeg,
    Png,
    Bmp,
    WebP,
    Tiff,
    Gif,
}

impl OutputFormat {
    /// Conversion targets.
    pub const ALL: [OutputFormat; 5] = [
        OutputFormat::Jpeg,
        OutputFormat::Png,
        OutputFormat::Bmp,
        OutputFormat::WebP,
        OutputFormat::Tiff,
    ];

    /// Parse a format name such as `JPEG`, `png` or `jpg`.
    pub fn from_name(name: &str) -> Result<Self> {
        match name.trim().to_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            "png" => Ok(OutputFormat::Png),
            "bmp" => Ok(OutputFormat::Bmp),
            "webp" => Ok(OutputFormat::WebP),
            "tiff" | "tif" => Ok(OutputFormat::Tiff),
            other => Err(ResizeError::UnsupportedFormat(format!(
                "unknown output format '{}' (expected JPEG, PNG, BMP, WEBP or TIFF)",
                other
            ))),
        }
    }

    /// Output format matching a source file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match normalize_extension(ext).as_str() {
            "jpg" | "jpeg" => Some(OutputFormat::Jpeg),
            "png" => Some(OutputFormat::Png),
            "bmp" => Some(OutputFormat::Bmp),
            "webp" => Some(OutputFormat::WebP),
            "tiff" | "tif" => Some(OutputFormat::Tiff),
            "gif" => Some(OutputFormat::Gif),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
            OutputFormat::Bmp => "bmp",
            OutputFormat::WebP => "webp",
            OutputFormat::Tiff => "tiff",
            OutputFormat::Gif => "gif",
        }
    }

    pub fn supports_alpha(self) -> bool {
        match self {
            // gif keeps alpha as a single transparent palette entry
            OutputFormat::Png | OutputFormat::WebP | OutputFormat::Tiff | OutputFormat::Gif => true,
            OutputFormat::Jpeg | OutputFormat::Bmp => false,
        }
    }

    /// Whether the quality setting has any effect on the encoder.
    pub fn is_lossy(self) -> bool {
        matches!(self, OutputFormat::Jpeg | OutputFormat::WebP)
    }

    pub fn image_format(self) -> ImageFormat {
        match self {
            OutputFormat::Jpeg => ImageFormat::Jpeg,
            OutputFormat::Png => ImageFormat::Png,
            OutputFormat::Bmp => ImageFormat::Bmp,
            OutputFormat::WebP => ImageFormat::WebP,
            OutputFormat::Tiff => ImageFormat::Tiff,
            OutputFormat::Gif => ImageFormat::Gif,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Jpeg => "JPEG",
            OutputFormat::Png => "PNG",
            OutputFormat::Bmp => "BMP",
            OutputFormat::WebP => "WEBP",
            OutputFormat::Tiff => "TIFF",
            OutputFormat::Gif => "GIF",
        };
        f.write_str(name)
    }
}

fn normalize_extension(ext: &str) -> String {
    ext.trim_start_matches('.').to_lowercase()
}

/// Case-insensitive input extension check; the leading dot is optional.
pub fn is_supported_extension(ext: &str) -> bool {
    let ext = normalize_extension(ext);
    INPUT_EXTENSIONS.contains(&ext.as_str())
}

pub fn is_supported_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(is_supported_extension)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_extensions_ignore_case_and_dot() {
        for ext in ["jpg", ".JPG", "Jpeg", "png", ".gif", "TIF", "tiff", "webp", "bmp"] {
            assert!(is_supported_extension(ext), "{ext} should be accepted");
        }
        for ext in ["", ".", "txt", "svg", "jpgx", "heic"] {
            assert!(!is_supported_extension(ext), "{ext} should be rejected");
        }
    }

    #[test]
    fn path_without_extension_is_not_an_image() {
        assert!(!is_supported_path(Path::new("README")));
        assert!(is_supported_path(Path::new("dir/photo.PNG")));
    }

    #[test]
    fn output_names_parse_case_insensitively() {
        assert_eq!(OutputFormat::from_name("JPEG").unwrap(), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::from_name("jpg").unwrap(), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::from_name("WebP").unwrap(), OutputFormat::WebP);
        assert_eq!(OutputFormat::from_name("tif").unwrap(), OutputFormat::Tiff);
        assert!(matches!(
            OutputFormat::from_name("gif"),
            Err(ResizeError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn gif_sources_keep_gif() {
        assert_eq!(OutputFormat::from_extension("GIF"), Some(OutputFormat::Gif));
        assert_eq!(OutputFormat::from_extension(".JPEG"), Some(OutputFormat::Jpeg));
        assert_eq!(OutputFormat::from_extension("svg"), None);
        assert_eq!(OutputFormat::Gif.extension(), "gif");
        assert!(!OutputFormat::Gif.is_lossy());
        assert!(!OutputFormat::ALL.contains(&OutputFormat::Gif));
    }

    #[test]
    fn capability_table() {
        let lossy: Vec<_> = OutputFormat::ALL.iter().filter(|f| f.is_lossy()).collect();
        assert_eq!(lossy, vec![&OutputFormat::Jpeg, &OutputFormat::WebP]);
        assert!(!OutputFormat::Jpeg.supports_alpha());
        assert!(!OutputFormat::Bmp.supports_alpha());
        assert!(OutputFormat::Png.supports_alpha());
        assert_eq!(OutputFormat::Jpeg.extension(), "jpg");
        assert_eq!(OutputFormat::Tiff.extension(), "tiff");
    }

    #[test]
    fn display_round_trips_through_from_name() {
        for format in OutputFormat::ALL {
            assert_eq!(OutputFormat::from_name(&format.to_string()).unwrap(), format);
        }
    }
}
