// pixie/src/utils/mod.rs
use crate::core::{OutputSpec, ResizeError, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// `{prefix}{stem}{suffix}.{ext}`. The extension comes from the requested
/// format, or is copied from the source when no format is requested.
pub fn output_file_name(input_path: &Path, output: &OutputSpec) -> Result<OsString> {
    let stem = input_path.file_stem().ok_or_else(|| {
        ResizeError::InvalidArgument(format!("Invalid file name: {}", input_path.display()))
    })?;

    let mut name = OsString::from(&output.prefix);
    name.push(stem);
    name.push(&output.suffix);

    match (output.format, input_path.extension()) {
        (Some(format), _) => {
            name.push(".");
            name.push(format.extension());
        }
        (None, Some(ext)) => {
            name.push(".");
            name.push(ext);
        }
        (None, None) => {}
    }

    Ok(name)
}

pub fn output_path(input_path: &Path, output_dir: &Path, output: &OutputSpec) -> Result<PathBuf> {
    Ok(output_dir.join(output_file_name(input_path, output)?))
}

pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let base = 1024_f64;
    let bytes_f64 = bytes as f64;
    let exponent = ((bytes_f64.log10() / base.log10()).floor() as usize).min(UNITS.len() - 1);
    let size = bytes_f64 / base.powi(exponent as i32);

    format!("{:.2} {}", size, UNITS[exponent])
}

/// Percentage change from `before` to `after`; negative means smaller.
pub fn size_change_percent(before: u64, after: u64) -> f64 {
    if before == 0 {
        return 0.0;
    }
    (after as f64 - before as f64) / before as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::OutputFormat;

    fn spec(format: Option<OutputFormat>, prefix: &str, suffix: &str) -> OutputSpec {
        OutputSpec {
            format,
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn decorated_name_uses_target_extension() {
        let name = output_file_name(
            Path::new("in/photo.png"),
            &spec(Some(OutputFormat::Jpeg), "thumb_", "_sm"),
        )
        .unwrap();
        assert_eq!(name, "thumb_photo_sm.jpg");
    }

    #[test]
    fn source_extension_is_kept_verbatim() {
        let name = output_file_name(Path::new("IMG_01.JPEG"), &spec(None, "", "-x")).unwrap();
        assert_eq!(name, "IMG_01-x.JPEG");
    }

    #[test]
    fn only_last_extension_is_replaced() {
        let name = output_file_name(
            Path::new("archive.tar.png"),
            &spec(Some(OutputFormat::WebP), "", ""),
        )
        .unwrap();
        assert_eq!(name, "archive.tar.webp");
    }

    #[test]
    fn output_path_joins_directory() {
        let path = output_path(
            Path::new("src/a.bmp"),
            Path::new("out"),
            &spec(Some(OutputFormat::Tiff), "p_", ""),
        )
        .unwrap();
        assert_eq!(path, Path::new("out/p_a.tiff"));
    }

    #[test]
    fn file_sizes() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(512), "512.00 B");
        assert_eq!(format_file_size(1536), "1.50 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5.00 MB");
    }

    #[test]
    fn size_change() {
        assert_eq!(size_change_percent(0, 10), 0.0);
        assert_eq!(size_change_percent(200, 50), -75.0);
        assert_eq!(size_change_percent(100, 150), 50.0);
    }
}
