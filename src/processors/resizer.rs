// pixie/src/processors/resizer.rs
use crate::core::{ResizeError, ResizeSpec, Result, MAX_DIMENSION};
use image::{imageops::FilterType, DynamicImage, GenericImageView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeMode {
    /// Keep the source dimensions.
    Original,
    /// Force both sides, ignoring the source aspect ratio.
    Exact(u32, u32),
    /// Largest size that fits inside the box with the source aspect ratio.
    Fit(u32, u32),
    Width(u32),
    Height(u32),
}

impl ResizeMode {
    pub fn from_spec(spec: &ResizeSpec) -> Self {
        match (spec.width, spec.height) {
            (None, None) => ResizeMode::Original,
            (Some(w), None) => ResizeMode::Width(w),
            (None, Some(h)) => ResizeMode::Height(h),
            (Some(w), Some(h)) if spec.keep_aspect => ResizeMode::Fit(w, h),
            (Some(w), Some(h)) => ResizeMode::Exact(w, h),
        }
    }
}

/// Resizes with Lanczos3. Lower quality filters are not offered.
#[derive(Debug, Clone)]
pub struct Resizer {
    filter: FilterType,
}

impl Resizer {
    pub fn new() -> Self {
        Self {
            filter: FilterType::Lanczos3,
        }
    }

    pub fn resize(&self, image: DynamicImage, mode: ResizeMode) -> Result<DynamicImage> {
        let (width, height) = Self::checked_target_dimensions(image.dimensions(), mode)?;

        if (width, height) == image.dimensions() {
            log::debug!("Image dimensions unchanged, skipping resize");
            return Ok(image);
        }

        log::debug!(
            "Resizing image from {}x{} to {}x{}",
            image.width(),
            image.height(),
            width,
            height
        );

        Ok(image.resize_exact(width, height, self.filter))
    }

    /// `target_dimensions`, refusing results with a side above `MAX_DIMENSION`.
    pub fn checked_target_dimensions(source: (u32, u32), mode: ResizeMode) -> Result<(u32, u32)> {
        let (width, height) = Self::target_dimensions(source, mode);
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(ResizeError::TooLarge(format!(
                "resizing {}x{} would give {}x{} (max {} pixels per side)",
                source.0, source.1, width, height, MAX_DIMENSION
            )));
        }
        Ok((width, height))
    }

    /// Output dimensions for a source of `(width, height)` under `mode`.
    pub fn target_dimensions(source: (u32, u32), mode: ResizeMode) -> (u32, u32) {
        let (orig_w, orig_h) = source;
        if orig_w == 0 || orig_h == 0 {
            return source;
        }

        match mode {
            ResizeMode::Original => source,
            ResizeMode::Exact(w, h) => (w, h),
            ResizeMode::Width(w) => (w, scale_round(orig_h, w, orig_w)),
            ResizeMode::Height(h) => (scale_round(orig_w, h, orig_h), h),
            ResizeMode::Fit(box_w, box_h) => {
                // Width is the limiting side when box_w / orig_w <= box_h / orig_h.
                if box_w as u64 * orig_h as u64 <= box_h as u64 * orig_w as u64 {
                    (box_w, scale_round(orig_h, box_w, orig_w).min(box_h))
                } else {
                    (scale_round(orig_w, box_h, orig_h).min(box_w), box_h)
                }
            }
        }
    }
}

impl Default for Resizer {
    fn default() -> Self {
        Self::new()
    }
}

/// `round(value * num / den)` with halves rounded up, never below 1.
fn scale_round(value: u32, num: u32, den: u32) -> u32 {
    let (value, num, den) = (value as u64, num as u64, den as u64);
    let scaled = (2 * value * num + den) / (2 * den);
    scaled.clamp(1, u32::MAX as u64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn spec(width: Option<u32>, height: Option<u32>, keep_aspect: bool) -> ResizeMode {
        ResizeMode::from_spec(&ResizeSpec::new(width, height, keep_aspect))
    }

    #[test]
    fn mode_selection() {
        assert_eq!(spec(None, None, true), ResizeMode::Original);
        assert_eq!(spec(None, None, false), ResizeMode::Original);
        assert_eq!(spec(Some(10), None, false), ResizeMode::Width(10));
        assert_eq!(spec(None, Some(10), true), ResizeMode::Height(10));
        assert_eq!(spec(Some(10), Some(20), true), ResizeMode::Fit(10, 20));
        assert_eq!(spec(Some(10), Some(20), false), ResizeMode::Exact(10, 20));
    }

    #[test]
    fn width_only_derives_rounded_height() {
        assert_eq!(Resizer::target_dimensions((1920, 1080), ResizeMode::Width(800)), (800, 450));
        // 333 * 100 / 1000 = 33.3
        assert_eq!(Resizer::target_dimensions((1000, 333), ResizeMode::Width(100)), (100, 33));
        // 335 * 100 / 1000 = 33.5 rounds up
        assert_eq!(Resizer::target_dimensions((1000, 335), ResizeMode::Width(100)), (100, 34));
    }

    #[test]
    fn height_only_derives_rounded_width() {
        assert_eq!(Resizer::target_dimensions((1920, 1080), ResizeMode::Height(540)), (960, 540));
        assert_eq!(Resizer::target_dimensions((3, 7), ResizeMode::Height(10)), (4, 10));
    }

    #[test]
    fn derived_side_never_collapses_to_zero() {
        assert_eq!(Resizer::target_dimensions((10_000, 10), ResizeMode::Width(10)), (10, 1));
    }

    #[test]
    fn derived_side_above_limit_is_refused() {
        let result = Resizer::checked_target_dimensions((1, 100_000), ResizeMode::Width(100_000));
        assert!(matches!(result, Err(ResizeError::TooLarge(_))));

        let result = Resizer::checked_target_dimensions((100_000, 1), ResizeMode::Height(2));
        assert!(matches!(result, Err(ResizeError::TooLarge(_))));

        assert_eq!(
            Resizer::checked_target_dimensions((1, 2), ResizeMode::Height(MAX_DIMENSION)).unwrap(),
            (50_000, MAX_DIMENSION)
        );
    }

    #[test]
    fn oversized_target_leaves_image_alone() {
        let image = DynamicImage::ImageRgba8(RgbaImage::new(1, 1000));
        let result = Resizer::new().resize(image, ResizeMode::Width(1000));
        assert!(matches!(result, Err(ResizeError::TooLarge(_))));
    }

    #[test]
    fn exact_ignores_aspect() {
        assert_eq!(Resizer::target_dimensions((640, 480), ResizeMode::Exact(100, 300)), (100, 300));
    }

    #[test]
    fn fit_stays_inside_box_and_touches_one_side() {
        let cases = [
            ((1920, 1080), (800, 800)),
            ((1080, 1920), (800, 800)),
            ((640, 480), (1000, 100)),
            ((640, 480), (100, 1000)),
            ((500, 500), (300, 200)),
            ((7, 3), (5, 5)),
            ((1001, 999), (17, 23)),
        ];

        for (source, (bw, bh)) in cases {
            let (w, h) = Resizer::target_dimensions(source, ResizeMode::Fit(bw, bh));
            assert!(w <= bw && h <= bh, "{source:?} in {bw}x{bh} gave {w}x{h}");
            assert!(w == bw || h == bh, "{source:?} in {bw}x{bh} gave {w}x{h}");

            let src_ratio = source.0 as f64 / source.1 as f64;
            let out_ratio = w as f64 / h as f64;
            // One pixel of rounding on the derived side.
            let tolerance = src_ratio / w.min(h) as f64 + 1e-9;
            assert!(
                (src_ratio - out_ratio).abs() <= tolerance,
                "{source:?} -> {w}x{h} ratio drift"
            );
        }
    }

    #[test]
    fn fit_can_upscale() {
        assert_eq!(Resizer::target_dimensions((100, 50), ResizeMode::Fit(400, 400)), (400, 200));
    }

    #[test]
    fn resize_produces_target_size() {
        let image = DynamicImage::ImageRgba8(RgbaImage::new(40, 20));
        let resized = Resizer::new().resize(image, ResizeMode::Width(10)).unwrap();
        assert_eq!(resized.dimensions(), (10, 5));
    }

    #[test]
    fn original_mode_keeps_buffer() {
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(3, 2, image::Rgba([1, 2, 3, 4])));
        let resized = Resizer::new().resize(image.clone(), ResizeMode::Original).unwrap();
        assert_eq!(resized, image);
    }
}
