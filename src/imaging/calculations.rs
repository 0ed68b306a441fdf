//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use super::params::{CropRegion, Gravity};

/// Scale `source` so its width becomes `width`, keeping the aspect ratio.
///
/// The derived height is rounded and never drops below one pixel.
///
/// ```text
/// (1200, 800) → width 600 → (600, 400)
/// ```
pub fn scale_to_width(source: (u32, u32), width: u32) -> (u32, u32) {
    let (src_w, src_h) = source;
    let h = (src_h as f64 * width as f64 / src_w as f64).round() as u32;
    (width, h.max(1))
}

/// Scale `source` so its height becomes `height`, keeping the aspect ratio.
pub fn scale_to_height(source: (u32, u32), height: u32) -> (u32, u32) {
    let (src_w, src_h) = source;
    let w = (src_w as f64 * height as f64 / src_h as f64).round() as u32;
    (w.max(1), height)
}

/// Largest dimensions with the source aspect ratio that fit inside `bounds`.
///
/// Scales up as well as down: a 100×50 region fit into 400×400 becomes 400×200.
pub fn fit_within(source: (u32, u32), bounds: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (max_w, max_h) = bounds;

    let src_aspect = src_w as f64 / src_h as f64;
    let box_aspect = max_w as f64 / max_h as f64;

    if src_aspect > box_aspect {
        scale_to_width(source, max_w)
    } else {
        scale_to_height(source, max_h)
    }
}

/// Calculate dimensions needed to fill a target area (resize before crop).
///
/// Returns dimensions that completely cover the target area while maintaining
/// the source aspect ratio. One dimension will match exactly, the other may exceed.
pub fn calculate_fill_dimensions(source: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (tgt_w, tgt_h) = target;

    let src_aspect = src_w as f64 / src_h as f64;
    let tgt_aspect = tgt_w as f64 / tgt_h as f64;

    if src_aspect > tgt_aspect {
        // Source is wider: height will match, width will exceed
        let h = tgt_h;
        let w = (h as f64 * src_aspect).round() as u32;
        (w.max(tgt_w), h)
    } else {
        // Source is taller: width will match, height will exceed
        let w = tgt_w;
        let h = (w as f64 / src_aspect).round() as u32;
        (w, h.max(tgt_h))
    }
}

/// Top-left offset of a `target` box inside a `filled` image at `gravity`.
pub fn gravity_offset(filled: (u32, u32), target: (u32, u32), gravity: Gravity) -> (u32, u32) {
    let (fx, fy) = gravity.anchor();
    let spare_w = filled.0.saturating_sub(target.0) as f64;
    let spare_h = filled.1.saturating_sub(target.1) as f64;
    ((spare_w * fx).round() as u32, (spare_h * fy).round() as u32)
}

/// Intersect a crop region with the source bounds.
///
/// Returns `None` when the region lies entirely outside the image.
pub fn clamp_region(region: CropRegion, source: (u32, u32)) -> Option<CropRegion> {
    let (src_w, src_h) = source;
    if region.x >= src_w || region.y >= src_h {
        return None;
    }
    let width = region.width.min(src_w - region.x);
    let height = region.height.min(src_h - region.y);
    if width == 0 || height == 0 {
        return None;
    }
    Some(CropRegion {
        width,
        height,
        ..region
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_to_width_landscape() {
        assert_eq!(scale_to_width((1200, 800), 600), (600, 400));
    }

    #[test]
    fn scale_to_height_portrait() {
        // 1200x1800 constrained to height 400 → 267x400
        assert_eq!(scale_to_height((1200, 1800), 400), (267, 400));
    }

    #[test]
    fn scale_never_collapses_to_zero() {
        assert_eq!(scale_to_width((4000, 1), 10), (10, 1));
        assert_eq!(scale_to_height((1, 4000), 10), (1, 10));
    }

    #[test]
    fn fit_within_wide_source() {
        assert_eq!(fit_within((400, 100), (200, 200)), (200, 50));
    }

    #[test]
    fn fit_within_tall_source_upscales() {
        assert_eq!(fit_within((400, 600), (400, 1200)), (400, 600));
        assert_eq!(fit_within((100, 200), (400, 400)), (200, 400));
    }

    #[test]
    fn fill_dimensions_wider_source() {
        // 1600x900 into 400x400: height matches, width exceeds
        assert_eq!(calculate_fill_dimensions((1600, 900), (400, 400)), (711, 400));
    }

    #[test]
    fn fill_dimensions_taller_source() {
        assert_eq!(calculate_fill_dimensions((600, 800), (400, 500)), (400, 533));
    }

    #[test]
    fn fill_dimensions_same_aspect() {
        assert_eq!(calculate_fill_dimensions((800, 1000), (400, 500)), (400, 500));
    }

    #[test]
    fn gravity_offset_center() {
        assert_eq!(
            gravity_offset((711, 400), (400, 400), Gravity::Center),
            (156, 0)
        );
    }

    #[test]
    fn gravity_offset_edges() {
        assert_eq!(
            gravity_offset((400, 533), (400, 500), Gravity::North),
            (0, 0)
        );
        assert_eq!(
            gravity_offset((400, 533), (400, 500), Gravity::South),
            (0, 33)
        );
        assert_eq!(
            gravity_offset((711, 400), (400, 400), Gravity::East),
            (311, 0)
        );
    }

    #[test]
    fn clamp_region_inside_bounds_unchanged() {
        let region = CropRegion {
            width: 400,
            height: 600,
            x: 800,
            y: 300,
        };
        assert_eq!(clamp_region(region, (1600, 1200)), Some(region));
    }

    #[test]
    fn clamp_region_trims_overhang() {
        let region = CropRegion {
            width: 400,
            height: 600,
            x: 800,
            y: 300,
        };
        assert_eq!(
            clamp_region(region, (1000, 700)),
            Some(CropRegion {
                width: 200,
                height: 400,
                x: 800,
                y: 300
            })
        );
    }

    #[test]
    fn clamp_region_outside_is_none() {
        let region = CropRegion {
            width: 10,
            height: 10,
            x: 500,
            y: 0,
        };
        assert_eq!(clamp_region(region, (500, 500)), None);
    }
}
