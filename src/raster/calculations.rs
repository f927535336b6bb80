//! Pure calculation functions for cover-fit geometry.
//!
//! All functions here are pure and testable without any I/O or images.

/// Calculate dimensions needed to cover a target area (resize before crop).
///
/// Returns dimensions that completely cover the target area while maintaining
/// the source aspect ratio. One dimension will match exactly, the other may exceed.
///
/// # Arguments
/// * `source` - Original raster dimensions (width, height)
/// * `target` - Target area dimensions (width, height)
///
/// # Returns
/// * `(width, height)` - Cover dimensions (at least one matches target)
pub fn calculate_cover_dimensions(source: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (tgt_w, tgt_h) = target;

    let src_aspect = src_w as f64 / src_h as f64;
    let tgt_aspect = tgt_w as f64 / tgt_h as f64;

    if src_aspect > tgt_aspect {
        // Source is wider: height will match, width will exceed
        let h = tgt_h;
        let w = (h as f64 * src_aspect).round() as u32;
        (w, h)
    } else {
        // Source is taller: width will match, height will exceed
        let w = tgt_w;
        let h = (w as f64 / src_aspect).round() as u32;
        (w, h)
    }
}

/// Calculate the top-left origin of a centered crop.
///
/// `scaled` must cover `target` in both dimensions (the output of
/// [`calculate_cover_dimensions`]); the excess is split evenly.
pub fn centered_crop_origin(scaled: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let (scl_w, scl_h) = scaled;
    let (tgt_w, tgt_h) = target;
    (
        scl_w.saturating_sub(tgt_w) / 2,
        scl_h.saturating_sub(tgt_h) / 2,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // calculate_cover_dimensions tests
    // =========================================================================

    #[test]
    fn cover_wider_source_to_portrait_target() {
        // 800x600 (4:3) → 400x500 target
        // Source is wider, so height matches: 500, width = 500 * (4/3) = 667
        assert_eq!(
            calculate_cover_dimensions((800, 600), (400, 500)),
            (667, 500)
        );
    }

    #[test]
    fn cover_taller_source_to_landscape_target() {
        // 600x800 (3:4) → 500x400 target
        // Source is taller, so width matches: 500, height = 500 * (4/3) = 667
        assert_eq!(
            calculate_cover_dimensions((600, 800), (500, 400)),
            (500, 667)
        );
    }

    #[test]
    fn cover_same_aspect_ratio() {
        // 800x600 (4:3) → 400x300 target (also 4:3) — perfect match
        assert_eq!(
            calculate_cover_dimensions((800, 600), (400, 300)),
            (400, 300)
        );
    }

    #[test]
    fn cover_square_source_to_share_canvas() {
        // 1000x1000 (1:1) → 1200x630 — width matches, height exceeds
        assert_eq!(
            calculate_cover_dimensions((1000, 1000), (1200, 630)),
            (1200, 1200)
        );
    }

    #[test]
    fn cover_never_leaves_margins() {
        for source in [(640, 480), (480, 640), (3000, 1000), (50, 900)] {
            let (w, h) = calculate_cover_dimensions(source, (1200, 630));
            assert!(w >= 1200, "width {w} leaves a margin for {source:?}");
            assert!(h >= 630, "height {h} leaves a margin for {source:?}");
        }
    }

    // =========================================================================
    // centered_crop_origin tests
    // =========================================================================

    #[test]
    fn crop_origin_splits_horizontal_excess() {
        assert_eq!(centered_crop_origin((1600, 630), (1200, 630)), (200, 0));
    }

    #[test]
    fn crop_origin_splits_vertical_excess() {
        assert_eq!(centered_crop_origin((1200, 1200), (1200, 630)), (0, 285));
    }

    #[test]
    fn crop_origin_exact_fit_is_zero() {
        assert_eq!(centered_crop_origin((1200, 630), (1200, 630)), (0, 0));
    }

    #[test]
    fn crop_origin_rounds_down_on_odd_excess() {
        assert_eq!(centered_crop_origin((1201, 631), (1200, 630)), (0, 0));
        assert_eq!(centered_crop_origin((1203, 633), (1200, 630)), (1, 1));
    }
}
