//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Calculate the size that fits an image inside a bounding box.
///
/// Returns `None` when the source already fits (`width <= max_width` and
/// `height <= max_height`); images are never enlarged.
///
/// Otherwise the width bound is tried first and the height is derived from
/// the aspect ratio (truncated). If that height overflows the height bound,
/// the height bound wins and the width is derived instead (truncated).
///
/// # Examples
/// ```
/// # use image_compress::imaging::calculate_bounded_dimensions;
/// // Landscape: the width bound is binding
/// assert_eq!(calculate_bounded_dimensions((800, 600), (400, 400)), Some((400, 300)));
///
/// // Portrait: the height bound is binding
/// assert_eq!(calculate_bounded_dimensions((600, 800), (400, 400)), Some((300, 400)));
///
/// // Already small enough
/// assert_eq!(calculate_bounded_dimensions((100, 100), (500, 500)), None);
/// ```
pub fn calculate_bounded_dimensions(source: (u32, u32), bounds: (u32, u32)) -> Option<(u32, u32)> {
    let (src_w, src_h) = source;
    let (max_w, max_h) = bounds;

    if src_w <= max_w && src_h <= max_h {
        return None;
    }

    // Must stay f32: in f64, 72x1120 into 1000x700 truncates to 44x700
    let aspect = src_w as f32 / src_h as f32;

    let mut w = max_w;
    let mut h = (w as f32 / aspect) as u32;

    if h > max_h {
        h = max_h;
        w = (h as f32 * aspect) as u32;
    }

    Some((w, h))
}

/// Dimensions produced by decoding with a subsample factor.
///
/// Floor division per axis, never below one pixel.
pub fn calculate_subsampled_dimensions(source: (u32, u32), factor: u32) -> (u32, u32) {
    let (w, h) = source;
    let factor = factor.max(1);
    ((w / factor).max(1), (h / factor).max(1))
}
