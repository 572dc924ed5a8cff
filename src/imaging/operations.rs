//! High-level image operations.
//!
//! These functions combine calculations with backend execution. Each stage
//! of the pipeline has a planning half (pure, unit-testable) and an executing
//! half that calls the backend only when the plan says there is work to do.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::calculate_bounded_dimensions;
use super::params::{
    EncodeParams, OutputFormat, Quality, ResizeParams, RotateParams, SubsampleFactor,
    TransformRequest,
};

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Decode bytes, subsampling while decoding when asked to.
pub fn decode<B: ImageBackend>(
    backend: &B,
    bytes: &[u8],
    subsample: SubsampleFactor,
) -> Result<B::Image> {
    let image = backend.decode(bytes, subsample)?;
    let dims = backend.dimensions(&image);
    log::debug!(
        "decoded {} bytes to {}x{} (subsample {})",
        bytes.len(),
        dims.width,
        dims.height,
        subsample.value()
    );
    Ok(image)
}

/// Plan a bounding resize without executing it.
///
/// Returns `None` when the image already fits.
pub fn plan_resize(source: Dimensions, max_width: u32, max_height: u32) -> Option<ResizeParams> {
    calculate_bounded_dimensions(source.as_tuple(), (max_width, max_height))
        .map(|(width, height)| ResizeParams { width, height })
}

/// Shrink an image to fit inside `max_width` × `max_height`.
///
/// Images that already fit are returned untouched; nothing is ever enlarged.
pub fn resize_to_bounds<B: ImageBackend>(
    backend: &B,
    image: B::Image,
    max_width: u32,
    max_height: u32,
) -> Result<B::Image> {
    let source = backend.dimensions(&image);
    match plan_resize(source, max_width, max_height) {
        Some(params) => {
            log::debug!(
                "resizing {}x{} to {}x{}",
                source.width,
                source.height,
                params.width,
                params.height
            );
            backend.resize(image, &params)
        }
        None => Ok(image),
    }
}

/// Rotate clockwise by `degrees`. Zero returns the input unchanged.
pub fn rotate<B: ImageBackend>(backend: &B, image: B::Image, degrees: i32) -> Result<B::Image> {
    if degrees == 0 {
        return Ok(image);
    }
    log::debug!("rotating {degrees}°");
    // Reduce before the float cast; large i32 values are not exact in f32
    backend.rotate(
        image,
        &RotateParams {
            degrees: degrees.rem_euclid(360) as f32,
        },
    )
}

/// Encode to `format` at `quality`.
pub fn encode<B: ImageBackend>(
    backend: &B,
    image: &B::Image,
    format: OutputFormat,
    quality: Quality,
) -> Result<Vec<u8>> {
    backend.encode(image, &EncodeParams { format, quality })
}

/// Run the whole pipeline: decode → resize → rotate → encode.
///
/// `auto_correction_angle` and `keep_exif` are carried on the request but
/// are not consulted.
pub fn transform<B: ImageBackend>(
    backend: &B,
    bytes: &[u8],
    request: &TransformRequest,
) -> Result<Vec<u8>> {
    let image = decode(backend, bytes, request.subsample)?;
    let image = resize_to_bounds(backend, image, request.min_width, request.min_height)?;
    let image = rotate(backend, image, request.rotate_degrees)?;
    let encoded = encode(backend, &image, request.format, request.quality)?;
    log::debug!("encoded {} bytes as {}", encoded.len(), request.format);
    Ok(encoded)
}
