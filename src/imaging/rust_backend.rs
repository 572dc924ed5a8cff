//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP) | `image::ImageReader` with sniffed format |
//! | Subsample | `DynamicImage::resize_exact` with `Triangle` filter |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` filter |
//! | Rotate (quarter turns) | `DynamicImage::rotate90` / `rotate180` / `rotate270` |
//! | Rotate (other angles) | inverse-mapped bilinear sampling, original canvas |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` |
//! | Encode → PNG | `image::codecs::png::PngEncoder` |
//! | Encode → WebP (lossy) | `webp` crate (libwebp), feature `lossy-webp` |
//! | Encode → WebP (lossless) | `image::codecs::webp::WebPEncoder` |

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::calculate_subsampled_dimensions;
use super::encoders::{Capabilities, EncoderKind};
use super::params::{EncodeParams, Quality, ResizeParams, RotateParams, SubsampleFactor};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::codecs::webp::WebPEncoder;
use image::imageops::FilterType;
use image::{ColorType, DynamicImage, ExtendedColorType, ImageEncoder, ImageReader, Rgba, RgbaImage};
use std::io::Cursor;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend {
    capabilities: Capabilities,
}

impl RustBackend {
    pub fn new() -> Self {
        Self::with_capabilities(Capabilities::probe())
    }

    /// Restrict the encoders this backend may pick from.
    pub fn with_capabilities(capabilities: Capabilities) -> Self {
        Self { capabilities }
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode bytes of any compiled-in format.
fn load_image(bytes: &[u8]) -> Result<DynamicImage, BackendError> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| BackendError::Decode(e.to_string()))
}

/// Rotate clockwise about the center, keeping the original canvas.
///
/// Corners that leave the canvas are clipped; pixels with no source
/// coverage come out fully transparent.
fn rotate_within_canvas(img: &DynamicImage, degrees: f32) -> DynamicImage {
    let src = img.to_rgba8();
    let (w, h) = src.dimensions();
    if w == 0 || h == 0 {
        return DynamicImage::ImageRgba8(src);
    }

    let (sin, cos) = degrees.to_radians().sin_cos();
    let cx = w as f32 / 2.0;
    let cy = h as f32 / 2.0;

    let out = RgbaImage::from_fn(w, h, |x, y| {
        let dx = x as f32 + 0.5 - cx;
        let dy = y as f32 + 0.5 - cy;
        // Inverse of a clockwise turn in y-down coordinates
        let sx = cos * dx + sin * dy + cx - 0.5;
        let sy = -sin * dx + cos * dy + cy - 0.5;
        sample_bilinear(&src, sx, sy)
    });

    DynamicImage::ImageRgba8(out)
}

/// Bilinear sample at pixel-center coordinates; transparent outside the image.
fn sample_bilinear(src: &RgbaImage, x: f32, y: f32) -> Rgba<u8> {
    let (w, h) = src.dimensions();
    let max_x = (w - 1) as f32;
    let max_y = (h - 1) as f32;
    if x < -0.5 || y < -0.5 || x > max_x + 0.5 || y > max_y + 0.5 {
        return Rgba([0, 0, 0, 0]);
    }

    let x = x.clamp(0.0, max_x);
    let y = y.clamp(0.0, max_y);
    let x0 = x.floor() as u32;
    let y0 = y.floor() as u32;
    let x1 = (x0 + 1).min(w - 1);
    let y1 = (y0 + 1).min(h - 1);
    let fx = x - x0 as f32;
    let fy = y - y0 as f32;

    let p00 = src.get_pixel(x0, y0).0;
    let p10 = src.get_pixel(x1, y0).0;
    let p01 = src.get_pixel(x0, y1).0;
    let p11 = src.get_pixel(x1, y1).0;

    let mut out = [0u8; 4];
    for c in 0..4 {
        let top = p00[c] as f32 * (1.0 - fx) + p10[c] as f32 * fx;
        let bottom = p01[c] as f32 * (1.0 - fx) + p11[c] as f32 * fx;
        out[c] = (top * (1.0 - fy) + bottom * fy).round().clamp(0.0, 255.0) as u8;
    }
    Rgba(out)
}

/// JPEG has no alpha channel; alpha is dropped.
fn encode_jpeg(img: &DynamicImage, quality: Quality) -> Result<Vec<u8>, BackendError> {
    let rgb = img.to_rgb8();
    let mut buf = Vec::new();
    // The encoder's floor is 1
    let q = quality.value().max(1) as u8;
    JpegEncoder::new_with_quality(&mut buf, q)
        .write_image(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
        .map_err(|e| BackendError::Encode(format!("JPEG encode failed: {e}")))?;
    Ok(buf)
}

/// PNG is lossless; quality only picks the compression effort.
fn encode_png(img: &DynamicImage, quality: Quality) -> Result<Vec<u8>, BackendError> {
    let compression = match quality.value() {
        0..=33 => CompressionType::Fast,
        34..=66 => CompressionType::Default,
        _ => CompressionType::Best,
    };

    let converted;
    let img = match img.color() {
        ColorType::L8
        | ColorType::La8
        | ColorType::Rgb8
        | ColorType::Rgba8
        | ColorType::L16
        | ColorType::La16
        | ColorType::Rgb16
        | ColorType::Rgba16 => img,
        _ => {
            converted = DynamicImage::ImageRgba8(img.to_rgba8());
            &converted
        }
    };

    let mut buf = Vec::new();
    let encoder = PngEncoder::new_with_quality(&mut buf, compression, PngFilter::Adaptive);
    img.write_with_encoder(encoder)
        .map_err(|e| BackendError::Encode(format!("PNG encode failed: {e}")))?;
    Ok(buf)
}

fn encode_webp_lossless(img: &DynamicImage) -> Result<Vec<u8>, BackendError> {
    let rgba = img.to_rgba8();
    let mut buf = Vec::new();
    WebPEncoder::new_lossless(&mut buf)
        .write_image(rgba.as_raw(), rgba.width(), rgba.height(), ExtendedColorType::Rgba8)
        .map_err(|e| BackendError::Encode(format!("WebP encode failed: {e}")))?;
    Ok(buf)
}

#[cfg(feature = "lossy-webp")]
fn encode_webp_lossy(img: &DynamicImage, quality: Quality) -> Result<Vec<u8>, BackendError> {
    let rgba = img.to_rgba8();
    let encoder = webp::Encoder::from_rgba(rgba.as_raw(), rgba.width(), rgba.height());
    let encoded = encoder
        .encode_simple(false, quality.value() as f32)
        .map_err(|e| BackendError::Encode(format!("WebP encode failed: {e:?}")))?;
    Ok(encoded.to_vec())
}

#[cfg(not(feature = "lossy-webp"))]
fn encode_webp_lossy(_img: &DynamicImage, _quality: Quality) -> Result<Vec<u8>, BackendError> {
    Err(BackendError::Encode(
        "lossy WebP support is not compiled in".to_string(),
    ))
}

impl ImageBackend for RustBackend {
    type Image = DynamicImage;

    fn dimensions(&self, image: &DynamicImage) -> Dimensions {
        Dimensions::new(image.width(), image.height())
    }

    fn decode(&self, bytes: &[u8], subsample: SubsampleFactor) -> Result<DynamicImage, BackendError> {
        let img = load_image(bytes)?;
        if subsample.is_identity() {
            return Ok(img);
        }

        let (w, h) = calculate_subsampled_dimensions((img.width(), img.height()), subsample.value());
        Ok(img.resize_exact(w, h, FilterType::Triangle))
    }

    fn resize(&self, image: DynamicImage, params: &ResizeParams) -> Result<DynamicImage, BackendError> {
        Ok(image.resize_exact(params.width, params.height, FilterType::Lanczos3))
    }

    fn rotate(&self, image: DynamicImage, params: &RotateParams) -> Result<DynamicImage, BackendError> {
        Ok(match params.quarter_turns() {
            Some(0) => image,
            Some(1) => image.rotate90(),
            Some(2) => image.rotate180(),
            Some(_) => image.rotate270(),
            None => rotate_within_canvas(&image, params.degrees),
        })
    }

    fn encode(&self, image: &DynamicImage, params: &EncodeParams) -> Result<Vec<u8>, BackendError> {
        let kind = self.capabilities.select(params.format).ok_or_else(|| {
            BackendError::Encode(format!("no encoder available for {}", params.format))
        })?;
        log::debug!(
            "encoding {}x{} as {kind:?} (requested {}, quality {})",
            image.width(),
            image.height(),
            params.format,
            params.quality.value()
        );

        match kind {
            EncoderKind::Jpeg => encode_jpeg(image, params.quality),
            EncoderKind::Png => encode_png(image, params.quality),
            EncoderKind::WebpLossy => encode_webp_lossy(image, params.quality),
            EncoderKind::WebpLossless => encode_webp_lossless(image),
        }
    }
}
