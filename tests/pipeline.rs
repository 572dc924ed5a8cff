//! End-to-end checks of the public compress API against real encoders.
//!
//! Run with: cargo test --test pipeline

use image::{ExtendedColorType, ImageEncoder, ImageFormat, RgbImage};
use image_compress::imaging::{Capabilities, RustBackend};
use image_compress::{
    CompressError, OutputFormat, Quality, SubsampleFactor, TransformRequest, compress,
    compress_from_bytes, compress_from_file, compress_from_file_to_file,
};
use std::path::Path;
use tempfile::TempDir;

fn jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 64])
    });
    let mut buf = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, 90)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
    buf
}

fn dims(bytes: &[u8]) -> (u32, u32) {
    let img = image::load_from_memory(bytes).unwrap();
    (img.width(), img.height())
}

fn request(min_width: u32, min_height: u32, format: OutputFormat) -> TransformRequest {
    TransformRequest {
        min_width,
        min_height,
        quality: Quality::new(80),
        rotate_degrees: 0,
        format,
        ..TransformRequest::default()
    }
}

// =========================================================================
// Resize scenarios
// =========================================================================

#[test]
fn landscape_is_width_bound() {
    let out = compress_from_bytes(&jpeg(800, 600), &request(400, 400, OutputFormat::Jpeg)).unwrap();
    assert_eq!(dims(&out), (400, 300));
}

#[test]
fn portrait_is_height_bound() {
    let out = compress_from_bytes(&jpeg(600, 800), &request(400, 400, OutputFormat::Jpeg)).unwrap();
    assert_eq!(dims(&out), (300, 400));
}

#[test]
fn small_image_is_never_upscaled() {
    let out = compress_from_bytes(&jpeg(100, 100), &request(500, 500, OutputFormat::Jpeg)).unwrap();
    assert_eq!(dims(&out), (100, 100));
}

#[test]
fn subsample_then_resize() {
    // 800x600 subsampled by 4 → 200x150, already inside 400x400
    let req = TransformRequest {
        subsample: SubsampleFactor::new(4),
        ..request(400, 400, OutputFormat::Png)
    };
    let out = compress_from_bytes(&jpeg(800, 600), &req).unwrap();
    assert_eq!(dims(&out), (200, 150));
}

// =========================================================================
// Rotation
// =========================================================================

#[test]
fn quarter_turn_after_resize() {
    let req = TransformRequest {
        rotate_degrees: 270,
        ..request(400, 400, OutputFormat::Jpeg)
    };
    let out = compress_from_bytes(&jpeg(800, 600), &req).unwrap();
    assert_eq!(dims(&out), (300, 400));
}

#[test]
fn odd_angle_keeps_canvas() {
    let req = TransformRequest {
        rotate_degrees: 30,
        ..request(400, 400, OutputFormat::Png)
    };
    let out = compress_from_bytes(&jpeg(800, 600), &req).unwrap();
    assert_eq!(dims(&out), (400, 300));
}

// =========================================================================
// Formats
// =========================================================================

#[test]
fn png_output_is_png() {
    let out = compress_from_bytes(&jpeg(64, 64), &request(64, 64, OutputFormat::Png)).unwrap();
    assert_eq!(image::guess_format(&out).unwrap(), ImageFormat::Png);
}

#[test]
fn webp_output_is_webp() {
    let out = compress_from_bytes(&jpeg(64, 64), &request(64, 64, OutputFormat::WebP)).unwrap();
    assert_eq!(image::guess_format(&out).unwrap(), ImageFormat::WebP);
    assert_eq!(dims(&out), (64, 64));
}

#[test]
fn unknown_format_code_encodes_jpeg() {
    let req = request(64, 64, OutputFormat::from_code(9));
    let out = compress_from_bytes(&jpeg(64, 64), &req).unwrap();
    assert_eq!(image::guess_format(&out).unwrap(), ImageFormat::Jpeg);
}

#[test]
fn webp_without_encoder_falls_back_to_jpeg() {
    let backend = RustBackend::with_capabilities(Capabilities::without_webp());
    let out = compress::compress_from_bytes_with_backend(
        &backend,
        &jpeg(120, 80),
        &request(60, 60, OutputFormat::WebP),
    )
    .unwrap();
    assert_eq!(image::guess_format(&out).unwrap(), ImageFormat::Jpeg);
    assert_eq!(dims(&out), (60, 40));
}

// =========================================================================
// File variants
// =========================================================================

#[test]
fn missing_input_is_file_not_found() {
    let err = compress_from_file(
        Path::new("/nonexistent"),
        &request(10, 10, OutputFormat::Jpeg),
    )
    .unwrap_err();
    assert!(matches!(err, CompressError::FileNotFound(_)));
    assert_eq!(err.code(), "file_not_found");
}

#[test]
fn file_to_bytes() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("photo.jpg");
    std::fs::write(&source, jpeg(800, 600)).unwrap();

    let out = compress_from_file(&source, &request(400, 400, OutputFormat::Jpeg)).unwrap();
    assert_eq!(dims(&out), (400, 300));
}

#[test]
fn file_to_file_creates_missing_directories() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("photo.jpg");
    std::fs::write(&source, jpeg(600, 800)).unwrap();
    let target = tmp.path().join("a/b/c/out.jpg");
    assert!(!target.parent().unwrap().exists());

    let written =
        compress_from_file_to_file(&source, &request(400, 400, OutputFormat::Jpeg), &target)
            .unwrap();

    assert_eq!(written, target);
    assert!(target.parent().unwrap().is_dir());
    assert_eq!(dims(&std::fs::read(&target).unwrap()), (300, 400));
}

#[test]
fn file_to_file_overwrites_existing_target() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("photo.jpg");
    std::fs::write(&source, jpeg(100, 100)).unwrap();
    let target = tmp.path().join("out.png");
    std::fs::write(&target, b"stale").unwrap();

    compress_from_file_to_file(&source, &request(50, 50, OutputFormat::Png), &target).unwrap();
    assert_eq!(dims(&std::fs::read(&target).unwrap()), (50, 50));
}

#[test]
fn corrupt_file_is_compression_error() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("broken.jpg");
    std::fs::write(&source, b"\xFF\xD8\xFF not really a jpeg").unwrap();

    let err = compress_from_file(&source, &request(10, 10, OutputFormat::Jpeg)).unwrap_err();
    assert_eq!(err.code(), "compression_error");
}
