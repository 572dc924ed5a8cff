//! Shared test utilities: synthetic images and output inspection.
//!
//! ```ignore
//! use crate::test_helpers::*;
//!
//! let bytes = jpeg_bytes(800, 600);
//! let out = compress_from_bytes(&bytes, &request).unwrap();
//! assert_eq!(decoded_dimensions(&out), (400, 300));
//! ```

use image::{ExtendedColorType, ImageEncoder, ImageFormat, RgbImage};
use std::cell::RefCell;
use std::path::Path;
use std::sync::Once;

// =========================================================================
// Fixture generation
// =========================================================================

/// An RGB gradient, so resampling has something to chew on.
pub fn gradient_rgb(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    })
}

/// Encode a gradient as JPEG.
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = gradient_rgb(width, height);
    let mut buf = Vec::new();
    image::codecs::jpeg::JpegEncoder::new(&mut buf)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
    buf
}

/// Write a gradient JPEG to `path`.
pub fn write_test_jpeg(path: &Path, width: u32, height: u32) {
    std::fs::write(path, jpeg_bytes(width, height)).unwrap();
}

// =========================================================================
// Output inspection
// =========================================================================

/// Decode and return `(width, height)`. Panics if the bytes don't decode.
pub fn decoded_dimensions(bytes: &[u8]) -> (u32, u32) {
    let img = image::load_from_memory(bytes)
        .unwrap_or_else(|e| panic!("output does not decode: {e}"));
    (img.width(), img.height())
}

/// Container format sniffed from magic bytes.
pub fn sniff(bytes: &[u8]) -> ImageFormat {
    image::guess_format(bytes).unwrap_or_else(|e| panic!("unrecognized output: {e}"))
}

// =========================================================================
// Log capture
// =========================================================================

thread_local! {
    static CAPTURED: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

/// Collects failure records per thread, so parallel tests don't see each
/// other's output.
struct CaptureLogger;

impl log::Log for CaptureLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.target() == crate::logging::TARGET && metadata.level() == log::Level::Error
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            CAPTURED.with(|c| c.borrow_mut().push(record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;
static INSTALL: Once = Once::new();

/// Run `f` and return the failure records it logged on this thread.
pub fn captured_failures(f: impl FnOnce()) -> Vec<String> {
    INSTALL.call_once(|| {
        log::set_logger(&LOGGER).expect("no other logger in unit tests");
        log::set_max_level(log::LevelFilter::Error);
    });
    CAPTURED.with(|c| c.borrow_mut().clear());
    f();
    CAPTURED.with(|c| std::mem::take(&mut *c.borrow_mut()))
}
