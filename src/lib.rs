//! # image-compress
//!
//! Take an image as bytes or a file, shrink it to fit a bounding box, rotate
//! it, and re-encode it as JPEG, PNG or WebP at a chosen quality.
//!
//! # Pipeline
//!
//! ```text
//! input bytes / file
//!   → decode (optional power-of-two subsample)
//!   → bounding resize (never enlarges)
//!   → clockwise rotate
//!   → encode (format fallback chain)
//!   → bytes / file
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`compress`] | The three entry points: bytes→bytes, file→bytes, file→file |
//! | [`imaging`] | Pipeline stages, dimension math, encoder selection, `image` backend |
//! | [`channel`] | Positional-argument method channel for host frameworks |
//! | [`config`] | `image-compress.toml` loading, merging and validation |
//! | [`logging`] | Process-wide failure logging toggle |
//!
//! # Design Decisions
//!
//! ## Bounds, not targets
//!
//! The request fields are named `min_width` / `min_height` for call
//! compatibility, but they are upper bounds. The width bound is tried first;
//! if the derived height overflows, the height bound wins. Both derived
//! edges are truncated, not rounded.
//!
//! ## Capability-probed encoders
//!
//! WebP output prefers libwebp (lossy, quality-aware). Builds without the
//! `lossy-webp` feature use the pure-Rust lossless encoder instead, and a
//! build with no WebP encoder at all writes JPEG. Asking for WebP therefore
//! never fails for lack of an encoder.
//!
//! ## Reserved parameters
//!
//! `auto_correction_angle` and `keep_exif` are part of the call signature but
//! have no effect. No EXIF data is read or written.

pub mod channel;
pub mod compress;
pub mod config;
pub mod imaging;
pub mod logging;

pub use compress::{
    CompressError, compress_from_bytes, compress_from_file, compress_from_file_to_file,
};
pub use imaging::{OutputFormat, Quality, SubsampleFactor, TransformRequest};

#[cfg(test)]
pub(crate) mod test_helpers;
