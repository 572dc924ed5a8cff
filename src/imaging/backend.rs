//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the four pixel operations every backend
//! must support: decode, resize, rotate, and encode. Each owns its buffer
//! type through an associated `Image`, so a test backend can stand in with
//! nothing more than a pair of dimensions.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate.

use super::params::{EncodeParams, ResizeParams, RotateParams, SubsampleFactor};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode image: {0}")]
    Decode(String),
    #[error("Failed to encode image: {0}")]
    Encode(String),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Width and height of a pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn as_tuple(self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Trait for image processing backends.
///
/// Stages consume their input buffer and hand back a new one, so a backend
/// is free to reuse the allocation when a stage turns out to be a no-op.
pub trait ImageBackend {
    /// Decoded pixel buffer.
    type Image;

    /// Report the dimensions of a decoded buffer.
    fn dimensions(&self, image: &Self::Image) -> Dimensions;

    /// Decode raw bytes, applying the subsample factor.
    fn decode(&self, bytes: &[u8], subsample: SubsampleFactor) -> Result<Self::Image, BackendError>;

    /// Scale to exactly the requested dimensions.
    fn resize(&self, image: Self::Image, params: &ResizeParams) -> Result<Self::Image, BackendError>;

    /// Rotate clockwise.
    fn rotate(&self, image: Self::Image, params: &RotateParams) -> Result<Self::Image, BackendError>;

    /// Serialize to the requested format.
    fn encode(&self, image: &Self::Image, params: &EncodeParams) -> Result<Vec<u8>, BackendError>;
}
