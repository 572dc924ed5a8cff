//! Image processing, pure Rust apart from the optional libwebp encoder.
//!
//! | Stage | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader`, subsampled with `Triangle` |
//! | **Resize** | bounding fit, `Lanczos3` |
//! | **Rotate** | quarter-turn remap or bilinear within the original canvas |
//! | **Encode** | JPEG / PNG / WebP with a capability fallback chain |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Encoders**: Format → encoder fallback chain and capability probe
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod encoders;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{calculate_bounded_dimensions, calculate_subsampled_dimensions};
pub use encoders::{Capabilities, EncoderKind};
pub use operations::{decode, encode, plan_resize, resize_to_bounds, rotate, transform};
pub use params::{
    EncodeParams, OutputFormat, Quality, ResizeParams, RotateParams, SubsampleFactor,
    TransformRequest,
};
pub use rust_backend::RustBackend;
