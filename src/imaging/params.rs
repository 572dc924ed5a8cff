//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the high-level [`operations`](super::operations) module
//! (which decides which pipeline stages run) and the [`backend`](super::backend)
//! (which does the actual pixel work). This separation allows swapping backends
//! (e.g. for testing with a mock) without changing pipeline logic.
//!
//! ## Types
//!
//! - [`Quality`]: Encoding quality (0–100, default 95). Clamped on construction.
//! - [`OutputFormat`]: Target container. Integer codes only at the boundary.
//! - [`SubsampleFactor`]: Decoder downscale hint, rounded to a power of two.
//! - [`TransformRequest`]: Everything one pipeline invocation needs.
//! - [`ResizeParams`], [`RotateParams`], [`EncodeParams`]: Per-stage backend inputs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Quality setting for image encoding (0-100).
///
/// Lossy encoders treat it as the usual quality knob. PNG treats it as an
/// advisory compression-effort hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u32);

impl Quality {
    pub fn new(value: i64) -> Self {
        Self(value.clamp(0, 100) as u32)
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(95)
    }
}

/// Output container format.
///
/// Callers on the channel boundary pass integers (`0` JPEG, `1` PNG, `2` WebP);
/// use [`OutputFormat::from_code`] there and the enum everywhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Jpeg,
    Png,
    #[serde(rename = "webp")]
    WebP,
}

impl OutputFormat {
    /// Map a boundary integer code. Unknown codes fall back to JPEG.
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Self::Png,
            2 => Self::WebP,
            _ => Self::Jpeg,
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Self::Jpeg => 0,
            Self::Png => 1,
            Self::WebP => 2,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::WebP => "webp",
        })
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            "webp" => Ok(Self::WebP),
            other => Err(format!("unknown output format '{other}' (expected jpeg, png or webp)")),
        }
    }
}

/// Decode-time downscale factor.
///
/// Follows the usual decoder convention: anything below 1 means "no
/// subsampling", and values that are not a power of two are rounded down to
/// the nearest one (3 → 2, 6 → 4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubsampleFactor(u32);

impl SubsampleFactor {
    pub fn new(requested: i64) -> Self {
        if requested <= 1 {
            return Self(1);
        }
        let requested = requested.min(i64::from(u32::MAX)) as u32;
        Self(1 << (u32::BITS - 1 - requested.leading_zeros()))
    }

    pub fn value(self) -> u32 {
        self.0
    }

    pub fn is_identity(self) -> bool {
        self.0 == 1
    }
}

impl Default for SubsampleFactor {
    fn default() -> Self {
        Self(1)
    }
}

/// Full description of one compress call.
///
/// `min_width` / `min_height` are *upper* bounds: the image is shrunk to fit
/// inside them and never enlarged. The names match the external call
/// signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformRequest {
    pub min_width: u32,
    pub min_height: u32,
    pub quality: Quality,
    /// Clockwise rotation in degrees. `0` skips the rotate stage.
    pub rotate_degrees: i32,
    /// Reserved. Accepted for call compatibility, never consulted.
    pub auto_correction_angle: bool,
    pub format: OutputFormat,
    /// Reserved. Accepted for call compatibility; no metadata is written.
    pub keep_exif: bool,
    pub subsample: SubsampleFactor,
}

impl Default for TransformRequest {
    fn default() -> Self {
        Self {
            min_width: 1920,
            min_height: 1080,
            quality: Quality::default(),
            rotate_degrees: 0,
            auto_correction_angle: true,
            format: OutputFormat::Jpeg,
            keep_exif: false,
            subsample: SubsampleFactor::default(),
        }
    }
}

/// Parameters for a resize to exact dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeParams {
    pub width: u32,
    pub height: u32,
}

/// Parameters for a clockwise rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotateParams {
    pub degrees: f32,
}

impl RotateParams {
    /// Number of clockwise quarter turns if `degrees` is a multiple of 90.
    pub fn quarter_turns(self) -> Option<u8> {
        let normalized = self.degrees.rem_euclid(360.0);
        let turns = normalized / 90.0;
        if (turns - turns.round()).abs() < 1e-4 {
            Some((turns.round() as u32 % 4) as u8)
        } else {
            None
        }
    }
}

/// Parameters for the final encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeParams {
    pub format: OutputFormat,
    pub quality: Quality,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_clamps_to_valid_range() {
        assert_eq!(Quality::new(-5).value(), 0);
        assert_eq!(Quality::new(0).value(), 0);
        assert_eq!(Quality::new(50).value(), 50);
        assert_eq!(Quality::new(150).value(), 100);
    }

    #[test]
    fn quality_default_is_95() {
        assert_eq!(Quality::default().value(), 95);
    }

    #[test]
    fn format_codes_map_to_variants() {
        assert_eq!(OutputFormat::from_code(0), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::from_code(1), OutputFormat::Png);
        assert_eq!(OutputFormat::from_code(2), OutputFormat::WebP);
    }

    #[test]
    fn format_codes_round_trip() {
        for format in [OutputFormat::Jpeg, OutputFormat::Png, OutputFormat::WebP] {
            assert_eq!(OutputFormat::from_code(format.code()), format);
        }
        assert_eq!(OutputFormat::WebP.code(), 2);
    }

    #[test]
    fn unknown_format_codes_fall_back_to_jpeg() {
        assert_eq!(OutputFormat::from_code(3), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::from_code(-1), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::from_code(i64::MAX), OutputFormat::Jpeg);
    }

    #[test]
    fn format_parses_names() {
        assert_eq!("JPG".parse::<OutputFormat>().unwrap(), OutputFormat::Jpeg);
        assert_eq!("png".parse::<OutputFormat>().unwrap(), OutputFormat::Png);
        assert_eq!("WebP".parse::<OutputFormat>().unwrap(), OutputFormat::WebP);
        assert!("gif".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn subsample_rounds_down_to_power_of_two() {
        assert_eq!(SubsampleFactor::new(-3).value(), 1);
        assert_eq!(SubsampleFactor::new(0).value(), 1);
        assert_eq!(SubsampleFactor::new(1).value(), 1);
        assert_eq!(SubsampleFactor::new(2).value(), 2);
        assert_eq!(SubsampleFactor::new(3).value(), 2);
        assert_eq!(SubsampleFactor::new(6).value(), 4);
        assert_eq!(SubsampleFactor::new(8).value(), 8);
        assert!(SubsampleFactor::new(1).is_identity());
    }

    #[test]
    fn quarter_turns_detects_right_angles() {
        assert_eq!(RotateParams { degrees: 0.0 }.quarter_turns(), Some(0));
        assert_eq!(RotateParams { degrees: 90.0 }.quarter_turns(), Some(1));
        assert_eq!(RotateParams { degrees: 180.0 }.quarter_turns(), Some(2));
        assert_eq!(RotateParams { degrees: -90.0 }.quarter_turns(), Some(3));
        assert_eq!(RotateParams { degrees: 450.0 }.quarter_turns(), Some(1));
        assert_eq!(RotateParams { degrees: 360.0 }.quarter_turns(), Some(0));
        assert_eq!(RotateParams { degrees: 45.0 }.quarter_turns(), None);
        assert_eq!(RotateParams { degrees: 90.5 }.quarter_turns(), None);
    }

    #[test]
    fn request_defaults() {
        let request = TransformRequest::default();
        assert_eq!(request.min_width, 1920);
        assert_eq!(request.min_height, 1080);
        assert_eq!(request.format, OutputFormat::Jpeg);
        assert!(request.subsample.is_identity());
        assert!(!request.keep_exif);
    }
}
