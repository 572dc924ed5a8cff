//! Encoder selection.
//!
//! Each [`OutputFormat`] maps to an ordered list of concrete encoders. The
//! first one the running build supports is used, so asking for WebP on a build
//! without libwebp still produces an image rather than an error:
//!
//! | Requested | Candidates, in order |
//! |---|---|
//! | JPEG | JPEG |
//! | PNG | PNG |
//! | WebP | lossy WebP (libwebp) → lossless WebP (`image`) → JPEG |

use super::params::OutputFormat;
use image::ImageFormat;

/// A concrete encoder implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncoderKind {
    Jpeg,
    Png,
    /// libwebp via the `webp` crate. Honors quality.
    WebpLossy,
    /// Pure-Rust encoder from the `image` crate. Lossless only.
    WebpLossless,
}

impl EncoderKind {
    /// Candidate encoders for a format, most preferred first.
    pub fn candidates(format: OutputFormat) -> &'static [EncoderKind] {
        match format {
            OutputFormat::Jpeg => &[EncoderKind::Jpeg],
            OutputFormat::Png => &[EncoderKind::Png],
            OutputFormat::WebP => &[
                EncoderKind::WebpLossy,
                EncoderKind::WebpLossless,
                EncoderKind::Jpeg,
            ],
        }
    }
}

/// Which encoders the running build can actually use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub jpeg: bool,
    pub png: bool,
    pub webp_lossy: bool,
    pub webp_lossless: bool,
}

impl Capabilities {
    /// Probe the compiled-in encoders.
    pub fn probe() -> Self {
        Self {
            jpeg: ImageFormat::Jpeg.writing_enabled(),
            png: ImageFormat::Png.writing_enabled(),
            webp_lossy: cfg!(feature = "lossy-webp"),
            webp_lossless: ImageFormat::WebP.writing_enabled(),
        }
    }

    /// A build that can only write JPEG and PNG.
    pub fn without_webp() -> Self {
        Self {
            webp_lossy: false,
            webp_lossless: false,
            ..Self::probe()
        }
    }

    pub fn supports(&self, kind: EncoderKind) -> bool {
        match kind {
            EncoderKind::Jpeg => self.jpeg,
            EncoderKind::Png => self.png,
            EncoderKind::WebpLossy => self.webp_lossy,
            EncoderKind::WebpLossless => self.webp_lossless,
        }
    }

    /// Pick the first supported encoder for `format`.
    pub fn select(&self, format: OutputFormat) -> Option<EncoderKind> {
        EncoderKind::candidates(format)
            .iter()
            .copied()
            .find(|kind| self.supports(*kind))
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::probe()
    }
}
