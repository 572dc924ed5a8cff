//! The three compress entry points.
//!
//! | Function | Input | Output |
//! |---|---|---|
//! | [`compress_from_bytes`] | bytes in memory | encoded bytes |
//! | [`compress_from_file`] | file path | encoded bytes |
//! | [`compress_from_file_to_file`] | file path | bytes written to a target path |
//!
//! All three run the same [`transform`] pipeline. Path inputs are checked
//! before anything is read; a missing file is reported as
//! [`CompressError::FileNotFound`]. Every other failure, whichever stage it
//! comes from, is a compression error carrying the underlying message.
//!
//! Each function has a `*_with_backend` twin so tests can drive the pipeline
//! with a recording backend.

use crate::imaging::{BackendError, ImageBackend, RustBackend, TransformRequest, transform};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompressError {
    #[error("The file does not exist: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error(transparent)]
    Imaging(#[from] BackendError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CompressError {
    /// Short machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::FileNotFound(_) => "file_not_found",
            Self::Imaging(_) | Self::Io(_) => "compression_error",
        }
    }
}

pub type Result<T> = std::result::Result<T, CompressError>;

/// Read an input file, rejecting anything that is not a regular file.
fn read_source(path: &Path) -> Result<Vec<u8>> {
    if !path.is_file() {
        return Err(CompressError::FileNotFound(path.to_path_buf()));
    }
    Ok(fs::read(path)?)
}

/// Write encoded bytes, creating missing parent directories.
fn write_target(target: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(dir) = target.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let mut file = fs::File::create(target)?;
    file.write_all(bytes)?;
    file.flush()?;
    Ok(())
}

pub fn compress_from_bytes(bytes: &[u8], request: &TransformRequest) -> Result<Vec<u8>> {
    compress_from_bytes_with_backend(&RustBackend::new(), bytes, request)
}

pub fn compress_from_bytes_with_backend(
    backend: &impl ImageBackend,
    bytes: &[u8],
    request: &TransformRequest,
) -> Result<Vec<u8>> {
    Ok(transform(backend, bytes, request)?)
}

pub fn compress_from_file(path: &Path, request: &TransformRequest) -> Result<Vec<u8>> {
    compress_from_file_with_backend(&RustBackend::new(), path, request)
}

pub fn compress_from_file_with_backend(
    backend: &impl ImageBackend,
    path: &Path,
    request: &TransformRequest,
) -> Result<Vec<u8>> {
    let bytes = read_source(path)?;
    Ok(transform(backend, &bytes, request)?)
}

/// Compress `path` and write the result to `target`.
///
/// Returns the path written. A failed write may leave a partial file behind.
pub fn compress_from_file_to_file(
    path: &Path,
    request: &TransformRequest,
    target: &Path,
) -> Result<PathBuf> {
    compress_from_file_to_file_with_backend(&RustBackend::new(), path, request, target)
}

pub fn compress_from_file_to_file_with_backend(
    backend: &impl ImageBackend,
    path: &Path,
    request: &TransformRequest,
    target: &Path,
) -> Result<PathBuf> {
    let bytes = read_source(path)?;
    let encoded = transform(backend, &bytes, request)?;
    write_target(target, &encoded)?;
    log::debug!("wrote {} bytes to {}", encoded.len(), target.display());
    Ok(target.to_path_buf())
}
