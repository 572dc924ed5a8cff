//! Method-channel front end.
//!
//! Hosts that talk to this crate over a message channel send a method name
//! and a positional argument list. [`CompressionPlugin::handle`] unpacks the
//! arguments, runs the matching [`compress`](crate::compress) function, and
//! turns the outcome into a [`Response`].
//!
//! ## Methods
//!
//! | Method | Arguments (in order) | Success value |
//! |---|---|---|
//! | `compressWithList` | bytes, minWidth, minHeight, quality, rotate, autoCorrectionAngle, format, keepExif, inSampleSize | bytes |
//! | `compressWithFile` | path, minWidth, minHeight, quality, rotate, autoCorrectionAngle, format, keepExif, inSampleSize | bytes |
//! | `compressWithFileAndGetFile` | path, minWidth, minHeight, quality, targetPath, rotate, autoCorrectionAngle, format, keepExif, inSampleSize | targetPath |
//! | `showLog` | enabled | null |
//!
//! The argument order is part of the wire contract and must not change.
//! Malformed arguments are reported as `compression_error`, the same as any
//! other failure inside a compress call.

use crate::compress::{self, CompressError};
use crate::imaging::{OutputFormat, Quality, SubsampleFactor, TransformRequest};
use crate::logging;
use std::path::Path;
use thiserror::Error;

pub const METHOD_SHOW_LOG: &str = "showLog";
pub const METHOD_COMPRESS_WITH_LIST: &str = "compressWithList";
pub const METHOD_COMPRESS_WITH_FILE: &str = "compressWithFile";
pub const METHOD_COMPRESS_WITH_FILE_AND_GET_FILE: &str = "compressWithFileAndGetFile";

/// A single value crossing the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Str(String),
    Bytes(Vec<u8>),
}

impl Value {
    fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Str(_) => "string",
            Value::Bytes(_) => "bytes",
        }
    }
}

/// An incoming call: method name plus positional arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCall {
    pub method: String,
    pub arguments: Vec<Value>,
}

impl MethodCall {
    pub fn new(method: impl Into<String>, arguments: Vec<Value>) -> Self {
        Self {
            method: method.into(),
            arguments,
        }
    }
}

/// Outcome reported back over the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Success(Value),
    Error { code: String, message: String },
    NotImplemented,
}

impl Response {
    fn error(code: &str, message: impl Into<String>) -> Self {
        Response::Error {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("missing argument {index} ({name})")]
    Missing { index: usize, name: &'static str },
    #[error("argument {index} ({name}) must be {expected}, got {actual}")]
    WrongType {
        index: usize,
        name: &'static str,
        expected: &'static str,
        actual: &'static str,
    },
}

/// Positional argument reader.
struct Args<'a> {
    values: &'a [Value],
}

impl<'a> Args<'a> {
    fn get(&self, index: usize, name: &'static str) -> Result<&'a Value, ArgumentError> {
        self.values
            .get(index)
            .ok_or(ArgumentError::Missing { index, name })
    }

    fn wrong_type(index: usize, name: &'static str, expected: &'static str, actual: &Value) -> ArgumentError {
        ArgumentError::WrongType {
            index,
            name,
            expected,
            actual: actual.kind(),
        }
    }

    fn bytes(&self, index: usize, name: &'static str) -> Result<&'a [u8], ArgumentError> {
        match self.get(index, name)? {
            Value::Bytes(b) => Ok(b.as_slice()),
            other => Err(Self::wrong_type(index, name, "bytes", other)),
        }
    }

    fn string(&self, index: usize, name: &'static str) -> Result<&'a str, ArgumentError> {
        match self.get(index, name)? {
            Value::Str(s) => Ok(s.as_str()),
            other => Err(Self::wrong_type(index, name, "string", other)),
        }
    }

    fn int(&self, index: usize, name: &'static str) -> Result<i64, ArgumentError> {
        match self.get(index, name)? {
            Value::Int(i) => Ok(*i),
            other => Err(Self::wrong_type(index, name, "int", other)),
        }
    }

    fn bool(&self, index: usize, name: &'static str) -> Result<bool, ArgumentError> {
        match self.get(index, name)? {
            Value::Bool(b) => Ok(*b),
            other => Err(Self::wrong_type(index, name, "bool", other)),
        }
    }

    /// Non-negative pixel bound. Negative values collapse to zero.
    fn bound(&self, index: usize, name: &'static str) -> Result<u32, ArgumentError> {
        Ok(self.int(index, name)?.clamp(0, i64::from(u32::MAX)) as u32)
    }
}

/// Decode the shared transform arguments.
///
/// `size_at` is where minWidth sits; `tail_at` is where rotate sits (the
/// file-to-file variant has targetPath between quality and rotate).
fn read_request(args: &Args<'_>, size_at: usize, tail_at: usize) -> Result<TransformRequest, ArgumentError> {
    // Reduced here so any i64 angle fits the request without saturating
    let rotate = args.int(tail_at, "rotate")?.rem_euclid(360);
    Ok(TransformRequest {
        min_width: args.bound(size_at, "minWidth")?,
        min_height: args.bound(size_at + 1, "minHeight")?,
        quality: Quality::new(args.int(size_at + 2, "quality")?),
        rotate_degrees: rotate as i32,
        auto_correction_angle: args.bool(tail_at + 1, "autoCorrectionAngle")?,
        format: OutputFormat::from_code(args.int(tail_at + 2, "format")?),
        keep_exif: args.bool(tail_at + 3, "keepExif")?,
        subsample: SubsampleFactor::new(args.int(tail_at + 4, "inSampleSize")?),
    })
}

#[derive(Error, Debug)]
enum CallError {
    #[error(transparent)]
    Arguments(#[from] ArgumentError),
    #[error(transparent)]
    Compress(#[from] CompressError),
}

impl CallError {
    fn into_response(self) -> Response {
        match self {
            CallError::Compress(CompressError::FileNotFound(_)) => {
                Response::error("file_not_found", "The file does not exist")
            }
            CallError::Compress(e) => Response::error(e.code(), e.to_string()),
            CallError::Arguments(e) => Response::error("compression_error", e.to_string()),
        }
    }
}

/// Dispatches method calls to the compress functions.
#[derive(Debug, Default)]
pub struct CompressionPlugin;

impl CompressionPlugin {
    pub fn new() -> Self {
        Self
    }

    pub fn handle(&self, call: &MethodCall) -> Response {
        let args = Args {
            values: &call.arguments,
        };
        let result = match call.method.as_str() {
            METHOD_SHOW_LOG => {
                return match args.bool(0, "enabled") {
                    Ok(enabled) => {
                        logging::set_enabled(enabled);
                        Response::Success(Value::Null)
                    }
                    Err(e) => Response::error("compression_error", e.to_string()),
                };
            }
            METHOD_COMPRESS_WITH_LIST => compress_with_list(&args),
            METHOD_COMPRESS_WITH_FILE => compress_with_file(&args),
            METHOD_COMPRESS_WITH_FILE_AND_GET_FILE => compress_with_file_and_get_file(&args),
            _ => return Response::NotImplemented,
        };

        match result {
            Ok(value) => Response::Success(value),
            Err(e) => {
                // A missing input is an expected outcome, not a compression failure
                if !matches!(e, CallError::Compress(CompressError::FileNotFound(_))) {
                    logging::report_failure(&call.method, &e);
                }
                e.into_response()
            }
        }
    }
}

fn compress_with_list(args: &Args<'_>) -> Result<Value, CallError> {
    let bytes = args.bytes(0, "bytes")?;
    let request = read_request(args, 1, 4)?;
    let encoded = compress::compress_from_bytes(bytes, &request)?;
    Ok(Value::Bytes(encoded))
}

fn compress_with_file(args: &Args<'_>) -> Result<Value, CallError> {
    let path = args.string(0, "path")?;
    let request = read_request(args, 1, 4)?;
    let encoded = compress::compress_from_file(Path::new(path), &request)?;
    Ok(Value::Bytes(encoded))
}

fn compress_with_file_and_get_file(args: &Args<'_>) -> Result<Value, CallError> {
    let path = args.string(0, "path")?;
    let target = args.string(4, "targetPath")?;
    let request = read_request(args, 1, 5)?;
    compress::compress_from_file_to_file(Path::new(path), &request, Path::new(target))?;
    Ok(Value::Str(target.to_string()))
}
