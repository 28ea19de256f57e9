//! Error types for CPF encoding and decoding.

use std::result;

/// Errors that can occur while building, serializing, or parsing a bundle.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("not a CPF bundle (bad magic)")]
    BadMagic,

    #[error("bundle truncated: need {needed} bytes, have {available}")]
    Truncated { needed: usize, available: usize },

    #[error("bundle length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: u64, actual: u64 },

    #[error("{field} {value} exceeds its fixed-width record field")]
    FieldOverflow { field: &'static str, value: i64 },

    #[error("record layout drift: {0}")]
    LayoutDrift(&'static str),

    #[error("inconsistent bundle: {0}")]
    Inconsistent(String),
}

pub type Result<T> = result::Result<T, CodecError>;
