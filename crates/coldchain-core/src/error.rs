//! # Error Types: Structured Error Hierarchy
//!
//! Defines the error types produced by the foundational layer. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Encoding errors carry the offending value so a failed invocation can
//!   be diagnosed from its message alone.
//! - Validation errors are raised by constructors, never after a value has
//!   been accepted.

use thiserror::Error;

/// Top-level error type for the foundational layer.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Canonical encoding or decoding failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// A record field failed validation.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Error during canonical serialization or its inverse.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Integer outside the I-JSON safe range (±(2^53 − 1)).
    #[error("integer {0} is outside the interoperable range of ±(2^53 - 1)")]
    UnsafeInteger(i128),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[source] serde_json::Error),

    /// Stored bytes could not be parsed as the expected record.
    #[error("decoding failed: {0}")]
    DecodeFailed(#[source] serde_json::Error),

    /// Stored bytes are not valid UTF-8.
    #[error("stored value is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}

/// Error raised by a validated constructor.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Asset identifiers double as store keys and must not be empty.
    #[error("asset id must not be empty")]
    EmptyAssetId,

    /// Temperatures must be finite; NaN and infinities have no JSON form.
    #[error("temperature must be a finite number, got {0}")]
    NonFiniteTemperature(f64),

    /// Temperatures beyond ±(2^53 − 1) encode as integers no JSON
    /// implementation holds exactly.
    #[error("temperature {0} is outside the interoperable range of ±(2^53 - 1)")]
    TemperatureOutOfRange(f64),

    /// Status string is not a member of the closed status set.
    #[error("unknown asset status: {0:?}")]
    UnknownStatus(String),
}
