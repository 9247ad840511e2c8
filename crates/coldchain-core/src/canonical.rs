//! # Canonical Serialization: JCS-Compatible Record Encoding
//!
//! This module defines `CanonicalBytes`, the sole construction path for bytes
//! written to the world state.
//!
//! ## Determinism Invariant
//!
//! Every replica replaying an invocation against the same prior state must
//! write byte-identical values, otherwise the replicas disagree on the
//! resulting state hash. `CanonicalBytes` has a private inner field and the
//! only constructor is `CanonicalBytes::new()`, so any function that writes a
//! record must accept `&CanonicalBytes` and therefore cannot write bytes
//! produced by an order-dependent serializer.
//!
//! ## Pipeline
//!
//! 1. The value is lowered to a `serde_json::Value` tree.
//! 2. The tree is checked for numbers that are not I-JSON interoperable
//!    (integers outside ±(2^53 − 1)).
//! 3. `serde_jcs` emits RFC 8785 output: object keys sorted recursively by
//!    UTF-16 code units, compact separators, ECMAScript number formatting
//!    (`38.0` and `38` both encode as `38`).
//!
//! [`decode()`] is the structural inverse for well-formed input. It does not
//! require its input to be canonical, since values written by older clients
//! may carry any key order.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// Largest integer magnitude every JSON implementation represents exactly.
pub const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

/// Bytes produced exclusively by JCS canonicalization.
///
/// # Invariants
///
/// - The only constructor is `CanonicalBytes::new()`.
/// - Object keys are sorted, recursively, with no insignificant whitespace.
/// - Every integer lies within ±(2^53 − 1).
/// - The bytes are valid UTF-8.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Construct canonical bytes from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::UnsafeInteger` if the value contains an
    /// integer outside the interoperable range. Returns
    /// `CanonicalizationError::SerializationFailed` if the value cannot be
    /// represented as JSON.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj).map_err(CanonicalizationError::SerializationFailed)?;
        check_json_value(&value)?;
        let bytes = serialize_canonical(&value)?;
        Ok(Self(bytes))
    }

    /// Access the canonical bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// View the canonical bytes as text.
    pub fn as_str(&self) -> &str {
        // serde_jcs only emits UTF-8; the fallback is unreachable.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }

    /// Consume the wrapper, yielding the bytes to hand to the store.
    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }

    /// Returns the length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Display for CanonicalBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decode a JSON value previously produced by [`CanonicalBytes::new()`].
///
/// # Errors
///
/// Returns `CanonicalizationError::DecodeFailed` if `bytes` is not valid JSON
/// or does not match the shape of `T`.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CanonicalizationError> {
    serde_json::from_slice(bytes).map_err(CanonicalizationError::DecodeFailed)
}

/// Recursively reject numbers that would not round-trip through every JSON
/// implementation.
///
/// 1. `null`, `bool`, `string`, floats: accepted.
/// 2. integers: accepted only within ±(2^53 − 1).
/// 3. `object` / `array`: members recursed.
fn check_json_value(value: &Value) -> Result<(), CanonicalizationError> {
    match value {
        Value::Null | Value::Bool(_) | Value::String(_) => Ok(()),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                if i.unsigned_abs() > MAX_SAFE_INTEGER {
                    return Err(CanonicalizationError::UnsafeInteger(i128::from(i)));
                }
            } else if let Some(u) = n.as_u64() {
                if u > MAX_SAFE_INTEGER {
                    return Err(CanonicalizationError::UnsafeInteger(i128::from(u)));
                }
            }
            Ok(())
        }
        Value::Object(map) => map.values().try_for_each(check_json_value),
        Value::Array(arr) => arr.iter().try_for_each(check_json_value),
    }
}

/// Serialize a JSON value in JCS-canonical form (RFC 8785).
fn serialize_canonical(value: &Value) -> Result<Vec<u8>, CanonicalizationError> {
    let s = serde_jcs::to_string(value).map_err(CanonicalizationError::SerializationFailed)?;
    Ok(s.into_bytes())
}
