//! # Asset Records
//!
//! The asset record, its validated field types, and the tagged record
//! envelope written to the world state.
//!
//! ## Record Kinds
//!
//! Every value in the key namespace is a [`LedgerRecord`], internally tagged
//! by the `docType` key. Assets are the only kind today; a new kind is a new
//! variant, so decoding never has to guess what a value is.
//!
//! ## Wire Form
//!
//! Field names are fixed by existing world state and must not change:
//!
//! ```text
//! {"ID":"asset1","Owner":"Catering","Status":"SOLVED","Temperature":38,"Timestamp":"2022","docType":"asset"}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::canonical::{self, CanonicalBytes, MAX_SAFE_INTEGER};
use crate::error::{CanonicalizationError, ValidationError};
use crate::status::AssetStatus;

/// Key under which the record kind discriminator is stored.
pub const RECORD_KIND_KEY: &str = "docType";

/// Identifier of an asset. Doubles as its world-state key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AssetId(String);

impl AssetId {
    /// Validate and wrap an identifier.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyAssetId` for the empty string.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValidationError::EmptyAssetId);
        }
        Ok(Self(id))
    }

    /// The identifier as a store key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AssetId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AssetId> for String {
    fn from(id: AssetId) -> Self {
        id.0
    }
}

impl std::fmt::Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A finite temperature reading within ±(2^53 − 1).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Temperature(f64);

impl Temperature {
    /// # Errors
    ///
    /// Returns `ValidationError::NonFiniteTemperature` for NaN or infinities
    /// and `ValidationError::TemperatureOutOfRange` for magnitudes above
    /// [`MAX_SAFE_INTEGER`].
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::NonFiniteTemperature(value));
        }
        if value.abs() > MAX_SAFE_INTEGER as f64 {
            return Err(ValidationError::TemperatureOutOfRange(value));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Whether the reading lies in the closed interval `[min, max]`.
    pub fn is_within(&self, min: f64, max: f64) -> bool {
        self.0 >= min && self.0 <= max
    }
}

impl TryFrom<f64> for Temperature {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Temperature> for f64 {
    fn from(t: Temperature) -> Self {
        t.0
    }
}

impl std::fmt::Display for Temperature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kinds of record that share the world-state key namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Asset,
}

impl RecordKind {
    /// The discriminator value stored under `docType`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asset => "asset",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A monitored asset and its latest temperature reading.
///
/// Fields are private: the identifier never changes after construction, and
/// the only mutations are [`Asset::set_status()`] and [`Asset::set_owner()`].
/// `Status` is stored as supplied; membership in the closed set is checked
/// by [`Asset::validated_status()`] and by write paths that opt in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    #[serde(rename = "ID")]
    id: AssetId,
    #[serde(rename = "Temperature")]
    temperature: Temperature,
    #[serde(rename = "Owner")]
    owner: String,
    #[serde(rename = "Status")]
    status: String,
    #[serde(rename = "Timestamp")]
    timestamp: String,
}

impl Asset {
    pub fn new(
        id: AssetId,
        temperature: Temperature,
        status: impl Into<String>,
        owner: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            id,
            temperature,
            owner: owner.into(),
            status: status.into(),
            timestamp: timestamp.into(),
        }
    }

    pub fn id(&self) -> &AssetId {
        &self.id
    }

    pub fn temperature(&self) -> Temperature {
        self.temperature
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Parse the stored status against the closed set.
    pub fn validated_status(&self) -> Result<AssetStatus, ValidationError> {
        self.status.parse()
    }

    /// Replace the status, leaving every other field untouched.
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    /// Replace the owner, returning the previous one.
    pub fn set_owner(&mut self, owner: impl Into<String>) -> String {
        std::mem::replace(&mut self.owner, owner.into())
    }

    /// Encode this asset, tagged with its record kind, in canonical form.
    pub fn encode(&self) -> Result<CanonicalBytes, CanonicalizationError> {
        LedgerRecord::Asset(self.clone()).encode()
    }

    /// Decode an asset from stored bytes.
    ///
    /// Values without a `docType` key predate the discriminator and are read
    /// as assets; re-encoding them adds the tag.
    pub fn decode(bytes: &[u8]) -> Result<Self, CanonicalizationError> {
        match LedgerRecord::decode(bytes)? {
            LedgerRecord::Asset(asset) => Ok(asset),
        }
    }
}

/// Envelope for every value stored in the world state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "docType")]
pub enum LedgerRecord {
    #[serde(rename = "asset")]
    Asset(Asset),
}

impl LedgerRecord {
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Asset(_) => RecordKind::Asset,
        }
    }

    pub fn encode(&self) -> Result<CanonicalBytes, CanonicalizationError> {
        CanonicalBytes::new(self)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, CanonicalizationError> {
        let value: Value = canonical::decode(bytes)?;
        let untagged = value
            .as_object()
            .is_some_and(|map| !map.contains_key(RECORD_KIND_KEY));
        if untagged {
            let asset = serde_json::from_value(value).map_err(CanonicalizationError::DecodeFailed)?;
            return Ok(Self::Asset(asset));
        }
        serde_json::from_value(value).map_err(CanonicalizationError::DecodeFailed)
    }
}
