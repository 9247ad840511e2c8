//! # Asset Status: Single Source of Truth
//!
//! Defines the `AssetStatus` enum, the closed set of statuses an asset may
//! carry. This is the ONE definition of the set; every other code path calls
//! [`AssetStatus::is_valid()`] or parses through [`FromStr`] instead of
//! repeating the literals.
//!
//! Matching is exact and case-sensitive: `"open"` is a member, `"OPEN"` and
//! `" open"` are not. No normalization is applied.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ValidationError;

/// The closed set of asset statuses.
///
/// | Status | Wire form |
/// |--------|-----------|
/// | Open | `open` |
/// | Solved | `solved` |
/// | Rejected | `rejected` |
/// | InProgress | `in_progress` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetStatus {
    /// A reading has been flagged and awaits handling.
    Open,
    /// The flagged reading has been resolved.
    Solved,
    /// The flagged reading was dismissed.
    Rejected,
    /// Handling of the flagged reading is underway.
    InProgress,
}

/// Number of members in the closed status set.
pub const ASSET_STATUS_COUNT: usize = 4;

impl AssetStatus {
    /// Returns every status in declaration order.
    pub fn all() -> &'static [AssetStatus] {
        &[Self::Open, Self::Solved, Self::Rejected, Self::InProgress]
    }

    /// Returns the wire form of this status.
    ///
    /// Must match the serde serialization format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Solved => "solved",
            Self::Rejected => "rejected",
            Self::InProgress => "in_progress",
        }
    }

    /// True iff `status` is exactly the wire form of a member of the set.
    pub fn is_valid(status: &str) -> bool {
        status.parse::<AssetStatus>().is_ok()
    }
}

impl std::fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownStatus(s.to_string()))
    }
}
