//! # coldchain-core: Foundational Types for the Asset Registry
//!
//! This crate defines the pure, stateless building blocks every replica must
//! agree on byte-for-byte. It depends on nothing internal and performs no
//! I/O.
//!
//! ## Key Design Principles
//!
//! 1. **`CanonicalBytes` newtype.** Every value written to the world state
//!    flows through `CanonicalBytes::new()`. No raw `serde_json::to_vec()`
//!    for stored values. Ever.
//!
//! 2. **Single `AssetStatus` enum.** The closed status set is defined once;
//!    membership checks go through `AssetStatus::is_valid()`.
//!
//! 3. **Tagged records.** Stored values are `LedgerRecord` variants,
//!    discriminated by `docType`, so further record kinds can share the key
//!    namespace without ambiguity.
//!
//! 4. **Validated constructors.** `AssetId` is never empty and
//!    `Temperature` is always finite.
//!
//! ## Crate Policy
//!
//! - No randomness, clocks, or locale-dependent formatting.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod asset;
pub mod canonical;
pub mod error;
pub mod status;

pub use asset::{Asset, AssetId, LedgerRecord, RecordKind, Temperature, RECORD_KIND_KEY};
pub use canonical::{decode, CanonicalBytes, MAX_SAFE_INTEGER};
pub use error::{CanonicalizationError, CoreError, ValidationError};
pub use status::{AssetStatus, ASSET_STATUS_COUNT};
