//! Seed assets written by `InitLedger`.
//!
//! The set is fixed; every replica must write exactly these records. It
//! bypasses the status policy, so `asset1` keeps its upper-case `SOLVED`.

use coldchain_core::{Asset, AssetId, Temperature, ValidationError};

pub const SEED_OWNER: &str = "Catering";
pub const SEED_TIMESTAMP: &str = "2022";

/// `(id, temperature, status)` for each seed asset, in write order.
pub const SEED_READINGS: [(&str, f64, &str); 6] = [
    ("asset1", 38.0, "SOLVED"),
    ("asset2", 71.0, "open"),
    ("asset3", 55.0, "open"),
    ("asset4", 52.0, "open"),
    ("asset5", 59.0, "open"),
    ("asset6", 90.0, "open"),
];

pub fn seed_assets() -> Result<Vec<Asset>, ValidationError> {
    SEED_READINGS
        .iter()
        .map(|&(id, temperature, status)| {
            Ok(Asset::new(
                AssetId::new(id)?,
                Temperature::new(temperature)?,
                status,
                SEED_OWNER,
                SEED_TIMESTAMP,
            ))
        })
        .collect()
}
