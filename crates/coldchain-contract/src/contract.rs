//! # Asset Registry Operations
//!
//! `AssetContract` implements every registry operation against a
//! [`LedgerContext`]. It holds only its configuration; all state lives in the
//! world state and is read afresh by every invocation.
//!
//! ## Ordering
//!
//! Each mutating operation performs its existence or read check before any
//! write, so a rejected invocation has written nothing. Every written value
//! is produced by [`Asset::encode()`].
//!
//! ## Determinism
//!
//! Nothing here reads a clock, draws randomness, or formats numbers through
//! locale-dependent paths. Log events are emitted with `tracing` and never
//! influence written bytes.

use serde::Serialize;
use serde_json::Value;

use coldchain_core::{
    Asset, AssetId, AssetStatus, CanonicalBytes, CanonicalizationError, Temperature,
};

use crate::config::{ContractConfig, StatusPolicy};
use crate::error::ContractError;
use crate::fixtures;
use crate::ledger::{KeyValue, LedgerContext};

/// One entry of a `ListAll` result.
///
/// Values that parse as JSON are returned as parsed; anything else is
/// returned as its (lossily decoded) text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ListedRecord {
    Record(Value),
    Raw(String),
}

/// Outcome of `CheckTemperature`.
#[derive(Debug, Clone, PartialEq)]
pub enum TemperatureCheck {
    /// The asset already exists; nothing was written.
    AlreadyExists,
    /// The reading was outside the window and the asset was created.
    Created(Asset),
    /// The reading was inside the window; no action was taken.
    WithinRange,
}

/// The asset registry.
#[derive(Debug, Clone, Default)]
pub struct AssetContract {
    config: ContractConfig,
}

impl AssetContract {
    pub fn new(config: ContractConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ContractConfig {
        &self.config
    }

    /// Write the fixed seed set, overwriting any existing values at those
    /// keys, and return the written assets.
    pub fn init_ledger<C: LedgerContext + ?Sized>(
        &self,
        ctx: &mut C,
    ) -> Result<Vec<Asset>, ContractError> {
        let assets = fixtures::seed_assets()?;
        for asset in &assets {
            write_asset(ctx, asset)?;
        }
        tracing::debug!(count = assets.len(), "seeded ledger");
        Ok(assets)
    }

    /// Create a new asset at `id`.
    ///
    /// # Errors
    ///
    /// `AssetAlreadyExists` if a non-empty value is stored at `id`;
    /// `Validation` if `id` is empty; `InvalidStatus` for an out-of-set
    /// status under [`StatusPolicy::Strict`].
    pub fn create_asset<C: LedgerContext + ?Sized>(
        &self,
        ctx: &mut C,
        id: &str,
        temperature: Temperature,
        status: &str,
        owner: &str,
        timestamp: &str,
    ) -> Result<Asset, ContractError> {
        if self.exists(&*ctx, id)? {
            return Err(ContractError::AssetAlreadyExists(id.to_string()));
        }
        let asset_id = AssetId::new(id)?;
        self.enforce_status_policy(id, status)?;

        let asset = Asset::new(asset_id, temperature, status, owner, timestamp);
        write_asset(ctx, &asset)?;
        tracing::debug!(asset_id = %id, %temperature, "created asset");
        Ok(asset)
    }

    /// Return the stored value at `id` verbatim, as text.
    pub fn read_asset<C: LedgerContext + ?Sized>(
        &self,
        ctx: &C,
        id: &str,
    ) -> Result<String, ContractError> {
        let bytes = read_present(ctx, id)?;
        String::from_utf8(bytes).map_err(|e| ContractError::Decoding {
            id: id.to_string(),
            source: CanonicalizationError::InvalidUtf8(e.utf8_error()),
        })
    }

    /// Replace the status of an existing asset; every other field is kept.
    pub fn update_asset_status<C: LedgerContext + ?Sized>(
        &self,
        ctx: &mut C,
        id: &str,
        status: &str,
    ) -> Result<Asset, ContractError> {
        let mut asset = read_decoded(&*ctx, id)?;
        self.enforce_status_policy(id, status)?;

        asset.set_status(status);
        write_asset(ctx, &asset)?;
        tracing::debug!(asset_id = %id, status, "updated asset status");
        Ok(asset)
    }

    /// Hand an existing asset to `new_owner`, returning the previous owner.
    pub fn transfer_asset<C: LedgerContext + ?Sized>(
        &self,
        ctx: &mut C,
        id: &str,
        new_owner: &str,
    ) -> Result<String, ContractError> {
        let mut asset = read_decoded(&*ctx, id)?;
        let previous = asset.set_owner(new_owner);
        write_asset(ctx, &asset)?;
        tracing::debug!(asset_id = %id, from = %previous, to = new_owner, "transferred asset");
        Ok(previous)
    }

    /// True iff a non-empty value is stored at `id`.
    pub fn exists<C: LedgerContext + ?Sized>(&self, ctx: &C, id: &str) -> Result<bool, ContractError> {
        Ok(!ctx.get_state(id)?.is_empty())
    }

    /// Every value in the key namespace, in key order.
    ///
    /// Only a failing scan is an error. Each listed value is either JSON that
    /// re-encodes canonically or the stored text.
    pub fn list_all<C: LedgerContext + ?Sized>(
        &self,
        ctx: &C,
    ) -> Result<Vec<ListedRecord>, ContractError> {
        let mut records = Vec::new();
        for entry in ctx.get_state_by_range("", "")? {
            let kv = entry?;
            records.push(listed_record(&kv));
        }
        Ok(records)
    }

    /// Create the asset if it is new and its reading lies outside the
    /// configured window.
    pub fn check_temperature<C: LedgerContext + ?Sized>(
        &self,
        ctx: &mut C,
        id: &str,
        temperature: Temperature,
        status: &str,
        owner: &str,
        timestamp: &str,
    ) -> Result<TemperatureCheck, ContractError> {
        if self.exists(&*ctx, id)? {
            tracing::debug!(asset_id = %id, "asset already exists; skipping temperature check");
            return Ok(TemperatureCheck::AlreadyExists);
        }

        let window = self.config.temperature_window;
        if temperature.is_within(window.min, window.max) {
            return Ok(TemperatureCheck::WithinRange);
        }

        tracing::info!(
            asset_id = %id,
            %temperature,
            min = window.min,
            max = window.max,
            "temperature outside window"
        );
        let asset = self.create_asset(ctx, id, temperature, status, owner, timestamp)?;
        Ok(TemperatureCheck::Created(asset))
    }

    /// Whether the status stored for an existing asset is in the closed set.
    pub fn check_asset_status<C: LedgerContext + ?Sized>(
        &self,
        ctx: &C,
        id: &str,
    ) -> Result<bool, ContractError> {
        let asset = read_decoded(ctx, id)?;
        Ok(asset.validated_status().is_ok())
    }

    fn enforce_status_policy(&self, id: &str, status: &str) -> Result<(), ContractError> {
        match self.config.status_policy {
            StatusPolicy::Permissive => Ok(()),
            StatusPolicy::Strict if AssetStatus::is_valid(status) => Ok(()),
            StatusPolicy::Strict => Err(ContractError::InvalidStatus {
                id: id.to_string(),
                status: status.to_string(),
            }),
        }
    }
}

fn listed_record(kv: &KeyValue) -> ListedRecord {
    let raw = || ListedRecord::Raw(String::from_utf8_lossy(&kv.value).into_owned());
    match serde_json::from_slice::<Value>(&kv.value) {
        Ok(value) => match CanonicalBytes::new(&value) {
            Ok(_) => ListedRecord::Record(value),
            Err(e) => {
                tracing::warn!(key = %kv.key, error = %e, "listing non-canonical value as raw text");
                raw()
            }
        },
        Err(e) => {
            tracing::warn!(key = %kv.key, error = %e, "listing undecodable value as raw text");
            raw()
        }
    }
}

fn read_present<C: LedgerContext + ?Sized>(ctx: &C, id: &str) -> Result<Vec<u8>, ContractError> {
    let bytes = ctx.get_state(id)?;
    if bytes.is_empty() {
        return Err(ContractError::AssetNotFound(id.to_string()));
    }
    Ok(bytes)
}

fn read_decoded<C: LedgerContext + ?Sized>(ctx: &C, id: &str) -> Result<Asset, ContractError> {
    let bytes = read_present(ctx, id)?;
    Asset::decode(&bytes).map_err(|source| ContractError::Decoding {
        id: id.to_string(),
        source,
    })
}

fn write_asset<C: LedgerContext + ?Sized>(ctx: &mut C, asset: &Asset) -> Result<(), ContractError> {
    let bytes = asset.encode()?;
    ctx.put_state(asset.id().as_str(), bytes.as_bytes())?;
    Ok(())
}
