//! # World-State Snapshots
//!
//! A snapshot is a pretty-printed JSON object mapping each key to its stored
//! value as UTF-8 text:
//!
//! ```json
//! {
//!   "asset1": "{\"ID\":\"asset1\",...}"
//! }
//! ```
//!
//! A missing snapshot file loads as an empty ledger.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context, Result};

use coldchain_contract::MemoryLedger;

/// Load the ledger stored at `path`, or an empty ledger if the file does not
/// exist.
pub fn load_snapshot(path: &Path) -> Result<MemoryLedger> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no snapshot; starting from an empty ledger");
        return Ok(MemoryLedger::new());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot {}", path.display()))?;
    let entries: BTreeMap<String, String> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse snapshot {}", path.display()))?;

    let ledger = MemoryLedger::from_entries(
        entries
            .into_iter()
            .map(|(key, value)| (key, value.into_bytes())),
    )
    .with_context(|| format!("snapshot {} holds an invalid entry", path.display()))?;

    tracing::debug!(path = %path.display(), keys = ledger.len(), "loaded snapshot");
    Ok(ledger)
}

/// Write `ledger` to `path`, replacing any previous snapshot.
pub fn save_snapshot(path: &Path, ledger: &MemoryLedger) -> Result<()> {
    let mut entries = BTreeMap::new();
    for (key, value) in ledger.entries() {
        let Ok(text) = std::str::from_utf8(value) else {
            bail!("value at key {key:?} is not UTF-8 and cannot be written to a snapshot");
        };
        entries.insert(key, text);
    }

    let mut json = serde_json::to_string_pretty(&entries).context("failed to serialize snapshot")?;
    json.push('\n');

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    std::fs::write(path, json).with_context(|| format!("failed to write snapshot {}", path.display()))?;

    tracing::debug!(path = %path.display(), keys = entries.len(), "saved snapshot");
    Ok(())
}
