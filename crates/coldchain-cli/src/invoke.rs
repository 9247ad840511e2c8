//! # Invocation Replay
//!
//! Runs one contract invocation against a snapshot, the way a peer would run
//! it against its world state.
//!
//! ## Usage
//!
//! ```bash
//! coldchain --state state.json invoke InitLedger
//! coldchain --state state.json invoke CreateAsset asset7 65 open Catering 2023
//! coldchain --state state.json invoke CheckTemperature probe -18.5 open Depot 2024
//! coldchain --state state.json dump
//! ```
//!
//! The snapshot is rewritten only when the invocation succeeds.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use coldchain_contract::{submit, AssetContract, ContractConfig, MemoryLedger, Response};
use coldchain_core::CanonicalBytes;

use crate::snapshot::{load_snapshot, save_snapshot};

/// Arguments of `coldchain invoke`.
#[derive(Args, Debug)]
pub struct InvokeArgs {
    /// Contract function name (e.g. CreateAsset, ReadAsset, ListAll).
    pub function: String,

    /// Positional string arguments, passed through unchanged.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Build the contract from an optional YAML config file.
pub fn load_contract(config: Option<&Path>) -> Result<AssetContract> {
    let config = match config {
        Some(path) => ContractConfig::from_path(path)
            .with_context(|| format!("failed to load contract config {}", path.display()))?,
        None => ContractConfig::default(),
    };
    Ok(AssetContract::new(config))
}

/// Load the snapshot, submit one invocation, and save the snapshot if it
/// succeeded.
pub fn execute(
    state: &Path,
    contract: &AssetContract,
    function: &str,
    args: &[String],
) -> Result<Response> {
    let mut ledger = load_snapshot(state)?;
    let response = submit(&mut ledger, contract, function, args);
    if response.is_success() {
        save_snapshot(state, &ledger)?;
    }
    Ok(response)
}

/// Execute `coldchain invoke`.
pub fn run_invoke(args: &InvokeArgs, state: &Path, config: Option<&Path>) -> Result<u8> {
    let contract = load_contract(config)?;
    let response = execute(state, &contract, &args.function, &args.args)?;

    if response.is_success() {
        println!("{}", response.payload_text());
        Ok(0)
    } else {
        eprintln!("Error ({}): {}", response.status, response.message);
        Ok(1)
    }
}

/// Render every stored value as a canonical array, in key order.
pub fn render_state(ledger: &mut MemoryLedger) -> Result<String> {
    let tx = ledger.begin();
    let listed = AssetContract::default()
        .list_all(&tx)
        .context("failed to scan world state")?;
    let rendered = CanonicalBytes::new(&listed).context("failed to render world state")?;
    Ok(rendered.to_string())
}

/// Execute `coldchain dump`.
pub fn run_dump(state: &Path) -> Result<u8> {
    let mut ledger = load_snapshot(state)?;
    println!("{}", render_state(&mut ledger)?);
    Ok(0)
}
