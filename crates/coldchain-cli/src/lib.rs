//! # coldchain-cli: Local Replay for the Cold-Chain Registry
//!
//! Provides the `coldchain` command-line interface, which runs contract
//! invocations against a JSON world-state snapshot on disk.
//!
//! ## Subcommands
//!
//! - `coldchain invoke`: submit one invocation; the snapshot is saved only
//!   when it succeeds.
//! - `coldchain dump`: print every stored value as a canonical array.
//!
//! ```bash
//! coldchain --state state.json invoke InitLedger
//! coldchain --state state.json --config contract.yaml invoke CheckTemperature probe 72 open Depot 2024
//! coldchain --state state.json dump
//! ```

pub mod invoke;
pub mod snapshot;
