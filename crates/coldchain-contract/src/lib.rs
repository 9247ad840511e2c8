//! # coldchain-contract: Asset Registry Operations
//!
//! The registry layer executed by every replica of the cold-chain ledger. It
//! maintains temperature-monitored asset records through create, read,
//! status update, transfer, and listing operations, writing every value
//! through `coldchain_core::CanonicalBytes` so that replicas replaying the
//! same invocation write identical bytes.
//!
//! ## Modules
//!
//! - **ledger** (`ledger.rs`): the world-state port supplied by the platform.
//! - **memory** (`memory.rs`): ordered in-memory world state with buffered,
//!   all-or-nothing invocations.
//! - **contract** (`contract.rs`): the registry operations.
//! - **dispatch** (`dispatch.rs`): function-name dispatch, argument parsing,
//!   payload rendering, and atomic submission.
//! - **config** (`config.rs`): temperature window and status policy.
//! - **fixtures** (`fixtures.rs`): the seed asset set.
//!
//! ## Crate Policy
//!
//! - No in-process state survives an invocation.
//! - No deletion path. Assets are created and mutated, never destroyed.
//! - No `.unwrap()` outside tests.

pub mod config;
pub mod contract;
pub mod dispatch;
pub mod error;
pub mod fixtures;
pub mod ledger;
pub mod memory;

pub use config::{ConfigError, ContractConfig, StatusPolicy, TemperatureWindow};
pub use contract::{AssetContract, ListedRecord, TemperatureCheck};
pub use dispatch::{submit, ContractFunction, Response, STATUS_ERROR, STATUS_OK};
pub use error::ContractError;
pub use ledger::{KeyValue, LedgerContext, LedgerError, StateRange};
pub use memory::{MemoryLedger, MemoryTransaction};
