//! # Contract Errors
//!
//! Every failure aborts the invocation and surfaces to the caller. Messages
//! name the offending key so a failed invocation can be diagnosed from its
//! response alone; the dispatcher prefixes the operation name.

use thiserror::Error;

use coldchain_core::{CanonicalizationError, ValidationError};

use crate::ledger::LedgerError;

/// Errors raised by registry operations.
#[derive(Error, Debug)]
pub enum ContractError {
    /// Creation attempted on an existing key.
    #[error("the asset {0} already exists")]
    AssetAlreadyExists(String),

    /// Read, update, or transfer attempted on a missing or empty key.
    #[error("the asset {0} does not exist")]
    AssetNotFound(String),

    /// The value stored at `id` could not be decoded as an asset.
    #[error("the asset {id} could not be decoded: {source}")]
    Decoding {
        id: String,
        #[source]
        source: CanonicalizationError,
    },

    /// A status outside the closed set was written under the strict policy.
    #[error("status {status:?} for asset {id} is not one of open, solved, rejected, in_progress")]
    InvalidStatus { id: String, status: String },

    /// An argument failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Canonical encoding of a value to be written failed.
    #[error(transparent)]
    Canonicalization(#[from] CanonicalizationError),

    /// A world-state call failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// The invoked function name is not part of the contract.
    #[error("unknown function {0:?}")]
    UnknownFunction(String),

    /// Wrong number of positional arguments.
    #[error("{function} expects {expected} argument(s), got {actual}")]
    ArgumentCount {
        function: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A positional argument could not be parsed.
    #[error("{function}: invalid {name} argument {value:?}: {reason}")]
    InvalidArgument {
        function: &'static str,
        name: &'static str,
        value: String,
        reason: String,
    },
}
