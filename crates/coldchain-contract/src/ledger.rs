//! # Ledger Port
//!
//! The world-state capability the hosting platform supplies to each
//! invocation. The registry never owns persisted bytes; it reads and writes
//! through this trait for the duration of one invocation only.
//!
//! Production: the platform's invocation stub.
//! Testing and local replay: [`MemoryTransaction`](crate::memory::MemoryTransaction).

use thiserror::Error;

/// One entry yielded by a range scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub key: String,
    pub value: Vec<u8>,
}

/// A lazy, finite, forward-ordered, one-shot sequence of world-state entries.
pub type StateRange<'a> = Box<dyn Iterator<Item = Result<KeyValue, LedgerError>> + 'a>;

/// World-state access inside a single atomic invocation.
///
/// Writes made through `put_state` must be visible to later `get_state`
/// calls in the same invocation. Whether they become durable is decided by
/// the platform when the invocation ends.
pub trait LedgerContext {
    /// Read the value at `key`. An absent key yields an empty vector.
    fn get_state(&self, key: &str) -> Result<Vec<u8>, LedgerError>;

    /// Write `value` at `key`, replacing any previous value.
    fn put_state(&mut self, key: &str, value: &[u8]) -> Result<(), LedgerError>;

    /// Scan keys in `[start_key, end_key)` in ascending order.
    ///
    /// An empty `start_key` means "from the first key"; an empty `end_key`
    /// means "through the last key".
    fn get_state_by_range(&self, start_key: &str, end_key: &str)
        -> Result<StateRange<'_>, LedgerError>;
}

/// Errors raised by the world-state capability.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Keys must be non-empty.
    #[error("world-state key must not be empty")]
    EmptyKey,

    /// Values must be non-empty; an empty value is indistinguishable from
    /// an absent key.
    #[error("refusing to write an empty value at key {key:?}")]
    EmptyValue {
        /// The key that was being written.
        key: String,
    },

    /// Range bounds are inverted.
    #[error("invalid range: start key {start:?} sorts after end key {end:?}")]
    InvalidRange {
        /// Inclusive lower bound.
        start: String,
        /// Exclusive upper bound.
        end: String,
    },

    /// The platform aborted the invocation or failed a store call.
    #[error("ledger unavailable: {0}")]
    Unavailable(String),
}
