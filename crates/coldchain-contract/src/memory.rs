//! # In-Memory World State
//!
//! An ordered, in-process world state with buffered per-invocation
//! transactions. It stands in for the platform's store in tests and in the
//! `coldchain` replay CLI.
//!
//! ## Atomicity
//!
//! [`MemoryLedger::begin()`] opens a [`MemoryTransaction`] that buffers every
//! write. Reads see the buffered writes first (read-your-writes). Calling
//! [`MemoryTransaction::commit()`] applies the buffer in one step; dropping
//! the transaction discards it, so a failed invocation leaves no partial
//! write behind.

use std::collections::BTreeMap;
use std::ops::Bound;

use crate::ledger::{KeyValue, LedgerContext, LedgerError, StateRange};

/// Committed world state, ordered by key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryLedger {
    state: BTreeMap<String, Vec<u8>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a ledger from exported entries.
    ///
    /// # Errors
    ///
    /// Rejects empty keys and empty values, which no invocation can write.
    pub fn from_entries(
        entries: impl IntoIterator<Item = (String, Vec<u8>)>,
    ) -> Result<Self, LedgerError> {
        let mut state = BTreeMap::new();
        for (key, value) in entries {
            validate_write(&key, &value)?;
            state.insert(key, value);
        }
        Ok(Self { state })
    }

    /// Committed entries in key order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.state.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Committed value at `key`, if any.
    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.state.get(key).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Open an invocation against the committed state.
    pub fn begin(&mut self) -> MemoryTransaction<'_> {
        MemoryTransaction {
            committed: &mut self.state,
            pending: BTreeMap::new(),
        }
    }
}

/// Buffered writes of one invocation.
#[derive(Debug)]
pub struct MemoryTransaction<'a> {
    committed: &'a mut BTreeMap<String, Vec<u8>>,
    pending: BTreeMap<String, Vec<u8>>,
}

impl MemoryTransaction<'_> {
    /// Number of distinct keys written so far.
    pub fn pending_writes(&self) -> usize {
        self.pending.len()
    }

    /// Apply every buffered write, returning how many keys changed.
    pub fn commit(self) -> usize {
        let written = self.pending.len();
        self.committed.extend(self.pending);
        written
    }
}

impl LedgerContext for MemoryTransaction<'_> {
    fn get_state(&self, key: &str) -> Result<Vec<u8>, LedgerError> {
        let value = self
            .pending
            .get(key)
            .or_else(|| self.committed.get(key))
            .cloned()
            .unwrap_or_default();
        Ok(value)
    }

    fn put_state(&mut self, key: &str, value: &[u8]) -> Result<(), LedgerError> {
        validate_write(key, value)?;
        self.pending.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn get_state_by_range(
        &self,
        start_key: &str,
        end_key: &str,
    ) -> Result<StateRange<'_>, LedgerError> {
        let range = range_bounds(start_key, end_key)?;

        // Pending writes shadow committed values for the same key.
        let mut merged: BTreeMap<&str, &[u8]> = self
            .committed
            .range::<str, _>(range)
            .map(|(k, v)| (k.as_str(), v.as_slice()))
            .collect();
        merged.extend(
            self.pending
                .range::<str, _>(range)
                .map(|(k, v)| (k.as_str(), v.as_slice())),
        );

        Ok(Box::new(merged.into_iter().map(|(key, value)| {
            Ok(KeyValue {
                key: key.to_string(),
                value: value.to_vec(),
            })
        })))
    }
}

fn validate_write(key: &str, value: &[u8]) -> Result<(), LedgerError> {
    if key.is_empty() {
        return Err(LedgerError::EmptyKey);
    }
    if value.is_empty() {
        return Err(LedgerError::EmptyValue {
            key: key.to_string(),
        });
    }
    Ok(())
}

fn range_bounds<'k>(
    start: &'k str,
    end: &'k str,
) -> Result<(Bound<&'k str>, Bound<&'k str>), LedgerError> {
    if !start.is_empty() && !end.is_empty() && start > end {
        return Err(LedgerError::InvalidRange {
            start: start.to_string(),
            end: end.to_string(),
        });
    }
    let lower = if start.is_empty() {
        Bound::Unbounded
    } else {
        Bound::Included(start)
    };
    let upper = if end.is_empty() {
        Bound::Unbounded
    } else {
        Bound::Excluded(end)
    };
    Ok((lower, upper))
}
