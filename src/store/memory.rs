use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use super::port::StoragePort;
use crate::capacity::stored_size;
use crate::error::{Result, VaultError};

/// In-memory storage port.
///
/// Uses `RefCell` for interior mutability since the vault is
/// single-threaded. `BTreeMap` keeps `keys()` deterministic for tests.
///
/// Failure injection mirrors what a real browser store can do to us:
/// - [`set_live_quota`](MemStore::set_live_quota) makes `set` reject writes
///   that would push total occupancy past a ceiling, the way the store's
///   own enforcement can be stricter than our pre-check.
/// - [`set_simulate_write_error`](MemStore::set_simulate_write_error) makes
///   every write fail outright.
pub struct MemStore {
    entries: RefCell<BTreeMap<String, String>>,
    live_quota: Cell<Option<u64>>,
    simulate_write_error: Cell<bool>,
}

impl Default for MemStore {
    fn default() -> Self {
        Self {
            entries: RefCell::new(BTreeMap::new()),
            live_quota: Cell::new(None),
            simulate_write_error: Cell::new(false),
        }
    }
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enforce a live quota on writes, in bytes (UTF-16 accounting).
    pub fn set_live_quota(&self, quota: Option<u64>) {
        self.live_quota.set(quota);
    }

    /// Make every subsequent write fail with a store error.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    /// Occupancy if `key` were set to `value`, replacing any current value.
    fn occupancy_after(&self, key: &str, value: &str) -> u64 {
        let entries = self.entries.borrow();
        let mut total = stored_size(key) + stored_size(value);
        for (k, v) in entries.iter() {
            if k != key {
                total += stored_size(k) + stored_size(v);
            }
        }
        total
    }
}

impl StoragePort for MemStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.simulate_write_error.get() {
            return Err(VaultError::Store("simulated write error".to_string()));
        }
        if let Some(quota) = self.live_quota.get() {
            if self.occupancy_after(key, value) > quota {
                return Err(VaultError::QuotaExceeded);
            }
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.borrow().keys().cloned().collect())
    }
}
