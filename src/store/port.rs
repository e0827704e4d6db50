use crate::error::{Result, VaultError};

/// Key used by [`probe`]; written and removed again immediately.
const PROBE_KEY: &str = "__docvault_probe__";

/// Abstract interface for the backing text key-value store.
///
/// Implementations take `&self` and handle their own interior mutability;
/// the vault is single-threaded and non-reentrant per call.
///
/// `set` must return [`VaultError::QuotaExceeded`] when the store's own
/// quota enforcement rejects a write. Callers pre-check capacity before
/// every write, so this surfacing only happens when live enforcement is
/// stricter than the estimate.
pub trait StoragePort {
    /// Read a value. `Ok(None)` when the key is not present.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any existing one.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a key. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// All currently resident keys.
    fn keys(&self) -> Result<Vec<String>>;
}

impl<S: StoragePort + ?Sized> StoragePort for &S {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }

    fn keys(&self) -> Result<Vec<String>> {
        (**self).keys()
    }
}

/// Startup probe: verify the store accepts a write/read/delete cycle.
///
/// Run once when the catalog is constructed; any failure maps to
/// [`VaultError::StorageUnavailable`] so callers see one well-known error
/// instead of whatever the store threw.
pub fn probe<S: StoragePort>(port: &S) -> Result<()> {
    port.set(PROBE_KEY, "1")
        .map_err(|_| VaultError::StorageUnavailable)?;
    let read_back = port
        .get(PROBE_KEY)
        .map_err(|_| VaultError::StorageUnavailable)?;
    port.remove(PROBE_KEY)
        .map_err(|_| VaultError::StorageUnavailable)?;
    match read_back.as_deref() {
        Some("1") => Ok(()),
        _ => Err(VaultError::StorageUnavailable),
    }
}
