//! # Undo Ledger
//!
//! A single-slot record of the most recently deleted document, persisted so
//! the one-level restore survives a reload. Deliberately not a stack: a
//! second deletion silently overwrites the first restorable document.
//!
//! The slot is two keys — the document JSON and its original position as a
//! decimal string. Consumers must [`clear`] before applying a restore
//! mutation, so rapid repeated triggers cannot consume the same record
//! twice.

use tracing::{debug, warn};

use crate::error::{Result, VaultError};
use crate::model::{Document, Payload, UndoRecord};
use crate::session::StorageKeys;
use crate::store::StoragePort;

/// Record a deletion, overwriting any pending entry.
///
/// If the document's payload is what makes the slot write blow the live
/// quota, the payload is downgraded to [`Payload::TooLargeToStore`] and the
/// write retried — a restorable record without the file body beats losing
/// the undo entirely.
pub fn record<S: StoragePort>(
    port: &S,
    keys: &StorageKeys,
    document: &Document,
    index: usize,
) -> Result<()> {
    let json = serde_json::to_string(document)?;
    match port.set(&keys.last_deleted, &json) {
        Ok(()) => {}
        Err(VaultError::QuotaExceeded) => {
            debug!(id = %document.id, "undo slot over quota, dropping file body");
            let mut stripped = document.clone();
            stripped.payload = Payload::TooLargeToStore;
            port.set(&keys.last_deleted, &serde_json::to_string(&stripped)?)?;
        }
        Err(err) => return Err(err),
    }
    port.set(&keys.last_deleted_index, &index.to_string())
}

/// Non-destructive read of the pending entry, if any.
///
/// A corrupt slot reads as empty; an unparseable index falls back to zero
/// (the restore clamps it anyway).
pub fn peek<S: StoragePort>(port: &S, keys: &StorageKeys) -> Result<Option<UndoRecord>> {
    let Some(raw) = port.get(&keys.last_deleted)? else {
        return Ok(None);
    };
    let document: Document = match serde_json::from_str(&raw) {
        Ok(doc) => doc,
        Err(err) => {
            warn!(%err, "discarding corrupt undo record");
            return Ok(None);
        }
    };
    let original_index = port
        .get(&keys.last_deleted_index)?
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0);
    Ok(Some(UndoRecord {
        document,
        original_index,
    }))
}

/// Remove the pending entry. Clearing an empty ledger is not an error.
pub fn clear<S: StoragePort>(port: &S, keys: &StorageKeys) -> Result<()> {
    port.remove(&keys.last_deleted)?;
    port.remove(&keys.last_deleted_index)
}

pub fn has_pending<S: StoragePort>(port: &S, keys: &StorageKeys) -> Result<bool> {
    Ok(peek(port, keys)?.is_some())
}
