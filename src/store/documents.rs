//! Durable persistence of the Document and Category collections.
//!
//! Saves are admission-controlled: the serialized collection is measured
//! and checked against the quota *before* the write is attempted. The
//! occupancy of the key being replaced is credited, since a successful
//! write frees it. If the store's own enforcement still rejects the write,
//! that surfaces as the distinct [`VaultError::QuotaExceeded`] — callers
//! treat both identically for UX, logs tell them apart.
//!
//! Loads never fail on missing or corrupt data: an absent or unparseable
//! collection is an empty collection (documents) or the seed list
//! (categories). Corruption is logged and forgotten.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use super::port::StoragePort;
use crate::capacity::{self, stored_size};
use crate::error::{Result, VaultError};
use crate::model::{seed_categories, Category, Document};
use crate::session::StorageKeys;

pub fn save_documents<S: StoragePort>(
    port: &S,
    keys: &StorageKeys,
    quota: u64,
    documents: &[Document],
) -> Result<()> {
    save_collection(port, &keys.documents, quota, documents)
}

pub fn load_documents<S: StoragePort>(port: &S, keys: &StorageKeys) -> Result<Vec<Document>> {
    Ok(load_collection(port, &keys.documents)?.unwrap_or_default())
}

pub fn save_categories<S: StoragePort>(
    port: &S,
    keys: &StorageKeys,
    quota: u64,
    categories: &[Category],
) -> Result<()> {
    save_collection(port, &keys.categories, quota, categories)
}

/// Loads the persisted categories, falling back to the seed list when
/// nothing is stored. First run is a valid state, not an error.
pub fn load_categories<S: StoragePort>(port: &S, keys: &StorageKeys) -> Result<Vec<Category>> {
    Ok(load_collection(port, &keys.categories)?.unwrap_or_else(seed_categories))
}

fn save_collection<S: StoragePort, T: Serialize>(
    port: &S,
    key: &str,
    quota: u64,
    items: &[T],
) -> Result<()> {
    let json = serde_json::to_string(items)?;
    let required = stored_size(key) + stored_size(&json);

    let snapshot = capacity::usage(port, quota)?;
    let replaced = match port.get(key)? {
        Some(current) => stored_size(key) + stored_size(&current),
        None => 0,
    };
    let available = snapshot.available_bytes + replaced;
    if required > available {
        warn!(key, required, available, "collection write rejected by capacity pre-check");
        return Err(VaultError::CapacityExceeded {
            required,
            available,
        });
    }

    match port.set(key, &json) {
        Err(VaultError::QuotaExceeded) => {
            warn!(key, required, "store rejected write despite passing pre-check");
            Err(VaultError::QuotaExceeded)
        }
        other => other,
    }
}

fn load_collection<S: StoragePort, T: DeserializeOwned>(
    port: &S,
    key: &str,
) -> Result<Option<Vec<T>>> {
    let Some(raw) = port.get(key)? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(items) => Ok(Some(items)),
        Err(err) => {
            warn!(key, %err, "discarding corrupt collection");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Payload;
    use crate::session::Session;
    use crate::store::MemStore;

    fn keys() -> StorageKeys {
        Session::single_tenant().keys()
    }

    const QUOTA: u64 = 5 * 1024 * 1024;

    #[test]
    fn documents_roundtrip() {
        let store = MemStore::new();
        let docs = vec![
            Document::new("Passport", "identity"),
            Document::new("Lease", "legal").with_notes("apartment"),
        ];
        save_documents(&store, &keys(), QUOTA, &docs).unwrap();
        let loaded = load_documents(&store, &keys()).unwrap();
        assert_eq!(loaded, docs);
    }

    #[test]
    fn missing_documents_load_as_empty() {
        let store = MemStore::new();
        assert!(load_documents(&store, &keys()).unwrap().is_empty());
    }

    #[test]
    fn corrupt_documents_load_as_empty() {
        let store = MemStore::new();
        store.set("documents", "{not json").unwrap();
        assert!(load_documents(&store, &keys()).unwrap().is_empty());
    }

    #[test]
    fn categories_seed_on_first_run() {
        let store = MemStore::new();
        let cats = load_categories(&store, &keys()).unwrap();
        assert_eq!(cats, seed_categories());
        // Nothing was written by the load itself.
        assert!(store.get("categories").unwrap().is_none());
    }

    #[test]
    fn categories_roundtrip_overrides_seed() {
        let store = MemStore::new();
        let cats = vec![Category::new("Boat Papers", "cyan")];
        save_categories(&store, &keys(), QUOTA, &cats).unwrap();
        assert_eq!(load_categories(&store, &keys()).unwrap(), cats);
    }

    #[test]
    fn save_rejects_oversized_collection_without_writing() {
        let store = MemStore::new();
        let doc = Document::new("Big", "other").with_file(
            "big.pdf",
            "application/pdf",
            format!("data:application/pdf;base64,{}", "A".repeat(4000)),
        );
        let err = save_documents(&store, &keys(), 1000, &[doc]).unwrap_err();
        match err {
            VaultError::CapacityExceeded {
                required,
                available,
            } => {
                assert!(required > available);
                assert_eq!(available, 1000);
            }
            other => panic!("expected CapacityExceeded, got {other:?}"),
        }
        assert!(store.get("documents").unwrap().is_none());
    }

    #[test]
    fn save_credits_the_value_being_replaced() {
        let store = MemStore::new();
        let payload = format!("data:application/pdf;base64,{}", "A".repeat(1000));
        let doc =
            Document::new("Doc", "other").with_file("a.pdf", "application/pdf", payload);
        save_documents(&store, &keys(), QUOTA, &[doc.clone()]).unwrap();

        let occupied = capacity::usage(&store, QUOTA).unwrap().used_bytes;
        // A quota barely above current occupancy still admits a same-size
        // rewrite because the replaced value is credited.
        let mut smaller = doc.clone();
        smaller.payload = Payload::Absent;
        save_documents(&store, &keys(), occupied + 10, &[smaller]).unwrap();
    }

    #[test]
    fn live_quota_rejection_maps_to_quota_exceeded() {
        let store = MemStore::new();
        // Pre-check passes against a generous configured quota, but the
        // store itself enforces a tiny one.
        store.set_live_quota(Some(50));
        let docs = vec![Document::new("Doc", "other")];
        let err = save_documents(&store, &keys(), QUOTA, &docs).unwrap_err();
        assert!(matches!(err, VaultError::QuotaExceeded));
    }
}
