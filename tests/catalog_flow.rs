//! End-to-end admission and durability flows, driven through the catalog
//! facade over the in-memory port.

use chrono::NaiveDate;
use docvault::capacity;
use docvault::catalog::Catalog;
use docvault::config::VaultConfig;
use docvault::error::VaultError;
use docvault::model::{Document, Payload};
use docvault::session::Session;
use docvault::store::{MemStore, StoragePort};
use docvault::upload::UploadFile;

fn single_tenant(port: &MemStore, config: VaultConfig) -> Catalog<&MemStore> {
    Catalog::with_session(port, config, Session::single_tenant()).unwrap()
}

fn pdf_doc(title: &str, payload_chars: usize) -> Document {
    Document::new(title, "other").with_file(
        "file.pdf",
        "application/pdf",
        format!("data:application/pdf;base64,{}", "A".repeat(payload_chars)),
    )
}

#[test]
fn nearly_full_store_rejects_admission_with_exact_accounting() {
    let store = MemStore::new();
    // Occupy exactly 4,900,000 bytes: key "filler" (6 chars) plus value,
    // two bytes per character.
    store
        .set("filler", &"x".repeat(2_449_994))
        .unwrap();

    let config = VaultConfig {
        quota_bytes: 5_000_000,
        ..Default::default()
    };
    let catalog = single_tenant(&store, config);

    let snapshot = catalog.usage().unwrap();
    assert_eq!(snapshot.used_bytes, 4_900_000);
    assert_eq!(snapshot.available_bytes, 100_000);
    assert!((snapshot.percent_used - 98.0).abs() < 1e-9);

    // 145,985 source bytes estimate to exactly 200,000 encoded bytes.
    let file = UploadFile::new("big.pdf", vec![0u8; 145_985]);
    match catalog.admit_upload(&file, None) {
        Err(VaultError::CapacityExceeded {
            required,
            available,
        }) => {
            assert_eq!(required, 200_000);
            assert_eq!(available, 100_000);
        }
        other => panic!("expected CapacityExceeded, got {other:?}"),
    }

    // Nothing was mutated or written.
    assert!(catalog.documents().is_empty());
    assert!(store.get("documents").unwrap().is_none());
}

#[test]
fn add_past_available_capacity_rejects_without_mutation() {
    let store = MemStore::new();
    let config = VaultConfig {
        quota_bytes: 2_000,
        ..Default::default()
    };
    let mut catalog = single_tenant(&store, config);

    let err = catalog.add(pdf_doc("Too big", 5_000)).unwrap_err();
    assert!(matches!(err, VaultError::CapacityExceeded { .. }));
    assert!(catalog.documents().is_empty());
    assert!(store.get("documents").unwrap().is_none());
}

#[test]
fn live_quota_failure_after_passing_precheck_rolls_back_mirror() {
    let store = MemStore::new();
    let mut catalog = single_tenant(&store, VaultConfig::default());
    // The store's own enforcement is stricter than the configured quota.
    store.set_live_quota(Some(100));

    let err = catalog.add(pdf_doc("Doc", 500)).unwrap_err();
    assert!(matches!(err, VaultError::QuotaExceeded));
    assert!(catalog.documents().is_empty());
    assert!(store.get("documents").unwrap().is_none());
}

#[test]
fn update_charges_only_positive_size_delta() {
    let store = MemStore::new();
    let config = VaultConfig {
        quota_bytes: 3_000,
        ..Default::default()
    };
    let mut catalog = single_tenant(&store, config);

    let doc = pdf_doc("Contract", 800);
    catalog.add(doc.clone()).unwrap();

    // Growing far past the remaining budget is rejected before mutation.
    let mut grown = doc.clone();
    grown.payload = Payload::Stored(format!(
        "data:application/pdf;base64,{}",
        "B".repeat(4_000)
    ));
    let err = catalog.update(grown).unwrap_err();
    assert!(matches!(err, VaultError::CapacityExceeded { .. }));
    assert_eq!(catalog.documents()[0], doc);

    // Shrinking always fits, even with the store nearly full.
    let mut shrunk = doc.clone();
    shrunk.payload = Payload::Stored("data:application/pdf;base64,AA==".to_string());
    catalog.update(shrunk.clone()).unwrap();
    assert_eq!(catalog.documents()[0], shrunk);
}

#[test]
fn collections_survive_reopening_the_vault() {
    let store = MemStore::new();
    let doc = Document::new("Passport", "identity").with_notes("drawer");
    {
        let mut catalog = single_tenant(&store, VaultConfig::default());
        catalog.add(doc.clone()).unwrap();
        catalog.add_category("Travel", "blue").unwrap();
    }
    let catalog = single_tenant(&store, VaultConfig::default());
    assert_eq!(catalog.documents(), &[doc]);
    assert_eq!(catalog.category_by_slug("travel").unwrap().color, "blue");
}

#[test]
fn corrupt_collections_degrade_to_empty_and_seeds() {
    let store = MemStore::new();
    store.set("documents", "not json at all").unwrap();
    store.set("categories", "[{\"broken\":").unwrap();

    let catalog = single_tenant(&store, VaultConfig::default());
    assert!(catalog.documents().is_empty());
    // Seed list takes over when the stored categories are unreadable.
    assert!(catalog.category_by_slug("identity").is_some());
}

#[test]
fn open_namespaces_keys_by_session_identity() {
    let store = MemStore::new();
    let mut catalog = Catalog::open(&store, VaultConfig::default()).unwrap();
    let user_id = catalog.session().user_id().unwrap().to_string();

    catalog.add(Document::new("Passport", "identity")).unwrap();

    let keys = store.keys().unwrap();
    assert!(keys.contains(&"docvaultUserId".to_string()));
    assert!(keys.contains(&format!("documents_{user_id}")));
    assert!(store.get("documents").unwrap().is_none());

    // Reopening picks up the same identity and sees the document.
    let reopened = Catalog::open(&store, VaultConfig::default()).unwrap();
    assert_eq!(reopened.session().user_id(), Some(user_id.as_str()));
    assert_eq!(reopened.documents().len(), 1);
}

#[test]
fn unavailable_store_is_detected_at_open() {
    let store = MemStore::new();
    store.set_simulate_write_error(true);
    assert!(matches!(
        Catalog::open(&store, VaultConfig::default()),
        Err(VaultError::StorageUnavailable)
    ));
}

#[test]
fn encode_roundtrip_fits_admission_estimate() {
    let store = MemStore::new();
    let catalog = single_tenant(&store, VaultConfig::default());

    let bytes = vec![0x42u8; 50_000];
    let file = UploadFile::new("statement.pdf", bytes.clone());
    catalog.admit_upload(&file, None).unwrap();

    let payload = docvault::codec::encode(&file).unwrap();
    // The payload the estimate admitted really fits under it (plus prefix).
    assert!(
        capacity::stored_size(&payload) / 2
            <= docvault::codec::estimate_encoded_size(file.len()) + 64
    );
    let (mime, decoded) = docvault::codec::decode(&payload).unwrap();
    assert_eq!(mime, "application/pdf");
    assert_eq!(decoded, bytes);
}

#[test]
fn expiry_is_validated_at_entry_and_commit() {
    let store = MemStore::new();
    let mut catalog = single_tenant(&store, VaultConfig::default());

    let file = UploadFile::new("visa.pdf", vec![0u8; 64]);
    let past = NaiveDate::from_ymd_opt(2001, 1, 1);

    assert!(matches!(
        catalog.admit_upload(&file, past),
        Err(VaultError::Validation(_))
    ));

    let doc = Document::new("Visa", "identity").with_expiry(past.unwrap());
    assert!(matches!(catalog.add(doc), Err(VaultError::Validation(_))));
    assert!(catalog.documents().is_empty());
}
