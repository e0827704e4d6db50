//! # Catalog Service
//!
//! The composition root. Owns the storage port, the session-resolved keys,
//! the configured limits, and an in-memory mirror of both collections. All
//! UI clients go through this facade; it returns structured results and
//! never performs user-facing I/O.
//!
//! Every mutation follows the same shape:
//!
//! 1. capacity check (admission control, before anything changes)
//! 2. apply to the in-memory mirror
//! 3. durable write
//! 4. on write failure, roll the mirror back, then report the error
//!
//! The mirror is write-through: from the caller's perspective it never
//! diverges from the durable store. Reads (`filter`, accessors) are served
//! from the mirror; each operation re-derives its base state from the
//! mirror, never from a stale read-back of the store.

use chrono::{NaiveDate, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::capacity::{self, CapacitySnapshot};
use crate::codec;
use crate::config::VaultConfig;
use crate::error::{Result, VaultError};
use crate::model::{slugify, Category, Document};
use crate::session::{Session, StorageKeys};
use crate::store::{self, StoragePort};
use crate::undo;
use crate::upload::{self, UploadFile};

pub struct Catalog<S: StoragePort> {
    port: S,
    session: Session,
    keys: StorageKeys,
    config: VaultConfig,
    documents: Vec<Document>,
    categories: Vec<Category>,
}

impl<S: StoragePort> Catalog<S> {
    /// Open a vault with the persisted (or freshly created) session
    /// identity. Probes the store first: an inaccessible store surfaces as
    /// [`VaultError::StorageUnavailable`] here, once, rather than on every
    /// later call.
    pub fn open(port: S, config: VaultConfig) -> Result<Self> {
        store::probe(&port)?;
        let session = Session::load_or_create(&port)?;
        Self::hydrate(port, config, session)
    }

    /// Open a vault with an explicit session (e.g.
    /// [`Session::single_tenant`]).
    pub fn with_session(port: S, config: VaultConfig, session: Session) -> Result<Self> {
        store::probe(&port)?;
        Self::hydrate(port, config, session)
    }

    fn hydrate(port: S, config: VaultConfig, session: Session) -> Result<Self> {
        let keys = session.keys();
        let documents = store::load_documents(&port, &keys)?;
        let categories = store::load_categories(&port, &keys)?;
        debug!(
            documents = documents.len(),
            categories = categories.len(),
            user = session.user_id().unwrap_or("-"),
            "catalog hydrated"
        );
        Ok(Self {
            port,
            session,
            keys,
            config,
            documents,
            categories,
        })
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    /// Current storage occupancy against the configured quota.
    pub fn usage(&self) -> Result<CapacitySnapshot> {
        capacity::usage(&self.port, self.config.quota_bytes)
    }

    /// Boundary check for an upload, run *before* the expensive encode:
    /// size and type constraints, expiry sanity, and admission of the
    /// predicted encoded size.
    pub fn admit_upload(&self, file: &UploadFile, expiry: Option<NaiveDate>) -> Result<()> {
        upload::validate(file, &self.config.accepted_types(), self.config.max_upload_bytes)?;
        upload::validate_expiry(expiry, today())?;
        self.ensure_space(codec::estimate_encoded_size(file.len()))
    }

    /// Append a document. No mutation and no write attempt when the
    /// serialized document does not fit the available capacity.
    pub fn add(&mut self, document: Document) -> Result<()> {
        upload::validate_expiry(document.expiry_date, today())?;
        self.ensure_space(document_size(&document)?)?;

        self.documents.push(document);
        if let Err(err) = self.persist_documents() {
            let dropped = self.documents.pop();
            warn!(
                id = dropped.as_ref().map(|d| d.id.to_string()).unwrap_or_default(),
                "add rolled back, durable write failed"
            );
            return Err(err);
        }
        Ok(())
    }

    /// Replace a document in place by id. Only a positive size delta is
    /// charged against the available capacity.
    pub fn update(&mut self, document: Document) -> Result<()> {
        let pos = self
            .documents
            .iter()
            .position(|d| d.id == document.id)
            .ok_or(VaultError::DocumentNotFound(document.id))?;
        upload::validate_expiry(document.expiry_date, today())?;

        let old_size = document_size(&self.documents[pos])?;
        let new_size = document_size(&document)?;
        if new_size > old_size {
            self.ensure_space(new_size - old_size)?;
        }

        let previous = std::mem::replace(&mut self.documents[pos], document);
        if let Err(err) = self.persist_documents() {
            warn!(id = %previous.id, "update rolled back, durable write failed");
            self.documents[pos] = previous;
            return Err(err);
        }
        Ok(())
    }

    /// Delete a document, making it restorable through the undo ledger.
    ///
    /// The index recorded for the undo is resolved against the
    /// authoritative unfiltered collection — never against whatever
    /// filtered view the UI is displaying.
    ///
    /// Returns the recomputed capacity snapshot for UI display. The undo
    /// slot retains a full copy of the deleted document, so deletion does
    /// not free net space until the pending undo is consumed or
    /// overwritten; clients should not expect a low-storage warning to
    /// clear on delete alone.
    pub fn delete(&mut self, id: Uuid) -> Result<CapacitySnapshot> {
        let index = self
            .documents
            .iter()
            .position(|d| d.id == id)
            .ok_or(VaultError::DocumentNotFound(id))?;

        let document = self.documents[index].clone();
        undo::record(&self.port, &self.keys, &document, index)?;

        self.documents.remove(index);
        if let Err(err) = self.persist_documents() {
            // Put the mirror back and drop the undo record that now
            // describes a deletion that never happened.
            self.documents.insert(index, document);
            let _ = undo::clear(&self.port, &self.keys);
            warn!(%id, "delete rolled back, durable write failed");
            return Err(err);
        }
        debug!(%id, index, "document deleted, undo pending");
        self.usage()
    }

    /// Restore the most recently deleted document.
    ///
    /// The ledger is cleared *before* the mutation, so a rapid second
    /// trigger finds an empty ledger instead of a second copy. A restore
    /// whose durable write fails is terminal: the mirror is unchanged and
    /// the ledger stays cleared.
    pub fn restore_last_deleted(&mut self) -> Result<Document> {
        let record = undo::peek(&self.port, &self.keys)?.ok_or(VaultError::NothingToRestore)?;
        self.ensure_space(document_size(&record.document)?)?;

        undo::clear(&self.port, &self.keys)?;
        // Intervening adds/deletes may have shifted bounds; clamp to append.
        let at = record.original_index.min(self.documents.len());
        self.documents.insert(at, record.document.clone());
        if let Err(err) = self.persist_documents() {
            self.documents.remove(at);
            warn!(id = %record.document.id, "restore failed, ledger stays cleared");
            return Err(err);
        }
        debug!(id = %record.document.id, at, "document restored");
        Ok(record.document)
    }

    pub fn has_pending_undo(&self) -> Result<bool> {
        undo::has_pending(&self.port, &self.keys)
    }

    /// Case-insensitive substring match over title and notes, conjunctive
    /// with an exact category match. Empty query and empty category each
    /// match everything. Pure read; no persistence side effect.
    pub fn filter(&self, query: &str, category: &str) -> Vec<&Document> {
        let needle = query.trim().to_lowercase();
        self.documents
            .iter()
            .filter(|doc| {
                let text_match = needle.is_empty()
                    || doc.title.to_lowercase().contains(&needle)
                    || doc
                        .notes
                        .as_deref()
                        .is_some_and(|n| n.to_lowercase().contains(&needle));
                let category_match = category.is_empty() || doc.category == category;
                text_match && category_match
            })
            .collect()
    }

    /// Create a category from a display name. Slug collisions are not
    /// rejected; lookups resolve to the first match.
    pub fn add_category(&mut self, name: &str, color: &str) -> Result<Category> {
        if slugify(name).is_empty() {
            return Err(VaultError::Validation(
                "category name must contain at least one letter or digit".to_string(),
            ));
        }
        let category = Category::new(name, color);
        self.categories.push(category.clone());
        if let Err(err) = self.persist_categories() {
            self.categories.pop();
            return Err(err);
        }
        Ok(category)
    }

    /// First-match lookup by slug.
    pub fn category_by_slug(&self, slug: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.category == slug)
    }

    fn ensure_space(&self, required: u64) -> Result<()> {
        let snapshot = self.usage()?;
        if required > snapshot.available_bytes {
            return Err(VaultError::CapacityExceeded {
                required,
                available: snapshot.available_bytes,
            });
        }
        Ok(())
    }

    fn persist_documents(&self) -> Result<()> {
        store::save_documents(&self.port, &self.keys, self.config.quota_bytes, &self.documents)
    }

    fn persist_categories(&self) -> Result<()> {
        store::save_categories(&self.port, &self.keys, self.config.quota_bytes, &self.categories)
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Stored footprint of one serialized document.
fn document_size(document: &Document) -> Result<u64> {
    Ok(capacity::stored_size(&serde_json::to_string(document)?))
}
