//! # Session identity and key namespacing
//!
//! Several "accounts" can share one physical store without a backend by
//! suffixing every collection key with a pseudo-random user identifier.
//! The identifier itself lives under a fixed well-known key so the same
//! identity is picked up on the next startup.
//!
//! The session is constructed explicitly and handed to the catalog — there
//! is no module-level singleton. Lifecycle is create-or-load at startup,
//! no teardown.

use uuid::Uuid;

use crate::error::Result;
use crate::store::StoragePort;

/// Well-known key holding the session identity. Never namespaced itself.
pub const USER_ID_KEY: &str = "docvaultUserId";

/// The resolved storage identity for one vault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    user_id: Option<String>,
}

impl Session {
    /// Read the persisted user identifier, or generate and persist a fresh
    /// one. Namespaced keys are the canonical persistence scheme.
    pub fn load_or_create<S: StoragePort>(port: &S) -> Result<Self> {
        if let Some(existing) = port.get(USER_ID_KEY)? {
            if !existing.trim().is_empty() {
                return Ok(Self {
                    user_id: Some(existing),
                });
            }
        }
        let id = Uuid::new_v4().simple().to_string();
        port.set(USER_ID_KEY, &id)?;
        Ok(Self { user_id: Some(id) })
    }

    /// Un-namespaced keys, for embedders that own the whole store.
    pub fn single_tenant() -> Self {
        Self { user_id: None }
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// The storage keys this session reads and writes.
    pub fn keys(&self) -> StorageKeys {
        match &self.user_id {
            Some(id) => StorageKeys {
                documents: format!("documents_{id}"),
                categories: format!("categories_{id}"),
                last_deleted: format!("lastDeletedDocument_{id}"),
                last_deleted_index: format!("lastDeletedDocumentIndex_{id}"),
            },
            None => StorageKeys {
                documents: "documents".to_string(),
                categories: "categories".to_string(),
                last_deleted: "lastDeletedDocument".to_string(),
                last_deleted_index: "lastDeletedDocumentIndex".to_string(),
            },
        }
    }
}

/// Fully-resolved key names for one session's collections and undo slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub documents: String,
    pub categories: String,
    pub last_deleted: String,
    pub last_deleted_index: String,
}
