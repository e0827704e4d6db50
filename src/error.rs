use thiserror::Error;
use uuid::Uuid;

use crate::capacity::format_bytes;

#[derive(Error, Debug)]
pub enum VaultError {
    /// The uploaded file could not be turned into a storable payload.
    #[error("File could not be read: {0}")]
    Encode(String),

    /// Admission pre-check failed: the write would not fit in the quota.
    #[error(
        "Not enough storage space: {} needed, {} available",
        format_bytes(*required),
        format_bytes(*available)
    )]
    CapacityExceeded { required: u64, available: u64 },

    /// The store rejected the write at commit time, despite a passing
    /// pre-check. Same user-facing outcome as `CapacityExceeded`, kept
    /// separate so logs can tell the two apart.
    #[error("Storage quota exceeded while writing")]
    QuotaExceeded,

    #[error("No recently deleted document to restore")]
    NothingToRestore,

    /// The key-value store failed the startup probe (e.g. disabled by
    /// browser policy).
    #[error("Local storage is not available")]
    StorageUnavailable,

    #[error("Document not found: {0}")]
    DocumentNotFound(Uuid),

    #[error("Invalid upload: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, VaultError>;
