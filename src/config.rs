//! # Configuration
//!
//! Vault limits are data, not constants: embedders can tighten the quota or
//! the accepted upload types without forking the crate. [`confique`] handles
//! layered loading (file, env, programmatic overrides) with compiled
//! defaults that match the browser-profile numbers:
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `quota_bytes` | 5 MiB | Total byte budget for the key-value store |
//! | `max_upload_bytes` | 5 MiB | Ceiling on a single source file |
//! | `accepted_types` | PDF, JPEG, PNG, DOC(X), XLS(X) | Upload MIME allow-list |

use confique::Config;
use serde::{Deserialize, Serialize};

use crate::capacity::DEFAULT_QUOTA_BYTES;

fn default_accepted_types() -> Vec<String> {
    [
        "application/pdf",
        "image/jpeg",
        "image/png",
        "application/msword",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "application/vnd.ms-excel",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    ]
    .map(str::to_string)
    .to_vec()
}

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct VaultConfig {
    /// Total byte budget for the backing store.
    #[config(default = 5242880)]
    pub quota_bytes: u64,

    /// Largest accepted source file, in bytes (pre-encoding).
    #[config(default = 5242880)]
    pub max_upload_bytes: u64,

    /// MIME types accepted at the upload boundary.
    /// When absent, the built-in allow-list applies.
    pub accepted_types: Option<Vec<String>>,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            quota_bytes: DEFAULT_QUOTA_BYTES,
            max_upload_bytes: DEFAULT_QUOTA_BYTES,
            accepted_types: None,
        }
    }
}

impl VaultConfig {
    /// Accepted upload types, using the built-in allow-list if not configured.
    pub fn accepted_types(&self) -> Vec<String> {
        self.accepted_types
            .clone()
            .unwrap_or_else(default_accepted_types)
    }
}
