//! Upload boundary validation.
//!
//! Everything here runs *before* the expensive encode: source size against
//! the configured ceiling, MIME type against the allow-list, expiry date
//! against today. The same expiry check runs again at commit time in the
//! catalog — form entry and commit can be minutes apart.

use chrono::NaiveDate;

use crate::capacity::format_bytes;
use crate::codec;
use crate::error::{Result, VaultError};

/// An uploaded file as handed over by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// MIME type derived from the file name.
    pub fn mime(&self) -> String {
        codec::decode_mime(&self.name)
    }
}

/// Check size and type constraints on an upload.
pub fn validate(file: &UploadFile, accepted_types: &[String], max_bytes: u64) -> Result<()> {
    if file.len() > max_bytes {
        return Err(VaultError::Validation(format!(
            "{} is {}, the limit is {}",
            file.name,
            format_bytes(file.len()),
            format_bytes(max_bytes)
        )));
    }
    let mime = file.mime();
    if !accepted_types.iter().any(|t| t == &mime) {
        return Err(VaultError::Validation(format!(
            "{} ({mime}) is not an accepted file type",
            file.name
        )));
    }
    Ok(())
}

/// An expiry date, when set, must not be before the current date.
pub fn validate_expiry(expiry: Option<NaiveDate>, today: NaiveDate) -> Result<()> {
    match expiry {
        Some(date) if date < today => Err(VaultError::Validation(format!(
            "expiry date {date} is in the past"
        ))),
        _ => Ok(()),
    }
}
