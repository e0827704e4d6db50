//! # Codec: binary file ⇄ storable text payload
//!
//! The backing store only holds text, so file bodies travel as data URLs:
//! `data:<mime>;base64,<payload>`. The prefix makes the payload
//! self-describing — the MIME type survives even if the document's
//! `fileType` field is lost or stale.
//!
//! Everything here is a pure transform; no storage access, no I/O.

use base64::{engine::general_purpose::STANDARD as Base64Standard, Engine};
use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::error::{Result, VaultError};
use crate::upload::UploadFile;

/// Returned whenever a MIME type cannot be determined.
pub const FALLBACK_MIME: &str = "application/octet-stream";

/// Modeled expansion from source bytes to stored payload. Base64 alone is
/// 4/3; the remainder covers the data-URL prefix on realistic file sizes.
/// Used for admission checks before the expensive encode is run.
pub const ENCODED_EXPANSION: f64 = 1.37;

static EXTENSION_MIME: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("pdf", "application/pdf"),
        ("jpg", "image/jpeg"),
        ("jpeg", "image/jpeg"),
        ("png", "image/png"),
        ("doc", "application/msword"),
        (
            "docx",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        ),
        ("xls", "application/vnd.ms-excel"),
        (
            "xlsx",
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        ),
    ])
});

/// Encode an uploaded file into a self-describing text payload.
///
/// Fails with [`VaultError::Encode`] when the upload has no name to derive
/// a type from or no bytes to encode.
pub fn encode(file: &UploadFile) -> Result<String> {
    if file.name.trim().is_empty() {
        return Err(VaultError::Encode("upload has no file name".to_string()));
    }
    if file.bytes.is_empty() {
        return Err(VaultError::Encode(format!(
            "{} has no readable content",
            file.name
        )));
    }
    let mime = decode_mime(&file.name);
    Ok(format!(
        "data:{};base64,{}",
        mime,
        Base64Standard.encode(&file.bytes)
    ))
}

/// Decode a payload back into its MIME type and raw bytes.
pub fn decode(payload: &str) -> Result<(String, Vec<u8>)> {
    let rest = payload
        .strip_prefix("data:")
        .ok_or_else(|| VaultError::Encode("payload is not a data URL".to_string()))?;
    let (descriptor, data) = rest
        .split_once(',')
        .ok_or_else(|| VaultError::Encode("payload has no data section".to_string()))?;
    let mime = descriptor
        .split(';')
        .next()
        .filter(|m| !m.is_empty())
        .unwrap_or(FALLBACK_MIME)
        .to_string();
    let bytes = Base64Standard
        .decode(data)
        .map_err(|e| VaultError::Encode(format!("payload is not valid base64: {e}")))?;
    Ok((mime, bytes))
}

/// Determine the MIME type of a payload or a plain file reference.
///
/// Data-URL payloads carry their type in the prefix; anything else is
/// treated as a file name and matched by extension. [`FALLBACK_MIME`] when
/// neither yields an answer.
pub fn decode_mime(source: &str) -> String {
    if let Some(rest) = source.strip_prefix("data:") {
        let descriptor = rest.split([';', ',']).next().unwrap_or("");
        if descriptor.is_empty() {
            return FALLBACK_MIME.to_string();
        }
        return descriptor.to_string();
    }
    source
        .rsplit_once('.')
        .and_then(|(_, ext)| EXTENSION_MIME.get(ext.to_lowercase().as_str()))
        .map(|mime| mime.to_string())
        .unwrap_or_else(|| FALLBACK_MIME.to_string())
}

/// Predict the stored payload size for a source of `byte_len` bytes,
/// without encoding it.
pub fn estimate_encoded_size(byte_len: u64) -> u64 {
    (byte_len as f64 * ENCODED_EXPANSION).ceil() as u64
}
