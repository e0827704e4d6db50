//! # Capacity Tracker
//!
//! The backing store is UTF-16 based, so every stored character costs two
//! bytes. Occupancy is the sum over all resident keys of
//! `2 * (key.len_utf16 + value.len_utf16)`, measured on demand against a
//! fixed quota.
//!
//! Writes are admission-controlled: callers ask [`has_space`] *before*
//! mutating anything, rather than writing speculatively and rolling back.

use serde::Serialize;

use crate::error::Result;
use crate::store::StoragePort;

/// Conservative cross-browser ceiling for the backing store: 5 MiB.
pub const DEFAULT_QUOTA_BYTES: u64 = 5 * 1024 * 1024;

const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Point-in-time read of storage occupancy. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CapacitySnapshot {
    pub used_bytes: u64,
    pub available_bytes: u64,
    pub percent_used: f64,
}

/// Bytes a string occupies in the store: two per UTF-16 code unit.
pub fn stored_size(text: &str) -> u64 {
    2 * text.encode_utf16().count() as u64
}

/// Sum the occupancy of every resident key and value.
pub fn usage<S: StoragePort>(port: &S, quota: u64) -> Result<CapacitySnapshot> {
    let mut used = 0u64;
    for key in port.keys()? {
        used += stored_size(&key);
        if let Some(value) = port.get(&key)? {
            used += stored_size(&value);
        }
    }
    Ok(CapacitySnapshot {
        used_bytes: used,
        available_bytes: quota.saturating_sub(used),
        percent_used: used as f64 / quota as f64 * 100.0,
    })
}

/// Whether `candidate_bytes` more would still fit under the quota.
pub fn has_space<S: StoragePort>(port: &S, quota: u64, candidate_bytes: u64) -> Result<bool> {
    Ok(candidate_bytes <= usage(port, quota)?.available_bytes)
}

/// Human-readable size: base-1024 units, two decimals with trailing zeros
/// trimmed, clamped at GB.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let exp = (((bytes as f64).ln() / 1024f64.ln()).floor() as usize).min(UNITS.len() - 1);
    let value = bytes as f64 / 1024f64.powi(exp as i32);
    let mut formatted = format!("{value:.2}");
    if formatted.contains('.') {
        while formatted.ends_with('0') {
            formatted.pop();
        }
        if formatted.ends_with('.') {
            formatted.pop();
        }
    }
    format!("{} {}", formatted, UNITS[exp])
}
