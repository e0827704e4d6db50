//! # Domain Model: Documents, Categories, and the Undo Record
//!
//! The wire format matters here: collections are persisted as JSON arrays in
//! a browser-style key-value store, and other clients of that store read the
//! same keys. Field names are therefore camelCase and optional fields are
//! omitted rather than written as `null`.
//!
//! ## Payload representation
//!
//! A document's file body is a tagged variant rather than a bare
//! `Option<String>` plus a side flag:
//!
//! - [`Payload::Stored`] — the self-describing text payload produced by
//!   [`crate::codec::encode`].
//! - [`Payload::TooLargeToStore`] — the file existed but its body was
//!   dropped because it could not fit the quota (the undo ledger downgrades
//!   to this rather than losing the whole record).
//! - [`Payload::Absent`] — the document never had a file attached.
//!
//! On the wire this maps to the legacy `fileContent` / `fileTooLarge` pair,
//! handled by a helper struct conversion so old data loads unchanged.

use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: Uuid,
    pub title: String,
    /// Slug referencing [`Category::category`]. Dangling references are
    /// tolerated; clients render the raw slug as plain text.
    pub category: String,
    pub upload_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    #[serde(flatten)]
    pub payload: Payload,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Document {
    pub fn new(title: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            category: category.into(),
            upload_date: Utc::now(),
            expiry_date: None,
            file_name: None,
            file_type: None,
            payload: Payload::Absent,
            notes: None,
        }
    }

    /// Attach an encoded file payload along with its source name and MIME type.
    pub fn with_file(
        mut self,
        file_name: impl Into<String>,
        file_type: impl Into<String>,
        payload: String,
    ) -> Self {
        self.file_name = Some(file_name.into());
        self.file_type = Some(file_type.into());
        self.payload = Payload::Stored(payload);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_expiry(mut self, expiry: NaiveDate) -> Self {
        self.expiry_date = Some(expiry);
        self
    }

    /// A document expires strictly after its expiry date passes: a document
    /// expiring today is still valid.
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiry_date.is_some_and(|d| d < today)
    }

    /// True when the expiry date falls within the next `days` days
    /// (inclusive), counted from `today`. Already-expired documents report
    /// false; they are a different client concern.
    pub fn expires_within(&self, days: i64, today: NaiveDate) -> bool {
        match self.expiry_date {
            Some(d) => d >= today && (d - today).num_days() <= days,
            None => false,
        }
    }
}

/// The file body of a document, if any.
///
/// Serialized through [`PayloadRepr`] for wire compatibility with the
/// `fileContent` / `fileTooLarge` field pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "PayloadRepr", into = "PayloadRepr")]
pub enum Payload {
    /// Self-describing text payload (see [`crate::codec`]).
    Stored(String),
    /// The file existed but its body was dropped to fit the quota.
    TooLargeToStore,
    /// No file attached.
    Absent,
}

impl Payload {
    pub fn is_stored(&self) -> bool {
        matches!(self, Payload::Stored(_))
    }

    pub fn stored(&self) -> Option<&str> {
        match self {
            Payload::Stored(text) => Some(text),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
struct PayloadRepr {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    file_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    file_too_large: Option<bool>,
}

impl From<PayloadRepr> for Payload {
    fn from(repr: PayloadRepr) -> Self {
        match (repr.file_content, repr.file_too_large) {
            (Some(text), _) => Payload::Stored(text),
            (None, Some(true)) => Payload::TooLargeToStore,
            _ => Payload::Absent,
        }
    }
}

impl From<Payload> for PayloadRepr {
    fn from(payload: Payload) -> Self {
        match payload {
            Payload::Stored(text) => PayloadRepr {
                file_content: Some(text),
                file_too_large: None,
            },
            Payload::TooLargeToStore => PayloadRepr {
                file_content: None,
                file_too_large: Some(true),
            },
            Payload::Absent => PayloadRepr {
                file_content: None,
                file_too_large: None,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Unique-ish slug; collisions are not rejected, lookup is first-match.
    pub category: String,
    pub name: String,
    pub color: String,
}

impl Category {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            category: slugify(&name),
            name,
            color: color.into(),
        }
    }
}

/// The most recently deleted document and where it sat in the collection.
/// Lives in the undo ledger's dedicated storage slots, never inside the
/// documents array.
#[derive(Debug, Clone, PartialEq)]
pub struct UndoRecord {
    pub document: Document,
    pub original_index: usize,
}

/// Lowercases, replaces runs of non-alphanumeric characters with a single
/// hyphen, and trims leading/trailing hyphens.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_sep = false;
    for ch in name.chars() {
        if ch.is_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('-');
            }
            pending_sep = false;
            for lower in ch.to_lowercase() {
                slug.push(lower);
            }
        } else {
            pending_sep = true;
        }
    }
    slug
}

static SEED_CATEGORIES: Lazy<Vec<Category>> = Lazy::new(|| {
    vec![
        Category::new("Identity", "blue"),
        Category::new("Financial", "green"),
        Category::new("Medical", "red"),
        Category::new("Insurance", "purple"),
        Category::new("Legal", "orange"),
        Category::new("Education", "teal"),
        Category::new("Other", "gray"),
    ]
});

/// The first-run category list. "No category data" is a valid initial state,
/// not an error; loads fall back to this.
pub fn seed_categories() -> Vec<Category> {
    SEED_CATEGORIES.clone()
}
