//! # Storage Layer
//!
//! A single injected port is the only way the crate touches durable state.
//! The [`StoragePort`] trait models a browser-style text key-value store:
//! string keys, string values, a finite quota enforced by the store itself
//! as a last line of defense.
//!
//! Layering:
//!
//! - [`port`] — the `StoragePort` trait and the startup availability probe.
//! - [`memory`] — `MemStore`, an in-memory port with failure injection,
//!   used throughout the test suite and by embedders that want a volatile
//!   vault.
//! - [`documents`] — load/save of the Document and Category collections,
//!   with capacity pre-checks and corruption-tolerant loads.
//!
//! Everything takes `&self`; implementations use interior mutability. The
//! vault is single-threaded by construction (one session owns one store),
//! so there is no locking anywhere in this layer.

pub mod documents;
pub mod memory;
pub mod port;

pub use documents::{load_categories, load_documents, save_categories, save_documents};
pub use memory::MemStore;
pub use port::{probe, StoragePort};
