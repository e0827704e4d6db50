//! # Docvault Architecture
//!
//! Docvault is a **UI-agnostic storage library** for a personal document
//! manager whose only durable home is a quota-limited, text-only key-value
//! store (the browser `localStorage` profile: string keys, string values,
//! ~5 MiB, UTF-16 accounting). The crate owns everything that makes that
//! constraint survivable; rendering, dialogs, and form wiring are clients.
//!
//! ## The layers
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  Catalog (catalog.rs)                                    │
//! │  - add / update / delete / restore / filter              │
//! │  - capacity check → mutate mirror → persist → roll back  │
//! └──────────────────────────────────────────────────────────┘
//!            │                │                 │
//!            ▼                ▼                 ▼
//! ┌───────────────┐ ┌────────────────┐ ┌──────────────────┐
//! │ Codec         │ │ Capacity       │ │ Undo Ledger      │
//! │ (codec.rs)    │ │ (capacity.rs)  │ │ (undo.rs)        │
//! └───────────────┘ └────────────────┘ └──────────────────┘
//!            │                │                 │
//!            └────────────────┼─────────────────┘
//!                             ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                  │
//! │  - StoragePort trait, startup probe                      │
//! │  - MemStore (in-memory, failure injection)               │
//! │  - document/category collection persistence              │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key principles
//!
//! - **Admission control, not rollback-by-default**: capacity is checked
//!   before every write. The store's own quota enforcement is a second
//!   line of defense, not the plan.
//! - **Write-through mirror**: the catalog's in-memory collections never
//!   diverge from the durable store from the caller's perspective — a
//!   failed durable write rolls the mirror back before the error returns.
//! - **Loads never throw**: missing or corrupt persisted state degrades to
//!   the empty collection or the category seed list.
//! - **Structured failures**: every component returns [`error::Result`];
//!   nothing panics or prints across the crate boundary.
//!
//! ## Module Overview
//!
//! - [`catalog`]: The orchestration facade — entry point for all operations
//! - [`codec`]: Binary file ⇄ self-describing text payload
//! - [`capacity`]: Occupancy tracking, admission checks, human sizes
//! - [`undo`]: Single-slot undo ledger for deletions
//! - [`store`]: Storage port, in-memory implementation, collection I/O
//! - [`model`]: Core data types (`Document`, `Payload`, `Category`)
//! - [`session`]: Session identity and key namespacing
//! - [`upload`]: Upload boundary validation
//! - [`config`]: Configurable limits
//! - [`error`]: Error types

pub mod capacity;
pub mod catalog;
pub mod codec;
pub mod config;
pub mod error;
pub mod model;
pub mod session;
pub mod store;
pub mod undo;
pub mod upload;
