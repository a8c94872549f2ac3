//! eir: spare-parts catalog search.
//!
//! The binary wires the library layers together: `eir-feeds` fetches the raw
//! catalog, `eir-core` ingests and indexes it, and this crate owns the reload
//! orchestration and the HTTP query API so that integration tests can drive
//! them directly.
//!
//! # Architecture
//!
//! ```text
//! CatalogSource ──► reload::Reloader ──► IndexHandle ──► server (axum)
//!        ▲                                    │
//!  CatalogWatcher                          CLI queries
//! ```
//!
//! Queries never wait on a reload: they read whichever index snapshot is
//! published when they start.

pub mod reload;
pub mod server;

pub use reload::Reloader;
pub use server::{router, AppState, ScoredPart};
