//! eir-core: spare-parts catalog core library.
//!
//! This crate holds the normalization and search layers, plus the shared
//! types used across the workspace.
//!
//! # Architecture
//!
//! ```text
//! raw JSON ──► catalog::ingest ──► SearchIndex::build ──► IndexHandle::publish
//!                  │                                            │
//!              normalizer                          search / facets (readers)
//! ```
//!
//! Everything here is synchronous. Fetching the raw catalog lives in
//! `eir-feeds`; this crate only ever sees a `serde_json::Value`.

pub mod catalog;
pub mod config;
pub mod facets;
pub mod matcher;
pub mod normalizer;
pub mod search;
pub mod store;
pub mod types;

pub use catalog::{ingest, Catalog, IngestReport};
pub use facets::{FacetFilter, Facets};
pub use search::{IndexState, SearchField, SearchHit, SearchIndex};
pub use store::IndexHandle;
pub use types::{FacetKind, Part, ProductVariant};
