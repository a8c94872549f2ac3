//! Shared test utilities for eir integration harnesses.
//!
//! Import everything you need via `mod common; use common::*;` at the top of
//! each harness file. Builders produce canonical `Part`s directly; fixtures
//! hold raw catalog documents as they arrive from the data source.

pub mod assertions;
pub mod builders;
pub mod fixtures;

pub use assertions::*;
pub use builders::*;
pub use fixtures::*;
