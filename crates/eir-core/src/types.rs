//! Core types for eir-core.
//!
//! This module defines the data structures shared across all layers: the
//! canonical [`Part`] record produced by ingestion and held by the index, its
//! opaque [`ProductVariant`]s, and the [`FacetKind`] discriminant used by the
//! facet vocabularies and filters.

use serde::{Deserialize, Serialize};

use crate::normalizer;

/// A canonical spare-part record: the unit indexed and searched.
///
/// Produced by [`crate::catalog::ingest`] from untrusted raw values. Every
/// string field is present; absent values are the empty string or one of the
/// normalizer fallbacks, never the legacy `"NaN"` sentinel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Part {
    /// Opaque identifier, unique within one catalog snapshot.
    pub id: String,
    /// Display name. Never empty for an indexed record.
    pub name: String,
    /// Descriptive alias, empty if absent.
    pub common_name: String,
    /// Provider's own reference code, uppercase.
    pub provider_ref: String,
    /// Internal inventory code, uppercase.
    pub internal_code: String,
    /// Provider contact line.
    pub contact: String,
    /// Canonical provider name, see [`normalizer::normalize_provider`].
    pub provider: String,
    /// Canonical machine name or [`normalizer::NO_MACHINE`].
    pub machine: String,
    /// Canonical service tags: unique, sorted ascending, uppercase.
    pub services: Vec<String>,
    pub price: String,
    /// Purchasing category, uppercase.
    pub category: String,
    pub image_file: String,
    pub additional_images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<ProductVariant>,
}

impl Part {
    /// Re-apply every canonicalization rule to this record.
    ///
    /// All rules are idempotent, so running this on an already canonical
    /// record is a no-op.
    pub fn normalized(mut self) -> Self {
        self.id = self.id.trim().to_string();
        self.name = self.name.trim().to_string();
        self.common_name = normalizer::clear_sentinel(&self.common_name)
            .unwrap_or_default()
            .to_string();
        self.provider_ref = normalizer::normalize_code(Some(&self.provider_ref));
        self.internal_code = normalizer::normalize_code(Some(&self.internal_code));
        self.provider = normalizer::normalize_provider(&self.provider);
        self.machine = normalizer::normalize_machine(Some(&self.machine));
        self.services = normalizer::normalize_services(&self.services);
        self.category = self.category.trim().to_uppercase();
        self
    }

    /// Whether this record may be indexed.
    pub fn is_indexable(&self) -> bool {
        let name = self.name.trim();
        !name.is_empty() && normalizer::clear_sentinel(name).is_some()
    }
}

/// A purchasable variant of a part. Carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductVariant {
    pub id: String,
    pub name: String,
    pub internal_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
}

/// A filterable catalog dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacetKind {
    Provider,
    Machine,
    Service,
}

impl FacetKind {
    pub const ALL: [FacetKind; 3] = [FacetKind::Provider, FacetKind::Machine, FacetKind::Service];
}

impl std::fmt::Display for FacetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FacetKind::Provider => write!(f, "provider"),
            FacetKind::Machine => write!(f, "machine"),
            FacetKind::Service => write!(f, "service"),
        }
    }
}

impl std::str::FromStr for FacetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "provider" | "providers" => Ok(FacetKind::Provider),
            "machine" | "machines" => Ok(FacetKind::Machine),
            "service" | "services" => Ok(FacetKind::Service),
            other => Err(format!("unknown facet kind {other:?}")),
        }
    }
}
