//! Facet vocabularies and exact-match facet filters.
//!
//! Each vocabulary is an FST set built from the canonical values of one
//! [`FacetKind`]. FST sets are sorted and deduplicated by construction, which
//! is exactly the order the facet UI lists them in. Because the values are
//! taken verbatim from the indexed records, every listed value equal-matches
//! at least one record.

use std::collections::BTreeSet;

use fst::automaton::Str;
use fst::{Automaton, IntoStreamer, Set};
use serde::{Deserialize, Serialize};

use crate::normalizer::NO_MACHINE;
use crate::types::{FacetKind, Part};

/// The three facet vocabularies of one index snapshot.
#[derive(Debug, Default)]
pub struct Facets {
    providers: Set<Vec<u8>>,
    machines: Set<Vec<u8>>,
    services: Set<Vec<u8>>,
}

impl Facets {
    pub fn from_parts(parts: &[Part]) -> Self {
        let providers = parts.iter().map(|p| p.provider.as_str());
        let machines = parts
            .iter()
            .map(|p| p.machine.as_str())
            .filter(|m| *m != NO_MACHINE);
        let services = parts
            .iter()
            .flat_map(|p| p.services.iter().map(String::as_str));

        Self {
            providers: vocabulary(providers),
            machines: vocabulary(machines),
            services: vocabulary(services),
        }
    }

    fn set(&self, kind: FacetKind) -> &Set<Vec<u8>> {
        match kind {
            FacetKind::Provider => &self.providers,
            FacetKind::Machine => &self.machines,
            FacetKind::Service => &self.services,
        }
    }

    /// All values of `kind`, ascending.
    pub fn values(&self, kind: FacetKind) -> Vec<String> {
        self.set(kind).stream().into_strs().unwrap_or_default()
    }

    pub fn len(&self, kind: FacetKind) -> usize {
        self.set(kind).len()
    }

    /// Exact membership. Facet values are compared as stored, uppercase.
    pub fn contains(&self, kind: FacetKind, value: &str) -> bool {
        self.set(kind).contains(value)
    }

    /// Values of `kind` starting with `prefix` (compared uppercase).
    pub fn with_prefix(&self, kind: FacetKind, prefix: &str) -> Vec<String> {
        let prefix = prefix.trim().to_uppercase();
        let matcher = Str::new(&prefix).starts_with();
        self.set(kind)
            .search(matcher)
            .into_stream()
            .into_strs()
            .unwrap_or_default()
    }

    /// Type-ahead suggestions: values containing `term`, case-insensitively.
    /// A blank term returns every value.
    pub fn suggest(&self, kind: FacetKind, term: &str) -> Vec<String> {
        let term = term.trim().to_lowercase();
        let values = self.values(kind);
        if term.is_empty() {
            return values;
        }
        values
            .into_iter()
            .filter(|value| value.to_lowercase().contains(&term))
            .collect()
    }
}

fn vocabulary<'a>(values: impl Iterator<Item = &'a str>) -> Set<Vec<u8>> {
    let sorted: BTreeSet<&str> = values.filter(|v| !v.is_empty()).collect();
    // BTreeSet<&str> iterates in byte order, which is what the FST builder requires.
    Set::from_iter(sorted).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// FacetFilter
// ---------------------------------------------------------------------------

/// Exact-match predicates applied after a free-text search.
///
/// Blank values are treated as "no filter", so `?provider=` from a query
/// string behaves like an absent parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetFilter {
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub machine: Option<String>,
    #[serde(default)]
    pub service: Option<String>,
}

impl FacetFilter {
    pub fn provider(mut self, value: impl Into<String>) -> Self {
        self.provider = Some(value.into());
        self
    }

    pub fn machine(mut self, value: impl Into<String>) -> Self {
        self.machine = Some(value.into());
        self
    }

    pub fn service(mut self, value: impl Into<String>) -> Self {
        self.service = Some(value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        active(&self.provider).is_none()
            && active(&self.machine).is_none()
            && active(&self.service).is_none()
    }

    pub fn matches(&self, part: &Part) -> bool {
        active(&self.provider).map_or(true, |p| part.provider == p)
            && active(&self.machine).map_or(true, |m| part.machine == m)
            && active(&self.service).map_or(true, |s| part.services.iter().any(|t| t == s))
    }

    /// Keep the parts matching every active predicate, preserving order.
    pub fn apply<'a, I>(&self, parts: I) -> Vec<&'a Part>
    where
        I: IntoIterator<Item = &'a Part>,
    {
        parts.into_iter().filter(|p| self.matches(p)).collect()
    }
}

fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
