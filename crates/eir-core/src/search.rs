//! Search layer: weighted fuzzy search over one immutable catalog snapshot.
//!
//! A [`SearchIndex`] is built wholesale from canonical records and never
//! mutated afterwards. Rebuilding means constructing a new index and
//! publishing it through [`crate::store::IndexHandle`].
//!
//! Scoring follows the usual weighted fuzzy-search scheme: each searched field
//! yields a score in `0.0..=1.0` (`0.0` is an exact occurrence), and a
//! record's score is the product over matched fields of
//! `score ^ (weight * field_norm)`. Lower is better.

use std::collections::HashMap;
use std::time::Instant;

use chrono::{DateTime, Utc};

use crate::config::{FieldWeights, SearchConfig};
use crate::facets::{FacetFilter, Facets};
use crate::matcher::{FoldedText, MatchOptions, Pattern};
use crate::types::{FacetKind, Part};

/// Fields searched by free-text queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchField {
    Name,
    CommonName,
    ProviderRef,
    Provider,
    Machine,
}

impl SearchField {
    pub const ALL: [SearchField; 5] = [
        SearchField::Name,
        SearchField::CommonName,
        SearchField::ProviderRef,
        SearchField::Provider,
        SearchField::Machine,
    ];

    pub fn value(self, part: &Part) -> &str {
        match self {
            SearchField::Name => &part.name,
            SearchField::CommonName => &part.common_name,
            SearchField::ProviderRef => &part.provider_ref,
            SearchField::Provider => &part.provider,
            SearchField::Machine => &part.machine,
        }
    }

    fn weight(self, weights: &FieldWeights) -> f64 {
        match self {
            SearchField::Name => weights.name,
            SearchField::CommonName => weights.common_name,
            SearchField::ProviderRef => weights.provider_ref,
            SearchField::Provider => weights.provider,
            SearchField::Machine => weights.machine,
        }
    }
}

/// Lifecycle of an index value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexState {
    /// Never built. Every query returns nothing.
    Empty,
    /// Built from a catalog snapshot, possibly with zero records.
    Ready,
}

/// One ranked search result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchHit<'a> {
    pub part: &'a Part,
    /// `0.0` for a perfect match (and for every record of a browse-all
    /// query), approaching `1.0` as the match weakens.
    pub score: f64,
}

/// Weighted fuzzy index over one catalog snapshot.
#[derive(Debug)]
pub struct SearchIndex {
    state: IndexState,
    parts: Vec<Part>,
    fields: Vec<[FoldedText; 5]>,
    by_id: HashMap<String, usize>,
    facets: Facets,
    /// Field weights scaled to sum to 1, in [`SearchField::ALL`] order.
    weights: [f64; 5],
    options: MatchOptions,
    built_at: Option<DateTime<Utc>>,
}

impl Default for SearchIndex {
    fn default() -> Self {
        Self::empty()
    }
}

impl SearchIndex {
    /// The never-built index.
    pub fn empty() -> Self {
        let config = SearchConfig::default();
        Self {
            state: IndexState::Empty,
            parts: Vec::new(),
            fields: Vec::new(),
            by_id: HashMap::new(),
            facets: Facets::default(),
            weights: normalized_weights(&config.weights),
            options: MatchOptions::from(&config),
            built_at: None,
        }
    }

    /// Build an index over `records`.
    ///
    /// Records are re-normalized on the way in and records without a usable
    /// name are dropped, so the index invariants hold whatever the caller
    /// passes. Catalog order is preserved and breaks score ties.
    pub fn build<I>(records: I, config: &SearchConfig) -> Self
    where
        I: IntoIterator<Item = Part>,
    {
        let started = Instant::now();
        let mut dropped = 0usize;
        let parts: Vec<Part> = records
            .into_iter()
            .map(Part::normalized)
            .filter(|part| {
                let keep = part.is_indexable();
                if !keep {
                    dropped += 1;
                }
                keep
            })
            .collect();

        let max_chars = config.max_field_chars.max(1);
        let fields = parts
            .iter()
            .map(|part| SearchField::ALL.map(|field| FoldedText::new(field.value(part), max_chars)))
            .collect();

        let mut by_id = HashMap::with_capacity(parts.len());
        for (position, part) in parts.iter().enumerate() {
            if by_id.insert(part.id.clone(), position).is_some() {
                tracing::debug!(id = %part.id, "duplicate part id; lookups return the last record");
            }
        }

        let facets = Facets::from_parts(&parts);

        tracing::info!(
            records = parts.len(),
            dropped,
            providers = facets.len(FacetKind::Provider),
            machines = facets.len(FacetKind::Machine),
            services = facets.len(FacetKind::Service),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "search index built"
        );

        Self {
            state: IndexState::Ready,
            parts,
            fields,
            by_id,
            facets,
            weights: normalized_weights(&config.weights),
            options: MatchOptions::from(config),
            built_at: Some(Utc::now()),
        }
    }

    pub fn state(&self) -> IndexState {
        self.state
    }

    pub fn built_at(&self) -> Option<DateTime<Utc>> {
        self.built_at
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Every indexed record in catalog order.
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn get(&self, id: &str) -> Option<&Part> {
        self.by_id.get(id).map(|&position| &self.parts[position])
    }

    pub fn facets(&self) -> &Facets {
        &self.facets
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Records matching `query`, best first.
    ///
    /// A blank query browses: it returns the whole catalog in catalog order.
    pub fn search(&self, query: &str) -> Vec<&Part> {
        self.search_hits(query).into_iter().map(|hit| hit.part).collect()
    }

    /// Like [`SearchIndex::search`], keeping each record's score.
    pub fn search_hits(&self, query: &str) -> Vec<SearchHit<'_>> {
        if self.state == IndexState::Empty {
            return Vec::new();
        }
        if query.trim().is_empty() {
            return self
                .parts
                .iter()
                .map(|part| SearchHit { part, score: 0.0 })
                .collect();
        }
        let Some(pattern) = Pattern::new(query, self.options) else {
            return Vec::new();
        };

        let started = Instant::now();
        let mut hits: Vec<SearchHit<'_>> = self
            .parts
            .iter()
            .zip(&self.fields)
            .filter_map(|(part, fields)| {
                self.score_record(&pattern, fields)
                    .map(|score| SearchHit { part, score })
            })
            .collect();
        // Stable: equal scores keep catalog order.
        hits.sort_by(|a, b| a.score.total_cmp(&b.score));

        tracing::debug!(
            query,
            hits = hits.len(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "search"
        );
        hits
    }

    /// Free-text search followed by exact-match facet filtering.
    pub fn search_filtered(&self, query: &str, filter: &FacetFilter) -> Vec<SearchHit<'_>> {
        let mut hits = self.search_hits(query);
        if !filter.is_empty() {
            hits.retain(|hit| filter.matches(hit.part));
        }
        hits
    }

    fn score_record(&self, pattern: &Pattern, fields: &[FoldedText; 5]) -> Option<f64> {
        let mut total = 1.0;
        let mut matched = false;
        for (field, weight) in fields.iter().zip(self.weights) {
            if let Some(score) = pattern.score(field) {
                matched = true;
                total *= score.max(f64::EPSILON).powf(weight * field.norm());
            }
        }
        matched.then_some(total)
    }

    // -----------------------------------------------------------------------
    // Facets
    // -----------------------------------------------------------------------

    /// Unique non-empty providers, ascending.
    pub fn distinct_providers(&self) -> Vec<String> {
        self.facets.values(FacetKind::Provider)
    }

    /// Unique machines, ascending, without the "no machine" fallback.
    pub fn distinct_machines(&self) -> Vec<String> {
        self.facets.values(FacetKind::Machine)
    }

    /// Union of every record's service tags, ascending.
    pub fn distinct_services(&self) -> Vec<String> {
        self.facets.values(FacetKind::Service)
    }
}

fn normalized_weights(weights: &FieldWeights) -> [f64; 5] {
    let raw = SearchField::ALL.map(|field| field.weight(weights).max(0.0));
    let total: f64 = raw.iter().sum();
    if total <= 0.0 {
        return [1.0 / raw.len() as f64; 5];
    }
    raw.map(|weight| weight / total)
}
