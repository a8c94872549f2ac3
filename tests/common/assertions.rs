//! Domain-specific assertion macros for eir harnesses.
//!
//! These wrap `pretty_assertions` and add context-rich failure messages that
//! make it clear *which* catalog invariant was violated.

use eir_core::normalizer::NO_MACHINE;
use eir_core::{Part, SearchIndex};

// ---------------------------------------------------------------------------
// Result assertions
// ---------------------------------------------------------------------------

/// Assert that a result list contains the part with the given id.
///
/// ```rust
/// assert_hit!(index.search("valvula"), "p-002");
/// ```
#[macro_export]
macro_rules! assert_hit {
    ($results:expr, $id:expr) => {{
        let results: Vec<&eir_core::Part> = $results;
        let id: &str = $id;
        if !results.iter().any(|part| part.id == id) {
            panic!(
                "assert_hit! failed: {:?} not among results.\n  got: {:?}",
                id,
                results.iter().map(|p| (&p.id, &p.name)).collect::<Vec<_>>()
            );
        }
    }};
}

/// Assert that a result list does not contain the part with the given id.
#[macro_export]
macro_rules! assert_no_hit {
    ($results:expr, $id:expr) => {{
        let results: Vec<&eir_core::Part> = $results;
        let id: &str = $id;
        if let Some(part) = results.iter().find(|part| part.id == id) {
            panic!("assert_no_hit! failed: {:?} ({:?}) was returned", id, part.name);
        }
    }};
}

/// Assert that the first result is the part with the given id.
#[macro_export]
macro_rules! assert_top_hit {
    ($results:expr, $id:expr) => {{
        let results: Vec<&eir_core::Part> = $results;
        let id: &str = $id;
        match results.first() {
            Some(part) if part.id == id => {}
            Some(part) => panic!(
                "assert_top_hit! failed:\n  expected: {:?}\n  actual:   {:?} ({:?})",
                id, part.id, part.name
            ),
            None => panic!("assert_top_hit! failed: no results, expected {:?}", id),
        }
    }};
}

// ---------------------------------------------------------------------------
// Canonical form helpers
// ---------------------------------------------------------------------------

/// Assert that `part` is in canonical form.
pub fn assert_canonical(part: &Part) {
    assert!(!part.name.trim().is_empty(), "indexed part has no name: {part:?}");
    assert!(!part.provider.is_empty(), "provider must never be empty: {part:?}");
    assert!(!part.machine.is_empty(), "machine must never be empty: {part:?}");
    assert_eq!(part.provider, part.provider.to_uppercase(), "provider not uppercase");
    assert_eq!(part.machine, part.machine.to_uppercase(), "machine not uppercase");

    let mut sorted = part.services.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(part.services, sorted, "services must be sorted and unique");
    for tag in &part.services {
        assert!(!tag.is_empty() && *tag == tag.to_uppercase(), "bad service tag {tag:?}");
        assert_ne!(tag, "NAN", "sentinel leaked into services");
    }
    for value in [&part.common_name, &part.provider_ref, &part.internal_code] {
        assert!(!value.eq_ignore_ascii_case("nan"), "sentinel leaked into {part:?}");
    }
    assert_eq!(&part.clone().normalized(), part, "normalization is not idempotent");
}

/// Assert the facet vocabularies are coherent with the indexed records.
pub fn assert_facets_coherent(index: &SearchIndex) {
    let providers = index.distinct_providers();
    for provider in &providers {
        assert!(
            index.parts().iter().any(|p| &p.provider == provider),
            "provider {provider:?} has no record"
        );
    }
    if !index.is_empty() {
        assert!(!providers.is_empty(), "a non-empty catalog has providers");
    }
    assert!(
        !index.distinct_machines().iter().any(|m| m == NO_MACHINE),
        "fallback machine leaked into the machine facet"
    );
}
