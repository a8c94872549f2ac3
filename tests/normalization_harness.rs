#![allow(unused)]
//! Normalizer integration harness.
//!
//! # What this covers
//!
//! - **Provider aliases**: spelling variants of known providers collapse to
//!   one canonical name; blank and sentinel values become `OTROS`.
//! - **Machine fallback**: blank, sentinel and "no machine" values become
//!   `BIBLIOTECA GENERAL`.
//! - **Service tags**: delimiter splitting, the jammed-words heuristic,
//!   synonym mapping, dedup and ascending order.
//! - **Idempotence** (proptest): feeding any normalizer output back in
//!   returns it unchanged, for arbitrary input text.
//! - **Record level**: `Part::normalized` keeps records canonical.
//!
//! # What this does NOT cover
//!
//! - Coercion of wrongly typed raw JSON values (see catalog_harness)
//! - Search behaviour over normalized records (see search_harness)
//!
//! # Running
//!
//! ```sh
//! cargo test --test normalization_harness
//! cargo test --test normalization_harness -- --nocapture
//! # Update snapshots after intentional changes:
//! cargo insta review
//! ```

mod common;
use common::*;
use eir_core::normalizer::{
    clear_sentinel, normalize_code, normalize_machine, normalize_provider, normalize_service,
    normalize_services, NO_MACHINE, OTHER_PROVIDER,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

// ---------------------------------------------------------------------------
// Providers
// ---------------------------------------------------------------------------

#[rstest]
#[case::nan("nan")]
#[case::nan_upper("NaN")]
#[case::empty("")]
#[case::blank("  ")]
fn provider_sentinels_become_other(#[case] raw: &str) {
    assert_eq!(normalize_provider(raw), OTHER_PROVIDER);
}

#[rstest]
#[case::with_suffix("One Direct S.L.")]
#[case::no_space("onedirect comunicaciones")]
#[case::lowercase("one direct")]
#[case::padded("  ONE  DIRECT  ")]
fn one_direct_variants_collapse(#[case] raw: &str) {
    assert_eq!(normalize_provider(raw), "ONE DIRECT COMUNICACIONES SL");
}

#[test]
fn unknown_provider_is_trimmed_and_uppercased() {
    assert_eq!(normalize_provider("  Dräger Medical "), "DRÄGER MEDICAL");
}

// ---------------------------------------------------------------------------
// Machines
// ---------------------------------------------------------------------------

#[rstest]
#[case::absent(None)]
#[case::empty(Some(""))]
#[case::blank(Some("   "))]
#[case::nan(Some("nan"))]
#[case::mangled_no_machine(Some("Sin M√°quina"))]
fn machine_fallback(#[case] raw: Option<&str>) {
    assert_eq!(normalize_machine(raw), NO_MACHINE);
}

#[test]
fn named_machine_is_uppercased() {
    assert_eq!(normalize_machine(Some(" Monitor MX450")), "MONITOR MX450");
}

// ---------------------------------------------------------------------------
// Services
// ---------------------------------------------------------------------------

#[rstest]
#[case::dedup_sort("uci, UCI, Quirofano", &["QUIROFANO", "UCI"])]
#[case::urg("urg", &["URGENCIAS"])]
#[case::urgencias("URGENCIAS", &["URGENCIAS"])]
#[case::ext("ext", &["CONSULTAS EXTERNAS"])]
#[case::externa("Externa", &["CONSULTAS EXTERNAS"])]
#[case::mixed_delimiters("uci/urg;  quirofano", &["QUIROFANO", "UCI", "URGENCIAS"])]
#[case::jammed_words("URGENCIAS UCI REANIMACION", &["REANIMACION", "UCI", "URGENCIAS"])]
#[case::short_words_kept_whole("UCI 2", &["UCI 2"])]
#[case::sentinel("NaN", &[])]
#[case::empty("", &[])]
fn service_tags(#[case] raw: &str, #[case] expected: &[&str]) {
    assert_eq!(normalize_service(raw), expected);
}

/// Known limitation: a genuine two-word tag is split like jammed tags.
#[test]
fn two_word_tag_is_split() {
    assert_eq!(normalize_service("SALA OPERACIONES"), vec!["OPERACIONES", "SALA"]);
}

#[test]
fn services_union_across_values() {
    let tags = normalize_services(["uci", "urg, UCI", "nan", "ext"]);
    insta::assert_snapshot!(tags.join("\n"), @r"
    CONSULTAS EXTERNAS
    UCI
    URGENCIAS
    ");
}

// ---------------------------------------------------------------------------
// Sentinels and codes
// ---------------------------------------------------------------------------

#[rstest]
#[case::nan("NaN", None)]
#[case::padded_nan(" nan ", None)]
#[case::blank("  ", None)]
#[case::value(" 8000-0294 ", Some("8000-0294"))]
#[case::contains_nan("Banana", Some("Banana"))]
fn sentinel_clearing(#[case] raw: &str, #[case] expected: Option<&str>) {
    assert_eq!(clear_sentinel(raw), expected);
}

#[test]
fn codes_are_uppercased() {
    assert_eq!(normalize_code(Some("ma-1181")), "MA-1181");
    assert_eq!(normalize_code(Some("NaN")), "");
    assert_eq!(normalize_code(None), "");
}

// ---------------------------------------------------------------------------
// Record level
// ---------------------------------------------------------------------------

#[test]
fn scenario_record_normalizes() {
    let part = scenario_part().normalized();
    assert_eq!(part.provider, "ONE DIRECT COMUNICACIONES SL");
    assert_eq!(part.machine, NO_MACHINE);
    assert_eq!(part.services, vec!["UCI"]);
    assert_canonical(&part);
}

#[test]
fn generated_catalog_normalizes_to_canonical_form() {
    for part in build_catalog(200) {
        assert_canonical(&part.normalized());
    }
}

// ---------------------------------------------------------------------------
// Idempotence
// ---------------------------------------------------------------------------

fn messy_text() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("NaN".to_string()),
        Just(String::new()),
        "[a-zA-Záéíóúñ ,/;]{0,40}",
        concat!(
            "(uci|urg|ext|externa|nan|quirofano|one direct|sin m√°quina)",
            "([ ,;/]{1,2}(uci|urg|ext|sala|operaciones)){0,3}",
        ),
    ]
}

proptest! {
    #[test]
    fn provider_is_idempotent(raw in messy_text()) {
        let once = normalize_provider(&raw);
        prop_assert_eq!(normalize_provider(&once), once);
    }

    #[test]
    fn machine_is_idempotent(raw in messy_text()) {
        let once = normalize_machine(Some(&raw));
        prop_assert_eq!(normalize_machine(Some(&once)), once);
    }

    #[test]
    fn services_are_idempotent(raw in messy_text()) {
        let once = normalize_service(&raw);
        prop_assert_eq!(normalize_services(&once), once.clone());
        let mut sorted = once.clone();
        sorted.sort();
        sorted.dedup();
        prop_assert_eq!(sorted, once);
    }
}
