//! Normalizer: maps inconsistently entered field values to canonical forms.
//!
//! Every function here is total and idempotent: any input maps to a defined
//! output, and feeding an output back in returns it unchanged. Records pass
//! through normalization on every reload and every edit, so both properties
//! are load-bearing.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use phf::phf_set;
use regex::Regex;

// ---------------------------------------------------------------------------
// Canonical values
// ---------------------------------------------------------------------------

/// Provider fallback for blank or sentinel values.
pub const OTHER_PROVIDER: &str = "OTROS";

/// Machine fallback: the part is not tied to a specific machine.
pub const NO_MACHINE: &str = "BIBLIOTECA GENERAL";

/// Canonical tag for the outpatient aliases (`EXT`, `EXTERNA`).
pub const OUTPATIENT_SERVICE: &str = "CONSULTAS EXTERNAS";

/// Canonical tag for the emergency aliases (`URG`).
pub const EMERGENCY_SERVICE: &str = "URGENCIAS";

/// Legacy null marker left behind by the spreadsheet migration.
const SENTINEL: &str = "NAN";

/// Substring → canonical provider, matched with whitespace removed so
/// "ONEDIRECT" and "ONE  DIRECT" hit too. Checked in order; first hit wins.
const PROVIDER_ALIASES: &[(&str, &str)] = &[
    ("ONEDIRECT", "ONE DIRECT COMUNICACIONES SL"),
    ("SURVIVAL", "SURVIVAL SOLUTIONS"),
];

/// Uppercased machine values meaning "no machine". The last entry is
/// "SIN MÁQUINA" after a UTF-8 → Mac Roman round trip.
static NO_MACHINE_ALIASES: phf::Set<&'static str> = phf_set! {
    "",
    "NAN",
    "SIN M√ÅQUINA",
};

static OUTPATIENT_ALIASES: phf::Set<&'static str> = phf_set! {
    "CONSULTAS EXTERNAS",
    "EXTERNA",
    "EXT",
};

static EMERGENCY_ALIASES: phf::Set<&'static str> = phf_set! {
    "URG",
    "URGENCIAS",
};

static SERVICE_DELIMITERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,/;]+").expect("service delimiter pattern is valid"));

// ---------------------------------------------------------------------------
// Sentinel handling
// ---------------------------------------------------------------------------

/// Translate a raw string to an optional value: blank strings and the `"NaN"`
/// sentinel (any case) are absent. Returns the trimmed value otherwise.
pub fn clear_sentinel(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(SENTINEL) {
        None
    } else {
        Some(trimmed)
    }
}

/// Reference codes: sentinel-cleared, trimmed, uppercase.
pub fn normalize_code(raw: Option<&str>) -> String {
    raw.and_then(clear_sentinel)
        .map(str::to_uppercase)
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Provider / machine
// ---------------------------------------------------------------------------

/// Canonical provider name.
///
/// Known spelling variants collapse to one form; blank and sentinel values
/// become [`OTHER_PROVIDER`].
pub fn normalize_provider(raw: &str) -> String {
    let upper = raw.trim().to_uppercase();
    let compact: String = upper.chars().filter(|c| !c.is_whitespace()).collect();
    if let Some((_, canonical)) = PROVIDER_ALIASES
        .iter()
        .find(|(needle, _)| compact.contains(needle))
    {
        return (*canonical).to_string();
    }
    if upper.is_empty() || upper == SENTINEL {
        return OTHER_PROVIDER.to_string();
    }
    upper
}

/// Canonical machine name, or [`NO_MACHINE`] when the record is not
/// machine-specific.
pub fn normalize_machine(raw: Option<&str>) -> String {
    let upper = raw.unwrap_or_default().trim().to_uppercase();
    if NO_MACHINE_ALIASES.contains(upper.as_str()) {
        return NO_MACHINE.to_string();
    }
    upper
}

// ---------------------------------------------------------------------------
// Services
// ---------------------------------------------------------------------------

/// Canonical service tags for one raw value, sorted and deduplicated.
///
/// The raw value may itself be a list delimited by `,`, `/` or `;`. A part
/// holding several space-separated words longer than two characters is read
/// as several tags jammed into one field ("URGENCIAS UCI"). This also splits
/// genuine multi-word tags such as "SALA OPERACIONES".
pub fn normalize_service(raw: &str) -> Vec<String> {
    let mut tags = BTreeSet::new();
    collect_service_tags(raw, &mut tags);
    tags.into_iter().collect()
}

/// Union of [`normalize_service`] over several raw values.
pub fn normalize_services<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut tags = BTreeSet::new();
    for value in values {
        collect_service_tags(value.as_ref(), &mut tags);
    }
    tags.into_iter().collect()
}

fn collect_service_tags(raw: &str, tags: &mut BTreeSet<String>) {
    let input = raw.to_uppercase();
    let input = input.trim();
    if input.is_empty() || input == SENTINEL {
        return;
    }

    for part in SERVICE_DELIMITERS.split(input).map(str::trim) {
        if OUTPATIENT_ALIASES.contains(part) {
            tags.insert(OUTPATIENT_SERVICE.to_string());
            continue;
        }

        if part.contains(char::is_whitespace) {
            let words: Vec<&str> = part
                .split_whitespace()
                .filter(|word| word.chars().count() > 2)
                .collect();
            if words.len() > 1 {
                for word in words {
                    if let Some(tag) = canonical_service_word(word) {
                        tags.insert(tag);
                    }
                }
                continue;
            }
        }

        if let Some(tag) = canonical_service_word(part) {
            tags.insert(tag);
        }
    }
}

/// A single, already split service token. `None` for blanks and the sentinel.
fn canonical_service_word(word: &str) -> Option<String> {
    if word.is_empty() || word == SENTINEL {
        None
    } else if EMERGENCY_ALIASES.contains(word) {
        Some(EMERGENCY_SERVICE.to_string())
    } else if OUTPATIENT_ALIASES.contains(word) {
        Some(OUTPATIENT_SERVICE.to_string())
    } else {
        Some(word.to_string())
    }
}
