//! Catalog ingestion: untrusted JSON in, canonical [`Part`]s out.
//!
//! The raw catalog has no schema guarantee. Ingestion never fails: a
//! non-array document is an empty catalog, non-object entries are skipped,
//! wrongly typed scalars are coerced to text, and the legacy `"NaN"` sentinel
//! becomes an absent value at this boundary. What was skipped or repaired is
//! counted in an [`IngestReport`].

use std::collections::HashSet;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::normalizer::{self, clear_sentinel};
use crate::types::{Part, ProductVariant};

/// Raw fields read as text. An object in one of these is reported.
const TEXT_FIELDS: &[&str] = &[
    "id",
    "name",
    "commonName",
    "providerRef",
    "internalCode",
    "contact",
    "provider",
    "machine",
    "price",
    "category",
    "imageFile",
    "thumbnailUrl",
];

/// Canonical records plus what happened to the rest.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub parts: Vec<Part>,
    pub report: IngestReport,
}

/// Counters describing one ingestion pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    /// Entries in the raw document (0 if it was not an array).
    pub received: usize,
    pub accepted: usize,
    pub skipped_non_object: usize,
    pub dropped_without_name: usize,
    /// Records whose id was missing or duplicated and got a positional one.
    pub reassigned_ids: usize,
    /// Nested objects found where text was expected.
    pub complex_fields: usize,
    /// The top-level document was not an array.
    pub not_an_array: bool,
}

/// Turn a raw catalog document into canonical records.
pub fn ingest(raw: &Value) -> Catalog {
    let mut report = IngestReport::default();
    let Some(entries) = raw.as_array() else {
        tracing::warn!(
            kind = value_kind(raw),
            "raw catalog is not an array; using an empty catalog"
        );
        report.not_an_array = true;
        return Catalog { parts: Vec::new(), report };
    };

    report.received = entries.len();
    let mut seen_ids = HashSet::with_capacity(entries.len());
    let mut parts = Vec::with_capacity(entries.len());

    for (position, entry) in entries.iter().enumerate() {
        let Some(record) = entry.as_object() else {
            report.skipped_non_object += 1;
            tracing::warn!(position, kind = value_kind(entry), "skipping non-object catalog entry");
            continue;
        };

        report.complex_fields += count_complex_fields(position, record);

        let Some(mut part) = canonical_part(record) else {
            report.dropped_without_name += 1;
            tracing::warn!(position, "dropping catalog entry without a name");
            continue;
        };

        if part.id.is_empty() || seen_ids.contains(&part.id) {
            let id = positional_id(position, &seen_ids);
            tracing::debug!(position, old = %part.id, new = %id, "reassigning part id");
            part.id = id;
            report.reassigned_ids += 1;
        }
        seen_ids.insert(part.id.clone());
        parts.push(part);
    }

    report.accepted = parts.len();
    tracing::info!(
        received = report.received,
        accepted = report.accepted,
        skipped = report.skipped_non_object,
        dropped = report.dropped_without_name,
        reassigned_ids = report.reassigned_ids,
        complex_fields = report.complex_fields,
        "catalog ingested"
    );
    Catalog { parts, report }
}

/// Canonicalize one raw record. `None` when it has no usable name.
pub fn canonical_part(record: &Map<String, Value>) -> Option<Part> {
    let name = text(record, "name")?;

    Some(Part {
        id: text(record, "id").unwrap_or_default(),
        name,
        common_name: text(record, "commonName").unwrap_or_default(),
        provider_ref: normalizer::normalize_code(text(record, "providerRef").as_deref()),
        internal_code: normalizer::normalize_code(text(record, "internalCode").as_deref()),
        contact: text(record, "contact").unwrap_or_default(),
        provider: normalizer::normalize_provider(
            &coerce(record.get("provider")).unwrap_or_default(),
        ),
        machine: normalizer::normalize_machine(coerce(record.get("machine")).as_deref()),
        services: services(record.get("services")),
        price: text(record, "price").unwrap_or_default(),
        category: text(record, "category")
            .map(|c| c.to_uppercase())
            .unwrap_or_default(),
        image_file: text(record, "imageFile").unwrap_or_default(),
        additional_images: string_list(record.get("additionalImages")),
        thumbnail_url: text(record, "thumbnailUrl"),
        variants: variants(record.get("variants")),
    })
}

// ---------------------------------------------------------------------------
// Field coercion
// ---------------------------------------------------------------------------

/// String form of a scalar: numbers in decimal, booleans as words, arrays
/// joined with commas. Null, missing and objects have none.
fn coerce(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => {
            let joined: Vec<String> = items.iter().filter_map(|v| coerce(Some(v))).collect();
            Some(joined.join(","))
        }
        Value::Null | Value::Object(_) => None,
    }
}

/// Coerced, trimmed, sentinel-cleared text.
fn text(record: &Map<String, Value>, key: &str) -> Option<String> {
    coerce(record.get(key))
        .as_deref()
        .and_then(clear_sentinel)
        .map(str::to_string)
}

fn services(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => {
            normalizer::normalize_services(items.iter().filter_map(|v| match v {
                Value::String(_) | Value::Number(_) => coerce(Some(v)),
                _ => None,
            }))
        }
        Some(Value::String(s)) => normalizer::normalize_service(s),
        _ => Vec::new(),
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .filter_map(clear_sentinel)
            .map(str::to_string)
            .collect(),
        Some(Value::String(s)) => clear_sentinel(s).map(str::to_string).into_iter().collect(),
        _ => Vec::new(),
    }
}

fn variants(value: Option<&Value>) -> Vec<ProductVariant> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| serde_json::from_value(item.clone()).ok())
        .collect()
}

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

fn count_complex_fields(position: usize, record: &Map<String, Value>) -> usize {
    TEXT_FIELDS
        .iter()
        .filter(|key| {
            let complex = record.get(**key).is_some_and(Value::is_object);
            if complex {
                tracing::warn!(
                    position,
                    field = **key,
                    "field holds an object where text was expected"
                );
            }
            complex
        })
        .count()
}

fn positional_id(position: usize, taken: &HashSet<String>) -> String {
    let base = format!("part-{position}");
    if !taken.contains(&base) {
        return base;
    }
    (1..)
        .map(|n| format!("{base}-{n}"))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or(base)
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
