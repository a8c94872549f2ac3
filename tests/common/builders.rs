//! Test builders: ergonomic constructors for `Part`, indexes and catalogs.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use eir_core::config::SearchConfig;
use eir_core::{Part, SearchIndex};
use fake::faker::company::en::CompanyName;
use fake::faker::lorem::en::Word;
use fake::Fake;

// ---------------------------------------------------------------------------
// PartBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`Part`] test fixtures.
///
/// Values are stored as given; `SearchIndex::build` normalizes them.
///
/// # Example
///
/// ```rust
/// let part = PartBuilder::new("7", "Sensor SpO2 Zoll")
///     .provider("one direct")
///     .services(["uci"])
///     .build();
/// ```
pub struct PartBuilder {
    part: Part,
}

impl PartBuilder {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            part: Part {
                id: id.into(),
                name: name.into(),
                ..Part::default()
            },
        }
    }

    pub fn common_name(mut self, value: impl Into<String>) -> Self {
        self.part.common_name = value.into();
        self
    }

    pub fn provider_ref(mut self, value: impl Into<String>) -> Self {
        self.part.provider_ref = value.into();
        self
    }

    pub fn provider(mut self, value: impl Into<String>) -> Self {
        self.part.provider = value.into();
        self
    }

    pub fn machine(mut self, value: impl Into<String>) -> Self {
        self.part.machine = value.into();
        self
    }

    pub fn services<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.part.services = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn price(mut self, value: impl Into<String>) -> Self {
        self.part.price = value.into();
        self
    }

    pub fn build(self) -> Part {
        self.part
    }
}

// ---------------------------------------------------------------------------
// Convenience constructors
// ---------------------------------------------------------------------------

/// A part with only an id and a name.
pub fn named_part(id: &str, name: &str) -> Part {
    PartBuilder::new(id, name).build()
}

/// Build an index with the default search configuration.
pub fn index_of(parts: Vec<Part>) -> SearchIndex {
    SearchIndex::build(parts, &SearchConfig::default())
}

/// Ids of `parts`, in order.
pub fn ids<'a, I>(parts: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Part>,
{
    parts.into_iter().map(|part| part.id.clone()).collect()
}

// ---------------------------------------------------------------------------
// Catalog helpers
// ---------------------------------------------------------------------------

const PROVIDERS: &[&str] = &["one direct", "Philips", "Dräger", "NaN", "", "survival s.l."];
const MACHINES: &[&str] = &["", "NaN", "Monitor MX450", "Respirador Evita", "Bomba Alaris"];
const SERVICES: &[&str] = &["uci", "urg", "Quirófano", "ext", "UCI, URG", "nan"];

/// Build a catalog of `n` parts mixing the messy values seen in production
/// with random words.
pub fn build_catalog(n: usize) -> Vec<Part> {
    (0..n)
        .map(|i| {
            let word: String = Word().fake();
            let company: String = CompanyName().fake();
            PartBuilder::new(i.to_string(), format!("{word} {i}"))
                .common_name(Word().fake::<String>())
                .provider_ref(format!("ref-{i:04}"))
                .provider(if i % 7 == 0 {
                    company
                } else {
                    PROVIDERS[i % PROVIDERS.len()].to_string()
                })
                .machine(MACHINES[i % MACHINES.len()])
                .services([SERVICES[i % SERVICES.len()]])
                .build()
        })
        .collect()
}
