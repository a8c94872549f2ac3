//! Approximate substring matcher.
//!
//! Query and field text are folded (lowercased, diacritics stripped) and the
//! query is aligned against the best-matching substring of the field with a
//! Sellers edit-distance pass. The score of an alignment is
//! `errors / pattern_len`: `0.0` is an exact occurrence, anything above the
//! configured threshold is rejected. Match position inside the field does not
//! affect the score.
//!
//! Long queries are split into fixed-size chunks. A field matches when any
//! chunk matches; its score is the mean over all chunks, with unmatched chunks
//! counting as `1.0`.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::config::SearchConfig;

/// Lowercase `text` and strip combining marks, so "Válvula" and "valvula"
/// compare equal.
pub fn fold(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Tuning knobs for a match, derived from [`SearchConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchOptions {
    /// Highest accepted `errors / pattern_len`.
    pub threshold: f64,
    /// Shortest query, and shortest matched field span, in characters.
    pub min_match_chars: usize,
    /// Queries longer than this are chunked.
    pub max_pattern_chars: usize,
    /// Folded query text beyond this many characters is ignored.
    pub max_query_chars: usize,
}

impl From<&SearchConfig> for MatchOptions {
    fn from(config: &SearchConfig) -> Self {
        Self {
            threshold: config.threshold.clamp(0.0, 1.0),
            min_match_chars: config.min_match_chars.max(1),
            max_pattern_chars: config.max_pattern_chars.max(1),
            max_query_chars: config.max_query_chars.max(1),
        }
    }
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self::from(&SearchConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Field text
// ---------------------------------------------------------------------------

/// A field's folded text, prepared once at index build time.
#[derive(Debug, Clone, Default)]
pub struct FoldedText {
    text: String,
    chars: Vec<char>,
    /// Length norm `1 / sqrt(word_count)`; long fields weigh less.
    norm: f64,
}

impl FoldedText {
    /// Fold `raw`, keeping at most `max_chars` characters.
    pub fn new(raw: &str, max_chars: usize) -> Self {
        let chars: Vec<char> = fold(raw).chars().take(max_chars).collect();
        let text: String = chars.iter().collect();
        let words = text.split_whitespace().count().max(1);
        Self {
            norm: 1.0 / (words as f64).sqrt(),
            text,
            chars,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn norm(&self) -> f64 {
        self.norm
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

// ---------------------------------------------------------------------------
// Pattern
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct Chunk {
    text: String,
    chars: Vec<char>,
}

/// A folded, chunked query.
#[derive(Debug, Clone)]
pub struct Pattern {
    chunks: Vec<Chunk>,
    options: MatchOptions,
}

impl Pattern {
    /// Prepare `query` for matching. `None` when the folded, trimmed query is
    /// shorter than `min_match_chars`; such a query matches nothing.
    ///
    /// Only the first `max_query_chars` folded characters are kept, so the
    /// number of chunks scored per field is bounded.
    pub fn new(query: &str, options: MatchOptions) -> Option<Self> {
        let folded = fold(query.trim());
        let chars: Vec<char> = folded.chars().take(options.max_query_chars).collect();
        if chars.len() < options.min_match_chars {
            return None;
        }
        let chunks = chars
            .chunks(options.max_pattern_chars)
            .map(|chunk| Chunk {
                text: chunk.iter().collect(),
                chars: chunk.to_vec(),
            })
            .collect();
        Some(Self { chunks, options })
    }

    /// Characters of the query that take part in matching.
    pub fn char_count(&self) -> usize {
        self.chunks.iter().map(|chunk| chunk.chars.len()).sum()
    }

    /// Score this pattern against one field. `None` if no chunk matches.
    pub fn score(&self, field: &FoldedText) -> Option<f64> {
        if field.is_empty() {
            return None;
        }
        let mut matched = false;
        let mut total = 0.0;
        for chunk in &self.chunks {
            match self.score_chunk(chunk, field) {
                Some(score) => {
                    matched = true;
                    total += score;
                }
                None => total += 1.0,
            }
        }
        matched.then(|| total / self.chunks.len() as f64)
    }

    fn score_chunk(&self, chunk: &Chunk, field: &FoldedText) -> Option<f64> {
        if chunk.chars.len() >= self.options.min_match_chars && field.text.contains(&chunk.text) {
            return Some(0.0);
        }
        let len = chunk.chars.len() as f64;
        let max_errors = (self.options.threshold * len).floor() as usize;
        let alignment = best_alignment(&chunk.chars, &field.chars, self.options.min_match_chars)?;
        if alignment.errors > max_errors {
            return None;
        }
        let score = alignment.errors as f64 / len;
        (score <= self.options.threshold).then_some(score)
    }
}

// ---------------------------------------------------------------------------
// Sellers alignment
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Alignment {
    errors: usize,
    /// Number of field characters covered by the alignment.
    span: usize,
}

#[derive(Debug, Clone, Copy)]
struct Cell {
    cost: usize,
    start: usize,
}

/// Lowest edit distance between `pattern` and any substring of `text` that
/// spans at least `min_span` characters.
fn best_alignment(pattern: &[char], text: &[char], min_span: usize) -> Option<Alignment> {
    let m = pattern.len();
    if m == 0 || text.is_empty() {
        return None;
    }

    // prev[i]: cheapest alignment of pattern[..i] ending before the current
    // text position, plus the text index where it starts.
    let mut prev: Vec<Cell> = (0..=m).map(|i| Cell { cost: i, start: 0 }).collect();
    let mut cur = prev.clone();
    let mut best: Option<Alignment> = None;

    for (j, &tc) in text.iter().enumerate() {
        cur[0] = Cell { cost: 0, start: j + 1 };
        for i in 1..=m {
            let substitute = Cell {
                cost: prev[i - 1].cost + usize::from(pattern[i - 1] != tc),
                start: prev[i - 1].start,
            };
            let skip_text = Cell { cost: prev[i].cost + 1, start: prev[i].start };
            let skip_pattern = Cell { cost: cur[i - 1].cost + 1, start: cur[i - 1].start };

            let mut cell = substitute;
            if skip_text.cost < cell.cost {
                cell = skip_text;
            }
            if skip_pattern.cost < cell.cost {
                cell = skip_pattern;
            }
            cur[i] = cell;
        }

        let end = j + 1;
        let span = end.saturating_sub(cur[m].start);
        if span >= min_span {
            let candidate = Alignment { errors: cur[m].cost, span };
            if best.map_or(true, |b| candidate.errors < b.errors) {
                best = Some(candidate);
                if candidate.errors == 0 {
                    break;
                }
            }
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    best
}
