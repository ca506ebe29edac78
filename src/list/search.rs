//! Free-text relevance scoring with highlighted excerpts
//!
//! The query is split into lowercase alphanumeric tokens. A record's score is
//! the fraction of tokens found as case-insensitive substrings of its
//! searched fields, so every field weighs the same. Records scoring zero are
//! dropped: an active search also filters.

use crate::core::error::{FieldContext, ListError};
use crate::core::field::fold_case;
use crate::core::record::{Record, resolve};
use serde::{Deserialize, Serialize};

/// Default excerpt length in characters
pub const DEFAULT_HIGHLIGHT_LENGTH: usize = 64;

/// Default upper bound on records surviving a search
pub const DEFAULT_MAX_SEARCH_RESULTS: usize = 1000;

const ELLIPSIS: char = '…';

/// Free-text search over a set of fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    /// Fields to search; empty means the record type's searchable fields
    #[serde(default)]
    pub fields: Vec<String>,
    /// Maximum surviving records; 0 means the engine bound
    #[serde(default)]
    pub max_results: usize,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn with_fields<S: Into<String>>(mut self, fields: impl IntoIterator<Item = S>) -> Self {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// A search is active when its query yields at least one token.
    pub fn is_active(&self) -> bool {
        !tokenize(&self.query).is_empty()
    }
}

/// Excerpt of one field around its first match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlight {
    pub field: String,
    pub snippet: String,
}

/// Relevance of one record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub score: f64,
    pub highlights: Vec<Highlight>,
}

impl SearchResult {
    /// Result attached to records when no search ran
    pub fn passthrough() -> Self {
        Self {
            score: 1.0,
            highlights: Vec::new(),
        }
    }
}

/// Engine-level search bounds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    pub highlight_length: usize,
    pub max_results: usize,
    /// Used when neither the request nor the record type names fields
    pub default_fields: Vec<String>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            highlight_length: DEFAULT_HIGHLIGHT_LENGTH,
            max_results: DEFAULT_MAX_SEARCH_RESULTS,
            default_fields: Vec::new(),
        }
    }
}

impl SearchOptions {
    fn cap(&self, requested: usize) -> usize {
        match requested {
            0 => self.max_results,
            n => n.min(self.max_results),
        }
    }
}

/// Split text into deduplicated lowercase alphanumeric tokens, in order.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for raw in text.split(|c: char| !c.is_alphanumeric()) {
        if raw.is_empty() {
            continue;
        }
        let token = fold_case(raw);
        if !tokens.contains(&token) {
            tokens.push(token);
        }
    }
    tokens
}

/// Score records against a search request.
///
/// An inactive request passes every record through with
/// [`SearchResult::passthrough`]. Otherwise only records with a positive
/// score survive, in input order, capped at the highest-scoring
/// `max_results`.
pub fn score<'a, R: Record>(
    records: Vec<&'a R>,
    request: &SearchRequest,
    options: &SearchOptions,
) -> Result<Vec<(&'a R, SearchResult)>, ListError> {
    let tokens = tokenize(&request.query);
    if tokens.is_empty() {
        return Ok(records
            .into_iter()
            .map(|record| (record, SearchResult::passthrough()))
            .collect());
    }

    let fields: Vec<String> = if !request.fields.is_empty() {
        request.fields.clone()
    } else if !options.default_fields.is_empty() {
        options.default_fields.clone()
    } else {
        R::searchable_fields().iter().map(|f| f.to_string()).collect()
    };
    if fields.is_empty() {
        return Err(ListError::invalid_request(format!(
            "search for '{}' names no fields and the record type has no searchable fields",
            request.query.trim()
        )));
    }

    let mut scored = Vec::new();
    for record in records {
        let result = score_record(record, &tokens, &fields, options.highlight_length)?;
        if result.score > 0.0 {
            scored.push((record, result));
        }
    }

    let cap = options.cap(request.max_results);
    if scored.len() > cap {
        tracing::debug!(
            matched = scored.len(),
            cap,
            "search results truncated to the highest scores"
        );
        let mut order: Vec<usize> = (0..scored.len()).collect();
        order.sort_by(|&a, &b| scored[b].1.score.total_cmp(&scored[a].1.score));
        let mut keep = vec![false; scored.len()];
        for &index in order.iter().take(cap) {
            keep[index] = true;
        }
        let mut flags = keep.into_iter();
        scored.retain(|_| flags.next().unwrap_or(false));
    }

    Ok(scored)
}

fn score_record<R: Record>(
    record: &R,
    tokens: &[String],
    fields: &[String],
    highlight_length: usize,
) -> Result<SearchResult, ListError> {
    let mut found = vec![false; tokens.len()];
    let mut highlights = Vec::new();

    for field in fields {
        let value = resolve(record, field, FieldContext::Search)?;
        let Some(text) = value.to_search_text() else {
            continue;
        };
        let folded = fold_case(&text);

        // earliest match of any token in this field
        let mut first: Option<(usize, &str)> = None;
        for (index, token) in tokens.iter().enumerate() {
            if let Some(position) = folded.find(token.as_str()) {
                found[index] = true;
                if first.is_none_or(|(best, _)| position < best) {
                    first = Some((position, token.as_str()));
                }
            }
        }

        if let Some((byte_offset, token)) = first {
            let start = folded[..byte_offset].chars().count();
            highlights.push(Highlight {
                field: field.clone(),
                snippet: excerpt(&text, start, token.chars().count(), highlight_length),
            });
        }
    }

    let matched = found.iter().filter(|hit| **hit).count();
    Ok(SearchResult {
        score: matched as f64 / tokens.len() as f64,
        highlights,
    })
}

/// Cut at most `max_chars` characters out of `text`, centred on the match
/// starting at char `match_start`. Truncated ends are marked with `…`.
pub fn excerpt(text: &str, match_start: usize, match_len: usize, max_chars: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_chars {
        return text.to_string();
    }

    let lead = max_chars.saturating_sub(match_len) / 2;
    let mut start = match_start.saturating_sub(lead);
    let end = (start + max_chars).min(chars.len());
    start = end.saturating_sub(max_chars);

    let mut snippet = String::with_capacity(max_chars + 2);
    if start > 0 {
        snippet.push(ELLIPSIS);
    }
    snippet.extend(&chars[start..end]);
    if end < chars.len() {
        snippet.push(ELLIPSIS);
    }
    snippet
}
