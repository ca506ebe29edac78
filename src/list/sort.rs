//! Multi-key stable sorting.
//!
//! Keys apply in priority order: the first key decides, later keys only
//! break ties, and records that tie on every key keep their input order.
//! Null values sort after every present value in both directions.

use crate::core::error::{FieldContext, ListError};
use crate::core::field::FieldValue;
use crate::core::record::{Record, resolve};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    #[serde(alias = "asc")]
    Ascending,
    #[serde(alias = "desc")]
    Descending,
}

impl SortDirection {
    /// Applies this direction to an ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }

    /// Parses `asc`/`ascending`/`desc`/`descending`, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(SortDirection::Ascending),
            "desc" | "descending" => Some(SortDirection::Descending),
            _ => None,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `(field, direction)` sort key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortKey {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Ascending)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Descending)
    }
}

/// Ordered sort keys; the first key is the primary comparator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortRequest {
    #[serde(default)]
    pub keys: Vec<SortKey>,
}

impl SortRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a lower-priority key.
    pub fn then(mut self, key: SortKey) -> Self {
        self.keys.push(key);
        self
    }

    pub fn asc(self, field: impl Into<String>) -> Self {
        self.then(SortKey::asc(field))
    }

    pub fn desc(self, field: impl Into<String>) -> Self {
        self.then(SortKey::desc(field))
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Sort records by the request keys.
pub fn sort<'a, R: Record>(
    records: Vec<&'a R>,
    request: &SortRequest,
) -> Result<Vec<&'a R>, ListError> {
    sort_with(records, request, |record| *record)
}

/// Sort arbitrary items by the keys of the record each one carries.
///
/// Key values are resolved once per item before sorting, so an unknown
/// field fails before any comparison runs.
pub fn sort_with<T, R, F>(items: Vec<T>, request: &SortRequest, record_of: F) -> Result<Vec<T>, ListError>
where
    R: Record,
    F: Fn(&T) -> &R,
{
    if request.is_empty() {
        return Ok(items);
    }

    let mut decorated = Vec::with_capacity(items.len());
    for item in items {
        let keys = request
            .keys
            .iter()
            .map(|key| resolve(record_of(&item), &key.field, FieldContext::Sort))
            .collect::<Result<Vec<_>, _>>()?;
        decorated.push((keys, item));
    }

    // slice::sort_by is stable
    decorated.sort_by(|(a, _), (b, _)| compare_keys(a, b, &request.keys));

    Ok(decorated.into_iter().map(|(_, item)| item).collect())
}

/// Compare two key tuples in priority order.
pub fn compare_keys(a: &[FieldValue], b: &[FieldValue], keys: &[SortKey]) -> Ordering {
    for ((left, right), key) in a.iter().zip(b).zip(keys) {
        let ordering = compare_values(left, right, key.direction);
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Compare two values for sorting.
///
/// Nulls go last regardless of direction. Values of different kinds (which a
/// well-formed collection never produces) fall back to a fixed kind order so
/// the comparison stays total.
pub fn compare_values(a: &FieldValue, b: &FieldValue, direction: SortDirection) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => direction.apply(compare_present(a, b)),
    }
}

fn compare_present(a: &FieldValue, b: &FieldValue) -> Ordering {
    match (a, b) {
        (FieldValue::Float(_), _) | (_, FieldValue::Float(_))
            if a.kind().is_numeric() && b.kind().is_numeric() =>
        {
            match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                _ => Ordering::Equal,
            }
        }
        _ => a
            .compare(b)
            .unwrap_or_else(|| kind_rank(a).cmp(&kind_rank(b))),
    }
}

fn kind_rank(value: &FieldValue) -> u8 {
    match value {
        FieldValue::Boolean(_) => 0,
        FieldValue::Integer(_) | FieldValue::Float(_) => 1,
        FieldValue::String(_) => 2,
        FieldValue::Uuid(_) => 3,
        FieldValue::DateTime(_) => 4,
        FieldValue::Null => 5,
    }
}
