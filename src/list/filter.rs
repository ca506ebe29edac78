//! Filter conditions and their evaluation
//!
//! A [`FilterRequest`] is an ordered list of [`FilterCondition`]s combined
//! with logical AND. There is no OR or grouping.
//!
//! | Field kind | Operators |
//! |------------|-----------|
//! | string | `eq`, `ne`, `lt`, `lte`, `gt`, `gte`, `in`, `contains`, `starts_with` |
//! | integer / float | `eq`, `ne`, `lt`, `lte`, `gt`, `gte`, `in` |
//! | timestamp | `eq`, `ne`, `lt`, `lte`, `gt`, `gte`, `in` |
//! | boolean / uuid | `eq`, `ne`, `in` |
//!
//! String matching (`eq`, `ne`, `in`, `contains`, `starts_with`) and string
//! ordering ignore case. Timestamp and UUID fields accept their values as
//! strings (RFC 3339 / hyphenated UUID) so requests can arrive as JSON.

use crate::core::error::{FieldContext, ListError};
use crate::core::field::{FieldKind, FieldValue, fold_case};
use crate::core::record::{Record, resolve};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use uuid::Uuid;

/// Comparison operator of a filter condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    In,
    Contains,
    StartsWith,
}

impl FilterOp {
    pub fn as_str(self) -> &'static str {
        match self {
            FilterOp::Eq => "eq",
            FilterOp::Ne => "ne",
            FilterOp::Lt => "lt",
            FilterOp::Lte => "lte",
            FilterOp::Gt => "gt",
            FilterOp::Gte => "gte",
            FilterOp::In => "in",
            FilterOp::Contains => "contains",
            FilterOp::StartsWith => "starts_with",
        }
    }

    fn is_ordering(self) -> bool {
        matches!(
            self,
            FilterOp::Lt | FilterOp::Lte | FilterOp::Gt | FilterOp::Gte
        )
    }

    fn eval_ordering(self, ordering: Ordering) -> bool {
        match self {
            FilterOp::Eq => ordering == Ordering::Equal,
            FilterOp::Ne => ordering != Ordering::Equal,
            FilterOp::Lt => ordering == Ordering::Less,
            FilterOp::Lte => ordering != Ordering::Greater,
            FilterOp::Gt => ordering == Ordering::Greater,
            FilterOp::Gte => ordering != Ordering::Less,
            FilterOp::In | FilterOp::Contains | FilterOp::StartsWith => false,
        }
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Right-hand side of a condition: one scalar, or a list for `in`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    List(Vec<FieldValue>),
    Scalar(FieldValue),
}

/// A single `field operator value` predicate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCondition {
    pub field: String,
    pub operator: FilterOp,
    pub value: FilterValue,
}

impl FilterCondition {
    /// Creates a condition with a scalar value.
    pub fn new(field: impl Into<String>, operator: FilterOp, value: impl Into<FieldValue>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: FilterValue::Scalar(value.into()),
        }
    }

    /// Creates an `in` condition.
    pub fn one_of<V: Into<FieldValue>>(
        field: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self {
            field: field.into(),
            operator: FilterOp::In,
            value: FilterValue::List(values.into_iter().map(Into::into).collect()),
        }
    }
}

/// Conditions combined with logical AND
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterRequest {
    #[serde(default)]
    pub conditions: Vec<FilterCondition>,
}

impl FilterRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a scalar condition.
    pub fn and(
        mut self,
        field: impl Into<String>,
        operator: FilterOp,
        value: impl Into<FieldValue>,
    ) -> Self {
        self.conditions
            .push(FilterCondition::new(field, operator, value));
        self
    }

    /// Adds an `in` condition.
    pub fn and_in<V: Into<FieldValue>>(
        mut self,
        field: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.conditions.push(FilterCondition::one_of(field, values));
        self
    }

    pub fn push(&mut self, condition: FilterCondition) {
        self.conditions.push(condition);
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

/// Keep the records for which every condition holds.
///
/// Every condition is evaluated against every record, so an unknown field or
/// a type mismatch fails the call even when an earlier condition already
/// rejected the record.
pub fn apply<'a, R: Record>(
    records: Vec<&'a R>,
    request: &FilterRequest,
) -> Result<Vec<&'a R>, ListError> {
    if request.is_empty() {
        return Ok(records);
    }

    let mut kept = Vec::with_capacity(records.len());
    for record in records {
        if matches(record, request)? {
            kept.push(record);
        }
    }
    Ok(kept)
}

/// Evaluate all conditions of a request against one record.
pub fn matches<R: Record>(record: &R, request: &FilterRequest) -> Result<bool, ListError> {
    let mut keep = true;
    for condition in &request.conditions {
        let value = resolve(record, &condition.field, FieldContext::Filter)?;
        keep &= evaluate(condition, &value)?;
    }
    Ok(keep)
}

/// Evaluate one condition against a resolved field value.
pub fn evaluate(condition: &FilterCondition, value: &FieldValue) -> Result<bool, ListError> {
    let op = condition.operator;
    let kind = value.kind();
    let mismatch = |detail: &str| ListError::TypeMismatch {
        field: condition.field.clone(),
        op: op.as_str(),
        kind,
        detail: detail.to_string(),
    };

    match (op, &condition.value) {
        (FilterOp::In, FilterValue::Scalar(_)) => {
            return Err(mismatch("'in' expects a list value"));
        }
        (FilterOp::In, FilterValue::List(candidates)) => {
            if candidates.iter().any(FieldValue::is_null) {
                return Err(mismatch("null can only be compared with 'eq' or 'ne'"));
            }
        }
        (_, FilterValue::List(_)) => return Err(mismatch("only 'in' accepts a list value")),
        (FilterOp::Eq | FilterOp::Ne, FilterValue::Scalar(_)) => {}
        (_, FilterValue::Scalar(FieldValue::Null)) => {
            return Err(mismatch("null can only be compared with 'eq' or 'ne'"));
        }
        (_, FilterValue::Scalar(_)) => {}
    }

    if kind != FieldKind::Null {
        if matches!(op, FilterOp::Contains | FilterOp::StartsWith) && kind != FieldKind::String {
            return Err(mismatch("expected a string field"));
        }
        if op.is_ordering() && !kind.is_ordered() {
            return Err(mismatch("field kind has no ordering"));
        }
    }

    match (&condition.value, op) {
        (FilterValue::List(candidates), _) => {
            for candidate in candidates {
                if values_equal(value, candidate).map_err(|detail| mismatch(&detail))? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        (FilterValue::Scalar(expected), FilterOp::Eq) => {
            values_equal(value, expected).map_err(|detail| mismatch(&detail))
        }
        (FilterValue::Scalar(expected), FilterOp::Ne) => values_equal(value, expected)
            .map(|equal| !equal)
            .map_err(|detail| mismatch(&detail)),
        (FilterValue::Scalar(_), _) if value.is_null() => Ok(false),
        (FilterValue::Scalar(expected), FilterOp::Contains | FilterOp::StartsWith) => {
            let (Some(haystack), Some(needle)) = (value.as_string(), expected.as_string()) else {
                return Err(mismatch("expected a string value"));
            };
            let haystack = fold_case(haystack);
            let needle = fold_case(needle);
            Ok(if op == FilterOp::Contains {
                haystack.contains(&needle)
            } else {
                haystack.starts_with(&needle)
            })
        }
        (FilterValue::Scalar(expected), _) => {
            let expected = coerce(kind, expected).map_err(|detail| mismatch(&detail))?;
            match value.compare(&expected) {
                Some(ordering) => Ok(op.eval_ordering(ordering)),
                // NaN never satisfies an ordering
                None => Ok(false),
            }
        }
    }
}

/// Equality under the filter rules: case-insensitive strings, numeric
/// integers/floats, null equal only to null.
fn values_equal(field: &FieldValue, expected: &FieldValue) -> Result<bool, String> {
    match (field.is_null(), expected.is_null()) {
        (true, true) => return Ok(true),
        (true, false) | (false, true) => return Ok(false),
        (false, false) => {}
    }
    let expected = coerce(field.kind(), expected)?;
    Ok(field.compare(&expected) == Some(Ordering::Equal))
}

/// Convert a condition value to the kind of the field it is compared with.
fn coerce(kind: FieldKind, value: &FieldValue) -> Result<FieldValue, String> {
    match (kind, value) {
        (FieldKind::Integer | FieldKind::Float, v) if v.kind().is_numeric() => Ok(v.clone()),
        (FieldKind::Timestamp, FieldValue::String(s)) => DateTime::parse_from_rfc3339(s)
            .map(|dt| FieldValue::DateTime(dt.with_timezone(&Utc)))
            .map_err(|e| format!("'{}' is not an RFC 3339 timestamp: {}", s, e)),
        (FieldKind::Uuid, FieldValue::String(s)) => Uuid::parse_str(s)
            .map(FieldValue::Uuid)
            .map_err(|e| format!("'{}' is not a UUID: {}", s, e)),
        (kind, v) if v.kind() == kind => Ok(v.clone()),
        (kind, v) => Err(format!("cannot compare {} value with {} field", v.kind(), kind)),
    }
}
