//! Raw list query parameters and their conversion into a [`ListRequest`]

use crate::core::error::ListError;
use crate::core::field::FieldValue;
use crate::list::filter::{FilterCondition, FilterOp, FilterRequest, FilterValue};
use crate::list::pagination::PaginationRequest;
use crate::list::processor::ListRequest;
use crate::list::search::SearchRequest;
use crate::list::sort::{SortDirection, SortKey, SortRequest};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::OnceLock;

/// Query parameters for pagination, filtering, sorting and search
///
/// This structure models the parameters a transport layer extracts from a
/// URL query string. All parameters have sensible defaults.
///
/// # Example
/// ```text
/// GET /items?page=2&limit=10
/// GET /items?filter={"status": "active"}
/// GET /items?page=1&limit=20&filter={"amount>": 100}&sort=created_at:desc
/// GET /items?cursor=<next_cursor of the previous page>&limit=10
/// GET /items?q=science%20lab&search_fields=name,description
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryParams {
    /// Page number (starts at 1)
    #[serde(default = "default_page")]
    pub page: usize,

    /// Number of items per page, or the cursor limit; 0 means the engine default
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Cursor token; when present the request pages by cursor and `page` is ignored
    pub cursor: Option<String>,

    /// Filters as JSON object
    ///
    /// # Format
    /// - Exact match: `{"field": "value"}`
    /// - Comparison: `{"field>": value, "field<": value, "field>=": value, "field<=": value}`
    /// - Not equal: `{"field!=": value}`
    /// - Substring: `{"field~": "text"}`, prefix: `{"field^": "text"}`
    /// - Membership: `{"field": ["a", "b"]}`
    ///
    /// # Example
    /// ```text
    /// filter={"status": "active", "amount>": 100, "customer_name~": "Acme"}
    /// ```
    pub filter: Option<String>,

    /// Sort fields and directions
    ///
    /// # Format
    /// - `field:asc` or `field` (ascending)
    /// - `field:desc` (descending)
    /// - several keys separated by commas, highest priority first
    ///
    /// # Example
    /// ```text
    /// sort=amount:desc
    /// sort=status,created_at:desc
    /// ```
    pub sort: Option<String>,

    /// Free-text search query
    pub q: Option<String>,

    /// Comma-separated fields to search
    pub search_fields: Option<String>,
}

fn default_page() -> usize {
    1
}

fn default_limit() -> usize {
    0
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
            cursor: None,
            filter: None,
            sort: None,
            q: None,
            search_fields: None,
        }
    }
}

static FILTER_KEY: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();

fn filter_key_pattern() -> Result<&'static Regex, ListError> {
    FILTER_KEY
        .get_or_init(|| Regex::new(r"^(?P<field>.*?)(?P<op>>=|<=|!=|>|<|~|\^)?$"))
        .as_ref()
        .map_err(|e| ListError::invalid_request(format!("filter key pattern: {}", e)))
}

impl QueryParams {
    /// Pagination mode requested by these parameters
    pub fn pagination(&self) -> PaginationRequest {
        let limit = i64::try_from(self.limit).unwrap_or(i64::MAX);
        match &self.cursor {
            Some(token) => PaginationRequest::cursor(token.trim(), limit),
            None => PaginationRequest::offset(i64::try_from(self.page).unwrap_or(i64::MAX), limit),
        }
    }

    /// Parse the `filter` parameter into conditions
    pub fn filter_request(&self) -> Result<Option<FilterRequest>, ListError> {
        let Some(raw) = self.filter.as_deref().filter(|s| !s.trim().is_empty()) else {
            return Ok(None);
        };
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| ListError::invalid_request(format!("filter is not valid JSON: {}", e)))?;
        let Value::Object(entries) = value else {
            return Err(ListError::invalid_request("filter must be a JSON object"));
        };

        let pattern = filter_key_pattern()?;
        let mut request = FilterRequest::new();
        for (key, value) in entries {
            let captures = pattern
                .captures(&key)
                .ok_or_else(|| ListError::invalid_request(format!("invalid filter key '{}'", key)))?;
            let field = captures.name("field").map_or("", |m| m.as_str()).trim();
            if field.is_empty() {
                return Err(ListError::invalid_request(format!(
                    "filter key '{}' has no field name",
                    key
                )));
            }
            let suffix = captures.name("op").map(|m| m.as_str());
            request.push(parse_condition(field, suffix, value)?);
        }
        Ok(Some(request))
    }

    /// Parse the `sort` parameter into keys
    pub fn sort_request(&self) -> Result<Option<SortRequest>, ListError> {
        let Some(raw) = self.sort.as_deref().filter(|s| !s.trim().is_empty()) else {
            return Ok(None);
        };

        let mut request = SortRequest::new();
        for segment in raw.split(',') {
            let segment = segment.trim();
            let (field, direction) = match segment.split_once(':') {
                Some((field, direction)) => {
                    let direction = SortDirection::parse(direction.trim()).ok_or_else(|| {
                        ListError::invalid_request(format!(
                            "invalid sort direction '{}' in '{}'",
                            direction, segment
                        ))
                    })?;
                    (field.trim(), direction)
                }
                None => (segment, SortDirection::Ascending),
            };
            if field.is_empty() {
                return Err(ListError::invalid_request(format!(
                    "empty sort field in '{}'",
                    raw
                )));
            }
            request = request.then(SortKey::new(field, direction));
        }
        Ok(Some(request))
    }

    /// Build the search request from `q` and `search_fields`
    pub fn search_request(&self) -> Option<SearchRequest> {
        let query = self.q.as_deref().filter(|q| !q.trim().is_empty())?;
        let fields = self
            .search_fields
            .as_deref()
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|f| !f.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();
        Some(SearchRequest {
            query: query.to_string(),
            fields,
            max_results: 0,
        })
    }

    /// Convert all parameters into a request for the list engine
    pub fn to_list_request(&self) -> Result<ListRequest, ListError> {
        Ok(ListRequest {
            pagination: Some(self.pagination()),
            filter: self.filter_request()?,
            sort: self.sort_request()?,
            search: self.search_request(),
        })
    }
}

impl TryFrom<&QueryParams> for ListRequest {
    type Error = ListError;

    fn try_from(params: &QueryParams) -> Result<Self, Self::Error> {
        params.to_list_request()
    }
}

fn parse_condition(
    field: &str,
    suffix: Option<&str>,
    value: Value,
) -> Result<FilterCondition, ListError> {
    let operator = match suffix {
        None => FilterOp::Eq,
        Some(">") => FilterOp::Gt,
        Some(">=") => FilterOp::Gte,
        Some("<") => FilterOp::Lt,
        Some("<=") => FilterOp::Lte,
        Some("!=") => FilterOp::Ne,
        Some("~") => FilterOp::Contains,
        Some("^") => FilterOp::StartsWith,
        Some(other) => {
            return Err(ListError::invalid_request(format!(
                "unknown filter operator '{}'",
                other
            )));
        }
    };

    match value {
        Value::Array(items) if operator == FilterOp::Eq => {
            let values = items
                .into_iter()
                .map(|item| scalar(field, item))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(FilterCondition {
                field: field.to_string(),
                operator: FilterOp::In,
                value: FilterValue::List(values),
            })
        }
        Value::Array(_) => Err(ListError::invalid_request(format!(
            "operator '{}' on '{}' does not take a list",
            operator, field
        ))),
        other => Ok(FilterCondition {
            field: field.to_string(),
            operator,
            value: FilterValue::Scalar(scalar(field, other)?),
        }),
    }
}

fn scalar(field: &str, value: Value) -> Result<FieldValue, ListError> {
    match value {
        Value::Null => Ok(FieldValue::Null),
        Value::Bool(b) => Ok(FieldValue::Boolean(b)),
        Value::String(s) => Ok(FieldValue::String(s)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Ok(FieldValue::Integer(i)),
            None => n.as_f64().map(FieldValue::Float).ok_or_else(|| {
                ListError::invalid_request(format!("number out of range for '{}'", field))
            }),
        },
        Value::Array(_) | Value::Object(_) => Err(ListError::invalid_request(format!(
            "filter value for '{}' must be a scalar",
            field
        ))),
    }
}
