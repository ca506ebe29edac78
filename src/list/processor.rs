//! The list pipeline: filter → search → sort → paginate
//!
//! [`ListProcessor`] holds only configuration, so one instance can serve
//! concurrent callers. Each call reads the input slice, never mutates it,
//! and either returns a complete [`ListResult`] or the first stage error.

use crate::config::ListingConfig;
use crate::core::error::{FieldContext, ListError};
use crate::core::field::FieldValue;
use crate::core::record::{Record, resolve};
use crate::list::filter::{self, FilterRequest};
use crate::list::pagination::{
    PaginationCalculator, PaginationRequest, PaginationResponse, fingerprint,
};
use crate::list::search::{self, SearchOptions, SearchRequest, SearchResult};
use crate::list::sort::{self, SortRequest};
use serde::{Deserialize, Serialize};

/// Everything a "list page data" call asks for
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListRequest {
    /// Missing pagination means offset mode, page 1, default page size
    #[serde(default)]
    pub pagination: Option<PaginationRequest>,
    #[serde(default)]
    pub filter: Option<FilterRequest>,
    #[serde(default)]
    pub sort: Option<SortRequest>,
    #[serde(default)]
    pub search: Option<SearchRequest>,
}

impl ListRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paginate(mut self, pagination: PaginationRequest) -> Self {
        self.pagination = Some(pagination);
        self
    }

    pub fn filter(mut self, filter: FilterRequest) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn sort(mut self, sort: SortRequest) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn search(mut self, search: SearchRequest) -> Self {
        self.search = Some(search);
        self
    }
}

/// One page of results
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListResult<R> {
    pub items: Vec<R>,
    /// Aligned index-for-index with `items`
    pub search_results: Vec<SearchResult>,
    pub pagination: PaginationResponse,
}

/// Stateless list-query engine
#[derive(Debug, Clone, Default)]
pub struct ListProcessor {
    paginator: PaginationCalculator,
    search: SearchOptions,
}

impl ListProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a processor from engine-wide configuration.
    pub fn with_config(config: &ListingConfig) -> Self {
        let mut paginator = PaginationCalculator::new(config.default_page_size);
        if let Some(max) = config.max_page_size {
            paginator = paginator.with_max_page_size(max);
        }
        Self {
            paginator,
            search: SearchOptions {
                highlight_length: config.highlight_length,
                max_results: config.max_search_results,
                default_fields: Vec::new(),
            },
        }
    }

    /// Override the page size used when a request asks for zero rows.
    pub fn with_default_page_size(mut self, page_size: usize) -> Self {
        self.paginator = self.paginator.with_default_page_size(page_size);
        self
    }

    /// Fields searched when a search request names none.
    pub fn with_default_search_fields<S: Into<String>>(
        mut self,
        fields: impl IntoIterator<Item = S>,
    ) -> Self {
        self.search.default_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn default_page_size(&self) -> usize {
        self.paginator.default_page_size()
    }

    /// Run the pipeline for a bundled request.
    pub fn process_request<R: Record + Clone>(
        &self,
        records: &[R],
        request: &ListRequest,
    ) -> Result<ListResult<R>, ListError> {
        let pagination = request.pagination.clone().unwrap_or_default();
        self.process(
            records,
            &pagination,
            request.filter.as_ref(),
            request.sort.as_ref(),
            request.search.as_ref(),
        )
    }

    /// Filter, search, sort and paginate `records`.
    ///
    /// Ordering is the explicit sort when given, otherwise relevance
    /// descending when a search is active, otherwise input order.
    /// `total_count` counts the records left after filter and search.
    pub fn process<R: Record + Clone>(
        &self,
        records: &[R],
        pagination: &PaginationRequest,
        filter: Option<&FilterRequest>,
        sort: Option<&SortRequest>,
        search: Option<&SearchRequest>,
    ) -> Result<ListResult<R>, ListError> {
        let mut candidates: Vec<&R> = records.iter().collect();

        if let Some(filter) = filter.filter(|f| !f.is_empty()) {
            let before = candidates.len();
            candidates = filter::apply(candidates, filter)?;
            tracing::debug!(
                stage = "filter",
                conditions = filter.conditions.len(),
                before,
                after = candidates.len(),
                "list stage complete"
            );
        }

        let search_active = search.is_some_and(SearchRequest::is_active);
        let mut scored = match search {
            Some(request) if search_active => {
                let before = candidates.len();
                let scored = search::score(candidates, request, &self.search)?;
                tracing::debug!(
                    stage = "search",
                    before,
                    after = scored.len(),
                    "list stage complete"
                );
                scored
            }
            _ => candidates
                .into_iter()
                .map(|record| (record, SearchResult::passthrough()))
                .collect(),
        };

        match sort.filter(|s| !s.is_empty()) {
            Some(sort) => {
                scored = sort::sort_with(scored, sort, |(record, _)| *record)?;
                tracing::trace!(stage = "sort", keys = sort.keys.len(), "list stage complete");
            }
            None if search_active => {
                scored.sort_by(|(_, a), (_, b)| b.score.total_cmp(&a.score));
                tracing::trace!(stage = "sort", order = "relevance", "list stage complete");
            }
            None => {}
        }

        let scope = query_scope(filter, sort, search);
        let window = self
            .paginator
            .compute(scored.len(), pagination, scope, |index| {
                record_anchor(scored[index].0, sort)
            })?;
        tracing::debug!(
            stage = "paginate",
            total_count = window.response.total_count,
            start = window.start,
            count = window.count,
            has_more = window.response.has_more,
            "list stage complete"
        );

        let (items, search_results) = scored
            .drain(window.range())
            .map(|(record, result)| (record.clone(), result))
            .unzip();

        Ok(ListResult {
            items,
            search_results,
            pagination: window.response,
        })
    }
}

/// Fingerprint of the parts of a request that determine the ordered
/// sequence. Cursor tokens are bound to it.
pub fn query_scope(
    filter: Option<&FilterRequest>,
    sort: Option<&SortRequest>,
    search: Option<&SearchRequest>,
) -> u64 {
    let filter = filter.filter(|f| !f.is_empty());
    let sort = sort.filter(|s| !s.is_empty());
    let search = search.filter(|s| s.is_active());
    // serde_json cannot fail on these plain data types
    let encoded = serde_json::to_vec(&(filter, sort, search)).unwrap_or_default();
    fingerprint(&encoded)
}

/// Identity of a record inside an ordered result; cursors resume after it.
///
/// Built from the record's `id` field when it has one, its sort key values
/// and its searchable fields. Records agreeing on all of these look the
/// same to a cursor.
pub fn record_anchor<R: Record>(record: &R, sort: Option<&SortRequest>) -> u64 {
    let sort_fields = sort
        .into_iter()
        .flat_map(|sort| sort.keys.iter().map(|key| key.field.as_str()));
    let fields = std::iter::once("id")
        .chain(sort_fields)
        .chain(R::searchable_fields().iter().copied());

    let mut parts: Vec<(&str, FieldValue)> = Vec::new();
    for field in fields {
        if parts.iter().any(|(seen, _)| *seen == field) {
            continue;
        }
        if let Ok(value) = resolve(record, field, FieldContext::Sort) {
            parts.push((field, value));
        }
    }
    let encoded = serde_json::to_vec(&parts).unwrap_or_default();
    fingerprint(&encoded)
}
