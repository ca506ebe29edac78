//! The list-query engine: filter, search, sort and paginate record sets

pub mod filter;
pub mod pagination;
pub mod processor;
pub mod search;
pub mod sort;

pub use filter::{FilterCondition, FilterOp, FilterRequest, FilterValue};
pub use pagination::{
    CursorPosition, DEFAULT_PAGE_SIZE, PageMode, PageWindow, PaginationCalculator,
    PaginationRequest, PaginationResponse,
};
pub use processor::{ListProcessor, ListRequest, ListResult, query_scope, record_anchor};
pub use search::{Highlight, SearchOptions, SearchRequest, SearchResult};
pub use sort::{SortDirection, SortKey, SortRequest};
