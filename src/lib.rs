//! # Listing-RS
//!
//! A generic list-query engine for multi-entity backends: filter, search,
//! sort and paginate collections of business records without knowing their
//! schema.
//!
//! ## Features
//!
//! - **Schema-agnostic**: records expose fields by name through the [`Record`](core::Record) trait
//! - **Typed filters**: comparison, membership and substring operators checked against field kinds
//! - **Stable multi-key sorting**: nulls last, case-insensitive strings
//! - **Relevance search**: token-fraction scoring with highlighted excerpts
//! - **Offset and cursor pagination**: opaque cursor tokens bound to their query
//! - **Configuration-Based**: page sizes and search fields via YAML configuration
//! - **Macro-based entities**: `impl_data_entity!` and `impl_record!` generate field access
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use listing::prelude::*;
//!
//! impl_data_entity!(
//!     Room,
//!     "room",
//!     ["name"],
//!     {
//!         floor: i64,
//!     }
//! );
//!
//! let rooms = vec![
//!     Room::new("Lab 1".to_string(), "active".to_string(), 0),
//!     Room::new("Science Lab".to_string(), "active".to_string(), 0),
//!     Room::new("Office".to_string(), "active".to_string(), 1),
//! ];
//!
//! let request = ListRequest::new()
//!     .filter(FilterRequest::new().and("floor", FilterOp::Eq, 0i64))
//!     .search(SearchRequest::new("science lab"))
//!     .paginate(PaginationRequest::offset(1, 20));
//!
//! let page = ListProcessor::new().process_request(&rooms, &request)?;
//! assert_eq!(page.items[0].name, "Science Lab");
//! ```

pub mod config;
pub mod core;
pub mod entities;
pub mod list;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core Traits ===
    pub use crate::core::{
        entity::{Data, Entity},
        error::{ConfigError, FieldContext, ListError},
        field::{FieldKind, FieldValue},
        query::QueryParams,
        record::{Record, resolve},
        service::DataService,
    };

    // === Macros ===
    pub use crate::{impl_data_entity, impl_record};

    // === List Engine ===
    pub use crate::list::{
        filter::{FilterCondition, FilterOp, FilterRequest, FilterValue},
        pagination::{PageMode, PaginationCalculator, PaginationRequest, PaginationResponse},
        processor::{ListProcessor, ListRequest, ListResult},
        search::{Highlight, SearchRequest, SearchResult},
        sort::{SortDirection, SortKey, SortRequest},
    };

    // === Storage ===
    #[cfg(feature = "in-memory")]
    pub use crate::storage::InMemoryDataService;

    // === Config ===
    pub use crate::config::{EntityListConfig, ListingConfig};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;
}
