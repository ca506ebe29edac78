//! Typed error handling for the listing engine
//!
//! Every stage of the list pipeline fails with a [`ListError`]. Errors are
//! local validation failures: they are detected synchronously, never retried,
//! and abort the whole call. Response consumers map them onto their own
//! outward shape using [`ListError::error_code`].
//!
//! # Error Categories
//!
//! - [`ListError::FieldNotFound`]: a filter, sort or search names an unknown field
//! - [`ListError::TypeMismatch`]: an operator or value does not fit the field kind
//! - [`ListError::InvalidPagination`]: non-positive page, negative size or limit
//! - [`ListError::InvalidCursor`]: malformed, out-of-range or foreign cursor token
//! - [`ListError::InvalidRequest`]: raw query parameters could not be parsed, or a
//!   search has no fields to look in
//! - [`ConfigError`]: configuration loading and validation
//!
//! # Example
//!
//! ```rust,ignore
//! match processor.process_request(&records, &request) {
//!     Ok(result) => render(result),
//!     Err(ListError::FieldNotFound { field, .. }) => bad_request(field),
//!     Err(e) => internal(e.error_code()),
//! }
//! ```

use crate::core::field::FieldKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Pipeline stage that referenced a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldContext {
    Filter,
    Sort,
    Search,
}

impl fmt::Display for FieldContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldContext::Filter => f.write_str("filter"),
            FieldContext::Sort => f.write_str("sort"),
            FieldContext::Search => f.write_str("search"),
        }
    }
}

/// Errors produced by the list-query engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ListError {
    /// A field name is not part of the record shape
    #[error("Unknown {context} field '{field}'")]
    FieldNotFound { field: String, context: FieldContext },

    /// An operator or its value is incompatible with the field kind
    #[error("Operator '{op}' cannot be applied to {kind} field '{field}': {detail}")]
    TypeMismatch {
        field: String,
        op: &'static str,
        kind: FieldKind,
        detail: String,
    },

    /// Pagination parameters are out of range
    #[error("Invalid pagination: {reason}")]
    InvalidPagination { reason: String },

    /// Cursor token could not be decoded or does not belong to this query
    #[error("Invalid cursor: {reason}")]
    InvalidCursor { reason: String },

    /// The request cannot be interpreted as given
    #[error("Invalid list request: {message}")]
    InvalidRequest { message: String },
}

impl ListError {
    pub(crate) fn field_not_found(field: impl Into<String>, context: FieldContext) -> Self {
        ListError::FieldNotFound {
            field: field.into(),
            context,
        }
    }

    pub(crate) fn invalid_pagination(reason: impl Into<String>) -> Self {
        ListError::InvalidPagination {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_cursor(reason: impl Into<String>) -> Self {
        ListError::InvalidCursor {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_request(message: impl Into<String>) -> Self {
        ListError::InvalidRequest {
            message: message.into(),
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ListError::FieldNotFound {
                context: FieldContext::Filter,
                ..
            } => "INVALID_FILTER_FIELD",
            ListError::FieldNotFound {
                context: FieldContext::Sort,
                ..
            } => "INVALID_SORT_FIELD",
            ListError::FieldNotFound {
                context: FieldContext::Search,
                ..
            } => "INVALID_SEARCH_FIELD",
            ListError::TypeMismatch { .. } => "TYPE_MISMATCH",
            ListError::InvalidPagination { .. } => "INVALID_PAGINATION",
            ListError::InvalidCursor { .. } => "INVALID_CURSOR",
            ListError::InvalidRequest { .. } => "INVALID_LIST_REQUEST",
        }
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error while reading a configuration file
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Invalid value in configuration
    #[error("Invalid value for field '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl ConfigError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ConfigError::Io { .. } => "CONFIG_IO_ERROR",
            ConfigError::Parse(_) => "CONFIG_PARSE_ERROR",
            ConfigError::InvalidValue { .. } => "CONFIG_INVALID_VALUE",
        }
    }
}
