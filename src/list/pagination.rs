//! Offset and cursor pagination
//!
//! A list request is never unbounded: without an explicit mode it pages by
//! offset from page 1 with the default page size.
//!
//! Cursor tokens are opaque to callers. Internally a token is the URL-safe
//! base64 (no padding) encoding of a small JSON payload holding the resume
//! offset, the anchor of the last record handed out, and the fingerprint
//! ("scope") of the query that minted it. A token replayed against a
//! different filter/sort/search is rejected. When records were inserted or
//! removed since the token was minted, the page resumes right after its
//! anchor record; a token whose anchor is gone is rejected as stale.
//!
//! Scopes and anchors are the first 8 bytes (big-endian) of a SHA-256
//! digest, so tokens stay valid across builds and toolchains.

use crate::core::error::ListError;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::ops::Range;

/// Page size used when a request asks for zero rows
pub const DEFAULT_PAGE_SIZE: usize = 10;

const CURSOR_VERSION: u8 = 2;

/// How to slice the ordered result sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PaginationRequest {
    /// Page-numbered slicing; `page` starts at 1, `page_size == 0` means default
    Offset {
        page: i64,
        #[serde(default)]
        page_size: i64,
    },
    /// Resume after the position encoded in `token`; an empty token starts
    /// from the beginning, `limit == 0` means default
    Cursor {
        #[serde(default)]
        token: String,
        #[serde(default)]
        limit: i64,
    },
}

impl Default for PaginationRequest {
    fn default() -> Self {
        PaginationRequest::Offset {
            page: 1,
            page_size: 0,
        }
    }
}

impl PaginationRequest {
    pub fn offset(page: i64, page_size: i64) -> Self {
        PaginationRequest::Offset { page, page_size }
    }

    pub fn cursor(token: impl Into<String>, limit: i64) -> Self {
        PaginationRequest::Cursor {
            token: token.into(),
            limit,
        }
    }

    /// First page in cursor mode
    pub fn first_cursor_page(limit: i64) -> Self {
        Self::cursor(String::new(), limit)
    }
}

/// Mode-specific part of a [`PaginationResponse`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PageMode {
    Offset {
        current_page: usize,
        total_pages: usize,
        page_size: usize,
    },
    Cursor {
        next_cursor: Option<String>,
        limit: usize,
    },
}

/// Pagination metadata returned with every page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationResponse {
    /// Records satisfying the query, before slicing
    pub total_count: usize,
    pub has_more: bool,
    #[serde(flatten)]
    pub mode: PageMode,
}

impl PaginationResponse {
    pub fn current_page(&self) -> Option<usize> {
        match self.mode {
            PageMode::Offset { current_page, .. } => Some(current_page),
            PageMode::Cursor { .. } => None,
        }
    }

    pub fn total_pages(&self) -> Option<usize> {
        match self.mode {
            PageMode::Offset { total_pages, .. } => Some(total_pages),
            PageMode::Cursor { .. } => None,
        }
    }

    pub fn next_cursor(&self) -> Option<&str> {
        match &self.mode {
            PageMode::Cursor { next_cursor, .. } => next_cursor.as_deref(),
            PageMode::Offset { .. } => None,
        }
    }
}

/// Slice bounds plus the response metadata for one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    pub start: usize,
    pub count: usize,
    pub response: PaginationResponse,
}

impl PageWindow {
    pub fn range(&self) -> Range<usize> {
        self.start..self.start + self.count
    }
}

/// Where a cursor resumes: after the record at `offset - 1`, whose anchor
/// is `anchor`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorPosition {
    pub offset: usize,
    pub anchor: u64,
}

#[derive(Debug, Serialize, Deserialize)]
struct CursorPayload {
    #[serde(rename = "v")]
    version: u8,
    #[serde(rename = "o")]
    offset: usize,
    #[serde(rename = "a")]
    anchor: u64,
    #[serde(rename = "s")]
    scope: u64,
}

/// Stable 64-bit fingerprint: the leading 8 bytes of the SHA-256 digest
pub fn fingerprint(bytes: &[u8]) -> u64 {
    let digest = Sha256::digest(bytes);
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(head)
}

/// Computes page windows for a known total
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationCalculator {
    default_page_size: usize,
    max_page_size: Option<usize>,
}

impl Default for PaginationCalculator {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl PaginationCalculator {
    /// Create a calculator; a zero default falls back to [`DEFAULT_PAGE_SIZE`].
    pub fn new(default_page_size: usize) -> Self {
        Self {
            default_page_size: if default_page_size == 0 {
                DEFAULT_PAGE_SIZE
            } else {
                default_page_size
            },
            max_page_size: None,
        }
    }

    /// Clamp requested page sizes and limits to `max`
    pub fn with_max_page_size(mut self, max: usize) -> Self {
        self.max_page_size = Some(max.max(1));
        self
    }

    /// Replace the default page size, keeping any maximum
    pub fn with_default_page_size(mut self, default_page_size: usize) -> Self {
        if default_page_size > 0 {
            self.default_page_size = default_page_size;
        }
        self
    }

    pub fn default_page_size(&self) -> usize {
        self.default_page_size
    }

    pub fn max_page_size(&self) -> Option<usize> {
        self.max_page_size
    }

    fn effective_size(&self, requested: i64) -> usize {
        let size = match usize::try_from(requested) {
            Ok(0) | Err(_) => self.default_page_size,
            Ok(n) => n,
        };
        match self.max_page_size {
            Some(max) => size.min(max),
            None => size,
        }
    }

    /// Compute the window for `total_count` ordered records.
    ///
    /// `scope` identifies the query; cursor tokens only resume under the
    /// scope that produced them. `anchor_at(i)` returns the anchor of the
    /// record at position `i` and is only consulted in cursor mode.
    pub fn compute<F>(
        &self,
        total_count: usize,
        request: &PaginationRequest,
        scope: u64,
        anchor_at: F,
    ) -> Result<PageWindow, ListError>
    where
        F: Fn(usize) -> u64,
    {
        match request {
            PaginationRequest::Offset { page, page_size } => {
                self.compute_offset(total_count, *page, *page_size)
            }
            PaginationRequest::Cursor { token, limit } => {
                self.compute_cursor(total_count, token, *limit, scope, anchor_at)
            }
        }
    }

    fn compute_offset(
        &self,
        total_count: usize,
        page: i64,
        page_size: i64,
    ) -> Result<PageWindow, ListError> {
        if page < 1 {
            return Err(ListError::invalid_pagination(format!(
                "page must be >= 1, got {}",
                page
            )));
        }
        if page_size < 0 {
            return Err(ListError::invalid_pagination(format!(
                "page_size must be >= 0, got {}",
                page_size
            )));
        }

        let page = usize::try_from(page).unwrap_or(usize::MAX);
        let size = self.effective_size(page_size);
        let start = (page - 1).saturating_mul(size).min(total_count);
        let count = size.min(total_count - start);
        let total_pages = total_count.div_ceil(size);

        Ok(PageWindow {
            start,
            count,
            response: PaginationResponse {
                total_count,
                has_more: page < total_pages,
                mode: PageMode::Offset {
                    current_page: page,
                    total_pages,
                    page_size: size,
                },
            },
        })
    }

    fn compute_cursor<F>(
        &self,
        total_count: usize,
        token: &str,
        limit: i64,
        scope: u64,
        anchor_at: F,
    ) -> Result<PageWindow, ListError>
    where
        F: Fn(usize) -> u64,
    {
        if limit < 0 {
            return Err(ListError::invalid_pagination(format!(
                "limit must be >= 0, got {}",
                limit
            )));
        }

        let start = if token.is_empty() {
            0
        } else {
            resume_position(total_count, decode_cursor(token, scope)?, &anchor_at)?
        };

        let limit = self.effective_size(limit);
        let count = limit.min(total_count - start);
        let end = start + count;
        let has_more = end < total_count;
        let next_cursor = has_more.then(|| {
            encode_cursor(
                CursorPosition {
                    offset: end,
                    anchor: anchor_at(end - 1),
                },
                scope,
            )
        });

        Ok(PageWindow {
            start,
            count,
            response: PaginationResponse {
                total_count,
                has_more,
                mode: PageMode::Cursor { next_cursor, limit },
            },
        })
    }
}

/// Find where a decoded cursor resumes in the current sequence.
///
/// The record before `offset` must still carry the anchor. Otherwise the
/// anchor record closest to the old position wins; without one the cursor
/// is stale.
fn resume_position<F>(
    total_count: usize,
    position: CursorPosition,
    anchor_at: &F,
) -> Result<usize, ListError>
where
    F: Fn(usize) -> u64,
{
    let expected = position.offset.checked_sub(1);
    if expected.is_some_and(|last| last < total_count && anchor_at(last) == position.anchor) {
        return Ok(position.offset);
    }

    let target = expected.unwrap_or(0);
    let moved = (0..total_count)
        .filter(|&index| anchor_at(index) == position.anchor)
        .min_by_key(|&index| index.abs_diff(target));
    match moved {
        Some(index) => {
            tracing::debug!(
                from = position.offset,
                to = index + 1,
                "cursor anchor moved, resuming after it"
            );
            Ok(index + 1)
        }
        None => {
            tracing::warn!(
                offset = position.offset,
                total_count,
                "rejected stale cursor: anchor record is gone"
            );
            Err(ListError::invalid_cursor(
                "the record this cursor resumes after is no longer in the result set",
            ))
        }
    }
}

/// Encode a resume position for the given query scope.
pub fn encode_cursor(position: CursorPosition, scope: u64) -> String {
    let payload = CursorPayload {
        version: CURSOR_VERSION,
        offset: position.offset,
        anchor: position.anchor,
        scope,
    };
    // Serializing integers into JSON cannot fail
    let json = serde_json::to_vec(&payload).unwrap_or_default();
    URL_SAFE_NO_PAD.encode(json)
}

/// Decode a token minted by [`encode_cursor`] under the same scope.
pub fn decode_cursor(token: &str, scope: u64) -> Result<CursorPosition, ListError> {
    let bytes = URL_SAFE_NO_PAD.decode(token.trim()).map_err(|e| {
        tracing::warn!(error = %e, "rejected cursor: not base64");
        ListError::invalid_cursor(format!("token is not valid base64: {}", e))
    })?;
    let payload: CursorPayload = serde_json::from_slice(&bytes).map_err(|e| {
        tracing::warn!(error = %e, "rejected cursor: malformed payload");
        ListError::invalid_cursor(format!("token payload is malformed: {}", e))
    })?;
    if payload.version != CURSOR_VERSION {
        return Err(ListError::invalid_cursor(format!(
            "unsupported cursor version {}",
            payload.version
        )));
    }
    if payload.scope != scope {
        tracing::warn!(
            expected = scope,
            found = payload.scope,
            "rejected cursor minted for a different query"
        );
        return Err(ListError::invalid_cursor(
            "token was issued for a different query",
        ));
    }
    Ok(CursorPosition {
        offset: payload.offset,
        anchor: payload.anchor,
    })
}
