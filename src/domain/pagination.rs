//! Bounded pagination shared by every listing.
//!
//! A [`PageRequest`] is the validated form of the loosely-typed `page`/`limit`
//! query parameters. A [`Page`] is the envelope handed back to callers, carrying the
//! slice of data together with the counters a client needs to render navigation.

use serde::Serialize;

use super::ValidationError;
use crate::constants::limits::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Validated page coordinates. `page` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    limit: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Builds a request from raw parameters, applying the defaults for missing values.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when `page < 1` or `limit` is outside `1..=100`.
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Result<Self, ValidationError> {
        let page = match page {
            None => DEFAULT_PAGE,
            Some(p) if p >= 1 => p.unsigned_abs(),
            Some(p) => {
                return Err(ValidationError::new(
                    "page",
                    format!("must be at least 1, got {p}"),
                ));
            }
        };

        let limit = match limit {
            None => DEFAULT_PAGE_SIZE,
            Some(l) if l >= 1 && l.unsigned_abs() <= MAX_PAGE_SIZE => l.unsigned_abs(),
            Some(l) => {
                return Err(ValidationError::new(
                    "limit",
                    format!("must be between 1 and {MAX_PAGE_SIZE}, got {l}"),
                ));
            }
        };

        Ok(Self { page, limit })
    }

    #[must_use]
    pub const fn page(&self) -> u64 {
        self.page
    }

    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.limit
    }

    /// Number of rows to skip before this page starts.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

impl<T> Page<T> {
    /// Wraps one already-fetched page of rows.
    #[must_use]
    pub fn new(data: Vec<T>, total: u64, request: PageRequest) -> Self {
        // PageRequest already rejects 0, the floor keeps the division safe regardless.
        let limit = request.limit().max(1);
        let total_pages = total.div_ceil(limit);
        let page = request.page();

        Self {
            data,
            total,
            page,
            limit,
            total_pages,
            has_previous_page: page > 1,
            has_next_page: page < total_pages,
        }
    }

    /// Cuts a page out of a fully materialized, already ordered list.
    #[must_use]
    pub fn from_items(items: Vec<T>, request: PageRequest) -> Self {
        let total = items.len() as u64;
        let data = items
            .into_iter()
            .skip(usize::try_from(request.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(request.limit()).unwrap_or(usize::MAX))
            .collect();
        Self::new(data, total, request)
    }

    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            data: self.data.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
            has_previous_page: self.has_previous_page,
            has_next_page: self.has_next_page,
        }
    }
}
