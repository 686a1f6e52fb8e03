//! Pagination primitives shared by list operations across contexts.
//!
//! Repositories order list results by a stable key so that, for a stable
//! dataset, consecutive pages never repeat or skip records.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest accepted page size.
const MAX_PAGE_SIZE: u32 = 200;

/// Errors returned while constructing pagination values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PageError {
    /// The page number is zero; pages are numbered from one.
    #[error("page numbers start at 1")]
    ZeroPageNumber,

    /// The page size is zero or exceeds the maximum.
    #[error("page size {0} is outside the 1..={MAX_PAGE_SIZE} range")]
    InvalidPageSize(u32),
}

/// A validated request for one page of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    number: u32,
    size: u32,
}

impl PageRequest {
    /// Creates a validated page request. Pages are numbered from one.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::ZeroPageNumber`] for page zero and
    /// [`PageError::InvalidPageSize`] when the size is zero or larger than
    /// 200.
    pub const fn new(number: u32, size: u32) -> Result<Self, PageError> {
        if number == 0 {
            return Err(PageError::ZeroPageNumber);
        }
        if size == 0 || size > MAX_PAGE_SIZE {
            return Err(PageError::InvalidPageSize(size));
        }
        Ok(Self { number, size })
    }

    /// Returns the one-based page number.
    #[must_use]
    pub const fn number(self) -> u32 {
        self.number
    }

    /// Returns the page size.
    #[must_use]
    pub const fn size(self) -> u32 {
        self.size
    }

    /// Returns the number of records preceding this page.
    #[must_use]
    pub const fn offset(self) -> u64 {
        (self.number as u64 - 1) * self.size as u64
    }
}

/// One page of a listing together with the total record count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    items: Vec<T>,
    total: u64,
    number: u32,
    size: u32,
}

impl<T> Page<T> {
    /// Assembles a page from query results.
    #[must_use]
    pub const fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            number: request.number,
            size: request.size,
        }
    }

    /// Returns the records on this page.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consumes the page, returning its records.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Returns the total number of matching records across all pages.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Returns the one-based page number.
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// Returns `true` when records exist beyond this page.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        (self.number as u64) * (self.size as u64) < self.total
    }
}
