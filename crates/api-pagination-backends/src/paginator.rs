//! The `paginator` backend: numbered pages over a counted collection.
//!
//! [`Paginator`] always counts the collection, then hands out [`Page`]s by
//! number. The count is taken once per paginator. Short trailing pages can
//! be folded into the previous page with [`orphans`](Paginator::orphans).
//!
//! # Examples
//!
//! ```
//! use api_pagination_backends::paginator::Paginator;
//!
//! let items: Vec<i32> = (1..=100).collect();
//! let paginator = Paginator::new(&items, 10);
//! assert_eq!(paginator.num_pages(), 10);
//! assert_eq!(paginator.count(), 100);
//!
//! let page = paginator.page(1).unwrap();
//! assert_eq!(page.object_list().len(), 10);
//! assert!(page.has_next());
//! assert!(!page.has_previous());
//! ```

use std::cell::OnceCell;
use std::ops::RangeInclusive;

use api_pagination_core::{PaginationError, PaginationResult};

use crate::adapter::PageInfo;
use crate::collection::Collection;

/// Splits a collection into numbered pages.
pub struct Paginator<'a, C: Collection + ?Sized> {
    collection: &'a C,
    per_page: u64,
    orphans: u64,
    allow_empty_first_page: bool,
    count: OnceCell<u64>,
}

impl<'a, C: Collection + ?Sized> Paginator<'a, C> {
    /// Creates a paginator with the given page size (at least 1).
    ///
    /// By default, orphans is 0 and empty first pages are allowed.
    pub fn new(collection: &'a C, per_page: u64) -> Self {
        Self {
            collection,
            per_page: per_page.max(1),
            orphans: 0,
            allow_empty_first_page: true,
            count: OnceCell::new(),
        }
    }

    /// Sets the number of orphans.
    ///
    /// When the last page would have no more than `orphans` items, those
    /// items are added to the previous page instead.
    #[must_use]
    pub fn orphans(mut self, orphans: u64) -> Self {
        self.orphans = orphans;
        self
    }

    /// Sets whether the first page is allowed to be empty.
    #[must_use]
    pub fn allow_empty_first_page(mut self, allow: bool) -> Self {
        self.allow_empty_first_page = allow;
        self
    }

    /// Returns the total number of records, counting on first call.
    pub fn count(&self) -> u64 {
        *self.count.get_or_init(|| self.collection.count())
    }

    /// Returns the total number of pages.
    pub fn num_pages(&self) -> u64 {
        let count = self.count();
        if count == 0 {
            return u64::from(self.allow_empty_first_page);
        }

        let hits = count.saturating_sub(self.orphans).max(1);
        hits.div_ceil(self.per_page)
    }

    /// Returns the range of valid page numbers (1-indexed, inclusive).
    pub fn page_range(&self) -> RangeInclusive<u64> {
        1..=self.num_pages()
    }

    /// Returns the requested page (1-indexed).
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::InvalidPage`] if the page number is 0 or
    /// beyond the last page.
    pub fn page(&self, number: u64) -> PaginationResult<Page<C::Item>> {
        if number == 0 {
            return Err(PaginationError::InvalidPage(
                "Page number must be >= 1".to_string(),
            ));
        }

        let num_pages = self.num_pages();
        if number > num_pages {
            return Err(PaginationError::InvalidPage(
                "That page contains no results".to_string(),
            ));
        }

        let count = self.count();
        let start = (number - 1) * self.per_page;
        let end = if number == num_pages {
            // Last page gets all remaining items (including orphans)
            count
        } else {
            (start + self.per_page).min(count)
        };

        Ok(Page {
            object_list: self.collection.fetch(start, end.saturating_sub(start)),
            number,
            num_pages,
            per_page: self.per_page,
            count,
        })
    }

    /// Returns the requested page, clamping invalid numbers.
    ///
    /// Page 0 yields the first page; numbers past the end yield the last.
    pub fn get_page(&self, number: u64) -> Page<C::Item> {
        let num_pages = self.num_pages();
        let target = number.clamp(1, num_pages.max(1));

        self.page(target).unwrap_or_else(|_| Page {
            object_list: Vec::new(),
            number: target,
            num_pages,
            per_page: self.per_page,
            count: self.count(),
        })
    }
}

/// A single page of results from a [`Paginator`].
#[derive(Debug, Clone)]
pub struct Page<T> {
    object_list: Vec<T>,
    number: u64,
    num_pages: u64,
    per_page: u64,
    count: u64,
}

impl<T> Page<T> {
    /// Returns the items on this page.
    pub fn object_list(&self) -> &[T] {
        &self.object_list
    }

    /// Consumes the page, returning its items.
    pub fn into_object_list(self) -> Vec<T> {
        self.object_list
    }

    /// Returns the 1-based page number.
    pub const fn number(&self) -> u64 {
        self.number
    }

    /// Returns the total number of pages.
    pub const fn num_pages(&self) -> u64 {
        self.num_pages
    }

    /// Returns the total number of records across all pages.
    pub const fn count(&self) -> u64 {
        self.count
    }

    /// Returns `true` if there is a next page.
    pub const fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    /// Returns `true` if there is a previous page.
    pub const fn has_previous(&self) -> bool {
        self.number > 1
    }

    /// Returns `true` if there are other pages (either next or previous).
    pub const fn has_other_pages(&self) -> bool {
        self.has_next() || self.has_previous()
    }

    /// Returns the next page number, if there is one.
    pub const fn next_page_number(&self) -> Option<u64> {
        if self.has_next() {
            Some(self.number + 1)
        } else {
            None
        }
    }

    /// Returns the previous page number, if there is one.
    pub const fn previous_page_number(&self) -> Option<u64> {
        if self.has_previous() {
            Some(self.number - 1)
        } else {
            None
        }
    }

    /// Returns the 1-based index of the first item on this page.
    ///
    /// Returns 0 if the page is empty.
    pub fn start_index(&self) -> u64 {
        if self.object_list.is_empty() {
            return 0;
        }
        (self.number - 1) * self.per_page + 1
    }

    /// Returns the 1-based index of the last item on this page.
    ///
    /// Returns 0 if the page is empty.
    pub fn end_index(&self) -> u64 {
        if self.object_list.is_empty() {
            return 0;
        }
        self.start_index() + u64::try_from(self.object_list.len()).unwrap_or(u64::MAX) - 1
    }
}

impl<T> PageInfo for Page<T> {
    fn current_page(&self) -> u64 {
        self.number
    }

    fn per_page(&self) -> u64 {
        self.per_page
    }

    fn total_entries(&self) -> Option<u64> {
        Some(self.count)
    }

    fn total_pages(&self) -> Option<u64> {
        Some(self.num_pages)
    }

    fn is_first_page(&self) -> bool {
        !self.has_previous()
    }

    fn is_last_page(&self) -> bool {
        !self.has_next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn make_items(n: i32) -> Vec<i32> {
        (1..=n).collect()
    }

    // ── Basic pagination tests ──────────────────────────────────────

    #[test]
    fn test_paginator_num_pages_uneven() {
        let items = make_items(23);
        let paginator = Paginator::new(&items, 10);
        assert_eq!(paginator.num_pages(), 3);
        assert_eq!(paginator.page_range(), 1..=3);
    }

    #[test]
    fn test_paginator_last_page() {
        let items = make_items(25);
        let paginator = Paginator::new(&items, 10);
        let page = paginator.page(3).unwrap();
        assert_eq!(page.object_list(), &[21, 22, 23, 24, 25]);
        assert!(!page.has_next());
        assert_eq!(page.previous_page_number(), Some(2));
        assert_eq!(page.next_page_number(), None);
    }

    #[test]
    fn test_paginator_middle_page_indices() {
        let items = make_items(30);
        let paginator = Paginator::new(&items, 10);
        let page = paginator.page(2).unwrap();
        assert_eq!(page.start_index(), 11);
        assert_eq!(page.end_index(), 20);
        assert!(page.has_other_pages());
    }

    // ── Edge case tests ─────────────────────────────────────────────

    #[test]
    fn test_paginator_page_zero_and_past_end() {
        let items = make_items(10);
        let paginator = Paginator::new(&items, 5);
        assert!(matches!(paginator.page(0), Err(PaginationError::InvalidPage(_))));
        assert!(matches!(paginator.page(3), Err(PaginationError::InvalidPage(_))));
    }

    #[test]
    fn test_paginator_get_page_clamps() {
        let items = make_items(25);
        let paginator = Paginator::new(&items, 10);
        assert_eq!(paginator.get_page(0).number(), 1);
        assert_eq!(paginator.get_page(99).number(), 3);
    }

    #[test]
    fn test_paginator_empty_collection() {
        let items: Vec<i32> = Vec::new();
        let paginator = Paginator::new(&items, 10);
        assert_eq!(paginator.num_pages(), 1);
        let page = paginator.page(1).unwrap();
        assert!(page.object_list().is_empty());
        assert_eq!(page.start_index(), 0);
        assert_eq!(page.end_index(), 0);

        let strict = Paginator::new(&items, 10).allow_empty_first_page(false);
        assert_eq!(strict.num_pages(), 0);
        assert!(strict.page(1).is_err());
        assert!(strict.get_page(1).object_list().is_empty());
    }

    #[test]
    fn test_paginator_orphans() {
        let items = make_items(23);
        let paginator = Paginator::new(&items, 10).orphans(3);
        assert_eq!(paginator.num_pages(), 2);
        assert_eq!(paginator.page(2).unwrap().object_list().len(), 13);
    }

    #[test]
    fn test_paginator_counts_once() {
        struct Counted {
            items: Vec<i32>,
            counts: Cell<u32>,
        }

        impl Collection for Counted {
            type Item = i32;
            fn count(&self) -> u64 {
                self.counts.set(self.counts.get() + 1);
                self.items.count()
            }
            fn fetch(&self, offset: u64, limit: u64) -> Vec<i32> {
                self.items.fetch(offset, limit)
            }
        }

        let source = Counted {
            items: make_items(40),
            counts: Cell::new(0),
        };
        let paginator = Paginator::new(&source, 10);
        paginator.page(1).unwrap();
        paginator.page(4).unwrap();
        assert_eq!(source.counts.get(), 1);
    }

    // ── Adapter ─────────────────────────────────────────────────────

    #[test]
    fn test_page_info() {
        let items = make_items(50);
        let paginator = Paginator::new(&items, 5);

        let first = paginator.page(1).unwrap();
        assert_eq!(first.total_entries(), Some(50));
        assert_eq!(PageInfo::total_pages(&first), Some(10));
        assert!(first.is_first_page());
        assert!(!first.is_last_page());

        let last = paginator.page(10).unwrap();
        assert!(!last.is_first_page());
        assert!(last.is_last_page());
    }
}
