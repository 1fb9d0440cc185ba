//! The `scope` backend: a chainable page scope.
//!
//! A [`Scope`] is configured with `page(n).per(k)` and materialized with
//! [`load`](Scope::load). Unlike the other backends it can skip the count
//! query: after [`without_count`](Scope::without_count) it reads one extra
//! record to learn whether another page exists.
//!
//! # Examples
//!
//! ```
//! use api_pagination_backends::scope::Scope;
//!
//! let items: Vec<u32> = (1..=50).collect();
//! let page = Scope::new(&items).page(2).per(5).load();
//! assert_eq!(page.records(), &[6, 7, 8, 9, 10]);
//! assert_eq!(page.total_pages(), Some(10));
//! assert!(!page.is_first_page());
//! ```

use crate::adapter::{total_pages_for, PageInfo};
use crate::collection::Collection;

/// Page size used when none is given.
pub const DEFAULT_PER_PAGE: u64 = 25;

/// A not yet loaded page of a collection.
pub struct Scope<'a, C: Collection + ?Sized> {
    collection: &'a C,
    page: u64,
    per: u64,
    max_per_page: Option<u64>,
    with_count: bool,
}

impl<'a, C: Collection + ?Sized> Scope<'a, C> {
    /// Scopes `collection` to its first page of [`DEFAULT_PER_PAGE`] records.
    pub const fn new(collection: &'a C) -> Self {
        Self {
            collection,
            page: 1,
            per: DEFAULT_PER_PAGE,
            max_per_page: None,
            with_count: true,
        }
    }

    /// Selects page `number`; 0 is treated as 1.
    #[must_use]
    pub fn page(mut self, number: u64) -> Self {
        self.page = number.max(1);
        self
    }

    /// Sets the page size; 0 keeps the current size.
    #[must_use]
    pub fn per(mut self, per: u64) -> Self {
        if per > 0 {
            self.per = per;
        }
        self
    }

    /// Caps the page size.
    #[must_use]
    pub fn max_per_page(mut self, max: u64) -> Self {
        self.max_per_page = Some(max.max(1));
        self
    }

    /// Skips the count query when loading.
    #[must_use]
    pub fn without_count(mut self) -> Self {
        self.with_count = false;
        self
    }

    fn limit_value(&self) -> u64 {
        self.max_per_page.map_or(self.per, |max| self.per.min(max))
    }

    /// Runs the queries and returns the page.
    pub fn load(self) -> ScopedPage<C::Item> {
        let limit = self.limit_value();
        let offset = (self.page - 1).saturating_mul(limit);

        if self.with_count {
            let total = self.collection.count();
            let records = self.collection.fetch(offset, limit);
            ScopedPage {
                records,
                current_page: self.page,
                limit_value: limit,
                total_count: Some(total),
                has_more: offset.saturating_add(limit) < total,
            }
        } else {
            let mut records = self.collection.fetch(offset, limit.saturating_add(1));
            let has_more = u64::try_from(records.len()).unwrap_or(u64::MAX) > limit;
            records.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
            ScopedPage {
                records,
                current_page: self.page,
                limit_value: limit,
                total_count: None,
                has_more,
            }
        }
    }
}

/// A loaded page from a [`Scope`].
#[derive(Debug, Clone)]
pub struct ScopedPage<T> {
    records: Vec<T>,
    current_page: u64,
    limit_value: u64,
    total_count: Option<u64>,
    has_more: bool,
}

impl<T> ScopedPage<T> {
    /// The records on this page.
    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// Consumes the page, returning its records.
    pub fn into_records(self) -> Vec<T> {
        self.records
    }

    /// The 1-based page number.
    pub const fn current_page(&self) -> u64 {
        self.current_page
    }

    /// Records per page.
    pub const fn limit_value(&self) -> u64 {
        self.limit_value
    }

    /// Records skipped before this page.
    pub const fn offset_value(&self) -> u64 {
        (self.current_page - 1).saturating_mul(self.limit_value)
    }

    /// `None` when loaded [`without_count`](Scope::without_count).
    pub const fn total_count(&self) -> Option<u64> {
        self.total_count
    }

    /// `None` when the count was skipped.
    pub fn total_pages(&self) -> Option<u64> {
        self.total_count
            .map(|total| total_pages_for(total, self.limit_value))
    }

    /// Whether this is page 1.
    pub const fn is_first_page(&self) -> bool {
        self.current_page == 1
    }

    /// Whether no page follows. Without a count, decided from the extra record fetched.
    pub fn is_last_page(&self) -> bool {
        match self.total_pages() {
            Some(total_pages) => self.current_page >= total_pages,
            None => !self.has_more,
        }
    }

    /// Whether the page lies past the end of the collection.
    pub fn out_of_range(&self) -> bool {
        match self.total_pages() {
            Some(total_pages) => self.current_page > total_pages,
            None => self.records.is_empty() && self.current_page > 1,
        }
    }

    /// The following page number, if any.
    pub fn next_page(&self) -> Option<u64> {
        if self.is_last_page() || self.out_of_range() {
            None
        } else {
            Some(self.current_page + 1)
        }
    }

    /// The preceding page number, if any.
    pub fn prev_page(&self) -> Option<u64> {
        if self.is_first_page() || self.out_of_range() {
            None
        } else {
            Some(self.current_page - 1)
        }
    }
}

impl<T> PageInfo for ScopedPage<T> {
    fn current_page(&self) -> u64 {
        self.current_page
    }

    fn per_page(&self) -> u64 {
        self.limit_value
    }

    fn total_entries(&self) -> Option<u64> {
        self.total_count
    }

    fn total_pages(&self) -> Option<u64> {
        Self::total_pages(self)
    }

    fn is_first_page(&self) -> bool {
        Self::is_first_page(self)
    }

    fn is_last_page(&self) -> bool {
        Self::is_last_page(self)
    }
}
