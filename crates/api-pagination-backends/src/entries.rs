//! The `collection` backend: an entry collection with previous/next links.
//!
//! [`EntryCollection`] knows its current page, page size and total entries.
//! It has no first/last flags of its own; the adapter derives them from the
//! absence of a previous or next page.

use crate::adapter::{total_pages_for, PageInfo};
use crate::collection::Collection;

/// One page of entries plus the numbers needed to navigate from it.
#[derive(Debug, Clone)]
pub struct EntryCollection<T> {
    entries: Vec<T>,
    current_page: u64,
    per_page: u64,
    total_entries: u64,
}

impl<T> EntryCollection<T> {
    /// Counts `collection` and reads page `page` of `per_page` entries.
    ///
    /// Page and page size are raised to at least 1.
    pub fn paginate<C>(collection: &C, page: u64, per_page: u64) -> Self
    where
        C: Collection<Item = T> + ?Sized,
    {
        let current_page = page.max(1);
        let per_page = per_page.max(1);
        let total_entries = collection.count();
        let offset = (current_page - 1).saturating_mul(per_page);

        Self {
            entries: collection.fetch(offset, per_page),
            current_page,
            per_page,
            total_entries,
        }
    }

    /// The entries on this page.
    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    /// Consumes the collection, returning its entries.
    pub fn into_entries(self) -> Vec<T> {
        self.entries
    }

    /// The 1-based page number.
    pub const fn current_page(&self) -> u64 {
        self.current_page
    }

    /// Entries per page.
    pub const fn per_page(&self) -> u64 {
        self.per_page
    }

    /// Entries in the whole collection.
    pub const fn total_entries(&self) -> u64 {
        self.total_entries
    }

    /// Number of pages; an empty collection still has one.
    pub const fn total_pages(&self) -> u64 {
        if self.total_entries == 0 {
            1
        } else {
            total_pages_for(self.total_entries, self.per_page)
        }
    }

    /// Entries skipped before this page.
    pub const fn offset(&self) -> u64 {
        (self.current_page - 1).saturating_mul(self.per_page)
    }

    /// The preceding page number, if any.
    pub const fn previous_page(&self) -> Option<u64> {
        if self.current_page > 1 {
            Some(self.current_page - 1)
        } else {
            None
        }
    }

    /// The following page number, if any.
    pub const fn next_page(&self) -> Option<u64> {
        if self.current_page < self.total_pages() {
            Some(self.current_page + 1)
        } else {
            None
        }
    }

    /// Whether the current page lies past the last page.
    pub const fn out_of_bounds(&self) -> bool {
        self.current_page > self.total_pages()
    }
}

impl<T> PageInfo for EntryCollection<T> {
    fn current_page(&self) -> u64 {
        self.current_page
    }

    fn per_page(&self) -> u64 {
        self.per_page
    }

    fn total_entries(&self) -> Option<u64> {
        Some(self.total_entries)
    }

    fn total_pages(&self) -> Option<u64> {
        Some(Self::total_pages(self))
    }

    fn is_first_page(&self) -> bool {
        self.previous_page().is_none()
    }

    fn is_last_page(&self) -> bool {
        self.next_page().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::adapt;

    fn items(n: u32) -> Vec<u32> {
        (1..=n).collect()
    }

    #[test]
    fn test_paginate_middle() {
        let page = EntryCollection::paginate(&items(30), 2, 10);
        assert_eq!(page.entries().first(), Some(&11));
        assert_eq!(page.offset(), 10);
        assert_eq!(page.previous_page(), Some(1));
        assert_eq!(page.next_page(), Some(3));
        assert_eq!(page.total_pages(), 3);
    }

    #[test]
    fn test_first_last_derived_from_neighbours() {
        let first = EntryCollection::paginate(&items(30), 1, 10);
        let info = adapt(&first);
        assert!(info.is_first_page);
        assert!(!info.is_last_page);

        let last = EntryCollection::paginate(&items(30), 3, 10);
        let info = adapt(&last);
        assert!(!info.is_first_page);
        assert!(info.is_last_page);
    }

    #[test]
    fn test_empty_collection_has_one_page() {
        let page = EntryCollection::paginate(&items(0), 1, 10);
        assert_eq!(page.total_pages(), 1);
        assert!(page.entries().is_empty());
        assert!(!page.out_of_bounds());
        let info = adapt(&page);
        assert_eq!(info.total_entries, Some(0));
        assert!(info.is_first_page && info.is_last_page);
    }

    #[test]
    fn test_out_of_bounds() {
        let page = EntryCollection::paginate(&items(30), 5, 10);
        assert!(page.out_of_bounds());
        assert!(page.entries().is_empty());
        assert_eq!(page.next_page(), None);
    }

    #[test]
    fn test_zero_arguments_are_raised() {
        let page = EntryCollection::paginate(&items(5), 0, 0);
        assert_eq!(page.current_page(), 1);
        assert_eq!(page.per_page(), 1);
        assert_eq!(page.entries(), &[1]);
    }
}
