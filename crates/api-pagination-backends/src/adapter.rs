//! A uniform read surface over every backend's page type.
//!
//! Each backend names its page metadata differently (`number` vs
//! `current_page`, `count` vs `total_count` vs `total_entries`, native
//! first/last flags or only previous/next page numbers). Each backend page
//! type implements [`PageInfo`], and [`adapt`] projects any of them into a
//! [`NormalizedPageInfo`]. The projection only reads; nothing is cached or
//! written back into the page.

use serde::Serialize;

/// The capability every backend page exposes.
pub trait PageInfo {
    /// The 1-based page number actually returned.
    fn current_page(&self) -> u64;

    /// The page size used to slice the collection.
    fn per_page(&self) -> u64;

    /// Total records across all pages, if they were counted.
    fn total_entries(&self) -> Option<u64>;

    /// Total number of pages, if known.
    ///
    /// Defaults to the ceiling division of [`total_entries`](Self::total_entries)
    /// by [`per_page`](Self::per_page).
    fn total_pages(&self) -> Option<u64> {
        self.total_entries()
            .map(|total| total_pages_for(total, self.per_page()))
    }

    /// Whether this is the first page.
    fn is_first_page(&self) -> bool;

    /// Whether this is the last page.
    fn is_last_page(&self) -> bool;
}

/// Ceiling division of `total` by `per_page`; zero when `per_page` is zero.
pub const fn total_pages_for(total: u64, per_page: u64) -> u64 {
    if per_page == 0 {
        0
    } else {
        total.div_ceil(per_page)
    }
}

/// Backend-independent page metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NormalizedPageInfo {
    pub current_page: u64,
    pub per_page: u64,
    /// `None` when totals were not computed.
    pub total_entries: Option<u64>,
    pub total_pages: Option<u64>,
    pub is_first_page: bool,
    pub is_last_page: bool,
}

impl PageInfo for NormalizedPageInfo {
    fn current_page(&self) -> u64 {
        self.current_page
    }

    fn per_page(&self) -> u64 {
        self.per_page
    }

    fn total_entries(&self) -> Option<u64> {
        self.total_entries
    }

    fn total_pages(&self) -> Option<u64> {
        self.total_pages
    }

    fn is_first_page(&self) -> bool {
        self.is_first_page
    }

    fn is_last_page(&self) -> bool {
        self.is_last_page
    }
}

/// Projects any backend page into [`NormalizedPageInfo`].
pub fn adapt<P: PageInfo + ?Sized>(page: &P) -> NormalizedPageInfo {
    NormalizedPageInfo {
        current_page: page.current_page(),
        per_page: page.per_page(),
        total_entries: page.total_entries(),
        total_pages: page.total_pages(),
        is_first_page: page.is_first_page(),
        is_last_page: page.is_last_page(),
    }
}
