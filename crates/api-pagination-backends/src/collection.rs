//! The input side of every backend.
//!
//! A [`Collection`] is whatever the data-access layer hands over: something
//! that can be counted and read in offset/limit windows. Backends never see
//! more than this.

/// A countable, sliceable collection of records.
pub trait Collection {
    /// The record type.
    type Item;

    /// Returns the total number of records. May be expensive.
    fn count(&self) -> u64;

    /// Returns at most `limit` records starting at `offset`.
    fn fetch(&self, offset: u64, limit: u64) -> Vec<Self::Item>;
}

fn window(len: usize, offset: u64, limit: u64) -> std::ops::Range<usize> {
    let start = usize::try_from(offset).unwrap_or(usize::MAX).min(len);
    let limit = usize::try_from(limit).unwrap_or(usize::MAX);
    start..start.saturating_add(limit).min(len)
}

impl<T: Clone> Collection for [T] {
    type Item = T;

    fn count(&self) -> u64 {
        u64::try_from(self.len()).unwrap_or(u64::MAX)
    }

    fn fetch(&self, offset: u64, limit: u64) -> Vec<T> {
        self[window(self.len(), offset, limit)].to_vec()
    }
}

impl<T: Clone> Collection for Vec<T> {
    type Item = T;

    fn count(&self) -> u64 {
        self.as_slice().count()
    }

    fn fetch(&self, offset: u64, limit: u64) -> Vec<T> {
        self.as_slice().fetch(offset, limit)
    }
}
