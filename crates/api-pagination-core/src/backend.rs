//! Identifiers for the pagination backends the adapter knows about.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PaginationError;

/// One of the interchangeable pagination strategies.
///
/// The declaration order is the detection priority: when the selector checks
/// for available backends it walks [`BackendId::PRIORITY`] from left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendId {
    /// Numbered-page paginator that always counts the collection.
    Paginator,
    /// Chainable `page(n).per(k)` scope that can skip the count query.
    Scope,
    /// Entry collection that reports previous/next page numbers.
    Collection,
}

impl BackendId {
    /// All backends, in detection priority order.
    pub const PRIORITY: [Self; 3] = [Self::Paginator, Self::Scope, Self::Collection];

    /// Returns the identifier used in configuration files and environment
    /// variables.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Paginator => "paginator",
            Self::Scope => "scope",
            Self::Collection => "collection",
        }
    }
}

impl fmt::Display for BackendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendId {
    type Err = PaginationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::PRIORITY
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| PaginationError::UnknownBackend(s.to_string()))
    }
}
