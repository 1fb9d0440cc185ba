//! Error types for api-pagination.
//!
//! Every failure the adapter can report is a [`PaginationError`]. These are
//! configuration-time or logic errors, never transient ones, so nothing in
//! the workspace retries on them.

use thiserror::Error;

use crate::backend::BackendId;

/// The primary error type for api-pagination.
///
/// Each variant maps to an HTTP status code via [`PaginationError::status_code`]
/// so a request layer can turn a failed pagination call into a response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaginationError {
    // ── Configuration ────────────────────────────────────────────────

    /// A configuration value has the wrong shape (for example, an
    /// extraction-rule key that is not a string).
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A backend identifier that names none of the known strategies.
    #[error("Unknown paginator: {0}")]
    UnknownBackend(String),

    // ── Backend selection ────────────────────────────────────────────

    /// Several backends were detected and none was selected explicitly.
    #[error("Ambiguous pagination backend: {} are all present, select one explicitly", join_ids(.0))]
    AmbiguousBackend(Vec<BackendId>),

    /// No backend is present and the caller supplied no override.
    #[error("No pagination backend is available")]
    NoBackend,

    // ── Rendering ────────────────────────────────────────────────────

    /// A response format outside the configured set was requested.
    #[error("Unsupported response format: {0}")]
    UnsupportedFormat(String),

    // ── Requests ─────────────────────────────────────────────────────

    /// The requested page cannot be served.
    #[error("Invalid page: {0}")]
    InvalidPage(String),
}

impl PaginationError {
    /// Returns the HTTP status code associated with this error.
    ///
    /// - `InvalidPage` -> 400
    /// - `UnsupportedFormat` -> 406
    /// - Everything else -> 500
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidPage(_) => 400,
            Self::UnsupportedFormat(_) => 406,
            Self::InvalidConfiguration(_)
            | Self::UnknownBackend(_)
            | Self::AmbiguousBackend(_)
            | Self::NoBackend => 500,
        }
    }

    /// Returns `true` for errors caused by how the adapter was configured,
    /// as opposed to what a single request asked for.
    pub const fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfiguration(_)
                | Self::UnknownBackend(_)
                | Self::AmbiguousBackend(_)
                | Self::NoBackend
        )
    }
}

fn join_ids(ids: &[BackendId]) -> String {
    ids.iter()
        .map(|id| id.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A convenience type alias for `Result<T, PaginationError>`.
pub type PaginationResult<T> = Result<T, PaginationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(PaginationError::InvalidPage("0".into()).status_code(), 400);
        assert_eq!(PaginationError::UnsupportedFormat("csv".into()).status_code(), 406);
        assert_eq!(PaginationError::NoBackend.status_code(), 500);
        assert_eq!(PaginationError::UnknownBackend("x".into()).status_code(), 500);
        assert_eq!(
            PaginationError::InvalidConfiguration("x".into()).status_code(),
            500
        );
        assert_eq!(
            PaginationError::AmbiguousBackend(vec![BackendId::Scope]).status_code(),
            500
        );
    }

    #[test]
    fn test_display() {
        let err = PaginationError::UnknownBackend("unknownX".into());
        assert_eq!(err.to_string(), "Unknown paginator: unknownX");

        let err = PaginationError::AmbiguousBackend(vec![BackendId::Scope, BackendId::Collection]);
        assert!(err.to_string().contains("scope, collection"));
    }

    #[test]
    fn test_is_configuration_error() {
        assert!(PaginationError::NoBackend.is_configuration_error());
        assert!(!PaginationError::UnsupportedFormat("csv".into()).is_configuration_error());
        assert!(!PaginationError::InvalidPage("0".into()).is_configuration_error());
    }
}
