//! # api-pagination
//!
//! Uniform pagination headers and body metadata over interchangeable
//! pagination backends.
//!
//! This is the facade crate that re-exports the sub-crates and provides the
//! end-to-end [`paginate`] call. You can depend on `api-pagination` to get
//! everything, or on individual crates for finer-grained control.
//!
//! ## Quick Start
//!
//! ```
//! use api_pagination::{paginate_with, PaginateOptions};
//! use api_pagination::core::{BackendId, Configuration, QueryParams};
//!
//! let mut config = Configuration::default();
//! api_pagination::backends::register_builtin(&mut config);
//! config.set_backend_id(BackendId::Scope);
//!
//! let posts: Vec<u32> = (1..=50).collect();
//! let params = QueryParams::parse("page=1&per_page=5");
//! let response = paginate_with(&config, &posts, &params, &PaginateOptions::new()).unwrap();
//!
//! assert_eq!(response.items, vec![1, 2, 3, 4, 5]);
//! assert_eq!(response.metadata.header("Total"), Some("50"));
//! assert_eq!(response.metadata.header("Per-Page"), Some("5"));
//! ```

/// Configuration, parameter extraction, and backend selection.
pub use api_pagination_core as core;

/// Backend strategies and the page-info adapter.
pub use api_pagination_backends as backends;

/// Response headers and body fragment rendering.
pub use api_pagination_http as http;

pub mod paginate;

pub use paginate::{init, paginate, paginate_with, PaginateOptions, PaginatedResponse};

pub use api_pagination_backends::{Collection, NormalizedPageInfo, PageInfo};
pub use api_pagination_core::{
    BackendId, Configuration, PaginationError, PaginationResult, QueryParams, PAGINATION,
};
pub use api_pagination_http::{BodyFragment, ResponseMetadata};
