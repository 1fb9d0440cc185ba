//! # api-pagination-core
//!
//! Configuration, request-parameter extraction, and backend selection for
//! api-pagination. This crate knows nothing about how a backend slices a
//! collection; it decides which backend does and with which parameters.
//!
//! ## Modules
//!
//! - [`error`] - Error type and result alias
//! - [`params`] - Parameter sources and extraction rules
//! - [`backend`] - Backend identifiers
//! - [`registry`] - Backend registrations and presence checks
//! - [`selector`] - Auto-detection and explicit selection of the active backend
//! - [`config`] - The configuration struct and the global [`PAGINATION`] instance
//! - [`config_loader`] - Loading configuration from TOML, JSON, and the environment
//! - [`logging`] - Tracing-based logging setup

pub mod backend;
pub mod config;
pub mod config_loader;
pub mod error;
pub mod logging;
pub mod params;
pub mod registry;
pub mod selector;

// Re-export the most commonly used types at the crate root.
pub use backend::BackendId;
pub use config::{Configuration, LazyConfiguration, ResponseFormat, PAGINATION};
pub use error::{PaginationError, PaginationResult};
pub use params::{
    ExtractionRule, Extractor, Param, ParamSource, ParameterResolution, ParameterResolver, QueryParams,
};
pub use registry::{BackendRegistration, BackendRegistry};
pub use selector::SelectorState;
