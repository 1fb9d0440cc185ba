//! # api-pagination-http
//!
//! Response metadata for paginated API responses: the pagination headers, an
//! RFC 8288 `Link` header, and a body fragment rendered as JSON or XML.
//!
//! ## Modules
//!
//! - [`emitter`] - [`emit`] and [`ResponseMetadata`]
//! - [`body`] - [`BodyFragment`] and its renderings
//! - [`links`] - `Link` header construction

pub mod body;
pub mod emitter;
pub mod links;

pub use body::BodyFragment;
pub use emitter::{emit, emit_with_url, ResponseMetadata};
