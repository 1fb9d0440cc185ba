//! Pagination configuration.
//!
//! This module provides the [`Configuration`] struct, which holds header
//! names, extraction rules, the backend registry and the backend selector,
//! and [`LazyConfiguration`], the globally accessible instance behind
//! [`PAGINATION`].
//!
//! The intended lifecycle is configure-then-freeze: call
//! [`PAGINATION.configure`](LazyConfiguration::configure) during start-up,
//! then only [`read`](LazyConfiguration::read) while serving traffic.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::{RwLock, RwLockReadGuard, PoisonError};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::backend::BackendId;
use crate::error::{PaginationError, PaginationResult};
use crate::params::{Extractor, Param, ParamSource, ParameterResolution, ParameterResolver};
use crate::registry::{BackendRegistration, BackendRegistry};
use crate::selector::{BackendSelector, SelectorState};

/// A response body format the emitter can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    /// `application/json`
    Json,
    /// `application/xml`
    Xml,
}

impl ResponseFormat {
    /// The identifier used in configuration.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Xml => "xml",
        }
    }

    /// The MIME type of a body rendered in this format.
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Xml => "application/xml",
        }
    }
}

impl fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseFormat {
    type Err = PaginationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "xml" => Ok(Self::Xml),
            _ => Err(PaginationError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// The complete pagination configuration.
///
/// # Examples
///
/// ```
/// use api_pagination_core::config::Configuration;
///
/// let config = Configuration::default();
/// assert_eq!(config.total_header, "Total");
/// assert_eq!(config.per_page_header, "Per-Page");
/// assert!(config.page_header.is_none());
/// assert!(config.include_total);
/// ```
#[derive(Debug)]
pub struct Configuration {
    // ── Headers ──────────────────────────────────────────────────────

    /// Header carrying the total record count.
    pub total_header: String,
    /// Header carrying the page size.
    pub per_page_header: String,
    /// Header carrying the current page; omitted when `None`.
    pub page_header: Option<String>,

    // ── Behaviour ────────────────────────────────────────────────────

    /// Whether totals are computed and emitted. Counting can be expensive.
    pub include_total: bool,
    /// Base URL for pagination links.
    pub base_url: Option<String>,
    /// Formats the body fragment may be rendered in.
    pub response_formats: BTreeSet<ResponseFormat>,
    /// Page size used when the request names none.
    pub default_per_page: u64,
    /// Upper bound on the page size a request may ask for.
    pub max_per_page: Option<u64>,

    // ── Parameters and backends ──────────────────────────────────────

    params: ParameterResolver,
    backends: BackendRegistry,
    selector: BackendSelector,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            total_header: "Total".to_string(),
            per_page_header: "Per-Page".to_string(),
            page_header: None,
            include_total: true,
            base_url: None,
            response_formats: BTreeSet::from([ResponseFormat::Json, ResponseFormat::Xml]),
            default_per_page: 25,
            max_per_page: None,
            params: ParameterResolver::new(),
            backends: BackendRegistry::new(),
            selector: BackendSelector::new(),
        }
    }
}

impl Configuration {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `format` may be rendered.
    pub fn supports_format(&self, format: ResponseFormat) -> bool {
        self.response_formats.contains(&format)
    }

    /// Parses `format` and checks it against the supported set.
    pub fn response_format(&self, format: &str) -> PaginationResult<ResponseFormat> {
        let parsed = format.parse::<ResponseFormat>()?;
        if self.supports_format(parsed) {
            Ok(parsed)
        } else {
            Err(PaginationError::UnsupportedFormat(format.to_string()))
        }
    }

    /// Replaces the supported formats from their identifiers.
    pub fn set_response_formats<I, S>(&mut self, formats: I) -> PaginationResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let parsed = formats
            .into_iter()
            .map(|f| {
                f.as_ref().parse::<ResponseFormat>().map_err(|_| {
                    PaginationError::InvalidConfiguration(format!(
                        "Unknown response format: {}",
                        f.as_ref()
                    ))
                })
            })
            .collect::<PaginationResult<BTreeSet<_>>>()?;
        self.response_formats = parsed;
        Ok(())
    }

    /// Validates and sets the base URL used for pagination links.
    pub fn set_base_url(&mut self, base_url: Option<&str>) -> PaginationResult<()> {
        if let Some(raw) = base_url {
            url::Url::parse(raw).map_err(|e| {
                PaginationError::InvalidConfiguration(format!("Invalid base_url '{raw}': {e}"))
            })?;
        }
        self.base_url = base_url.map(str::to_string);
        Ok(())
    }

    /// Clamps a requested page size to `max_per_page`.
    pub fn clamp_per_page(&self, per_page: u64) -> u64 {
        self.max_per_page
            .map_or(per_page, |max| per_page.min(max))
            .max(1)
    }

    // ── Parameter extraction ─────────────────────────────────────────

    /// The parameter resolver.
    pub const fn params(&self) -> &ParameterResolver {
        &self.params
    }

    /// The parameter resolver, for installing rules.
    pub fn params_mut(&mut self) -> &mut ParameterResolver {
        &mut self.params
    }

    /// Extracts `param`; see [`ParameterResolver::resolve`].
    pub fn resolve(
        &self,
        param: Param,
        params: &dyn ParamSource,
        override_rule: Option<&Extractor>,
    ) -> Option<String> {
        self.params.resolve(param, params, override_rule)
    }

    /// Extracts the page number using the configured rule.
    pub fn page_param(&self, params: &dyn ParamSource) -> Option<String> {
        self.params.page_param(params)
    }

    /// Extracts the per-page size using the configured rule.
    pub fn per_page_param(&self, params: &dyn ParamSource) -> Option<String> {
        self.params.per_page_param(params)
    }

    /// Reads the page number from `key`.
    pub fn set_page_param(&mut self, key: impl Into<String>) {
        self.params.set_page_param(key);
    }

    /// Reads the per-page size from `key`.
    pub fn set_per_page_param(&mut self, key: impl Into<String>) {
        self.params.set_per_page_param(key);
    }

    /// Extracts the page number with `f`.
    pub fn set_page_param_with<F>(&mut self, f: F)
    where
        F: Fn(&dyn ParamSource) -> Option<String> + Send + Sync + 'static,
    {
        self.params.set_page_param_with(f);
    }

    /// Extracts the per-page size with `f`.
    pub fn set_per_page_param_with<F>(&mut self, f: F)
    where
        F: Fn(&dyn ParamSource) -> Option<String> + Send + Sync + 'static,
    {
        self.params.set_per_page_param_with(f);
    }

    /// Resolves page and per-page as integers.
    pub fn resolve_parameters(&self, params: &dyn ParamSource) -> ParameterResolution {
        self.params.resolve_parameters(params)
    }

    /// Resolves page and per-page as integers with per-call override rules.
    pub fn resolve_parameters_with(
        &self,
        params: &dyn ParamSource,
        page_rule: Option<&Extractor>,
        per_page_rule: Option<&Extractor>,
    ) -> ParameterResolution {
        self.params
            .resolve_parameters_with(params, page_rule, per_page_rule)
    }

    // ── Backends ─────────────────────────────────────────────────────

    /// Registers a backend for detection.
    pub fn register_backend(&mut self, registration: BackendRegistration) {
        tracing::debug!(backend = %registration.id(), "registering pagination backend");
        self.backends.register(registration);
    }

    /// The backend registry.
    pub const fn backends(&self) -> &BackendRegistry {
        &self.backends
    }

    /// The active backend, detected on first access.
    pub fn backend(&self) -> Option<BackendId> {
        self.selector.active_backend(&self.backends)
    }

    /// The active backend, or the reason there is none.
    pub fn require_backend(&self) -> PaginationResult<BackendId> {
        self.selector.require(&self.backends)
    }

    /// The selector's current state.
    pub fn backend_state(&self) -> SelectorState {
        self.selector.state()
    }

    /// Selects the backend named `id`.
    pub fn set_backend(&mut self, id: &str) -> PaginationResult<BackendId> {
        self.selector.select(id, &self.backends)
    }

    /// Selects `id`.
    pub fn set_backend_id(&mut self, id: BackendId) {
        self.selector.select_id(id, &self.backends);
    }

    /// Forgets any selection and detects again on next access.
    pub fn detect_backend(&mut self) {
        self.selector.reset();
    }
}

/// A lazily created, globally accessible configuration.
///
/// Created with defaults on first access. Mutation goes through
/// [`configure`](Self::configure); request handling reads through
/// [`read`](Self::read). The lock exists so the configure scope is sound; it
/// is not meant to make reconfiguration under live traffic a supported mode.
pub struct LazyConfiguration {
    inner: Lazy<RwLock<Configuration>>,
}

fn default_configuration() -> RwLock<Configuration> {
    RwLock::new(Configuration::default())
}

impl Default for LazyConfiguration {
    fn default() -> Self {
        Self::new()
    }
}

impl LazyConfiguration {
    /// Creates a new, not yet initialized instance.
    pub const fn new() -> Self {
        Self {
            inner: Lazy::new(default_configuration),
        }
    }

    /// Runs `f` with exclusive access to the configuration.
    ///
    /// The closure's error is returned unchanged so configuration mistakes
    /// surface at start-up.
    ///
    /// # Examples
    ///
    /// ```
    /// use api_pagination_core::config::LazyConfiguration;
    ///
    /// let config = LazyConfiguration::new();
    /// config
    ///     .configure(|c| {
    ///         c.page_header = Some("X-Page".to_string());
    ///         c.set_page_param("p");
    ///         Ok(())
    ///     })
    ///     .unwrap();
    /// assert_eq!(config.read().page_header.as_deref(), Some("X-Page"));
    /// ```
    pub fn configure<R, F>(&self, f: F) -> PaginationResult<R>
    where
        F: FnOnce(&mut Configuration) -> PaginationResult<R>,
    {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// Returns shared access to the configuration.
    pub fn read(&self) -> RwLockReadGuard<'_, Configuration> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Restores the defaults, dropping registrations and rules.
    pub fn reset(&self) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Configuration::default();
    }
}

/// The global configuration instance.
pub static PAGINATION: LazyConfiguration = LazyConfiguration::new();
