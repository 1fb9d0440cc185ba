//! The end-to-end pagination call.
//!
//! One call resolves the request parameters, dispatches to the active
//! backend, adapts the result, and emits the response metadata. Nothing is
//! shared between calls except the read-only [`Configuration`].

use api_pagination_backends::{
    paginate as dispatch, register_builtin, Collection, NormalizedPageInfo, PageRequest,
};
use api_pagination_core::config_loader::apply_env_overrides;
use api_pagination_core::logging::pagination_span;
use api_pagination_core::{
    BackendId, Configuration, Extractor, ParamSource, PaginationResult, PAGINATION,
};
use api_pagination_http::{emit_with_url, ResponseMetadata};
use url::Url;

/// Per-call overrides for [`paginate`] and [`paginate_with`].
///
/// Every field defaults to "use the configuration".
#[derive(Default, Clone)]
pub struct PaginateOptions {
    /// Page number, instead of reading it from the parameters.
    pub page: Option<u64>,
    /// Page size, instead of reading it from the parameters.
    pub per_page: Option<u64>,
    /// Extraction rule for the page number, used for this call only.
    pub page_rule: Option<Extractor>,
    /// Extraction rule for the page size, used for this call only.
    pub per_page_rule: Option<Extractor>,
    /// Backend to use instead of the active one.
    pub backend: Option<BackendId>,
    /// The request URL, for the `Link` header.
    pub url: Option<Url>,
}

impl std::fmt::Debug for PaginateOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginateOptions")
            .field("page", &self.page)
            .field("per_page", &self.per_page)
            .field("page_rule", &self.page_rule.as_ref().map(|_| "<fn>"))
            .field("per_page_rule", &self.per_page_rule.as_ref().map(|_| "<fn>"))
            .field("backend", &self.backend)
            .field("url", &self.url.as_ref().map(Url::as_str))
            .finish()
    }
}

impl PaginateOptions {
    /// Options that defer everything to the configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `page` as the page number.
    #[must_use]
    pub const fn page(mut self, page: u64) -> Self {
        self.page = Some(page);
        self
    }

    /// Uses `per_page` as the page size, still capped by `max_per_page`.
    #[must_use]
    pub const fn per_page(mut self, per_page: u64) -> Self {
        self.per_page = Some(per_page);
        self
    }

    /// Reads the page number with `f` for this call.
    #[must_use]
    pub fn page_rule<F>(mut self, f: F) -> Self
    where
        F: Fn(&dyn ParamSource) -> Option<String> + Send + Sync + 'static,
    {
        self.page_rule = Some(std::sync::Arc::new(f));
        self
    }

    /// Reads the page size with `f` for this call.
    #[must_use]
    pub fn per_page_rule<F>(mut self, f: F) -> Self
    where
        F: Fn(&dyn ParamSource) -> Option<String> + Send + Sync + 'static,
    {
        self.per_page_rule = Some(std::sync::Arc::new(f));
        self
    }

    /// Dispatches to `backend` instead of the active backend.
    #[must_use]
    pub const fn backend(mut self, backend: BackendId) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Builds `Link` header targets from `url`.
    #[must_use]
    pub fn url(mut self, url: Url) -> Self {
        self.url = Some(url);
        self
    }
}

/// The records of one page plus everything needed to respond with them.
#[derive(Debug, Clone)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub backend: BackendId,
    pub info: NormalizedPageInfo,
    pub metadata: ResponseMetadata,
}

/// Paginates `collection` with an explicit configuration.
///
/// Page and page size come from `options`, then from `params` through the
/// extraction rules, then from defaults (page 1 and `default_per_page`). The
/// page size is capped by `max_per_page`.
///
/// # Errors
///
/// Returns [`AmbiguousBackend`](api_pagination_core::PaginationError::AmbiguousBackend)
/// or [`NoBackend`](api_pagination_core::PaginationError::NoBackend) when no
/// backend is active and `options` names none.
pub fn paginate_with<C>(
    config: &Configuration,
    collection: &C,
    params: &dyn ParamSource,
    options: &PaginateOptions,
) -> PaginationResult<PaginatedResponse<C::Item>>
where
    C: Collection + ?Sized,
{
    let backend = match options.backend {
        Some(backend) => backend,
        None => config.require_backend()?,
    };

    let span = pagination_span(backend.as_str());
    let _guard = span.enter();

    let resolved = config.resolve_parameters_with(
        params,
        options.page_rule.as_ref(),
        options.per_page_rule.as_ref(),
    );
    let page = options.page.or(resolved.page).unwrap_or(1);
    let per_page = config.clamp_per_page(
        options
            .per_page
            .or(resolved.per_page)
            .unwrap_or(config.default_per_page),
    );

    let request = PageRequest::new(page, per_page).include_total(config.include_total);
    let paginated = dispatch(backend, collection, request);
    let info = paginated.info();
    let metadata = emit_with_url(&info, config, options.url.as_ref());

    tracing::debug!(
        page = info.current_page,
        per_page = info.per_page,
        total = ?info.total_entries,
        "paginated"
    );

    Ok(PaginatedResponse {
        items: paginated.into_items(),
        backend,
        info,
        metadata,
    })
}

/// Paginates `collection` with the global [`PAGINATION`] configuration.
///
/// # Errors
///
/// See [`paginate_with`].
pub fn paginate<C>(
    collection: &C,
    params: &dyn ParamSource,
    options: &PaginateOptions,
) -> PaginationResult<PaginatedResponse<C::Item>>
where
    C: Collection + ?Sized,
{
    paginate_with(&PAGINATION.read(), collection, params, options)
}

/// Prepares the global configuration.
///
/// Registers the built-in backends, then applies `API_PAGINATION_*`
/// environment overrides.
///
/// # Errors
///
/// Returns an error if an environment override is invalid.
pub fn init() -> PaginationResult<()> {
    PAGINATION.configure(|config| {
        register_builtin(config);
        apply_env_overrides(config)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_pagination_core::{BackendRegistration, PaginationError, QueryParams};

    fn config_with(ids: &[BackendId]) -> Configuration {
        let mut config = Configuration::default();
        for id in ids {
            config.register_backend(BackendRegistration::present(*id));
        }
        config
    }

    fn items() -> Vec<u32> {
        (1..=50).collect()
    }

    #[test]
    fn test_reads_params() {
        let config = config_with(&[BackendId::Scope]);
        let params = QueryParams::parse("page=2&per_page=5");
        let response = paginate_with(&config, &items(), &params, &PaginateOptions::new()).unwrap();
        assert_eq!(response.items, vec![6, 7, 8, 9, 10]);
        assert_eq!(response.backend, BackendId::Scope);
        assert_eq!(response.info.total_pages, Some(10));
    }

    #[test]
    fn test_defaults_and_cap() {
        let mut config = config_with(&[BackendId::Collection]);
        let response =
            paginate_with(&config, &items(), &QueryParams::default(), &PaginateOptions::new())
                .unwrap();
        assert_eq!(response.info.current_page, 1);
        assert_eq!(response.info.per_page, 25);

        config.max_per_page = Some(10);
        let params = QueryParams::parse("per_page=500");
        let response = paginate_with(&config, &items(), &params, &PaginateOptions::new()).unwrap();
        assert_eq!(response.items.len(), 10);
    }

    #[test]
    fn test_options_win_over_params() {
        let config = config_with(&[BackendId::Scope]);
        let params = QueryParams::parse("page=2&per_page=5");
        let options = PaginateOptions::new()
            .page(3)
            .per_page(10)
            .backend(BackendId::Paginator);
        let response = paginate_with(&config, &items(), &params, &options).unwrap();
        assert_eq!(response.backend, BackendId::Paginator);
        assert_eq!(response.items.first(), Some(&21));
    }

    #[test]
    fn test_rule_overrides_are_per_call() {
        let config = config_with(&[BackendId::Scope]);
        let params = QueryParams::parse("offset_page=4&size=5");
        let options = PaginateOptions::new()
            .page_rule(|p| p.param("offset_page"))
            .per_page_rule(|p| p.param("size"));
        let response = paginate_with(&config, &items(), &params, &options).unwrap();
        assert_eq!(response.info.current_page, 4);
        assert_eq!(response.info.per_page, 5);

        let plain =
            paginate_with(&config, &items(), &params, &PaginateOptions::new()).unwrap();
        assert_eq!(plain.info.current_page, 1);
    }

    #[test]
    fn test_backend_errors() {
        let none = Configuration::default();
        let err = paginate_with(&none, &items(), &QueryParams::default(), &PaginateOptions::new())
            .unwrap_err();
        assert_eq!(err, PaginationError::NoBackend);

        let both = config_with(&[BackendId::Paginator, BackendId::Scope]);
        let err = paginate_with(&both, &items(), &QueryParams::default(), &PaginateOptions::new())
            .unwrap_err();
        assert!(matches!(err, PaginationError::AmbiguousBackend(_)));

        let options = PaginateOptions::new().backend(BackendId::Scope);
        assert!(paginate_with(&both, &items(), &QueryParams::default(), &options).is_ok());
    }
}
