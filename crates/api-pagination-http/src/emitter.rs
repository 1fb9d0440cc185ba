//! Turns normalized page info into response headers and a body fragment.
//!
//! Header values are decimal integer strings. Header names come from the
//! [`Configuration`], so they are validated only when applied to an
//! [`http::HeaderMap`].

use api_pagination_backends::NormalizedPageInfo;
use api_pagination_core::{Configuration, PaginationError, PaginationResult};
use http::header::{HeaderName, HeaderValue, LINK};
use http::HeaderMap;
use url::Url;

use crate::body::BodyFragment;
use crate::links::{link_base, link_header};

/// Headers and body fragment for one paginated response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseMetadata {
    headers: Vec<(String, String)>,
    body: BodyFragment,
}

/// Emits metadata for `info` without a request URL.
///
/// A `Link` header is still produced when `base_url` is configured.
///
/// # Examples
///
/// ```
/// use api_pagination_backends::NormalizedPageInfo;
/// use api_pagination_core::Configuration;
/// use api_pagination_http::emit;
///
/// let info = NormalizedPageInfo {
///     current_page: 1,
///     per_page: 5,
///     total_entries: Some(50),
///     total_pages: Some(10),
///     is_first_page: true,
///     is_last_page: false,
/// };
/// let metadata = emit(&info, &Configuration::default());
/// assert_eq!(metadata.header("Total"), Some("50"));
/// assert_eq!(metadata.header("Per-Page"), Some("5"));
/// ```
pub fn emit(info: &NormalizedPageInfo, config: &Configuration) -> ResponseMetadata {
    emit_with_url(info, config, None)
}

/// Emits metadata for `info`, linking relative to `request_url`.
pub fn emit_with_url(
    info: &NormalizedPageInfo,
    config: &Configuration,
    request_url: Option<&Url>,
) -> ResponseMetadata {
    let mut headers = Vec::with_capacity(4);

    if config.include_total {
        if let Some(total) = info.total_entries {
            headers.push((config.total_header.clone(), total.to_string()));
        }
    }
    headers.push((config.per_page_header.clone(), info.per_page.to_string()));
    if let Some(page_header) = &config.page_header {
        headers.push((page_header.clone(), info.current_page.to_string()));
    }

    let mut linked = *info;
    if !config.include_total {
        linked.total_entries = None;
        linked.total_pages = None;
    }
    if let Some(link) = link_base(config, request_url)
        .and_then(|base| link_header(&linked, &base, config))
    {
        headers.push((LINK.as_str().to_string(), link));
    }

    tracing::trace!(
        page = info.current_page,
        per_page = info.per_page,
        headers = headers.len(),
        "emitted pagination metadata"
    );

    ResponseMetadata {
        headers,
        body: BodyFragment::new(info, config.include_total),
    }
}

impl ResponseMetadata {
    /// The headers in emission order.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Looks up a header value, ignoring ASCII case in the name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// The body fragment, for callers that merge it into their own body.
    pub const fn body(&self) -> &BodyFragment {
        &self.body
    }

    /// Writes the headers into `map`, replacing existing values.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::InvalidConfiguration`] if a configured
    /// header name is not a valid HTTP header name.
    pub fn apply_to(&self, map: &mut HeaderMap) -> PaginationResult<()> {
        for (name, value) in &self.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                PaginationError::InvalidConfiguration(format!("Invalid header name '{name}': {e}"))
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|e| {
                PaginationError::InvalidConfiguration(format!(
                    "Invalid value for header '{name}': {e}"
                ))
            })?;
            map.insert(header_name, header_value);
        }
        Ok(())
    }

    /// The headers as a new [`HeaderMap`].
    pub fn to_header_map(&self) -> PaginationResult<HeaderMap> {
        let mut map = HeaderMap::with_capacity(self.headers.len());
        self.apply_to(&mut map)?;
        Ok(map)
    }

    /// Renders the body fragment in the named format.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::UnsupportedFormat`] if `format` is unknown
    /// or not enabled in `response_formats`.
    pub fn render_body(&self, format: &str, config: &Configuration) -> PaginationResult<String> {
        let format = config.response_format(format)?;
        Ok(self.body.render(format))
    }
}
