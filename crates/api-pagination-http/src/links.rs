//! RFC 8288 `Link` header values for paginated responses.
//!
//! Each relation points at the same URL with the page and per-page query
//! parameters replaced. Other query parameters are preserved.

use api_pagination_backends::NormalizedPageInfo;
use api_pagination_core::{Configuration, Param};
use url::Url;

/// A navigation relation in the `Link` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// Page 1.
    First,
    /// The preceding page.
    Prev,
    /// The following page.
    Next,
    /// The final page, when the total is known.
    Last,
}

impl Relation {
    /// The `rel` value.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Prev => "prev",
            Self::Next => "next",
            Self::Last => "last",
        }
    }
}

/// The relations for `info` and the page each one points at.
///
/// `first` and `prev` are present unless this is the first page; `next` and
/// `last` unless it is the last. `last` also needs a known page total.
pub fn relations(info: &NormalizedPageInfo) -> Vec<(Relation, u64)> {
    let mut relations = Vec::with_capacity(4);
    let current = info.current_page;

    if !info.is_first_page && current > 1 {
        let prev = info
            .total_pages
            .map_or(current - 1, |total| (current - 1).min(total.max(1)));
        relations.push((Relation::First, 1));
        relations.push((Relation::Prev, prev));
    }

    if !info.is_last_page {
        relations.push((Relation::Next, current + 1));
        if let Some(total) = info.total_pages {
            relations.push((Relation::Last, total));
        }
    }

    relations
}

/// The URL links are built on.
///
/// With both a configured `base_url` and a request URL, the request's path
/// and query are appended to the base. Otherwise whichever one is available
/// is used.
pub fn link_base(config: &Configuration, request_url: Option<&Url>) -> Option<Url> {
    let base = config.base_url.as_deref().and_then(|raw| Url::parse(raw).ok());

    match (base, request_url) {
        (Some(mut base), Some(request)) => {
            let prefix = base.path().trim_end_matches('/').to_string();
            base.set_path(&format!("{prefix}{}", request.path()));
            base.set_query(request.query());
            Some(base)
        }
        (Some(base), None) => Some(base),
        (None, Some(request)) => Some(request.clone()),
        (None, None) => None,
    }
}

/// `base` with the page and per-page parameters set.
pub fn page_url(base: &Url, page_key: &str, page: u64, per_page_key: &str, per_page: u64) -> Url {
    let kept: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(key, _)| key != page_key && key != per_page_key)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut url = base.clone();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair(page_key, &page.to_string())
        .append_pair(per_page_key, &per_page.to_string());
    url
}

/// Builds the `Link` header value, or `None` when there is nothing to link.
///
/// # Examples
///
/// ```
/// use api_pagination_backends::NormalizedPageInfo;
/// use api_pagination_core::Configuration;
/// use api_pagination_http::links::link_header;
/// use url::Url;
///
/// let info = NormalizedPageInfo {
///     current_page: 1,
///     per_page: 5,
///     total_entries: Some(50),
///     total_pages: Some(10),
///     is_first_page: true,
///     is_last_page: false,
/// };
/// let base = Url::parse("https://api.example.com/posts").unwrap();
/// let link = link_header(&info, &base, &Configuration::default()).unwrap();
/// assert_eq!(
///     link,
///     "<https://api.example.com/posts?page=2&per_page=5>; rel=\"next\", \
///      <https://api.example.com/posts?page=10&per_page=5>; rel=\"last\""
/// );
/// ```
pub fn link_header(info: &NormalizedPageInfo, base: &Url, config: &Configuration) -> Option<String> {
    let page_key = config.params().key_for(Param::Page);
    let per_page_key = config.params().key_for(Param::PerPage);

    let links: Vec<String> = relations(info)
        .into_iter()
        .map(|(relation, page)| {
            let url = page_url(base, page_key, page, per_page_key, info.per_page);
            format!("<{url}>; rel=\"{}\"", relation.as_str())
        })
        .collect();

    if links.is_empty() {
        None
    } else {
        Some(links.join(", "))
    }
}
