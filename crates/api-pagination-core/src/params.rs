//! Request-parameter extraction.
//!
//! A request layer hands the adapter "some mapping of parameter names to
//! values". [`ParamSource`] is that mapping; it is implemented for the usual
//! map types, for JSON objects, and for [`QueryParams`], a parsed query
//! string.
//!
//! [`ParameterResolver`] decides how the page number and per-page size are
//! pulled out of a source. Each of the two parameters has an
//! [`ExtractionRule`]: a fixed key name or a custom function. When no rule
//! was configured, the first lookup installs the default rule (the
//! parameter's own name) and every later lookup reuses it.
//!
//! # Examples
//!
//! ```
//! use std::collections::HashMap;
//! use api_pagination_core::params::ParameterResolver;
//!
//! let mut resolver = ParameterResolver::new();
//! let params = HashMap::from([("p", "3"), ("page", "1")]);
//!
//! assert_eq!(resolver.page_param(&params).as_deref(), Some("1"));
//!
//! resolver.set_page_param("p");
//! assert_eq!(resolver.page_param(&params).as_deref(), Some("3"));
//! ```

use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::sync::{Arc, OnceLock};

use serde_json::Value;

use crate::error::{PaginationError, PaginationResult};

/// A mapping of request parameter names to values.
pub trait ParamSource {
    /// Returns the value stored under `key`, if any.
    fn param(&self, key: &str) -> Option<String>;
}

impl<K, V, S> ParamSource for HashMap<K, V, S>
where
    K: Borrow<str> + Eq + Hash,
    V: AsRef<str>,
    S: BuildHasher,
{
    fn param(&self, key: &str) -> Option<String> {
        self.get(key).map(|v| v.as_ref().to_string())
    }
}

impl<K, V> ParamSource for BTreeMap<K, V>
where
    K: Borrow<str> + Ord,
    V: AsRef<str>,
{
    fn param(&self, key: &str) -> Option<String> {
        self.get(key).map(|v| v.as_ref().to_string())
    }
}

/// Pairs in request order. When a key repeats, the last value wins.
impl<K, V> ParamSource for Vec<(K, V)>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    fn param(&self, key: &str) -> Option<String> {
        self.iter()
            .rev()
            .find(|(k, _)| k.as_ref() == key)
            .map(|(_, v)| v.as_ref().to_string())
    }
}

impl ParamSource for serde_json::Map<String, Value> {
    fn param(&self, key: &str) -> Option<String> {
        self.get(key).and_then(scalar_to_string)
    }
}

impl ParamSource for Value {
    fn param(&self, key: &str) -> Option<String> {
        self.as_object().and_then(|map| map.param(key))
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Parameters parsed from a URL query string.
///
/// Keys and values are percent-decoded. Repeated keys keep every value;
/// lookups return the last one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Parses a query string such as `"page=2&per_page=10"`.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self {
            pairs: url::form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect(),
        }
    }

    /// Collects the query parameters of a URL.
    pub fn from_url(url: &url::Url) -> Self {
        Self {
            pairs: url.query_pairs().into_owned().collect(),
        }
    }

    /// Returns the number of key/value pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns `true` if no parameters were present.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl ParamSource for QueryParams {
    fn param(&self, key: &str) -> Option<String> {
        self.pairs.param(key)
    }
}

/// The two parameters the resolver knows how to extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Param {
    /// The 1-based page number.
    Page,
    /// The number of items per page.
    PerPage,
}

impl Param {
    /// The default key the parameter is read from.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::PerPage => "per_page",
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A custom extraction function.
pub type Extractor = Arc<dyn Fn(&dyn ParamSource) -> Option<String> + Send + Sync>;

/// How a parameter is pulled out of a [`ParamSource`].
#[derive(Clone)]
pub enum ExtractionRule {
    /// Read the value stored under a fixed key.
    Key(String),
    /// Call a custom function; key lookup is not used at all.
    Custom(Extractor),
}

impl ExtractionRule {
    /// A rule that reads `key`.
    pub fn key(key: impl Into<String>) -> Self {
        Self::Key(key.into())
    }

    /// A rule that calls `f`.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&dyn ParamSource) -> Option<String> + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    /// Builds a fixed-key rule from a dynamically typed value, as found in
    /// configuration files.
    ///
    /// Only strings name a key. Anything else is rejected with
    /// [`PaginationError::InvalidConfiguration`].
    pub fn from_value(param: Param, value: &Value) -> PaginationResult<Self> {
        match value {
            Value::String(key) => Ok(Self::Key(key.clone())),
            other => Err(PaginationError::InvalidConfiguration(format!(
                "Cannot set {param}_param option to {other}: expected a string key"
            ))),
        }
    }

    /// Applies the rule to `params`.
    pub fn extract(&self, params: &dyn ParamSource) -> Option<String> {
        match self {
            Self::Key(key) => params.param(key),
            Self::Custom(f) => f(params),
        }
    }
}

impl fmt::Debug for ExtractionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.debug_tuple("Key").field(key).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// The page and per-page values resolved for one request.
///
/// `None` means the rule produced no usable value; the caller applies its
/// own default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParameterResolution {
    /// Requested page number.
    pub page: Option<u64>,
    /// Requested page size.
    pub per_page: Option<u64>,
}

/// Resolves page and per-page values from request parameters.
#[derive(Debug, Default)]
pub struct ParameterResolver {
    page: OnceLock<ExtractionRule>,
    per_page: OnceLock<ExtractionRule>,
}

impl ParameterResolver {
    /// Creates a resolver with no rules configured.
    pub fn new() -> Self {
        Self::default()
    }

    const fn slot(&self, param: Param) -> &OnceLock<ExtractionRule> {
        match param {
            Param::Page => &self.page,
            Param::PerPage => &self.per_page,
        }
    }

    fn slot_mut(&mut self, param: Param) -> &mut OnceLock<ExtractionRule> {
        match param {
            Param::Page => &mut self.page,
            Param::PerPage => &mut self.per_page,
        }
    }

    /// Returns the rule currently installed for `param`, if any.
    pub fn rule(&self, param: Param) -> Option<&ExtractionRule> {
        self.slot(param).get()
    }

    /// Installs `rule` for `param`, replacing whatever was there.
    pub fn set_rule(&mut self, param: Param, rule: ExtractionRule) {
        *self.slot_mut(param) = OnceLock::from(rule);
    }

    /// Installs a fixed-key rule from a dynamically typed value.
    pub fn set_rule_from_value(&mut self, param: Param, value: &Value) -> PaginationResult<()> {
        let rule = ExtractionRule::from_value(param, value)?;
        self.set_rule(param, rule);
        Ok(())
    }

    /// Removes the rule for `param`; the next lookup installs the default.
    pub fn clear_rule(&mut self, param: Param) {
        *self.slot_mut(param) = OnceLock::new();
    }

    /// Extracts `param` from `params`.
    ///
    /// An `override_rule` is invoked directly and is not remembered.
    /// Otherwise the configured rule is used, installing the default
    /// key lookup on first use.
    pub fn resolve(
        &self,
        param: Param,
        params: &dyn ParamSource,
        override_rule: Option<&Extractor>,
    ) -> Option<String> {
        if let Some(f) = override_rule {
            return f(params);
        }

        self.slot(param)
            .get_or_init(|| {
                tracing::debug!(param = param.name(), "installing default extraction rule");
                ExtractionRule::key(param.name())
            })
            .extract(params)
    }

    /// Extracts the page number using the configured rule.
    pub fn page_param(&self, params: &dyn ParamSource) -> Option<String> {
        self.resolve(Param::Page, params, None)
    }

    /// Extracts the per-page size using the configured rule.
    pub fn per_page_param(&self, params: &dyn ParamSource) -> Option<String> {
        self.resolve(Param::PerPage, params, None)
    }

    /// Reads the page number from `key` from now on.
    pub fn set_page_param(&mut self, key: impl Into<String>) {
        self.set_rule(Param::Page, ExtractionRule::key(key));
    }

    /// Reads the per-page size from `key` from now on.
    pub fn set_per_page_param(&mut self, key: impl Into<String>) {
        self.set_rule(Param::PerPage, ExtractionRule::key(key));
    }

    /// Extracts the page number with `f` from now on.
    pub fn set_page_param_with<F>(&mut self, f: F)
    where
        F: Fn(&dyn ParamSource) -> Option<String> + Send + Sync + 'static,
    {
        self.set_rule(Param::Page, ExtractionRule::custom(f));
    }

    /// Extracts the per-page size with `f` from now on.
    pub fn set_per_page_param_with<F>(&mut self, f: F)
    where
        F: Fn(&dyn ParamSource) -> Option<String> + Send + Sync + 'static,
    {
        self.set_rule(Param::PerPage, ExtractionRule::custom(f));
    }

    /// The key used when writing `param` back into a URL.
    ///
    /// Fixed-key rules write to their key; custom and unset rules fall back
    /// to the parameter's default name.
    pub fn key_for(&self, param: Param) -> &str {
        match self.rule(param) {
            Some(ExtractionRule::Key(key)) => key,
            _ => param.name(),
        }
    }

    /// Resolves both parameters and parses them as positive integers.
    ///
    /// Values that are missing, unparsable, or zero resolve to `None`.
    pub fn resolve_parameters(&self, params: &dyn ParamSource) -> ParameterResolution {
        self.resolve_parameters_with(params, None, None)
    }

    /// Like [`resolve_parameters`](Self::resolve_parameters), with optional
    /// per-call override rules.
    pub fn resolve_parameters_with(
        &self,
        params: &dyn ParamSource,
        page_rule: Option<&Extractor>,
        per_page_rule: Option<&Extractor>,
    ) -> ParameterResolution {
        ParameterResolution {
            page: self
                .resolve(Param::Page, params, page_rule)
                .as_deref()
                .and_then(parse_positive),
            per_page: self
                .resolve(Param::PerPage, params, per_page_rule)
                .as_deref()
                .and_then(parse_positive),
        }
    }
}

fn parse_positive(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok().filter(|n| *n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_default_rule_reads_param_name() {
        let resolver = ParameterResolver::new();
        let p = params(&[("page", "2"), ("per_page", "10")]);
        assert_eq!(resolver.page_param(&p).as_deref(), Some("2"));
        assert_eq!(resolver.per_page_param(&p).as_deref(), Some("10"));
    }

    #[test]
    fn test_default_rule_is_memoized() {
        let resolver = ParameterResolver::new();
        assert!(resolver.rule(Param::Page).is_none());

        let _ = resolver.page_param(&params(&[]));
        match resolver.rule(Param::Page) {
            Some(ExtractionRule::Key(key)) => assert_eq!(key, "page"),
            other => panic!("expected default key rule, got {other:?}"),
        }
        assert!(resolver.rule(Param::PerPage).is_none());
    }

    #[test]
    fn test_fixed_key_rule_present_and_absent() {
        let mut resolver = ParameterResolver::new();
        resolver.set_page_param("p");

        assert_eq!(resolver.page_param(&params(&[("p", "4")])).as_deref(), Some("4"));
        assert_eq!(resolver.page_param(&params(&[("page", "4")])), None);
        assert_eq!(resolver.page_param(&params(&[])), None);
    }

    #[test]
    fn test_custom_rule_replaces_key_lookup() {
        let mut resolver = ParameterResolver::new();
        resolver.set_per_page_param("size");
        resolver.set_per_page_param_with(|p| p.param("page_size").map(|v| format!("{v}0")));

        let p = params(&[("size", "5"), ("per_page", "7"), ("page_size", "3")]);
        assert_eq!(resolver.per_page_param(&p).as_deref(), Some("30"));
        assert_eq!(resolver.per_page_param(&params(&[("per_page", "7")])), None);
    }

    #[test]
    fn test_custom_rule_invoked_every_time() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut resolver = ParameterResolver::new();
        resolver.set_per_page_param_with(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Some("12".to_string())
        });

        for _ in 0..3 {
            assert_eq!(resolver.per_page_param(&params(&[])).as_deref(), Some("12"));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_override_rule_not_persisted() {
        let resolver = ParameterResolver::new();
        let override_rule: Extractor = Arc::new(|_| Some("9".to_string()));
        let p = params(&[("page", "1")]);

        assert_eq!(
            resolver.resolve(Param::Page, &p, Some(&override_rule)).as_deref(),
            Some("9")
        );
        assert!(resolver.rule(Param::Page).is_none());
        assert_eq!(resolver.page_param(&p).as_deref(), Some("1"));
    }

    #[test]
    fn test_set_rule_from_value_rejects_non_strings() {
        let mut resolver = ParameterResolver::new();
        for value in [
            serde_json::json!(5),
            serde_json::json!(true),
            serde_json::json!(["page"]),
            serde_json::json!({"key": "page"}),
            Value::Null,
        ] {
            let err = resolver.set_rule_from_value(Param::Page, &value).unwrap_err();
            assert!(matches!(err, PaginationError::InvalidConfiguration(_)));
        }
        assert!(resolver.rule(Param::Page).is_none());

        resolver
            .set_rule_from_value(Param::Page, &serde_json::json!("p"))
            .unwrap();
        assert_eq!(resolver.key_for(Param::Page), "p");
    }

    #[test]
    fn test_key_for_custom_rule_uses_default_name() {
        let mut resolver = ParameterResolver::new();
        assert_eq!(resolver.key_for(Param::PerPage), "per_page");
        resolver.set_per_page_param_with(|_| None);
        assert_eq!(resolver.key_for(Param::PerPage), "per_page");
    }

    #[test]
    fn test_clear_rule() {
        let mut resolver = ParameterResolver::new();
        resolver.set_page_param("p");
        resolver.clear_rule(Param::Page);
        assert!(resolver.rule(Param::Page).is_none());
    }

    #[test]
    fn test_resolve_parameters_parses_integers() {
        let resolver = ParameterResolver::new();
        let resolved = resolver.resolve_parameters(&params(&[("page", " 3 "), ("per_page", "abc")]));
        assert_eq!(resolved.page, Some(3));
        assert_eq!(resolved.per_page, None);

        let resolved = resolver.resolve_parameters(&params(&[("page", "0")]));
        assert_eq!(resolved, ParameterResolution::default());
    }

    #[test]
    fn test_query_params() {
        let qp = QueryParams::parse("?page=2&per_page=10&page=5&q=a%20b");
        assert_eq!(qp.len(), 4);
        assert_eq!(qp.param("page").as_deref(), Some("5"));
        assert_eq!(qp.param("q").as_deref(), Some("a b"));
        assert!(QueryParams::parse("").is_empty());
    }

    #[test]
    fn test_json_source() {
        let value = serde_json::json!({"page": 2, "per_page": "25", "flag": true});
        assert_eq!(value.param("page").as_deref(), Some("2"));
        assert_eq!(value.param("per_page").as_deref(), Some("25"));
        assert_eq!(value.param("flag"), None);
        assert_eq!(serde_json::json!([1, 2]).param("page"), None);
    }

    #[test]
    fn test_btree_and_pairs_sources() {
        let btree = BTreeMap::from([("page", "8")]);
        assert_eq!(btree.param("page").as_deref(), Some("8"));

        let pairs = vec![("page", "1"), ("page", "2")];
        assert_eq!(pairs.param("page").as_deref(), Some("2"));
    }

    #[test]
    fn test_resolve_parameters_with_override() {
        let mut resolver = ParameterResolver::new();
        resolver.set_page_param("p");
        let p = params(&[("p", "4"), ("page", "9"), ("limit", "15")]);
        let limit: Extractor = Arc::new(|source: &dyn ParamSource| source.param("limit"));

        let resolved = resolver.resolve_parameters_with(&p, None, Some(&limit));
        assert_eq!(resolved.page, Some(4));
        assert_eq!(resolved.per_page, Some(15));
        assert_eq!(resolver.resolve_parameters(&p).per_page, None);
    }
}
