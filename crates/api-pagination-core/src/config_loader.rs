//! Configuration loading from files and the environment.
//!
//! ## Loading Order
//!
//! 1. Start with the defaults.
//! 2. Apply a TOML or JSON file.
//! 3. Apply environment variable overrides (highest priority).
//!
//! Every value passes through the same checks as the programmatic setters,
//! so a bad file fails at start-up rather than on the first request.
//!
//! ## Environment Variable Mapping
//!
//! | Env Var | Field |
//! |---|---|
//! | `API_PAGINATION_TOTAL_HEADER` | `total_header` |
//! | `API_PAGINATION_PER_PAGE_HEADER` | `per_page_header` |
//! | `API_PAGINATION_PAGE_HEADER` | `page_header` (empty unsets) |
//! | `API_PAGINATION_INCLUDE_TOTAL` | `include_total` |
//! | `API_PAGINATION_BASE_URL` | `base_url` (empty unsets) |
//! | `API_PAGINATION_DEFAULT_PER_PAGE` | `default_per_page` |
//! | `API_PAGINATION_MAX_PER_PAGE` | `max_per_page` |
//! | `API_PAGINATION_PAGE_PARAM` | page extraction key |
//! | `API_PAGINATION_PER_PAGE_PARAM` | per-page extraction key |
//! | `API_PAGINATION_BACKEND` | active backend |
//!
//! ## Examples
//!
//! ```
//! use api_pagination_core::config_loader;
//!
//! let config = config_loader::from_toml_str(r#"
//!     page_header = "X-Page"
//!     include_total = false
//!     page_param = "p"
//! "#).unwrap();
//! assert_eq!(config.page_header.as_deref(), Some("X-Page"));
//! assert!(!config.include_total);
//! ```

use std::path::Path;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::config::Configuration;
use crate::error::{PaginationError, PaginationResult};
use crate::params::Param;

/// The shape of a configuration file. Absent keys keep their current value.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub total_header: Option<String>,
    pub per_page_header: Option<String>,
    pub page_header: Option<String>,
    pub include_total: Option<bool>,
    pub base_url: Option<String>,
    pub response_formats: Option<Vec<String>>,
    pub default_per_page: Option<u64>,
    pub max_per_page: Option<u64>,
    /// Kept untyped so a non-string key, `null` included, is reported as a
    /// configuration error.
    #[serde(deserialize_with = "present")]
    pub page_param: Option<Value>,
    #[serde(deserialize_with = "present")]
    pub per_page_param: Option<Value>,
    pub backend: Option<String>,
}

/// Maps a present key to `Some`, even when its value is `null`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl ConfigFile {
    /// Applies every present value to `config`.
    pub fn apply_to(self, config: &mut Configuration) -> PaginationResult<()> {
        if let Some(v) = self.total_header {
            config.total_header = v;
        }
        if let Some(v) = self.per_page_header {
            config.per_page_header = v;
        }
        if let Some(v) = self.page_header {
            config.page_header = Some(v);
        }
        if let Some(v) = self.include_total {
            config.include_total = v;
        }
        if let Some(v) = self.base_url {
            config.set_base_url(Some(&v))?;
        }
        if let Some(formats) = self.response_formats {
            config.set_response_formats(formats)?;
        }
        if let Some(v) = self.default_per_page {
            config.default_per_page = positive("default_per_page", v)?;
        }
        if let Some(v) = self.max_per_page {
            config.max_per_page = Some(positive("max_per_page", v)?);
        }
        if let Some(v) = self.page_param {
            config.params_mut().set_rule_from_value(Param::Page, &v)?;
        }
        if let Some(v) = self.per_page_param {
            config.params_mut().set_rule_from_value(Param::PerPage, &v)?;
        }
        if let Some(v) = self.backend {
            config.set_backend(&v)?;
        }
        Ok(())
    }
}

fn positive(field: &str, value: u64) -> PaginationResult<u64> {
    if value == 0 {
        return Err(PaginationError::InvalidConfiguration(format!(
            "{field} must be greater than zero"
        )));
    }
    Ok(value)
}

/// Applies a TOML document to `config`.
pub fn apply_toml_str(config: &mut Configuration, toml_str: &str) -> PaginationResult<()> {
    let file: ConfigFile = toml::from_str(toml_str).map_err(|e| {
        PaginationError::InvalidConfiguration(format!("Failed to parse TOML: {e}"))
    })?;
    file.apply_to(config)
}

/// Applies a JSON document to `config`.
pub fn apply_json_str(config: &mut Configuration, json_str: &str) -> PaginationResult<()> {
    let file: ConfigFile = serde_json::from_str(json_str).map_err(|e| {
        PaginationError::InvalidConfiguration(format!("Failed to parse JSON: {e}"))
    })?;
    file.apply_to(config)
}

/// Loads a configuration from a TOML string.
pub fn from_toml_str(toml_str: &str) -> PaginationResult<Configuration> {
    let mut config = Configuration::default();
    apply_toml_str(&mut config, toml_str)?;
    Ok(config)
}

/// Loads a configuration from a TOML file.
pub fn from_toml_file(path: impl AsRef<Path>) -> PaginationResult<Configuration> {
    from_toml_str(&read_file(path.as_ref(), "TOML")?)
}

/// Loads a configuration from a TOML file, then applies environment overrides.
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> PaginationResult<Configuration> {
    let mut config = from_toml_file(path)?;
    apply_env_overrides(&mut config)?;
    Ok(config)
}

/// Loads a configuration from a JSON string.
pub fn from_json_str(json_str: &str) -> PaginationResult<Configuration> {
    let mut config = Configuration::default();
    apply_json_str(&mut config, json_str)?;
    Ok(config)
}

/// Loads a configuration from a JSON file.
pub fn from_json_file(path: impl AsRef<Path>) -> PaginationResult<Configuration> {
    from_json_str(&read_file(path.as_ref(), "JSON")?)
}

/// Loads a configuration from environment variables only.
pub fn from_env() -> PaginationResult<Configuration> {
    let mut config = Configuration::default();
    apply_env_overrides(&mut config)?;
    Ok(config)
}

fn read_file(path: &Path, kind: &str) -> PaginationResult<String> {
    std::fs::read_to_string(path).map_err(|e| {
        PaginationError::InvalidConfiguration(format!(
            "Failed to read {kind} file '{}': {e}",
            path.display()
        ))
    })
}

/// Applies `API_PAGINATION_*` environment variables to `config`.
pub fn apply_env_overrides(config: &mut Configuration) -> PaginationResult<()> {
    apply_overrides_from(config, |name| std::env::var(name).ok())
}

/// Applies overrides read through `lookup`, which maps an environment
/// variable name to its value.
pub fn apply_overrides_from<F>(config: &mut Configuration, lookup: F) -> PaginationResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup("API_PAGINATION_TOTAL_HEADER") {
        config.total_header = val;
    }

    if let Some(val) = lookup("API_PAGINATION_PER_PAGE_HEADER") {
        config.per_page_header = val;
    }

    if let Some(val) = lookup("API_PAGINATION_PAGE_HEADER") {
        config.page_header = non_empty(val);
    }

    if let Some(val) = lookup("API_PAGINATION_INCLUDE_TOTAL") {
        config.include_total = matches!(val.to_lowercase().as_str(), "true" | "1" | "yes");
    }

    if let Some(val) = lookup("API_PAGINATION_BASE_URL") {
        config.set_base_url(non_empty(val).as_deref())?;
    }

    if let Some(val) = lookup("API_PAGINATION_DEFAULT_PER_PAGE") {
        config.default_per_page = positive("default_per_page", parse_number(&val)?)?;
    }

    if let Some(val) = lookup("API_PAGINATION_MAX_PER_PAGE") {
        config.max_per_page = Some(positive("max_per_page", parse_number(&val)?)?);
    }

    if let Some(val) = lookup("API_PAGINATION_PAGE_PARAM") {
        config.set_page_param(val);
    }

    if let Some(val) = lookup("API_PAGINATION_PER_PAGE_PARAM") {
        config.set_per_page_param(val);
    }

    if let Some(val) = lookup("API_PAGINATION_BACKEND") {
        config.set_backend(val.trim())?;
    }

    Ok(())
}

fn non_empty(val: String) -> Option<String> {
    if val.trim().is_empty() {
        None
    } else {
        Some(val)
    }
}

fn parse_number(val: &str) -> PaginationResult<u64> {
    val.trim().parse::<u64>().map_err(|e| {
        PaginationError::InvalidConfiguration(format!("Expected a number, got '{val}': {e}"))
    })
}
