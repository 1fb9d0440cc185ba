//! The pagination fragment embedded in response bodies.
//!
//! JSON goes through `serde_json`; XML is written by hand since the fragment
//! is four integers deep.

use std::fmt::Write;

use api_pagination_backends::NormalizedPageInfo;
use api_pagination_core::ResponseFormat;
use serde::Serialize;
use serde_json::Value;

/// Page metadata for a response body.
///
/// Totals are `None` when they were not computed or are switched off with
/// `include_total`; absent totals are omitted from every rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BodyFragment {
    pub current_page: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u64>,
    pub per_page: u64,
}

impl BodyFragment {
    /// Builds the fragment from normalized page info.
    pub const fn new(info: &NormalizedPageInfo, include_total: bool) -> Self {
        if include_total {
            Self {
                current_page: info.current_page,
                total_pages: info.total_pages,
                total_count: info.total_entries,
                per_page: info.per_page,
            }
        } else {
            Self {
                current_page: info.current_page,
                total_pages: None,
                total_count: None,
                per_page: info.per_page,
            }
        }
    }

    /// The fragment as a JSON object, for merging into a larger body.
    pub fn to_json_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_default()
    }

    /// The fragment as a compact JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Renders a standalone `<pagination>` document.
    ///
    /// # Examples
    ///
    /// ```
    /// use api_pagination_http::BodyFragment;
    ///
    /// let body = BodyFragment {
    ///     current_page: 2,
    ///     total_pages: None,
    ///     total_count: None,
    ///     per_page: 5,
    /// };
    /// let xml = body.to_xml();
    /// assert!(xml.contains("<current_page>2</current_page>"));
    /// assert!(!xml.contains("total_count"));
    /// ```
    pub fn to_xml(&self) -> String {
        let mut xml = String::new();
        xml.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
        xml.push_str("<pagination>\n");
        let _ = writeln!(xml, "  <current_page>{}</current_page>", self.current_page);
        if let Some(total_pages) = self.total_pages {
            let _ = writeln!(xml, "  <total_pages>{total_pages}</total_pages>");
        }
        if let Some(total_count) = self.total_count {
            let _ = writeln!(xml, "  <total_count>{total_count}</total_count>");
        }
        let _ = writeln!(xml, "  <per_page>{}</per_page>", self.per_page);
        xml.push_str("</pagination>\n");
        xml
    }

    /// Renders the fragment in `format`.
    pub fn render(&self, format: ResponseFormat) -> String {
        match format {
            ResponseFormat::Json => self.to_json(),
            ResponseFormat::Xml => self.to_xml(),
        }
    }
}
