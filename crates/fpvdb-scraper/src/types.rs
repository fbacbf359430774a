//! Response types for the page retrieval service (`POST /v1/scrape`).
//!
//! ## Observed shape
//!
//! ```json
//! { "success": true,
//!   "data": { "markdown": "...", "metadata": { "title": "...", "og:image": "..." } } }
//! ```
//!
//! ### Metadata keys
//! The metadata object is open-ended. Depending on the page, the social image
//! shows up as `og:image` or as the camel-cased `ogImage`, and some pages
//! repeat meta tags, which yields an array of strings instead of a string.
//! [`PageMetadata`] keeps the raw map and resolves these variants on read.
//!
//! ### Failures
//! A 2xx response may still carry `"success": false` with an `"error"` string.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Top-level envelope returned by the scrape endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct ScrapeResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<ScrapedPage>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Content of one retrieved page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrapedPage {
    #[serde(default)]
    pub markdown: Option<String>,
    #[serde(default)]
    pub metadata: PageMetadata,
}

impl ScrapedPage {
    #[must_use]
    pub fn new(markdown: impl Into<String>, metadata: PageMetadata) -> Self {
        Self {
            markdown: Some(markdown.into()),
            metadata,
        }
    }

    /// Page markdown, or `None` when absent or empty.
    #[must_use]
    pub fn content(&self) -> Option<&str> {
        self.markdown.as_deref().filter(|m| !m.is_empty())
    }
}

/// Page-level metadata as an open key/value map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageMetadata(Map<String, Value>);

impl PageMetadata {
    /// String value of `key`. Arrays resolve to their first string element.
    /// Empty strings count as absent.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        let value = match self.0.get(key)? {
            Value::Array(items) => items.first()?,
            other => other,
        };
        value.as_str().filter(|s| !s.is_empty())
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.get_str("title")
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.get_str("description")
    }

    #[must_use]
    pub fn og_image(&self) -> Option<&str> {
        self.get_str("og:image").or_else(|| self.get_str("ogImage"))
    }
}

impl From<Map<String, Value>> for PageMetadata {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
