//! Candidate product links from a listing or search-results page.

use std::collections::HashSet;
use std::sync::LazyLock;

use fpvdb_core::{normalize_product_url, RetailerConfig};
use regex::Regex;

use crate::client::extract_origin;

/// Inline markdown link: `[text](target)`.
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("valid regex"));

/// Filters markdown links down to retailer product pages.
///
/// A link survives when it resolves to an http(s) URL whose path ends with
/// the product marker, contains none of the deny substrings, and is not a
/// known category page. Survivors are reduced to origin + path and returned
/// once each, in page order.
#[derive(Debug, Clone)]
pub struct LinkDiscoverer {
    origin: String,
    product_suffix: String,
    deny_substrings: Vec<String>,
    category_paths: Vec<String>,
    category_urls: HashSet<String>,
}

impl LinkDiscoverer {
    #[must_use]
    pub fn new(retailer: &RetailerConfig) -> Self {
        Self {
            origin: retailer.origin.trim_end_matches('/').to_owned(),
            product_suffix: retailer.product_suffix.clone(),
            deny_substrings: retailer.deny_substrings.clone(),
            category_paths: retailer.category_pages.clone(),
            category_urls: HashSet::new(),
        }
    }

    /// Also exclude these listing URLs (compared after normalization).
    #[must_use]
    pub fn with_category_urls<'a>(mut self, urls: impl IntoIterator<Item = &'a str>) -> Self {
        self.category_urls
            .extend(urls.into_iter().map(normalize_product_url));
        self
    }

    /// Candidate product URLs found in `markdown`, resolved against the
    /// origin of `base_url`, or the retailer origin when `base_url` is not
    /// an absolute http(s) URL.
    #[must_use]
    pub fn discover(&self, markdown: &str, base_url: &str) -> Vec<String> {
        let origin = if base_url.starts_with("http://") || base_url.starts_with("https://") {
            extract_origin(base_url)
        } else {
            self.origin.clone()
        };
        let mut seen = HashSet::new();
        let mut links = Vec::new();

        for caps in LINK_RE.captures_iter(markdown) {
            // `[text](/path "title")` carries an optional title after the target.
            let Some(target) = caps[2].split_whitespace().next() else {
                continue;
            };
            let Some(absolute) = resolve(target, &origin) else {
                continue;
            };
            if self.is_denied(&absolute) {
                continue;
            }
            let Ok(parsed) = reqwest::Url::parse(&absolute) else {
                continue;
            };
            let path = parsed.path();
            if !path.ends_with(&self.product_suffix) || self.is_category_path(path) {
                continue;
            }

            let clean = format!("{}{}", parsed.origin().ascii_serialization(), path);
            if self.category_urls.contains(&clean) {
                continue;
            }
            if seen.insert(clean.clone()) {
                links.push(clean);
            }
        }

        tracing::debug!(base_url, found = links.len(), "discovered candidate links");
        links
    }

    fn is_denied(&self, link: &str) -> bool {
        self.deny_substrings
            .iter()
            .any(|deny| link.contains(deny.as_str()))
    }

    fn is_category_path(&self, path: &str) -> bool {
        self.category_paths
            .iter()
            .any(|category| path.ends_with(category.as_str()))
    }
}

/// Absolute form of `target`, or `None` for anything that is neither
/// root-relative nor http(s).
fn resolve(target: &str, origin: &str) -> Option<String> {
    if let Some(rest) = target.strip_prefix("//") {
        return Some(format!("https://{rest}"));
    }
    if target.starts_with('/') {
        return Some(format!("{origin}{target}"));
    }
    if target.starts_with("http://") || target.starts_with("https://") {
        return Some(target.to_owned());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn discoverer() -> LinkDiscoverer {
        LinkDiscoverer::new(&RetailerConfig::default())
    }

    #[test]
    fn keeps_product_links_and_drops_denied_ones() {
        let md = "[Buy](/products/foo.html) [Login](/account/login.html) [Review](/review/foo.html)";
        assert_eq!(
            discoverer().discover(md, "https://example.com"),
            vec!["https://example.com/products/foo.html"]
        );
    }

    #[test]
    fn strips_query_and_dedupes_in_page_order() {
        let md = "[B](https://www.getfpv.com/b.html?color=red)\n\
                  [A](/a.html)\n\
                  [B again](https://www.getfpv.com/b.html)";
        assert_eq!(
            discoverer().discover(md, "https://www.getfpv.com/motors.html"),
            vec!["https://www.getfpv.com/b.html", "https://www.getfpv.com/a.html"]
        );
    }

    #[test]
    fn fragment_links_are_denied() {
        let md = "[Top](/motors.html#top)";
        assert!(discoverer().discover(md, "https://www.getfpv.com").is_empty());
    }

    #[test]
    fn skips_non_product_suffix_and_other_schemes() {
        let md = "[img](/media/x.jpg) [mail](mailto:a@b.html) [rel](foo.html) [js](javascript:void(0))";
        assert!(discoverer().discover(md, "https://www.getfpv.com").is_empty());
    }

    #[test]
    fn excludes_category_pages() {
        let md = "[All FPV](/fpv.html) [Motors](/motors.html) [Item](/item-1.html)";
        let links = discoverer()
            .with_category_urls(["https://www.getfpv.com/motors.html"])
            .discover(md, "https://www.getfpv.com/motors.html");
        assert_eq!(links, vec!["https://www.getfpv.com/item-1.html"]);
    }

    #[test]
    fn link_title_is_ignored() {
        let md = r#"[Item](/item-2.html "Item 2")"#;
        assert_eq!(
            discoverer().discover(md, "https://www.getfpv.com"),
            vec!["https://www.getfpv.com/item-2.html"]
        );
    }

    #[test]
    fn protocol_relative_links_resolve_to_https() {
        let md = "[Item](//www.getfpv.com/item-3.html)";
        assert_eq!(
            discoverer().discover(md, "http://localhost:1234"),
            vec!["https://www.getfpv.com/item-3.html"]
        );
    }

    #[test]
    fn relative_base_resolves_against_retailer_origin() {
        let retailer = RetailerConfig {
            origin: "https://shop.example.com/".to_owned(),
            ..RetailerConfig::default()
        };
        let links = LinkDiscoverer::new(&retailer).discover("[Item](/item-4.html)", "/motors.html");
        assert_eq!(links, vec!["https://shop.example.com/item-4.html"]);
    }

    #[test]
    fn no_links_yields_empty() {
        assert!(discoverer()
            .discover("just text, no links", "https://www.getfpv.com")
            .is_empty());
    }
}
