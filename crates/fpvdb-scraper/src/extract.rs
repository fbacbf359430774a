//! Field extraction from a retrieved product page.
//!
//! Everything here is best-effort: missing fields fall back to placeholders
//! and a zero price, and it is up to the caller to reject the result.

use std::str::FromStr;
use std::sync::LazyLock;

use fpvdb_core::RetailerConfig;
use indexmap::IndexMap;
use regex::Regex;
use rust_decimal::Decimal;

use crate::types::ScrapedPage;

pub const UNKNOWN_NAME: &str = "Unknown Product";
pub const NO_DESCRIPTION: &str = "No description available.";

const MAX_SPEC_KEY_CHARS: usize = 30;
const MAX_SPEC_VALUE_CHARS: usize = 100;

/// `$` amount with optional thousands separators and two-digit cents.
static PRICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$(\d{1,3}(?:,\d{3})+|\d+)(\.\d{2})?").expect("valid regex")
});

/// Bulleted `- Key: Value` line.
static SPEC_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-*]\s*([^:]+):\s*(.+)$").expect("valid regex"));

/// Fields pulled from one product page.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedFields {
    pub name: String,
    /// Zero when the page shows no price.
    pub price: Decimal,
    pub description: String,
    pub image_url: Option<String>,
    pub specs: IndexMap<String, String>,
}

#[must_use]
pub fn extract_fields(page: &ScrapedPage, retailer: &RetailerConfig) -> ExtractedFields {
    let markdown = page.markdown.as_deref().unwrap_or_default();
    ExtractedFields {
        name: extract_name(page.metadata.title(), &retailer.title_suffix),
        price: extract_price(markdown),
        description: page
            .metadata
            .description()
            .unwrap_or(NO_DESCRIPTION)
            .to_owned(),
        image_url: page.metadata.og_image().map(str::to_owned),
        specs: extract_specs(markdown),
    }
}

/// Page title minus the retailer suffix, trimmed.
#[must_use]
pub fn extract_name(title: Option<&str>, title_suffix: &str) -> String {
    let name = title
        .map(|t| {
            if title_suffix.is_empty() {
                t.trim().to_owned()
            } else {
                t.replacen(title_suffix, "", 1).trim().to_owned()
            }
        })
        .unwrap_or_default();
    if name.is_empty() {
        UNKNOWN_NAME.to_owned()
    } else {
        name
    }
}

/// First `$` amount in `markdown`, or zero.
///
/// `"$1,249.00"` and `"$1249.00"` both read as 1249.00.
#[must_use]
pub fn extract_price(markdown: &str) -> Decimal {
    let Some(caps) = PRICE_RE.captures(markdown) else {
        return Decimal::ZERO;
    };
    let whole = caps[1].replace(',', "");
    let cents = caps.get(2).map_or("", |m| m.as_str());
    Decimal::from_str(&format!("{whole}{cents}")).unwrap_or(Decimal::ZERO)
}

/// Key/value pairs from the bulleted specifications section.
///
/// The section starts after a line mentioning "specifications" (or a
/// `## Specs` heading) and ends at the next heading that does not mention
/// "spec". Keys keep their first occurrence position; a later duplicate
/// overwrites the value.
#[must_use]
pub fn extract_specs(markdown: &str) -> IndexMap<String, String> {
    let mut specs = IndexMap::new();
    let mut in_specs = false;

    for line in markdown.lines() {
        let lower = line.to_lowercase();
        if lower.contains("specifications") || lower.contains("## specs") {
            in_specs = true;
            continue;
        }
        if !in_specs {
            continue;
        }
        if line.trim().starts_with('#') && !lower.contains("spec") {
            break;
        }

        if let Some(caps) = SPEC_LINE_RE.captures(line) {
            let key = caps[1].trim();
            let value = caps[2].trim();
            if key.chars().count() < MAX_SPEC_KEY_CHARS
                && value.chars().count() < MAX_SPEC_VALUE_CHARS
            {
                specs.insert(key.to_owned(), value.to_owned());
            }
        }
    }

    specs
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
