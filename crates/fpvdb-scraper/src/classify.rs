//! Keyword classification of product names into category and brand.
//!
//! Rules are evaluated in order against the lowercased name; the first rule
//! with a matching keyword wins.

use fpvdb_core::Profile;

pub const DEFAULT_CATEGORY: &str = "Components";
pub const DEFAULT_BRAND: &str = "Generic";

struct CategoryRule {
    keywords: &'static [&'static str],
    label: &'static str,
}

const GENERAL_CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        keywords: &["drone", "bnf", "kit"],
        label: "Drones",
    },
    CategoryRule {
        keywords: &["motor"],
        label: "Motors",
    },
    CategoryRule {
        keywords: &["battery", "lipo"],
        label: "Batteries",
    },
    CategoryRule {
        keywords: &["controller", "esc", "fc"],
        label: "Electronics",
    },
    CategoryRule {
        keywords: &["propeller", "prop"],
        label: "Propellers",
    },
    CategoryRule {
        keywords: &["goggle", "headset"],
        label: "FPV Gear",
    },
];

const CURATED_CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        keywords: &["drone", "bnf"],
        label: "Drones",
    },
    CategoryRule {
        keywords: &["frame"],
        label: "Frames",
    },
    CategoryRule {
        keywords: &["motor"],
        label: "Motors",
    },
    CategoryRule {
        keywords: &["camera"],
        label: "Camera",
    },
];

const GENERAL_BRANDS: &[&str] = &[
    "BetaFPV",
    "DJI",
    "iFlight",
    "GEPRC",
    "Lumenier",
    "RadioMaster",
    "TBS",
    "Emax",
    "Flywoo",
    "DOGCOM",
    "Gemfan",
    "HQProp",
    "T-Motor",
    "Foxeer",
    "RunCam",
    "HDO",
    "Fat Shark",
    "Walksnail",
];

const CURATED_BRANDS: &[&str] = &[
    "BetaFPV",
    "DJI",
    "iFlight",
    "GEPRC",
    "Lumenier",
    "RadioMaster",
    "TBS",
    "Emax",
    "Flywoo",
    "Caddx",
    "SpeedyBee",
    "AxisFlying",
];

/// Category label for `name` under `profile`'s rule set.
#[must_use]
pub fn classify_category(name: &str, profile: Profile) -> &'static str {
    let rules = match profile {
        Profile::General => GENERAL_CATEGORY_RULES,
        Profile::Curated => CURATED_CATEGORY_RULES,
    };
    let lower = name.to_lowercase();
    rules
        .iter()
        .find(|rule| rule.keywords.iter().any(|kw| lower.contains(kw)))
        .map_or(DEFAULT_CATEGORY, |rule| rule.label)
}

/// First known brand whose name occurs in `name`, ignoring case.
#[must_use]
pub fn classify_brand(name: &str, profile: Profile) -> &'static str {
    let brands = match profile {
        Profile::General => GENERAL_BRANDS,
        Profile::Curated => CURATED_BRANDS,
    };
    let lower = name.to_lowercase();
    brands
        .iter()
        .copied()
        .find(|brand| lower.contains(&brand.to_lowercase()))
        .unwrap_or(DEFAULT_BRAND)
}
