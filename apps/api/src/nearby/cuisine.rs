//! Cuisine catalogue for the nearby search form.

use serde::Serialize;

/// Label used when the requested cuisine key is unknown.
pub const FALLBACK_LABEL: &str = "this cuisine style";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Cuisine {
    pub key: &'static str,
    pub label: &'static str,
    /// Text query sent to the places search.
    pub search_keyword: &'static str,
}

pub const CUISINES: &[Cuisine] = &[
    Cuisine { key: "chinese", label: "Chinese", search_keyword: "Chinese restaurant" },
    Cuisine { key: "french", label: "French", search_keyword: "French restaurant" },
    Cuisine {
        key: "southeast_asian",
        label: "Southeast Asian",
        search_keyword: "Southeast Asian restaurant",
    },
    Cuisine { key: "japanese", label: "Japanese", search_keyword: "Japanese restaurant" },
    Cuisine { key: "korean", label: "Korean", search_keyword: "Korean restaurant" },
    Cuisine { key: "spanish", label: "Spanish", search_keyword: "Spanish restaurant" },
    Cuisine { key: "mexican", label: "Mexican", search_keyword: "Mexican restaurant" },
    Cuisine { key: "italian", label: "Italian", search_keyword: "Italian restaurant" },
];

pub fn find_cuisine(key: &str) -> Option<&'static Cuisine> {
    CUISINES.iter().find(|c| c.key == key)
}

/// Search keyword for a cuisine key; empty for unknown keys.
pub fn search_keyword(key: &str) -> &'static str {
    find_cuisine(key).map_or("", |c| c.search_keyword)
}

pub fn cuisine_label(key: &str) -> &'static str {
    find_cuisine(key).map_or(FALLBACK_LABEL, |c| c.label)
}
