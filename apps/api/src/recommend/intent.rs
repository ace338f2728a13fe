//! Intent Classifier: cheap keyword test for "is this a restaurant request?".

use crate::recommend::keywords::{CUISINE_TERMS, DINING_TERMS};

/// Message shown when a query does not look like a restaurant request.
pub const CLARIFICATION_MESSAGE: &str = "\
It looks like your message may not be a restaurant recommendation request.
Please provide more details like where you are in Manhattan and what kind of food you want.
For example:
  - \"I'm near Times Square and want some Chinese food\"
  - \"I'm in SoHo looking for a casual Italian restaurant\"";

/// Returns true when the lower-cased query contains any dining or cuisine term.
pub fn looks_like_restaurant_query(query: &str) -> bool {
    let q = query.to_lowercase();
    DINING_TERMS
        .iter()
        .chain(CUISINE_TERMS)
        .any(|term| q.contains(term))
}
