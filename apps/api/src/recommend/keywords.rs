// Static keyword tables used by the intent classifier and the candidate selector.
// All entries are lower-case; matching is plain substring containment.

/// Generic dining terms, including common misspellings of "restaurant".
pub const DINING_TERMS: &[&str] = &[
    "restaurant",
    "restaur",
    "resturant",
    "restruant",
    "food",
    "eat",
    "dinner",
    "lunch",
    "breakfast",
    "brunch",
    "supper",
    "meal",
    "place to eat",
    "where to eat",
    "recommend",
    "recommendation",
    "recommendations",
];

/// Cuisine and venue-type terms.
pub const CUISINE_TERMS: &[&str] = &[
    "chinese",
    "japanese",
    "korean",
    "thai",
    "italian",
    "french",
    "mexican",
    "indian",
    "sushi",
    "noodle",
    "ramen",
    "dim sum",
    "pizza",
    "burger",
    "steakhouse",
    "cafe",
    "coffee",
    "bakery",
];

/// A neighbourhood phrase and the zip codes it covers.
#[derive(Debug, Clone, Copy)]
pub struct LocationKeyword {
    pub phrase: &'static str,
    pub zipcodes: &'static [&'static str],
}

const TIMES_SQUARE: &[&str] = &["10036", "10018", "10019"];
const MIDTOWN_WEST: &[&str] = &["10018", "10019", "10036"];
const MIDTOWN_EAST: &[&str] = &["10016", "10017", "10022"];
const UNITED_NATIONS: &[&str] = &["10017", "10022"];
const MIDTOWN: &[&str] = &["10016", "10017", "10018", "10019", "10022", "10036"];
const MORNINGSIDE: &[&str] = &["10027", "10025"];
const UPPER_WEST_SIDE: &[&str] = &["10023", "10024", "10025"];

/// Scanned in declared order; the first phrase found in the query wins.
/// Specific phrases ("midtown west") must stay ahead of generic ones ("midtown").
pub const LOCATION_KEYWORDS: &[LocationKeyword] = &[
    LocationKeyword { phrase: "times square", zipcodes: TIMES_SQUARE },
    LocationKeyword { phrase: "time square", zipcodes: TIMES_SQUARE },
    LocationKeyword { phrase: "midtown west", zipcodes: MIDTOWN_WEST },
    LocationKeyword { phrase: "hell's kitchen", zipcodes: MIDTOWN_WEST },
    LocationKeyword { phrase: "hells kitchen", zipcodes: MIDTOWN_WEST },
    LocationKeyword { phrase: "theater district", zipcodes: MIDTOWN_WEST },
    LocationKeyword { phrase: "midtown east", zipcodes: MIDTOWN_EAST },
    LocationKeyword { phrase: "grand central", zipcodes: MIDTOWN_EAST },
    LocationKeyword { phrase: "united nations", zipcodes: UNITED_NATIONS },
    LocationKeyword { phrase: "midtown", zipcodes: MIDTOWN },
    LocationKeyword { phrase: "columbia university", zipcodes: MORNINGSIDE },
    LocationKeyword { phrase: "morningside heights", zipcodes: MORNINGSIDE },
    LocationKeyword { phrase: "upper west side", zipcodes: UPPER_WEST_SIDE },
    LocationKeyword { phrase: "uws", zipcodes: UPPER_WEST_SIDE },
];

/// Returns the first location keyword contained in an already lower-cased query.
pub fn match_location(query_lower: &str) -> Option<&'static LocationKeyword> {
    LOCATION_KEYWORDS
        .iter()
        .find(|kw| query_lower.contains(kw.phrase))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_terms_are_lowercase() {
        for term in DINING_TERMS.iter().chain(CUISINE_TERMS) {
            assert_eq!(*term, term.to_lowercase());
        }
        for kw in LOCATION_KEYWORDS {
            assert_eq!(kw.phrase, kw.phrase.to_lowercase());
        }
    }

    #[test]
    fn test_specific_midtown_phrase_wins_over_generic() {
        let kw = match_location("dinner in midtown east tonight").unwrap();
        assert_eq!(kw.phrase, "midtown east");
        assert_eq!(kw.zipcodes, MIDTOWN_EAST);
    }

    #[test]
    fn test_generic_midtown_matches_union() {
        let kw = match_location("somewhere in midtown").unwrap();
        assert_eq!(kw.phrase, "midtown");
        assert_eq!(kw.zipcodes.len(), 6);
    }

    #[test]
    fn test_first_declared_keyword_wins_when_several_match() {
        // "times square" is declared before "midtown"
        let kw = match_location("midtown near times square").unwrap();
        assert_eq!(kw.phrase, "times square");
    }

    #[test]
    fn test_no_location_match() {
        assert!(match_location("sushi in soho").is_none());
    }
}
