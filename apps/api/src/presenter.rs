//! Console rendering for both flows. The HTTP API returns the same data as JSON.

use std::fmt::Write;

use crate::nearby::service::NearbyResponse;
use crate::recommend::pipeline::RecommendationOutcome;
use crate::recommend::reconciler::{ParseStatus, Recommendation};

pub const UNPARSEABLE_MESSAGE: &str = "I couldn't parse any recommendations from the model output.";
pub const NO_VALID_ITEMS_MESSAGE: &str =
    "The model's reply did not reference any of the candidate restaurants.";
pub const RESULTS_HEADER: &str = "Great, here are the top 5 recommended restaurants:";
pub const NO_NEARBY_MESSAGE: &str = "No restaurants found for that cuisine near this location.";

pub fn render_outcome(outcome: &RecommendationOutcome) -> String {
    match outcome {
        RecommendationOutcome::NeedsClarification { message }
        | RecommendationOutcome::NoCandidates { message } => message.clone(),
        RecommendationOutcome::Recommended {
            parse_status: ParseStatus::Unparseable,
            ..
        } => UNPARSEABLE_MESSAGE.to_string(),
        RecommendationOutcome::Recommended {
            recommendations, ..
        } if recommendations.is_empty() => NO_VALID_ITEMS_MESSAGE.to_string(),
        RecommendationOutcome::Recommended {
            recommendations, ..
        } => {
            let mut out = format!("{RESULTS_HEADER}\n\n");
            for rec in recommendations {
                out.push_str(&render_recommendation(rec));
                out.push('\n');
            }
            out.trim_end().to_string()
        }
    }
}

fn render_recommendation(rec: &Recommendation) -> String {
    let mut block = format!("{}:\n", rec.name);
    // Writing into a String cannot fail
    let _ = writeln!(block, "  Address: {}", rec.address);
    let _ = writeln!(block, "  Phone: {}", rec.phone);
    if let Some(why) = &rec.why {
        let _ = writeln!(block, "  Why: {why}");
    }
    let _ = writeln!(block, "  Warning: {}", rec.safety_notice);
    block
}

pub fn render_nearby(response: &NearbyResponse) -> String {
    if response.results.is_empty() {
        return NO_NEARBY_MESSAGE.to_string();
    }

    let mut out = String::new();
    for (rank, result) in response.results.iter().enumerate() {
        let place = &result.place;
        let _ = writeln!(out, "{}. {}", rank + 1, place.name);
        let _ = writeln!(
            out,
            "   Rating: {:.1} ({} reviews)",
            place.rating, place.user_ratings_total
        );
        let _ = writeln!(out, "   Address: {}", place.address);
        let _ = writeln!(out, "   Map: {}", place.maps_url);
        let _ = writeln!(out, "   Try ({}):", response.cuisine_label);
        for line in result.dish_recommendations.lines() {
            let _ = writeln!(out, "     {line}");
        }
        out.push('\n');
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::place::{GeoLocation, Place};
    use crate::nearby::service::NearbyRestaurant;
    use crate::recommend::intent::CLARIFICATION_MESSAGE;
    use crate::recommend::reconciler::{CRITICAL_NOTICE, NO_VIOLATION_NOTICE};
    use crate::recommend::selector::AppliedFilters;

    fn make_recommendation(name: &str, why: Option<&str>, critical: bool) -> Recommendation {
        Recommendation {
            candidate_id: 0,
            name: name.to_string(),
            why: why.map(str::to_string),
            address: "1 Broadway, Manhattan, NY 10004".to_string(),
            phone: "2125550000".to_string(),
            cuisine: "Thai".to_string(),
            critical_violation: critical,
            safety_notice: if critical { CRITICAL_NOTICE } else { NO_VIOLATION_NOTICE }.to_string(),
            model_address: None,
        }
    }

    fn recommended(status: ParseStatus, recommendations: Vec<Recommendation>) -> RecommendationOutcome {
        RecommendationOutcome::Recommended {
            candidate_count: 10,
            filters: AppliedFilters::default(),
            parse_status: status,
            skipped: 0,
            recommendations,
        }
    }

    #[test]
    fn test_clarification_is_printed_verbatim() {
        let outcome = RecommendationOutcome::NeedsClarification {
            message: CLARIFICATION_MESSAGE.to_string(),
        };
        assert_eq!(render_outcome(&outcome), CLARIFICATION_MESSAGE);
    }

    #[test]
    fn test_unparseable_message() {
        let outcome = recommended(ParseStatus::Unparseable, vec![]);
        assert_eq!(render_outcome(&outcome), UNPARSEABLE_MESSAGE);
    }

    #[test]
    fn test_parsed_but_empty_message() {
        let outcome = recommended(ParseStatus::Parsed, vec![]);
        assert_eq!(render_outcome(&outcome), NO_VALID_ITEMS_MESSAGE);
    }

    #[test]
    fn test_recommendation_blocks() {
        let outcome = recommended(
            ParseStatus::Parsed,
            vec![
                make_recommendation("Thai Garden", Some("Great curry."), true),
                make_recommendation("Basil", None, false),
            ],
        );
        let text = render_outcome(&outcome);

        assert!(text.starts_with(RESULTS_HEADER));
        assert!(text.contains(
            "Thai Garden:\n  Address: 1 Broadway, Manhattan, NY 10004\n  Phone: 2125550000\n  Why: Great curry.\n"
        ));
        assert!(text.contains(&format!("  Warning: {CRITICAL_NOTICE}")));
        assert!(text.contains(&format!("Basil:\n  Address: 1 Broadway, Manhattan, NY 10004\n  Phone: 2125550000\n  Warning: {NO_VIOLATION_NOTICE}")));
    }

    #[test]
    fn test_render_nearby() {
        let response = NearbyResponse {
            location: GeoLocation {
                lat: 0.0,
                lng: 0.0,
                city: None,
            },
            cuisine_label: "Japanese".to_string(),
            results: vec![NearbyRestaurant {
                place: Place {
                    name: "Sushi Ko".to_string(),
                    rating: 4.75,
                    user_ratings_total: 321,
                    address: "5 E 3rd St".to_string(),
                    place_id: None,
                    maps_url: "https://maps.example/x".to_string(),
                    photo_url: String::new(),
                },
                dish_recommendations: "- Omakase\n- Uni hand roll".to_string(),
            }],
        };
        let text = render_nearby(&response);

        assert!(text.starts_with("1. Sushi Ko\n   Rating: 4.8 (321 reviews)"));
        assert!(text.contains("   Try (Japanese):\n     - Omakase\n     - Uni hand roll"));
    }

    #[test]
    fn test_render_nearby_empty() {
        let response = NearbyResponse {
            location: GeoLocation {
                lat: 0.0,
                lng: 0.0,
                city: None,
            },
            cuisine_label: "Japanese".to_string(),
            results: vec![],
        };
        assert_eq!(render_nearby(&response), NO_NEARBY_MESSAGE);
    }
}
