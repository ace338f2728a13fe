//! Dish suggester: asks the hosted model for three signature dishes per place.
//!
//! Never fails: an empty reply is retried once with a shorter prompt, and any
//! gateway error becomes a fixed sentence shown in place of the dishes.

use tracing::{debug, warn};

use crate::llm_client::ModelGateway;
use crate::models::place::{Place, PlaceContext};
use crate::nearby::prompts::{
    DISH_FAILURE_MESSAGE, DISH_FORMAT_INSTRUCTION, DISH_INSTRUCTION, DISH_SYSTEM,
    EMPTY_DISHES_MESSAGE, SIMPLE_DISH_PROMPT_TEMPLATE,
};

/// Extra place types quoted in the description.
const MAX_EXTRA_TYPES: usize = 6;

/// Plain-language description of a place, built only from provider data.
pub fn describe_restaurant(place: &Place, context: &PlaceContext, city: Option<&str>) -> String {
    let location: Vec<&str> = city
        .into_iter()
        .chain(Some(place.address.as_str()))
        .filter(|s| !s.is_empty())
        .collect();
    let location = if location.is_empty() {
        "this city".to_string()
    } else {
        location.join(", ")
    };

    let rating = if place.user_ratings_total > 0 {
        format!(
            "It has a Google rating of {:.1} based on about {} reviews.",
            place.rating, place.user_ratings_total
        )
    } else if place.rating > 0.0 {
        format!("It has a Google rating of {:.1}.", place.rating)
    } else {
        String::new()
    };

    let mut kind = match (&context.primary_type_display, &context.primary_type) {
        (Some(display), _) => format!("It is labeled as a '{display}'."),
        (None, Some(primary)) => format!("It is labeled as type '{primary}'."),
        (None, None) => String::new(),
    };
    if !context.types.is_empty() {
        let extra: Vec<&str> = context
            .types
            .iter()
            .take(MAX_EXTRA_TYPES)
            .map(String::as_str)
            .collect();
        if !kind.is_empty() {
            kind.push(' ');
        }
        kind.push_str(&format!("Extra types: {}.", extra.join(", ")));
    }

    let editorial = context
        .editorial_summary
        .as_deref()
        .map(|summary| format!("Google describes it as: \"{summary}\""))
        .unwrap_or_default();

    let mut parts = vec![format!(
        "The restaurant is called '{}', located in {location}.",
        place.name
    )];
    parts.extend([rating, kind, editorial].into_iter().filter(|p| !p.is_empty()));
    parts.join(" ")
}

pub fn build_dish_prompt(description: &str, cuisine_label: &str) -> String {
    format!(
        "{DISH_INSTRUCTION}\n\nRestaurant description:\n{description}\n\n\
         User cuisine preference: {cuisine_label}.\n\n{DISH_FORMAT_INSTRUCTION}"
    )
}

pub fn build_simple_dish_prompt(name: &str, cuisine_label: &str) -> String {
    SIMPLE_DISH_PROMPT_TEMPLATE
        .replace("{label}", cuisine_label)
        .replace("{name}", name)
}

/// Returns a bullet list of dishes, a placeholder, or a failure sentence.
pub async fn suggest_dishes(
    gateway: &dyn ModelGateway,
    place: &Place,
    context: &PlaceContext,
    city: Option<&str>,
    cuisine_label: &str,
) -> String {
    let description = describe_restaurant(place, context, city);
    debug!("Dish description for {}: {description}", place.name);

    let prompts = [
        build_dish_prompt(&description, cuisine_label),
        build_simple_dish_prompt(&place.name, cuisine_label),
    ];

    for (attempt, prompt) in prompts.iter().enumerate() {
        match gateway.chat(DISH_SYSTEM, prompt).await {
            Ok(text) if !text.trim().is_empty() => return text.trim().to_string(),
            Ok(_) => warn!(
                "Dish suggestion attempt {} for {} returned empty content",
                attempt + 1,
                place.name
            ),
            Err(e) => {
                warn!("Dish suggestion for {} failed: {e}", place.name);
                return DISH_FAILURE_MESSAGE.to_string();
            }
        }
    }

    EMPTY_DISHES_MESSAGE.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use crate::recommend::pipeline::tests::StubGateway;

    fn make_place() -> Place {
        Place {
            name: "Noodle Hall".to_string(),
            rating: 4.56,
            user_ratings_total: 812,
            address: "12 Mott St, New York, NY 10013".to_string(),
            place_id: Some("C3".to_string()),
            maps_url: String::new(),
            photo_url: String::new(),
        }
    }

    fn make_context() -> PlaceContext {
        PlaceContext {
            types: (1..=8).map(|i| format!("type_{i}")).collect(),
            primary_type: Some("chinese_restaurant".to_string()),
            primary_type_display: Some("Chinese Restaurant".to_string()),
            editorial_summary: Some("Hand-pulled noodles since 1998.".to_string()),
        }
    }

    #[test]
    fn test_description_with_full_context() {
        let desc = describe_restaurant(&make_place(), &make_context(), Some("New York"));
        assert_eq!(
            desc,
            "The restaurant is called 'Noodle Hall', located in New York, 12 Mott St, New York, NY 10013. \
             It has a Google rating of 4.6 based on about 812 reviews. \
             It is labeled as a 'Chinese Restaurant'. \
             Extra types: type_1, type_2, type_3, type_4, type_5, type_6. \
             Google describes it as: \"Hand-pulled noodles since 1998.\""
        );
    }

    #[test]
    fn test_description_with_no_context() {
        let mut place = make_place();
        place.address.clear();
        place.rating = 0.0;
        place.user_ratings_total = 0;

        let desc = describe_restaurant(&place, &PlaceContext::default(), None);
        assert_eq!(desc, "The restaurant is called 'Noodle Hall', located in this city.");
    }

    #[test]
    fn test_description_falls_back_to_primary_type() {
        let context = PlaceContext {
            primary_type: Some("ramen_restaurant".to_string()),
            ..PlaceContext::default()
        };
        let desc = describe_restaurant(&make_place(), &context, None);
        assert!(desc.contains("It is labeled as type 'ramen_restaurant'."));
    }

    #[test]
    fn test_dish_prompt_contains_description_and_label() {
        let prompt = build_dish_prompt("A tiny noodle bar.", "Chinese");
        assert!(prompt.starts_with("You are a foodie and menu expert."));
        assert!(prompt.contains("Restaurant description:\nA tiny noodle bar."));
        assert!(prompt.contains("User cuisine preference: Chinese."));
        assert!(prompt.ends_with("Dish name – one-sentence description."));
    }

    #[test]
    fn test_simple_prompt() {
        assert_eq!(
            build_simple_dish_prompt("Noodle Hall", "Chinese"),
            "Suggest 3 signature dishes for a Chinese restaurant called 'Noodle Hall'. \
             Return a bullet list; each line is Dish name – one-sentence description."
        );
    }

    #[tokio::test]
    async fn test_first_non_empty_reply_is_used() {
        let gateway = StubGateway::replying(vec![Ok("  - Dan dan noodles – numbing.  ".to_string())]);
        let dishes =
            suggest_dishes(&gateway, &make_place(), &make_context(), None, "Chinese").await;

        assert_eq!(dishes, "- Dan dan noodles – numbing.");
        assert_eq!(gateway.prompt_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_reply_retries_with_simple_prompt() {
        let gateway = StubGateway::replying(vec![Ok("   ".to_string()), Ok("- Wontons".to_string())]);
        let dishes =
            suggest_dishes(&gateway, &make_place(), &make_context(), None, "Chinese").await;

        assert_eq!(dishes, "- Wontons");
        let prompts = gateway.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[1].starts_with("Suggest 3 signature dishes"));
    }

    #[tokio::test]
    async fn test_two_empty_replies_give_placeholder() {
        let gateway = StubGateway::replying(vec![Ok(String::new()), Ok(String::new())]);
        let dishes =
            suggest_dishes(&gateway, &make_place(), &make_context(), None, "Chinese").await;
        assert_eq!(dishes, EMPTY_DISHES_MESSAGE);
    }

    #[tokio::test]
    async fn test_gateway_error_gives_failure_message() {
        let gateway = StubGateway::replying(vec![Err(LlmError::NoChoices)]);
        let dishes =
            suggest_dishes(&gateway, &make_place(), &make_context(), None, "Chinese").await;

        assert_eq!(dishes, DISH_FAILURE_MESSAGE);
        assert_eq!(gateway.prompt_count(), 1);
    }
}
