// Prompt constants for the dish suggestion flow.

pub const DISH_SYSTEM: &str = "You are an expert food and restaurant recommendation assistant.";

/// Placed before the restaurant description in the full prompt.
pub const DISH_INSTRUCTION: &str = "\
You are a foodie and menu expert.

I will describe a real restaurant and the user's cuisine preference. \
Based on this description and your knowledge of typical menus for this \
style of restaurant, suggest 3 likely signature dishes that a user \
should try. You may approximate based on common patterns for that \
cuisine and type; you do not need to know the exact menu, but avoid \
contradicting the description.";

pub const DISH_FORMAT_INSTRUCTION: &str = "\
Return your answer as a short bullet list. Each line should be:
Dish name – one-sentence description.";

/// Shorter prompt used once when the full prompt produced an empty reply.
/// Replace `{label}` and `{name}` before sending.
pub const SIMPLE_DISH_PROMPT_TEMPLATE: &str = "Suggest 3 signature dishes for a {label} restaurant \
called '{name}'. Return a bullet list; each line is Dish name – one-sentence description.";

pub const EMPTY_DISHES_MESSAGE: &str =
    "(Model returned empty content for this restaurant, even after retry.)";
pub const DISH_FAILURE_MESSAGE: &str = "AI dish recommendation failed. Please try again later.";
