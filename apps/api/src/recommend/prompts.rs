// Prompt constants for the dataset recommendation flow.

/// System message sent with every recommendation request.
pub const RECOMMENDATION_SYSTEM: &str = "You are a helpful restaurant recommendation assistant.";

/// Task description placed before the user's request.
pub const RECOMMENDATION_PREAMBLE: &str = "\
You are a restaurant recommendation assistant for Manhattan, NYC.
You will receive:
1) A user request (location, cuisine, preferences).
2) A list of candidate restaurants from a Manhattan dataset.

Your job:
- Pick the BEST 5 restaurants for the user.
- Prefer candidates that match the location and cuisine hints.
- If multiple match, prioritize good variety and interesting options.
- If the list has fewer than 5, recommend as many as possible.";

pub const CANDIDATES_HEADER: &str = "Here are the candidate restaurants (each with an ID):";

/// Output contract read back by the reconciler: a JSON array of {id, name, why, address}.
pub const OUTPUT_FORMAT_INSTRUCTION: &str = r#"Please answer in this JSON-like format (no extra commentary, no explanations outside the JSON array):
[
  {
    "id": <candidate ID>,
    "name": "<restaurant name>",
    "why": "<1-2 sentence explanation>",
    "address": "<address string>"
  },
  ... up to 5 entries total ...
]"#;
