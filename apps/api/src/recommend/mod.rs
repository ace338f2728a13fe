// Dataset recommendation flow.
// Implements: intent check, candidate selection, prompt building, reconciliation.
// All model calls go through llm_client; no direct HTTP calls here.

pub mod handlers;
pub mod intent;
pub mod keywords;
pub mod pipeline;
pub mod prompt_builder;
pub mod prompts;
pub mod reconciler;
pub mod selector;
