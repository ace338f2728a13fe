//! Recommendation pipeline: orchestrates the dataset flow for one query.
//!
//! Flow: looks_like_restaurant_query → select_candidates →
//!       build_recommendation_prompt → gateway.chat → reconcile.
//!
//! The candidate set is built once and borrowed by both the prompt builder and
//! the reconciler, so prompt ids and reply ids always refer to the same list.

use serde::Serialize;
use tracing::{error, info, warn};

use crate::dataset::Dataset;
use crate::errors::AppError;
use crate::llm_client::ModelGateway;
use crate::recommend::intent::{looks_like_restaurant_query, CLARIFICATION_MESSAGE};
use crate::recommend::prompt_builder::build_recommendation_prompt;
use crate::recommend::prompts::RECOMMENDATION_SYSTEM;
use crate::recommend::reconciler::{reconcile_reply, ParseStatus, Recommendation};
use crate::recommend::selector::{select_candidates, AppliedFilters, SelectorConfig};

pub const NO_CANDIDATES_MESSAGE: &str =
    "The restaurant dataset is empty, so there is nothing to recommend yet.";

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RecommendationOutcome {
    /// The query did not look like a restaurant request; no model call was made.
    NeedsClarification { message: String },
    /// The dataset is empty; no model call was made.
    NoCandidates { message: String },
    Recommended {
        candidate_count: usize,
        filters: AppliedFilters,
        parse_status: ParseStatus,
        skipped: usize,
        recommendations: Vec<Recommendation>,
    },
}

/// Runs the full dataset recommendation flow for a single query.
///
/// Gateway failures are logged and returned as `AppError::Llm`; a malformed
/// reply is not an error and yields `parse_status: unparseable`.
pub async fn recommend(
    query: &str,
    dataset: &Dataset,
    gateway: &dyn ModelGateway,
    selector: &SelectorConfig,
) -> Result<RecommendationOutcome, AppError> {
    if !looks_like_restaurant_query(query) {
        info!("Query does not look like a restaurant request; asking for clarification");
        return Ok(RecommendationOutcome::NeedsClarification {
            message: CLARIFICATION_MESSAGE.to_string(),
        });
    }

    let candidates = select_candidates(dataset, query, selector);
    if candidates.is_empty() {
        warn!("No candidates available: dataset is empty");
        return Ok(RecommendationOutcome::NoCandidates {
            message: NO_CANDIDATES_MESSAGE.to_string(),
        });
    }

    let filters = candidates.filters();
    info!(
        "Selected {} candidates (cuisines={:?}, location={:?}, fell_back={}, sampled={})",
        candidates.len(),
        filters.matched_cuisines,
        filters.location_keyword,
        filters.fell_back,
        filters.sampled
    );

    let prompt = build_recommendation_prompt(query, &candidates);

    let raw_reply = gateway
        .chat(RECOMMENDATION_SYSTEM, &prompt)
        .await
        .map_err(|e| {
            error!(
                "Recommendation call to {} ({}) failed: {e}",
                gateway.provider_name(),
                gateway.model_name()
            );
            AppError::Llm(format!("Recommendation call failed: {e}"))
        })?;

    let reconciliation = reconcile_reply(&raw_reply, &candidates);
    info!(
        "Reconciled {} recommendations ({} skipped, status={:?})",
        reconciliation.recommendations.len(),
        reconciliation.skipped,
        reconciliation.status
    );

    Ok(RecommendationOutcome::Recommended {
        candidate_count: candidates.len(),
        filters: filters.clone(),
        parse_status: reconciliation.status,
        skipped: reconciliation.skipped,
        recommendations: reconciliation.recommendations,
    })
}
