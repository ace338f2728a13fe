//! Prompt Builder: renders the query and candidate set into one text block.

use crate::models::restaurant::Restaurant;
use crate::recommend::prompts::{
    CANDIDATES_HEADER, OUTPUT_FORMAT_INSTRUCTION, RECOMMENDATION_PREAMBLE,
};
use crate::recommend::selector::CandidateSet;

/// Builds the recommendation prompt.
///
/// Each candidate line carries `ID <i>` where `i` is the record's position in
/// `candidates`. The reconciler resolves model ids against the same set.
pub fn build_recommendation_prompt(query: &str, candidates: &CandidateSet) -> String {
    let mut lines: Vec<String> = Vec::with_capacity(candidates.len() + 8);

    lines.push(RECOMMENDATION_PREAMBLE.to_string());
    lines.push(String::new());
    lines.push("User request:".to_string());
    lines.push(query.to_string());
    lines.push(String::new());
    lines.push(CANDIDATES_HEADER.to_string());

    lines.extend(
        candidates
            .records()
            .iter()
            .enumerate()
            .map(|(id, record)| candidate_line(id, record)),
    );

    lines.push(String::new());
    lines.push(OUTPUT_FORMAT_INSTRUCTION.to_string());

    lines.join("\n")
}

fn candidate_line(id: usize, record: &Restaurant) -> String {
    format!(
        "- ID {id}: {} | Cuisine: {} | Address: {} | InspectionFlag: {}",
        record.name,
        record.cuisine,
        record.address(),
        record.critical_flag
    )
}
