//! Response Reconciler: turns an untrusted model reply back into dataset records.
//!
//! Parsing is an ordered fallback chain (fence strip → strict array parse →
//! first-`[`-to-last-`]` parse) ending in `ParsedReply::Unparseable`. Each
//! surviving item is resolved by positional id against the candidate set the
//! prompt was built from. Address and phone always come from the record.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::models::restaurant::Restaurant;
use crate::recommend::selector::CandidateSet;

/// Upper bound on items read from a reply, counted before invalid ones are dropped.
pub const MAX_RECOMMENDATIONS: usize = 5;

pub const CRITICAL_NOTICE: &str =
    "⚠️ Food safety notice: This restaurant has a CRITICAL violation flag.";
pub const NO_VIOLATION_NOTICE: &str =
    "No critical food safety violations flagged in the latest record.";

/// Outcome of parsing the raw model text.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedReply {
    Items(Vec<Value>),
    Unparseable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseStatus {
    Parsed,
    Unparseable,
}

/// A display-ready recommendation backed by a candidate record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    /// Position in the candidate set the prompt was built from.
    pub candidate_id: usize,
    pub name: String,
    pub why: Option<String>,
    /// Derived from the record, never from the model.
    pub address: String,
    pub phone: String,
    pub cuisine: String,
    pub critical_violation: bool,
    pub safety_notice: String,
    /// Address text as the model wrote it. Informational only.
    pub model_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reconciliation {
    pub status: ParseStatus,
    pub recommendations: Vec<Recommendation>,
    /// Items within the first five that were dropped (bad or out-of-range id).
    pub skipped: usize,
}

impl Reconciliation {
    fn unparseable() -> Self {
        Self {
            status: ParseStatus::Unparseable,
            recommendations: Vec::new(),
            skipped: 0,
        }
    }
}

/// Parses raw model text into a list of JSON values.
pub fn parse_model_reply(text: &str) -> ParsedReply {
    let body = strip_code_fence(text);

    if let Some(items) = parse_array(body) {
        return ParsedReply::Items(items);
    }

    if let Some(items) = bracket_slice(body).and_then(parse_array) {
        return ParsedReply::Items(items);
    }

    ParsedReply::Unparseable
}

/// Parses and reconciles in one step.
pub fn reconcile_reply(text: &str, candidates: &CandidateSet) -> Reconciliation {
    reconcile(&parse_model_reply(text), candidates)
}

/// Maps parsed items back to candidate records.
///
/// Only the first `MAX_RECOMMENDATIONS` items are considered, in model order.
/// Items with a missing, non-integer or out-of-range id are skipped without
/// affecting later items.
pub fn reconcile(reply: &ParsedReply, candidates: &CandidateSet) -> Reconciliation {
    let items = match reply {
        ParsedReply::Items(items) => items,
        ParsedReply::Unparseable => {
            warn!("Model reply could not be parsed as a JSON array");
            return Reconciliation::unparseable();
        }
    };

    let mut recommendations = Vec::new();
    let mut skipped = 0usize;

    for item in items.iter().take(MAX_RECOMMENDATIONS) {
        let Some(id) = extract_id(item) else {
            debug!("Skipping reply item without an integer id: {item}");
            skipped += 1;
            continue;
        };

        let record = usize::try_from(id).ok().and_then(|i| candidates.get(i).map(|r| (i, r)));
        let Some((candidate_id, record)) = record else {
            debug!(
                "Skipping reply item with out-of-range id {id} (candidates: {})",
                candidates.len()
            );
            skipped += 1;
            continue;
        };

        recommendations.push(build_recommendation(candidate_id, record, item));
    }

    Reconciliation {
        status: ParseStatus::Parsed,
        recommendations,
        skipped,
    }
}

fn build_recommendation(candidate_id: usize, record: &Restaurant, item: &Value) -> Recommendation {
    let critical_violation = record.has_critical_violation();
    Recommendation {
        candidate_id,
        name: text_field(item, "name").unwrap_or_else(|| record.name.clone()),
        why: text_field(item, "why"),
        address: record.address(),
        phone: record.phone.clone(),
        cuisine: record.cuisine.clone(),
        critical_violation,
        safety_notice: safety_notice(critical_violation).to_string(),
        model_address: text_field(item, "address"),
    }
}

pub fn safety_notice(critical_violation: bool) -> &'static str {
    if critical_violation {
        CRITICAL_NOTICE
    } else {
        NO_VIOLATION_NOTICE
    }
}

/// Accepts integers, integral-or-fractional floats (truncated) and numeric strings.
fn extract_id(item: &Value) -> Option<i64> {
    match item.get("id")? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_u64().and_then(|u| i64::try_from(u).ok()))
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                    .map(|f| f.trunc() as i64)
            }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn text_field(item: &Value, key: &str) -> Option<String> {
    item.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Removes a leading ```lang line and the last closing fence, when the text starts with one.
fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    if !text.starts_with("```") {
        return text;
    }

    let Some(newline) = text.find('\n') else {
        return text;
    };
    let inner = &text[newline + 1..];
    let inner = match inner.rfind("```") {
        Some(end) => &inner[..end],
        None => inner,
    };
    inner.trim()
}

fn bracket_slice(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    (end > start).then(|| &text[start..=end])
}

fn parse_array(text: &str) -> Option<Vec<Value>> {
    serde_json::from_str::<Vec<Value>>(text).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use crate::recommend::prompt_builder::build_recommendation_prompt;
    use crate::recommend::selector::{select_candidates, SelectorConfig};
    use serde_json::json;

    fn make_candidates(n: usize) -> CandidateSet {
        let records = (0..n)
            .map(|i| Restaurant {
                name: format!("Record {i}"),
                cuisine: "Korean".to_string(),
                street: "W 32nd St".to_string(),
                building: format!("{}", 10 + i),
                zipcode: "10001".to_string(),
                phone: format!("21255500{i:02}"),
                critical_flag: if i == 1 { "Critical" } else { "Not Critical" }.to_string(),
            })
            .collect();
        select_candidates(
            &Dataset::from_records(records),
            "korean",
            &SelectorConfig::default(),
        )
    }

    const ARRAY: &str = r#"[{"id": 0, "name": "X", "why": "good", "address": "1 Main St"}]"#;

    #[test]
    fn test_plain_array_parses() {
        let parsed = parse_model_reply(ARRAY);
        assert!(matches!(parsed, ParsedReply::Items(ref items) if items.len() == 1));
    }

    #[test]
    fn test_fenced_block_parses_same_as_plain() {
        let fenced = format!("```json\n{ARRAY}\n```");
        assert_eq!(parse_model_reply(&fenced), parse_model_reply(ARRAY));

        let untagged = format!("```\n{ARRAY}\n```");
        assert_eq!(parse_model_reply(&untagged), parse_model_reply(ARRAY));
    }

    #[test]
    fn test_fence_without_closing_marker_still_parses() {
        let open_only = format!("```json\n{ARRAY}");
        assert_eq!(parse_model_reply(&open_only), parse_model_reply(ARRAY));
    }

    #[test]
    fn test_leading_prose_falls_back_to_bracket_slice() {
        let text = "Here you go:\n```json\n[{\"id\":0,\"name\":\"X\",\"why\":\"good\",\"address\":\"1 Main St\"}]\n```";
        let result = reconcile_reply(text, &make_candidates(3));

        assert_eq!(result.status, ParseStatus::Parsed);
        assert_eq!(result.recommendations.len(), 1);
        assert_eq!(result.recommendations[0].candidate_id, 0);
        assert_eq!(result.recommendations[0].name, "X");
    }

    #[test]
    fn test_object_wrapper_falls_back_to_inner_array() {
        let text = format!(r#"{{"recommendations": {ARRAY}}}"#);
        assert_eq!(parse_model_reply(&text), parse_model_reply(ARRAY));
    }

    #[test]
    fn test_garbage_is_unparseable() {
        assert_eq!(parse_model_reply("I cannot help with that."), ParsedReply::Unparseable);
        assert_eq!(parse_model_reply("] nope ["), ParsedReply::Unparseable);
        assert_eq!(parse_model_reply("[not json]"), ParsedReply::Unparseable);
        assert_eq!(parse_model_reply(""), ParsedReply::Unparseable);
    }

    #[test]
    fn test_unparseable_reply_reconciles_to_empty() {
        let result = reconcile_reply("no json here", &make_candidates(3));
        assert_eq!(result.status, ParseStatus::Unparseable);
        assert!(result.recommendations.is_empty());
    }

    #[test]
    fn test_round_trip_prompt_id_resolves_to_same_record() {
        let candidates = make_candidates(6);
        let prompt = build_recommendation_prompt("korean", &candidates);
        assert!(prompt.contains("- ID 3: Record 3 |"));

        let reply = json!([{"id": 3, "name": "Model Name", "why": "tasty", "address": "?"}]).to_string();
        let result = reconcile_reply(&reply, &candidates);

        let rec = &result.recommendations[0];
        assert_eq!(rec.candidate_id, 3);
        assert_eq!(rec.address, candidates.records()[3].address());
        assert_eq!(rec.phone, candidates.records()[3].phone);
    }

    #[test]
    fn test_out_of_range_id_is_dropped_not_clamped() {
        let reply = json!([
            {"id": 999, "name": "Ghost"},
            {"id": -1, "name": "Negative"},
            {"id": 2, "name": "Real"}
        ])
        .to_string();
        let result = reconcile_reply(&reply, &make_candidates(10));

        assert_eq!(result.recommendations.len(), 1);
        assert_eq!(result.recommendations[0].candidate_id, 2);
        assert_eq!(result.skipped, 2);
    }

    #[test]
    fn test_unconvertible_id_skips_only_that_item() {
        let reply = json!([
            {"id": "abc"},
            {"name": "no id"},
            {"id": null},
            "just a string",
            {"id": "4"}
        ])
        .to_string();
        let result = reconcile_reply(&reply, &make_candidates(5));

        assert_eq!(result.recommendations.len(), 1);
        assert_eq!(result.recommendations[0].candidate_id, 4);
        assert_eq!(result.skipped, 4);
    }

    #[test]
    fn test_float_id_is_truncated() {
        let reply = r#"[{"id": 2.0}, {"id": 1.7}]"#;
        let result = reconcile_reply(reply, &make_candidates(5));
        let ids: Vec<usize> = result.recommendations.iter().map(|r| r.candidate_id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_only_first_five_items_are_considered() {
        let reply = json!([
            {"id": 0}, {"id": 99}, {"id": 1}, {"id": 2}, {"id": 3}, {"id": 4}, {"id": 5}
        ])
        .to_string();
        let result = reconcile_reply(&reply, &make_candidates(10));

        let ids: Vec<usize> = result.recommendations.iter().map(|r| r.candidate_id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3], "invalid items are dropped, not replaced");
    }

    #[test]
    fn test_model_order_is_preserved() {
        let reply = json!([{"id": 4}, {"id": 0}, {"id": 2}]).to_string();
        let result = reconcile_reply(&reply, &make_candidates(5));
        let ids: Vec<usize> = result.recommendations.iter().map(|r| r.candidate_id).collect();
        assert_eq!(ids, vec![4, 0, 2]);
    }

    #[test]
    fn test_name_falls_back_to_record_name() {
        let reply = json!([{"id": 0}, {"id": 1, "name": "   "}, {"id": 2, "name": 7}]).to_string();
        let result = reconcile_reply(&reply, &make_candidates(3));
        let names: Vec<&str> = result.recommendations.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Record 0", "Record 1", "Record 2"]);
    }

    #[test]
    fn test_model_address_never_overrides_record() {
        let reply = json!([{"id": 0, "address": "742 Evergreen Terrace"}]).to_string();
        let result = reconcile_reply(&reply, &make_candidates(1));
        let rec = &result.recommendations[0];

        assert_eq!(rec.address, "10 W 32nd St, Manhattan, NY 10001");
        assert_eq!(rec.model_address.as_deref(), Some("742 Evergreen Terrace"));
    }

    #[test]
    fn test_safety_notice_follows_record_flag() {
        let reply = json!([{"id": 0}, {"id": 1}]).to_string();
        let result = reconcile_reply(&reply, &make_candidates(2));

        assert!(!result.recommendations[0].critical_violation);
        assert_eq!(result.recommendations[0].safety_notice, NO_VIOLATION_NOTICE);
        assert!(result.recommendations[1].critical_violation);
        assert_eq!(result.recommendations[1].safety_notice, CRITICAL_NOTICE);
    }

    #[test]
    fn test_empty_array_is_parsed_with_no_results() {
        let result = reconcile_reply("[]", &make_candidates(2));
        assert_eq!(result.status, ParseStatus::Parsed);
        assert!(result.recommendations.is_empty());
    }
}
