//! Candidate Selector: narrows the dataset to a bounded, query-relevant subset.
//!
//! Pure function of (dataset, query, config). The sampling RNG is seeded per
//! call, so concurrent requests never share random state and the same query
//! always yields the same candidate set.

use rand::seq::index;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::dataset::Dataset;
use crate::models::restaurant::Restaurant;
use crate::recommend::keywords::match_location;

pub const DEFAULT_MAX_CANDIDATES: usize = 40;
pub const DEFAULT_SAMPLE_SEED: u64 = 42;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorConfig {
    pub max_candidates: usize,
    pub seed: u64,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            max_candidates: DEFAULT_MAX_CANDIDATES,
            seed: DEFAULT_SAMPLE_SEED,
        }
    }
}

/// Which heuristics shaped a candidate set. Returned to callers for logging and display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AppliedFilters {
    pub matched_cuisines: Vec<String>,
    pub location_keyword: Option<String>,
    /// Filters matched nothing, so the full dataset was used instead.
    pub fell_back: bool,
    /// The result was sampled down to the configured maximum.
    pub sampled: bool,
}

/// A per-request, zero-indexed candidate list.
///
/// The position of a record in this set is the `ID` written into the prompt
/// and read back from the model reply, so the order is frozen once built.
#[derive(Debug, Clone)]
pub struct CandidateSet {
    records: Vec<Restaurant>,
    filters: AppliedFilters,
}

impl CandidateSet {
    pub fn records(&self) -> &[Restaurant] {
        &self.records
    }

    pub fn get(&self, id: usize) -> Option<&Restaurant> {
        self.records.get(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn filters(&self) -> &AppliedFilters {
        &self.filters
    }
}

/// Selects up to `config.max_candidates` records for the query.
///
/// Algorithm:
/// 1. Cuisine filter: a distinct cuisine matches when its lower-cased full text,
///    or the part before its first "/", is contained in the query. Matches are OR-ed;
///    no match keeps every record.
/// 2. Location filter: the first location keyword found in the query restricts
///    zip codes to that keyword's set.
/// 3. Fallback: an empty result is replaced by the full dataset.
/// 4. Truncation: seeded sampling down to the maximum, keeping dataset order.
pub fn select_candidates(dataset: &Dataset, query: &str, config: &SelectorConfig) -> CandidateSet {
    let q = query.to_lowercase();

    let matched_cuisines: Vec<&str> = dataset
        .distinct_cuisines()
        .into_iter()
        .filter(|cuisine| cuisine_matches(cuisine, &q))
        .collect();

    let location = match_location(&q);

    let mut selected: Vec<&Restaurant> = dataset
        .records()
        .iter()
        .filter(|r| matched_cuisines.is_empty() || matched_cuisines.contains(&r.cuisine.as_str()))
        .filter(|r| location.map_or(true, |kw| kw.zipcodes.contains(&r.zipcode.as_str())))
        .collect();

    let fell_back = selected.is_empty();
    if fell_back {
        selected = dataset.records().iter().collect();
    }

    let max = config.max_candidates.max(1);
    let sampled = selected.len() > max;
    if sampled {
        selected = sample_down(&selected, max, config.seed);
    }

    CandidateSet {
        records: selected.into_iter().cloned().collect(),
        filters: AppliedFilters {
            matched_cuisines: matched_cuisines.into_iter().map(str::to_string).collect(),
            location_keyword: location.map(|kw| kw.phrase.to_string()),
            fell_back,
            sampled,
        },
    }
}

fn cuisine_matches(cuisine: &str, query_lower: &str) -> bool {
    let full = cuisine.to_lowercase();
    let head_hit = full
        .split('/')
        .next()
        .filter(|head| !head.trim().is_empty())
        .is_some_and(|head| query_lower.contains(head));
    head_hit || query_lower.contains(&full)
}

fn sample_down<T: Copy>(items: &[T], amount: usize, seed: u64) -> Vec<T> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut picked = index::sample(&mut rng, items.len(), amount).into_vec();
    picked.sort_unstable();
    picked.into_iter().map(|i| items[i]).collect()
}
