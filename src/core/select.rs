// select.rs - Candidate selection over reconciled comparisons

use crate::core::reconcile::{reconcile, ComparisonRecord, Predominance};
use crate::core::reducer::BestHitTable;
use serde::Serialize;

/// Differential score a query must strictly exceed to become a candidate
pub const DEFAULT_THRESHOLD: f64 = 0.0;

/// Sort by descending differential score (stable) and split off the candidates
pub fn select_candidates(
    mut records: Vec<ComparisonRecord>,
    threshold: f64,
) -> (Vec<ComparisonRecord>, Vec<ComparisonRecord>) {
    records.sort_by(|x, y| y.differential_score.total_cmp(&x.differential_score));
    let candidates = records
        .iter()
        .filter(|r| r.differential_score > threshold)
        .cloned()
        .collect();
    (records, candidates)
}

/// Join two best-hit tables, then select candidates. Returns `(full, candidates)`.
pub fn reconcile_and_select(
    table_a: &BestHitTable,
    table_b: &BestHitTable,
    threshold: f64,
) -> (Vec<ComparisonRecord>, Vec<ComparisonRecord>) {
    select_candidates(reconcile(table_a, table_b), threshold)
}

/// Counts reported at the end of a comparison run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonSummary {
    pub population_a: String,
    pub population_b: String,
    pub queries: usize,
    pub predominance_a: usize,
    pub predominance_b: usize,
    pub ties: usize,
    pub only_a: usize,
    pub only_b: usize,
    pub threshold: f64,
    pub candidates: usize,
}

impl ComparisonSummary {
    pub fn from_records(
        population_a: &str,
        population_b: &str,
        full: &[ComparisonRecord],
        candidates: &[ComparisonRecord],
        threshold: f64,
    ) -> Self {
        let count = |p: Predominance| full.iter().filter(|r| r.predominance == p).count();
        Self {
            population_a: population_a.to_string(),
            population_b: population_b.to_string(),
            queries: full.len(),
            predominance_a: count(Predominance::A),
            predominance_b: count(Predominance::B),
            ties: count(Predominance::Tie),
            only_a: full.iter().filter(|r| r.b().is_none()).count(),
            only_b: full.iter().filter(|r| r.a().is_none()).count(),
            threshold,
            candidates: candidates.len(),
        }
    }
}
