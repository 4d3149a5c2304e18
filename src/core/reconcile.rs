// reconcile.rs - Outer join of two best-hit tables and predominance scoring

use crate::core::reducer::BestHitTable;
use crate::data::HitRecord;
use std::collections::BTreeSet;
use std::fmt;

/// Which population a query resembles more
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Predominance {
    A,
    B,
    Tie,
}

impl Predominance {
    /// Output label: the winning population's label, or `tie`
    pub fn label<'a>(&self, label_a: &'a str, label_b: &'a str) -> &'a str {
        match self {
            Predominance::A => label_a,
            Predominance::B => label_b,
            Predominance::Tie => "tie",
        }
    }
}

impl fmt::Display for Predominance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label("A", "B"))
    }
}

/// Which sides a query was found on. A query absent from both tables cannot be built.
#[derive(Debug, Clone, PartialEq)]
pub enum Presence {
    Both(HitRecord, HitRecord),
    OnlyA(HitRecord),
    OnlyB(HitRecord),
}

impl Presence {
    pub fn a(&self) -> Option<&HitRecord> {
        match self {
            Presence::Both(a, _) | Presence::OnlyA(a) => Some(a),
            Presence::OnlyB(_) => None,
        }
    }

    pub fn b(&self) -> Option<&HitRecord> {
        match self {
            Presence::Both(_, b) | Presence::OnlyB(b) => Some(b),
            Presence::OnlyA(_) => None,
        }
    }

    fn from_sides(a: Option<&HitRecord>, b: Option<&HitRecord>) -> Option<Self> {
        match (a, b) {
            (Some(a), Some(b)) => Some(Presence::Both(a.clone(), b.clone())),
            (Some(a), None) => Some(Presence::OnlyA(a.clone())),
            (None, Some(b)) => Some(Presence::OnlyB(b.clone())),
            (None, None) => None,
        }
    }
}

/// Score used for the differential: the bit score, or zero for an absent side
fn effective_score(hit: Option<&HitRecord>) -> f64 {
    match hit {
        Some(h) if !h.bit_score.is_nan() => h.bit_score,
        _ => 0.0,
    }
}

/// Per-query comparison of the two populations' best hits
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRecord {
    pub query_id: String,
    pub presence: Presence,
    pub predominance: Predominance,
    pub differential_score: f64,
}

impl ComparisonRecord {
    pub fn new(query_id: impl Into<String>, presence: Presence) -> Self {
        let predominance = match &presence {
            Presence::Both(a, b) => {
                let (score_a, score_b) = (a.rank_score(), b.rank_score());
                if score_a > score_b {
                    Predominance::A
                } else if score_b > score_a {
                    Predominance::B
                } else {
                    Predominance::Tie
                }
            }
            Presence::OnlyA(_) => Predominance::A,
            Presence::OnlyB(_) => Predominance::B,
        };
        let differential_score = effective_score(presence.a()) - effective_score(presence.b());

        Self {
            query_id: query_id.into(),
            presence,
            predominance,
            differential_score,
        }
    }

    pub fn a(&self) -> Option<&HitRecord> {
        self.presence.a()
    }

    pub fn b(&self) -> Option<&HitRecord> {
        self.presence.b()
    }
}

/// Join two best-hit tables over the union of their queries, in query id order
pub fn reconcile(table_a: &BestHitTable, table_b: &BestHitTable) -> Vec<ComparisonRecord> {
    let union: BTreeSet<&str> = table_a.query_ids().chain(table_b.query_ids()).collect();

    union
        .into_iter()
        .filter_map(|query_id| {
            Presence::from_sides(table_a.get(query_id), table_b.get(query_id))
                .map(|presence| ComparisonRecord::new(query_id, presence))
        })
        .collect()
}
