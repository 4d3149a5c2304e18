// reducer.rs - Best hit per query within one population

use crate::data::HitRecord;
use std::collections::btree_map::{BTreeMap, Entry};

/// One best hit per query for a single population
#[derive(Debug, Clone, Default)]
pub struct BestHitTable {
    /// Population label, e.g. "fungi"
    pub population: String,
    hits: BTreeMap<String, HitRecord>,
}

impl BestHitTable {
    pub fn new(population: impl Into<String>) -> Self {
        Self {
            population: population.into(),
            hits: BTreeMap::new(),
        }
    }

    pub fn get(&self, query_id: &str) -> Option<&HitRecord> {
        self.hits.get(query_id)
    }

    pub fn contains(&self, query_id: &str) -> bool {
        self.hits.contains_key(query_id)
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Query ids in lexicographic order
    pub fn query_ids(&self) -> impl Iterator<Item = &str> {
        self.hits.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HitRecord)> {
        self.hits.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Fold one hit in. A later hit replaces the current best only with a strictly
    /// higher score, so the first of several equal maxima is kept.
    pub fn offer(&mut self, hit: HitRecord) {
        match self.hits.entry(hit.query_id.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(hit);
            }
            Entry::Occupied(mut slot) => {
                if hit.rank_score() > slot.get().rank_score() {
                    slot.insert(hit);
                }
            }
        }
    }
}

/// Reduce a population's hits to its best hit per query.
///
/// Equivalent to a stable sort by descending bit score followed by taking the
/// first record of each query, computed as a single pass.
pub fn reduce<I>(records: I, population_tag: &str) -> BestHitTable
where
    I: IntoIterator<Item = HitRecord>,
{
    let mut table = BestHitTable::new(population_tag);
    for hit in records {
        table.offer(hit);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(query: &str, target: &str, score: f64) -> HitRecord {
        HitRecord {
            query_id: query.to_string(),
            target_id: target.to_string(),
            percent_identity: 95.0,
            alignment_length: 700,
            e_value: 0.0,
            bit_score: score,
            population_tag: format!("genome_{}", target),
            detail: None,
        }
    }

    #[test]
    fn test_one_best_hit_per_query() {
        let records = vec![
            hit("q1", "a", 10.0),
            hit("q2", "b", 5.0),
            hit("q1", "c", 50.0),
            hit("q1", "d", 20.0),
            hit("q2", "e", 7.5),
        ];
        let table = reduce(records, "fungi");

        assert_eq!(table.len(), 2);
        assert_eq!(table.population, "fungi");
        assert_eq!(table.get("q1").unwrap().bit_score, 50.0);
        assert_eq!(table.get("q1").unwrap().population_tag, "genome_c");
        assert_eq!(table.get("q2").unwrap().target_id, "e");
    }

    #[test]
    fn test_ties_keep_first_encountered() {
        let records = vec![hit("q1", "first", 42.0), hit("q1", "second", 42.0)];
        for _ in 0..5 {
            let table = reduce(records.clone(), "plant");
            assert_eq!(table.get("q1").unwrap().target_id, "first");
        }

        let reversed: Vec<_> = records.into_iter().rev().collect();
        assert_eq!(reduce(reversed, "plant").get("q1").unwrap().target_id, "second");
    }

    #[test]
    fn test_nan_never_wins() {
        let records = vec![hit("q1", "nan", f64::NAN), hit("q1", "real", -5.0)];
        assert_eq!(reduce(records, "a").get("q1").unwrap().target_id, "real");
    }

    #[test]
    fn test_empty_input() {
        let table = reduce(Vec::new(), "fungi");
        assert!(table.is_empty());
        assert_eq!(table.query_ids().count(), 0);
    }

    #[test]
    fn test_maximum_matches_brute_force() {
        let scores = [3.0, 9.0, 1.0, 9.0, 4.0, 7.0, 2.0, 8.0];
        let records: Vec<HitRecord> = scores
            .iter()
            .enumerate()
            .map(|(i, &s)| hit(&format!("q{}", i % 3), &i.to_string(), s))
            .collect();

        let table = reduce(records.clone(), "a");
        for (query, best) in table.iter() {
            let max = records
                .iter()
                .filter(|r| r.query_id == query)
                .map(|r| r.bit_score)
                .fold(f64::NEG_INFINITY, f64::max);
            assert_eq!(best.bit_score, max);
        }
        assert_eq!(table.len(), 3);
    }
}
