// hit.rs - Alignment hit record

use crate::error::{HgtError, Result};
use std::path::Path;

/// Coordinates and counts only present in full-layout (12 column) tables
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentDetail {
    pub mismatch_count: u64,
    pub gap_open_count: u64,
    pub query_start: u64,
    pub query_end: u64,
    pub target_start: u64,
    pub target_end: u64,
}

impl AlignmentDetail {
    /// Query coordinates as `(low, high)`, regardless of strand
    pub fn query_span(&self) -> (u64, u64) {
        normalize_span(self.query_start, self.query_end)
    }

    /// Target coordinates as `(low, high)`, regardless of strand
    pub fn target_span(&self) -> (u64, u64) {
        normalize_span(self.target_start, self.target_end)
    }
}

fn normalize_span(start: u64, end: u64) -> (u64, u64) {
    if start > end {
        (end, start)
    } else {
        (start, end)
    }
}

/// One alignment result produced by the external aligner
#[derive(Debug, Clone, PartialEq)]
pub struct HitRecord {
    pub query_id: String,
    pub target_id: String,
    pub percent_identity: f64,
    pub alignment_length: u64,
    pub e_value: f64,
    pub bit_score: f64,
    /// Genome or database the hit came from
    pub population_tag: String,
    pub detail: Option<AlignmentDetail>,
}

impl HitRecord {
    /// Ranking key: NaN scores rank below every real score
    pub fn rank_score(&self) -> f64 {
        if self.bit_score.is_nan() {
            f64::NEG_INFINITY
        } else {
            self.bit_score
        }
    }

    /// Required-field validation applied by every loader
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.query_id.trim().is_empty() {
            return Err("empty query id".to_string());
        }
        if !self.bit_score.is_finite() {
            return Err(format!("non-finite bit score {}", self.bit_score));
        }
        if !self.percent_identity.is_finite() {
            return Err(format!("non-finite percent identity {}", self.percent_identity));
        }
        if self.e_value.is_nan() || self.e_value < 0.0 {
            return Err(format!("invalid e-value {}", self.e_value));
        }
        Ok(())
    }
}

/// What to do with a row that fails validation. Applied identically to every input table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowPolicy {
    /// Drop the row, log it at debug level and count it
    #[default]
    Skip,
    /// Abort the run on the first malformed row
    Strict,
}

impl RowPolicy {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            RowPolicy::Strict
        } else {
            RowPolicy::Skip
        }
    }

    /// Returns `Ok(true)` if the caller should count the row as rejected and continue
    pub(crate) fn reject(&self, path: &Path, line: u64, reason: String) -> Result<bool> {
        match self {
            RowPolicy::Skip => {
                log::debug!("Skipping row {} of '{}': {}", line, path.display(), reason);
                Ok(true)
            }
            RowPolicy::Strict => Err(HgtError::MalformedInput {
                path: path.to_path_buf(),
                line,
                reason,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(query: &str, score: f64) -> HitRecord {
        HitRecord {
            query_id: query.to_string(),
            target_id: "t1".to_string(),
            percent_identity: 99.0,
            alignment_length: 600,
            e_value: 0.0,
            bit_score: score,
            population_tag: "Fg1".to_string(),
            detail: None,
        }
    }

    #[test]
    fn test_span_normalization() {
        let detail = AlignmentDetail {
            mismatch_count: 0,
            gap_open_count: 0,
            query_start: 10,
            query_end: 50,
            target_start: 900,
            target_end: 300,
        };
        assert_eq!(detail.query_span(), (10, 50));
        assert_eq!(detail.target_span(), (300, 900));
    }

    #[test]
    fn test_nan_ranks_lowest() {
        assert_eq!(hit("q1", f64::NAN).rank_score(), f64::NEG_INFINITY);
        assert_eq!(hit("q1", 12.5).rank_score(), 12.5);
    }

    #[test]
    fn test_validation() {
        assert!(hit("q1", 10.0).validate().is_ok());
        assert!(hit("", 10.0).validate().is_err());
        assert!(hit("  ", 10.0).validate().is_err());
        assert!(hit("q1", f64::NAN).validate().is_err());
        assert!(hit("q1", f64::INFINITY).validate().is_err());
        assert!(hit("q1", f64::NEG_INFINITY).validate().is_err());

        let mut identity = hit("q1", 10.0);
        identity.percent_identity = f64::INFINITY;
        assert!(identity.validate().is_err());

        let mut negative = hit("q1", 10.0);
        negative.e_value = -1.0;
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_row_policy() {
        let path = Path::new("hits.tsv");
        assert!(RowPolicy::Skip.reject(path, 3, "bad".into()).unwrap());

        let err = RowPolicy::Strict
            .reject(path, 3, "bad".into())
            .unwrap_err();
        assert!(matches!(err, HgtError::MalformedInput { line: 3, .. }));
    }
}
