// housekeeping.rs - Removal of housekeeping genes from candidate sequences

use crate::data::sequences::for_each_record;
use crate::data::Annotation;
use crate::error::Result;
use crate::output::write_fasta;
use regex::{Regex, RegexBuilder};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Keywords marking a gene as housekeeping, matched as case-insensitive substrings
pub const DEFAULT_HOUSEKEEPING_KEYWORDS: &[&str] = &[
    "ribosomal",
    "18s",
    "28s",
    "5s",
    "rrna",
    "rdna",
    "ribonucleoprotein",
    "translation elongation factor",
    "mitochondrion",
    "mitochondrial",
    "cytochrome",
    "cox1",
    "nad",
    "atp6",
    "atp9",
    "chloroplast",
    "plastid",
    "glycolysis",
    "atp synthase",
    "nadh dehydrogenase",
    "oxidoreductase",
    "succinate dehydrogenase",
    "malate dehydrogenase",
    "dna polymerase",
    "rna polymerase",
    "helicase",
    "topoisomerase",
    "exonuclease",
    "ligase",
    "primase",
    "actin",
    "tubulin",
    "kinesin",
    "dynein",
    "myosin",
    "chaperone",
    "heat shock protein",
    "ubiquitin",
    "kinase",
    "phosphatase",
];

/// Single alternation over all keywords; no keywords match nothing
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    pattern: Option<Regex>,
}

impl KeywordMatcher {
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> Result<Self> {
        let alternation = keywords
            .iter()
            .map(|k| k.as_ref().trim())
            .filter(|k| !k.is_empty())
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join("|");
        if alternation.is_empty() {
            return Ok(Self { pattern: None });
        }
        let pattern = RegexBuilder::new(&format!("(?:{})", alternation))
            .case_insensitive(true)
            .build()?;
        Ok(Self {
            pattern: Some(pattern),
        })
    }

    pub fn with_defaults() -> Result<Self> {
        Self::new(DEFAULT_HOUSEKEEPING_KEYWORDS)
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.as_ref().is_some_and(|p| p.is_match(text))
    }
}

/// Queries whose annotation matches a keyword and that also have a seed ortholog
pub fn housekeeping_ids(
    annotations: &[Annotation],
    seed_ids: &HashSet<String>,
    matcher: &KeywordMatcher,
) -> HashSet<String> {
    let matching: HashSet<&str> = annotations
        .iter()
        .filter(|a| matcher.is_match(&a.searchable_text()))
        .map(|a| a.query_id.as_str())
        .collect();
    log::info!(
        "🔎 {} queries match housekeeping keywords in name/description",
        matching.len()
    );

    matching
        .into_iter()
        .filter(|id| seed_ids.contains(*id))
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct HousekeepingReport {
    pub output: PathBuf,
    pub kept: usize,
    pub removed: usize,
}

/// Copy `input` to `output` without the records listed in `remove`
pub fn remove_housekeeping(
    input: &Path,
    output: &Path,
    remove: &HashSet<String>,
) -> Result<HousekeepingReport> {
    let mut kept = Vec::new();
    let mut removed = 0;
    for_each_record(input, |record| {
        if remove.contains(record.id()) {
            removed += 1;
        } else {
            kept.push(record);
        }
        Ok(())
    })?;

    let (output, kept) = write_fasta(output, kept)?;
    log::info!(
        "🧹 Removed {} housekeeping sequences; {} kept in {}",
        removed,
        kept,
        output.display()
    );
    Ok(HousekeepingReport {
        output,
        kept,
        removed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn annotation(id: &str, name: &str, desc: &str) -> Annotation {
        Annotation {
            query_id: id.to_string(),
            preferred_name: name.to_string(),
            description: desc.to_string(),
        }
    }

    #[test]
    fn test_default_matcher_is_case_insensitive() {
        let matcher = KeywordMatcher::with_defaults().unwrap();
        assert!(matcher.is_match("60S RIBOSOMAL protein L5"));
        assert!(matcher.is_match("Heat Shock Protein 70"));
        assert!(!matcher.is_match("Hypothetical protein"));
    }

    #[test]
    fn test_custom_keywords_are_literal() {
        let matcher = KeywordMatcher::new(&["p450", "a.b"]).unwrap();
        assert!(matcher.is_match("cytochrome P450"));
        assert!(!matcher.is_match("axb"));
        assert!(!matcher.is_match("ribosomal"));

        let empty = KeywordMatcher::new::<&str>(&[]).unwrap();
        assert!(!empty.is_match("anything"));
    }

    #[test]
    fn test_housekeeping_requires_seed_ortholog() {
        let annotations = vec![
            annotation("c1", "RPL5", "60S ribosomal protein L5"),
            annotation("c2", "TUB1", "Tubulin alpha chain"),
            annotation("c3", "", "Hypothetical protein"),
        ];
        let seeds = HashSet::from(["c1".to_string(), "c3".to_string()]);

        let ids = housekeeping_ids(&annotations, &seeds, &KeywordMatcher::with_defaults().unwrap());
        assert_eq!(ids, HashSet::from(["c1".to_string()]));
    }

    #[test]
    fn test_remove_housekeeping() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("hgt_candidates.fasta");
        fs::write(&input, ">c1\nAAAA\n>c2\nCCCC\n>c3\nGGGG\n").unwrap();

        let output = dir.path().join("hgt_filtered.fasta");
        let remove = HashSet::from(["c1".to_string()]);
        let report = remove_housekeeping(&input, &output, &remove).unwrap();

        assert_eq!((report.kept, report.removed), (2, 1));
        let text = fs::read_to_string(&output).unwrap();
        assert_eq!(text, ">c2\nCCCC\n>c3\nGGGG\n");
    }
}
