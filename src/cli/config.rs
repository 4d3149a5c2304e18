// config.rs - Configuration file support

use crate::error::{HgtError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FilterConfig {
    pub input_dir: Option<String>,
    pub output: Option<String>,
    pub layout: Option<String>,
    pub extension: Option<String>,
    pub min_identity: Option<f64>,
    pub min_length: Option<u64>,
    pub min_scaffold_length: Option<u64>,
    pub fai_dir: Option<String>,
    pub genome_separator: Option<String>,
    pub label: Option<String>,
    pub strict: Option<bool>,
    pub provenance: Option<bool>,
    pub threads: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SelectConfig {
    pub hits: Option<String>,
    pub fasta_dir: Option<String>,
    pub output_dir: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CompareConfig {
    pub hits_a: Option<String>,
    pub hits_b: Option<String>,
    pub output: Option<String>,
    pub candidates: Option<String>,
    pub threshold: Option<f64>,
    pub label_a: Option<String>,
    pub label_b: Option<String>,
    pub layout_a: Option<String>,
    pub layout_b: Option<String>,
    pub strict: Option<bool>,
    pub provenance: Option<bool>,
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ExtractConfig {
    pub candidates: Option<String>,
    pub genome: Option<String>,
    pub output: Option<String>,
    pub label_a: Option<String>,
    pub strict: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HousekeepingConfig {
    pub annotations: Option<String>,
    pub seed_orthologs: Option<String>,
    pub input: Option<String>,
    pub output: Option<String>,
    pub keywords_file: Option<String>,
    /// Replaces the built-in keyword list
    pub keywords: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    pub verbose: Option<u8>,
    pub filter: Option<FilterConfig>,
    pub select: Option<SelectConfig>,
    pub compare: Option<CompareConfig>,
    pub extract: Option<ExtractConfig>,
    pub housekeeping: Option<HousekeepingConfig>,
}

impl Config {
    /// Create a new empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| HgtError::io(path, e))?;
        Self::from_toml(&content, path)
    }

    fn from_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|source| HgtError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Generate a sample configuration file with comments
    pub fn generate_sample() -> String {
        r#"# hgtscan.toml - Configuration file for hgtscan
# Command line arguments will override these settings

# Log verbosity: 0 = warnings, 1 = info, 2 = debug
verbose = 1

# =============================================================================
# FILTER: raw aligner results -> tagged hit table
# =============================================================================
[filter]
input_dir = "/path/to/blast_results"
output = "fungi_hits.tsv"

# Layout of the raw files: full (12 columns) or reduced (6 columns)
layout = "full"
extension = "blast"

# Acceptance thresholds (inclusive). Unset, they default to 80 / 500 for
# the full layout and 0 / 0 for the reduced one
# min_identity = 80.0
# min_length = 500

# Scaffold length filter, only applied when fai_dir is set
min_scaffold_length = 20000
# fai_dir = "/path/to/fai"

# Result files are named <query>_VS_<genome>.blast
genome_separator = "_VS_"
label = "fungi"

strict = false
provenance = false
# threads = 16

# =============================================================================
# SELECT: subject sequences hit by a tagged table
# =============================================================================
[select]
hits = "fungi_hits.tsv"
fasta_dir = "/path/to/fungal_genomes"
output_dir = "selected"

# =============================================================================
# COMPARE: best hits of population A against population B
# =============================================================================
[compare]
hits_a = "fungi_hits.tsv"
hits_b = "plant_hits.tsv"
output = "fungi_vs_plant_comparison.tsv"
candidates = "hgt_candidates.tsv"

# Candidates have a differential score strictly above the threshold
threshold = 0.0

label_a = "fungi"
label_b = "plant"
layout_a = "full"
layout_b = "reduced"

strict = false
provenance = false
# summary = "comparison_summary.json"

# =============================================================================
# EXTRACT: candidate regions from the population A genome
# =============================================================================
[extract]
candidates = "hgt_candidates.tsv"
genome = "/path/to/genome.fasta"
output = "hgt_candidates.fasta"
label_a = "fungi"

# =============================================================================
# HOUSEKEEPING: drop candidates annotated as housekeeping genes
# =============================================================================
[housekeeping]
annotations = "hgt.emapper.annotations"
seed_orthologs = "hgt.emapper.seed_orthologs"
input = "hgt_candidates.fasta"
output = "hgt_filtered.fasta"

# Replace the built-in keyword list
# keywords = ["ribosomal", "tubulin", "actin"]
# keywords_file = "keywords.txt"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_config_parses() {
        let config = Config::from_toml(&Config::generate_sample(), Path::new("sample.toml")).unwrap();
        assert_eq!(config.verbose, Some(1));

        let compare = config.compare.unwrap();
        assert_eq!(compare.label_a.as_deref(), Some("fungi"));
        assert_eq!(compare.threshold, Some(0.0));
        assert!(compare.summary.is_none());

        let filter = config.filter.unwrap();
        assert!(filter.min_length.is_none());
        assert_eq!(filter.min_scaffold_length, Some(20000));
        assert!(config.housekeeping.unwrap().keywords.is_none());
    }

    #[test]
    fn test_partial_config() {
        let config = Config::from_toml("[compare]\nthreshold = 25.5\n", Path::new("c.toml")).unwrap();
        assert!(config.filter.is_none());
        assert_eq!(config.compare.unwrap().threshold, Some(25.5));
    }

    #[test]
    fn test_invalid_config() {
        let err = Config::from_toml("[compare]\nthreshold = \"high\"\n", Path::new("bad.toml"))
            .unwrap_err();
        assert!(matches!(err, HgtError::Config { .. }));
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            Config::from_file("/nonexistent/hgtscan.toml").unwrap_err(),
            HgtError::Io { .. }
        ));
    }
}
