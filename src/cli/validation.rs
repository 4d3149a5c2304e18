// validation.rs - Input validation utilities

use crate::cli::args::*;
use crate::cli::merge::MergedArgs;
use crate::core::filter::{FilterJob, HitFilter};
use crate::core::housekeeping::KeywordMatcher;
use crate::data::schema::genome_column_name;
use crate::data::{HitLayout, RowPolicy, TableSchema};
use crate::error::{HgtError, Result};
use crate::output::ComparisonColumns;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct FilterSettings {
    pub job: FilterJob,
    pub output: PathBuf,
    pub output_schema: TableSchema,
    pub provenance: bool,
    pub threads: Option<usize>,
}

#[derive(Debug)]
pub struct SelectSettings {
    pub hits: PathBuf,
    pub fasta_dir: PathBuf,
    pub output_dir: PathBuf,
}

#[derive(Debug)]
pub struct CompareSettings {
    pub hits_a: PathBuf,
    pub hits_b: PathBuf,
    pub schema_a: TableSchema,
    pub schema_b: TableSchema,
    pub columns: ComparisonColumns,
    pub output: PathBuf,
    pub candidates: PathBuf,
    pub threshold: f64,
    pub policy: RowPolicy,
    pub provenance: bool,
    pub summary: Option<PathBuf>,
}

#[derive(Debug)]
pub struct ExtractSettings {
    pub candidates: PathBuf,
    pub genome: PathBuf,
    pub output: PathBuf,
    pub label_a: String,
    pub policy: RowPolicy,
}

#[derive(Debug)]
pub struct HousekeepingSettings {
    pub annotations: PathBuf,
    pub seed_orthologs: PathBuf,
    pub input: PathBuf,
    pub output: PathBuf,
    pub matcher: KeywordMatcher,
}

/// A subcommand with every argument checked and typed
#[derive(Debug)]
pub enum ValidationResult {
    Filter(FilterSettings),
    Select(SelectSettings),
    Compare(CompareSettings),
    Extract(ExtractSettings),
    Housekeeping(HousekeepingSettings),
}

fn invalid(message: impl Into<String>) -> HgtError {
    HgtError::InvalidArgument(message.into())
}

fn required(value: &Option<String>, flag: &str) -> Result<PathBuf> {
    value
        .as_deref()
        .map(PathBuf::from)
        .ok_or_else(|| invalid(format!("--{} is required", flag)))
}

fn existing_file(value: &Option<String>, flag: &str) -> Result<PathBuf> {
    let path = required(value, flag)?;
    check_file(&path, flag)?;
    Ok(path)
}

fn check_file(path: &Path, flag: &str) -> Result<()> {
    if !path.is_file() {
        return Err(invalid(format!("--{}: file '{}' not found", flag, path.display())));
    }
    Ok(())
}

fn existing_dir(value: &Option<String>, flag: &str) -> Result<PathBuf> {
    let path = required(value, flag)?;
    if !path.is_dir() {
        return Err(invalid(format!(
            "--{}: directory '{}' not found",
            flag,
            path.display()
        )));
    }
    Ok(path)
}

/// Labels become column name suffixes
fn validate_label(label: &str, flag: &str) -> Result<()> {
    if label.is_empty() || label.chars().any(|c| c.is_whitespace()) {
        return Err(invalid(format!(
            "--{} must be a non-empty label without whitespace, got '{}'",
            flag, label
        )));
    }
    Ok(())
}

/// Validate all command line arguments
pub fn validate_args(merged: &MergedArgs) -> Result<ValidationResult> {
    let args = &merged.args;
    if args.verbose > 2 {
        return Err(invalid("--verbose must be 0, 1 or 2"));
    }

    match &args.command {
        Some(Command::Filter(a)) => validate_filter(a).map(ValidationResult::Filter),
        Some(Command::Select(a)) => validate_select(a).map(ValidationResult::Select),
        Some(Command::Compare(a)) => validate_compare(a).map(ValidationResult::Compare),
        Some(Command::Extract(a)) => validate_extract(a).map(ValidationResult::Extract),
        Some(Command::Housekeeping(a)) => {
            validate_housekeeping(a, merged.housekeeping_keywords.as_deref())
                .map(ValidationResult::Housekeeping)
        }
        None => Err(invalid(
            "a subcommand is required: filter, select, compare, extract or housekeeping",
        )),
    }
}

fn validate_filter(args: &FilterArgs) -> Result<FilterSettings> {
    let input_dir = existing_dir(&args.input_dir, "input-dir")?;
    let output = required(&args.output, "output")?;
    let layout: HitLayout = args.layout.parse()?;
    validate_label(&args.label, "label")?;

    let defaults = HitFilter::for_layout(layout);
    let min_identity = args.min_identity.unwrap_or(defaults.min_identity);
    if !(0.0..=100.0).contains(&min_identity) {
        return Err(invalid("--min-identity must be between 0 and 100"));
    }
    if args.extension.trim_start_matches('.').is_empty() {
        return Err(invalid("--extension must not be empty"));
    }
    if args.threads == Some(0) {
        return Err(invalid("--threads must be at least 1"));
    }
    let fai_dir = match &args.fai_dir {
        Some(_) => Some(existing_dir(&args.fai_dir, "fai-dir")?),
        None => None,
    };

    Ok(FilterSettings {
        job: FilterJob {
            input_dir,
            extension: args.extension.clone(),
            schema: TableSchema::raw(layout),
            filter: HitFilter {
                min_identity,
                min_length: args.min_length.unwrap_or(defaults.min_length),
                min_scaffold_length: fai_dir.as_ref().map(|_| args.min_scaffold_length),
            },
            fai_dir,
            genome_separator: args.genome_separator.clone(),
            policy: RowPolicy::from_strict(args.strict),
        },
        output,
        output_schema: TableSchema::tagged(layout, genome_column_name(&args.label)),
        provenance: args.provenance,
        threads: args.threads,
    })
}

fn validate_select(args: &SelectArgs) -> Result<SelectSettings> {
    Ok(SelectSettings {
        hits: existing_file(&args.hits, "hits")?,
        fasta_dir: existing_dir(&args.fasta_dir, "fasta-dir")?,
        output_dir: PathBuf::from(&args.output_dir),
    })
}

fn validate_compare(args: &CompareArgs) -> Result<CompareSettings> {
    let hits_a = existing_file(&args.hits_a, "hits-a")?;
    let hits_b = existing_file(&args.hits_b, "hits-b")?;
    validate_label(&args.label_a, "label-a")?;
    validate_label(&args.label_b, "label-b")?;
    if args.label_a == args.label_b {
        return Err(invalid(format!(
            "--label-a and --label-b must differ, both are '{}'",
            args.label_a
        )));
    }
    if !args.threshold.is_finite() {
        return Err(invalid("--threshold must be a finite number"));
    }

    let layout_a: HitLayout = args.layout_a.parse()?;
    let layout_b: HitLayout = args.layout_b.parse()?;
    let output = PathBuf::from(&args.output);
    let candidates = PathBuf::from(&args.candidates);
    if output == candidates {
        return Err(invalid("--output and --candidates must be different files"));
    }

    Ok(CompareSettings {
        schema_a: TableSchema::tagged(layout_a, genome_column_name(&args.label_a)),
        schema_b: TableSchema::tagged(layout_b, genome_column_name(&args.label_b)),
        columns: ComparisonColumns {
            label_a: args.label_a.clone(),
            layout_a,
            label_b: args.label_b.clone(),
            layout_b,
        },
        hits_a,
        hits_b,
        output,
        candidates,
        threshold: args.threshold,
        policy: RowPolicy::from_strict(args.strict),
        provenance: args.provenance,
        summary: args.summary.as_deref().map(PathBuf::from),
    })
}

fn validate_extract(args: &ExtractArgs) -> Result<ExtractSettings> {
    let candidates = PathBuf::from(&args.candidates);
    check_file(&candidates, "candidates")?;
    validate_label(&args.label_a, "label-a")?;

    Ok(ExtractSettings {
        candidates,
        genome: existing_file(&args.genome, "genome")?,
        output: PathBuf::from(&args.output),
        label_a: args.label_a.clone(),
        policy: RowPolicy::from_strict(args.strict),
    })
}

fn validate_housekeeping(
    args: &HousekeepingArgs,
    inline_keywords: Option<&[String]>,
) -> Result<HousekeepingSettings> {
    let input = PathBuf::from(&args.input);
    check_file(&input, "input")?;

    let matcher = match (&args.keywords, inline_keywords) {
        (Some(file), _) => KeywordMatcher::new(&load_keywords_file(file)?)?,
        (None, Some(keywords)) => KeywordMatcher::new(keywords)?,
        (None, None) => KeywordMatcher::with_defaults()?,
    };

    Ok(HousekeepingSettings {
        annotations: existing_file(&args.annotations, "annotations")?,
        seed_orthologs: existing_file(&args.seed_orthologs, "seed-orthologs")?,
        input,
        output: PathBuf::from(&args.output),
        matcher,
    })
}

/// Load keywords from a file (one per line, `#` starts a comment line)
fn load_keywords_file(file_path: &str) -> Result<Vec<String>> {
    let file = File::open(file_path).map_err(|e| HgtError::io(file_path, e))?;

    let mut keywords = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| HgtError::io(file_path, e))?;
        let trimmed = line.trim();
        if !trimmed.is_empty() && !trimmed.starts_with('#') {
            keywords.push(trimmed.to_string());
        }
    }

    log::info!(
        "📋 Loaded {} keywords from '{}'",
        keywords.len(),
        file_path
    );
    Ok(keywords)
}

#[cfg(test)]
mod tests {
    use super::*;
    use argh::FromArgs;
    use std::fs;

    fn validate(argv: &[&str]) -> Result<ValidationResult> {
        let args = Args::from_args(&["hgtscan"], argv).unwrap();
        validate_args(&args.without_config())
    }

    #[test]
    fn test_compare_settings() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.tsv");
        let b = dir.path().join("b.tsv");
        fs::write(&a, "").unwrap();
        fs::write(&b, "").unwrap();

        let result = validate(&[
            "compare",
            "--hits-a",
            a.to_str().unwrap(),
            "--hits-b",
            b.to_str().unwrap(),
            "--layout-b",
            "full",
            "--strict",
        ])
        .unwrap();
        let ValidationResult::Compare(settings) = result else {
            panic!("expected compare settings");
        };
        assert_eq!(settings.schema_a.genome_column.as_deref(), Some("fungi_genome"));
        assert_eq!(settings.schema_b.layout, HitLayout::Full);
        assert_eq!(settings.policy, RowPolicy::Strict);
        assert_eq!(settings.output, PathBuf::from(DEFAULT_COMPARISON_OUTPUT));
    }

    #[test]
    fn test_compare_rejections() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.tsv");
        fs::write(&a, "").unwrap();
        let a = a.to_str().unwrap();

        assert!(validate(&["compare", "--hits-a", a]).is_err());
        assert!(validate(&["compare", "--hits-a", a, "--hits-b", a, "--label-b", "fungi"]).is_err());
        assert!(validate(&["compare", "--hits-a", a, "--hits-b", a, "--layout-a", "wide"]).is_err());
        assert!(validate(&["compare", "--hits-a", a, "--hits-b", a, "--threshold", "NaN"]).is_err());
        assert!(validate(&["compare", "--hits-a", a, "--hits-b", a, "--label-a", "my fungi"]).is_err());
    }

    #[test]
    fn test_filter_scaffold_filter_needs_fai_dir() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().to_str().unwrap();

        let ValidationResult::Filter(settings) =
            validate(&["filter", "--input-dir", input, "--output", "out.tsv"]).unwrap()
        else {
            panic!("expected filter settings");
        };
        assert!(settings.job.filter.min_scaffold_length.is_none());
        assert_eq!(settings.output_schema.header().last().unwrap(), "fungi_genome");

        let ValidationResult::Filter(settings) = validate(&[
            "filter", "--input-dir", input, "--output", "out.tsv", "--fai-dir", input,
        ])
        .unwrap() else {
            panic!("expected filter settings");
        };
        assert_eq!(settings.job.filter.min_scaffold_length, Some(20_000));
    }

    #[test]
    fn test_filter_thresholds_follow_layout() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().to_str().unwrap();
        let thresholds = |argv: &[&str]| {
            let ValidationResult::Filter(settings) = validate(argv).unwrap() else {
                panic!("expected filter settings");
            };
            (settings.job.filter.min_identity, settings.job.filter.min_length)
        };

        let base = ["filter", "--input-dir", input, "--output", "out.tsv"];
        assert_eq!(thresholds(&base), (80.0, 500));
        assert_eq!(thresholds(&[&base[..], &["--layout", "reduced"]].concat()), (0.0, 0));
        assert_eq!(
            thresholds(&[&base[..], &["--layout", "reduced", "--min-identity", "70"]].concat()),
            (70.0, 0)
        );
        assert!(validate(&[&base[..], &["--layout", "reduced", "--min-identity", "120"]].concat()).is_err());
    }

    #[test]
    fn test_missing_subcommand() {
        assert!(validate(&[]).is_err());
    }

    #[test]
    fn test_keywords_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kw.txt");
        fs::write(&path, "# housekeeping\nactin\n\n  tubulin \n").unwrap();
        assert_eq!(
            load_keywords_file(path.to_str().unwrap()).unwrap(),
            vec!["actin".to_string(), "tubulin".to_string()]
        );
    }
}
