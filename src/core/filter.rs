// filter.rs - Threshold filtering of raw aligner output

use crate::data::loaders::{load_hits, scaffold_lengths_for, ScaffoldLengths};
use crate::data::{HitLayout, HitRecord, RowPolicy, TableSchema};
use crate::error::{HgtError, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Default thresholds for full-layout (fungal) results; reduced-layout
/// results keep every hit unless thresholds are given
pub const DEFAULT_MIN_IDENTITY: f64 = 80.0;
pub const DEFAULT_MIN_LENGTH: u64 = 500;
pub const DEFAULT_MIN_SCAFFOLD_LENGTH: u64 = 20_000;

/// Per-hit acceptance thresholds
#[derive(Debug, Clone, PartialEq)]
pub struct HitFilter {
    pub min_identity: f64,
    pub min_length: u64,
    /// Minimum length of the query scaffold; only applied with scaffold lengths
    pub min_scaffold_length: Option<u64>,
}

impl Default for HitFilter {
    fn default() -> Self {
        Self {
            min_identity: DEFAULT_MIN_IDENTITY,
            min_length: DEFAULT_MIN_LENGTH,
            min_scaffold_length: None,
        }
    }
}

impl HitFilter {
    /// Keep every hit
    pub fn pass_all() -> Self {
        Self {
            min_identity: 0.0,
            min_length: 0,
            min_scaffold_length: None,
        }
    }

    /// Default thresholds for results in `layout`
    pub fn for_layout(layout: HitLayout) -> Self {
        match layout {
            HitLayout::Full => Self::default(),
            HitLayout::Reduced => Self::pass_all(),
        }
    }

    pub fn accepts(&self, hit: &HitRecord, scaffolds: Option<&ScaffoldLengths>) -> bool {
        if hit.percent_identity < self.min_identity || hit.alignment_length < self.min_length {
            return false;
        }
        match (self.min_scaffold_length, scaffolds) {
            (Some(min), Some(lengths)) => {
                lengths.get(&hit.query_id).copied().unwrap_or(0) >= min
            }
            _ => true,
        }
    }
}

/// Provenance tag of a result file: the part of its stem after `separator`,
/// or the whole stem. `Ath_VS_Fg1.blast` with `_VS_` gives `Fg1`.
pub fn genome_tag(path: &Path, separator: &str) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    if separator.is_empty() {
        return stem;
    }
    match stem.split_once(separator) {
        Some((_, genome)) => genome.to_string(),
        None => stem,
    }
}

/// Result files in `dir` with the given extension, sorted by name
pub fn list_result_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let extension = extension.trim_start_matches('.');
    let entries = std::fs::read_dir(dir).map_err(|e| HgtError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| HgtError::io(dir, e))?.path();
        if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some(extension) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Everything needed to filter one directory of raw results
#[derive(Debug, Clone)]
pub struct FilterJob {
    pub input_dir: PathBuf,
    pub extension: String,
    pub schema: TableSchema,
    pub filter: HitFilter,
    pub fai_dir: Option<PathBuf>,
    pub genome_separator: String,
    pub policy: RowPolicy,
}

#[derive(Debug, Default)]
pub struct FilterReport {
    pub hits: Vec<HitRecord>,
    pub files: usize,
    pub empty_files: usize,
    pub raw_hits: usize,
    pub rejected_rows: usize,
}

struct FileOutcome {
    hits: Vec<HitRecord>,
    raw_hits: usize,
    rejected_rows: usize,
    empty: bool,
}

fn filter_file(path: &Path, job: &FilterJob) -> Result<FileOutcome> {
    let size = std::fs::metadata(path)
        .map_err(|e| HgtError::io(path, e))?
        .len();
    if size == 0 {
        return Ok(FileOutcome {
            hits: Vec::new(),
            raw_hits: 0,
            rejected_rows: 0,
            empty: true,
        });
    }

    let genome = genome_tag(path, &job.genome_separator);
    let loaded = load_hits(path, &job.schema, &genome, job.policy)?;

    let scaffolds = match (&job.fai_dir, job.filter.min_scaffold_length) {
        (Some(dir), Some(_)) => Some(scaffold_lengths_for(dir, &genome)?),
        _ => None,
    };

    let raw_hits = loaded.records.len();
    let hits = loaded
        .records
        .into_iter()
        .filter(|hit| job.filter.accepts(hit, scaffolds.as_ref()))
        .collect();

    Ok(FileOutcome {
        hits,
        raw_hits,
        rejected_rows: loaded.rejected,
        empty: false,
    })
}

/// Filter every result file of a directory in parallel.
///
/// Files are parsed independently and their surviving hits concatenated once,
/// in file name order. Any unreadable file aborts the run.
pub fn filter_directory(job: &FilterJob) -> Result<FilterReport> {
    let files = list_result_files(&job.input_dir, &job.extension)?;
    log::info!(
        "🔍 Filtering {} result files from {} (identity >= {}%, length >= {} bp{})",
        files.len(),
        job.input_dir.display(),
        job.filter.min_identity,
        job.filter.min_length,
        match (job.filter.min_scaffold_length, &job.fai_dir) {
            (Some(min), Some(_)) => format!(", scaffold >= {} bp", min),
            _ => String::new(),
        }
    );

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let outcomes = files
        .par_iter()
        .map(|path| {
            let outcome = filter_file(path, job);
            pb.inc(1);
            outcome
        })
        .collect::<Result<Vec<_>>>()?;
    pb.finish_and_clear();

    let mut report = FilterReport {
        files: files.len(),
        ..FilterReport::default()
    };
    let total_kept = outcomes.iter().map(|o| o.hits.len()).sum();
    report.hits.reserve_exact(total_kept);
    for outcome in outcomes {
        report.raw_hits += outcome.raw_hits;
        report.rejected_rows += outcome.rejected_rows;
        if outcome.empty {
            report.empty_files += 1;
        }
        report.hits.extend(outcome.hits);
    }

    log::info!(
        "📊 {} of {} hits kept ({} empty files, {} malformed rows)",
        report.hits.len(),
        report.raw_hits,
        report.empty_files,
        report.rejected_rows
    );
    Ok(report)
}
