// pipeline.rs - One runner per subcommand, from validated settings to written outputs

use crate::cli::validation::{
    CompareSettings, ExtractSettings, FilterSettings, HousekeepingSettings, SelectSettings,
};
use crate::core::extract::{extract_regions, load_candidate_regions};
use crate::core::filter::filter_directory;
use crate::core::housekeeping::{housekeeping_ids, remove_housekeeping, HousekeepingReport};
use crate::core::reducer::reduce;
use crate::core::select::{reconcile_and_select, ComparisonSummary};
use crate::core::subjects::{load_subject_ids, select_subjects, SelectedFile};
use crate::data::annotation::{load_annotations, load_seed_ortholog_ids};
use crate::data::loaders::HitTableReader;
use crate::data::sequences::load_sequence_map;
use crate::error::Result;
use crate::output::{write_comparison_outputs, write_fasta, write_hit_table, write_json};
use std::path::PathBuf;
use std::time::Instant;

/// Filter raw results and write one tagged table
pub fn run_filter(settings: &FilterSettings, command_line: &str) -> Result<PathBuf> {
    let start = Instant::now();
    let report = filter_directory(&settings.job)?;
    if report.hits.is_empty() {
        log::warn!(
            "⚠️  No hit passed the filters; {} will contain only a header",
            settings.output.display()
        );
    }

    let provenance = settings.provenance.then_some(command_line);
    let path = write_hit_table(
        &settings.output,
        &settings.output_schema,
        &report.hits,
        provenance,
    )?;
    log::info!("⏱️  Filtering took {:.2}s", start.elapsed().as_secs_f64());
    Ok(path)
}

pub fn run_select(settings: &SelectSettings) -> Result<Vec<SelectedFile>> {
    let ids = load_subject_ids(&settings.hits)?;
    log::info!(
        "📋 {} distinct subject ids in {}",
        ids.len(),
        settings.hits.display()
    );
    select_subjects(&ids, &settings.fasta_dir, &settings.output_dir)
}

/// Reduce both populations to best hits, reconcile and write both tables
pub fn run_compare(settings: &CompareSettings, command_line: &str) -> Result<ComparisonSummary> {
    let start = Instant::now();
    let label_a = &settings.columns.label_a;
    let label_b = &settings.columns.label_b;

    // Both headers are resolved before either table's rows are read
    let reader_a = HitTableReader::open(&settings.hits_a, &settings.schema_a)?;
    let reader_b = HitTableReader::open(&settings.hits_b, &settings.schema_b)?;
    let loaded_a = reader_a.read_all(label_a, settings.policy)?;
    let loaded_b = reader_b.read_all(label_b, settings.policy)?;
    log::info!(
        "📥 Loaded {} {} hits and {} {} hits",
        loaded_a.records.len(),
        label_a,
        loaded_b.records.len(),
        label_b
    );

    let table_a = reduce(loaded_a.records, label_a);
    let table_b = reduce(loaded_b.records, label_b);
    log::info!(
        "🎯 Best hits: {} {} queries, {} {} queries",
        table_a.len(),
        label_a,
        table_b.len(),
        label_b
    );

    let (full, candidates) = reconcile_and_select(&table_a, &table_b, settings.threshold);
    let provenance = settings.provenance.then_some(command_line);
    write_comparison_outputs(
        &settings.output,
        &settings.candidates,
        &settings.columns,
        &full,
        &candidates,
        provenance,
    )?;

    let summary =
        ComparisonSummary::from_records(label_a, label_b, &full, &candidates, settings.threshold);
    log::info!(
        "📊 {} queries: {} {}, {} {}, {} ties; {} candidates",
        summary.queries,
        summary.predominance_a,
        label_a,
        summary.predominance_b,
        label_b,
        summary.ties,
        summary.candidates
    );
    if let Some(path) = &settings.summary {
        let written = write_json(path, &summary)?;
        log::info!("📄 Summary written to: {}", written.display());
    }
    log::info!("⏱️  Comparison took {:.2}s", start.elapsed().as_secs_f64());
    Ok(summary)
}

/// Returns the output path and the number of extracted regions
pub fn run_extract(settings: &ExtractSettings) -> Result<(PathBuf, usize)> {
    let regions = load_candidate_regions(&settings.candidates, &settings.label_a, settings.policy)?;
    log::info!(
        "📋 {} candidate regions in {}",
        regions.len(),
        settings.candidates.display()
    );

    let genome = load_sequence_map(&settings.genome)?;
    let records = extract_regions(&regions, &genome);
    let (path, count) = write_fasta(&settings.output, records)?;
    log::info!("✅ {} regions written to: {}", count, path.display());
    Ok((path, count))
}

pub fn run_housekeeping(settings: &HousekeepingSettings) -> Result<HousekeepingReport> {
    let seed_ids = load_seed_ortholog_ids(&settings.seed_orthologs)?;
    let (_, annotations) = load_annotations(&settings.annotations)?;

    let remove = housekeeping_ids(&annotations, &seed_ids, &settings.matcher);
    log::info!("🧹 {} housekeeping genes to remove", remove.len());
    remove_housekeeping(&settings.input, &settings.output, &remove)
}
