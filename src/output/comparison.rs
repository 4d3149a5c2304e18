// comparison.rs - Comparison and candidate tables

use crate::core::reconcile::ComparisonRecord;
use crate::data::schema::{format_float, genome_column_name, side_column_name};
use crate::data::{Column, HitLayout, HitRecord};
use crate::error::{HgtError, Result};
use crate::output::{table_writer, write_provenance, StagedFile};
use std::path::{Path, PathBuf};

/// Column layout of a comparison table: `qseqid`, side A columns, side B columns,
/// `predominance`, `differential_score`
#[derive(Debug, Clone)]
pub struct ComparisonColumns {
    pub label_a: String,
    pub layout_a: HitLayout,
    pub label_b: String,
    pub layout_b: HitLayout,
}

impl ComparisonColumns {
    fn side_columns(layout: HitLayout) -> impl Iterator<Item = Column> {
        layout
            .columns()
            .iter()
            .copied()
            .filter(|c| *c != Column::QuerySeqId)
    }

    pub fn header(&self) -> Vec<String> {
        let mut header = vec![Column::QuerySeqId.name().to_string()];
        for (label, layout) in [
            (&self.label_a, self.layout_a),
            (&self.label_b, self.layout_b),
        ] {
            header.extend(Self::side_columns(layout).map(|c| side_column_name(c, label)));
            header.push(genome_column_name(label));
        }
        header.push("predominance".to_string());
        header.push("differential_score".to_string());
        header
    }

    /// Absent sides render as empty cells, never as zero
    fn side_cells(layout: HitLayout, hit: Option<&HitRecord>, row: &mut Vec<String>) {
        for column in Self::side_columns(layout) {
            row.push(hit.and_then(|h| column.format(h)).unwrap_or_default());
        }
        row.push(hit.map(|h| h.population_tag.clone()).unwrap_or_default());
    }

    pub fn row(&self, record: &ComparisonRecord) -> Vec<String> {
        let mut row = vec![record.query_id.clone()];
        Self::side_cells(self.layout_a, record.a(), &mut row);
        Self::side_cells(self.layout_b, record.b(), &mut row);
        row.push(
            record
                .predominance
                .label(&self.label_a, &self.label_b)
                .to_string(),
        );
        row.push(format_float(record.differential_score));
        row
    }
}

fn stage_table(
    file_path: &Path,
    columns: &ComparisonColumns,
    records: &[ComparisonRecord],
    provenance: Option<&str>,
) -> Result<StagedFile> {
    let mut staged = StagedFile::new(file_path)?;
    if let Some(command_line) = provenance {
        write_provenance(staged.file(), command_line, file_path)?;
    }

    let mut writer = table_writer(staged.file());
    let table_err = |e| HgtError::table(file_path, e);
    writer.write_record(columns.header()).map_err(table_err)?;
    for record in records {
        writer.write_record(columns.row(record)).map_err(table_err)?;
    }
    writer.flush().map_err(|e| HgtError::io(file_path, e))?;
    drop(writer);

    Ok(staged)
}

/// Write the full comparison and the candidate subset. Both files are completely
/// written before either replaces its destination.
pub fn write_comparison_outputs(
    full_path: &Path,
    candidates_path: &Path,
    columns: &ComparisonColumns,
    full: &[ComparisonRecord],
    candidates: &[ComparisonRecord],
    provenance: Option<&str>,
) -> Result<(PathBuf, PathBuf)> {
    let staged_full = stage_table(full_path, columns, full, provenance)?;
    let staged_candidates = stage_table(candidates_path, columns, candidates, provenance)?;

    let full_written = staged_full.commit()?;
    let candidates_written = staged_candidates.commit()?;

    log::info!(
        "✅ Comparison of {} queries written to: {}",
        full.len(),
        full_written.display()
    );
    if candidates.is_empty() {
        log::warn!(
            "⚠️  No query passed the differential score threshold; {} contains only a header",
            candidates_written.display()
        );
    } else {
        log::info!(
            "✅ {} candidates written to: {}",
            candidates.len(),
            candidates_written.display()
        );
    }
    Ok((full_written, candidates_written))
}
