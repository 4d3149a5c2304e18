// subjects.rs - Selection of subject sequences hit by a filtered table

use crate::data::loaders::table_reader;
use crate::data::schema::require_column;
use crate::data::sequences::{for_each_record, list_fasta_files};
use crate::data::Column;
use crate::error::{HgtError, Result};
use crate::output::write_fasta;
use csv::StringRecord;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Distinct `sseqid` values of a headered hit table
pub fn load_subject_ids(path: &Path) -> Result<HashSet<String>> {
    let mut reader = table_reader(path, true)?;
    let header = reader
        .headers()
        .map_err(|e| HgtError::table(path, e))?
        .clone();
    if header.is_empty() {
        log::warn!("⚠️  Hit table '{}' is empty", path.display());
        return Ok(HashSet::new());
    }
    let column = require_column(&header, Column::SubjectSeqId.name(), path)?;

    let mut ids = HashSet::new();
    let mut row = StringRecord::new();
    while reader
        .read_record(&mut row)
        .map_err(|e| HgtError::table(path, e))?
    {
        if let Some(id) = row.get(column).map(str::trim).filter(|s| !s.is_empty()) {
            ids.insert(id.to_string());
        }
    }
    Ok(ids)
}

/// One FASTA written by the selection stage
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    pub source: PathBuf,
    pub output: PathBuf,
    pub records: usize,
}

/// Output name for a source FASTA: `selected_<stem>.fasta`
pub fn selected_file_name(source: &Path) -> String {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("selected_{}.fasta", stem)
}

/// Copy the records of every FASTA in `fasta_dir` whose id is in `ids` into
/// `output_dir`. Every source gets an output file, possibly empty.
pub fn select_subjects(
    ids: &HashSet<String>,
    fasta_dir: &Path,
    output_dir: &Path,
) -> Result<Vec<SelectedFile>> {
    let sources = list_fasta_files(fasta_dir)?;
    if sources.is_empty() {
        log::warn!("⚠️  No FASTA files found in {}", fasta_dir.display());
    }

    let mut selected = Vec::with_capacity(sources.len());
    for source in sources {
        let mut records = Vec::new();
        for_each_record(&source, |record| {
            if ids.contains(record.id()) {
                records.push(record);
            }
            Ok(())
        })?;

        let target = output_dir.join(selected_file_name(&source));
        let (output, count) = write_fasta(&target, records)?;
        log::info!(
            "🧬 {} sequences selected from {}",
            count,
            source.display()
        );
        selected.push(SelectedFile {
            source,
            output,
            records: count,
        });
    }
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_selected_file_name() {
        assert_eq!(selected_file_name(Path::new("/g/Fg1.fna")), "selected_Fg1.fasta");
    }

    #[test]
    fn test_select_subjects() {
        let dir = tempfile::tempdir().unwrap();
        let table = dir.path().join("filtered.tsv");
        fs::write(
            &table,
            "qseqid\tsseqid\tpident\tlength\tevalue\tbitscore\tfungi_genome\n\
             scafA\tchr1\t95\t800\t0\t1400\tFg1\n\
             scafB\tchr3\t91\t700\t0\t1100\tFg2\n",
        )
        .unwrap();

        let genomes = dir.path().join("genomes");
        fs::create_dir_all(&genomes).unwrap();
        fs::write(genomes.join("Fg1.fasta"), ">chr1 main\nACGT\n>chr2\nTTTT\n").unwrap();
        fs::write(genomes.join("Fg2.fa"), ">chr9\nGGGG\n").unwrap();

        let ids = load_subject_ids(&table).unwrap();
        assert_eq!(ids.len(), 2);

        let out = dir.path().join("selected");
        let selected = select_subjects(&ids, &genomes, &out).unwrap();
        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].records, 1);
        assert_eq!(selected[1].records, 0);

        let text = fs::read_to_string(out.join("selected_Fg1.fasta")).unwrap();
        assert!(text.starts_with(">chr1 main\n"));
        assert!(!text.contains("chr2"));
        assert!(out.join("selected_Fg2.fasta").exists());
    }

    #[test]
    fn test_missing_sseqid_column() {
        let dir = tempfile::tempdir().unwrap();
        let table = dir.path().join("bad.tsv");
        fs::write(&table, "qseqid\tbitscore\nq1\t10\n").unwrap();
        assert!(matches!(
            load_subject_ids(&table).unwrap_err(),
            HgtError::MissingRequiredColumn { .. }
        ));
    }
}
