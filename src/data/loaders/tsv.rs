// tsv.rs - Tab-separated loaders for alignment hit tables

use crate::data::hit::{HitRecord, RowPolicy};
use crate::data::schema::{ColumnIndex, TableSchema};
use crate::error::{HgtError, Result};
use csv::{Reader, ReaderBuilder, StringRecord};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Hits accepted from one table, plus the number of rows the row policy dropped
#[derive(Debug, Default)]
pub struct LoadedHits {
    pub records: Vec<HitRecord>,
    pub rejected: usize,
}

/// Tab-separated reader shared by all loaders. `#` lines are comments.
pub fn table_reader(path: &Path, has_headers: bool) -> Result<Reader<File>> {
    let file = File::open(path).map_err(|e| HgtError::io(path, e))?;
    Ok(ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(has_headers)
        .comment(Some(b'#'))
        .flexible(true)
        .quoting(false)
        .from_reader(file))
}

/// A hit table whose columns are resolved but whose rows are not read yet
pub struct HitTableReader {
    path: PathBuf,
    /// `None` for a headered table with an empty header: nothing to read
    inner: Option<(Reader<File>, ColumnIndex)>,
}

impl HitTableReader {
    /// Open a table and resolve every required column of `schema`.
    /// A missing column fails here, before any row is read.
    pub fn open(path: &Path, schema: &TableSchema) -> Result<Self> {
        let mut reader = table_reader(path, schema.has_header())?;

        let index = if schema.has_header() {
            let header = reader
                .headers()
                .map_err(|e| HgtError::table(path, e))?
                .clone();
            if header.is_empty() {
                log::warn!("⚠️  Table '{}' is empty", path.display());
                return Ok(Self {
                    path: path.to_path_buf(),
                    inner: None,
                });
            }
            schema.resolve(&header, path)?
        } else {
            schema.positional()
        };

        Ok(Self {
            path: path.to_path_buf(),
            inner: Some((reader, index)),
        })
    }

    /// Read every row. Rows failing validation go through `policy`.
    /// `default_tag` becomes the provenance of each hit when the schema has no
    /// genome column.
    pub fn read_all(self, default_tag: &str, policy: RowPolicy) -> Result<LoadedHits> {
        let path = self.path.as_path();
        let mut loaded = LoadedHits::default();
        let Some((mut reader, index)) = self.inner else {
            return Ok(loaded);
        };

        let mut row = StringRecord::new();
        while reader
            .read_record(&mut row)
            .map_err(|e| HgtError::table(path, e))?
        {
            if row.len() == 1 && row[0].trim().is_empty() {
                continue;
            }

            match index.parse_row(&row, default_tag) {
                Ok(hit) => loaded.records.push(hit),
                Err(reason) => {
                    let line = row.position().map_or(0, |p| p.line());
                    if policy.reject(path, line, reason)? {
                        loaded.rejected += 1;
                    }
                }
            }
        }

        if loaded.rejected > 0 {
            log::warn!(
                "⚠️  Dropped {} malformed rows from '{}'",
                loaded.rejected,
                path.display()
            );
        }
        log::debug!(
            "Loaded {} hits from '{}'",
            loaded.records.len(),
            path.display()
        );
        Ok(loaded)
    }
}

/// Load a hit table according to its declared schema
pub fn load_hits(
    path: &Path,
    schema: &TableSchema,
    default_tag: &str,
    policy: RowPolicy,
) -> Result<LoadedHits> {
    HitTableReader::open(path, schema)?.read_all(default_tag, policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::HitLayout;
    use std::fs;

    #[test]
    fn test_load_tagged_table_with_comments() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plant.tsv");
        fs::write(
            &path,
            "# Command: hgtscan filter\n\
             qseqid\tsseqid\tpident\tlength\tevalue\tbitscore\tplant_genome\n\
             q1\tAT1\t90.5\t300\t1e-40\t40\tAth\n\
             q3\tAT2\t88\t700\t0\t60\tOsa\n",
        )
        .unwrap();

        let schema = TableSchema::tagged(HitLayout::Reduced, "plant_genome");
        let loaded = load_hits(&path, &schema, "unused", RowPolicy::Skip).unwrap();

        assert_eq!(loaded.records.len(), 2);
        assert_eq!(loaded.rejected, 0);
        assert_eq!(loaded.records[1].query_id, "q3");
        assert_eq!(loaded.records[1].population_tag, "Osa");
    }

    #[test]
    fn test_skip_policy_counts_bad_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw.blast");
        fs::write(
            &path,
            "q1\tt1\t99\t600\t0\t1100\n\
             q2\tt1\t99\t600\t0\tnot-a-score\n\
             q3\tt1\t99\n\
             \tt1\t99\t600\t0\t30\n",
        )
        .unwrap();

        let schema = TableSchema::raw(HitLayout::Reduced);
        let loaded = load_hits(&path, &schema, "Fg1", RowPolicy::Skip).unwrap();

        assert_eq!(loaded.records.len(), 1);
        assert_eq!(loaded.rejected, 3);
        assert_eq!(loaded.records[0].population_tag, "Fg1");
    }

    #[test]
    fn test_strict_policy_reports_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw.blast");
        fs::write(&path, "q1\tt1\t99\t600\t0\t1100\nq2\tt1\t99\t600\t0\tx\n").unwrap();

        let schema = TableSchema::raw(HitLayout::Reduced);
        let err = load_hits(&path, &schema, "Fg1", RowPolicy::Strict).unwrap_err();
        assert!(matches!(err, HgtError::MalformedInput { line: 2, .. }));
    }

    #[test]
    fn test_infinite_scores_are_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw.blast");
        fs::write(
            &path,
            "q1\tt1\t99\t600\t0\tinf\n\
             q2\tt1\t99\t600\t0\t-inf\n\
             q3\tt1\tinf\t600\t0\t10\n\
             q4\tt1\t99\t600\t0\t10\n",
        )
        .unwrap();

        let schema = TableSchema::raw(HitLayout::Reduced);
        let loaded = load_hits(&path, &schema, "Fg1", RowPolicy::Skip).unwrap();
        assert_eq!(loaded.rejected, 3);
        assert_eq!(loaded.records.len(), 1);
        assert_eq!(loaded.records[0].query_id, "q4");

        let err = load_hits(&path, &schema, "Fg1", RowPolicy::Strict).unwrap_err();
        assert!(matches!(err, HgtError::MalformedInput { line: 1, .. }));
    }

    #[test]
    fn test_open_resolves_header_before_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plant.tsv");
        fs::write(&path, "qseqid\tsseqid\tbitscore\nq1\tt1\tnot-a-number\n").unwrap();

        let schema = TableSchema::tagged(HitLayout::Reduced, "plant_genome");
        assert!(matches!(
            HitTableReader::open(&path, &schema),
            Err(HgtError::MissingRequiredColumn { .. })
        ));
    }

    #[test]
    fn test_missing_column_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fungi.tsv");
        fs::write(&path, "qseqid\tsseqid\tbitscore\nq1\tt1\t10\n").unwrap();

        let schema = TableSchema::tagged(HitLayout::Full, "fungi_genome");
        let err = load_hits(&path, &schema, "", RowPolicy::Skip).unwrap_err();
        assert!(matches!(err, HgtError::MissingRequiredColumn { .. }));
    }

    #[test]
    fn test_empty_inputs_are_not_errors() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("empty.tsv");
        fs::write(&empty, "").unwrap();
        let header_only = dir.path().join("header.tsv");
        fs::write(
            &header_only,
            "qseqid\tsseqid\tpident\tlength\tevalue\tbitscore\tplant_genome\n",
        )
        .unwrap();

        let schema = TableSchema::tagged(HitLayout::Reduced, "plant_genome");
        assert!(load_hits(&empty, &schema, "", RowPolicy::Strict)
            .unwrap()
            .records
            .is_empty());
        assert!(load_hits(&header_only, &schema, "", RowPolicy::Strict)
            .unwrap()
            .records
            .is_empty());
    }

    #[test]
    fn test_unreadable_file() {
        let schema = TableSchema::raw(HitLayout::Full);
        let err = load_hits(
            Path::new("/nonexistent/hits.blast"),
            &schema,
            "",
            RowPolicy::Skip,
        )
        .unwrap_err();
        assert!(matches!(err, HgtError::Io { .. }));
    }
}
