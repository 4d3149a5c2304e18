// schema.rs - Explicit column contracts for alignment tables
//
// Every input source declares its columns up front. Headered tables are
// resolved by name once at load time; raw aligner output is positional.

use crate::data::hit::{AlignmentDetail, HitRecord};
use crate::error::{HgtError, Result};
use csv::StringRecord;
use std::path::Path;
use std::str::FromStr;

/// One BLAST outfmt 6 column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    QuerySeqId,
    SubjectSeqId,
    PercentIdentity,
    Length,
    Mismatch,
    GapOpen,
    QueryStart,
    QueryEnd,
    SubjectStart,
    SubjectEnd,
    EValue,
    BitScore,
}

const FULL_COLUMNS: [Column; 12] = [
    Column::QuerySeqId,
    Column::SubjectSeqId,
    Column::PercentIdentity,
    Column::Length,
    Column::Mismatch,
    Column::GapOpen,
    Column::QueryStart,
    Column::QueryEnd,
    Column::SubjectStart,
    Column::SubjectEnd,
    Column::EValue,
    Column::BitScore,
];

const REDUCED_COLUMNS: [Column; 6] = [
    Column::QuerySeqId,
    Column::SubjectSeqId,
    Column::PercentIdentity,
    Column::Length,
    Column::EValue,
    Column::BitScore,
];

impl Column {
    /// outfmt 6 specifier, also used as the header name
    pub fn name(&self) -> &'static str {
        match self {
            Column::QuerySeqId => "qseqid",
            Column::SubjectSeqId => "sseqid",
            Column::PercentIdentity => "pident",
            Column::Length => "length",
            Column::Mismatch => "mismatch",
            Column::GapOpen => "gapopen",
            Column::QueryStart => "qstart",
            Column::QueryEnd => "qend",
            Column::SubjectStart => "sstart",
            Column::SubjectEnd => "send",
            Column::EValue => "evalue",
            Column::BitScore => "bitscore",
        }
    }

    /// Render this column of a hit; `None` when the hit does not carry it
    pub fn format(&self, hit: &HitRecord) -> Option<String> {
        let detail = hit.detail.as_ref();
        let value = match self {
            Column::QuerySeqId => hit.query_id.clone(),
            Column::SubjectSeqId => hit.target_id.clone(),
            Column::PercentIdentity => format_float(hit.percent_identity),
            Column::Length => hit.alignment_length.to_string(),
            Column::Mismatch => detail?.mismatch_count.to_string(),
            Column::GapOpen => detail?.gap_open_count.to_string(),
            Column::QueryStart => detail?.query_start.to_string(),
            Column::QueryEnd => detail?.query_end.to_string(),
            Column::SubjectStart => detail?.target_start.to_string(),
            Column::SubjectEnd => detail?.target_end.to_string(),
            Column::EValue => format_float(hit.e_value),
            Column::BitScore => format_float(hit.bit_score),
        };
        Some(value)
    }
}

/// Shortest round-trip float text, scientific for very small or large magnitudes
pub fn format_float(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if magnitude < 1e-4 || magnitude >= 1e15 {
        format!("{:e}", value)
    } else {
        format!("{}", value)
    }
}

/// Provenance column of a population's tagged table, e.g. `fungi_genome`
pub fn genome_column_name(label: &str) -> String {
    format!("{}_genome", label)
}

/// Population-qualified column name in comparison tables, e.g. `bitscore_plant`
pub fn side_column_name(column: Column, label: &str) -> String {
    format!("{}_{}", column.name(), label)
}

/// Which outfmt 6 column set a table carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitLayout {
    /// Standard 12-column output, with coordinates
    Full,
    /// `qseqid sseqid pident length evalue bitscore`
    Reduced,
}

impl HitLayout {
    pub fn columns(&self) -> &'static [Column] {
        match self {
            HitLayout::Full => &FULL_COLUMNS,
            HitLayout::Reduced => &REDUCED_COLUMNS,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            HitLayout::Full => "full",
            HitLayout::Reduced => "reduced",
        }
    }
}

impl FromStr for HitLayout {
    type Err = HgtError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "full" | "12" => Ok(HitLayout::Full),
            "reduced" | "6" => Ok(HitLayout::Reduced),
            _ => Err(HgtError::InvalidArgument(format!(
                "Unknown table layout '{}'. Use: full, reduced",
                s
            ))),
        }
    }
}

/// Column contract of one input or output table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub layout: HitLayout,
    /// Provenance column of tagged tables (e.g. `fungi_genome`); raw tables have none
    pub genome_column: Option<String>,
}

impl TableSchema {
    /// Headerless aligner output
    pub fn raw(layout: HitLayout) -> Self {
        Self {
            layout,
            genome_column: None,
        }
    }

    /// Headered pipeline table with a provenance column
    pub fn tagged(layout: HitLayout, genome_column: impl Into<String>) -> Self {
        Self {
            layout,
            genome_column: Some(genome_column.into()),
        }
    }

    pub fn has_header(&self) -> bool {
        self.genome_column.is_some()
    }

    pub fn header(&self) -> Vec<String> {
        let mut header: Vec<String> = self
            .layout
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        if let Some(genome) = &self.genome_column {
            header.push(genome.clone());
        }
        header
    }

    /// Columns by position, for headerless tables
    pub fn positional(&self) -> ColumnIndex {
        let positions: Vec<(Column, usize)> = self
            .layout
            .columns()
            .iter()
            .enumerate()
            .map(|(i, &c)| (c, i))
            .collect();
        let genome = self.genome_column.as_ref().map(|_| positions.len());
        ColumnIndex::new(positions, genome)
    }

    /// Resolve every required column against a header row
    pub fn resolve(&self, header: &StringRecord, path: &Path) -> Result<ColumnIndex> {
        let find = |name: &str| require_column(header, name, path);

        let mut positions = Vec::with_capacity(self.layout.columns().len());
        for &column in self.layout.columns() {
            positions.push((column, find(column.name())?));
        }
        let genome = match &self.genome_column {
            Some(name) => Some(find(name)?),
            None => None,
        };
        Ok(ColumnIndex::new(positions, genome))
    }
}

/// Position of a named column in a header row
pub fn require_column(header: &StringRecord, name: &str, path: &Path) -> Result<usize> {
    header
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| HgtError::MissingRequiredColumn {
            path: path.to_path_buf(),
            column: name.to_string(),
        })
}

/// Resolved field positions of one table
#[derive(Debug, Clone)]
pub struct ColumnIndex {
    positions: Vec<(Column, usize)>,
    genome: Option<usize>,
    min_fields: usize,
}

impl ColumnIndex {
    fn new(positions: Vec<(Column, usize)>, genome: Option<usize>) -> Self {
        let min_fields = positions
            .iter()
            .map(|&(_, i)| i)
            .chain(genome)
            .max()
            .map_or(0, |i| i + 1);
        Self {
            positions,
            genome,
            min_fields,
        }
    }

    fn field<'r>(&self, record: &'r StringRecord, column: Column) -> Option<&'r str> {
        self.positions
            .iter()
            .find(|&&(c, _)| c == column)
            .and_then(|&(_, i)| record.get(i))
            .map(str::trim)
    }

    /// Build a hit from one row. `default_tag` is used when the table has no genome column.
    pub fn parse_row(
        &self,
        record: &StringRecord,
        default_tag: &str,
    ) -> std::result::Result<HitRecord, String> {
        if record.len() < self.min_fields {
            return Err(format!(
                "expected at least {} fields, found {}",
                self.min_fields,
                record.len()
            ));
        }

        let text = |column: Column| -> std::result::Result<&str, String> {
            self.field(record, column)
                .ok_or_else(|| format!("missing '{}'", column.name()))
        };
        let float = |column: Column| -> std::result::Result<f64, String> {
            let raw = text(column)?;
            raw.parse::<f64>()
                .map_err(|_| format!("non-numeric {} '{}'", column.name(), raw))
        };
        let count = |column: Column| -> std::result::Result<u64, String> {
            let raw = text(column)?;
            parse_count(raw).ok_or_else(|| format!("invalid {} '{}'", column.name(), raw))
        };

        let detail = match self.field(record, Column::Mismatch) {
            Some(_) => Some(AlignmentDetail {
                mismatch_count: count(Column::Mismatch)?,
                gap_open_count: count(Column::GapOpen)?,
                query_start: count(Column::QueryStart)?,
                query_end: count(Column::QueryEnd)?,
                target_start: count(Column::SubjectStart)?,
                target_end: count(Column::SubjectEnd)?,
            }),
            None => None,
        };

        let population_tag = match self.genome {
            Some(i) => record.get(i).map(str::trim).unwrap_or_default().to_string(),
            None => default_tag.to_string(),
        };

        let hit = HitRecord {
            query_id: text(Column::QuerySeqId)?.to_string(),
            target_id: text(Column::SubjectSeqId)?.to_string(),
            percent_identity: float(Column::PercentIdentity)?,
            alignment_length: count(Column::Length)?,
            e_value: float(Column::EValue)?,
            bit_score: float(Column::BitScore)?,
            population_tag,
            detail,
        };
        hit.validate()?;
        Ok(hit)
    }
}

/// Integers may arrive as `600.0` from dataframe-written tables
pub(crate) fn parse_count(raw: &str) -> Option<u64> {
    raw.parse::<u64>().ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|v| *v >= 0.0 && v.fract() == 0.0)
            .map(|v| v as u64)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fields: &[&str]) -> StringRecord {
        StringRecord::from(fields.to_vec())
    }

    #[test]
    fn test_layout_parsing() {
        assert_eq!(HitLayout::from_str("full").unwrap(), HitLayout::Full);
        assert_eq!(HitLayout::from_str("Reduced").unwrap(), HitLayout::Reduced);
        assert!(HitLayout::from_str("paf").is_err());
        assert_eq!(HitLayout::Full.columns().len(), 12);
        assert_eq!(HitLayout::Reduced.columns().len(), 6);
    }

    #[test]
    fn test_tagged_header() {
        let schema = TableSchema::tagged(HitLayout::Reduced, "plant_genome");
        assert_eq!(
            schema.header(),
            vec!["qseqid", "sseqid", "pident", "length", "evalue", "bitscore", "plant_genome"]
        );
        assert!(schema.has_header());
        assert!(!TableSchema::raw(HitLayout::Full).has_header());
    }

    #[test]
    fn test_positional_full_row() {
        let index = TableSchema::raw(HitLayout::Full).positional();
        let hit = index
            .parse_row(
                &record(&[
                    "scaf1", "chr2", "98.5", "620", "9", "0", "1", "620", "5000", "4381",
                    "1e-50", "1100",
                ]),
                "Fg1",
            )
            .unwrap();

        assert_eq!(hit.query_id, "scaf1");
        assert_eq!(hit.population_tag, "Fg1");
        assert_eq!(hit.bit_score, 1100.0);
        let detail = hit.detail.unwrap();
        assert_eq!(detail.target_span(), (4381, 5000));
        assert_eq!(detail.mismatch_count, 9);
    }

    #[test]
    fn test_resolve_by_name_in_any_order() {
        let schema = TableSchema::tagged(HitLayout::Reduced, "plant_genome");
        let header = record(&[
            "plant_genome", "bitscore", "evalue", "length", "pident", "sseqid", "qseqid", "extra",
        ]);
        let index = schema.resolve(&header, Path::new("plant.tsv")).unwrap();
        let hit = index
            .parse_row(
                &record(&["Ath", "250.5", "1e-30", "300", "91.2", "AT1G01010", "q7", "x"]),
                "unused",
            )
            .unwrap();

        assert_eq!(hit.query_id, "q7");
        assert_eq!(hit.target_id, "AT1G01010");
        assert_eq!(hit.population_tag, "Ath");
        assert_eq!(hit.bit_score, 250.5);
        assert!(hit.detail.is_none());
    }

    #[test]
    fn test_missing_column_is_reported() {
        let schema = TableSchema::tagged(HitLayout::Reduced, "plant_genome");
        let header = record(&["qseqid", "sseqid", "pident", "length", "evalue", "plant_genome"]);
        let err = schema.resolve(&header, Path::new("plant.tsv")).unwrap_err();
        match err {
            HgtError::MissingRequiredColumn { column, .. } => assert_eq!(column, "bitscore"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_malformed_rows() {
        let index = TableSchema::raw(HitLayout::Reduced).positional();
        assert!(index
            .parse_row(&record(&["q1", "t1", "99", "500", "0"]), "g")
            .is_err());
        assert!(index
            .parse_row(&record(&["q1", "t1", "99", "500", "0", "high"]), "g")
            .is_err());
        assert!(index
            .parse_row(&record(&["", "t1", "99", "500", "0", "10"]), "g")
            .is_err());
        assert!(index
            .parse_row(&record(&["q1", "t1", "99", "500", "0", "nan"]), "g")
            .is_err());
    }

    #[test]
    fn test_counts_accept_integral_floats() {
        assert_eq!(parse_count("600"), Some(600));
        assert_eq!(parse_count("600.0"), Some(600));
        assert_eq!(parse_count("600.5"), None);
        assert_eq!(parse_count("-1"), None);
    }

    #[test]
    fn test_column_naming() {
        assert_eq!(genome_column_name("fungi"), "fungi_genome");
        assert_eq!(side_column_name(Column::BitScore, "plant"), "bitscore_plant");
        assert_eq!(side_column_name(Column::SubjectEnd, "fungi"), "send_fungi");
    }

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(0.0), "0");
        assert_eq!(format_float(1e-50), "1e-50");
        assert_eq!(format_float(98.5), "98.5");
        assert_eq!(format_float(1100.0), "1100");
        assert_eq!(format_float(-60.0), "-60");
    }
}
