// extract.rs - Candidate region extraction from the genome of interest

use crate::data::loaders::table_reader;
use crate::data::schema::{parse_count, require_column, side_column_name};
use crate::data::{Column, RowPolicy};
use crate::error::{HgtError, Result};
use bio::io::fasta;
use csv::StringRecord;
use std::collections::HashMap;
use std::path::Path;

/// A 1-based, inclusive region with `start <= end`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub chrom: String,
    pub start: u64,
    pub end: u64,
}

impl Region {
    pub fn new(chrom: impl Into<String>, start: u64, end: u64) -> Self {
        let (start, end) = if start > end { (end, start) } else { (start, end) };
        Self {
            chrom: chrom.into(),
            start: start.max(1),
            end: end.max(1),
        }
    }

    /// FASTA id of the extracted region, `chrom:start-end`
    pub fn id(&self) -> String {
        format!("{}:{}-{}", self.chrom, self.start, self.end)
    }
}

/// Target regions of population A's best hits, read from a comparison or candidate table.
/// Rows without a population A hit are skipped.
pub fn load_candidate_regions(path: &Path, label_a: &str, policy: RowPolicy) -> Result<Vec<Region>> {
    let mut reader = table_reader(path, true)?;
    let header = reader
        .headers()
        .map_err(|e| HgtError::table(path, e))?
        .clone();
    if header.is_empty() {
        log::warn!("⚠️  Candidate table '{}' is empty", path.display());
        return Ok(Vec::new());
    }

    let chrom_idx = require_column(&header, &side_column_name(Column::SubjectSeqId, label_a), path)?;
    let start_idx = require_column(&header, &side_column_name(Column::SubjectStart, label_a), path)?;
    let end_idx = require_column(&header, &side_column_name(Column::SubjectEnd, label_a), path)?;

    let mut regions = Vec::new();
    let mut row = StringRecord::new();
    while reader
        .read_record(&mut row)
        .map_err(|e| HgtError::table(path, e))?
    {
        let chrom = row.get(chrom_idx).map(str::trim).unwrap_or_default();
        if chrom.is_empty() {
            continue;
        }
        let coords = row
            .get(start_idx)
            .and_then(|s| parse_count(s.trim()))
            .zip(row.get(end_idx).and_then(|s| parse_count(s.trim())));
        match coords {
            Some((start, end)) => regions.push(Region::new(chrom, start, end)),
            None => {
                let line = row.position().map_or(0, |p| p.line());
                policy.reject(path, line, format!("invalid coordinates for '{}'", chrom))?;
            }
        }
    }
    Ok(regions)
}

/// Cut each region out of `genome`. Unknown chromosomes and regions starting past the
/// sequence end are skipped with a warning; ends past the sequence end are clamped.
pub fn extract_regions(regions: &[Region], genome: &HashMap<String, Vec<u8>>) -> Vec<fasta::Record> {
    let mut extracted = Vec::with_capacity(regions.len());

    for region in regions {
        let Some(sequence) = genome.get(&region.chrom) else {
            log::warn!(
                "⚠️  Chromosome/scaffold {} not found in genome FASTA",
                region.chrom
            );
            continue;
        };

        let length = sequence.len() as u64;
        if region.start > length {
            log::warn!(
                "⚠️  Region {} starts beyond the end of {} ({} bp)",
                region.id(),
                region.chrom,
                length
            );
            continue;
        }
        let clamped = if region.end > length {
            log::warn!(
                "⚠️  Region {} clamped to the end of {} ({} bp)",
                region.id(),
                region.chrom,
                length
            );
            Region::new(region.chrom.as_str(), region.start, length)
        } else {
            region.clone()
        };

        let slice = &sequence[(clamped.start - 1) as usize..clamped.end as usize];
        extracted.push(fasta::Record::with_attrs(&clamped.id(), None, slice));
    }

    extracted
}
