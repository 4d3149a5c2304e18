// fai.rs - Scaffold lengths from samtools-style .fai files

use crate::error::{HgtError, Result};
use crate::data::loaders::tsv::table_reader;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Sequence name -> length, taken from the first two columns of a .fai file
pub type ScaffoldLengths = HashMap<String, u64>;

/// `<dir>/<genome>.fasta.fai`, falling back to `<dir>/<genome>.fai`
pub fn locate_index(fai_dir: &Path, genome: &str) -> Option<PathBuf> {
    [format!("{}.fasta.fai", genome), format!("{}.fai", genome)]
        .into_iter()
        .map(|name| fai_dir.join(name))
        .find(|path| path.is_file())
}

pub fn load_scaffold_lengths(path: &Path) -> Result<ScaffoldLengths> {
    let mut reader = table_reader(path, false)?;
    let mut lengths = HashMap::new();

    for record in reader.records() {
        let record = record.map_err(|e| HgtError::table(path, e))?;
        if record.len() < 2 {
            continue;
        }
        match record[1].trim().parse::<u64>() {
            Ok(length) => {
                lengths.insert(record[0].trim().to_string(), length);
            }
            Err(_) => log::debug!(
                "Ignoring unparsable length '{}' in '{}'",
                &record[1],
                path.display()
            ),
        }
    }

    Ok(lengths)
}

/// Lengths for one genome. A missing index yields an empty map and a warning.
pub fn scaffold_lengths_for(fai_dir: &Path, genome: &str) -> Result<ScaffoldLengths> {
    match locate_index(fai_dir, genome) {
        Some(path) => load_scaffold_lengths(&path),
        None => {
            log::warn!(
                "⚠️  No .fai index for genome '{}' in '{}'; its hits cannot pass the scaffold filter",
                genome,
                fai_dir.display()
            );
            Ok(ScaffoldLengths::new())
        }
    }
}
