// sequences.rs - FASTA input helpers

use crate::error::{HgtError, Result};
use bio::io::fasta;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

const FASTA_EXTENSIONS: [&str; 4] = ["fasta", "fa", "fas", "fna"];

/// FASTA files directly inside `dir`, sorted by name. Extensions match in any case.
pub fn list_fasta_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| HgtError::io(dir, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| HgtError::io(dir, e))?.path();
        let is_fasta = path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| FASTA_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)));
        if is_fasta && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Stream the records of a FASTA file through `visit`
pub fn for_each_record<F>(path: &Path, mut visit: F) -> Result<()>
where
    F: FnMut(fasta::Record) -> Result<()>,
{
    let file = File::open(path).map_err(|e| HgtError::io(path, e))?;
    let reader = fasta::Reader::new(BufReader::new(file));
    for record in reader.records() {
        let record = record.map_err(|e| HgtError::Fasta {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        visit(record)?;
    }
    Ok(())
}

/// Sequence id -> sequence for a whole FASTA file
pub fn load_sequence_map(path: &Path) -> Result<HashMap<String, Vec<u8>>> {
    let mut sequences = HashMap::new();
    for_each_record(path, |record| {
        sequences.insert(record.id().to_string(), record.seq().to_vec());
        Ok(())
    })?;
    log::info!(
        "🧬 Loaded {} sequences from {}",
        sequences.len(),
        path.display()
    );
    Ok(sequences)
}
