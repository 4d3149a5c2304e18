// mod.rs - Output writers
//
// Every output goes to a temporary file next to its destination and is renamed
// into place only once fully written.

pub mod comparison;

use crate::data::{HitRecord, TableSchema};
use crate::error::{HgtError, Result};
use bio::io::fasta;
use csv::{QuoteStyle, Writer, WriterBuilder};
use serde::Serialize;
use std::fs::{create_dir_all, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub use comparison::{write_comparison_outputs, ComparisonColumns};

/// Ensure parent directory exists before creating file
fn ensure_parent_dir(file_path: &Path) -> Result<PathBuf> {
    let parent = match file_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    create_dir_all(&parent).map_err(|e| HgtError::io(&parent, e))?;
    Ok(parent)
}

/// An output file being written to a temporary location
pub struct StagedFile {
    target: PathBuf,
    temp: NamedTempFile,
}

impl StagedFile {
    pub fn new(target: &Path) -> Result<Self> {
        let parent = ensure_parent_dir(target)?;
        let temp = NamedTempFile::new_in(&parent).map_err(|e| HgtError::io(&parent, e))?;
        Ok(Self {
            target: target.to_path_buf(),
            temp,
        })
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn file(&mut self) -> &mut File {
        self.temp.as_file_mut()
    }

    /// Move the finished file to its destination, replacing any previous version
    pub fn commit(self) -> Result<PathBuf> {
        let target = self.target;
        self.temp
            .as_file()
            .sync_all()
            .map_err(|e| HgtError::io(&target, e))?;
        self.temp
            .persist(&target)
            .map_err(|e| HgtError::io(&target, e.error))?;
        Ok(target)
    }
}

/// `# Command`, `# Generated` and version comment lines heading a table
pub fn write_provenance<W: Write>(writer: &mut W, command_line: &str, path: &Path) -> Result<()> {
    let io_err = |e| HgtError::io(path, e);
    writeln!(writer, "# Command: {}", command_line).map_err(io_err)?;
    writeln!(
        writer,
        "# Generated: {}",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    )
    .map_err(io_err)?;
    writeln!(writer, "# hgtscan v{}", env!("CARGO_PKG_VERSION")).map_err(io_err)?;
    Ok(())
}

/// Tab-separated writer matching what the loaders read
pub fn table_writer<W: Write>(writer: W) -> Writer<W> {
    WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(QuoteStyle::Never)
        .from_writer(writer)
}

/// Write a tagged hit table (layout columns plus the schema's genome column)
pub fn write_hit_table(
    file_path: &Path,
    schema: &TableSchema,
    hits: &[HitRecord],
    provenance: Option<&str>,
) -> Result<PathBuf> {
    let mut staged = StagedFile::new(file_path)?;
    if let Some(command_line) = provenance {
        write_provenance(staged.file(), command_line, file_path)?;
    }

    {
        let mut writer = table_writer(staged.file());
        let table_err = |e| HgtError::table(file_path, e);
        writer.write_record(schema.header()).map_err(table_err)?;
        for hit in hits {
            let mut row: Vec<String> = schema
                .layout
                .columns()
                .iter()
                .map(|c| c.format(hit).unwrap_or_default())
                .collect();
            if schema.genome_column.is_some() {
                row.push(hit.population_tag.clone());
            }
            writer.write_record(&row).map_err(table_err)?;
        }
        writer
            .flush()
            .map_err(|e| HgtError::io(file_path, e))?;
    }

    let path = staged.commit()?;
    log::info!("✅ {} hits written to: {}", hits.len(), path.display());
    Ok(path)
}

/// Write a pretty-printed JSON document
pub fn write_json<T: Serialize>(file_path: &Path, value: &T) -> Result<PathBuf> {
    let mut staged = StagedFile::new(file_path)?;
    serde_json::to_writer_pretty(&mut *staged.file(), value)?;
    writeln!(staged.file()).map_err(|e| HgtError::io(file_path, e))?;
    staged.commit()
}

/// Write FASTA records, one sequence line per record
pub fn write_fasta<I>(file_path: &Path, records: I) -> Result<(PathBuf, usize)>
where
    I: IntoIterator<Item = fasta::Record>,
{
    let mut staged = StagedFile::new(file_path)?;
    let mut count = 0;
    {
        let mut writer = fasta::Writer::new(staged.file());
        for record in records {
            writer
                .write_record(&record)
                .map_err(|e| HgtError::io(file_path, e))?;
            count += 1;
        }
        writer.flush().map_err(|e| HgtError::io(file_path, e))?;
    }
    Ok((staged.commit()?, count))
}
