// annotation.rs - eggNOG-mapper annotation tables

use crate::data::loaders::table_reader;
use crate::error::{HgtError, Result};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Known emapper output layouts, identified by the name of their query column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmapperLayout {
    /// emapper 1.x: `#query_name ... Preferred_name ... eggNOG free text desc.`
    V1,
    /// emapper 2.x: `#query ... Description ... Preferred_name`
    V2,
}

impl EmapperLayout {
    pub fn id_column(&self) -> &'static str {
        match self {
            EmapperLayout::V1 => "query_name",
            EmapperLayout::V2 => "query",
        }
    }

    pub fn name_column(&self) -> &'static str {
        "Preferred_name"
    }

    pub fn description_column(&self) -> &'static str {
        match self {
            EmapperLayout::V1 => "eggNOG free text desc.",
            EmapperLayout::V2 => "Description",
        }
    }

    fn detect(first_column: &str) -> Option<Self> {
        match first_column {
            "query_name" => Some(EmapperLayout::V1),
            "query" => Some(EmapperLayout::V2),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub query_id: String,
    pub preferred_name: String,
    pub description: String,
}

impl Annotation {
    /// Text scanned for housekeeping keywords
    pub fn searchable_text(&self) -> String {
        format!("{} {}", self.preferred_name, self.description)
    }
}

/// emapper writes `-` for empty annotation fields
fn cell(fields: &[&str], index: usize) -> String {
    match fields.get(index).map(|s| s.trim()) {
        Some("-") | None => String::new(),
        Some(value) => value.to_string(),
    }
}

/// Load an emapper `.annotations` file.
///
/// The header is the first line starting with `#query`; lines before it and
/// any later `#` lines are comments.
pub fn load_annotations(path: &Path) -> Result<(EmapperLayout, Vec<Annotation>)> {
    let file = File::open(path).map_err(|e| HgtError::io(path, e))?;
    let reader = BufReader::new(file);

    let mut columns: Option<(EmapperLayout, usize, usize, usize)> = None;
    let mut annotations = Vec::new();

    for line in reader.lines() {
        let line = line.map_err(|e| HgtError::io(path, e))?;

        let Some((_, id_idx, name_idx, desc_idx)) = columns else {
            if line.starts_with("#query") {
                let header: Vec<&str> = line.trim_start_matches('#').trim_end().split('\t').collect();
                let layout = EmapperLayout::detect(header[0]).ok_or_else(|| {
                    HgtError::MissingRequiredColumn {
                        path: path.to_path_buf(),
                        column: "query_name or query".to_string(),
                    }
                })?;
                let find = |name: &str| {
                    header.iter().position(|h| *h == name).ok_or_else(|| {
                        HgtError::MissingRequiredColumn {
                            path: path.to_path_buf(),
                            column: name.to_string(),
                        }
                    })
                };
                columns = Some((
                    layout,
                    find(layout.id_column())?,
                    find(layout.name_column())?,
                    find(layout.description_column())?,
                ));
            }
            continue;
        };

        if line.starts_with('#') || line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        let query_id = cell(&fields, id_idx);
        if query_id.is_empty() {
            continue;
        }
        annotations.push(Annotation {
            query_id,
            preferred_name: cell(&fields, name_idx),
            description: cell(&fields, desc_idx),
        });
    }

    let (layout, ..) = columns.ok_or_else(|| HgtError::MissingRequiredColumn {
        path: path.to_path_buf(),
        column: "#query header line".to_string(),
    })?;

    log::info!(
        "📋 Loaded {} annotations ({:?} layout) from '{}'",
        annotations.len(),
        layout,
        path.display()
    );
    Ok((layout, annotations))
}

/// Query ids from the first column of an emapper `.seed_orthologs` file
pub fn load_seed_ortholog_ids(path: &Path) -> Result<HashSet<String>> {
    let mut reader = table_reader(path, false)?;
    let mut ids = HashSet::new();
    for record in reader.records() {
        let record = record.map_err(|e| HgtError::table(path, e))?;
        if let Some(id) = record.get(0).map(str::trim).filter(|id| !id.is_empty()) {
            ids.insert(id.to_string());
        }
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_v1_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hgt.emapper.annotations");
        fs::write(
            &path,
            "# emapper version: emapper-1.0.3\n\
             #query_name\tseed_eggNOG_ortholog\tPreferred_name\tGOs\teggNOG free text desc.\n\
             c1\tx\tRPL5\t-\t60S ribosomal protein L5\n\
             c2\tx\t-\t-\tHypothetical protein\n\
             ## 2 queries scanned\n",
        )
        .unwrap();

        let (layout, annotations) = load_annotations(&path).unwrap();
        assert_eq!(layout, EmapperLayout::V1);
        assert_eq!(annotations.len(), 2);
        assert_eq!(annotations[0].preferred_name, "RPL5");
        assert_eq!(annotations[1].preferred_name, "");
        assert!(annotations[0].searchable_text().contains("ribosomal"));
    }

    #[test]
    fn test_v2_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hgt.emapper.annotations");
        fs::write(
            &path,
            "## emapper-2.1.12\n\
             #query\tseed_ortholog\tevalue\tDescription\tPreferred_name\n\
             c9\tx\t1e-20\tActin-related protein\tARP1\n",
        )
        .unwrap();

        let (layout, annotations) = load_annotations(&path).unwrap();
        assert_eq!(layout, EmapperLayout::V2);
        assert_eq!(annotations[0].query_id, "c9");
        assert_eq!(annotations[0].description, "Actin-related protein");
    }

    #[test]
    fn test_missing_header_or_column() {
        let dir = tempfile::tempdir().unwrap();
        let no_header = dir.path().join("a.annotations");
        fs::write(&no_header, "c1\tx\tRPL5\n").unwrap();
        assert!(matches!(
            load_annotations(&no_header).unwrap_err(),
            HgtError::MissingRequiredColumn { .. }
        ));

        let no_desc = dir.path().join("b.annotations");
        fs::write(&no_desc, "#query\tPreferred_name\nc1\tRPL5\n").unwrap();
        match load_annotations(&no_desc).unwrap_err() {
            HgtError::MissingRequiredColumn { column, .. } => assert_eq!(column, "Description"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_seed_orthologs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hgt.emapper.seed_orthologs");
        fs::write(&path, "#qseqid\tsseqid\nc1\tx\t1e-10\nc3\ty\t1e-5\n").unwrap();

        let ids = load_seed_ortholog_ids(&path).unwrap();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains("c1") && ids.contains("c3"));
    }
}
