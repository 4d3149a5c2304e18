// lib.rs - hgtscan library root

//! # hgtscan - Best-hit comparison pipeline for horizontal gene transfer candidates
//!
//! Query sequences are aligned against two populations (typically fungal and
//! plant genomes). For each population the best hit per query is kept; the two
//! best-hit tables are joined per query and every query gets a predominance
//! label and a differential score `bitscore_A - bitscore_B`. Queries whose score
//! exceeds a threshold are the transfer candidates.
//!
//! ## Stages
//!
//! - **filter**: raw aligner results to one tagged hit table
//! - **select**: subject sequences hit by a tagged table
//! - **compare**: best-hit reduction, reconciliation and candidate selection
//! - **extract**: candidate regions cut from the population A genome
//! - **housekeeping**: removal of candidates annotated as housekeeping genes
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use hgtscan::prelude::*;
//! use std::path::Path;
//!
//! let schema_a = TableSchema::tagged(HitLayout::Full, "fungi_genome");
//! let schema_b = TableSchema::tagged(HitLayout::Reduced, "plant_genome");
//!
//! let fungi = load_hits(Path::new("fungi_hits.tsv"), &schema_a, "fungi", RowPolicy::Skip)?;
//! let plant = load_hits(Path::new("plant_hits.tsv"), &schema_b, "plant", RowPolicy::Skip)?;
//!
//! let table_a = reduce(fungi.records, "fungi");
//! let table_b = reduce(plant.records, "plant");
//! let (full, candidates) = reconcile_and_select(&table_a, &table_b, 0.0);
//! println!("{} queries, {} candidates", full.len(), candidates.len());
//! # Ok::<(), hgtscan::error::HgtError>(())
//! ```

pub mod cli;
pub mod core;
pub mod data;
pub mod error;
pub mod output;
pub mod pipeline;

// Convenience prelude for common imports
pub mod prelude {
    pub use crate::cli::{validate_args, Args, ValidationResult};
    pub use crate::core::{reconcile, reconcile_and_select, reduce, select_candidates};
    pub use crate::core::{BestHitTable, ComparisonRecord, ComparisonSummary, Predominance};
    pub use crate::data::loaders::load_hits;
    pub use crate::data::{HitLayout, HitRecord, RowPolicy, TableSchema};
    pub use crate::error::{HgtError, Result};
    pub use crate::output::{write_comparison_outputs, ComparisonColumns};
}

// Re-export main types at the root level for convenience
pub use crate::cli::{Args, ValidationResult};
pub use crate::core::{BestHitTable, ComparisonRecord, Predominance};
pub use crate::data::{HitRecord, RowPolicy, TableSchema};
pub use crate::error::HgtError;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library information
pub fn get_info() -> String {
    format!(
        "hgtscan v{} - Best-hit comparison for horizontal gene transfer candidates",
        VERSION
    )
}
