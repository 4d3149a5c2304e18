// mod.rs - Table loaders

pub mod fai;
pub mod tsv;

pub use fai::{load_scaffold_lengths, scaffold_lengths_for, ScaffoldLengths};
pub use tsv::{load_hits, table_reader, HitTableReader, LoadedHits};
