// mod.rs - Data structures module

pub mod annotation;
pub mod hit;
pub mod loaders;
pub mod schema;
pub mod sequences;

// Re-export main types for convenience
pub use annotation::{Annotation, EmapperLayout};
pub use hit::{AlignmentDetail, HitRecord, RowPolicy};
pub use schema::{Column, HitLayout, TableSchema};
