// mod.rs - Core pipeline stages

pub mod extract;
pub mod filter;
pub mod housekeeping;
pub mod reconcile;
pub mod reducer;
pub mod select;
pub mod subjects;

// Re-export main types for convenience
pub use extract::{extract_regions, load_candidate_regions, Region};
pub use filter::{filter_directory, FilterJob, FilterReport, HitFilter};
pub use housekeeping::{housekeeping_ids, remove_housekeeping, KeywordMatcher};
pub use reconcile::{reconcile, ComparisonRecord, Predominance, Presence};
pub use reducer::{reduce, BestHitTable};
pub use select::{reconcile_and_select, select_candidates, ComparisonSummary};
pub use subjects::{load_subject_ids, select_subjects};
