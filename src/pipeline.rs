// Reshape-and-filter pipeline
//
// Wide sheet -> renamed month/breed columns -> long records -> comparison
// table for a user selection. Every step is pure; the loaded sheet is never
// mutated after startup.

pub mod columns;
pub mod pivot;
pub mod reshape;

pub use columns::{map_column_pairs, ColumnMapping, LoadWarning};
pub use pivot::{pivot, SelectionError, MIN_INDICATORS};
pub use reshape::{reshape, split_column_name};
