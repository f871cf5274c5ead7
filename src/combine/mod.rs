//! Combining several loaded files into one table
//!
//! `concat_tables` stacks rows over the union of columns; `merge_tables`
//! joins on key columns, folding the inputs left to right.

pub mod concat;
pub mod merge;

pub use concat::concat_tables;
pub use merge::merge_tables;

/// Base name used for combined output files
pub const COMBINED_NAME: &str = "combined";
