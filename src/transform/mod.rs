//! Cleaning operations on a single table
//!
//! Each operation is an inherent method on `Table` returning a new table:
//! `select`, `sort_by`, `filter_range` / `filter_text`, `slice_rows` and `pivot`.

pub mod filter;
pub mod pivot;
pub mod select;
pub mod slice;
pub mod sort;

pub use pivot::aggregate;
