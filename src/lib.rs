//! # Table Cleaner
//!
//! Load CSV/TSV/text and Excel/ODS files into columnar tables, clean them
//! (select, sort, filter, slice, pivot), combine several files, and export
//! the result as CSV and/or xlsx.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use table_cleaner::{load_table, CleanRecipe, CleaningPipeline, ReadOptions, SortKey};
//!
//! let loaded = load_table("sales.csv", &ReadOptions::default()).unwrap();
//!
//! let recipe = CleanRecipe {
//!     select: vec!["region".into(), "revenue".into()],
//!     sort: vec![SortKey::desc("revenue")],
//!     ..CleanRecipe::default()
//! };
//! let outcome = CleaningPipeline::new(recipe.clone()).run(loaded).unwrap();
//! println!("{}", outcome.summary());
//!
//! let written = table_cleaner::export_table(&outcome.table, "sales.csv", &recipe.export).unwrap();
//! println!("wrote {:?}", written);
//! ```
//!
//! ## Features
//!
//! - **Format detection**: delimiter sniffing, header row and skip-rows control
//! - **Typed columns**: integer/float/bool/text inference on Arrow arrays
//! - **Combining**: row-wise concatenation and multi-key joins
//! - **Export**: UTF-8 BOM CSV and single-sheet xlsx

// Internal modules
pub mod combine;
pub mod config;
pub mod error;
pub mod export;
pub mod ingestion;
pub mod pipeline;
pub mod result_format;
pub mod table;
pub mod transform;

// Public API - Main types users need
pub use combine::{concat_tables, merge_tables};
pub use config::{
    AggFunc, CleanRecipe, ConcatOptions, Delimiter, ExportFormat, ExportOptions, JoinType,
    KeyCase, MergeSpec, PivotSpec, ReadOptions, RowFilter, RowRange, SortKey, TextFilter,
};
pub use export::{export_table, output_file_name, to_csv_bytes, to_excel_bytes};
pub use ingestion::{load_bytes, load_table, sheet_names, FileFormat, LoadedTable};
pub use pipeline::{CleaningOutcome, CleaningPipeline, StepReport};
pub use result_format::{format_results, render_text, FormattedResult, ResultFormat};
pub use table::{Scalar, Table};

// Re-export commonly used error types
pub use error::{CleanerError, CleanerResult};
