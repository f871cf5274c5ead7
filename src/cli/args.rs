//! CLI argument definitions using clap
//!
//! - table-cleaner inspect data.csv
//! - table-cleaner clean data.csv --select a,b --sort b:desc
//! - table-cleaner combine a.csv b.csv --mode merge --keys id

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use table_cleaner::{
    AggFunc, Delimiter, ExportFormat, ExportOptions, JoinType, KeyCase, ReadOptions, RowRange,
    SortKey,
};

#[derive(Parser)]
#[command(name = "table-cleaner")]
#[command(about = "Clean, combine and export CSV and Excel tables")]
#[command(version)]
pub struct Cli {
    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show shape, column types, null counts and a preview
    Inspect {
        file: PathBuf,

        #[command(flatten)]
        read: ReadArgs,

        /// Rows to preview
        #[arg(long, default_value_t = 10)]
        preview: usize,
    },

    /// Clean one file and export the result
    Clean(CleanArgs),

    /// Concatenate or merge several files
    Combine(CombineArgs),
}

/// Parsing flags shared by every command
#[derive(Args, Clone, Debug, Default)]
pub struct ReadArgs {
    /// Lines (or sheet rows) to drop before parsing
    #[arg(long)]
    pub skip_rows: Option<usize>,

    /// Header row, counted after skipped rows
    #[arg(long, conflicts_with = "no_header")]
    pub header_row: Option<usize>,

    /// Treat every row as data and number the columns
    #[arg(long)]
    pub no_header: bool,

    /// auto, comma, tab, semicolon, pipe, space or a single character
    #[arg(long)]
    pub delimiter: Option<Delimiter>,

    /// Worksheet name (first sheet by default)
    #[arg(long)]
    pub sheet: Option<String>,
}

impl ReadArgs {
    /// Flags given on the command line replace the matching fields of `base`
    pub fn apply(&self, mut base: ReadOptions) -> ReadOptions {
        if let Some(skip) = self.skip_rows {
            base.skip_rows = skip;
        }
        if self.no_header {
            base.header_row = None;
        } else if let Some(row) = self.header_row {
            base.header_row = Some(row);
        }
        if let Some(delimiter) = &self.delimiter {
            base.delimiter = delimiter.clone();
        }
        if let Some(sheet) = &self.sheet {
            base.sheet = Some(sheet.clone());
        }
        base
    }
}

/// Export flags shared by `clean` and `combine`
#[derive(Args, Clone, Debug, Default)]
pub struct OutputArgs {
    /// csv, excel or both
    #[arg(long)]
    pub format: Option<ExportFormat>,

    /// Write CSV without the UTF-8 byte order mark
    #[arg(long)]
    pub no_bom: bool,

    /// Directory for output files
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Rows of the result to print
    #[arg(long, default_value_t = 5)]
    pub preview: usize,
}

impl OutputArgs {
    pub fn apply(&self, mut base: ExportOptions) -> ExportOptions {
        if let Some(format) = self.format {
            base.format = format;
        }
        if self.no_bom {
            base.bom = false;
        }
        if let Some(dir) = &self.out_dir {
            base.out_dir = Some(dir.clone());
        }
        base
    }
}

#[derive(Args, Debug)]
pub struct CleanArgs {
    pub file: PathBuf,

    #[command(flatten)]
    pub read: ReadArgs,

    /// JSON recipe; flags below override its fields
    #[arg(long)]
    pub recipe: Option<PathBuf>,

    /// Columns to keep, in order
    #[arg(long, value_delimiter = ',')]
    pub select: Vec<String>,

    /// Sort key `col` or `col:desc`, most significant first
    #[arg(long)]
    pub sort: Vec<SortKey>,

    /// Numeric range `col:min:max`; either bound may be empty
    #[arg(long = "range")]
    pub ranges: Vec<String>,

    /// Text match `col=pattern`
    #[arg(long = "contains")]
    pub contains: Vec<String>,

    /// Match --contains patterns literally instead of as regexes
    #[arg(long)]
    pub literal: bool,

    #[arg(long)]
    pub ignore_case: bool,

    /// Row window `start:end` applied after filtering
    #[arg(long)]
    pub rows: Option<RowRange>,

    #[arg(long, value_delimiter = ',')]
    pub pivot_index: Vec<String>,

    #[arg(long)]
    pub pivot_columns: Option<String>,

    #[arg(long)]
    pub pivot_values: Option<String>,

    /// sum, mean, median, min, max, count, first or last
    #[arg(long)]
    pub agg: Option<AggFunc>,

    /// Value written into empty pivot cells
    #[arg(long)]
    pub fill_value: Option<f64>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CombineMode {
    Concat,
    Merge,
}

#[derive(Args, Debug)]
pub struct CombineArgs {
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    #[command(flatten)]
    pub read: ReadArgs,

    #[arg(long, value_enum, default_value = "concat")]
    pub mode: CombineMode,

    /// Key columns `a,b`; once for all files or once per file
    #[arg(long)]
    pub keys: Vec<String>,

    /// inner, left, right or outer
    #[arg(long, default_value = "inner")]
    pub how: JoinType,

    /// as_is, lower or upper
    #[arg(long, default_value = "as_is")]
    pub key_case: KeyCase,

    /// Trim whitespace around key values
    #[arg(long)]
    pub trim_keys: bool,

    /// Column recording each row's source file (concat only)
    #[arg(long)]
    pub source_column: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl CombineArgs {
    /// `--keys` values split into per-file key lists
    pub fn key_lists(&self) -> Vec<Vec<String>> {
        self.keys
            .iter()
            .map(|list| {
                list.split(',')
                    .map(|k| k.trim().to_string())
                    .filter(|k| !k.is_empty())
                    .collect()
            })
            .collect()
    }
}
