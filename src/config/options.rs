/// Option types for reading, cleaning, combining and exporting tables.
/// Every struct has a `Default` matching the interactive tool's initial widget state.
use crate::error::{CleanerError, CleanerResult};
use crate::ingestion::sniff::sniff_delimiter;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Column separator for delimited text files
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Delimiter {
    /// Sniff from the first 1024 bytes, falling back to a comma
    #[default]
    Auto,
    Comma,
    Tab,
    Semicolon,
    Pipe,
    Space,
    Custom(String),
}

impl Delimiter {
    /// Resolve to a single byte, sniffing `sample` when set to `Auto`
    pub fn resolve(&self, sample: &[u8]) -> CleanerResult<u8> {
        match self {
            Delimiter::Auto => Ok(sniff_delimiter(sample).unwrap_or_else(|| {
                tracing::warn!("could not detect a delimiter, falling back to ','");
                b','
            })),
            Delimiter::Comma => Ok(b','),
            Delimiter::Tab => Ok(b'\t'),
            Delimiter::Semicolon => Ok(b';'),
            Delimiter::Pipe => Ok(b'|'),
            Delimiter::Space => Ok(b' '),
            Delimiter::Custom(raw) => {
                if raw == "\\t" {
                    return Ok(b'\t');
                }
                match raw.as_bytes() {
                    [byte] => Ok(*byte),
                    _ => Err(CleanerError::invalid_option_named(
                        format!("custom delimiter must be a single byte, got {:?}", raw),
                        "delimiter",
                    )),
                }
            }
        }
    }
}

impl FromStr for Delimiter {
    type Err = CleanerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "auto" => Delimiter::Auto,
            "comma" | "," => Delimiter::Comma,
            "tab" | "\t" | "\\t" => Delimiter::Tab,
            "semicolon" | ";" => Delimiter::Semicolon,
            "pipe" | "|" => Delimiter::Pipe,
            "space" | " " => Delimiter::Space,
            other => Delimiter::Custom(other.to_string()),
        })
    }
}

/// How a file is parsed into a table
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadOptions {
    /// Physical lines (or sheet rows) dropped before parsing
    pub skip_rows: usize,

    /// Header row counted after the skipped rows; `None` means no header
    pub header_row: Option<usize>,

    /// Separator for delimited text (ignored for workbooks)
    pub delimiter: Delimiter,

    /// Worksheet name (first sheet when unset; ignored for text)
    pub sheet: Option<String>,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            skip_rows: 0,
            header_row: Some(0),
            delimiter: Delimiter::Auto,
            sheet: None,
        }
    }
}

/// One sort key
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub column: String,
    #[serde(default = "default_true")]
    pub ascending: bool,
}

impl SortKey {
    pub fn asc(column: impl Into<String>) -> Self {
        Self { column: column.into(), ascending: true }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self { column: column.into(), ascending: false }
    }
}

/// `col`, `col:asc` or `col:desc`
impl FromStr for SortKey {
    type Err = CleanerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.rsplit_once(':') {
            Some((column, "desc")) => Ok(SortKey::desc(column)),
            Some((column, "asc")) => Ok(SortKey::asc(column)),
            _ if s.is_empty() => Err(CleanerError::invalid_option_named("empty sort key", "sort")),
            _ => Ok(SortKey::asc(s)),
        }
    }
}

/// Substring / regex match on a column's displayed text
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextFilter {
    pub pattern: String,
    #[serde(default = "default_true")]
    pub regex: bool,
    #[serde(default = "default_true")]
    pub case_sensitive: bool,
}

impl TextFilter {
    pub fn regex(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            regex: true,
            case_sensitive: true,
        }
    }

    pub fn literal(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            regex: false,
            case_sensitive: true,
        }
    }
}

/// Row filter applied by content
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowFilter {
    /// Inclusive numeric range; a missing bound is unbounded
    Range {
        column: String,
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
    },
    /// Text match against the displayed value
    Text {
        column: String,
        #[serde(flatten)]
        filter: TextFilter,
    },
}

impl RowFilter {
    pub fn column(&self) -> &str {
        match self {
            RowFilter::Range { column, .. } | RowFilter::Text { column, .. } => column,
        }
    }

    /// Parse `col:min:max` (either bound may be empty)
    pub fn parse_range(spec: &str) -> CleanerResult<Self> {
        let parts: Vec<&str> = spec.rsplitn(3, ':').collect();
        if parts.len() != 3 {
            return Err(CleanerError::invalid_option_named(
                format!("range filter must be col:min:max, got {:?}", spec),
                "range",
            ));
        }
        let bound = |raw: &str| -> CleanerResult<Option<f64>> {
            if raw.trim().is_empty() {
                return Ok(None);
            }
            raw.trim().parse::<f64>().map(Some).map_err(|_| {
                CleanerError::invalid_option_named(format!("bad bound {:?}", raw), "range")
            })
        };
        Ok(RowFilter::Range {
            column: parts[2].to_string(),
            min: bound(parts[1])?,
            max: bound(parts[0])?,
        })
    }

    /// Parse `col=pattern`
    pub fn parse_text(spec: &str, regex: bool, case_sensitive: bool) -> CleanerResult<Self> {
        let (column, pattern) = spec.split_once('=').ok_or_else(|| {
            CleanerError::invalid_option_named(
                format!("text filter must be col=pattern, got {:?}", spec),
                "contains",
            )
        })?;
        Ok(RowFilter::Text {
            column: column.to_string(),
            filter: TextFilter {
                pattern: pattern.to_string(),
                regex,
                case_sensitive,
            },
        })
    }
}

/// Half-open positional row window
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RowRange {
    #[serde(default)]
    pub start: usize,
    #[serde(default)]
    pub end: Option<usize>,
}

/// `start:end`, either side may be empty
impl FromStr for RowRange {
    type Err = CleanerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s.split_once(':').ok_or_else(|| {
            CleanerError::invalid_option_named(format!("row range must be start:end, got {:?}", s), "rows")
        })?;
        let parse = |raw: &str| -> CleanerResult<Option<usize>> {
            if raw.trim().is_empty() {
                return Ok(None);
            }
            raw.trim().parse::<usize>().map(Some).map_err(|_| {
                CleanerError::invalid_option_named(format!("bad row index {:?}", raw), "rows")
            })
        };
        Ok(RowRange {
            start: parse(start)?.unwrap_or(0),
            end: parse(end)?,
        })
    }
}

/// Pivot aggregation function
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AggFunc {
    Sum,
    #[default]
    Mean,
    Median,
    Min,
    Max,
    Count,
    First,
    Last,
}

impl AggFunc {
    /// Whether the function needs a numeric value column
    pub fn requires_numeric(&self) -> bool {
        !matches!(self, AggFunc::Count | AggFunc::First | AggFunc::Last)
    }
}

impl FromStr for AggFunc {
    type Err = CleanerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sum" => Ok(AggFunc::Sum),
            "mean" | "avg" | "average" => Ok(AggFunc::Mean),
            "median" => Ok(AggFunc::Median),
            "min" => Ok(AggFunc::Min),
            "max" => Ok(AggFunc::Max),
            "count" => Ok(AggFunc::Count),
            "first" => Ok(AggFunc::First),
            "last" => Ok(AggFunc::Last),
            other => Err(CleanerError::invalid_option_named(
                format!("unknown aggregation {:?}", other),
                "agg",
            )),
        }
    }
}

/// Pivot table definition
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
pub struct PivotSpec {
    /// Grouping columns forming the output rows
    pub index: Vec<String>,
    /// Column whose distinct values become output columns
    #[serde(default)]
    pub columns: Option<String>,
    /// Column being aggregated
    pub values: String,
    #[serde(default)]
    pub aggfunc: AggFunc,
    /// Value written into empty cells
    #[serde(default)]
    pub fill_value: Option<f64>,
}

/// Which files an export writes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    Csv,
    Excel,
    #[default]
    Both,
}

impl ExportFormat {
    pub fn includes_csv(&self) -> bool {
        matches!(self, ExportFormat::Csv | ExportFormat::Both)
    }

    pub fn includes_excel(&self) -> bool {
        matches!(self, ExportFormat::Excel | ExportFormat::Both)
    }
}

impl FromStr for ExportFormat {
    type Err = CleanerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "both" => Ok(ExportFormat::Both),
            other => Err(CleanerError::invalid_option_named(
                format!("unknown export format {:?}", other),
                "format",
            )),
        }
    }
}

/// Export settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub format: ExportFormat,
    /// Prefix CSV output with a UTF-8 byte order mark (spreadsheet-friendly)
    pub bom: bool,
    pub delimiter: char,
    pub sheet_name: String,
    /// Output directory (current directory when unset)
    pub out_dir: Option<PathBuf>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Both,
            bom: true,
            delimiter: ',',
            sheet_name: "Sheet1".to_string(),
            out_dir: None,
        }
    }
}

/// Row-wise concatenation settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ConcatOptions {
    /// Name of an appended column recording each row's source
    pub source_column: Option<String>,
}

/// Join type for key merges
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JoinType {
    #[default]
    Inner,
    Left,
    Right,
    Outer,
}

impl FromStr for JoinType {
    type Err = CleanerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "inner" => Ok(JoinType::Inner),
            "left" => Ok(JoinType::Left),
            "right" => Ok(JoinType::Right),
            "outer" | "full" => Ok(JoinType::Outer),
            other => Err(CleanerError::invalid_option_named(
                format!("unknown join type {:?}", other),
                "how",
            )),
        }
    }
}

/// Case normalization applied to text join keys
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum KeyCase {
    #[default]
    AsIs,
    Lower,
    Upper,
}

impl FromStr for KeyCase {
    type Err = CleanerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "as_is" | "as-is" | "none" => Ok(KeyCase::AsIs),
            "lower" => Ok(KeyCase::Lower),
            "upper" => Ok(KeyCase::Upper),
            other => Err(CleanerError::invalid_option_named(
                format!("unknown key case {:?}", other),
                "key_case",
            )),
        }
    }
}

/// Key-based merge of several tables
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MergeSpec {
    /// Key columns per table, all of equal length
    pub keys: Vec<Vec<String>>,
    pub how: JoinType,
    pub key_case: KeyCase,
    pub trim_keys: bool,
    /// Suffix per table for colliding column names (source stem when unset)
    pub suffixes: Option<Vec<String>>,
}

impl MergeSpec {
    pub fn normalizes_keys(&self) -> bool {
        self.key_case != KeyCase::AsIs || self.trim_keys
    }
}

fn default_true() -> bool {
    true
}
