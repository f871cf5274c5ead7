/// Unified error type for the cleaning toolkit
/// Provides structured error handling with categories for different failure modes
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum CleanerError {
    /// IO errors: opening, reading or writing files
    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
    },

    /// Parse errors: malformed delimited text or workbook content
    #[error("Parse error: {message}")]
    Parse {
        message: String,
        line: Option<usize>,
        context: Option<String>,
    },

    /// File extension is not one we can read
    #[error("Unsupported file format: .{extension}")]
    UnsupportedFormat { extension: String },

    /// A referenced column does not exist
    #[error("Column '{column}' not found (available: {})", .available.join(", "))]
    ColumnNotFound {
        column: String,
        available: Vec<String>,
    },

    /// Configuration values that cannot be honoured
    #[error("Invalid option: {message}")]
    InvalidOption {
        message: String,
        option: Option<String>,
    },

    /// Numeric operation requested on a non-numeric column
    #[error("Type mismatch: {message}")]
    TypeMismatch {
        message: String,
        column: Option<String>,
    },

    /// Regular expression failed to compile
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Internal errors: kernel failures, should not surface in normal use
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        context: Option<String>,
    },
}

impl CleanerError {
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            path: None,
        }
    }

    pub fn io_with_path(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            line: None,
            context: None,
        }
    }

    pub fn parse_at_line(message: impl Into<String>, line: usize) -> Self {
        Self::Parse {
            message: message.into(),
            line: Some(line),
            context: None,
        }
    }

    pub fn unsupported_format(extension: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            extension: extension.into(),
        }
    }

    pub fn column_not_found(column: impl Into<String>, available: Vec<String>) -> Self {
        Self::ColumnNotFound {
            column: column.into(),
            available,
        }
    }

    pub fn invalid_option(message: impl Into<String>) -> Self {
        Self::InvalidOption {
            message: message.into(),
            option: None,
        }
    }

    pub fn invalid_option_named(message: impl Into<String>, option: impl Into<String>) -> Self {
        Self::InvalidOption {
            message: message.into(),
            option: Some(option.into()),
        }
    }

    pub fn type_mismatch(message: impl Into<String>, column: impl Into<String>) -> Self {
        Self::TypeMismatch {
            message: message.into(),
            column: Some(column.into()),
        }
    }

    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            context: None,
        }
    }

    /// Add context to an error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        match &mut self {
            Self::Parse { context: ctx, .. } => *ctx = Some(context.into()),
            Self::Internal { context: ctx, .. } => *ctx = Some(context.into()),
            Self::Io { path, .. } if path.is_none() => *path = Some(context.into()),
            _ => {}
        }
        self
    }

    /// Recovery hint shown to the user alongside the error message
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Parse { .. } => Some("check the delimiter and skip-rows settings"),
            Self::InvalidOption { option: Some(option), .. } if option == "header_row" => {
                Some("the header row is counted after skipped rows; try a smaller value")
            }
            Self::ColumnNotFound { .. } => {
                Some("column names are case-sensitive; run `inspect` to list them")
            }
            Self::UnsupportedFormat { .. } => {
                Some("supported: csv, tsv, txt, dat, xlsx, xlsm, xls, ods")
            }
            _ => None,
        }
    }
}

impl From<anyhow::Error> for CleanerError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal {
            message: err.to_string(),
            context: None,
        }
    }
}

impl From<std::io::Error> for CleanerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
            path: None,
        }
    }
}

impl From<csv::Error> for CleanerError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|pos| pos.line() as usize);
        Self::Parse {
            message: err.to_string(),
            line,
            context: None,
        }
    }
}

impl From<calamine::Error> for CleanerError {
    fn from(err: calamine::Error) -> Self {
        Self::Parse {
            message: err.to_string(),
            line: None,
            context: Some("workbook".to_string()),
        }
    }
}

impl From<arrow::error::ArrowError> for CleanerError {
    fn from(err: arrow::error::ArrowError) -> Self {
        Self::Internal {
            message: err.to_string(),
            context: Some("arrow".to_string()),
        }
    }
}

impl From<regex::Error> for CleanerError {
    fn from(err: regex::Error) -> Self {
        Self::InvalidPattern {
            pattern: String::new(),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for CleanerError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidOption {
            message: format!("recipe: {}", err),
            option: Some("recipe".to_string()),
        }
    }
}

/// Result type alias for cleaning operations
pub type CleanerResult<T> = Result<T, CleanerError>;
