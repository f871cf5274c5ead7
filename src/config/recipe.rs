/// Cleaning recipe: one complete run (read -> select -> sort -> filter -> slice -> pivot -> export)
use crate::config::options::*;
use crate::error::{CleanerError, CleanerResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CleanRecipe {
    /// Parsing configuration
    pub read: ReadOptions,

    /// Columns to keep, in output order (empty keeps all)
    pub select: Vec<String>,

    /// Sort keys, most significant first
    pub sort: Vec<SortKey>,

    /// Content filters, applied in order
    pub filters: Vec<RowFilter>,

    /// Positional row window applied after filtering
    pub rows: Option<RowRange>,

    /// Optional pivot applied last
    pub pivot: Option<PivotSpec>,

    /// Export configuration
    pub export: ExportOptions,
}

impl CleanRecipe {
    /// Load a recipe from a JSON file; missing fields take their defaults
    pub fn from_path(path: impl AsRef<Path>) -> CleanerResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CleanerError::io_with_path(format!("failed to read recipe: {}", e), path.display().to_string())
        })?;
        let recipe = Self::from_json(&content)?;
        tracing::debug!(path = %path.display(), "loaded recipe");
        Ok(recipe)
    }

    pub fn from_json(content: &str) -> CleanerResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn to_json(&self) -> CleanerResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_recipe_is_default() {
        let recipe = CleanRecipe::from_json("{}").unwrap();
        assert_eq!(recipe, CleanRecipe::default());
        assert_eq!(recipe.read.header_row, Some(0));
        assert!(recipe.export.bom);
    }

    #[test]
    fn test_full_recipe() {
        let json = r#"{
            "read": {"skip_rows": 2, "delimiter": "semicolon", "sheet": "Data"},
            "select": ["region", "sales"],
            "sort": [{"column": "sales", "ascending": false}],
            "filters": [{"kind": "range", "column": "sales", "min": 10}],
            "rows": {"start": 0, "end": 5},
            "pivot": {"index": ["region"], "values": "sales", "aggfunc": "sum"},
            "export": {"format": "csv", "bom": false}
        }"#;
        let recipe = CleanRecipe::from_json(json).unwrap();
        assert_eq!(recipe.read.skip_rows, 2);
        assert_eq!(recipe.read.delimiter, Delimiter::Semicolon);
        assert_eq!(recipe.sort, vec![SortKey::desc("sales")]);
        assert_eq!(recipe.rows, Some(RowRange { start: 0, end: Some(5) }));
        assert_eq!(recipe.pivot.as_ref().map(|p| p.aggfunc), Some(AggFunc::Sum));
        assert_eq!(recipe.export.format, ExportFormat::Csv);
        assert_eq!(recipe.export.sheet_name, "Sheet1");
    }

    #[test]
    fn test_round_trip_through_json() {
        let mut recipe = CleanRecipe::default();
        recipe.select = vec!["a".into()];
        let parsed = CleanRecipe::from_json(&recipe.to_json().unwrap()).unwrap();
        assert_eq!(parsed, recipe);
    }

    #[test]
    fn test_malformed_recipe_is_invalid_option() {
        let err = CleanRecipe::from_json("{\"select\": 3}").unwrap_err();
        assert!(matches!(err, CleanerError::InvalidOption { .. }));
    }
}
