use crate::error::CleanerResult;
use crate::table::Table;
use std::collections::HashSet;

impl Table {
    /// Keep the named columns in the given order; an empty list keeps everything
    pub fn select(&self, columns: &[String]) -> CleanerResult<Table> {
        if columns.is_empty() {
            return Ok(self.clone());
        }

        let mut seen = HashSet::new();
        let mut indices = Vec::with_capacity(columns.len());
        for name in columns {
            if !seen.insert(name.as_str()) {
                tracing::debug!(column = %name, "column selected twice, keeping first");
                continue;
            }
            indices.push(self.column_index(name)?);
        }

        let batch = self.batch().project(&indices)?;
        Ok(Table::new(batch))
    }
}

#[cfg(test)]
mod tests {
    use crate::error::CleanerError;
    use crate::table::Table;
    use arrow::array::{ArrayRef, Int64Array};
    use std::sync::Arc;

    fn table() -> Table {
        let col = |v: i64| Arc::new(Int64Array::from(vec![v, v])) as ArrayRef;
        Table::from_columns(vec![
            ("a".to_string(), col(1)),
            ("b".to_string(), col(2)),
            ("c".to_string(), col(3)),
        ])
        .unwrap()
    }

    #[test]
    fn test_select_reorders() {
        let selected = table().select(&["c".into(), "a".into()]).unwrap();
        assert_eq!(selected.column_names(), vec!["c", "a"]);
        assert_eq!(selected.num_rows(), 2);
    }

    #[test]
    fn test_empty_selection_keeps_all() {
        assert_eq!(table().select(&[]).unwrap().num_columns(), 3);
    }

    #[test]
    fn test_duplicate_selection_kept_once() {
        let selected = table().select(&["b".into(), "b".into()]).unwrap();
        assert_eq!(selected.column_names(), vec!["b"]);
    }

    #[test]
    fn test_unknown_column() {
        let err = table().select(&["zzz".into()]).unwrap_err();
        assert!(matches!(err, CleanerError::ColumnNotFound { .. }));
    }
}
