use crate::config::{RowFilter, TextFilter};
use crate::error::{CleanerError, CleanerResult};
use crate::table::{Scalar, Table};
use arrow::array::BooleanArray;
use bitvec::prelude::*;
use regex::RegexBuilder;

/// Selection vector over the rows of a table
fn selection_from(len: usize, keep: impl Fn(usize) -> bool) -> BitVec {
    let mut selection = bitvec![0; len];
    for row in 0..len {
        if keep(row) {
            selection.set(row, true);
        }
    }
    selection
}

fn apply_selection(table: &Table, selection: &BitVec) -> CleanerResult<Table> {
    if selection.all() {
        return Ok(table.clone());
    }
    let mask = BooleanArray::from(selection.iter().map(|bit| *bit).collect::<Vec<bool>>());
    table.filter_rows(&mask)
}

impl Table {
    /// Keep rows whose numeric value lies in `[min, max]`; nulls are dropped
    pub fn filter_range(&self, column: &str, min: Option<f64>, max: Option<f64>) -> CleanerResult<Table> {
        if !self.is_numeric(column)? {
            return Err(CleanerError::type_mismatch(
                format!("range filter needs a numeric column, '{}' is {}", column, self.data_type(column)?),
                column,
            ));
        }
        let array = self.column(column)?;
        let selection = selection_from(self.num_rows(), |row| {
            match Scalar::from_array(array.as_ref(), row).as_f64() {
                Some(v) if !v.is_nan() => {
                    min.map_or(true, |lo| v >= lo) && max.map_or(true, |hi| v <= hi)
                }
                _ => false,
            }
        });
        tracing::debug!(column, kept = selection.count_ones(), of = self.num_rows(), "range filter");
        apply_selection(self, &selection)
    }

    /// Keep rows whose displayed text matches; nulls never match
    pub fn filter_text(&self, column: &str, filter: &TextFilter) -> CleanerResult<Table> {
        let array = self.column(column)?;
        if filter.pattern.is_empty() {
            return Ok(self.clone());
        }

        let pattern = if filter.regex {
            filter.pattern.clone()
        } else {
            regex::escape(&filter.pattern)
        };
        let matcher = RegexBuilder::new(&pattern)
            .case_insensitive(!filter.case_sensitive)
            .build()
            .map_err(|e| CleanerError::invalid_pattern(&filter.pattern, e.to_string()))?;

        let selection = selection_from(self.num_rows(), |row| {
            match Scalar::from_array(array.as_ref(), row) {
                Scalar::Null => false,
                cell => matcher.is_match(&cell.to_string()),
            }
        });
        tracing::debug!(column, kept = selection.count_ones(), of = self.num_rows(), "text filter");
        apply_selection(self, &selection)
    }

    pub fn apply_filter(&self, filter: &RowFilter) -> CleanerResult<Table> {
        match filter {
            RowFilter::Range { column, min, max } => self.filter_range(column, *min, *max),
            RowFilter::Text { column, filter } => self.filter_text(column, filter),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{RowFilter, TextFilter};
    use crate::error::CleanerError;
    use crate::table::{Scalar, Table};
    use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
    use std::sync::Arc;

    fn table() -> Table {
        Table::from_columns(vec![
            (
                "city".to_string(),
                Arc::new(StringArray::from(vec![
                    Some("Beijing"),
                    Some("Shanghai"),
                    None,
                    Some("beihai"),
                ])) as ArrayRef,
            ),
            (
                "pop".to_string(),
                Arc::new(Float64Array::from(vec![Some(21.5), Some(24.9), Some(3.0), None])) as ArrayRef,
            ),
            (
                "rank".to_string(),
                Arc::new(Int64Array::from(vec![2, 1, 3, 4])) as ArrayRef,
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_range_inclusive_and_drops_nulls() {
        let filtered = table().filter_range("pop", Some(3.0), Some(21.5)).unwrap();
        assert_eq!(filtered.num_rows(), 2);
        let unbounded = table().filter_range("pop", None, None).unwrap();
        assert_eq!(unbounded.num_rows(), 3);
    }

    #[test]
    fn test_range_on_int_column() {
        let filtered = table().filter_range("rank", Some(2.0), None).unwrap();
        assert_eq!(filtered.num_rows(), 3);
    }

    #[test]
    fn test_inverted_range_is_empty() {
        assert_eq!(table().filter_range("pop", Some(10.0), Some(1.0)).unwrap().num_rows(), 0);
    }

    #[test]
    fn test_range_rejects_text_column() {
        let err = table().filter_range("city", Some(0.0), None).unwrap_err();
        assert!(matches!(err, CleanerError::TypeMismatch { .. }));
    }

    #[test]
    fn test_text_regex_and_case() {
        let filtered = table().filter_text("city", &TextFilter::regex("^Bei")).unwrap();
        assert_eq!(filtered.num_rows(), 1);

        let mut insensitive = TextFilter::regex("^bei");
        insensitive.case_sensitive = false;
        assert_eq!(table().filter_text("city", &insensitive).unwrap().num_rows(), 2);
    }

    #[test]
    fn test_text_literal_escapes() {
        let filtered = table().filter_text("pop", &TextFilter::literal("21.5")).unwrap();
        assert_eq!(filtered.num_rows(), 1);
        assert_eq!(filtered.scalar(0, 0), Scalar::Text("Beijing".into()));
        assert_eq!(table().filter_text("city", &TextFilter::literal(".")).unwrap().num_rows(), 0);
    }

    #[test]
    fn test_empty_pattern_is_noop() {
        assert_eq!(table().filter_text("city", &TextFilter::regex("")).unwrap().num_rows(), 4);
    }

    #[test]
    fn test_invalid_regex() {
        let err = table().filter_text("city", &TextFilter::regex("(")).unwrap_err();
        assert!(matches!(err, CleanerError::InvalidPattern { .. }));
    }

    #[test]
    fn test_apply_filter_dispatch() {
        let filter = RowFilter::parse_text("city=hai", true, true).unwrap();
        assert_eq!(table().apply_filter(&filter).unwrap().num_rows(), 2);
    }
}
