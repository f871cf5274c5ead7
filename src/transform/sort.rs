use crate::config::SortKey;
use crate::error::CleanerResult;
use crate::table::Table;
use arrow::array::{ArrayRef, UInt32Array};
use arrow::compute::{lexsort_to_indices, SortColumn, SortOptions};
use std::sync::Arc;

impl Table {
    /// Stable multi-key sort; nulls go last in either direction
    pub fn sort_by(&self, keys: &[SortKey]) -> CleanerResult<Table> {
        let mut sort_columns = Vec::with_capacity(keys.len() + 1);
        for key in keys {
            sort_columns.push(SortColumn {
                values: self.column(&key.column)?.clone(),
                options: Some(SortOptions {
                    descending: !key.ascending,
                    nulls_first: false,
                }),
            });
        }
        if sort_columns.is_empty() || self.num_rows() < 2 {
            return Ok(self.clone());
        }

        // Row position as the last key keeps ties in input order
        let positions: ArrayRef = Arc::new(UInt32Array::from_iter_values(0..self.num_rows() as u32));
        sort_columns.push(SortColumn {
            values: positions,
            options: Some(SortOptions::default()),
        });

        let indices = lexsort_to_indices(&sort_columns, None)?;
        self.take_rows(&indices)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::SortKey;
    use crate::table::{Scalar, Table};
    use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
    use std::sync::Arc;

    fn table() -> Table {
        Table::from_columns(vec![
            (
                "group".to_string(),
                Arc::new(StringArray::from(vec!["b", "a", "b", "a"])) as ArrayRef,
            ),
            (
                "value".to_string(),
                Arc::new(Float64Array::from(vec![Some(1.0), None, Some(3.0), Some(2.0)])) as ArrayRef,
            ),
            (
                "id".to_string(),
                Arc::new(Int64Array::from(vec![1, 2, 3, 4])) as ArrayRef,
            ),
        ])
        .unwrap()
    }

    fn ids(table: &Table) -> Vec<Scalar> {
        let idx = table.column_index("id").unwrap();
        (0..table.num_rows()).map(|r| table.scalar(r, idx)).collect()
    }

    #[test]
    fn test_sort_ascending_nulls_last() {
        let sorted = table().sort_by(&[SortKey::asc("value")]).unwrap();
        assert_eq!(ids(&sorted), vec![Scalar::Int(1), Scalar::Int(4), Scalar::Int(3), Scalar::Int(2)]);
    }

    #[test]
    fn test_sort_descending_nulls_still_last() {
        let sorted = table().sort_by(&[SortKey::desc("value")]).unwrap();
        assert_eq!(ids(&sorted), vec![Scalar::Int(3), Scalar::Int(4), Scalar::Int(1), Scalar::Int(2)]);
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let sorted = table().sort_by(&[SortKey::asc("group")]).unwrap();
        assert_eq!(ids(&sorted), vec![Scalar::Int(2), Scalar::Int(4), Scalar::Int(1), Scalar::Int(3)]);
    }

    #[test]
    fn test_multi_key() {
        let sorted = table()
            .sort_by(&[SortKey::desc("group"), SortKey::asc("value")])
            .unwrap();
        assert_eq!(ids(&sorted), vec![Scalar::Int(1), Scalar::Int(3), Scalar::Int(4), Scalar::Int(2)]);
    }

    #[test]
    fn test_unknown_sort_column() {
        assert!(table().sort_by(&[SortKey::asc("missing")]).is_err());
    }
}
