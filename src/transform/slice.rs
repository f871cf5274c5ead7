use crate::config::RowRange;
use crate::table::Table;

impl Table {
    /// Positional half-open row window, clamped to the table
    pub fn slice_rows(&self, range: &RowRange) -> Table {
        let rows = self.num_rows();
        let end = range.end.unwrap_or(rows).min(rows);
        let start = range.start.min(end);
        Table::new(self.batch().slice(start, end - start))
    }
}

#[cfg(test)]
mod tests {
    use crate::config::RowRange;
    use crate::table::{Scalar, Table};
    use arrow::array::{ArrayRef, Int64Array};
    use std::sync::Arc;

    fn table() -> Table {
        Table::from_columns(vec![(
            "n".to_string(),
            Arc::new(Int64Array::from((0..10).collect::<Vec<i64>>())) as ArrayRef,
        )])
        .unwrap()
    }

    #[test]
    fn test_window() {
        let sliced = table().slice_rows(&RowRange { start: 2, end: Some(5) });
        assert_eq!(sliced.num_rows(), 3);
        assert_eq!(sliced.scalar(0, 0), Scalar::Int(2));
    }

    #[test]
    fn test_clamped() {
        assert_eq!(table().slice_rows(&RowRange { start: 8, end: Some(100) }).num_rows(), 2);
        assert_eq!(table().slice_rows(&RowRange { start: 50, end: None }).num_rows(), 0);
        assert_eq!(table().slice_rows(&RowRange { start: 6, end: Some(3) }).num_rows(), 0);
        assert_eq!(table().slice_rows(&RowRange::default()).num_rows(), 10);
    }
}
