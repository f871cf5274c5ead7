use crate::error::{CleanerError, CleanerResult};
use crate::table::scalar::Scalar;
use arrow::array::*;
use arrow::datatypes::*;
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// In-memory table: a single Arrow record batch with unique column names
#[derive(Clone, Debug)]
pub struct Table {
    batch: RecordBatch,
}

/// Per-column overview used by `inspect` and the numeric filter defaults
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub name: String,
    pub data_type: String,
    pub null_count: usize,
    /// (min, max) of non-null values for numeric columns
    pub bounds: Option<(f64, f64)>,
}

impl Table {
    pub fn new(batch: RecordBatch) -> Self {
        Self { batch }
    }

    /// Build a table from named columns of equal length
    pub fn from_columns(columns: Vec<(String, ArrayRef)>) -> CleanerResult<Self> {
        let row_count = columns.first().map(|(_, c)| c.len()).unwrap_or(0);
        Self::from_columns_with_rows(columns, row_count)
    }

    /// Like `from_columns`, but keeps an explicit row count when there are no columns
    pub fn from_columns_with_rows(
        columns: Vec<(String, ArrayRef)>,
        row_count: usize,
    ) -> CleanerResult<Self> {
        let mut seen = std::collections::HashSet::new();
        for (name, array) in &columns {
            if !seen.insert(name.as_str()) {
                return Err(CleanerError::internal(format!("duplicate column name '{}'", name)));
            }
            if array.len() != row_count {
                return Err(CleanerError::internal(format!(
                    "column '{}' has {} rows, expected {}",
                    name,
                    array.len(),
                    row_count
                )));
            }
        }

        let fields: Vec<Field> = columns
            .iter()
            .map(|(name, array)| Field::new(name, array.data_type().clone(), true))
            .collect();
        let schema = Arc::new(Schema::new(fields));
        let arrays: Vec<ArrayRef> = columns.into_iter().map(|(_, a)| a).collect();
        let options = RecordBatchOptions::new().with_row_count(Some(row_count));
        let batch = RecordBatch::try_new_with_options(schema, arrays, &options)?;
        Ok(Self { batch })
    }

    pub fn empty() -> Self {
        Self {
            batch: RecordBatch::new_empty(Arc::new(Schema::empty())),
        }
    }

    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    pub fn into_batch(self) -> RecordBatch {
        self.batch
    }

    pub fn schema(&self) -> SchemaRef {
        self.batch.schema()
    }

    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn num_columns(&self) -> usize {
        self.batch.num_columns()
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.num_rows(), self.num_columns())
    }

    pub fn column_names(&self) -> Vec<String> {
        self.batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().to_string())
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.batch.schema().index_of(name).is_ok()
    }

    pub fn column_index(&self, name: &str) -> CleanerResult<usize> {
        self.batch
            .schema()
            .index_of(name)
            .map_err(|_| CleanerError::column_not_found(name, self.column_names()))
    }

    pub fn column(&self, name: &str) -> CleanerResult<&ArrayRef> {
        let idx = self.column_index(name)?;
        Ok(self.batch.column(idx))
    }

    pub fn column_at(&self, idx: usize) -> &ArrayRef {
        self.batch.column(idx)
    }

    /// Named columns in schema order
    pub fn columns(&self) -> Vec<(String, ArrayRef)> {
        self.column_names()
            .into_iter()
            .zip(self.batch.columns().iter().cloned())
            .collect()
    }

    pub fn data_type(&self, name: &str) -> CleanerResult<DataType> {
        Ok(self.column(name)?.data_type().clone())
    }

    pub fn is_numeric(&self, name: &str) -> CleanerResult<bool> {
        Ok(matches!(
            self.data_type(name)?,
            DataType::Int64 | DataType::Float64
        ))
    }

    pub fn scalar(&self, row: usize, col: usize) -> Scalar {
        Scalar::from_array(self.batch.column(col).as_ref(), row)
    }

    pub fn row(&self, row: usize) -> Vec<Scalar> {
        (0..self.num_columns()).map(|c| self.scalar(row, c)).collect()
    }

    /// Min/max over non-null values of a numeric column
    pub fn numeric_bounds(&self, name: &str) -> CleanerResult<Option<(f64, f64)>> {
        if !self.is_numeric(name)? {
            return Err(CleanerError::type_mismatch(
                format!("column '{}' is not numeric", name),
                name,
            ));
        }
        let array = self.column(name)?;
        Ok(numeric_bounds_of(array.as_ref()))
    }

    /// Gather rows by position; null indices produce null cells
    pub fn take_rows(&self, indices: &UInt32Array) -> CleanerResult<Table> {
        let columns = self
            .columns()
            .into_iter()
            .map(|(name, array)| {
                let taken = arrow::compute::take(array.as_ref(), indices, None)?;
                Ok((name, taken))
            })
            .collect::<CleanerResult<Vec<_>>>()?;
        Table::from_columns_with_rows(columns, indices.len())
    }

    /// Keep the rows whose mask entry is true
    pub fn filter_rows(&self, mask: &BooleanArray) -> CleanerResult<Table> {
        let batch = arrow::compute::filter_record_batch(&self.batch, mask)?;
        Ok(Table::new(batch))
    }

    pub fn column_summaries(&self) -> Vec<ColumnSummary> {
        self.columns()
            .into_iter()
            .map(|(name, array)| {
                let bounds = match array.data_type() {
                    DataType::Int64 | DataType::Float64 => numeric_bounds_of(array.as_ref()),
                    _ => None,
                };
                ColumnSummary {
                    name,
                    data_type: type_label(array.data_type()).to_string(),
                    null_count: array.null_count(),
                    bounds,
                }
            })
            .collect()
    }
}

fn numeric_bounds_of(array: &dyn Array) -> Option<(f64, f64)> {
    (0..array.len())
        .filter_map(|i| Scalar::from_array(array, i).as_f64())
        .filter(|v| !v.is_nan())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Short user-facing name for a column type
pub fn type_label(data_type: &DataType) -> &'static str {
    match data_type {
        DataType::Int64 => "int",
        DataType::Float64 => "float",
        DataType::Boolean => "bool",
        DataType::Utf8 => "text",
        _ => "other",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_columns(vec![
            ("id".to_string(), Arc::new(Int64Array::from(vec![3, 1, 2])) as ArrayRef),
            (
                "score".to_string(),
                Arc::new(Float64Array::from(vec![Some(2.5), None, Some(-1.0)])) as ArrayRef,
            ),
            (
                "name".to_string(),
                Arc::new(StringArray::from(vec!["c", "a", "b"])) as ArrayRef,
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_shape_and_names() {
        let table = sample();
        assert_eq!(table.shape(), (3, 3));
        assert_eq!(table.column_names(), vec!["id", "score", "name"]);
        assert_eq!(table.scalar(0, 2), Scalar::Text("c".into()));
    }

    #[test]
    fn test_missing_column_error() {
        let table = sample();
        assert!(matches!(
            table.column("nope"),
            Err(CleanerError::ColumnNotFound { .. })
        ));
    }

    #[test]
    fn test_numeric_bounds_skip_nulls() {
        let table = sample();
        assert_eq!(table.numeric_bounds("score").unwrap(), Some((-1.0, 2.5)));
        assert!(table.numeric_bounds("name").is_err());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let a: ArrayRef = Arc::new(Int64Array::from(vec![1]));
        let result = Table::from_columns(vec![("x".into(), a.clone()), ("x".into(), a)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_take_rows_with_null_index() {
        let table = sample();
        let indices = UInt32Array::from(vec![Some(2), None]);
        let taken = table.take_rows(&indices).unwrap();
        assert_eq!(taken.num_rows(), 2);
        assert_eq!(taken.scalar(0, 0), Scalar::Int(2));
        assert_eq!(taken.scalar(1, 2), Scalar::Null);
    }

    #[test]
    fn test_summaries() {
        let summaries = sample().column_summaries();
        assert_eq!(summaries[1].null_count, 1);
        assert_eq!(summaries[1].data_type, "float");
        assert_eq!(summaries[2].bounds, None);
    }
}
