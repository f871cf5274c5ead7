use crate::config::ConcatOptions;
use crate::error::{CleanerError, CleanerResult};
use crate::ingestion::LoadedTable;
use crate::table::{coerce_column, unify_types, Table};
use arrow::array::{new_null_array, Array, ArrayRef, StringArray};
use arrow::datatypes::DataType;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Column type chosen while scanning inputs
#[derive(Default)]
struct TypeVote {
    /// Type unified over columns that hold at least one value
    observed: Option<DataType>,
    /// First type seen, used when every input column is all-null
    fallback: Option<DataType>,
}

impl TypeVote {
    fn add(&mut self, array: &dyn Array) {
        let data_type = array.data_type();
        if self.fallback.is_none() {
            self.fallback = Some(data_type.clone());
        }
        if array.null_count() < array.len() {
            self.observed = Some(match &self.observed {
                Some(current) => unify_types(current, data_type),
                None => data_type.clone(),
            });
        }
    }

    fn resolve(&self) -> DataType {
        self.observed
            .clone()
            .or_else(|| self.fallback.clone())
            .unwrap_or(DataType::Utf8)
    }
}

/// Stack tables row-wise over the union of their columns
pub fn concat_tables(inputs: &[LoadedTable], options: &ConcatOptions) -> CleanerResult<Table> {
    if inputs.is_empty() {
        return Err(CleanerError::invalid_option_named(
            "concatenation needs at least one table",
            "files",
        ));
    }

    let mut order: Vec<String> = Vec::new();
    let mut votes: HashMap<String, TypeVote> = HashMap::new();
    for input in inputs {
        for (name, array) in input.table.columns() {
            if !votes.contains_key(&name) {
                order.push(name.clone());
            }
            votes.entry(name).or_default().add(array.as_ref());
        }
    }

    if let Some(source) = &options.source_column {
        if votes.contains_key(source) {
            return Err(CleanerError::invalid_option_named(
                format!("source column '{}' already exists in the input", source),
                "source_column",
            ));
        }
    }

    let total_rows: usize = inputs.iter().map(|t| t.table.num_rows()).sum();
    let mut columns: Vec<(String, ArrayRef)> = Vec::with_capacity(order.len() + 1);
    for name in order {
        let target = votes[&name].resolve();
        let parts = inputs
            .iter()
            .map(|input| match input.table.column(&name) {
                Ok(array) => coerce_column(array, &target),
                Err(_) => Ok(new_null_array(&target, input.table.num_rows())),
            })
            .collect::<CleanerResult<Vec<ArrayRef>>>()?;
        let refs: Vec<&dyn Array> = parts.iter().map(|a| a.as_ref()).collect();
        columns.push((name, arrow::compute::concat(&refs)?));
    }

    if let Some(source) = &options.source_column {
        let names: Vec<&str> = inputs
            .iter()
            .flat_map(|input| {
                std::iter::repeat(input.name.as_str()).take(input.table.num_rows())
            })
            .collect();
        columns.push((source.clone(), Arc::new(StringArray::from(names)) as ArrayRef));
    }

    let table = Table::from_columns_with_rows(columns, total_rows)?;
    info!(
        "concatenated {} tables: {} rows, {} columns",
        inputs.len(),
        table.num_rows(),
        table.num_columns()
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestion::FileFormat;
    use crate::table::Scalar;
    use arrow::array::{Float64Array, Int64Array};

    fn loaded(name: &str, columns: Vec<(&str, ArrayRef)>) -> LoadedTable {
        let table = Table::from_columns(
            columns.into_iter().map(|(n, a)| (n.to_string(), a)).collect(),
        )
        .unwrap();
        LoadedTable::new(name, FileFormat::Csv, table)
    }

    #[test]
    fn test_union_of_columns_with_nulls() {
        let a = loaded(
            "a.csv",
            vec![
                ("id", Arc::new(Int64Array::from(vec![1, 2])) as ArrayRef),
                ("x", Arc::new(Int64Array::from(vec![10, 20])) as ArrayRef),
            ],
        );
        let b = loaded(
            "b.csv",
            vec![
                ("id", Arc::new(Int64Array::from(vec![3])) as ArrayRef),
                ("y", Arc::new(StringArray::from(vec!["q"])) as ArrayRef),
            ],
        );
        let table = concat_tables(&[a, b], &ConcatOptions::default()).unwrap();
        assert_eq!(table.column_names(), vec!["id", "x", "y"]);
        assert_eq!(table.num_rows(), 3);
        assert_eq!(table.scalar(2, 1), Scalar::Null);
        assert_eq!(table.scalar(0, 2), Scalar::Null);
        assert_eq!(table.data_type("x").unwrap(), DataType::Int64);
    }

    #[test]
    fn test_type_unification() {
        let a = loaded("a.csv", vec![("v", Arc::new(Int64Array::from(vec![1])) as ArrayRef)]);
        let b = loaded("b.csv", vec![("v", Arc::new(Float64Array::from(vec![2.5])) as ArrayRef)]);
        let c = loaded("c.csv", vec![("v", Arc::new(StringArray::from(vec!["x"])) as ArrayRef)]);

        let numeric = concat_tables(&[a.clone(), b.clone()], &ConcatOptions::default()).unwrap();
        assert_eq!(numeric.data_type("v").unwrap(), DataType::Float64);

        let mixed = concat_tables(&[a, b, c], &ConcatOptions::default()).unwrap();
        assert_eq!(mixed.data_type("v").unwrap(), DataType::Utf8);
        assert_eq!(mixed.scalar(0, 0), Scalar::Text("1".into()));
        assert_eq!(mixed.scalar(1, 0), Scalar::Text("2.5".into()));
    }

    #[test]
    fn test_all_null_column_does_not_force_text() {
        let a = loaded("a.csv", vec![("v", Arc::new(Int64Array::from(vec![1])) as ArrayRef)]);
        let b = loaded(
            "b.csv",
            vec![("v", Arc::new(StringArray::from(vec![None::<&str>])) as ArrayRef)],
        );
        let table = concat_tables(&[a, b], &ConcatOptions::default()).unwrap();
        assert_eq!(table.data_type("v").unwrap(), DataType::Int64);
        assert_eq!(table.scalar(1, 0), Scalar::Null);
    }

    #[test]
    fn test_source_column() {
        let a = loaded("a.csv", vec![("v", Arc::new(Int64Array::from(vec![1, 2])) as ArrayRef)]);
        let b = loaded("b.csv", vec![("v", Arc::new(Int64Array::from(vec![3])) as ArrayRef)]);
        let options = ConcatOptions { source_column: Some("source".into()) };
        let table = concat_tables(&[a, b], &options).unwrap();
        assert_eq!(table.column_names(), vec!["v", "source"]);
        assert_eq!(table.scalar(2, 1), Scalar::Text("b.csv".into()));

        let clash = ConcatOptions { source_column: Some("v".into()) };
        let a = loaded("a.csv", vec![("v", Arc::new(Int64Array::from(vec![1])) as ArrayRef)]);
        assert!(concat_tables(&[a], &clash).is_err());
    }

    #[test]
    fn test_no_inputs() {
        assert!(concat_tables(&[], &ConcatOptions::default()).is_err());
    }
}
