use crate::config::{AggFunc, PivotSpec};
use crate::error::{CleanerError, CleanerResult};
use crate::table::column::{build_scalar_column, make_unique};
use crate::table::{Scalar, Table};
use arrow::array::ArrayRef;
use fxhash::FxHashMap;
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Cells of one pivot group, bucketed by column key
type GroupCells = FxHashMap<Scalar, Vec<Scalar>>;

/// Aggregate one cell's values; nulls are ignored
pub fn aggregate(values: &[Scalar], func: AggFunc) -> Scalar {
    let present: Vec<&Scalar> = values.iter().filter(|v| !v.is_null()).collect();
    if func == AggFunc::Count {
        return Scalar::Int(present.len() as i64);
    }
    if present.is_empty() {
        return Scalar::Null;
    }

    match func {
        AggFunc::First => present[0].clone(),
        AggFunc::Last => present[present.len() - 1].clone(),
        AggFunc::Min => present.iter().min().map(|v| (*v).clone()).unwrap_or(Scalar::Null),
        AggFunc::Max => present.iter().max().map(|v| (*v).clone()).unwrap_or(Scalar::Null),
        AggFunc::Sum => {
            let all_int = present.iter().all(|v| matches!(v, Scalar::Int(_)));
            if all_int {
                let total = present.iter().try_fold(0i64, |acc, v| match v {
                    Scalar::Int(i) => acc.checked_add(*i),
                    _ => None,
                });
                if let Some(total) = total {
                    return Scalar::Int(total);
                }
            }
            Scalar::float(present.iter().filter_map(|v| v.as_f64()).sum())
        }
        AggFunc::Mean => {
            let nums: Vec<f64> = present.iter().filter_map(|v| v.as_f64()).collect();
            Scalar::float(nums.iter().sum::<f64>() / nums.len() as f64)
        }
        AggFunc::Median => {
            let mut nums: Vec<f64> = present.iter().filter_map(|v| v.as_f64()).collect();
            nums.sort_by(|a, b| a.total_cmp(b));
            let mid = nums.len() / 2;
            if nums.len() % 2 == 0 {
                Scalar::float((nums[mid - 1] + nums[mid]) / 2.0)
            } else {
                Scalar::float(nums[mid])
            }
        }
        AggFunc::Count => Scalar::Int(present.len() as i64),
    }
}

fn fill_scalar(value: f64) -> Scalar {
    if value.fract() == 0.0 && value.abs() < 9.0e15 {
        Scalar::Int(value as i64)
    } else {
        Scalar::float(value)
    }
}

impl Table {
    /// Pivot table: one row per distinct index tuple, one column per distinct
    /// value of `spec.columns` (or a single column named after `spec.values`)
    pub fn pivot(&self, spec: &PivotSpec) -> CleanerResult<Table> {
        if spec.index.is_empty() {
            return Err(CleanerError::invalid_option_named(
                "pivot needs at least one index column",
                "pivot.index",
            ));
        }
        let index_arrays = spec
            .index
            .iter()
            .map(|name| self.column(name))
            .collect::<CleanerResult<Vec<_>>>()?;
        let column_array = spec.columns.as_ref().map(|c| self.column(c)).transpose()?;
        let values = self.column(&spec.values)?;
        if spec.aggfunc.requires_numeric() && !self.is_numeric(&spec.values)? {
            return Err(CleanerError::type_mismatch(
                format!("{:?} needs a numeric values column, '{}' is not", spec.aggfunc, spec.values),
                spec.values.clone(),
            ));
        }

        let default_key = Scalar::Text(spec.values.clone());
        let mut groups: BTreeMap<Vec<Scalar>, GroupCells> = BTreeMap::new();
        let mut column_keys: BTreeSet<Scalar> = BTreeSet::new();
        let mut dropped = 0usize;

        for row in 0..self.num_rows() {
            let key: Vec<Scalar> = index_arrays
                .iter()
                .map(|array| Scalar::from_array(array.as_ref(), row))
                .collect();
            if key.iter().any(Scalar::is_null) {
                dropped += 1;
                continue;
            }
            let column_key = match column_array {
                Some(array) => {
                    let cell = Scalar::from_array(array.as_ref(), row);
                    if cell.is_null() {
                        dropped += 1;
                        continue;
                    }
                    cell
                }
                None => default_key.clone(),
            };
            column_keys.insert(column_key.clone());
            groups
                .entry(key)
                .or_default()
                .entry(column_key)
                .or_default()
                .push(Scalar::from_array(values.as_ref(), row));
        }
        if dropped > 0 {
            tracing::warn!(dropped, "pivot dropped rows with null keys");
        }

        let column_keys: Vec<Scalar> = if spec.columns.is_some() {
            column_keys.into_iter().collect()
        } else {
            vec![default_key]
        };

        let mut names: Vec<String> = spec.index.clone();
        names.extend(column_keys.iter().map(|k| k.to_string()));
        let names = make_unique(names, &HashSet::new());

        let mut arrays: Vec<ArrayRef> = Vec::with_capacity(names.len());
        for i in 0..spec.index.len() {
            let cells: Vec<Scalar> = groups.keys().map(|key| key[i].clone()).collect();
            arrays.push(build_scalar_column(&cells));
        }
        for column_key in &column_keys {
            let cells: Vec<Scalar> = groups
                .values()
                .map(|group| {
                    let cell = group
                        .get(column_key)
                        .map(|vals| aggregate(vals, spec.aggfunc))
                        .unwrap_or(Scalar::Null);
                    match (cell, spec.fill_value) {
                        (Scalar::Null, Some(fill)) => fill_scalar(fill),
                        (cell, _) => cell,
                    }
                })
                .collect();
            arrays.push(build_scalar_column(&cells));
        }

        tracing::debug!(groups = groups.len(), columns = column_keys.len(), "pivot built");
        Table::from_columns_with_rows(names.into_iter().zip(arrays).collect(), groups.len())
    }
}
