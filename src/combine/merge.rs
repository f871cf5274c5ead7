use crate::config::{JoinType, KeyCase, MergeSpec};
use crate::error::{CleanerError, CleanerResult};
use crate::ingestion::LoadedTable;
use crate::table::{coerce_column, unify_types, Scalar, Table};
use arrow::array::{Array, ArrayRef, StringArray, UInt32Array};
use arrow::datatypes::DataType;
use bitvec::prelude::*;
use fxhash::FxHashMap;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

/// How one key pair is compared
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum KeyMode {
    /// Both sides share a type
    Exact,
    /// Int64 against Float64
    Numeric,
    /// Any other mix compares displayed text
    Text,
}

impl KeyMode {
    fn for_pair(left: &DataType, right: &DataType) -> Self {
        match (left, right) {
            (l, r) if l == r => KeyMode::Exact,
            (DataType::Int64, DataType::Float64) | (DataType::Float64, DataType::Int64) => {
                KeyMode::Numeric
            }
            _ => KeyMode::Text,
        }
    }

    fn cell(self, array: &dyn Array, row: usize) -> Scalar {
        match Scalar::from_array(array, row) {
            Scalar::Null => Scalar::Null,
            cell => match self {
                KeyMode::Exact => cell,
                KeyMode::Numeric => cell.as_f64().map(Scalar::float).unwrap_or(Scalar::Null),
                KeyMode::Text => Scalar::Text(cell.to_string()),
            },
        }
    }
}

/// Key columns of one side of a join
struct KeySide<'a> {
    arrays: Vec<&'a ArrayRef>,
    modes: &'a [KeyMode],
}

impl KeySide<'_> {
    /// Composite key of a row, `None` when any part is null
    fn key(&self, row: usize) -> Option<Vec<Scalar>> {
        let key: Vec<Scalar> = self
            .arrays
            .iter()
            .zip(self.modes)
            .map(|(array, mode)| mode.cell(array.as_ref(), row))
            .collect();
        if key.iter().any(Scalar::is_null) {
            None
        } else {
            Some(key)
        }
    }

    /// Row positions per key, in row order
    fn index(&self, rows: usize) -> FxHashMap<Vec<Scalar>, Vec<u32>> {
        let mut index: FxHashMap<Vec<Scalar>, Vec<u32>> = FxHashMap::default();
        for row in 0..rows {
            if let Some(key) = self.key(row) {
                index.entry(key).or_default().push(row as u32);
            }
        }
        index
    }
}

/// Join tables on key columns, folding left to right
pub fn merge_tables(inputs: &[LoadedTable], spec: &MergeSpec) -> CleanerResult<Table> {
    if inputs.len() < 2 {
        return Err(CleanerError::invalid_option_named(
            format!("merging needs at least two tables, got {}", inputs.len()),
            "files",
        ));
    }
    let keys = resolve_keys(inputs.len(), &spec.keys)?;
    let suffixes = resolve_suffixes(inputs, spec.suffixes.as_deref())?;

    let prepared = inputs
        .iter()
        .zip(&keys)
        .map(|(input, table_keys)| {
            for key in table_keys {
                input
                    .table
                    .column(key)
                    .map_err(|e| e.with_context(input.name.clone()))?;
            }
            if spec.normalizes_keys() {
                normalize_keys(&input.table, table_keys, spec.key_case, spec.trim_keys)
            } else {
                Ok(input.table.clone())
            }
        })
        .collect::<CleanerResult<Vec<Table>>>()?;

    let mut merged = prepared[0].clone();
    for i in 1..prepared.len() {
        merged = join_pair(&merged, &keys[0], &prepared[i], &keys[i], spec.how, &suffixes[i])?;
        debug!(
            with = %inputs[i].name,
            rows = merged.num_rows(),
            columns = merged.num_columns(),
            "merged table"
        );
    }

    info!(
        "merged {} tables ({:?} join): {} rows, {} columns",
        inputs.len(),
        spec.how,
        merged.num_rows(),
        merged.num_columns()
    );
    Ok(merged)
}

/// One key list shared by all tables, or one per table
fn resolve_keys(tables: usize, keys: &[Vec<String>]) -> CleanerResult<Vec<Vec<String>>> {
    let per_table: Vec<Vec<String>> = match keys.len() {
        0 => {
            return Err(CleanerError::invalid_option_named("no merge keys given", "keys"));
        }
        1 => vec![keys[0].clone(); tables],
        n if n == tables => keys.to_vec(),
        n => {
            return Err(CleanerError::invalid_option_named(
                format!("got {} key lists for {} tables", n, tables),
                "keys",
            ));
        }
    };
    let width = per_table[0].len();
    if width == 0 {
        return Err(CleanerError::invalid_option_named("empty key list", "keys"));
    }
    if per_table.iter().any(|k| k.len() != width) {
        return Err(CleanerError::invalid_option_named(
            "every table needs the same number of key columns",
            "keys",
        ));
    }
    Ok(per_table)
}

fn resolve_suffixes(inputs: &[LoadedTable], suffixes: Option<&[String]>) -> CleanerResult<Vec<String>> {
    match suffixes {
        Some(given) if given.len() == inputs.len() => Ok(given.to_vec()),
        Some(given) => Err(CleanerError::invalid_option_named(
            format!("got {} suffixes for {} tables", given.len(), inputs.len()),
            "suffixes",
        )),
        None => Ok(inputs.iter().map(|t| t.stem().to_string()).collect()),
    }
}

/// Rewrite key columns as trimmed and case-folded text
fn normalize_keys(table: &Table, keys: &[String], case: KeyCase, trim: bool) -> CleanerResult<Table> {
    let columns = table
        .columns()
        .into_iter()
        .map(|(name, array)| {
            if !keys.contains(&name) {
                return (name, array);
            }
            let values: Vec<Option<String>> = (0..array.len())
                .map(|row| match Scalar::from_array(array.as_ref(), row) {
                    Scalar::Null => None,
                    cell => {
                        let text = cell.to_string();
                        let text = if trim { text.trim().to_string() } else { text };
                        Some(match case {
                            KeyCase::AsIs => text,
                            KeyCase::Lower => text.to_lowercase(),
                            KeyCase::Upper => text.to_uppercase(),
                        })
                    }
                })
                .collect();
            (name, Arc::new(StringArray::from(values)) as ArrayRef)
        })
        .collect();
    Table::from_columns_with_rows(columns, table.num_rows())
}

/// Matched row pairs; `None` marks the missing side of an unmatched row
fn match_rows(
    left: &KeySide<'_>,
    left_rows: usize,
    right: &KeySide<'_>,
    right_rows: usize,
    how: JoinType,
) -> Vec<(Option<u32>, Option<u32>)> {
    let mut pairs = Vec::new();
    if how == JoinType::Right {
        let index = left.index(left_rows);
        for r in 0..right_rows {
            match right.key(r).and_then(|key| index.get(&key)) {
                Some(matches) => pairs.extend(matches.iter().map(|&l| (Some(l), Some(r as u32)))),
                None => pairs.push((None, Some(r as u32))),
            }
        }
        return pairs;
    }

    let index = right.index(right_rows);
    let mut matched = bitvec![0; right_rows];
    for l in 0..left_rows {
        match left.key(l).and_then(|key| index.get(&key)) {
            Some(matches) => {
                for &r in matches {
                    matched.set(r as usize, true);
                    pairs.push((Some(l as u32), Some(r)));
                }
            }
            None if how != JoinType::Inner => pairs.push((Some(l as u32), None)),
            None => {}
        }
    }
    if how == JoinType::Outer {
        pairs.extend(matched.iter_zeros().map(|r| (None, Some(r as u32))));
    }
    pairs
}

/// Left value where present, right value otherwise
fn coalesce(left: &ArrayRef, right: &ArrayRef) -> CleanerResult<ArrayRef> {
    let target = unify_types(left.data_type(), right.data_type());
    let left = coerce_column(left, &target)?;
    let right = coerce_column(right, &target)?;
    let mask = arrow::compute::is_not_null(left.as_ref())?;
    Ok(arrow::compute::kernels::zip::zip(&mask, &left, &right)?)
}

fn suffixed_name(name: &str, suffix: &str, taken: &HashSet<String>) -> String {
    let base = format!("{}_{}", name, suffix);
    let mut candidate = base.clone();
    let mut k = 2;
    while taken.contains(&candidate) {
        candidate = format!("{}_{}", base, k);
        k += 1;
    }
    candidate
}

fn join_pair(
    left: &Table,
    left_keys: &[String],
    right: &Table,
    right_keys: &[String],
    how: JoinType,
    suffix: &str,
) -> CleanerResult<Table> {
    let left_arrays = left_keys
        .iter()
        .map(|k| left.column(k))
        .collect::<CleanerResult<Vec<_>>>()?;
    let right_arrays = right_keys
        .iter()
        .map(|k| right.column(k))
        .collect::<CleanerResult<Vec<_>>>()?;
    let modes: Vec<KeyMode> = left_arrays
        .iter()
        .zip(&right_arrays)
        .map(|(l, r)| KeyMode::for_pair(l.data_type(), r.data_type()))
        .collect();

    let pairs = match_rows(
        &KeySide { arrays: left_arrays, modes: &modes },
        left.num_rows(),
        &KeySide { arrays: right_arrays, modes: &modes },
        right.num_rows(),
        how,
    );
    let left_indices: UInt32Array = pairs.iter().map(|(l, _)| *l).collect();
    let right_indices: UInt32Array = pairs.iter().map(|(_, r)| *r).collect();
    let left_rows = left.take_rows(&left_indices)?;
    let right_rows = right.take_rows(&right_indices)?;

    // right key name -> left key name it collapses into
    let shared: FxHashMap<&str, &str> = left_keys
        .iter()
        .zip(right_keys)
        .filter(|(l, r)| l == r)
        .map(|(l, r)| (r.as_str(), l.as_str()))
        .collect();

    let mut columns: Vec<(String, ArrayRef)> = Vec::new();
    for (name, array) in left_rows.columns() {
        let array = if shared.values().any(|l| *l == name) {
            coalesce(&array, right_rows.column(&name)?)?
        } else {
            array
        };
        columns.push((name, array));
    }

    let mut taken: HashSet<String> = columns.iter().map(|(n, _)| n.clone()).collect();
    for (name, array) in right_rows.columns() {
        if shared.contains_key(name.as_str()) {
            continue;
        }
        let name = if taken.contains(&name) {
            suffixed_name(&name, suffix, &taken)
        } else {
            name
        };
        taken.insert(name.clone());
        columns.push((name, array));
    }

    Table::from_columns_with_rows(columns, pairs.len())
}
