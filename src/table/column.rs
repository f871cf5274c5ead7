//! Column building: type inference from raw cells and type coercion

use crate::error::{CleanerError, CleanerResult};
use crate::table::scalar::Scalar;
use arrow::array::*;
use arrow::datatypes::DataType;
use std::collections::HashSet;
use std::sync::Arc;

/// Inferred kind of a column, widened as cells are seen
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Kind {
    Empty,
    Int,
    Float,
    Bool,
    Text,
}

impl Kind {
    fn widen(self, cell: &Scalar) -> Kind {
        match (self, cell) {
            (kind, Scalar::Null) => kind,
            (Kind::Empty, Scalar::Int(_)) | (Kind::Int, Scalar::Int(_)) => Kind::Int,
            (Kind::Empty, Scalar::Float(_))
            | (Kind::Int, Scalar::Float(_))
            | (Kind::Float, Scalar::Int(_))
            | (Kind::Float, Scalar::Float(_)) => Kind::Float,
            (Kind::Empty, Scalar::Bool(_)) | (Kind::Bool, Scalar::Bool(_)) => Kind::Bool,
            _ => Kind::Text,
        }
    }

    fn of(cells: &[Scalar]) -> Kind {
        cells.iter().fold(Kind::Empty, |kind, cell| kind.widen(cell))
    }
}

fn int_array(cells: &[Scalar]) -> ArrayRef {
    let values: Vec<Option<i64>> = cells
        .iter()
        .map(|c| match c {
            Scalar::Int(v) => Some(*v),
            _ => None,
        })
        .collect();
    Arc::new(Int64Array::from(values))
}

fn float_array(cells: &[Scalar]) -> ArrayRef {
    let values: Vec<Option<f64>> = cells.iter().map(|c| c.as_f64()).collect();
    Arc::new(Float64Array::from(values))
}

fn bool_array(cells: &[Scalar]) -> ArrayRef {
    let values: Vec<Option<bool>> = cells
        .iter()
        .map(|c| match c {
            Scalar::Bool(b) => Some(*b),
            _ => None,
        })
        .collect();
    Arc::new(BooleanArray::from(values))
}

/// Build a column from raw text cells.
///
/// Tries Int64, then Float64, then Boolean; otherwise keeps the original
/// text (untrimmed) with null tokens mapped to null.
pub fn infer_text_column(cells: Vec<Option<String>>) -> ArrayRef {
    let parsed: Vec<Scalar> = cells
        .iter()
        .map(|c| c.as_deref().map(Scalar::parse).unwrap_or(Scalar::Null))
        .collect();

    match Kind::of(&parsed) {
        Kind::Int => int_array(&parsed),
        Kind::Float => float_array(&parsed),
        Kind::Bool => bool_array(&parsed),
        Kind::Empty | Kind::Text => {
            let values: Vec<Option<String>> = cells
                .into_iter()
                .zip(parsed.iter())
                .map(|(raw, scalar)| if scalar.is_null() { None } else { raw })
                .collect();
            Arc::new(StringArray::from(values))
        }
    }
}

/// Build a column from already-typed cells, unifying their kinds
pub fn build_scalar_column(cells: &[Scalar]) -> ArrayRef {
    match Kind::of(cells) {
        Kind::Int => int_array(cells),
        Kind::Float => float_array(cells),
        Kind::Bool => bool_array(cells),
        Kind::Empty | Kind::Text => {
            let values: Vec<Option<String>> = cells
                .iter()
                .map(|c| if c.is_null() { None } else { Some(c.to_string()) })
                .collect();
            Arc::new(StringArray::from(values))
        }
    }
}

/// Common type two columns are stacked into
pub fn unify_types(a: &DataType, b: &DataType) -> DataType {
    match (a, b) {
        (x, y) if x == y => x.clone(),
        (DataType::Int64, DataType::Float64) | (DataType::Float64, DataType::Int64) => {
            DataType::Float64
        }
        _ => DataType::Utf8,
    }
}

/// Convert a column to `target` (Int64 -> Float64, anything -> Utf8).
///
/// A column with no values converts to any type as all nulls.
pub fn coerce_column(array: &ArrayRef, target: &DataType) -> CleanerResult<ArrayRef> {
    if array.data_type() == target {
        return Ok(array.clone());
    }
    if array.null_count() == array.len() {
        return Ok(new_null_array(target, array.len()));
    }
    match (array.data_type(), target) {
        (DataType::Int64, DataType::Float64) => {
            Ok(arrow::compute::cast(array.as_ref(), &DataType::Float64)?)
        }
        (_, DataType::Utf8) => {
            let values: Vec<Option<String>> = (0..array.len())
                .map(|i| {
                    let cell = Scalar::from_array(array.as_ref(), i);
                    if cell.is_null() {
                        None
                    } else {
                        Some(cell.to_string())
                    }
                })
                .collect();
            Ok(Arc::new(StringArray::from(values)))
        }
        (from, to) => Err(CleanerError::internal(format!(
            "cannot coerce {:?} column to {:?}",
            from, to
        ))),
    }
}

/// Read every cell of a column as scalars
pub fn column_scalars(array: &dyn Array) -> Vec<Scalar> {
    (0..array.len()).map(|i| Scalar::from_array(array, i)).collect()
}

/// Make header names usable as unique column names.
///
/// Blank names become `Unnamed: {i}`; repeats get `.1`, `.2`, ... suffixes.
pub fn dedupe_headers(raw: Vec<Option<String>>) -> Vec<String> {
    let named: Vec<String> = raw
        .into_iter()
        .enumerate()
        .map(|(i, name)| match name {
            Some(n) if !n.trim().is_empty() => n.trim().to_string(),
            _ => format!("Unnamed: {}", i),
        })
        .collect();
    make_unique(named, &HashSet::new())
}

/// Rename repeats (and names in `reserved`) to `{name}.{k}` with the smallest free k
pub fn make_unique(names: Vec<String>, reserved: &HashSet<String>) -> Vec<String> {
    let mut taken: HashSet<String> = reserved.clone();
    let all: HashSet<String> = names.iter().cloned().collect();
    let mut out = Vec::with_capacity(names.len());
    for name in names {
        if taken.insert(name.clone()) {
            out.push(name);
            continue;
        }
        let mut k = 1;
        loop {
            let candidate = format!("{}.{}", name, k);
            if !all.contains(&candidate) && taken.insert(candidate.clone()) {
                out.push(candidate);
                break;
            }
            k += 1;
        }
    }
    out
}
