//! Scalar cell values extracted from Arrow arrays
//!
//! Used wherever individual cells must be compared, hashed or rendered:
//! sort keys for pivot groups, join keys, text filters and export.

use arrow::array::{Array, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::DataType;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Text tokens read as missing values
pub const NULL_TOKENS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "null", "NULL", "None", "#N/A", "<NA>", "#NA",
];

/// A single cell value
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(OrderedFloat<f64>),
    Text(String),
}

impl Scalar {
    pub fn float(value: f64) -> Self {
        Scalar::Float(OrderedFloat(value))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// Numeric view of the value (Int and Float only)
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int(v) => Some(*v as f64),
            Scalar::Float(v) => Some(v.0),
            _ => None,
        }
    }

    /// Parse a raw text cell: null tokens, then i64, then f64, then bool, else text
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if NULL_TOKENS.contains(&trimmed) {
            return Scalar::Null;
        }
        if let Ok(i) = trimmed.parse::<i64>() {
            return Scalar::Int(i);
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            return Scalar::float(f);
        }
        if trimmed.eq_ignore_ascii_case("true") {
            return Scalar::Bool(true);
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return Scalar::Bool(false);
        }
        Scalar::Text(raw.to_string())
    }

    /// Read the value at `idx` of a column
    pub fn from_array(array: &dyn Array, idx: usize) -> Self {
        if array.is_null(idx) {
            return Scalar::Null;
        }
        match array.data_type() {
            DataType::Int64 => array
                .as_any()
                .downcast_ref::<Int64Array>()
                .map(|arr| Scalar::Int(arr.value(idx)))
                .unwrap_or(Scalar::Null),
            DataType::Float64 => array
                .as_any()
                .downcast_ref::<Float64Array>()
                .map(|arr| Scalar::float(arr.value(idx)))
                .unwrap_or(Scalar::Null),
            DataType::Boolean => array
                .as_any()
                .downcast_ref::<BooleanArray>()
                .map(|arr| Scalar::Bool(arr.value(idx)))
                .unwrap_or(Scalar::Null),
            DataType::Utf8 => array
                .as_any()
                .downcast_ref::<StringArray>()
                .map(|arr| Scalar::Text(arr.value(idx).to_string()))
                .unwrap_or(Scalar::Null),
            _ => Scalar::Null,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Scalar::Bool(_) => 0,
            Scalar::Int(_) | Scalar::Float(_) => 1,
            Scalar::Text(_) => 2,
            Scalar::Null => 3,
        }
    }
}

impl Ord for Scalar {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Scalar::Bool(a), Scalar::Bool(b)) => a.cmp(b),
            (Scalar::Int(a), Scalar::Int(b)) => a.cmp(b),
            (Scalar::Float(a), Scalar::Float(b)) => a.cmp(b),
            (Scalar::Int(a), Scalar::Float(b)) => {
                OrderedFloat(*a as f64).cmp(b).then(Ordering::Less)
            }
            (Scalar::Float(a), Scalar::Int(b)) => {
                a.cmp(&OrderedFloat(*b as f64)).then(Ordering::Greater)
            }
            (Scalar::Text(a), Scalar::Text(b)) => a.cmp(b),
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }
}

impl PartialOrd for Scalar {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Render a float the way it is written back to CSV: integral values keep one decimal
pub fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => Ok(()),
            Scalar::Bool(b) => write!(f, "{}", if *b { "True" } else { "False" }),
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::Float(v) => f.write_str(&format_float(v.0)),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cells() {
        assert_eq!(Scalar::parse(" 42 "), Scalar::Int(42));
        assert_eq!(Scalar::parse("3.5"), Scalar::float(3.5));
        assert_eq!(Scalar::parse("N/A"), Scalar::Null);
        assert_eq!(Scalar::parse(""), Scalar::Null);
        assert_eq!(Scalar::parse("TRUE"), Scalar::Bool(true));
        assert_eq!(Scalar::parse(" hello "), Scalar::Text(" hello ".to_string()));
    }

    #[test]
    fn test_ordering_mixes_numbers_and_puts_null_last() {
        let mut values = vec![
            Scalar::Null,
            Scalar::Text("b".into()),
            Scalar::float(1.5),
            Scalar::Int(1),
            Scalar::Int(2),
            Scalar::Bool(true),
        ];
        values.sort();
        assert_eq!(
            values,
            vec![
                Scalar::Bool(true),
                Scalar::Int(1),
                Scalar::float(1.5),
                Scalar::Int(2),
                Scalar::Text("b".into()),
                Scalar::Null,
            ]
        );
    }

    #[test]
    fn test_equal_int_and_float_are_ordered_not_equal() {
        assert_eq!(Scalar::Int(1).cmp(&Scalar::float(1.0)), Ordering::Less);
        assert_eq!(Scalar::float(1.0).cmp(&Scalar::Int(1)), Ordering::Greater);
    }

    #[test]
    fn test_display() {
        assert_eq!(Scalar::float(3.0).to_string(), "3.0");
        assert_eq!(Scalar::float(0.25).to_string(), "0.25");
        assert_eq!(Scalar::Null.to_string(), "");
        assert_eq!(Scalar::Bool(false).to_string(), "False");
    }
}
