use derive_more::Display;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::types::{Error, Result};

/// The values extracted from a [Row] for a fixed sequence of key columns.
/// Grouping, sorting and joining all compare rows through this tuple.
pub type Key = SmallVec<[Value; 2]>;

/// A dynamically typed column value.
///
/// Values carry a total order so key tuples can be sorted and merged:
/// kinds rank null < bool < numbers < strings < lists, numbers compare
/// numerically across Int/Float, and floats use a total order.  Equality is
/// consistent with that order, so `Int(1)` equals `Float(1.0)`.
#[derive(Clone, Debug, Display, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[display("null")]
    Null,
    #[display("{_0}")]
    Bool(bool),
    #[display("{_0}")]
    Int(i64),
    #[display("{_0}")]
    Float(f64),
    #[display("{_0:?}")]
    Str(String),
    #[display("{_0:?}")]
    List(Vec<Value>),
}

impl Value {
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::List(_) => "list",
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Int(_) | Value::Float(_) => 2,
            Value::Str(_) => 3,
            Value::List(_) => 4,
        }
    }

    /// Numeric view; `None` for non-numeric kinds.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Null, false, zero, the empty string and the empty list are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::List(l) => !l.is_empty(),
        }
    }

    /// Numeric addition.  Int + Int stays Int and errors on overflow; a
    /// Float operand makes the result Float.
    pub fn checked_add(&self, other: &Value) -> Result<Value> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a
                .checked_add(*b)
                .map(Value::Int)
                .ok_or_else(|| Error::Type(format!("overflow adding {a} and {b}"))),
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => Ok(Value::Float(x + y)),
                _ => Err(Error::Type(format!("cannot add {a} and {b}"))),
            },
        }
    }

    /// Numeric multiplication with the same kind rules as [Value::checked_add].
    pub fn checked_mul(&self, other: &Value) -> Result<Value> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a
                .checked_mul(*b)
                .map(Value::Int)
                .ok_or_else(|| Error::Type(format!("overflow multiplying {a} and {b}"))),
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => Ok(Value::Float(x * y)),
                _ => Err(Error::Type(format!("cannot multiply {a} and {b}"))),
            },
        }
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        use Value::*;
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Int(a), Int(b)) => a.cmp(b),
            (Float(a), Float(b)) => OrderedFloat(*a).cmp(&OrderedFloat(*b)),
            (Int(a), Float(b)) => OrderedFloat(*a as f64).cmp(&OrderedFloat(*b)),
            (Float(a), Int(b)) => OrderedFloat(*a).cmp(&OrderedFloat(*b as f64)),
            (Str(a), Str(b)) => a.cmp(b),
            (List(a), List(b)) => a.cmp(b),
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

/// An unordered mapping from column name to [Value].  Rows carry no schema;
/// columns may be absent.  Equality is by column set and per-column value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    columns: BTreeMap<String, Value>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns.get(column)
    }

    /// Like [Row::get] but a missing column is an error.
    pub fn require(&self, column: &str) -> Result<&Value> {
        self.columns
            .get(column)
            .ok_or_else(|| Error::KeyMissing(column.to_string()))
    }

    pub fn str(&self, column: &str) -> Result<&str> {
        match self.require(column)? {
            Value::Str(text) => Ok(text),
            other => Err(Error::Type(format!(
                "column {column:?} holds {other}, not a string"
            ))),
        }
    }

    pub fn i64(&self, column: &str) -> Result<i64> {
        match self.require(column)? {
            Value::Int(i) => Ok(*i),
            other => Err(Error::Type(format!(
                "column {column:?} holds {other}, not an integer"
            ))),
        }
    }

    /// Numeric view of a column; accepts Int as well as Float.
    pub fn f64(&self, column: &str) -> Result<f64> {
        let value = self.require(column)?;
        value.as_f64().ok_or_else(|| {
            Error::Type(format!("column {column:?} holds {value}, not a number"))
        })
    }

    pub fn list(&self, column: &str) -> Result<&[Value]> {
        match self.require(column)? {
            Value::List(items) => Ok(items),
            other => Err(Error::Type(format!(
                "column {column:?} holds {other}, not a list"
            ))),
        }
    }

    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.columns.insert(column.into(), value.into());
    }

    /// Builder-style [Row::set].
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(column, value);
        self
    }

    pub fn remove(&mut self, column: &str) -> Option<Value> {
        self.columns.remove(column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.columns.iter()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Extracts the values of `keys`, in order.  Missing key columns are an
    /// error.
    pub fn key_tuple(&self, keys: &[String]) -> Result<Key> {
        keys.iter().map(|key| self.require(key).cloned()).collect()
    }

    /// Parses one JSON object, e.g. a line of a JSON-lines file.  This is
    /// the parser the examples pass to [from_file](crate::Graph::from_file);
    /// the engine itself accepts any `Fn(&str) -> Result<Row>`.
    pub fn from_json_str(line: &str) -> Result<Row> {
        serde_json::from_str(line).map_err(|err| Error::Parse {
            line: 0,
            message: err.to_string(),
        })
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Row {
            columns: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    fn row(value: serde_json::Value) -> Row {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn value_order_ranks_kinds() {
        let mut values = vec![
            Value::from("abc"),
            Value::from(2.5),
            Value::Null,
            Value::from(false),
            Value::from(3i64),
        ];
        values.sort();
        assert_eq!(values[0], Value::Null);
        assert_eq!(values[1], Value::from(false));
        assert_eq!(values[2], Value::from(2.5));
        assert_eq!(values[3], Value::from(3i64));
        assert_eq!(values[4], Value::from("abc"));
    }

    #[test]
    fn numbers_compare_across_kinds() {
        assert_eq!(Value::from(1i64), Value::from(1.0));
        assert!(Value::from(1i64) < Value::from(1.5));
        assert!(Value::from(2.5) < Value::from(3i64));
    }

    #[test]
    fn nulls_are_equal_and_minimal() {
        assert_eq!(Value::Null, Value::Null);
        assert!(Value::Null < Value::from(0i64));
        assert!(Value::Null < Value::from(""));
    }

    #[test]
    fn truthiness_matches_emptiness() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::from(0i64).is_truthy());
        assert!(!Value::from(0.0).is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(!Value::List(vec![]).is_truthy());
        assert!(Value::from(-1i64).is_truthy());
        assert!(Value::from("x").is_truthy());
    }

    #[test]
    fn arithmetic_keeps_ints_until_a_float_appears() {
        let six = Value::from(2i64).checked_mul(&Value::from(3i64)).unwrap();
        assert_eq!(six, Value::Int(6));
        let seven = six.checked_add(&Value::from(1.0)).unwrap();
        assert_eq!(seven, Value::Float(7.0));
        assert!(Value::from("a").checked_add(&Value::from(1i64)).is_err());
    }

    #[test]
    fn int_overflow_is_an_error_not_a_wrap() {
        let max = Value::from(i64::MAX);
        assert!(matches!(
            max.checked_add(&Value::from(1i64)),
            Err(Error::Type(_))
        ));
        assert!(matches!(
            max.checked_mul(&Value::from(2i64)),
            Err(Error::Type(_))
        ));
        // floats still mix in fine
        assert!(max.checked_add(&Value::from(1.0)).is_ok());
    }

    #[test]
    fn row_round_trips_through_json() {
        let line = r#"{"doc_id": 1, "text": "hello", "coords": [37.5, 55.8], "flag": true, "gap": null}"#;
        let parsed = Row::from_json_str(line).unwrap();
        assert_eq!(parsed.i64("doc_id").unwrap(), 1);
        assert_eq!(parsed.str("text").unwrap(), "hello");
        assert_eq!(parsed.list("coords").unwrap().len(), 2);
        assert_eq!(parsed.get("gap"), Some(&Value::Null));
        let encoded = serde_json::to_string(&parsed).unwrap();
        assert_eq!(Row::from_json_str(&encoded).unwrap(), parsed);
    }

    #[test]
    fn key_tuple_reports_missing_columns() {
        let r = row(serde_json::json!({"a": 1}));
        let keys = vec!["a".to_string(), "b".to_string()];
        match r.key_tuple(&keys) {
            Err(Error::KeyMissing(column)) => assert_eq!(column, "b"),
            other => panic!("expected KeyMissing, got {other:?}"),
        }
    }

    #[test]
    fn rows_compare_by_columns_and_values() {
        let a = row(serde_json::json!({"x": 1, "y": "z"}));
        let b = Row::new().with("y", "z").with("x", 1i64);
        assert_eq!(a, b);
        assert_ne!(a, b.clone().with("x", 2i64));
    }
}
