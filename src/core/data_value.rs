//! Dynamically typed scalar values
//!
//! [`Value`] is the element type used at the edges of the engine: vector
//! construction, element access, aggregation results and `to_values()`
//! materialization for writers.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

use crate::core::dtype::Dtype;
use crate::na;

/// A single element of any dtype, or a missing value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing value
    Na,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Date(NaiveDate),
    Datetime(NaiveDateTime),
    #[serde(serialize_with = "serialize_timedelta")]
    Timedelta(TimeDelta),
    /// Nested sequence, stored in object vectors
    List(Vec<Value>),
}

fn serialize_timedelta<S: Serializer>(delta: &TimeDelta, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_i64(na::timedelta_to_micros(*delta))
}

impl Value {
    /// Whether the value is missing: `Na`, a `NaN` float or an empty string
    pub fn is_na(&self) -> bool {
        match self {
            Value::Na => true,
            Value::Float(x) => na::is_na_float(*x),
            Value::String(s) => na::is_na_string(s),
            _ => false,
        }
    }

    /// Dtype this value would be stored as, `None` for `Na`
    pub fn dtype(&self) -> Option<Dtype> {
        match self {
            Value::Na => None,
            Value::Boolean(_) => Some(Dtype::Boolean),
            Value::Integer(_) => Some(Dtype::Integer),
            Value::Float(_) => Some(Dtype::Float),
            Value::String(_) => Some(Dtype::String),
            Value::Date(_) => Some(Dtype::Date),
            Value::Datetime(_) => Some(Dtype::Datetime),
            Value::Timedelta(_) => Some(Dtype::Timedelta),
            Value::List(_) => Some(Dtype::Object),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::Boolean(b) => Some(*b as i64),
            _ => None,
        }
    }

    /// Numeric view of booleans, integers and non-missing floats
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Integer(i) => Some(*i as f64),
            Value::Float(x) if !x.is_nan() => Some(*x),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Ordering across compatible variants.
    ///
    /// Numbers compare numerically regardless of variant, a date compares to a
    /// datetime at midnight. Incomparable pairs and missing values give `None`.
    pub fn partial_cmp_loose(&self, other: &Value) -> Option<Ordering> {
        if self.is_na() || other.is_na() {
            return None;
        }
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            (Value::Boolean(a), Value::Boolean(b)) => Some(a.cmp(b)),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            (Value::Datetime(a), Value::Datetime(b)) => Some(a.cmp(b)),
            (Value::Date(a), Value::Datetime(b)) => a.and_time(chrono::NaiveTime::MIN).partial_cmp(b),
            (Value::Datetime(a), Value::Date(b)) => a.partial_cmp(&b.and_time(chrono::NaiveTime::MIN)),
            (Value::Timedelta(a), Value::Timedelta(b)) => Some(a.cmp(b)),
            (Value::List(a), Value::List(b)) => {
                for (x, y) in a.iter().zip(b.iter()) {
                    match x.partial_cmp_loose(y)? {
                        Ordering::Equal => continue,
                        ord => return Some(ord),
                    }
                }
                Some(a.len().cmp(&b.len()))
            }
            _ => {
                let a = self.as_f64()?;
                let b = other.as_f64()?;
                a.partial_cmp(&b)
            }
        }
    }

    /// Equality under [`partial_cmp_loose`](Self::partial_cmp_loose); missing never equals anything
    pub fn eq_loose(&self, other: &Value) -> bool {
        self.partial_cmp_loose(other) == Some(Ordering::Equal)
    }
}

/// Canonical float formatting, integral values keep one decimal
pub(crate) fn format_float(x: f64) -> String {
    if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e15 {
        format!("{:.1}", x)
    } else {
        format!("{}", x)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Na => write!(f, "NA"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(x) => f.write_str(&format_float(*x)),
            Value::String(s) => f.write_str(s),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Datetime(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.f")),
            Value::Timedelta(td) => write!(f, "{}", td),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value as i64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Date(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Value::Datetime(value)
    }
}

impl From<TimeDelta> for Value {
    fn from(value: TimeDelta) -> Self {
        Value::Timedelta(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Na)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_detection() {
        assert!(Value::Na.is_na());
        assert!(Value::Float(f64::NAN).is_na());
        assert!(Value::from("").is_na());
        assert!(!Value::from(0).is_na());
        assert!(!Value::List(vec![Value::Na]).is_na());
    }

    #[test]
    fn serializes_as_plain_json() {
        let row = vec![
            Value::Integer(3),
            Value::Na,
            Value::from("x"),
            Value::Timedelta(TimeDelta::seconds(2)),
        ];
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"[3,null,"x",2000000]"#);
    }

    #[test]
    fn loose_comparison_crosses_numeric_variants() {
        assert!(Value::Integer(2).eq_loose(&Value::Float(2.0)));
        assert_eq!(
            Value::Integer(1).partial_cmp_loose(&Value::Float(1.5)),
            Some(Ordering::Less)
        );
        assert!(!Value::Na.eq_loose(&Value::Na));
        assert_eq!(Value::from("a").partial_cmp_loose(&Value::Integer(1)), None);
    }

    #[test]
    fn canonical_display() {
        assert_eq!(Value::Float(3.0).to_string(), "3.0");
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
        assert_eq!(Value::Integer(-4).to_string(), "-4");
        let date = NaiveDate::from_ymd_opt(2021, 3, 7).unwrap();
        assert_eq!(Value::Date(date).to_string(), "2021-03-07");
        assert_eq!(
            Value::Datetime(date.and_hms_opt(8, 0, 0).unwrap()).to_string(),
            "2021-03-07T08:00:00"
        );
    }
}
