//! Element conversions and dtype casts

use chrono::{NaiveDate, NaiveDateTime};

use super::{infer, Vector};
use crate::core::data_value::Value;
use crate::core::dtype::Dtype;
use crate::na as sentinel;

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

pub(crate) fn to_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Boolean(b) => Some(*b),
        Value::Integer(i) => Some(*i != 0),
        Value::Float(x) if !x.is_nan() => Some(*x != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "t" | "yes" | "1" => Some(true),
            "false" | "f" | "no" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

pub(crate) fn to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Boolean(b) => Some(*b as i64),
        Value::Integer(i) => Some(*i),
        Value::Float(x) if x.is_finite() => Some(x.trunc() as i64),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|x| x.is_finite())
                    .map(|x| x.trunc() as i64)
            })
        }
        _ => None,
    }
}

pub(crate) fn to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|x| !x.is_nan()),
        other => other.as_f64(),
    }
}

pub(crate) fn to_string(value: &Value) -> Option<String> {
    if value.is_na() {
        None
    } else {
        Some(value.to_string())
    }
}

pub(crate) fn to_days(value: &Value) -> Option<i32> {
    match value {
        Value::Date(d) => Some(sentinel::date_to_days(*d)),
        Value::Datetime(dt) => Some(sentinel::date_to_days(dt.date())),
        Value::String(s) => parse_date(s).map(sentinel::date_to_days),
        _ => None,
    }
}

pub(crate) fn to_datetime_micros(value: &Value) -> Option<i64> {
    match value {
        Value::Datetime(dt) => Some(sentinel::datetime_to_micros(*dt)),
        Value::Date(d) => Some(sentinel::datetime_to_micros(d.and_time(chrono::NaiveTime::MIN))),
        Value::String(s) => parse_datetime(s).map(sentinel::datetime_to_micros),
        _ => None,
    }
}

pub(crate) fn to_timedelta_micros(value: &Value) -> Option<i64> {
    match value {
        Value::Timedelta(td) => Some(sentinel::timedelta_to_micros(*td)),
        _ => None,
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_datetime(s).map(|dt| dt.date()))
}

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(chrono::NaiveTime::MIN))
        })
}

impl Vector {
    /// Convert to another dtype.
    ///
    /// Elements that cannot be converted become missing, so integer and
    /// boolean targets may come back widened per [`Dtype::na_dtype`]. Casting
    /// to the current dtype shares storage.
    pub fn cast(&self, dtype: Dtype) -> Vector {
        if self.dtype() == dtype {
            return self.clone();
        }
        Vector::from_data(infer::build(self.to_values(), dtype))
    }

    pub fn as_boolean(&self) -> Vector {
        self.cast(Dtype::Boolean)
    }

    pub fn as_integer(&self) -> Vector {
        self.cast(Dtype::Integer)
    }

    pub fn as_float(&self) -> Vector {
        self.cast(Dtype::Float)
    }

    /// Format elements canonically; missing elements stay missing
    pub fn as_string(&self) -> Vector {
        self.cast(Dtype::String)
    }

    pub fn as_date(&self) -> Vector {
        self.cast(Dtype::Date)
    }

    pub fn as_datetime(&self) -> Vector {
        self.cast(Dtype::Datetime)
    }

    pub fn as_object(&self) -> Vector {
        self.cast(Dtype::Object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_format_canonically() {
        let v = Vector::from(vec![1.0, 2.5, f64::NAN]).as_string();
        assert_eq!(
            v.to_values(),
            vec![Value::from("1.0"), Value::from("2.5"), Value::Na]
        );
        let v = Vector::from(vec![7i64, -1]).as_string();
        assert_eq!(v.to_values(), vec![Value::from("7"), Value::from("-1")]);
    }

    #[test]
    fn unparsable_strings_become_missing() {
        let v = Vector::from(vec!["1", "x", "3"]).as_integer();
        assert_eq!(v.dtype(), Dtype::Float);
        assert_eq!(
            v.to_values(),
            vec![Value::Float(1.0), Value::Na, Value::Float(3.0)]
        );

        let v = Vector::from(vec!["2.5", "nope"]).as_float();
        assert_eq!(v.to_values(), vec![Value::Float(2.5), Value::Na]);
    }

    #[test]
    fn strings_parse_to_dates() {
        let v = Vector::from(vec!["2020-02-01", "2020-02-01 10:30:00", "bad"]).as_date();
        let day = NaiveDate::from_ymd_opt(2020, 2, 1).unwrap();
        assert_eq!(
            v.to_values(),
            vec![Value::Date(day), Value::Date(day), Value::Na]
        );
    }

    #[test]
    fn cast_to_same_dtype_shares_storage() {
        let v = Vector::from(vec![1.0, 2.0]);
        assert!(v.as_float().shares_storage(&v));
    }
}
