//! Reductions over a whole vector.
//!
//! Missing elements are skipped. The numeric helpers at the top are shared with
//! the accelerated kernels so both aggregation strategies agree.

use std::collections::{HashMap, HashSet};

use super::{cast, Vector, VectorData};
use crate::core::data_value::Value;
use crate::core::dtype::Dtype;
use crate::core::error::{Error, Result};
use crate::na as sentinel;

/// Arithmetic mean, `NaN` when empty
pub(crate) fn mean_of(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Variance with `ddof` delta degrees of freedom; needs at least two values
pub(crate) fn variance_of(values: &[f64], ddof: usize) -> f64 {
    let n = values.len();
    if n < 2 || n <= ddof {
        return f64::NAN;
    }
    let mean = mean_of(values);
    let squares: f64 = values.iter().map(|x| (x - mean) * (x - mean)).sum();
    squares / (n - ddof) as f64
}

pub(crate) fn sort_floats(values: &mut [f64]) {
    values.sort_by(|a, b| a.total_cmp(b));
}

/// Linear interpolation between closest ranks (Hyndman and Fan type 7)
pub(crate) fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let h = (sorted.len() - 1) as f64 * q;
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
}

pub(crate) fn validate_quantile(q: f64) -> Result<()> {
    if (0.0..=1.0).contains(&q) {
        Ok(())
    } else {
        Err(Error::InvalidValue(format!(
            "quantile must be between 0 and 1, got {}",
            q
        )))
    }
}

/// Wrap a numeric statistic of a `dtype` vector back into a value.
///
/// Statistics of temporal vectors stay temporal, everything else is float.
pub(crate) fn from_number(x: f64, dtype: Dtype) -> Value {
    if x.is_nan() {
        return match dtype {
            Dtype::Date | Dtype::Datetime | Dtype::Timedelta => Value::Na,
            _ => Value::Float(f64::NAN),
        };
    }
    match dtype {
        Dtype::Date => sentinel::days_to_date(x.round() as i32).into(),
        Dtype::Datetime => sentinel::micros_to_datetime(x.round() as i64).into(),
        Dtype::Timedelta => sentinel::micros_to_timedelta(x.round() as i64).into(),
        _ => Value::Float(x),
    }
}

impl Vector {
    /// Non-missing elements as numbers; temporal values use their encoding
    pub(crate) fn numbers(&self, operation: &str) -> Result<Vec<f64>> {
        let present = |i: &usize| !self.is_missing_at(*i);
        let numbers = match self.data() {
            VectorData::Boolean(v) => v.iter().map(|&b| if b { 1.0 } else { 0.0 }).collect(),
            VectorData::Integer(v) => v.iter().map(|&x| x as f64).collect(),
            VectorData::Float(v) => v.iter().copied().filter(|x| !x.is_nan()).collect(),
            VectorData::Date(v) => (0..v.len()).filter(present).map(|i| v[i] as f64).collect(),
            VectorData::Datetime(v) | VectorData::Timedelta(v) => {
                (0..v.len()).filter(present).map(|i| v[i] as f64).collect()
            }
            VectorData::String(_) | VectorData::Object(_) => {
                return Err(Error::Type(format!(
                    "cannot compute {} of a {} vector",
                    operation,
                    self.dtype()
                )))
            }
        };
        Ok(numbers)
    }

    /// Sum; integers and booleans sum to an integer
    pub fn sum(&self) -> Result<Value> {
        match self.data() {
            VectorData::Boolean(v) => Ok(Value::Integer(v.iter().filter(|&&b| b).count() as i64)),
            VectorData::Integer(v) => Ok(Value::Integer(
                v.iter().fold(0i64, |acc, &x| acc.wrapping_add(x)),
            )),
            VectorData::Float(v) => Ok(Value::Float(v.iter().filter(|x| !x.is_nan()).sum())),
            VectorData::Timedelta(v) => {
                let total = v
                    .iter()
                    .filter(|&&x| !sentinel::is_na_timestamp(x))
                    .fold(0i64, |acc, &x| acc.wrapping_add(x));
                Ok(sentinel::micros_to_timedelta(total).into())
            }
            _ => Err(Error::Type(format!("cannot compute sum of a {} vector", self.dtype()))),
        }
    }

    /// Mean; float for numbers, the same dtype for temporal vectors
    pub fn mean(&self) -> Result<Value> {
        Ok(from_number(mean_of(&self.numbers("mean")?), self.dtype()))
    }

    pub fn median(&self) -> Result<Value> {
        self.quantile(0.5)
    }

    /// Type 7 quantile, `q` in `[0, 1]`
    pub fn quantile(&self, q: f64) -> Result<Value> {
        validate_quantile(q)?;
        let mut numbers = self.numbers("quantile")?;
        sort_floats(&mut numbers);
        Ok(from_number(quantile_sorted(&numbers, q), self.dtype()))
    }

    /// Variance with `ddof` delta degrees of freedom
    pub fn var(&self, ddof: usize) -> Result<Value> {
        if !matches!(self.dtype(), Dtype::Boolean | Dtype::Integer | Dtype::Float) {
            return Err(Error::Type(format!("cannot compute variance of a {} vector", self.dtype())));
        }
        Ok(Value::Float(variance_of(&self.numbers("variance")?, ddof)))
    }

    /// Standard deviation with `ddof` delta degrees of freedom
    pub fn std(&self, ddof: usize) -> Result<Value> {
        Ok(match self.var(ddof)? {
            Value::Float(v) => Value::Float(v.sqrt()),
            other => other,
        })
    }

    fn extreme(&self, wanted: std::cmp::Ordering) -> Value {
        let mut best: Option<usize> = None;
        for i in (0..self.len()).filter(|&i| !self.is_missing_at(i)) {
            best = match best {
                Some(b) if self.cmp_at(i, b) != wanted => Some(b),
                _ => Some(i),
            };
        }
        best.map(|i| self.value_at(i)).unwrap_or(Value::Na)
    }

    /// Smallest non-missing element, `Value::Na` when there is none
    pub fn min(&self) -> Value {
        self.extreme(std::cmp::Ordering::Less)
    }

    /// Largest non-missing element, `Value::Na` when there is none
    pub fn max(&self) -> Value {
        self.extreme(std::cmp::Ordering::Greater)
    }

    /// Minimum and maximum as a two-element vector
    pub fn range(&self) -> Vector {
        let dtype = self.dtype();
        Vector::from_data(super::infer::build(vec![self.min(), self.max()], dtype))
    }

    /// Most frequent non-missing element, ties broken by first occurrence
    pub fn mode(&self) -> Value {
        self.mode_impl(false)
    }

    pub(crate) fn mode_impl(&self, include_missing: bool) -> Value {
        // key -> (count, first position)
        let mut counts: HashMap<_, (usize, usize)> = HashMap::new();
        for i in 0..self.len() {
            if !include_missing && self.is_missing_at(i) {
                continue;
            }
            counts.entry(self.hash_key(i)).or_insert((0, i)).0 += 1;
        }
        counts
            .values()
            .max_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)))
            .map(|&(_, first)| self.value_at(first))
            .unwrap_or(Value::Na)
    }

    fn truth_values(&self, operation: &str) -> Result<Vec<bool>> {
        if let VectorData::Boolean(v) = self.data() {
            return Ok(v.clone());
        }
        self.iter()
            .filter(|v| !v.is_na())
            .map(|v| {
                cast::to_bool(&v).ok_or_else(|| {
                    Error::Type(format!("cannot compute {} of a {} vector", operation, self.dtype()))
                })
            })
            .collect()
    }

    /// Whether every non-missing element is true
    pub fn all(&self) -> Result<bool> {
        Ok(self.truth_values("all")?.into_iter().all(|b| b))
    }

    /// Whether any non-missing element is true
    pub fn any(&self) -> Result<bool> {
        Ok(self.truth_values("any")?.into_iter().any(|b| b))
    }

    /// Number of distinct non-missing elements
    pub fn count_unique(&self) -> usize {
        (0..self.len())
            .filter(|&i| !self.is_missing_at(i))
            .map(|i| self.hash_key(i))
            .collect::<HashSet<_>>()
            .len()
    }

    /// Element at a position counted from the end when negative, `Value::Na` out of range
    pub fn nth(&self, index: isize) -> Value {
        let n = self.len() as isize;
        let i = if index < 0 { n + index } else { index };
        if (0..n).contains(&i) {
            self.value_at(i as usize)
        } else {
            Value::Na
        }
    }
}
