//! Single-typed vectors with a per-dtype missing value
//!
//! A [`Vector`] is a cheap-to-clone handle over shared, immutable storage.
//! Every operation returns a new vector; clones handed to other tables keep
//! pointing at the same storage until a column is replaced.

mod cast;
mod infer;
mod na;
mod ops;
mod order;
mod stats;

pub use order::{Direction, RankMethod};
pub(crate) use ops::sample_positions;
pub(crate) use stats::{from_number, mean_of, quantile_sorted, sort_floats, validate_quantile, variance_of};

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use std::fmt;
use std::sync::Arc;

use crate::core::data_value::Value;
use crate::core::dtype::Dtype;
use crate::core::error::{Error, Result};
use crate::na as sentinel;

/// Dense storage of a vector
#[derive(Debug, Clone)]
pub(crate) enum VectorData {
    Boolean(Vec<bool>),
    Integer(Vec<i64>),
    Float(Vec<f64>),
    String(Vec<String>),
    /// Days since 1970-01-01
    Date(Vec<i32>),
    /// Microseconds since the Unix epoch
    Datetime(Vec<i64>),
    /// Microseconds
    Timedelta(Vec<i64>),
    Object(Vec<Value>),
}

impl VectorData {
    pub(crate) fn dtype(&self) -> Dtype {
        match self {
            VectorData::Boolean(_) => Dtype::Boolean,
            VectorData::Integer(_) => Dtype::Integer,
            VectorData::Float(_) => Dtype::Float,
            VectorData::String(_) => Dtype::String,
            VectorData::Date(_) => Dtype::Date,
            VectorData::Datetime(_) => Dtype::Datetime,
            VectorData::Timedelta(_) => Dtype::Timedelta,
            VectorData::Object(_) => Dtype::Object,
        }
    }

    pub(crate) fn len(&self) -> usize {
        match self {
            VectorData::Boolean(v) => v.len(),
            VectorData::Integer(v) => v.len(),
            VectorData::Float(v) => v.len(),
            VectorData::String(v) => v.len(),
            VectorData::Date(v) => v.len(),
            VectorData::Datetime(v) => v.len(),
            VectorData::Timedelta(v) => v.len(),
            VectorData::Object(v) => v.len(),
        }
    }

    /// Missing storage of the given length, for a dtype that has a sentinel
    fn missing(dtype: Dtype, n: usize) -> VectorData {
        match dtype.na_dtype() {
            Dtype::Float => VectorData::Float(vec![f64::NAN; n]),
            Dtype::String => VectorData::String(vec![String::new(); n]),
            Dtype::Date => VectorData::Date(vec![sentinel::NA_DATE; n]),
            Dtype::Datetime => VectorData::Datetime(vec![sentinel::NA_TIMESTAMP; n]),
            Dtype::Timedelta => VectorData::Timedelta(vec![sentinel::NA_TIMESTAMP; n]),
            _ => VectorData::Object(vec![Value::Na; n]),
        }
    }
}

/// Hashable identity of an element, used for grouping, joins and deduplication.
///
/// All missing values of a vector share the `Na` key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum HashKey {
    Na,
    Boolean(bool),
    Integer(i64),
    Float(u64),
    Text(String),
    Temporal(i64),
    Other(String),
}

/// A single-typed, fixed-length sequence
#[derive(Clone)]
pub struct Vector {
    data: Arc<VectorData>,
}

impl Vector {
    pub(crate) fn from_data(data: VectorData) -> Self {
        Self {
            data: Arc::new(data),
        }
    }

    pub(crate) fn data(&self) -> &VectorData {
        &self.data
    }

    /// Create an empty vector of the given dtype
    pub fn empty(dtype: Dtype) -> Self {
        Self::from_data(infer::build(Vec::new(), dtype))
    }

    /// Create a vector of `n` missing values.
    ///
    /// The result has `dtype.na_dtype()`, so integers come back as floats and
    /// booleans as objects.
    pub fn missing(dtype: Dtype, n: usize) -> Self {
        Self::from_data(VectorData::missing(dtype, n))
    }

    /// Create a length-one vector holding `value`
    pub fn scalar(value: impl Into<Value>) -> Self {
        Self::from_data(infer::build_lossy(vec![value.into()]))
    }

    /// Repeat a scalar `n` times
    pub fn repeat(value: impl Into<Value>, n: usize) -> Self {
        Self::scalar(value).take(&vec![0; n])
    }

    /// Element dtype
    pub fn dtype(&self) -> Dtype {
        self.data.dtype()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_boolean(&self) -> bool {
        self.dtype() == Dtype::Boolean
    }

    pub fn is_integer(&self) -> bool {
        self.dtype() == Dtype::Integer
    }

    pub fn is_float(&self) -> bool {
        self.dtype() == Dtype::Float
    }

    /// Integer or float
    pub fn is_number(&self) -> bool {
        self.dtype().is_number()
    }

    pub fn is_string(&self) -> bool {
        self.dtype() == Dtype::String
    }

    pub fn is_date(&self) -> bool {
        self.dtype() == Dtype::Date
    }

    /// Date or datetime; dates count as datetimes as well
    pub fn is_datetime(&self) -> bool {
        self.dtype().is_datetime()
    }

    pub fn is_timedelta(&self) -> bool {
        self.dtype() == Dtype::Timedelta
    }

    pub fn is_object(&self) -> bool {
        self.dtype() == Dtype::Object
    }

    /// Whether two vectors share the same storage
    pub fn shares_storage(&self, other: &Vector) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    /// Get the element at `index`
    ///
    /// # Arguments
    /// * `index` - Position of the element
    ///
    /// # Returns
    /// * `Result<Value>` - The element, `Value::Na` when missing
    pub fn get(&self, index: usize) -> Result<Value> {
        if index >= self.len() {
            return Err(Error::IndexOutOfBounds {
                index,
                size: self.len(),
            });
        }
        Ok(self.value_at(index))
    }

    /// Element at a position known to be in bounds
    pub(crate) fn value_at(&self, i: usize) -> Value {
        match self.data() {
            VectorData::Boolean(v) => Value::Boolean(v[i]),
            VectorData::Integer(v) => Value::Integer(v[i]),
            VectorData::Float(v) if sentinel::is_na_float(v[i]) => Value::Na,
            VectorData::Float(v) => Value::Float(v[i]),
            VectorData::String(v) if sentinel::is_na_string(&v[i]) => Value::Na,
            VectorData::String(v) => Value::String(v[i].clone()),
            VectorData::Date(v) => sentinel::days_to_date(v[i]).into(),
            VectorData::Datetime(v) => sentinel::micros_to_datetime(v[i]).into(),
            VectorData::Timedelta(v) => sentinel::micros_to_timedelta(v[i]).into(),
            VectorData::Object(v) if v[i].is_na() => Value::Na,
            VectorData::Object(v) => v[i].clone(),
        }
    }

    pub(crate) fn is_missing_at(&self, i: usize) -> bool {
        match self.data() {
            VectorData::Boolean(_) | VectorData::Integer(_) => false,
            VectorData::Float(v) => sentinel::is_na_float(v[i]),
            VectorData::String(v) => sentinel::is_na_string(&v[i]),
            VectorData::Date(v) => sentinel::is_na_date(v[i]),
            VectorData::Datetime(v) | VectorData::Timedelta(v) => sentinel::is_na_timestamp(v[i]),
            VectorData::Object(v) => v[i].is_na(),
        }
    }

    pub(crate) fn hash_key(&self, i: usize) -> HashKey {
        if self.is_missing_at(i) {
            return HashKey::Na;
        }
        match self.data() {
            VectorData::Boolean(v) => HashKey::Boolean(v[i]),
            VectorData::Integer(v) => HashKey::Integer(v[i]),
            // -0.0 and 0.0 are the same key
            VectorData::Float(v) => HashKey::Float((v[i] + 0.0).to_bits()),
            VectorData::String(v) => HashKey::Text(v[i].clone()),
            VectorData::Date(v) => HashKey::Temporal(v[i] as i64),
            VectorData::Datetime(v) | VectorData::Timedelta(v) => HashKey::Temporal(v[i]),
            VectorData::Object(v) => HashKey::Other(format!("{:?}", v[i])),
        }
    }

    /// Iterate over elements as [`Value`]s
    pub fn iter(&self) -> impl Iterator<Item = Value> + '_ {
        (0..self.len()).map(move |i| self.value_at(i))
    }

    /// Materialize all elements, missing ones as `Value::Na`
    pub fn to_values(&self) -> Vec<Value> {
        self.iter().collect()
    }

    /// Gather elements by position
    ///
    /// # Panics
    /// Panics if an index is out of bounds; callers validate positions first.
    pub fn take(&self, indices: &[usize]) -> Vector {
        fn gather<T: Clone>(v: &[T], indices: &[usize]) -> Vec<T> {
            indices.iter().map(|&i| v[i].clone()).collect()
        }
        let data = match self.data() {
            VectorData::Boolean(v) => VectorData::Boolean(gather(v, indices)),
            VectorData::Integer(v) => VectorData::Integer(gather(v, indices)),
            VectorData::Float(v) => VectorData::Float(gather(v, indices)),
            VectorData::String(v) => VectorData::String(gather(v, indices)),
            VectorData::Date(v) => VectorData::Date(gather(v, indices)),
            VectorData::Datetime(v) => VectorData::Datetime(gather(v, indices)),
            VectorData::Timedelta(v) => VectorData::Timedelta(gather(v, indices)),
            VectorData::Object(v) => VectorData::Object(gather(v, indices)),
        };
        Vector::from_data(data)
    }

    /// Gather elements by optional position, `None` producing a missing value.
    ///
    /// Integers and booleans are widened to their missing-capable dtype only
    /// when at least one position is `None`.
    pub fn take_optional(&self, indices: &[Option<usize>]) -> Vector {
        if indices.iter().all(Option::is_some) {
            let indices: Vec<usize> = indices.iter().flatten().copied().collect();
            return self.take(&indices);
        }
        let source = self.cast(self.dtype().na_dtype());
        fn gather<T: Clone>(v: &[T], indices: &[Option<usize>], na: T) -> Vec<T> {
            indices
                .iter()
                .map(|i| i.map(|i| v[i].clone()).unwrap_or_else(|| na.clone()))
                .collect()
        }
        let data = match source.data() {
            VectorData::Float(v) => VectorData::Float(gather(v, indices, f64::NAN)),
            VectorData::String(v) => VectorData::String(gather(v, indices, String::new())),
            VectorData::Date(v) => VectorData::Date(gather(v, indices, sentinel::NA_DATE)),
            VectorData::Datetime(v) => {
                VectorData::Datetime(gather(v, indices, sentinel::NA_TIMESTAMP))
            }
            VectorData::Timedelta(v) => {
                VectorData::Timedelta(gather(v, indices, sentinel::NA_TIMESTAMP))
            }
            VectorData::Object(v) => VectorData::Object(gather(v, indices, Value::Na)),
            // na_dtype() never yields integer or boolean storage
            VectorData::Boolean(_) | VectorData::Integer(_) => {
                VectorData::Object(indices.iter().map(|i| i.map(|i| source.value_at(i)).into()).collect())
            }
        };
        Vector::from_data(data)
    }

    pub fn as_bool_slice(&self) -> Option<&[bool]> {
        match self.data() {
            VectorData::Boolean(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_i64_slice(&self) -> Option<&[i64]> {
        match self.data() {
            VectorData::Integer(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_f64_slice(&self) -> Option<&[f64]> {
        match self.data() {
            VectorData::Float(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_string_slice(&self) -> Option<&[String]> {
        match self.data() {
            VectorData::String(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Debug for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vector")
            .field("dtype", &self.dtype())
            .field("values", &self.to_values())
            .finish()
    }
}

impl PartialEq for Vector {
    fn eq(&self, other: &Self) -> bool {
        self.equal(other)
    }
}

impl From<Vec<bool>> for Vector {
    fn from(values: Vec<bool>) -> Self {
        Vector::from_data(VectorData::Boolean(values))
    }
}

impl From<Vec<i64>> for Vector {
    fn from(values: Vec<i64>) -> Self {
        Vector::from_data(VectorData::Integer(values))
    }
}

impl From<Vec<f64>> for Vector {
    fn from(values: Vec<f64>) -> Self {
        Vector::from_data(VectorData::Float(values))
    }
}

impl From<Vec<String>> for Vector {
    fn from(values: Vec<String>) -> Self {
        Vector::from_data(VectorData::String(values))
    }
}

impl From<Vec<&str>> for Vector {
    fn from(values: Vec<&str>) -> Self {
        Vector::from_data(VectorData::String(
            values.into_iter().map(str::to_string).collect(),
        ))
    }
}

impl From<Vec<NaiveDate>> for Vector {
    fn from(values: Vec<NaiveDate>) -> Self {
        Vector::from_data(VectorData::Date(
            values.into_iter().map(sentinel::date_to_days).collect(),
        ))
    }
}

impl From<Vec<NaiveDateTime>> for Vector {
    fn from(values: Vec<NaiveDateTime>) -> Self {
        Vector::from_data(VectorData::Datetime(
            values.into_iter().map(sentinel::datetime_to_micros).collect(),
        ))
    }
}

impl From<Vec<TimeDelta>> for Vector {
    fn from(values: Vec<TimeDelta>) -> Self {
        Vector::from_data(VectorData::Timedelta(
            values.into_iter().map(sentinel::timedelta_to_micros).collect(),
        ))
    }
}

/// `None` elements become missing values, widening integers and booleans
impl<T: Into<Value>> From<Vec<Option<T>>> for Vector {
    fn from(values: Vec<Option<T>>) -> Self {
        let values: Vec<Value> = values.into_iter().map(Value::from).collect();
        Vector::from_data(infer::build_lossy(values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_storage() {
        let v = Vector::from(vec![1i64, 2, 3]);
        let w = v.clone();
        assert!(v.shares_storage(&w));
        assert!(!v.shares_storage(&v.take(&[0, 1, 2])));
    }

    #[test]
    fn take_optional_widens_only_when_needed() {
        let v = Vector::from(vec![10i64, 20]);
        let all = v.take_optional(&[Some(1), Some(0)]);
        assert_eq!(all.dtype(), Dtype::Integer);
        let some = v.take_optional(&[Some(1), None]);
        assert_eq!(some.dtype(), Dtype::Float);
        assert_eq!(some.to_values(), vec![Value::Float(20.0), Value::Na]);

        let b = Vector::from(vec![true]);
        let widened = b.take_optional(&[None, Some(0)]);
        assert_eq!(widened.dtype(), Dtype::Object);
        assert_eq!(widened.to_values(), vec![Value::Na, Value::Boolean(true)]);
    }

    #[test]
    fn hash_keys_collapse_missing() {
        let v = Vector::from(vec![1.0, f64::NAN, -0.0, 0.0, f64::NAN]);
        assert_eq!(v.hash_key(1), HashKey::Na);
        assert_eq!(v.hash_key(1), v.hash_key(4));
        assert_eq!(v.hash_key(2), v.hash_key(3));
    }

    #[test]
    fn get_checks_bounds() {
        let v = Vector::from(vec!["a", ""]);
        assert_eq!(v.get(0).unwrap(), Value::from("a"));
        assert_eq!(v.get(1).unwrap(), Value::Na);
        assert!(matches!(v.get(2), Err(Error::IndexOutOfBounds { index: 2, size: 2 })));
    }
}
