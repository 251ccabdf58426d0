//! Elementwise operations, combination and structural accessors

use rand::Rng;
use std::cmp::Ordering;

use super::{infer, Vector, VectorData};
use crate::core::data_value::Value;
use crate::core::dtype::Dtype;
use crate::core::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArithmeticOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithmeticOp {
    fn name(self) -> &'static str {
        match self {
            ArithmeticOp::Add => "add",
            ArithmeticOp::Sub => "subtract",
            ArithmeticOp::Mul => "multiply",
            ArithmeticOp::Div => "divide",
        }
    }

    fn apply_f64(self, a: f64, b: f64) -> f64 {
        match self {
            ArithmeticOp::Add => a + b,
            ArithmeticOp::Sub => a - b,
            ArithmeticOp::Mul => a * b,
            ArithmeticOp::Div => a / b,
        }
    }

    /// Integer result, `None` for division which always goes through floats
    fn apply_i64(self, a: i64, b: i64) -> Option<i64> {
        match self {
            ArithmeticOp::Add => Some(a.wrapping_add(b)),
            ArithmeticOp::Sub => Some(a.wrapping_sub(b)),
            ArithmeticOp::Mul => Some(a.wrapping_mul(b)),
            ArithmeticOp::Div => None,
        }
    }
}

/// Output length of a binary operation, length-one operands broadcast
fn broadcast_len(a: usize, b: usize) -> Result<usize> {
    match (a, b) {
        (a, b) if a == b => Ok(a),
        (1, b) => Ok(b),
        (a, 1) => Ok(a),
        (a, b) => Err(Error::LengthMismatch {
            expected: a,
            actual: b,
        }),
    }
}

#[inline]
fn at(len: usize, i: usize) -> usize {
    if len == 1 {
        0
    } else {
        i
    }
}

impl Vector {
    /// Concatenate vectors, upcasting to their common supertype.
    ///
    /// Integers and floats give floats, anything with strings gives strings,
    /// and dtypes with no common supertype give objects.
    pub fn concat_all(vectors: &[&Vector]) -> Vector {
        let Some(first) = vectors.first() else {
            return Vector::empty(Dtype::Float);
        };
        let dtype = vectors.iter().skip(1).fold(first.dtype(), |acc, v| {
            acc.common(v.dtype()).unwrap_or(Dtype::Object)
        });

        macro_rules! extend_same {
            ($variant:ident) => {{
                let mut out = Vec::with_capacity(vectors.iter().map(|v| v.len()).sum());
                for v in vectors {
                    if let VectorData::$variant(items) = v.data() {
                        out.extend_from_slice(items);
                    }
                }
                VectorData::$variant(out)
            }};
        }

        let data = if vectors.iter().all(|v| v.dtype() == dtype) {
            match dtype {
                Dtype::Boolean => extend_same!(Boolean),
                Dtype::Integer => extend_same!(Integer),
                Dtype::Float => extend_same!(Float),
                Dtype::String => extend_same!(String),
                Dtype::Date => extend_same!(Date),
                Dtype::Datetime => extend_same!(Datetime),
                Dtype::Timedelta => extend_same!(Timedelta),
                Dtype::Object => extend_same!(Object),
            }
        } else {
            let values = vectors.iter().flat_map(|v| v.iter()).collect();
            infer::build(values, dtype)
        };
        Vector::from_data(data)
    }

    /// This vector followed by `others`, see [`Vector::concat_all`]
    pub fn concat(&self, others: &[&Vector]) -> Vector {
        let mut all = Vec::with_capacity(others.len() + 1);
        all.push(self);
        all.extend_from_slice(others);
        Vector::concat_all(&all)
    }

    /// Apply `f` to every element
    ///
    /// # Arguments
    /// * `f` - Elementwise transform; receives `Value::Na` for missing elements
    /// * `dtype` - Result dtype; `None` infers it from the transformed elements
    pub fn map<F>(&self, f: F, dtype: Option<Dtype>) -> Result<Vector>
    where
        F: Fn(&Value) -> Value,
    {
        let values = self.iter().map(|v| f(&v)).collect();
        Vector::new(values, dtype)
    }

    /// Keep elements where `mask` is true
    pub fn filter(&self, mask: &Vector) -> Result<Vector> {
        let mask = mask.as_bool_slice().ok_or_else(|| {
            Error::Type(format!("filter mask must be boolean, got {}", mask.dtype()))
        })?;
        if mask.len() != self.len() {
            return Err(Error::LengthMismatch {
                expected: self.len(),
                actual: mask.len(),
            });
        }
        let keep: Vec<usize> = (0..mask.len()).filter(|&i| mask[i]).collect();
        Ok(self.take(&keep))
    }

    /// First `n` elements
    pub fn head(&self, n: usize) -> Vector {
        let n = n.min(self.len());
        self.take(&(0..n).collect::<Vec<_>>())
    }

    /// Last `n` elements
    pub fn tail(&self, n: usize) -> Vector {
        let n = n.min(self.len());
        self.take(&(self.len() - n..self.len()).collect::<Vec<_>>())
    }

    /// `n` random elements without replacement, in their original order
    pub fn sample(&self, n: usize) -> Vector {
        self.sample_with(n, &mut rand::thread_rng())
    }

    /// [`Vector::sample`] with a caller-provided random source
    pub fn sample_with<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vector {
        self.take(&sample_positions(self.len(), n, rng))
    }

    /// Elementwise equality where missing equals missing
    pub fn equal(&self, other: &Vector) -> bool {
        if self.dtype() != other.dtype() || self.len() != other.len() {
            return false;
        }
        (0..self.len()).all(|i| self.hash_key(i) == other.hash_key(i))
    }

    fn arithmetic(&self, other: &Vector, op: ArithmeticOp) -> Result<Vector> {
        let n = broadcast_len(self.len(), other.len())?;
        let (la, lb) = (self.len(), other.len());
        let data = match (self.data(), other.data()) {
            (VectorData::String(a), VectorData::String(b)) if op == ArithmeticOp::Add => {
                VectorData::String(
                    (0..n)
                        .map(|i| {
                            let (x, y) = (&a[at(la, i)], &b[at(lb, i)]);
                            // missing in, missing out
                            if x.is_empty() || y.is_empty() {
                                String::new()
                            } else {
                                format!("{}{}", x, y)
                            }
                        })
                        .collect(),
                )
            }
            (VectorData::Integer(a), VectorData::Integer(b)) if op != ArithmeticOp::Div => {
                VectorData::Integer(
                    (0..n)
                        .filter_map(|i| op.apply_i64(a[at(la, i)], b[at(lb, i)]))
                        .collect(),
                )
            }
            _ if is_numeric_storage(self) && is_numeric_storage(other) => {
                let a = self.as_float();
                let b = other.as_float();
                let (a, b) = (a.as_f64_slice().unwrap_or(&[]), b.as_f64_slice().unwrap_or(&[]));
                VectorData::Float(
                    (0..n)
                        .map(|i| op.apply_f64(a[at(la, i)], b[at(lb, i)]))
                        .collect(),
                )
            }
            _ => {
                return Err(Error::Type(format!(
                    "cannot {} {} and {} vectors",
                    op.name(),
                    self.dtype(),
                    other.dtype()
                )))
            }
        };
        Ok(Vector::from_data(data))
    }

    /// Elementwise sum; strings concatenate
    pub fn add(&self, other: &Vector) -> Result<Vector> {
        self.arithmetic(other, ArithmeticOp::Add)
    }

    pub fn sub(&self, other: &Vector) -> Result<Vector> {
        self.arithmetic(other, ArithmeticOp::Sub)
    }

    pub fn mul(&self, other: &Vector) -> Result<Vector> {
        self.arithmetic(other, ArithmeticOp::Mul)
    }

    /// Elementwise division, always float
    pub fn div(&self, other: &Vector) -> Result<Vector> {
        self.arithmetic(other, ArithmeticOp::Div)
    }

    fn compare_value(&self, value: &Value, accept: impl Fn(Ordering) -> bool) -> Vector {
        let mask: Vec<bool> = self
            .iter()
            .map(|v| v.partial_cmp_loose(value).map(&accept).unwrap_or(false))
            .collect();
        Vector::from(mask)
    }

    /// Elementwise `== value`; missing elements compare false
    pub fn eq_value(&self, value: impl Into<Value>) -> Vector {
        self.compare_value(&value.into(), |o| o == Ordering::Equal)
    }

    /// Elementwise `!= value`; missing elements compare false
    pub fn ne_value(&self, value: impl Into<Value>) -> Vector {
        self.compare_value(&value.into(), |o| o != Ordering::Equal)
    }

    pub fn lt(&self, value: impl Into<Value>) -> Vector {
        self.compare_value(&value.into(), |o| o == Ordering::Less)
    }

    pub fn le(&self, value: impl Into<Value>) -> Vector {
        self.compare_value(&value.into(), |o| o != Ordering::Greater)
    }

    pub fn gt(&self, value: impl Into<Value>) -> Vector {
        self.compare_value(&value.into(), |o| o == Ordering::Greater)
    }

    pub fn ge(&self, value: impl Into<Value>) -> Vector {
        self.compare_value(&value.into(), |o| o != Ordering::Less)
    }

    fn logical(&self, other: &Vector, f: impl Fn(bool, bool) -> bool) -> Result<Vector> {
        let (Some(a), Some(b)) = (self.as_bool_slice(), other.as_bool_slice()) else {
            return Err(Error::Type(format!(
                "logical operations need boolean vectors, got {} and {}",
                self.dtype(),
                other.dtype()
            )));
        };
        let n = broadcast_len(a.len(), b.len())?;
        Ok(Vector::from(
            (0..n)
                .map(|i| f(a[at(a.len(), i)], b[at(b.len(), i)]))
                .collect::<Vec<_>>(),
        ))
    }

    pub fn and(&self, other: &Vector) -> Result<Vector> {
        self.logical(other, |a, b| a && b)
    }

    pub fn or(&self, other: &Vector) -> Result<Vector> {
        self.logical(other, |a, b| a || b)
    }

    pub fn not(&self) -> Result<Vector> {
        let mask = self.as_bool_slice().ok_or_else(|| {
            Error::Type(format!("cannot negate a {} vector", self.dtype()))
        })?;
        Ok(Vector::from(mask.iter().map(|b| !b).collect::<Vec<_>>()))
    }
}

fn is_numeric_storage(v: &Vector) -> bool {
    matches!(v.dtype(), Dtype::Boolean | Dtype::Integer | Dtype::Float)
}

/// `n` distinct sorted positions out of `len`
pub(crate) fn sample_positions<R: Rng + ?Sized>(len: usize, n: usize, rng: &mut R) -> Vec<usize> {
    let mut positions = rand::seq::index::sample(rng, len, n.min(len)).into_vec();
    positions.sort_unstable();
    positions
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn integer_and_float_concat_to_float() {
        let a = Vector::from(vec![1i64, 2]);
        let b = Vector::from(vec![0.5]);
        let c = a.concat(&[&b]);
        assert_eq!(c.dtype(), Dtype::Float);
        assert_eq!(c, Vector::from(vec![1.0, 2.0, 0.5]));
    }

    #[test]
    fn concat_upcasts_to_string_or_object() {
        let a = Vector::from(vec![1i64]);
        let s = Vector::from(vec!["x"]);
        assert_eq!(a.concat(&[&s]), Vector::from(vec!["1", "x"]));

        let d = Vector::from(vec![chrono::NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()]);
        let mixed = a.concat(&[&d]);
        assert_eq!(mixed.dtype(), Dtype::Object);
        assert_eq!(mixed.len(), 2);
    }

    #[test]
    fn arithmetic_propagates_missing() -> Result<()> {
        let a = Vector::from(vec![1.0, f64::NAN, 3.0]);
        let b = Vector::scalar(2);
        let sum = a.add(&b)?;
        assert_eq!(sum.to_values(), vec![Value::Float(3.0), Value::Na, Value::Float(5.0)]);

        let ints = Vector::from(vec![4i64, 6]).mul(&Vector::from(vec![2i64, 3]))?;
        assert_eq!(ints, Vector::from(vec![8i64, 18]));
        assert_eq!(Vector::from(vec![3i64]).div(&Vector::from(vec![2i64]))?, Vector::from(vec![1.5]));
        assert!(Vector::from(vec!["a"]).mul(&Vector::from(vec![1i64])).is_err());
        Ok(())
    }

    #[test]
    fn comparisons_are_false_on_missing() {
        let v = Vector::from(vec![Some(1.0), None, Some(3.0)]);
        assert_eq!(v.gt(2).as_bool_slice(), Some(&[false, false, true][..]));
        assert_eq!(v.ne_value(1).as_bool_slice(), Some(&[false, false, true][..]));
    }

    #[test]
    fn map_infers_result_dtype() -> Result<()> {
        let v = Vector::from(vec![1i64, 2]);
        let halves = v.map(|x| Value::Float(x.as_f64().unwrap_or(f64::NAN) / 2.0), None)?;
        assert_eq!(halves.dtype(), Dtype::Float);
        let labels = v.map(|x| Value::from(format!("#{}", x)), None)?;
        assert_eq!(labels, Vector::from(vec!["#1", "#2"]));
        Ok(())
    }

    #[test]
    fn sample_keeps_order_and_size() {
        let v = Vector::from((0..20i64).collect::<Vec<_>>());
        let mut rng = StdRng::seed_from_u64(7);
        let s = v.sample_with(5, &mut rng);
        assert_eq!(s.len(), 5);
        let values = s.as_i64_slice().unwrap().to_vec();
        let mut sorted = values.clone();
        sorted.sort();
        assert_eq!(values, sorted);
        assert_eq!(v.sample(100).len(), 20);
    }

    #[test]
    fn head_and_tail() {
        let v = Vector::from(vec![1i64, 2, 3]);
        assert_eq!(v.head(2), Vector::from(vec![1i64, 2]));
        assert_eq!(v.tail(2), Vector::from(vec![2i64, 3]));
        assert_eq!(v.tail(10).len(), 3);
    }
}
