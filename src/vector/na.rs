//! Missing-value handling for vectors

use super::{infer, Vector, VectorData};
use crate::core::data_value::Value;

impl Vector {
    /// Boolean vector, true where the element is missing
    pub fn is_na(&self) -> Vector {
        let mask = match self.data() {
            VectorData::Boolean(v) => vec![false; v.len()],
            VectorData::Integer(v) => vec![false; v.len()],
            _ => (0..self.len()).map(|i| self.is_missing_at(i)).collect(),
        };
        Vector::from(mask)
    }

    /// Number of missing elements
    pub fn na_count(&self) -> usize {
        match self.data() {
            VectorData::Boolean(_) | VectorData::Integer(_) => 0,
            _ => (0..self.len()).filter(|&i| self.is_missing_at(i)).count(),
        }
    }

    /// Replace missing elements with `value`, cast to this vector's dtype
    pub fn replace_na(&self, value: impl Into<Value>) -> Vector {
        if self.na_count() == 0 {
            return self.clone();
        }
        let value = value.into();
        let values: Vec<Value> = self
            .iter()
            .map(|v| if v.is_na() { value.clone() } else { v })
            .collect();
        Vector::from_data(infer::build(values, self.dtype()))
    }

    /// Vector without its missing elements
    pub fn drop_na(&self) -> Vector {
        if self.na_count() == 0 {
            return self.clone();
        }
        let keep: Vec<usize> = (0..self.len()).filter(|&i| !self.is_missing_at(i)).collect();
        self.take(&keep)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dtype::Dtype;

    #[test]
    fn is_na_marks_sentinels() {
        let v = Vector::from(vec![1.0, f64::NAN, 3.0]);
        assert_eq!(v.is_na().as_bool_slice(), Some(&[false, true, false][..]));
        assert_eq!(v.na_count(), 1);

        let s = Vector::from(vec!["a", "", "c"]);
        assert_eq!(s.na_count(), 1);
        assert_eq!(Vector::from(vec![1i64, 2]).na_count(), 0);
    }

    #[test]
    fn replace_keeps_dtype() {
        let v = Vector::from(vec![1.0, f64::NAN]).replace_na(0);
        assert_eq!(v.dtype(), Dtype::Float);
        assert_eq!(v.to_values(), vec![Value::Float(1.0), Value::Float(0.0)]);

        let s = Vector::from(vec!["", "b"]).replace_na("none");
        assert_eq!(s.to_values(), vec![Value::from("none"), Value::from("b")]);
    }

    #[test]
    fn drop_na_shortens() {
        let v = Vector::from(vec![Some(1i64), None, Some(3)]);
        let dropped = v.drop_na();
        assert_eq!(dropped.len(), 2);
        assert_eq!(dropped.to_values(), vec![Value::Float(1.0), Value::Float(3.0)]);
    }
}
