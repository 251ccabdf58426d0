//! Dtype inference and construction from dynamic values

use super::cast;
use super::{Vector, VectorData};
use crate::core::data_value::Value;
use crate::core::dtype::Dtype;
use crate::core::error::{Error, Result};
use crate::na as sentinel;

impl Vector {
    /// Create a vector from dynamic values
    ///
    /// # Arguments
    /// * `values` - Elements, `Value::Na` for missing
    /// * `dtype` - Explicit dtype; `None` infers the narrowest consistent one
    ///
    /// # Returns
    /// * `Result<Vector>` - The vector, or a type error when the elements
    ///   cannot share one dtype and none was given
    pub fn new(values: Vec<Value>, dtype: Option<Dtype>) -> Result<Self> {
        let dtype = match dtype {
            Some(dtype) => dtype,
            None => infer_dtype(&values)?,
        };
        Ok(Vector::from_data(build(values, dtype)))
    }
}

/// Narrowest dtype holding every element.
///
/// Empty input is float, all-missing input is object. Integers with missing
/// values widen to float, booleans with missing values to object.
pub(crate) fn infer_dtype(values: &[Value]) -> Result<Dtype> {
    if values.is_empty() {
        return Ok(Dtype::Float);
    }
    let mut found: Option<Dtype> = None;
    let mut has_missing = false;
    let mut has_list = false;
    let mut has_scalar = false;

    for value in values {
        has_missing |= value.is_na();
        let Some(dtype) = value.dtype() else {
            continue;
        };
        if matches!(value, Value::List(_)) {
            has_list = true;
        } else {
            has_scalar = true;
        }
        found = Some(match found {
            None => dtype,
            Some(prev) => prev.common(dtype).ok_or_else(|| {
                Error::Type(format!(
                    "cannot combine {} and {} elements without an explicit dtype",
                    prev, dtype
                ))
            })?,
        });
    }

    if has_list && has_scalar {
        return Err(Error::Type(
            "cannot combine nested sequences and scalars without an explicit dtype".to_string(),
        ));
    }
    let dtype = found.unwrap_or(Dtype::Object);
    Ok(if has_missing { dtype.na_dtype() } else { dtype })
}

/// Build storage of `dtype`, converting every element.
///
/// Elements that fail to convert become missing. Integer and boolean targets
/// fall back to their missing-capable dtype when any element is missing.
pub(crate) fn build(values: Vec<Value>, dtype: Dtype) -> VectorData {
    match dtype {
        Dtype::Boolean => match values.iter().map(cast::to_bool).collect::<Option<Vec<_>>>() {
            Some(v) => VectorData::Boolean(v),
            None => VectorData::Object(
                values
                    .iter()
                    .map(|v| cast::to_bool(v).map(Value::Boolean).unwrap_or(Value::Na))
                    .collect(),
            ),
        },
        Dtype::Integer => match values.iter().map(cast::to_i64).collect::<Option<Vec<_>>>() {
            Some(v) => VectorData::Integer(v),
            None => build(values, Dtype::Float),
        },
        Dtype::Float => VectorData::Float(
            values
                .iter()
                .map(|v| cast::to_f64(v).unwrap_or(f64::NAN))
                .collect(),
        ),
        Dtype::String => VectorData::String(
            values
                .iter()
                .map(|v| cast::to_string(v).unwrap_or_default())
                .collect(),
        ),
        Dtype::Date => VectorData::Date(
            values
                .iter()
                .map(|v| cast::to_days(v).unwrap_or(sentinel::NA_DATE))
                .collect(),
        ),
        Dtype::Datetime => VectorData::Datetime(
            values
                .iter()
                .map(|v| cast::to_datetime_micros(v).unwrap_or(sentinel::NA_TIMESTAMP))
                .collect(),
        ),
        Dtype::Timedelta => VectorData::Timedelta(
            values
                .iter()
                .map(|v| cast::to_timedelta_micros(v).unwrap_or(sentinel::NA_TIMESTAMP))
                .collect(),
        ),
        Dtype::Object => VectorData::Object(
            values
                .into_iter()
                .map(|v| if v.is_na() { Value::Na } else { v })
                .collect(),
        ),
    }
}

/// Build with an inferred dtype, keeping irreconcilable input as object
pub(crate) fn build_lossy(values: Vec<Value>) -> VectorData {
    match infer_dtype(&values) {
        Ok(dtype) => build(values, dtype),
        Err(_) => build(values, Dtype::Object),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dtype_of(values: Vec<Value>) -> Result<Dtype> {
        Vector::new(values, None).map(|v| v.dtype())
    }

    #[test]
    fn narrowest_dtype() -> Result<()> {
        assert_eq!(dtype_of(vec![1.into(), 2.into()])?, Dtype::Integer);
        assert_eq!(dtype_of(vec![1.into(), 2.5.into()])?, Dtype::Float);
        assert_eq!(dtype_of(vec![true.into(), false.into()])?, Dtype::Boolean);
        assert_eq!(dtype_of(vec!["a".into(), 1.into()])?, Dtype::String);
        assert_eq!(dtype_of(vec![])?, Dtype::Float);
        assert_eq!(dtype_of(vec![Value::Na, Value::Na])?, Dtype::Object);
        Ok(())
    }

    #[test]
    fn missing_widens_integers_and_booleans() -> Result<()> {
        assert_eq!(dtype_of(vec![1.into(), Value::Na])?, Dtype::Float);
        assert_eq!(dtype_of(vec![true.into(), Value::Na])?, Dtype::Object);
        assert_eq!(dtype_of(vec!["a".into(), Value::Na])?, Dtype::String);
        Ok(())
    }

    #[test]
    fn nested_sequences_are_objects() -> Result<()> {
        let list = Value::List(vec![1.into(), 2.into()]);
        assert_eq!(dtype_of(vec![list.clone(), Value::Na])?, Dtype::Object);

        let err = dtype_of(vec!["x".into(), list.clone()]).unwrap_err();
        assert!(matches!(err, Error::Type(_)));

        let forced = Vector::new(vec!["x".into(), list], Some(Dtype::Object))?;
        assert_eq!(forced.dtype(), Dtype::Object);
        Ok(())
    }

    #[test]
    fn irreconcilable_scalars_fail() {
        let date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let err = dtype_of(vec![date.into(), 1.into()]).unwrap_err();
        assert!(matches!(err, Error::Type(_)));
    }

    #[test]
    fn explicit_integer_with_missing_becomes_float() -> Result<()> {
        let v = Vector::new(vec![1.into(), Value::Na], Some(Dtype::Integer))?;
        assert_eq!(v.dtype(), Dtype::Float);
        assert!(v.get(1)?.is_na());
        Ok(())
    }
}
