use chrono::NaiveDate;
use tabrs::{Direction, Dtype, RankMethod, Result, Value, Vector};

#[test]
fn test_inference_and_missing_sentinels() -> Result<()> {
    let ints = Vector::new(vec![Value::from(1i64), Value::from(2i64)], None)?;
    assert_eq!(ints.dtype(), Dtype::Integer);

    // Integers have no sentinel and widen to float once a value is missing
    let widened = Vector::new(vec![Value::from(1i64), Value::Na], None)?;
    assert_eq!(widened.dtype(), Dtype::Float);
    assert_eq!(widened.na_count(), 1);

    let strings = Vector::from(vec![Some("a"), None]);
    assert_eq!(strings.dtype(), Dtype::String);
    assert_eq!(strings.get(1)?, Value::Na);

    let dates = Vector::from(vec![Some(NaiveDate::from_ymd_opt(2020, 1, 2).unwrap()), None]);
    assert_eq!(dates.dtype(), Dtype::Date);
    assert_eq!(dates.na_count(), 1);
    Ok(())
}

#[test]
fn test_missing_detection_and_sort_position() {
    let v = Vector::from(vec![Some(2.0), None, Some(1.0)]);
    assert_eq!(v.is_na().as_bool_slice(), Some(&[false, true, false][..]));

    let asc = v.sort(Direction::Ascending);
    assert_eq!(asc.get(0).unwrap(), Value::Float(1.0));
    assert_eq!(asc.get(2).unwrap(), Value::Na);

    let desc = v.sort(Direction::Descending);
    assert_eq!(desc.get(0).unwrap(), Value::Float(2.0));
    assert_eq!(desc.get(2).unwrap(), Value::Na);
}

#[test]
fn test_unique_keeps_first_occurrence_order() {
    let v = Vector::from(vec![3i64, 1, 3, 2, 1]);
    assert_eq!(v.unique().as_i64_slice(), Some(&[3i64, 1, 2][..]));
    assert_eq!(v.count_unique(), 3);
}

#[test]
fn test_concat_integer_and_float() {
    let a = Vector::from(vec![1i64, 2]);
    let b = Vector::from(vec![0.5, 1.5]);
    let c = a.concat(&[&b]);
    assert_eq!(c.dtype(), Dtype::Float);
    assert_eq!(c.as_f64_slice(), Some(&[1.0, 2.0, 0.5, 1.5][..]));
}

#[test]
fn test_concat_of_incompatible_dtypes_falls_back_to_object() {
    let a = Vector::from(vec![1i64]);
    let b = Vector::from(vec![NaiveDate::from_ymd_opt(2021, 5, 1).unwrap()]);
    let c = a.concat(&[&b]);
    assert_eq!(c.dtype(), Dtype::Object);
    assert_eq!(c.len(), 2);
}

#[test]
fn test_rank_methods() {
    let v = Vector::from(vec![Some(20.0), Some(10.0), None, Some(20.0)]);
    assert_eq!(v.rank(RankMethod::Min).as_i64_slice(), Some(&[2i64, 1, 4, 2][..]));
    assert_eq!(v.rank(RankMethod::Max).as_i64_slice(), Some(&[3i64, 1, 4, 3][..]));
    assert_eq!(v.rank(RankMethod::Ordinal).as_i64_slice(), Some(&[2i64, 1, 4, 3][..]));
}

#[test]
fn test_reductions() -> Result<()> {
    let v = Vector::from(vec![1i64, 2, 3, 4]);
    assert_eq!(v.sum()?, Value::Integer(10));
    assert_eq!(v.mean()?, Value::Float(2.5));
    assert_eq!(v.median()?, Value::Float(2.5));
    assert_eq!(v.quantile(0.25)?, Value::Float(1.75));
    assert_eq!(v.var(1)?, Value::Float(5.0 / 3.0));
    assert_eq!(v.min(), Value::Integer(1));
    assert_eq!(v.max(), Value::Integer(4));
    assert_eq!(v.nth(-1), Value::Integer(4));
    assert_eq!(v.nth(9), Value::Na);
    assert!(v.quantile(1.5).is_err());

    let modes = Vector::from(vec!["b", "a", "a", "b"]);
    assert_eq!(modes.mode(), Value::from("b"));
    Ok(())
}

#[test]
fn test_comparisons_and_logic() -> Result<()> {
    let v = Vector::from(vec![Some(1.0), None, Some(3.0)]);
    let big = v.gt(2.0);
    assert_eq!(big.as_bool_slice(), Some(&[false, false, true][..]));
    let either = big.or(&v.eq_value(1.0))?;
    assert_eq!(either.as_bool_slice(), Some(&[true, false, true][..]));
    assert_eq!(either.not()?.as_bool_slice(), Some(&[false, true, false][..]));
    Ok(())
}

#[test]
fn test_arithmetic_broadcasts_scalars() -> Result<()> {
    let v = Vector::from(vec![2i64, 4, 6]);
    let halved = v.div(&Vector::scalar(2i64))?;
    assert_eq!(halved.dtype(), Dtype::Float);
    assert_eq!(halved.as_f64_slice(), Some(&[1.0, 2.0, 3.0][..]));
    assert!(v.add(&Vector::from(vec![1i64, 2])).is_err());
    Ok(())
}

#[test]
fn test_take_optional_widens_only_when_needed() {
    let v = Vector::from(vec![10i64, 20]);
    assert_eq!(v.take_optional(&[Some(1), Some(0)]).dtype(), Dtype::Integer);
    let widened = v.take_optional(&[Some(1), None]);
    assert_eq!(widened.dtype(), Dtype::Float);
    assert_eq!(widened.na_count(), 1);
}
