use tabrs::{ColumnFn, Direction, Dtype, Error, Result, Table, Value, Vector};

fn listings() -> Result<Table> {
    Table::from_columns([
        ("hood", Vector::from(vec!["Bronx", "Brooklyn", "Bronx", "Queens", "Brooklyn"])),
        ("price", Vector::from(vec![Some(90.0), Some(120.0), None, Some(75.0), Some(120.0)])),
        ("rooms", Vector::from(vec![1i64, 3, 2, 1, 2])),
    ])
}

#[test]
fn test_construction_checks_shapes() {
    let err = Table::from_columns([
        ("a", Vector::from(vec![1i64, 2])),
        ("b", Vector::from(vec![1i64, 2, 3])),
    ]);
    assert!(matches!(err, Err(Error::InconsistentRowCount { .. })));

    let err = Table::from_columns([
        ("a", Vector::from(vec![1i64])),
        ("a", Vector::from(vec![2i64])),
    ]);
    assert!(matches!(err, Err(Error::DuplicateColumnName(_))));
}

#[test]
fn test_scalar_columns_are_broadcast() -> Result<()> {
    let t = Table::from_columns([
        ("a", Vector::from(vec![1i64, 2, 3])),
        ("b", Vector::scalar("x")),
    ])?;
    assert_eq!(t.nrow(), 3);
    assert_eq!(t.strings("b")?, &["x", "x", "x"]);
    Ok(())
}

#[test]
fn test_filter_and_filter_out_partition_the_rows() -> Result<()> {
    let t = listings()?;
    let mask = t.column("rooms")?.ge(2i64);
    let kept = t.filter(&mask)?;
    let dropped = t.filter_out(&mask)?;
    assert_eq!(kept.nrow() + dropped.nrow(), t.nrow());
    assert_eq!(kept.ints("rooms")?, &[3, 2, 2]);
    assert_eq!(dropped.ints("rooms")?, &[1, 1]);
    let rejoined = Table::concat(&[&kept, &dropped])?;
    assert!(rejoined
        .sort_by(&["hood", "rooms"])?
        .equal(&t.sort_by(&["hood", "rooms"])?));
    Ok(())
}

#[test]
fn test_filter_eq_and_closures() -> Result<()> {
    let t = listings()?;
    let bronx = t.filter_eq([("hood", "Bronx")])?;
    assert_eq!(bronx.nrow(), 2);

    let cheap = t.filter_with(|t| Ok(t.column("price")?.lt(100.0)))?;
    assert_eq!(cheap.strings("hood")?, &["Bronx", "Queens"]);

    assert!(t.filter(&Vector::from(vec![1i64, 0, 1, 0, 1])).is_err());
    assert!(matches!(
        t.filter(&Vector::from(vec![true, false])),
        Err(Error::LengthMismatch { .. })
    ));
    Ok(())
}

#[test]
fn test_sort_is_stable_with_missing_last() -> Result<()> {
    let t = listings()?;
    let sorted = t.sort([("price", Direction::Descending)])?;
    assert_eq!(sorted.ints("rooms")?, &[3, 2, 1, 1, 2]);
    assert_eq!(sorted.column("price")?.get(4)?, Value::Na);

    // Sorting a sorted table changes nothing
    assert!(sorted.sort([("price", Direction::Descending)])?.equal(&sorted));

    let by_two = t.sort([("hood", Direction::Ascending), ("rooms", Direction::Descending)])?;
    assert_eq!(by_two.strings("hood")?, &["Bronx", "Bronx", "Brooklyn", "Brooklyn", "Queens"]);
    assert_eq!(by_two.ints("rooms")?, &[2, 1, 3, 2, 1]);

    let no_keys: [(&str, Direction); 0] = [];
    assert!(matches!(t.sort(no_keys), Err(Error::InvalidInput(_))));
    Ok(())
}

#[test]
fn test_unique_and_drop_na() -> Result<()> {
    let t = listings()?;
    let hoods = t.unique(&["hood"])?;
    assert_eq!(hoods.strings("hood")?, &["Bronx", "Brooklyn", "Queens"]);

    let no_cols: [&str; 0] = [];
    assert_eq!(t.unique(&no_cols)?.nrow(), 5);
    // No columns to check means nothing is dropped
    assert_eq!(t.drop_na(&no_cols)?.nrow(), 5);
    assert_eq!(t.drop_na(&["price", "rooms"])?.nrow(), 4);
    assert_eq!(t.drop_na(&["rooms"])?.nrow(), 5);
    Ok(())
}

#[test]
fn test_select_rename_and_slice() -> Result<()> {
    let t = listings()?;
    let picked = t.select(["rooms", "hood"])?;
    assert_eq!(picked.colnames(), &["rooms", "hood"]);
    assert!(matches!(t.select(["nope"]), Err(Error::ColumnNotFound(_))));

    let renamed = t.rename([("price", "usd")])?;
    assert_eq!(renamed.colnames(), &["hood", "usd", "rooms"]);

    let sliced = t.slice(Some(&[0, 4][..]), Some(&[2][..]))?;
    assert_eq!(sliced.colnames(), &["rooms"]);
    assert_eq!(sliced.ints("rooms")?, &[1, 2]);

    let rest = t.slice_off(Some(&[0, 1, 2][..]), None)?;
    assert_eq!(rest.strings("hood")?, &["Queens", "Brooklyn"]);
    assert_eq!(t.unselect(["price"])?.ncol(), 2);
    Ok(())
}

#[test]
fn test_modify_sees_the_input_table() -> Result<()> {
    let t = listings()?;
    let out = t.modify([
        (
            "per_room",
            Box::new(|x: &Table| x.column("price")?.div(x.column("rooms")?)) as ColumnFn,
        ),
        (
            "rooms",
            Box::new(|x: &Table| x.column("rooms")?.mul(&Vector::scalar(10i64))) as ColumnFn,
        ),
    ])?;
    assert_eq!(out.colnames(), &["hood", "price", "rooms", "per_room"]);
    assert_eq!(out.ints("rooms")?, &[10, 30, 20, 10, 20]);
    assert_eq!(out.floats("per_room")?[1], 40.0);
    // The source table is untouched
    assert_eq!(t.ints("rooms")?, &[1, 3, 2, 1, 2]);
    Ok(())
}

#[test]
fn test_concat_unions_columns() -> Result<()> {
    let a = Table::from_columns([("x", Vector::from(vec![1i64, 2]))])?;
    let b = Table::from_columns([
        ("x", Vector::from(vec![0.5])),
        ("y", Vector::from(vec!["q"])),
    ])?;
    let c = Table::concat(&[&a, &b])?;
    assert_eq!(c.nrow(), 3);
    assert_eq!(c.column("x")?.dtype(), Dtype::Float);
    assert_eq!(c.column("y")?.na_count(), 2);

    let dates = Table::from_columns([(
        "x",
        Vector::from(vec![chrono::NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()]),
    )])?;
    assert!(matches!(
        Table::concat(&[&a, &dates]),
        Err(Error::ColumnTypeMismatch { .. })
    ));
    Ok(())
}

#[test]
fn test_from_rows_and_to_rows() -> Result<()> {
    let t = Table::from_rows(
        &["name", "age"],
        vec![
            vec![Value::from("ann"), Value::from(31i64)],
            vec![Value::from("bob"), Value::Na],
        ],
    )?;
    assert_eq!(t.column("age")?.dtype(), Dtype::Float);
    assert_eq!(t.to_rows()[0], vec![Value::from("ann"), Value::Float(31.0)]);
    assert_eq!(t.row(1)?[1], ("age", Value::Na));
    Ok(())
}
