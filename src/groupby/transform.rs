//! Grouped column computation

use super::GroupBy;
use crate::core::error::{Error, Result};
use crate::table::{ColumnFn, Table};
use crate::vector::Vector;

impl<'a> GroupBy<'a> {
    /// Add or overwrite columns computed per group
    ///
    /// Each callable runs once per group on that group's rows and must
    /// return as many elements as the group has rows, or one to broadcast.
    /// Results land back at the rows they came from.
    pub fn modify<'f, I, S>(self, columns: I) -> Result<Table>
    where
        I: IntoIterator<Item = (S, ColumnFn<'f>)>,
        S: Into<String>,
    {
        let partition = self.partition()?;
        let groups = partition.groups();

        // Row position of each table row in group-concatenated order
        let mut position = vec![0; self.table.nrow()];
        for (i, &row) in groups.iter().flatten().enumerate() {
            position[row] = i;
        }

        let mut computed = Vec::new();
        for (name, f) in columns {
            let mut parts = Vec::with_capacity(groups.len());
            for rows in groups {
                let part = f(&self.table.take_unchecked(rows))?;
                parts.push(match part.len() {
                    n if n == rows.len() => part,
                    1 => part.take(&vec![0; rows.len()]),
                    n => {
                        return Err(Error::InconsistentRowCount {
                            expected: rows.len(),
                            found: n,
                        })
                    }
                });
            }
            let parts: Vec<&Vector> = parts.iter().collect();
            computed.push((name.into(), Vector::concat_all(&parts).take(&position)));
        }

        let mut out = self.table.clone();
        for (name, vector) in computed {
            out.set_column(name, vector)?;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::data_value::Value;

    #[test]
    fn results_are_scattered_back_to_their_rows() -> Result<()> {
        let t = Table::from_columns([
            ("hood", Vector::from(vec!["a", "b", "a", "b"])),
            ("price", Vector::from(vec![10.0, 100.0, 30.0, 300.0])),
        ])?;
        let out = t.group_by(["hood"])?.modify([
            (
                "share",
                Box::new(|g: &Table| {
                    let total = match g["price"].sum()? {
                        Value::Float(x) => x,
                        _ => f64::NAN,
                    };
                    g["price"].div(&Vector::scalar(total))
                }) as ColumnFn,
            ),
            ("size", Box::new(|g: &Table| Ok(Vector::scalar(g.nrow() as i64))) as ColumnFn),
        ])?;
        assert_eq!(out.floats("share")?, &[0.25, 0.25, 0.75, 0.75]);
        assert_eq!(out.ints("size")?, &[2, 2, 2, 2]);
        assert!(out["price"].shares_storage(&t["price"]));
        Ok(())
    }

    #[test]
    fn wrong_group_lengths_fail() -> Result<()> {
        let t = Table::from_columns([("k", Vector::from(vec![1i64, 1, 2]))])?;
        let err = t
            .group_by(["k"])?
            .modify([("x", Box::new(|_: &Table| Ok(Vector::from(vec![1i64, 2, 3]))) as ColumnFn)])
            .unwrap_err();
        assert!(matches!(err, Error::InconsistentRowCount { .. }));
        Ok(())
    }
}
