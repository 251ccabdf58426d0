//! Row-wise concatenation

use super::Table;
use crate::core::dtype::Dtype;
use crate::core::error::{Error, Result};
use crate::vector::Vector;

impl Table {
    /// Concatenate tables row-wise
    ///
    /// The result has the union of column names in first-seen order. A table
    /// lacking a column contributes missing values of that column's dtype.
    ///
    /// # Arguments
    /// * `tables` - Tables to stack, in order
    ///
    /// # Returns
    /// * `Result<Self>` - The stacked table, or `ColumnTypeMismatch` naming a
    ///   column whose dtypes have no common supertype
    pub fn concat(tables: &[&Table]) -> Result<Self> {
        let mut names: Vec<&str> = Vec::new();
        let mut dtypes: Vec<Dtype> = Vec::new();
        for table in tables {
            for (name, column) in table.columns() {
                match names.iter().position(|n| *n == name) {
                    Some(i) => {
                        dtypes[i] = dtypes[i].common(column.dtype()).ok_or_else(|| {
                            Error::ColumnTypeMismatch {
                                name: name.to_string(),
                                expected: dtypes[i],
                                found: column.dtype(),
                            }
                        })?;
                    }
                    None => {
                        names.push(name);
                        dtypes.push(column.dtype());
                    }
                }
            }
        }

        let row_count = tables.iter().map(|t| t.row_count).sum();
        let mut columns = Vec::with_capacity(names.len());
        for (name, &dtype) in names.iter().zip(&dtypes) {
            let parts: Vec<Vector> = tables
                .iter()
                .map(|t| match t.get(name) {
                    Some(column) => column.clone(),
                    None => Vector::missing(dtype, t.row_count),
                })
                .collect();
            let refs: Vec<&Vector> = parts.iter().collect();
            columns.push(Vector::concat_all(&refs));
        }
        Ok(Table::from_parts(
            names.into_iter().map(String::from).collect(),
            columns,
            row_count,
        ))
    }

    /// This table followed by `others`, see [`Table::concat`]
    pub fn rbind(&self, others: &[&Table]) -> Result<Self> {
        let mut all = Vec::with_capacity(others.len() + 1);
        all.push(self);
        all.extend_from_slice(others);
        Table::concat(&all)
    }
}
