//! Column-oriented tables
//!
//! A [`Table`] is an ordered mapping from column name to [`Vector`], every
//! column having the same length. Transforms return new tables; columns they
//! leave untouched share storage with the source.

mod column_ops;
mod data_ops;
mod join;
mod row_ops;
mod select;
mod sort;

pub use column_ops::ColumnFn;
pub use join::{JoinBy, JoinType};
pub(crate) use row_ops::row_key;

use std::collections::HashMap;
use std::fmt;
use std::ops::Index;

use crate::core::data_value::Value;
use crate::core::dtype::Dtype;
use crate::core::error::{Error, Result};
use crate::vector::Vector;

/// Rectangular dataset of named, equally long vectors
#[derive(Clone, Default)]
pub struct Table {
    // Column data
    pub(crate) columns: Vec<Vector>,
    // Column name → index mapping
    pub(crate) column_indices: HashMap<String, usize>,
    // Column order
    pub(crate) column_names: Vec<String>,
    // Row count
    pub(crate) row_count: usize,
}

impl Table {
    /// Create a new empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table from named columns
    ///
    /// # Arguments
    /// * `columns` - Name and vector pairs; length-one vectors broadcast to the
    ///   longest column
    ///
    /// # Returns
    /// * `Result<Self>` - The table, or an error for duplicate names or
    ///   lengths that cannot be reconciled
    pub fn from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vector)>,
        S: Into<String>,
    {
        let columns: Vec<(String, Vector)> =
            columns.into_iter().map(|(name, v)| (name.into(), v)).collect();
        let nrow = columns.iter().map(|(_, v)| v.len()).max().unwrap_or(0);

        let mut table = Table::new();
        table.row_count = nrow;
        for (name, vector) in columns {
            if table.contains_column(&name) {
                return Err(Error::DuplicateColumnName(name));
            }
            table.push_column(name, vector)?;
        }
        Ok(table)
    }

    /// Create a table from rows of values, inferring each column's dtype
    pub fn from_rows<S: AsRef<str>>(names: &[S], rows: Vec<Vec<Value>>) -> Result<Self> {
        let mut columns: Vec<Vec<Value>> = vec![Vec::with_capacity(rows.len()); names.len()];
        for row in rows {
            if row.len() != names.len() {
                return Err(Error::LengthMismatch {
                    expected: names.len(),
                    actual: row.len(),
                });
            }
            for (column, value) in columns.iter_mut().zip(row) {
                column.push(value);
            }
        }
        let vectors = names
            .iter()
            .zip(columns)
            .map(|(name, values)| Ok((name.as_ref().to_string(), Vector::new(values, None)?)))
            .collect::<Result<Vec<_>>>()?;
        Self::from_columns(vectors)
    }

    /// Build a table whose columns are already validated
    pub(crate) fn from_parts(names: Vec<String>, columns: Vec<Vector>, row_count: usize) -> Self {
        let column_indices = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        Self {
            columns,
            column_indices,
            column_names: names,
            row_count,
        }
    }

    /// Broadcast a vector to the row count or fail
    fn fit_rows(&self, vector: Vector) -> Result<Vector> {
        if vector.len() == self.row_count {
            Ok(vector)
        } else if vector.len() == 1 {
            Ok(vector.take(&vec![0; self.row_count]))
        } else {
            Err(Error::InconsistentRowCount {
                expected: self.row_count,
                found: vector.len(),
            })
        }
    }

    fn push_column(&mut self, name: String, vector: Vector) -> Result<()> {
        let vector = self.fit_rows(vector)?;
        self.column_indices.insert(name.clone(), self.columns.len());
        self.column_names.push(name);
        self.columns.push(vector);
        Ok(())
    }

    /// Add or replace a column
    ///
    /// # Arguments
    /// * `name` - Column name
    /// * `vector` - Column data; length one broadcasts. The first column of an
    ///   empty table sets the row count.
    pub fn set_column(&mut self, name: impl Into<String>, vector: Vector) -> Result<()> {
        let name = name.into();
        if self.columns.is_empty() {
            self.row_count = vector.len();
        }
        match self.column_indices.get(&name) {
            Some(&idx) => {
                self.columns[idx] = self.fit_rows(vector)?;
                Ok(())
            }
            None => self.push_column(name, vector),
        }
    }

    /// Remove a column, returning it
    pub fn remove_column(&mut self, name: &str) -> Result<Vector> {
        let idx = self
            .column_indices
            .remove(name)
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))?;
        self.column_names.remove(idx);
        let removed = self.columns.remove(idx);
        for i in self.column_indices.values_mut() {
            if *i > idx {
                *i -= 1;
            }
        }
        if self.columns.is_empty() {
            self.row_count = 0;
        }
        Ok(removed)
    }

    /// Get the number of rows
    pub fn nrow(&self) -> usize {
        self.row_count
    }

    /// Get the number of columns
    pub fn ncol(&self) -> usize {
        self.columns.len()
    }

    /// Get column names in order
    pub fn colnames(&self) -> &[String] {
        &self.column_names
    }

    pub fn contains_column(&self, name: &str) -> bool {
        self.column_indices.contains_key(name)
    }

    /// Get a column by name
    pub fn column(&self, name: &str) -> Result<&Vector> {
        self.get(name)
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
    }

    /// Get a column by name, `None` when absent
    pub fn get(&self, name: &str) -> Option<&Vector> {
        self.column_indices.get(name).map(|&i| &self.columns[i])
    }

    /// Iterate over `(name, column)` pairs in order
    pub fn columns(&self) -> impl Iterator<Item = (&str, &Vector)> + '_ {
        self.column_names
            .iter()
            .map(String::as_str)
            .zip(self.columns.iter())
    }

    /// Dtype of each column in order
    pub fn dtypes(&self) -> Vec<(&str, Dtype)> {
        self.columns().map(|(name, v)| (name, v.dtype())).collect()
    }

    fn typed_column<'a, T: ?Sized>(
        &'a self,
        name: &str,
        expected: Dtype,
        slice: impl Fn(&'a Vector) -> Option<&'a T>,
    ) -> Result<&'a T> {
        let column = self.column(name)?;
        slice(column).ok_or_else(|| Error::ColumnTypeMismatch {
            name: name.to_string(),
            expected,
            found: column.dtype(),
        })
    }

    /// Boolean column as a slice
    pub fn bools(&self, name: &str) -> Result<&[bool]> {
        self.typed_column(name, Dtype::Boolean, Vector::as_bool_slice)
    }

    /// Integer column as a slice
    pub fn ints(&self, name: &str) -> Result<&[i64]> {
        self.typed_column(name, Dtype::Integer, Vector::as_i64_slice)
    }

    /// Float column as a slice, missing values are `NaN`
    pub fn floats(&self, name: &str) -> Result<&[f64]> {
        self.typed_column(name, Dtype::Float, Vector::as_f64_slice)
    }

    /// String column as a slice, missing values are empty
    pub fn strings(&self, name: &str) -> Result<&[String]> {
        self.typed_column(name, Dtype::String, Vector::as_string_slice)
    }

    /// Values of one row as `(name, value)` pairs
    pub fn row(&self, index: usize) -> Result<Vec<(&str, Value)>> {
        if index >= self.row_count {
            return Err(Error::IndexOutOfBounds {
                index,
                size: self.row_count,
            });
        }
        Ok(self
            .columns()
            .map(|(name, v)| (name, v.value_at(index)))
            .collect())
    }

    /// All rows as value lists, in column order
    pub fn to_rows(&self) -> Vec<Vec<Value>> {
        (0..self.row_count)
            .map(|i| self.columns.iter().map(|v| v.value_at(i)).collect())
            .collect()
    }

    /// Gather rows by position
    pub fn take(&self, rows: &[usize]) -> Result<Table> {
        if let Some(&bad) = rows.iter().find(|&&i| i >= self.row_count) {
            return Err(Error::IndexOutOfBounds {
                index: bad,
                size: self.row_count,
            });
        }
        Ok(self.take_unchecked(rows))
    }

    pub(crate) fn take_unchecked(&self, rows: &[usize]) -> Table {
        Table::from_parts(
            self.column_names.clone(),
            self.columns.iter().map(|v| v.take(rows)).collect(),
            rows.len(),
        )
    }

    /// Tables are equal when names, order, dtypes and values match; missing equals missing
    pub fn equal(&self, other: &Table) -> bool {
        self.row_count == other.row_count
            && self.column_names == other.column_names
            && self
                .columns
                .iter()
                .zip(other.columns.iter())
                .all(|(a, b)| a.equal(b))
    }
}

impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.equal(other)
    }
}

impl Index<&str> for Table {
    type Output = Vector;

    /// # Panics
    /// Panics if the column does not exist, use [`Table::column`] to handle that case.
    fn index(&self, name: &str) -> &Vector {
        match self.get(name) {
            Some(v) => v,
            None => panic!("column not found: {}", name),
        }
    }
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (name, column) in self.columns() {
            map.entry(&name, column);
        }
        map.finish()
    }
}
