//! Derived columns and column-wise combination

use super::Table;
use crate::core::error::Result;
use crate::vector::Vector;

/// Callable computing a column from a table
pub type ColumnFn<'f> = Box<dyn Fn(&Table) -> Result<Vector> + 'f>;

impl Table {
    /// Add or overwrite columns computed from the table
    ///
    /// Every callable sees the input table, not the columns added before it.
    /// A result must have `nrow` elements or exactly one, which is broadcast.
    ///
    /// # Arguments
    /// * `columns` - `(name, callable)` pairs
    ///
    /// # Returns
    /// * `Result<Self>` - New table; untouched columns share storage
    pub fn modify<'f, I, S>(&self, columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, ColumnFn<'f>)>,
        S: Into<String>,
    {
        let mut computed = Vec::new();
        for (name, f) in columns {
            computed.push((name.into(), f(self)?));
        }
        let mut out = self.clone();
        for (name, vector) in computed {
            out.set_column(name, vector)?;
        }
        Ok(out)
    }

    /// Copy of the table with one column added or replaced
    pub fn with_column(&self, name: impl Into<String>, vector: Vector) -> Result<Self> {
        let mut out = self.clone();
        out.set_column(name, vector)?;
        Ok(out)
    }

    /// Call `f` for every row and collect the results
    ///
    /// # Arguments
    /// * `f` - Receives the table and the row position
    pub fn map<T, F>(&self, f: F) -> Vec<T>
    where
        F: Fn(&Table, usize) -> T,
    {
        (0..self.row_count).map(|i| f(self, i)).collect()
    }

    /// Append the columns of `others` that are not yet present
    pub fn cbind(&self, others: &[&Table]) -> Result<Self> {
        let mut out = self.clone();
        for other in others {
            for (name, column) in other.columns() {
                if out.contains_column(name) {
                    continue;
                }
                out.set_column(name, column.clone())?;
            }
        }
        Ok(out)
    }

    /// Columns of `self` not in `other`, followed by every column of `other`
    pub fn update(&self, other: &Table) -> Result<Self> {
        let (names, columns): (Vec<String>, Vec<Vector>) = self
            .columns()
            .filter(|(name, _)| !other.contains_column(name))
            .map(|(name, column)| (name.to_string(), column.clone()))
            .unzip();
        let row_count = if self.columns.is_empty() {
            other.row_count
        } else {
            self.row_count
        };
        let mut out = Table::from_parts(names, columns, row_count);
        for (name, column) in other.columns() {
            out.push_column(name.to_string(), column.clone())?;
        }
        Ok(out)
    }
}
