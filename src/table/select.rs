//! Column selection, renaming and positional slicing

use std::collections::HashSet;

use super::Table;
use crate::core::error::{Error, Result};

impl Table {
    /// Select columns to create a new table
    ///
    /// # Arguments
    /// * `columns` - Column names, in the order wanted in the result
    ///
    /// # Returns
    /// * `Result<Self>` - New table sharing the selected columns
    pub fn select<I, S>(&self, columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names = Vec::new();
        let mut vectors = Vec::new();
        let mut seen = HashSet::new();
        for name in columns {
            let name = name.as_ref();
            let column = self.column(name)?;
            if seen.insert(name.to_string()) {
                names.push(name.to_string());
                vectors.push(column.clone());
            }
        }
        let row_count = if vectors.is_empty() { 0 } else { self.row_count };
        Ok(Table::from_parts(names, vectors, row_count))
    }

    /// Drop columns, keeping the rest in table order
    pub fn unselect<I, S>(&self, columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut dropped = HashSet::new();
        for name in columns {
            let name = name.as_ref();
            self.column(name)?;
            dropped.insert(name.to_string());
        }
        self.select(
            self.column_names
                .iter()
                .filter(|name| !dropped.contains(*name)),
        )
    }

    /// Rename columns
    ///
    /// # Arguments
    /// * `renames` - `(from, to)` pairs; column order is unchanged
    pub fn rename<I, S, T>(&self, renames: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, T)>,
        S: AsRef<str>,
        T: Into<String>,
    {
        let mut names = self.column_names.clone();
        for (from, to) in renames {
            let from = from.as_ref();
            let idx = *self
                .column_indices
                .get(from)
                .ok_or_else(|| Error::ColumnNotFound(from.to_string()))?;
            names[idx] = to.into();
        }
        let mut seen = HashSet::new();
        if let Some(dup) = names.iter().find(|name| !seen.insert(name.as_str())) {
            return Err(Error::DuplicateColumnName(dup.clone()));
        }
        Ok(Table::from_parts(names, self.columns.clone(), self.row_count))
    }

    /// Keep rows and columns by position
    ///
    /// # Arguments
    /// * `rows` - Row positions, `None` for all rows
    /// * `cols` - Column positions, `None` for all columns
    pub fn slice(&self, rows: Option<&[usize]>, cols: Option<&[usize]>) -> Result<Self> {
        let rows = match rows {
            Some(rows) => Some(self.take(rows)?),
            None => None,
        };
        let source = rows.as_ref().unwrap_or(self);
        match cols {
            Some(cols) => {
                let names = cols
                    .iter()
                    .map(|&i| {
                        self.column_names
                            .get(i)
                            .ok_or(Error::IndexOutOfBounds {
                                index: i,
                                size: self.ncol(),
                            })
                    })
                    .collect::<Result<Vec<_>>>()?;
                source.select(names)
            }
            None => Ok(source.clone()),
        }
    }

    /// Drop rows and columns by position
    pub fn slice_off(&self, rows: Option<&[usize]>, cols: Option<&[usize]>) -> Result<Self> {
        let keep_rows = rows.map(|rows| complement(rows, self.row_count));
        let keep_cols = cols.map(|cols| complement(cols, self.ncol()));
        self.slice(keep_rows.as_deref(), keep_cols.as_deref())
    }
}

fn complement(positions: &[usize], len: usize) -> Vec<usize> {
    let drop: HashSet<usize> = positions.iter().copied().collect();
    (0..len).filter(|i| !drop.contains(i)).collect()
}
