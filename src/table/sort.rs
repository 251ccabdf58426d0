//! Multi-key stable sorting

use std::cmp::Ordering;

use super::Table;
use crate::core::error::{Error, Result};
use crate::vector::{Direction, Vector};

impl Table {
    /// Sort rows by one or more columns
    ///
    /// Keys are evaluated left to right and the sort is stable, so rows that
    /// compare equal on every key keep their order. Missing values go last for
    /// each key whatever its direction.
    ///
    /// # Arguments
    /// * `keys` - `(column, direction)` pairs
    ///
    /// # Returns
    /// * `Result<Self>` - A new sorted table
    pub fn sort<I, S>(&self, keys: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Direction)>,
        S: AsRef<str>,
    {
        let keys: Vec<(&Vector, Direction)> = keys
            .into_iter()
            .map(|(name, direction)| Ok((self.column(name.as_ref())?, direction)))
            .collect::<Result<_>>()?;
        if keys.is_empty() {
            return Err(Error::InvalidInput("sort needs at least one key".into()));
        }

        let mut order: Vec<usize> = (0..self.row_count).collect();
        order.sort_by(|&a, &b| {
            keys.iter()
                .map(|(column, direction)| column.cmp_rows(a, b, *direction))
                .find(|ord| *ord != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });
        Ok(self.take_unchecked(&order))
    }

    /// Ascending sort by the given columns
    pub fn sort_by<S: AsRef<str>>(&self, columns: &[S]) -> Result<Self> {
        self.sort(columns.iter().map(|c| (c.as_ref(), Direction::Ascending)))
    }
}
