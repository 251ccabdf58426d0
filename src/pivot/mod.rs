//! Reshaping between long and wide layouts

use std::collections::HashMap;

use crate::core::dtype::Dtype;
use crate::core::error::{Error, Result};
use crate::table::{row_key, Table};
use crate::vector::{Direction, Vector};

/// Rename hook applied to new column names in [`Table::pivot_wider`]
pub type RenameFn<'f> = &'f dyn Fn(&str) -> String;

/// Long-to-wide reshape
pub struct PivotWider<'a> {
    /// Source table
    table: &'a Table,

    /// Identifier columns, unique in the result
    ids: Vec<String>,

    /// Column holding the new column names
    names: String,

    /// Column holding the cell values
    values: String,

    rename: Option<RenameFn<'a>>,
}

impl<'a> PivotWider<'a> {
    /// Validate the columns of a reshape
    ///
    /// An empty `ids` means every column other than `names` and `values`.
    pub fn new<S: AsRef<str>>(
        table: &'a Table,
        ids: &[S],
        names: &str,
        values: &str,
        rename: Option<RenameFn<'a>>,
    ) -> Result<Self> {
        table.column(names)?;
        table.column(values)?;
        let ids: Vec<String> = if ids.is_empty() {
            table
                .colnames()
                .iter()
                .filter(|c| *c != names && *c != values)
                .cloned()
                .collect()
        } else {
            ids.iter().map(|s| s.as_ref().to_string()).collect()
        };
        for id in &ids {
            table.column(id)?;
        }
        Ok(Self {
            table,
            ids,
            names: names.to_string(),
            values: values.to_string(),
            rename,
        })
    }

    /// Build the wide table
    ///
    /// Rows follow the first appearance of each id tuple; new columns are
    /// sorted by the values of `names`, or as text once renamed. When an id tuple has several values for one name the
    /// last one wins, and cells without a value are missing. Rows whose name
    /// is missing are ignored.
    pub fn execute(&self) -> Result<Table> {
        let id_columns = self
            .ids
            .iter()
            .map(|id| self.table.column(id))
            .collect::<Result<Vec<_>>>()?;
        let name_column = self.table.column(&self.names)?;
        let value_column = self.table.column(&self.values)?;

        let mut row_of_key = HashMap::new();
        let mut first_rows = Vec::new();
        let mut wide_row = Vec::with_capacity(self.table.nrow());
        for i in 0..self.table.nrow() {
            let key = row_key(&id_columns, i);
            let next = first_rows.len();
            let row = *row_of_key.entry(key).or_insert(next);
            if row == next {
                first_rows.push(i);
            }
            wide_row.push(row);
        }

        // (first row, column name, source row per wide row)
        let mut cells: Vec<(usize, String, Vec<Option<usize>>)> = Vec::new();
        let mut cell_of_name = HashMap::new();
        for (i, &row) in wide_row.iter().enumerate() {
            if name_column.is_missing_at(i) {
                continue;
            }
            let raw = name_column.value_at(i).to_string();
            let name = match self.rename {
                Some(rename) => rename(&raw),
                None => raw,
            };
            let next = cells.len();
            let cell = *cell_of_name.entry(name.clone()).or_insert(next);
            if cell == next {
                cells.push((i, name, vec![None; first_rows.len()]));
            }
            cells[cell].2[row] = Some(i);
        }
        // Renamed columns sort as text, the rest by their name values
        match self.rename {
            Some(_) => cells.sort_by(|a, b| a.1.cmp(&b.1)),
            None => cells.sort_by(|a, b| name_column.cmp_at(a.0, b.0)),
        }

        let mut wide = if self.ids.is_empty() {
            Table::new()
        } else {
            self.table.select(&self.ids)?.take(&first_rows)?
        };
        for (_, name, positions) in cells {
            if wide.contains_column(&name) {
                return Err(Error::DuplicateColumnName(name));
            }
            wide.set_column(name, value_column.take_optional(&positions))?;
        }
        Ok(wide)
    }
}

impl Table {
    /// Stack every non-id column into `names`/`values` pairs
    ///
    /// # Arguments
    /// * `ids` - Identifier columns kept on every row
    /// * `names` - Name of the result column holding the former column names
    /// * `values` - Name of the result column holding the values, as objects
    ///
    /// # Returns
    /// * `Result<Table>` - Long table stably sorted by the ids
    pub fn pivot_longer<S: AsRef<str>>(&self, ids: &[S], names: &str, values: &str) -> Result<Table> {
        let id_names: Vec<&str> = ids.iter().map(AsRef::as_ref).collect();
        for id in &id_names {
            self.column(id)?;
        }
        let measured: Vec<(&str, &Vector)> = self
            .columns()
            .filter(|(name, _)| !id_names.contains(name))
            .collect();

        let nrow = self.nrow();
        let rows: Vec<usize> = (0..measured.len()).flat_map(|_| 0..nrow).collect();
        let mut long = if id_names.is_empty() {
            Table::new()
        } else {
            self.select(&id_names)?.take(&rows)?
        };

        let labels: Vec<&str> = measured
            .iter()
            .flat_map(|(name, _)| std::iter::repeat(*name).take(nrow))
            .collect();
        let stacked: Vec<Vector> = measured.iter().map(|(_, v)| v.as_object()).collect();
        let stacked: Vec<&Vector> = stacked.iter().collect();
        let stacked = if stacked.is_empty() {
            Vector::empty(Dtype::Object)
        } else {
            Vector::concat_all(&stacked)
        };
        long.set_column(names, Vector::from(labels))?;
        long.set_column(values, stacked)?;

        if id_names.is_empty() {
            return Ok(long);
        }
        long.sort(id_names.iter().map(|id| (*id, Direction::Ascending)))
    }

    /// Spread `names`/`values` pairs into columns, see [`PivotWider::execute`]
    pub fn pivot_wider<S: AsRef<str>>(
        &self,
        ids: &[S],
        names: &str,
        values: &str,
        rename: Option<RenameFn<'_>>,
    ) -> Result<Table> {
        PivotWider::new(self, ids, names, values, rename)?.execute()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::data_value::Value;

    fn downloads() -> Result<Table> {
        Table::from_columns([
            ("date", Vector::from(vec!["d1", "d1", "d2", "d2", "d1"])),
            ("category", Vector::from(vec!["Work", "Games", "Work", "Games", "Work"])),
            ("n", Vector::from(vec![1i64, 2, 3, 4, 5])),
        ])
    }

    #[test]
    fn wider_sorts_names_and_keeps_the_last_value() -> Result<()> {
        let lower = |s: &str| s.to_lowercase();
        let wide = downloads()?.pivot_wider(&["date"], "category", "n", Some(&lower))?;
        assert_eq!(
            wide.colnames(),
            &["date".to_string(), "games".to_string(), "work".to_string()]
        );
        assert_eq!(wide.ints("work")?, &[5, 3]);
        assert_eq!(wide.ints("games")?, &[2, 4]);
        Ok(())
    }

    #[test]
    fn wider_defaults_ids_and_fills_gaps() -> Result<()> {
        let long = downloads()?.head(3);
        let wide = long.pivot_wider::<&str>(&[], "category", "n", None)?;
        assert_eq!(wide["Games"].to_values(), vec![Value::Float(2.0), Value::Na]);
        Ok(())
    }

    #[test]
    fn longer_stacks_and_sorts_by_ids() -> Result<()> {
        let wide = Table::from_columns([
            ("id", Vector::from(vec![2i64, 1])),
            ("a", Vector::from(vec![10i64, 20])),
            ("b", Vector::from(vec!["x", "y"])),
        ])?;
        let long = wide.pivot_longer(&["id"], "name", "value")?;
        assert_eq!(long.ints("id")?, &[1, 1, 2, 2]);
        assert_eq!(long["name"], Vector::from(vec!["a", "b", "a", "b"]));
        assert!(long["value"].is_object());
        assert_eq!(long["value"].get(1)?, Value::from("y"));
        assert!(matches!(
            wide.pivot_longer(&["nope"], "name", "value"),
            Err(Error::ColumnNotFound(_))
        ));
        Ok(())
    }
}
