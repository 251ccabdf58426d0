//! Grouped aggregation and transformation
//!
//! [`Table::group_by`] only records the key columns. Each operation on the
//! returned [`GroupBy`] partitions the rows, runs, and hands back a plain
//! [`Table`].

mod aggregation;
mod strategy;
mod transform;
mod types;

pub use strategy::{AggregationStrategy, GenericStrategy};
pub use types::{AggregateFn, Aggregation, Reducer, ReducerKind};

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::config::EngineConfig;
use crate::core::error::{Error, Result};
use crate::table::{row_key, Table};
use crate::vector::{Direction, Vector};

/// Row indices of every group
#[derive(Debug, Clone, Default)]
pub struct Partition {
    groups: Vec<Vec<usize>>,
}

impl Partition {
    /// Partition rows by the key tuple over `keys`, groups in first-appearance order
    pub(crate) fn new(keys: &[&Vector], nrow: usize) -> Self {
        let mut index = HashMap::new();
        let mut groups: Vec<Vec<usize>> = Vec::new();
        for row in 0..nrow {
            let next = groups.len();
            let group = *index.entry(row_key(keys, row)).or_insert(next);
            if group == next {
                groups.push(Vec::new());
            }
            groups[group].push(row);
        }
        Self { groups }
    }

    /// Row indices per group, each in table order
    pub fn groups(&self) -> &[Vec<usize>] {
        &self.groups
    }

    /// First row of each group
    pub fn first_rows(&self) -> Vec<usize> {
        self.groups.iter().map(|g| g[0]).collect()
    }

    /// Number of groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Table marked for grouped operations
#[derive(Debug)]
pub struct GroupBy<'a> {
    table: &'a Table,
    keys: Vec<String>,
    config: Option<EngineConfig>,
}

impl Table {
    /// Group rows by the given columns
    ///
    /// # Arguments
    /// * `columns` - Key columns; missing values form a group of their own
    ///
    /// # Returns
    /// * `Result<GroupBy>` - Grouping marker borrowing this table
    pub fn group_by<I, S>(&self, columns: I) -> Result<GroupBy<'_>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keys: Vec<String> = columns
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .collect();
        for key in &keys {
            self.column(key)?;
        }
        Ok(GroupBy {
            table: self,
            keys,
            config: None,
        })
    }

    /// Row count per distinct key tuple, in a column named `n`
    pub fn count<S: AsRef<str>>(&self, columns: &[S]) -> Result<Table> {
        self.group_by(columns)?
            .aggregate([("n", crate::agg::count())])
    }

    /// Row indices of each group, groups in ascending key order
    pub fn split<S: AsRef<str>>(&self, columns: &[S]) -> Result<Vec<Vec<usize>>> {
        let keys = self.key_columns(columns)?;
        let mut groups = Partition::new(&keys, self.row_count).groups;
        groups.sort_by(|a, b| {
            keys.iter()
                .map(|k| k.cmp_rows(a[0], b[0], Direction::Ascending))
                .find(|ord| *ord != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });
        Ok(groups)
    }
}

impl<'a> GroupBy<'a> {
    /// Use `config` for this call instead of the process-wide configuration
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = Some(config);
        self
    }

    fn config(&self) -> EngineConfig {
        self.config
            .clone()
            .unwrap_or_else(|| crate::config::global_config().clone())
    }

    fn key_vectors(&self) -> Result<Vec<&'a Vector>> {
        self.keys.iter().map(|k| self.table.column(k)).collect()
    }

    fn partition(&self) -> Result<Partition> {
        Ok(Partition::new(&self.key_vectors()?, self.table.nrow()))
    }

    /// One row per group: the key columns followed by one column per aggregation
    ///
    /// # Arguments
    /// * `aggregations` - `(name, aggregation)` pairs, see [`crate::agg`]
    ///
    /// # Returns
    /// * `Result<Table>` - Groups in order of first appearance
    pub fn aggregate<I, S>(self, aggregations: I) -> Result<Table>
    where
        I: IntoIterator<Item = (S, Aggregation)>,
        S: Into<String>,
    {
        let (names, aggs): (Vec<String>, Vec<Aggregation>) = aggregations
            .into_iter()
            .map(|(name, agg)| (name.into(), agg))
            .unzip();
        aggregation::validate(self.table, &aggs)?;

        let partition = self.partition()?;
        let columns = aggregation::run(self.table, &partition, &aggs, &self.config())?;

        let first_rows = partition.first_rows();
        let mut out = Vec::with_capacity(self.keys.len() + names.len());
        for (key, vector) in self.keys.iter().zip(self.key_vectors()?) {
            out.push((key.clone(), vector.take(&first_rows)));
        }
        for (name, column) in names.into_iter().zip(columns) {
            if out.iter().any(|(n, _)| *n == name) {
                return Err(Error::DuplicateColumnName(name));
            }
            out.push((name, column));
        }
        Table::from_columns(out)
    }
}
