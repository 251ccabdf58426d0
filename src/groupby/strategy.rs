//! Aggregation strategies

use super::{Aggregation, Partition};
use crate::core::error::Result;
use crate::table::Table;
use crate::vector::Vector;

/// A way of computing aggregates over a partition
///
/// Implementations must agree on results; they differ only in how they get
/// there.
pub trait AggregationStrategy {
    /// Name used in log messages
    fn name(&self) -> &'static str;

    /// Whether this strategy can handle every aggregation of the call
    fn supports(&self, table: &Table, aggregations: &[Aggregation]) -> bool;

    /// One column per aggregation, one element per group
    fn aggregate(
        &self,
        table: &Table,
        partition: &Partition,
        aggregations: &[Aggregation],
    ) -> Result<Vec<Vector>>;
}

/// Materializes each group as a sub-table and evaluates every aggregation on it
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericStrategy;

impl AggregationStrategy for GenericStrategy {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn supports(&self, _table: &Table, _aggregations: &[Aggregation]) -> bool {
        true
    }

    fn aggregate(
        &self,
        table: &Table,
        partition: &Partition,
        aggregations: &[Aggregation],
    ) -> Result<Vec<Vector>> {
        let mut values: Vec<Vec<_>> = aggregations
            .iter()
            .map(|_| Vec::with_capacity(partition.len()))
            .collect();
        for rows in partition.groups() {
            let group = table.take_unchecked(rows);
            for (agg, out) in aggregations.iter().zip(values.iter_mut()) {
                out.push(agg.evaluate(&group)?);
            }
        }
        aggregations
            .iter()
            .zip(values)
            .map(|(agg, values)| agg.finish(table, values))
            .collect()
    }
}
