//! Strategy selection for [`GroupBy::aggregate`](super::GroupBy::aggregate)

use log::debug;

use super::strategy::{AggregationStrategy, GenericStrategy};
use super::{Aggregation, Partition, ReducerKind};
use crate::accelerated::AcceleratedStrategy;
use crate::config::EngineConfig;
use crate::core::error::Result;
use crate::table::Table;
use crate::vector::{validate_quantile, Vector};

/// Check referenced columns and parameters before any work is done
pub(crate) fn validate(table: &Table, aggregations: &[Aggregation]) -> Result<()> {
    for reducer in aggregations.iter().filter_map(Aggregation::reducer) {
        if let Some(column) = &reducer.column {
            table.column(column)?;
        }
        if let ReducerKind::Quantile(q) = reducer.kind {
            validate_quantile(q)?;
        }
    }
    Ok(())
}

/// Aggregate with the accelerated strategy when the configuration allows it
/// and it supports the call, otherwise or on failure with the generic one
pub(crate) fn run(
    table: &Table,
    partition: &Partition,
    aggregations: &[Aggregation],
    config: &EngineConfig,
) -> Result<Vec<Vector>> {
    if config.accelerated.enabled {
        let accelerated = AcceleratedStrategy::new(config.accelerated.clone());
        if accelerated.supports(table, aggregations) {
            debug!(
                "aggregating {} groups with the {} strategy",
                partition.len(),
                accelerated.name()
            );
            match accelerated.aggregate(table, partition, aggregations) {
                Ok(columns) => return Ok(columns),
                Err(err) => debug!(
                    "{} strategy failed, falling back to {}: {}",
                    accelerated.name(),
                    GenericStrategy.name(),
                    err
                ),
            }
        }
    }
    debug!(
        "aggregating {} groups with the {} strategy",
        partition.len(),
        GenericStrategy.name()
    );
    GenericStrategy.aggregate(table, partition, aggregations)
}
