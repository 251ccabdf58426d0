//! Accelerated aggregation
//!
//! Built-in reducers over primitive columns are computed straight from the
//! column storage, group by group, with kernels resolved once per
//! `(reducer, dtype)` and optionally cached for the whole process. Large
//! partitions are reduced in parallel when the `parallel` feature is on.

mod cache;
mod kernels;

pub use cache::{clear_kernel_cache, kernel_cache_stats, CacheStats};

use crate::config::AcceleratedConfig;
use crate::core::data_value::Value;
use crate::core::dtype::Dtype;
use crate::core::error::{Error, Result};
use crate::groupby::{Aggregation, AggregationStrategy, Partition, Reducer};
use crate::table::Table;
use crate::vector::Vector;
use kernels::{apply, Kernel, Lane};

/// Reduces typed column slices without materializing sub-tables
#[derive(Debug, Clone, Default)]
pub struct AcceleratedStrategy {
    config: AcceleratedConfig,
}

impl AcceleratedStrategy {
    pub fn new(config: AcceleratedConfig) -> Self {
        Self { config }
    }

    /// Lane and kernel of one reducer, `None` when it cannot be accelerated
    fn plan<'t>(&self, table: &'t Table, reducer: &Reducer) -> Option<(Option<Lane<'t>>, Kernel)> {
        match &reducer.column {
            None => {
                let kernel = cache::lookup(&reducer.kind, Dtype::Integer, self.config.cache_kernels)?;
                Some((None, kernel))
            }
            Some(name) => {
                let lane = Lane::of(table.get(name)?)?;
                let kernel = cache::lookup(&reducer.kind, lane.dtype(), self.config.cache_kernels)?;
                Some((Some(lane), kernel))
            }
        }
    }

    fn reduce_groups(
        &self,
        partition: &Partition,
        lane: Option<Lane<'_>>,
        kernel: Kernel,
        reducer: &Reducer,
    ) -> Result<Vec<Value>> {
        let reduce = |rows: &Vec<usize>| match lane {
            Some(lane) => apply(kernel, lane, rows, reducer),
            None => Ok(Value::Integer(rows.len() as i64)),
        };

        #[cfg(feature = "parallel")]
        {
            if partition.len() >= self.config.parallel_threshold {
                use rayon::prelude::*;
                log::debug!("reducing {} groups in parallel", partition.len());
                return partition.groups().par_iter().map(reduce).collect();
            }
        }
        partition.groups().iter().map(reduce).collect()
    }
}

impl AggregationStrategy for AcceleratedStrategy {
    fn name(&self) -> &'static str {
        "accelerated"
    }

    fn supports(&self, table: &Table, aggregations: &[Aggregation]) -> bool {
        aggregations.iter().all(|agg| match agg {
            Aggregation::Reduce(reducer) => self.plan(table, reducer).is_some(),
            Aggregation::Custom(_) => false,
        })
    }

    fn aggregate(
        &self,
        table: &Table,
        partition: &Partition,
        aggregations: &[Aggregation],
    ) -> Result<Vec<Vector>> {
        let mut columns = Vec::with_capacity(aggregations.len());
        for agg in aggregations {
            let reducer = agg.reducer().ok_or_else(|| {
                Error::InvalidOperation("custom aggregations cannot be accelerated".into())
            })?;
            let (lane, kernel) = self.plan(table, reducer).ok_or_else(|| {
                Error::InvalidOperation(format!("no accelerated kernel for {}", reducer.kind.name()))
            })?;
            let values = self.reduce_groups(partition, lane, kernel, reducer)?;
            columns.push(agg.finish(table, values)?);
        }
        Ok(columns)
    }
}
