//! tabrs: an in-memory columnar table engine
//!
//! A [`Table`] is an ordered set of equally long, named [`Vector`] columns.
//! Every dtype has a missing-value representation, tables are never mutated
//! in place, and joins match each row to the first matching row of the other
//! table. Grouped aggregation picks an accelerated strategy for built-in
//! reducers and falls back to a generic one for everything else.
//!
//! ```ignore
//! use tabrs::{agg, Table, Vector};
//!
//! let t = Table::from_columns([
//!     ("borough", Vector::from(vec!["Bronx", "Brooklyn", "Bronx"])),
//!     ("rating", Vector::from(vec![3.0, 4.5, 5.0])),
//! ])?;
//! let summary = t
//!     .group_by(["borough"])?
//!     .aggregate([("n", agg::count()), ("rating", agg::mean("rating"))])?;
//! ```

pub mod accelerated;
pub mod agg;
pub mod config;
pub mod core;
pub mod groupby;
pub mod na;
pub mod pivot;
pub mod table;
pub mod vector;

pub use crate::core::data_value::Value;
pub use crate::core::dtype::Dtype;
pub use crate::core::error::{Error, Result};

pub use accelerated::{clear_kernel_cache, kernel_cache_stats, AcceleratedStrategy, CacheStats};
pub use config::{global_config, set_global_config, AcceleratedConfig, EngineConfig};
pub use groupby::{
    AggregateFn, Aggregation, AggregationStrategy, GenericStrategy, GroupBy, Partition, Reducer,
    ReducerKind,
};
pub use pivot::{PivotWider, RenameFn};
pub use table::{ColumnFn, JoinBy, JoinType, Table};
pub use vector::{Direction, RankMethod, Vector};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
