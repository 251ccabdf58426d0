//! Aggregation factories for [`GroupBy::aggregate`](crate::groupby::GroupBy::aggregate)
//!
//! ```ignore
//! use tabrs::agg;
//!
//! let summary = table
//!     .group_by(["borough"])?
//!     .aggregate([("n", agg::count()), ("mean_rating", agg::mean("rating"))])?;
//! ```

use std::sync::Arc;

use crate::core::data_value::Value;
use crate::core::error::Result;
use crate::groupby::{Aggregation, Reducer, ReducerKind};
use crate::table::Table;

fn reduce(column: impl Into<String>, kind: ReducerKind) -> Aggregation {
    Aggregation::Reduce(Reducer::new(Some(column.into()), kind))
}

/// Number of rows in each group
pub fn count() -> Aggregation {
    Aggregation::Reduce(Reducer::new(None, ReducerKind::Count))
}

/// Number of distinct non-missing values
pub fn count_unique(column: impl Into<String>) -> Aggregation {
    reduce(column, ReducerKind::CountUnique)
}

pub fn all(column: impl Into<String>) -> Aggregation {
    reduce(column, ReducerKind::All)
}

pub fn any(column: impl Into<String>) -> Aggregation {
    reduce(column, ReducerKind::Any)
}

pub fn first(column: impl Into<String>) -> Aggregation {
    reduce(column, ReducerKind::First)
}

pub fn last(column: impl Into<String>) -> Aggregation {
    reduce(column, ReducerKind::Last)
}

/// Element at `index`; negative indices count from the end
pub fn nth(column: impl Into<String>, index: isize) -> Aggregation {
    reduce(column, ReducerKind::Nth(index))
}

pub fn min(column: impl Into<String>) -> Aggregation {
    reduce(column, ReducerKind::Min)
}

pub fn max(column: impl Into<String>) -> Aggregation {
    reduce(column, ReducerKind::Max)
}

pub fn sum(column: impl Into<String>) -> Aggregation {
    reduce(column, ReducerKind::Sum)
}

pub fn mean(column: impl Into<String>) -> Aggregation {
    reduce(column, ReducerKind::Mean)
}

pub fn median(column: impl Into<String>) -> Aggregation {
    reduce(column, ReducerKind::Median)
}

/// Standard deviation, population by default; see [`Aggregation::ddof`]
pub fn std(column: impl Into<String>) -> Aggregation {
    reduce(column, ReducerKind::Std { ddof: 0 })
}

/// Variance, population by default; see [`Aggregation::ddof`]
pub fn var(column: impl Into<String>) -> Aggregation {
    reduce(column, ReducerKind::Var { ddof: 0 })
}

pub fn mode(column: impl Into<String>) -> Aggregation {
    reduce(column, ReducerKind::Mode)
}

/// Type 7 quantile, `q` in `[0, 1]`
pub fn quantile(column: impl Into<String>, q: f64) -> Aggregation {
    reduce(column, ReducerKind::Quantile(q))
}

/// Arbitrary function of each group's sub-table
///
/// Always evaluated by the generic strategy.
pub fn custom<F>(f: F) -> Aggregation
where
    F: Fn(&Table) -> Result<Value> + Send + Sync + 'static,
{
    Aggregation::Custom(Arc::new(f))
}
