//! Aggregation descriptors

use std::fmt;
use std::sync::Arc;

use crate::core::data_value::Value;
use crate::core::dtype::Dtype;
use crate::core::error::Result;
use crate::table::Table;
use crate::vector::Vector;

/// Built-in per-group reductions
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReducerKind {
    /// Group size
    Count,
    /// Distinct values
    CountUnique,
    All,
    Any,
    First,
    Last,
    /// Element by position, negative counting from the end
    Nth(isize),
    Min,
    Max,
    Sum,
    Mean,
    Median,
    /// Standard deviation with delta degrees of freedom
    Std { ddof: usize },
    /// Variance with delta degrees of freedom
    Var { ddof: usize },
    /// Most frequent value, ties broken by first occurrence
    Mode,
    /// Type 7 quantile
    Quantile(f64),
}

impl ReducerKind {
    pub fn name(&self) -> &'static str {
        match self {
            ReducerKind::Count => "count",
            ReducerKind::CountUnique => "count_unique",
            ReducerKind::All => "all",
            ReducerKind::Any => "any",
            ReducerKind::First => "first",
            ReducerKind::Last => "last",
            ReducerKind::Nth(_) => "nth",
            ReducerKind::Min => "min",
            ReducerKind::Max => "max",
            ReducerKind::Sum => "sum",
            ReducerKind::Mean => "mean",
            ReducerKind::Median => "median",
            ReducerKind::Std { .. } => "std",
            ReducerKind::Var { .. } => "var",
            ReducerKind::Mode => "mode",
            ReducerKind::Quantile(_) => "quantile",
        }
    }

    /// Whether a group containing a missing value reduces to missing unless
    /// missing values are dropped first
    pub(crate) fn propagates_missing(&self) -> bool {
        !matches!(
            self,
            ReducerKind::Count
                | ReducerKind::CountUnique
                | ReducerKind::All
                | ReducerKind::Any
                | ReducerKind::First
                | ReducerKind::Last
                | ReducerKind::Nth(_)
        )
    }

    /// Missing values are dropped by default for everything but counts and positions
    pub(crate) fn drops_missing_by_default(&self) -> bool {
        !matches!(
            self,
            ReducerKind::Count | ReducerKind::First | ReducerKind::Last | ReducerKind::Nth(_)
        )
    }

    /// Dtype of the reduced column for an input column of `input`
    pub fn output_dtype(&self, input: Option<Dtype>) -> Dtype {
        let input = input.unwrap_or(Dtype::Integer);
        match self {
            ReducerKind::Count | ReducerKind::CountUnique => Dtype::Integer,
            ReducerKind::All | ReducerKind::Any => Dtype::Boolean,
            ReducerKind::Sum => match input {
                Dtype::Boolean | Dtype::Integer => Dtype::Integer,
                Dtype::Timedelta => Dtype::Timedelta,
                _ => Dtype::Float,
            },
            ReducerKind::Mean | ReducerKind::Median | ReducerKind::Quantile(_) => match input {
                Dtype::Date | Dtype::Datetime | Dtype::Timedelta => input,
                _ => Dtype::Float,
            },
            ReducerKind::Std { .. } | ReducerKind::Var { .. } => Dtype::Float,
            ReducerKind::First
            | ReducerKind::Last
            | ReducerKind::Nth(_)
            | ReducerKind::Min
            | ReducerKind::Max
            | ReducerKind::Mode => input,
        }
    }
}

/// A built-in reduction bound to a column
#[derive(Debug, Clone, PartialEq)]
pub struct Reducer {
    /// Input column, `None` for a plain row count
    pub column: Option<String>,
    pub kind: ReducerKind,
    /// Drop missing values before reducing
    pub drop_missing: bool,
}

impl Reducer {
    pub fn new(column: Option<String>, kind: ReducerKind) -> Self {
        Self {
            column,
            drop_missing: kind.drops_missing_by_default(),
            kind,
        }
    }

    /// Reduce one group's values
    pub(crate) fn reduce(&self, values: &Vector) -> Result<Value> {
        let missing = values.na_count();
        if !self.drop_missing && missing > 0 && self.kind.propagates_missing() {
            return Ok(Value::Na);
        }
        let present;
        let values = if self.drop_missing && missing > 0 {
            present = values.drop_na();
            &present
        } else {
            values
        };
        Ok(match self.kind {
            ReducerKind::Count => Value::Integer(values.len() as i64),
            ReducerKind::CountUnique => Value::Integer(values.unique().len() as i64),
            ReducerKind::All => Value::Boolean(values.all()?),
            ReducerKind::Any => Value::Boolean(values.any()?),
            ReducerKind::First => values.nth(0),
            ReducerKind::Last => values.nth(-1),
            ReducerKind::Nth(i) => values.nth(i),
            ReducerKind::Min => values.min(),
            ReducerKind::Max => values.max(),
            ReducerKind::Sum => values.sum()?,
            ReducerKind::Mean => values.mean()?,
            ReducerKind::Median => values.median()?,
            ReducerKind::Std { ddof } => values.std(ddof)?,
            ReducerKind::Var { ddof } => values.var(ddof)?,
            ReducerKind::Mode => values.mode(),
            ReducerKind::Quantile(q) => values.quantile(q)?,
        })
    }

    /// Reduce a group given as a sub-table
    pub(crate) fn evaluate(&self, group: &Table) -> Result<Value> {
        match &self.column {
            Some(name) => self.reduce(group.column(name)?),
            None => Ok(Value::Integer(group.nrow() as i64)),
        }
    }
}

/// Per-group callable
pub type AggregateFn = Arc<dyn Fn(&Table) -> Result<Value> + Send + Sync>;

/// One output column of [`crate::groupby::GroupBy::aggregate`]
#[derive(Clone)]
pub enum Aggregation {
    /// Built-in reduction, eligible for the accelerated strategy
    Reduce(Reducer),
    /// Arbitrary function of each group's sub-table
    Custom(AggregateFn),
}

impl Aggregation {
    /// Whether missing values are dropped before reducing; no effect on custom functions
    pub fn drop_missing(self, drop: bool) -> Self {
        match self {
            Aggregation::Reduce(mut r) => {
                r.drop_missing = drop;
                Aggregation::Reduce(r)
            }
            custom => custom,
        }
    }

    /// Delta degrees of freedom for `std` and `var`
    pub fn ddof(self, ddof: usize) -> Self {
        match self {
            Aggregation::Reduce(mut r) => {
                r.kind = match r.kind {
                    ReducerKind::Std { .. } => ReducerKind::Std { ddof },
                    ReducerKind::Var { .. } => ReducerKind::Var { ddof },
                    other => other,
                };
                Aggregation::Reduce(r)
            }
            custom => custom,
        }
    }

    pub fn reducer(&self) -> Option<&Reducer> {
        match self {
            Aggregation::Reduce(r) => Some(r),
            Aggregation::Custom(_) => None,
        }
    }

    pub(crate) fn evaluate(&self, group: &Table) -> Result<Value> {
        match self {
            Aggregation::Reduce(r) => r.evaluate(group),
            Aggregation::Custom(f) => f(group),
        }
    }

    /// Column of a finished aggregate
    pub(crate) fn finish(&self, table: &Table, values: Vec<Value>) -> Result<Vector> {
        match self {
            Aggregation::Reduce(r) => {
                let input = match &r.column {
                    Some(name) => Some(table.column(name)?.dtype()),
                    None => None,
                };
                Vector::new(values, Some(r.kind.output_dtype(input)))
            }
            Aggregation::Custom(_) => Vector::new(values, None),
        }
    }
}

impl fmt::Debug for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Aggregation::Reduce(r) => f.debug_tuple("Reduce").field(r).finish(),
            Aggregation::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
