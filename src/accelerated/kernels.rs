//! Typed reduction kernels
//!
//! A kernel reduces one group of a primitive column, addressed by row
//! indices into the column's storage, without building a sub-table.
//! Results match [`Reducer::reduce`] on the same rows exactly.

use num_traits::ToPrimitive;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::core::data_value::Value;
use crate::core::dtype::Dtype;
use crate::core::error::Result;
use crate::groupby::{Reducer, ReducerKind};
use crate::na as sentinel;
use crate::vector::{
    from_number, mean_of, quantile_sorted, sort_floats, variance_of, Vector, VectorData,
};

/// Borrowed storage of a primitive column
#[derive(Debug, Clone, Copy)]
pub(crate) enum Lane<'a> {
    Boolean(&'a [bool]),
    Integer(&'a [i64]),
    Float(&'a [f64]),
    Date(&'a [i32]),
    Datetime(&'a [i64]),
}

impl<'a> Lane<'a> {
    /// `None` for dtypes without a lane
    pub(crate) fn of(vector: &'a Vector) -> Option<Self> {
        match vector.data() {
            VectorData::Boolean(v) => Some(Lane::Boolean(v)),
            VectorData::Integer(v) => Some(Lane::Integer(v)),
            VectorData::Float(v) => Some(Lane::Float(v)),
            VectorData::Date(v) => Some(Lane::Date(v)),
            VectorData::Datetime(v) => Some(Lane::Datetime(v)),
            _ => None,
        }
    }

    pub(crate) fn dtype(&self) -> Dtype {
        match self {
            Lane::Boolean(_) => Dtype::Boolean,
            Lane::Integer(_) => Dtype::Integer,
            Lane::Float(_) => Dtype::Float,
            Lane::Date(_) => Dtype::Date,
            Lane::Datetime(_) => Dtype::Datetime,
        }
    }

    pub(crate) fn is_missing(&self, i: usize) -> bool {
        match self {
            Lane::Boolean(_) | Lane::Integer(_) => false,
            Lane::Float(v) => sentinel::is_na_float(v[i]),
            Lane::Date(v) => sentinel::is_na_date(v[i]),
            Lane::Datetime(v) => sentinel::is_na_timestamp(v[i]),
        }
    }

    fn number(&self, i: usize) -> f64 {
        let x = match self {
            Lane::Boolean(v) => u8::from(v[i]).to_f64(),
            Lane::Integer(v) => v[i].to_f64(),
            Lane::Float(v) => Some(v[i]),
            Lane::Date(v) => v[i].to_f64(),
            Lane::Datetime(v) => v[i].to_f64(),
        };
        x.unwrap_or(f64::NAN)
    }

    fn value(&self, i: usize) -> Value {
        if self.is_missing(i) {
            return Value::Na;
        }
        match self {
            Lane::Boolean(v) => Value::Boolean(v[i]),
            Lane::Integer(v) => Value::Integer(v[i]),
            Lane::Float(v) => Value::Float(v[i]),
            Lane::Date(v) => sentinel::days_to_date(v[i]).into(),
            Lane::Datetime(v) => sentinel::micros_to_datetime(v[i]).into(),
        }
    }

    /// Identity of an element; missing elements share `None`
    fn key(&self, i: usize) -> Option<u64> {
        if self.is_missing(i) {
            return None;
        }
        Some(match self {
            Lane::Boolean(v) => u64::from(v[i]),
            Lane::Integer(v) => v[i] as u64,
            Lane::Float(v) => (v[i] + 0.0).to_bits(),
            Lane::Date(v) => v[i] as i64 as u64,
            Lane::Datetime(v) => v[i] as u64,
        })
    }

    fn cmp(&self, i: usize, j: usize) -> Ordering {
        match self {
            Lane::Boolean(v) => v[i].cmp(&v[j]),
            Lane::Integer(v) => v[i].cmp(&v[j]),
            Lane::Float(v) => v[i].total_cmp(&v[j]),
            Lane::Date(v) => v[i].cmp(&v[j]),
            Lane::Datetime(v) => v[i].cmp(&v[j]),
        }
    }

    fn numbers(&self, rows: &[usize]) -> Vec<f64> {
        rows.iter().map(|&i| self.number(i)).collect()
    }
}

/// Reduce the given rows of a lane
pub(crate) type Kernel = fn(Lane<'_>, &[usize], &Reducer) -> Result<Value>;

/// Kernel for a reducer over a dtype, `None` when there is none
pub(crate) fn resolve(kind: &ReducerKind, dtype: Dtype) -> Option<Kernel> {
    let numeric = matches!(dtype, Dtype::Boolean | Dtype::Integer | Dtype::Float);
    let kernel: Kernel = match kind {
        ReducerKind::Count => count,
        ReducerKind::CountUnique => count_unique,
        ReducerKind::All if dtype == Dtype::Boolean => all,
        ReducerKind::Any if dtype == Dtype::Boolean => any,
        ReducerKind::First | ReducerKind::Last | ReducerKind::Nth(_) => nth,
        ReducerKind::Min => min,
        ReducerKind::Max => max,
        ReducerKind::Sum if numeric => sum,
        ReducerKind::Mean => mean,
        ReducerKind::Median | ReducerKind::Quantile(_) => quantile,
        ReducerKind::Std { .. } | ReducerKind::Var { .. } if numeric => variance,
        ReducerKind::Mode => mode,
        _ => return None,
    };
    Some(kernel)
}

/// Run a kernel with the reducer's missing-value handling applied to `rows`
pub(crate) fn apply(kernel: Kernel, lane: Lane<'_>, rows: &[usize], reducer: &Reducer) -> Result<Value> {
    let has_missing = rows.iter().any(|&i| lane.is_missing(i));
    if !has_missing {
        return kernel(lane, rows, reducer);
    }
    if !reducer.drop_missing {
        if reducer.kind.propagates_missing() {
            return Ok(Value::Na);
        }
        return kernel(lane, rows, reducer);
    }
    let present: Vec<usize> = rows.iter().copied().filter(|&i| !lane.is_missing(i)).collect();
    kernel(lane, &present, reducer)
}

fn count(_lane: Lane<'_>, rows: &[usize], _reducer: &Reducer) -> Result<Value> {
    Ok(Value::Integer(rows.len() as i64))
}

fn count_unique(lane: Lane<'_>, rows: &[usize], _reducer: &Reducer) -> Result<Value> {
    let keys: HashSet<Option<u64>> = rows.iter().map(|&i| lane.key(i)).collect();
    Ok(Value::Integer(keys.len() as i64))
}

fn all(lane: Lane<'_>, rows: &[usize], _reducer: &Reducer) -> Result<Value> {
    Ok(Value::Boolean(rows.iter().all(|&i| lane.number(i) != 0.0)))
}

fn any(lane: Lane<'_>, rows: &[usize], _reducer: &Reducer) -> Result<Value> {
    Ok(Value::Boolean(rows.iter().any(|&i| lane.number(i) != 0.0)))
}

fn nth(lane: Lane<'_>, rows: &[usize], reducer: &Reducer) -> Result<Value> {
    let index = match reducer.kind {
        ReducerKind::Last => -1,
        ReducerKind::Nth(i) => i,
        _ => 0,
    };
    let n = rows.len() as isize;
    let i = if index < 0 { n + index } else { index };
    Ok(if (0..n).contains(&i) {
        lane.value(rows[i as usize])
    } else {
        Value::Na
    })
}

fn extreme(lane: Lane<'_>, rows: &[usize], wanted: Ordering) -> Value {
    let mut best: Option<usize> = None;
    for &i in rows {
        best = match best {
            Some(b) if lane.cmp(i, b) != wanted => Some(b),
            _ => Some(i),
        };
    }
    best.map(|i| lane.value(i)).unwrap_or(Value::Na)
}

fn min(lane: Lane<'_>, rows: &[usize], _reducer: &Reducer) -> Result<Value> {
    Ok(extreme(lane, rows, Ordering::Less))
}

fn max(lane: Lane<'_>, rows: &[usize], _reducer: &Reducer) -> Result<Value> {
    Ok(extreme(lane, rows, Ordering::Greater))
}

fn sum(lane: Lane<'_>, rows: &[usize], _reducer: &Reducer) -> Result<Value> {
    Ok(match lane {
        Lane::Boolean(v) => Value::Integer(rows.iter().filter(|&&i| v[i]).count() as i64),
        Lane::Integer(v) => Value::Integer(rows.iter().fold(0i64, |acc, &i| acc.wrapping_add(v[i]))),
        _ => Value::Float(rows.iter().map(|&i| lane.number(i)).sum()),
    })
}

fn mean(lane: Lane<'_>, rows: &[usize], _reducer: &Reducer) -> Result<Value> {
    Ok(from_number(mean_of(&lane.numbers(rows)), lane.dtype()))
}

fn quantile(lane: Lane<'_>, rows: &[usize], reducer: &Reducer) -> Result<Value> {
    let q = match reducer.kind {
        ReducerKind::Quantile(q) => q,
        _ => 0.5,
    };
    let mut numbers = lane.numbers(rows);
    sort_floats(&mut numbers);
    Ok(from_number(quantile_sorted(&numbers, q), lane.dtype()))
}

fn variance(lane: Lane<'_>, rows: &[usize], reducer: &Reducer) -> Result<Value> {
    let numbers = lane.numbers(rows);
    Ok(match reducer.kind {
        ReducerKind::Std { ddof } => Value::Float(variance_of(&numbers, ddof).sqrt()),
        ReducerKind::Var { ddof } => Value::Float(variance_of(&numbers, ddof)),
        _ => Value::Float(f64::NAN),
    })
}

fn mode(lane: Lane<'_>, rows: &[usize], _reducer: &Reducer) -> Result<Value> {
    // key -> (count, first position within the group)
    let mut counts: HashMap<Option<u64>, (usize, usize)> = HashMap::new();
    for (pos, &i) in rows.iter().enumerate() {
        counts.entry(lane.key(i)).or_insert((0, pos)).0 += 1;
    }
    Ok(counts
        .values()
        .max_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)))
        .map(|&(_, first)| lane.value(rows[first]))
        .unwrap_or(Value::Na))
}
