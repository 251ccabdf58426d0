//! Sorting, ranking and deduplication

use std::cmp::Ordering;
use std::collections::HashSet;

use super::{Vector, VectorData};
use crate::core::error::{Error, Result};

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

impl TryFrom<i32> for Direction {
    type Error = Error;

    /// `1` is ascending, `-1` descending
    fn try_from(value: i32) -> Result<Self> {
        match value {
            1 => Ok(Direction::Ascending),
            -1 => Ok(Direction::Descending),
            other => Err(Error::InvalidValue(format!(
                "sort direction must be 1 or -1, got {}",
                other
            ))),
        }
    }
}

/// Tie resolution for [`Vector::rank`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankMethod {
    /// Tied elements share the lowest rank of their group (competition ranking)
    #[default]
    Min,
    /// Tied elements share the highest rank of their group
    Max,
    /// Every element gets a distinct rank, ties in input order
    Ordinal,
}

impl Vector {
    /// Compare two non-missing elements
    pub(crate) fn cmp_at(&self, i: usize, j: usize) -> Ordering {
        match self.data() {
            VectorData::Boolean(v) => v[i].cmp(&v[j]),
            VectorData::Integer(v) => v[i].cmp(&v[j]),
            VectorData::Float(v) => v[i].total_cmp(&v[j]),
            VectorData::String(v) => v[i].cmp(&v[j]),
            VectorData::Date(v) => v[i].cmp(&v[j]),
            VectorData::Datetime(v) | VectorData::Timedelta(v) => v[i].cmp(&v[j]),
            // Objects of different kinds fall back to comparing their text
            VectorData::Object(v) => v[i]
                .partial_cmp_loose(&v[j])
                .unwrap_or_else(|| v[i].to_string().cmp(&v[j].to_string())),
        }
    }

    /// Compare two rows for sorting, missing values last in either direction
    pub(crate) fn cmp_rows(&self, i: usize, j: usize, direction: Direction) -> Ordering {
        match (self.is_missing_at(i), self.is_missing_at(j)) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => match direction {
                Direction::Ascending => self.cmp_at(i, j),
                Direction::Descending => self.cmp_at(j, i),
            },
        }
    }

    /// Positions in stable sorted order
    pub(crate) fn argsort(&self, direction: Direction) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.sort_by(|&i, &j| self.cmp_rows(i, j, direction));
        order
    }

    /// Stable sort; missing values go last regardless of direction
    pub fn sort(&self, direction: Direction) -> Vector {
        self.take(&self.argsort(direction))
    }

    /// Ranks starting at 1 over ascending order, missing values ranked last
    ///
    /// # Arguments
    /// * `method` - How ties are resolved
    ///
    /// # Returns
    /// * `Vector` - Integer ranks in input order
    pub fn rank(&self, method: RankMethod) -> Vector {
        let n = self.len();
        let order = self.argsort(Direction::Ascending);
        let present = order.iter().take_while(|&&i| !self.is_missing_at(i)).count();
        let mut ranks = vec![0i64; n];

        let mut start = 0;
        while start < present {
            let mut end = start + 1;
            while end < present && self.cmp_at(order[start], order[end]) == Ordering::Equal {
                end += 1;
            }
            for (offset, &row) in order[start..end].iter().enumerate() {
                ranks[row] = match method {
                    RankMethod::Min => start as i64 + 1,
                    RankMethod::Max => end as i64,
                    RankMethod::Ordinal => (start + offset) as i64 + 1,
                };
            }
            start = end;
        }

        let max_rank = order[..present].iter().map(|&i| ranks[i]).max().unwrap_or(0);
        for (offset, &row) in order[present..].iter().enumerate() {
            ranks[row] = match method {
                RankMethod::Min => max_rank + 1,
                RankMethod::Max => n as i64,
                RankMethod::Ordinal => (present + offset) as i64 + 1,
            };
        }
        Vector::from(ranks)
    }

    /// Positions of first occurrences
    pub(crate) fn unique_indices(&self) -> Vec<usize> {
        let mut seen = HashSet::new();
        (0..self.len())
            .filter(|&i| seen.insert(self.hash_key(i)))
            .collect()
    }

    /// Distinct elements in order of first occurrence
    pub fn unique(&self) -> Vector {
        self.take(&self.unique_indices())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::data_value::Value;

    #[test]
    fn unique_keeps_first_occurrence_order() {
        let v = Vector::from(vec![3i64, 1, 3, 2, 1]);
        assert_eq!(v.unique(), Vector::from(vec![3i64, 1, 2]));
    }

    #[test]
    fn missing_sorts_last_both_ways() {
        let v = Vector::from(vec![2.0, f64::NAN, 1.0, 3.0]);
        assert_eq!(
            v.sort(Direction::Ascending).to_values(),
            vec![1.0.into(), 2.0.into(), 3.0.into(), Value::Na]
        );
        assert_eq!(
            v.sort(Direction::Descending).to_values(),
            vec![3.0.into(), 2.0.into(), 1.0.into(), Value::Na]
        );
    }

    #[test]
    fn rank_methods() {
        let v = Vector::from(vec![3i64, 1, 1, 1, 2, 2]);
        assert_eq!(v.rank(RankMethod::Min), Vector::from(vec![6i64, 1, 1, 1, 4, 4]));
        assert_eq!(v.rank(RankMethod::Max), Vector::from(vec![6i64, 3, 3, 3, 5, 5]));
        assert_eq!(v.rank(RankMethod::Ordinal), Vector::from(vec![6i64, 1, 2, 3, 4, 5]));
    }

    #[test]
    fn rank_puts_missing_last() {
        let v = Vector::from(vec![2.0, f64::NAN, 1.0, 2.0]);
        assert_eq!(v.rank(RankMethod::Min), Vector::from(vec![2i64, 3, 1, 2]));
        assert_eq!(v.rank(RankMethod::Max), Vector::from(vec![3i64, 4, 1, 3]));
        assert_eq!(v.rank(RankMethod::Ordinal), Vector::from(vec![2i64, 4, 1, 3]));
        assert!(Vector::from(Vec::<f64>::new()).rank(RankMethod::Min).is_empty());
    }

    #[test]
    fn direction_from_sign() {
        assert_eq!(Direction::try_from(-1).unwrap(), Direction::Descending);
        assert!(Direction::try_from(0).is_err());
    }
}
