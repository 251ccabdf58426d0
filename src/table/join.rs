//! First-match joins
//!
//! Every join looks up at most one row of the right table per left row: the
//! first right row carrying the key. Rows with a missing key value never
//! match.

use std::collections::{HashMap, HashSet};

use super::row_ops::row_key;
use super::Table;
use crate::core::error::{Error, Result};
use crate::vector::{HashKey, Vector};

/// Join key, the same column name on both sides or a `(left, right)` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinBy {
    pub left: String,
    pub right: String,
}

impl JoinBy {
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }

    fn reversed(&self) -> Self {
        Self::new(self.right.clone(), self.left.clone())
    }
}

impl From<&str> for JoinBy {
    fn from(name: &str) -> Self {
        Self::new(name, name)
    }
}

impl From<String> for JoinBy {
    fn from(name: String) -> Self {
        Self::new(name.clone(), name)
    }
}

impl From<(&str, &str)> for JoinBy {
    fn from((left, right): (&str, &str)) -> Self {
        Self::new(left, right)
    }
}

impl From<(String, String)> for JoinBy {
    fn from((left, right): (String, String)) -> Self {
        Self::new(left, right)
    }
}

/// Join flavours
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    /// All left rows, right columns where a match exists
    Left,
    /// All right rows, left columns where a match exists
    Right,
    /// Matched left rows only
    Inner,
    /// Left join plus the right rows no left row matched
    Full,
    /// Left rows with a match, left columns only
    Semi,
    /// Left rows without a match, left columns only
    Anti,
}

/// Key columns of both sides cast to their common dtype
struct JoinKeys {
    pairs: Vec<JoinBy>,
    left: Vec<Vector>,
    right: Vec<Vector>,
}

impl JoinKeys {
    fn resolve<I>(left: &Table, right: &Table, by: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<JoinBy>,
    {
        let pairs: Vec<JoinBy> = by.into_iter().map(Into::into).collect();
        if pairs.is_empty() {
            return Err(Error::InvalidInput("join needs at least one key".into()));
        }
        let mut left_keys = Vec::with_capacity(pairs.len());
        let mut right_keys = Vec::with_capacity(pairs.len());
        for pair in &pairs {
            let a = left.column(&pair.left)?;
            let b = right.column(&pair.right)?;
            let dtype = a.dtype().common(b.dtype()).ok_or_else(|| Error::ColumnTypeMismatch {
                name: pair.left.clone(),
                expected: a.dtype(),
                found: b.dtype(),
            })?;
            left_keys.push(a.cast(dtype));
            right_keys.push(b.cast(dtype));
        }
        Ok(Self {
            pairs,
            left: left_keys,
            right: right_keys,
        })
    }

    fn is_right_key(&self, name: &str) -> bool {
        self.pairs.iter().any(|p| p.right == name)
    }

    fn right_for_left(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|p| p.left == name)
            .map(|p| p.right.as_str())
    }
}

/// For each probe row, the first build row with an equal, non-missing key
fn first_matches(probe: &[Vector], build: &[Vector]) -> Vec<Option<usize>> {
    let probe_refs: Vec<&Vector> = probe.iter().collect();
    let build_refs: Vec<&Vector> = build.iter().collect();
    let has_missing = |columns: &[&Vector], row: usize| columns.iter().any(|c| c.is_missing_at(row));

    let build_len = build.first().map_or(0, Vector::len);
    let mut index: HashMap<Vec<HashKey>, usize> = HashMap::with_capacity(build_len);
    for row in 0..build_len {
        if !has_missing(&build_refs, row) {
            index.entry(row_key(&build_refs, row)).or_insert(row);
        }
    }

    let probe_len = probe.first().map_or(0, Vector::len);
    (0..probe_len)
        .map(|row| {
            if has_missing(&probe_refs, row) {
                None
            } else {
                index.get(&row_key(&probe_refs, row)).copied()
            }
        })
        .collect()
}

impl Table {
    /// Join with `other`
    ///
    /// # Arguments
    /// * `other` - Right table
    /// * `by` - Key columns, names or `(left, right)` pairs
    /// * `how` - Join flavour
    pub fn join<I>(&self, other: &Table, by: I, how: JoinType) -> Result<Table>
    where
        I: IntoIterator,
        I::Item: Into<JoinBy>,
    {
        match how {
            JoinType::Left => self.left_join(other, by),
            JoinType::Right => self.right_join(other, by),
            JoinType::Inner => self.inner_join(other, by),
            JoinType::Full => self.full_join(other, by),
            JoinType::Semi => self.semi_join(other, by),
            JoinType::Anti => self.anti_join(other, by),
        }
    }

    /// Copy of the left rows given with the right columns gathered alongside
    fn attach(
        &self,
        other: &Table,
        keys: &JoinKeys,
        left_rows: &[usize],
        right_rows: &[Option<usize>],
    ) -> Result<Table> {
        let mut out = self.take_unchecked(left_rows);
        for (name, column) in other.columns() {
            if self.contains_column(name) || keys.is_right_key(name) {
                continue;
            }
            out.set_column(name, column.take_optional(right_rows))?;
        }
        Ok(out)
    }

    /// Keep all rows of `self`, adding the columns of the first matching row of `other`
    ///
    /// Unmatched rows get missing values; integer and boolean columns widen
    /// only when some row is unmatched.
    pub fn left_join<I>(&self, other: &Table, by: I) -> Result<Table>
    where
        I: IntoIterator,
        I::Item: Into<JoinBy>,
    {
        let keys = JoinKeys::resolve(self, other, by)?;
        let matches = first_matches(&keys.left, &keys.right);
        let rows: Vec<usize> = (0..self.row_count).collect();
        self.attach(other, &keys, &rows, &matches)
    }

    /// Left join with the roles of the tables swapped
    pub fn right_join<I>(&self, other: &Table, by: I) -> Result<Table>
    where
        I: IntoIterator,
        I::Item: Into<JoinBy>,
    {
        let reversed: Vec<JoinBy> = by
            .into_iter()
            .map(|b| Into::<JoinBy>::into(b).reversed())
            .collect();
        other.left_join(self, reversed)
    }

    /// Keep only rows of `self` that have a match
    pub fn inner_join<I>(&self, other: &Table, by: I) -> Result<Table>
    where
        I: IntoIterator,
        I::Item: Into<JoinBy>,
    {
        let keys = JoinKeys::resolve(self, other, by)?;
        let matches = first_matches(&keys.left, &keys.right);
        let (rows, found): (Vec<usize>, Vec<Option<usize>>) = matches
            .iter()
            .enumerate()
            .filter(|(_, m)| m.is_some())
            .map(|(i, m)| (i, *m))
            .unzip();
        self.attach(other, &keys, &rows, &found)
    }

    /// Left join plus the rows of `other` that no left row matched
    ///
    /// Added rows carry the right key values under the left key names.
    /// Their left-only columns come from the first left row with the same
    /// key, which can exist only when the right key is duplicated. Rows are
    /// ordered by left row, then right row; an added row sits after the
    /// left row it shares a key with, and rows without one go last.
    pub fn full_join<I>(&self, other: &Table, by: I) -> Result<Table>
    where
        I: IntoIterator,
        I::Item: Into<JoinBy>,
    {
        let keys = JoinKeys::resolve(self, other, by)?;
        let matches = first_matches(&keys.left, &keys.right);
        let rows: Vec<usize> = (0..self.row_count).collect();
        let joined = self.attach(other, &keys, &rows, &matches)?;

        let used: HashSet<usize> = matches.iter().flatten().copied().collect();
        let rest: Vec<usize> = (0..other.row_count).filter(|i| !used.contains(i)).collect();
        if rest.is_empty() {
            return Ok(joined);
        }

        let back = first_matches(&keys.right, &keys.left);
        let back: Vec<Option<usize>> = rest.iter().map(|&i| back[i]).collect();
        let mut columns = Vec::with_capacity(joined.ncol());
        for name in joined.colnames() {
            let column = if let Some(right_name) = keys.right_for_left(name) {
                other.column(right_name)?.take(&rest)
            } else if other.contains_column(name) && !keys.is_right_key(name) {
                other.column(name)?.take(&rest)
            } else {
                self.column(name)?.take_optional(&back)
            };
            columns.push(column);
        }
        let tail = Table::from_parts(joined.column_names.clone(), columns, rest.len());
        let combined = Table::concat(&[&joined, &tail])?;

        let position = |m: Option<usize>| m.unwrap_or(usize::MAX);
        let mut order: Vec<(usize, usize, usize)> = matches
            .iter()
            .enumerate()
            .map(|(i, m)| (i, position(*m), i))
            .collect();
        let offset = self.row_count;
        order.extend(
            rest.iter()
                .zip(&back)
                .enumerate()
                .map(|(k, (&r, b))| (position(*b), r, offset + k)),
        );
        order.sort_unstable();
        let rows: Vec<usize> = order.into_iter().map(|(_, _, row)| row).collect();
        Ok(combined.take_unchecked(&rows))
    }

    /// Rows of `self` that have a match in `other`
    pub fn semi_join<I>(&self, other: &Table, by: I) -> Result<Table>
    where
        I: IntoIterator,
        I::Item: Into<JoinBy>,
    {
        self.match_filter(other, by, true)
    }

    /// Rows of `self` without a match in `other`
    pub fn anti_join<I>(&self, other: &Table, by: I) -> Result<Table>
    where
        I: IntoIterator,
        I::Item: Into<JoinBy>,
    {
        self.match_filter(other, by, false)
    }

    fn match_filter<I>(&self, other: &Table, by: I, matched: bool) -> Result<Table>
    where
        I: IntoIterator,
        I::Item: Into<JoinBy>,
    {
        let keys = JoinKeys::resolve(self, other, by)?;
        let rows: Vec<usize> = first_matches(&keys.left, &keys.right)
            .iter()
            .enumerate()
            .filter(|(_, m)| m.is_some() == matched)
            .map(|(i, _)| i)
            .collect();
        Ok(self.take_unchecked(&rows))
    }
}
