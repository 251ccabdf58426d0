//! Row filtering, deduplication and sampling

use rand::Rng;
use std::collections::HashSet;

use super::Table;
use crate::core::data_value::Value;
use crate::core::error::{Error, Result};
use crate::vector::{HashKey, Vector};

/// Key tuple of one row over the given columns
pub(crate) fn row_key(columns: &[&Vector], row: usize) -> Vec<HashKey> {
    columns.iter().map(|c| c.hash_key(row)).collect()
}

impl Table {
    fn check_mask<'m>(&self, mask: &'m Vector) -> Result<&'m [bool]> {
        let flags = mask.as_bool_slice().ok_or_else(|| {
            Error::Type(format!("row mask must be boolean, got {}", mask.dtype()))
        })?;
        if flags.len() != self.row_count {
            return Err(Error::LengthMismatch {
                expected: self.row_count,
                actual: flags.len(),
            });
        }
        Ok(flags)
    }

    fn rows_where(&self, mask: &Vector, keep: bool) -> Result<Table> {
        let flags = self.check_mask(mask)?;
        let rows: Vec<usize> = (0..flags.len()).filter(|&i| flags[i] == keep).collect();
        Ok(self.take_unchecked(&rows))
    }

    /// Boolean mask of rows whose columns equal all the given values
    fn mask_eq<I, S, V>(&self, pairs: I) -> Result<Vector>
    where
        I: IntoIterator<Item = (S, V)>,
        S: AsRef<str>,
        V: Into<Value>,
    {
        let mut mask = Vector::from(vec![true; self.row_count]);
        for (name, value) in pairs {
            let matches = self.column(name.as_ref())?.eq_value(value);
            mask = mask.and(&matches)?;
        }
        Ok(mask)
    }

    /// Keep rows where `mask` is true
    pub fn filter(&self, mask: &Vector) -> Result<Table> {
        self.rows_where(mask, true)
    }

    /// Keep rows where the mask computed from the table is true
    pub fn filter_with<F>(&self, predicate: F) -> Result<Table>
    where
        F: FnOnce(&Table) -> Result<Vector>,
    {
        let mask = predicate(self)?;
        self.filter(&mask)
    }

    /// Keep rows matching every `(column, value)` pair
    pub fn filter_eq<I, S, V>(&self, pairs: I) -> Result<Table>
    where
        I: IntoIterator<Item = (S, V)>,
        S: AsRef<str>,
        V: Into<Value>,
    {
        let mask = self.mask_eq(pairs)?;
        self.filter(&mask)
    }

    /// Drop rows where `mask` is true
    pub fn filter_out(&self, mask: &Vector) -> Result<Table> {
        self.rows_where(mask, false)
    }

    /// Drop rows where the mask computed from the table is true
    pub fn filter_out_with<F>(&self, predicate: F) -> Result<Table>
    where
        F: FnOnce(&Table) -> Result<Vector>,
    {
        let mask = predicate(self)?;
        self.filter_out(&mask)
    }

    /// Drop rows matching every `(column, value)` pair
    pub fn filter_out_eq<I, S, V>(&self, pairs: I) -> Result<Table>
    where
        I: IntoIterator<Item = (S, V)>,
        S: AsRef<str>,
        V: Into<Value>,
    {
        let mask = self.mask_eq(pairs)?;
        self.filter_out(&mask)
    }

    /// Resolve column names, all columns when empty
    pub(crate) fn key_columns<S: AsRef<str>>(&self, columns: &[S]) -> Result<Vec<&Vector>> {
        if columns.is_empty() {
            return Ok(self.columns.iter().collect());
        }
        columns.iter().map(|name| self.column(name.as_ref())).collect()
    }

    /// First occurrence of each distinct key
    ///
    /// # Arguments
    /// * `columns` - Key columns; empty means the full row
    pub fn unique<S: AsRef<str>>(&self, columns: &[S]) -> Result<Table> {
        let keys = self.key_columns(columns)?;
        let mut seen = HashSet::new();
        let rows: Vec<usize> = (0..self.row_count)
            .filter(|&i| seen.insert(row_key(&keys, i)))
            .collect();
        Ok(self.take_unchecked(&rows))
    }

    /// Drop rows with a missing value in any of `columns`; empty drops nothing
    pub fn drop_na<S: AsRef<str>>(&self, columns: &[S]) -> Result<Table> {
        let keys = columns
            .iter()
            .map(|name| self.column(name.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        let rows: Vec<usize> = (0..self.row_count)
            .filter(|&i| !keys.iter().any(|c| c.is_missing_at(i)))
            .collect();
        Ok(self.take_unchecked(&rows))
    }

    /// First `n` rows
    pub fn head(&self, n: usize) -> Table {
        let n = n.min(self.row_count);
        self.take_unchecked(&(0..n).collect::<Vec<_>>())
    }

    /// Last `n` rows
    pub fn tail(&self, n: usize) -> Table {
        let n = n.min(self.row_count);
        self.take_unchecked(&(self.row_count - n..self.row_count).collect::<Vec<_>>())
    }

    /// `n` random rows without replacement, in their original order
    pub fn sample(&self, n: usize) -> Table {
        self.sample_with(n, &mut rand::thread_rng())
    }

    /// [`Table::sample`] with a caller-provided random source
    pub fn sample_with<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Table {
        let rows = crate::vector::sample_positions(self.row_count, n, rng);
        self.take_unchecked(&rows)
    }

    /// Boolean vector of length `nrow`, handy as a starting mask
    pub fn mask(&self, value: bool) -> Vector {
        Vector::from(vec![value; self.row_count])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listings() -> Result<Table> {
        Table::from_columns([
            ("hood", Vector::from(vec!["Manhattan", "Bronx", "Manhattan", "Queens"])),
            ("guests", Vector::from(vec![2i64, 2, 4, 2])),
            ("sqft", Vector::from(vec![Some(40.0), None, Some(75.0), None])),
        ])
    }

    #[test]
    fn filter_by_mask_closure_and_pairs_agree() -> Result<()> {
        let t = listings()?;
        let by_mask = t.filter(&t["hood"].eq_value("Manhattan").and(&t["guests"].eq_value(2))?)?;
        let by_closure =
            t.filter_with(|x| x["hood"].eq_value("Manhattan").and(&x["guests"].eq_value(2)))?;
        let by_pairs = t.filter_eq([("hood", Value::from("Manhattan")), ("guests", Value::from(2))])?;
        assert_eq!(by_mask.nrow(), 1);
        assert_eq!(by_mask, by_closure);
        assert_eq!(by_mask, by_pairs);
        Ok(())
    }

    #[test]
    fn filter_out_is_the_complement() -> Result<()> {
        let t = listings()?;
        let kept = t.filter_eq([("hood", "Manhattan")])?;
        let dropped = t.filter_out_eq([("hood", "Manhattan")])?;
        assert_eq!(kept.nrow() + dropped.nrow(), t.nrow());
        assert_eq!(dropped["hood"], Vector::from(vec!["Bronx", "Queens"]));
        Ok(())
    }

    #[test]
    fn bad_masks_fail() -> Result<()> {
        let t = listings()?;
        assert!(matches!(
            t.filter(&Vector::from(vec![true])),
            Err(Error::LengthMismatch { .. })
        ));
        assert!(matches!(t.filter(&t["guests"]), Err(Error::Type(_))));
        assert!(matches!(
            t.filter_eq([("nope", 1)]),
            Err(Error::ColumnNotFound(name)) if name == "nope"
        ));
        Ok(())
    }

    #[test]
    fn unique_and_drop_na() -> Result<()> {
        let t = listings()?;
        let u = t.unique(&["guests"])?;
        assert_eq!(u["hood"], Vector::from(vec!["Manhattan", "Manhattan"]));
        assert_eq!(t.unique::<&str>(&[])?.nrow(), 4);

        let complete = t.drop_na(&["sqft"])?;
        assert_eq!(complete.nrow(), 2);
        assert_eq!(t.drop_na::<&str>(&[])?.nrow(), 4);
        assert!(matches!(t.drop_na(&["nope"]), Err(Error::ColumnNotFound(_))));
        Ok(())
    }

    #[test]
    fn head_tail_sample() -> Result<()> {
        let t = listings()?;
        assert_eq!(t.head(2)["guests"], Vector::from(vec![2i64, 2]));
        assert_eq!(t.tail(1)["hood"], Vector::from(vec!["Queens"]));
        assert_eq!(t.sample(3).nrow(), 3);
        assert_eq!(t.head(10).nrow(), 4);
        Ok(())
    }
}
