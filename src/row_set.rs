//! Canonical row selections and their set algebra.

use std::cmp::Ordering;
use std::ops::{BitAnd, BitOr, Sub};

use bitvec::prelude::*;

/// A sorted, duplicate-free collection of row indices.
///
/// Storage is always normalized, so two RowSets built from the same indices in
/// any order compare equal and every operation is deterministic. A RowSet is a
/// snapshot: it is never updated when the table it was built from changes.
///
/// The absence of a scope is expressed as `Option<RowSet>::None` by the
/// callers; an empty RowSet means "a selection that matched nothing".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RowSet {
    rows: Vec<usize>,
}

impl RowSet {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalizes an arbitrary index sequence (sorts and deduplicates it).
    ///
    /// # Example
    /// ```
    /// # use coltable::RowSet;
    /// let rows = RowSet::from_indices([5, 1, 5, 3]);
    /// assert_eq!(rows.indices(), &[1, 3, 5]);
    /// ```
    pub fn from_indices(indices: impl IntoIterator<Item = usize>) -> Self {
        let mut rows: Vec<usize> = indices.into_iter().collect();
        rows.sort_unstable();
        rows.dedup();
        Self { rows }
    }

    /// Wraps indices that are already strictly increasing.
    pub(crate) fn from_sorted(rows: Vec<usize>) -> Self {
        debug_assert!(rows.windows(2).all(|w| w[0] < w[1]));
        Self { rows }
    }

    /// Every row in `[0, nrows)`.
    pub fn all(nrows: usize) -> Self {
        Self {
            rows: (0..nrows).collect(),
        }
    }

    /// Rows whose bit is set in `mask`.
    pub fn from_mask(mask: &BitSlice) -> Self {
        Self {
            rows: mask.iter_ones().collect(),
        }
    }

    /// A bitmask of length `nrows` with the selected rows set. Indices at or
    /// beyond `nrows` are not represented.
    pub fn to_mask(&self, nrows: usize) -> BitVec {
        let mut mask = bitvec![0; nrows];
        for &row in self.rows.iter().take_while(|&&row| row < nrows) {
            mask.set(row, true);
        }
        mask
    }

    /// Rows of `[0, nrows)` that are not selected.
    pub fn complement(&self, nrows: usize) -> Self {
        Self::all(nrows).subtracted(self)
    }

    /// Union of both selections.
    pub fn united(&self, other: &RowSet) -> Self {
        let (a, b) = (&self.rows, &other.rows);
        let mut rows = Vec::with_capacity(a.len() + b.len());
        let (mut i, mut j) = (0, 0);
        while i < a.len() && j < b.len() {
            match a[i].cmp(&b[j]) {
                Ordering::Less => {
                    rows.push(a[i]);
                    i += 1;
                }
                Ordering::Greater => {
                    rows.push(b[j]);
                    j += 1;
                }
                Ordering::Equal => {
                    rows.push(a[i]);
                    i += 1;
                    j += 1;
                }
            }
        }
        rows.extend_from_slice(&a[i..]);
        rows.extend_from_slice(&b[j..]);
        Self { rows }
    }

    /// Rows present in both selections.
    pub fn intersected(&self, other: &RowSet) -> Self {
        let (a, b) = (&self.rows, &other.rows);
        let mut rows = Vec::with_capacity(a.len().min(b.len()));
        let (mut i, mut j) = (0, 0);
        while i < a.len() && j < b.len() {
            match a[i].cmp(&b[j]) {
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
                Ordering::Equal => {
                    rows.push(a[i]);
                    i += 1;
                    j += 1;
                }
            }
        }
        Self { rows }
    }

    /// Rows of `self` that are not in `other`.
    pub fn subtracted(&self, other: &RowSet) -> Self {
        let rows = self
            .rows
            .iter()
            .copied()
            .filter(|row| other.rows.binary_search(row).is_err())
            .collect();
        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// The selected rows in ascending order.
    pub fn indices(&self) -> &[usize] {
        &self.rows
    }

    /// O(log n) membership test.
    pub fn contains(&self, row: usize) -> bool {
        self.rows.binary_search(&row).is_ok()
    }

    pub fn first(&self) -> Option<usize> {
        self.rows.first().copied()
    }

    pub fn last(&self) -> Option<usize> {
        self.rows.last().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.rows.iter().copied()
    }
}

impl FromIterator<usize> for RowSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self::from_indices(iter)
    }
}

impl<'a> IntoIterator for &'a RowSet {
    type Item = usize;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, usize>>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter().copied()
    }
}

impl From<RowSet> for Vec<usize> {
    fn from(rows: RowSet) -> Self {
        rows.rows
    }
}

macro_rules! set_operator {
    ($trait:ident, $method:ident, $op:ident) => {
        impl $trait<&RowSet> for &RowSet {
            type Output = RowSet;

            fn $method(self, rhs: &RowSet) -> RowSet {
                self.$op(rhs)
            }
        }

        impl $trait for RowSet {
            type Output = RowSet;

            fn $method(self, rhs: RowSet) -> RowSet {
                self.$op(&rhs)
            }
        }
    };
}

set_operator!(BitAnd, bitand, intersected);
set_operator!(BitOr, bitor, united);
set_operator!(Sub, sub, subtracted);
