//! Single-column predicates and the builder that evaluates them into a
//! [RowSet].

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::element::Element;
use crate::error::Result;
use crate::row_set::RowSet;
use crate::store::ColumnSlot;
use crate::table::Table;

/// The six comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Comparator {
    /// Whether a cell that orders as `ord` against the operand matches.
    /// Unordered pairs (NaN) only satisfy `Ne`.
    fn accepts(self, ord: Option<Ordering>) -> bool {
        match (self, ord) {
            (Self::Ne, None) => true,
            (_, None) => false,
            (Self::Eq, Some(o)) => o == Ordering::Equal,
            (Self::Ne, Some(o)) => o != Ordering::Equal,
            (Self::Lt, Some(o)) => o == Ordering::Less,
            (Self::Le, Some(o)) => o != Ordering::Greater,
            (Self::Gt, Some(o)) => o == Ordering::Greater,
            (Self::Ge, Some(o)) => o != Ordering::Less,
        }
    }
}

/// The one active condition of a builder.
pub(crate) enum Stage<'a, T> {
    /// No condition yet: every row matches.
    All,
    Compare(Comparator, T),
    /// Inclusive on both ends.
    Between(T, T),
    Custom(Box<dyn Fn(&T, usize) -> bool + 'a>),
}

impl<T: Element> Stage<'_, T> {
    fn matches(&self, value: &T, row: usize) -> bool {
        match self {
            Self::All => true,
            Self::Compare(op, operand) => op.accepts(value.compare(operand)),
            Self::Between(lo, hi) => {
                Comparator::Ge.accepts(value.compare(lo)) && Comparator::Le.accepts(value.compare(hi))
            }
            Self::Custom(predicate) => predicate(value, row),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Stage<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "All"),
            Self::Compare(op, operand) => write!(f, "{op:?}({operand:?})"),
            Self::Between(lo, hi) => write!(f, "Between({lo:?}, {hi:?})"),
            Self::Custom(_) => write!(f, "Custom"),
        }
    }
}

/// Scans the column once under its shared lock and collects matching rows.
///
/// The length is captured when the lock is taken, so rows appended later by
/// another thread are simply not part of the result.
pub(crate) fn evaluate<T: Element>(
    table: &Table,
    slot: &ColumnSlot,
    stage: &Stage<'_, T>,
) -> Result<RowSet> {
    let values = slot.read_typed::<T>()?;
    let rows: Vec<usize> = values
        .iter()
        .enumerate()
        .filter(|(row, value)| stage.matches(value, *row))
        .map(|(row, _)| row)
        .collect();
    let scanned = values.len();
    drop(values);

    if table.config().verbose {
        tracing::trace!(
            table = table.config().label(),
            column = slot.name(),
            ?stage,
            scanned,
            matched = rows.len(),
            "predicate evaluated"
        );
    }
    Ok(RowSet::from_sorted(rows))
}

/// Builds a [RowSet] from one condition on one column.
///
/// A builder holds a single stage: calling a second comparator replaces the
/// first one. Combine conditions by combining the RowSets of separate
/// builders.
///
/// # Example
/// ```
/// # use coltable::{Column, Table};
/// let table = Table::new();
/// table.insert_column(Column::from_values("INT", vec![-5_i32, -1, 0, 4, 9])).unwrap();
///
/// let rows = table.select::<i32>("INT").unwrap().between(-1, 4).build().unwrap();
/// assert_eq!(rows.indices(), &[1, 2, 3]);
/// ```
pub struct Selector<'a, T: Element> {
    table: &'a Table,
    slot: Arc<ColumnSlot>,
    stage: Stage<'a, T>,
}

impl<'a, T: Element> Selector<'a, T> {
    /// The column type is checked here, before any scan.
    pub(crate) fn new(table: &'a Table, name: &str) -> Result<Self> {
        let slot = table.store().slot(name)?;
        slot.check_type::<T>()?;
        Ok(Self {
            table,
            slot,
            stage: Stage::All,
        })
    }

    pub(crate) fn table(&self) -> &'a Table {
        self.table
    }

    fn compare(mut self, op: Comparator, value: T) -> Self {
        self.stage = Stage::Compare(op, value);
        self
    }

    pub fn eq(self, value: T) -> Self {
        self.compare(Comparator::Eq, value)
    }

    pub fn ne(self, value: T) -> Self {
        self.compare(Comparator::Ne, value)
    }

    pub fn lt(self, value: T) -> Self {
        self.compare(Comparator::Lt, value)
    }

    pub fn le(self, value: T) -> Self {
        self.compare(Comparator::Le, value)
    }

    pub fn gt(self, value: T) -> Self {
        self.compare(Comparator::Gt, value)
    }

    pub fn ge(self, value: T) -> Self {
        self.compare(Comparator::Ge, value)
    }

    /// Rows with `lo <= value <= hi`.
    pub fn between(mut self, lo: T, hi: T) -> Self {
        self.stage = Stage::Between(lo, hi);
        self
    }

    /// Rows for which `predicate(value)` holds.
    pub fn custom(mut self, predicate: impl Fn(&T) -> bool + 'a) -> Self {
        self.stage = Stage::Custom(Box::new(move |value, _| predicate(value)));
        self
    }

    /// Rows for which `predicate(value, row)` holds.
    pub fn custom_indexed(mut self, predicate: impl Fn(&T, usize) -> bool + 'a) -> Self {
        self.stage = Stage::Custom(Box::new(predicate));
        self
    }

    /// Evaluates the active stage against every row, O(n).
    pub fn build(&self) -> Result<RowSet> {
        evaluate(self.table, &self.slot, &self.stage)
    }
}

impl<T: Element> fmt::Debug for Selector<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Selector")
            .field("column", &self.slot.name())
            .field("stage", &self.stage)
            .finish()
    }
}
