//! Scoped read/write cursor over one column.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::column::SortOrder;
use crate::element::{ArithOp, Element, Numeric};
use crate::error::{Error, Result};
use crate::row_set::RowSet;
use crate::stats::{Summary, summarize};
use crate::store::ColumnSlot;
use crate::table::Table;

/// A (table, column, optional scope) cursor.
///
/// Without a scope every operation covers all rows; with one, mutations and
/// aggregates only touch the selected rows. Re-scoping returns a new view
/// and leaves the original untouched. Each call locks the column for its own
/// duration only, so a chain like `view.add(1)?.mul(2)?` takes the write lock
/// twice.
///
/// # Example
/// ```
/// # use coltable::{Column, RowSet, Table};
/// let table = Table::new();
/// table.insert_column(Column::from_values("x", vec![1.0_f64, 2.0, 3.0, 4.0])).unwrap();
///
/// let x = table.column::<f64>("x").unwrap();
/// x.on(RowSet::from_indices([1, 3])).add(1)?.mul(2)?;
/// assert_eq!(x.snapshot()?, vec![1.0, 6.0, 3.0, 10.0]);
/// assert_eq!(x.mean()?, 5.0);
/// # Ok::<(), coltable::Error>(())
/// ```
#[derive(Clone)]
pub struct ColumnView<'a, T: Element> {
    table: &'a Table,
    slot: Arc<ColumnSlot>,
    scope: Option<RowSet>,
    _element: PhantomData<fn() -> T>,
}

impl<'a, T: Element> ColumnView<'a, T> {
    pub(crate) fn new(table: &'a Table, name: &str) -> Result<Self> {
        Self::from_slot(table, table.store().slot(name)?)
    }

    pub(crate) fn from_slot(table: &'a Table, slot: Arc<ColumnSlot>) -> Result<Self> {
        slot.check_type::<T>()?;
        Ok(Self {
            table,
            slot,
            scope: None,
            _element: PhantomData,
        })
    }

    pub fn name(&self) -> &str {
        self.slot.name()
    }

    /// The active scope, `None` meaning "all rows".
    pub fn scope(&self) -> Option<&RowSet> {
        self.scope.as_ref()
    }

    /// A view of the same column restricted to `rows`.
    pub fn on(&self, rows: RowSet) -> Self {
        Self {
            scope: Some(rows),
            ..self.clone()
        }
    }

    /// A view of the same column without any scope.
    pub fn clear_selection(&self) -> Self {
        Self {
            scope: None,
            ..self.clone()
        }
    }

    /// Current length of the whole column.
    pub fn len(&self) -> usize {
        self.slot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of rows the scope covers.
    pub fn count(&self) -> usize {
        match &self.scope {
            Some(rows) => rows.len(),
            None => self.len(),
        }
    }

    /// Full column content, regardless of scope.
    pub fn snapshot(&self) -> Result<Vec<T>> {
        Ok(self.slot.read_typed::<T>()?.clone())
    }

    /// In-scope values in ascending row order.
    pub fn values(&self) -> Result<Vec<T>> {
        let values = self.slot.read_typed::<T>()?;
        match &self.scope {
            None => Ok(values.clone()),
            Some(rows) => rows
                .iter()
                .map(|row| {
                    values.get(row).cloned().ok_or(Error::IndexOutOfRange {
                        index: row,
                        len: values.len(),
                    })
                })
                .collect(),
        }
    }

    /// Runs `f` on every in-scope element under one write lock.
    ///
    /// The scope is bounds-checked before the first element is touched, so
    /// a stale scope fails without a partial update.
    fn update(&self, op: &str, mut f: impl FnMut(&mut T, usize)) -> Result<&Self> {
        let mut values = self.slot.write_typed::<T>()?;
        let touched = match &self.scope {
            None => {
                values.iter_mut().enumerate().for_each(|(row, v)| f(v, row));
                values.len()
            }
            Some(rows) => {
                if let Some(last) = rows.last().filter(|&last| last >= values.len()) {
                    return Err(Error::IndexOutOfRange {
                        index: last,
                        len: values.len(),
                    });
                }
                for row in rows {
                    f(&mut values[row], row);
                }
                rows.len()
            }
        };
        drop(values);

        if self.table.config().verbose {
            tracing::debug!(
                table = self.table.config().label(),
                column = self.name(),
                op,
                rows = touched,
                scoped = self.scope.is_some(),
                "column updated"
            );
        }
        Ok(self)
    }

    /// Overwrites every in-scope element with `value`.
    pub fn set(&self, value: T) -> Result<&Self> {
        self.update("set", |v, _| *v = value.clone())
    }

    /// Calls `f(&mut value, row)` for every in-scope row, in ascending order.
    pub fn apply(&self, f: impl FnMut(&mut T, usize)) -> Result<&Self> {
        self.update("apply", f)
    }

    /// Sorts the whole table by this column, smallest first. The scope is
    /// ignored: every column is reordered by the same stable permutation.
    pub fn sort_ascending(&self) -> Result<()> {
        self.sort(SortOrder::Ascending)
    }

    /// Sorts the whole table by this column, largest first. Equal values keep
    /// their original relative order.
    pub fn sort_descending(&self) -> Result<()> {
        self.sort(SortOrder::Descending)
    }

    fn sort(&self, order: SortOrder) -> Result<()> {
        self.table.sort_slot(&self.slot, order)
    }
}

impl<T: Numeric> ColumnView<'_, T> {
    fn arithmetic<S: Numeric>(&self, op: ArithOp, scalar: S) -> Result<&Self> {
        let rhs = T::cast_from(scalar);
        if op == ArithOp::Div && rhs.is_zero() {
            return Err(Error::DivisionByZero(self.name().to_string()));
        }
        let label = match op {
            ArithOp::Add => "add",
            ArithOp::Sub => "sub",
            ArithOp::Mul => "mul",
            ArithOp::Div => "div",
        };
        self.update(label, |v, _| *v = v.apply_op(op, rhs))
    }

    /// Adds `scalar`, converted to the column type, to every in-scope element.
    pub fn add<S: Numeric>(&self, scalar: S) -> Result<&Self> {
        self.arithmetic(ArithOp::Add, scalar)
    }

    pub fn sub<S: Numeric>(&self, scalar: S) -> Result<&Self> {
        self.arithmetic(ArithOp::Sub, scalar)
    }

    pub fn mul<S: Numeric>(&self, scalar: S) -> Result<&Self> {
        self.arithmetic(ArithOp::Mul, scalar)
    }

    /// # Errors
    /// [Error::DivisionByZero] if `scalar` is zero once converted to the
    /// column type (e.g. `0.5` on an integer column); nothing is modified.
    pub fn div<S: Numeric>(&self, scalar: S) -> Result<&Self> {
        self.arithmetic(ArithOp::Div, scalar)
    }

    /// All aggregates of the in-scope rows from a single scan.
    ///
    /// # Errors
    /// [Error::EmptySelection] when the scope (or column) has no rows.
    pub fn stats(&self) -> Result<Summary> {
        let values = self.slot.read_typed::<T>()?;
        let summary = summarize(self.name(), &values, self.scope.as_ref())?;
        drop(values);

        if self.table.config().verbose {
            tracing::trace!(
                table = self.table.config().label(),
                column = self.name(),
                rows = summary.count,
                "statistics computed"
            );
        }
        Ok(summary)
    }

    pub fn sum(&self) -> Result<f64> {
        self.stats().map(|s| s.sum)
    }

    /// `Σv / n`
    pub fn mean(&self) -> Result<f64> {
        self.stats().map(|s| s.mean)
    }

    pub fn min(&self) -> Result<f64> {
        self.stats().map(|s| s.min)
    }

    pub fn max(&self) -> Result<f64> {
        self.stats().map(|s| s.max)
    }

    /// `Σv²/n − mean²`
    pub fn variance(&self) -> Result<f64> {
        self.stats().map(|s| s.variance)
    }

    /// `sqrt(Σv²/n)`
    pub fn rms(&self) -> Result<f64> {
        self.stats().map(|s| s.rms)
    }

    /// `sqrt(variance)`, the population standard deviation.
    pub fn rmse(&self) -> Result<f64> {
        self.stats().map(|s| s.rmse)
    }

    /// `(E[v³] − 3·mean·variance − mean³) / stddev³`
    pub fn skewness(&self) -> Result<f64> {
        self.stats().map(|s| s.skewness)
    }
}

impl<T: Element> fmt::Debug for ColumnView<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnView")
            .field("column", &self.slot.name())
            .field("data_type", &T::DATA_TYPE)
            .field("scope", &self.scope)
            .finish()
    }
}
