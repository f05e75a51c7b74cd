use std::sync::Arc;

use crate::element::Element;
use crate::error::Result;
use crate::predicate::{Comparator, Stage, evaluate};
use crate::row_set::RowSet;
use crate::store::ColumnSlot;
use crate::table::Table;

/// Eager comparison sugar over one column.
///
/// Every comparator evaluates immediately and returns a [RowSet]; RowSets are
/// then combined with `&` (intersection) and `|` (union). Both operands are
/// always fully evaluated.
///
/// # Example
/// ```
/// # use coltable::{Column, Table};
/// let table = Table::new();
/// table.insert_column(Column::from_values("a", vec![0_i64, 2, 5, 11, 7])).unwrap();
///
/// let a = table.filter::<i64>("a").unwrap();
/// let rows = a.gt(1).unwrap() & a.lt(10).unwrap();
/// assert_eq!(rows.indices(), &[1, 2, 4]);
/// ```
pub struct Filter<'a, T: Element> {
    table: &'a Table,
    slot: Arc<ColumnSlot>,
    _element: std::marker::PhantomData<fn() -> T>,
}

impl<'a, T: Element> Filter<'a, T> {
    pub(crate) fn new(table: &'a Table, name: &str) -> Result<Self> {
        let slot = table.store().slot(name)?;
        slot.check_type::<T>()?;
        Ok(Self {
            table,
            slot,
            _element: std::marker::PhantomData,
        })
    }

    fn compare(&self, op: Comparator, value: T) -> Result<RowSet> {
        evaluate(self.table, &self.slot, &Stage::Compare(op, value))
    }

    /// Rows equal to `value` (the `==` form).
    pub fn eq(&self, value: T) -> Result<RowSet> {
        self.compare(Comparator::Eq, value)
    }

    /// Rows different from `value` (the `!=` form).
    pub fn ne(&self, value: T) -> Result<RowSet> {
        self.compare(Comparator::Ne, value)
    }

    pub fn lt(&self, value: T) -> Result<RowSet> {
        self.compare(Comparator::Lt, value)
    }

    pub fn le(&self, value: T) -> Result<RowSet> {
        self.compare(Comparator::Le, value)
    }

    pub fn gt(&self, value: T) -> Result<RowSet> {
        self.compare(Comparator::Gt, value)
    }

    pub fn ge(&self, value: T) -> Result<RowSet> {
        self.compare(Comparator::Ge, value)
    }

    /// Rows with `lo <= value <= hi`.
    pub fn between(&self, lo: T, hi: T) -> Result<RowSet> {
        evaluate(self.table, &self.slot, &Stage::Between(lo, hi))
    }
}
