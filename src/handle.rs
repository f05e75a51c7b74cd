//! Name-indexed, type-erased column access and the cross-column
//! conditional update chain.

use std::fmt;
use std::sync::Arc;

use crate::column::ColumnMeta;
use crate::data_type::DataType;
use crate::element::{Element, Numeric};
use crate::error::{Error, Result};
use crate::predicate::Selector;
use crate::row_set::RowSet;
use crate::store::ColumnSlot;
use crate::table::Table;
use crate::value::Value;
use crate::view::ColumnView;

/// A column looked up by name, before its element type is known.
pub struct ColumnHandle<'a> {
    table: &'a Table,
    slot: Arc<ColumnSlot>,
}

impl<'a> ColumnHandle<'a> {
    pub(crate) fn new(table: &'a Table, name: &str) -> Result<Self> {
        Ok(Self {
            table,
            slot: table.store().slot(name)?,
        })
    }

    pub fn name(&self) -> &str {
        self.slot.name()
    }

    pub fn data_type(&self) -> DataType {
        self.slot.data_type()
    }

    pub fn meta(&self) -> &ColumnMeta {
        self.slot.meta()
    }

    pub fn len(&self) -> usize {
        self.slot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reads one cell without knowing the element type.
    pub fn get_value(&self, row: usize) -> Result<Value> {
        let data = self.slot.read();
        data.get_value(row).ok_or(Error::IndexOutOfRange {
            index: row,
            len: data.len(),
        })
    }

    /// Recovers the typed view, failing with TypeMismatch on a wrong `T`.
    pub fn typed<T: Element>(&self) -> Result<ColumnView<'a, T>> {
        ColumnView::from_slot(self.table, Arc::clone(&self.slot))
    }

    /// Starts an update of this column restricted to the rows where column
    /// `other` (of element type `U`) satisfies a condition.
    ///
    /// # Example
    /// ```
    /// # use coltable::{Column, Table};
    /// let table = Table::new();
    /// table.insert_column(Column::from_values("INT", vec![1_i32, 5, 3])).unwrap();
    /// table.insert_column(Column::from_values("DBL", vec![0.5_f64, 1.5, 2.5])).unwrap();
    ///
    /// let dbl = table.handle("DBL")?.where_column::<i32>("INT")?.ge(3).set(99.0)?;
    /// assert_eq!(dbl.snapshot()?, vec![0.5, 99.0, 99.0]);
    /// assert_eq!(dbl.scope().unwrap().indices(), &[1, 2]);
    /// # Ok::<(), coltable::Error>(())
    /// ```
    pub fn where_column<U: Element>(&self, other: &str) -> Result<ConditionalUpdate<'a, U>> {
        Ok(ConditionalUpdate {
            target: Arc::clone(&self.slot),
            condition: Selector::new(self.table, other)?,
        })
    }
}

impl fmt::Debug for ColumnHandle<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnHandle")
            .field("column", &self.slot.name())
            .field("data_type", &self.slot.data_type())
            .finish()
    }
}

/// "Update this column where that column satisfies P."
///
/// Carries the same single-stage comparators as [Selector]; the terminal
/// calls evaluate the condition, mutate the target column on the matching
/// rows and return a view of the target scoped to those rows.
pub struct ConditionalUpdate<'a, U: Element> {
    target: Arc<ColumnSlot>,
    condition: Selector<'a, U>,
}

impl<'a, U: Element> ConditionalUpdate<'a, U> {
    fn with(self, stage: impl FnOnce(Selector<'a, U>) -> Selector<'a, U>) -> Self {
        Self {
            target: self.target,
            condition: stage(self.condition),
        }
    }

    pub fn eq(self, value: U) -> Self {
        self.with(|s| s.eq(value))
    }

    pub fn ne(self, value: U) -> Self {
        self.with(|s| s.ne(value))
    }

    pub fn lt(self, value: U) -> Self {
        self.with(|s| s.lt(value))
    }

    pub fn le(self, value: U) -> Self {
        self.with(|s| s.le(value))
    }

    pub fn gt(self, value: U) -> Self {
        self.with(|s| s.gt(value))
    }

    pub fn ge(self, value: U) -> Self {
        self.with(|s| s.ge(value))
    }

    pub fn between(self, lo: U, hi: U) -> Self {
        self.with(|s| s.between(lo, hi))
    }

    pub fn custom(self, predicate: impl Fn(&U) -> bool + 'a) -> Self {
        self.with(|s| s.custom(predicate))
    }

    pub fn custom_indexed(self, predicate: impl Fn(&U, usize) -> bool + 'a) -> Self {
        self.with(|s| s.custom_indexed(predicate))
    }

    /// Evaluates the condition only.
    pub fn rows(&self) -> Result<RowSet> {
        self.condition.build()
    }

    /// The target type is checked before the condition is evaluated.
    fn scoped_target<T: Element>(&self) -> Result<ColumnView<'a, T>> {
        let view = ColumnView::from_slot(self.condition.table(), Arc::clone(&self.target))?;
        Ok(view.on(self.condition.build()?))
    }

    /// Sets the target to `value` wherever the condition holds.
    pub fn set<T: Element>(self, value: T) -> Result<ColumnView<'a, T>> {
        let view = self.scoped_target::<T>()?;
        view.set(value)?;
        Ok(view)
    }

    /// Adds `value` to the target wherever the condition holds.
    pub fn add<T: Numeric>(self, value: T) -> Result<ColumnView<'a, T>> {
        let view = self.scoped_target::<T>()?;
        view.add(value)?;
        Ok(view)
    }

    /// Runs `f(&mut value, row)` on the target wherever the condition holds.
    pub fn apply<T: Element>(self, f: impl FnMut(&mut T, usize)) -> Result<ColumnView<'a, T>> {
        let view = self.scoped_target::<T>()?;
        view.apply(f)?;
        Ok(view)
    }
}

impl<U: Element> fmt::Debug for ConditionalUpdate<'_, U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConditionalUpdate")
            .field("target", &self.target.name())
            .field("condition", &self.condition)
            .finish()
    }
}
