//! Type-erased registry of named columns.
//!
//! Locking discipline:
//! - the registry lock is always taken before any column lock, never after;
//! - readers resolve a name to an `Arc<ColumnSlot>`, drop the registry lock,
//!   then hold the column's shared lock for exactly one scan;
//! - `reorder` and `sort_by` keep the registry read-locked and write-lock every
//!   column in insertion order, which is the single global lock order. A sort
//!   computes its permutation under those same locks.

use std::sync::Arc;

use bitvec::prelude::*;
use parking_lot::{
    MappedRwLockReadGuard, MappedRwLockWriteGuard, RwLock, RwLockReadGuard, RwLockWriteGuard,
};
use rustc_hash::FxHashMap;

use crate::column::{Column, ColumnData, ColumnMeta, SortOrder};
use crate::data_type::DataType;
use crate::element::Element;
use crate::error::{Error, Result};
use crate::value::Value;

/// One registered column: immutable identity plus lock-protected contents.
#[derive(Debug)]
pub(crate) struct ColumnSlot {
    name: String,
    data_type: DataType,
    meta: ColumnMeta,
    data: RwLock<ColumnData>,
}

impl ColumnSlot {
    fn new(column: Column) -> Self {
        let data_type = column.data_type();
        let (name, meta, data) = column.into_parts();
        Self {
            name,
            data_type,
            meta,
            data: RwLock::new(data),
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn data_type(&self) -> DataType {
        self.data_type
    }

    pub(crate) fn meta(&self) -> &ColumnMeta {
        &self.meta
    }

    pub(crate) fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Fails with [Error::TypeMismatch] unless the slot stores `T`.
    pub(crate) fn check_type<T: Element>(&self) -> Result<()> {
        if self.data_type != T::DATA_TYPE {
            return Err(Error::type_mismatch::<T>(&self.name, self.data_type));
        }
        Ok(())
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, ColumnData> {
        self.data.read()
    }

    /// Shared lock on the column, viewed as `Vec<T>`.
    pub(crate) fn read_typed<T: Element>(&self) -> Result<MappedRwLockReadGuard<'_, Vec<T>>> {
        RwLockReadGuard::try_map(self.data.read(), T::downcast_ref)
            .map_err(|_| Error::type_mismatch::<T>(&self.name, self.data_type))
    }

    /// Exclusive lock on the column, viewed as `Vec<T>`.
    pub(crate) fn write_typed<T: Element>(&self) -> Result<MappedRwLockWriteGuard<'_, Vec<T>>> {
        RwLockWriteGuard::try_map(self.data.write(), T::downcast_mut)
            .map_err(|_| Error::type_mismatch::<T>(&self.name, self.data_type))
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, ColumnData> {
        self.data.write()
    }
}

#[derive(Debug, Default)]
struct Registry {
    slots: Vec<Arc<ColumnSlot>>,
    by_name: FxHashMap<String, usize>,
}

/// Table-owned registry of named columns sharing one row count.
#[derive(Debug, Default)]
pub(crate) struct ColumnStore {
    registry: RwLock<Registry>,
}

impl ColumnStore {
    /// Registers a column.
    ///
    /// # Errors
    /// [Error::DuplicateName] if the name is taken, [Error::RowCountMismatch]
    /// if the store already has columns and the lengths differ.
    pub(crate) fn insert(&self, column: Column) -> Result<()> {
        let mut registry = self.registry.write();
        if registry.by_name.contains_key(column.name()) {
            return Err(Error::DuplicateName(column.name().to_string()));
        }
        if let Some(first) = registry.slots.first() {
            let expected = first.len();
            if column.len() != expected {
                return Err(Error::RowCountMismatch {
                    column: column.name().to_string(),
                    expected,
                    actual: column.len(),
                });
            }
        }
        let idx = registry.slots.len();
        registry.by_name.insert(column.name().to_string(), idx);
        registry.slots.push(Arc::new(ColumnSlot::new(column)));
        Ok(())
    }

    pub(crate) fn slot(&self, name: &str) -> Result<Arc<ColumnSlot>> {
        let registry = self.registry.read();
        registry
            .by_name
            .get(name)
            .map(|&idx| Arc::clone(&registry.slots[idx]))
            .ok_or_else(|| Error::NameNotFound(name.to_string()))
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.registry.read().by_name.contains_key(name)
    }

    pub(crate) fn names(&self) -> Vec<String> {
        let registry = self.registry.read();
        registry.slots.iter().map(|slot| slot.name.clone()).collect()
    }

    pub(crate) fn ncols(&self) -> usize {
        self.registry.read().slots.len()
    }

    /// Row count, taken from the first registered column.
    pub(crate) fn nrows(&self) -> usize {
        let first = self.registry.read().slots.first().cloned();
        first.map_or(0, |slot| slot.len())
    }

    /// Appends one value to every column, in registry order.
    ///
    /// Arity and types are checked before any column grows.
    pub(crate) fn append_row(&self, values: Vec<Value>) -> Result<()> {
        let registry = self.registry.read();
        if values.len() != registry.slots.len() {
            return Err(Error::ArityMismatch {
                expected: registry.slots.len(),
                actual: values.len(),
            });
        }
        for (slot, value) in registry.slots.iter().zip(&values) {
            if value.data_type() != slot.data_type {
                return Err(Error::TypeMismatch {
                    column: slot.name.clone(),
                    requested: value.data_type(),
                    actual: slot.data_type,
                });
            }
        }
        let mut guards: Vec<_> = registry.slots.iter().map(|slot| slot.write()).collect();
        for (data, value) in guards.iter_mut().zip(values) {
            data.push_value(value);
        }
        Ok(())
    }

    /// Reads row `row` across every column, in registry order.
    pub(crate) fn row(&self, row: usize) -> Result<Vec<Value>> {
        let registry = self.registry.read();
        registry
            .slots
            .iter()
            .map(|slot| {
                let data = slot.read();
                data.get_value(row).ok_or(Error::IndexOutOfRange {
                    index: row,
                    len: data.len(),
                })
            })
            .collect()
    }

    /// Sorts every column by `key`, stably.
    ///
    /// The permutation is computed and applied while every column is
    /// write-locked, so no append, sort or reorder can land in between.
    /// Returns the number of rows sorted.
    ///
    /// # Errors
    /// [Error::NameNotFound] if `key` is not registered here,
    /// [Error::RowCountMismatch] if the columns disagree on their length.
    pub(crate) fn sort_by(&self, key: &ColumnSlot, order: SortOrder) -> Result<usize> {
        let registry = self.registry.read();
        let key_idx = registry
            .by_name
            .get(key.name())
            .copied()
            .filter(|&idx| std::ptr::eq(Arc::as_ptr(&registry.slots[idx]), key))
            .ok_or_else(|| Error::NameNotFound(key.name().to_string()))?;
        let mut guards: Vec<_> = registry.slots.iter().map(|slot| slot.write()).collect();

        let nrows = guards[key_idx].len();
        for (slot, data) in registry.slots.iter().zip(&guards) {
            if data.len() != nrows {
                return Err(Error::RowCountMismatch {
                    column: slot.name.clone(),
                    expected: nrows,
                    actual: data.len(),
                });
            }
        }

        let perm = guards[key_idx].sort_permutation(order);
        for data in guards.iter_mut() {
            data.permute(&perm);
        }
        Ok(nrows)
    }

    /// Applies `perm` to every column (new row `i` is old row `perm[i]`).
    ///
    /// Every column is write-locked and the permutation is validated against
    /// all of them before the first one is touched, so a failure leaves the
    /// store unchanged.
    pub(crate) fn reorder(&self, perm: &[usize]) -> Result<()> {
        let registry = self.registry.read();
        let mut guards: Vec<_> = registry.slots.iter().map(|slot| slot.write()).collect();

        let nrows = guards.first().map_or(0, |data| data.len());
        if perm.len() != nrows {
            return Err(Error::InvalidPermutation(format!(
                "{} entries for a table of {nrows} rows",
                perm.len()
            )));
        }
        for (slot, data) in registry.slots.iter().zip(&guards) {
            if data.len() != nrows {
                return Err(Error::InvalidPermutation(format!(
                    "column {:?} has {} rows while the table has {nrows}",
                    slot.name,
                    data.len()
                )));
            }
        }

        let mut seen = bitvec![0; nrows];
        for &row in perm {
            if row >= nrows {
                return Err(Error::InvalidPermutation(format!(
                    "row {row} is out of range for {nrows} rows"
                )));
            }
            if seen.replace(row, true) {
                return Err(Error::InvalidPermutation(format!("row {row} appears twice")));
            }
        }

        for data in guards.iter_mut() {
            data.permute(perm);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> ColumnStore {
        let store = ColumnStore::default();
        store
            .insert(Column::from_values("id", vec![10_i32, 20, 30]))
            .unwrap();
        store
            .insert(Column::from_values("mag", vec![1.5_f64, 2.5, 3.5]))
            .unwrap();
        store
    }

    #[test]
    fn test_insert_checks_name_and_length() {
        let store = store();
        assert_eq!(store.ncols(), 2);
        assert_eq!(store.nrows(), 3);

        let err = store.insert(Column::from_values("id", vec![1_i32, 2, 3]));
        assert_eq!(err, Err(Error::DuplicateName("id".into())));

        let err = store.insert(Column::from_values("short", vec![1_u8]));
        assert_eq!(
            err,
            Err(Error::RowCountMismatch {
                column: "short".into(),
                expected: 3,
                actual: 1,
            })
        );
        assert_eq!(store.names(), vec!["id", "mag"]);
    }

    #[test]
    fn test_slot_lookup() {
        let store = store();
        assert!(store.contains("mag"));
        assert_eq!(store.slot("mag").unwrap().data_type(), DataType::Float64);
        assert_eq!(
            store.slot("nope").err(),
            Some(Error::NameNotFound("nope".into()))
        );
    }

    #[test]
    fn test_typed_guards() {
        let store = store();
        let slot = store.slot("id").unwrap();
        assert_eq!(*slot.read_typed::<i32>().unwrap(), vec![10, 20, 30]);
        assert!(slot.read_typed::<f64>().is_err());
        slot.write_typed::<i32>().unwrap().push(40);
        assert_eq!(slot.len(), 4);
    }

    #[test]
    fn test_append_row_is_checked_first() {
        let store = store();
        store
            .append_row(vec![Value::Int32(40), Value::Float64(4.5)])
            .unwrap();
        assert_eq!(store.row(3), Ok(vec![Value::Int32(40), Value::Float64(4.5)]));

        assert!(store.append_row(vec![Value::Int32(50)]).is_err());
        assert!(
            store
                .append_row(vec![Value::Int32(50), Value::Float32(5.5)])
                .is_err()
        );
        assert_eq!(store.nrows(), 4);
        assert_eq!(store.slot("mag").unwrap().len(), 4);
        assert!(store.row(4).is_err());
    }

    #[test]
    fn test_reorder_all_or_nothing() {
        let store = store();
        for bad in [vec![0, 1], vec![0, 1, 3], vec![0, 0, 1], vec![2, 1, 0, 3]] {
            assert!(matches!(
                store.reorder(&bad),
                Err(Error::InvalidPermutation(_))
            ));
        }
        assert_eq!(
            *store.slot("id").unwrap().read_typed::<i32>().unwrap(),
            vec![10, 20, 30]
        );

        store.reorder(&[2, 0, 1]).unwrap();
        assert_eq!(
            *store.slot("id").unwrap().read_typed::<i32>().unwrap(),
            vec![30, 10, 20]
        );
        assert_eq!(
            *store.slot("mag").unwrap().read_typed::<f64>().unwrap(),
            vec![3.5, 1.5, 2.5]
        );
    }

    #[test]
    fn test_sort_by_permutes_every_column() {
        let store = store();
        store
            .append_row(vec![Value::Int32(5), Value::Float64(0.5)])
            .unwrap();

        let key = store.slot("id").unwrap();
        assert_eq!(store.sort_by(&key, SortOrder::Ascending), Ok(4));
        assert_eq!(
            *store.slot("id").unwrap().read_typed::<i32>().unwrap(),
            vec![5, 10, 20, 30]
        );
        assert_eq!(
            *store.slot("mag").unwrap().read_typed::<f64>().unwrap(),
            vec![0.5, 1.5, 2.5, 3.5]
        );
    }

    #[test]
    fn test_sort_by_rejects_ragged_columns() {
        let store = store();
        store.slot("mag").unwrap().write_typed::<f64>().unwrap().push(4.5);

        let key = store.slot("id").unwrap();
        assert_eq!(
            store.sort_by(&key, SortOrder::Descending),
            Err(Error::RowCountMismatch {
                column: "mag".into(),
                expected: 3,
                actual: 4,
            })
        );
        assert_eq!(
            *store.slot("id").unwrap().read_typed::<i32>().unwrap(),
            vec![10, 20, 30]
        );
    }

    #[test]
    fn test_sort_by_foreign_slot() {
        let store = store();
        let other = ColumnStore::default();
        other
            .insert(Column::from_values("id", vec![3_i32, 2, 1]))
            .unwrap();

        let foreign = other.slot("id").unwrap();
        assert_eq!(
            store.sort_by(&foreign, SortOrder::Ascending),
            Err(Error::NameNotFound("id".into()))
        );
    }

    #[test]
    fn test_reorder_rejects_ragged_columns() {
        let store = store();
        store.slot("id").unwrap().write_typed::<i32>().unwrap().push(40);
        assert!(store.reorder(&[0, 1, 2]).is_err());
        assert_eq!(
            *store.slot("mag").unwrap().read_typed::<f64>().unwrap(),
            vec![1.5, 2.5, 3.5]
        );
    }
}
