use crate::column::{Column, ColumnMeta, SortOrder};
use crate::config::TableConfig;
use crate::data_type::DataType;
use crate::element::Element;
use crate::error::Result;
use crate::filter::Filter;
use crate::handle::ColumnHandle;
use crate::predicate::Selector;
use crate::store::{ColumnSlot, ColumnStore};
use crate::value::Value;
use crate::view::ColumnView;

/// An in-memory table of named, typed columns.
///
/// Every method takes `&self`: share a table between threads with
/// `Arc<Table>`. Each column is locked independently, so scans of one column
/// run in parallel with appends to it or to any other column.
///
/// # Example
/// ```
/// use coltable::{Column, RowSet, Table};
///
/// let table = Table::new();
/// table.insert_column(Column::from_values("id", vec![1_i64, 2, 3])).unwrap();
/// table.insert_column(Column::from_values("mag", vec![9.5_f64, 7.25, 8.0])).unwrap();
///
/// let bright = table.select::<f64>("mag").unwrap().lt(8.5).build().unwrap();
/// assert_eq!(bright, RowSet::from_indices([1, 2]));
///
/// table.column::<f64>("mag").unwrap().sort_ascending().unwrap();
/// assert_eq!(table.column_values::<i64>("id").unwrap(), vec![2, 3, 1]);
/// ```
#[derive(Debug, Default)]
pub struct Table {
    config: TableConfig,
    store: ColumnStore,
}

impl Table {
    /// Creates an empty table with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TableConfig) -> Self {
        Self {
            config,
            store: ColumnStore::default(),
        }
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub(crate) fn store(&self) -> &ColumnStore {
        &self.store
    }

    /// Registers a column.
    ///
    /// # Errors
    /// - [Error::RowCountMismatch](crate::Error::RowCountMismatch) if the table
    ///   already has columns and `column.len()` differs from [Table::nrows].
    /// - [Error::DuplicateName](crate::Error::DuplicateName) if the name is taken.
    pub fn insert_column(&self, column: Column) -> Result<()> {
        let name = column.name().to_string();
        let data_type = column.data_type();
        let rows = column.len();
        self.store.insert(column)?;

        if self.config.verbose {
            tracing::debug!(
                table = self.config.label(),
                column = %name,
                ?data_type,
                rows,
                "column inserted"
            );
        }
        Ok(())
    }

    /// Number of rows, i.e. the length of the first column (0 without columns).
    pub fn nrows(&self) -> usize {
        self.store.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.store.ncols()
    }

    /// Column names in insertion order.
    pub fn column_names(&self) -> Vec<String> {
        self.store.names()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.store.contains(name)
    }

    pub fn data_type(&self, name: &str) -> Result<DataType> {
        Ok(self.store.slot(name)?.data_type())
    }

    pub fn meta(&self, name: &str) -> Result<ColumnMeta> {
        Ok(self.store.slot(name)?.meta().clone())
    }

    /// A typed, unscoped view of the named column.
    ///
    /// # Errors
    /// NameNotFound or TypeMismatch.
    pub fn column<T: Element>(&self, name: &str) -> Result<ColumnView<'_, T>> {
        ColumnView::new(self, name)
    }

    /// Copy of the named column's full contents.
    pub fn column_values<T: Element>(&self, name: &str) -> Result<Vec<T>> {
        self.column::<T>(name)?.snapshot()
    }

    /// Predicate builder over the named column.
    pub fn select<T: Element>(&self, name: &str) -> Result<Selector<'_, T>> {
        Selector::new(self, name)
    }

    /// Eager comparison sugar over the named column.
    pub fn filter<T: Element>(&self, name: &str) -> Result<Filter<'_, T>> {
        Filter::new(self, name)
    }

    /// Type-erased access by name.
    pub fn handle(&self, name: &str) -> Result<ColumnHandle<'_>> {
        ColumnHandle::new(self, name)
    }

    /// Reorders every column so that new row `i` holds old row `perm[i]`.
    ///
    /// # Errors
    /// [Error::InvalidPermutation](crate::Error::InvalidPermutation) if `perm`
    /// is not a bijection over `[0, nrows)` or if the columns currently
    /// disagree on their length. The table is left unchanged.
    pub fn reorder_rows(&self, perm: &[usize]) -> Result<()> {
        self.store.reorder(perm)?;

        if self.config.verbose {
            tracing::debug!(
                table = self.config.label(),
                rows = perm.len(),
                columns = self.ncols(),
                "rows reordered"
            );
        }
        Ok(())
    }

    /// Sorts the whole table by the named column, whatever its type.
    ///
    /// The sort order is computed and applied under one set of column locks,
    /// so concurrent appends, sorts and reorders each see the table either
    /// before or after this call.
    ///
    /// # Errors
    /// NameNotFound, or RowCountMismatch while a single-column append has
    /// left the columns ragged.
    pub fn sort_by(&self, name: &str, order: SortOrder) -> Result<()> {
        let slot = self.store.slot(name)?;
        self.sort_slot(&slot, order)
    }

    pub(crate) fn sort_slot(&self, key: &ColumnSlot, order: SortOrder) -> Result<()> {
        let rows = self.store.sort_by(key, order)?;

        if self.config.verbose {
            tracing::debug!(
                table = self.config.label(),
                column = key.name(),
                ?order,
                rows,
                "rows sorted"
            );
        }
        Ok(())
    }

    /// Appends one value to the named column only.
    ///
    /// Sibling columns are not extended; keeping the row counts in step is up
    /// to the caller. See [Table::append_row] for a whole-row append.
    pub fn append<T: Element>(&self, name: &str, value: T) -> Result<()> {
        let slot = self.store.slot(name)?;
        slot.write_typed::<T>()?.push(value);

        if self.config.verbose {
            tracing::trace!(table = self.config.label(), column = name, "value appended");
        }
        Ok(())
    }

    /// Appends one value to every column, in [Table::column_names] order.
    ///
    /// # Errors
    /// ArityMismatch or TypeMismatch; in both cases no column grows.
    pub fn append_row(&self, values: Vec<Value>) -> Result<()> {
        self.store.append_row(values)
    }

    /// Reads one row across every column, in [Table::column_names] order.
    pub fn get_row(&self, row: usize) -> Result<Vec<Value>> {
        self.store.row(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::row_set::RowSet;

    fn table() -> Table {
        let table = Table::with_config(TableConfig::new().with_name("EVENTS"));
        table
            .insert_column(Column::from_values("id", vec![1_i32, 2, 3]))
            .unwrap();
        table
            .insert_column(Column::from_values(
                "name",
                vec!["vega".to_string(), "deneb".into(), "altair".into()],
            ))
            .unwrap();
        table
    }

    #[test]
    fn test_table_creation() {
        let table = Table::new();
        assert_eq!(table.ncols(), 0);
        assert_eq!(table.nrows(), 0);

        let table = super::tests::table();
        assert_eq!(table.ncols(), 2);
        assert_eq!(table.nrows(), 3);
        assert_eq!(table.column_names(), vec!["id", "name"]);
        assert_eq!(table.config().name.as_deref(), Some("EVENTS"));
    }

    #[test]
    fn test_insert_column_row_count() {
        let table = table();

        let err = table.insert_column(Column::from_values("flux", vec![1.0_f64]));
        assert_eq!(
            err,
            Err(Error::RowCountMismatch {
                column: "flux".into(),
                expected: 3,
                actual: 1,
            })
        );
        assert!(
            table
                .insert_column(Column::from_values("flux", vec![1.0_f64, 2.0, 3.0]))
                .is_ok()
        );
        assert_eq!(table.ncols(), 3);
    }

    #[test]
    fn test_first_column_sets_row_count() {
        let table = Table::new();
        table
            .insert_column(Column::from_values("a", vec![0_u8; 5]))
            .unwrap();
        assert_eq!(table.nrows(), 5);
        assert!(
            table
                .insert_column(Column::from_values("b", vec![0_u8; 4]))
                .is_err()
        );
    }

    #[test]
    fn test_lookup_errors() {
        let table = table();
        assert_eq!(
            table.column::<i32>("nope").err().map(|e| e.to_string()),
            Some("column \"nope\" does not exist".to_string())
        );
        assert!(matches!(
            table.column::<i64>("id").err(),
            Some(Error::TypeMismatch {
                requested: DataType::Int64,
                actual: DataType::Int32,
                ..
            })
        ));
        assert_eq!(table.data_type("name"), Ok(DataType::Text));
        assert!(table.contains("id"));
        assert!(!table.contains("ID"));
    }

    #[test]
    fn test_meta_pass_through() {
        let table = Table::new();
        let meta = ColumnMeta {
            unit: Some("deg".into()),
            scale: Some(1.0),
            zero: None,
        };
        table
            .insert_column(Column::from_values("ra", vec![10.5_f64]).with_meta(meta.clone()))
            .unwrap();
        assert_eq!(table.meta("ra"), Ok(meta));
    }

    #[test]
    fn test_reorder_rows() {
        let table = table();
        table.reorder_rows(&[2, 0, 1]).unwrap();
        assert_eq!(table.column_values::<i32>("id").unwrap(), vec![3, 1, 2]);
        assert_eq!(
            table.column_values::<String>("name").unwrap(),
            vec!["altair", "vega", "deneb"]
        );
    }

    #[test]
    fn test_reorder_rows_rejects_non_permutations() {
        let table = table();
        for perm in [&[0, 1][..], &[0, 1, 1], &[0, 1, 3], &[3, 2, 1, 0]] {
            assert!(matches!(
                table.reorder_rows(perm),
                Err(Error::InvalidPermutation(_))
            ));
        }
        assert_eq!(table.column_values::<i32>("id").unwrap(), vec![1, 2, 3]);
        assert_eq!(
            table.column_values::<String>("name").unwrap(),
            vec!["vega", "deneb", "altair"]
        );
    }

    #[test]
    fn test_sort_by_text() {
        let table = table();
        table.sort_by("name", SortOrder::Ascending).unwrap();
        assert_eq!(table.column_values::<i32>("id").unwrap(), vec![3, 2, 1]);
        table.sort_by("id", SortOrder::Descending).unwrap();
        assert_eq!(
            table.column_values::<String>("name").unwrap(),
            vec!["altair", "deneb", "vega"]
        );
    }

    #[test]
    fn test_append_single_column() {
        let table = table();
        table.append("id", 4_i32).unwrap();
        assert_eq!(table.column::<i32>("id").unwrap().len(), 4);
        assert_eq!(table.column::<String>("name").unwrap().len(), 3);
        assert!(table.append("id", 4_i64).is_err());

        // Ragged columns can be neither reordered nor sorted.
        assert!(table.reorder_rows(&[0, 1, 2]).is_err());
        assert!(table.reorder_rows(&[0, 1, 2, 3]).is_err());
        assert_eq!(
            table.sort_by("id", SortOrder::Descending),
            Err(Error::RowCountMismatch {
                column: "name".into(),
                expected: 4,
                actual: 3,
            })
        );
        assert!(matches!(
            table.column::<i32>("id").unwrap().sort_ascending(),
            Err(Error::RowCountMismatch { .. })
        ));
        assert_eq!(table.column_values::<i32>("id").unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_append_and_get_row() {
        let table = table();
        table
            .append_row(vec![Value::Int32(4), Value::from("sirius")])
            .unwrap();
        assert_eq!(table.nrows(), 4);
        assert_eq!(
            table.get_row(3),
            Ok(vec![Value::Int32(4), Value::from("sirius")])
        );

        assert_eq!(
            table.append_row(vec![Value::Int32(5)]),
            Err(Error::ArityMismatch {
                expected: 2,
                actual: 1
            })
        );
        assert!(
            table
                .append_row(vec![Value::from("x"), Value::Int32(5)])
                .is_err()
        );
        assert_eq!(table.nrows(), 4);
        assert!(table.get_row(4).is_err());
    }

    #[test]
    fn test_entry_points_agree() {
        let table = table();
        let built = table.select::<i32>("id").unwrap().ge(2).build().unwrap();
        let eager = table.filter::<i32>("id").unwrap().ge(2).unwrap();
        assert_eq!(built, eager);
        assert_eq!(built, RowSet::from_indices([1, 2]));
        assert_eq!(table.handle("id").unwrap().data_type(), DataType::Int32);
    }
}
