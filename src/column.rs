use crate::data_type::DataType;
use crate::element::Element;
use crate::error::{Error, Result};
use crate::value::Value;

/// Physical storage for column data.
/// Each variant wraps a vector of a specific element type to ensure contiguous
/// memory allocation (columnar storage).
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Bool(Vec<bool>),
    UInt8(Vec<u8>),
    Int16(Vec<i16>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    Text(Vec<String>),
}

/// Runs `$body` with `$values` bound to the typed vector inside `$data`,
/// whatever its variant.
macro_rules! with_values {
    ($data:expr, $values:ident => $body:expr) => {
        match $data {
            ColumnData::Bool($values) => $body,
            ColumnData::UInt8($values) => $body,
            ColumnData::Int16($values) => $body,
            ColumnData::Int32($values) => $body,
            ColumnData::Int64($values) => $body,
            ColumnData::Float32($values) => $body,
            ColumnData::Float64($values) => $body,
            ColumnData::Text($values) => $body,
        }
    };
}

/// Direction of an alignment-preserving sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl ColumnData {
    /// Builds empty storage for the given type tag.
    pub fn empty(data_type: DataType) -> Self {
        match data_type {
            DataType::Bool => Self::Bool(vec![]),
            DataType::UInt8 => Self::UInt8(vec![]),
            DataType::Int16 => Self::Int16(vec![]),
            DataType::Int32 => Self::Int32(vec![]),
            DataType::Int64 => Self::Int64(vec![]),
            DataType::Float32 => Self::Float32(vec![]),
            DataType::Float64 => Self::Float64(vec![]),
            DataType::Text => Self::Text(vec![]),
        }
    }

    pub fn data_type(&self) -> DataType {
        match self {
            Self::Bool(_) => DataType::Bool,
            Self::UInt8(_) => DataType::UInt8,
            Self::Int16(_) => DataType::Int16,
            Self::Int32(_) => DataType::Int32,
            Self::Int64(_) => DataType::Int64,
            Self::Float32(_) => DataType::Float32,
            Self::Float64(_) => DataType::Float64,
            Self::Text(_) => DataType::Text,
        }
    }

    pub fn len(&self) -> usize {
        with_values!(self, values => values.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn get_value(&self, row_idx: usize) -> Option<Value> {
        with_values!(self, values => values.get(row_idx).map(|v| v.clone().into_value()))
    }

    /// Pushes `value` if its type matches, returning false otherwise.
    pub(crate) fn push_value(&mut self, value: Value) -> bool {
        with_values!(self, values => push_typed(values, value))
    }

    /// Computes the stable permutation that orders this column. Ties keep
    /// their original relative order.
    pub(crate) fn sort_permutation(&self, order: SortOrder) -> Vec<usize> {
        with_values!(self, values => sort_permutation(values, order))
    }

    /// Rearranges the rows so that new row `i` holds old row `perm[i]`.
    /// The caller guarantees `perm` is a permutation of `0..self.len()`.
    pub(crate) fn permute(&mut self, perm: &[usize]) {
        with_values!(self, values => {
            let permuted = perm.iter().map(|&i| values[i].clone()).collect();
            *values = permuted;
        })
    }
}

fn push_typed<T: Element>(values: &mut Vec<T>, value: Value) -> bool {
    match T::from_value(value) {
        Some(v) => {
            values.push(v);
            true
        }
        None => false,
    }
}

fn sort_permutation<T: Element>(values: &[T], order: SortOrder) -> Vec<usize> {
    let mut perm: Vec<usize> = (0..values.len()).collect();
    match order {
        SortOrder::Ascending => perm.sort_by(|&a, &b| values[a].total_order(&values[b])),
        SortOrder::Descending => perm.sort_by(|&a, &b| values[b].total_order(&values[a])),
    }
    perm
}

/// Pass-through metadata the file layer attaches to a column.
/// None of it is interpreted by the table core.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnMeta {
    /// Physical unit string, e.g. `"deg"` or `"Jy"`.
    pub unit: Option<String>,
    /// Linear scaling factor applied by readers.
    pub scale: Option<f64>,
    /// Zero-point offset applied by readers.
    pub zero: Option<f64>,
}

/// Represents a named column before (or outside of) a table.
/// It combines metadata (name, type) with the actual data.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    meta: ColumnMeta,
    data: ColumnData,
}

impl Column {
    /// Creates a new, empty column with the specified name and data type.
    /// The underlying data storage is chosen from the type tag.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            meta: ColumnMeta::default(),
            data: ColumnData::empty(data_type),
        }
    }

    /// Creates a column holding `values`, its type inferred from `T`.
    ///
    /// # Example
    /// ```
    /// # use coltable::{Column, DataType};
    /// let col = Column::from_values("flux", vec![1.5_f32, 2.5]);
    /// assert_eq!(col.data_type(), DataType::Float32);
    /// assert_eq!(col.len(), 2);
    /// ```
    pub fn from_values<T: Element>(name: impl Into<String>, values: Vec<T>) -> Self {
        Self {
            name: name.into(),
            meta: ColumnMeta::default(),
            data: T::into_data(values),
        }
    }

    /// Attaches pass-through metadata.
    pub fn with_meta(mut self, meta: ColumnMeta) -> Self {
        self.meta = meta;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_type(&self) -> DataType {
        self.data.data_type()
    }

    pub fn meta(&self) -> &ColumnMeta {
        &self.meta
    }

    /// Returns the number of rows currently stored in the column.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if there is no row in the column, else false.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn typed<T: Element>(&self) -> Result<&Vec<T>> {
        T::downcast_ref(&self.data)
            .ok_or_else(|| Error::type_mismatch::<T>(&self.name, self.data_type()))
    }

    fn typed_mut<T: Element>(&mut self) -> Result<&mut Vec<T>> {
        let actual = self.data_type();
        T::downcast_mut(&mut self.data).ok_or_else(|| Error::type_mismatch::<T>(&self.name, actual))
    }

    /// Appends a new value to the end of the column.
    ///
    /// # Errors
    /// Returns [Error::TypeMismatch] if `T` is not the column's element type.
    ///
    /// # Example
    /// ```
    /// # use coltable::{Column, DataType};
    /// let mut col = Column::new("counts", DataType::Int32);
    /// col.append(30_i32).unwrap();
    /// assert!(col.append(1.0_f64).is_err());
    /// assert_eq!(col.len(), 1);
    /// ```
    pub fn append<T: Element>(&mut self, value: T) -> Result<()> {
        self.typed_mut::<T>()?.push(value);
        Ok(())
    }

    /// Appends a dynamic value, checking its type against the column's.
    pub fn push_value(&mut self, value: Value) -> Result<()> {
        let actual = self.data_type();
        let requested = value.data_type();
        if !self.data.push_value(value) {
            return Err(Error::TypeMismatch {
                column: self.name.clone(),
                requested,
                actual,
            });
        }
        Ok(())
    }

    /// Retrieves the value at the specified row index.
    ///
    /// # Errors
    /// [Error::TypeMismatch] for a wrong `T`, [Error::IndexOutOfRange] when
    /// `row_idx >= len()`.
    pub fn get<T: Element>(&self, row_idx: usize) -> Result<T> {
        let values = self.typed::<T>()?;
        values.get(row_idx).cloned().ok_or(Error::IndexOutOfRange {
            index: row_idx,
            len: values.len(),
        })
    }

    /// Retrieves the value at the specified row index as a dynamic [Value].
    pub fn get_value(&self, row_idx: usize) -> Result<Value> {
        self.data.get_value(row_idx).ok_or(Error::IndexOutOfRange {
            index: row_idx,
            len: self.len(),
        })
    }

    /// Replace a value in the column by a new value.
    ///
    /// # Errors
    /// Returns an error if the row_idx is too high or if `T` does not match the
    /// column's data type.
    pub fn set<T: Element>(&mut self, row_idx: usize, value: T) -> Result<()> {
        let values = self.typed_mut::<T>()?;
        let len = values.len();
        let slot = values
            .get_mut(row_idx)
            .ok_or(Error::IndexOutOfRange { index: row_idx, len })?;
        *slot = value;
        Ok(())
    }

    /// Read-only view of the current contents.
    pub fn values<T: Element>(&self) -> Result<&[T]> {
        self.typed::<T>().map(Vec::as_slice)
    }

    /// Owned copy of the current contents.
    pub fn snapshot<T: Element>(&self) -> Result<Vec<T>> {
        self.typed::<T>().cloned()
    }

    pub(crate) fn into_parts(self) -> (String, ColumnMeta, ColumnData) {
        (self.name, self.meta, self.data)
    }
}
