use thiserror::Error;

use crate::data_type::DataType;

/// Every failure the table core can report.
///
/// Errors are raised synchronously at the violating call and are never
/// retried internally. No operation substitutes a default value (zero, NaN)
/// for a failed access.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A column was requested under an element type other than its declared one.
    #[error("column {column:?} holds {actual:?} values, requested as {requested:?}")]
    TypeMismatch {
        column: String,
        requested: DataType,
        actual: DataType,
    },

    /// No column is registered under the given name.
    #[error("column {0:?} does not exist")]
    NameNotFound(String),

    /// A column with the same name is already registered.
    #[error("column {0:?} already exists")]
    DuplicateName(String),

    /// A column's length disagrees with the table's row count.
    #[error("column {column:?} has {actual} rows while the table has {expected}")]
    RowCountMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// A whole row was given with the wrong number of values.
    #[error("row has {actual} values while the table has {expected} columns")]
    ArityMismatch { expected: usize, actual: usize },

    /// A row reordering is not a bijection over `[0, nrows)`.
    #[error("invalid permutation: {0}")]
    InvalidPermutation(String),

    /// Direct element access beyond the column length.
    #[error("row index {index} is out of range for a length of {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// An aggregate was requested over zero rows.
    #[error("aggregate over an empty selection of column {0:?}")]
    EmptySelection(String),

    /// Scoped division by a scalar that is zero in the column's element type.
    #[error("division by zero on column {0:?}")]
    DivisionByZero(String),

    /// An external type code has no matching element type.
    #[error("unsupported column type code {0:?}")]
    UnknownTypeCode(char),

    /// Numeric access through the dynamic value surface on a non-numeric value.
    #[error("{0:?} values are not numeric")]
    NotNumeric(DataType),
}

/// Result alias used across the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub(crate) fn type_mismatch<T: crate::element::Element>(column: &str, actual: DataType) -> Self {
        Self::TypeMismatch {
            column: column.to_string(),
            requested: T::DATA_TYPE,
            actual,
        }
    }
}
