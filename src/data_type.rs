use crate::error::{Error, Result};

/// Represents the element types a column can hold.
/// Each variant maps one-to-one onto a variant of
/// [ColumnData](crate::column::ColumnData).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// A boolean flag (true or false).
    Bool,
    /// An unsigned 8-bit integer.
    UInt8,
    /// A signed 16-bit integer.
    Int16,
    /// A signed 32-bit integer.
    Int32,
    /// A signed 64-bit integer.
    Int64,
    /// A 32-bit floating-point number.
    Float32,
    /// A 64-bit floating-point number.
    Float64,
    /// A variable-length UTF-8 character string.
    Text,
}

impl DataType {
    /// Resolves the single-letter binary-table format code used by the
    /// file layer (`L`, `B`, `I`, `J`, `K`, `E`, `D`, `A`) into an element type.
    ///
    /// Lowercase codes are accepted.
    ///
    /// # Example
    /// ```
    /// # use coltable::DataType;
    /// assert_eq!(DataType::from_tform_code('D').unwrap(), DataType::Float64);
    /// assert!(DataType::from_tform_code('Q').is_err());
    /// ```
    pub fn from_tform_code(code: char) -> Result<Self> {
        match code.to_ascii_uppercase() {
            'L' => Ok(Self::Bool),
            'B' => Ok(Self::UInt8),
            'I' => Ok(Self::Int16),
            'J' => Ok(Self::Int32),
            'K' => Ok(Self::Int64),
            'E' => Ok(Self::Float32),
            'D' => Ok(Self::Float64),
            'A' => Ok(Self::Text),
            _ => Err(Error::UnknownTypeCode(code)),
        }
    }

    /// The format code this type is written back with.
    pub fn tform_code(self) -> char {
        match self {
            Self::Bool => 'L',
            Self::UInt8 => 'B',
            Self::Int16 => 'I',
            Self::Int32 => 'J',
            Self::Int64 => 'K',
            Self::Float32 => 'E',
            Self::Float64 => 'D',
            Self::Text => 'A',
        }
    }

    /// Returns true if scoped arithmetic and statistics apply to this type.
    pub fn is_numeric(self) -> bool {
        !matches!(self, Self::Bool | Self::Text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tform_codes() {
        for code in ['L', 'B', 'I', 'J', 'K', 'E', 'D', 'A'] {
            let data_type = DataType::from_tform_code(code).unwrap();
            assert_eq!(data_type.tform_code(), code);
        }
        assert_eq!(DataType::from_tform_code('j').unwrap(), DataType::Int32);
        assert_eq!(
            DataType::from_tform_code('X'),
            Err(Error::UnknownTypeCode('X'))
        );
    }

    #[test]
    fn test_is_numeric() {
        assert!(DataType::Int16.is_numeric());
        assert!(DataType::Float32.is_numeric());
        assert!(!DataType::Bool.is_numeric());
        assert!(!DataType::Text.is_numeric());
    }
}
