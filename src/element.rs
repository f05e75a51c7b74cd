use std::cmp::Ordering;
use std::fmt::Debug;

use crate::column::ColumnData;
use crate::data_type::DataType;
use crate::value::Value;

/// A Rust type that can be stored in a column.
///
/// The set of implementors is closed: one per [DataType] variant. The
/// `downcast_*` methods are the checked way back from the type-erased
/// [ColumnData] to a typed vector.
pub trait Element: Clone + Debug + Send + Sync + 'static {
    /// The column type tag this element type is stored under.
    const DATA_TYPE: DataType;

    /// Wraps a vector of this type into the tagged storage variant.
    fn into_data(values: Vec<Self>) -> ColumnData;

    /// Returns the typed vector if `data` holds this element type.
    fn downcast_ref(data: &ColumnData) -> Option<&Vec<Self>>;

    /// Mutable counterpart of [Element::downcast_ref].
    fn downcast_mut(data: &mut ColumnData) -> Option<&mut Vec<Self>>;

    fn into_value(self) -> Value;

    /// Extracts this type from a dynamic value, `None` on a type mismatch.
    fn from_value(value: Value) -> Option<Self>;

    /// Natural order used by comparators. `None` when the two values are
    /// unordered (a NaN operand), in which case every comparator but `ne` fails.
    fn compare(&self, other: &Self) -> Option<Ordering>;

    /// Total order used to compute sort permutations.
    fn total_order(&self, other: &Self) -> Ordering;
}

/// Arithmetic operators available to scoped column updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

/// A scalar in its widest lossless-enough representation, used to move a
/// scalar of one numeric type into a column of another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

/// Element types that support scoped arithmetic and statistics.
pub trait Numeric: Element + Copy {
    fn to_f64(self) -> f64;

    fn to_number(self) -> Number;

    /// Converts with Rust `as` semantics: floats truncate toward zero and
    /// saturate when cast to integers, integers wrap when narrowed.
    fn from_number(number: Number) -> Self;

    fn is_zero(self) -> bool;

    /// Integer types wrap on overflow.
    fn apply_op(self, op: ArithOp, rhs: Self) -> Self;

    /// Converts a scalar of any numeric type into this type.
    fn cast_from<S: Numeric>(scalar: S) -> Self {
        Self::from_number(scalar.to_number())
    }
}

macro_rules! element_impl {
    ($variant:ident) => {
        fn into_data(values: Vec<Self>) -> ColumnData {
            ColumnData::$variant(values)
        }

        fn downcast_ref(data: &ColumnData) -> Option<&Vec<Self>> {
            match data {
                ColumnData::$variant(values) => Some(values),
                _ => None,
            }
        }

        fn downcast_mut(data: &mut ColumnData) -> Option<&mut Vec<Self>> {
            match data {
                ColumnData::$variant(values) => Some(values),
                _ => None,
            }
        }

        fn into_value(self) -> Value {
            Value::$variant(self)
        }

        fn from_value(value: Value) -> Option<Self> {
            match value {
                Value::$variant(v) => Some(v),
                _ => None,
            }
        }
    };
}

macro_rules! integer_element {
    ($t:ty, $variant:ident, $data_type:ident) => {
        impl Element for $t {
            const DATA_TYPE: DataType = DataType::$data_type;

            element_impl!($variant);

            fn compare(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }

            fn total_order(&self, other: &Self) -> Ordering {
                self.cmp(other)
            }
        }

        impl Numeric for $t {
            fn to_f64(self) -> f64 {
                self as f64
            }

            fn to_number(self) -> Number {
                Number::Int(self as i64)
            }

            fn from_number(number: Number) -> Self {
                match number {
                    Number::Int(i) => i as $t,
                    Number::Float(f) => f as $t,
                }
            }

            fn is_zero(self) -> bool {
                self == 0
            }

            fn apply_op(self, op: ArithOp, rhs: Self) -> Self {
                match op {
                    ArithOp::Add => self.wrapping_add(rhs),
                    ArithOp::Sub => self.wrapping_sub(rhs),
                    ArithOp::Mul => self.wrapping_mul(rhs),
                    ArithOp::Div => self.wrapping_div(rhs),
                }
            }
        }
    };
}

macro_rules! float_element {
    ($t:ty, $variant:ident, $data_type:ident) => {
        impl Element for $t {
            const DATA_TYPE: DataType = DataType::$data_type;

            element_impl!($variant);

            fn compare(&self, other: &Self) -> Option<Ordering> {
                self.partial_cmp(other)
            }

            fn total_order(&self, other: &Self) -> Ordering {
                self.total_cmp(other)
            }
        }

        impl Numeric for $t {
            fn to_f64(self) -> f64 {
                self as f64
            }

            fn to_number(self) -> Number {
                Number::Float(self as f64)
            }

            fn from_number(number: Number) -> Self {
                match number {
                    Number::Int(i) => i as $t,
                    Number::Float(f) => f as $t,
                }
            }

            fn is_zero(self) -> bool {
                self == 0.0
            }

            fn apply_op(self, op: ArithOp, rhs: Self) -> Self {
                match op {
                    ArithOp::Add => self + rhs,
                    ArithOp::Sub => self - rhs,
                    ArithOp::Mul => self * rhs,
                    ArithOp::Div => self / rhs,
                }
            }
        }
    };
}

integer_element!(u8, UInt8, UInt8);
integer_element!(i16, Int16, Int16);
integer_element!(i32, Int32, Int32);
integer_element!(i64, Int64, Int64);
float_element!(f32, Float32, Float32);
float_element!(f64, Float64, Float64);

impl Element for bool {
    const DATA_TYPE: DataType = DataType::Bool;

    element_impl!(Bool);

    // false < true, i.e. 0/1 coercion.
    fn compare(&self, other: &Self) -> Option<Ordering> {
        Some(u8::from(*self).cmp(&u8::from(*other)))
    }

    fn total_order(&self, other: &Self) -> Ordering {
        u8::from(*self).cmp(&u8::from(*other))
    }
}

impl Element for String {
    const DATA_TYPE: DataType = DataType::Text;

    element_impl!(Text);

    fn compare(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }

    fn total_order(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }
}
