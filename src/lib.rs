//! In-memory, strongly-typed columnar tables.
//!
//! A [Table] owns named columns of one element type each. Rows are selected
//! into [RowSet]s with [Table::select] or [Table::filter], mutated and
//! summarized through scoped [ColumnView]s, updated across columns with
//! [ColumnHandle::where_column], and sorted without breaking row alignment.

pub mod column;
pub mod config;
pub mod data_type;
pub mod element;
pub mod error;
pub mod filter;
pub mod handle;
pub mod predicate;
pub mod row_set;
pub mod stats;
mod store;
pub mod table;
pub mod value;
pub mod view;

pub use column::{Column, ColumnData, ColumnMeta, SortOrder};
pub use config::TableConfig;
pub use data_type::DataType;
pub use element::{Element, Numeric};
pub use error::{Error, Result};
pub use filter::Filter;
pub use handle::{ColumnHandle, ConditionalUpdate};
pub use predicate::{Comparator, Selector};
pub use row_set::RowSet;
pub use stats::Summary;
pub use table::Table;
pub use value::Value;
pub use view::ColumnView;
