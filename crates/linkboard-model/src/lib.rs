//! Shared data model for the linkboard dashboard engines.
//!
//! This crate focuses on:
//! - A typed scalar [`Value`] (null / boolean / number / text) that is hashable, so filter and
//!   selection sets can hold arbitrary cell values.
//! - Schema-less, insertion-ordered [`Row`]s and the [`CellLookup`] trait every engine reads
//!   through.
//! - The central [`DataTable`] and drill-down [`LinkedTable`].
//! - [`Observers`], the synchronous listener registry used by all stateful engines.

#![forbid(unsafe_code)]

mod error;
mod linked;
mod observer;
mod row;
mod table;
mod value;

pub use crate::error::{ModelError, ModelResult};
pub use crate::linked::{LinkedTable, LinkedTableConfig, LinkedTableListener};
pub use crate::observer::{ObserverId, Observers};
pub use crate::row::{CellLookup, Row};
pub use crate::table::{rows_from_json, ColumnOptions, DataTable, TableConfig};
pub use crate::value::Value;
