//! The dashboard's central data table.
//!
//! Rows arrive already parsed (CSV/GeoJSON decoding happens outside this crate); the table only
//! answers lookups by id and distinct-value queries used to populate filter widgets.

use crate::error::{ModelError, ModelResult};
use crate::row::{CellLookup, Row};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Serde helper for `#[serde(default = "crate::table::default_true")]`.
pub(crate) const fn default_true() -> bool {
    true
}

/// Per-column display options carried through from the dashboard configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnOptions {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub show: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hide: Vec<String>,
    /// Opaque per-column formatting hints, interpreted by the renderer.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub formats: BTreeMap<String, serde_json::Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableConfig {
    pub name: String,
    pub dataset: String,
    pub id_column: String,
    #[serde(default = "crate::table::default_true")]
    pub visible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<ColumnOptions>,
}

impl TableConfig {
    pub fn new(
        name: impl Into<String>,
        dataset: impl Into<String>,
        id_column: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            dataset: dataset.into(),
            id_column: id_column.into(),
            visible: true,
            columns: None,
        }
    }

    pub fn validate(&self) -> ModelResult<()> {
        if self.name.trim().is_empty() {
            return Err(ModelError::EmptyField {
                table: self.name.clone(),
                field: "name",
            });
        }
        if self.id_column.trim().is_empty() {
            return Err(ModelError::EmptyField {
                table: self.name.clone(),
                field: "idColumn",
            });
        }
        Ok(())
    }
}

/// Parses a JSON array of flat objects into rows.
pub fn rows_from_json(text: &str) -> ModelResult<Vec<Row>> {
    Ok(serde_json::from_str::<Vec<Row>>(text)?)
}

/// Distinct values of `column` across `rows`, in first-seen order. Absent cells read as
/// [`Value::Null`].
pub(crate) fn distinct_values<'a, R>(rows: impl IntoIterator<Item = &'a R>, column: &str) -> Vec<Value>
where
    R: CellLookup + 'a,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for row in rows {
        let value = row.cell(column).cloned().unwrap_or(Value::Null);
        if seen.insert(value.clone()) {
            out.push(value);
        }
    }
    out
}

#[derive(Clone, Debug)]
pub struct DataTable {
    config: TableConfig,
    rows: Vec<Row>,
}

impl DataTable {
    pub fn new(config: TableConfig, rows: Vec<Row>) -> Self {
        Self { config, rows }
    }

    /// Builds a table from an in-memory JSON array of flat row objects.
    pub fn from_json(config: TableConfig, text: &str) -> ModelResult<Self> {
        config.validate()?;
        let rows = rows_from_json(text)?;
        log::debug!("table {}: loaded {} rows", config.name, rows.len());
        Ok(Self::new(config, rows))
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn id_column(&self) -> &str {
        &self.config.id_column
    }

    /// First row whose id cell is strictly equal to `id` (no type coercion).
    pub fn row_by_id(&self, id: &Value) -> Option<&Row> {
        let column = self.id_column();
        self.rows.iter().find(|row| row.get(column) == Some(id))
    }

    /// Rows whose id is in `ids`, in table order.
    pub fn rows_by_ids(&self, ids: &HashSet<Value>) -> Vec<&Row> {
        let column = self.id_column();
        self.rows
            .iter()
            .filter(|row| row.get(column).is_some_and(|id| ids.contains(id)))
            .collect()
    }

    pub fn column_values(&self, column: &str) -> Vec<Value> {
        distinct_values(&self.rows, column)
    }
}
