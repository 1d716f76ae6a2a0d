//! Secondary tables that drill down from a parent table's selection (e.g. scenarios →
//! vehicles).

use crate::error::{ModelError, ModelResult};
use crate::observer::{ObserverId, Observers};
use crate::row::Row;
use crate::table::{distinct_values, rows_from_json, ColumnOptions};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedTableConfig {
    pub name: String,
    pub dataset: String,
    pub id_column: String,
    /// Column holding the parent table's id.
    pub link_column: String,
    #[serde(default = "crate::table::default_true")]
    pub visible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<ColumnOptions>,
}

impl LinkedTableConfig {
    pub fn validate(&self) -> ModelResult<()> {
        for (field, value) in [
            ("name", &self.name),
            ("idColumn", &self.id_column),
            ("linkColumn", &self.link_column),
        ] {
            if value.trim().is_empty() {
                return Err(ModelError::EmptyField {
                    table: self.name.clone(),
                    field,
                });
            }
        }
        Ok(())
    }
}

/// Listener invoked with the filtered view after every parent-selection change.
pub type LinkedTableListener = dyn FnMut(&[&Row]);

pub struct LinkedTable {
    config: LinkedTableConfig,
    rows: Vec<Row>,
    /// Indices into `rows` visible under the current parent selection.
    visible: Vec<usize>,
    parent_selection: HashSet<Value>,
    listeners: Observers<LinkedTableListener>,
}

impl LinkedTable {
    pub fn new(config: LinkedTableConfig, rows: Vec<Row>) -> Self {
        let visible = (0..rows.len()).collect();
        Self {
            config,
            rows,
            visible,
            parent_selection: HashSet::new(),
            listeners: Observers::new(),
        }
    }

    pub fn from_json(config: LinkedTableConfig, text: &str) -> ModelResult<Self> {
        config.validate()?;
        let rows = rows_from_json(text)?;
        Ok(Self::new(config, rows))
    }

    pub fn config(&self) -> &LinkedTableConfig {
        &self.config
    }

    pub fn id_column(&self) -> &str {
        &self.config.id_column
    }

    pub fn link_column(&self) -> &str {
        &self.config.link_column
    }

    pub fn all_rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn filtered_rows(&self) -> Vec<&Row> {
        self.visible.iter().map(|&idx| &self.rows[idx]).collect()
    }

    pub fn parent_selection(&self) -> &HashSet<Value> {
        &self.parent_selection
    }

    /// Replaces the parent selection, recomputes the filtered view and notifies listeners.
    ///
    /// An empty selection shows every row.
    pub fn set_parent_selection(&mut self, ids: impl IntoIterator<Item = Value>) {
        self.parent_selection = ids.into_iter().collect();
        self.refilter();

        let rows: Vec<&Row> = self.visible.iter().map(|&idx| &self.rows[idx]).collect();
        for listener in self.listeners.iter_mut() {
            listener(&rows);
        }
    }

    fn refilter(&mut self) {
        let link_column = self.config.link_column.as_str();
        self.visible = if self.parent_selection.is_empty() {
            (0..self.rows.len()).collect()
        } else {
            self.rows
                .iter()
                .enumerate()
                .filter(|(_, row)| {
                    row.get(link_column)
                        .is_some_and(|v| self.parent_selection.contains(v))
                })
                .map(|(idx, _)| idx)
                .collect()
        };
        log::debug!(
            "linked table {}: filtered to {} rows (parent selection: {} ids)",
            self.config.name,
            self.visible.len(),
            self.parent_selection.len()
        );
    }

    /// Looks up a row by id within the filtered view.
    pub fn row_by_id(&self, id: &Value) -> Option<&Row> {
        let column = self.id_column();
        self.visible
            .iter()
            .map(|&idx| &self.rows[idx])
            .find(|row| row.get(column) == Some(id))
    }

    /// Rows of the filtered view whose id is in `ids`.
    pub fn rows_by_ids(&self, ids: &HashSet<Value>) -> Vec<&Row> {
        let column = self.id_column();
        self.visible
            .iter()
            .map(|&idx| &self.rows[idx])
            .filter(|row| row.get(column).is_some_and(|id| ids.contains(id)))
            .collect()
    }

    /// Distinct values of `column` within the filtered view.
    pub fn column_values(&self, column: &str) -> Vec<Value> {
        distinct_values(self.visible.iter().map(|&idx| &self.rows[idx]), column)
    }

    pub fn add_listener(&mut self, listener: impl FnMut(&[&Row]) + 'static) -> ObserverId {
        self.listeners.insert(Box::new(listener))
    }

    pub fn remove_listener(&mut self, id: ObserverId) -> bool {
        self.listeners.remove(id)
    }
}

impl std::fmt::Debug for LinkedTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkedTable")
            .field("config", &self.config)
            .field("rows", &self.rows.len())
            .field("visible", &self.visible.len())
            .field("parent_selection", &self.parent_selection)
            .field("listeners", &self.listeners)
            .finish()
    }
}
