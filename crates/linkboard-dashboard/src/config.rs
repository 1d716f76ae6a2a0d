//! Dashboard configuration as authored in the dashboard YAML/JSON block.

use crate::layer_coloring::{LayerDescriptor, LayerStrategy};
use linkboard_model::{LinkedTableConfig, ModelError, TableConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid dashboard config: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Table(#[from] ModelError),
    #[error("duplicate layer name: {0}")]
    DuplicateLayer(String),
    #[error("correlation alpha must lie in (0, 1), got {0}")]
    InvalidAlpha(f64),
}

/// What a map hover does to the linked table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HoverAction {
    #[default]
    Highlight,
    None,
}

/// What a map click does to the linked table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectAction {
    #[default]
    Filter,
    Highlight,
    None,
}

/// How table rows join to map features.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkageConfig {
    pub table_column: String,
    pub geo_property: String,
    #[serde(default)]
    pub on_hover: HoverAction,
    #[serde(default)]
    pub on_select: SelectAction,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationSettings {
    #[serde(default = "crate::config::default_alpha")]
    pub alpha: f64,
    /// Columns shown in the correlation matrix.
    #[serde(default)]
    pub attributes: Vec<String>,
}

pub(crate) const fn default_alpha() -> f64 {
    0.05
}

impl Default for CorrelationSettings {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
            attributes: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardConfig {
    pub table: TableConfig,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub linked_tables: Vec<LinkedTableConfig>,
    #[serde(default)]
    pub layers: Vec<LayerDescriptor>,
    #[serde(default)]
    pub layer_strategy: LayerStrategy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkage: Option<LinkageConfig>,
    #[serde(default)]
    pub correlation: CorrelationSettings,
}

impl DashboardConfig {
    /// Parses and validates a configuration document.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.table.validate()?;
        for linked in &self.linked_tables {
            linked.validate()?;
        }

        let mut names = HashSet::new();
        for layer in &self.layers {
            if !names.insert(layer.name.as_str()) {
                return Err(ConfigError::DuplicateLayer(layer.name.clone()));
            }
        }

        let alpha = self.correlation.alpha;
        if !(alpha > 0.0 && alpha < 1.0) {
            return Err(ConfigError::InvalidAlpha(alpha));
        }
        Ok(())
    }
}
