//! The filter engine: named column predicates, ANDed across filters and ORed within one.

use crate::matching::values_match;
use linkboard_model::{CellLookup, ObserverId, Observers, Value};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterType {
    #[default]
    Categorical,
    Range,
    Time,
    Binned,
}

/// How a widget intends to mutate its filter: toggling single values or replacing the whole
/// set. Matching ignores it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterBehavior {
    #[default]
    Toggle,
    Replace,
}

/// A named predicate over one column. Stored filters always have a non-empty value set.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    pub id: String,
    pub column: String,
    #[serde(rename = "type")]
    pub filter_type: FilterType,
    pub values: HashSet<Value>,
    pub behavior: FilterBehavior,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bin_size: Option<f64>,
}

impl Filter {
    /// Whether `row` satisfies this filter. Rows without the column never match.
    pub fn matches<R: CellLookup + ?Sized>(&self, row: &R) -> bool {
        let Some(cell) = row.cell(&self.column) else {
            return false;
        };

        match (self.filter_type, self.bin_size) {
            (FilterType::Binned, Some(bin_size)) if bin_size > 0.0 => {
                let Some(n) = cell.to_number() else {
                    return false;
                };
                self.values.iter().any(|start| match start.to_number() {
                    Some(start) => n >= start && n < start + bin_size,
                    None => false,
                })
            }
            _ => self.values.iter().any(|v| values_match(cell, v)),
        }
    }
}

/// The live filter collection, keyed by filter id.
pub type FilterMap = BTreeMap<String, Filter>;

/// Receives the full filter collection after every mutation.
pub trait FilterObserver {
    fn on_filters_changed(&mut self, filters: &FilterMap);
}

impl<F> FilterObserver for F
where
    F: FnMut(&FilterMap),
{
    fn on_filters_changed(&mut self, filters: &FilterMap) {
        self(filters)
    }
}

#[derive(Debug, Default)]
pub struct FilterEngine {
    filters: FilterMap,
    observers: Observers<dyn FilterObserver>,
}

impl FilterEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates or replaces the filter `id`. An empty `values` set deletes it instead.
    pub fn set_filter(
        &mut self,
        id: impl Into<String>,
        column: impl Into<String>,
        values: impl IntoIterator<Item = Value>,
        filter_type: FilterType,
        bin_size: Option<f64>,
    ) {
        let id = id.into();
        let values: HashSet<Value> = values.into_iter().collect();

        if values.is_empty() {
            log::debug!("filter {id}: cleared (empty value set)");
            self.filters.remove(&id);
        } else {
            let column = column.into();
            log::debug!(
                "filter {id}: {} value(s) on column {column} ({filter_type:?})",
                values.len()
            );
            self.filters.insert(
                id.clone(),
                Filter {
                    id,
                    column,
                    filter_type,
                    values,
                    behavior: FilterBehavior::default(),
                    bin_size,
                },
            );
        }
        self.notify();
    }

    /// Adds `value` to filter `id`, or removes it when already present. Unknown ids are
    /// ignored.
    pub fn toggle_filter_value(&mut self, id: &str, value: Value) {
        let Some(filter) = self.filters.get_mut(id) else {
            return;
        };
        if !filter.values.remove(&value) {
            filter.values.insert(value);
        }
        if filter.values.is_empty() {
            log::debug!("filter {id}: last value toggled off");
            self.filters.remove(id);
        }
        self.notify();
    }

    /// Records the widget behavior for filter `id`. Returns `false` for unknown ids.
    pub fn set_filter_behavior(&mut self, id: &str, behavior: FilterBehavior) -> bool {
        let Some(filter) = self.filters.get_mut(id) else {
            return false;
        };
        filter.behavior = behavior;
        self.notify();
        true
    }

    pub fn clear_filter(&mut self, id: &str) {
        self.filters.remove(id);
        self.notify();
    }

    pub fn clear_all_filters(&mut self) {
        self.filters.clear();
        self.notify();
    }

    pub fn filters(&self) -> &FilterMap {
        &self.filters
    }

    pub fn filter(&self, id: &str) -> Option<&Filter> {
        self.filters.get(id)
    }

    pub fn has_active_filters(&self) -> bool {
        !self.filters.is_empty()
    }

    /// Whether `row` passes every active filter.
    pub fn matches<R: CellLookup + ?Sized>(&self, row: &R) -> bool {
        self.filters.values().all(|filter| filter.matches(row))
    }

    /// The rows passing every active filter, in input order.
    pub fn apply_filters<'a, R: CellLookup>(&self, rows: &'a [R]) -> Vec<&'a R> {
        if self.filters.is_empty() {
            return rows.iter().collect();
        }
        let out: Vec<&R> = rows.iter().filter(|row| self.matches(*row)).collect();
        log::debug!(
            "applied {} filter(s): {} of {} rows remain",
            self.filters.len(),
            out.len(),
            rows.len()
        );
        out
    }

    pub fn add_observer(&mut self, observer: impl FilterObserver + 'static) -> ObserverId {
        self.observers.insert(Box::new(observer))
    }

    pub fn remove_observer(&mut self, id: ObserverId) -> bool {
        self.observers.remove(id)
    }

    fn notify(&mut self) {
        for observer in self.observers.iter_mut() {
            observer.on_filters_changed(&self.filters);
        }
    }
}
