//! Shared hover and selection state broadcast across otherwise independent widgets.

use linkboard_model::{ObserverId, Observers, Value};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub type IdSet = HashSet<Value>;

/// The correlation cell currently drilled into.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttributePair {
    pub x: String,
    pub y: String,
}

/// Callback slots for linkage changes.
///
/// Hover and selection are independent channels; each mutator only calls its own slot. The
/// attribute-pair slot is optional and does nothing unless overridden.
pub trait LinkageObserver {
    fn on_hovered_changed(&mut self, hovered: &IdSet);

    fn on_selected_changed(&mut self, selected: &IdSet);

    fn on_attribute_pair_selected(&mut self, _pair: &AttributePair) {}
}

#[derive(Debug, Default)]
pub struct LinkageEngine {
    hovered: IdSet,
    selected: IdSet,
    attribute_pair: Option<AttributePair>,
    observers: Observers<dyn LinkageObserver>,
}

impl LinkageEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_hovered_ids(&mut self, ids: impl IntoIterator<Item = Value>) {
        self.hovered = ids.into_iter().collect();
        self.notify_hovered();
    }

    pub fn set_selected_ids(&mut self, ids: impl IntoIterator<Item = Value>) {
        self.selected = ids.into_iter().collect();
        self.notify_selected();
    }

    /// Set-level toggle: when every id in `ids` is already selected they are all removed,
    /// otherwise they are all added.
    pub fn toggle_selected_ids(&mut self, ids: impl IntoIterator<Item = Value>) {
        let ids: Vec<Value> = ids.into_iter().collect();
        if ids.iter().all(|id| self.selected.contains(id)) {
            for id in &ids {
                self.selected.remove(id);
            }
        } else {
            self.selected.extend(ids);
        }
        self.notify_selected();
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
        self.notify_selected();
    }

    pub fn hovered_ids(&self) -> &IdSet {
        &self.hovered
    }

    pub fn selected_ids(&self) -> &IdSet {
        &self.selected
    }

    pub fn is_hovered(&self, id: &Value) -> bool {
        self.hovered.contains(id)
    }

    pub fn is_selected(&self, id: &Value) -> bool {
        self.selected.contains(id)
    }

    pub fn set_selected_attribute_pair(&mut self, x: impl Into<String>, y: impl Into<String>) {
        let pair = self.attribute_pair.insert(AttributePair {
            x: x.into(),
            y: y.into(),
        });
        for observer in self.observers.iter_mut() {
            observer.on_attribute_pair_selected(pair);
        }
    }

    pub fn selected_attribute_pair(&self) -> Option<&AttributePair> {
        self.attribute_pair.as_ref()
    }

    /// Forgets the drill-down pair. Observers are not notified.
    pub fn clear_attribute_pair_selection(&mut self) {
        self.attribute_pair = None;
    }

    pub fn add_observer(&mut self, observer: impl LinkageObserver + 'static) -> ObserverId {
        self.observers.insert(Box::new(observer))
    }

    pub fn remove_observer(&mut self, id: ObserverId) -> bool {
        self.observers.remove(id)
    }

    fn notify_hovered(&mut self) {
        for observer in self.observers.iter_mut() {
            observer.on_hovered_changed(&self.hovered);
        }
    }

    fn notify_selected(&mut self) {
        for observer in self.observers.iter_mut() {
            observer.on_selected_changed(&self.selected);
        }
    }
}
