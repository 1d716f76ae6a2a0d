use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Ids are drawn from one counter for every registry, so a handle can never name another
/// registry's observer.
static NEXT_OBSERVER_ID: AtomicU64 = AtomicU64::new(0);

/// Handle returned when registering an observer; pass it back to deregister.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

/// Registration-ordered set of boxed observers.
///
/// Engines own one of these per notification channel and dispatch synchronously by iterating
/// [`Observers::iter_mut`] inside the mutating call.
pub struct Observers<T: ?Sized> {
    entries: Vec<(ObserverId, Box<T>)>,
}

impl<T: ?Sized> Observers<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn insert(&mut self, observer: Box<T>) -> ObserverId {
        let id = ObserverId(NEXT_OBSERVER_ID.fetch_add(1, Ordering::Relaxed));
        self.entries.push((id, observer));
        id
    }

    /// Returns `false` when `id` was not registered (or was already removed).
    pub fn remove(&mut self, id: ObserverId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.entries.iter_mut().map(|(_, observer)| &mut **observer)
    }

    /// Keeps only the observers for which `keep` returns `true`.
    pub fn retain(&mut self, mut keep: impl FnMut(&mut T) -> bool) {
        self.entries.retain_mut(|(_, observer)| keep(&mut **observer));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: ?Sized> Default for Observers<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for Observers<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("len", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_not_reused_after_removal() {
        let mut observers: Observers<dyn FnMut(u32)> = Observers::new();
        let a = observers.insert(Box::new(|_| {}));
        assert!(observers.remove(a));
        let b = observers.insert(Box::new(|_| {}));
        assert_ne!(a, b);
        assert!(!observers.remove(a));
        assert_eq!(observers.len(), 1);
    }

    #[test]
    fn ids_are_unique_across_registries() {
        let mut first: Observers<dyn FnMut(u32)> = Observers::new();
        let mut second: Observers<dyn FnMut(u32)> = Observers::new();
        let a = first.insert(Box::new(|_| {}));
        let b = second.insert(Box::new(|_| {}));
        assert_ne!(a, b);
        assert!(!second.remove(a));
        assert_eq!(second.len(), 1);
    }

    #[test]
    fn retain_drops_rejected_observers() {
        let mut observers: Observers<dyn FnMut(u32) -> bool> = Observers::new();
        observers.insert(Box::new(|n| n < 5));
        observers.insert(Box::new(|n| n < 50));
        observers.retain(|observer| observer(10));
        assert_eq!(observers.len(), 1);
    }
}
