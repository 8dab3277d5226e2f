// ── Generic reactive entity collection ──
//
// Ordered storage with push-based change notification via a `watch`
// version counter. Order matters: the board shows newest posts first and
// views are expected to reflect insertion order.

use tokio::sync::watch;

use crate::model::{Entity, EntityId};

/// An ordered, observable collection for a single entity type.
///
/// Every mutation that changes contents bumps a version counter that
/// subscribers can await. Lookups are linear; collections hold at most a
/// few hundred records.
#[derive(Debug)]
pub struct EntityCollection<T: Entity> {
    items: Vec<T>,
    version: watch::Sender<u64>,
}

impl<T: Entity> Default for EntityCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> EntityCollection<T> {
    pub fn new() -> Self {
        let (version, _) = watch::channel(0u64);
        Self {
            items: Vec::new(),
            version,
        }
    }

    /// Replace the whole contents.
    pub fn set_all(&mut self, items: Vec<T>) {
        self.items = items;
        self.bump_version();
    }

    /// Append without checking for an existing id.
    pub fn push(&mut self, item: T) {
        self.items.push(item);
        self.bump_version();
    }

    /// Insert at the front without checking for an existing id.
    pub fn prepend(&mut self, item: T) {
        self.items.insert(0, item);
        self.bump_version();
    }

    /// Apply a patch to the first entity with `id`. Returns `false` if absent.
    pub fn update(&mut self, id: &EntityId, patch: &T::Patch) -> bool {
        self.update_with(id, |item| item.apply(patch))
    }

    /// Mutate the first entity with `id` in place. Returns `false` if absent.
    pub fn update_with(&mut self, id: &EntityId, f: impl FnOnce(&mut T)) -> bool {
        match self.items.iter_mut().find(|item| item.id() == id) {
            Some(item) => {
                f(item);
                self.bump_version();
                true
            }
            None => false,
        }
    }

    /// Remove every entity with `id`, returning the first one removed.
    pub fn remove(&mut self, id: &EntityId) -> Option<T> {
        let pos = self.items.iter().position(|item| item.id() == id)?;
        let removed = self.items.remove(pos);
        self.items.retain(|item| item.id() != id);
        self.bump_version();
        Some(removed)
    }

    /// Keep only entities matching `keep`. Returns how many were dropped.
    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) -> usize {
        let before = self.items.len();
        self.items.retain(|item| keep(item));
        let dropped = before - self.items.len();
        if dropped > 0 {
            self.bump_version();
        }
        dropped
    }

    /// Reconcile a batch: replace entities whose id is already present,
    /// append the rest in the order given.
    pub fn merge(&mut self, incoming: Vec<T>) {
        if incoming.is_empty() {
            return;
        }
        for item in incoming {
            match self.items.iter_mut().find(|existing| existing.id() == item.id()) {
                Some(existing) => *existing = item,
                None => self.items.push(item),
            }
        }
        self.bump_version();
    }

    pub fn get(&self, id: &EntityId) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn find(&self, mut pred: impl FnMut(&T) -> bool) -> Option<&T> {
        self.items.iter().find(|item| pred(item))
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Clone out every entity matching `pred`.
    pub fn filtered(&self, mut pred: impl FnMut(&T) -> bool) -> Vec<T> {
        self.items.iter().filter(|item| pred(item)).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        if !self.items.is_empty() {
            self.items.clear();
            self.bump_version();
        }
    }

    /// Current version; increases on every content change.
    pub fn version(&self) -> u64 {
        *self.version.borrow()
    }

    /// Subscribe to version changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn bump_version(&self) {
        // `send_modify` updates unconditionally, even with zero receivers.
        self.version.send_modify(|v| *v += 1);
    }
}

impl<'a, T: Entity> IntoIterator for &'a EntityCollection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{Term, TermPatch};

    fn term(id: &str, name: &str) -> Term {
        Term {
            id: id.into(),
            name: name.into(),
        }
    }

    #[test]
    fn update_unknown_id_is_silent_noop() {
        let mut col = EntityCollection::new();
        col.push(term("t1", "Fall"));
        let before = col.version();
        let patch = TermPatch {
            name: Some("Spring".into()),
        };
        assert!(!col.update(&"nope".into(), &patch));
        assert_eq!(col.version(), before);
        assert_eq!(col.get(&"t1".into()).unwrap().name, "Fall");
    }

    #[test]
    fn remove_unknown_id_is_silent_noop() {
        let mut col = EntityCollection::new();
        col.push(term("t1", "Fall"));
        assert!(col.remove(&"nope".into()).is_none());
        assert_eq!(col.len(), 1);
    }

    #[test]
    fn prepend_puts_newest_first() {
        let mut col = EntityCollection::new();
        col.push(term("t1", "a"));
        col.prepend(term("t2", "b"));
        let ids: Vec<_> = col.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["t2", "t1"]);
    }

    #[test]
    fn merge_replaces_known_and_appends_new() {
        let mut col = EntityCollection::new();
        col.set_all(vec![term("t1", "Fall"), term("t2", "Winter")]);
        col.merge(vec![term("t2", "Winter 2025"), term("t3", "Summer")]);
        let names: Vec<_> = col.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["Fall", "Winter 2025", "Summer"]);
    }

    #[test]
    fn push_does_not_deduplicate() {
        let mut col = EntityCollection::new();
        col.push(term("t1", "a"));
        col.push(term("t1", "a"));
        assert_eq!(col.len(), 2);
        col.remove(&"t1".into());
        assert!(col.is_empty());
    }

    #[test]
    fn subscribers_see_version_bumps() {
        let mut col = EntityCollection::new();
        let mut rx = col.subscribe();
        col.push(term("t1", "a"));
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), 1);
        assert_eq!(col.retain(|_| true), 0);
        assert!(!rx.has_changed().unwrap());
    }
}
