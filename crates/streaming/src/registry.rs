use std::collections::BTreeMap;

use foundation::ids::ResourceId;

use crate::descriptor::ResourceDescriptor;
use crate::residency::LoadState;
use crate::waiters::{Preload, Waiters};

#[derive(Debug)]
struct Entry {
    descriptor: ResourceDescriptor,
    waiters: Waiters,
}

/// In-memory map from resource id to descriptor.
///
/// Keyed by a `BTreeMap` so listing and stats are stably ordered. Ids are
/// never removed: the registry lives exactly as long as the page.
#[derive(Debug, Default)]
pub struct Registry {
    entries: BTreeMap<ResourceId, Entry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Inserts a descriptor unless its id is already present.
    ///
    /// Returns `false` (leaving the existing entry untouched) on a duplicate.
    pub fn insert(&mut self, descriptor: ResourceDescriptor) -> bool {
        if self.entries.contains_key(&descriptor.id) {
            return false;
        }
        self.entries.insert(
            descriptor.id.clone(),
            Entry {
                descriptor,
                waiters: Waiters::new(),
            },
        );
        true
    }

    pub fn get(&self, id: &str) -> Option<&ResourceDescriptor> {
        self.entries.get(id).map(|e| &e.descriptor)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut ResourceDescriptor> {
        self.entries.get_mut(id).map(|e| &mut e.descriptor)
    }

    pub fn state(&self, id: &str) -> Option<LoadState> {
        self.get(id).map(|d| d.state)
    }

    /// Attaches a completion waiter; `None` for unknown ids.
    pub fn subscribe(&mut self, id: &str) -> Option<Preload> {
        self.entries.get_mut(id).map(|e| e.waiters.subscribe())
    }

    /// Resolves every waiter of `id`. Returns how many were resolved.
    pub fn notify(&mut self, id: &str) -> usize {
        self.entries
            .get_mut(id)
            .map(|e| e.waiters.notify_all())
            .unwrap_or(0)
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &ResourceDescriptor> {
        self.entries.values().map(|e| &e.descriptor)
    }

    pub fn count_in_state(&self, state: LoadState) -> usize {
        self.descriptors().filter(|d| d.state == state).count()
    }
}

#[cfg(test)]
mod tests {
    use super::Registry;
    use crate::descriptor::{ResourceDescriptor, ResourceKind};
    use crate::residency::LoadState;
    use crate::tier::Tier;
    use futures::FutureExt;

    fn desc(id: &str, source: &str, tier: Tier) -> ResourceDescriptor {
        ResourceDescriptor::new(id.into(), source, ResourceKind::Image, tier)
    }

    #[test]
    fn duplicate_insert_keeps_first() {
        let mut r = Registry::new();
        assert!(r.insert(desc("a", "/first.jpg", Tier::High)));
        assert!(!r.insert(desc("a", "/second.jpg", Tier::Low)));

        let d = r.get("a").unwrap();
        assert_eq!(d.source, "/first.jpg");
        assert_eq!(d.tier, Tier::High);
        assert_eq!(r.len(), 1);
    }

    #[test]
    fn unknown_ids_are_absent() {
        let mut r = Registry::new();
        assert!(r.get("missing").is_none());
        assert!(r.subscribe("missing").is_none());
        assert_eq!(r.notify("missing"), 0);
    }

    #[test]
    fn notify_resolves_subscribers() {
        let mut r = Registry::new();
        r.insert(desc("a", "/a.jpg", Tier::Low));
        let p = r.subscribe("a").unwrap();
        assert_eq!(r.notify("a"), 1);
        assert_eq!(p.now_or_never(), Some(()));
    }

    #[test]
    fn counts_by_state() {
        let mut r = Registry::new();
        r.insert(desc("a", "/a.jpg", Tier::Low));
        r.insert(desc("b", "/b.jpg", Tier::Low));
        r.get_mut("b").unwrap().state = LoadState::Queued;
        assert_eq!(r.count_in_state(LoadState::Parked), 1);
        assert_eq!(r.count_in_state(LoadState::Queued), 1);
    }
}
