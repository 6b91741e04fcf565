use std::collections::BTreeMap;

use foundation::ids::ResourceId;
use runtime::work_queue::{WorkId, WorkQueue};

use crate::tier::Tier;

/// Pending queue of resources awaiting admission.
///
/// A thin wrapper over `runtime::WorkQueue` that maps tiers onto queue
/// priorities and keeps an id index so lookups do not scan the queue.
#[derive(Debug, Default)]
pub struct PendingQueue {
    inner: WorkQueue<ResourceId>,
    index: BTreeMap<ResourceId, WorkId>,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Enqueues `id`; a no-op if it is already queued.
    pub fn push(&mut self, tier: Tier, id: ResourceId) {
        if self.index.contains_key(&id) {
            return;
        }
        let work_id = self.inner.push(tier.queue_priority(), id.clone());
        self.index.insert(id, work_id);
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let Some(work_id) = self.index.remove(id) else {
            return false;
        };
        self.inner.remove(work_id).is_some()
    }

    /// Moves `id` to the head of its tier.
    pub fn promote(&mut self, id: &str) -> bool {
        match self.index.get(id) {
            Some(work_id) => self.inner.promote(*work_id),
            None => false,
        }
    }

    /// Ids in admission order: tier weight descending, then enqueue order.
    pub fn ordered_ids(&self) -> Vec<ResourceId> {
        self.inner
            .iter_ordered()
            .map(|(_, _, id)| id.clone())
            .collect()
    }

    /// Removes and returns, in admission order, every id `admit` accepts.
    pub fn drain_admitted<F>(&mut self, mut admit: F) -> Vec<ResourceId>
    where
        F: FnMut(Tier, &ResourceId) -> bool,
    {
        let admitted = self.inner.drain_admitted(|priority, id| {
            match Tier::from_queue_priority(priority) {
                Some(tier) => admit(tier, id),
                None => false,
            }
        });
        admitted
            .into_iter()
            .map(|(_, id)| {
                self.index.remove(&id);
                id
            })
            .collect()
    }
}
