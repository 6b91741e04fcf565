//! Deterministic priority queue for admission-style scheduling.
//!
//! Key properties:
//! - Total ordering on `(priority, seq)`; smaller priorities run earlier.
//! - Equal priorities are processed in insertion order.
//! - `promote` moves an item ahead of its equal-priority peers without
//!   crossing into another priority band.
//! - Removal does not perturb the order of remaining items.
//!
//! Vec-backed: queues hold at most a page's worth of media, so determinism
//! matters more than asymptotic performance.

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WorkId(pub u64);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct Key {
    priority: i32,
    // Insertion order; promoted items get negative values so they sort first.
    seq: i64,
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.priority
            .cmp(&other.priority)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug)]
struct Item<T> {
    id: WorkId,
    key: Key,
    payload: T,
}

#[derive(Debug)]
pub struct WorkQueue<T> {
    next_id: u64,
    next_seq: i64,
    next_front_seq: i64,
    items: Vec<Item<T>>,
}

impl<T> Default for WorkQueue<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            next_seq: 0,
            next_front_seq: -1,
            items: Vec::new(),
        }
    }
}

impl<T> WorkQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push(&mut self, priority: i32, payload: T) -> WorkId {
        let id = WorkId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.items.push(Item {
            id,
            key: Key { priority, seq },
            payload,
        });
        id
    }

    /// Removes an item, returning its payload.
    pub fn remove(&mut self, id: WorkId) -> Option<T> {
        let idx = self.items.iter().position(|i| i.id == id)?;
        Some(self.items.remove(idx).payload)
    }

    /// Moves an item ahead of every other item of the same priority.
    ///
    /// Later promotions go ahead of earlier ones. Returns `false` if `id` is
    /// not queued.
    pub fn promote(&mut self, id: WorkId) -> bool {
        let Some(item) = self.items.iter_mut().find(|i| i.id == id) else {
            return false;
        };
        item.key.seq = self.next_front_seq;
        self.next_front_seq -= 1;
        true
    }

    /// Payloads in scheduling order.
    pub fn iter_ordered(&self) -> impl Iterator<Item = (WorkId, i32, &T)> {
        let mut refs: Vec<&Item<T>> = self.items.iter().collect();
        refs.sort_by(|a, b| a.key.cmp(&b.key));
        refs.into_iter().map(|i| (i.id, i.key.priority, &i.payload))
    }

    /// Walks the queue in scheduling order and removes every item `admit`
    /// accepts.
    ///
    /// Rejected items keep their position, so an item skipped because its own
    /// class is saturated does not block cheaper work queued behind it. `admit`
    /// is called at most once per item per pass.
    pub fn drain_admitted<F>(&mut self, mut admit: F) -> Vec<(WorkId, T)>
    where
        F: FnMut(i32, &T) -> bool,
    {
        self.items.sort_by(|a, b| a.key.cmp(&b.key));

        let mut admitted = Vec::new();
        let mut kept = Vec::with_capacity(self.items.len());
        for item in self.items.drain(..) {
            if admit(item.key.priority, &item.payload) {
                admitted.push((item.id, item.payload));
            } else {
                kept.push(item);
            }
        }
        self.items = kept;
        admitted
    }
}

#[cfg(test)]
mod tests {
    use super::WorkQueue;
    use pretty_assertions::assert_eq;

    #[test]
    fn same_priority_is_insertion_order() {
        let mut q = WorkQueue::new();
        q.push(0, "a");
        q.push(0, "b");
        q.push(0, "c");

        let order: Vec<_> = q.iter_ordered().map(|(_, _, v)| *v).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn lower_priority_value_runs_first() {
        let mut q = WorkQueue::new();
        q.push(10, "late");
        q.push(-1, "early");
        let first = q.iter_ordered().next().map(|(_, p, v)| (p, *v));
        assert_eq!(first, Some((-1, "early")));
    }

    #[test]
    fn remove_keeps_remaining_order() {
        let mut q = WorkQueue::new();
        let a = q.push(0, "a");
        q.push(0, "b");
        q.push(0, "c");
        assert_eq!(q.remove(a), Some("a"));
        assert_eq!(q.remove(a), None);

        let order: Vec<_> = q.iter_ordered().map(|(_, _, v)| *v).collect();
        assert_eq!(order, vec!["b", "c"]);
    }

    #[test]
    fn promote_stays_within_priority_band() {
        let mut q = WorkQueue::new();
        q.push(0, "urgent-old");
        q.push(1, "x");
        let y = q.push(1, "y");
        assert!(q.promote(y));

        let order: Vec<_> = q.iter_ordered().map(|(_, _, v)| *v).collect();
        assert_eq!(order, vec!["urgent-old", "y", "x"]);
    }

    #[test]
    fn drain_skips_rejected_without_blocking() {
        let mut q = WorkQueue::new();
        q.push(0, ("a", 'x'));
        q.push(0, ("b", 'x'));
        q.push(1, ("c", 'y'));

        // Class 'x' admits one item, class 'y' admits one item.
        let mut x_free = 1;
        let mut y_free = 1;
        let admitted = q.drain_admitted(|_, (_, class)| {
            let slot = if *class == 'x' { &mut x_free } else { &mut y_free };
            if *slot == 0 {
                return false;
            }
            *slot -= 1;
            true
        });

        let names: Vec<_> = admitted.iter().map(|(_, (n, _))| *n).collect();
        assert_eq!(names, vec!["a", "c"]);
        assert_eq!(q.len(), 1);
    }
}
