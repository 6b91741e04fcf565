/// Bounded pool of concurrent "in-flight" slots.
///
/// Unlike a per-frame budget this is not replenished on a clock: a slot is
/// held from `try_acquire` until the matching `release`, so it models work
/// whose completion arrives asynchronously (network fetches, decodes).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SlotBudget {
    capacity: u32,
    in_use: u32,
}

impl SlotBudget {
    pub fn new(capacity: u32) -> Self {
        Self {
            capacity,
            in_use: 0,
        }
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn in_use(&self) -> u32 {
        self.in_use
    }

    pub fn has_free(&self) -> bool {
        self.in_use < self.capacity
    }

    /// Takes one slot if any is free.
    ///
    /// Returns `true` if a slot was taken.
    pub fn try_acquire(&mut self) -> bool {
        if !self.has_free() {
            return false;
        }
        self.in_use += 1;
        true
    }

    /// Returns one slot to the pool.
    ///
    /// Returns `false` (and changes nothing) if no slot was held.
    pub fn release(&mut self) -> bool {
        if self.in_use == 0 {
            return false;
        }
        self.in_use -= 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::SlotBudget;

    #[test]
    fn acquire_stops_at_capacity() {
        let mut b = SlotBudget::new(2);
        assert!(b.try_acquire());
        assert!(b.try_acquire());
        assert!(!b.try_acquire());
        assert_eq!(b.in_use(), 2);
        assert!(!b.has_free());
    }

    #[test]
    fn release_frees_a_slot() {
        let mut b = SlotBudget::new(1);
        assert!(b.try_acquire());
        assert!(b.release());
        assert!(b.has_free());
        assert!(!b.release());
        assert_eq!(b.in_use(), 0);
    }

    #[test]
    fn zero_capacity_never_admits() {
        let mut b = SlotBudget::new(0);
        assert!(!b.try_acquire());
    }
}
