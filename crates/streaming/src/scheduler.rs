use foundation::ids::ResourceId;
use runtime::budget::SlotBudget;
use runtime::metrics::{Metrics, MetricsSnapshot};
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::config::LoaderConfig;
use crate::descriptor::{Activation, LoadJob, ResourceDescriptor, ResourceKind};
use crate::error::StreamingError;
use crate::queue::PendingQueue;
use crate::registry::Registry;
use crate::residency::{LoadState, Settlement};
use crate::tier::{Tier, TierTable};
use crate::waiters::Preload;

/// Result of a `register` call.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Registration {
    New,
    /// The id was already registered; nothing changed.
    Duplicate,
}

/// Serializable view of scheduler bookkeeping, for debug overlays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchedulerStats {
    pub registered: usize,
    pub parked: usize,
    pub pending: usize,
    pub loaded: usize,
    pub in_flight: TierTable<u32>,
    pub capacity: TierTable<u32>,
    pub metrics: MetricsSnapshot,
}

/// Admission-controlled media scheduler.
///
/// Owns the registry, the pending queue and one slot budget per tier. All
/// bookkeeping is synchronous; admitted work is collected as [`LoadJob`]s
/// for the caller to hand to loader adapters (see `take_jobs`), and adapters
/// report back through [`ResourcePriority::settle`].
///
/// Invariants:
/// - `in_flight(tier) <= capacity(tier)` at all times (slot budgets refuse
///   to over-acquire).
/// - A descriptor is never `Loading` without holding a slot of its tier.
/// - Terminal states never regress.
#[derive(Debug)]
pub struct ResourcePriority {
    config: LoaderConfig,
    registry: Registry,
    pending: PendingQueue,
    slots: TierTable<SlotBudget>,
    outbox: Vec<LoadJob>,
    metrics: Metrics,
}

impl Default for ResourcePriority {
    fn default() -> Self {
        Self::new(LoaderConfig::default())
    }
}

impl ResourcePriority {
    /// A zero capacity (only possible for configs built in code, since
    /// `LoaderConfig::from_json` rejects it) is raised to one so that tier
    /// can still make progress.
    pub fn new(config: LoaderConfig) -> Self {
        let slots = config.capacities.map(|tier, cap| {
            if *cap == 0 {
                warn!(%tier, "zero capacity raised to 1");
            }
            SlotBudget::new((*cap).max(1))
        });
        Self {
            config,
            registry: Registry::new(),
            pending: PendingQueue::new(),
            slots,
            outbox: Vec::new(),
            metrics: Metrics::new(),
        }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Registers a resource that joins admission right away.
    ///
    /// Critical resources take a slot immediately when one is free, so
    /// `is_loading` is already true when this returns. Everything else is
    /// queued until the next [`pump`](Self::pump).
    pub fn register(
        &mut self,
        id: impl Into<ResourceId>,
        source: impl Into<String>,
        kind: ResourceKind,
        tier: Tier,
    ) -> Registration {
        self.register_with(id, source, kind, tier, Activation::Eager)
    }

    /// Registers a resource that stays parked until [`preload`](Self::preload).
    pub fn register_on_demand(
        &mut self,
        id: impl Into<ResourceId>,
        source: impl Into<String>,
        kind: ResourceKind,
        tier: Tier,
    ) -> Registration {
        self.register_with(id, source, kind, tier, Activation::OnDemand)
    }

    pub fn register_with(
        &mut self,
        id: impl Into<ResourceId>,
        source: impl Into<String>,
        kind: ResourceKind,
        tier: Tier,
        activation: Activation,
    ) -> Registration {
        let id = id.into();
        if !self
            .registry
            .insert(ResourceDescriptor::new(id.clone(), source, kind, tier))
        {
            trace!(%id, "duplicate registration ignored");
            return Registration::Duplicate;
        }
        self.metrics.inc_counter("resources.registered", 1);

        match (activation, tier) {
            (Activation::OnDemand, _) => {
                debug!(%id, %tier, "registered on demand");
            }
            (Activation::Eager, Tier::Critical) => {
                if !self.try_start(id.as_str()) {
                    self.enqueue(id.as_str());
                }
            }
            (Activation::Eager, _) => self.enqueue(id.as_str()),
        }
        Registration::New
    }

    pub fn is_loaded(&self, id: &str) -> bool {
        self.registry.get(id).is_some_and(|d| d.loaded())
    }

    pub fn is_loading(&self, id: &str) -> bool {
        self.registry.get(id).is_some_and(|d| d.loading())
    }

    pub fn state(&self, id: &str) -> Option<LoadState> {
        self.registry.state(id)
    }

    pub fn outcome(&self, id: &str) -> Option<&Settlement> {
        self.registry.get(id).and_then(|d| d.outcome.as_ref())
    }

    pub fn descriptor(&self, id: &str) -> Option<&ResourceDescriptor> {
        self.registry.get(id)
    }

    pub fn in_flight(&self, tier: Tier) -> u32 {
        self.slots.get(tier).in_use()
    }

    pub fn capacity(&self, tier: Tier) -> u32 {
        self.slots.get(tier).capacity()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Pending ids in the order they would be admitted.
    pub fn pending_ids(&self) -> Vec<ResourceId> {
        self.pending.ordered_ids()
    }

    /// Requests a specific resource now and returns a future that resolves
    /// once it has settled.
    ///
    /// - unknown or already settled: resolves immediately;
    /// - loading: resolves when that load settles;
    /// - parked or queued: starts now if its tier has a free slot, otherwise
    ///   moves to the head of its tier so it is admitted next.
    pub fn preload(&mut self, id: &str) -> Preload {
        let Some(state) = self.registry.state(id) else {
            trace!(id, "preload of unknown resource");
            return Preload::ready();
        };
        if state.is_terminal() {
            return Preload::ready();
        }

        match state {
            LoadState::Loaded | LoadState::Failed | LoadState::Loading => {}
            LoadState::Queued => {
                let tier = self.tier_of(id);
                if self.slots.get(tier).has_free() {
                    self.pending.remove(id);
                    self.sync_pending_gauge();
                    self.try_start(id);
                } else {
                    self.pending.promote(id);
                    debug!(id, %tier, "preload promoted within full tier");
                }
            }
            LoadState::Parked => {
                if !self.try_start(id) {
                    self.enqueue(id);
                    self.pending.promote(id);
                }
            }
        }

        self.registry.subscribe(id).unwrap_or_else(Preload::ready)
    }

    /// Runs one admission pass over the pending queue.
    ///
    /// Returns the number of resources admitted. Their jobs are appended to
    /// the outbox.
    pub fn pump(&mut self) -> usize {
        if self.pending.is_empty() {
            return 0;
        }

        let slots = &mut self.slots;
        let admitted = self
            .pending
            .drain_admitted(|tier, _| slots.get_mut(tier).try_acquire());

        for id in &admitted {
            self.begin_loading(id.as_str());
        }
        self.sync_pending_gauge();
        if !admitted.is_empty() {
            debug!(
                admitted = admitted.len(),
                pending = self.pending.len(),
                "admission pass"
            );
        }
        admitted.len()
    }

    /// Takes the jobs admitted since the last call.
    pub fn take_jobs(&mut self) -> Vec<LoadJob> {
        std::mem::take(&mut self.outbox)
    }

    pub fn has_jobs(&self) -> bool {
        !self.outbox.is_empty()
    }

    /// Records the end of a load attempt, frees its slot, resolves waiters
    /// and runs an admission pass.
    pub fn settle(&mut self, id: &str, settlement: Settlement) -> Result<(), StreamingError> {
        let policy = self.config.failure_policy;
        let desc = self
            .registry
            .get_mut(id)
            .ok_or_else(|| StreamingError::UnknownResource(id.into()))?;
        if desc.state != LoadState::Loading {
            return Err(StreamingError::NotInFlight {
                id: desc.id.clone(),
                state: desc.state,
            });
        }

        let tier = desc.tier;
        if let Settlement::Failed { reason } = &settlement {
            warn!(id, source = %desc.source, %reason, "media load failed");
            self.metrics.inc_counter("loads.failed", 1);
        }
        desc.state = policy.terminal_state(&settlement);
        desc.outcome = Some(settlement);

        self.slots.get_mut(tier).release();
        self.metrics.inc_counter("loads.settled", 1);
        let woken = self.registry.notify(id);
        trace!(id, %tier, woken, "settled");

        self.pump();
        Ok(())
    }

    pub fn stats(&self) -> SchedulerStats {
        SchedulerStats {
            registered: self.registry.len(),
            parked: self.registry.count_in_state(LoadState::Parked),
            pending: self.pending.len(),
            loaded: self.registry.count_in_state(LoadState::Loaded),
            in_flight: self.slots.map(|_, s| s.in_use()),
            capacity: self.slots.map(|_, s| s.capacity()),
            metrics: self.metrics.snapshot(),
        }
    }

    fn tier_of(&self, id: &str) -> Tier {
        self.registry.get(id).map(|d| d.tier).unwrap_or(Tier::Low)
    }

    fn enqueue(&mut self, id: &str) {
        let Some(desc) = self.registry.get_mut(id) else {
            return;
        };
        desc.state = LoadState::Queued;
        self.pending.push(desc.tier, desc.id.clone());
        self.sync_pending_gauge();
    }

    fn sync_pending_gauge(&mut self) {
        self.metrics
            .set_gauge("queue.pending", self.pending.len() as i64);
    }

    /// Acquires a slot and starts loading `id` if its tier has room.
    fn try_start(&mut self, id: &str) -> bool {
        let tier = self.tier_of(id);
        if !self.slots.get_mut(tier).try_acquire() {
            return false;
        }
        self.begin_loading(id);
        true
    }

    /// Marks an already slotted resource as loading and emits its job.
    fn begin_loading(&mut self, id: &str) {
        let Some(desc) = self.registry.get_mut(id) else {
            return;
        };
        desc.state = LoadState::Loading;
        let job = LoadJob::for_descriptor(desc);
        debug!(id, tier = %job.tier, kind = ?job.kind, "load started");
        self.metrics.inc_counter("loads.started", 1);
        self.outbox.push(job);
    }
}
