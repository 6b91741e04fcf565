use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use foundation::ids::ResourceId;
use tracing::trace;

use crate::adapter::{Completion, Deferrer, LoaderAdapter};
use crate::config::LoaderConfig;
use crate::descriptor::{Activation, ResourceKind};
use crate::error::StreamingError;
use crate::residency::{LoadState, Settlement};
use crate::scheduler::{Registration, ResourcePriority, SchedulerStats};
use crate::tier::Tier;
use crate::waiters::Preload;

pub(crate) struct Shared {
    scheduler: RefCell<ResourcePriority>,
    adapter: Rc<dyn LoaderAdapter>,
    deferrer: Rc<dyn Deferrer>,
    flush_scheduled: Cell<bool>,
    this: Weak<Shared>,
}

impl Shared {
    pub(crate) fn settle(&self, id: &str, settlement: Settlement) -> Result<(), StreamingError> {
        let has_jobs = {
            let mut scheduler = self.scheduler.borrow_mut();
            scheduler.settle(id, settlement)?;
            scheduler.has_jobs()
        };
        if has_jobs {
            self.schedule_flush();
        }
        Ok(())
    }

    fn schedule_flush(&self) {
        if self.flush_scheduled.replace(true) {
            return;
        }
        let this = self.this.clone();
        self.deferrer.defer(Box::new(move || {
            if let Some(shared) = this.upgrade() {
                shared.flush();
            }
        }));
    }

    /// Runs an admission pass and hands every admitted job to the adapter.
    ///
    /// The scheduler borrow is released before any adapter call so adapters
    /// may settle synchronously.
    fn flush(&self) {
        self.flush_scheduled.set(false);
        let jobs = {
            let mut scheduler = self.scheduler.borrow_mut();
            scheduler.pump();
            scheduler.take_jobs()
        };
        if !jobs.is_empty() {
            trace!(jobs = jobs.len(), "dispatching loads");
        }
        for job in jobs {
            let done = Completion::new(self.this.clone(), job.id.clone());
            self.adapter.start(job, done);
        }
    }
}

/// Page-lifetime handle to the resource-priority scheduler.
///
/// Constructed once by the root of the page and cloned into every consumer.
/// Registration and preload only do bookkeeping; admission and adapter
/// dispatch run in a deferred flush so a burst of registrations in one turn
/// is scheduled together.
#[derive(Clone)]
pub struct PriorityContext {
    shared: Rc<Shared>,
}

impl PriorityContext {
    pub fn new(
        config: LoaderConfig,
        adapter: Rc<dyn LoaderAdapter>,
        deferrer: Rc<dyn Deferrer>,
    ) -> Self {
        let shared = Rc::new_cyclic(|this| Shared {
            scheduler: RefCell::new(ResourcePriority::new(config)),
            adapter,
            deferrer,
            flush_scheduled: Cell::new(false),
            this: this.clone(),
        });
        Self { shared }
    }

    pub fn register(
        &self,
        id: impl Into<ResourceId>,
        source: impl Into<String>,
        kind: ResourceKind,
        tier: Tier,
    ) -> Registration {
        self.register_with(id, source, kind, tier, Activation::Eager)
    }

    pub fn register_on_demand(
        &self,
        id: impl Into<ResourceId>,
        source: impl Into<String>,
        kind: ResourceKind,
        tier: Tier,
    ) -> Registration {
        self.register_with(id, source, kind, tier, Activation::OnDemand)
    }

    pub fn register_with(
        &self,
        id: impl Into<ResourceId>,
        source: impl Into<String>,
        kind: ResourceKind,
        tier: Tier,
        activation: Activation,
    ) -> Registration {
        let registration = self
            .shared
            .scheduler
            .borrow_mut()
            .register_with(id, source, kind, tier, activation);
        if registration == Registration::New && activation == Activation::Eager {
            self.shared.schedule_flush();
        }
        registration
    }

    pub fn preload(&self, id: &str) -> Preload {
        let (preload, has_jobs) = {
            let mut scheduler = self.shared.scheduler.borrow_mut();
            let preload = scheduler.preload(id);
            (preload, scheduler.has_jobs())
        };
        if has_jobs {
            self.shared.schedule_flush();
        }
        preload
    }

    pub fn is_loaded(&self, id: &str) -> bool {
        self.shared.scheduler.borrow().is_loaded(id)
    }

    pub fn is_loading(&self, id: &str) -> bool {
        self.shared.scheduler.borrow().is_loading(id)
    }

    pub fn state(&self, id: &str) -> Option<LoadState> {
        self.shared.scheduler.borrow().state(id)
    }

    pub fn stats(&self) -> SchedulerStats {
        self.shared.scheduler.borrow().stats()
    }

    pub fn config(&self) -> LoaderConfig {
        self.shared.scheduler.borrow().config().clone()
    }

    /// Read access to the scheduler for queries not mirrored here.
    pub fn with_scheduler<R>(&self, f: impl FnOnce(&ResourcePriority) -> R) -> R {
        f(&self.shared.scheduler.borrow())
    }

    /// Runs a pending flush now instead of waiting for the deferrer.
    pub fn flush(&self) {
        self.shared.flush();
    }
}

impl std::fmt::Debug for PriorityContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PriorityContext")
            .field("scheduler", &self.shared.scheduler)
            .field("flush_scheduled", &self.shared.flush_scheduled.get())
            .finish_non_exhaustive()
    }
}
