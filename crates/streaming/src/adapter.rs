use std::rc::Weak;

use foundation::ids::ResourceId;
use tracing::warn;

use crate::descriptor::LoadJob;
use crate::driver::Shared;
use crate::residency::Settlement;

/// Performs the native asynchronous load for an admitted resource.
///
/// Implementations must eventually call [`Completion::settle`] exactly once
/// per job, for success and failure alike, and must never panic on a failed
/// load. `start` may settle synchronously (e.g. a cached image).
pub trait LoaderAdapter {
    fn start(&self, job: LoadJob, done: Completion);
}

/// Runs a task later on the same thread (a microtask in the browser).
///
/// Used to batch a frame's worth of registrations before scheduling runs.
pub trait Deferrer {
    fn defer(&self, task: Box<dyn FnOnce()>);
}

/// One-shot handle an adapter uses to report that a load ended.
///
/// Consumed by `settle`, so a job cannot be settled twice through it. Holds
/// only a weak reference: settling after the context is gone is a no-op.
#[must_use = "a load that is never settled holds its tier slot forever"]
pub struct Completion {
    ctx: Weak<Shared>,
    id: ResourceId,
}

impl Completion {
    pub(crate) fn new(ctx: Weak<Shared>, id: ResourceId) -> Self {
        Self { ctx, id }
    }

    pub fn id(&self) -> &ResourceId {
        &self.id
    }

    pub fn settle(self, settlement: Settlement) {
        let Some(shared) = self.ctx.upgrade() else {
            return;
        };
        if let Err(err) = shared.settle(self.id.as_str(), settlement) {
            warn!(id = %self.id, %err, "ignoring settlement");
        }
    }

    pub fn loaded(self) {
        self.settle(Settlement::Loaded);
    }

    pub fn failed(self, reason: impl Into<String>) {
        self.settle(Settlement::failed(reason));
    }
}

impl std::fmt::Debug for Completion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Completion").field("id", &self.id).finish()
    }
}
