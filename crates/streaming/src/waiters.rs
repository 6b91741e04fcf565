use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::channel::oneshot;

/// Resolves once a requested resource has settled.
///
/// Never fails: if the scheduler is dropped before the load settles the
/// future resolves as well, so UI code awaiting it never hangs on teardown.
#[derive(Debug)]
#[must_use = "a Preload does nothing unless awaited or polled"]
pub struct Preload {
    rx: Option<oneshot::Receiver<()>>,
}

impl Preload {
    /// Already-resolved preload (loaded or unknown resource).
    pub fn ready() -> Self {
        Self { rx: None }
    }

    pub fn is_ready(&self) -> bool {
        self.rx.is_none()
    }
}

impl Future for Preload {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let Some(rx) = self.rx.as_mut() else {
            return Poll::Ready(());
        };
        match Pin::new(rx).poll(cx) {
            // Canceled means the sender side went away; treat as settled.
            Poll::Ready(_) => {
                self.rx = None;
                Poll::Ready(())
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Completion waiters attached to one resource.
///
/// Each waiter is resolved exactly once, when `notify_all` runs.
#[derive(Debug, Default)]
pub struct Waiters {
    senders: Vec<oneshot::Sender<()>>,
}

impl Waiters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.senders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.senders.is_empty()
    }

    pub fn subscribe(&mut self) -> Preload {
        let (tx, rx) = oneshot::channel();
        self.senders.push(tx);
        Preload { rx: Some(rx) }
    }

    /// Resolves and drops every waiter. Returns how many were resolved.
    pub fn notify_all(&mut self) -> usize {
        let mut n = 0;
        for tx in self.senders.drain(..) {
            // A dropped receiver just means nobody is awaiting any more.
            if tx.send(()).is_ok() {
                n += 1;
            }
        }
        n
    }
}

#[cfg(test)]
mod tests {
    use super::{Preload, Waiters};
    use futures::FutureExt;

    #[test]
    fn ready_preload_resolves_immediately() {
        assert_eq!(Preload::ready().now_or_never(), Some(()));
    }

    #[test]
    fn subscribed_preload_waits_for_notify() {
        let mut waiters = Waiters::new();
        let mut a = waiters.subscribe();
        let b = waiters.subscribe();
        assert!((&mut a).now_or_never().is_none());

        assert_eq!(waiters.notify_all(), 2);
        assert!(waiters.is_empty());
        assert_eq!(a.now_or_never(), Some(()));
        assert_eq!(b.now_or_never(), Some(()));
    }

    #[test]
    fn dropped_waiters_resolve_preload() {
        let mut waiters = Waiters::new();
        let p = waiters.subscribe();
        drop(waiters);
        assert_eq!(p.now_or_never(), Some(()));
    }

    #[test]
    fn notify_skips_abandoned_receivers() {
        let mut waiters = Waiters::new();
        drop(waiters.subscribe());
        let _kept = waiters.subscribe();
        assert_eq!(waiters.notify_all(), 1);
    }
}
