//! Change notification handle

use tokio::sync::watch;
use tracing::debug;

use super::TimersSnapshot;

/// Receives a fresh snapshot after every controller mutation.
///
/// Publications made while the holder is not waiting coalesce: `changed`
/// always yields the latest state, never a backlog.
#[derive(Debug)]
pub struct Subscription {
    rx: watch::Receiver<TimersSnapshot>,
}

impl Subscription {
    pub(crate) fn new(rx: watch::Receiver<TimersSnapshot>) -> Self {
        Self { rx }
    }

    /// Latest published snapshot, without waiting.
    ///
    /// Marks it as seen, so the next `changed` waits for a newer one.
    pub fn current(&mut self) -> TimersSnapshot {
        self.rx.borrow_and_update().clone()
    }

    /// Wait for the next publication. Returns `None` once the controller is gone.
    pub async fn changed(&mut self) -> Option<TimersSnapshot> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Stop receiving notifications
    pub fn unsubscribe(self) {
        debug!("Subscriber detached");
        drop(self.rx);
    }
}
