//! Periodic tick source

use std::{sync::Weak, time::Duration};
use tokio::{
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::debug;

/// Receiver of ticks from a [`TickSource`]
pub trait TickSink: Send + Sync + 'static {
    /// Handle one tick of the given activation cycle.
    ///
    /// Returning `false` marks the generation as stale and stops the source.
    fn on_tick(&self, generation: u64) -> bool;
}

/// A repeating timer task bound to one activation cycle.
///
/// The first tick fires one full period after start. Dropping the source
/// cancels it.
#[derive(Debug)]
pub struct TickSource {
    generation: u64,
    handle: JoinHandle<()>,
}

impl TickSource {
    /// Spawn the tick loop on the current Tokio runtime
    pub fn start<S: TickSink>(period: Duration, generation: u64, sink: Weak<S>) -> Self {
        debug!("Starting tick source generation={} period={:?}", generation, period);
        let handle = tokio::spawn(tick_loop(period, generation, sink));
        Self { generation, handle }
    }

    /// Abort the tick loop. No tick is delivered after this returns.
    pub fn cancel(&self) {
        debug!("Cancelling tick source generation={}", self.generation);
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for TickSource {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn tick_loop<S: TickSink>(period: Duration, generation: u64, sink: Weak<S>) {
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        let Some(sink) = sink.upgrade() else {
            debug!("Tick sink dropped, stopping generation={}", generation);
            break;
        };
        if !sink.on_tick(generation) {
            debug!("Generation {} is stale, stopping tick source", generation);
            break;
        }
    }
}
