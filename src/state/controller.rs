//! Timer controller: owns the timer and child state and the single tick source

use std::{
    sync::{Arc, Mutex, MutexGuard, Weak},
    time::Duration,
};
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::{Action, ChildState, Phase, Subscription, TimerState, TimersSnapshot};
use crate::tasks::ticker::{TickSink, TickSource};

/// Mutable part of the controller, guarded by a single lock
#[derive(Debug)]
struct Inner {
    timer: TimerState,
    /// Activation cycle counter; ticks from any other cycle are discarded
    generation: u64,
    ticker: Option<TickSource>,
    torn_down: bool,
    last_action: Option<(Action, DateTime<Utc>)>,
}

impl Inner {
    fn record(&mut self, action: Action) {
        self.last_action = Some((action, Utc::now()));
    }

    fn cancel_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.cancel();
        }
    }
}

/// Owner of the timer feature.
///
/// All mutation happens under one lock, so toggles, ticks and teardown are
/// applied strictly one after another. Every mutation republishes a
/// [`TimersSnapshot`] to subscribers while the lock is still held.
///
/// Starting the timer spawns a [`TickSource`], so `toggle` and `send` must be
/// called from within a Tokio runtime.
#[derive(Debug)]
pub struct TimerController {
    inner: Mutex<Inner>,
    child: ChildState,
    tick_interval: Duration,
    updates_tx: watch::Sender<TimersSnapshot>,
    self_ref: Weak<TimerController>,
}

impl TimerController {
    /// Create an idle controller at zero seconds
    pub fn new(tick_interval: Duration, child: ChildState) -> Arc<Self> {
        let initial = TimersSnapshot {
            timer: TimerState::new(),
            child: child.clone(),
            torn_down: false,
        };
        let (updates_tx, _) = watch::channel(initial);

        Arc::new_cyclic(|self_ref| Self {
            inner: Mutex::new(Inner {
                timer: TimerState::new(),
                generation: 0,
                ticker: None,
                torn_down: false,
                last_action: None,
            }),
            child,
            tick_interval,
            updates_tx,
            self_ref: self_ref.clone(),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // The guarded data is plain counters; a panic elsewhere cannot leave it half-written.
        self.inner.lock().unwrap_or_else(|poisoned| {
            warn!("Timer state lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn snapshot_of(&self, inner: &Inner) -> TimersSnapshot {
        TimersSnapshot {
            timer: inner.timer,
            child: self.child.clone(),
            torn_down: inner.torn_down,
        }
    }

    fn publish(&self, inner: &Inner) {
        self.updates_tx.send_replace(self.snapshot_of(inner));
    }

    /// Flip the timer on or off and return the new timer state.
    ///
    /// Turning on replaces any previous tick source; turning off cancels it.
    /// Returns `None` once the controller has been torn down.
    pub fn toggle(&self) -> Option<TimerState> {
        let mut inner = self.lock();
        self.apply_toggle(&mut inner)
    }

    /// Like [`toggle`](Self::toggle), but returns the full snapshot taken
    /// under the same lock as the toggle itself.
    pub fn toggle_snapshot(&self) -> Option<TimersSnapshot> {
        let mut inner = self.lock();
        self.apply_toggle(&mut inner)?;
        Some(self.snapshot_of(&inner))
    }

    fn apply_toggle(&self, inner: &mut Inner) -> Option<TimerState> {
        if inner.torn_down {
            warn!("Toggle ignored: timer has been torn down");
            return None;
        }

        inner.record(Action::ToggleTimer);
        let active = inner.timer.toggle();
        inner.cancel_ticker();
        inner.generation += 1;

        if active {
            info!("Timer started at {}s", inner.timer.seconds_elapsed);
            inner.ticker = Some(TickSource::start(
                self.tick_interval,
                inner.generation,
                self.self_ref.clone(),
            ));
        } else {
            info!("Timer stopped at {}s", inner.timer.seconds_elapsed);
        }

        self.publish(inner);
        Some(inner.timer)
    }

    /// Count one elapsed second if the timer is running
    pub fn tick(&self) -> bool {
        let mut inner = self.lock();
        self.apply_tick(&mut inner)
    }

    fn apply_tick(&self, inner: &mut Inner) -> bool {
        if inner.torn_down || !inner.timer.record_tick() {
            debug!("Tick ignored, timer is not running");
            return false;
        }

        inner.record(Action::TimerTicked);
        debug!("Timer ticked: {}s elapsed", inner.timer.seconds_elapsed);
        self.publish(inner);
        true
    }

    /// Cancel any outstanding tick source and stop the timer for good
    pub fn on_teardown(&self) {
        let mut inner = self.lock();
        if inner.torn_down {
            debug!("Teardown already applied");
            return;
        }

        inner.cancel_ticker();
        inner.generation += 1;
        inner.timer.deactivate();
        inner.torn_down = true;
        inner.record(Action::Teardown);
        info!("Timer torn down at {}s", inner.timer.seconds_elapsed);

        self.publish(&inner);
    }

    /// Apply an action and return the resulting snapshot
    pub fn send(&self, action: Action) -> TimersSnapshot {
        match action {
            Action::ToggleTimer => {
                self.toggle();
            }
            Action::TimerTicked => {
                self.tick();
            }
            Action::Teardown => self.on_teardown(),
        }
        self.snapshot()
    }

    pub fn snapshot(&self) -> TimersSnapshot {
        let inner = self.lock();
        self.snapshot_of(&inner)
    }

    pub fn timer_state(&self) -> TimerState {
        self.lock().timer
    }

    pub fn phase(&self) -> Phase {
        self.snapshot().phase()
    }

    /// Static child feature data
    pub fn child(&self) -> &ChildState {
        &self.child
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Whether a tick source is currently outstanding
    pub fn has_tick_source(&self) -> bool {
        self.lock()
            .ticker
            .as_ref()
            .map_or(false, |ticker| !ticker.is_finished())
    }

    /// Most recent action applied and when
    pub fn last_action(&self) -> Option<(Action, DateTime<Utc>)> {
        self.lock().last_action
    }

    /// Register for change notifications
    pub fn subscribe(&self) -> Subscription {
        debug!("Subscriber attached");
        Subscription::new(self.updates_tx.subscribe())
    }

    pub fn subscriber_count(&self) -> usize {
        self.updates_tx.receiver_count()
    }
}

impl TickSink for TimerController {
    fn on_tick(&self, generation: u64) -> bool {
        let mut inner = self.lock();
        if inner.generation != generation {
            return false;
        }
        self.apply_tick(&mut inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    fn controller() -> Arc<TimerController> {
        TimerController::new(Duration::from_secs(1), ChildState::default())
    }

    fn state(is_active: bool, seconds_elapsed: u64) -> TimerState {
        TimerState { is_active, seconds_elapsed }
    }

    #[tokio::test]
    async fn toggle_parity() {
        let controller = controller();
        for n in 1..=8u32 {
            controller.toggle();
            assert_eq!(controller.timer_state().is_active, n % 2 == 1);
        }
        assert!(!controller.has_tick_source());
    }

    #[tokio::test]
    async fn manual_tick_counts_only_while_running() {
        let controller = controller();
        assert!(!controller.tick());
        assert_eq!(controller.timer_state(), state(false, 0));

        controller.toggle();
        assert!(controller.tick());
        assert!(controller.tick());
        assert_eq!(controller.timer_state(), state(true, 2));

        controller.toggle();
        assert!(!controller.tick());
        assert_eq!(controller.timer_state(), state(false, 2));
    }

    #[tokio::test(start_paused = true)]
    async fn start_tick_stop_scenario() {
        let controller = controller();
        assert_eq!(controller.timer_state(), state(false, 0));

        assert_eq!(controller.toggle(), Some(state(true, 0)));
        sleep(Duration::from_millis(3500)).await;
        assert_eq!(controller.timer_state(), state(true, 3));

        assert_eq!(controller.toggle(), Some(state(false, 3)));
        sleep(Duration::from_secs(5)).await;
        assert_eq!(controller.timer_state(), state(false, 3));
        assert!(!controller.has_tick_source());
    }

    #[tokio::test(start_paused = true)]
    async fn stopping_holds_counter_past_next_interval() {
        let controller = controller();
        controller.toggle();
        sleep(Duration::from_millis(1999)).await;
        controller.toggle();
        assert_eq!(controller.timer_state(), state(false, 1));

        sleep(Duration::from_millis(1500)).await;
        assert_eq!(controller.timer_state(), state(false, 1));
    }

    #[tokio::test(start_paused = true)]
    async fn teardown_discards_pending_ticks() {
        let controller = controller();
        controller.toggle();
        sleep(Duration::from_millis(1500)).await;

        controller.on_teardown();
        assert_eq!(controller.phase(), Phase::TornDown);
        sleep(Duration::from_secs(5)).await;

        assert!(!controller.tick());
        assert_eq!(controller.timer_state(), state(false, 1));
        assert!(!controller.has_tick_source());
    }

    #[tokio::test(start_paused = true)]
    async fn teardown_is_idempotent_and_terminal() {
        let controller = controller();
        let mut subscription = controller.subscribe();

        controller.on_teardown();
        let torn = subscription.changed().await.expect("teardown published");
        assert!(torn.torn_down);

        controller.on_teardown();
        assert_eq!(controller.toggle(), None);
        assert_eq!(controller.toggle_snapshot(), None);
        assert_eq!(controller.timer_state(), state(false, 0));
        assert!(!controller.has_tick_source());

        let waited = tokio::time::timeout(Duration::from_secs(2), subscription.changed()).await;
        assert!(waited.is_err(), "no publication after the first teardown");
    }

    #[tokio::test(start_paused = true)]
    async fn second_cycle_resumes_counter() {
        let controller = controller();
        controller.toggle();
        sleep(Duration::from_millis(2500)).await;
        controller.toggle();
        sleep(Duration::from_secs(3)).await;

        controller.toggle();
        sleep(Duration::from_millis(2500)).await;
        assert_eq!(controller.timer_state(), state(true, 4));
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_reactivation_keeps_one_source() {
        let controller = controller();
        controller.toggle();
        sleep(Duration::from_millis(400)).await;
        controller.toggle();
        controller.toggle();

        // New cycle ticks at 1.4s and 2.4s only.
        sleep(Duration::from_millis(2300)).await;
        assert_eq!(controller.timer_state(), state(true, 2));
        assert!(controller.has_tick_source());
    }

    #[tokio::test]
    async fn stale_generation_is_rejected() {
        let controller = controller();
        controller.toggle();
        controller.toggle();
        controller.toggle();

        assert!(!controller.on_tick(1));
        assert_eq!(controller.timer_state(), state(true, 0));
        assert!(controller.on_tick(3));
        assert_eq!(controller.timer_state(), state(true, 1));
    }

    #[tokio::test]
    async fn subscribers_see_mutations_in_order() {
        let controller = controller();
        let mut subscription = controller.subscribe();
        assert_eq!(controller.subscriber_count(), 1);
        assert_eq!(subscription.current().timer, state(false, 0));

        controller.toggle();
        assert_eq!(subscription.changed().await.expect("toggle").timer, state(true, 0));
        controller.tick();
        assert_eq!(subscription.changed().await.expect("tick").timer, state(true, 1));

        subscription.unsubscribe();
        assert_eq!(controller.subscriber_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn current_marks_snapshot_seen() {
        let controller = controller();
        let mut subscription = controller.subscribe();

        controller.toggle();
        assert_eq!(subscription.current().timer, state(true, 0));

        let repeat = tokio::time::timeout(Duration::from_millis(200), subscription.changed()).await;
        assert!(repeat.is_err(), "snapshot already read must not be delivered again");

        controller.tick();
        assert_eq!(subscription.changed().await.expect("tick").timer, state(true, 1));
    }

    #[tokio::test]
    async fn toggle_snapshot_reports_state_of_the_same_toggle() {
        let controller = controller();

        let started = controller.toggle_snapshot().expect("running");
        assert_eq!(started.phase(), Phase::Running);
        assert_eq!(started.child, *controller.child());

        let stopped = controller.toggle_snapshot().expect("idle");
        assert_eq!(stopped.phase(), Phase::Idle);

        controller.on_teardown();
        assert_eq!(controller.toggle_snapshot(), None);
        assert_eq!(controller.phase(), Phase::TornDown);
    }

    #[tokio::test]
    async fn send_dispatches_actions() {
        let controller = controller();
        assert_eq!(controller.last_action(), None);

        let snapshot = controller.send(Action::ToggleTimer);
        assert_eq!(snapshot.phase(), Phase::Running);
        let snapshot = controller.send(Action::TimerTicked);
        assert_eq!(snapshot.timer.seconds_elapsed, 1);
        assert_eq!(controller.last_action().map(|(action, _)| action), Some(Action::TimerTicked));

        let snapshot = controller.send(Action::Teardown);
        assert_eq!(snapshot.phase(), Phase::TornDown);
        assert_eq!(snapshot.child, *controller.child());
    }

    #[tokio::test]
    async fn subscription_ends_when_controller_dropped() {
        let controller = controller();
        let mut subscription = controller.subscribe();
        drop(controller);
        assert!(subscription.changed().await.is_none());
    }
}
