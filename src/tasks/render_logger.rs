//! Subscriber task that logs every published state

use tracing::{debug, info};

use crate::state::{Subscription, TimersSnapshot};

/// Log the current state and every publication until teardown.
///
/// Returns the number of states rendered.
pub async fn render_logger_task(mut subscription: Subscription) -> u64 {
    info!("Starting render logger task");

    let mut renders = 0;
    let mut snapshot = subscription.current();

    loop {
        render(&snapshot);
        renders += 1;

        if snapshot.torn_down {
            info!("Timer torn down, render logger unsubscribing");
            break;
        }

        match subscription.changed().await {
            Some(next) => snapshot = next,
            None => {
                debug!("Controller dropped, render logger stopping");
                break;
            }
        }
    }

    subscription.unsubscribe();
    renders
}

fn render(snapshot: &TimersSnapshot) {
    debug!(
        phase = %snapshot.phase(),
        child = %snapshot.child.title,
        "Time Elapsed: {}",
        snapshot.timer.seconds_elapsed
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::state::{ChildState, TimerController};

    #[tokio::test]
    async fn stops_and_unsubscribes_on_teardown() {
        let controller = TimerController::new(Duration::from_secs(1), ChildState::default());
        let logger = render_logger_task(controller.subscribe());
        assert_eq!(controller.subscriber_count(), 1);

        let teardown = async {
            tokio::task::yield_now().await;
            controller.on_teardown();
        };
        let (renders, ()) = tokio::join!(logger, teardown);

        // Initial idle state, then the torn-down state.
        assert_eq!(renders, 2);
        assert_eq!(controller.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn already_torn_down_renders_once() {
        let controller = TimerController::new(Duration::from_secs(1), ChildState::default());
        controller.on_teardown();

        let renders = render_logger_task(controller.subscribe()).await;
        assert_eq!(renders, 1);
    }

    #[tokio::test]
    async fn state_published_before_start_renders_once() {
        let controller = TimerController::new(Duration::from_secs(1), ChildState::default());
        let subscription = controller.subscribe();
        controller.toggle();

        let logger = render_logger_task(subscription);
        let teardown = async {
            tokio::task::yield_now().await;
            controller.on_teardown();
        };
        let (renders, ()) = tokio::join!(logger, teardown);

        // Running state once, then the torn-down state.
        assert_eq!(renders, 2);
    }

    #[tokio::test]
    async fn stops_when_controller_dropped() {
        let controller = TimerController::new(Duration::from_secs(1), ChildState::default());
        let task = tokio::spawn(render_logger_task(controller.subscribe()));
        drop(controller);

        assert_eq!(task.await.expect("task"), 1);
    }
}
