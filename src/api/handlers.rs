//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};
use axum::{
    extract::State,
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::{self, Stream, StreamExt};
use tracing::{info, warn};

use crate::state::{AppState, ChildState, TimersSnapshot};
use super::responses::{ApiResponse, HealthResponse, StatusResponse};

/// Handle POST /toggle - Start or stop the timer
pub async fn toggle_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    let Some(snapshot) = state.controller.toggle_snapshot() else {
        warn!("Toggle requested after teardown");
        return Err(StatusCode::CONFLICT);
    };

    let message = if snapshot.timer.is_active {
        "Timer started"
    } else {
        "Timer stopped"
    };
    info!("Toggle endpoint called - {}", message.to_lowercase());

    Ok(Json(ApiResponse::new(message, snapshot)))
}

/// Handle POST /teardown - The view went away, cancel the timer for good
pub async fn teardown_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    state.controller.on_teardown();
    info!("Teardown endpoint called");
    Json(ApiResponse::new("Timer torn down", state.controller.snapshot()))
}

/// Handle GET /status - Return current timer status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let controller = &state.controller;
    let snapshot = controller.snapshot();
    let (last_action, last_action_time) = match controller.last_action() {
        Some((action, at)) => (Some(action), Some(at)),
        None => (None, None),
    };

    Json(StatusResponse {
        phase: snapshot.phase(),
        state: snapshot,
        tick_interval_ms: controller.tick_interval().as_millis() as u64,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        subscribers: controller.subscriber_count(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /child - Return the child feature data
pub async fn child_handler(State(state): State<Arc<AppState>>) -> Json<ChildState> {
    Json(state.controller.child().clone())
}

/// Handle GET /events - Stream every published snapshot as server-sent events
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut subscription = state.controller.subscribe();
    let first = subscription.current();
    // A torn-down controller publishes nothing further.
    let pending = if first.torn_down { None } else { Some(subscription) };

    let updates = stream::unfold(pending, |pending| async move {
        let mut subscription = pending?;
        let snapshot = subscription.changed().await?;
        let next = if snapshot.torn_down {
            subscription.unsubscribe();
            None
        } else {
            Some(subscription)
        };
        Some((snapshot, next))
    });

    let events = stream::once(async move { first })
        .chain(updates)
        .map(|snapshot| Ok(snapshot_event(&snapshot)));

    Sse::new(events).keep_alive(KeepAlive::default())
}

fn snapshot_event(snapshot: &TimersSnapshot) -> Event {
    match Event::default().event("state").json_data(snapshot) {
        Ok(event) => event,
        Err(e) => {
            warn!("Failed to encode snapshot event: {}", e);
            Event::default().event("error").data("snapshot encoding failed")
        }
    }
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
