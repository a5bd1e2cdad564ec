//! Timers - a cancellable one-second timer with an HTTP control surface
//!
//! This is the main entry point for the timers application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use timers::{
    config::Config,
    state::{AppState, ChildState, TimerController},
    api::create_router,
    tasks::render_logger_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("timers={},tower_http=info", config.log_level()))
        .init();

    config.validate()?;

    info!("Starting timers server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, tick={}ms, child={:?}",
          config.host, config.port, config.tick_interval_ms, config.child_title);

    // The one controller for this process, injected everywhere it is needed
    let controller = TimerController::new(
        config.tick_interval(),
        ChildState::new(config.child_title.clone()),
    );
    let state = Arc::new(AppState::new(Arc::clone(&controller), config.port, config.host.clone()));

    let logger = tokio::spawn(render_logger_task(controller.subscribe()));

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /toggle   - Start or stop the timer");
    info!("  POST /teardown - Cancel the timer for good");
    info!("  GET  /status   - Current timer state and server info");
    info!("  GET  /child    - Child feature data");
    info!("  GET  /events   - Server-sent state updates");
    info!("  GET  /health   - Health check");

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    controller.on_teardown();
    if let Err(e) = logger.await {
        tracing::warn!("Render logger ended abnormally: {}", e);
    }

    info!("Server shutdown complete");
    Ok(())
}
