//! Quiz Page harness
//!
//! Builds a question page in memory, runs the page behaviors on it and serves
//! its state over HTTP.

use std::sync::Arc;

use chrono::Utc;
use tokio::net::TcpListener;
use tracing::info;

use quiz_page::{
    api::create_router,
    behaviors::{format_mmss, init_page},
    config::Config,
    state::AppState,
    tasks::countdown_monitor_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("quiz_page={},tower_http=info", config.log_level()))
        .init();

    info!("Starting quiz-page harness v{}", env!("CARGO_PKG_VERSION"));

    let question = config.question_page(Utc::now())?;
    info!(
        "Page: attempt={}, question={}, kind={:?}, tick={}ms, drift_corrected={}",
        question.attempt_id, question.number, question.kind, config.tick_ms, config.drift_corrected
    );

    // Page-ready: set up both behaviors once
    let page = Arc::new(question.build());
    let behaviors = init_page(Arc::clone(&page), config.countdown_config());
    if let Some(countdown) = &behaviors.countdown {
        info!("Countdown showing {}", format_mmss(countdown.state().remaining_seconds));
    }

    let state = Arc::new(AppState::new(page, &behaviors, config.host.clone(), config.port));

    let monitor_state = Arc::clone(&state);
    tokio::spawn(async move {
        countdown_monitor_task(monitor_state).await;
    });

    let app = create_router(state);

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET  /status                - Countdown, gate, options and submissions");
    info!("  POST /inputs/:index/check   - Check an answer option");
    info!("  POST /inputs/:index/uncheck - Uncheck an answer option");
    info!("  GET  /health                - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        result = shutdown_signal() => {
            match result {
                Ok(_) => info!("Shutdown signal received"),
                Err(e) => tracing::error!("Signal handling failed: {:#}", e),
            }
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
