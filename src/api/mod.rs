//! HTTP API module
//!
//! Exposes the harness page: its behavior state, and user selection as
//! endpoints.

pub mod handlers;
pub mod responses;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/inputs/:index/check", post(check_handler))
        .route("/inputs/:index/uncheck", post(uncheck_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use crate::{
        api::responses::{ApiResponse, StatusResponse},
        behaviors::init_page,
        quiz::{QuestionKind, QuestionPage},
    };

    fn harness() -> Router {
        let page = Arc::new(
            QuestionPage::new(QuestionKind::MultipleChoice)
                .remaining_seconds(600)
                .build(),
        );
        let behaviors = init_page(Arc::clone(&page), Default::default());
        create_router(Arc::new(AppState::new(page, &behaviors, "127.0.0.1".into(), 0)))
    }

    async fn send(app: &Router, method: &str, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .clone()
            .oneshot(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    #[tokio::test(start_paused = true)]
    async fn check_and_uncheck_drive_the_gate() {
        let app = harness();

        let (status, body) = send(&app, "POST", "/inputs/2/check").await;
        assert_eq!(status, StatusCode::OK);
        let response: ApiResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(response.gate.map(|g| g.enabled), Some(true));

        let (status, body) = send(&app, "POST", "/inputs/2/uncheck").await;
        assert_eq!(status, StatusCode::OK);
        let response: ApiResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(response.gate.map(|g| g.enabled), Some(false));
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_option_is_not_found() {
        let app = harness();
        let (status, _) = send(&app, "POST", "/inputs/4/check").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test(start_paused = true)]
    async fn status_reports_countdown_and_inputs() {
        let app = harness();
        let (status, body) = send(&app, "GET", "/status").await;
        assert_eq!(status, StatusCode::OK);

        let response: StatusResponse = serde_json::from_slice(&body).unwrap();
        let timer = response.timer.unwrap();
        assert_eq!(timer.display, "10:00");
        assert!(timer.active);
        assert_eq!(response.inputs.len(), 4);
        assert!(response.submissions.is_empty());
        assert_eq!(response.gate.map(|g| g.enabled), Some(false));
    }

    #[tokio::test]
    async fn health() {
        let app = harness();
        let (status, _) = send(&app, "GET", "/health").await;
        assert_eq!(status, StatusCode::OK);
    }
}
