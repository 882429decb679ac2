//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use homectl_app::ports::{EventLog, PinDriver, StateStore};

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Nests the API routes under `/api`, exposes a bare health check at the
/// root, and attaches a [`TraceLayer`] that logs each HTTP request/response
/// through the `tracing` ecosystem.
pub fn build<D, S, L>(state: AppState<D, S, L>) -> Router
where
    D: PinDriver + Send + Sync + 'static,
    S: StateStore + Clone + Send + Sync + 'static,
    L: EventLog + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use parking_lot::Mutex;
    use tower::ServiceExt;

    use homectl_app::actuator::RetryingDriver;
    use homectl_app::hub::Hub;
    use homectl_domain::error::{ActuationError, PersistenceError};
    use homectl_domain::event::EventLogEntry;
    use homectl_domain::notification::PendingNotification;
    use homectl_domain::pin::{PinAssignments, PinLevel};
    use homectl_domain::schedule::ScheduledTask;

    #[derive(Clone, Default)]
    struct StubPins;

    impl PinDriver for StubPins {
        async fn set_pin(&self, _pin: u8, _level: PinLevel) -> Result<(), ActuationError> {
            Ok(())
        }
        async fn read_pin(&self, _pin: u8) -> Result<PinLevel, ActuationError> {
            Ok(PinLevel::Low)
        }
    }

    #[derive(Clone, Default)]
    struct StubStore {
        notifications: Arc<Mutex<Vec<PendingNotification>>>,
    }

    impl StateStore for StubStore {
        async fn load_chat_ids(&self) -> Result<HashSet<i64>, PersistenceError> {
            Ok(HashSet::new())
        }
        async fn save_chat_ids(&self, _ids: &HashSet<i64>) -> Result<(), PersistenceError> {
            Ok(())
        }
        async fn load_tasks(&self) -> Result<Vec<ScheduledTask>, PersistenceError> {
            Ok(Vec::new())
        }
        async fn save_tasks(&self, _tasks: &[ScheduledTask]) -> Result<(), PersistenceError> {
            Ok(())
        }
        async fn load_notifications(&self) -> Result<Vec<PendingNotification>, PersistenceError> {
            Ok(Vec::new())
        }
        async fn save_notifications(
            &self,
            notifications: &[PendingNotification],
        ) -> Result<(), PersistenceError> {
            *self.notifications.lock() = notifications.to_vec();
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct StubLog {
        entries: Arc<Mutex<Vec<EventLogEntry>>>,
    }

    impl EventLog for StubLog {
        async fn append(&self, entry: &EventLogEntry) -> Result<(), PersistenceError> {
            self.entries.lock().push(entry.clone());
            Ok(())
        }
        async fn read_all(&self) -> Result<Vec<EventLogEntry>, PersistenceError> {
            Ok(self.entries.lock().clone())
        }
    }

    async fn test_app() -> Router {
        let actuator = RetryingDriver::with_policy(StubPins, 3, Duration::ZERO);
        let (hub, _rx) = Hub::load(
            actuator,
            StubStore::default(),
            StubLog::default(),
            PinAssignments::default(),
        )
        .await;
        build(AppState::new(Arc::new(hub)))
    }

    fn json_request(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn should_return_ok_when_health_check_called() {
        let app = test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn should_process_message_and_echo_caller() {
        let app = test_app().await;

        let response = app
            .oneshot(json_request(
                "/api/send_message",
                r#"{"message":"Turn on the light","user_name":"Alice","user_id":7}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "success");
        assert_eq!(body["response"], "✅ Light turned ON.");
        assert_eq!(body["user_name"], "Alice");
        assert_eq!(body["user_id"], 7);
    }

    #[tokio::test]
    async fn should_default_caller_identity_when_omitted() {
        let app = test_app().await;

        let response = app
            .oneshot(json_request("/api/send_message", r#"{"message":"hello"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["user_name"], "MobileUser");
        assert_eq!(body["user_id"], 0);
        assert_eq!(body["response"], "Hello MobileUser! Welcome to homectl!");
    }

    #[tokio::test]
    async fn should_reject_missing_message_with_bad_request() {
        let app = test_app().await;

        let response = app
            .oneshot(json_request("/api/send_message", r#"{"user_name":"Alice"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "message is required");
    }

    #[tokio::test]
    async fn should_reject_blank_message_with_bad_request() {
        let app = test_app().await;

        let response = app
            .oneshot(json_request("/api/send_message", r#"{"message":"   "}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn should_return_pending_notifications_without_clearing() {
        let app = test_app().await;
        app.clone()
            .oneshot(json_request(
                "/api/send_message",
                r#"{"message":"turn on the ac","user_name":"Alice","user_id":1}"#,
            ))
            .await
            .unwrap();

        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .uri("/api/get_notifications")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK);
            let body = json_body(response).await;
            assert_eq!(body["status"], "success");
            assert_eq!(body["count"], 1);
            let text = body["notifications"][0]["text"].as_str().unwrap();
            assert!(text.starts_with("[NOTIFICATION] 🔔 Alice: Air Conditioner turned ON at "));
            assert!(body["notifications"][0]["id"].is_u64());
        }
    }

    #[tokio::test]
    async fn should_return_recent_events() {
        let app = test_app().await;
        app.clone()
            .oneshot(json_request(
                "/api/send_message",
                r#"{"message":"turn on the light","user_name":"Alice","user_id":1}"#,
            ))
            .await
            .unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/get_events")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "success");
        // user_joined plus device_control.
        assert_eq!(body["count"], 2);
        assert_eq!(body["events"][1]["event_type"], "device_control");
        assert_eq!(body["events"][1]["message"], "Light turned ON");
    }

    #[tokio::test]
    async fn should_report_healthy_with_counters() {
        let app = test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["messages_processed"], 0);
        assert!(body["timestamp"].is_string());
    }
}
