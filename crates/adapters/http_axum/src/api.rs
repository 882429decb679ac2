//! JSON API handlers.

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::routing::{get, post};
use serde::{Deserialize, Serialize};

use homectl_app::ports::{EventLog, PinDriver, StateStore};
use homectl_domain::error::ValidationError;
use homectl_domain::event::EventLogEntry;
use homectl_domain::notification::PendingNotification;
use homectl_domain::time::{self, Timestamp};

use crate::error::ApiError;
use crate::state::AppState;

/// Events returned by the read endpoint.
const RECENT_EVENTS: usize = 20;

/// API routes, to be nested under `/api`.
pub fn routes<D, S, L>() -> Router<AppState<D, S, L>>
where
    D: PinDriver + Send + Sync + 'static,
    S: StateStore + Clone + Send + Sync + 'static,
    L: EventLog + Send + Sync + 'static,
{
    Router::new()
        .route("/send_message", post(send_message))
        .route("/get_notifications", get(get_notifications))
        .route("/get_events", get(get_events))
        .route("/health", get(health))
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    message: Option<String>,
    #[serde(default = "default_user_name")]
    user_name: String,
    #[serde(default)]
    user_id: i64,
}

fn default_user_name() -> String {
    "MobileUser".to_string()
}

#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    status: &'static str,
    response: String,
    user_name: String,
    user_id: i64,
}

async fn send_message<D, S, L>(
    State(state): State<AppState<D, S, L>>,
    Json(body): Json<SendMessageRequest>,
) -> Result<Json<SendMessageResponse>, ApiError>
where
    D: PinDriver + Send + Sync + 'static,
    S: StateStore + Clone + Send + Sync + 'static,
    L: EventLog + Send + Sync + 'static,
{
    let message = body
        .message
        .filter(|message| !message.trim().is_empty())
        .ok_or(ValidationError::MissingMessage)?;

    let processed = state
        .hub
        .process_message(&message, &body.user_name, body.user_id)
        .await;

    Ok(Json(SendMessageResponse {
        status: "success",
        response: processed.response,
        user_name: processed.user_name,
        user_id: processed.user_id,
    }))
}

#[derive(Debug, Serialize)]
pub struct NotificationsResponse {
    status: &'static str,
    notifications: Vec<PendingNotification>,
    count: usize,
}

/// Pull-consumption endpoint: the pending list is returned whole and
/// never cleared; every polling client sees the same set.
async fn get_notifications<D, S, L>(
    State(state): State<AppState<D, S, L>>,
) -> Json<NotificationsResponse>
where
    D: PinDriver + Send + Sync + 'static,
    S: StateStore + Clone + Send + Sync + 'static,
    L: EventLog + Send + Sync + 'static,
{
    let notifications = state.hub.pending_notifications();
    Json(NotificationsResponse {
        status: "success",
        count: notifications.len(),
        notifications,
    })
}

#[derive(Debug, Serialize)]
pub struct EventsResponse {
    status: &'static str,
    events: Vec<EventLogEntry>,
    count: usize,
}

async fn get_events<D, S, L>(State(state): State<AppState<D, S, L>>) -> Json<EventsResponse>
where
    D: PinDriver + Send + Sync + 'static,
    S: StateStore + Clone + Send + Sync + 'static,
    L: EventLog + Send + Sync + 'static,
{
    let events = state.hub.recent_events(RECENT_EVENTS).await;
    Json(EventsResponse {
        status: "success",
        count: events.len(),
        events,
    })
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    timestamp: Timestamp,
    uptime_secs: i64,
    messages_processed: u64,
    avg_processing_time: f64,
}

async fn health<D, S, L>(State(state): State<AppState<D, S, L>>) -> Json<HealthResponse>
where
    D: PinDriver + Send + Sync + 'static,
    S: StateStore + Clone + Send + Sync + 'static,
    L: EventLog + Send + Sync + 'static,
{
    let snapshot = state.hub.health_snapshot();
    Json(HealthResponse {
        status: "healthy",
        timestamp: time::now(),
        uptime_secs: snapshot.uptime_secs,
        messages_processed: snapshot.messages_processed,
        avg_processing_time: snapshot.avg_processing_time,
    })
}
