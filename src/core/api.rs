//! HTTP + WebSocket API for Gestalert
//!
//! Endpoints:
//! - POST /session/new - Create new session
//! - GET /session/{id} - Get displayed status
//! - POST /session/{id}/frame - Submit a keypoint frame
//! - POST /session/{id}/reset - Reset the session
//! - DELETE /session/{id} - Drop the session
//! - GET /statuses - Display table and gesture hints
//! - WS /ws/{id} - Live updates; text messages are keypoint frames
//! - GET /health - Health check

use axum::{
    extract::{Path, State, WebSocketUpgrade, ws::{Message, WebSocket}},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::core::{SessionEngine, GESTURE_TABLE};
use crate::types::{KeypointFrame, StatusKind, StatusOutput, ValidationError};

/// Session state
#[derive(Debug)]
pub struct Session {
    pub id: String,
    pub engine: SessionEngine,
    pub update_tx: broadcast::Sender<StatusOutput>,
}

impl Session {
    /// Fold a frame in and broadcast the result
    fn submit(&mut self, frame: &KeypointFrame) -> Result<StatusOutput, ValidationError> {
        let output = self.engine.update(frame)?;
        let _ = self.update_tx.send(output.clone());
        Ok(output)
    }
}

/// App state
pub struct AppState {
    pub sessions: RwLock<HashMap<String, Session>>,
    pub engine_config: EngineConfig,
    next_id: AtomicU64,
}

impl AppState {
    pub fn new(engine_config: EngineConfig) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            engine_config,
            next_id: AtomicU64::new(0),
        }
    }
}

/// Create new session response
#[derive(Debug, Serialize)]
pub struct NewSessionResponse {
    pub session_id: String,
    pub websocket_url: String,
}

/// Session status response
#[derive(Debug, Serialize)]
pub struct SessionStatusResponse {
    pub session_id: String,
    #[serde(flatten)]
    pub output: StatusOutput,
    pub message: String,
}

/// Error body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// One row of the display table
#[derive(Debug, Serialize)]
pub struct StatusEntry {
    pub status: StatusKind,
    pub color: Option<(u8, u8, u8)>,
    pub message: Option<&'static str>,
    pub critical: bool,
    pub gesture: Option<&'static str>,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub sessions_active: usize,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn not_found(id: &str) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse { error: format!("session {} not found", id) }),
    )
}

fn invalid(e: ValidationError) -> ApiError {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ErrorResponse { error: e.to_string() }),
    )
}

/// Create the API router
pub fn create_router(engine_config: EngineConfig) -> Router {
    let state = Arc::new(AppState::new(engine_config));

    Router::new()
        .route("/health", get(health))
        .route("/statuses", get(statuses))
        .route("/session/new", post(create_session))
        .route("/session/:id", get(get_session).delete(delete_session))
        .route("/session/:id/frame", post(submit_frame))
        .route("/session/:id/reset", post(reset_session))
        .route("/ws/:id", get(websocket_handler))
        .with_state(state)
}

/// Health check endpoint
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let sessions = state.sessions.read().await;
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        sessions_active: sessions.len(),
    })
}

/// Display table for rendering front-ends
async fn statuses() -> Json<Vec<StatusEntry>> {
    let entries = StatusKind::ALL
        .into_iter()
        .map(|status| {
            let display = status.display();
            StatusEntry {
                status,
                color: display.map(|d| d.color),
                message: display.map(|d| d.message),
                critical: status.is_critical(),
                gesture: GESTURE_TABLE.iter().find(|g| g.status == status).map(|g| g.hint),
            }
        })
        .collect();
    Json(entries)
}

/// Create new session
async fn create_session(State(state): State<Arc<AppState>>) -> Json<NewSessionResponse> {
    let session_id = generate_session_id(&state.next_id);
    let (tx, _) = broadcast::channel(100);

    let session = Session {
        id: session_id.clone(),
        engine: SessionEngine::with_config(state.engine_config.clone()),
        update_tx: tx,
    };

    let mut sessions = state.sessions.write().await;
    sessions.insert(session_id.clone(), session);
    info!(session = %session_id, "session created");

    Json(NewSessionResponse {
        session_id: session_id.clone(),
        websocket_url: format!("/ws/{}", session_id),
    })
}

/// Get session status
async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionStatusResponse>, ApiError> {
    let sessions = state.sessions.read().await;
    let session = sessions.get(&id).ok_or_else(|| not_found(&id))?;
    let output = session.engine.current_output();

    Ok(Json(SessionStatusResponse {
        session_id: session.id.clone(),
        message: output.message().to_string(),
        output,
    }))
}

/// Drop a session; live sockets close once their channel does
async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let mut sessions = state.sessions.write().await;
    sessions.remove(&id).ok_or_else(|| not_found(&id))?;
    info!(session = %id, "session deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Submit a keypoint frame
async fn submit_frame(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(frame): Json<KeypointFrame>,
) -> Result<Json<StatusOutput>, ApiError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or_else(|| not_found(&id))?;
    session.submit(&frame).map(Json).map_err(invalid)
}

/// Reset session
async fn reset_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<StatusOutput>, ApiError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or_else(|| not_found(&id))?;
    let output = session.engine.reset();
    let _ = session.update_tx.send(output.clone());
    Ok(Json(output))
}

/// WebSocket handler for live updates
async fn websocket_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ws: WebSocketUpgrade,
) -> Result<impl IntoResponse, ApiError> {
    let sessions = state.sessions.read().await;
    let session = sessions.get(&id).ok_or_else(|| not_found(&id))?;
    let rx = session.update_tx.subscribe();
    drop(sessions);

    Ok(ws.on_upgrade(move |socket| async move {
        handle_websocket(socket, state, id, rx).await;
    }))
}

/// Forward updates out, fold incoming frames in
async fn handle_websocket(
    socket: WebSocket,
    state: Arc<AppState>,
    id: String,
    mut rx: broadcast::Receiver<StatusOutput>,
) {
    let (mut sender, mut receiver) = socket.split();

    let mut forward = tokio::spawn(async move {
        loop {
            let update = match rx.recv().await {
                Ok(update) => update,
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "websocket client lagging");
                    continue;
                }
                Err(RecvError::Closed) => break,
            };
            let json = serde_json::to_string(&update).unwrap_or_default();
            if sender.send(Message::Text(json)).await.is_err() {
                break;
            }
        }
    });

    let mut ingest = tokio::spawn(async move {
        while let Some(Ok(message)) = receiver.next().await {
            let text = match message {
                Message::Text(text) => text,
                Message::Close(_) => break,
                _ => continue,
            };
            if !ingest_text(&state, &id, &text).await {
                break;
            }
        }
    });

    tokio::select! {
        _ = &mut forward => ingest.abort(),
        _ = &mut ingest => forward.abort(),
    }
}

/// Fold one websocket text message into a session.
/// Returns false once the session no longer exists.
async fn ingest_text(state: &AppState, id: &str, text: &str) -> bool {
    let frame: KeypointFrame = match serde_json::from_str(text) {
        Ok(frame) => frame,
        Err(e) => {
            warn!(session = %id, error = %e, "unreadable frame");
            return true;
        }
    };
    let mut sessions = state.sessions.write().await;
    let Some(session) = sessions.get_mut(id) else { return false };
    if let Err(e) = session.submit(&frame) {
        debug!(session = %id, error = %e, "frame rejected over websocket");
    }
    true
}

/// Generate session ID
fn generate_session_id(counter: &AtomicU64) -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default();
    let seq = counter.fetch_add(1, Ordering::Relaxed);
    format!("session_{:x}_{}", nanos, seq)
}

/// Run the API server
pub async fn run_server(addr: &str, engine_config: EngineConfig) -> anyhow::Result<()> {
    let router = create_router(engine_config);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "gestalert API listening");
    println!("Gestalert API running on {}", addr);
    println!("  POST /session/new        - Create session");
    println!("  GET  /session/:id        - Get status");
    println!("  POST /session/:id/frame  - Submit keypoint frame");
    println!("  POST /session/:id/reset  - Reset session");
    println!("  DELETE /session/:id      - Drop session");
    println!("  GET  /statuses           - Display table");
    println!("  WS   /ws/:id             - Live updates");
    println!("  GET  /health             - Health check");
    axum::serve(listener, router).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hand::synthetic_hand;

    const HELP: [bool; 5] = [false, true, true, true, true];

    async fn state_with_session(id: &str) -> (AppState, broadcast::Receiver<StatusOutput>) {
        let state = AppState::new(EngineConfig::default());
        let (tx, rx) = broadcast::channel(100);
        let session = Session {
            id: id.to_string(),
            engine: SessionEngine::new(),
            update_tx: tx,
        };
        state.sessions.write().await.insert(id.to_string(), session);
        (state, rx)
    }

    #[tokio::test]
    async fn test_ingested_frames_are_broadcast() {
        let (state, mut rx) = state_with_session("s1").await;
        let frame = KeypointFrame::empty().with_hand(synthetic_hand(HELP));
        let text = serde_json::to_string(&frame).unwrap();

        for _ in 0..3 {
            assert!(ingest_text(&state, "s1", &text).await);
        }

        let updates: Vec<StatusOutput> = (0..3).map(|_| rx.try_recv().unwrap()).collect();
        assert_eq!(updates[0].status, StatusKind::Monitoring);
        assert_eq!(updates[2].status, StatusKind::HelpCritical);
        assert_eq!(updates[2].confidence, 0.95);
        assert!(updates[2].promoted);
    }

    #[tokio::test]
    async fn test_unreadable_and_invalid_frames_skipped() {
        let (state, mut rx) = state_with_session("s1").await;

        assert!(ingest_text(&state, "s1", "not json").await);
        assert!(ingest_text(&state, "s1", r#"{"hands": [[{"x": 0.5, "y": 0.5}]]}"#).await);

        assert!(rx.try_recv().is_err());
        let sessions = state.sessions.read().await;
        assert_eq!(sessions["s1"].engine.frame_count(), 0);
    }

    #[tokio::test]
    async fn test_ingest_stops_for_missing_session() {
        let (state, _rx) = state_with_session("s1").await;
        assert!(!ingest_text(&state, "gone", "{}").await);
    }

    #[tokio::test]
    async fn test_lagging_receiver_keeps_latest() {
        let (tx, mut rx) = broadcast::channel(2);
        for frame_count in 1..=5 {
            let _ = tx.send(StatusOutput::new(
                StatusKind::Monitoring, 0.0, crate::types::ReasonCode::R001_NO_CANDIDATE, 0, frame_count,
            ));
        }
        assert!(matches!(rx.recv().await, Err(RecvError::Lagged(3))));
        assert_eq!(rx.recv().await.unwrap().frame_count, 4);
    }
}
