//! WebSocket upgrade handler for the live comment stream.
//!
//! `GET /v1/ws/comments?vid=<video>&token=<bearer>`
//!
//! Admission happens before the upgrade: a missing parameter is a 400
//! and a failed token verification a 401, both as JSON, with no hub
//! interaction. After the upgrade the session registers with its video's
//! hub and stays until the read side of the connection fails.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::domain::foundation::{AuthenticatedUser, VideoId};
use crate::ports::SessionValidator;

use super::hub::TopicHub;
use super::registry::HubRegistry;
use super::session::{ViewerHandle, ViewerId};

/// State required by the upgrade handler.
#[derive(Clone)]
pub struct LiveCommentsState {
    /// Video → hub table shared with the publish path.
    pub registry: Arc<HubRegistry>,
    /// Token verification against the identity provider.
    pub validator: Arc<dyn SessionValidator>,
}

impl LiveCommentsState {
    /// Create the handler state.
    pub fn new(registry: Arc<HubRegistry>, validator: Arc<dyn SessionValidator>) -> Self {
        Self {
            registry,
            validator,
        }
    }
}

/// Connection parameters. Both are required; they arrive as query
/// parameters because browsers cannot set headers on WebSocket upgrades.
#[derive(Debug, Deserialize)]
pub struct LiveCommentsParams {
    /// Target video ID.
    pub vid: Option<String>,
    /// Bearer credential (Firebase ID token).
    pub token: Option<String>,
}

/// Handle the upgrade request for the live comment stream.
///
/// The upgrade is optional at extraction time so that parameter and
/// token checks run (and fail with their own statuses) before any
/// WebSocket requirement is enforced.
pub async fn comments_socket(
    ws: Option<WebSocketUpgrade>,
    Query(params): Query<LiveCommentsParams>,
    State(state): State<LiveCommentsState>,
) -> Response {
    let video_id = match params.vid.as_deref().map(VideoId::new) {
        Some(Ok(video_id)) => video_id,
        _ => return reject(StatusCode::BAD_REQUEST, "missing vid"),
    };

    let token = match params.token.filter(|t| !t.is_empty()) {
        Some(token) => token,
        None => return reject(StatusCode::BAD_REQUEST, "missing token"),
    };

    let user = match state.validator.validate(&token).await {
        Ok(user) => user,
        Err(e) => {
            tracing::debug!(video = %video_id, "rejected live comments connection: {}", e);
            return reject(StatusCode::UNAUTHORIZED, "invalid token");
        }
    };

    let ws = match ws {
        Some(ws) => ws,
        None => return reject(StatusCode::UPGRADE_REQUIRED, "upgrade required"),
    };

    let hub = state.registry.resolve(&video_id).await;
    let buffer = state.registry.session_buffer();

    ws.on_upgrade(move |socket| run_session(socket, hub, video_id, user, buffer))
}

/// JSON error emitted before the upgrade.
fn reject(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

/// Drive one viewer session for the lifetime of the connection.
///
/// The write pump forwards hub deliveries to the socket; the read pump
/// discards every inbound frame (comments are submitted over REST, never
/// on this stream) and exists only to detect disconnection. The first
/// read error or close frame unregisters the session, which in turn ends
/// the write pump by dropping its feeding channel.
async fn run_session(
    socket: WebSocket,
    hub: TopicHub,
    video_id: VideoId,
    user: AuthenticatedUser,
    buffer: usize,
) {
    let (mut sink, mut stream) = socket.split();
    let viewer_id = ViewerId::new();
    let (outbound, mut deliveries) = mpsc::channel::<String>(buffer);

    hub.register(ViewerHandle::new(viewer_id, outbound)).await;
    tracing::debug!(
        video = %video_id,
        viewer = %viewer_id,
        user = %user.id,
        "live comments session opened"
    );

    let send_task = tokio::spawn(async move {
        while let Some(payload) = deliveries.recv().await {
            if sink.send(Message::Text(payload)).await.is_err() {
                // Transport failure; the read pump will notice too.
                break;
            }
        }
        // Closing an already-closed connection is tolerated.
        let _ = sink.close().await;
    });

    loop {
        match stream.next().await {
            Some(Ok(Message::Close(_))) | None => break,
            // Inbound payloads are discarded by design.
            Some(Ok(_)) => continue,
            Some(Err(e)) => {
                tracing::debug!(viewer = %viewer_id, "live comments read error: {}", e);
                break;
            }
        }
    }

    hub.unregister(viewer_id).await;
    let _ = send_task.await;
    tracing::debug!(video = %video_id, viewer = %viewer_id, "live comments session closed");
}

/// Router exposing the upgrade endpoint.
pub fn live_comments_router(state: LiveCommentsState) -> Router {
    Router::new()
        .route("/v1/ws/comments", get(comments_socket))
        .with_state(state)
}
