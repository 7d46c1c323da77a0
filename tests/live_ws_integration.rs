//! End-to-end tests for the live comments WebSocket endpoint.
//!
//! These bind the real router to an ephemeral port, connect with a real
//! WebSocket client, and drive the publish path through the shared hub
//! registry, so the whole admission/upgrade/delivery chain is exercised
//! over actual sockets.

use std::sync::Arc;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite;

use minitube::adapters::auth::MockSessionValidator;
use minitube::adapters::websocket::{live_comments_router, HubRegistry, LiveCommentsState};
use minitube::config::WebSocketConfig;
use minitube::domain::comment::{Comment, CommentAuthor};
use minitube::domain::foundation::{CommentId, Timestamp, UserId, VideoId};
use minitube::ports::LiveCommentPublisher;

async fn start_app() -> (String, Arc<HubRegistry>) {
    let registry = Arc::new(HubRegistry::new(WebSocketConfig::default()));
    let validator = Arc::new(MockSessionValidator::new().with_test_user("good-token", "uid-1"));
    let app = live_comments_router(LiveCommentsState::new(registry.clone(), validator));

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0))
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("ws://{}", addr), registry)
}

fn comment_on(video: &str, id: i64, message: &str) -> Comment {
    Comment {
        id: CommentId::new(id),
        video_id: VideoId::new(video).unwrap(),
        message: message.to_string(),
        created_at: Timestamp::now(),
        author: CommentAuthor {
            id: UserId::new("uid-1").unwrap(),
            username: "alice".to_string(),
            avatar_url: None,
        },
    }
}

fn rejection_status(error: tungstenite::Error) -> u16 {
    match error {
        tungstenite::Error::Http(response) => response.status().as_u16(),
        other => panic!("expected HTTP rejection, got {:?}", other),
    }
}

async fn next_json<S>(stream: &mut S) -> Value
where
    S: StreamExt<Item = Result<tungstenite::Message, tungstenite::Error>> + Unpin,
{
    loop {
        let message = timeout(Duration::from_secs(2), stream.next())
            .await
            .expect("timed out waiting for frame")
            .expect("stream ended")
            .expect("websocket error");
        match message {
            tungstenite::Message::Text(text) => {
                return serde_json::from_str(&text).expect("frame is not JSON")
            }
            // Control frames may interleave with deliveries.
            tungstenite::Message::Ping(_) | tungstenite::Message::Pong(_) => continue,
            other => panic!("unexpected frame: {:?}", other),
        }
    }
}

#[tokio::test]
async fn connection_without_vid_gets_400() {
    let (base, _registry) = start_app().await;

    let error = tokio_tungstenite::connect_async(format!("{}/v1/ws/comments?token=t", base))
        .await
        .unwrap_err();

    assert_eq!(rejection_status(error), 400);
}

#[tokio::test]
async fn connection_without_token_gets_400() {
    let (base, _registry) = start_app().await;

    let error = tokio_tungstenite::connect_async(format!("{}/v1/ws/comments?vid=v1", base))
        .await
        .unwrap_err();

    assert_eq!(rejection_status(error), 400);
}

#[tokio::test]
async fn connection_with_invalid_token_gets_401() {
    let (base, _registry) = start_app().await;

    let error =
        tokio_tungstenite::connect_async(format!("{}/v1/ws/comments?vid=v1&token=forged", base))
            .await
            .unwrap_err();

    assert_eq!(rejection_status(error), 401);
}

#[tokio::test]
async fn connected_viewer_receives_published_comments() {
    let (base, registry) = start_app().await;

    let (mut stream, _) = tokio_tungstenite::connect_async(format!(
        "{}/v1/ws/comments?vid=v1&token=good-token",
        base
    ))
    .await
    .unwrap();

    registry.publish(comment_on("v1", 1, "over the wire")).await;

    let event = next_json(&mut stream).await;
    assert_eq!(event["ID"], 1);
    assert_eq!(event["VideoID"], "v1");
    assert_eq!(event["Message"], "over the wire");
    assert_eq!(event["User"]["Username"], "alice");
}

#[tokio::test]
async fn inbound_frames_are_ignored_not_echoed() {
    let (base, registry) = start_app().await;

    let (mut stream, _) = tokio_tungstenite::connect_async(format!(
        "{}/v1/ws/comments?vid=v1&token=good-token",
        base
    ))
    .await
    .unwrap();

    stream
        .send(tungstenite::Message::Text("client chatter".to_string()))
        .await
        .unwrap();

    // The only thing the server ever sends is a published comment.
    registry.publish(comment_on("v1", 7, "still just comments")).await;

    let event = next_json(&mut stream).await;
    assert_eq!(event["Message"], "still just comments");
}

#[tokio::test]
async fn closed_viewer_is_removed_while_others_keep_receiving() {
    let (base, registry) = start_app().await;
    let url = format!("{}/v1/ws/comments?vid=v1&token=good-token", base);

    let (mut leaver, _) = tokio_tungstenite::connect_async(&url).await.unwrap();
    let (mut stayer, _) = tokio_tungstenite::connect_async(&url).await.unwrap();

    leaver.close(None).await.unwrap();
    // Let the server's read pump observe the close and unregister.
    tokio::time::sleep(Duration::from_millis(100)).await;

    registry.publish(comment_on("v1", 2, "after goodbye")).await;

    let event = next_json(&mut stayer).await;
    assert_eq!(event["Message"], "after goodbye");
}

#[tokio::test]
async fn viewers_only_see_their_own_video() {
    let (base, registry) = start_app().await;

    let (mut v1_viewer, _) = tokio_tungstenite::connect_async(format!(
        "{}/v1/ws/comments?vid=v1&token=good-token",
        base
    ))
    .await
    .unwrap();
    let (mut v2_viewer, _) = tokio_tungstenite::connect_async(format!(
        "{}/v1/ws/comments?vid=v2&token=good-token",
        base
    ))
    .await
    .unwrap();

    registry.publish(comment_on("v1", 3, "v1 only")).await;

    let event = next_json(&mut v1_viewer).await;
    assert_eq!(event["VideoID"], "v1");

    let stray = timeout(Duration::from_millis(200), v2_viewer.next()).await;
    assert!(stray.is_err(), "v2 viewer observed v1 traffic");
}
