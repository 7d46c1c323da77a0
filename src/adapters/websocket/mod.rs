//! Live comment fan-out over WebSocket.
//!
//! Every open viewer of a video receives newly posted comments in real
//! time, without polling. Comments are still submitted over the separate
//! REST path; the stream is outbound-only in practice.
//!
//! # Architecture
//!
//! ```text
//! POST /v1/comments ──▶ CreateCommentHandler ──▶ LiveCommentPublisher
//!                                                      │ publish
//!                                                      ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HubRegistry                             │
//! │   video-1 → TopicHub      video-2 → TopicHub                    │
//! └─────────────────────────────────────────────────────────────────┘
//!                │ one command queue per hub
//!                ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  TopicHub control loop (single task, owns the member set)       │
//! │   Register / Unregister / Broadcast, processed in FIFO order    │
//! └─────────────────────────────────────────────────────────────────┘
//!                │ per-viewer outbound buffer
//!                ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  Viewer sessions (one upgraded connection each)                 │
//! │   write pump: outbound buffer → socket                          │
//! │   read pump:  frames discarded; first error unregisters         │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Delivery is best effort and purely in-process: no persistence, no
//! replay, no cross-server fan-out.
//!
//! # Components
//!
//! - [`messages`] - the `CommentEvent` wire snapshot
//! - [`session`] - viewer identity and the hub-held handle
//! - [`hub`] - the per-video actor and its command loop
//! - [`registry`] - process-wide video → hub table
//! - [`handler`] - axum upgrade handler and session lifecycle

pub mod handler;
pub mod hub;
pub mod messages;
pub mod registry;
pub mod session;

pub use handler::{comments_socket, live_comments_router, LiveCommentsState};
pub use hub::TopicHub;
pub use messages::CommentEvent;
pub use registry::HubRegistry;
pub use session::{ViewerHandle, ViewerId};
