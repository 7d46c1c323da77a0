//! Per-video hub actor.
//!
//! One hub exists per actively-viewed video. All three operations -
//! register, unregister, broadcast - are multiplexed onto a single
//! command queue drained by one spawned task, so the member set needs no
//! lock and commands are processed in strict FIFO order.

use std::collections::HashMap;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::domain::foundation::VideoId;

use super::messages::CommentEvent;
use super::session::{ViewerHandle, ViewerId};

/// Commands accepted by a hub's control loop.
#[derive(Debug)]
enum HubCommand {
    Register(ViewerHandle),
    Unregister(ViewerId),
    Broadcast(CommentEvent),
}

/// Handle to a per-video hub.
///
/// Cheap to clone; all clones feed the same control loop. The hub runs
/// for the life of the process - there is no shutdown path, matching the
/// append-only registry.
#[derive(Debug, Clone)]
pub struct TopicHub {
    commands: mpsc::Sender<HubCommand>,
}

impl TopicHub {
    /// Create a hub for `video_id` and start its control loop.
    ///
    /// `broadcast_capacity` bounds the command queue; broadcasts beyond
    /// it are dropped rather than blocking the publisher.
    pub(crate) fn spawn(video_id: VideoId, broadcast_capacity: usize) -> Self {
        let (commands, inbox) = mpsc::channel(broadcast_capacity);
        tokio::spawn(run_control_loop(video_id, inbox));
        Self { commands }
    }

    /// Add a viewer to the member set.
    ///
    /// Always succeeds once processed. Waits for queue space rather than
    /// dropping - a registration must not be lost to a burst of
    /// broadcasts.
    pub async fn register(&self, viewer: ViewerHandle) {
        if self
            .commands
            .send(HubCommand::Register(viewer))
            .await
            .is_err()
        {
            tracing::error!("hub control loop gone; registration lost");
        }
    }

    /// Remove a viewer from the member set. Idempotent: unregistering a
    /// viewer that is not a member is a no-op.
    pub async fn unregister(&self, viewer_id: ViewerId) {
        if self
            .commands
            .send(HubCommand::Unregister(viewer_id))
            .await
            .is_err()
        {
            tracing::error!("hub control loop gone; unregistration lost");
        }
    }

    /// Enqueue an event for delivery to every current member.
    ///
    /// Never blocks: if the command queue is full the event is dropped
    /// and a warning logged. Best-effort delivery is the contract here;
    /// the REST path that created the comment has already succeeded.
    pub fn broadcast(&self, event: CommentEvent) {
        match self.commands.try_send(HubCommand::Broadcast(event)) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                tracing::warn!("hub queue full; dropping comment event");
            }
            Err(TrySendError::Closed(_)) => {
                tracing::error!("hub control loop gone; dropping comment event");
            }
        }
    }

    /// Whether two handles refer to the same hub instance.
    pub fn same_hub(&self, other: &TopicHub) -> bool {
        self.commands.same_channel(&other.commands)
    }
}

/// The hub's control loop. Sole owner of the member set: every mutation
/// happens here, one command at a time.
async fn run_control_loop(video_id: VideoId, mut inbox: mpsc::Receiver<HubCommand>) {
    let mut members: HashMap<ViewerId, mpsc::Sender<String>> = HashMap::new();

    while let Some(command) = inbox.recv().await {
        match command {
            HubCommand::Register(viewer) => {
                tracing::debug!(video = %video_id, viewer = %viewer.id, "viewer registered");
                members.insert(viewer.id, viewer.outbound);
            }
            HubCommand::Unregister(viewer_id) => {
                // Dropping the outbound sender ends the viewer's write
                // pump, which closes the socket.
                if members.remove(&viewer_id).is_some() {
                    tracing::debug!(video = %video_id, viewer = %viewer_id, "viewer unregistered");
                }
            }
            HubCommand::Broadcast(event) => {
                deliver(&video_id, &members, &event);
            }
        }
    }

    tracing::debug!(video = %video_id, "hub control loop finished");
}

/// Deliver one event to every current member, in member-buffer order.
/// A failure for one viewer never aborts delivery to the rest, and never
/// removes the viewer - removal only happens through the session's own
/// read-failure path.
fn deliver(video_id: &VideoId, members: &HashMap<ViewerId, mpsc::Sender<String>>, event: &CommentEvent) {
    let payload = match serde_json::to_string(event) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::error!(video = %video_id, "failed to serialize comment event: {}", e);
            return;
        }
    };

    for (viewer_id, outbound) in members {
        if let Err(e) = outbound.try_send(payload.clone()) {
            tracing::warn!(
                video = %video_id,
                viewer = %viewer_id,
                "skipping delivery to slow or closing session: {}",
                e
            );
        }
    }
}
