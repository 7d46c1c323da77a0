//! Viewer session identity and the handle a hub holds for it.

use std::fmt;

use tokio::sync::mpsc;
use uuid::Uuid;

/// Unique identifier for one live viewer connection.
///
/// Generated server-side at upgrade time; distinct from the user's
/// identity, since one user may watch from several tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewerId(Uuid);

impl ViewerId {
    /// Create a new random viewer ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ViewerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ViewerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a hub holds for each registered viewer: the identity and the
/// sending half of that viewer's outbound buffer. The session's write
/// pump drains the other half into the socket, so a slow socket never
/// stalls the hub's control loop.
#[derive(Debug)]
pub struct ViewerHandle {
    pub(crate) id: ViewerId,
    pub(crate) outbound: mpsc::Sender<String>,
}

impl ViewerHandle {
    /// Create a handle from a viewer ID and the sending half of its
    /// outbound channel.
    pub fn new(id: ViewerId, outbound: mpsc::Sender<String>) -> Self {
        Self { id, outbound }
    }

    /// The viewer this handle belongs to.
    pub fn id(&self) -> ViewerId {
        self.id
    }
}
