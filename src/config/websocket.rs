//! Live comment fan-out configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Tuning knobs for the per-video comment hubs.
#[derive(Debug, Clone, Deserialize)]
pub struct WebSocketConfig {
    /// Capacity of each hub's command queue. Broadcasts beyond this are
    /// dropped (best-effort delivery), so publishers never block.
    #[serde(default = "default_broadcast_capacity")]
    pub broadcast_capacity: usize,

    /// Capacity of each viewer session's outbound buffer. A session that
    /// falls this many events behind starts missing events instead of
    /// stalling the hub.
    #[serde(default = "default_session_buffer")]
    pub session_buffer: usize,
}

impl WebSocketConfig {
    /// Validate fan-out configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.broadcast_capacity == 0 || self.session_buffer == 0 {
            return Err(ValidationError::InvalidChannelCapacity);
        }
        Ok(())
    }
}

impl Default for WebSocketConfig {
    fn default() -> Self {
        Self {
            broadcast_capacity: default_broadcast_capacity(),
            session_buffer: default_session_buffer(),
        }
    }
}

fn default_broadcast_capacity() -> usize {
    16
}

fn default_session_buffer() -> usize {
    64
}
