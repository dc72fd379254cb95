//! Queue events
//!
//! Emitted at key points so the chat layer can announce them:
//! - State changes (play/pause/stop)
//! - Track started / ended
//! - Queue cleared

use crate::types::QueueState;
use chorus_core::Track;
use serde::{Deserialize, Serialize};

/// Events recorded by `QueueStore`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum QueueEvent {
    /// Player state changed
    StateChanged {
        /// The new state
        state: QueueState,
    },

    /// A track became the current track
    TrackStarted {
        /// The new current track
        track: Track,
    },

    /// The current track finished or was skipped
    TrackEnded {
        /// The track that stopped playing
        track: Track,
        /// True when skipped rather than played to the end
        skipped: bool,
    },

    /// All upcoming tracks were removed
    QueueCleared,
}
