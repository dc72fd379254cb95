//! Core types for queue management

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Player state
///
/// Owned by `QueueStore`; changes only through its start/pause/resume/stop/skip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueueState {
    /// Nothing playing (initial state)
    #[default]
    Stopped,

    /// Currently playing
    Playing,

    /// Paused mid-track
    Paused,
}

impl QueueState {
    /// Playing or paused
    pub fn is_active(self) -> bool {
        !matches!(self, Self::Stopped)
    }
}

impl fmt::Display for QueueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Stopped => "stopped",
            Self::Playing => "playing",
            Self::Paused => "paused",
        })
    }
}

/// Position/length of the current track as reported by the external player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackProgress {
    pub position: Duration,
    pub length: Duration,
}
