//! Error types for queue management

use crate::types::QueueState;
use thiserror::Error;

/// Queue errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueueError {
    /// Position outside the queue
    #[error("Invalid position {position}: queue has {len} tracks")]
    InvalidPosition { position: i64, len: usize },

    /// Queue is empty
    #[error("Queue is empty")]
    EmptyQueue,

    /// Playback already running (use resume/skip instead)
    #[error("Playback is already {0}")]
    AlreadyActive(QueueState),

    /// Operation needs an active (playing or paused) queue
    #[error("Playback is {0}")]
    NotActive(QueueState),

    /// Selector matched several entries and no disambiguating flag was given
    #[error("Selector matches several tracks at positions {positions:?}")]
    AmbiguousSelector { positions: Vec<usize> },
}

impl QueueError {
    pub fn invalid_position(position: impl TryInto<i64>, len: usize) -> Self {
        Self::InvalidPosition {
            position: position.try_into().unwrap_or(i64::MAX),
            len,
        }
    }
}

/// Result type for queue operations
pub type Result<T> = std::result::Result<T, QueueError>;
