//! Result of one chat command

use chorus_core::{Collection, SearchResults, Track, TrackList};

/// Structured data attached to a command result
#[derive(Debug, Clone, Default)]
pub enum Payload {
    #[default]
    None,
    /// Tracks added, deleted, or listed
    Tracks(TrackList),
    /// Queue positions a selector matched
    Positions(Vec<usize>),
    Track(Track),
    Collection(Collection),
    Search(SearchResults),
}

/// `(success, message, payload)` returned to the chat layer
#[derive(Debug, Clone)]
pub struct CommandOutcome {
    pub success: bool,
    /// Human-readable, possibly multi-line reply
    pub message: String,
    pub payload: Payload,
}

impl CommandOutcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            payload: Payload::None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            payload: Payload::None,
        }
    }

    #[must_use]
    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }

    /// Tracks carried by the payload, if any
    pub fn tracks(&self) -> Option<&TrackList> {
        match &self.payload {
            Payload::Tracks(tracks) => Some(tracks),
            _ => None,
        }
    }

    /// Positions carried by the payload, if any
    pub fn positions(&self) -> Option<&[usize]> {
        match &self.payload {
            Payload::Positions(positions) => Some(positions),
            _ => None,
        }
    }
}

impl<E: std::error::Error> From<E> for CommandOutcome {
    fn from(err: E) -> Self {
        Self::failure(err.to_string())
    }
}
