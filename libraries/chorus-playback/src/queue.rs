//! Playback queue and player state machine
//!
//! ```text
//! Now Playing: Track A           (popped off the queue by start/skip)
//! ─────────────────────────────
//! Upcoming:
//!   0 - Track B                  (plays next; play-next inserts here)
//!   1 - Track C
//!   2 - Track D
//! ```
//!
//! State machine: `Stopped -> Playing <-> Paused`, `stop` returns to
//! `Stopped` from either, and `skip` past the last track also stops.

use crate::error::{QueueError, Result};
use crate::events::QueueEvent;
use crate::shuffle::shuffle_tracks;
use crate::types::{QueueState, TrackProgress};
use chorus_core::{Link, Track, TrackList};
use std::time::Duration;
use tracing::{debug, info};

/// Ordered upcoming tracks plus the current track and player state
///
/// Every mutation is applied to one in-memory sequence; callers serialize
/// access (the bot keeps it behind a single lock).
#[derive(Debug, Clone, Default)]
pub struct QueueStore {
    upcoming: Vec<Track>,
    now_playing: Option<Track>,
    state: QueueState,
    progress: TrackProgress,
    events: Vec<QueueEvent>,
}

impl QueueStore {
    /// Create new empty queue
    pub fn new() -> Self {
        Self::default()
    }

    // ===== Inspection =====

    /// Number of upcoming tracks
    pub fn len(&self) -> usize {
        self.upcoming.len()
    }

    pub fn is_empty(&self) -> bool {
        self.upcoming.is_empty()
    }

    /// Upcoming tracks in play order
    pub fn tracks(&self) -> &[Track] {
        &self.upcoming
    }

    pub fn get(&self, position: usize) -> Option<&Track> {
        self.upcoming.get(position)
    }

    pub fn now_playing(&self) -> Option<&Track> {
        self.now_playing.as_ref()
    }

    pub fn state(&self) -> QueueState {
        self.state
    }

    pub fn progress(&self) -> TrackProgress {
        self.progress
    }

    /// Positions of entries matching `link`, mirrors included, ascending
    pub fn positions_matching(&self, link: &Link) -> Vec<usize> {
        self.upcoming
            .iter()
            .enumerate()
            .filter(|(_, track)| track.matches_link(link))
            .map(|(i, _)| i)
            .collect()
    }

    // ===== Mutation =====

    /// Add tracks to the end; returns the position of the first one
    pub fn append(&mut self, tracks: TrackList) -> usize {
        let position = self.upcoming.len();
        info!(count = tracks.len(), position, "Appending tracks");
        self.upcoming.extend(tracks);
        position
    }

    /// Insert tracks as a block starting at `position` (`len` appends)
    pub fn insert_at(&mut self, tracks: TrackList, position: usize) -> Result<usize> {
        if position > self.upcoming.len() {
            return Err(QueueError::invalid_position(position, self.upcoming.len()));
        }
        info!(count = tracks.len(), position, "Inserting tracks");
        self.upcoming.splice(position..position, tracks);
        Ok(position)
    }

    /// Remove the track at `position`
    pub fn remove_at(&mut self, position: usize) -> Result<Track> {
        if position >= self.upcoming.len() {
            return Err(QueueError::invalid_position(position, self.upcoming.len()));
        }
        let track = self.upcoming.remove(position);
        info!(position, track = %track, "Removed track");
        Ok(track)
    }

    /// Remove several positions at once
    ///
    /// All positions are validated first; nothing is removed if any is out of
    /// bounds. Removal runs in descending order so indices do not shift.
    /// Returns the removed `(position, track)` pairs in ascending order.
    pub fn remove_positions(&mut self, positions: &[usize]) -> Result<Vec<(usize, Track)>> {
        let len = self.upcoming.len();
        if let Some(&bad) = positions.iter().find(|&&p| p >= len) {
            return Err(QueueError::invalid_position(bad, len));
        }
        let mut sorted = positions.to_vec();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        sorted.dedup();

        let mut removed: Vec<(usize, Track)> = sorted
            .into_iter()
            .map(|p| (p, self.upcoming.remove(p)))
            .collect();
        removed.reverse();
        info!(count = removed.len(), "Removed tracks by position");
        Ok(removed)
    }

    /// Remove every entry the predicate accepts; returns them with their
    /// former positions
    pub fn remove_all_matching<F>(&mut self, mut predicate: F) -> Vec<(usize, Track)>
    where
        F: FnMut(&Track) -> bool,
    {
        let positions: Vec<usize> = self
            .upcoming
            .iter()
            .enumerate()
            .filter(|(_, t)| predicate(t))
            .map(|(i, _)| i)
            .collect();
        // positions are in bounds by construction
        self.remove_positions(&positions).unwrap_or_default()
    }

    /// Move the tracks at `positions` so the block starts at `destination`
    ///
    /// The moved tracks keep their relative order. Returns the position the
    /// block landed at (clamped to the queue length after removal).
    pub fn move_positions(&mut self, positions: &[usize], destination: usize) -> Result<usize> {
        let len = self.upcoming.len();
        if len == 0 {
            return Err(QueueError::EmptyQueue);
        }
        if destination >= len {
            return Err(QueueError::invalid_position(destination, len));
        }
        let removed = self.remove_positions(positions)?;
        let landing = destination.min(self.upcoming.len());
        let count = removed.len();
        self.upcoming
            .splice(landing..landing, removed.into_iter().map(|(_, t)| t));
        info!(count, destination, landing, "Moved tracks");
        Ok(landing)
    }

    /// Shuffle the upcoming tracks
    pub fn shuffle(&mut self) {
        shuffle_tracks(&mut self.upcoming);
        info!(count = self.upcoming.len(), "Shuffled queue");
    }

    /// Remove all upcoming tracks (the current track keeps playing)
    pub fn clear(&mut self) {
        self.upcoming.clear();
        self.events.push(QueueEvent::QueueCleared);
        info!("Cleared queue");
    }

    // ===== Playback state machine =====

    /// Start playing the first upcoming track
    ///
    /// Only valid from `Stopped` with a non-empty queue.
    pub fn start(&mut self) -> Result<&Track> {
        if self.state.is_active() {
            return Err(QueueError::AlreadyActive(self.state));
        }
        if self.upcoming.is_empty() {
            return Err(QueueError::EmptyQueue);
        }
        self.advance(false);
        self.now_playing.as_ref().ok_or(QueueError::EmptyQueue)
    }

    pub fn pause(&mut self) -> Result<()> {
        match self.state {
            QueueState::Playing => {
                self.set_state(QueueState::Paused);
                Ok(())
            }
            QueueState::Paused => Err(QueueError::AlreadyActive(QueueState::Paused)),
            QueueState::Stopped => Err(QueueError::NotActive(QueueState::Stopped)),
        }
    }

    pub fn resume(&mut self) -> Result<()> {
        match self.state {
            QueueState::Paused => {
                self.set_state(QueueState::Playing);
                Ok(())
            }
            QueueState::Playing => Err(QueueError::AlreadyActive(QueueState::Playing)),
            QueueState::Stopped => Err(QueueError::NotActive(QueueState::Stopped)),
        }
    }

    /// Stop playback; upcoming tracks are kept
    pub fn stop(&mut self) {
        if let Some(track) = self.now_playing.take() {
            self.events.push(QueueEvent::TrackEnded {
                track,
                skipped: true,
            });
        }
        self.progress = TrackProgress::default();
        self.set_state(QueueState::Stopped);
    }

    /// Skip the current track
    ///
    /// Advances to the next upcoming track, or stops when none is left.
    /// Returns the new current track, if any.
    pub fn skip(&mut self) -> Result<Option<&Track>> {
        if !self.state.is_active() {
            return Err(QueueError::NotActive(self.state));
        }
        self.advance(true);
        Ok(self.now_playing.as_ref())
    }

    /// The external player reports the current track finished
    pub fn track_ended(&mut self) -> Option<&Track> {
        if !self.state.is_active() {
            debug!("Track end reported while stopped");
            return None;
        }
        self.advance(false);
        self.now_playing.as_ref()
    }

    /// Record position/length reported by the external player
    pub fn update_progress(&mut self, position: Duration, length: Duration) {
        self.progress = TrackProgress { position, length };
    }

    /// Take all recorded events, oldest first
    pub fn drain_events(&mut self) -> Vec<QueueEvent> {
        std::mem::take(&mut self.events)
    }

    fn advance(&mut self, skipped: bool) {
        if let Some(track) = self.now_playing.take() {
            self.events.push(QueueEvent::TrackEnded { track, skipped });
        }
        self.progress = TrackProgress::default();

        if self.upcoming.is_empty() {
            self.set_state(QueueState::Stopped);
            return;
        }
        let next = self.upcoming.remove(0);
        info!(track = %next, "Now playing");
        self.events.push(QueueEvent::TrackStarted {
            track: next.clone(),
        });
        self.now_playing = Some(next);
        self.set_state(QueueState::Playing);
    }

    fn set_state(&mut self, state: QueueState) {
        if self.state != state {
            debug!(from = %self.state, to = %state, "Queue state changed");
            self.state = state;
            self.events.push(QueueEvent::StateChanged { state });
        }
    }
}
