//! Chorus - Playback Queue
//!
//! Queue orchestration state for the Chorus chat music bot.
//!
//! This crate provides:
//! - Ordered queue of upcoming tracks plus the "now playing" track
//! - Player state machine (Stopped, Playing, Paused)
//! - Uniform random shuffle
//! - Vote-to-skip bookkeeping
//! - Queue events for announcing track changes
//!
//! # Architecture
//!
//! `chorus-playback` never talks to a player process or a music service.
//! The external player reports track ends and progress; everything here is
//! a synchronous in-memory mutation, so callers can hold a lock around it
//! without crossing an await point.
//!
//! # Example
//!
//! ```rust
//! use chorus_core::{Link, Track, TrackList};
//! use chorus_playback::{QueueState, QueueStore};
//!
//! let mut queue = QueueStore::new();
//! let tracks: TrackList = vec![
//!     Track::new("One", Link::new("https://open.spotify.com/track/1")),
//!     Track::new("Two", Link::new("https://open.spotify.com/track/2")),
//! ]
//! .into();
//! queue.append(tracks);
//!
//! queue.start().unwrap();
//! assert_eq!(queue.state(), QueueState::Playing);
//! assert_eq!(queue.now_playing().unwrap().title, "One");
//!
//! queue.skip().unwrap();
//! queue.skip().unwrap();
//! assert_eq!(queue.state(), QueueState::Stopped);
//! ```

mod error;
mod events;
mod queue;
mod shuffle;
pub mod types;
mod vote;

// Public exports
pub use error::{QueueError, Result};
pub use events::QueueEvent;
pub use queue::QueueStore;
pub use shuffle::shuffle_tracks;
pub use types::{QueueState, TrackProgress};
pub use vote::{VoteOutcome, VoteRecord, VoteSkipCoordinator};
