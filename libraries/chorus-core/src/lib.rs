//! Chorus Core
//!
//! Service-agnostic types, traits, and error handling for the Chorus chat music bot.
//!
//! This crate provides the building blocks shared by the resolver, the queue,
//! and the command layer.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Link`, `Track`, `TrackList`, `SearchQuery`, etc.
//! - **Core Traits**: `ServiceAdapter`, the capability interface every music
//!   catalog (Spotify, SoundCloud, YouTube, ...) implements
//! - **Error Handling**: Unified `ChorusError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use chorus_core::types::{Link, ServiceType, Track};
//!
//! let link = Link::new("https://open.spotify.com/track/4uLU6hMCjMI75M1A2tKUQC?si=abc");
//! assert_eq!(link.service_type(), ServiceType::Spotify);
//! assert_eq!(link.id(), "4uLU6hMCjMI75M1A2tKUQC");
//!
//! let track = Track::new("Never Gonna Give You Up", link.clean());
//! assert!(track.playable);
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{ChorusError, Result};
pub use traits::ServiceAdapter;

pub use types::{
    Collection, FetchOptions, FetchScope, Link, LinkType, SearchQuery, SearchResult,
    SearchResults, ServiceType, Track, TrackList,
};
