//! Collection metadata and fetch options

use super::link::Link;
use super::service::LinkType;
use serde::{Deserialize, Serialize};

/// Which part of a user/artist/channel to expand
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchScope {
    /// The entity's own tracks
    #[default]
    Tracks,
    /// Tracks of the entity's playlists
    Playlists,
}

/// Options for collection fetches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchOptions {
    /// Maximum number of tracks (0 = unlimited)
    pub limit: usize,
    pub scope: FetchScope,
}

impl FetchOptions {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }
}

/// Descriptive metadata of an album/playlist/artist/user/show
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
    pub kind: LinkType,
    pub name: String,
    pub link: Link,
    pub owner: Option<String>,
    pub description: Option<String>,
    pub track_count: Option<usize>,
    pub followers: Option<u64>,
}

impl Collection {
    pub fn new(kind: LinkType, name: impl Into<String>, link: Link) -> Self {
        Self {
            kind,
            name: name.into(),
            link,
            owner: None,
            description: None,
            track_count: None,
            followers: None,
        }
    }
}
