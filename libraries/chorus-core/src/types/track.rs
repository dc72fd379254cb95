//! Track value objects and ordered track lists

use super::link::Link;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A playable (or not) track produced by a service adapter
///
/// Compared by `link` for queue operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub album: Option<String>,
    pub artists: Vec<String>,
    pub title: String,
    pub link: Link,

    /// Whether the track can actually be streamed (region/licensing/availability)
    pub playable: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likes: Option<u64>,
}

impl Track {
    /// Create a playable track with no artist/album metadata
    pub fn new(title: impl Into<String>, link: Link) -> Self {
        Self {
            album: None,
            artists: Vec::new(),
            title: title.into(),
            link,
            playable: true,
            likes: None,
        }
    }

    /// Placeholder for a link nothing could be fetched for
    pub fn unresolved(link: Link) -> Self {
        Self {
            title: link.url().to_string(),
            playable: false,
            ..Self::new("", link)
        }
    }

    #[must_use]
    pub fn with_artists<I, S>(mut self, artists: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.artists = artists.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = Some(album.into());
        self
    }

    #[must_use]
    pub fn with_playable(mut self, playable: bool) -> Self {
        self.playable = playable;
        self
    }

    /// Mirror-aware match against a selector link
    pub fn matches_link(&self, link: &Link) -> bool {
        self.link.matches(link)
    }
}

impl PartialEq for Track {
    fn eq(&self, other: &Self) -> bool {
        self.link == other.link
    }
}

impl Eq for Track {}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.artists.is_empty() {
            write!(f, "{}", self.title)
        } else {
            write!(f, "{} - {}", self.artists.join(", "), self.title)
        }
    }
}

/// Ordered sequence of tracks; order is playback order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackList {
    tracks: Vec<Track>,
}

impl TrackList {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Track> {
        self.tracks.iter()
    }

    pub fn as_slice(&self) -> &[Track] {
        &self.tracks
    }

    pub fn into_vec(self) -> Vec<Track> {
        self.tracks
    }

    pub fn push(&mut self, track: Track) {
        self.tracks.push(track);
    }

    pub fn extend(&mut self, other: TrackList) {
        self.tracks.extend(other.tracks);
    }

    /// First `limit` tracks; 0 means unlimited
    #[must_use]
    pub fn truncated(mut self, limit: usize) -> Self {
        if limit > 0 {
            self.tracks.truncate(limit);
        }
        self
    }

    #[must_use]
    pub fn reversed(mut self) -> Self {
        self.tracks.reverse();
        self
    }

    pub fn as_mut_slice(&mut self) -> &mut [Track] {
        &mut self.tracks
    }

    /// Split into (playable, unplayable), each keeping the original order
    pub fn partition_playable(self) -> (TrackList, TrackList) {
        let (playable, excluded): (Vec<_>, Vec<_>) =
            self.tracks.into_iter().partition(|t| t.playable);
        (Self::new(playable), Self::new(excluded))
    }

    /// The entry whose own link (or mirror) matches `link`
    pub fn find_by_link(&self, link: &Link) -> Option<&Track> {
        self.tracks.iter().find(|t| t.matches_link(link))
    }
}

impl From<Vec<Track>> for TrackList {
    fn from(tracks: Vec<Track>) -> Self {
        Self::new(tracks)
    }
}

impl FromIterator<Track> for TrackList {
    fn from_iter<I: IntoIterator<Item = Track>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for TrackList {
    type Item = Track;
    type IntoIter = std::vec::IntoIter<Track>;

    fn into_iter(self) -> Self::IntoIter {
        self.tracks.into_iter()
    }
}

impl<'a> IntoIterator for &'a TrackList {
    type Item = &'a Track;
    type IntoIter = std::slice::Iter<'a, Track>;

    fn into_iter(self) -> Self::IntoIter {
        self.tracks.iter()
    }
}
