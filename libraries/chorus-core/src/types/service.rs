//! Service and link classification enums

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Music catalog a link belongs to
///
/// Derived from the host (or URI scheme) of a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    Spotify,
    SoundCloud,
    YouTube,
    Bandcamp,
    AppleMusic,
    /// Resolves one canonical link into per-service mirrors (song.link and friends)
    Aggregator,
    Other,
}

impl ServiceType {
    /// Services that host playable content, in default mirror priority order
    pub const PLAYABLE: [ServiceType; 5] = [
        ServiceType::Spotify,
        ServiceType::SoundCloud,
        ServiceType::YouTube,
        ServiceType::Bandcamp,
        ServiceType::AppleMusic,
    ];

    /// Classify a host name (already lowercased, without `www.`/`m.`)
    pub fn from_host(host: &str) -> Self {
        match host {
            "open.spotify.com" | "play.spotify.com" | "spotify.link" | "spotify.app.link" => {
                Self::Spotify
            }
            "soundcloud.com" | "on.soundcloud.com" | "api.soundcloud.com"
            | "api-v2.soundcloud.com" => Self::SoundCloud,
            "youtube.com" | "music.youtube.com" | "youtu.be" | "youtube-nocookie.com" => {
                Self::YouTube
            }
            "music.apple.com" | "itunes.apple.com" | "podcasts.apple.com" => Self::AppleMusic,
            "song.link" | "album.link" | "artist.link" | "playlist.link" | "pods.link"
            | "odesli.co" => Self::Aggregator,
            h if h == "bandcamp.com" || h.ends_with(".bandcamp.com") => Self::Bandcamp,
            _ => Self::Other,
        }
    }

    /// Two-letter shorthand used in chat queries (`sp track ...`)
    pub fn shorthand(self) -> &'static str {
        match self {
            Self::Spotify => "sp",
            Self::SoundCloud => "sc",
            Self::YouTube => "yt",
            Self::Bandcamp => "bc",
            Self::AppleMusic => "am",
            Self::Aggregator => "sl",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Spotify => "Spotify",
            Self::SoundCloud => "SoundCloud",
            Self::YouTube => "YouTube",
            Self::Bandcamp => "Bandcamp",
            Self::AppleMusic => "Apple Music",
            Self::Aggregator => "song.link",
            Self::Other => "Other",
        };
        f.write_str(name)
    }
}

impl FromStr for ServiceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sp" | "spotify" => Ok(Self::Spotify),
            "sc" | "soundcloud" => Ok(Self::SoundCloud),
            "yt" | "youtube" => Ok(Self::YouTube),
            "bc" | "bandcamp" => Ok(Self::Bandcamp),
            "am" | "apple_music" | "applemusic" | "apple" => Ok(Self::AppleMusic),
            "sl" | "songlink" | "aggregator" | "odesli" => Ok(Self::Aggregator),
            "other" => Ok(Self::Other),
            other => Err(format!("unknown service: {other}")),
        }
    }
}

/// Kind of entity a link points at
///
/// Selects which fetch operation of the owning adapter is invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkType {
    Track,
    Album,
    Playlist,
    /// Service-curated playlist (e.g. Spotify "Discover Weekly")
    SystemPlaylist,
    Show,
    Episode,
    Artist,
    User,
    Channel,
    Likes,
    Reposts,
    Tracks,
    TagOrGenre,
    Discover,
    Recommended,
    Query,
    Other,
}

impl LinkType {
    /// Whether the link expands into several tracks
    pub fn is_collection(self) -> bool {
        !matches!(
            self,
            Self::Track | Self::Episode | Self::Query | Self::Other
        )
    }
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Track => "track",
            Self::Album => "album",
            Self::Playlist => "playlist",
            Self::SystemPlaylist => "system playlist",
            Self::Show => "show",
            Self::Episode => "episode",
            Self::Artist => "artist",
            Self::User => "user",
            Self::Channel => "channel",
            Self::Likes => "likes",
            Self::Reposts => "reposts",
            Self::Tracks => "tracks",
            Self::TagOrGenre => "tag",
            Self::Discover => "discover",
            Self::Recommended => "recommended",
            Self::Query => "query",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

impl FromStr for LinkType {
    type Err = String;

    /// Parses the search-type word of a chat query (`sp album ...`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "track" | "song" => Ok(Self::Track),
            "album" => Ok(Self::Album),
            "playlist" => Ok(Self::Playlist),
            "show" | "podcast" => Ok(Self::Show),
            "episode" => Ok(Self::Episode),
            "artist" => Ok(Self::Artist),
            "user" => Ok(Self::User),
            "channel" => Ok(Self::Channel),
            "tag" | "genre" => Ok(Self::TagOrGenre),
            other => Err(format!("unknown search type: {other}")),
        }
    }
}
