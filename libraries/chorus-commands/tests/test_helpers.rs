//! Fixtures for command executor tests
//!
//! A fake catalog per service with call counting, and a helper that wires a
//! `CommandExecutor` around it.

#![allow(dead_code)]

use async_trait::async_trait;
use chorus_commands::{BotSettings, BotState, CommandContext, CommandExecutor};
use chorus_core::{
    ChorusError, FetchOptions, Link, LinkType, Result, SearchQuery, SearchResult, SearchResults,
    ServiceAdapter, ServiceType, Track, TrackList,
};
use chorus_resolver::{LinkResolver, ServiceRegistry};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const BOT: &str = "chorus";

/// In-memory catalog for one service
pub struct FakeCatalog {
    service: ServiceType,
    tracks: HashMap<Link, Track>,
    playlists: HashMap<Link, TrackList>,
    latency: Duration,
    fetches: AtomicUsize,
}

impl FakeCatalog {
    pub fn new(service: ServiceType) -> Self {
        Self {
            service,
            tracks: HashMap::new(),
            playlists: HashMap::new(),
            latency: Duration::ZERO,
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn with_tracks(mut self, tracks: impl IntoIterator<Item = Track>) -> Self {
        for track in tracks {
            self.tracks.insert(track.link.clone(), track);
        }
        self
    }

    pub fn with_playlist(mut self, url: &str, tracks: Vec<Track>) -> Self {
        self.playlists.insert(Link::new(url), TrackList::new(tracks));
        self
    }

    /// Every fetch sleeps this long before answering
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ServiceAdapter for FakeCatalog {
    fn service_type(&self) -> ServiceType {
        self.service
    }

    async fn resolve_type(&self, link: &Link) -> Result<LinkType> {
        if self.playlists.contains_key(link) {
            Ok(LinkType::Playlist)
        } else if self.tracks.contains_key(link) {
            Ok(LinkType::Track)
        } else {
            Err(ChorusError::unsupported(self.service, link.url()))
        }
    }

    async fn search(&self, query: &SearchQuery, limit: usize) -> Result<SearchResults> {
        let mut hits: Vec<&Track> = self
            .tracks
            .values()
            .filter(|t| t.title.to_lowercase().contains(&query.text.to_lowercase()))
            .collect();
        hits.sort_by(|a, b| a.title.cmp(&b.title));
        let results = hits
            .into_iter()
            .take(limit)
            .map(|t| SearchResult {
                kind: LinkType::Track,
                title: t.title.clone(),
                subtitle: t.artists.first().cloned(),
                link: t.link.clone(),
            })
            .collect();
        Ok(SearchResults { results })
    }

    async fn fetch_track(&self, link: &Link) -> Result<Track> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.latency).await;
        self.tracks
            .get(link)
            .cloned()
            .ok_or_else(|| ChorusError::resolution_failed(link.url(), "not found"))
    }

    async fn fetch_playlist_tracks(&self, link: &Link, options: FetchOptions) -> Result<TrackList> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.latency).await;
        self.playlists
            .get(link)
            .cloned()
            .map(|tracks| tracks.truncated(options.limit))
            .ok_or_else(|| ChorusError::resolution_failed(link.url(), "not found"))
    }
}

/// `https://soundcloud.com/<artist>/<slug>`
pub fn sc_url(artist: &str, slug: &str) -> String {
    format!("https://soundcloud.com/{artist}/{slug}")
}

pub fn sc_track(artist: &str, slug: &str) -> Track {
    Track::new(slug, Link::new(sc_url(artist, slug))).with_artists([artist])
}

/// SoundCloud catalog: tracks a..f by "band", x and y by "other",
/// and a playlist of a, b, c
pub fn soundcloud() -> Arc<FakeCatalog> {
    let tracks: Vec<Track> = ["a", "b", "c", "d", "e", "f"]
        .into_iter()
        .map(|slug| sc_track("band", slug))
        .chain(["x", "y"].into_iter().map(|slug| sc_track("other", slug)))
        .collect();
    let playlist = vec![sc_track("band", "a"), sc_track("band", "b"), sc_track("band", "c")];
    Arc::new(
        FakeCatalog::new(ServiceType::SoundCloud)
            .with_tracks(tracks)
            .with_playlist(&sc_url("band", "sets/best-of"), playlist),
    )
}

pub fn executor_with(catalog: Arc<FakeCatalog>) -> CommandExecutor {
    let resolver = LinkResolver::new(ServiceRegistry::new().with(catalog));
    let settings = BotSettings {
        bot_name: BOT.to_string(),
        ..BotSettings::default()
    };
    CommandExecutor::new(Arc::new(BotState::new(resolver, settings)))
}

pub fn links(slugs: &[&str]) -> Vec<String> {
    slugs.iter().map(|s| sc_url("band", s)).collect()
}

pub fn ctx(user: &str, members: &[&str]) -> CommandContext {
    CommandContext::new(user, members.iter().map(|m| m.to_string()).collect())
}

/// Upcoming track titles in queue order
pub async fn queue_titles(executor: &CommandExecutor) -> Vec<String> {
    executor
        .state()
        .queue
        .read()
        .await
        .tracks()
        .iter()
        .map(|t| t.title.clone())
        .collect()
}

pub async fn now_playing_title(executor: &CommandExecutor) -> Option<String> {
    executor
        .state()
        .queue
        .read()
        .await
        .now_playing()
        .map(|t| t.title.clone())
}
