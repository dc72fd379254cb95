//! Fake service adapters for resolver integration tests
//!
//! Each adapter serves a fixed catalog and counts calls, so tests can tell
//! cache hits from real fetches.

#![allow(dead_code)]

use async_trait::async_trait;
use chorus_core::{
    ChorusError, FetchOptions, Link, LinkType, Result, SearchQuery, SearchResult, SearchResults,
    ServiceAdapter, ServiceType, Track, TrackList,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// In-memory catalog for one service
#[derive(Default)]
pub struct FakeAdapter {
    service: Option<ServiceType>,
    tracks: HashMap<Link, Track>,
    playlists: HashMap<Link, TrackList>,
    mirrors: HashMap<Link, Vec<Link>>,
    failing: bool,
    /// Fetches that fail before the adapter starts answering
    flaky: AtomicUsize,
    calls: AtomicUsize,
}

impl FakeAdapter {
    pub fn new(service: ServiceType) -> Self {
        Self {
            service: Some(service),
            ..Self::default()
        }
    }

    pub fn with_track(mut self, track: Track) -> Self {
        self.tracks.insert(track.link.clone(), track);
        self
    }

    pub fn with_playlist(mut self, link: &str, tracks: Vec<Track>) -> Self {
        self.playlists.insert(Link::new(link), TrackList::new(tracks));
        self
    }

    pub fn with_mirrors(mut self, link: &str, mirrors: &[&str]) -> Self {
        self.mirrors
            .insert(Link::new(link), mirrors.iter().map(Link::new).collect());
        self
    }

    /// Every fetch fails as if the network were down
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    /// The first `failures` fetches fail, later ones succeed
    pub fn flaky(self, failures: usize) -> Self {
        self.flaky.store(failures, Ordering::SeqCst);
        self
    }

    /// Number of fetch/search calls served so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn count(&self, link: &Link) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(ChorusError::resolution_failed(link.url(), "connection reset"));
        }
        let remaining = self.flaky.load(Ordering::SeqCst);
        if remaining > 0 {
            self.flaky.store(remaining - 1, Ordering::SeqCst);
            return Err(ChorusError::Network(format!("{}: timed out", link.url())));
        }
        Ok(())
    }
}

#[async_trait]
impl ServiceAdapter for FakeAdapter {
    fn service_type(&self) -> ServiceType {
        self.service.unwrap_or(ServiceType::Other)
    }

    async fn resolve_type(&self, link: &Link) -> Result<LinkType> {
        if self.playlists.contains_key(link) {
            Ok(LinkType::Playlist)
        } else if self.tracks.contains_key(link) || self.mirrors.contains_key(link) {
            Ok(LinkType::Track)
        } else {
            Err(ChorusError::unsupported(self.service_type(), link.url()))
        }
    }

    async fn search(&self, query: &SearchQuery, limit: usize) -> Result<SearchResults> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let results = self
            .tracks
            .values()
            .filter(|t| t.title.to_lowercase().contains(&query.text.to_lowercase()))
            .take(limit.max(1))
            .map(|t| SearchResult {
                kind: LinkType::Track,
                title: t.title.clone(),
                subtitle: None,
                link: t.link.clone(),
            })
            .collect();
        Ok(SearchResults { results })
    }

    async fn fetch_track(&self, link: &Link) -> Result<Track> {
        self.count(link)?;
        self.tracks
            .get(link)
            .cloned()
            .ok_or_else(|| ChorusError::resolution_failed(link.url(), "not found"))
    }

    async fn fetch_playlist_tracks(&self, link: &Link, options: FetchOptions) -> Result<TrackList> {
        self.count(link)?;
        self.playlists
            .get(link)
            .cloned()
            .map(|tracks| tracks.truncated(options.limit))
            .ok_or_else(|| ChorusError::resolution_failed(link.url(), "not found"))
    }

    async fn fetch_mirrors(&self, link: &Link) -> Result<Vec<Link>> {
        self.count(link)?;
        Ok(self.mirrors.get(link).cloned().unwrap_or_default())
    }
}

pub fn track(title: &str, url: &str) -> Track {
    Track::new(title, Link::new(url)).with_artists(["Test Artist"])
}

pub fn shared(adapter: FakeAdapter) -> Arc<FakeAdapter> {
    Arc::new(adapter)
}
