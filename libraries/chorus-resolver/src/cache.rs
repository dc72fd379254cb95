//! Session-long memo of fetched track lists
//!
//! Entries live until an explicit [`TrackCache::clear`]; there is no
//! eviction. A lookup also succeeds when the requested link is one of the
//! tracks inside a cached collection.

use chorus_core::{FetchOptions, Link, TrackList};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Clone)]
struct CacheEntry {
    tracks: TrackList,
    options: FetchOptions,
}

impl CacheEntry {
    /// Whether this entry holds everything a fetch with `options` would return
    fn covers(&self, options: FetchOptions) -> bool {
        if self.options.scope != options.scope {
            return false;
        }
        let complete = self.options.limit == 0 || self.tracks.len() < self.options.limit;
        complete || (options.limit != 0 && options.limit <= self.options.limit)
    }
}

/// Memoizes `Link -> TrackList` resolutions
#[derive(Debug, Default)]
pub struct TrackCache {
    entries: RwLock<HashMap<Link, CacheEntry>>,
}

impl TrackCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached tracks for `link`, truncated to `options.limit`
    ///
    /// Looks for an entry keyed by the link (or one of its mirrors) first,
    /// then for a cached collection containing the link as a track.
    pub async fn get(&self, link: &Link, options: FetchOptions) -> Option<TrackList> {
        let entries = self.entries.read().await;

        let keyed = entries.get(link).or_else(|| {
            entries
                .iter()
                .find(|(key, _)| key.matches(link))
                .map(|(_, entry)| entry)
        });
        if let Some(entry) = keyed {
            if entry.covers(options) {
                debug!(link = %link, "Cache hit");
                return Some(entry.tracks.clone().truncated(options.limit));
            }
            debug!(link = %link, cached_limit = entry.options.limit, "Cached entry too short");
            return None;
        }

        let contained = entries
            .values()
            .find_map(|entry| entry.tracks.find_by_link(link).cloned());
        if let Some(track) = contained {
            debug!(link = %link, "Cache hit inside collection");
            return Some(TrackList::new(vec![track]));
        }

        debug!(link = %link, "Cache miss");
        None
    }

    /// Store the result of a fetch, replacing any previous entry for `link`
    pub async fn put(&self, link: Link, tracks: TrackList, options: FetchOptions) {
        debug!(link = %link, count = tracks.len(), "Caching tracks");
        self.entries
            .write()
            .await
            .insert(link, CacheEntry { tracks, options });
    }

    /// Drop every entry; returns how many were removed
    pub async fn clear(&self) -> usize {
        let mut entries = self.entries.write().await;
        let count = entries.len();
        entries.clear();
        debug!(count, "Cleared track cache");
        count
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chorus_core::{FetchScope, Track};

    fn playlist(n: usize) -> TrackList {
        (0..n)
            .map(|i| {
                Track::new(
                    format!("Song {i}"),
                    Link::new(format!("https://open.spotify.com/track/{i}")),
                )
            })
            .collect()
    }

    fn playlist_link() -> Link {
        Link::new("https://open.spotify.com/playlist/abc")
    }

    #[tokio::test]
    async fn hit_after_put() {
        let cache = TrackCache::new();
        cache
            .put(playlist_link(), playlist(3), FetchOptions::default())
            .await;

        let hit = cache
            .get(
                &Link::new("https://open.spotify.com/playlist/abc?si=tracking"),
                FetchOptions::default(),
            )
            .await
            .unwrap();
        assert_eq!(hit.len(), 3);
    }

    #[tokio::test]
    async fn track_inside_collection_is_a_hit() {
        let cache = TrackCache::new();
        cache
            .put(playlist_link(), playlist(3), FetchOptions::default())
            .await;

        let hit = cache
            .get(
                &Link::new("https://open.spotify.com/track/1"),
                FetchOptions::default(),
            )
            .await
            .unwrap();
        assert_eq!(hit.len(), 1);
        assert_eq!(hit.as_slice()[0].title, "Song 1");
    }

    #[tokio::test]
    async fn truncated_entry_does_not_satisfy_larger_limit() {
        let cache = TrackCache::new();
        cache
            .put(playlist_link(), playlist(5), FetchOptions::with_limit(5))
            .await;

        assert_eq!(
            cache
                .get(&playlist_link(), FetchOptions::with_limit(2))
                .await
                .unwrap()
                .len(),
            2
        );
        assert!(cache
            .get(&playlist_link(), FetchOptions::with_limit(10))
            .await
            .is_none());
        assert!(cache
            .get(&playlist_link(), FetchOptions::default())
            .await
            .is_none());
    }

    #[tokio::test]
    async fn short_collection_is_complete() {
        let cache = TrackCache::new();
        cache
            .put(playlist_link(), playlist(3), FetchOptions::with_limit(5))
            .await;
        assert_eq!(
            cache
                .get(&playlist_link(), FetchOptions::default())
                .await
                .unwrap()
                .len(),
            3
        );
    }

    #[tokio::test]
    async fn scope_is_part_of_the_entry() {
        let cache = TrackCache::new();
        let artist = Link::new("https://soundcloud.com/someone");
        cache
            .put(artist.clone(), playlist(2), FetchOptions::default())
            .await;

        let playlists = FetchOptions {
            scope: FetchScope::Playlists,
            ..FetchOptions::default()
        };
        assert!(cache.get(&artist, playlists).await.is_none());
    }

    #[tokio::test]
    async fn clear_empties() {
        let cache = TrackCache::new();
        cache
            .put(playlist_link(), playlist(1), FetchOptions::default())
            .await;
        assert_eq!(cache.clear().await, 1);
        assert!(cache.is_empty().await);
        assert!(cache
            .get(&playlist_link(), FetchOptions::default())
            .await
            .is_none());
    }
}
