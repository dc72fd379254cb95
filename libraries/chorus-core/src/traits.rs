/// Core traits for Chorus
use crate::error::{ChorusError, Result};
use crate::types::{
    Collection, FetchOptions, Link, LinkType, SearchQuery, SearchResults, ServiceType, Track,
    TrackList,
};
use async_trait::async_trait;

/// Capability interface of one music catalog
///
/// One implementation per service (Spotify, SoundCloud, YouTube, ...),
/// selected through its `ServiceType`. Every operation is asynchronous, may be
/// slow, and may retry transient failures internally. Operations a service
/// does not offer keep the default body, which reports
/// `ChorusError::UnsupportedOperation`.
#[async_trait]
pub trait ServiceAdapter: Send + Sync {
    /// The service this adapter talks to
    fn service_type(&self) -> ServiceType;

    /// Classify a link owned by this service
    ///
    /// # Errors
    /// Returns `UnsupportedLinkKind` if the link cannot be classified
    async fn resolve_type(&self, link: &Link) -> Result<LinkType>;

    /// Search the catalog
    async fn search(&self, query: &SearchQuery, limit: usize) -> Result<SearchResults> {
        let _ = limit;
        Err(self.unsupported(query.kind, &query.to_string()))
    }

    /// Fetch a single track, including its playability
    async fn fetch_track(&self, link: &Link) -> Result<Track>;

    /// Fetch an album's tracks
    async fn fetch_album_tracks(&self, link: &Link, options: FetchOptions) -> Result<TrackList> {
        let _ = options;
        Err(self.unsupported(LinkType::Album, link.url()))
    }

    /// Fetch a playlist's tracks (user or system playlist)
    async fn fetch_playlist_tracks(&self, link: &Link, options: FetchOptions) -> Result<TrackList> {
        let _ = options;
        Err(self.unsupported(LinkType::Playlist, link.url()))
    }

    /// Fetch an artist's top tracks, or the tracks of their playlists
    async fn fetch_artist_tracks(&self, link: &Link, options: FetchOptions) -> Result<TrackList> {
        let _ = options;
        Err(self.unsupported(LinkType::Artist, link.url()))
    }

    /// Fetch a user's/channel's uploads, or the tracks of their playlists
    async fn fetch_user_tracks(&self, link: &Link, options: FetchOptions) -> Result<TrackList> {
        let _ = options;
        Err(self.unsupported(LinkType::User, link.url()))
    }

    /// Fetch the tracks a user liked
    async fn fetch_likes(&self, link: &Link, options: FetchOptions) -> Result<TrackList> {
        let _ = options;
        Err(self.unsupported(LinkType::Likes, link.url()))
    }

    /// Fetch the tracks a user reposted
    async fn fetch_reposts(&self, link: &Link, options: FetchOptions) -> Result<TrackList> {
        let _ = options;
        Err(self.unsupported(LinkType::Reposts, link.url()))
    }

    /// Fetch a show's (podcast's) episodes
    async fn fetch_show_episodes(&self, link: &Link, options: FetchOptions) -> Result<TrackList> {
        let _ = options;
        Err(self.unsupported(LinkType::Show, link.url()))
    }

    /// Fetch a single show episode
    async fn fetch_episode(&self, link: &Link) -> Result<Track> {
        Err(self.unsupported(LinkType::Episode, link.url()))
    }

    /// Fetch the tracks listed under a tag or genre
    async fn fetch_tag_or_genre(&self, link: &Link, options: FetchOptions) -> Result<TrackList> {
        let _ = options;
        Err(self.unsupported(LinkType::TagOrGenre, link.url()))
    }

    /// Fetch a discover/curated page
    async fn fetch_discover(&self, link: &Link, options: FetchOptions) -> Result<TrackList> {
        let _ = options;
        Err(self.unsupported(LinkType::Discover, link.url()))
    }

    /// Fetch recommendations seeded by a link
    async fn fetch_recommended(&self, link: &Link, options: FetchOptions) -> Result<TrackList> {
        let _ = options;
        Err(self.unsupported(LinkType::Recommended, link.url()))
    }

    /// Describe a collection (album, playlist, artist, user, show)
    async fn fetch_collection(&self, link: &Link, kind: LinkType) -> Result<Collection> {
        Err(self.unsupported(kind, link.url()))
    }

    /// Equivalent links of the same entity on other services (aggregators only)
    async fn fetch_mirrors(&self, link: &Link) -> Result<Vec<Link>> {
        Err(ChorusError::unsupported(self.service_type(), link.url()))
    }

    #[doc(hidden)]
    fn unsupported(&self, kind: LinkType, link: &str) -> ChorusError {
        ChorusError::unsupported_operation(self.service_type(), kind, link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TrackOnly;

    #[async_trait]
    impl ServiceAdapter for TrackOnly {
        fn service_type(&self) -> ServiceType {
            ServiceType::Bandcamp
        }

        async fn resolve_type(&self, _link: &Link) -> Result<LinkType> {
            Ok(LinkType::Track)
        }

        async fn fetch_track(&self, link: &Link) -> Result<Track> {
            Ok(Track::new("song", link.clone()))
        }
    }

    #[tokio::test]
    async fn default_operations_report_unsupported() {
        let adapter = TrackOnly;
        let link = Link::new("https://artist.bandcamp.com/album/x");

        let err = adapter
            .fetch_show_episodes(&link, FetchOptions::default())
            .await
            .unwrap_err();
        assert!(err.is_unsupported());
        assert!(adapter.fetch_mirrors(&link).await.unwrap_err().is_unsupported());
        assert!(adapter.fetch_track(&link).await.is_ok());
    }
}
