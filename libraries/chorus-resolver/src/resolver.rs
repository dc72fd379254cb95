//! Link resolution and cached fetch dispatch

use crate::cache::TrackCache;
use crate::registry::ServiceRegistry;
use chorus_core::{
    ChorusError, Collection, FetchOptions, Link, LinkType, Result, SearchQuery, SearchResults,
    ServiceAdapter, ServiceType, Track, TrackList,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Tracks fetched for one link
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchResult {
    /// Playable tracks in source order
    pub tracks: TrackList,
    /// Unplayable entries filtered out of `tracks`
    pub excluded: TrackList,
}

impl FetchResult {
    fn from_tracks(tracks: TrackList) -> Self {
        let (tracks, excluded) = tracks.partition_playable();
        Self { tracks, excluded }
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty() && self.excluded.is_empty()
    }
}

/// Resolves user input into links and links into tracks
///
/// Owns the adapter registry and the track cache. Adapter failures that
/// persist past the adapter's own retries become empty results, so one broken
/// link cannot abort a batch.
pub struct LinkResolver {
    registry: ServiceRegistry,
    cache: TrackCache,
    mirror_priority: Vec<ServiceType>,
}

impl LinkResolver {
    /// Create a resolver probing aggregator mirrors in the default order
    pub fn new(registry: ServiceRegistry) -> Self {
        Self::with_priority(registry, ServiceType::PLAYABLE.to_vec())
    }

    pub fn with_priority(registry: ServiceRegistry, mirror_priority: Vec<ServiceType>) -> Self {
        Self {
            registry,
            cache: TrackCache::new(),
            mirror_priority,
        }
    }

    pub fn registry(&self) -> &ServiceRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &TrackCache {
        &self.cache
    }

    pub fn mirror_priority(&self) -> &[ServiceType] {
        &self.mirror_priority
    }

    /// Turn raw input into a canonical link
    ///
    /// Service-shorthand queries (`sp track <name>`) resolve to the first
    /// search hit. Aggregator links get their per-service mirrors attached.
    ///
    /// # Errors
    /// `InvalidLink` for input that is neither a url nor a query,
    /// `ResolutionFailed` when a query has no hits
    pub async fn resolve(&self, raw: &str) -> Result<Link> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ChorusError::invalid_input("empty link"));
        }

        if let Some(query) = SearchQuery::parse(raw) {
            let results = self.search(&query, 1).await?;
            let link = results
                .first_link()
                .ok_or_else(|| ChorusError::resolution_failed(raw, "no search results"))?;
            debug!(query = %query, link = %link, "Resolved query");
            return Ok(link.clean());
        }

        let link = Link::new(raw);
        if !link.is_url() {
            return Err(ChorusError::InvalidLink(raw.to_string()));
        }
        let link = link.clean();

        if link.service_type() != ServiceType::Aggregator {
            return Ok(link);
        }

        let mirrors = self.fetch_mirrors(&link).await?;
        debug!(link = %link, mirrors = mirrors.len(), "Resolved aggregator link");
        Ok(link.with_alternatives(mirrors))
    }

    /// Classify a link through its owning adapter
    ///
    /// # Errors
    /// `UnsupportedLinkKind` (or `ServiceNotRegistered`) when no adapter can
    /// classify the link
    pub async fn classify(&self, link: &Link) -> Result<LinkType> {
        let adapter = self.registry.get(link.service_type())?;
        let kind = adapter.resolve_type(link).await?;
        debug!(link = %link, %kind, "Classified link");
        Ok(kind)
    }

    /// Fetch the tracks behind `link`, through the cache
    ///
    /// Unplayable entries are moved to [`FetchResult::excluded`]. Persistent
    /// adapter failures yield an empty result and are not cached.
    ///
    /// # Errors
    /// Only "not supported" errors: unregistered service or a link kind the
    /// adapter has no operation for
    pub async fn fetch(
        &self,
        link: &Link,
        kind: LinkType,
        options: FetchOptions,
    ) -> Result<FetchResult> {
        if let Some(cached) = self.cache.get(link, options).await {
            return Ok(FetchResult::from_tracks(cached));
        }

        let fetched = match self.fetch_uncached(link, kind, options).await {
            Ok(tracks) => tracks.truncated(options.limit),
            Err(e) if e.is_resolution_failure() => {
                warn!(link = %link, %kind, error = %e, "Fetch failed, treating as no results");
                return Ok(FetchResult::default());
            }
            Err(e) => return Err(e),
        };

        info!(link = %link, %kind, count = fetched.len(), "Fetched tracks");
        self.cache.put(link.clone(), fetched.clone(), options).await;
        Ok(FetchResult::from_tracks(fetched))
    }

    /// Search one service's catalog
    pub async fn search(&self, query: &SearchQuery, limit: usize) -> Result<SearchResults> {
        let adapter = self.registry.get(query.service)?;
        adapter.search(query, limit).await
    }

    /// Describe a collection, asking the preferred mirror for aggregator links
    pub async fn describe(&self, link: &Link, kind: LinkType) -> Result<Collection> {
        if link.service_type() == ServiceType::Aggregator {
            for mirror in self.prioritized_mirrors(link).await? {
                let Ok(adapter) = self.registry.get(mirror.service_type()) else {
                    continue;
                };
                match adapter.fetch_collection(&mirror, kind).await {
                    Ok(collection) => return Ok(collection),
                    Err(e) => debug!(mirror = %mirror, error = %e, "Mirror could not describe"),
                }
            }
            return Err(ChorusError::unsupported(ServiceType::Aggregator, link.url()));
        }
        let adapter = self.registry.get(link.service_type())?;
        adapter.fetch_collection(link, kind).await
    }

    async fn fetch_uncached(
        &self,
        link: &Link,
        kind: LinkType,
        options: FetchOptions,
    ) -> Result<TrackList> {
        if link.service_type() == ServiceType::Aggregator {
            return if kind.is_collection() {
                self.fetch_aggregated_collection(link, kind, options).await
            } else {
                Ok(TrackList::new(vec![self.fetch_aggregated_track(link).await?]))
            };
        }

        let adapter = self.registry.get(link.service_type())?;
        dispatch(adapter.as_ref(), link, kind, options).await
    }

    /// Probe mirrors in priority order and keep the first playable one
    ///
    /// The winning track's link carries the other mirrors and the aggregator
    /// link itself as alternatives. When mirrors answered but none is
    /// playable, the first answer is returned flagged unplayable. When no
    /// mirror answered at all the mirror errors are returned instead, so
    /// nothing gets cached.
    async fn fetch_aggregated_track(&self, link: &Link) -> Result<Track> {
        let mirrors = self.prioritized_mirrors(link).await?;
        let mut fallback: Option<Track> = None;
        let mut errors = MirrorErrors::default();

        for mirror in &mirrors {
            let adapter = match self.registry.get(mirror.service_type()) {
                Ok(adapter) => adapter,
                Err(e) => {
                    debug!(mirror = %mirror, "No adapter for mirror, skipping");
                    errors.record(e);
                    continue;
                }
            };
            match adapter.fetch_track(mirror).await {
                Ok(track) if track.playable => {
                    debug!(link = %link, mirror = %mirror, "Selected playable mirror");
                    return Ok(with_mirror_links(track, link, &mirrors));
                }
                Ok(track) => {
                    debug!(mirror = %mirror, "Mirror not playable");
                    fallback.get_or_insert(track);
                }
                Err(e) => {
                    warn!(mirror = %mirror, error = %e, "Mirror fetch failed");
                    errors.record(e);
                }
            }
        }

        match fallback {
            Some(track) => {
                warn!(link = %link, "No playable mirror");
                Ok(with_mirror_links(track, link, &mirrors).with_playable(false))
            }
            None => Err(errors.into_error(link)),
        }
    }

    /// Expand an aggregator collection through the first mirror that yields tracks
    ///
    /// An empty answer from any mirror is a valid (cacheable) result; only
    /// when every mirror failed are the errors returned.
    async fn fetch_aggregated_collection(
        &self,
        link: &Link,
        kind: LinkType,
        options: FetchOptions,
    ) -> Result<TrackList> {
        let mut answered = false;
        let mut errors = MirrorErrors::default();

        for mirror in self.prioritized_mirrors(link).await? {
            let adapter = match self.registry.get(mirror.service_type()) {
                Ok(adapter) => adapter,
                Err(e) => {
                    errors.record(e);
                    continue;
                }
            };
            match dispatch(adapter.as_ref(), &mirror, kind, options).await {
                Ok(tracks) if !tracks.is_empty() => return Ok(tracks),
                Ok(_) => {
                    debug!(mirror = %mirror, "Mirror collection empty");
                    answered = true;
                }
                Err(e) => {
                    debug!(mirror = %mirror, error = %e, "Mirror collection failed");
                    errors.record(e);
                }
            }
        }

        if answered {
            Ok(TrackList::default())
        } else {
            Err(errors.into_error(link))
        }
    }

    /// Mirrors of an aggregator link, ordered by service priority
    ///
    /// Mirrors of services missing from the priority list are dropped.
    async fn prioritized_mirrors(&self, link: &Link) -> Result<Vec<Link>> {
        let mirrors = if link.alternative_links().is_empty() {
            self.fetch_mirrors(link).await?
        } else {
            link.alternative_links().to_vec()
        };

        Ok(self
            .mirror_priority
            .iter()
            .flat_map(|service| {
                mirrors
                    .iter()
                    .filter(move |m| m.service_type() == *service)
                    .cloned()
            })
            .collect())
    }

    async fn fetch_mirrors(&self, link: &Link) -> Result<Vec<Link>> {
        let adapter = self.registry.get(ServiceType::Aggregator)?;
        match adapter.fetch_mirrors(link).await {
            Ok(mirrors) => Ok(mirrors.iter().map(Link::clean).collect()),
            Err(e) if e.is_resolution_failure() => {
                warn!(link = %link, error = %e, "Mirror lookup failed");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }
}

impl std::fmt::Debug for LinkResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkResolver")
            .field("registry", &self.registry)
            .field("mirror_priority", &self.mirror_priority)
            .finish_non_exhaustive()
    }
}

/// Call the adapter operation matching `kind`
async fn dispatch(
    adapter: &dyn ServiceAdapter,
    link: &Link,
    kind: LinkType,
    options: FetchOptions,
) -> Result<TrackList> {
    debug!(service = %adapter.service_type(), link = %link, %kind, "Dispatching fetch");
    match kind {
        LinkType::Track => Ok(TrackList::new(vec![adapter.fetch_track(link).await?])),
        LinkType::Episode => Ok(TrackList::new(vec![adapter.fetch_episode(link).await?])),
        LinkType::Album => adapter.fetch_album_tracks(link, options).await,
        LinkType::Playlist | LinkType::SystemPlaylist => {
            adapter.fetch_playlist_tracks(link, options).await
        }
        LinkType::Show => adapter.fetch_show_episodes(link, options).await,
        LinkType::Artist => adapter.fetch_artist_tracks(link, options).await,
        LinkType::User | LinkType::Channel | LinkType::Tracks => {
            adapter.fetch_user_tracks(link, options).await
        }
        LinkType::Likes => adapter.fetch_likes(link, options).await,
        LinkType::Reposts => adapter.fetch_reposts(link, options).await,
        LinkType::TagOrGenre => adapter.fetch_tag_or_genre(link, options).await,
        LinkType::Discover => adapter.fetch_discover(link, options).await,
        LinkType::Recommended => adapter.fetch_recommended(link, options).await,
        LinkType::Query | LinkType::Other => {
            Err(ChorusError::unsupported(adapter.service_type(), link.url()))
        }
    }
}

/// Why no mirror of an aggregator link could be fetched
#[derive(Default)]
struct MirrorErrors {
    failure: Option<ChorusError>,
    unsupported: Option<ChorusError>,
}

impl MirrorErrors {
    fn record(&mut self, error: ChorusError) {
        if error.is_unsupported() {
            self.unsupported = Some(error);
        } else {
            self.failure = Some(error);
        }
    }

    /// A lookup failure wins over "unsupported": retrying may still succeed
    fn into_error(self, link: &Link) -> ChorusError {
        match (self.failure, self.unsupported) {
            (Some(failure), _) if failure.is_resolution_failure() => failure,
            (Some(failure), _) => ChorusError::resolution_failed(link.url(), failure.to_string()),
            (None, Some(unsupported)) => unsupported,
            (None, None) => ChorusError::resolution_failed(link.url(), "no mirrors found"),
        }
    }
}

/// Point a mirror's track at every other mirror and the aggregator link
fn with_mirror_links(mut track: Track, aggregator: &Link, mirrors: &[Link]) -> Track {
    let alternatives: Vec<Link> = std::iter::once(aggregator.clone().with_alternatives(Vec::new()))
        .chain(mirrors.iter().filter(|m| **m != track.link).cloned())
        .collect();
    track.link = track.link.clone().with_alternatives(alternatives);
    track
}
