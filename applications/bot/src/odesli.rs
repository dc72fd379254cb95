//! Odesli (song.link) lookups
//!
//! One HTTP call maps any supported link to the same song or album on every
//! other platform. The bot uses it twice:
//! - [`OdesliAdapter`] serves aggregator links (`song.link`, `album.link`, ...)
//!   and returns their per-service mirrors.
//! - [`LookupAdapter`] classifies and describes single-track links of one
//!   platform from the same lookup, for services without a dedicated adapter.

use async_trait::async_trait;
use chorus_core::{ChorusError, Link, LinkType, Result, ServiceAdapter, ServiceType, Track};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OdesliResponse {
    pub entity_unique_id: String,
    #[serde(default)]
    pub page_url: Option<String>,
    #[serde(default)]
    pub links_by_platform: BTreeMap<String, PlatformLink>,
    #[serde(default)]
    pub entities_by_unique_id: HashMap<String, Entity>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformLink {
    pub url: String,
    pub entity_unique_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artist_name: Option<String>,
}

impl OdesliResponse {
    /// The entity the lookup was made for
    pub fn entity(&self) -> Option<&Entity> {
        self.entities_by_unique_id.get(&self.entity_unique_id)
    }

    pub fn link_type(&self) -> LinkType {
        match self.entity().map(|e| e.kind.as_str()) {
            Some("song") => LinkType::Track,
            Some("album") => LinkType::Album,
            _ => LinkType::Other,
        }
    }

    /// Platform links as `Link`s, playable services only, one per url
    pub fn mirrors(&self) -> Vec<Link> {
        let mut mirrors: Vec<Link> = Vec::new();
        for platform in self.links_by_platform.values() {
            let link = Link::new(&platform.url).clean();
            if ServiceType::PLAYABLE.contains(&link.service_type()) && !mirrors.contains(&link) {
                mirrors.push(link);
            }
        }
        mirrors
    }

    /// Track metadata for `link`
    pub fn track(&self, link: &Link) -> Track {
        let entity = self.entity();
        let title = entity
            .and_then(|e| e.title.clone())
            .unwrap_or_else(|| link.url().to_string());
        let artists: Vec<String> = entity
            .and_then(|e| e.artist_name.as_deref())
            .map(|names| names.split(", ").map(str::to_string).collect())
            .unwrap_or_default();
        Track::new(title, link.clone()).with_artists(artists)
    }
}

/// HTTP client for the Odesli links API
#[derive(Debug, Clone)]
pub struct OdesliClient {
    http: Client,
    api_url: String,
}

impl OdesliClient {
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(format!("Chorus/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ChorusError::Network(e.to_string()))?;
        Ok(Self {
            http,
            api_url: api_url.into(),
        })
    }

    /// Look up `link` on every platform Odesli knows
    pub async fn lookup(&self, link: &Link) -> Result<OdesliResponse> {
        debug!(link = %link, "Odesli lookup");
        let response = self
            .http
            .get(&self.api_url)
            .query(&[("url", link.url())])
            .send()
            .await
            .map_err(|e| ChorusError::Network(e.to_string()))?;

        match response.status() {
            status if status.is_success() => response
                .json::<OdesliResponse>()
                .await
                .map_err(|e| ChorusError::resolution_failed(link.url(), e.to_string())),
            StatusCode::BAD_REQUEST => Err(ChorusError::unsupported(
                link.service_type(),
                link.url(),
            )),
            status => Err(ChorusError::resolution_failed(
                link.url(),
                format!("Odesli returned {status}"),
            )),
        }
    }
}

/// Adapter for aggregator links
#[derive(Debug, Clone)]
pub struct OdesliAdapter {
    client: Arc<OdesliClient>,
}

impl OdesliAdapter {
    pub fn new(client: Arc<OdesliClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ServiceAdapter for OdesliAdapter {
    fn service_type(&self) -> ServiceType {
        ServiceType::Aggregator
    }

    async fn resolve_type(&self, link: &Link) -> Result<LinkType> {
        match self.client.lookup(link).await?.link_type() {
            LinkType::Other => Err(ChorusError::unsupported(ServiceType::Aggregator, link.url())),
            kind => Ok(kind),
        }
    }

    /// Metadata only; an aggregator page is never playable itself
    async fn fetch_track(&self, link: &Link) -> Result<Track> {
        let response = self.client.lookup(link).await?;
        Ok(response.track(link).with_playable(false))
    }

    async fn fetch_mirrors(&self, link: &Link) -> Result<Vec<Link>> {
        let mirrors = self.client.lookup(link).await?.mirrors();
        debug!(link = %link, count = mirrors.len(), "Odesli mirrors");
        Ok(mirrors)
    }
}

/// Single-track adapter for one platform, backed by Odesli metadata
///
/// A link Odesli recognizes as a song on its own platform is reported
/// playable. Collections and search are left unsupported.
#[derive(Debug, Clone)]
pub struct LookupAdapter {
    client: Arc<OdesliClient>,
    service: ServiceType,
}

impl LookupAdapter {
    pub fn new(client: Arc<OdesliClient>, service: ServiceType) -> Self {
        Self { client, service }
    }
}

#[async_trait]
impl ServiceAdapter for LookupAdapter {
    fn service_type(&self) -> ServiceType {
        self.service
    }

    async fn resolve_type(&self, link: &Link) -> Result<LinkType> {
        match self.client.lookup(link).await?.link_type() {
            LinkType::Other => Err(ChorusError::unsupported(self.service, link.url())),
            kind => Ok(kind),
        }
    }

    async fn fetch_track(&self, link: &Link) -> Result<Track> {
        let response = self.client.lookup(link).await?;
        let on_platform = response
            .mirrors()
            .iter()
            .any(|mirror| mirror.service_type() == self.service);
        Ok(response.track(link).with_playable(on_platform))
    }
}
