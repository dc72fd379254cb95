//! Odesli adapters against a mocked links API

use chorus_bot::odesli::{LookupAdapter, OdesliAdapter, OdesliClient};
use chorus_core::{FetchOptions, Link, LinkType, ServiceAdapter, ServiceType};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SONG_LINK: &str = "https://song.link/s/42";
const SPOTIFY_LINK: &str = "https://open.spotify.com/track/42";

fn song_response() -> serde_json::Value {
    serde_json::json!({
        "entityUniqueId": "SPOTIFY_SONG::42",
        "pageUrl": SONG_LINK,
        "linksByPlatform": {
            "spotify": {"url": SPOTIFY_LINK, "entityUniqueId": "SPOTIFY_SONG::42"},
            "soundcloud": {"url": "https://soundcloud.com/band/song", "entityUniqueId": "SOUNDCLOUD_SONG::7"},
            "tidal": {"url": "https://listen.tidal.com/track/3", "entityUniqueId": "TIDAL_SONG::3"}
        },
        "entitiesByUniqueId": {
            "SPOTIFY_SONG::42": {"id": "42", "type": "song", "title": "Song", "artistName": "Band"}
        }
    })
}

async fn client_for(server: &MockServer) -> Arc<OdesliClient> {
    Arc::new(
        OdesliClient::new(format!("{}/v1-alpha.1/links", server.uri()), Duration::from_secs(5))
            .unwrap(),
    )
}

#[tokio::test]
async fn aggregator_returns_playable_mirrors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1-alpha.1/links"))
        .and(query_param("url", SONG_LINK))
        .respond_with(ResponseTemplate::new(200).set_body_json(song_response()))
        .expect(2)
        .mount(&server)
        .await;

    let adapter = OdesliAdapter::new(client_for(&server).await);
    let link = Link::new(SONG_LINK);

    let mirrors = adapter.fetch_mirrors(&link).await.unwrap();
    let services: Vec<ServiceType> = mirrors.iter().map(Link::service_type).collect();
    assert_eq!(services, [ServiceType::SoundCloud, ServiceType::Spotify]);

    let track = adapter.fetch_track(&link).await.unwrap();
    assert_eq!(track.title, "Song");
    assert_eq!(track.artists, ["Band"]);
    assert!(!track.playable);
}

#[tokio::test]
async fn lookup_adapter_classifies_and_fetches() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1-alpha.1/links"))
        .and(query_param("url", SPOTIFY_LINK))
        .respond_with(ResponseTemplate::new(200).set_body_json(song_response()))
        .mount(&server)
        .await;

    let adapter = LookupAdapter::new(client_for(&server).await, ServiceType::Spotify);
    let link = Link::new(SPOTIFY_LINK);

    assert_eq!(adapter.resolve_type(&link).await.unwrap(), LinkType::Track);
    let track = adapter.fetch_track(&link).await.unwrap();
    assert_eq!(track.title, "Song");
    assert!(track.playable);

    // Collections are not served by lookups
    let err = adapter
        .fetch_album_tracks(&link, FetchOptions::default())
        .await
        .unwrap_err();
    assert!(err.is_unsupported());
}

#[tokio::test]
async fn unknown_link_is_a_resolution_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1-alpha.1/links"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let adapter = OdesliAdapter::new(client_for(&server).await);
    let err = adapter
        .fetch_mirrors(&Link::new(SONG_LINK))
        .await
        .unwrap_err();
    assert!(err.is_resolution_failure());
}

#[tokio::test]
async fn rejected_link_is_unsupported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1-alpha.1/links"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    let adapter = OdesliAdapter::new(client_for(&server).await);
    let err = adapter
        .resolve_type(&Link::new(SONG_LINK))
        .await
        .unwrap_err();
    assert!(err.is_unsupported());
}

#[tokio::test]
async fn malformed_body_is_a_resolution_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1-alpha.1/links"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let adapter = OdesliAdapter::new(client_for(&server).await);
    let err = adapter
        .fetch_mirrors(&Link::new(SONG_LINK))
        .await
        .unwrap_err();
    assert!(err.is_resolution_failure());
}
