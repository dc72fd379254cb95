//! Links to remote music entities
//!
//! A `Link` is compared by its normalized url: scheme forced to https,
//! `www.`/`m.` host prefixes and tracking parameters dropped, platform URIs
//! (`spotify:track:...`) and short hosts (`youtu.be`) expanded.

use super::service::ServiceType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use url::Url;

/// Query parameters that only carry tracking/presentation state
const TRACKING_PARAMS: &[&str] = &[
    "si",
    "feature",
    "pp",
    "ref",
    "ref_src",
    "nd",
    "app",
    "go",
    "context",
    "ab_channel",
    "fbclid",
    "gclid",
    "igshid",
    "in",
];

/// Normalized reference to a remote track/album/playlist/etc.
///
/// `alternative_links` holds mirrors of the same logical entity on other
/// services, populated by aggregator resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    url: String,
    id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    alternative_links: Vec<Link>,
}

impl Link {
    /// Create a link from user input
    ///
    /// Strips chat adornments (`[URL]` tags, trailing commas, angle brackets)
    /// and expands platform URIs, but keeps query parameters; use
    /// [`Link::clean`] to drop tracking state.
    pub fn new(raw: impl AsRef<str>) -> Self {
        let url = expand(&strip_adornments(raw.as_ref()));
        let id = extract_id(&normalize(&url));
        Self {
            url,
            id,
            alternative_links: Vec::new(),
        }
    }

    /// Copy of this link with mirrors attached
    #[must_use]
    pub fn with_alternatives(mut self, alternatives: Vec<Link>) -> Self {
        self.alternative_links = alternatives;
        self
    }

    /// Copy of this link with tracking parameters removed
    #[must_use]
    pub fn clean(&self) -> Self {
        Self {
            url: normalize(&self.url),
            id: self.id.clone(),
            alternative_links: self.alternative_links.iter().map(Link::clean).collect(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Service-specific identifier (track id, video id, `user/slug`, ...)
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn alternative_links(&self) -> &[Link] {
        &self.alternative_links
    }

    /// The form used for equality and cache lookups
    pub fn normalized(&self) -> String {
        normalize(&self.url)
    }

    /// Service owning this link, derived from its host
    pub fn service_type(&self) -> ServiceType {
        match Url::parse(&self.normalized()) {
            Ok(url) => url
                .host_str()
                .map_or(ServiceType::Other, ServiceType::from_host),
            Err(_) => ServiceType::Other,
        }
    }

    /// Whether the input parsed as an http(s) url at all
    pub fn is_url(&self) -> bool {
        Url::parse(&self.url).is_ok_and(|u| matches!(u.scheme(), "http" | "https"))
    }

    /// Mirror-aware equality
    ///
    /// True when this link or any of its mirrors equals `other` or any of
    /// `other`'s mirrors.
    pub fn matches(&self, other: &Link) -> bool {
        let ours: Vec<String> = self.candidates().collect();
        other.candidates().any(|candidate| ours.contains(&candidate))
    }

    fn candidates(&self) -> impl Iterator<Item = String> + '_ {
        std::iter::once(self.normalized())
            .chain(self.alternative_links.iter().map(Link::normalized))
    }
}

impl PartialEq for Link {
    fn eq(&self, other: &Self) -> bool {
        self.normalized() == other.normalized()
    }
}

impl Eq for Link {}

impl Hash for Link {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalized().hash(state);
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

impl From<&str> for Link {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// Remove chat presentation artifacts around a link
fn strip_adornments(raw: &str) -> String {
    let mut text = raw.trim().to_string();
    for tag in ["[URL]", "[/URL]", "[url]", "[/url]"] {
        text = text.replace(tag, "");
    }
    text.trim()
        .trim_end_matches(',')
        .trim_start_matches('<')
        .trim_end_matches('>')
        .trim()
        .to_string()
}

/// Expand platform URIs and scheme-less hosts into full urls
fn expand(text: &str) -> String {
    if let Some(rest) = text.strip_prefix("spotify:") {
        let path = rest.split(':').collect::<Vec<_>>().join("/");
        return format!("https://open.spotify.com/{path}");
    }
    let looks_like_host = !text.contains("://")
        && !text.contains(char::is_whitespace)
        && text.split('/').next().is_some_and(|host| host.contains('.'))
        && text.contains('/');
    if looks_like_host {
        return format!("https://{text}");
    }
    text.to_string()
}

fn normalize(text: &str) -> String {
    let Ok(mut url) = Url::parse(text) else {
        return text.to_string();
    };
    if !matches!(url.scheme(), "http" | "https") {
        return url.to_string();
    }
    let _ = url.set_scheme("https");

    if let Some(host) = url.host_str().map(str::to_ascii_lowercase) {
        let trimmed = host
            .strip_prefix("www.")
            .or_else(|| host.strip_prefix("m."))
            .unwrap_or(host.as_str())
            .to_string();
        if trimmed == "youtu.be" {
            rewrite_short_youtube(&mut url);
        } else if trimmed != host {
            let _ = url.set_host(Some(&trimmed));
        }
    }

    // open.spotify.com/intl-de/track/... carries a locale segment
    let segments: Vec<String> = url
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).map(str::to_string).collect())
        .unwrap_or_default();
    if segments.first().is_some_and(|s| s.starts_with("intl-")) {
        url.set_path(&segments[1..].join("/"));
    } else if url.path().len() > 1 && url.path().ends_with('/') {
        let path = url.path().trim_end_matches('/').to_string();
        url.set_path(&path);
    }

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !is_tracking_param(key))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    if kept.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(kept);
    }
    url.set_fragment(None);
    url.to_string()
}

fn is_tracking_param(key: &str) -> bool {
    key.starts_with("utm_") || TRACKING_PARAMS.contains(&key)
}

/// `youtu.be/<id>?t=1` -> `youtube.com/watch?v=<id>&t=1`
fn rewrite_short_youtube(url: &mut Url) {
    let video = url.path().trim_matches('/').to_string();
    let rest: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    let _ = url.set_host(Some("youtube.com"));
    url.set_path("watch");
    let mut pairs = url.query_pairs_mut();
    pairs.clear().append_pair("v", &video);
    pairs.extend_pairs(rest);
}

fn extract_id(normalized: &str) -> String {
    let Ok(url) = Url::parse(normalized) else {
        return normalized.to_string();
    };
    let param = |name: &str| {
        url.query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    };
    let last_segment = || {
        url.path_segments()
            .and_then(|mut s| s.next_back().map(str::to_string))
            .unwrap_or_default()
    };
    match url.host_str().map_or(ServiceType::Other, ServiceType::from_host) {
        ServiceType::Spotify | ServiceType::Aggregator => last_segment(),
        ServiceType::YouTube => param("v")
            .or_else(|| param("list"))
            .unwrap_or_else(last_segment),
        ServiceType::AppleMusic => param("i").unwrap_or_else(last_segment),
        ServiceType::SoundCloud | ServiceType::Bandcamp => {
            url.path().trim_matches('/').to_string()
        }
        ServiceType::Other => normalized.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_chat_adornments() {
        let link = Link::new("[URL]https://open.spotify.com/track/abc[/URL],");
        assert_eq!(link.url(), "https://open.spotify.com/track/abc");
    }

    #[test]
    fn tracking_parameters_do_not_affect_equality() {
        let a = Link::new("https://open.spotify.com/track/abc?si=123");
        let b = Link::new("https://open.spotify.com/track/abc");
        assert_eq!(a, b);
        assert_eq!(a.clean().url(), "https://open.spotify.com/track/abc");
    }

    #[test]
    fn clean_is_a_new_link() {
        let raw = Link::new("https://www.youtube.com/watch?v=dQw4w9WgXcQ&feature=share");
        let cleaned = raw.clean();
        assert_eq!(cleaned.url(), "https://youtube.com/watch?v=dQw4w9WgXcQ");
        assert!(raw.url().contains("feature=share"));
    }

    #[test]
    fn spotify_uri_expands() {
        let link = Link::new("spotify:album:1DFixLWuPkv3KT3TnV35m3");
        assert_eq!(link.service_type(), ServiceType::Spotify);
        assert_eq!(link.id(), "1DFixLWuPkv3KT3TnV35m3");
        assert_eq!(link, Link::new("https://open.spotify.com/album/1DFixLWuPkv3KT3TnV35m3"));
    }

    #[test]
    fn spotify_locale_segment_is_ignored() {
        let a = Link::new("https://open.spotify.com/intl-de/track/abc");
        assert_eq!(a, Link::new("https://open.spotify.com/track/abc"));
    }

    #[test]
    fn short_youtube_links_match_long_form() {
        let short = Link::new("https://youtu.be/dQw4w9WgXcQ");
        let long = Link::new("https://m.youtube.com/watch?v=dQw4w9WgXcQ");
        assert_eq!(short, long);
        assert_eq!(short.id(), "dQw4w9WgXcQ");
        assert_eq!(short.service_type(), ServiceType::YouTube);
    }

    #[test]
    fn scheme_less_input_is_accepted() {
        let link = Link::new("soundcloud.com/artist/song");
        assert!(link.is_url());
        assert_eq!(link.service_type(), ServiceType::SoundCloud);
        assert_eq!(link.id(), "artist/song");
    }

    #[test]
    fn plain_text_is_not_a_url() {
        let link = Link::new("never gonna give you up");
        assert!(!link.is_url());
        assert_eq!(link.service_type(), ServiceType::Other);
    }

    #[test]
    fn mirror_aware_matching() {
        let spotify = Link::new("https://open.spotify.com/track/abc");
        let youtube = Link::new("https://youtube.com/watch?v=xyz");
        let entry = spotify.clone().with_alternatives(vec![youtube.clone()]);
        let selector = Link::new("https://song.link/s/abc")
            .with_alternatives(vec![Link::new("https://youtu.be/xyz")]);

        assert!(entry.matches(&youtube));
        assert!(entry.matches(&selector));
        assert!(!spotify.matches(&selector));
    }
}
