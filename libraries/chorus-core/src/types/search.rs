//! Service-shorthand search queries and their results

use super::link::Link;
use super::service::{LinkType, ServiceType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A query of the form `<service> <type> <text>`, e.g. `sp track daft punk`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub service: ServiceType,
    pub kind: LinkType,
    pub text: String,
}

impl SearchQuery {
    pub fn new(service: ServiceType, kind: LinkType, text: impl Into<String>) -> Self {
        Self {
            service,
            kind,
            text: text.into(),
        }
    }

    /// Parse `<service> <type> <text...>`
    ///
    /// Returns `None` when the first two words are not a known service
    /// shorthand and search type, or the text is empty.
    pub fn parse(input: &str) -> Option<Self> {
        let mut words = input.split_whitespace();
        let service = words.next()?.parse::<ServiceType>().ok()?;
        if !ServiceType::PLAYABLE.contains(&service) {
            return None;
        }
        let kind = words.next()?.parse::<LinkType>().ok()?;
        let text = words.collect::<Vec<_>>().join(" ");
        if text.is_empty() {
            return None;
        }
        Some(Self::new(service, kind, text))
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.service.shorthand(), self.kind, self.text)
    }
}

/// One search hit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub kind: LinkType,
    pub title: String,
    pub subtitle: Option<String>,
    pub link: Link,
}

/// Ordered search hits, best match first
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResults {
    pub results: Vec<SearchResult>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn first_link(&self) -> Option<&Link> {
        self.results.first().map(|r| &r.link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_shorthand_query() {
        let query = SearchQuery::parse("sp track daft punk  one more time").unwrap();
        assert_eq!(query.service, ServiceType::Spotify);
        assert_eq!(query.kind, LinkType::Track);
        assert_eq!(query.text, "daft punk one more time");
    }

    #[test]
    fn rejects_non_queries() {
        assert!(SearchQuery::parse("https://open.spotify.com/track/abc").is_none());
        assert!(SearchQuery::parse("sp track").is_none());
        assert!(SearchQuery::parse("sp banana text").is_none());
        assert!(SearchQuery::parse("sl track text").is_none());
    }
}
