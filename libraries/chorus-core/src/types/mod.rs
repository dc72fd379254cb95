mod collection;
mod link;
mod search;
mod service;
mod track;

pub use collection::{Collection, FetchOptions, FetchScope};
pub use link::Link;
pub use search::{SearchQuery, SearchResult, SearchResults};
pub use service::{LinkType, ServiceType};
pub use track::{Track, TrackList};
