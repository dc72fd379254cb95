//! Chorus - Link Resolution
//!
//! Turns user input (urls, platform URIs, `sp track <name>` queries) into
//! tracks, through the adapter registered for each music service.
//!
//! This crate provides:
//! - `ServiceRegistry`: `ServiceType` to adapter lookup
//! - `TrackCache`: session-long memo of fetched track lists
//! - `LinkResolver`: normalization, classification, cached fetch dispatch
//!   and aggregator mirror probing
//!
//! # Locking
//!
//! The cache lock is only held for the in-memory lookup or insert, never
//! across an adapter call.

mod cache;
mod registry;
mod resolver;

pub use cache::TrackCache;
pub use registry::ServiceRegistry;
pub use resolver::{FetchResult, LinkResolver};
