/// Shared bot state
use chorus_playback::{QueueStore, VoteSkipCoordinator};
use chorus_resolver::LinkResolver;
use tokio::sync::{Mutex, RwLock};

/// Settings the executor needs from the host configuration
#[derive(Debug, Clone)]
pub struct BotSettings {
    /// The bot's own chat nickname (never asked to vote)
    pub bot_name: String,
    /// Tracks per collection when no `-l` is given (0 = unlimited)
    pub default_limit: usize,
    /// Results shown by `search` when no `-l` is given
    pub search_limit: usize,
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            bot_name: "chorus".to_string(),
            default_limit: 0,
            search_limit: 5,
        }
    }
}

/// Everything one bot instance owns
///
/// Lock order is queue before votes. Neither lock is held across an
/// adapter call.
#[derive(Debug)]
pub struct BotState {
    pub queue: RwLock<QueueStore>,
    pub votes: Mutex<VoteSkipCoordinator>,
    pub resolver: LinkResolver,
    pub settings: BotSettings,
}

impl BotState {
    pub fn new(resolver: LinkResolver, settings: BotSettings) -> Self {
        Self {
            queue: RwLock::new(QueueStore::new()),
            votes: Mutex::new(VoteSkipCoordinator::new()),
            resolver,
            settings,
        }
    }
}
