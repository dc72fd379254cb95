//! Command execution
//!
//! `CommandExecutor` turns one parsed command into resolver calls and queue
//! mutations and reports a [`CommandOutcome`]. It keeps no state of its own;
//! everything lives in the shared [`BotState`], so any number of commands can
//! run concurrently.
//!
//! Link resolution always happens before the queue lock is taken. Every
//! queue mutation of one command is applied under a single write lock.

mod add;
mod playback;
mod select;

pub use add::AddRequest;
pub use playback::ClearScope;
pub use select::{MatchPolicy, Selector};

use crate::format;
use crate::grammar::{CommandName, ParsedCommand};
use crate::outcome::{CommandOutcome, Payload};
use crate::state::BotState;
use chorus_core::{FetchOptions, Result, SearchQuery};
use chorus_resolver::FetchResult;
use std::sync::Arc;
use tracing::{debug, info};

/// Upcoming entries shown by `queue-list` without `-l`
const DEFAULT_LIST_LIMIT: usize = 10;

/// Who issued a command, and who was in the channel at the time
#[derive(Debug, Clone, Default)]
pub struct CommandContext {
    pub user: String,
    pub members: Vec<String>,
}

impl CommandContext {
    pub fn new(user: impl Into<String>, members: Vec<String>) -> Self {
        Self {
            user: user.into(),
            members,
        }
    }
}

/// Top-level command orchestrator
#[derive(Debug, Clone)]
pub struct CommandExecutor {
    state: Arc<BotState>,
}

impl CommandExecutor {
    pub fn new(state: Arc<BotState>) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &Arc<BotState> {
        &self.state
    }

    /// Run one parsed command
    pub async fn execute(&self, command: &ParsedCommand, ctx: &CommandContext) -> CommandOutcome {
        info!(user = %ctx.user, command = %command.name, args = command.args.len(), "Executing command");
        let flags = &command.flags;
        let args = &command.args;
        let default_limit = self.state.settings.default_limit;

        match command.name {
            CommandName::Help => self.help(args.first().map(String::as_str)),
            CommandName::QueueAdd => {
                self.add_tracks(args, AddRequest::from_flags(flags, false, default_limit))
                    .await
            }
            CommandName::QueuePlayNext => {
                self.add_tracks(args, AddRequest::from_flags(flags, true, default_limit))
                    .await
            }
            CommandName::QueuePlay => {
                self.play(args, AddRequest::from_flags(flags, false, default_limit))
                    .await
            }
            CommandName::QueueList => {
                self.list(flags.limit.unwrap_or(DEFAULT_LIST_LIMIT)).await
            }
            CommandName::QueueDelete => {
                self.delete_tracks(
                    Selector::parse(args),
                    MatchPolicy::from_flags(flags),
                    flags.all_artist_tracks,
                    flags.scope,
                )
                .await
            }
            CommandName::QueueMove => match flags.position {
                Some(position) => {
                    self.move_tracks(Selector::parse(args), position, MatchPolicy::from_flags(flags))
                        .await
                }
                None => CommandOutcome::failure("Give the target position with -p N"),
            },
            CommandName::QueueClear => {
                match args.first().map_or(Ok(ClearScope::Queue), |s| s.parse()) {
                    Ok(scope) => self.clear(scope).await,
                    Err(e) => e.into(),
                }
            }
            CommandName::QueueShuffle => self.shuffle().await,
            CommandName::QueueSkip => self.skip().await,
            CommandName::QueueVoteSkip => self.vote_skip(&ctx.members, &ctx.user).await,
            CommandName::QueueStop => self.stop().await,
            CommandName::QueuePause => self.pause().await,
            CommandName::QueueResume => self.resume().await,
            CommandName::QueueStatus => self.status().await,
            CommandName::QueueNowPlaying => self.now_playing().await,
            CommandName::Search => {
                let limit = flags.limit.unwrap_or(self.state.settings.search_limit);
                self.search(&args.join(" "), limit).await
            }
            CommandName::Info => match args.first() {
                Some(link) => self.info(link).await,
                None => CommandOutcome::failure("Usage: info <link>"),
            },
        }
    }

    /// Resolve, classify, and fetch one link or query
    pub(crate) async fn expand(&self, raw: &str, options: FetchOptions) -> Result<FetchResult> {
        let resolver = &self.state.resolver;
        let link = resolver.resolve(raw).await?;
        let kind = resolver.classify(&link).await?;
        debug!(link = %link, %kind, "Expanding link");
        resolver.fetch(&link, kind, options).await
    }

    pub fn help(&self, topic: Option<&str>) -> CommandOutcome {
        match topic {
            Some(topic) => match topic.trim_start_matches('%').parse::<CommandName>() {
                Ok(name) => CommandOutcome::success(format!(
                    "{name} {}\n{}",
                    name.usage(),
                    name.summary()
                )),
                Err(e) => e.into(),
            },
            None => {
                let lines: Vec<String> = CommandName::ALL
                    .iter()
                    .map(|name| format!("{name}: {}", name.summary()))
                    .collect();
                CommandOutcome::success(lines.join("\n"))
            }
        }
    }

    /// Now playing plus the next `limit` entries (0 = all)
    pub async fn list(&self, limit: usize) -> CommandOutcome {
        let queue = self.state.queue.read().await;
        let text = format::queue(queue.now_playing(), queue.tracks(), limit);
        let tracks = queue.tracks().iter().cloned().collect();
        CommandOutcome::success(text).with_payload(Payload::Tracks(tracks))
    }

    pub async fn status(&self) -> CommandOutcome {
        let queue = self.state.queue.read().await;
        CommandOutcome::success(format::status(
            queue.state(),
            queue.now_playing(),
            queue.progress(),
            queue.len(),
        ))
    }

    pub async fn now_playing(&self) -> CommandOutcome {
        let queue = self.state.queue.read().await;
        match queue.now_playing() {
            Some(track) => CommandOutcome::success(format!(
                "Now playing: {} [{}]",
                format::track_line(track),
                format::progress(queue.progress())
            ))
            .with_payload(Payload::Track(track.clone())),
            None => CommandOutcome::failure("Nothing is playing"),
        }
    }

    /// `search <svc> <type> <text>`
    pub async fn search(&self, text: &str, limit: usize) -> CommandOutcome {
        let Some(query) = SearchQuery::parse(text) else {
            return CommandOutcome::failure(format!(
                "Usage: search {}",
                CommandName::Search.usage()
            ));
        };
        match self.state.resolver.search(&query, limit).await {
            Ok(results) => CommandOutcome::success(format::search_results(&results))
                .with_payload(Payload::Search(results)),
            Err(e) => e.into(),
        }
    }

    /// Details of a track or collection; the queue is not touched
    pub async fn info(&self, raw: &str) -> CommandOutcome {
        let resolver = &self.state.resolver;
        let link = match resolver.resolve(raw).await {
            Ok(link) => link,
            Err(e) => return e.into(),
        };
        let kind = match resolver.classify(&link).await {
            Ok(kind) => kind,
            Err(e) => return e.into(),
        };

        if kind.is_collection() {
            if let Ok(collection) = resolver.describe(&link, kind).await {
                return CommandOutcome::success(format::collection_info(&collection))
                    .with_payload(Payload::Collection(collection));
            }
        }

        match resolver.fetch(&link, kind, FetchOptions::default()).await {
            Ok(result) if kind.is_collection() => {
                let count = result.tracks.len() + result.excluded.len();
                CommandOutcome::success(format!("{kind} with {count} tracks: {link}"))
                    .with_payload(Payload::Tracks(result.tracks))
            }
            Ok(result) => match result.tracks.iter().chain(result.excluded.iter()).next() {
                Some(track) => CommandOutcome::success(format::track_info(track))
                    .with_payload(Payload::Track(track.clone())),
                None => CommandOutcome::failure(format!("Nothing found for {link}")),
            },
            Err(e) => e.into(),
        }
    }
}
