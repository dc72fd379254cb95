//! Player control, vote-skip, and queue/cache maintenance

use super::{AddRequest, CommandExecutor};
use crate::format;
use crate::outcome::{CommandOutcome, Payload};
use chorus_core::{ChorusError, Track};
use chorus_playback::{QueueError, QueueEvent, QueueState, VoteOutcome};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// What `queue-clear` empties
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClearScope {
    #[default]
    Queue,
    Cache,
    All,
}

impl FromStr for ClearScope {
    type Err = ChorusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "queue" => Ok(Self::Queue),
            "cache" => Ok(Self::Cache),
            "all" | "both" => Ok(Self::All),
            other => Err(ChorusError::invalid_input(format!(
                "unknown clear scope '{other}' (use queue, cache or all)"
            ))),
        }
    }
}

fn now_playing_outcome(prefix: &str, track: Option<Track>) -> CommandOutcome {
    match track {
        Some(track) => CommandOutcome::success(format!(
            "{prefix}Now playing: {}",
            format::track_line(&track)
        ))
        .with_payload(Payload::Track(track)),
        None => CommandOutcome::success(format!("{prefix}Queue finished")),
    }
}

impl CommandExecutor {
    /// Start playing from a stopped queue
    pub async fn start(&self) -> CommandOutcome {
        let mut queue = self.state.queue.write().await;
        match queue.start() {
            Ok(track) => now_playing_outcome("", Some(track.clone())),
            Err(QueueError::AlreadyActive(state)) => CommandOutcome::failure(format!(
                "Playback is already {state}; use queue-resume or queue-skip"
            )),
            Err(e) => e.into(),
        }
    }

    /// Add `links` (if any), then start when stopped or resume when paused
    pub async fn play(&self, links: &[String], request: AddRequest) -> CommandOutcome {
        let added = if links.is_empty() {
            None
        } else {
            let outcome = self.add_tracks(links, request).await;
            if outcome.tracks().map_or(true, |t| t.is_empty()) {
                return outcome;
            }
            Some(outcome)
        };

        let state = self.state.queue.read().await.state();
        let started = match state {
            QueueState::Stopped => self.start().await,
            QueueState::Paused => self.resume().await,
            QueueState::Playing => CommandOutcome::success("Already playing"),
        };

        match added {
            Some(added) => CommandOutcome {
                success: added.success && started.success,
                message: format!("{}\n{}", added.message, started.message),
                payload: added.payload,
            },
            None => started,
        }
    }

    pub async fn pause(&self) -> CommandOutcome {
        match self.state.queue.write().await.pause() {
            Ok(()) => CommandOutcome::success("Paused"),
            Err(e) => e.into(),
        }
    }

    pub async fn resume(&self) -> CommandOutcome {
        match self.state.queue.write().await.resume() {
            Ok(()) => CommandOutcome::success("Resumed"),
            Err(e) => e.into(),
        }
    }

    /// Stop playback; upcoming tracks are kept
    pub async fn stop(&self) -> CommandOutcome {
        let mut queue = self.state.queue.write().await;
        if queue.state() == QueueState::Stopped {
            return CommandOutcome::failure("Playback is already stopped");
        }
        queue.stop();
        self.state.votes.lock().await.reset();
        CommandOutcome::success("Stopped")
    }

    /// Skip the current track and drop pending skip votes
    pub async fn skip(&self) -> CommandOutcome {
        let mut queue = self.state.queue.write().await;
        let next = queue.skip().map(|track| track.cloned());
        self.state.votes.lock().await.reset();
        drop(queue);

        match next {
            Ok(track) => now_playing_outcome("Skipped. ", track),
            Err(e) => e.into(),
        }
    }

    /// Register `voter`'s skip vote; skips once every member but the bot voted
    pub async fn vote_skip(&self, members: &[String], voter: &str) -> CommandOutcome {
        let mut queue = self.state.queue.write().await;
        if !queue.state().is_active() {
            return CommandOutcome::failure("Nothing is playing");
        }

        let mut votes = self.state.votes.lock().await;
        match votes.vote(members, voter, &self.state.settings.bot_name) {
            VoteOutcome::Passed => {
                votes.reset();
                let next = queue.skip().map(|track| track.cloned());
                info!(voter, "Vote skip passed");
                match next {
                    Ok(track) => now_playing_outcome("Vote passed, skipping. ", track),
                    Err(e) => e.into(),
                }
            }
            VoteOutcome::Pending { missing } => CommandOutcome::failure(format!(
                "{voter} voted to skip. Waiting for: {}",
                missing.join(", ")
            )),
            VoteOutcome::NotPresent => {
                CommandOutcome::failure(format!("{voter} is not in the channel"))
            }
        }
    }

    /// The external player finished the current track
    ///
    /// Advances the queue and drops pending skip votes. Returns the new
    /// current track.
    pub async fn track_ended(&self) -> Option<Track> {
        let mut queue = self.state.queue.write().await;
        let next = queue.track_ended().cloned();
        self.state.votes.lock().await.reset();
        next
    }

    /// Position/length of the current track, as reported by the player
    pub async fn update_progress(&self, position: Duration, length: Duration) {
        self.state
            .queue
            .write()
            .await
            .update_progress(position, length);
    }

    /// Queue events recorded since the last call, oldest first
    pub async fn drain_events(&self) -> Vec<QueueEvent> {
        self.state.queue.write().await.drain_events()
    }

    pub async fn shuffle(&self) -> CommandOutcome {
        let mut queue = self.state.queue.write().await;
        if queue.is_empty() {
            return QueueError::EmptyQueue.into();
        }
        queue.shuffle();
        CommandOutcome::success(format!("Shuffled {} tracks", queue.len()))
    }

    pub async fn clear(&self, scope: ClearScope) -> CommandOutcome {
        let mut parts = Vec::new();
        if matches!(scope, ClearScope::Queue | ClearScope::All) {
            let mut queue = self.state.queue.write().await;
            let count = queue.len();
            queue.clear();
            parts.push(format!("Cleared {count} tracks from the queue"));
        }
        if matches!(scope, ClearScope::Cache | ClearScope::All) {
            let count = self.state.resolver.cache().clear().await;
            parts.push(format!("Cleared {count} cache entries"));
        }
        CommandOutcome::success(parts.join("\n"))
    }
}
