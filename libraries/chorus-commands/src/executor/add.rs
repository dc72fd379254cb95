//! queue-add / queue-playnext

use super::CommandExecutor;
use crate::format;
use crate::grammar::CommandFlags;
use crate::outcome::{CommandOutcome, Payload};
use chorus_core::{FetchOptions, FetchScope, TrackList};
use chorus_playback::{shuffle_tracks, QueueError};
use std::fmt::Write;
use tracing::{info, warn};

/// Unplayable tracks listed by name before the rest are only counted
const MAX_LISTED_EXCLUDED: usize = 10;

/// How resolved tracks are inserted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AddRequest {
    /// Insertion position (`None` appends); ignored when `play_next` is set
    pub position: Option<i64>,
    /// Insert before every upcoming track
    pub play_next: bool,
    pub shuffle: bool,
    pub reverse: bool,
    /// Tracks per collection (0 = unlimited)
    pub limit: usize,
    pub scope: FetchScope,
}

impl AddRequest {
    pub fn from_flags(flags: &CommandFlags, play_next: bool, default_limit: usize) -> Self {
        Self {
            position: flags.position,
            play_next,
            shuffle: flags.shuffle,
            reverse: flags.reverse,
            limit: flags.limit.unwrap_or(default_limit),
            scope: flags.scope,
        }
    }

    fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            limit: self.limit,
            scope: self.scope,
        }
    }
}

impl CommandExecutor {
    /// Resolve `links` and insert their tracks
    ///
    /// Links that fail are reported; tracks of the links that resolved stay
    /// in the queue and the command reports failure overall. A play-next
    /// batch is inserted as one block at the front, so the first link
    /// submitted plays soonest.
    pub async fn add_tracks(&self, links: &[String], request: AddRequest) -> CommandOutcome {
        if links.is_empty() {
            return CommandOutcome::failure("No links given");
        }
        if let (Some(position), false) = (request.position, request.play_next) {
            let len = self.state.queue.read().await.len();
            if position < 0 || position as usize > len {
                return QueueError::invalid_position(position, len).into();
            }
        }

        let mut batch = TrackList::default();
        let mut excluded = TrackList::default();
        let mut failures: Vec<String> = Vec::new();

        for raw in links {
            let result = match self.expand(raw, request.fetch_options()).await {
                Ok(result) => result,
                Err(e) => {
                    warn!(link = %raw, error = %e, "Could not add link");
                    failures.push(format!("{raw}: {e}"));
                    continue;
                }
            };
            excluded.extend(result.excluded);
            if result.tracks.is_empty() {
                failures.push(format!("{raw}: no playable tracks found"));
                continue;
            }

            batch.extend(if request.reverse {
                result.tracks.reversed()
            } else {
                result.tracks
            });
        }

        if request.shuffle {
            shuffle_tracks(batch.as_mut_slice());
        }

        let position = if batch.is_empty() {
            None
        } else {
            let mut queue = self.state.queue.write().await;
            let len = queue.len();
            let position = match (request.play_next, request.position) {
                (true, _) => 0,
                // The queue may have shrunk while links were resolving
                (false, Some(p)) => (p as usize).min(len),
                (false, None) => len,
            };
            match queue.insert_at(batch.clone(), position) {
                Ok(position) => Some(position),
                Err(e) => return e.into(),
            }
        };

        info!(added = batch.len(), excluded = excluded.len(), failed = failures.len(), "Added tracks");
        let message = add_message(&batch, position, &excluded, &failures);
        let outcome = if failures.is_empty() {
            CommandOutcome::success(message)
        } else {
            CommandOutcome::failure(message)
        };
        outcome.with_payload(Payload::Tracks(batch))
    }
}

fn add_message(
    added: &TrackList,
    position: Option<usize>,
    excluded: &TrackList,
    failures: &[String],
) -> String {
    let mut out = String::new();
    match (added.len(), position) {
        (0, _) | (_, None) => out.push_str("No tracks added"),
        (1, Some(position)) => {
            let _ = write!(
                out,
                "Added {} at position {position}",
                format::track_line(&added.as_slice()[0])
            );
        }
        (n, Some(position)) => {
            let _ = write!(out, "Added {n} tracks at position {position}");
        }
    }

    if !excluded.is_empty() {
        let _ = write!(out, "\nSkipped {} unplayable tracks:", excluded.len());
        for track in excluded.iter().take(MAX_LISTED_EXCLUDED) {
            let _ = write!(out, "\n  - {}", format::track_line(track));
        }
        if excluded.len() > MAX_LISTED_EXCLUDED {
            let _ = write!(out, "\n  ... and {} more", excluded.len() - MAX_LISTED_EXCLUDED);
        }
    }

    if !failures.is_empty() {
        out.push_str("\nFailed to add:");
        for failure in failures {
            let _ = write!(out, "\n  - {failure}");
        }
    }
    out
}
