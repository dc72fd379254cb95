//! queue-delete / queue-move
//!
//! A selector is either a list of queue positions or a batch of links. Links
//! are expanded like queue-add expands them (collections to their member
//! tracks) and matched against the queue mirror-aware. When one link matches
//! several entries, `-a` takes all of them, `-f` the earliest, and without
//! either flag nothing is changed and the candidate positions are reported.

use super::CommandExecutor;
use crate::format;
use crate::grammar::CommandFlags;
use crate::outcome::{CommandOutcome, Payload};
use chorus_core::{FetchOptions, FetchScope, Result, Track, TrackList};
use chorus_playback::{QueueError, QueueStore};
use std::collections::BTreeSet;
use std::fmt::Write;
use tracing::{debug, info};

/// What a delete/move acts on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Positions(Vec<usize>),
    Links(Vec<String>),
}

impl Selector {
    /// Positions when every token is a number, links otherwise
    pub fn parse(args: &[String]) -> Self {
        let positions: Option<Vec<usize>> = args
            .iter()
            .flat_map(|arg| arg.split_whitespace())
            .map(|token| token.parse().ok())
            .collect();
        match positions {
            Some(positions) if !positions.is_empty() => Self::Positions(positions),
            _ => Self::Links(args.to_vec()),
        }
    }
}

/// How duplicate matches of one selector link are handled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchPolicy {
    /// Refuse and report the candidate positions
    #[default]
    Prompt,
    All,
    First,
}

impl MatchPolicy {
    pub fn from_flags(flags: &CommandFlags) -> Self {
        if flags.all {
            Self::All
        } else if flags.first {
            Self::First
        } else {
            Self::Prompt
        }
    }
}

/// One expanded selector link
struct Target {
    label: String,
    tracks: Vec<Track>,
    /// Whether the link was a collection (members missing from the queue are fine)
    collection: bool,
}

/// Selector links matched against the queue
#[derive(Default)]
struct Matched {
    positions: BTreeSet<usize>,
    ambiguous: Vec<(String, Vec<usize>)>,
    missing: Vec<String>,
}

impl CommandExecutor {
    /// Remove entries from the queue
    ///
    /// Positions are removed in descending order. With `all_artist_tracks`
    /// every entry sharing an artist with the selected tracks is removed.
    pub async fn delete_tracks(
        &self,
        selector: Selector,
        policy: MatchPolicy,
        all_artist_tracks: bool,
        scope: FetchScope,
    ) -> CommandOutcome {
        let raws = match selector {
            Selector::Positions(positions) => {
                let mut queue = self.state.queue.write().await;
                return match queue.remove_positions(&positions) {
                    Ok(removed) => deleted_outcome(removed, &[]),
                    Err(e) => e.into(),
                };
            }
            Selector::Links(raws) if raws.is_empty() => {
                return CommandOutcome::failure("Nothing selected");
            }
            Selector::Links(raws) => raws,
        };

        let (targets, failures) = self.expand_targets(&raws, scope, all_artist_tracks).await;

        let mut queue = self.state.queue.write().await;
        if all_artist_tracks {
            let artists = artists_of(&queue, &targets);
            if artists.is_empty() {
                return CommandOutcome::failure(failure_text("No artist found to delete", &failures));
            }
            debug!(?artists, "Deleting all tracks by artists");
            let removed = queue
                .remove_all_matching(|track| track.artists.iter().any(|a| artists.contains(a)));
            drop(queue);
            return deleted_outcome(removed, &failures);
        }

        let matched = match_targets(&queue, &targets, policy);
        if !matched.ambiguous.is_empty() {
            drop(queue);
            return ambiguous_outcome(&matched.ambiguous);
        }
        if matched.positions.is_empty() {
            let mut missing = matched.missing;
            missing.extend(failures);
            return CommandOutcome::failure(failure_text("No matching tracks in the queue", &missing));
        }

        let positions: Vec<usize> = matched.positions.into_iter().collect();
        let removed = match queue.remove_positions(&positions) {
            Ok(removed) => removed,
            Err(e) => return e.into(),
        };
        drop(queue);

        let mut problems = failures;
        problems.extend(matched.missing.into_iter().map(|m| format!("{m}: not in the queue")));
        deleted_outcome(removed, &problems)
    }

    /// Move the selected entries so they start at `new_position`
    ///
    /// Fails with `InvalidPosition` (and no mutation) when `new_position` is
    /// negative or not below the queue length.
    pub async fn move_tracks(
        &self,
        selector: Selector,
        new_position: i64,
        policy: MatchPolicy,
    ) -> CommandOutcome {
        let targets = match &selector {
            Selector::Links(raws) if raws.is_empty() => {
                return CommandOutcome::failure("Nothing selected");
            }
            Selector::Links(raws) => {
                let (targets, failures) =
                    self.expand_targets(raws, FetchScope::Tracks, false).await;
                if !failures.is_empty() {
                    return CommandOutcome::failure(failure_text("Could not resolve", &failures));
                }
                targets
            }
            Selector::Positions(_) => Vec::new(),
        };

        let mut queue = self.state.queue.write().await;
        let len = queue.len();
        if new_position < 0 || new_position as usize >= len {
            return QueueError::invalid_position(new_position, len).into();
        }
        let destination = new_position as usize;

        let positions: Vec<usize> = match selector {
            Selector::Positions(positions) => {
                if let Some(&bad) = positions.iter().find(|&&p| p >= len) {
                    return QueueError::invalid_position(bad, len).into();
                }
                positions
            }
            Selector::Links(_) => {
                let matched = match_targets(&queue, &targets, policy);
                if !matched.ambiguous.is_empty() {
                    drop(queue);
                    return ambiguous_outcome(&matched.ambiguous);
                }
                if matched.positions.is_empty() {
                    return CommandOutcome::failure(failure_text(
                        "No matching tracks in the queue",
                        &matched.missing,
                    ));
                }
                matched.positions.into_iter().collect()
            }
        };

        let selected: Vec<Track> = positions
            .iter()
            .filter_map(|&p| queue.get(p).cloned())
            .collect();
        let landing = match queue.move_positions(&positions, destination) {
            Ok(landing) => landing,
            Err(e) => return e.into(),
        };

        let is_selected = |p: usize| queue.get(p).is_some_and(|t| selected.contains(t));
        let verified = is_selected(destination) || (destination > 0 && is_selected(destination - 1));
        drop(queue);

        if !verified {
            return CommandOutcome::failure(format!(
                "Moved tracks could not be found at position {destination}"
            ));
        }
        info!(count = selected.len(), destination, landing, "Moved tracks");
        let message = match selected.as_slice() {
            [track] => format!("Moved {} to position {landing}", format::track_line(track)),
            tracks => format!("Moved {} tracks to position {landing}", tracks.len()),
        };
        CommandOutcome::success(message).with_payload(Payload::Tracks(selected.into()))
    }

    /// Expand selector links to tracks; returns the targets and per-link failures
    async fn expand_targets(
        &self,
        raws: &[String],
        scope: FetchScope,
        with_metadata: bool,
    ) -> (Vec<Target>, Vec<String>) {
        let mut targets = Vec::new();
        let mut failures = Vec::new();
        for raw in raws {
            match self.expand_target(raw, scope, with_metadata).await {
                Ok(target) => targets.push(target),
                Err(e) => failures.push(format!("{raw}: {e}")),
            }
        }
        (targets, failures)
    }

    async fn expand_target(&self, raw: &str, scope: FetchScope, with_metadata: bool) -> Result<Target> {
        let resolver = &self.state.resolver;
        let link = resolver.resolve(raw).await?;
        let kind = resolver.classify(&link).await?;
        let collection = kind.is_collection();

        let tracks = if collection || with_metadata {
            let options = FetchOptions { limit: 0, scope };
            let result = resolver.fetch(&link, kind, options).await?;
            let mut tracks = result.tracks.into_vec();
            tracks.extend(result.excluded);
            if tracks.is_empty() && !collection {
                tracks.push(Track::unresolved(link.clone()));
            }
            tracks
        } else {
            vec![Track::unresolved(link.clone())]
        };

        Ok(Target {
            label: link.to_string(),
            tracks,
            collection,
        })
    }
}

fn match_targets(queue: &QueueStore, targets: &[Target], policy: MatchPolicy) -> Matched {
    let mut matched = Matched::default();
    for target in targets {
        for track in &target.tracks {
            let found = queue.positions_matching(&track.link);
            match (found.as_slice(), policy) {
                ([], _) if target.collection => {}
                ([], _) => matched.missing.push(target.label.clone()),
                ([only], _) | ([only, ..], MatchPolicy::First) => {
                    matched.positions.insert(*only);
                }
                (_, MatchPolicy::All) => matched.positions.extend(found.iter().copied()),
                (_, MatchPolicy::Prompt) => matched.ambiguous.push((label_of(target, track), found)),
            }
        }
    }
    matched
}

/// Artists of the selected tracks, plus those of the queue entries they match
fn artists_of(queue: &QueueStore, targets: &[Target]) -> BTreeSet<String> {
    let mut artists = BTreeSet::new();
    for track in targets.iter().flat_map(|t| &t.tracks) {
        artists.extend(track.artists.iter().cloned());
        for position in queue.positions_matching(&track.link) {
            if let Some(entry) = queue.get(position) {
                artists.extend(entry.artists.iter().cloned());
            }
        }
    }
    artists
}

fn label_of(target: &Target, track: &Track) -> String {
    if target.collection {
        track.link.to_string()
    } else {
        target.label.clone()
    }
}

fn deleted_outcome(removed: Vec<(usize, Track)>, problems: &[String]) -> CommandOutcome {
    let mut message = match removed.as_slice() {
        [] => "No tracks deleted".to_string(),
        [(position, track)] => format!("Deleted {} (position {position})", format::track_line(track)),
        many => format!(
            "Deleted {} tracks at positions {}",
            many.len(),
            format::positions(&many.iter().map(|(p, _)| *p).collect::<Vec<_>>())
        ),
    };
    if !problems.is_empty() {
        message.push('\n');
        message.push_str(&failure_text("Not deleted", problems));
    }
    info!(count = removed.len(), "Deleted tracks");

    let outcome = if problems.is_empty() && !removed.is_empty() {
        CommandOutcome::success(message)
    } else {
        CommandOutcome::failure(message)
    };
    let tracks: TrackList = removed.into_iter().map(|(_, t)| t).collect();
    outcome.with_payload(Payload::Tracks(tracks))
}

fn ambiguous_outcome(ambiguous: &[(String, Vec<usize>)]) -> CommandOutcome {
    let mut message = String::new();
    let mut all_positions = BTreeSet::new();
    for (label, positions) in ambiguous {
        let _ = writeln!(
            message,
            "{}",
            QueueError::AmbiguousSelector {
                positions: positions.clone()
            }
        );
        let _ = writeln!(message, "  ({label})");
        all_positions.extend(positions.iter().copied());
    }
    message.push_str("Nothing changed. Use -a for all matches, -f for the first, or give positions");
    CommandOutcome::failure(message).with_payload(Payload::Positions(all_positions.into_iter().collect()))
}

fn failure_text(headline: &str, problems: &[String]) -> String {
    if problems.is_empty() {
        return headline.to_string();
    }
    let mut out = format!("{headline}:");
    for problem in problems {
        let _ = write!(out, "\n  - {problem}");
    }
    out
}
