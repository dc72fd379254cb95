//! Chat formatting for tracks, queues, and search results

use chorus_core::{Collection, SearchResults, Track};
use chorus_playback::{QueueState, TrackProgress};
use std::fmt::Write;
use std::time::Duration;

/// `Artist - Title <url>`
pub fn track_line(track: &Track) -> String {
    format!("{track} <{}>", track.link)
}

/// `m:ss`, or `h:mm:ss` past an hour
pub fn duration(d: Duration) -> String {
    let secs = d.as_secs();
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}

/// Numbered listing of `tracks`, starting at `first_position`
///
/// At most `limit` lines (0 = all); a trailer counts the rest.
pub fn numbered(tracks: &[Track], first_position: usize, limit: usize) -> String {
    let shown = if limit == 0 { tracks.len() } else { limit.min(tracks.len()) };
    let mut out = String::new();
    for (i, track) in tracks.iter().take(shown).enumerate() {
        let _ = writeln!(out, "{}: {}", first_position + i, track_line(track));
    }
    if tracks.len() > shown {
        let _ = writeln!(out, "... and {} more", tracks.len() - shown);
    }
    out.trim_end().to_string()
}

/// Now-playing line plus the upcoming listing
pub fn queue(now_playing: Option<&Track>, upcoming: &[Track], limit: usize) -> String {
    let mut out = String::new();
    match now_playing {
        Some(track) => {
            let _ = writeln!(out, "Now playing: {}", track_line(track));
        }
        None => out.push_str("Nothing playing\n"),
    }
    if upcoming.is_empty() {
        out.push_str("Queue is empty");
    } else {
        let _ = write!(out, "Upcoming ({}):\n{}", upcoming.len(), numbered(upcoming, 0, limit));
    }
    out
}

pub fn progress(progress: TrackProgress) -> String {
    format!("{} / {}", duration(progress.position), duration(progress.length))
}

pub fn status(
    state: QueueState,
    now_playing: Option<&Track>,
    progress_info: TrackProgress,
    queue_len: usize,
) -> String {
    let mut out = format!("State: {state}\n");
    if let Some(track) = now_playing {
        let _ = writeln!(out, "Now playing: {} [{}]", track_line(track), progress(progress_info));
    }
    let _ = write!(out, "Queue length: {queue_len}");
    out
}

pub fn search_results(results: &SearchResults) -> String {
    if results.is_empty() {
        return "No results".to_string();
    }
    results
        .results
        .iter()
        .enumerate()
        .map(|(i, r)| match &r.subtitle {
            Some(sub) => format!("{}: [{}] {} - {} <{}>", i + 1, r.kind, sub, r.title, r.link),
            None => format!("{}: [{}] {} <{}>", i + 1, r.kind, r.title, r.link),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn track_info(track: &Track) -> String {
    let mut out = format!("Title: {}\n", track.title);
    if !track.artists.is_empty() {
        let _ = writeln!(out, "Artists: {}", track.artists.join(", "));
    }
    if let Some(album) = &track.album {
        let _ = writeln!(out, "Album: {album}");
    }
    if let Some(likes) = track.likes {
        let _ = writeln!(out, "Likes: {likes}");
    }
    let _ = writeln!(out, "Playable: {}", if track.playable { "yes" } else { "no" });
    let _ = write!(out, "Link: {}", track.link);
    out
}

pub fn collection_info(collection: &Collection) -> String {
    let mut out = format!("{}: {}\n", capitalize(&collection.kind.to_string()), collection.name);
    if let Some(owner) = &collection.owner {
        let _ = writeln!(out, "By: {owner}");
    }
    if let Some(count) = collection.track_count {
        let _ = writeln!(out, "Tracks: {count}");
    }
    if let Some(followers) = collection.followers {
        let _ = writeln!(out, "Followers: {followers}");
    }
    if let Some(description) = &collection.description {
        let _ = writeln!(out, "{description}");
    }
    let _ = write!(out, "Link: {}", collection.link);
    out
}

/// `0, 3, 7`
pub fn positions(positions: &[usize]) -> String {
    positions
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
