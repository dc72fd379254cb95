//! Queue management integration tests
//!
//! Real-world scenarios: building a queue from chat commands, play-next
//! insertion, skipping through to the end, vote-skip rounds.

use chorus_core::{Link, Track, TrackList};
use chorus_playback::{
    QueueError, QueueEvent, QueueState, QueueStore, VoteOutcome, VoteSkipCoordinator,
};

// ===== Test Helpers =====

fn create_track(id: &str, artist: &str) -> Track {
    Track::new(
        format!("Track {id}"),
        Link::new(format!("https://soundcloud.com/{artist}/track-{id}")),
    )
    .with_artists([artist])
}

fn tracks(ids: &[&str]) -> TrackList {
    ids.iter().map(|id| create_track(id, "artist")).collect()
}

fn titles(queue: &QueueStore) -> Vec<String> {
    queue.tracks().iter().map(|t| t.title.clone()).collect()
}

fn members(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

// ===== State Machine =====

#[test]
fn test_start_on_empty_queue_fails() {
    let mut queue = QueueStore::new();
    assert_eq!(queue.start().unwrap_err(), QueueError::EmptyQueue);
    assert_eq!(queue.state(), QueueState::Stopped);
}

#[test]
fn test_full_lifecycle() {
    let mut queue = QueueStore::new();
    queue.append(tracks(&["1", "2", "3"]));

    queue.start().unwrap();
    assert_eq!(queue.state(), QueueState::Playing);

    queue.pause().unwrap();
    queue.resume().unwrap();
    assert_eq!(queue.state(), QueueState::Playing);

    queue.skip().unwrap();
    assert_eq!(queue.now_playing().unwrap().title, "Track 2");

    queue.track_ended();
    assert_eq!(queue.now_playing().unwrap().title, "Track 3");

    // Skipping the last track stops playback
    queue.skip().unwrap();
    assert_eq!(queue.state(), QueueState::Stopped);
    assert!(queue.is_empty());

    // A stopped, refilled queue can start again
    queue.append(tracks(&["4"]));
    assert_eq!(queue.start().unwrap().title, "Track 4");
}

#[test]
fn test_play_next_inserts_before_upcoming() {
    let mut queue = QueueStore::new();
    queue.append(tracks(&["1", "2", "3"]));
    queue.start().unwrap();

    queue.insert_at(tracks(&["next"]), 0).unwrap();
    assert_eq!(titles(&queue), ["Track next", "Track 2", "Track 3"]);

    queue.skip().unwrap();
    assert_eq!(queue.now_playing().unwrap().title, "Track next");
}

#[test]
fn test_clear_keeps_current_track() {
    let mut queue = QueueStore::new();
    queue.append(tracks(&["1", "2"]));
    queue.start().unwrap();
    queue.clear();

    assert!(queue.is_empty());
    assert_eq!(queue.now_playing().unwrap().title, "Track 1");
    assert!(queue
        .drain_events()
        .iter()
        .any(|e| matches!(e, QueueEvent::QueueCleared)));
}

// ===== Duplicate Handling =====

#[test]
fn test_duplicate_entries_are_all_found() {
    let mut queue = QueueStore::new();
    queue.append(tracks(&["1", "2", "1"]));

    let link = Link::new("https://soundcloud.com/artist/track-1");
    assert_eq!(queue.positions_matching(&link), [0, 2]);
}

#[test]
fn test_mirror_link_finds_entry() {
    let mirror = Link::new("https://open.spotify.com/track/abc");
    let entry = Track::new(
        "Mirrored",
        Link::new("https://song.link/s/abc").with_alternatives(vec![mirror.clone()]),
    );
    let mut queue = QueueStore::new();
    queue.append(TrackList::new(vec![entry]));

    assert_eq!(queue.positions_matching(&mirror), [0]);
}

// ===== Vote Skip =====

#[test]
fn test_vote_round_then_skip() {
    let mut queue = QueueStore::new();
    queue.append(tracks(&["1", "2"]));
    queue.start().unwrap();

    let channel = members(&["u1", "u2", "u3", "bot"]);
    let mut votes = VoteSkipCoordinator::new();

    assert!(matches!(
        votes.vote(&channel, "u1", "bot"),
        VoteOutcome::Pending { .. }
    ));
    votes.vote(&channel, "u2", "bot");
    assert_eq!(votes.vote(&channel, "u3", "bot"), VoteOutcome::Passed);

    queue.skip().unwrap();
    votes.reset();
    assert_eq!(queue.now_playing().unwrap().title, "Track 2");

    // New track, new round
    assert!(matches!(
        votes.vote(&channel, "u1", "bot"),
        VoteOutcome::Pending { .. }
    ));
}
