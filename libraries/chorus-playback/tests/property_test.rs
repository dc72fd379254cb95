//! Property-based tests for the queue
//!
//! Uses proptest to verify invariants across many random inputs.

use chorus_core::{Link, Track, TrackList};
use chorus_playback::{QueueState, QueueStore};
use proptest::prelude::*;
use std::collections::HashSet;

// ===== Helpers =====

fn queue_of(len: usize) -> QueueStore {
    let mut queue = QueueStore::new();
    let tracks: TrackList = (0..len)
        .map(|i| {
            Track::new(
                format!("Track {i}"),
                Link::new(format!("https://open.spotify.com/track/{i}")),
            )
        })
        .collect();
    queue.append(tracks);
    queue
}

fn ids(queue: &QueueStore) -> Vec<String> {
    queue.tracks().iter().map(|t| t.link.id().to_string()).collect()
}

// ===== Property Tests =====

proptest! {
    /// Property: moving never loses or duplicates tracks
    #[test]
    fn move_is_a_permutation(
        len in 1usize..30,
        picks in prop::collection::vec(0usize..30, 1..5),
        destination in 0usize..30,
    ) {
        let mut queue = queue_of(len);
        let before: HashSet<String> = ids(&queue).into_iter().collect();
        let positions: Vec<usize> = picks.into_iter().map(|p| p % len).collect();
        let destination = destination % len;

        let landing = queue.move_positions(&positions, destination).unwrap();

        let after = ids(&queue);
        prop_assert_eq!(after.len(), len);
        prop_assert_eq!(after.into_iter().collect::<HashSet<_>>(), before);
        prop_assert!(landing <= destination);
    }

    /// Property: moved tracks sit at the landing position, in order
    #[test]
    fn moved_block_is_contiguous(
        len in 2usize..30,
        from in 0usize..30,
        destination in 0usize..30,
    ) {
        let mut queue = queue_of(len);
        let from = from % len;
        let destination = destination % len;
        let moved = queue.get(from).unwrap().clone();

        let landing = queue.move_positions(&[from], destination).unwrap();

        prop_assert_eq!(landing, destination);
        prop_assert_eq!(queue.get(landing).unwrap(), &moved);
    }

    /// Property: out-of-range destinations are rejected without mutation
    #[test]
    fn move_out_of_range_is_rejected(len in 1usize..20, extra in 0usize..5) {
        let mut queue = queue_of(len);
        let before = ids(&queue);
        prop_assert!(queue.move_positions(&[0], len + extra).is_err());
        prop_assert_eq!(ids(&queue), before);
    }

    /// Property: removing positions removes exactly those entries
    #[test]
    fn remove_positions_removes_exactly(
        len in 1usize..30,
        picks in prop::collection::vec(0usize..30, 0..10),
    ) {
        let mut queue = queue_of(len);
        let positions: Vec<usize> = picks.into_iter().map(|p| p % len).collect();
        let distinct: HashSet<usize> = positions.iter().copied().collect();

        let removed = queue.remove_positions(&positions).unwrap();

        prop_assert_eq!(removed.len(), distinct.len());
        prop_assert_eq!(queue.len(), len - distinct.len());
    }

    /// Property: skipping through the whole queue always ends stopped
    #[test]
    fn skipping_everything_stops(len in 1usize..20) {
        let mut queue = queue_of(len);
        queue.start().unwrap();
        for _ in 0..len {
            queue.skip().unwrap();
        }
        prop_assert_eq!(queue.state(), QueueState::Stopped);
        prop_assert!(queue.now_playing().is_none());
    }

    /// Property: shuffle keeps the same set of tracks
    #[test]
    fn shuffle_keeps_tracks(len in 0usize..40) {
        let mut queue = queue_of(len);
        let before: HashSet<String> = ids(&queue).into_iter().collect();
        queue.shuffle();
        prop_assert_eq!(ids(&queue).into_iter().collect::<HashSet<_>>(), before);
    }
}
