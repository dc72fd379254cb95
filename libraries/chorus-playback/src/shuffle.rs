//! Shuffle for queue randomization

use chorus_core::Track;
use rand::seq::SliceRandom;
use rand::thread_rng;

/// Pure random shuffle using Fisher-Yates
///
/// Each track has equal probability of appearing at any position.
pub fn shuffle_tracks(tracks: &mut [Track]) {
    let mut rng = thread_rng();
    tracks.shuffle(&mut rng);
}
