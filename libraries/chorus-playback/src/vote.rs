//! Vote-to-skip bookkeeping
//!
//! One record per channel member for the current track. The member set is
//! refreshed from the channel snapshot on every vote; the records are dropped
//! when the track ends or is skipped.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Whether one channel member voted to skip the current track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub username: String,
    pub has_voted: bool,
}

/// Result of registering a vote
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteOutcome {
    /// Every member other than the bot has voted
    Passed,
    /// Members (other than the bot) still to vote
    Pending { missing: Vec<String> },
    /// The voter is not in the channel snapshot
    NotPresent,
}

/// Tracks skip votes for the current track
#[derive(Debug, Clone, Default)]
pub struct VoteSkipCoordinator {
    records: Vec<VoteRecord>,
}

impl VoteSkipCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `voter`'s vote against the current channel membership
    pub fn vote(&mut self, members: &[String], voter: &str, bot_name: &str) -> VoteOutcome {
        if !members.iter().any(|m| m == voter) {
            return VoteOutcome::NotPresent;
        }

        if self.records.is_empty() {
            self.records = members
                .iter()
                .map(|m| VoteRecord {
                    username: m.clone(),
                    has_voted: m == voter,
                })
                .collect();
        } else {
            let previous = std::mem::take(&mut self.records);
            self.records = members
                .iter()
                .map(|m| VoteRecord {
                    username: m.clone(),
                    has_voted: m == voter
                        || previous.iter().any(|r| &r.username == m && r.has_voted),
                })
                .collect();
        }

        let missing: Vec<String> = self
            .records
            .iter()
            .filter(|r| r.username != bot_name && !r.has_voted)
            .map(|r| r.username.clone())
            .collect();
        debug!(voter, missing = missing.len(), "Registered skip vote");

        if missing.is_empty() {
            VoteOutcome::Passed
        } else {
            VoteOutcome::Pending { missing }
        }
    }

    /// Forget all votes (track ended or skipped)
    pub fn reset(&mut self) {
        self.records.clear();
    }

    pub fn records(&self) -> &[VoteRecord] {
        &self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn members(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn unanimity_required() {
        let channel = members(&["u1", "u2", "u3", "bot"]);
        let mut votes = VoteSkipCoordinator::new();

        assert_eq!(
            votes.vote(&channel, "u1", "bot"),
            VoteOutcome::Pending {
                missing: members(&["u2", "u3"])
            }
        );
        assert!(matches!(
            votes.vote(&channel, "u2", "bot"),
            VoteOutcome::Pending { .. }
        ));
        assert_eq!(votes.vote(&channel, "u3", "bot"), VoteOutcome::Passed);
    }

    #[test]
    fn leaving_members_no_longer_block() {
        let mut votes = VoteSkipCoordinator::new();
        votes.vote(&members(&["u1", "u2", "bot"]), "u1", "bot");
        assert_eq!(
            votes.vote(&members(&["u1", "bot"]), "u1", "bot"),
            VoteOutcome::Passed
        );
    }

    #[test]
    fn joining_members_must_vote_too() {
        let mut votes = VoteSkipCoordinator::new();
        votes.vote(&members(&["u1", "u2"]), "u1", "bot");
        let outcome = votes.vote(&members(&["u1", "u2", "u3"]), "u2", "bot");
        assert_eq!(
            outcome,
            VoteOutcome::Pending {
                missing: members(&["u3"])
            }
        );
        assert!(votes.records().iter().any(|r| r.username == "u1" && r.has_voted));
    }

    #[test]
    fn absent_voter_is_ignored() {
        let mut votes = VoteSkipCoordinator::new();
        assert_eq!(
            votes.vote(&members(&["u1"]), "stranger", "bot"),
            VoteOutcome::NotPresent
        );
        assert!(votes.records().is_empty());
    }

    #[test]
    fn reset_clears_votes() {
        let mut votes = VoteSkipCoordinator::new();
        votes.vote(&members(&["u1", "u2"]), "u1", "bot");
        votes.reset();
        assert!(votes.records().is_empty());
        assert!(matches!(
            votes.vote(&members(&["u1", "u2"]), "u2", "bot"),
            VoteOutcome::Pending { .. }
        ));
    }
}
