//! Per-voter vote state machine over a crime record's vote lists.
//!
//! A voter is in exactly one of three states relative to a record: none,
//! upvoted, or downvoted. Voting in the direction already held is an
//! idempotent no-op, not an error. Voting in the opposite direction removes
//! the old vote and applies the new one in a single transition.

use crate::types::{CrimeRecord, VoteDirection, VoterState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    /// The vote changed the record's state.
    Applied,
    /// The voter had already voted in this direction; nothing changed.
    AlreadyVoted,
}

/// Apply one vote to a record in memory. Maintains the invariant that
/// `upvotes == upvoted_by.len()` and `downvotes == downvoted_by.len()`,
/// and that a voter appears in at most one of the two lists.
pub fn apply_vote(record: &mut CrimeRecord, voter: &str, direction: VoteDirection) -> VoteOutcome {
    let state = record.voter_state(voter);
    match (direction, state) {
        (VoteDirection::Up, VoterState::Upvoted) | (VoteDirection::Down, VoterState::Downvoted) => {
            VoteOutcome::AlreadyVoted
        }
        (VoteDirection::Up, prior) => {
            if prior == VoterState::Downvoted {
                record.downvotes = record.downvotes.saturating_sub(1);
                record.downvoted_by.retain(|v| v != voter);
            }
            record.upvotes += 1;
            record.upvoted_by.push(voter.to_string());
            VoteOutcome::Applied
        }
        (VoteDirection::Down, prior) => {
            if prior == VoterState::Upvoted {
                record.upvotes = record.upvotes.saturating_sub(1);
                record.upvoted_by.retain(|v| v != voter);
            }
            record.downvotes += 1;
            record.downvoted_by.push(voter.to_string());
            VoteOutcome::Applied
        }
    }
}

/// Order records by upvotes descending. Ties keep creation order (oldest
/// first) so a listing is deterministic per run.
pub fn sort_by_upvotes(records: &mut [CrimeRecord]) {
    records.sort_by(|a, b| {
        b.upvotes
            .cmp(&a.upvotes)
            .then_with(|| a.created_at.cmp(&b.created_at))
    });
}
