//! Net vote transition for one press of an arrow.
use payloads::{Direction, Vote};

use crate::projection::ProjectionEntry;

/// Pressing the active arrow clears the vote, anything else sets it.
pub fn resolve(old: Vote, pressed: Direction) -> Vote {
    let pressed = Vote::from(pressed);

    if old == pressed {
        Vote::NoVote
    } else {
        pressed
    }
}

/// Entry after moving the user's vote to `target`. Defined for every pair.
pub fn project(entry: ProjectionEntry, target: Vote) -> ProjectionEntry {
    let old = entry.user_vote;

    let (delta, user_vote) = match (old, target) {
        (Vote::NoVote, target) => (target.value(), target),
        (old, Vote::NoVote) => (-old.value(), Vote::NoVote),
        (old, target) if old != target => (target.value() - old.value(), target),
        // Only reachable when `resolve` was skipped: treat re-asserting as clearing.
        (old, _) => (-old.value(), Vote::NoVote),
    };

    ProjectionEntry {
        vote_count: entry.vote_count + delta,
        user_vote,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(vote_count: i64, user_vote: Vote) -> ProjectionEntry {
        ProjectionEntry {
            vote_count,
            user_vote,
        }
    }

    fn press(current: ProjectionEntry, pressed: Direction) -> ProjectionEntry {
        project(current, resolve(current.user_vote, pressed))
    }

    #[test]
    fn test_resolve() {
        assert_eq!(resolve(Vote::NoVote, Direction::Up), Vote::Upvoted);
        assert_eq!(resolve(Vote::Upvoted, Direction::Up), Vote::NoVote);
        assert_eq!(resolve(Vote::Upvoted, Direction::Down), Vote::Downvoted);
        assert_eq!(resolve(Vote::Downvoted, Direction::Down), Vote::NoVote);
    }

    #[test]
    fn test_press_sequence() {
        let start = entry(5, Vote::NoVote);

        let upvoted = press(start, Direction::Up);
        assert_eq!(upvoted, entry(6, Vote::Upvoted));

        assert_eq!(press(upvoted, Direction::Up), entry(5, Vote::NoVote));
        assert_eq!(press(upvoted, Direction::Down), entry(4, Vote::Downvoted));
    }

    #[test]
    fn test_switch_from_downvote() {
        assert_eq!(press(entry(3, Vote::Downvoted), Direction::Up), entry(5, Vote::Upvoted));
    }

    #[test]
    fn test_project_table() {
        let cases = [
            (entry(0, Vote::NoVote), Vote::Upvoted, entry(1, Vote::Upvoted)),
            (entry(0, Vote::NoVote), Vote::Downvoted, entry(-1, Vote::Downvoted)),
            (entry(0, Vote::NoVote), Vote::NoVote, entry(0, Vote::NoVote)),
            (entry(2, Vote::Upvoted), Vote::NoVote, entry(1, Vote::NoVote)),
            (entry(2, Vote::Downvoted), Vote::NoVote, entry(3, Vote::NoVote)),
            (entry(2, Vote::Upvoted), Vote::Downvoted, entry(0, Vote::Downvoted)),
            (entry(2, Vote::Downvoted), Vote::Upvoted, entry(4, Vote::Upvoted)),
        ];

        for (start, target, expected) in cases {
            assert_eq!(project(start, target), expected, "{start:?} -> {target:?}");
        }
    }

    #[test]
    fn test_direct_reassert_clears() {
        assert_eq!(
            project(entry(6, Vote::Upvoted), Vote::Upvoted),
            entry(5, Vote::NoVote)
        );
        assert_eq!(
            project(entry(-4, Vote::Downvoted), Vote::Downvoted),
            entry(-3, Vote::NoVote)
        );
    }
}
