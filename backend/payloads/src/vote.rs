use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{ItemId, UserId};

pub const VOTE_REMOVED: &str = "Vote removed";

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Vote type must be -1 (downvote), 0 (remove vote), or 1 (upvote), got {0}")]
pub struct InvalidVoteType(pub i64);

/// Direction of a persisted vote. Removal deletes the record, so there is no zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i64")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn value(self) -> i64 {
        match self {
            Direction::Up => 1,
            Direction::Down => -1,
        }
    }
}

impl From<Direction> for i8 {
    fn from(direction: Direction) -> Self {
        direction.value() as i8
    }
}

impl TryFrom<i64> for Direction {
    type Error = InvalidVoteType;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Direction::Up),
            -1 => Ok(Direction::Down),
            other => Err(InvalidVoteType(other)),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// A principal's vote on one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Vote {
    #[default]
    NoVote,
    Upvoted,
    Downvoted,
}

impl Vote {
    pub fn value(self) -> i64 {
        match self {
            Vote::NoVote => 0,
            Vote::Upvoted => 1,
            Vote::Downvoted => -1,
        }
    }

    pub fn direction(self) -> Option<Direction> {
        match self {
            Vote::NoVote => None,
            Vote::Upvoted => Some(Direction::Up),
            Vote::Downvoted => Some(Direction::Down),
        }
    }
}

impl From<Direction> for Vote {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => Vote::Upvoted,
            Direction::Down => Vote::Downvoted,
        }
    }
}

impl From<Option<Direction>> for Vote {
    fn from(direction: Option<Direction>) -> Self {
        direction.map(Vote::from).unwrap_or_default()
    }
}

impl TryFrom<i64> for Vote {
    type Error = InvalidVoteType;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Vote::NoVote),
            other => Direction::try_from(other).map(Vote::from),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRecord {
    pub user_id: UserId,
    pub item_id: ItemId,
    pub vote_type: Direction,
}

/// Body of `POST /votes`. `vote_type` stays a raw integer so the server can
/// reject out-of-range values with its own message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub item_id: ItemId,
    pub vote_type: i64,
}

impl VoteRequest {
    pub fn new(item_id: ItemId, vote: Vote) -> Self {
        Self {
            item_id,
            vote_type: vote.value(),
        }
    }

    pub fn vote(&self) -> Result<Vote, InvalidVoteType> {
        Vote::try_from(self.vote_type)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VoteResponse {
    Recorded(VoteRecord),
    Removed { message: String },
}

impl VoteResponse {
    pub fn removed() -> Self {
        VoteResponse::Removed {
            message: VOTE_REMOVED.to_string(),
        }
    }
}
