//! # Payloads
//!
//! Types exchanged between the vote server and its clients.
//!
//! ## Votes
//! - A persisted record only ever holds a [`Direction`], so a zero record cannot exist
//! - A principal's vote on an item is a [`Vote`]: no vote, upvoted or downvoted
//! - On the wire a vote is an integer: `-1`, `0` (remove) or `1`
//!
//! ## Feed
//! - Ordered list of [`FeedItem`]s, newest bookmark first
//! - `userVote` is `null` for anonymous callers or when the caller never voted
//!
//! ## Errors
//! - Every failed request carries an [`ErrorBody`] with a machine-checkable kind

pub mod error;
pub mod feed;
pub mod vote;

pub use error::{ErrorBody, ErrorKind};
pub use feed::{Bookmark, FeedItem};
pub use vote::{Direction, InvalidVoteType, Vote, VoteRecord, VoteRequest, VoteResponse};

pub type ItemId = i64;
pub type UserId = i64;
