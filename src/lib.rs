//! # Ballot Client
//!
//! Client logic for voting on the shared bookmark feed.
//!
//! ## Overall Payloads
//!
//! Requests/responses between the client and the vote server, see the `payloads` crate.
//!
//! ### Feed
//! - `GET /bookmarks`, newest first
//! - Each item carries `voteCount` and `userVote` (`1`, `-1` or `null`)
//!
//! ### Vote
//! - `POST /votes` with `{itemId, voteType}`, bearer token required
//! - `voteType` is the final vote, `0` clears it, the server never toggles
//!
//!
//!
//! ## Flow
//!
//! - Load the feed once, seeding the [`VoteProjection`]
//! - User presses an arrow on an item
//! - Pressing the active arrow clears the vote, anything else sets it
//! - Count and arrow update immediately, the item's arrows disable until the server answers
//! - On failure the item goes back to exactly what it showed before the press
//! - On success nothing else happens, counts only catch up with other users on the next load
//!
//!
//!
//! ## Anonymous Sessions
//!
//! - Arrows render disabled with a login hint
//! - Pressing does nothing, no request is sent

pub mod error;
pub mod projection;
pub mod session;
pub mod toggle;
pub mod transport;

pub use error::ClientError;
pub use projection::{IgnoreReason, Pending, ProjectedItem, ProjectionEntry, VoteProjection};
pub use session::{ControlState, FeedSession, ItemView, PressOutcome, VoteError};
pub use transport::{HttpTransport, VoteTransport};
