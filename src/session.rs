//! # Feed Session
//!
//! One user's view of the feed and their vote arrows.
//!
//! ## Press
//! 1. Resolve the toggle and update the projection, both under one lock
//! 2. Send the resulting vote, with the item's arrows disabled meanwhile
//! 3. Success keeps the optimistic entry as is, no reconciliation
//! 4. Failure restores the entry from before the press and records the message
//!
//! ## Load
//! - Success replaces the whole projection
//! - Failure empties it and sets the feed error, separate from per-item vote errors
use payloads::{Bookmark, Direction, ItemId, VoteRequest};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::{
    error::{ClientError, FEED_FALLBACK, VOTE_FALLBACK},
    projection::{IgnoreReason, ProjectionEntry, VoteProjection},
    transport::VoteTransport,
};

pub const LOGIN_HINT: &str = "Please login to vote";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOutcome {
    Applied(ProjectionEntry),
    Ignored(IgnoreReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteError {
    pub item_id: ItemId,
    pub message: String,
}

/// How one arrow should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlState {
    pub enabled: bool,
    pub active: bool,
    pub hint: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemView {
    pub bookmark: Bookmark,
    pub entry: ProjectionEntry,
    pub upvote: ControlState,
    pub downvote: ControlState,
}

#[derive(Default)]
struct SessionState {
    projection: VoteProjection,
    loading: bool,
    feed_error: Option<String>,
    vote_error: Option<VoteError>,
}

pub struct FeedSession<T> {
    transport: T,
    state: Mutex<SessionState>,
}

impl<T: VoteTransport> FeedSession<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            state: Mutex::new(SessionState::default()),
        }
    }

    /// Replaces the projection with the server's current feed.
    pub async fn load(&self) -> Result<usize, ClientError> {
        {
            let mut state = self.state.lock().await;
            state.loading = true;
            state.feed_error = None;
        }

        let result = self.transport.fetch_feed().await;

        let mut state = self.state.lock().await;
        state.loading = false;

        match result {
            Ok(feed) => {
                state.projection.replace(feed);
                debug!("Loaded {} feed items", state.projection.len());
                Ok(state.projection.len())
            }
            Err(e) => {
                warn!("Feed load failed: {e}");
                state.projection.clear();
                state.feed_error = Some(e.user_message(FEED_FALLBACK));
                Err(e)
            }
        }
    }

    pub async fn press(
        &self,
        item_id: ItemId,
        pressed: Direction,
    ) -> Result<PressOutcome, ClientError> {
        if !self.transport.is_authenticated() {
            return Ok(PressOutcome::Ignored(IgnoreReason::Anonymous));
        }

        let pending = {
            let mut state = self.state.lock().await;
            match state.projection.speculate(item_id, pressed) {
                Ok(pending) => pending,
                Err(reason) => return Ok(PressOutcome::Ignored(reason)),
            }
        };

        let result = self
            .transport
            .submit_vote(&VoteRequest::new(item_id, pending.target))
            .await;

        let mut state = self.state.lock().await;
        state.projection.settle(item_id);

        match result {
            Ok(_) => Ok(PressOutcome::Applied(pending.applied)),
            Err(e) => {
                warn!("Vote on bookmark {item_id} failed, rolling back: {e}");
                state.projection.rollback(&pending);
                state.vote_error = Some(VoteError {
                    item_id,
                    message: e.user_message(VOTE_FALLBACK),
                });
                Err(e)
            }
        }
    }

    pub async fn entry(&self, item_id: ItemId) -> Option<ProjectionEntry> {
        self.state.lock().await.projection.entry(item_id)
    }

    pub async fn is_voting(&self, item_id: ItemId) -> bool {
        self.state.lock().await.projection.is_voting(item_id)
    }

    pub async fn is_loading(&self) -> bool {
        self.state.lock().await.loading
    }

    pub async fn feed_error(&self) -> Option<String> {
        self.state.lock().await.feed_error.clone()
    }

    pub async fn vote_error(&self) -> Option<VoteError> {
        self.state.lock().await.vote_error.clone()
    }

    pub async fn clear_errors(&self) {
        let mut state = self.state.lock().await;
        state.feed_error = None;
        state.vote_error = None;
    }

    /// Everything the display layer needs, in feed order.
    pub async fn view(&self) -> Vec<ItemView> {
        let state = self.state.lock().await;
        let authenticated = self.transport.is_authenticated();

        state
            .projection
            .items()
            .map(|item| {
                let voting = state.projection.is_voting(item.bookmark.id);
                let control = |direction: Direction| ControlState {
                    enabled: authenticated && !voting,
                    active: item.entry.user_vote.direction() == Some(direction),
                    hint: match (authenticated, direction) {
                        (false, _) => LOGIN_HINT,
                        (true, Direction::Up) => "Upvote",
                        (true, Direction::Down) => "Downvote",
                    },
                };

                ItemView {
                    bookmark: item.bookmark.clone(),
                    entry: item.entry,
                    upvote: control(Direction::Up),
                    downvote: control(Direction::Down),
                }
            })
            .collect()
    }
}
