//! # Projection
//!
//! The session's copy of the feed's vote state. Seeded from a feed load, changed
//! optimistically by presses, and only brought back in line with the server by the
//! next full load.
use std::collections::{HashMap, HashSet};

use payloads::{Bookmark, Direction, FeedItem, ItemId, Vote};

use crate::toggle::{project, resolve};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectionEntry {
    pub vote_count: i64,
    pub user_vote: Vote,
}

impl From<&FeedItem> for ProjectionEntry {
    fn from(item: &FeedItem) -> Self {
        Self {
            vote_count: item.vote_count,
            user_vote: item.user_vote.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectedItem {
    pub bookmark: Bookmark,
    pub entry: ProjectionEntry,
}

/// Why a press did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    Anonymous,
    UnknownItem,
    InFlight,
}

/// A press that has been applied locally and still awaits the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pending {
    pub item_id: ItemId,
    pub snapshot: ProjectionEntry,
    pub applied: ProjectionEntry,
    pub target: Vote,
    generation: u64,
}

#[derive(Debug, Default)]
pub struct VoteProjection {
    order: Vec<ItemId>,
    items: HashMap<ItemId, ProjectedItem>,
    in_flight: HashSet<ItemId>,
    generation: u64,
}

impl VoteProjection {
    pub fn from_feed(feed: Vec<FeedItem>) -> Self {
        let mut projection = Self::default();
        projection.replace(feed);
        projection
    }

    /// Swaps in a fresh feed. Items with a vote still outstanding stay disabled.
    pub fn replace(&mut self, feed: Vec<FeedItem>) {
        self.generation += 1;
        self.order = feed.iter().map(|item| item.id).collect();
        self.items = feed
            .into_iter()
            .map(|item| {
                let entry = ProjectionEntry::from(&item);
                let bookmark = Bookmark {
                    id: item.id,
                    title: item.title,
                    url: item.url,
                    created_by: item.created_by,
                    created_at: item.created_at,
                };
                (bookmark.id, ProjectedItem { bookmark, entry })
            })
            .collect();
    }

    pub fn clear(&mut self) {
        self.generation += 1;
        self.order.clear();
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn entry(&self, item_id: ItemId) -> Option<ProjectionEntry> {
        self.items.get(&item_id).map(|item| item.entry)
    }

    pub fn is_voting(&self, item_id: ItemId) -> bool {
        self.in_flight.contains(&item_id)
    }

    /// Items in feed order.
    pub fn items(&self) -> impl Iterator<Item = &ProjectedItem> + '_ {
        self.order.iter().filter_map(|id| self.items.get(id))
    }

    /// Resolves the press and applies it locally in one step, then disables the
    /// item until [`settle`](Self::settle).
    pub fn speculate(
        &mut self,
        item_id: ItemId,
        pressed: Direction,
    ) -> Result<Pending, IgnoreReason> {
        if self.in_flight.contains(&item_id) {
            return Err(IgnoreReason::InFlight);
        }

        let item = self
            .items
            .get_mut(&item_id)
            .ok_or(IgnoreReason::UnknownItem)?;

        let snapshot = item.entry;
        let target = resolve(snapshot.user_vote, pressed);
        item.entry = project(snapshot, target);

        self.in_flight.insert(item_id);

        Ok(Pending {
            item_id,
            snapshot,
            applied: item.entry,
            target,
            generation: self.generation,
        })
    }

    /// Puts the pre-press entry back, unless a reload replaced it meanwhile.
    pub fn rollback(&mut self, pending: &Pending) {
        if pending.generation != self.generation {
            return;
        }

        if let Some(item) = self.items.get_mut(&pending.item_id) {
            item.entry = pending.snapshot;
        }
    }

    pub fn settle(&mut self, item_id: ItemId) {
        self.in_flight.remove(&item_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_item(id: ItemId, vote_count: i64, user_vote: Option<Direction>) -> FeedItem {
        FeedItem {
            id,
            title: format!("Bookmark {id}"),
            url: format!("https://example.com/{id}"),
            created_by: "owner@example.com".to_string(),
            created_at: "2025-01-01T00:00:00Z".parse().unwrap(),
            vote_count,
            user_vote,
        }
    }

    #[test]
    fn test_seeded_from_feed_in_order() {
        let projection = VoteProjection::from_feed(vec![
            feed_item(9, 2, Some(Direction::Down)),
            feed_item(4, 0, None),
        ]);

        let ids: Vec<ItemId> = projection.items().map(|item| item.bookmark.id).collect();
        assert_eq!(ids, vec![9, 4]);
        assert_eq!(
            projection.entry(9),
            Some(ProjectionEntry {
                vote_count: 2,
                user_vote: Vote::Downvoted
            })
        );
    }

    #[test]
    fn test_speculate_rollback_restores_snapshot() {
        let mut projection =
            VoteProjection::from_feed(vec![feed_item(1, 3, Some(Direction::Down))]);

        let pending = projection.speculate(1, Direction::Up).unwrap();
        assert_eq!(pending.target, Vote::Upvoted);
        assert_eq!(
            projection.entry(1),
            Some(ProjectionEntry {
                vote_count: 5,
                user_vote: Vote::Upvoted
            })
        );

        projection.rollback(&pending);
        projection.settle(1);
        assert_eq!(projection.entry(1), Some(pending.snapshot));
        assert!(!projection.is_voting(1));
    }

    #[test]
    fn test_one_press_in_flight_per_item() {
        let mut projection =
            VoteProjection::from_feed(vec![feed_item(1, 0, None), feed_item(2, 0, None)]);

        projection.speculate(1, Direction::Up).unwrap();
        assert_eq!(projection.speculate(1, Direction::Down), Err(IgnoreReason::InFlight));
        assert!(projection.speculate(2, Direction::Down).is_ok());

        projection.settle(1);
        assert!(projection.speculate(1, Direction::Down).is_ok());
    }

    #[test]
    fn test_unknown_item() {
        let mut projection = VoteProjection::default();

        assert_eq!(
            projection.speculate(3, Direction::Up),
            Err(IgnoreReason::UnknownItem)
        );
        assert!(!projection.is_voting(3));
    }

    #[test]
    fn test_rollback_after_reload_is_ignored() {
        let mut projection = VoteProjection::from_feed(vec![feed_item(1, 3, None)]);
        let pending = projection.speculate(1, Direction::Up).unwrap();

        projection.replace(vec![feed_item(1, 10, Some(Direction::Up))]);
        assert!(projection.is_voting(1));

        projection.rollback(&pending);
        assert_eq!(projection.entry(1).unwrap().vote_count, 10);
    }
}
