//! # Feed
//!
//! Bookmarks joined with their vote tallies.
//!
//! - Newest bookmark first, ties broken by ascending id
//! - `voteCount` is the sum of every direction on the bookmark
//! - `userVote` only for the caller's own record, never for anonymous callers
//! - Tallies come from one ledger call for the whole page
use std::cmp::Ordering;

use payloads::{Bookmark, FeedItem, ItemId, UserId};

use crate::{error::AppError, state::State};

fn newest_first(a: &Bookmark, b: &Bookmark) -> Ordering {
    b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id))
}

pub async fn list_with_votes(
    state: &State,
    viewer: Option<UserId>,
) -> Result<Vec<FeedItem>, AppError> {
    let mut bookmarks = state.catalog.list().await?;
    bookmarks.sort_by(newest_first);

    let item_ids: Vec<ItemId> = bookmarks.iter().map(|bookmark| bookmark.id).collect();
    let mut tallies = state.ledger.tallies(&item_ids, viewer).await?;

    Ok(bookmarks
        .into_iter()
        .map(|bookmark| {
            let tally = tallies.remove(&bookmark.id).unwrap_or_default();
            FeedItem::new(bookmark, tally.sum, tally.own.direction())
        })
        .collect())
}

pub async fn get_one_with_votes(
    state: &State,
    item_id: ItemId,
    viewer: Option<UserId>,
) -> Result<FeedItem, AppError> {
    let bookmark = state
        .catalog
        .get(item_id)
        .await?
        .ok_or(AppError::NotFound(item_id))?;

    let tally = state
        .ledger
        .tallies(&[item_id], viewer)
        .await?
        .remove(&item_id)
        .unwrap_or_default();

    Ok(FeedItem::new(bookmark, tally.sum, tally.own.direction()))
}

#[cfg(test)]
mod tests {
    use payloads::{Direction, Vote};

    use super::*;
    use crate::tests::{bookmark, test_state};

    #[tokio::test]
    async fn test_orders_newest_first_with_id_ties() {
        let state = test_state(vec![
            bookmark(1, "2025-01-01T00:00:00Z"),
            bookmark(3, "2025-02-01T00:00:00Z"),
            bookmark(2, "2025-02-01T00:00:00Z"),
            bookmark(4, "2024-12-31T00:00:00Z"),
        ]);

        let ids: Vec<ItemId> = list_with_votes(&state, None)
            .await
            .unwrap()
            .iter()
            .map(|item| item.id)
            .collect();

        assert_eq!(ids, vec![2, 3, 1, 4]);
    }

    #[tokio::test]
    async fn test_unvoted_items_report_zero() {
        let state = test_state(vec![bookmark(1, "2025-01-01T00:00:00Z")]);

        let feed = list_with_votes(&state, Some(9)).await.unwrap();
        assert_eq!(feed[0].vote_count, 0);
        assert_eq!(feed[0].user_vote, None);
    }

    #[tokio::test]
    async fn test_own_vote_only_for_viewer() {
        let state = test_state(vec![
            bookmark(1, "2025-01-01T00:00:00Z"),
            bookmark(2, "2025-01-02T00:00:00Z"),
        ]);
        state.ledger.apply(10, 1, Vote::Upvoted).await.unwrap();
        state.ledger.apply(11, 1, Vote::Upvoted).await.unwrap();
        state.ledger.apply(11, 2, Vote::Downvoted).await.unwrap();

        let feed = list_with_votes(&state, Some(10)).await.unwrap();
        assert_eq!((feed[0].id, feed[0].vote_count, feed[0].user_vote), (2, -1, None));
        assert_eq!(
            (feed[1].id, feed[1].vote_count, feed[1].user_vote),
            (1, 2, Some(Direction::Up))
        );

        let anonymous = list_with_votes(&state, None).await.unwrap();
        assert!(anonymous.iter().all(|item| item.user_vote.is_none()));
        assert_eq!(anonymous[1].vote_count, 2);
    }

    #[tokio::test]
    async fn test_get_one() {
        let state = test_state(vec![bookmark(5, "2025-01-01T00:00:00Z")]);
        state.ledger.apply(1, 5, Vote::Downvoted).await.unwrap();

        let item = get_one_with_votes(&state, 5, Some(1)).await.unwrap();
        assert_eq!(item.vote_count, -1);
        assert_eq!(item.user_vote, Some(Direction::Down));

        let missing = get_one_with_votes(&state, 6, None).await;
        assert!(matches!(missing, Err(AppError::NotFound(6))));
    }
}
