//! # Vote Ledger
//!
//! Source of truth for votes: at most one record per (user, bookmark).
//!
//! ## Records
//! - A record only ever holds a direction, `1` or `-1`
//! - Removing a vote deletes the record, nothing is stored for zero
//! - Revoting overwrites the direction in place, last writer wins
//!
//! ## Tallies
//! - Sum of every direction on a bookmark, `0` when nobody voted
//! - Viewer's own vote, only when a viewer is given
//! - Computed for a whole set of bookmarks at once, never one round trip per bookmark
use std::collections::HashMap;

use async_trait::async_trait;
use payloads::{Direction, ItemId, UserId, Vote, VoteRecord};
use tokio::sync::RwLock;

use crate::error::StorageError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tally {
    pub sum: i64,
    pub own: Vote,
}

#[async_trait]
pub trait VoteLedger: Send + Sync {
    /// Upserts the direction, or deletes the record for [`Vote::NoVote`].
    /// Returns the record as it stands afterwards.
    async fn apply(
        &self,
        user_id: UserId,
        item_id: ItemId,
        vote: Vote,
    ) -> Result<Option<VoteRecord>, StorageError>;

    async fn record(
        &self,
        user_id: UserId,
        item_id: ItemId,
    ) -> Result<Option<VoteRecord>, StorageError>;

    /// One entry per requested bookmark, including the ones without votes.
    async fn tallies(
        &self,
        item_ids: &[ItemId],
        viewer: Option<UserId>,
    ) -> Result<HashMap<ItemId, Tally>, StorageError>;
}

/// Votes grouped by bookmark, then by user.
#[derive(Default)]
pub struct MemoryLedger {
    records: RwLock<HashMap<ItemId, HashMap<UserId, Direction>>>,
}

#[async_trait]
impl VoteLedger for MemoryLedger {
    async fn apply(
        &self,
        user_id: UserId,
        item_id: ItemId,
        vote: Vote,
    ) -> Result<Option<VoteRecord>, StorageError> {
        let mut records = self.records.write().await;

        let Some(direction) = vote.direction() else {
            if let Some(voters) = records.get_mut(&item_id) {
                voters.remove(&user_id);
                if voters.is_empty() {
                    records.remove(&item_id);
                }
            }
            return Ok(None);
        };

        records
            .entry(item_id)
            .or_default()
            .insert(user_id, direction);

        Ok(Some(VoteRecord {
            user_id,
            item_id,
            vote_type: direction,
        }))
    }

    async fn record(
        &self,
        user_id: UserId,
        item_id: ItemId,
    ) -> Result<Option<VoteRecord>, StorageError> {
        let records = self.records.read().await;

        Ok(records
            .get(&item_id)
            .and_then(|voters| voters.get(&user_id))
            .map(|&vote_type| VoteRecord {
                user_id,
                item_id,
                vote_type,
            }))
    }

    async fn tallies(
        &self,
        item_ids: &[ItemId],
        viewer: Option<UserId>,
    ) -> Result<HashMap<ItemId, Tally>, StorageError> {
        let records = self.records.read().await;

        Ok(item_ids
            .iter()
            .map(|&item_id| {
                let tally = records
                    .get(&item_id)
                    .map(|voters| Tally {
                        sum: voters.values().map(|direction| direction.value()).sum(),
                        own: viewer
                            .and_then(|user_id| voters.get(&user_id).copied())
                            .into(),
                    })
                    .unwrap_or_default();

                (item_id, tally)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn test_no_records_tally_zero() {
        let ledger = MemoryLedger::default();

        let tallies = ledger.tallies(&[1, 2], Some(5)).await.unwrap();
        assert_eq!(tallies.len(), 2);
        assert_eq!(tallies[&1], Tally { sum: 0, own: Vote::NoVote });
        assert_eq!(tallies[&2], Tally::default());
    }

    #[tokio::test]
    async fn test_last_call_wins() {
        let ledger = MemoryLedger::default();
        let sequence = [
            Vote::Upvoted,
            Vote::Downvoted,
            Vote::NoVote,
            Vote::NoVote,
            Vote::Upvoted,
            Vote::Upvoted,
            Vote::Downvoted,
        ];

        for (i, vote) in sequence.iter().enumerate() {
            ledger.apply(1, 10, *vote).await.unwrap();

            let record = ledger.record(1, 10).await.unwrap();
            assert_eq!(record.map(|r| r.vote_type), vote.direction(), "after call {i}");

            let tally = ledger.tallies(&[10], Some(1)).await.unwrap()[&10];
            assert_eq!(tally.sum, vote.value());
            assert_eq!(tally.own, *vote);
        }
    }

    #[tokio::test]
    async fn test_remove_leaves_no_residue() {
        let ledger = MemoryLedger::default();
        ledger.apply(2, 10, Vote::Downvoted).await.unwrap();
        ledger.apply(1, 10, Vote::Upvoted).await.unwrap();
        ledger.apply(1, 10, Vote::NoVote).await.unwrap();

        assert_eq!(ledger.record(1, 10).await.unwrap(), None);
        assert_eq!(ledger.tallies(&[10], None).await.unwrap()[&10].sum, -1);
    }

    #[tokio::test]
    async fn test_remove_without_record_is_ok() {
        let ledger = MemoryLedger::default();

        assert_eq!(ledger.apply(1, 10, Vote::NoVote).await.unwrap(), None);
        assert_eq!(ledger.apply(1, 10, Vote::NoVote).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_opposite_users_cancel_out() {
        for flip in [false, true] {
            let ledger = MemoryLedger::default();
            let mut calls = vec![(1, Vote::Upvoted), (2, Vote::Downvoted)];
            if flip {
                calls.reverse();
            }
            for (user_id, vote) in calls {
                ledger.apply(user_id, 7, vote).await.unwrap();
            }

            let first = ledger.tallies(&[7], Some(1)).await.unwrap()[&7];
            let second = ledger.tallies(&[7], Some(2)).await.unwrap()[&7];
            assert_eq!(first, Tally { sum: 0, own: Vote::Upvoted });
            assert_eq!(second, Tally { sum: 0, own: Vote::Downvoted });
        }
    }

    #[tokio::test]
    async fn test_anonymous_viewer_has_no_own_vote() {
        let ledger = MemoryLedger::default();
        ledger.apply(1, 7, Vote::Upvoted).await.unwrap();

        let tally = ledger.tallies(&[7], None).await.unwrap()[&7];
        assert_eq!(tally, Tally { sum: 1, own: Vote::NoVote });
    }

    #[tokio::test]
    async fn test_concurrent_writes_keep_one_record() {
        let ledger = Arc::new(MemoryLedger::default());

        let handles: Vec<_> = (0..64)
            .map(|i| {
                let ledger = ledger.clone();
                let vote = if i % 2 == 0 { Vote::Upvoted } else { Vote::Downvoted };
                tokio::spawn(async move { ledger.apply(3, 11, vote).await })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let tally = ledger.tallies(&[11], Some(3)).await.unwrap()[&11];
        assert_eq!(tally.sum.abs(), 1);
        assert_eq!(tally.sum, tally.own.value());
    }
}
