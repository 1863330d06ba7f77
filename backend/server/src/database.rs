//! # Redis
//!
//! RAM database.
//!
//! Stores the vote ledger and the bookmark catalog when `LEDGER_BACKEND=redis`.
//!
//! ## Layout
//!
//! - `votes:{bookmark_id}`: hash, user id to direction (`1` or `-1`)
//! - `bookmarks`: hash, bookmark id to the JSON bookmark written by the bookmark service
//!
//! ## Atomicity
//!
//! - A hash field is unique, so a user can never hold two records for one bookmark
//! - `HSET` is the upsert and `HDEL` the removal, each a single command
//! - Redis runs commands one at a time, so concurrent votes on the same key are last writer wins
//!
//! ## Tallies
//!
//! - One pipeline per feed read: `HVALS` per bookmark, plus `HGET` of the viewer's field
//! - Sums are folded on our side, the pipeline is a single round trip
use std::collections::HashMap;

use async_trait::async_trait;
use payloads::{Bookmark, Direction, ItemId, UserId, Vote, VoteRecord};
use redis::{
    AsyncCommands, Client, Value, from_redis_value,
    aio::{ConnectionManager, ConnectionManagerConfig},
};

use crate::{
    catalog::Catalog,
    error::StorageError,
    ledger::{Tally, VoteLedger},
};

pub const BOOKMARKS_KEY: &str = "bookmarks";

pub fn votes_key(item_id: ItemId) -> String {
    format!("votes:{item_id}")
}

pub async fn init_redis(redis_url: &str) -> Result<ConnectionManager, StorageError> {
    let config = ConnectionManagerConfig::new().set_number_of_retries(1);

    let client = Client::open(redis_url)?;
    let connection_manager = client.get_connection_manager_with_config(config).await?;

    Ok(connection_manager)
}

#[derive(Clone)]
pub struct RedisLedger {
    connection: ConnectionManager,
}

impl RedisLedger {
    pub fn new(connection: ConnectionManager) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl VoteLedger for RedisLedger {
    async fn apply(
        &self,
        user_id: UserId,
        item_id: ItemId,
        vote: Vote,
    ) -> Result<Option<VoteRecord>, StorageError> {
        let mut connection = self.connection.clone();
        let key = votes_key(item_id);

        let Some(direction) = vote.direction() else {
            let _: () = connection.hdel(key, user_id).await?;
            return Ok(None);
        };

        let _: () = connection.hset(key, user_id, direction.value()).await?;

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
        let mut connection = self.connection.clone();
        let stored: Option<i64> = connection.hget(votes_key(item_id), user_id).await?;

        let Some(value) = stored else {
            return Ok(None);
        };

        Ok(Some(VoteRecord {
            user_id,
            item_id,
            vote_type: Direction::try_from(value)?,
        }))
    }

    async fn tallies(
        &self,
        item_ids: &[ItemId],
        viewer: Option<UserId>,
    ) -> Result<HashMap<ItemId, Tally>, StorageError> {
        if item_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut pipe = redis::pipe();
        for &item_id in item_ids {
            pipe.cmd("HVALS").arg(votes_key(item_id));
            if let Some(user_id) = viewer {
                pipe.cmd("HGET").arg(votes_key(item_id)).arg(user_id);
            }
        }

        let mut connection = self.connection.clone();
        let replies: Vec<Value> = pipe.query_async(&mut connection).await?;

        fold_tallies(item_ids, viewer, &replies)
    }
}

/// Folds the tally pipeline replies back into per-bookmark tallies.
///
/// Replies come in request order: `HVALS` for each bookmark, followed by its `HGET`
/// only when there is a viewer.
pub fn fold_tallies(
    item_ids: &[ItemId],
    viewer: Option<UserId>,
    replies: &[Value],
) -> Result<HashMap<ItemId, Tally>, StorageError> {
    let mut replies = replies.iter();

    let mut tallies = HashMap::with_capacity(item_ids.len());
    for &item_id in item_ids {
        let values: Vec<i64> = match replies.next() {
            Some(reply) => from_redis_value(reply)?,
            None => Vec::new(),
        };

        let mut sum = 0;
        for value in values {
            sum += Direction::try_from(value)?.value();
        }

        let own: Vote = match viewer.and_then(|_| replies.next()) {
            Some(reply) => {
                let stored: Option<i64> = from_redis_value(reply)?;
                stored.map(Direction::try_from).transpose()?.into()
            }
            None => Vote::NoVote,
        };

        tallies.insert(item_id, Tally { sum, own });
    }

    Ok(tallies)
}

#[derive(Clone)]
pub struct RedisCatalog {
    connection: ConnectionManager,
}

impl RedisCatalog {
    pub fn new(connection: ConnectionManager) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl Catalog for RedisCatalog {
    async fn exists(&self, item_id: ItemId) -> Result<bool, StorageError> {
        let mut connection = self.connection.clone();
        let exists: bool = connection.hexists(BOOKMARKS_KEY, item_id).await?;

        Ok(exists)
    }

    async fn get(&self, item_id: ItemId) -> Result<Option<Bookmark>, StorageError> {
        let mut connection = self.connection.clone();
        let stored: Option<String> = connection.hget(BOOKMARKS_KEY, item_id).await?;

        Ok(stored.map(|json| serde_json::from_str(&json)).transpose()?)
    }

    async fn list(&self) -> Result<Vec<Bookmark>, StorageError> {
        let mut connection = self.connection.clone();
        let stored: Vec<String> = connection.hvals(BOOKMARKS_KEY).await?;

        Ok(stored
            .iter()
            .map(|json| serde_json::from_str(json))
            .collect::<Result<_, _>>()?)
    }
}
