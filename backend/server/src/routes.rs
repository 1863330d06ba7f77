use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{self, Path, rejection::PathRejection},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use payloads::{FeedItem, ItemId, VoteRecord, VoteResponse};

use crate::{
    error::AppError,
    feed,
    state::State,
    utils::{get_item_id, get_vote_from_body},
    votes,
};

pub async fn votes_handler(
    extract::State(state): extract::State<Arc<State>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<VoteResponse>, AppError> {
    let principal = state.auth.require(&headers)?;
    let request = get_vote_from_body(&body)?;

    Ok(Json(votes::apply_vote(&state, principal, &request).await?))
}

pub async fn own_vote_handler(
    extract::State(state): extract::State<Arc<State>>,
    headers: HeaderMap,
    path: Result<Path<ItemId>, PathRejection>,
) -> Result<Json<Option<VoteRecord>>, AppError> {
    let principal = state.auth.require(&headers)?;
    let item_id = get_item_id(path)?;

    Ok(Json(votes::own_vote(&state, principal, item_id).await?))
}

pub async fn feed_handler(
    extract::State(state): extract::State<Arc<State>>,
    headers: HeaderMap,
) -> Result<Json<Vec<FeedItem>>, AppError> {
    let viewer = state.auth.optional(&headers).map(|p| p.user_id);

    Ok(Json(feed::list_with_votes(&state, viewer).await?))
}

pub async fn bookmark_handler(
    extract::State(state): extract::State<Arc<State>>,
    headers: HeaderMap,
    path: Result<Path<ItemId>, PathRejection>,
) -> Result<Json<FeedItem>, AppError> {
    let item_id = get_item_id(path)?;
    let viewer = state.auth.optional(&headers).map(|p| p.user_id);

    Ok(Json(feed::get_one_with_votes(&state, item_id, viewer).await?))
}

pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
