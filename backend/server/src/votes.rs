use payloads::{ItemId, VoteRecord, VoteRequest, VoteResponse};
#[cfg(feature = "verbose")]
use tracing::info;

use crate::{auth::Principal, error::AppError, state::State};

/// Sets the principal's vote to exactly what was requested. Toggling is the
/// caller's business: `1` on an existing upvote stays an upvote.
pub async fn apply_vote(
    state: &State,
    principal: Principal,
    request: &VoteRequest,
) -> Result<VoteResponse, AppError> {
    let vote = request.vote()?;

    if !state.catalog.exists(request.item_id).await? {
        return Err(AppError::NotFound(request.item_id));
    }

    let record = state
        .ledger
        .apply(principal.user_id, request.item_id, vote)
        .await?;

    #[cfg(feature = "verbose")]
    info!(
        "User {} set vote {} on bookmark {}",
        principal.user_id,
        vote.value(),
        request.item_id
    );

    Ok(match record {
        Some(record) => VoteResponse::Recorded(record),
        None => VoteResponse::removed(),
    })
}

pub async fn own_vote(
    state: &State,
    principal: Principal,
    item_id: ItemId,
) -> Result<Option<VoteRecord>, AppError> {
    if !state.catalog.exists(item_id).await? {
        return Err(AppError::NotFound(item_id));
    }

    Ok(state.ledger.record(principal.user_id, item_id).await?)
}
