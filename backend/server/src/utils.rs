use axum::{
    body::Bytes,
    extract::{Path, rejection::PathRejection},
};
use payloads::{ItemId, VoteRequest};

use crate::error::AppError::{self, MalformedPayload};

pub fn get_vote_from_body(body: &Bytes) -> Result<VoteRequest, AppError> {
    serde_json::from_slice(body).map_err(|e| MalformedPayload(e.to_string()))
}

pub fn get_item_id(path: Result<Path<ItemId>, PathRejection>) -> Result<ItemId, AppError> {
    path.map(|Path(item_id)| item_id).map_err(|e| MalformedPayload(e.body_text()))
}
