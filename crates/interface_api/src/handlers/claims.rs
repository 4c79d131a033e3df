//! Claims handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use core_kernel::{ClaimId, UserId};
use domain_claims::{Claim, ClaimView, UserClaims};

use crate::{AppState, error::ApiError};
use crate::dto::claims::*;

/// Submits a claim on a found item
pub async fn submit_claim(
    State(state): State<AppState>,
    Extension(actor): Extension<UserId>,
    Json(request): Json<SubmitClaimRequest>,
) -> Result<(StatusCode, Json<Claim>), ApiError> {
    let claim = state.coordinator.submit_claim(actor, request.into()).await?;
    Ok((StatusCode::CREATED, Json(claim)))
}

/// Lists claims the caller submitted and received
pub async fn list_claims(
    State(state): State<AppState>,
    Extension(actor): Extension<UserId>,
) -> Result<Json<UserClaims>, ApiError> {
    Ok(Json(state.coordinator.get_claims_for_user(actor).await?))
}

/// Gets a claim the caller is party to
pub async fn get_claim(
    State(state): State<AppState>,
    Extension(actor): Extension<UserId>,
    Path(id): Path<ClaimId>,
) -> Result<Json<ClaimView>, ApiError> {
    Ok(Json(state.coordinator.claim_view(actor, id).await?))
}

/// Accepts or rejects a claim; only the item's finder may do this
pub async fn respond_to_claim(
    State(state): State<AppState>,
    Extension(actor): Extension<UserId>,
    Path(id): Path<ClaimId>,
    Json(request): Json<RespondToClaimRequest>,
) -> Result<Json<Claim>, ApiError> {
    let claim = state
        .coordinator
        .respond_to_claim(id, actor, request.decision)
        .await?;
    Ok(Json(claim))
}
