//! Item handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use core_kernel::{FoundItemId, LostItemId, UserId};
use domain_items::{CategoryCount, FoundItemReport, FoundItemSummary, LostItemReport};

use crate::{AppState, error::ApiError};
use crate::dto::items::*;

/// Files a found item report
pub async fn report_found_item(
    State(state): State<AppState>,
    Extension(actor): Extension<UserId>,
    Json(request): Json<ReportFoundItemRequest>,
) -> Result<(StatusCode, Json<FoundItemReport>), ApiError> {
    let report = state.coordinator.report_found_item(actor, request.into()).await?;
    Ok((StatusCode::CREATED, Json(report)))
}

/// Files a lost item report
pub async fn report_lost_item(
    State(state): State<AppState>,
    Extension(actor): Extension<UserId>,
    Json(request): Json<ReportLostItemRequest>,
) -> Result<(StatusCode, Json<LostItemReport>), ApiError> {
    let report = state.coordinator.report_lost_item(actor, request.into()).await?;
    Ok((StatusCode::CREATED, Json(report)))
}

/// Lists found items still open for claims
pub async fn list_found_items(
    State(state): State<AppState>,
) -> Result<Json<Vec<FoundItemSummary>>, ApiError> {
    Ok(Json(state.coordinator.available_found_items().await?))
}

/// Lists lost items not yet recovered
pub async fn list_lost_items(
    State(state): State<AppState>,
) -> Result<Json<Vec<LostItemReport>>, ApiError> {
    Ok(Json(state.coordinator.available_lost_items().await?))
}

/// Gets a found item; contact details only for its finder or an accepted claimant
pub async fn get_found_item(
    State(state): State<AppState>,
    Extension(actor): Extension<UserId>,
    Path(id): Path<FoundItemId>,
) -> Result<Json<FoundItemSummary>, ApiError> {
    Ok(Json(state.coordinator.found_item_view(actor, id).await?))
}

/// Top categories over the past week, found and lost reports combined
pub async fn trending_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryCount>>, ApiError> {
    Ok(Json(state.coordinator.trending_categories().await?))
}

pub async fn get_lost_item(
    State(state): State<AppState>,
    Path(id): Path<LostItemId>,
) -> Result<Json<LostItemReport>, ApiError> {
    Ok(Json(state.coordinator.get_lost_item(id).await?))
}

/// Lets the owner mark a lost item as recovered, or undo that
pub async fn update_lost_item_status(
    State(state): State<AppState>,
    Extension(actor): Extension<UserId>,
    Path(id): Path<LostItemId>,
    Json(request): Json<UpdateLostItemStatusRequest>,
) -> Result<Json<LostItemReport>, ApiError> {
    let report = state
        .coordinator
        .update_lost_item_status(actor, id, request.claimed)
        .await?;
    Ok(Json(report))
}
