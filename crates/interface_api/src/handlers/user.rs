//! User overview handlers

use axum::{extract::State, Extension, Json};

use core_kernel::UserId;
use domain_claims::UserItems;

use crate::{AppState, error::ApiError};

/// The caller's lost and found reports and the returns involving them
pub async fn user_items(
    State(state): State<AppState>,
    Extension(actor): Extension<UserId>,
) -> Result<Json<UserItems>, ApiError> {
    Ok(Json(state.coordinator.get_user_items(actor).await?))
}
