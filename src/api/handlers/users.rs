use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    api::state::AppState,
    error::Result,
    service::PublicProfile,
};

pub async fn public_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<PublicProfile>> {
    let profile = state.service_context.user_service
        .public_profile(&username)
        .await?;
    Ok(Json(profile))
}
