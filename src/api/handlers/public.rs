use axum::{extract::State, http::StatusCode, Json};

use crate::{
    api::state::AppState,
    domain::{SignupRequest, User},
    error::Result,
};

pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<User>)> {
    let user = state.service_context.user_service.signup(request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}
