use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    api::{middleware::auth::CurrentUser, state::AppState},
    domain::{CreateUserRequest, Membership, User},
    error::Result,
};

#[derive(Debug, Deserialize)]
pub struct AppointAdvisorRequest {
    pub user_id: Uuid,
}

pub async fn create_user(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>)> {
    let user = state.service_context.user_service
        .create_user(&current.user, request)
        .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn appoint_advisor(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(club_id): Path<Uuid>,
    Json(request): Json<AppointAdvisorRequest>,
) -> Result<Json<Membership>> {
    let membership = state.service_context.club_service
        .appoint_advisor(&current.user, club_id, request.user_id)
        .await?;
    Ok(Json(membership))
}
