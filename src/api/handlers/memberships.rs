use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    api::{handlers::outcome_response, middleware::auth::CurrentUser, state::AppState},
    domain::Membership,
    error::Result,
};

pub async fn join(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(club_id): Path<Uuid>,
) -> Result<Json<Value>> {
    let outcome = state.service_context.membership_service
        .request_join(&current.user, club_id)
        .await?;
    outcome_response(&outcome, outcome.message())
}

pub async fn leave(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(club_id): Path<Uuid>,
) -> Result<Json<Value>> {
    let outcome = state.service_context.membership_service
        .leave(&current.user, club_id)
        .await?;
    outcome_response(&outcome, outcome.message())
}

pub async fn approve(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((club_id, membership_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Membership>> {
    let membership = state.service_context.membership_service
        .approve(&current.user, club_id, membership_id)
        .await?;
    Ok(Json(membership))
}

pub async fn reject(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((club_id, membership_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Membership>> {
    let membership = state.service_context.membership_service
        .reject(&current.user, club_id, membership_id)
        .await?;
    Ok(Json(membership))
}

pub async fn assign_leader(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((club_id, membership_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Membership>> {
    let membership = state.service_context.membership_service
        .assign_leader(&current.user, club_id, membership_id)
        .await?;
    Ok(Json(membership))
}

pub async fn remove(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((club_id, membership_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode> {
    state.service_context.membership_service
        .remove(&current.user, club_id, membership_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
