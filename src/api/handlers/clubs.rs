use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    api::{handlers::{clamp_limit, SearchParams}, middleware::auth::CurrentUser, state::AppState},
    domain::*,
    error::Result,
};

#[derive(Debug, Deserialize)]
pub struct DeleteClubRequest {
    #[serde(default)]
    pub confirm: String,
}

#[derive(Debug, Deserialize)]
pub struct PopularParams {
    #[serde(default = "default_popular_limit")]
    pub limit: i64,
}

fn default_popular_limit() -> i64 {
    10
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Club>>> {
    let clubs = state.service_context.club_service.list(params.query()).await?;
    Ok(Json(clubs))
}

pub async fn popular(
    State(state): State<AppState>,
    Query(params): Query<PopularParams>,
) -> Result<Json<Vec<ClubWithStats>>> {
    let clubs = state.service_context.club_service.popular(clamp_limit(params.limit)).await?;
    Ok(Json(clubs))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ClubWithStats>> {
    let service = &state.service_context.club_service;
    let club = service.get(id).await?;
    let member_count = service.member_count(id).await?;
    Ok(Json(ClubWithStats { club, member_count }))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<CreateClubRequest>,
) -> Result<(StatusCode, Json<Club>)> {
    let club = state.service_context.club_service
        .create(&current.user, request)
        .await?;
    Ok((StatusCode::CREATED, Json(club)))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateClubRequest>,
) -> Result<Json<Club>> {
    let club = state.service_context.club_service
        .update(&current.user, id, request)
        .await?;
    Ok(Json(club))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<DeleteClubRequest>,
) -> Result<StatusCode> {
    state.service_context.club_service
        .delete(&current.user, id, &request.confirm)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn members(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<MembershipWithUser>>> {
    let members = state.service_context.club_service.members(id).await?;
    Ok(Json(members))
}

pub async fn pending(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<MembershipWithUser>>> {
    let pending = state.service_context.club_service
        .pending(&current.user, id)
        .await?;
    Ok(Json(pending))
}

pub async fn permissions(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ClubPermissions>> {
    let permissions = state.service_context.club_service
        .permissions(&current.user, id)
        .await?;
    Ok(Json(permissions))
}

pub async fn events(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Event>>> {
    let events = state.service_context.event_service.club_events(id).await?;
    Ok(Json(events))
}

pub async fn create_event(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<Event>)> {
    let event = state.service_context.event_service
        .create_event(&current.user, id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(event)))
}
