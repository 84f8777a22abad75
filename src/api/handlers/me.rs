use axum::{
    extract::{Extension, State},
    Json,
};
use serde::Serialize;

use crate::{
    api::{middleware::auth::CurrentUser, state::AppState},
    domain::{Club, ClubWithStats, Event, UpdateProfileRequest, User},
    error::Result,
    service::Dashboard,
};

#[derive(Debug, Serialize)]
pub struct Recommendations {
    pub clubs: Vec<ClubWithStats>,
    pub events: Vec<Event>,
}

pub async fn profile(Extension(current): Extension<CurrentUser>) -> Json<User> {
    Json(current.user)
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<User>> {
    let user = state.service_context.user_service
        .update_profile(&current.user, request)
        .await?;
    Ok(Json(user))
}

pub async fn clubs(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<Vec<Club>>> {
    let clubs = state.service_context.club_service.my_clubs(&current.user).await?;
    Ok(Json(clubs))
}

pub async fn dashboard(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<Dashboard>> {
    let dashboard = state.service_context.dashboard_service
        .dashboard(&current.user)
        .await?;
    Ok(Json(dashboard))
}

pub async fn recommendations(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<Recommendations>> {
    let service = &state.service_context.recommendation_service;
    let (clubs, events) = tokio::join!(
        service.recommended_clubs(&current.user),
        service.recommended_events(&current.user),
    );
    Ok(Json(Recommendations { clubs: clubs?, events: events? }))
}
