use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    api::{handlers::{outcome_response, SearchParams}, middleware::auth::CurrentUser, state::AppState},
    domain::{Event, EventDetail},
    error::Result,
};

pub async fn upcoming(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Event>>> {
    let events = state.service_context.event_service
        .upcoming(params.query(), params.limit())
        .await?;
    Ok(Json(events))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EventDetail>> {
    let event = state.service_context.event_service.get(id).await?;
    Ok(Json(event))
}

pub async fn approve(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Event>> {
    let event = state.service_context.event_service
        .approve_event(&current.user, id)
        .await?;
    Ok(Json(event))
}

pub async fn reject(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Event>> {
    let event = state.service_context.event_service
        .reject_event(&current.user, id)
        .await?;
    Ok(Json(event))
}

pub async fn register(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>> {
    let outcome = state.service_context.event_service
        .register(&current.user, id)
        .await?;
    outcome_response(&outcome, outcome.message())
}

pub async fn cancel(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>> {
    let outcome = state.service_context.event_service
        .cancel(&current.user, id)
        .await?;
    outcome_response(&outcome, outcome.message())
}
