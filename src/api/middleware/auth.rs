use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{
    api::state::AppState,
    auth::Denial,
    domain::User,
    error::AppError,
    repository::UserRepository,
};

/// The authenticated caller, inserted into request extensions.
#[derive(Clone)]
pub struct CurrentUser {
    pub user: User,
}

/// The user id asserted by the fronting identity provider. A missing
/// header or a malformed id is Unauthorized.
fn asserted_user_id(state: &AppState, request: &Request) -> Result<Uuid, AppError> {
    request
        .headers()
        .get(state.settings.auth.identity_header.as_str())
        .and_then(|value| value.to_str().ok())
        .and_then(|value| Uuid::parse_str(value.trim()).ok())
        .ok_or(AppError::Unauthorized)
}

/// Unknown users are Unauthorized too.
async fn identify(state: &AppState, user_id: Uuid) -> Result<User, AppError> {
    state.service_context.user_repo
        .find_by_id(user_id)
        .await?
        .ok_or(AppError::Unauthorized)
}

pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user_id = asserted_user_id(&state, &request)?;
    let user = identify(&state, user_id).await?;

    request.extensions_mut().insert(CurrentUser { user });

    Ok(next.run(request).await)
}

pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user_id = asserted_user_id(&state, &request)?;
    let user = identify(&state, user_id).await?;

    if !user.is_admin() {
        tracing::debug!(user_id = %user.id, "admin route refused");
        return Err(AppError::Permission(Denial::AdminOnly));
    }

    request.extensions_mut().insert(CurrentUser { user });

    Ok(next.run(request).await)
}
