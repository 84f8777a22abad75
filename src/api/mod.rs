pub mod handlers;
pub mod middleware;
pub mod state;

use axum::{
    Router,
    routing::{get, post, put, delete},
};
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::TraceLayer,
};
use std::sync::Arc;

use crate::{
    config::Settings,
    service::ServiceContext,
};
use state::AppState;

pub fn create_app(service_context: Arc<ServiceContext>, settings: Arc<Settings>) -> Router {
    let app_state = AppState::new(service_context, settings);

    Router::new()
        // Root and health endpoints
        .route("/", get(handlers::root::root))
        .route("/health", get(handlers::root::health_check))

        // API routes, all behind the identity header
        .nest("/api", api_routes(app_state.clone()))

        // Unauthenticated self-registration
        .nest("/public", public_routes())

        // Admin routes
        .nest("/admin", admin_routes(app_state.clone()))

        .with_state(app_state)

        // Middleware
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/me", me_routes())
        .nest("/clubs", club_routes())
        .nest("/events", event_routes())
        .route("/users/:username", get(handlers::users::public_profile))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth::require_auth,
        ))
}

fn me_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::me::profile))
        .route("/", put(handlers::me::update_profile))
        .route("/clubs", get(handlers::me::clubs))
        .route("/dashboard", get(handlers::me::dashboard))
        .route("/recommendations", get(handlers::me::recommendations))
}

fn club_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::clubs::list))
        .route("/", post(handlers::clubs::create))
        .route("/popular", get(handlers::clubs::popular))
        .route("/:id", get(handlers::clubs::get))
        .route("/:id", put(handlers::clubs::update))
        .route("/:id", delete(handlers::clubs::delete))
        .route("/:id/members", get(handlers::clubs::members))
        .route("/:id/pending", get(handlers::clubs::pending))
        .route("/:id/permissions", get(handlers::clubs::permissions))
        .route("/:id/events", get(handlers::clubs::events))
        .route("/:id/events", post(handlers::clubs::create_event))
        .route("/:id/join", post(handlers::memberships::join))
        .route("/:id/leave", post(handlers::memberships::leave))
        .route("/:id/memberships/:membership_id", delete(handlers::memberships::remove))
        .route("/:id/memberships/:membership_id/approve", post(handlers::memberships::approve))
        .route("/:id/memberships/:membership_id/reject", post(handlers::memberships::reject))
        .route("/:id/memberships/:membership_id/leader", post(handlers::memberships::assign_leader))
}

fn event_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::events::upcoming))
        .route("/:id", get(handlers::events::get))
        .route("/:id/approve", post(handlers::events::approve))
        .route("/:id/reject", post(handlers::events::reject))
        .route("/:id/register", post(handlers::events::register))
        .route("/:id/cancel", post(handlers::events::cancel))
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(handlers::public::signup))
}

fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/users", post(handlers::admin::create_user))
        .route("/clubs/:id/advisors", post(handlers::admin::appoint_advisor))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth::require_admin,
        ))
}
