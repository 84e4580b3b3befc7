use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post, put};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};

pub fn build_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route(
            "/api/ownership/transfer",
            put(handlers::ownership::transfer_ownership_handler),
        )
        .route(
            "/api/ownership/override",
            post(handlers::ownership::grant_temporary_ownership_handler),
        )
        .route(
            "/api/ownership/access",
            get(handlers::ownership::check_access_handler),
        )
        .route(
            "/api/ownership/history",
            get(handlers::ownership::ownership_history_handler),
        )
        .layer(from_fn_with_state(state.clone(), middleware::require_user));

    Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
