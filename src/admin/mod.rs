pub mod auth;
pub mod handlers;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use self::auth::admin_auth_middleware;
use self::handlers::*;
use crate::http::server::AppState;

/// Reload and inspection routes, guarded by the admin bearer token.
pub fn setup_admin_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/reload", post(reload_config))
        .route("/refresh", post(refresh_configs))
        .route("/admin/status", get(get_status))
        .route("/admin/configs", get(list_configs))
        .route_layer(middleware::from_fn_with_state(state, admin_auth_middleware))
}
