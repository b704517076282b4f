//! Admin API: chain introspection, store edits, manual reload.

pub mod handlers;
pub mod auth;

use axum::{
    routing::{get, post},
    Router,
    middleware,
};
use crate::http::server::AppState;
use self::handlers::*;
use self::auth::admin_auth_middleware;

pub fn setup_admin_router(state: AppState) -> Router {
    Router::new()
        .route("/admin/status", get(get_status))
        .route("/admin/layers", get(get_layers))
        .route("/admin/resolve", get(get_resolve))
        .route("/admin/store", get(get_store).put(put_store).delete(delete_store))
        .route("/admin/reload", post(post_reload))
        .layer(middleware::from_fn_with_state(state.clone(), admin_auth_middleware))
        .with_state(state)
}
