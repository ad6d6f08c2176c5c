pub mod admin;
pub mod auth;
pub mod chirps;
pub mod error;
pub mod middleware;
pub mod users;
pub mod webhooks;

use std::path::Path;

use axum::{
    Router, middleware as axum_middleware,
    routing::{delete, get, post, put},
};
use tower_http::services::ServeDir;

pub use auth::{AppState, AppStateInner};
pub use error::ApiError;

use crate::middleware::{count_hits, require_auth};

/// All HTTP routes. `static_root` is served under `/app`.
pub fn router(state: AppState, static_root: &Path) -> Router {
    let public_routes: Router = Router::new()
        .route("/api/healthz", get(admin::healthz))
        .route("/admin/metrics", get(admin::metrics))
        .route("/api/users", post(users::create_user))
        .route("/api/login", post(auth::login))
        .route("/api/refresh", post(auth::refresh))
        .route("/api/revoke", post(auth::revoke))
        .route("/api/chirps", get(chirps::list_chirps))
        .route("/api/chirps/{chirp_id}", get(chirps::get_chirp))
        .route("/api/polka/webhooks", post(webhooks::polka_webhook))
        .with_state(state.clone());

    let protected_routes: Router = Router::new()
        .route("/api/users", put(users::update_user))
        .route("/api/chirps", post(chirps::create_chirp))
        .route("/api/chirps/{chirp_id}", delete(chirps::delete_chirp))
        .route_layer(axum_middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state.clone());

    let static_files: Router = Router::new()
        .nest_service("/app", ServeDir::new(static_root))
        .layer(axum_middleware::from_fn_with_state(state, count_hits));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(static_files)
}
