//! API Routes
//!
//! Configures the Axum router with all backend endpoints.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::auth::require_api_key;
use super::handlers::{
    create_profile, delete_image, delete_profile, get_image, get_profile, health_handler,
    list_profiles, stats_handler, update_profile, upload_image, AppState,
};

/// Largest accepted image upload.
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - API key: required on everything under `/api` when configured
/// - CORS: Allows any origin
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/PetProfiles", get(list_profiles).post(create_profile))
        .route(
            "/PetProfiles/:id",
            get(get_profile).put(update_profile).delete(delete_profile),
        )
        .route(
            "/Images",
            post(upload_image).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/Images/:name", get(get_image).delete(delete_image))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_key,
        ));

    Router::new()
        .nest("/api", api)
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
