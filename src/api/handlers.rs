//! API Handlers
//!
//! HTTP request handlers for the profile, image and diagnostics endpoints.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::cache::VolatileCache;
use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::models::{
    ApiResponse, HealthResponse, ImageUploadResponse, PetProfile, ProfileRequest, StatsResponse,
};
use crate::profiles::{ImageStore, ProfileRepository, ProfileService};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Volatile cache shared with the profile service and the sweep task
    pub cache: Arc<VolatileCache>,
    /// Cached profile reads and writes
    pub profiles: Arc<ProfileService>,
    /// Uploaded images
    pub images: Arc<ImageStore>,
    /// Required `X-API-Key` value, if any
    pub api_key: Option<Arc<str>>,
}

impl AppState {
    /// Creates a new AppState around an existing cache, with empty stores.
    pub fn new(cache: Arc<VolatileCache>, api_key: Option<String>) -> Self {
        let profiles = ProfileService::new(ProfileRepository::new(), cache.clone());
        Self {
            cache,
            profiles: Arc::new(profiles),
            images: Arc::new(ImageStore::new()),
            api_key: api_key.map(Arc::from),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Self {
        let cache = Arc::new(VolatileCache::new(config.default_ttl()));
        Self::new(cache, config.api_key.clone())
    }
}

// == Profiles ==

/// Handler for GET /api/PetProfiles
pub async fn list_profiles(
    State(state): State<AppState>,
) -> Json<ApiResponse<Vec<PetProfile>>> {
    Json(ApiResponse::success(state.profiles.get_all().await))
}

/// Handler for GET /api/PetProfiles/:id
pub async fn get_profile(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<PetProfile>>> {
    let profile = state
        .profiles
        .get_by_id(id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Pet profile {}", id)))?;

    Ok(Json(ApiResponse::success(profile)))
}

/// Handler for POST /api/PetProfiles
pub async fn create_profile(
    State(state): State<AppState>,
    Json(req): Json<ProfileRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PetProfile>>)> {
    let errors = req.validate();
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let profile = state.profiles.create(req).await;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            profile,
            "Pet profile created successfully",
        )),
    ))
}

/// Handler for PUT /api/PetProfiles/:id
pub async fn update_profile(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<ProfileRequest>,
) -> Result<Json<ApiResponse<PetProfile>>> {
    let errors = req.validate();
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let profile = state
        .profiles
        .update(id, req)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Pet profile {}", id)))?;

    Ok(Json(ApiResponse::success_with_message(
        profile,
        "Pet profile updated successfully",
    )))
}

/// Handler for DELETE /api/PetProfiles/:id
pub async fn delete_profile(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<i32>>> {
    if !state.profiles.delete(id).await {
        return Err(ApiError::NotFound(format!("Pet profile {}", id)));
    }

    Ok(Json(ApiResponse::success_with_message(
        id,
        "Pet profile deleted successfully",
    )))
}

// == Images ==

/// Handler for POST /api/Images
///
/// The request body is the raw image.
pub async fn upload_image(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<ApiResponse<ImageUploadResponse>>)> {
    if body.is_empty() {
        return Err(ApiError::InvalidRequest("Image body is empty".to_string()));
    }

    let file_name = state
        .images
        .upload(body)
        .await
        .ok_or_else(|| ApiError::InvalidRequest("Unrecognized image format".to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(ImageUploadResponse { file_name })),
    ))
}

/// Handler for GET /api/Images/:name
pub async fn get_image(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Response> {
    let image = state
        .images
        .get(&name)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Image {}", name)))?;

    Ok(([(header::CONTENT_TYPE, image.content_type)], image.data).into_response())
}

/// Handler for DELETE /api/Images/:name
pub async fn delete_image(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ApiResponse<String>>> {
    if !state.images.delete(&name).await {
        return Err(ApiError::NotFound(format!("Image {}", name)));
    }

    Ok(Json(ApiResponse::success_with_message(
        name,
        "Image deleted successfully",
    )))
}

// == Diagnostics ==

/// Handler for GET /stats
///
/// Returns volatile cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.cache.stats().await))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
