//! Trainer site routes

use axum::{
    Extension, Json, Router,
    extract::{Query, State},
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use serde_json::{Value, json};
use tower_http::{
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::{
    error::{ApiError, ApiJson, ApiResult},
    jwt::Claims,
    middleware::require_admin,
    models::{
        LoginRequest, OkResponse, TokenResponse,
        inquiry::{InquiryListResponse, InquiryQuery, InquiryRequest},
        profile::{Profile, ProfileUpdate},
        schedule::{Schedule, ScheduleUpdate},
    },
    state::AppState,
};

/// Create the router for the trainer site
pub fn create_router(state: AppState) -> Router {
    let admin_routes = Router::new()
        .route(
            "/api/admin/profile",
            get(get_admin_profile).put(update_profile),
        )
        .route(
            "/api/admin/schedule",
            get(get_admin_schedule).put(update_schedule),
        )
        .route("/api/admin/inquiries", get(list_inquiries))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    let static_dir = state.static_dir.clone();

    Router::new()
        .route("/health", get(health_check))
        .route("/api/public/profile", get(get_public_profile))
        .route("/api/public/schedule", get(get_public_schedule))
        .route("/api/public/inquiry", post(submit_inquiry))
        .route("/api/auth/login", post(login))
        .merge(admin_routes)
        .route_service("/login", ServeFile::new(static_dir.join("login.html")))
        .route_service("/dashboard", ServeFile::new(static_dir.join("dashboard.html")))
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "trainer-site"
    }))
}

/// Public profile, or the default record before the first admin write
pub async fn get_public_profile(State(state): State<AppState>) -> ApiResult<Json<Profile>> {
    Ok(Json(state.profile_repository.get().await?))
}

/// Public schedule, or an empty one
pub async fn get_public_schedule(State(state): State<AppState>) -> ApiResult<Json<Schedule>> {
    Ok(Json(state.schedule_repository.get().await?))
}

/// Store a visitor inquiry and forward it to the site owner
///
/// Notification delivery never affects the response: the inquiry is already
/// stored by the time the notifiers run, and delivery continues on its own
/// task if the client goes away.
pub async fn submit_inquiry(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<InquiryRequest>,
) -> ApiResult<Json<OkResponse>> {
    let inquiry = payload.validate(Utc::now())?;
    let id = state.inquiry_repository.create(&inquiry).await?;
    info!("Stored inquiry {}", id);

    if let Err(e) = state.notifications.spawn(inquiry.notification()).await {
        warn!("Notification dispatch for inquiry {} aborted: {}", id, e);
    }

    Ok(Json(OkResponse::ok()))
}

/// Admin login endpoint
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let identity = state
        .authenticator
        .verify(&payload.identity, &payload.password)
        .inspect_err(|e| {
            if matches!(e, ApiError::InvalidCredentials) {
                warn!("Failed admin login attempt");
            }
        })?;

    let token = state.jwt_service.issue(&identity)?;
    info!("Admin '{}' logged in", identity);

    Ok(Json(TokenResponse { token }))
}

/// Stored profile document as written, or `{}`
pub async fn get_admin_profile(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    Ok(Json(state.profile_repository.get_raw().await?))
}

/// Merge an update into the profile
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ApiJson(payload): ApiJson<ProfileUpdate>,
) -> ApiResult<Json<OkResponse>> {
    let patch = payload.into_patch(Utc::now())?;
    state.profile_repository.update(&patch).await?;
    info!("Profile updated by '{}'", claims.sub);

    Ok(Json(OkResponse::ok()))
}

/// Stored schedule document as written, or `{"items": []}`
pub async fn get_admin_schedule(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    Ok(Json(state.schedule_repository.get_raw().await?))
}

/// Replace the schedule items
pub async fn update_schedule(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ApiJson(payload): ApiJson<ScheduleUpdate>,
) -> ApiResult<Json<OkResponse>> {
    let patch = payload.into_patch(Utc::now());
    let count = patch.items.len();
    state.schedule_repository.update(&patch).await?;
    info!("Schedule updated by '{}' ({} items)", claims.sub, count);

    Ok(Json(OkResponse::ok()))
}

/// Newest inquiries first, at most 100
pub async fn list_inquiries(
    State(state): State<AppState>,
    Query(query): Query<InquiryQuery>,
) -> ApiResult<Json<InquiryListResponse>> {
    let items = state.inquiry_repository.latest(query.limit()).await?;
    Ok(Json(InquiryListResponse { items }))
}
