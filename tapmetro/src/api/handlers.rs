//! HTTP request handlers
//!
//! Each handler performs exactly one controller operation. The controller
//! lock is never held across the response write.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::error::{ApiError, ApiResult, BAD_BPM_VALUE, BAD_REQUEST};
use super::AppState;
use crate::tempo::Extremum;

const SUCCESS_MSG: &str = "your request has been processed successfully!";

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct BpmRequest {
    pub bpm: u32,
}

#[derive(Debug, Serialize)]
pub struct BpmResponse {
    pub bpm: u32,
}

#[derive(Debug, Serialize)]
pub struct BpmListResponse {
    pub bpm_list: Vec<u32>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub msg: String,
}

impl MessageResponse {
    fn success() -> Json<Self> {
        Json(Self {
            msg: SUCCESS_MSG.to_string(),
        })
    }
}

fn parse_bpm(
    payload: Result<Json<BpmRequest>, JsonRejection>,
    message: &'static str,
) -> ApiResult<u32> {
    match payload {
        Ok(Json(req)) => Ok(req.bpm),
        Err(rejection) => {
            warn!("Rejected BPM request body: {}", rejection.body_text());
            Err(ApiError::BadRequest(message))
        }
    }
}

// ============================================================================
// Current BPM
// ============================================================================

/// GET /bpm - Current tempo (0 when none)
pub async fn get_bpm(State(state): State<AppState>) -> ApiResult<Json<BpmResponse>> {
    let bpm = state.controller.current_bpm()?;
    Ok(Json(BpmResponse { bpm }))
}

/// PUT /bpm - Append a BPM sample manually
pub async fn set_bpm(
    State(state): State<AppState>,
    payload: Result<Json<BpmRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let bpm = parse_bpm(payload, BAD_REQUEST)?;
    state.controller.add_bpm(bpm)?;
    info!("BPM set to {} via API", bpm);
    Ok(MessageResponse::success())
}

// ============================================================================
// Sample history
// ============================================================================

/// GET /bpm/list - All four samples, oldest first, sentinel zeros included
pub async fn get_bpm_list(State(state): State<AppState>) -> ApiResult<Json<BpmListResponse>> {
    let samples = state.controller.list_samples()?;
    Ok(Json(BpmListResponse {
        bpm_list: samples.to_vec(),
    }))
}

/// DELETE /bpm/list - Clear the first sample equal to the given value
pub async fn delete_bpm(
    State(state): State<AppState>,
    payload: Result<Json<BpmRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let bpm = parse_bpm(payload, BAD_BPM_VALUE)?;
    state.controller.delete_by_value(bpm)?;
    Ok(MessageResponse::success())
}

// ============================================================================
// Extremes
// ============================================================================

async fn get_extremum(state: AppState, kind: Extremum) -> ApiResult<Json<BpmResponse>> {
    let bpm = state.controller.extremum(kind)?;
    Ok(Json(BpmResponse { bpm }))
}

async fn delete_extremum(state: AppState, kind: Extremum) -> ApiResult<Json<MessageResponse>> {
    let cleared = state.controller.delete_extremum(kind)?;
    info!("Deleted {:?} BPM from {} slot(s) via API", kind, cleared);
    Ok(MessageResponse::success())
}

/// GET /bpm/min - Smallest sample (sentinel zeros included)
pub async fn get_min(State(state): State<AppState>) -> ApiResult<Json<BpmResponse>> {
    get_extremum(state, Extremum::Min).await
}

/// DELETE /bpm/min - Clear every sample equal to the minimum
pub async fn delete_min(State(state): State<AppState>) -> ApiResult<Json<MessageResponse>> {
    delete_extremum(state, Extremum::Min).await
}

/// GET /bpm/max - Largest sample
pub async fn get_max(State(state): State<AppState>) -> ApiResult<Json<BpmResponse>> {
    get_extremum(state, Extremum::Max).await
}

/// DELETE /bpm/max - Clear every sample equal to the maximum
pub async fn delete_max(State(state): State<AppState>) -> ApiResult<Json<MessageResponse>> {
    delete_extremum(state, Extremum::Max).await
}

// ============================================================================
// Service info
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    module: String,
    version: String,
    learning: bool,
}

/// GET /health - Health check endpoint
pub async fn health(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        module: "tapmetro".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        learning: state.controller.is_learning()?,
    }))
}

/// Build information response
#[derive(Debug, Serialize)]
pub struct BuildInfo {
    pub version: String,
    pub git_hash: String,
    pub build_timestamp: String,
    pub build_profile: String,
}

/// GET /build_info - Version and build metadata
pub async fn get_build_info() -> Json<BuildInfo> {
    Json(BuildInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        git_hash: env!("GIT_HASH").to_string(),
        build_timestamp: env!("BUILD_TIMESTAMP").to_string(),
        build_profile: env!("BUILD_PROFILE").to_string(),
    })
}
