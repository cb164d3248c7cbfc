//! 헬스 체크 endpoint.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use serde_json::{json, Value};

use stats_data::CacheStats;

use crate::state::AppState;

/// 상세 헬스 체크 응답.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,

    /// API 버전
    pub version: String,

    /// 서버 업타임(초)
    pub uptime_secs: i64,

    /// 현재 시간 (RFC 3339)
    pub timestamp: String,

    /// 데이터 제공자 이름
    pub provider: String,

    /// 결과 캐시 상태
    pub cache: CacheStats,
}

/// 간단한 헬스 체크 (liveness probe용).
///
/// GET /api/health
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// 상세 헬스 체크 (readiness probe용).
///
/// GET /api/health/ready
pub async fn health_ready(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: state.version.clone(),
        uptime_secs: state.uptime_secs(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        provider: state.service.provider_name().to_string(),
        cache: state.service.cache().stats().await,
    })
}

/// 헬스 체크 라우터 생성.
pub fn health_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(health_check))
        .route("/ready", get(health_ready))
}
