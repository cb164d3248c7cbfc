//! # Stats API
//!
//! 주가 통계 서비스의 REST API.
//!
//! ## 엔드포인트
//!
//! - `GET /api/health`: liveness
//! - `GET /api/health/ready`: 버전, 업타임, 캐시 상태
//! - `GET /api/stats?ticker=..&start=..&end=..`: 기간 통계

pub mod error;
pub mod routes;
pub mod state;

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use error::{ApiErrorResponse, ApiResult};
pub use routes::create_api_router;
pub use state::AppState;

/// 전체 애플리케이션 라우터를 생성합니다.
///
/// 요청이 `request_timeout`을 넘기면 408을 반환합니다.
pub fn create_app(state: Arc<AppState>, request_timeout: Duration) -> Router {
    create_api_router()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(CorsLayer::permissive())
}
