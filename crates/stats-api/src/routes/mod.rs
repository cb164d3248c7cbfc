//! API 라우트.
//!
//! - `/api/health`: 헬스 체크
//! - `/api/stats`: 기간 통계

pub mod health;
pub mod stats;

use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

pub use health::{health_router, HealthResponse};
pub use stats::{stats_router, StatsQuery, StatsResponse};

/// API 라우터 생성.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/api/health", health_router())
        .nest("/api/stats", stats_router())
}
