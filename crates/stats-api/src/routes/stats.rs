//! 기간 통계 endpoint.
//!
//! `GET /api/stats?ticker=MSFT&start=2023-01-03&end=2023-01-05`
//!
//! `start`, `end`는 생략할 수 있습니다 (종료일: 오늘, 시작일: 종료일 1년 전).

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use stats_core::StatsResult;

use crate::error::{stats_error_response, status_for, ApiErrorResponse, ApiResult};
use crate::state::AppState;

/// 통계 조회 쿼리 파라미터.
#[derive(Debug, Clone, Deserialize)]
pub struct StatsQuery {
    /// 티커 (대소문자 무관)
    pub ticker: String,
    /// 시작일 (YYYY-MM-DD)
    #[serde(default)]
    pub start: Option<NaiveDate>,
    /// 종료일 (YYYY-MM-DD, 포함)
    #[serde(default)]
    pub end: Option<NaiveDate>,
}

/// 통계 응답.
///
/// 거래일이 없으면 `count`는 0이고 가격 필드는 모두 `null`입니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsResponse {
    pub ticker: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub count: usize,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub avg_close: Option<f64>,
    pub last_close: Option<f64>,
}

impl From<&StatsResult> for StatsResponse {
    fn from(result: &StatsResult) -> Self {
        Self {
            ticker: result.ticker.clone(),
            start: result.start(),
            end: result.end(),
            count: result.count(),
            high: result.high().and_then(to_f64),
            low: result.low().and_then(to_f64),
            avg_close: result.avg_close().and_then(to_f64),
            last_close: result.last_close().and_then(to_f64),
        }
    }
}

fn to_f64(value: Decimal) -> Option<f64> {
    value.to_f64()
}

/// 기간 통계 조회.
///
/// GET /api/stats
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    query: Result<Query<StatsQuery>, QueryRejection>,
) -> ApiResult<Json<StatsResponse>> {
    let Query(query) = query.map_err(|rejection| {
        debug!(error = %rejection, "잘못된 쿼리 파라미터");
        ApiErrorResponse::invalid_query(rejection.body_text())
    })?;

    let result = state
        .service
        .compute(&query.ticker, query.start, query.end)
        .await
        .map_err(|e| {
            warn!(
                ticker = %query.ticker,
                status = status_for(&e).as_u16(),
                error = %e,
                "통계 요청 실패"
            );
            stats_error_response(&e)
        })?;

    Ok(Json(StatsResponse::from(&result)))
}

/// 통계 라우터 생성.
pub fn stats_router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(get_stats))
}
