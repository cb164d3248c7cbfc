//! API 에러 응답.
//!
//! 모든 엔드포인트는 같은 형식으로 에러를 반환합니다.
//!
//! ```json
//! { "code": "INVALID_RANGE", "message": "start must be <= end (start: 2024-03-01, end: 2024-02-01)" }
//! ```

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use stats_core::StatsError;

/// API 에러 응답 본문.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// 에러 코드 (예: "INVALID_RANGE", "TICKER_NOT_FOUND")
    pub code: String,
    /// 사람이 읽을 수 있는 메시지
    pub message: String,
}

impl ApiErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// 잘못된 쿼리 파라미터 (400).
    pub fn invalid_query(message: impl Into<String>) -> (StatusCode, Json<Self>) {
        (
            StatusCode::BAD_REQUEST,
            Json(Self::new("INVALID_QUERY", message)),
        )
    }
}

impl std::fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiErrorResponse {}

/// 통계 에러의 HTTP 상태 코드.
///
/// 심볼 미존재만 404이고 나머지는 모두 400입니다.
pub fn status_for(err: &StatsError) -> StatusCode {
    match err {
        StatsError::TickerNotFound(_) => StatusCode::NOT_FOUND,
        StatsError::InvalidRange { .. }
        | StatsError::InvalidTicker(_)
        | StatsError::Upstream(_) => StatusCode::BAD_REQUEST,
    }
}

/// 통계 에러를 API 에러 응답으로 변환합니다.
pub fn stats_error_response(err: &StatsError) -> (StatusCode, Json<ApiErrorResponse>) {
    (
        status_for(err),
        Json(ApiErrorResponse::new(err.code(), err.to_string())),
    )
}

/// API 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, (StatusCode, Json<ApiErrorResponse>)>;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_status_mapping() {
        let range = StatsError::InvalidRange {
            start: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        };
        assert_eq!(status_for(&range), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_for(&StatsError::InvalidTicker(String::new())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&StatsError::Upstream("timeout".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&StatsError::TickerNotFound("ZZZZ".into())),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_error_body_shape() {
        let (status, Json(body)) =
            stats_error_response(&StatsError::TickerNotFound("ZZZZ".into()));

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.code, "TICKER_NOT_FOUND");

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["code"], "TICKER_NOT_FOUND");
        assert_eq!(json["message"], "ticker not found: ZZZZ");
        assert_eq!(json.as_object().unwrap().len(), 2);
    }
}
