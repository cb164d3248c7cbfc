//! 통계 서비스의 에러 타입.
//!
//! 검증 에러는 I/O 이전에 발생하고, 데이터 제공자 에러는 서비스 경계에서
//! `Upstream` 또는 `TickerNotFound`로 축약됩니다.

use chrono::NaiveDate;
use thiserror::Error;

/// 통계 요청 처리 에러.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatsError {
    /// 시작일이 종료일보다 늦음
    #[error("start must be <= end (start: {start}, end: {end})")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    /// 잘못된 티커 (정규화 후 빈 문자열 등)
    #[error("invalid ticker: {0}")]
    InvalidTicker(String),

    /// 데이터 제공자 실패
    #[error("upstream data provider failed: {0}")]
    Upstream(String),

    /// 존재하지 않는 티커
    #[error("ticker not found: {0}")]
    TickerNotFound(String),
}

/// 통계 작업을 위한 Result 타입.
pub type CoreResult<T> = Result<T, StatsError>;

impl StatsError {
    /// API 응답에 사용하는 에러 코드.
    pub fn code(&self) -> &'static str {
        match self {
            StatsError::InvalidRange { .. } => "INVALID_RANGE",
            StatsError::InvalidTicker(_) => "INVALID_TICKER",
            StatsError::Upstream(_) => "UPSTREAM_ERROR",
            StatsError::TickerNotFound(_) => "TICKER_NOT_FOUND",
        }
    }

    /// 클라이언트 입력 때문에 발생한 에러인지 확인합니다.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            StatsError::InvalidRange { .. } | StatsError::InvalidTicker(_)
        )
    }
}
