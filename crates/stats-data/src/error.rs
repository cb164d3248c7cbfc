//! 데이터 제공자 오류 타입.

use stats_core::StatsError;
use thiserror::Error;

/// 데이터 제공자 오류.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// 네트워크 연결 오류
    #[error("Network error: {0}")]
    Network(String),

    /// 요청 타임아웃
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// 성공이 아닌 HTTP 상태
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// 응답 본문에 포함된 API 오류
    #[error("API error: {0}")]
    Api(String),

    /// 응답 파싱 오류
    #[error("Parse error: {0}")]
    Parse(String),

    /// 존재하지 않는 심볼
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),
}

/// 데이터 제공자 작업을 위한 Result 타입.
pub type ProviderResult<T> = Result<T, ProviderError>;

impl ProviderError {
    /// 심볼 미존재 오류인지 확인합니다.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ProviderError::SymbolNotFound(_))
    }

    /// 재시도로 회복될 수 있는 오류인지 확인합니다.
    pub fn is_retryable(&self) -> bool {
        match self {
            ProviderError::Network(_) | ProviderError::Timeout(_) => true,
            ProviderError::Http { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout(err.to_string())
        } else if err.is_decode() {
            ProviderError::Parse(err.to_string())
        } else if let Some(status) = err.status() {
            ProviderError::Http {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            ProviderError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::Parse(err.to_string())
    }
}

/// 서비스 경계에서 제공자 오류를 축약합니다.
///
/// 심볼 미존재만 `TickerNotFound`로 구분하고 나머지는 모두 `Upstream`입니다.
impl From<ProviderError> for StatsError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::SymbolNotFound(symbol) => StatsError::TickerNotFound(symbol),
            other => StatsError::Upstream(other.to_string()),
        }
    }
}
