//! 설정 관리.
//!
//! 로드 순서: 기본값 → 설정 파일(선택) → `STATS__` 접두사 환경 변수.
//! 예: `STATS__CACHE__TTL_SECS=60`, `STATS__SERVER__PORT=9000`.

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::DEFAULT_LOOKBACK_DAYS;
use crate::logging::{LogConfig, LogFormat};

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP 서버 설정
    pub server: ServerConfig,
    /// 로깅 설정
    pub logging: LoggingConfig,
    /// 결과 캐시 설정
    pub cache: CacheConfig,
    /// 데이터 제공자 설정
    pub provider: ProviderConfig,
    /// 통계 계산 설정
    pub stats: StatsConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
    /// 요청 타임아웃 (초)
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            request_timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    /// 바인딩 주소를 파싱합니다.
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    /// 요청 처리 제한 시간.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl LoggingConfig {
    /// 알 수 없는 형식은 pretty로 처리합니다.
    pub fn to_log_config(&self) -> LogConfig {
        let format = self.format.parse().unwrap_or(LogFormat::Pretty);
        LogConfig::new(self.level.clone()).with_format(format)
    }
}

/// 결과 캐시 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// 항목 TTL (초). 0이면 캐시를 사용하지 않습니다.
    pub ttl_secs: u64,
    /// 최대 항목 수 (없으면 무제한)
    pub max_entries: Option<usize>,
    /// 동일 키 동시 요청 병합 여부
    pub single_flight: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 900,
            max_entries: None,
            single_flight: true,
        }
    }
}

impl CacheConfig {
    /// 항목 TTL.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// 데이터 제공자 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Yahoo chart API 기본 URL
    pub base_url: String,
    /// HTTP 요청 타임아웃 (초)
    pub timeout_secs: u64,
    /// 요청에 보낼 User-Agent 헤더
    pub user_agent: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://query1.finance.yahoo.com".to_string(),
            timeout_secs: 10,
            user_agent: "Mozilla/5.0 (compatible; stock-stats/0.1)".to_string(),
        }
    }
}

impl ProviderConfig {
    /// HTTP 요청 제한 시간.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// 허용하는 최대 기본 조회 일수 (약 100년).
pub const MAX_LOOKBACK_DAYS: i64 = 36_500;

/// 통계 계산 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StatsConfig {
    /// 시작일 생략 시 종료일로부터 거슬러 올라가는 일수
    pub default_lookback_days: i64,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            default_lookback_days: DEFAULT_LOOKBACK_DAYS,
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 기본값과 환경 변수만 사용합니다.
    ///
    /// # Errors
    /// 파싱에 실패하거나 [`AppConfig::validate`]를 통과하지 못하면 에러를 반환합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix("STATS")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// 값의 범위를 검증합니다.
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        let days = self.stats.default_lookback_days;
        if !(1..=MAX_LOOKBACK_DAYS).contains(&days) {
            return Err(config::ConfigError::Message(format!(
                "stats.default_lookback_days must be between 1 and {MAX_LOOKBACK_DAYS} (got {days})"
            )));
        }
        Ok(())
    }

    /// 기본 경로(`config/default.toml`)에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        Self::load("config/default.toml")
    }
}
