//! # Stats Data
//!
//! 가격 데이터 수집과 통계 결과 캐싱을 담당합니다.
//!
//! - [`provider`]: 외부 가격 데이터 제공자 (`DataProvider`, Yahoo chart API)
//! - [`cache`]: TTL 기반 인메모리 결과 캐시
//! - [`service`]: 검증 → 캐시 조회 → 수집 → 계산 → 저장 흐름
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use stats_data::{ResultCache, StatsService, YahooChartProvider};
//!
//! let provider = Arc::new(YahooChartProvider::from_config(&config.provider)?);
//! let cache = Arc::new(ResultCache::from_config(&config.cache));
//! let service = StatsService::new(provider, cache);
//!
//! let result = service.compute("msft", None, None).await?;
//! ```

pub mod cache;
pub mod error;
mod flight;
pub mod provider;
pub mod service;

pub use cache::{CacheKey, CacheStats, ResultCache};
pub use error::{ProviderError, ProviderResult};
pub use provider::{DataProvider, YahooChartProvider};
pub use service::{ServiceOptions, StatsService};
