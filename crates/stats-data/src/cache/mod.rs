//! 통계 결과 캐시.
//!
//! - [`result`]: 티커 + 기간 단위 TTL 캐시

pub mod result;

pub use result::{CacheKey, CacheStats, ResultCache};
