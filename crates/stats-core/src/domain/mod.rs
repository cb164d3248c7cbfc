//! 도메인 모델.
//!
//! - [`price_bar`]: 일봉 OHLCV 데이터
//! - [`range`]: 조회 기간 (시작일/종료일 포함)
//! - [`stats`]: 기간 통계 결과
//! - [`ticker`]: 티커 정규화

pub mod price_bar;
pub mod range;
pub mod stats;
pub mod ticker;

pub use price_bar::PriceBar;
pub use range::{DateRange, DEFAULT_LOOKBACK_DAYS};
pub use stats::{PriceSummary, SeriesStats, StatsResult};
pub use ticker::normalize_ticker;
