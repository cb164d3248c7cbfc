//! 모든 핸들러에서 공유되는 애플리케이션 상태.

use std::sync::Arc;

use stats_data::StatsService;

/// 애플리케이션 공유 상태.
///
/// `Arc`로 감싸 axum `State` extractor로 주입합니다.
#[derive(Clone)]
pub struct AppState {
    /// 통계 서비스 (캐시 포함)
    pub service: Arc<StatsService>,

    /// 서버 시작 시간
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    pub fn new(service: Arc<StatsService>) -> Self {
        Self {
            service,
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 서버 업타임(초).
    pub fn uptime_secs(&self) -> i64 {
        chrono::Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    use async_trait::async_trait;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use stats_core::{DateRange, PriceBar};
    use stats_data::{DataProvider, ProviderError, ProviderResult, ResultCache};

    /// 고정된 3일치 일봉을 돌려주는 제공자. `ZZZZ`는 존재하지 않는 심볼,
    /// `FAIL`은 네트워크 오류로 처리합니다.
    pub(crate) struct FixtureProvider;

    #[async_trait]
    impl DataProvider for FixtureProvider {
        fn name(&self) -> &'static str {
            "fixture"
        }

        async fn fetch(&self, ticker: &str, _range: DateRange) -> ProviderResult<Vec<PriceBar>> {
            match ticker {
                "ZZZZ" => Err(ProviderError::SymbolNotFound(ticker.to_string())),
                "FAIL" => Err(ProviderError::Network("connection refused".into())),
                _ => {
                    let day = |d: u32| NaiveDate::from_ymd_opt(2023, 1, d).unwrap();
                    Ok(vec![
                        PriceBar::new(day(3), dec!(99), dec!(101), dec!(98), dec!(100), 1000),
                        PriceBar::new(day(4), dec!(104.5), dec!(112), dec!(104), dec!(110), 2000),
                        PriceBar::new(day(5), dec!(109), dec!(108), dec!(103), dec!(105), 1500),
                    ])
                }
            }
        }
    }

    pub(crate) fn create_test_state() -> Arc<AppState> {
        let service = StatsService::new(Arc::new(FixtureProvider), Arc::new(ResultCache::default()));
        Arc::new(AppState::new(Arc::new(service)))
    }
}
