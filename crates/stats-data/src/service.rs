//! 통계 서비스.
//!
//! 요청 하나의 처리 흐름:
//! 1. 티커 정규화 (빈 문자열 거부)
//! 2. 기간 해석 및 검증 (I/O 이전)
//! 3. 캐시 조회
//! 4. 미스면 데이터 제공자에서 수집 → 통계 계산 → 캐시 저장
//!
//! 제공자 오류는 캐시하지 않으므로 다음 요청이 다시 수집을 시도합니다.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{debug, info, instrument, warn};

use stats_core::{
    normalize_ticker, AppConfig, CoreResult, DateRange, StatsEngine, StatsError, StatsResult,
    DEFAULT_LOOKBACK_DAYS,
};

use crate::cache::{CacheKey, ResultCache};
use crate::flight::FlightTable;
use crate::provider::DataProvider;

/// 서비스 동작 옵션.
#[derive(Debug, Clone)]
pub struct ServiceOptions {
    /// 시작일 생략 시 거슬러 올라가는 일수
    pub lookback_days: i64,
    /// 동일 키 동시 미스를 한 번의 수집으로 병합
    pub single_flight: bool,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            single_flight: true,
        }
    }
}

impl ServiceOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            lookback_days: config.stats.default_lookback_days,
            single_flight: config.cache.single_flight,
        }
    }
}

/// 티커 + 기간 통계 서비스.
pub struct StatsService {
    provider: Arc<dyn DataProvider>,
    cache: Arc<ResultCache>,
    options: ServiceOptions,
    flights: FlightTable,
}

impl StatsService {
    /// 기본 옵션으로 서비스를 생성합니다.
    pub fn new(provider: Arc<dyn DataProvider>, cache: Arc<ResultCache>) -> Self {
        Self::with_options(provider, cache, ServiceOptions::default())
    }

    pub fn with_options(
        provider: Arc<dyn DataProvider>,
        cache: Arc<ResultCache>,
        options: ServiceOptions,
    ) -> Self {
        Self {
            provider,
            cache,
            options,
            flights: FlightTable::new(),
        }
    }

    /// 오늘(UTC) 기준으로 통계를 계산합니다.
    ///
    /// # Errors
    /// - [`StatsError::InvalidTicker`]: 정규화 후 빈 티커
    /// - [`StatsError::InvalidRange`]: 시작일 > 종료일
    /// - [`StatsError::TickerNotFound`]: 제공자가 심볼 미존재를 보고
    /// - [`StatsError::Upstream`]: 그 밖의 제공자 실패
    pub async fn compute(
        &self,
        ticker: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> CoreResult<StatsResult> {
        self.compute_as_of(ticker, start, end, Utc::now().date_naive())
            .await
    }

    /// 주어진 날짜를 "오늘"로 보고 통계를 계산합니다.
    #[instrument(skip(self), fields(provider = self.provider.name()))]
    pub async fn compute_as_of(
        &self,
        ticker: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        today: NaiveDate,
    ) -> CoreResult<StatsResult> {
        let ticker = normalize_ticker(ticker);
        if ticker.is_empty() {
            return Err(StatsError::InvalidTicker(
                "ticker must not be empty".to_string(),
            ));
        }

        let range = DateRange::resolve(start, end, today, self.options.lookback_days)?;
        let key = CacheKey::new(ticker.as_str(), &range);

        if let Some(hit) = self.cache.get(&key).await {
            debug!(key = %key, "캐시 히트");
            return Ok(hit);
        }

        if !self.options.single_flight {
            return self.fetch_and_store(key, &ticker, range).await;
        }

        let _flight = self.flights.acquire(&key).await;

        // 대기하는 동안 다른 요청이 채웠을 수 있음
        if let Some(hit) = self.cache.get(&key).await {
            debug!(key = %key, "병합된 요청 캐시 히트");
            return Ok(hit);
        }

        self.fetch_and_store(key, &ticker, range).await
    }

    async fn fetch_and_store(
        &self,
        key: CacheKey,
        ticker: &str,
        range: DateRange,
    ) -> CoreResult<StatsResult> {
        debug!(key = %key, "캐시 미스, 데이터 수집");

        let series = self.provider.fetch(ticker, range).await.map_err(|e| {
            warn!(ticker, %range, error = %e, "가격 데이터 수집 실패");
            StatsError::from(e)
        })?;

        let stats = StatsEngine::reduce(&series, range);
        let result = StatsResult::new(ticker, range, stats);

        info!(
            ticker,
            %range,
            fetched = series.len(),
            count = result.count(),
            "통계 계산 완료"
        );

        self.cache.put(key, result.clone()).await;
        Ok(result)
    }

    pub fn cache(&self) -> &Arc<ResultCache> {
        &self.cache
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub fn options(&self) -> &ServiceOptions {
        &self.options
    }
}
