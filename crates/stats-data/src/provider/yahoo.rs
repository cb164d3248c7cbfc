//! Yahoo Finance chart API 제공자.
//!
//! `GET {base_url}/v8/finance/chart/{ticker}?period1=..&period2=..&interval=1d`
//!
//! `period2`는 배타적이므로 종료일 다음 날 0시(UTC)를 보냅니다. 응답의
//! 타임스탬프는 장 시작 시각(UTC)이며, `meta.gmtoffset`을 더해 거래소 현지
//! 날짜로 변환합니다.

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use reqwest::Url;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, warn};

use stats_core::{DateRange, PriceBar, ProviderConfig};

use super::DataProvider;
use crate::error::{ProviderError, ProviderResult};

const PRICE_DP: u32 = 6;
/// 이 값을 넘는 가격은 손상된 응답으로 간주합니다.
const MAX_PRICE: f64 = 1e12;
const ERROR_BODY_LIMIT: usize = 200;

/// Yahoo Finance chart API 클라이언트.
#[derive(Debug, Clone)]
pub struct YahooChartProvider {
    client: reqwest::Client,
    base_url: String,
}

impl YahooChartProvider {
    /// 설정으로 클라이언트를 생성합니다.
    pub fn from_config(config: &ProviderConfig) -> ProviderResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// 기본 설정에 다른 기본 URL을 사용합니다.
    pub fn with_base_url(base_url: impl Into<String>) -> ProviderResult<Self> {
        let config = ProviderConfig {
            base_url: base_url.into(),
            ..Default::default()
        };
        Self::from_config(&config)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn chart_url(&self, ticker: &str) -> ProviderResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ProviderError::Network(format!("invalid base url: {}", e)))?;

        url.path_segments_mut()
            .map_err(|_| ProviderError::Network(format!("invalid base url: {}", self.base_url)))?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", ticker]);

        Ok(url)
    }
}

#[async_trait]
impl DataProvider for YahooChartProvider {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    async fn fetch(&self, ticker: &str, range: DateRange) -> ProviderResult<Vec<PriceBar>> {
        let url = self.chart_url(ticker)?;
        let period1 = day_start_timestamp(range.start());
        let period2 = day_start_timestamp(range.end().succ_opt().unwrap_or(range.end()));

        debug!(ticker, %range, period1, period2, "Yahoo chart API 호출");

        let response = self
            .client
            .get(url)
            .query(&[
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
                ("interval", "1d".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status == reqwest::StatusCode::NOT_FOUND {
            debug!(ticker, "Yahoo 심볼 없음");
            return Err(ProviderError::SymbolNotFound(ticker.to_string()));
        }

        if !status.is_success() {
            // 실패 응답에도 chart.error가 있으면 그쪽 분류를 따릅니다.
            if let Err(err @ ProviderError::SymbolNotFound(_)) = parse_chart_response(ticker, &body)
            {
                return Err(err);
            }

            warn!(ticker, status = status.as_u16(), "Yahoo chart API 오류 응답");
            return Err(ProviderError::Http {
                status: status.as_u16(),
                message: truncate(&body, ERROR_BODY_LIMIT),
            });
        }

        let bars = parse_chart_response(ticker, &body)?;
        debug!(ticker, count = bars.len(), "Yahoo 일봉 수신");

        Ok(bars)
    }
}

/// chart API 응답 본문을 일봉 시계열로 변환합니다.
///
/// 가격이 하나라도 비어 있거나 0 이하인 행은 건너뜁니다 (휴장일, 거래 정지 등).
/// 결과는 날짜 오름차순입니다. 비정상적으로 큰 가격이 있으면
/// [`ProviderError::Parse`]를 반환합니다.
pub fn parse_chart_response(ticker: &str, body: &str) -> ProviderResult<Vec<PriceBar>> {
    let envelope: ChartEnvelope = serde_json::from_str(body)?;
    let chart = envelope.chart;

    if let Some(error) = chart.error {
        if error.code.eq_ignore_ascii_case("Not Found") {
            return Err(ProviderError::SymbolNotFound(ticker.to_string()));
        }
        return Err(ProviderError::Api(format!(
            "{}: {}",
            error.code,
            error.description.unwrap_or_default()
        )));
    }

    let result = chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| ProviderError::Parse("chart.result is empty".to_string()))?;

    let timestamps = result.timestamp.unwrap_or_default();
    if timestamps.is_empty() {
        return Ok(Vec::new());
    }

    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::Parse("missing quote indicators".to_string()))?;

    let offset = result.meta.gmtoffset;
    let mut bars = Vec::with_capacity(timestamps.len());
    let mut skipped = 0usize;

    for (i, ts) in timestamps.iter().enumerate() {
        let row = (
            price_at(&quote.open, i)?,
            price_at(&quote.high, i)?,
            price_at(&quote.low, i)?,
            price_at(&quote.close, i)?,
            local_date(*ts, offset),
        );

        match row {
            (Some(open), Some(high), Some(low), Some(close), Some(date)) => {
                let volume = quote.volume.get(i).copied().flatten().unwrap_or(0);
                bars.push(PriceBar::new(date, open, high, low, close, volume));
            }
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!(ticker, skipped, "불완전한 일봉 제외");
    }

    bars.sort_by_key(|bar| bar.date);
    Ok(bars)
}

fn price_at(values: &[Option<f64>], i: usize) -> ProviderResult<Option<Decimal>> {
    let Some(value) = values.get(i).copied().flatten() else {
        return Ok(None);
    };
    if !value.is_finite() || value <= 0.0 {
        return Ok(None);
    }
    if value > MAX_PRICE {
        return Err(ProviderError::Parse(format!(
            "price out of range at row {i}: {value}"
        )));
    }
    Ok(Decimal::from_f64_retain(value).map(|d| d.round_dp(PRICE_DP).normalize()))
}

fn local_date(timestamp: i64, gmtoffset: i64) -> Option<NaiveDate> {
    Utc.timestamp_opt(timestamp.checked_add(gmtoffset)?, 0)
        .single()
        .map(|dt| dt.date_naive())
}

fn day_start_timestamp(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or_default()
}

fn truncate(body: &str, limit: usize) -> String {
    match body.char_indices().nth(limit) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    #[serde(default)]
    indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
struct ChartMeta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Default, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteBlock>,
}

#[derive(Debug, Deserialize)]
struct QuoteBlock {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}
