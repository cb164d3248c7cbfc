//! 기간 통계 결과.
//!
//! 결과는 값 타입으로 취급합니다. 캐시와 서비스는 항상 복제본을 반환합니다.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::range::DateRange;

/// 거래일이 한 개 이상일 때의 요약 통계.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceSummary {
    /// 기간 내 거래일 수 (1 이상)
    pub count: usize,
    /// 기간 최고가 (일봉 고가의 최댓값)
    pub high: Decimal,
    /// 기간 최저가 (일봉 저가의 최솟값)
    pub low: Decimal,
    /// 평균 종가 (소수점 둘째 자리, half-away-from-zero 반올림)
    pub avg_close: Decimal,
    /// 마지막 거래일 종가
    pub last_close: Decimal,
}

/// 가격 시계열의 축약 결과.
///
/// 기간 내 거래일이 없으면 `Empty`입니다. 에러가 아니라 "거래일 0개"라는
/// 유효한 답입니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeriesStats {
    /// 기간 내 거래일 없음
    Empty,
    /// 요약 통계
    Summary(PriceSummary),
}

impl SeriesStats {
    /// 거래일 수.
    pub fn count(&self) -> usize {
        match self {
            SeriesStats::Empty => 0,
            SeriesStats::Summary(summary) => summary.count,
        }
    }

    /// 요약 통계 (비어 있으면 `None`).
    pub fn summary(&self) -> Option<&PriceSummary> {
        match self {
            SeriesStats::Empty => None,
            SeriesStats::Summary(summary) => Some(summary),
        }
    }

    /// 거래일이 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        matches!(self, SeriesStats::Empty)
    }
}

/// 티커 + 기간에 대한 통계 결과.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsResult {
    /// 정규화된 티커 (대문자)
    pub ticker: String,
    /// 해석된 조회 기간
    pub range: DateRange,
    /// 통계
    pub stats: SeriesStats,
}

impl StatsResult {
    /// 새 통계 결과를 생성합니다.
    pub fn new(ticker: impl Into<String>, range: DateRange, stats: SeriesStats) -> Self {
        Self {
            ticker: ticker.into(),
            range,
            stats,
        }
    }

    /// 조회 시작일.
    pub fn start(&self) -> NaiveDate {
        self.range.start()
    }

    /// 조회 종료일 (포함).
    pub fn end(&self) -> NaiveDate {
        self.range.end()
    }

    /// 거래일 수.
    pub fn count(&self) -> usize {
        self.stats.count()
    }

    /// 최고가 (거래일이 없으면 `None`).
    pub fn high(&self) -> Option<Decimal> {
        self.stats.summary().map(|s| s.high)
    }

    /// 최저가 (거래일이 없으면 `None`).
    pub fn low(&self) -> Option<Decimal> {
        self.stats.summary().map(|s| s.low)
    }

    /// 평균 종가 (거래일이 없으면 `None`).
    pub fn avg_close(&self) -> Option<Decimal> {
        self.stats.summary().map(|s| s.avg_close)
    }

    /// 마지막 종가 (거래일이 없으면 `None`).
    pub fn last_close(&self) -> Option<Decimal> {
        self.stats.summary().map(|s| s.last_close)
    }

    /// 거래일이 없는 결과인지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }
}
