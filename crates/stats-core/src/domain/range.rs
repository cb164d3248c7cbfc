//! 조회 기간.

use std::fmt;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::error::{CoreResult, StatsError};

/// 시작일이 없을 때 종료일로부터 거슬러 올라가는 기본 일수.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 365;

/// 시작일과 종료일을 모두 포함하는 날짜 범위.
///
/// `start <= end`가 항상 성립합니다. 생성은 [`DateRange::new`] 또는
/// [`DateRange::resolve`]로만 가능합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// 검증된 날짜 범위를 생성합니다.
    ///
    /// # Errors
    /// `start > end`이면 [`StatsError::InvalidRange`]를 반환합니다.
    pub fn new(start: NaiveDate, end: NaiveDate) -> CoreResult<Self> {
        if start > end {
            return Err(StatsError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// 요청 파라미터로부터 기간을 해석합니다.
    ///
    /// 규칙:
    /// - 시작일과 종료일이 모두 주어졌는데 `start > end`이면 기본값 적용 전에 거부
    /// - 종료일이 없으면 `today`
    /// - 시작일이 없으면 종료일로부터 `lookback_days`일 전
    ///
    /// 기본값을 적용한 결과도 다시 검증합니다 (예: 미래 시작일 + 종료일 생략).
    pub fn resolve(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        today: NaiveDate,
        lookback_days: i64,
    ) -> CoreResult<Self> {
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(StatsError::InvalidRange { start, end });
            }
        }

        let end = end.unwrap_or(today);
        let start = start.unwrap_or_else(|| {
            Duration::try_days(lookback_days)
                .and_then(|days| end.checked_sub_signed(days))
                .unwrap_or(NaiveDate::MIN)
        });

        Self::new(start, end)
    }

    /// 시작일.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// 종료일 (포함).
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// 날짜가 범위 안에 있는지 확인합니다 (양 끝 포함).
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}
