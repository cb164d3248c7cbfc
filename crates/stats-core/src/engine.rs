//! 가격 시계열 통계 계산.
//!
//! I/O나 공유 상태가 없는 순수 함수만 제공합니다. 같은 입력에는 항상 같은
//! 결과를 반환하므로 모킹 없이 바로 테스트할 수 있습니다.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::{DateRange, PriceBar, PriceSummary, SeriesStats};

/// 통계 계산 엔진.
pub struct StatsEngine;

impl StatsEngine {
    /// 평균 종가 반올림 자릿수.
    pub const AVG_CLOSE_DP: u32 = 2;

    /// 평균 종가 반올림 방식 (0.005 → 0.01, -0.005 → -0.01).
    pub const AVG_CLOSE_ROUNDING: RoundingStrategy = RoundingStrategy::MidpointAwayFromZero;

    /// 가격 시계열을 요약 통계로 축약합니다.
    ///
    /// 제공자가 요청 범위 밖의 일봉을 돌려줄 수 있으므로 먼저 `range`로
    /// 필터링합니다 (양 끝 포함). 시계열은 날짜 오름차순이라고 가정하며,
    /// 같은 날짜가 여러 개면 입력 순서상 뒤에 있는 일봉의 종가를
    /// 마지막 종가로 사용합니다.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    /// use stats_core::{DateRange, PriceBar, StatsEngine};
    ///
    /// let day = NaiveDate::from_ymd_opt(2023, 1, 3).unwrap();
    /// let bar = PriceBar::new(
    ///     day,
    ///     Decimal::new(99, 0),
    ///     Decimal::new(101, 0),
    ///     Decimal::new(98, 0),
    ///     Decimal::new(100, 0),
    ///     1_000,
    /// );
    /// let range = DateRange::new(day, day).unwrap();
    ///
    /// let stats = StatsEngine::reduce(&[bar], range);
    /// assert_eq!(stats.count(), 1);
    /// ```
    pub fn reduce(series: &[PriceBar], range: DateRange) -> SeriesStats {
        let mut bars = series.iter().filter(|bar| range.contains(bar.date));

        let Some(first) = bars.next() else {
            return SeriesStats::Empty;
        };

        let mut count = 1usize;
        let mut high = first.high;
        let mut low = first.low;
        // 합계가 Decimal 범위를 넘으면 None, 이후 이동 평균 사용
        let mut close_sum = Some(first.close);
        let mut running_mean = first.close;
        let mut last = first;

        for bar in bars {
            count += 1;
            high = high.max(bar.high);
            low = low.min(bar.low);
            close_sum = close_sum.and_then(|sum| sum.checked_add(bar.close));
            running_mean = Self::step_mean(running_mean, bar.close, count);
            if bar.date >= last.date {
                last = bar;
            }
        }

        let mean = match close_sum {
            Some(sum) => sum / Decimal::from(count),
            None => running_mean,
        };

        SeriesStats::Summary(PriceSummary {
            count,
            high,
            low,
            avg_close: Self::round_avg(mean),
            last_close: last.close,
        })
    }

    /// `n`번째 값을 반영한 평균. `mean * (n-1)/n + value/n`이라 중간값이 넘치지 않습니다.
    fn step_mean(mean: Decimal, value: Decimal, n: usize) -> Decimal {
        let n = Decimal::from(n);
        mean + (value / n - mean / n)
    }

    fn round_avg(value: Decimal) -> Decimal {
        value.round_dp_with_strategy(Self::AVG_CLOSE_DP, Self::AVG_CLOSE_ROUNDING)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn bar(day: &str, high: Decimal, low: Decimal, close: Decimal) -> PriceBar {
        PriceBar::new(date(day), close, high, low, close, 1_000)
    }

    #[test]
    fn test_reduce_three_days() {
        let series = vec![
            bar("2023-01-03", dec!(101), dec!(98), dec!(100)),
            bar("2023-01-04", dec!(112), dec!(104), dec!(110)),
            bar("2023-01-05", dec!(108), dec!(103), dec!(105)),
        ];
        let range = DateRange::new(date("2023-01-03"), date("2023-01-05")).unwrap();

        let stats = StatsEngine::reduce(&series, range);
        let summary = stats.summary().unwrap();

        assert_eq!(summary.count, 3);
        assert_eq!(summary.high, dec!(112));
        assert_eq!(summary.low, dec!(98));
        assert_eq!(summary.avg_close, dec!(105.00));
        assert_eq!(summary.last_close, dec!(105));
    }

    #[test]
    fn test_reduce_single_day() {
        let series = vec![bar("2023-01-03", dec!(101.5), dec!(97.25), dec!(100.75))];
        let range = DateRange::new(date("2023-01-03"), date("2023-01-03")).unwrap();

        let summary = StatsEngine::reduce(&series, range).summary().cloned().unwrap();

        assert_eq!(summary.count, 1);
        assert_eq!(summary.high, dec!(101.5));
        assert_eq!(summary.low, dec!(97.25));
        assert_eq!(summary.avg_close, dec!(100.75));
        assert_eq!(summary.last_close, dec!(100.75));
    }

    #[test]
    fn test_reduce_empty_series() {
        let range = DateRange::new(date("2023-01-03"), date("2023-01-05")).unwrap();
        let stats = StatsEngine::reduce(&[], range);

        assert!(stats.is_empty());
        assert_eq!(stats.count(), 0);
        assert!(stats.summary().is_none());
    }

    #[test]
    fn test_reduce_filters_out_of_range_bars() {
        let series = vec![
            bar("2023-01-02", dec!(500), dec!(1), dec!(300)),
            bar("2023-01-03", dec!(101), dec!(98), dec!(100)),
            bar("2023-01-04", dec!(112), dec!(104), dec!(110)),
            bar("2023-01-06", dec!(900), dec!(2), dec!(700)),
        ];
        let range = DateRange::new(date("2023-01-03"), date("2023-01-05")).unwrap();

        let summary = StatsEngine::reduce(&series, range).summary().cloned().unwrap();

        assert_eq!(summary.count, 2);
        assert_eq!(summary.high, dec!(112));
        assert_eq!(summary.low, dec!(98));
        assert_eq!(summary.avg_close, dec!(105));
        assert_eq!(summary.last_close, dec!(110));
    }

    #[test]
    fn test_reduce_all_bars_outside_range() {
        let series = vec![bar("2022-12-30", dec!(101), dec!(98), dec!(100))];
        let range = DateRange::new(date("2023-01-03"), date("2023-01-05")).unwrap();

        assert!(StatsEngine::reduce(&series, range).is_empty());
    }

    #[test]
    fn test_avg_close_rounds_half_away_from_zero() {
        // (10.00 + 10.01) / 2 = 10.005 → 10.01
        let series = vec![
            bar("2023-01-03", dec!(11), dec!(9), dec!(10.00)),
            bar("2023-01-04", dec!(11), dec!(9), dec!(10.01)),
        ];
        let range = DateRange::new(date("2023-01-03"), date("2023-01-04")).unwrap();

        let summary = StatsEngine::reduce(&series, range).summary().cloned().unwrap();
        assert_eq!(summary.avg_close, dec!(10.01));
    }

    #[test]
    fn test_avg_close_repeating_fraction() {
        // (1 + 1 + 2) / 3 = 1.333.. → 1.33
        let series = vec![
            bar("2024-01-02", dec!(2), dec!(1), dec!(1)),
            bar("2024-01-03", dec!(2), dec!(1), dec!(1)),
            bar("2024-01-04", dec!(2), dec!(1), dec!(2)),
        ];
        let range = DateRange::new(date("2024-01-02"), date("2024-01-04")).unwrap();

        let summary = StatsEngine::reduce(&series, range).summary().cloned().unwrap();
        assert_eq!(summary.avg_close, dec!(1.33));
    }

    #[test]
    fn test_last_close_tie_uses_later_input() {
        let series = vec![
            bar("2023-01-03", dec!(101), dec!(98), dec!(100)),
            bar("2023-01-03", dec!(101), dec!(98), dec!(99)),
        ];
        let range = DateRange::new(date("2023-01-03"), date("2023-01-03")).unwrap();

        let summary = StatsEngine::reduce(&series, range).summary().cloned().unwrap();
        assert_eq!(summary.count, 2);
        assert_eq!(summary.last_close, dec!(99));
    }

    #[test]
    fn test_reduce_does_not_overflow_on_huge_closes() {
        let huge: Decimal = "50000000000000000000000000000".parse().unwrap();
        let series = vec![
            bar("2023-01-03", huge, huge, huge),
            bar("2023-01-04", huge, huge, huge),
        ];
        let range = DateRange::new(date("2023-01-03"), date("2023-01-04")).unwrap();

        let summary = StatsEngine::reduce(&series, range).summary().cloned().unwrap();
        assert_eq!(summary.count, 2);
        assert_eq!(summary.avg_close, huge);
        assert_eq!(summary.last_close, huge);
    }

    #[test]
    fn test_step_mean_matches_plain_mean() {
        let mean = StatsEngine::step_mean(dec!(10), dec!(20), 2);
        assert_eq!(mean, dec!(15));

        let mean = StatsEngine::step_mean(mean, dec!(30), 3);
        assert_eq!(mean, dec!(20));
    }

    proptest! {
        #[test]
        fn prop_count_matches_bars_in_range(
            closes in prop::collection::vec(1u32..100_000, 0..60),
            start_offset in 0i64..30,
            span in 0i64..30,
        ) {
            let base = date("2023-01-01");
            let series: Vec<PriceBar> = closes
                .iter()
                .enumerate()
                .map(|(i, close)| {
                    let close = Decimal::new(i64::from(*close), 2);
                    PriceBar::new(
                        base + chrono::Duration::days(i as i64),
                        close,
                        close + Decimal::ONE,
                        close,
                        close,
                        0,
                    )
                })
                .collect();

            let start = base + chrono::Duration::days(start_offset);
            let range = DateRange::new(start, start + chrono::Duration::days(span)).unwrap();
            let expected = series.iter().filter(|b| range.contains(b.date)).count();

            let stats = StatsEngine::reduce(&series, range);
            prop_assert_eq!(stats.count(), expected);

            if let Some(summary) = stats.summary() {
                prop_assert!(summary.low <= summary.high);
                prop_assert!(summary.avg_close >= summary.low.round_dp(2) - dec!(0.01));
                prop_assert!(summary.avg_close <= summary.high);
                prop_assert!(summary.avg_close.scale() <= 2);
            }
        }
    }
}
