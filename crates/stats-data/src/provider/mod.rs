//! 외부 가격 데이터 제공자.
//!
//! - [`yahoo`]: Yahoo Finance chart API (일봉)

pub mod yahoo;

pub use yahoo::YahooChartProvider;

use async_trait::async_trait;
use stats_core::{DateRange, PriceBar};

use crate::error::ProviderResult;

/// 일봉 가격 데이터 제공자.
///
/// 구현체는 요청 범위를 양 끝 포함으로 해석해야 합니다. 범위 밖의 일봉이
/// 섞여 있어도 통계 엔진이 다시 필터링하므로 괜찮지만, 시계열은 날짜
/// 오름차순이어야 합니다.
///
/// 존재하지 않는 심볼을 구분할 수 있는 제공자는
/// [`ProviderError::SymbolNotFound`](crate::ProviderError::SymbolNotFound)를
/// 반환합니다. 구분할 수 없다면 해당 오류를 만들지 않으면 됩니다.
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// 로그와 헬스 체크에 표시되는 제공자 이름.
    fn name(&self) -> &'static str;

    /// 정규화된 티커의 일봉 시계열을 조회합니다.
    async fn fetch(&self, ticker: &str, range: DateRange) -> ProviderResult<Vec<PriceBar>>;
}
