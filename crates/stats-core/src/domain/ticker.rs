//! 티커 심볼 정규화.

/// 티커를 정규화합니다 (앞뒤 공백 제거 + 대문자).
///
/// 캐시 키와 데이터 제공자 호출은 모두 정규화된 티커를 사용합니다.
pub fn normalize_ticker(raw: &str) -> String {
    raw.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_ticker() {
        assert_eq!(normalize_ticker("msft"), "MSFT");
        assert_eq!(normalize_ticker("  Aapl "), "AAPL");
        assert_eq!(normalize_ticker("brk-b"), "BRK-B");
        assert_eq!(normalize_ticker("   "), "");
    }
}
