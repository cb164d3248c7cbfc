//! 동일 키 동시 조회 병합 (single-flight).
//!
//! 같은 캐시 키로 동시에 들어온 미스 요청 중 하나만 데이터 제공자를
//! 호출하고, 나머지는 잠금을 기다린 뒤 캐시를 다시 확인합니다.
//!
//! 테이블 항목은 보유자 수(잠금 보유 + 대기 중)로 관리합니다. 대기 중인
//! 요청이 취소되어도 보유자 수가 줄어들기 때문에 항목이 남지 않습니다.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::cache::CacheKey;

type LockTable = Arc<Mutex<HashMap<CacheKey, Slot>>>;

#[derive(Debug)]
struct Slot {
    lock: Arc<AsyncMutex<()>>,
    holders: usize,
}

/// 키별 수집 잠금 테이블.
#[derive(Debug, Default)]
pub(crate) struct FlightTable {
    locks: LockTable,
}

/// 키에 대한 수집 권한.
///
/// 필드 순서대로 drop되므로 잠금을 먼저 풀고 보유자 수를 줄입니다.
pub(crate) struct Flight {
    _permit: OwnedMutexGuard<()>,
    _holder: Holder,
}

/// 테이블 항목에 대한 참조. drop 시 보유자 수를 줄이고 0이면 항목을 제거합니다.
struct Holder {
    key: CacheKey,
    locks: LockTable,
}

impl FlightTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// 키의 수집 잠금을 획득합니다. 다른 요청이 수집 중이면 끝날 때까지 대기합니다.
    ///
    /// 대기 중에 future가 drop되면 (타임아웃, 연결 종료) 보유자 등록도 해제됩니다.
    pub(crate) async fn acquire(&self, key: &CacheKey) -> Flight {
        let (lock, holder) = self.register(key);
        let permit = lock.lock_owned().await;

        Flight {
            _permit: permit,
            _holder: holder,
        }
    }

    /// 진행 중인 수집 키 수.
    #[cfg(test)]
    pub(crate) fn in_flight(&self) -> usize {
        self.locks.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// 키의 보유자 수 (잠금 보유 + 대기 중).
    #[cfg(test)]
    fn holders(&self, key: &CacheKey) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .map(|slot| slot.holders)
            .unwrap_or(0)
    }

    fn register(&self, key: &CacheKey) -> (Arc<AsyncMutex<()>>, Holder) {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        let slot = locks.entry(key.clone()).or_insert_with(|| Slot {
            lock: Arc::new(AsyncMutex::new(())),
            holders: 0,
        });
        slot.holders += 1;

        let holder = Holder {
            key: key.clone(),
            locks: Arc::clone(&self.locks),
        };
        (Arc::clone(&slot.lock), holder)
    }
}

impl Drop for Holder {
    fn drop(&mut self) {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(slot) = locks.get_mut(&self.key) {
            slot.holders = slot.holders.saturating_sub(1);
            if slot.holders == 0 {
                locks.remove(&self.key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stats_core::DateRange;

    fn key(ticker: &str) -> CacheKey {
        let range = DateRange::new("2023-01-03".parse().unwrap(), "2023-01-05".parse().unwrap())
            .unwrap();
        CacheKey::new(ticker, &range)
    }

    async fn wait_for_holders(table: &FlightTable, key: &CacheKey, n: usize) {
        while table.holders(key) < n {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_flight_removed_after_drop() {
        let table = FlightTable::new();

        let flight = table.acquire(&key("MSFT")).await;
        assert_eq!(table.in_flight(), 1);

        drop(flight);
        assert_eq!(table.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_waiter_keeps_entry_alive() {
        let table = Arc::new(FlightTable::new());
        let first = table.acquire(&key("MSFT")).await;

        let waiter = {
            let table = Arc::clone(&table);
            tokio::spawn(async move {
                let _flight = table.acquire(&key("MSFT")).await;
            })
        };
        wait_for_holders(&table, &key("MSFT"), 2).await;

        drop(first);
        assert_eq!(table.in_flight(), 1);

        waiter.await.unwrap();
        assert_eq!(table.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_waiter_after_release_leaves_no_entry() {
        let table = Arc::new(FlightTable::new());
        let first = table.acquire(&key("MSFT")).await;

        let waiter = {
            let table = Arc::clone(&table);
            tokio::spawn(async move {
                let _flight = table.acquire(&key("MSFT")).await;
                std::future::pending::<()>().await;
            })
        };
        wait_for_holders(&table, &key("MSFT"), 2).await;

        drop(first);
        assert_eq!(table.in_flight(), 1);

        waiter.abort();
        assert!(waiter.await.unwrap_err().is_cancelled());
        assert_eq!(table.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_waiter_while_held() {
        let table = Arc::new(FlightTable::new());
        let first = table.acquire(&key("MSFT")).await;

        let waiter = {
            let table = Arc::clone(&table);
            tokio::spawn(async move {
                let _flight = table.acquire(&key("MSFT")).await;
            })
        };
        wait_for_holders(&table, &key("MSFT"), 2).await;

        waiter.abort();
        let _ = waiter.await;
        assert_eq!(table.holders(&key("MSFT")), 1);

        drop(first);
        assert_eq!(table.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_distinct_keys_do_not_block() {
        let table = FlightTable::new();
        let _msft = table.acquire(&key("MSFT")).await;
        let _aapl = table.acquire(&key("AAPL")).await;

        assert_eq!(table.in_flight(), 2);
    }
}
