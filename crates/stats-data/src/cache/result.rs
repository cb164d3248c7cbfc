//! TTL 기반 인메모리 결과 캐시.
//!
//! 만료는 조회 시점에 판단합니다 (경과 시간 ≥ TTL이면 만료). 백그라운드
//! 정리 작업은 없으며, 필요하면 [`ResultCache::purge_expired`]를 호출합니다.
//!
//! 최대 항목 수가 설정되어 있으면 삽입 시 만료 항목을 먼저 정리하고,
//! 그래도 가득 차 있으면 가장 먼저 저장된 항목부터 제거합니다.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::NaiveDate;
use serde::Serialize;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

use stats_core::{normalize_ticker, CacheConfig, DateRange, StatsResult};

/// 캐시 키 (정규화된 티커 + 해석된 기간).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub ticker: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl CacheKey {
    /// 티커는 정규화(공백 제거 + 대문자)해서 저장합니다.
    pub fn new(ticker: &str, range: &DateRange) -> Self {
        Self {
            ticker: normalize_ticker(ticker),
            start: range.start(),
            end: range.end(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stats:{}:{}:{}", self.ticker, self.start, self.end)
    }
}

/// 캐시 통계.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// 현재 저장된 항목 수 (만료되었지만 아직 정리되지 않은 항목 포함)
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    /// 만료 또는 용량 초과로 제거된 항목 수
    pub evictions: u64,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: StatsResult,
    created_at: Instant,
    seq: u64,
}

/// 통계 결과 캐시.
pub struct ResultCache {
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
    ttl: Duration,
    max_entries: Option<usize>,
    next_seq: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl ResultCache {
    /// 기본 TTL (15분).
    pub const DEFAULT_TTL: Duration = Duration::from_secs(15 * 60);

    /// 주어진 TTL로 용량 제한 없는 캐시를 생성합니다.
    ///
    /// TTL이 0이면 저장한 항목이 즉시 만료되므로 사실상 캐시가 꺼집니다.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            max_entries: None,
            next_seq: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// 설정값(TTL, 최대 항목 수)으로 캐시를 생성합니다.
    pub fn from_config(config: &CacheConfig) -> Self {
        let cache = Self::new(config.ttl());
        match config.max_entries {
            Some(max) => cache.with_max_entries(max),
            None => cache,
        }
    }

    /// 아무것도 저장하지 않는 캐시.
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    /// 최대 항목 수를 설정합니다 (최소 1).
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = Some(max_entries.max(1));
        self
    }

    /// 항목 TTL.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn max_entries(&self) -> Option<usize> {
        self.max_entries
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    /// 유효한 항목을 조회합니다.
    ///
    /// 만료된 항목은 이 시점에 제거되고 `None`을 반환합니다.
    pub async fn get(&self, key: &CacheKey) -> Option<StatsResult> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if !self.is_expired(entry) => {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    return Some(entry.value.clone());
                }
                Some(_) => {}
                None => {
                    self.misses.fetch_add(1, Ordering::Relaxed);
                    return None;
                }
            }
        }

        // 만료 항목: 쓰기 잠금을 잡은 사이에 새 값이 들어왔을 수 있으므로 다시 확인
        let mut entries = self.entries.write().await;
        let fresh = entries
            .get(key)
            .filter(|entry| !self.is_expired(entry))
            .map(|entry| entry.value.clone());
        if fresh.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return fresh;
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        if entries.remove(key).is_some() {
            self.evictions.fetch_add(1, Ordering::Relaxed);
            debug!(key = %key, "만료된 캐시 항목 제거");
        }
        None
    }

    /// 결과를 저장합니다. 같은 키의 기존 항목은 덮어씁니다.
    pub async fn put(&self, key: CacheKey, value: StatsResult) {
        if !self.is_enabled() {
            return;
        }

        let mut entries = self.entries.write().await;

        if let Some(max) = self.max_entries {
            if !entries.contains_key(&key) && entries.len() >= max {
                let purged = self.remove_expired(&mut entries);
                if purged > 0 {
                    debug!(purged, "용량 확보를 위해 만료 항목 정리");
                }
            }

            while !entries.contains_key(&key) && entries.len() >= max {
                let oldest = entries
                    .iter()
                    .min_by_key(|(_, entry)| entry.seq)
                    .map(|(k, _)| k.clone());

                match oldest {
                    Some(oldest) => {
                        entries.remove(&oldest);
                        self.evictions.fetch_add(1, Ordering::Relaxed);
                        debug!(key = %oldest, "용량 초과로 가장 오래된 항목 제거");
                    }
                    None => break,
                }
            }
        }

        let entry = CacheEntry {
            value,
            created_at: Instant::now(),
            seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
        };
        entries.insert(key, entry);
    }

    /// 만료된 항목을 모두 제거하고 제거한 개수를 반환합니다.
    pub async fn purge_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        self.remove_expired(&mut entries)
    }

    /// 모든 항목을 제거합니다. 통계 카운터는 유지됩니다.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    /// 저장된 항목 수 (만료되었지만 아직 정리되지 않은 항목 포함).
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len().await,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }

    fn is_expired(&self, entry: &CacheEntry) -> bool {
        entry.created_at.elapsed() >= self.ttl
    }

    fn remove_expired(&self, entries: &mut HashMap<CacheKey, CacheEntry>) -> usize {
        let before = entries.len();
        entries.retain(|_, entry| !self.is_expired(entry));
        let removed = before - entries.len();
        self.evictions.fetch_add(removed as u64, Ordering::Relaxed);
        removed
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TTL)
    }
}

impl fmt::Debug for ResultCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultCache")
            .field("ttl", &self.ttl)
            .field("max_entries", &self.max_entries)
            .finish_non_exhaustive()
    }
}
