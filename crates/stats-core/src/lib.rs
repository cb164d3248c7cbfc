//! # Stats Core
//!
//! 주가 통계 서비스의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 서비스 전반에서 사용되는 기본 타입을 제공합니다:
//! - 일봉 가격 데이터 (`PriceBar`)
//! - 날짜 범위 및 기본값 해석 (`DateRange`)
//! - 통계 결과 (`StatsResult`)
//! - 순수 통계 계산 엔진 (`StatsEngine`)
//! - 에러 분류
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod logging;

pub use crate::config::*;
pub use domain::*;
pub use engine::StatsEngine;
pub use error::*;
pub use logging::*;
