//! # Screener Core
//!
//! 주식 스크리너의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 스크리닝 엔진 전반에서 사용되는 기본 타입을 제공합니다:
//! - OHLCV 봉(`Bar`) 및 시계열(`Series`)
//! - 봉 간격(`Interval`)과 조회 기간(`Period`)
//! - 펀더멘털, 지표 세트, 점수 결과, 스크리닝 리포트
//! - 시장 데이터 소스 추상화(`MarketDataSource`)
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use types::*;
