//! 지표 및 스코어링 엔진.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 기술적 지표 (이동평균, 거래량 평균, 교차 감지, 리샘플링)
//! - 시리즈 준비 (원본 봉 검증·정렬·합성 간격 리샘플링)
//! - 이동평균 기반 추세 분류
//! - 5개 규칙 체크리스트 스코어링
//! - 종목 목록 스크리닝 오케스트레이션
//!
//! # Re-exports
//!
//! - [`indicators`]: 지표 계산 (IndicatorEngine, SmaParams 등)
//! - [`screening`]: 오케스트레이터 (Screener, Evaluation, ScreeningStats)

pub mod indicators;
pub mod preparator;
pub mod scorer;
pub mod screening;
pub mod trend_classifier;

// Indicators 모듈 re-exports
pub use indicators::{
    CrossEvent, CrossKind, IndicatorEngine, IndicatorError, IndicatorResult, SmaParams,
    TrendIndicators, VolumeAverageParams, VolumeIndicators,
};

pub use preparator::SeriesPreparator;
pub use scorer::Scorer;
pub use screening::{Evaluation, Screener, ScreeningStats};
pub use trend_classifier::TrendClassifier;
