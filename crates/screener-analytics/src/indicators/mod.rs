//! 기술적 지표 모듈.
//!
//! 스크리닝 규칙에서 사용하는 기술적 지표를 제공합니다.
//!
//! # 지원 지표
//!
//! ## 추세 지표 (Trend Indicators)
//! - **SMA**: 단순 이동평균 (Simple Moving Average)
//! - **골든/데드 크로스**: 단기·장기 이동평균 교차
//!
//! ## 거래량 지표 (Volume Indicators)
//! - **거래량 이동평균**과 평균 대비 비율
//!
//! ## 리샘플링
//! - 고정 폭 버킷 기반 봉 합성 (1시간봉 → 4시간봉)
//!
//! # 사용 예시
//!
//! ```ignore
//! use screener_analytics::indicators::{IndicatorEngine, SmaParams};
//!
//! let engine = IndicatorEngine::new();
//!
//! // SMA 계산
//! let ma13 = engine.sma(&closes, SmaParams { period: 13 })?;
//! ```

pub mod resample;
pub mod trend;
pub mod volume;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

pub use resample::{bucket_start, resample_bars};
pub use trend::{CrossEvent, CrossKind, SmaParams, TrendIndicators};
pub use volume::{VolumeAverageParams, VolumeIndicators};

/// 지표 계산 오류.
#[derive(Debug, Error)]
pub enum IndicatorError {
    /// 잘못된 파라미터
    #[error("잘못된 파라미터: {0}")]
    InvalidParameter(String),
}

/// 지표 계산 결과 타입.
pub type IndicatorResult<T> = Result<T, IndicatorError>;

/// 통합 지표 엔진.
///
/// 스크리닝에 필요한 지표 계산을 위한 통합 인터페이스를 제공합니다.
#[derive(Debug, Default)]
pub struct IndicatorEngine {
    trend: TrendIndicators,
    volume: VolumeIndicators,
}

impl IndicatorEngine {
    /// 새로운 지표 엔진 생성.
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== 추세 지표 ====================

    /// 단순 이동평균 (SMA) 계산.
    ///
    /// # 인자
    /// * `prices` - 가격 데이터 (종가)
    /// * `params` - SMA 파라미터 (기간)
    ///
    /// # 반환
    /// 계산된 SMA 값들의 벡터 (처음 period-1개는 None)
    pub fn sma(&self, prices: &[Decimal], params: SmaParams) -> IndicatorResult<Vec<Option<Decimal>>> {
        self.trend.sma(prices, params)
    }

    /// 골든 크로스 감지.
    pub fn detect_golden_cross(
        &self,
        short_ma: &[Option<Decimal>],
        long_ma: &[Option<Decimal>],
    ) -> Vec<bool> {
        self.trend.detect_golden_cross(short_ma, long_ma)
    }

    /// 데드 크로스 감지.
    pub fn detect_dead_cross(
        &self,
        short_ma: &[Option<Decimal>],
        long_ma: &[Option<Decimal>],
    ) -> Vec<bool> {
        self.trend.detect_dead_cross(short_ma, long_ma)
    }

    /// 가장 최근의 교차 이벤트.
    pub fn latest_cross(
        &self,
        timestamps: &[DateTime<Utc>],
        short_ma: &[Option<Decimal>],
        long_ma: &[Option<Decimal>],
    ) -> Option<CrossEvent> {
        self.trend.latest_cross(timestamps, short_ma, long_ma)
    }

    // ==================== 거래량 지표 ====================

    /// 거래량 이동평균 계산.
    pub fn average_volume(
        &self,
        volumes: &[u64],
        params: VolumeAverageParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        self.volume.average_volume(volumes, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_engine_delegates() {
        let engine = IndicatorEngine::new();
        let prices = vec![dec!(1), dec!(2), dec!(3), dec!(4)];

        let sma = engine.sma(&prices, SmaParams { period: 2 }).unwrap();
        assert_eq!(sma, vec![None, Some(dec!(1.5)), Some(dec!(2.5)), Some(dec!(3.5))]);

        let avg = engine
            .average_volume(&[10, 20, 30], VolumeAverageParams { period: 3 })
            .unwrap();
        assert_eq!(avg[2], Some(dec!(20)));
    }

    #[test]
    fn test_error_display() {
        let err = IndicatorError::InvalidParameter("기간은 0보다 커야 합니다".to_string());
        assert_eq!(err.to_string(), "잘못된 파라미터: 기간은 0보다 커야 합니다");
    }
}
