//! 거래량 기반 지표 (Volume-Based Indicators).
//!
//! ## 거래량 이동평균
//!
//! 최근 N개 봉의 평균 거래량입니다. 최근 거래량이 평균을 넘으면
//! 거래량 급증으로 봅니다.
//!
//! ### 활용
//! - 가격 상승 + 거래량 급증: 추세에 힘이 실림
//! - 가격 상승 + 거래량 평이: 추세 지속성 약함

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::trend::{SmaParams, TrendIndicators};
use super::IndicatorResult;

/// 거래량 이동평균 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VolumeAverageParams {
    /// 평균 기간 (기본: 5).
    pub period: usize,
}

impl Default for VolumeAverageParams {
    fn default() -> Self {
        Self { period: 5 }
    }
}

/// 거래량 지표 계산기.
#[derive(Debug, Default)]
pub struct VolumeIndicators {
    trend: TrendIndicators,
}

impl VolumeIndicators {
    /// 새로운 거래량 지표 계산기 생성.
    pub fn new() -> Self {
        Self::default()
    }

    /// 거래량 이동평균 계산.
    ///
    /// # 인자
    /// * `volumes` - 거래량 데이터
    /// * `params` - 평균 기간
    ///
    /// # 반환
    /// 각 시점의 평균 거래량 (처음 period-1개는 None)
    pub fn average_volume(
        &self,
        volumes: &[u64],
        params: VolumeAverageParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        let values: Vec<Decimal> = volumes.iter().map(|v| Decimal::from(*v)).collect();
        self.trend.sma(&values, SmaParams {
            period: params.period,
        })
    }

    /// 평균 대비 거래량 비율(%)을 계산합니다.
    ///
    /// 평균이 0이면 비율을 정의할 수 없으므로 None을 반환합니다.
    pub fn surge_ratio(latest: u64, average: Decimal) -> Option<Decimal> {
        if average.is_zero() {
            return None;
        }
        Some(Decimal::from(latest) / average * dec!(100))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_volume() {
        let indicators = VolumeIndicators::new();
        let volumes = vec![1000, 1000, 1000, 1000, 1600];

        let avg = indicators
            .average_volume(&volumes, VolumeAverageParams::default())
            .unwrap();

        assert_eq!(avg.len(), 5);
        assert!(avg[..4].iter().all(Option::is_none));
        assert_eq!(avg[4], Some(dec!(1120)));
    }

    #[test]
    fn test_surge_ratio() {
        assert_eq!(
            VolumeIndicators::surge_ratio(1600, dec!(1120)).map(|r| r.round_dp(2)),
            Some(dec!(142.86))
        );
        assert_eq!(VolumeIndicators::surge_ratio(500, Decimal::ZERO), None);
    }
}
