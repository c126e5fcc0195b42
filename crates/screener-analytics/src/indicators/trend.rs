//! 추세 지표 (Trend Indicators).
//!
//! 이동평균 기반의 추세 지표들을 제공합니다.
//! - SMA (Simple Moving Average)
//! - 골든/데드 크로스 감지

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{IndicatorError, IndicatorResult};

/// SMA 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SmaParams {
    /// 이동평균 기간.
    pub period: usize,
}

impl Default for SmaParams {
    fn default() -> Self {
        Self { period: 13 }
    }
}

/// 이동평균 교차 유형.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossKind {
    /// 단기 이동평균이 장기 이동평균을 상향 돌파
    Golden,
    /// 단기 이동평균이 장기 이동평균을 하향 돌파
    Dead,
}

/// 교차 이벤트.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossEvent {
    pub kind: CrossKind,
    pub timestamp: DateTime<Utc>,
}

/// 추세 지표 계산기.
#[derive(Debug, Default)]
pub struct TrendIndicators;

impl TrendIndicators {
    /// 새로운 추세 지표 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// 단순 이동평균 (SMA) 계산.
    ///
    /// SMA = (P1 + P2 + ... + Pn) / n
    ///
    /// # 인자
    /// * `values` - 가격 또는 거래량 데이터
    /// * `params` - SMA 파라미터
    ///
    /// # 반환
    /// 각 시점의 SMA 값. 인덱스 `i`의 값은 `i + 1 >= period`일 때만 존재하며,
    /// 데이터가 기간보다 짧으면 전부 None입니다.
    pub fn sma(
        &self,
        values: &[Decimal],
        params: SmaParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        let period = params.period;

        if period == 0 {
            return Err(IndicatorError::InvalidParameter(
                "기간은 0보다 커야 합니다".to_string(),
            ));
        }

        let mut result = Vec::with_capacity(values.len());
        let period_decimal = Decimal::from(period);

        for i in 0..values.len() {
            if i + 1 < period {
                result.push(None);
            } else {
                let sum: Decimal = values[i + 1 - period..=i].iter().sum();
                result.push(Some(sum / period_decimal));
            }
        }

        Ok(result)
    }

    /// 골든 크로스 감지.
    ///
    /// 단기 이동평균이 장기 이동평균을 상향 돌파하는 시점.
    /// 이전: 단기 <= 장기, 현재: 단기 > 장기
    ///
    /// # 인자
    /// * `short_ma` - 단기 이동평균 값들
    /// * `long_ma` - 장기 이동평균 값들
    ///
    /// # 반환
    /// 각 시점에서 골든 크로스 발생 여부
    pub fn detect_golden_cross(
        &self,
        short_ma: &[Option<Decimal>],
        long_ma: &[Option<Decimal>],
    ) -> Vec<bool> {
        Self::detect_cross(short_ma, long_ma, |ps, pl, cs, cl| ps <= pl && cs > cl)
    }

    /// 데드 크로스 감지.
    ///
    /// 단기 이동평균이 장기 이동평균을 하향 돌파하는 시점.
    /// 이전: 단기 >= 장기, 현재: 단기 < 장기
    pub fn detect_dead_cross(
        &self,
        short_ma: &[Option<Decimal>],
        long_ma: &[Option<Decimal>],
    ) -> Vec<bool> {
        Self::detect_cross(short_ma, long_ma, |ps, pl, cs, cl| ps >= pl && cs < cl)
    }

    /// 가장 최근의 교차 이벤트를 찾습니다.
    ///
    /// `timestamps`는 이동평균과 같은 길이여야 합니다.
    pub fn latest_cross(
        &self,
        timestamps: &[DateTime<Utc>],
        short_ma: &[Option<Decimal>],
        long_ma: &[Option<Decimal>],
    ) -> Option<CrossEvent> {
        let golden = self.detect_golden_cross(short_ma, long_ma);
        let dead = self.detect_dead_cross(short_ma, long_ma);

        (0..timestamps.len().min(golden.len()))
            .rev()
            .find_map(|i| {
                let kind = if golden[i] {
                    CrossKind::Golden
                } else if dead[i] {
                    CrossKind::Dead
                } else {
                    return None;
                };
                Some(CrossEvent {
                    kind,
                    timestamp: timestamps[i],
                })
            })
    }

    fn detect_cross(
        short_ma: &[Option<Decimal>],
        long_ma: &[Option<Decimal>],
        crossed: impl Fn(Decimal, Decimal, Decimal, Decimal) -> bool,
    ) -> Vec<bool> {
        let mut result = vec![false; short_ma.len()];

        for i in 1..short_ma.len().min(long_ma.len()) {
            if let (Some(prev_short), Some(prev_long), Some(curr_short), Some(curr_long)) = (
                short_ma[i - 1],
                long_ma[i - 1],
                short_ma[i],
                long_ma[i],
            ) {
                result[i] = crossed(prev_short, prev_long, curr_short, curr_long);
            }
        }

        result
    }
}
