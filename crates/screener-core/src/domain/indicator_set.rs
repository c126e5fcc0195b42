//! 시리즈에 정렬된 지표 묶음.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Price, Volume};

/// 시리즈의 각 봉 위치에 정렬된 지표 값.
///
/// 모든 벡터는 `timestamps`와 길이가 같습니다. 윈도우가 채워지기 전의
/// 위치는 `None`이며, 0이나 직전 값으로 채우지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorSet {
    /// 봉 타임스탬프
    pub timestamps: Vec<DateTime<Utc>>,
    /// 단기 이동평균 (종가)
    pub ma_short: Vec<Option<Decimal>>,
    /// 장기 이동평균 (종가)
    pub ma_long: Vec<Option<Decimal>>,
    /// 거래량 이동평균
    pub volume_avg: Vec<Option<Decimal>>,
    /// 최근 종가
    pub latest_close: Option<Price>,
    /// 최근 거래량
    pub latest_volume: Option<Volume>,
}

/// 특정 시점의 지표 값 한 줄.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndicatorRow {
    pub timestamp: DateTime<Utc>,
    pub ma_short: Option<Decimal>,
    pub ma_long: Option<Decimal>,
    pub volume_avg: Option<Decimal>,
}

impl IndicatorSet {
    /// 빈 시리즈에 대한 지표 (모든 값 누락).
    pub fn empty() -> Self {
        Self {
            timestamps: Vec::new(),
            ma_short: Vec::new(),
            ma_long: Vec::new(),
            volume_avg: Vec::new(),
            latest_close: None,
            latest_volume: None,
        }
    }

    /// 위치 개수.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// 비어 있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// 마지막 위치의 단기 이동평균.
    pub fn last_ma_short(&self) -> Option<Decimal> {
        self.ma_short.last().copied().flatten()
    }

    /// 마지막 위치의 장기 이동평균.
    pub fn last_ma_long(&self) -> Option<Decimal> {
        self.ma_long.last().copied().flatten()
    }

    /// 마지막 위치의 거래량 이동평균.
    pub fn last_volume_avg(&self) -> Option<Decimal> {
        self.volume_avg.last().copied().flatten()
    }

    /// 최근 `n`개 위치의 지표 행.
    pub fn tail(&self, n: usize) -> Vec<IndicatorRow> {
        let start = self.len().saturating_sub(n);
        (start..self.len())
            .map(|i| IndicatorRow {
                timestamp: self.timestamps[i],
                ma_short: self.ma_short.get(i).copied().flatten(),
                ma_long: self.ma_long.get(i).copied().flatten(),
                volume_avg: self.volume_avg.get(i).copied().flatten(),
            })
            .collect()
    }
}

impl Default for IndicatorSet {
    fn default() -> Self {
        Self::empty()
    }
}
