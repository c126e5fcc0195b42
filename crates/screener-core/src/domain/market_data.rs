//! 시장 데이터 타입 및 구조체.
//!
//! 이 모듈은 시장 데이터 관련 타입을 정의합니다:
//! - `Bar` - OHLCV 캔들스틱 데이터
//! - `Series` - 단일 종목/간격의 정렬된 봉 시퀀스

use crate::error::{ScreenerError, ScreenerResult};
use crate::types::{Interval, Price, Volume};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// OHLCV 캔들스틱 데이터.
///
/// 한 번 생성된 봉은 변경되지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bar {
    /// 캔들 시작 시간
    pub open_time: DateTime<Utc>,
    /// 시가
    pub open: Price,
    /// 고가
    pub high: Price,
    /// 저가
    pub low: Price,
    /// 종가
    pub close: Price,
    /// 거래량 (주)
    pub volume: Volume,
}

impl Bar {
    /// 새 캔들을 생성합니다.
    pub fn new(
        open_time: DateTime<Utc>,
        open: Price,
        high: Price,
        low: Price,
        close: Price,
        volume: Volume,
    ) -> Self {
        Self {
            open_time,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// 봉 데이터의 유효성을 검사합니다.
    ///
    /// 모든 가격은 양수여야 하며 고가는 저가 이상이어야 합니다.
    pub fn validate(&self) -> ScreenerResult<()> {
        let prices = [self.open, self.high, self.low, self.close];
        if prices.iter().any(|p| *p <= Decimal::ZERO) {
            return Err(ScreenerError::InvalidInput(format!(
                "non-positive price in bar at {}",
                self.open_time
            )));
        }
        if self.high < self.low {
            return Err(ScreenerError::InvalidInput(format!(
                "high {} < low {} in bar at {}",
                self.high, self.low, self.open_time
            )));
        }
        Ok(())
    }

    /// 캔들 범위(고가 - 저가)를 반환합니다.
    pub fn range(&self) -> Decimal {
        self.high - self.low
    }

    /// 양봉(종가 > 시가)인지 확인합니다.
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }
}

/// 단일 종목의 정렬된 봉 시퀀스.
///
/// 타임스탬프는 엄격하게 증가하며 중복이 없습니다. 간격 사이의 공백은 허용됩니다.
/// 역직렬화도 [`Series::from_bars`]를 거치므로 같은 조건을 검사합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSeries")]
pub struct Series {
    /// 종목 코드
    pub code: String,
    /// 명목 간격
    pub interval: Interval,
    bars: Vec<Bar>,
}

/// 검증 전 시리즈 (역직렬화 전용).
#[derive(Deserialize)]
struct RawSeries {
    code: String,
    interval: Interval,
    bars: Vec<Bar>,
}

impl TryFrom<RawSeries> for Series {
    type Error = ScreenerError;

    fn try_from(raw: RawSeries) -> ScreenerResult<Self> {
        Series::from_bars(raw.code, raw.interval, raw.bars)
    }
}

impl Series {
    /// 정렬된 봉으로 시리즈를 생성합니다.
    ///
    /// # 에러
    ///
    /// 타임스탬프가 엄격하게 증가하지 않으면 `ScreenerError::InvalidInput`을 반환합니다.
    pub fn from_bars(
        code: impl Into<String>,
        interval: Interval,
        bars: Vec<Bar>,
    ) -> ScreenerResult<Self> {
        let code = code.into();
        if let Some(pos) = bars
            .windows(2)
            .position(|w| w[0].open_time >= w[1].open_time)
        {
            return Err(ScreenerError::InvalidInput(format!(
                "{}: bars not strictly increasing at index {} ({} >= {})",
                code,
                pos + 1,
                bars[pos].open_time,
                bars[pos + 1].open_time
            )));
        }
        Ok(Self {
            code,
            interval,
            bars,
        })
    }

    /// 임의 순서의 봉으로 시리즈를 생성합니다.
    ///
    /// 타임스탬프 기준으로 정렬하고, 같은 타임스탬프가 여러 번 나오면
    /// 마지막 봉을 사용합니다.
    pub fn normalized(code: impl Into<String>, interval: Interval, mut bars: Vec<Bar>) -> Self {
        bars.sort_by_key(|b| b.open_time);

        let mut deduped: Vec<Bar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match deduped.last_mut() {
                Some(prev) if prev.open_time == bar.open_time => *prev = bar,
                _ => deduped.push(bar),
            }
        }

        Self {
            code: code.into(),
            interval,
            bars: deduped,
        }
    }

    /// 빈 시리즈를 생성합니다.
    pub fn empty(code: impl Into<String>, interval: Interval) -> Self {
        Self {
            code: code.into(),
            interval,
            bars: Vec::new(),
        }
    }

    /// 봉 슬라이스를 반환합니다.
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// 봉 개수.
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// 비어 있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// 마지막 봉.
    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// 종가 목록.
    pub fn closes(&self) -> Vec<Price> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// 거래량 목록 (Decimal 변환).
    pub fn volumes(&self) -> Vec<Decimal> {
        self.bars.iter().map(|b| Decimal::from(b.volume)).collect()
    }

    /// 타임스탬프 목록.
    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.bars.iter().map(|b| b.open_time).collect()
    }

    /// 봉을 소비하여 반환합니다.
    pub fn into_bars(self) -> Vec<Bar> {
        self.bars
    }
}
