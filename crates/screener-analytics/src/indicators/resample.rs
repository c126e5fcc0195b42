//! 봉 리샘플링.
//!
//! 짧은 간격의 봉을 고정 폭 버킷으로 묶어 긴 간격의 봉을 합성합니다.
//! 버킷은 Unix epoch 기준으로 정렬되며, 합성된 봉은 버킷 시작 시각을 가집니다.
//!
//! - 시가: 버킷의 첫 시가
//! - 고가: 버킷의 최고가
//! - 저가: 버킷의 최저가
//! - 종가: 버킷의 마지막 종가
//! - 거래량: 버킷의 합계

use chrono::{DateTime, Utc};
use screener_core::Bar;

/// 타임스탬프가 속한 버킷의 시작 시각(초)을 계산합니다.
pub fn bucket_start(timestamp: DateTime<Utc>, width_secs: i64) -> i64 {
    timestamp.timestamp().div_euclid(width_secs) * width_secs
}

/// 정렬된 봉을 `width_secs` 폭의 버킷으로 리샘플링합니다.
///
/// # 인자
///
/// * `bars` - 시간 오름차순으로 정렬된 봉
/// * `width_secs` - 버킷 폭 (초, 0 이하면 입력을 그대로 반환)
///
/// # 반환
///
/// 리샘플링된 봉 목록. 봉이 없는 버킷은 생성되지 않습니다.
pub fn resample_bars(bars: &[Bar], width_secs: i64) -> Vec<Bar> {
    if bars.is_empty() || width_secs <= 0 {
        return bars.to_vec();
    }

    let mut resampled: Vec<Bar> = Vec::new();
    let mut current_bucket: Vec<&Bar> = Vec::new();
    let mut current_key: Option<i64> = None;

    for bar in bars {
        let key = bucket_start(bar.open_time, width_secs);

        if current_key != Some(key) {
            // 이전 버킷 봉 생성
            if let Some(prev_key) = current_key {
                if let Some(candle) = create_bucket_candle(&current_bucket, prev_key) {
                    resampled.push(candle);
                }
            }
            current_bucket.clear();
            current_key = Some(key);
        }

        current_bucket.push(bar);
    }

    // 마지막 버킷 처리
    if let Some(key) = current_key {
        if let Some(candle) = create_bucket_candle(&current_bucket, key) {
            resampled.push(candle);
        }
    }

    resampled
}

/// 버킷 봉 생성.
fn create_bucket_candle(bars: &[&Bar], bucket_secs: i64) -> Option<Bar> {
    let first = bars.first()?;
    let last = bars.last()?;

    let high = bars.iter().map(|b| b.high).max()?;
    let low = bars.iter().map(|b| b.low).min()?;
    let volume: u64 = bars.iter().map(|b| b.volume).sum();
    let open_time = DateTime::<Utc>::from_timestamp(bucket_secs, 0)?;

    Some(Bar::new(open_time, first.open, high, low, last.close, volume))
}
