//! 시리즈 준비 (Series Preparator).
//!
//! 데이터 소스에서 받은 원본 봉을 검증·정렬하여 [`Series`]로 만들고,
//! 합성 간격(4시간봉)이면 리샘플링합니다. 준비된 시리즈로부터
//! 스코어링에 필요한 [`IndicatorSet`]을 계산합니다.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use screener_core::{Bar, IndicatorConfig, IndicatorSet, Interval, ScreenerResult, Series};

use crate::indicators::{resample_bars, IndicatorEngine, SmaParams, VolumeAverageParams};

/// 시리즈 준비기.
#[derive(Debug, Default)]
pub struct SeriesPreparator {
    config: IndicatorConfig,
    engine: IndicatorEngine,
}

impl SeriesPreparator {
    /// 새 준비기를 생성합니다.
    ///
    /// # 에러
    ///
    /// 윈도우 설정이 잘못되면 `ScreenerError::Config`를 반환합니다.
    pub fn new(config: IndicatorConfig) -> ScreenerResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            engine: IndicatorEngine::new(),
        })
    }

    /// 지표 윈도우 설정.
    pub fn config(&self) -> &IndicatorConfig {
        &self.config
    }

    /// 원본 봉으로 시리즈를 준비합니다.
    ///
    /// - 빈 입력은 빈 시리즈가 됩니다.
    /// - 유효하지 않은 봉은 경고 로그와 함께 제외됩니다.
    /// - 정렬 후 같은 타임스탬프는 마지막 봉만 남깁니다.
    /// - 합성 간격이면 간격 폭으로 리샘플링합니다.
    pub fn prepare(&self, raw_bars: Vec<Bar>, code: &str, interval: Interval) -> Series {
        if raw_bars.is_empty() {
            return Series::empty(code, interval);
        }

        let total = raw_bars.len();
        let valid: Vec<Bar> = raw_bars
            .into_iter()
            .filter(|bar| match bar.validate() {
                Ok(()) => true,
                Err(e) => {
                    warn!(code = code, error = %e, "Dropping invalid bar");
                    false
                }
            })
            .collect();

        let source = Series::normalized(code, interval.source_interval(), valid);

        let series = if interval.is_synthetic() {
            let width = interval.as_secs() as i64;
            let bars = resample_bars(source.bars(), width);
            Series::normalized(code, interval, bars)
        } else {
            Series::normalized(code, interval, source.into_bars())
        };

        debug!(
            code = code,
            interval = %interval,
            raw = total,
            prepared = series.len(),
            "Series prepared"
        );

        series
    }

    /// 시리즈에 정렬된 지표를 계산합니다.
    ///
    /// 데이터가 윈도우보다 짧으면 해당 값은 모두 None입니다.
    pub fn indicators(&self, series: &Series) -> IndicatorSet {
        if series.is_empty() {
            return IndicatorSet::empty();
        }

        let closes = series.closes();
        let volumes: Vec<u64> = series.bars().iter().map(|b| b.volume).collect();

        let ma_short = self.moving_average(&closes, self.config.ma_short_window);
        let ma_long = self.moving_average(&closes, self.config.ma_long_window);
        let volume_avg = self
            .engine
            .average_volume(
                &volumes,
                VolumeAverageParams {
                    period: self.config.volume_window,
                },
            )
            .unwrap_or_else(|e| {
                warn!(code = %series.code, error = %e, "Volume average unavailable");
                vec![None; volumes.len()]
            });

        IndicatorSet {
            timestamps: series.timestamps(),
            ma_short,
            ma_long,
            volume_avg,
            latest_close: series.last().map(|b| b.close),
            latest_volume: series.last().map(|b| b.volume),
        }
    }

    fn moving_average(&self, values: &[Decimal], period: usize) -> Vec<Option<Decimal>> {
        self.engine
            .sma(values, SmaParams { period })
            .unwrap_or_else(|e| {
                warn!(period = period, error = %e, "Moving average unavailable");
                vec![None; values.len()]
            })
    }
}
