//! 설정 관리.
//!
//! 이 모듈은 애플리케이션 설정을 정의하고 관리합니다.
//! 로드 순서: 기본값 → TOML 파일 → `SCREENER__` 접두사 환경 변수.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{ScreenerError, ScreenerResult};
use crate::logging::LoggingConfig;
use crate::types::{Interval, Period, TSE_SUFFIX};

/// 환경 변수 접두사.
pub const ENV_PREFIX: &str = "SCREENER";

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// 로깅 설정
    pub logging: LoggingConfig,
    /// 지표 윈도우 설정
    pub indicators: IndicatorConfig,
    /// 스코어링 규칙 설정
    pub scoring: ScoringConfig,
    /// 스크리닝 실행 설정
    pub screening: ScreeningConfig,
    /// 데이터 소스 설정
    pub data: DataSourceConfig,
}

// =============================================================================
// 지표
// =============================================================================

/// 이동평균 윈도우 설정.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct IndicatorConfig {
    /// 단기 이동평균 윈도우 (종가)
    pub ma_short_window: usize,
    /// 장기 이동평균 윈도우 (종가)
    pub ma_long_window: usize,
    /// 거래량 이동평균 윈도우
    pub volume_window: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            ma_short_window: 13,
            ma_long_window: 26,
            volume_window: 5,
        }
    }
}

impl IndicatorConfig {
    /// 설정 유효성 검사.
    pub fn validate(&self) -> ScreenerResult<()> {
        if self.ma_short_window == 0 || self.ma_long_window == 0 || self.volume_window == 0 {
            return Err(ScreenerError::Config(
                "indicator windows must be positive".to_string(),
            ));
        }
        if self.ma_short_window >= self.ma_long_window {
            return Err(ScreenerError::Config(format!(
                "ma_short_window ({}) must be smaller than ma_long_window ({})",
                self.ma_short_window, self.ma_long_window
            )));
        }
        Ok(())
    }
}

// =============================================================================
// 스코어링
// =============================================================================

/// 추세 분류 규칙.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendRule {
    /// 이동평균 대소 관계와 두 이동평균의 기울기 방향이 모두 일치해야 함
    #[default]
    Strict,
    /// 이동평균 대소 관계만으로 판단
    OrderingOnly,
}

/// 규칙별 가중치.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RuleWeights {
    pub golden_cross: u32,
    pub volume_surge: u32,
    pub valuation: u32,
    pub profitability: u32,
    pub trend: u32,
}

impl RuleWeights {
    /// 모든 규칙에 같은 가중치를 부여합니다.
    pub fn uniform(weight: u32) -> Self {
        Self {
            golden_cross: weight,
            volume_surge: weight,
            valuation: weight,
            profitability: weight,
            trend: weight,
        }
    }

    /// 가중치 합 (최대 점수). `u32` 범위를 넘으면 None.
    pub fn total(&self) -> Option<u32> {
        [
            self.golden_cross,
            self.volume_surge,
            self.valuation,
            self.profitability,
            self.trend,
        ]
        .iter()
        .try_fold(0u32, |acc, w| acc.checked_add(*w))
    }
}

impl Default for RuleWeights {
    fn default() -> Self {
        Self::uniform(5)
    }
}

/// 스코어링 규칙 설정.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// 규칙별 가중치
    pub weights: RuleWeights,
    /// PER 적정 구간 하한 (포함)
    pub per_min: Decimal,
    /// PER 적정 구간 상한 (포함)
    pub per_max: Decimal,
    /// 추세 분류 규칙
    pub trend_rule: TrendRule,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: RuleWeights::default(),
            per_min: dec!(10),
            per_max: dec!(20),
            trend_rule: TrendRule::Strict,
        }
    }
}

impl ScoringConfig {
    /// 초기 대시보드의 5점 만점 규칙 (가중치 1, PER 5~15).
    pub fn legacy_five_point() -> Self {
        Self {
            weights: RuleWeights::uniform(1),
            per_min: dec!(5),
            per_max: dec!(15),
            trend_rule: TrendRule::Strict,
        }
    }

    /// 최대 점수.
    ///
    /// 검증을 통과한 설정에서는 가중치 합과 같습니다.
    pub fn max_score(&self) -> u32 {
        self.weights.total().unwrap_or(u32::MAX)
    }

    /// 설정 유효성 검사.
    pub fn validate(&self) -> ScreenerResult<()> {
        if self.per_min > self.per_max {
            return Err(ScreenerError::Config(format!(
                "per_min ({}) must not exceed per_max ({})",
                self.per_min, self.per_max
            )));
        }
        match self.weights.total() {
            None => Err(ScreenerError::Config(format!(
                "sum of rule weights overflows u32: {:?}",
                self.weights
            ))),
            Some(0) => Err(ScreenerError::Config(
                "at least one rule weight must be positive".to_string(),
            )),
            Some(_) => Ok(()),
        }
    }
}

// =============================================================================
// 스크리닝 실행
// =============================================================================

/// 스크리닝 실행 설정.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScreeningConfig {
    /// 동시에 평가할 최대 종목 수 (1이면 순차)
    pub max_concurrency: usize,
    /// 종목별 조회 타임아웃 (초)
    pub fetch_timeout_secs: u64,
    /// 기본 봉 간격
    pub default_interval: Interval,
    /// 조회 기간 (없으면 간격별 기본값)
    pub period: Option<Period>,
    /// 빈 데이터 종목도 점수를 매겨 결과에 포함할지 여부
    pub include_empty: bool,
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 1,
            fetch_timeout_secs: 10,
            default_interval: Interval::D1,
            period: None,
            include_empty: false,
        }
    }
}

impl ScreeningConfig {
    /// 종목별 조회 타임아웃.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// 간격에 맞는 조회 기간을 반환합니다.
    pub fn period_for(&self, interval: Interval) -> Period {
        self.period.unwrap_or_else(|| interval.default_period())
    }
}

// =============================================================================
// 데이터 소스
// =============================================================================

/// 데이터 소스 설정.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DataSourceConfig {
    /// HTTP 요청 타임아웃 (초)
    pub request_timeout_secs: u64,
    /// 연속 요청 사이 지연 (밀리초)
    pub request_delay_ms: u64,
    /// 종목 코드에 붙일 거래소 접미사
    pub symbol_suffix: String,
    /// 펀더멘털 조회용 quote API 기본 URL
    pub quote_base_url: String,
}

impl Default for DataSourceConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 10,
            request_delay_ms: 0,
            symbol_suffix: TSE_SUFFIX.to_string(),
            quote_base_url: "https://query1.finance.yahoo.com".to_string(),
        }
    }
}

impl DataSourceConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

// =============================================================================
// 로드
// =============================================================================

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 기본값과 환경 변수만 사용합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> ScreenerResult<Self> {
        let builder = config::Config::builder()
            // 파일에서 로드
            .add_source(config::File::from(path.as_ref()).required(false))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            );

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> ScreenerResult<Self> {
        Self::load("config/default.toml")
    }

    /// 모든 섹션의 유효성을 검사합니다.
    pub fn validate(&self) -> ScreenerResult<()> {
        self.indicators.validate()?;
        self.scoring.validate()?;
        self.screening.validate()
    }
}

impl ScreeningConfig {
    /// 설정 유효성 검사.
    pub fn validate(&self) -> ScreenerResult<()> {
        if self.max_concurrency == 0 {
            return Err(ScreenerError::Config(
                "screening.max_concurrency must be at least 1".to_string(),
            ));
        }
        if self.fetch_timeout_secs == 0 {
            return Err(ScreenerError::Config(
                "screening.fetch_timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
