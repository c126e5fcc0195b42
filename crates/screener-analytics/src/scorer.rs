//! 체크리스트 스코어 계산기.
//!
//! 지표와 펀더멘털을 다섯 개의 고정 규칙으로 평가하여 점수와 설명을 만듭니다.
//!
//! # 5개 규칙 (기본 가중치 각 5점, 만점 25점)
//!
//! 1. **MA 크로스**: 단기 이동평균 > 장기 이동평균 (골든크로스 상태)
//! 2. **거래량 급증**: 최근 거래량 > 거래량 이동평균
//! 3. **PER 적정**: PER이 적정 구간(기본 10~20) 안
//! 4. **흑자**: EPS > 0
//! 5. **상승 추세**: 추세 분류 결과가 상승
//!
//! 입력이 없는 규칙은 실패(0점)로 처리하며 규칙을 건너뛰지 않습니다.
//! 결과는 항상 다섯 개이고 순서가 고정입니다.

use rust_decimal::Decimal;

use screener_core::{
    DecimalExt, Fundamentals, IndicatorSet, RuleId, RuleOutcome, ScoreResult, ScoringConfig,
    ScreenerResult, TickerInfo, TrendLabel,
};

use crate::indicators::VolumeIndicators;

/// 이력 부족 설명 문구.
const INSUFFICIENT_HISTORY: &str = "データ不足";

/// 체크리스트 스코어 계산기.
#[derive(Debug, Clone, Default)]
pub struct Scorer {
    config: ScoringConfig,
}

impl Scorer {
    /// 새 계산기를 생성합니다.
    ///
    /// # 에러
    ///
    /// PER 구간이 뒤집혀 있거나 가중치가 모두 0이면 `ScreenerError::Config`.
    pub fn new(config: ScoringConfig) -> ScreenerResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// 스코어링 설정.
    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// 최대 점수.
    pub fn max_score(&self) -> u32 {
        self.config.max_score()
    }

    /// 종목 하나를 평가합니다.
    ///
    /// # 인자
    /// * `ticker` - 평가 대상 종목
    /// * `indicators` - 시리즈에 정렬된 지표
    /// * `fundamentals` - 펀더멘털 (누락 허용)
    /// * `trend` - 추세 분류 결과
    pub fn score(
        &self,
        ticker: &TickerInfo,
        indicators: &IndicatorSet,
        fundamentals: &Fundamentals,
        trend: TrendLabel,
    ) -> ScoreResult {
        let outcomes = [
            self.golden_cross(indicators),
            self.volume_surge(indicators),
            self.valuation(fundamentals),
            self.profitability(fundamentals),
            self.trend(trend),
        ];

        ScoreResult::new(
            ticker,
            trend,
            outcomes,
            self.max_score(),
            fundamentals.clone(),
        )
    }

    // ==================== 규칙 ====================

    fn golden_cross(&self, indicators: &IndicatorSet) -> RuleOutcome {
        let rule = RuleId::GoldenCross;
        match (indicators.last_ma_short(), indicators.last_ma_long()) {
            (Some(short), Some(long)) if short > long => RuleOutcome::pass(
                rule,
                self.config.weights.golden_cross,
                format!(
                    "ゴールデンクロス：短期MA {} > 長期MA {}",
                    short.round_display(2),
                    long.round_display(2)
                ),
            ),
            (Some(short), Some(long)) => RuleOutcome::fail(
                rule,
                format!(
                    "デッドクロス：短期MA {} ≤ 長期MA {}",
                    short.round_display(2),
                    long.round_display(2)
                ),
            ),
            _ => RuleOutcome::fail(
                rule,
                format!("{}：移動平均を計算できません", INSUFFICIENT_HISTORY),
            ),
        }
    }

    fn volume_surge(&self, indicators: &IndicatorSet) -> RuleOutcome {
        let rule = RuleId::VolumeSurge;
        let (latest, average) = match (indicators.latest_volume, indicators.last_volume_avg()) {
            (Some(latest), Some(average)) => (latest, average),
            _ => {
                return RuleOutcome::fail(
                    rule,
                    format!("{}：出来高平均を計算できません", INSUFFICIENT_HISTORY),
                )
            }
        };

        let ratio = VolumeIndicators::surge_ratio(latest, average)
            .map(|r| format!(" ({}%)", r.round_display(1)))
            .unwrap_or_default();
        let detail = format!(
            "直近 {} / 平均 {}{}",
            latest,
            average.round_display(0),
            ratio
        );

        if Decimal::from(latest) > average {
            RuleOutcome::pass(
                rule,
                self.config.weights.volume_surge,
                format!("出来高急増：{}", detail),
            )
        } else {
            RuleOutcome::fail(rule, format!("出来高横ばい：{}", detail))
        }
    }

    fn valuation(&self, fundamentals: &Fundamentals) -> RuleOutcome {
        let rule = RuleId::Valuation;
        let band = format!(
            "{}~{}",
            self.config.per_min.round_display(2),
            self.config.per_max.round_display(2)
        );

        match fundamentals.per {
            Some(per) if per >= self.config.per_min && per <= self.config.per_max => {
                RuleOutcome::pass(
                    rule,
                    self.config.weights.valuation,
                    format!("PER {}（適正範囲 {}）", per.round_display(2), band),
                )
            }
            Some(per) => RuleOutcome::fail(
                rule,
                format!("PER {}：適正範囲 {} の外", per.round_display(2), band),
            ),
            None => RuleOutcome::fail(rule, "PER情報なし"),
        }
    }

    fn profitability(&self, fundamentals: &Fundamentals) -> RuleOutcome {
        let rule = RuleId::Profitability;
        match fundamentals.eps {
            Some(eps) if eps > Decimal::ZERO => RuleOutcome::pass(
                rule,
                self.config.weights.profitability,
                format!("黒字：EPS {}", eps.round_display(2)),
            ),
            Some(eps) => RuleOutcome::fail(rule, format!("赤字：EPS {}", eps.round_display(2))),
            None => RuleOutcome::fail(rule, "EPS情報なし"),
        }
    }

    fn trend(&self, trend: TrendLabel) -> RuleOutcome {
        let rule = RuleId::TrendLabel;
        if trend == TrendLabel::Up {
            RuleOutcome::pass(rule, self.config.weights.trend, "上昇トレンド")
        } else {
            RuleOutcome::fail(rule, format!("トレンド弱含み（{}）", trend.label()))
        }
    }
}
