//! 스코어링 결과 타입.
//!
//! 스코어는 다섯 개의 고정 규칙 결과의 합이며, 각 규칙은 통과 여부와
//! 함께 항상 설명 문자열을 남깁니다. 결과는 체크리스트로 표시되므로
//! 규칙 순서 자체가 계약의 일부입니다.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Fundamentals;
use crate::types::TickerInfo;

// =============================================================================
// 추세 라벨
// =============================================================================

/// 이동평균 기반 추세 분류 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendLabel {
    /// 상승 추세
    Up,
    /// 하락 추세
    Down,
    /// 횡보
    Flat,
    /// 데이터 부족으로 판단 불가
    Indeterminate,
}

impl TrendLabel {
    /// 화면 표시용 라벨 (일본어).
    pub fn label(&self) -> &'static str {
        match self {
            TrendLabel::Up => "上昇",
            TrendLabel::Down => "下降",
            TrendLabel::Flat => "横ばい",
            TrendLabel::Indeterminate => "判定不能",
        }
    }
}

impl fmt::Display for TrendLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TrendLabel::Up => "up",
            TrendLabel::Down => "down",
            TrendLabel::Flat => "flat",
            TrendLabel::Indeterminate => "indeterminate",
        };
        write!(f, "{}", s)
    }
}

// =============================================================================
// 규칙 결과
// =============================================================================

/// 스코어링 규칙 식별자 (평가 순서대로).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    /// 단기 이동평균 > 장기 이동평균
    GoldenCross,
    /// 최근 거래량 > 거래량 이동평균
    VolumeSurge,
    /// PER 적정 구간
    Valuation,
    /// EPS 흑자
    Profitability,
    /// 상승 추세
    TrendLabel,
}

impl RuleId {
    /// 고정된 평가 순서.
    pub const ORDER: [RuleId; 5] = [
        RuleId::GoldenCross,
        RuleId::VolumeSurge,
        RuleId::Valuation,
        RuleId::Profitability,
        RuleId::TrendLabel,
    ];

    /// 체크리스트 항목명.
    pub fn label(&self) -> &'static str {
        match self {
            RuleId::GoldenCross => "MAクロス",
            RuleId::VolumeSurge => "出来高増加",
            RuleId::Valuation => "PER適正",
            RuleId::Profitability => "黒字（EPS）",
            RuleId::TrendLabel => "上昇トレンド",
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RuleId::GoldenCross => "golden_cross",
            RuleId::VolumeSurge => "volume_surge",
            RuleId::Valuation => "valuation",
            RuleId::Profitability => "profitability",
            RuleId::TrendLabel => "trend_label",
        };
        write!(f, "{}", s)
    }
}

/// 단일 규칙의 평가 결과.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleOutcome {
    pub rule_id: RuleId,
    pub passed: bool,
    /// 부여된 점수 (실패 시 0)
    pub points: u32,
    pub explanation: String,
}

impl RuleOutcome {
    /// 통과한 규칙 결과.
    pub fn pass(rule_id: RuleId, points: u32, explanation: impl Into<String>) -> Self {
        Self {
            rule_id,
            passed: true,
            points,
            explanation: explanation.into(),
        }
    }

    /// 실패한 규칙 결과 (0점).
    pub fn fail(rule_id: RuleId, explanation: impl Into<String>) -> Self {
        Self {
            rule_id,
            passed: false,
            points: 0,
            explanation: explanation.into(),
        }
    }

    /// 체크리스트 표시 기호 (◯ / ×).
    pub fn mark(&self) -> &'static str {
        if self.passed {
            "◯"
        } else {
            "×"
        }
    }
}

// =============================================================================
// 스코어 결과
// =============================================================================

/// 종목 하나의 스코어링 결과.
///
/// 생성 후에는 변경되지 않습니다. 규칙 결과는 항상 다섯 개이며
/// [`RuleId::ORDER`] 순서를 따릅니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    code: String,
    name: String,
    score: u32,
    max_score: u32,
    trend: TrendLabel,
    outcomes: [RuleOutcome; 5],
    fundamentals: Fundamentals,
}

impl ScoreResult {
    /// 규칙 결과로부터 스코어를 조립합니다. 총점은 규칙 점수의 합입니다.
    pub fn new(
        ticker: &TickerInfo,
        trend: TrendLabel,
        outcomes: [RuleOutcome; 5],
        max_score: u32,
        fundamentals: Fundamentals,
    ) -> Self {
        let score = outcomes.iter().map(|o| o.points).sum();
        Self {
            code: ticker.code.clone(),
            name: ticker.name.clone(),
            score,
            max_score,
            trend,
            outcomes,
            fundamentals,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 총점.
    pub fn score(&self) -> u32 {
        self.score
    }

    /// 가능한 최대 점수 (가중치 합).
    pub fn max_score(&self) -> u32 {
        self.max_score
    }

    pub fn trend(&self) -> TrendLabel {
        self.trend
    }

    /// 규칙 결과 (고정 순서).
    pub fn outcomes(&self) -> &[RuleOutcome; 5] {
        &self.outcomes
    }

    /// 스코어링에 사용된 펀더멘털 스냅샷.
    pub fn fundamentals(&self) -> &Fundamentals {
        &self.fundamentals
    }

    /// 특정 규칙의 결과.
    pub fn outcome(&self, rule_id: RuleId) -> Option<&RuleOutcome> {
        self.outcomes.iter().find(|o| o.rule_id == rule_id)
    }

    /// 통과한 규칙 수.
    pub fn passed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed).count()
    }

    /// "점수 / 최대" 형식 문자열.
    pub fn score_display(&self) -> String {
        format!("{} / {}", self.score, self.max_score)
    }
}
