//! 이동평균 기반 추세 분류.
//!
//! 단기·장기 이동평균의 최근 값과 기울기로 추세를 판단합니다.
//! 기울기는 각 이동평균에서 값이 존재하는 지점만으로 계산합니다:
//! `slope = 최근 값 - 세 번째로 최근인 값`.
//!
//! # 사용 예시
//!
//! ```ignore
//! use screener_analytics::trend_classifier::TrendClassifier;
//! use screener_core::TrendRule;
//!
//! let classifier = TrendClassifier::new(TrendRule::Strict);
//! let label = classifier.classify(&set.ma_short, &set.ma_long);
//! ```

use rust_decimal::Decimal;

use screener_core::{TrendLabel, TrendRule};

/// 기울기 계산에 필요한 최소 유효 지점 수.
pub const MIN_DEFINED_POINTS: usize = 3;

/// 추세 분류기.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrendClassifier {
    rule: TrendRule,
}

/// 이동평균 하나의 최근 상태.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MaState {
    last: Decimal,
    slope: Decimal,
}

impl TrendClassifier {
    /// 새 분류기를 생성합니다.
    pub fn new(rule: TrendRule) -> Self {
        Self { rule }
    }

    /// 사용 중인 분류 규칙.
    pub fn rule(&self) -> TrendRule {
        self.rule
    }

    /// 추세를 분류합니다.
    ///
    /// 어느 한쪽 이동평균의 마지막 위치 값이 없거나 유효 지점이
    /// 3개 미만이면 `Indeterminate`입니다.
    ///
    /// # 인자
    /// * `ma_short` - 단기 이동평균 (시리즈 정렬)
    /// * `ma_long` - 장기 이동평균 (시리즈 정렬)
    pub fn classify(&self, ma_short: &[Option<Decimal>], ma_long: &[Option<Decimal>]) -> TrendLabel {
        let (short, long) = match (ma_state(ma_short), ma_state(ma_long)) {
            (Some(s), Some(l)) => (s, l),
            _ => return TrendLabel::Indeterminate,
        };

        match self.rule {
            TrendRule::Strict => {
                let zero = Decimal::ZERO;
                if short.last > long.last && short.slope > zero && long.slope > zero {
                    TrendLabel::Up
                } else if short.last < long.last && short.slope < zero && long.slope < zero {
                    TrendLabel::Down
                } else {
                    TrendLabel::Flat
                }
            }
            TrendRule::OrderingOnly => match short.last.cmp(&long.last) {
                std::cmp::Ordering::Greater => TrendLabel::Up,
                std::cmp::Ordering::Less => TrendLabel::Down,
                std::cmp::Ordering::Equal => TrendLabel::Flat,
            },
        }
    }
}

/// 마지막 값과 기울기를 계산합니다. 전제 조건을 만족하지 않으면 None.
fn ma_state(values: &[Option<Decimal>]) -> Option<MaState> {
    let last = (*values.last()?)?;

    let defined: Vec<Decimal> = values.iter().filter_map(|v| *v).collect();
    if defined.len() < MIN_DEFINED_POINTS {
        return None;
    }

    let reference = defined[defined.len() - MIN_DEFINED_POINTS];
    Some(MaState {
        last,
        slope: last - reference,
    })
}
