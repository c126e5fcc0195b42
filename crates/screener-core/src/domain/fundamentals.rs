//! 재무 지표 (펀더멘털).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 종목의 펀더멘털 지표.
///
/// 각 값은 데이터 소스에서 제공되지 않을 수 있으며, 누락된 값은 `None`입니다.
/// 0이나 음수 같은 대체값으로 누락을 표현하지 않습니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fundamentals {
    /// 주가수익비율 (PER)
    pub per: Option<Decimal>,
    /// 주당순이익 (EPS)
    pub eps: Option<Decimal>,
    /// 시가총액
    pub market_cap: Option<Decimal>,
}

impl Fundamentals {
    /// 모든 값이 누락된 펀더멘털.
    pub fn absent() -> Self {
        Self::default()
    }

    /// PER 설정.
    pub fn with_per(mut self, per: Decimal) -> Self {
        self.per = Some(per);
        self
    }

    /// EPS 설정.
    pub fn with_eps(mut self, eps: Decimal) -> Self {
        self.eps = Some(eps);
        self
    }

    /// 시가총액 설정.
    pub fn with_market_cap(mut self, market_cap: Decimal) -> Self {
        self.market_cap = Some(market_cap);
        self
    }

    /// 모든 값이 누락되었는지 확인합니다.
    pub fn is_absent(&self) -> bool {
        self.per.is_none() && self.eps.is_none() && self.market_cap.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_builder() {
        let f = Fundamentals::absent().with_per(dec!(12)).with_eps(dec!(5.0));
        assert_eq!(f.per, Some(dec!(12)));
        assert_eq!(f.eps, Some(dec!(5.0)));
        assert_eq!(f.market_cap, None);
        assert!(!f.is_absent());
        assert!(Fundamentals::absent().is_absent());
    }
}
