//! 가격/지표 계산을 위한 Decimal 유틸리티.

use rust_decimal::Decimal;

/// 금융 정밀도를 위한 가격 타입.
pub type Price = Decimal;

/// 거래량 타입 (주 단위, 음수 불가).
pub type Volume = u64;

/// Decimal 표시용 확장 트레이트.
pub trait DecimalExt {
    /// 지정된 소수점 자릿수로 반올림합니다.
    fn round_display(&self, dp: u32) -> Decimal;
}

impl DecimalExt for Decimal {
    fn round_display(&self, dp: u32) -> Decimal {
        self.round_dp_with_strategy(dp, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
            .normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_display() {
        assert_eq!(dec!(12.345).round_display(2), dec!(12.35));
        assert_eq!(dec!(12.000).round_display(2).to_string(), "12");
    }
}
