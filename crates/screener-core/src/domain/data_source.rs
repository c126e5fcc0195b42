//! 시장 데이터 소스 추상화.
//!
//! 스크리닝 엔진은 가격 이력과 펀더멘털을 이 trait를 통해서만 조회합니다.
//! 구체적인 구현(Yahoo Finance, 인메모리 등)은 `screener-data` 크레이트에 있습니다.

use async_trait::async_trait;
use thiserror::Error;

use super::{Bar, Fundamentals};
use crate::types::{Interval, Period};

// =============================================================================
// 에러 타입
// =============================================================================

/// 데이터 소스 조회 에러.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// 네트워크 에러
    #[error("네트워크 에러: {0}")]
    Network(String),

    /// 알 수 없는 종목
    #[error("종목을 찾을 수 없음: {0}")]
    NotFound(String),

    /// 요청 한도 초과
    #[error("요청 한도 초과: {0}")]
    RateLimited(String),

    /// 응답 파싱 에러
    #[error("파싱 에러: {0}")]
    Parse(String),

    /// 시간 초과
    #[error("시간 초과: {0}")]
    Timeout(String),
}

impl FetchError {
    /// 데이터 소스 자체에 도달하지 못한 에러인지 확인합니다.
    ///
    /// 종목 단위 문제(`NotFound`, `Parse`)는 소스가 응답한 것이므로 해당하지 않습니다.
    pub fn is_unreachable(&self) -> bool {
        matches!(
            self,
            FetchError::Network(_) | FetchError::RateLimited(_) | FetchError::Timeout(_)
        )
    }
}

// =============================================================================
// MarketDataSource Trait
// =============================================================================

/// 시장 데이터 소스 trait.
///
/// # 구현 예시
///
/// ```ignore
/// pub struct MyDataSource {
///     client: reqwest::Client,
/// }
///
/// #[async_trait]
/// impl MarketDataSource for MyDataSource {
///     async fn get_bars(&self, code: &str, period: Period, interval: Interval)
///         -> Result<Vec<Bar>, FetchError> {
///         // API 호출 및 변환
///     }
///
///     // ... 나머지 메서드 구현
/// }
/// ```
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// 가격 이력 조회.
    ///
    /// `interval`은 데이터 소스가 직접 제공하는 간격이어야 합니다
    /// (합성 간격은 호출 측에서 원본 간격으로 변환합니다).
    ///
    /// # Returns
    ///
    /// 봉 목록. 요청 구간에 데이터가 없으면 빈 벡터 반환 (에러 아님).
    ///
    /// # Errors
    ///
    /// - `FetchError::Network`: 네트워크 연결 실패
    /// - `FetchError::NotFound`: 알 수 없는 종목 코드
    /// - `FetchError::Parse`: 응답 형식 오류
    async fn get_bars(
        &self,
        code: &str,
        period: Period,
        interval: Interval,
    ) -> Result<Vec<Bar>, FetchError>;

    /// 펀더멘털 조회.
    ///
    /// 제공되지 않는 값은 `None`으로 채웁니다.
    async fn get_fundamentals(&self, code: &str) -> Result<Fundamentals, FetchError>;

    /// 데이터 소스 이름 반환.
    ///
    /// 로깅 및 디버깅 목적으로 사용됩니다.
    fn source_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_classification() {
        assert!(FetchError::Network("dns".into()).is_unreachable());
        assert!(FetchError::RateLimited("429".into()).is_unreachable());
        assert!(FetchError::Timeout("10s".into()).is_unreachable());
        assert!(!FetchError::NotFound("0000".into()).is_unreachable());
        assert!(!FetchError::Parse("bad json".into()).is_unreachable());
    }
}
