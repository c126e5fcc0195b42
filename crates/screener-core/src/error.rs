//! 스크리너의 에러 타입.
//!
//! 이 모듈은 스크리닝 엔진 전반에서 사용되는 에러 타입을 정의합니다.
//! 종목 단위의 조회 실패는 [`FetchError`](crate::domain::FetchError)로 기록되고
//! 배치는 계속 진행됩니다. 배치 전체를 중단시키는 에러만 `ScreenerError`로 반환됩니다.

use thiserror::Error;

use crate::domain::TickerFailure;

/// 핵심 스크리너 에러.
#[derive(Debug, Error)]
pub enum ScreenerError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 잘못된 입력
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 데이터 소스에 전혀 접근할 수 없음 (모든 종목 조회 실패)
    #[error("데이터 소스 접근 불가: {}개 종목 모두 조회 실패", failures.len())]
    SourceUnreachable {
        /// 종목별 실패 내역
        failures: Vec<TickerFailure>,
    },
}

/// 스크리너 작업을 위한 Result 타입.
pub type ScreenerResult<T> = Result<T, ScreenerError>;

impl From<config::ConfigError> for ScreenerError {
    fn from(err: config::ConfigError) -> Self {
        ScreenerError::Config(err.to_string())
    }
}
