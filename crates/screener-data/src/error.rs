//! 데이터 모듈 오류 타입.

use screener_core::FetchError;
use thiserror::Error;

/// 데이터 관련 오류.
#[derive(Debug, Error)]
pub enum DataError {
    /// 파일 입출력 오류
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV 파싱 오류
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// 필수 컬럼 누락
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// 잘못된 데이터 형식
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// 데이터 가져오기 오류 (외부 소스)
    #[error("Fetch error: {0}")]
    FetchError(String),

    /// 파싱 오류
    #[error("Parse error: {0}")]
    ParseError(String),

    /// 설정 오류
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        DataError::ParseError(err.to_string())
    }
}

impl From<reqwest::Error> for DataError {
    fn from(err: reqwest::Error) -> Self {
        DataError::FetchError(err.to_string())
    }
}

impl From<DataError> for FetchError {
    fn from(err: DataError) -> Self {
        match err {
            DataError::FetchError(msg) => FetchError::Network(msg),
            DataError::Io(e) => FetchError::Network(e.to_string()),
            other => FetchError::Parse(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, DataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_fetch_error() {
        let fetch: FetchError = DataError::FetchError("connection reset".to_string()).into();
        assert!(matches!(fetch, FetchError::Network(_)));

        let parse: FetchError = DataError::ParseError("bad json".to_string()).into();
        assert!(matches!(parse, FetchError::Parse(_)));
    }
}
