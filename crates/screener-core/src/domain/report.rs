//! 스크리닝 리포트 타입.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{FetchError, ScoreResult};
use crate::types::Interval;

/// 종목 단위 실패 유형.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// 데이터 소스에 도달하지 못함 (네트워크, 요청 한도)
    Fetch,
    /// 조회 시간 초과
    Timeout,
    /// 데이터 소스가 모르는 종목
    NotFound,
    /// 응답은 받았으나 해석할 수 없음
    InvalidResponse,
    /// 요청 구간에 봉이 없음
    EmptyData,
}

impl FailureKind {
    /// 데이터 소스 접근 실패로 간주되는 유형인지 확인합니다.
    ///
    /// `NotFound`와 `InvalidResponse`는 소스가 응답한 경우이므로 해당하지 않습니다.
    pub fn is_source_failure(&self) -> bool {
        matches!(self, FailureKind::Fetch | FailureKind::Timeout)
    }
}

impl From<&FetchError> for FailureKind {
    fn from(err: &FetchError) -> Self {
        match err {
            FetchError::Network(_) | FetchError::RateLimited(_) => FailureKind::Fetch,
            FetchError::Timeout(_) => FailureKind::Timeout,
            FetchError::NotFound(_) => FailureKind::NotFound,
            FetchError::Parse(_) => FailureKind::InvalidResponse,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureKind::Fetch => "fetch",
            FailureKind::Timeout => "timeout",
            FailureKind::NotFound => "not_found",
            FailureKind::InvalidResponse => "invalid_response",
            FailureKind::EmptyData => "empty_data",
        };
        write!(f, "{}", s)
    }
}

/// 스코어링되지 못한 종목 기록.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerFailure {
    pub code: String,
    pub name: String,
    pub kind: FailureKind,
    /// 짧은 사유
    pub reason: String,
}

impl TickerFailure {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        kind: FailureKind,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            kind,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for TickerFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}（{}）[{}]: {}", self.name, self.code, self.kind, self.reason)
    }
}

/// 리포트 상태.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    /// 순위가 매겨진 결과가 하나 이상 있음
    Ranked,
    /// 스코어링된 종목은 있으나 검색어와 일치하는 종목이 없음
    NoMatch,
    /// 스코어링된 종목이 없음
    NoResults,
}

impl ReportStatus {
    /// 스코어링된 수와 필터 후 남은 수로 상태를 결정합니다.
    pub fn determine(scored: usize, kept: usize) -> Self {
        if scored == 0 {
            ReportStatus::NoResults
        } else if kept == 0 {
            ReportStatus::NoMatch
        } else {
            ReportStatus::Ranked
        }
    }
}

/// 스크리닝 배치 결과.
///
/// `results`는 점수 내림차순이며 동점은 입력 순서를 유지합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningReport {
    pub interval: Interval,
    /// 적용된 검색어 (공백 제거 후 비어 있으면 None)
    pub filter: Option<String>,
    pub status: ReportStatus,
    pub results: Vec<ScoreResult>,
    pub failures: Vec<TickerFailure>,
    pub generated_at: DateTime<Utc>,
}

impl ScreeningReport {
    /// 결과가 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// 최고 점수 결과.
    pub fn top(&self) -> Option<&ScoreResult> {
        self.results.first()
    }

    /// 특정 유형의 실패만 반환합니다.
    pub fn failures_of(&self, kind: FailureKind) -> impl Iterator<Item = &TickerFailure> {
        self.failures.iter().filter(move |f| f.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_determination() {
        assert_eq!(ReportStatus::determine(0, 0), ReportStatus::NoResults);
        assert_eq!(ReportStatus::determine(3, 0), ReportStatus::NoMatch);
        assert_eq!(ReportStatus::determine(3, 1), ReportStatus::Ranked);
    }

    #[test]
    fn test_failure_kind() {
        assert!(FailureKind::Fetch.is_source_failure());
        assert!(FailureKind::Timeout.is_source_failure());
        assert!(!FailureKind::EmptyData.is_source_failure());
        assert!(!FailureKind::NotFound.is_source_failure());
        assert!(!FailureKind::InvalidResponse.is_source_failure());

        let failure = TickerFailure::new("4385", "メルカリ", FailureKind::EmptyData, "no bars");
        assert_eq!(failure.to_string(), "メルカリ（4385）[empty_data]: no bars");
    }

    #[test]
    fn test_failure_kind_from_fetch_error() {
        let kind = |e: FetchError| FailureKind::from(&e);
        assert_eq!(kind(FetchError::Network("reset".into())), FailureKind::Fetch);
        assert_eq!(kind(FetchError::RateLimited("429".into())), FailureKind::Fetch);
        assert_eq!(kind(FetchError::Timeout("10s".into())), FailureKind::Timeout);
        assert_eq!(kind(FetchError::NotFound("0000".into())), FailureKind::NotFound);
        assert_eq!(kind(FetchError::Parse("bad json".into())), FailureKind::InvalidResponse);

        // 소스 접근 실패 분류는 FetchError와 일치해야 한다
        for err in [
            FetchError::Network("reset".into()),
            FetchError::RateLimited("429".into()),
            FetchError::Timeout("10s".into()),
            FetchError::NotFound("0000".into()),
            FetchError::Parse("bad json".into()),
        ] {
            assert_eq!(FailureKind::from(&err).is_source_failure(), err.is_unreachable());
        }
    }
}
