//! 캔들스틱 봉 간격 정의.
//!
//! 스크리너가 다루는 간격은 1시간봉, 4시간봉, 일봉, 주봉, 월봉입니다.
//! 4시간봉은 데이터 소스에서 직접 제공되지 않으므로 1시간봉을 리샘플링하여
//! 합성합니다.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use super::Period;

/// 봉 간격.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    /// 1시간봉
    #[serde(rename = "1h")]
    H1,
    /// 4시간봉 (1시간봉에서 합성)
    #[serde(rename = "4h")]
    H4,
    /// 일봉
    #[serde(rename = "1d")]
    D1,
    /// 주봉
    #[serde(rename = "1w")]
    W1,
    /// 월봉
    #[serde(rename = "1mo")]
    MN1,
}

impl Interval {
    /// 지원하는 모든 간격.
    pub const ALL: [Interval; 5] = [
        Interval::H1,
        Interval::H4,
        Interval::D1,
        Interval::W1,
        Interval::MN1,
    ];

    /// 이 간격의 기간을 반환합니다.
    pub fn duration(&self) -> Duration {
        match self {
            Interval::H1 => Duration::from_secs(60 * 60),
            Interval::H4 => Duration::from_secs(4 * 60 * 60),
            Interval::D1 => Duration::from_secs(24 * 60 * 60),
            Interval::W1 => Duration::from_secs(7 * 24 * 60 * 60),
            Interval::MN1 => Duration::from_secs(30 * 24 * 60 * 60), // 근사값
        }
    }

    /// 이 간격의 초 단위 값을 반환합니다.
    pub fn as_secs(&self) -> u64 {
        self.duration().as_secs()
    }

    /// 데이터 소스에서 직접 제공되지 않는 합성 간격인지 확인합니다.
    pub fn is_synthetic(&self) -> bool {
        matches!(self, Interval::H4)
    }

    /// 실제로 데이터 소스에 요청해야 하는 간격을 반환합니다.
    ///
    /// 합성 간격은 더 짧은 원본 간격으로 조회한 뒤 리샘플링합니다.
    pub fn source_interval(&self) -> Interval {
        match self {
            Interval::H4 => Interval::H1,
            other => *other,
        }
    }

    /// 장중(시간봉) 간격인지 확인합니다.
    pub fn is_intraday(&self) -> bool {
        matches!(self, Interval::H1 | Interval::H4)
    }

    /// 간격별 기본 조회 기간.
    ///
    /// 장기 이동평균(26)을 계산할 수 있을 만큼의 봉이 확보되도록 잡습니다.
    pub fn default_period(&self) -> Period {
        match self {
            Interval::H1 | Interval::H4 => Period::M1,
            Interval::D1 => Period::M6,
            Interval::W1 => Period::Y2,
            Interval::MN1 => Period::Y5,
        }
    }

    /// 간격 문자열 반환 ("1h", "4h", "1d", "1w", "1mo").
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::H1 => "1h",
            Interval::H4 => "4h",
            Interval::D1 => "1d",
            Interval::W1 => "1w",
            Interval::MN1 => "1mo",
        }
    }

    /// Yahoo Finance 간격 문자열로 변환합니다.
    ///
    /// 4시간봉은 Yahoo에 없으므로 원본 간격(1시간봉)을 사용합니다.
    pub fn to_yahoo_interval(&self) -> &'static str {
        match self.source_interval() {
            Interval::H1 | Interval::H4 => "1h",
            Interval::D1 => "1d",
            Interval::W1 => "1wk",
            Interval::MN1 => "1mo",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Interval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1h" | "h1" | "60m" | "hourly" => Ok(Interval::H1),
            "4h" | "h4" => Ok(Interval::H4),
            "1d" | "d1" | "d" | "daily" => Ok(Interval::D1),
            "1w" | "w1" | "1wk" | "w" | "weekly" => Ok(Interval::W1),
            "1mo" | "mn1" | "1mn" | "monthly" => Ok(Interval::MN1),
            _ => Err(format!(
                "Invalid interval: {}. Supported: 1h, 4h, 1d, 1w, 1mo",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_duration() {
        assert_eq!(Interval::H1.as_secs(), 3600);
        assert_eq!(Interval::H4.as_secs(), 4 * 3600);
        assert_eq!(Interval::D1.as_secs(), 86400);
    }

    #[test]
    fn test_synthetic_interval() {
        assert!(Interval::H4.is_synthetic());
        assert_eq!(Interval::H4.source_interval(), Interval::H1);
        assert_eq!(Interval::H4.to_yahoo_interval(), "1h");

        for interval in [Interval::H1, Interval::D1, Interval::W1, Interval::MN1] {
            assert!(!interval.is_synthetic());
            assert_eq!(interval.source_interval(), interval);
        }
    }

    #[test]
    fn test_interval_parse_roundtrip() {
        for interval in Interval::ALL {
            assert_eq!(interval.as_str().parse::<Interval>().unwrap(), interval);
        }
        assert_eq!("1wk".parse::<Interval>().unwrap(), Interval::W1);
        assert!("15m".parse::<Interval>().is_err());
    }

    #[test]
    fn test_interval_serde() {
        let json = serde_json::to_string(&Interval::H4).unwrap();
        assert_eq!(json, "\"4h\"");
        let parsed: Interval = serde_json::from_str("\"1mo\"").unwrap();
        assert_eq!(parsed, Interval::MN1);
    }
}
