//! 데이터 조회 기간 정의.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 데이터 소스에 요청하는 과거 조회 기간.
///
/// Yahoo Finance의 `range` 파라미터와 같은 형식을 사용합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "5d")]
    D5,
    #[serde(rename = "1mo")]
    M1,
    #[serde(rename = "3mo")]
    M3,
    #[serde(rename = "6mo")]
    M6,
    #[serde(rename = "1y")]
    Y1,
    #[serde(rename = "2y")]
    Y2,
    #[serde(rename = "5y")]
    Y5,
    #[serde(rename = "max")]
    Max,
}

impl Period {
    /// Yahoo Finance `range` 문자열.
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::D5 => "5d",
            Period::M1 => "1mo",
            Period::M3 => "3mo",
            Period::M6 => "6mo",
            Period::Y1 => "1y",
            Period::Y2 => "2y",
            Period::Y5 => "5y",
            Period::Max => "max",
        }
    }

    /// 대략적인 일 수 (max는 None).
    pub fn approx_days(&self) -> Option<u32> {
        match self {
            Period::D5 => Some(5),
            Period::M1 => Some(30),
            Period::M3 => Some(90),
            Period::M6 => Some(180),
            Period::Y1 => Some(365),
            Period::Y2 => Some(730),
            Period::Y5 => Some(1825),
            Period::Max => None,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "5d" => Ok(Period::D5),
            "1mo" => Ok(Period::M1),
            "3mo" => Ok(Period::M3),
            "6mo" => Ok(Period::M6),
            "1y" => Ok(Period::Y1),
            "2y" => Ok(Period::Y2),
            "5y" => Ok(Period::Y5),
            "max" => Ok(Period::Max),
            _ => Err(format!(
                "Invalid period: {}. Supported: 5d, 1mo, 3mo, 6mo, 1y, 2y, 5y, max",
                s
            )),
        }
    }
}
