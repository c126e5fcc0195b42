//! 종목 식별 정보.
//!
//! 스크리닝 대상은 `{코드, 종목명}` 쌍으로 주어집니다.
//! 도쿄증권거래소 종목 코드는 4자리(숫자 또는 영숫자)이며,
//! Yahoo Finance에서는 `.T` 접미사를 붙여 조회합니다.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 도쿄증권거래소 Yahoo Finance 접미사.
pub const TSE_SUFFIX: &str = ".T";

/// 스크리닝 대상 종목.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TickerInfo {
    /// 종목 코드 (예: "7203")
    pub code: String,
    /// 종목명 (예: "トヨタ自動車")
    pub name: String,
}

impl TickerInfo {
    /// 새 종목 정보를 생성합니다. 코드와 이름의 앞뒤 공백은 제거됩니다.
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into().trim().to_string(),
            name: name.into().trim().to_string(),
        }
    }

    /// 데이터 소스 조회용 심볼을 반환합니다.
    ///
    /// 이미 거래소 접미사(`.`)가 있거나 지수(`^`)인 경우 그대로 사용하고,
    /// 그 외에는 `suffix`를 붙입니다.
    pub fn provider_symbol(&self, suffix: &str) -> String {
        to_provider_symbol(&self.code, suffix)
    }

    /// 이름(대소문자 무시) 또는 코드(부분 문자열)가 검색어와 일치하는지 확인합니다.
    ///
    /// 빈 검색어는 항상 일치합니다.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim();
        if query.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&query.to_lowercase()) || self.code.contains(query)
    }
}

impl fmt::Display for TickerInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}（{}）", self.name, self.code)
    }
}

/// 종목 코드를 데이터 소스 심볼로 변환합니다.
pub fn to_provider_symbol(code: &str, suffix: &str) -> String {
    let code = code.trim();
    if code.contains('.') || code.starts_with('^') {
        code.to_string()
    } else {
        format!("{}{}", code.to_uppercase(), suffix)
    }
}
