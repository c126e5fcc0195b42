//! 스크리너 CLI 도구 모음.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 종목 목록 스크리닝 (`screen`)
//! - 종목 상세 평가 (`inspect`)
//! - 종목 목록 조회 (`list`)
//! - table/csv/json 출력

pub mod commands;
pub mod output;
