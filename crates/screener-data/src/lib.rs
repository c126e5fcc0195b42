//! 시장 데이터 조회 및 종목 목록 관리.
//!
//! 이 crate는 다음을 제공합니다:
//! - Yahoo Finance 데이터 소스 (가격 이력, 펀더멘털)
//! - 인메모리 데이터 소스 (테스트 및 데모 모드)
//! - 종목 목록 CSV 로더

pub mod error;
pub mod provider;
pub mod ticker_list;

pub use error::{DataError, Result};
pub use provider::{InMemoryDataSource, YahooFinanceSource};
pub use ticker_list::{load_ticker_list, parse_ticker_list};
