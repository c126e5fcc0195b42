//! 시장 데이터 소스 구현.
//!
//! - [`YahooFinanceSource`]: Yahoo Finance chart/quote API
//! - [`InMemoryDataSource`]: 적재한 데이터를 반환 (테스트, 데모)

pub mod memory;
pub mod yahoo;

pub use memory::InMemoryDataSource;
pub use yahoo::YahooFinanceSource;
