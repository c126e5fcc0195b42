//! 저장소에 포함된 종목 목록 파일 로딩 테스트.

use std::path::PathBuf;

use screener_data::{load_ticker_list, InMemoryDataSource};

fn repo_tickers_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data/tickers.csv")
}

#[test]
fn test_bundled_ticker_list() {
    let tickers = load_ticker_list(repo_tickers_path()).unwrap();

    assert_eq!(tickers.len(), 5);
    assert_eq!(tickers[0].code, "6758");
    assert_eq!(tickers[4].name, "トヨタ自動車");
}

#[test]
fn test_bundled_list_matches_demo_tickers() {
    let tickers = load_ticker_list(repo_tickers_path()).unwrap();
    assert_eq!(tickers, InMemoryDataSource::demo_tickers());
}
