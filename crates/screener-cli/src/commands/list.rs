//! 종목 목록 조회 기능.

use anyhow::Result;
use tracing::info;

use super::SourceOptions;
use crate::output::{render_tickers, write_output, OutputFormat};

/// 종목 조회 설정.
#[derive(Debug)]
pub struct ListConfig {
    pub source: SourceOptions,
    /// 검색 키워드 (종목명 또는 코드)
    pub search: Option<String>,
    /// 출력 형식
    pub format: OutputFormat,
    /// 출력 파일 경로
    pub output: Option<String>,
}

/// 종목 목록 조회.
pub fn list_tickers(config: ListConfig) -> Result<usize> {
    let tickers = config.source.tickers()?;
    let total = tickers.len();

    let query = config.search.as_deref().unwrap_or("").trim();
    let selected: Vec<_> = tickers.into_iter().filter(|t| t.matches(query)).collect();

    info!("Found {} of {} tickers", selected.len(), total);

    let content = render_tickers(&selected, config.format)?;
    write_output(&content, config.output.as_deref())?;

    Ok(selected.len())
}
