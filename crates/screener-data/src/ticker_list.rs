//! 종목 목록 CSV 로더.
//!
//! 헤더는 `code,name` 또는 `銘柄コード,銘柄名`를 지원합니다.
//!
//! ```text
//! 銘柄コード,銘柄名
//! 7203,トヨタ自動車
//! 6758,ソニーグループ
//! ```
//!
//! - 빈 행은 건너뜁니다.
//! - 코드와 이름의 앞뒤 공백은 제거합니다.
//! - 같은 코드가 여러 번 나오면 처음 것만 사용합니다.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, info, warn};

use screener_core::TickerInfo;

use crate::error::{DataError, Result};

const CODE_HEADERS: [&str; 3] = ["code", "銘柄コード", "ticker"];
const NAME_HEADERS: [&str; 2] = ["name", "銘柄名"];

/// 파일에서 종목 목록을 읽습니다.
pub fn load_ticker_list(path: impl AsRef<Path>) -> Result<Vec<TickerInfo>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    let tickers = parse_ticker_list(file)?;

    info!(path = %path.display(), tickers = tickers.len(), "Ticker list loaded");
    Ok(tickers)
}

/// CSV 본문에서 종목 목록을 파싱합니다.
pub fn parse_ticker_list<R: Read>(reader: R) -> Result<Vec<TickerInfo>> {
    let mut csv_reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let code_idx = find_column(&headers, &CODE_HEADERS)
        .ok_or_else(|| DataError::MissingColumn("code (銘柄コード)".to_string()))?;
    let name_idx = find_column(&headers, &NAME_HEADERS)
        .ok_or_else(|| DataError::MissingColumn("name (銘柄名)".to_string()))?;

    let mut seen = HashSet::new();
    let mut tickers = Vec::new();

    for (line, record) in csv_reader.records().enumerate() {
        let record = record?;
        let code = record.get(code_idx).unwrap_or("").trim();
        let name = record.get(name_idx).unwrap_or("").trim();

        if code.is_empty() {
            if !name.is_empty() {
                warn!(row = line + 2, name = name, "Skipping row without code");
            }
            continue;
        }

        if !seen.insert(code.to_string()) {
            debug!(code = code, "Duplicate code ignored");
            continue;
        }

        tickers.push(TickerInfo::new(code, name));
    }

    Ok(tickers)
}

/// 헤더 후보 중 첫 번째로 일치하는 컬럼 위치. BOM과 대소문자는 무시합니다.
fn find_column(headers: &StringRecord, candidates: &[&str]) -> Option<usize> {
    headers.iter().position(|h| {
        let h = h.trim_start_matches('\u{feff}').trim();
        candidates.iter().any(|c| h.eq_ignore_ascii_case(c))
    })
}
