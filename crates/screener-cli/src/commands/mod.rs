//! CLI 명령어 구현 모듈.

pub mod inspect;
pub mod list;
pub mod screen;

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};

use screener_core::{AppConfig, Interval, MarketDataSource, TickerInfo};
use screener_data::{load_ticker_list, InMemoryDataSource, YahooFinanceSource};

/// 기본 종목 목록 경로.
pub const DEFAULT_TICKERS_PATH: &str = "data/tickers.csv";

/// 종목 소스 선택 (파일 또는 데모).
#[derive(Debug, Clone)]
pub struct SourceOptions {
    /// 종목 목록 CSV 경로
    pub tickers_path: String,
    /// 데모 데이터 사용 여부
    pub demo: bool,
}

impl SourceOptions {
    /// 데이터 소스를 생성합니다.
    pub fn data_source(&self, config: &AppConfig) -> Result<Arc<dyn MarketDataSource>> {
        if self.demo {
            return Ok(Arc::new(InMemoryDataSource::demo()));
        }
        let source = YahooFinanceSource::new(&config.data)
            .context("Failed to create Yahoo Finance data source")?;
        Ok(Arc::new(source))
    }

    /// 종목 목록을 불러옵니다.
    pub fn tickers(&self) -> Result<Vec<TickerInfo>> {
        if self.demo {
            return Ok(InMemoryDataSource::demo_tickers());
        }
        let path = Path::new(&self.tickers_path);
        load_ticker_list(path)
            .with_context(|| format!("Failed to load ticker list: {}", path.display()))
    }
}

/// 간격 문자열을 해석합니다. 없으면 설정의 기본 간격.
pub fn resolve_interval(interval: Option<&str>, config: &AppConfig) -> Result<Interval> {
    match interval {
        Some(s) => Interval::from_str(s).map_err(|e| anyhow!(e)),
        None => Ok(config.screening.default_interval),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_interval() {
        let config = AppConfig::default();
        assert_eq!(resolve_interval(None, &config).unwrap(), Interval::D1);
        assert_eq!(resolve_interval(Some("4h"), &config).unwrap(), Interval::H4);
        assert!(resolve_interval(Some("3d"), &config).is_err());
    }

    #[test]
    fn test_demo_tickers() {
        let options = SourceOptions {
            tickers_path: "does/not/exist.csv".to_string(),
            demo: true,
        };
        assert_eq!(options.tickers().unwrap().len(), 5);

        let missing = SourceOptions {
            demo: false,
            ..options
        };
        assert!(missing.tickers().is_err());
    }
}
