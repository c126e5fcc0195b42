//! Yahoo Finance 데이터 소스.
//!
//! 가격 이력은 `yahoo_finance_api`의 chart API로, 펀더멘털(PER, EPS, 시가총액)은
//! quote JSON API로 조회합니다.
//!
//! # 심볼 형식
//!
//! 도쿄증권거래소 종목 코드는 접미사를 붙여 조회합니다:
//! - "7203" → "7203.T"
//! - 이미 접미사가 있는 코드("AAPL.US" 등)나 지수("^N225")는 그대로 사용
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use screener_data::YahooFinanceSource;
//!
//! let source = YahooFinanceSource::new(&config.data)?;
//! let bars = source.get_bars("7203", Period::M6, Interval::D1).await?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use reqwest::{Client, StatusCode};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, info, warn};
use yahoo_finance_api as yahoo;

use screener_core::{
    to_provider_symbol, Bar, DataSourceConfig, FetchError, Fundamentals, Interval,
    MarketDataSource, Period,
};

use crate::error::{DataError, Result};

/// quote API 경로.
const QUOTE_PATH: &str = "/v7/finance/quote";

/// Yahoo Finance 데이터 소스.
pub struct YahooFinanceSource {
    connector: yahoo::YahooConnector,
    client: Client,
    quote_base_url: String,
    symbol_suffix: String,
    request_delay: Duration,
}

impl YahooFinanceSource {
    /// 새로운 Yahoo Finance 데이터 소스 생성.
    pub fn new(config: &DataSourceConfig) -> Result<Self> {
        let connector = yahoo::YahooConnector::new()
            .map_err(|e| DataError::ConfigError(format!("Yahoo Finance 연결 실패: {}", e)))?;

        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent("Mozilla/5.0 (compatible; screener/0.1)")
            .build()
            .map_err(|e| DataError::ConfigError(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        Ok(Self {
            connector,
            client,
            quote_base_url: config.quote_base_url.trim_end_matches('/').to_string(),
            symbol_suffix: config.symbol_suffix.clone(),
            request_delay: config.request_delay(),
        })
    }

    /// 종목 코드를 Yahoo Finance 심볼로 변환.
    pub fn symbol_for(&self, code: &str) -> String {
        to_provider_symbol(code, &self.symbol_suffix)
    }

    async fn throttle(&self) {
        if !self.request_delay.is_zero() {
            tokio::time::sleep(self.request_delay).await;
        }
    }

    /// quote API에서 펀더멘털을 조회합니다.
    async fn fetch_quote_summary(&self, symbol: &str) -> std::result::Result<Fundamentals, FetchError> {
        let url = format!("{}{}", self.quote_base_url, QUOTE_PATH);

        let response = self
            .client
            .get(&url)
            .query(&[("symbols", symbol)])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout(format!("{}: {}", symbol, e))
                } else {
                    FetchError::Network(format!("{}: {}", symbol, e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_to_error(status, symbol));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Network(format!("{}: {}", symbol, e)))?;

        parse_quote_response(&body, symbol).map_err(|e| match e {
            DataError::InvalidData(msg) => FetchError::NotFound(msg),
            other => other.into(),
        })
    }
}

#[async_trait]
impl MarketDataSource for YahooFinanceSource {
    async fn get_bars(
        &self,
        code: &str,
        period: Period,
        interval: Interval,
    ) -> std::result::Result<Vec<Bar>, FetchError> {
        let symbol = self.symbol_for(code);
        let yahoo_interval = interval.to_yahoo_interval();

        info!(
            symbol = %symbol,
            interval = yahoo_interval,
            range = period.as_str(),
            "Yahoo Finance: 가격 이력 조회"
        );

        self.throttle().await;

        let response = self
            .connector
            .get_quote_range(&symbol, yahoo_interval, period.as_str())
            .await
            .map_err(|e| classify_error(&symbol, &e.to_string()))?;

        let quotes = match response.quotes() {
            Ok(quotes) => quotes,
            Err(e) if is_empty_quotes(&e.to_string()) => Vec::new(),
            Err(e) => return Err(FetchError::Parse(format!("{}: {}", symbol, e))),
        };

        if quotes.is_empty() {
            warn!(symbol = %symbol, "Yahoo Finance: 데이터 없음");
            return Ok(Vec::new());
        }

        let total = quotes.len();
        let mut bars: Vec<Bar> = quotes.iter().filter_map(quote_to_bar).collect();
        bars.sort_by_key(|b| b.open_time);

        debug!(
            symbol = %symbol,
            received = total,
            converted = bars.len(),
            "Yahoo Finance: 봉 수신"
        );

        Ok(bars)
    }

    async fn get_fundamentals(&self, code: &str) -> std::result::Result<Fundamentals, FetchError> {
        let symbol = self.symbol_for(code);
        self.throttle().await;
        self.fetch_quote_summary(&symbol).await
    }

    fn source_name(&self) -> &str {
        "yahoo_finance"
    }
}

// =============================================================================
// 변환 헬퍼
// =============================================================================

/// Yahoo Quote를 Bar로 변환. 유한하지 않은 가격이 있으면 None.
fn quote_to_bar(quote: &yahoo::Quote) -> Option<Bar> {
    let open_time = DateTime::from_timestamp(quote.timestamp as i64, 0)?;
    Some(Bar::new(
        open_time,
        to_decimal(quote.open)?,
        to_decimal(quote.high)?,
        to_decimal(quote.low)?,
        to_decimal(quote.close)?,
        quote.volume,
    ))
}

fn to_decimal(value: f64) -> Option<Decimal> {
    if value.is_finite() {
        Decimal::from_f64(value).map(|d| d.normalize())
    } else {
        None
    }
}

/// 커넥터 에러 메시지를 조회 에러로 분류합니다.
fn classify_error(symbol: &str, message: &str) -> FetchError {
    let lower = message.to_lowercase();
    let detail = format!("{}: {}", symbol, message);

    if lower.contains("429") || lower.contains("too many") {
        FetchError::RateLimited(detail)
    } else if lower.contains("timed out") || lower.contains("timeout") {
        FetchError::Timeout(detail)
    } else if lower.contains("404")
        || lower.contains("not found")
        || lower.contains("no data found")
        || lower.contains("delisted")
    {
        FetchError::NotFound(detail)
    } else if lower.contains("deserializ") || lower.contains("json") || lower.contains("parse") {
        FetchError::Parse(detail)
    } else {
        FetchError::Network(detail)
    }
}

fn is_empty_quotes(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("no quotes") || lower.contains("empty data")
}

fn status_to_error(status: StatusCode, symbol: &str) -> FetchError {
    let detail = format!("{}: HTTP {}", symbol, status);
    match status {
        StatusCode::TOO_MANY_REQUESTS => FetchError::RateLimited(detail),
        StatusCode::NOT_FOUND => FetchError::NotFound(detail),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => FetchError::Timeout(detail),
        _ => FetchError::Network(detail),
    }
}

// =============================================================================
// quote API 응답
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteEnvelope {
    quote_response: QuoteResponse,
}

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    #[serde(default)]
    result: Vec<QuoteSummary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummary {
    symbol: String,
    #[serde(rename = "trailingPE")]
    trailing_pe: Option<f64>,
    eps_trailing_twelve_months: Option<f64>,
    market_cap: Option<f64>,
}

impl QuoteSummary {
    fn into_fundamentals(self) -> Fundamentals {
        Fundamentals {
            per: self.trailing_pe.and_then(to_decimal),
            eps: self.eps_trailing_twelve_months.and_then(to_decimal),
            market_cap: self.market_cap.and_then(to_decimal),
        }
    }
}

/// quote API 응답 본문을 파싱합니다.
///
/// 요청한 심볼이 결과에 없으면 `NotFound`.
fn parse_quote_response(body: &str, symbol: &str) -> Result<Fundamentals> {
    let envelope: QuoteEnvelope = serde_json::from_str(body)?;

    envelope
        .quote_response
        .result
        .into_iter()
        .find(|q| q.symbol.eq_ignore_ascii_case(symbol))
        .map(QuoteSummary::into_fundamentals)
        .ok_or_else(|| DataError::InvalidData(format!("quote 결과에 {} 없음", symbol)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use rust_decimal_macros::dec;

    fn config_for(base_url: &str) -> DataSourceConfig {
        DataSourceConfig {
            quote_base_url: base_url.to_string(),
            ..Default::default()
        }
    }

    const TOYOTA_QUOTE: &str = r#"{
        "quoteResponse": {
            "result": [{
                "symbol": "7203.T",
                "trailingPE": 9.1,
                "epsTrailingTwelveMonths": 359.56,
                "marketCap": 45000000000000
            }],
            "error": null
        }
    }"#;

    #[test]
    fn test_symbol_mapping() {
        let source = YahooFinanceSource::new(&DataSourceConfig::default()).unwrap();
        assert_eq!(source.symbol_for("7203"), "7203.T");
        assert_eq!(source.symbol_for(" 6758 "), "6758.T");
        assert_eq!(source.symbol_for("^N225"), "^N225");
    }

    #[test]
    fn test_classify_error() {
        assert!(matches!(
            classify_error("7203.T", "fetching the data from yahoo! finance failed: 429 Too Many Requests"),
            FetchError::RateLimited(_)
        ));
        assert!(matches!(
            classify_error("0000.T", "No data found, symbol may be delisted"),
            FetchError::NotFound(_)
        ));
        assert!(matches!(
            classify_error("7203.T", "operation timed out"),
            FetchError::Timeout(_)
        ));
        assert!(matches!(
            classify_error("7203.T", "deserializing response from yahoo! finance failed"),
            FetchError::Parse(_)
        ));
        assert!(matches!(
            classify_error("7203.T", "connection refused"),
            FetchError::Network(_)
        ));
    }

    #[test]
    fn test_to_decimal() {
        assert_eq!(to_decimal(12.3), Some(dec!(12.3)));
        assert_eq!(to_decimal(f64::NAN), None);
        assert_eq!(to_decimal(f64::INFINITY), None);
    }

    #[test]
    fn test_parse_quote_response() {
        let fundamentals = parse_quote_response(TOYOTA_QUOTE, "7203.T").unwrap();
        assert_eq!(fundamentals.per, Some(dec!(9.1)));
        assert_eq!(fundamentals.eps, Some(dec!(359.56)));
        assert_eq!(fundamentals.market_cap, Some(dec!(45000000000000)));
    }

    #[test]
    fn test_parse_quote_response_missing_fields() {
        let body = r#"{"quoteResponse":{"result":[{"symbol":"4385.T"}]}}"#;
        let fundamentals = parse_quote_response(body, "4385.T").unwrap();
        assert!(fundamentals.is_absent());

        let empty = r#"{"quoteResponse":{"result":[]}}"#;
        assert!(matches!(
            parse_quote_response(empty, "4385.T"),
            Err(DataError::InvalidData(_))
        ));

        assert!(matches!(
            parse_quote_response("not json", "4385.T"),
            Err(DataError::ParseError(_))
        ));
    }

    #[tokio::test]
    async fn test_get_fundamentals_over_http() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", QUOTE_PATH)
            .match_query(Matcher::UrlEncoded("symbols".into(), "7203.T".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(TOYOTA_QUOTE)
            .create_async()
            .await;

        let source = YahooFinanceSource::new(&config_for(&server.url())).unwrap();
        let fundamentals = source.get_fundamentals("7203").await.unwrap();

        assert_eq!(fundamentals.per, Some(dec!(9.1)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_fundamentals_http_errors() {
        let mut server = mockito::Server::new_async().await;
        let _limited = server
            .mock("GET", QUOTE_PATH)
            .match_query(Matcher::UrlEncoded("symbols".into(), "6758.T".into()))
            .with_status(429)
            .create_async()
            .await;
        let _unknown = server
            .mock("GET", QUOTE_PATH)
            .match_query(Matcher::UrlEncoded("symbols".into(), "0000.T".into()))
            .with_status(200)
            .with_body(r#"{"quoteResponse":{"result":[]}}"#)
            .create_async()
            .await;

        let source = YahooFinanceSource::new(&config_for(&server.url())).unwrap();

        let limited = source.get_fundamentals("6758").await.unwrap_err();
        assert!(matches!(limited, FetchError::RateLimited(_)));
        assert!(limited.is_unreachable());

        let unknown = source.get_fundamentals("0000").await.unwrap_err();
        assert!(matches!(unknown, FetchError::NotFound(_)));
    }
}
