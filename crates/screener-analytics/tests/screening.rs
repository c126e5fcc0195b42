//! 스크리닝 파이프라인 통합 테스트.
//!
//! 인메모리 데이터 소스로 조회 → 준비 → 분류 → 채점 → 정렬/필터 전체를 검증합니다.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use screener_analytics::Screener;
use screener_core::{
    AppConfig, Bar, FailureKind, FetchError, Fundamentals, Interval, ReportStatus, RuleId,
    ScreenerError, TickerInfo, TrendLabel,
};
use screener_data::InMemoryDataSource;

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()
}

/// 종가가 100에서 1씩 오르는 일봉. 마지막 봉만 거래량이 다릅니다.
fn rising_daily(count: i64, last_volume: u64) -> Vec<Bar> {
    (0..count)
        .map(|i| {
            let close = Decimal::from(100 + i);
            let volume = if i == count - 1 { last_volume } else { 1000 };
            Bar::new(
                start() + ChronoDuration::days(i),
                close - dec!(0.5),
                close + dec!(1),
                close - dec!(1),
                close,
                volume,
            )
        })
        .collect()
}

fn falling_daily(count: i64) -> Vec<Bar> {
    (0..count)
        .map(|i| {
            let close = Decimal::from(200 - i);
            Bar::new(
                start() + ChronoDuration::days(i),
                close,
                close + dec!(1),
                close - dec!(1),
                close,
                1000,
            )
        })
        .collect()
}

fn healthy() -> Fundamentals {
    Fundamentals::absent().with_per(dec!(12)).with_eps(dec!(5))
}

fn screener(source: InMemoryDataSource) -> Screener {
    Screener::new(Arc::new(source), &AppConfig::default()).unwrap()
}

#[tokio::test]
async fn test_rising_ticker_scores_full_marks() {
    let source = InMemoryDataSource::new()
        .with_bars("7203", Interval::D1, rising_daily(30, 1600))
        .with_fundamentals("7203", healthy());
    let screener = screener(source);
    let tickers = vec![TickerInfo::new("7203", "トヨタ自動車")];

    let report = screener.screen(&tickers, Interval::D1, "").await.unwrap();

    assert_eq!(report.status, ReportStatus::Ranked);
    assert!(report.failures.is_empty());
    let result = &report.results[0];
    assert_eq!(result.trend(), TrendLabel::Up);
    assert_eq!(result.score(), 25);
    assert_eq!(result.max_score(), 25);
    assert_eq!(result.score_display(), "25 / 25");
    assert!(result.outcomes().iter().all(|o| o.passed));
}

#[tokio::test]
async fn test_results_sorted_by_score_with_stable_ties() {
    let source = InMemoryDataSource::new()
        .with_bars("A", Interval::D1, falling_daily(30))
        .with_fundamentals("A", Fundamentals::absent())
        .with_bars("B", Interval::D1, rising_daily(30, 1600))
        .with_fundamentals("B", healthy())
        .with_bars("C", Interval::D1, falling_daily(30))
        .with_fundamentals("C", Fundamentals::absent())
        .with_bars("D", Interval::D1, rising_daily(30, 1600))
        .with_fundamentals("D", healthy());
    let screener = screener(source);
    let tickers: Vec<TickerInfo> = ["A", "B", "C", "D"]
        .iter()
        .map(|c| TickerInfo::new(*c, format!("Ticker {}", c)))
        .collect();

    let report = screener.screen(&tickers, Interval::D1, "").await.unwrap();
    let order: Vec<&str> = report.results.iter().map(|r| r.code()).collect();

    assert_eq!(order, vec!["B", "D", "A", "C"]);
    assert!(report
        .results
        .windows(2)
        .all(|w| w[0].score() >= w[1].score()));
}

#[tokio::test]
async fn test_concurrent_fetch_keeps_input_order() {
    let source = InMemoryDataSource::new()
        .with_bars("SLOW", Interval::D1, rising_daily(30, 1000))
        .with_fundamentals("SLOW", healthy())
        .with_delay("SLOW", Duration::from_millis(50))
        .with_bars("FAST", Interval::D1, rising_daily(30, 1000))
        .with_fundamentals("FAST", healthy());

    let mut config = AppConfig::default();
    config.screening.max_concurrency = 4;
    let screener = Screener::new(Arc::new(source), &config).unwrap();
    let tickers = vec![TickerInfo::new("SLOW", "Slow"), TickerInfo::new("FAST", "Fast")];

    let report = screener.screen(&tickers, Interval::D1, "").await.unwrap();
    let order: Vec<&str> = report.results.iter().map(|r| r.code()).collect();
    assert_eq!(order, vec!["SLOW", "FAST"]);
}

#[tokio::test]
async fn test_filter_by_name_or_code() {
    let screener = screener(InMemoryDataSource::demo());
    let tickers = InMemoryDataSource::demo_tickers();

    let by_name = screener.screen(&tickers, Interval::D1, "ソニー").await.unwrap();
    assert_eq!(by_name.results.len(), 1);
    assert_eq!(by_name.results[0].code(), "6758");
    assert_eq!(by_name.filter.as_deref(), Some("ソニー"));

    let by_code = screener.screen(&tickers, Interval::D1, " 4385 ").await.unwrap();
    assert_eq!(by_code.results.len(), 1);
    assert_eq!(by_code.results[0].name(), "メルカリ");

    let none = screener.screen(&tickers, Interval::D1, "9999").await.unwrap();
    assert_eq!(none.status, ReportStatus::NoMatch);
    assert!(none.results.is_empty());

    let blank = screener.screen(&tickers, Interval::D1, "   ").await.unwrap();
    assert_eq!(blank.results.len(), 5);
    assert_eq!(blank.filter, None);
}

#[tokio::test]
async fn test_demo_profiles() {
    let screener = screener(InMemoryDataSource::demo());
    let tickers = InMemoryDataSource::demo_tickers();
    let report = screener.screen(&tickers, Interval::D1, "").await.unwrap();

    let sony = report.results.iter().find(|r| r.code() == "6758").unwrap();
    assert_eq!(sony.trend(), TrendLabel::Up);
    assert!(sony.outcome(RuleId::GoldenCross).unwrap().passed);
    assert!(sony.outcome(RuleId::VolumeSurge).unwrap().passed);
    assert!(sony.outcome(RuleId::Valuation).unwrap().passed);

    let lasertec = report.results.iter().find(|r| r.code() == "6920").unwrap();
    assert_eq!(lasertec.trend(), TrendLabel::Down);
    assert!(!lasertec.outcome(RuleId::GoldenCross).unwrap().passed);
    assert!(!lasertec.outcome(RuleId::Valuation).unwrap().passed);

    let mercari = report.results.iter().find(|r| r.code() == "4385").unwrap();
    assert!(!mercari.outcome(RuleId::Valuation).unwrap().passed);
}

#[tokio::test]
async fn test_empty_history_is_reported_separately() {
    let source = InMemoryDataSource::new()
        .with_fundamentals("6920", healthy())
        .with_bars("7203", Interval::D1, rising_daily(30, 1600))
        .with_fundamentals("7203", healthy());
    let screener = screener(source);
    let tickers = vec![
        TickerInfo::new("6920", "レーザーテック"),
        TickerInfo::new("7203", "トヨタ自動車"),
    ];

    let report = screener.screen(&tickers, Interval::D1, "").await.unwrap();

    assert_eq!(report.results.len(), 1);
    let empty: Vec<_> = report.failures_of(FailureKind::EmptyData).collect();
    assert_eq!(empty.len(), 1);
    assert_eq!(empty[0].code, "6920");
    assert_eq!(report.failures_of(FailureKind::Fetch).count(), 0);
}

#[tokio::test]
async fn test_empty_history_evaluates_on_fundamentals() {
    let source = InMemoryDataSource::new().with_fundamentals("6920", healthy());
    let screener = screener(source);

    let evaluation = screener
        .evaluate(&TickerInfo::new("6920", "レーザーテック"), Interval::D1)
        .await
        .unwrap();

    assert!(evaluation.series.is_empty());
    assert_eq!(evaluation.trend, TrendLabel::Indeterminate);
    assert_eq!(evaluation.score.score(), 10);
    assert!(evaluation.score.outcome(RuleId::Valuation).unwrap().passed);
    assert!(evaluation.score.outcome(RuleId::Profitability).unwrap().passed);
    assert!(evaluation
        .score
        .outcome(RuleId::GoldenCross)
        .unwrap()
        .explanation
        .contains("データ不足"));
}

#[tokio::test]
async fn test_include_empty_scores_empty_history() {
    let source = InMemoryDataSource::new().with_fundamentals("6920", healthy());
    let mut config = AppConfig::default();
    config.screening.include_empty = true;
    let screener = Screener::new(Arc::new(source), &config).unwrap();

    let report = screener
        .screen(&[TickerInfo::new("6920", "レーザーテック")], Interval::D1, "")
        .await
        .unwrap();
    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results[0].score(), 10);
}

#[tokio::test]
async fn test_fetch_failure_skips_only_that_ticker() {
    let source = InMemoryDataSource::new()
        .with_bars("7203", Interval::D1, rising_daily(30, 1600))
        .with_fundamentals("7203", healthy())
        .with_bar_failure("6758", FetchError::Network("connection reset".into()));
    let screener = screener(source);
    let tickers = vec![
        TickerInfo::new("6758", "ソニーグループ"),
        TickerInfo::new("7203", "トヨタ自動車"),
    ];

    let report = screener.screen(&tickers, Interval::D1, "").await.unwrap();

    assert_eq!(report.results.len(), 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].code, "6758");
    assert_eq!(report.failures[0].kind, FailureKind::Fetch);
}

#[tokio::test]
async fn test_every_ticker_failing_is_source_unreachable() {
    let source = InMemoryDataSource::new()
        .with_bar_failure("6758", FetchError::Network("dns".into()))
        .with_bar_failure("7203", FetchError::Timeout("10s".into()));
    let screener = screener(source);
    let tickers = vec![
        TickerInfo::new("6758", "ソニーグループ"),
        TickerInfo::new("7203", "トヨタ自動車"),
    ];

    let err = screener.screen(&tickers, Interval::D1, "").await.unwrap_err();
    match err {
        ScreenerError::SourceUnreachable { failures } => {
            assert_eq!(failures.len(), 2);
            assert_eq!(failures[1].kind, FailureKind::Timeout);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_unknown_tickers_are_reported_not_unreachable() {
    // 픽스처가 없으므로 모든 종목이 NotFound
    let screener = screener(InMemoryDataSource::new());
    let tickers = vec![
        TickerInfo::new("0000", "存在しない銘柄"),
        TickerInfo::new("0001", "廃止銘柄"),
    ];

    let report = screener.screen(&tickers, Interval::D1, "").await.unwrap();

    assert_eq!(report.status, ReportStatus::NoResults);
    assert!(report.is_empty());
    assert_eq!(report.failures.len(), 2);
    assert_eq!(report.failures_of(FailureKind::NotFound).count(), 2);
    assert_eq!(report.failures[0].code, "0000");
    assert_eq!(report.failures[1].code, "0001");
}

#[tokio::test]
async fn test_unknown_and_unreachable_mix_returns_report() {
    let source = InMemoryDataSource::new()
        .with_bar_failure("6758", FetchError::Network("dns".into()))
        .with_bar_failure("4385", FetchError::Parse("unexpected body".into()));
    let screener = screener(source);
    let tickers = vec![
        TickerInfo::new("6758", "ソニーグループ"),
        TickerInfo::new("0000", "存在しない銘柄"),
        TickerInfo::new("4385", "メルカリ"),
    ];

    let report = screener.screen(&tickers, Interval::D1, "").await.unwrap();

    assert_eq!(report.status, ReportStatus::NoResults);
    let kinds: Vec<FailureKind> = report.failures.iter().map(|f| f.kind).collect();
    assert_eq!(
        kinds,
        vec![
            FailureKind::Fetch,
            FailureKind::NotFound,
            FailureKind::InvalidResponse
        ]
    );
}

#[test]
fn test_zero_fetch_timeout_is_rejected() {
    let mut config = AppConfig::default();
    config.screening.fetch_timeout_secs = 0;
    let result = Screener::new(Arc::new(InMemoryDataSource::demo()), &config);
    assert!(matches!(result, Err(ScreenerError::Config(_))));
}

#[tokio::test]
async fn test_empty_ticker_list() {
    let screener = screener(InMemoryDataSource::new());
    let report = screener.screen(&[], Interval::D1, "").await.unwrap();
    assert_eq!(report.status, ReportStatus::NoResults);
    assert!(report.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_slow_source_times_out() {
    let source = InMemoryDataSource::new()
        .with_bars("6758", Interval::D1, rising_daily(30, 1600))
        .with_fundamentals("6758", healthy())
        .with_delay("6758", Duration::from_secs(60))
        .with_bars("7203", Interval::D1, rising_daily(30, 1600))
        .with_fundamentals("7203", healthy());

    let mut config = AppConfig::default();
    config.screening.fetch_timeout_secs = 2;
    let screener = Screener::new(Arc::new(source), &config).unwrap();
    let tickers = vec![
        TickerInfo::new("6758", "ソニーグループ"),
        TickerInfo::new("7203", "トヨタ自動車"),
    ];

    let report = screener.screen(&tickers, Interval::D1, "").await.unwrap();

    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results[0].code(), "7203");
    let timeouts: Vec<_> = report.failures_of(FailureKind::Timeout).collect();
    assert_eq!(timeouts.len(), 1);
    assert_eq!(timeouts[0].code, "6758");
}

#[tokio::test]
async fn test_fundamentals_failure_still_scores() {
    let source = InMemoryDataSource::new()
        .with_bars("4385", Interval::D1, rising_daily(30, 1600))
        .with_fundamentals_failure("4385", FetchError::RateLimited("slow down".into()));
    let screener = screener(source);

    let report = screener
        .screen(&[TickerInfo::new("4385", "メルカリ")], Interval::D1, "")
        .await
        .unwrap();

    let result = &report.results[0];
    assert_eq!(result.score(), 15);
    assert_eq!(
        result.outcome(RuleId::Valuation).unwrap().explanation,
        "PER情報なし"
    );
    assert_eq!(
        result.outcome(RuleId::Profitability).unwrap().explanation,
        "EPS情報なし"
    );
}

#[tokio::test]
async fn test_four_hour_bars_are_synthesized_from_hourly() {
    // 20일 x 하루 8개 시간봉 (UTC 0~7시) → 하루 2개의 4시간봉
    let hourly: Vec<Bar> = (0..20)
        .flat_map(|day| {
            (0..8).map(move |hour| {
                let i = day * 8 + hour;
                let close = Decimal::from(1000 + i);
                Bar::new(
                    start() + ChronoDuration::days(day) + ChronoDuration::hours(hour),
                    close,
                    close + dec!(2),
                    close - dec!(2),
                    close,
                    100,
                )
            })
        })
        .collect();

    let source = InMemoryDataSource::new()
        .with_bars("6594", Interval::H1, hourly)
        .with_fundamentals("6594", healthy());
    let screener = screener(source);

    let evaluation = screener
        .evaluate(&TickerInfo::new("6594", "日本電産"), Interval::H4)
        .await
        .unwrap();

    assert_eq!(evaluation.series.interval, Interval::H4);
    assert_eq!(evaluation.series.len(), 40);
    assert!(evaluation.series.bars().iter().all(|b| b.volume == 400));
    assert_eq!(evaluation.trend, TrendLabel::Up);
    assert_eq!(evaluation.indicators.len(), 40);
}
