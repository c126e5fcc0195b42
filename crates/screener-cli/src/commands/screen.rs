//! 종목 목록 스크리닝.

use anyhow::{Context, Result};
use tracing::{info, warn};

use screener_analytics::Screener;
use screener_core::{AppConfig, Period, ScreenerError};

use super::{resolve_interval, SourceOptions};
use crate::output::{render_report, write_output, OutputFormat};

/// 스크리닝 명령 설정.
#[derive(Debug)]
pub struct ScreenConfig {
    pub source: SourceOptions,
    /// 봉 간격 (없으면 설정 기본값)
    pub interval: Option<String>,
    /// 조회 기간 오버라이드
    pub period: Option<Period>,
    /// 검색어
    pub filter: Option<String>,
    /// 출력 형식
    pub format: OutputFormat,
    /// 출력 파일 경로
    pub output: Option<String>,
    /// 최대 결과 수 (0 = 무제한)
    pub limit: usize,
}

/// 스크리닝을 실행하고 결과를 출력합니다. 출력한 종목 수를 반환합니다.
pub async fn run_screen(config: ScreenConfig, app: &AppConfig) -> Result<usize> {
    let mut app = app.clone();
    if config.period.is_some() {
        app.screening.period = config.period;
    }

    let interval = resolve_interval(config.interval.as_deref(), &app)?;
    let tickers = config.source.tickers()?;
    let source = config.source.data_source(&app)?;
    let screener = Screener::new(source, &app).context("Invalid screening configuration")?;

    info!(tickers = tickers.len(), interval = %interval, "Screening tickers");

    let filter = config.filter.as_deref().unwrap_or("");
    let (mut report, stats) = match screener.screen_with_stats(&tickers, interval, filter).await {
        Ok(result) => result,
        Err(ScreenerError::SourceUnreachable { failures }) => {
            for failure in &failures {
                warn!("{}", failure);
            }
            anyhow::bail!(
                "データソースに接続できません（{}銘柄すべて取得失敗）",
                failures.len()
            );
        }
        Err(e) => return Err(e.into()),
    };

    if config.limit > 0 {
        report.results.truncate(config.limit);
    }

    let content = render_report(&report, config.format)?;
    write_output(&content, config.output.as_deref())?;

    info!(
        scored = stats.scored,
        failed = stats.failed,
        empty = stats.empty,
        shown = report.results.len(),
        "Screening finished"
    );

    Ok(report.results.len())
}
