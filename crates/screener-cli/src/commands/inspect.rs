//! 종목 하나의 상세 평가.

use anyhow::{Context, Result};
use tracing::{info, warn};

use screener_analytics::Screener;
use screener_core::{AppConfig, TickerInfo};

use super::{resolve_interval, SourceOptions};
use crate::output::{render_evaluation, write_output, OutputFormat};

/// 상세 평가 명령 설정.
#[derive(Debug)]
pub struct InspectConfig {
    pub source: SourceOptions,
    /// 종목 코드
    pub code: String,
    /// 봉 간격 (없으면 설정 기본값)
    pub interval: Option<String>,
    /// 출력할 최근 지표 행 수
    pub rows: usize,
    /// 출력 형식
    pub format: OutputFormat,
    /// 출력 파일 경로
    pub output: Option<String>,
}

/// 종목을 평가하고 체크리스트와 최근 지표를 출력합니다. 점수를 반환합니다.
pub async fn run_inspect(config: InspectConfig, app: &AppConfig) -> Result<u32> {
    let interval = resolve_interval(config.interval.as_deref(), app)?;
    let ticker = find_ticker(&config.source, &config.code);
    let source = config.source.data_source(app)?;
    let screener = Screener::new(source, app).context("Invalid screening configuration")?;

    info!(code = %ticker.code, interval = %interval, "Inspecting ticker");

    let evaluation = screener
        .evaluate(&ticker, interval)
        .await
        .map_err(|failure| anyhow::anyhow!("評価に失敗しました：{}", failure))?;

    let content = render_evaluation(&evaluation, config.rows, config.format)?;
    write_output(&content, config.output.as_deref())?;

    Ok(evaluation.score.score())
}

/// 종목 목록에서 이름을 찾습니다. 목록에 없으면 코드를 이름으로 사용합니다.
fn find_ticker(source: &SourceOptions, code: &str) -> TickerInfo {
    let code = code.trim();
    match source.tickers() {
        Ok(tickers) => tickers
            .into_iter()
            .find(|t| t.code == code)
            .unwrap_or_else(|| TickerInfo::new(code, code)),
        Err(e) => {
            warn!(error = %e, "Ticker list unavailable, using code as name");
            TickerInfo::new(code, code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_options() -> SourceOptions {
        SourceOptions {
            tickers_path: String::new(),
            demo: true,
        }
    }

    #[test]
    fn test_find_ticker() {
        let sony = find_ticker(&demo_options(), " 6758 ");
        assert_eq!(sony.name, "ソニーグループ");

        let unknown = find_ticker(&demo_options(), "9999");
        assert_eq!(unknown.name, "9999");
    }

    #[tokio::test]
    async fn test_inspect_demo_ticker() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inspect.txt");
        let config = InspectConfig {
            source: demo_options(),
            code: "6758".to_string(),
            interval: Some("1d".to_string()),
            rows: 3,
            format: OutputFormat::Table,
            output: Some(path.display().to_string()),
        };

        let score = run_inspect(config, &AppConfig::default()).await.unwrap();
        assert_eq!(score, 25);

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("ソニーグループ（6758） - スコア：25 / 25"));
        assert!(content.contains("MAクロス"));
        assert!(content.contains("MA_SHORT"));
    }

    #[tokio::test]
    async fn test_inspect_unknown_ticker_fails() {
        let config = InspectConfig {
            source: demo_options(),
            code: "9999".to_string(),
            interval: None,
            rows: 3,
            format: OutputFormat::Json,
            output: None,
        };
        assert!(run_inspect(config, &AppConfig::default()).await.is_err());
    }
}
