//! 출력 형식 및 렌더링.
//!
//! 스크리닝 결과, 종목 상세, 종목 목록을 table/csv/json 형식으로 만듭니다.

use std::fs::File;
use std::io::Write;
use std::str::FromStr;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use screener_analytics::{CrossKind, Evaluation};
use screener_core::{
    DecimalExt, IndicatorRow, ReportStatus, RuleId, ScoreResult, ScreeningReport, TickerInfo,
};

/// 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Csv,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => Err(anyhow::anyhow!(
                "Invalid format: {}. Use: table, csv, json",
                s
            )),
        }
    }
}

/// 파일 또는 stdout에 출력합니다.
pub fn write_output(content: &str, output_path: Option<&str>) -> Result<()> {
    if let Some(path) = output_path {
        let mut file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path))?;
        file.write_all(content.as_bytes())
            .context("Failed to write to file")?;
        info!("Output written to: {}", path);
    } else {
        println!("{}", content);
    }

    Ok(())
}

// =============================================================================
// 스크리닝 결과
// =============================================================================

/// 표 컬럼 표시 폭.
const NAME_WIDTH: usize = 24;
const TREND_WIDTH: usize = 8;
const RULE_WIDTH: usize = 12;

/// 스크리닝 리포트를 렌더링합니다.
pub fn render_report(report: &ScreeningReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(report_table(report)),
        OutputFormat::Csv => Ok(report_csv(&report.results)),
        OutputFormat::Json => {
            serde_json::to_string_pretty(report).context("Failed to serialize to JSON")
        }
    }
}

/// 종목 표시 문자열: "銘柄名（コード） - スコア：x / y".
pub fn headline(result: &ScoreResult) -> String {
    format!(
        "{}（{}） - スコア：{}",
        result.name(),
        result.code(),
        result.score_display()
    )
}

fn report_table(report: &ScreeningReport) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{:<5} {:<8} {} {:<9} {}",
        "RANK",
        "CODE",
        pad_display("NAME", NAME_WIDTH),
        "SCORE",
        pad_display("TREND", TREND_WIDTH)
    ));
    for rule in RuleId::ORDER {
        output.push_str(&format!(" {:<4}", rule_column(rule)));
    }
    output.push('\n');
    output.push_str(&"-".repeat(82));
    output.push('\n');

    for (rank, result) in report.results.iter().enumerate() {
        output.push_str(&format!(
            "{:<5} {:<8} {} {:<9} {}",
            rank + 1,
            result.code(),
            pad_display(&truncate(result.name(), NAME_WIDTH), NAME_WIDTH),
            result.score_display(),
            pad_display(result.trend().label(), TREND_WIDTH)
        ));
        for outcome in result.outcomes() {
            output.push_str(&format!(" {:<4}", outcome.mark()));
        }
        output.push('\n');
    }

    output.push('\n');
    match report.status {
        ReportStatus::Ranked => {
            output.push_str(&format!("Total: {} tickers ({})", report.results.len(), report.interval));
            if let Some(filter) = &report.filter {
                output.push_str(&format!(", filter: \"{}\"", filter));
            }
        }
        ReportStatus::NoMatch => output.push_str("一致する銘柄が見つかりませんでした。"),
        ReportStatus::NoResults => output.push_str("スコア対象の銘柄がありません。"),
    }

    if !report.failures.is_empty() {
        output.push_str("\n\n除外された銘柄：\n");
        for failure in &report.failures {
            output.push_str(&format!("  {}\n", failure));
        }
    }

    output
}

fn rule_column(rule: RuleId) -> &'static str {
    match rule {
        RuleId::GoldenCross => "MA",
        RuleId::VolumeSurge => "VOL",
        RuleId::Valuation => "PER",
        RuleId::Profitability => "EPS",
        RuleId::TrendLabel => "UP",
    }
}

fn report_csv(results: &[ScoreResult]) -> String {
    let mut output = String::new();

    output.push_str("code,name,score,max_score,trend");
    for rule in RuleId::ORDER {
        output.push_str(&format!(",{}", rule));
    }
    output.push_str(",per,eps\n");

    for result in results {
        output.push_str(&format!(
            "{},{},{},{},{}",
            result.code(),
            escape_csv(result.name()),
            result.score(),
            result.max_score(),
            result.trend()
        ));
        for outcome in result.outcomes() {
            output.push_str(&format!(",{}", outcome.passed));
        }
        output.push_str(&format!(
            ",{},{}\n",
            optional(result.fundamentals().per),
            optional(result.fundamentals().eps)
        ));
    }

    output
}

// =============================================================================
// 종목 상세
// =============================================================================

/// 종목 상세 JSON 구조.
#[derive(Debug, Serialize)]
struct EvaluationView<'a> {
    score: &'a ScoreResult,
    latest_cross: Option<&'a screener_analytics::CrossEvent>,
    rows: Vec<IndicatorRow>,
}

/// 종목 하나의 체크리스트와 최근 지표를 렌더링합니다.
pub fn render_evaluation(
    evaluation: &Evaluation,
    rows: usize,
    format: OutputFormat,
) -> Result<String> {
    let indicator_rows = evaluation.indicators.tail(rows);
    match format {
        OutputFormat::Json => {
            let view = EvaluationView {
                score: &evaluation.score,
                latest_cross: evaluation.latest_cross.as_ref(),
                rows: indicator_rows,
            };
            serde_json::to_string_pretty(&view).context("Failed to serialize to JSON")
        }
        OutputFormat::Csv => Ok(indicator_csv(evaluation, &indicator_rows)),
        OutputFormat::Table => Ok(evaluation_table(evaluation, &indicator_rows)),
    }
}

fn evaluation_table(evaluation: &Evaluation, rows: &[IndicatorRow]) -> String {
    let score = &evaluation.score;
    let mut output = String::new();

    output.push_str(&headline(score));
    output.push_str(&format!(
        "（{}、トレンド：{}）\n\n",
        evaluation.series.interval,
        score.trend().label()
    ));

    for outcome in score.outcomes() {
        output.push_str(&format!(
            " {} {} {}\n",
            outcome.mark(),
            pad_display(outcome.rule_id.label(), RULE_WIDTH),
            outcome.explanation
        ));
    }

    if let Some(cross) = &evaluation.latest_cross {
        let kind = match cross.kind {
            CrossKind::Golden => "ゴールデンクロス",
            CrossKind::Dead => "デッドクロス",
        };
        output.push_str(&format!(
            "\n直近のクロス：{}（{}）\n",
            kind,
            cross.timestamp.format("%Y-%m-%d %H:%M")
        ));
    }

    if rows.is_empty() {
        output.push_str("\n価格履歴がありません");
        return output;
    }

    output.push_str(&format!(
        "\n{:<17} {:>12} {:>12} {:>12} {:>14}\n",
        "TIMESTAMP", "CLOSE", "MA_SHORT", "MA_LONG", "VOLUME_AVG"
    ));
    output.push_str(&"-".repeat(71));
    output.push('\n');

    for (row, close) in rows.iter().zip(closes_for(evaluation, rows.len())) {
        output.push_str(&format!(
            "{:<17} {:>12} {:>12} {:>12} {:>14}\n",
            row.timestamp.format("%Y-%m-%d %H:%M"),
            close.round_display(2).to_string(),
            display_or_dash(row.ma_short, 2),
            display_or_dash(row.ma_long, 2),
            display_or_dash(row.volume_avg, 0)
        ));
    }

    output
}

fn indicator_csv(evaluation: &Evaluation, rows: &[IndicatorRow]) -> String {
    let mut output = String::from("timestamp,close,ma_short,ma_long,volume_avg\n");

    for (row, close) in rows.iter().zip(closes_for(evaluation, rows.len())) {
        output.push_str(&format!(
            "{},{},{},{},{}\n",
            row.timestamp.to_rfc3339(),
            close,
            optional(row.ma_short),
            optional(row.ma_long),
            optional(row.volume_avg)
        ));
    }

    output
}

/// 시리즈 마지막 `n`개 종가 (지표 행과 정렬).
fn closes_for(evaluation: &Evaluation, n: usize) -> Vec<Decimal> {
    let bars = evaluation.series.bars();
    bars[bars.len().saturating_sub(n)..]
        .iter()
        .map(|b| b.close)
        .collect()
}

// =============================================================================
// 종목 목록
// =============================================================================

/// 종목 목록을 렌더링합니다.
pub fn render_tickers(tickers: &[TickerInfo], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => {
            let mut output = String::new();
            output.push_str(&format!("{:<10} {}\n", "CODE", "NAME"));
            output.push_str(&"-".repeat(51));
            output.push('\n');
            for ticker in tickers {
                output.push_str(&format!(
                    "{:<10} {}\n",
                    ticker.code,
                    truncate(&ticker.name, 40)
                ));
            }
            output.push('\n');
            output.push_str(&format!("Total: {} tickers", tickers.len()));
            Ok(output)
        }
        OutputFormat::Csv => {
            let mut output = String::from("code,name\n");
            for ticker in tickers {
                output.push_str(&format!("{},{}\n", ticker.code, escape_csv(&ticker.name)));
            }
            Ok(output)
        }
        OutputFormat::Json => {
            serde_json::to_string_pretty(tickers).context("Failed to serialize to JSON")
        }
    }
}

// =============================================================================
// 헬퍼
// =============================================================================

fn optional(value: Option<Decimal>) -> String {
    value.map(|v| v.normalize().to_string()).unwrap_or_default()
}

fn display_or_dash(value: Option<Decimal>, dp: u32) -> String {
    value
        .map(|v| v.round_display(dp).to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// 표시 폭(전각 문자는 2칸) 기준으로 오른쪽을 공백으로 채웁니다.
fn pad_display(s: &str, width: usize) -> String {
    let padding = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(padding))
}

/// 표시 폭 기준으로 문자열을 자릅니다. 넘치면 "..."를 붙입니다.
fn truncate(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let budget = max_width.saturating_sub(3);
    let mut truncated = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        truncated.push(c);
        used += w;
    }
    format!("{}...", truncated)
}

/// CSV 이스케이프 (콤마나 따옴표 포함 시 따옴표로 감싸기).
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use screener_core::{Fundamentals, Interval, RuleOutcome, TrendLabel};

    fn sample_result() -> ScoreResult {
        let ticker = TickerInfo::new("6758", "ソニーグループ");
        let outcomes = [
            RuleOutcome::pass(RuleId::GoldenCross, 5, "ゴールデンクロス"),
            RuleOutcome::pass(RuleId::VolumeSurge, 5, "出来高急増"),
            RuleOutcome::pass(RuleId::Valuation, 5, "PER 12.3"),
            RuleOutcome::pass(RuleId::Profitability, 5, "黒字"),
            RuleOutcome::fail(RuleId::TrendLabel, "トレンド弱含み（横ばい）"),
        ];
        ScoreResult::new(
            &ticker,
            TrendLabel::Flat,
            outcomes,
            25,
            Fundamentals::absent().with_per(dec!(12.3)),
        )
    }

    fn sample_report(results: Vec<ScoreResult>) -> ScreeningReport {
        let status = ReportStatus::determine(results.len(), results.len());
        ScreeningReport {
            interval: Interval::D1,
            filter: None,
            status,
            results,
            failures: Vec::new(),
            generated_at: Utc::now(),
        }
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("TABLE".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_headline() {
        assert_eq!(headline(&sample_result()), "ソニーグループ（6758） - スコア：20 / 25");
    }

    #[test]
    fn test_report_table_marks() {
        let table = report_table(&sample_report(vec![sample_result()]));
        assert!(table.contains("20 / 25"));
        assert!(table.contains("◯"));
        assert!(table.contains("×"));
        assert!(table.contains("Total: 1 tickers"));

        let empty = report_table(&sample_report(Vec::new()));
        assert!(empty.contains("スコア対象の銘柄がありません。"));
    }

    #[test]
    fn test_report_csv() {
        let csv = report_csv(&[sample_result()]);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "code,name,score,max_score,trend,golden_cross,volume_surge,valuation,profitability,trend_label,per,eps"
        );
        assert_eq!(lines[1], "6758,ソニーグループ,20,25,flat,true,true,true,true,false,12.3,");
    }

    #[test]
    fn test_truncate_by_display_width() {
        assert_eq!(truncate("トヨタ自動車", 12), "トヨタ自動車");
        assert_eq!(truncate("トヨタ自動車", 10), "トヨタ...");
        assert_eq!(truncate("ソニーグループ株式会社", 10), "ソニー...");
        assert_eq!(truncate("Sony Group Corporation", 10), "Sony Gr...");
    }

    #[test]
    fn test_pad_display_counts_full_width() {
        assert_eq!(pad_display("メルカリ", 10), "メルカリ  ");
        assert_eq!(pad_display("Sony", 6), "Sony  ");
        assert_eq!(pad_display("レーザーテック株式会社", 4), "レーザーテック株式会社");
    }

    #[test]
    fn test_report_table_aligns_full_width_names() {
        let ascii = ScoreResult::new(
            &TickerInfo::new("SONY", "Sony Group"),
            TrendLabel::Up,
            sample_result().outcomes().clone(),
            25,
            Fundamentals::absent(),
        );
        let table = report_table(&sample_report(vec![sample_result(), ascii]));

        // 점수 컬럼이 시작하는 표시 위치가 모든 행에서 같아야 한다
        let offsets: Vec<usize> = table
            .lines()
            .filter(|line| line.contains(" / 25"))
            .map(|line| {
                let at = line.find("20 / 25").unwrap();
                line[..at].width()
            })
            .collect();
        assert_eq!(offsets.len(), 2);
        assert_eq!(offsets[0], offsets[1]);

        let header = table.lines().next().unwrap();
        assert_eq!(header[..header.find("SCORE").unwrap()].width(), offsets[0]);
    }

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("Sony, Inc."), "\"Sony, Inc.\"");
        assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_csv("メルカリ"), "メルカリ");
    }

    #[test]
    fn test_render_tickers() {
        let tickers = vec![TickerInfo::new("7203", "トヨタ自動車")];
        let csv = render_tickers(&tickers, OutputFormat::Csv).unwrap();
        assert_eq!(csv, "code,name\n7203,トヨタ自動車\n");

        let json = render_tickers(&tickers, OutputFormat::Json).unwrap();
        assert!(json.contains("\"code\": \"7203\""));
    }
}
