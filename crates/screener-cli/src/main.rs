//! 주식 스크리너 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 데모 데이터로 일봉 스크리닝
//! screener screen --demo
//!
//! # 종목 목록 CSV로 주봉 스크리닝, 이름 검색
//! screener screen -t data/tickers.csv -i 1w -q ソニー
//!
//! # 4시간봉 결과를 CSV 파일로 저장
//! screener screen -i 4h -f csv -o result.csv
//!
//! # 종목 하나의 체크리스트와 최근 지표
//! screener inspect 7203 -i 1d -r 10
//!
//! # 종목 목록 검색
//! screener list -s トヨタ
//! ```

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};

use screener_cli::commands::inspect::{run_inspect, InspectConfig};
use screener_cli::commands::list::{list_tickers, ListConfig};
use screener_cli::commands::screen::{run_screen, ScreenConfig};
use screener_cli::commands::{SourceOptions, DEFAULT_TICKERS_PATH};
use screener_cli::output::OutputFormat;
use screener_core::{init_logging, AppConfig, Period};

#[derive(Parser)]
#[command(name = "screener")]
#[command(about = "Stock screener CLI - 이동평균/거래량/PER 기반 종목 스크리닝", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일 (TOML)
    #[arg(short, long, global = true, default_value = "config/default.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 종목 목록 스크리닝 (점수 내림차순)
    Screen {
        /// 종목 목록 CSV 경로
        #[arg(short, long, default_value = DEFAULT_TICKERS_PATH)]
        tickers: String,

        /// 데모 데이터 사용 (네트워크 없음)
        #[arg(long, default_value = "false")]
        demo: bool,

        /// 봉 간격 (1h, 4h, 1d, 1w, 1mo)
        #[arg(short, long)]
        interval: Option<String>,

        /// 조회 기간 (5d, 1mo, 3mo, 6mo, 1y, 2y, 5y, max)
        #[arg(short, long)]
        period: Option<String>,

        /// 검색어 (종목명 또는 코드)
        #[arg(short = 'q', long)]
        filter: Option<String>,

        /// 출력 형식 (table, csv, json)
        #[arg(short, long, default_value = "table")]
        format: String,

        /// 출력 파일 경로 (지정하지 않으면 stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// 최대 결과 수 (0 = 무제한)
        #[arg(long, default_value = "0")]
        limit: usize,
    },

    /// 종목 하나의 체크리스트와 최근 지표
    Inspect {
        /// 종목 코드 (예: 7203)
        code: String,

        /// 종목 목록 CSV 경로 (종목명 조회용)
        #[arg(short, long, default_value = DEFAULT_TICKERS_PATH)]
        tickers: String,

        /// 데모 데이터 사용
        #[arg(long, default_value = "false")]
        demo: bool,

        /// 봉 간격 (1h, 4h, 1d, 1w, 1mo)
        #[arg(short, long)]
        interval: Option<String>,

        /// 출력할 최근 지표 행 수
        #[arg(short, long, default_value = "5")]
        rows: usize,

        /// 출력 형식 (table, csv, json)
        #[arg(short, long, default_value = "table")]
        format: String,

        /// 출력 파일 경로
        #[arg(short, long)]
        output: Option<String>,
    },

    /// 종목 목록 보기
    List {
        /// 종목 목록 CSV 경로
        #[arg(short, long, default_value = DEFAULT_TICKERS_PATH)]
        tickers: String,

        /// 데모 종목 목록 사용
        #[arg(long, default_value = "false")]
        demo: bool,

        /// 검색 키워드 (종목명 또는 코드)
        #[arg(short, long)]
        search: Option<String>,

        /// 출력 형식 (table, csv, json)
        #[arg(short, long, default_value = "table")]
        format: String,

        /// 출력 파일 경로
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let app = AppConfig::load(&cli.config)
        .with_context(|| format!("Failed to load configuration: {}", cli.config))?;

    init_logging(&app.logging).context("Failed to initialize logging")?;

    let result = run(cli.command, &app).await;
    if let Err(e) = &result {
        error!("Command failed: {:#}", e);
    }
    result
}

async fn run(command: Commands, app: &AppConfig) -> Result<()> {
    match command {
        Commands::Screen {
            tickers,
            demo,
            interval,
            period,
            filter,
            format,
            output,
            limit,
        } => {
            let period = period
                .map(|p| p.parse::<Period>().map_err(|e| anyhow!(e)))
                .transpose()?;

            let config = ScreenConfig {
                source: SourceOptions {
                    tickers_path: tickers,
                    demo,
                },
                interval,
                period,
                filter,
                format: format.parse::<OutputFormat>()?,
                output,
                limit,
            };

            let shown = run_screen(config, app).await?;
            info!("✅ Screened {} tickers", shown);
        }

        Commands::Inspect {
            code,
            tickers,
            demo,
            interval,
            rows,
            format,
            output,
        } => {
            let config = InspectConfig {
                source: SourceOptions {
                    tickers_path: tickers,
                    demo,
                },
                code,
                interval,
                rows,
                format: format.parse::<OutputFormat>()?,
                output,
            };

            let score = run_inspect(config, app).await?;
            info!("✅ Inspection finished (score {})", score);
        }

        Commands::List {
            tickers,
            demo,
            search,
            format,
            output,
        } => {
            let config = ListConfig {
                source: SourceOptions {
                    tickers_path: tickers,
                    demo,
                },
                search,
                format: format.parse::<OutputFormat>()?,
                output,
            };

            let count = list_tickers(config)?;
            info!("✅ Listed {} tickers", count);
        }
    }

    Ok(())
}
