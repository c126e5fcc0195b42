//! 스크리닝 오케스트레이터.
//!
//! 종목 목록을 순회하며 가격 이력과 펀더멘털을 조회하고, 시리즈 준비 →
//! 추세 분류 → 스코어링을 거쳐 점수 순으로 정렬된 리포트를 만듭니다.
//!
//! # 실패 처리
//!
//! - 가격 조회 실패/시간 초과/알 수 없는 종목: 해당 종목만 제외하고 `TickerFailure`로 기록
//! - 빈 데이터: `FailureKind::EmptyData`로 기록 (조회 실패와 구분)
//! - 펀더멘털 조회 실패: 경고 로그 후 모든 값 누락으로 간주하고 계속 진행
//! - 모든 종목이 소스 접근 실패(네트워크/요청 한도/시간 초과): `ScreenerError::SourceUnreachable`
//!
//! # 사용 예시
//!
//! ```ignore
//! let screener = Screener::new(source, &AppConfig::default())?;
//! let report = screener.screen(&tickers, Interval::D1, "").await?;
//! for result in &report.results {
//!     println!("{} {}", result.name(), result.score_display());
//! }
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use tracing::{debug, info, warn, Instrument};

use screener_core::{
    screening_span, AppConfig, Bar, FailureKind, Fundamentals, IndicatorSet, Interval,
    MarketDataSource, Period, ReportStatus, ScoreResult, ScreenerError, ScreenerResult,
    ScreeningConfig, ScreeningReport, Series, TickerFailure, TickerInfo, TrendLabel,
};

use crate::indicators::{CrossEvent, IndicatorEngine};
use crate::preparator::SeriesPreparator;
use crate::scorer::Scorer;
use crate::trend_classifier::TrendClassifier;

// =============================================================================
// 평가 결과
// =============================================================================

/// 종목 하나의 상세 평가 결과 (차트/상세 화면용).
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub ticker: TickerInfo,
    pub series: Series,
    pub indicators: IndicatorSet,
    pub trend: TrendLabel,
    pub score: ScoreResult,
    /// 가장 최근의 이동평균 교차
    pub latest_cross: Option<CrossEvent>,
}

// =============================================================================
// 통계
// =============================================================================

/// 스크리닝 배치 통계.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScreeningStats {
    /// 전체 종목 수
    pub total: usize,
    /// 스코어링된 종목 수
    pub scored: usize,
    /// 조회 실패 (시간 초과 포함)
    pub failed: usize,
    /// 빈 데이터
    pub empty: usize,
    /// 필터 후 남은 종목 수
    pub matched: usize,
    /// 소요 시간
    #[serde(skip)]
    pub elapsed: Duration,
}

impl ScreeningStats {
    /// 새 통계 객체 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 성공률 계산 (%)
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.scored as f64 / self.total as f64) * 100.0
        }
    }

    /// 통계 요약 로그 출력
    pub fn log_summary(&self, operation: &str) {
        info!(
            operation = operation,
            total = self.total,
            scored = self.scored,
            failed = self.failed,
            empty = self.empty,
            matched = self.matched,
            success_rate = format!("{:.1}%", self.success_rate()),
            elapsed = format!("{:.1}s", self.elapsed.as_secs_f64()),
            "스크리닝 완료"
        );
    }
}

// =============================================================================
// 오케스트레이터
// =============================================================================

/// 스크리닝 오케스트레이터.
pub struct Screener {
    source: Arc<dyn MarketDataSource>,
    preparator: SeriesPreparator,
    classifier: TrendClassifier,
    scorer: Scorer,
    engine: IndicatorEngine,
    config: ScreeningConfig,
}

impl Screener {
    /// 데이터 소스와 설정으로 새 오케스트레이터를 생성합니다.
    ///
    /// # 에러
    ///
    /// 설정이 유효하지 않으면 `ScreenerError::Config`.
    pub fn new(source: Arc<dyn MarketDataSource>, config: &AppConfig) -> ScreenerResult<Self> {
        config.validate()?;
        Ok(Self {
            source,
            preparator: SeriesPreparator::new(config.indicators)?,
            classifier: TrendClassifier::new(config.scoring.trend_rule),
            scorer: Scorer::new(config.scoring.clone())?,
            engine: IndicatorEngine::new(),
            config: config.screening.clone(),
        })
    }

    /// 스크리닝 실행 설정.
    pub fn config(&self) -> &ScreeningConfig {
        &self.config
    }

    /// 최대 점수.
    pub fn max_score(&self) -> u32 {
        self.scorer.max_score()
    }

    /// 종목 목록을 스크리닝합니다.
    ///
    /// # 인자
    /// * `tickers` - 대상 종목 (입력 순서가 동점 정렬 기준)
    /// * `interval` - 봉 간격
    /// * `filter_text` - 검색어 (공백이면 필터 없음)
    pub async fn screen(
        &self,
        tickers: &[TickerInfo],
        interval: Interval,
        filter_text: &str,
    ) -> ScreenerResult<ScreeningReport> {
        self.screen_with_stats(tickers, interval, filter_text)
            .await
            .map(|(report, _)| report)
    }

    /// 스크리닝을 실행하고 배치 통계도 함께 반환합니다.
    pub async fn screen_with_stats(
        &self,
        tickers: &[TickerInfo],
        interval: Interval,
        filter_text: &str,
    ) -> ScreenerResult<(ScreeningReport, ScreeningStats)> {
        let started = Instant::now();
        let period = self.config.period_for(interval);
        let concurrency = self.config.max_concurrency.max(1);

        info!(
            source = self.source.source_name(),
            tickers = tickers.len(),
            interval = %interval,
            period = %period,
            concurrency = concurrency,
            "Screening started"
        );

        let outcomes: Vec<Result<Evaluation, TickerFailure>> = stream::iter(tickers)
            .map(|ticker| self.evaluate_with_period(ticker, interval, period))
            .buffered(concurrency)
            .collect()
            .await;

        let mut stats = ScreeningStats {
            total: tickers.len(),
            ..ScreeningStats::new()
        };
        let mut scored: Vec<ScoreResult> = Vec::new();
        let mut failures: Vec<TickerFailure> = Vec::new();

        for outcome in outcomes {
            match outcome {
                Ok(evaluation) if evaluation.series.is_empty() && !self.config.include_empty => {
                    stats.empty += 1;
                    failures.push(TickerFailure::new(
                        &evaluation.ticker.code,
                        &evaluation.ticker.name,
                        FailureKind::EmptyData,
                        format!("no bars for {} / {}", interval, period),
                    ));
                }
                Ok(evaluation) => {
                    stats.scored += 1;
                    scored.push(evaluation.score);
                }
                Err(failure) => {
                    stats.failed += 1;
                    failures.push(failure);
                }
            }
        }

        if !tickers.is_empty()
            && failures.len() == tickers.len()
            && failures.iter().all(|f| f.kind.is_source_failure())
        {
            warn!(
                source = self.source.source_name(),
                failures = failures.len(),
                "Data source unreachable for every ticker"
            );
            return Err(ScreenerError::SourceUnreachable { failures });
        }

        // 점수 내림차순 (안정 정렬: 동점은 입력 순서 유지)
        scored.sort_by(|a, b| b.score().cmp(&a.score()));

        let filter = normalize_filter(filter_text);
        let scored_count = scored.len();
        let results: Vec<ScoreResult> = match &filter {
            Some(query) => scored
                .into_iter()
                .filter(|r| matches_filter(r, query))
                .collect(),
            None => scored,
        };

        stats.matched = results.len();
        stats.elapsed = started.elapsed();
        stats.log_summary("screen");

        let report = ScreeningReport {
            interval,
            filter,
            status: ReportStatus::determine(scored_count, results.len()),
            results,
            failures,
            generated_at: Utc::now(),
        };

        Ok((report, stats))
    }

    /// 종목 하나를 평가합니다.
    ///
    /// 빈 데이터도 실패가 아니며, 이력 없이 펀더멘털만으로 채점된 결과를 반환합니다.
    pub async fn evaluate(
        &self,
        ticker: &TickerInfo,
        interval: Interval,
    ) -> Result<Evaluation, TickerFailure> {
        let period = self.config.period_for(interval);
        self.evaluate_with_period(ticker, interval, period).await
    }

    async fn evaluate_with_period(
        &self,
        ticker: &TickerInfo,
        interval: Interval,
        period: Period,
    ) -> Result<Evaluation, TickerFailure> {
        let span = screening_span!("evaluate", ticker.code, interval, self.source.source_name());
        self.run_pipeline(ticker, interval, period)
            .instrument(span)
            .await
    }

    /// 조회 → 준비 → 분류 → 채점.
    async fn run_pipeline(
        &self,
        ticker: &TickerInfo,
        interval: Interval,
        period: Period,
    ) -> Result<Evaluation, TickerFailure> {
        let raw_bars = self.fetch_bars(ticker, interval, period).await?;
        let fundamentals = self.fetch_fundamentals(ticker).await;

        let series = self.preparator.prepare(raw_bars, &ticker.code, interval);
        let indicators = self.preparator.indicators(&series);
        let trend = self
            .classifier
            .classify(&indicators.ma_short, &indicators.ma_long);
        let score = self.scorer.score(ticker, &indicators, &fundamentals, trend);
        let latest_cross = self.engine.latest_cross(
            &indicators.timestamps,
            &indicators.ma_short,
            &indicators.ma_long,
        );

        debug!(
            bars = series.len(),
            trend = %trend,
            score = score.score(),
            "Ticker evaluated"
        );

        Ok(Evaluation {
            ticker: ticker.clone(),
            series,
            indicators,
            trend,
            score,
            latest_cross,
        })
    }

    async fn fetch_bars(
        &self,
        ticker: &TickerInfo,
        interval: Interval,
        period: Period,
    ) -> Result<Vec<Bar>, TickerFailure> {
        let fetch_timeout = self.config.fetch_timeout();
        let request = self
            .source
            .get_bars(&ticker.code, period, interval.source_interval());

        match timeout(fetch_timeout, request).await {
            Ok(Ok(bars)) => Ok(bars),
            Ok(Err(e)) => {
                warn!(error = %e, unreachable = e.is_unreachable(), "Price history fetch failed");
                Err(TickerFailure::new(
                    &ticker.code,
                    &ticker.name,
                    FailureKind::from(&e),
                    e.to_string(),
                ))
            }
            Err(_) => {
                warn!(timeout_secs = fetch_timeout.as_secs(), "Price history fetch timed out");
                Err(TickerFailure::new(
                    &ticker.code,
                    &ticker.name,
                    FailureKind::Timeout,
                    format!("no response within {}s", fetch_timeout.as_secs()),
                ))
            }
        }
    }

    async fn fetch_fundamentals(&self, ticker: &TickerInfo) -> Fundamentals {
        let fetch_timeout = self.config.fetch_timeout();
        match timeout(fetch_timeout, self.source.get_fundamentals(&ticker.code)).await {
            Ok(Ok(fundamentals)) => fundamentals,
            Ok(Err(e)) => {
                warn!(error = %e, "Fundamentals unavailable, scoring without them");
                Fundamentals::absent()
            }
            Err(_) => {
                warn!(
                    timeout_secs = fetch_timeout.as_secs(),
                    "Fundamentals fetch timed out, scoring without them"
                );
                Fundamentals::absent()
            }
        }
    }
}

/// 검색어를 정규화합니다. 공백뿐이면 None.
fn normalize_filter(filter_text: &str) -> Option<String> {
    let trimmed = filter_text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// 종목명(대소문자 무시) 또는 코드에 검색어가 포함되는지 확인합니다.
fn matches_filter(result: &ScoreResult, query: &str) -> bool {
    TickerInfo::new(result.code(), result.name()).matches(query)
}
