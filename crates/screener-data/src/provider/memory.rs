//! 인메모리 데이터 소스.
//!
//! 미리 적재한 봉과 펀더멘털을 반환하는 [`MarketDataSource`] 구현입니다.
//! 테스트와 CLI 데모 모드에서 사용하며, 종목별로 조회 실패나 응답 지연을
//! 주입할 수 있습니다.
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! let source = InMemoryDataSource::new()
//!     .with_bars("7203", Interval::D1, bars)
//!     .with_fundamentals("7203", Fundamentals::absent().with_per(dec!(9.1)))
//!     .with_bar_failure("6758", FetchError::Network("connection reset".into()));
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Duration as ChronoDuration, NaiveDate, TimeZone, Utc, Weekday};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use screener_core::{Bar, FetchError, Fundamentals, Interval, MarketDataSource, Period, TickerInfo};

/// 인메모리 데이터 소스.
#[derive(Debug, Default)]
pub struct InMemoryDataSource {
    /// 종목 코드 및 간격별 봉 (시간순)
    bars: HashMap<(String, Interval), Vec<Bar>>,
    /// 종목별 펀더멘털
    fundamentals: HashMap<String, Fundamentals>,
    /// 가격 이력 조회 시 반환할 에러
    bar_failures: HashMap<String, FetchError>,
    /// 펀더멘털 조회 시 반환할 에러
    fundamental_failures: HashMap<String, FetchError>,
    /// 종목별 응답 지연
    delays: HashMap<String, Duration>,
    /// 가격 이력 조회 횟수
    bar_calls: AtomicUsize,
}

impl InMemoryDataSource {
    /// 빈 데이터 소스를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 종목의 봉 데이터를 적재합니다. 기존 데이터는 교체됩니다.
    pub fn with_bars(mut self, code: &str, interval: Interval, mut bars: Vec<Bar>) -> Self {
        bars.sort_by_key(|b| b.open_time);
        self.bars.insert((code.to_string(), interval), bars);
        self
    }

    /// 종목의 펀더멘털을 적재합니다.
    pub fn with_fundamentals(mut self, code: &str, fundamentals: Fundamentals) -> Self {
        self.fundamentals.insert(code.to_string(), fundamentals);
        self
    }

    /// 가격 이력 조회가 실패하도록 설정합니다.
    pub fn with_bar_failure(mut self, code: &str, error: FetchError) -> Self {
        self.bar_failures.insert(code.to_string(), error);
        self
    }

    /// 펀더멘털 조회가 실패하도록 설정합니다.
    pub fn with_fundamentals_failure(mut self, code: &str, error: FetchError) -> Self {
        self.fundamental_failures.insert(code.to_string(), error);
        self
    }

    /// 종목 조회에 지연을 추가합니다.
    pub fn with_delay(mut self, code: &str, delay: Duration) -> Self {
        self.delays.insert(code.to_string(), delay);
        self
    }

    /// 지금까지의 가격 이력 조회 횟수.
    pub fn bar_calls(&self) -> usize {
        self.bar_calls.load(Ordering::SeqCst)
    }

    /// 적재된 종목 코드인지 확인합니다.
    fn knows(&self, code: &str) -> bool {
        self.fundamentals.contains_key(code) || self.bars.keys().any(|(c, _)| c == code)
    }

    async fn simulate_latency(&self, code: &str) {
        if let Some(delay) = self.delays.get(code) {
            tokio::time::sleep(*delay).await;
        }
    }
}

#[async_trait]
impl MarketDataSource for InMemoryDataSource {
    async fn get_bars(
        &self,
        code: &str,
        period: Period,
        interval: Interval,
    ) -> Result<Vec<Bar>, FetchError> {
        self.bar_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency(code).await;

        if let Some(error) = self.bar_failures.get(code) {
            return Err(error.clone());
        }
        if !self.knows(code) {
            return Err(FetchError::NotFound(code.to_string()));
        }

        let bars = match self.bars.get(&(code.to_string(), interval)) {
            Some(bars) => bars,
            None => return Ok(Vec::new()),
        };

        let selected = within_period(bars, period);
        debug!(code = code, interval = %interval, bars = selected.len(), "In-memory bars served");
        Ok(selected)
    }

    async fn get_fundamentals(&self, code: &str) -> Result<Fundamentals, FetchError> {
        self.simulate_latency(code).await;

        if let Some(error) = self.fundamental_failures.get(code) {
            return Err(error.clone());
        }
        if !self.knows(code) {
            return Err(FetchError::NotFound(code.to_string()));
        }

        Ok(self.fundamentals.get(code).cloned().unwrap_or_default())
    }

    fn source_name(&self) -> &str {
        "in_memory"
    }
}

/// 마지막 봉 기준으로 기간 안의 봉만 남깁니다.
fn within_period(bars: &[Bar], period: Period) -> Vec<Bar> {
    let (Some(last), Some(days)) = (bars.last(), period.approx_days()) else {
        return bars.to_vec();
    };

    let cutoff = last.open_time - ChronoDuration::days(i64::from(days));
    bars.iter()
        .filter(|b| b.open_time > cutoff)
        .cloned()
        .collect()
}

// =============================================================================
// 데모 데이터
// =============================================================================

/// 데모 종목 하나의 시세 성격.
struct DemoProfile {
    code: &'static str,
    name: &'static str,
    base_price: Decimal,
    /// 봉 하나당 추세 (bp)
    drift_bp: i64,
    base_volume: u64,
    /// 마지막 봉 거래량 (기준 대비 %)
    last_volume_pct: u64,
    per: Decimal,
    eps: Decimal,
}

const DEMO_HOURS_UTC: [u32; 6] = [0, 1, 2, 3, 4, 5];

fn demo_profiles() -> [DemoProfile; 5] {
    [
        DemoProfile {
            code: "6758",
            name: "ソニーグループ",
            base_price: dec!(11000),
            drift_bp: 8,
            base_volume: 4_000_000,
            last_volume_pct: 180,
            per: dec!(12.3),
            eps: dec!(780.5),
        },
        DemoProfile {
            code: "4385",
            name: "メルカリ",
            base_price: dec!(2400),
            drift_bp: 6,
            base_volume: 2_500_000,
            last_volume_pct: 130,
            per: dec!(105.2),
            eps: dec!(16.9),
        },
        DemoProfile {
            code: "6594",
            name: "日本電産",
            base_price: dec!(5600),
            drift_bp: 10,
            base_volume: 3_000_000,
            last_volume_pct: 220,
            per: dec!(11.2),
            eps: dec!(77.6),
        },
        DemoProfile {
            code: "6920",
            name: "レーザーテック",
            base_price: dec!(36000),
            drift_bp: -6,
            base_volume: 1_500_000,
            last_volume_pct: 90,
            per: dec!(45.5),
            eps: dec!(463.2),
        },
        DemoProfile {
            code: "7203",
            name: "トヨタ自動車",
            base_price: dec!(3000),
            drift_bp: 3,
            base_volume: 20_000_000,
            last_volume_pct: 95,
            per: dec!(9.1),
            eps: dec!(359.6),
        },
    ]
}

impl InMemoryDataSource {
    /// 데모용 5개 종목을 적재한 데이터 소스.
    ///
    /// 모든 원본 간격(1h, 1d, 1w, 1mo)의 봉이 결정적으로 생성됩니다.
    pub fn demo() -> Self {
        let mut source = Self::new();
        for profile in demo_profiles() {
            for interval in [Interval::H1, Interval::D1, Interval::W1, Interval::MN1] {
                let bars = demo_bars(&profile, &demo_timestamps(interval));
                source = source.with_bars(profile.code, interval, bars);
            }
            source = source.with_fundamentals(
                profile.code,
                Fundamentals::absent()
                    .with_per(profile.per)
                    .with_eps(profile.eps),
            );
        }
        source
    }

    /// 데모 종목 목록.
    pub fn demo_tickers() -> Vec<TickerInfo> {
        demo_profiles()
            .iter()
            .map(|p| TickerInfo::new(p.code, p.name))
            .collect()
    }
}

/// 데모 데이터의 마지막 거래일 (UTC 자정).
fn demo_anchor() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 28).unwrap_or_default()
}

fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// 기준일부터 과거로 거슬러 가는 평일.
fn trading_days_back(anchor: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    (0i64..)
        .map(move |n| anchor - ChronoDuration::days(n))
        .filter(|d| is_weekday(*d))
}

/// 간격별 데모 타임스탬프 (오래된 것부터).
fn demo_timestamps(interval: Interval) -> Vec<DateTime<Utc>> {
    let anchor = demo_anchor();
    let at = |date: NaiveDate, hour: u32| {
        date.and_hms_opt(hour, 0, 0)
            .map(|naive| Utc.from_utc_datetime(&naive))
    };

    let mut stamps: Vec<DateTime<Utc>> = match interval {
        Interval::H1 | Interval::H4 => trading_days_back(anchor)
            .take(60)
            .flat_map(|d| DEMO_HOURS_UTC.iter().rev().filter_map(move |h| at(d, *h)))
            .collect(),
        Interval::D1 => trading_days_back(anchor)
            .take(250)
            .filter_map(|d| at(d, 0))
            .collect(),
        Interval::W1 => {
            let monday = anchor - ChronoDuration::days(i64::from(anchor.weekday().num_days_from_monday()));
            (0..260)
                .filter_map(|w| at(monday - ChronoDuration::weeks(w), 0))
                .collect()
        }
        Interval::MN1 => (0..120)
            .filter_map(|m| {
                let months = anchor.year() * 12 + anchor.month0() as i32 - m;
                NaiveDate::from_ymd_opt(months.div_euclid(12), months.rem_euclid(12) as u32 + 1, 1)
            })
            .filter_map(|d| at(d, 0))
            .collect(),
    };

    stamps.reverse();
    stamps
}

/// 추세와 소폭의 진동을 가진 결정적 봉을 생성합니다.
fn demo_bars(profile: &DemoProfile, stamps: &[DateTime<Utc>]) -> Vec<Bar> {
    const WIGGLE_PERMILLE: [i64; 4] = [0, 3, -2, 1];
    let base = profile.base_price;
    let spread = (base * dec!(0.005)).round_dp(1);

    let mut previous_close: Option<Decimal> = None;
    stamps
        .iter()
        .enumerate()
        .map(|(i, stamp)| {
            let step = Decimal::from(i as i64);
            let drift = base * Decimal::from(profile.drift_bp) * step / dec!(10000);
            let wiggle = base * Decimal::from(WIGGLE_PERMILLE[i % 4]) / dec!(1000);
            let close = (base + drift + wiggle).round_dp(1);
            let open = previous_close.unwrap_or(close);
            previous_close = Some(close);

            let volume = if i + 1 == stamps.len() {
                profile.base_volume * profile.last_volume_pct / 100
            } else {
                profile.base_volume + (i as u64 % 3) * profile.base_volume / 50
            };

            Bar::new(
                *stamp,
                open,
                open.max(close) + spread,
                open.min(close) - spread,
                close,
                volume,
            )
        })
        .collect()
}
