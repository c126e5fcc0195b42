//! tracing 기반 로깅 초기화.
//!
//! `[logging]` 설정 섹션으로 구독자를 구성합니다. `RUST_LOG`가 설정되어 있으면
//! 설정 파일의 레벨보다 우선합니다.
//!
//! ```toml
//! [logging]
//! level = "info,screener_analytics=debug"
//! format = "compact"   # pretty, json, compact
//! span_timing = true   # 종목별 평가 소요 시간 출력
//! ```

use serde::{Deserialize, Serialize};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

use crate::error::{ScreenerError, ScreenerResult};

/// 로그 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// 사람이 읽기 쉬운 여러 줄 형식
    #[default]
    Pretty,
    /// 로그 수집용 JSON
    Json,
    /// 한 줄 형식
    Compact,
}

/// 로깅 설정 (`[logging]` 섹션).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 레벨 필터 (예: "info", "warn,screener_data=debug")
    pub level: String,
    /// 출력 형식
    pub format: LogFormat,
    /// 종목 평가 span이 닫힐 때 소요 시간을 남길지 여부
    pub span_timing: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            span_timing: false,
        }
    }
}

/// 설정으로 전역 구독자를 초기화합니다.
///
/// # 에러
///
/// 필터 문법이 잘못되었거나 구독자가 이미 설치되어 있으면 `ScreenerError::Config`.
pub fn init_logging(config: &LoggingConfig) -> ScreenerResult<()> {
    let filter = build_filter(&config.level, std::env::var(EnvFilter::DEFAULT_ENV).ok())?;

    let span_events = if config.span_timing {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };
    let base = fmt::layer().with_target(true).with_span_events(span_events);
    let fmt_layer = match config.format {
        LogFormat::Pretty => base.pretty().boxed(),
        LogFormat::Json => base.json().boxed(),
        LogFormat::Compact => base.compact().boxed(),
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(filter)
        .try_init()
        .map_err(|e| ScreenerError::Config(format!("logging already initialized: {}", e)))?;

    tracing::debug!(format = ?config.format, level = %config.level, "Logging initialized");
    Ok(())
}

/// 레벨 필터를 만듭니다. 환경 변수 값이 있으면 그쪽을 사용합니다.
fn build_filter(level: &str, env_override: Option<String>) -> ScreenerResult<EnvFilter> {
    let directives = env_override
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| level.to_string());

    EnvFilter::try_new(&directives).map_err(|e| {
        ScreenerError::Config(format!("invalid log filter '{}': {}", directives, e))
    })
}

/// 종목 평가 span을 만드는 매크로. 종목 코드와 간격, 데이터 소스 이름을 필드로 남깁니다.
///
/// ```ignore
/// let span = screening_span!("evaluate", ticker.code, interval, source.source_name());
/// pipeline.instrument(span).await
/// ```
#[macro_export]
macro_rules! screening_span {
    ($name:expr, $code:expr, $interval:expr, $source:expr) => {
        tracing::info_span!(
            $name,
            code = %$code,
            interval = %$interval,
            source = %$source
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_section_deserialize() {
        let config: LoggingConfig =
            serde_json::from_str(r#"{"level":"debug","format":"json","span_timing":true}"#)
                .unwrap();
        assert_eq!(config.format, LogFormat::Json);
        assert!(config.span_timing);

        let partial: LoggingConfig = serde_json::from_str(r#"{"format":"compact"}"#).unwrap();
        assert_eq!(partial.level, "info");
        assert_eq!(partial.format, LogFormat::Compact);

        assert!(serde_json::from_str::<LoggingConfig>(r#"{"format":"xml"}"#).is_err());
    }

    #[test]
    fn test_filter_prefers_env_override() {
        assert!(build_filter("info", None).is_ok());
        assert!(build_filter("info", Some("screener_data=debug".to_string())).is_ok());
        // 빈 환경 변수는 무시하고 설정 레벨 사용
        assert!(build_filter("warn", Some("  ".to_string())).is_ok());
    }

    #[test]
    fn test_invalid_filter_is_config_error() {
        let err = build_filter("screener=loud", None).unwrap_err();
        assert!(matches!(err, ScreenerError::Config(ref msg) if msg.contains("screener=loud")));
    }

    #[test]
    fn test_screening_span_macro() {
        let span = crate::screening_span!("evaluate", "7203", crate::types::Interval::D1, "memory");
        let _guard = span.enter();
    }
}
