//! Logging and Prometheus metrics setup.

use std::net::SocketAddr;
use std::str::FromStr;

use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::EnvFilter;

use crate::domain::AppError;

/// Counter of service calls, labelled by entity, operation and outcome.
pub const OPERATIONS_TOTAL: &str = "library_service_operations_total";
/// Histogram of service call latency in seconds, labelled by entity and operation.
pub const OPERATION_DURATION_SECONDS: &str = "library_service_operation_duration_seconds";

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human readable, for local development.
    #[default]
    Pretty,
    /// One JSON object per line, for log shippers.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("expected 'pretty' or 'json', got '{other}'")),
        }
    }
}

/// Install the global tracing subscriber.
///
/// The filter comes from `RUST_LOG` and falls back to `info`.
pub fn init_tracing(format: LogFormat) -> Result<(), AppError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = match format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    result.map_err(|e| AppError::Internal(format!("failed to install tracing subscriber: {e}")))
}

/// Install the global metrics recorder with a Prometheus scrape endpoint on `addr`.
///
/// # Errors
/// Returns an error if a recorder is already installed or the listener fails.
pub fn init_metrics(addr: SocketAddr) -> Result<(), AppError> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| AppError::Internal(format!("failed to install metrics exporter: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert_eq!(LogFormat::default(), LogFormat::Pretty);
    }

    #[test]
    fn test_log_format_rejects_unknown() {
        let err = "xml".parse::<LogFormat>().unwrap_err();
        assert!(err.contains("xml"));
    }
}
