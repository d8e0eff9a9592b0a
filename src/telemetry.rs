//! Telemetry initialization (tracing/tracing-subscriber).
//!
//! - LOG_LEVEL controls the filter (e.g. "debug" or directives like
//!   "info,selection=trace,tower_http=warn").
//! - LOG_FORMAT selects "pretty" (default) or "json" structured logs.
//!
//! Engine decisions log under the `selection` target, server lifecycle under
//! `practice_backend`; TraceLayer adds the per-request spans.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,selection=debug,practice_backend=debug,tower_http=info,axum=info";

#[derive(Debug, PartialEq, Eq)]
enum LogFormat {
    Pretty,
    Json,
}

fn log_format(raw: Option<&str>) -> LogFormat {
    match raw.map(str::trim) {
        Some(f) if f.eq_ignore_ascii_case("json") => LogFormat::Json,
        _ => LogFormat::Pretty,
    }
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    // The two builders have different types, so init inside each arm.
    match log_format(std::env::var("LOG_FORMAT").ok().as_deref()) {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_defaults_to_pretty() {
        assert_eq!(log_format(None), LogFormat::Pretty);
        assert_eq!(log_format(Some("yaml")), LogFormat::Pretty);
        assert_eq!(log_format(Some(" JSON ")), LogFormat::Json);
    }
}
