use std::io;
use tracing_subscriber::{fmt, EnvFilter};

/// Output layout of the tracing subscriber.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    /// Anything other than `json` (case-insensitive) means compact.
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("json") { LogFormat::Json } else { LogFormat::Compact }
    }
}

/// Build the filter: `RUST_LOG` wins, otherwise `level` plus request tracing.
fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = level.trim().to_ascii_lowercase();
        let level = if level.is_empty() { "info".to_string() } else { level };
        EnvFilter::new(format!("{level},tower_http={level},sqlx=warn"))
    })
}

/// Initialize the tracing subscriber writing to stdout.
/// Safe to call more than once; later calls are ignored.
pub fn init_logging(level: &str, format: LogFormat) {
    let env_filter = build_filter(level);
    let builder = fmt().with_env_filter(env_filter).with_target(false).with_writer(io::stdout);
    let _ = match format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}

/// Compact output at `info`, honoring `RUST_LOG`.
pub fn init_logging_default() {
    init_logging("info", LogFormat::Compact);
}
