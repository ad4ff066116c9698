pub mod util;
pub use crate::util::{utc_offset_hms, utc_offset_hours};
use serde::{Deserialize, Serialize};
pub use time::UtcOffset;
use time::{format_description::BorrowedFormatItem, macros::format_description};
pub use tracing::{
    Level, debug, debug_span, error, error_span, info, info_span, instrument, span, trace,
    trace_span, warn, warn_span,
};
use tracing_subscriber::{EnvFilter, Registry, fmt::time::OffsetTime, layer::SubscriberExt};

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum LoggingError {
    #[error("Failed to build layer: {message}, context: {context}")]
    BuildLayerError {
        message: String,
        context: &'static str,
    },
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[non_exhaustive]
pub struct LoggerConfig {
    pub max_level: String,
    /// Offset in hours from UTC for log timestamps (e.g., 9 for UTC+9).
    pub utc_offset: Option<i8>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            max_level: "INFO".to_string(),
            utc_offset: None,
        }
    }
}

pub struct LoggingGuard {
    /// Need to keep the guard alive to keep the stdout appender flushing
    pub stdout_guard: tracing_appender::non_blocking::WorkerGuard,
}

pub fn setup_logging(config: LoggerConfig) -> Result<LoggingGuard, LoggingError> {
    let fmt: &[BorrowedFormatItem<'_>] = if cfg!(debug_assertions) {
        format_description!("[hour]:[minute]:[second].[subsecond digits:3]")
    } else {
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]")
    };

    let timezone = match config.utc_offset {
        Some(offset) => utc_offset_hours(offset),
        None => UtcOffset::UTC,
    };
    let timer = OffsetTime::new(timezone, fmt);

    let max_level = config.max_level.parse::<Level>().unwrap_or(Level::INFO);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let level_filter = tracing_subscriber::filter::LevelFilter::from_level(max_level);

    let (non_blocking, stdout_guard) = tracing_appender::non_blocking(std::io::stdout());
    let console_layer = tracing_subscriber::fmt::Layer::default()
        .with_writer(non_blocking)
        .with_timer(timer)
        .with_ansi(true)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    let registry = Registry::default()
        .with(env_filter)
        .with(level_filter)
        .with(console_layer);

    if tracing::dispatcher::has_been_set() {
        warn!("Global trace dispatcher already set, skipping re-init");
    } else {
        tracing::subscriber::set_global_default(registry).map_err(|e| {
            LoggingError::BuildLayerError {
                message: e.to_string(),
                context: "init",
            }
        })?;
    }

    Ok(LoggingGuard { stdout_guard })
}
