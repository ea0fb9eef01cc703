//! Structured logging for the `robust` binary.
//!
//! Events are written to stderr so stdout carries nothing but the run
//! summary. The renderer comes from `--log-format` (or [`LOG_FORMAT_ENV`]);
//! the filter comes from `RUST_LOG`, falling back to [`DEFAULT_FILTER`].

use std::sync::Once;

use clap::ValueEnum;
use tracing_log::LogTracer;
use tracing_subscriber::{
    EnvFilter, Layer, fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Environment variable read when `--log-format` is not given.
pub const LOG_FORMAT_ENV: &str = "ROBUST_LOG_FORMAT";

/// Filter applied when `RUST_LOG` is unset or invalid: the workspace crates
/// log at `info`, dependencies only warn.
pub const DEFAULT_FILTER: &str = "warn,robust=info,robust_cli=info,robust_core=info,\
robust_providers_network=info,robust_providers_pcst=info";

static INSTALL: Once = Once::new();

/// Renderer for log events.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines, one per event and closed span.
    #[default]
    Human,
    /// One JSON object per event, carrying the current span list.
    Json,
}

/// Builds the event filter from `RUST_LOG` or [`DEFAULT_FILTER`].
#[must_use]
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global subscriber on first call; later calls do nothing.
///
/// Closing spans are logged so `diversify.solve` and `pcst.solve` timings
/// show up per iteration. When another subscriber already owns the global
/// slot (as in tests) it is left in place.
pub fn init_logging(format: LogFormat) {
    INSTALL.call_once(|| {
        // a `log` logger may already be registered
        let _ = LogTracer::init();

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_span_events(FmtSpan::CLOSE)
            .with_writer(std::io::stderr);
        let fmt_layer = match format {
            LogFormat::Human => fmt_layer.boxed(),
            LogFormat::Json => fmt_layer
                .json()
                .with_current_span(true)
                .with_span_list(true)
                .boxed(),
        };

        let _ = tracing_subscriber::registry()
            .with(env_filter())
            .with(fmt_layer)
            .try_init();
    });
}
