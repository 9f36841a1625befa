//! Tracing subscriber initialization with structured logging and optional
//! OpenTelemetry trace export.
//!
//! # Usage
//!
//! ```no_run
//! use devdesk_observe::tracing_setup::{TracingOptions, init_tracing};
//!
//! init_tracing(&TracingOptions::from_verbosity(1, false)).unwrap();
//! ```

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use std::sync::OnceLock;

/// Stores the OTel tracer provider so it can be shut down cleanly on exit.
static TRACER_PROVIDER: OnceLock<SdkTracerProvider> = OnceLock::new();

/// How the global subscriber should be configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingOptions {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
    /// Emit newline-delimited JSON instead of human-readable lines.
    pub json: bool,
    /// Bridge spans to OpenTelemetry with a stdout exporter.
    pub otel: bool,
}

impl TracingOptions {
    /// Map CLI verbosity flags to a filter directive.
    ///
    /// | flags    | filter                    |
    /// |----------|---------------------------|
    /// | `--quiet`| `error`                   |
    /// | (none)   | `warn`                    |
    /// | `-v`     | `info,devdesk=debug`      |
    /// | `-vv`    | `trace`                   |
    pub fn from_verbosity(verbose: u8, quiet: bool) -> Self {
        let filter = match verbose {
            0 if quiet => "error",
            0 => "warn",
            1 => "info,devdesk=debug",
            _ => "trace",
        };
        Self {
            filter: filter.to_string(),
            json: false,
            otel: false,
        }
    }

    /// Raise the floor to `info` so a long-running server reports its
    /// lifecycle without `-v`. Explicit verbosity is kept.
    pub fn at_least_info(mut self) -> Self {
        if self.filter == "warn" {
            self.filter = "info".to_string();
        }
        self
    }
}

/// Initialize the global tracing subscriber.
///
/// - Always installs a structured `fmt` layer writing to stderr, with span
///   close timing.
/// - When `options.otel` is true, additionally bridges tracing spans to
///   OpenTelemetry using a stdout exporter (suitable for local development;
///   swap the exporter for OTLP in production).
/// - `RUST_LOG` wins over `options.filter` when set.
///
/// # Errors
///
/// Returns an error if the global subscriber has already been set.
pub fn init_tracing(options: &TracingOptions) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&options.filter)?,
    };

    let fmt_layer = if options.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_span_events(FmtSpan::CLOSE)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_writer(std::io::stderr)
            .with_span_events(FmtSpan::CLOSE)
            .boxed()
    };

    let otel_layer = if options.otel {
        let provider = SdkTracerProvider::builder()
            .with_simple_exporter(opentelemetry_stdout::SpanExporter::default())
            .build();
        let tracer = provider.tracer("devdesk");

        // Store the provider for shutdown and register it globally.
        let _ = TRACER_PROVIDER.set(provider.clone());
        opentelemetry::global::set_tracer_provider(provider);

        Some(tracing_opentelemetry::layer().with_tracer(tracer))
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(otel_layer)
        .try_init()?;

    Ok(())
}

/// Flush pending traces and shut down the OpenTelemetry tracer provider.
///
/// Safe to call even when OTel was not enabled (no-op in that case).
pub fn shutdown_tracing() {
    if let Some(provider) = TRACER_PROVIDER.get() {
        if let Err(e) = provider.shutdown() {
            eprintln!("Warning: OTel tracer provider shutdown error: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_mapping() {
        assert_eq!(TracingOptions::from_verbosity(0, true).filter, "error");
        assert_eq!(TracingOptions::from_verbosity(0, false).filter, "warn");
        assert_eq!(
            TracingOptions::from_verbosity(1, false).filter,
            "info,devdesk=debug"
        );
        assert_eq!(TracingOptions::from_verbosity(3, false).filter, "trace");
    }

    #[test]
    fn test_verbose_wins_over_quiet() {
        assert_eq!(
            TracingOptions::from_verbosity(1, true).filter,
            "info,devdesk=debug"
        );
    }

    #[test]
    fn test_at_least_info() {
        assert_eq!(
            TracingOptions::from_verbosity(0, false).at_least_info().filter,
            "info"
        );
        assert_eq!(
            TracingOptions::from_verbosity(0, true).at_least_info().filter,
            "error"
        );
        assert_eq!(
            TracingOptions::from_verbosity(2, false).at_least_info().filter,
            "trace"
        );
    }

    #[test]
    fn test_shutdown_without_otel_is_noop() {
        shutdown_tracing();
    }
}
