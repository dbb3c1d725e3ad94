//! Logging for the `skc` binary.
//!
//! stdout belongs to command output (tables, or JSON under `--json`), so the
//! log layer writes to stderr. Verbosity comes from `-v`/`--quiet` unless
//! `RUST_LOG` is set. `--otel` adds a span exporter that prints finished
//! spans to stdout; the CLI rejects it together with `--json`.
//!
//! ```no_run
//! use skillcascade_observe::tracing_setup::{init_tracing, shutdown_tracing};
//!
//! init_tracing("info,skillcascade=debug", false).unwrap();
//! tracing::info!("cascade engine ready");
//! shutdown_tracing();
//! ```

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use std::sync::OnceLock;

/// Provider kept for flushing in [`shutdown_tracing`].
static TRACER_PROVIDER: OnceLock<SdkTracerProvider> = OnceLock::new();

/// Build the level filter: `RUST_LOG` wins when set, otherwise `default_directive`.
fn env_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// Install the process-wide subscriber: an stderr `fmt` layer filtered by
/// `default_directive`, plus the OpenTelemetry bridge when `enable_otel` is set.
///
/// Fails if a global subscriber is already installed.
pub fn init_tracing(default_directive: &str, enable_otel: bool) -> Result<(), Box<dyn std::error::Error>> {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_span_events(FmtSpan::CLOSE);

    let otel_layer = enable_otel.then(|| {
        let provider = SdkTracerProvider::builder()
            .with_simple_exporter(opentelemetry_stdout::SpanExporter::default())
            .build();
        let tracer = provider.tracer("skillcascade");
        let _ = TRACER_PROVIDER.set(provider.clone());
        opentelemetry::global::set_tracer_provider(provider);
        tracing_opentelemetry::layer().with_tracer(tracer)
    });

    tracing_subscriber::registry()
        .with(env_filter(default_directive))
        .with(fmt_layer)
        .with(otel_layer)
        .try_init()?;

    Ok(())
}

/// Flush exported spans before the process exits. Does nothing without `--otel`.
pub fn shutdown_tracing() {
    if let Some(provider) = TRACER_PROVIDER.get() {
        if let Err(e) = provider.shutdown() {
            eprintln!("Warning: OTel tracer provider shutdown error: {e}");
        }
    }
}
