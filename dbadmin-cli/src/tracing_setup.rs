//! Tracing and OpenTelemetry setup for the dbadmin CLI
//!
//! Logs go to stderr so table and JSON output on stdout stay clean.
//!
//! Usage:
//!   dbadmin --debug ...               # Debug logging
//!   dbadmin --otel serve              # Export traces to OTLP (telemetry feature)
//!   RUST_LOG=dbadmin_server=debug dbadmin tables
//!
//! Environment variables:
//!   RUST_LOG                          # Log filter (default: warn, info for serve)
//!   OTEL_EXPORTER_OTLP_ENDPOINT       # OTLP endpoint (default: http://localhost:4317)
//!   OTEL_SERVICE_NAME                 # Service name (default: dbadmin)

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Tracing configuration options
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Debug level unless RUST_LOG is set
    pub debug: bool,
    /// Level used when neither RUST_LOG nor `debug` applies
    pub default_level: &'static str,
    /// Enable OpenTelemetry OTLP export
    pub otel: bool,
}

fn env_filter(config: &TracingConfig) -> EnvFilter {
    let fallback = if config.debug {
        "debug"
    } else if config.default_level.is_empty() {
        "info"
    } else {
        config.default_level
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Initialize tracing with console output only (no OTEL)
pub fn init_tracing(config: &TracingConfig) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_target(config.debug)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}

/// Initialize tracing with OpenTelemetry OTLP export
#[cfg(feature = "telemetry")]
pub fn init_tracing_with_otel(config: &TracingConfig) -> Result<()> {
    use opentelemetry::trace::TracerProvider as _;
    use opentelemetry::KeyValue;
    use opentelemetry_otlp::WithExportConfig;
    use opentelemetry_sdk::trace::TracerProvider;
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let endpoint = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
        .unwrap_or_else(|_| "http://localhost:4317".to_string());
    let service_name = std::env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| "dbadmin".to_string());

    let otlp_exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&endpoint)
        .build()
        .map_err(|e| anyhow!("Failed to create OTLP exporter: {}", e))?;

    let resource = opentelemetry_sdk::Resource::new(vec![KeyValue::new("service.name", service_name.clone())]);

    let provider = TracerProvider::builder()
        .with_batch_exporter(otlp_exporter, opentelemetry_sdk::runtime::Tokio)
        .with_resource(resource)
        .build();

    let tracer = provider.tracer("dbadmin");
    let telemetry_layer = tracing_opentelemetry::layer().with_tracer(tracer);

    // The global provider must outlive the subscriber or export stops
    let _ = opentelemetry::global::set_tracer_provider(provider);

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(config.debug)
        .with_writer(std::io::stderr)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(fmt_layer)
        .with(telemetry_layer)
        .try_init()
        .map_err(|err| anyhow!(err))?;

    tracing::info!(endpoint = %endpoint, service = %service_name, "OpenTelemetry tracing initialized");
    Ok(())
}

/// Flush pending spans
#[cfg(feature = "telemetry")]
pub fn shutdown_otel() {
    opentelemetry::global::shutdown_tracer_provider();
}

#[cfg(not(feature = "telemetry"))]
pub fn shutdown_otel() {}

/// Console-only or OTEL, depending on `config.otel` and the build.
pub fn init(config: &TracingConfig) -> Result<()> {
    #[cfg(feature = "telemetry")]
    if config.otel {
        return init_tracing_with_otel(config);
    }

    init_tracing(config)?;

    #[cfg(not(feature = "telemetry"))]
    if config.otel {
        tracing::warn!("--otel ignored: built without the telemetry feature");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_overrides_default_level() {
        std::env::remove_var("RUST_LOG");
        let config = TracingConfig {
            debug: true,
            default_level: "warn",
            otel: false,
        };
        assert_eq!(env_filter(&config).to_string(), "debug");

        let config = TracingConfig {
            debug: false,
            default_level: "warn",
            otel: false,
        };
        assert_eq!(env_filter(&config).to_string(), "warn");
    }

    #[test]
    fn second_init_reports_error() {
        let config = TracingConfig {
            default_level: "warn",
            ..Default::default()
        };
        // The first call may lose to another test; the second always fails
        let _ = init(&config);
        assert!(init(&config).is_err());
    }
}
