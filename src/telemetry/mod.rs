//! Tracing and OpenTelemetry setup.
//!
//! Logs always go to stderr, which the Functions host collects, so there is
//! no OTLP log pipeline. When an OTLP endpoint is configured, spans and
//! metrics are exported there too, tagged with the service version,
//! deployment environment and operating mode.

pub mod invocation;
pub mod metrics;

use opentelemetry::KeyValue;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::WithExportConfig as _;
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::metrics::SdkMeterProvider;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::Mode;

/// Service name reported by the agrosense binary.
pub const SERVICE_NAME: &str = "agrosense";

pub const ATTR_SERVICE_VERSION: &str = "service.version";
pub const ATTR_DEPLOYMENT_ENVIRONMENT: &str = "deployment.environment.name";
pub const ATTR_MODE: &str = "agrosense.mode";

/// Configuration for telemetry initialization.
pub struct TelemetryConfig {
    /// Optional OTLP endpoint (e.g. "http://localhost:4317").
    /// When `None`, only the stderr fmt layer is installed.
    pub endpoint: Option<String>,
    pub service_name: String,
    /// Deployment stage, reported as `deployment.environment.name`.
    pub environment: String,
    pub mode: Mode,
    /// Filter directive used when `RUST_LOG` is not set.
    pub log_level: String,
}

impl TelemetryConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            endpoint: config.otel_endpoint.clone(),
            service_name: SERVICE_NAME.to_string(),
            environment: config.environment.clone(),
            mode: config.mode(),
            log_level: config.log_level.clone(),
        }
    }

    /// Resource attached to every exported span and metric.
    pub fn resource(&self) -> Resource {
        Resource::builder()
            .with_service_name(self.service_name.clone())
            .with_attributes([
                KeyValue::new(ATTR_SERVICE_VERSION, env!("CARGO_PKG_VERSION")),
                KeyValue::new(ATTR_DEPLOYMENT_ENVIRONMENT, self.environment.clone()),
                KeyValue::new(ATTR_MODE, self.mode.to_string()),
            ])
            .build()
    }
}

/// OTLP trace and metric providers. Shut down on drop.
pub struct OtlpPipeline {
    tracer_provider: SdkTracerProvider,
    meter_provider: SdkMeterProvider,
}

impl OtlpPipeline {
    /// Build gRPC exporters for `endpoint`. Connections are made lazily,
    /// so an unreachable collector does not fail the build.
    ///
    /// Must be called from within a tokio runtime.
    pub fn build(endpoint: &str, resource: Resource) -> Result<Self> {
        let span_exporter = opentelemetry_otlp::SpanExporter::builder()
            .with_tonic()
            .with_endpoint(endpoint)
            .build()
            .map_err(|e| Error::Telemetry(format!("failed to create OTLP span exporter: {e}")))?;

        let metric_exporter = opentelemetry_otlp::MetricExporter::builder()
            .with_tonic()
            .with_endpoint(endpoint)
            .build()
            .map_err(|e| Error::Telemetry(format!("failed to create OTLP metric exporter: {e}")))?;

        let tracer_provider = SdkTracerProvider::builder()
            .with_batch_exporter(span_exporter)
            .with_resource(resource.clone())
            .build();

        let meter_provider = SdkMeterProvider::builder()
            .with_periodic_exporter(metric_exporter)
            .with_resource(resource)
            .build();

        Ok(Self {
            tracer_provider,
            meter_provider,
        })
    }
}

impl Drop for OtlpPipeline {
    fn drop(&mut self) {
        let _ = self.meter_provider.shutdown();
        let _ = self.tracer_provider.shutdown();
    }
}

/// Keeps the OTLP pipeline alive. Hold it for the lifetime of the process.
pub struct TelemetryGuard {
    _pipeline: Option<OtlpPipeline>,
}

/// Install the global tracing subscriber, plus the OTLP pipeline when an
/// endpoint is configured.
///
/// # Errors
///
/// Returns an error if an OTLP exporter fails to build or a global
/// subscriber was already set.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(std::io::stderr);

    let Some(endpoint) = config.endpoint.as_deref() else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .map_err(subscriber_error)?;
        return Ok(TelemetryGuard { _pipeline: None });
    };

    let pipeline = OtlpPipeline::build(endpoint, config.resource())?;
    let tracer = pipeline.tracer_provider.tracer(SERVICE_NAME);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(tracing_opentelemetry::layer().with_tracer(tracer))
        .try_init()
        .map_err(subscriber_error)?;

    opentelemetry::global::set_meter_provider(pipeline.meter_provider.clone());

    Ok(TelemetryGuard {
        _pipeline: Some(pipeline),
    })
}

fn subscriber_error(e: tracing_subscriber::util::TryInitError) -> Error {
    Error::Telemetry(format!("failed to init tracing subscriber: {e}"))
}
