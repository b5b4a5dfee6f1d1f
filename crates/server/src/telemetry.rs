use axum::{body::Body, http::Request, response::Response};
use opentelemetry::{
    global,
    trace::{SpanKind, TraceContextExt, Tracer},
    Context, KeyValue,
};
use opentelemetry_otlp::tonic_types::metadata::MetadataMap;
use opentelemetry_otlp::tonic_types::transport::ClientTlsConfig;
use opentelemetry_otlp::{WithExportConfig, WithTonicConfig};
use std::{
    future::Future,
    pin::Pin,
    sync::OnceLock,
    task::{Context as TaskContext, Poll},
};
use tower::{Layer, Service};
use uuid::Uuid;

use crate::auth::jwt::Claims;

const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
const SERVICE_NAME: &str = "family-office-portal";

/// Keep the LoggerProvider alive for the process lifetime.
static LOGGER_PROVIDER: OnceLock<opentelemetry_sdk::logs::SdkLoggerProvider> = OnceLock::new();

/// Runtime for the OTLP gRPC exporters. Tonic's `connect_lazy()` spawns onto
/// the current Tokio runtime, which the Dioxus serve closure may not provide.
static OTEL_RUNTIME: OnceLock<tokio::runtime::Runtime> = OnceLock::new();

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("failed to start telemetry runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("invalid SIGNOZ_INGESTION_KEY value")]
    IngestionKey,
    #[error("failed to build OTLP exporter: {0}")]
    Exporter(String),
    #[error("logger provider already initialized")]
    AlreadyInitialized,
}

/// Collector settings read from the environment.
#[derive(Debug, Clone, PartialEq)]
struct OtlpSettings {
    endpoint: String,
    service_name: String,
    environment: String,
    ingestion_key: Option<String>,
}

impl OtlpSettings {
    fn from_env() -> Option<Self> {
        let endpoint = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT").ok()?;
        Some(Self {
            endpoint,
            service_name: std::env::var("OTEL_SERVICE_NAME")
                .unwrap_or_else(|_| SERVICE_NAME.to_string()),
            environment: std::env::var("DEPLOY_ENV")
                .unwrap_or_else(|_| "development".to_string()),
            ingestion_key: std::env::var("SIGNOZ_INGESTION_KEY")
                .ok()
                .filter(|k| !k.is_empty()),
        })
    }

    fn uses_tls(&self) -> bool {
        self.endpoint.starts_with("https://")
    }

    fn metadata(&self) -> Result<Option<MetadataMap>, TelemetryError> {
        let Some(key) = &self.ingestion_key else {
            return Ok(None);
        };
        let mut metadata = MetadataMap::new();
        metadata.insert(
            "signoz-ingestion-key",
            key.parse().map_err(|_| TelemetryError::IngestionKey)?,
        );
        Ok(Some(metadata))
    }
}

/// Configure OTLP trace and log export.
///
/// Returns `Ok(false)` when `OTEL_EXPORTER_OTLP_ENDPOINT` is unset. Other
/// settings: `OTEL_SERVICE_NAME`, `DEPLOY_ENV`, `SIGNOZ_INGESTION_KEY`.
/// The `tracing` subscriber belongs to Dioxus; only exporters are set here.
pub fn init_telemetry() -> Result<bool, TelemetryError> {
    let _ = dotenvy::dotenv();

    let Some(settings) = OtlpSettings::from_env() else {
        tracing::info!("OTEL_EXPORTER_OTLP_ENDPOINT not set, skipping OTLP telemetry");
        return Ok(false);
    };

    let rt = match OTEL_RUNTIME.get() {
        Some(rt) => rt,
        None => {
            let rt = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .worker_threads(1)
                .build()?;
            OTEL_RUNTIME.get_or_init(|| rt)
        }
    };
    let _guard = rt.enter();

    let mut span_builder = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&settings.endpoint);
    let mut log_builder = opentelemetry_otlp::LogExporter::builder()
        .with_tonic()
        .with_endpoint(&settings.endpoint);
    if settings.uses_tls() {
        span_builder = span_builder.with_tls_config(ClientTlsConfig::new().with_native_roots());
        log_builder = log_builder.with_tls_config(ClientTlsConfig::new().with_native_roots());
    }
    if let Some(metadata) = settings.metadata()? {
        span_builder = span_builder.with_metadata(metadata.clone());
        log_builder = log_builder.with_metadata(metadata);
    }

    let span_exporter = span_builder
        .build()
        .map_err(|e| TelemetryError::Exporter(e.to_string()))?;
    let log_exporter = log_builder
        .build()
        .map_err(|e| TelemetryError::Exporter(e.to_string()))?;

    let resource = opentelemetry_sdk::Resource::builder()
        .with_service_name(settings.service_name.clone())
        .with_attribute(KeyValue::new("service.version", APP_VERSION))
        .with_attribute(KeyValue::new("deployment.environment", settings.environment.clone()))
        .build();

    let provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
        .with_batch_exporter(span_exporter)
        .with_resource(resource.clone())
        .build();
    global::set_tracer_provider(provider);

    let logger_provider = opentelemetry_sdk::logs::SdkLoggerProvider::builder()
        .with_batch_exporter(log_exporter)
        .with_resource(resource)
        .build();
    LOGGER_PROVIDER
        .set(logger_provider)
        .map_err(|_| TelemetryError::AlreadyInitialized)?;

    // `log` records go to OTLP; `tracing` stays with the Dioxus subscriber.
    if let Some(provider) = LOGGER_PROVIDER.get() {
        let bridge = opentelemetry_appender_log::OpenTelemetryLogBridge::new(provider);
        match log::set_boxed_logger(Box::new(bridge)) {
            Ok(()) => log::set_max_level(log::LevelFilter::Info),
            Err(_) => tracing::warn!("log bridge skipped, a logger is already set"),
        }
    }

    tracing::info!(
        endpoint = %settings.endpoint,
        cloud = settings.ingestion_key.is_some(),
        version = APP_VERSION,
        "telemetry initialized"
    );
    Ok(true)
}

/// Detect client platform from User-Agent and optional X-Client-Platform header.
///
/// The explicit header wins over the User-Agent heuristic.
fn detect_platform(ua: &str, explicit: Option<&str>) -> &'static str {
    if let Some(p) = explicit {
        return match p {
            "ios" => "ios",
            "android" => "android",
            "desktop" => "desktop",
            "web" => "web",
            _ => "unknown",
        };
    }

    if ua == "unknown" || ua.is_empty() {
        return "native";
    }
    if ua.contains("iPhone") || ua.contains("iPad") {
        "ios"
    } else if ua.contains("Android") {
        "android"
    } else if ua.contains("Mozilla") || ua.contains("Chrome") || ua.contains("Safari") {
        "web"
    } else {
        "native"
    }
}

/// Collapse id segments so spans group by route, e.g.
/// `/api/documents/<uuid>/download` becomes `/api/documents/{id}/download`.
fn route_template(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            if Uuid::parse_str(segment).is_ok() {
                "{id}"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Tower layer that creates an OpenTelemetry span for each HTTP request.
///
/// Records method, route, platform, request id, status and, when the auth
/// middleware ran first, the caller's id, email and role.
#[derive(Clone)]
pub struct OtelTraceLayer;

impl<S> Layer<S> for OtelTraceLayer {
    type Service = OtelTraceService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        OtelTraceService { inner }
    }
}

#[derive(Clone)]
pub struct OtelTraceService<S> {
    inner: S,
}

impl<S> Service<Request<Body>> for OtelTraceService<S>
where
    S: Service<Request<Body>, Response = Response> + Send + Clone + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut TaskContext<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let tracer = global::tracer(SERVICE_NAME);
        let method = req.method().to_string();
        let route = route_template(req.uri().path());

        let header = |name: &str| {
            req.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let user_agent = header("user-agent").unwrap_or_else(|| "unknown".to_string());
        let explicit_platform = header("x-client-platform");
        let client_platform = detect_platform(&user_agent, explicit_platform.as_deref());
        let request_id = header("x-request-id").unwrap_or_default();

        let mut attributes = vec![
            KeyValue::new("http.method", method.clone()),
            KeyValue::new("http.route", route.clone()),
            KeyValue::new("http.user_agent", user_agent),
            KeyValue::new("client.platform", client_platform),
            KeyValue::new("http.request_id", request_id),
        ];
        match req.extensions().get::<Claims>() {
            Some(claims) => attributes.extend([
                KeyValue::new("user.id", claims.sub.to_string()),
                KeyValue::new("user.email", claims.email.clone()),
                KeyValue::new("user.role", claims.role.clone()),
                KeyValue::new("auth.status", "authenticated"),
            ]),
            None => attributes.push(KeyValue::new("auth.status", "anonymous")),
        }

        let span = tracer
            .span_builder(format!("{method} {route}"))
            .with_kind(SpanKind::Server)
            .with_attributes(attributes)
            .start(&tracer);

        let cx = Context::current_with_span(span);
        let mut inner = self.inner.clone();

        let guard = cx.clone().attach();
        let future = inner.call(req);
        drop(guard);

        Box::pin(async move {
            let response = future.await?;

            let span = cx.span();
            let status = response.status();
            span.set_attribute(KeyValue::new("http.status_code", status.as_u16() as i64));

            if status.is_server_error() {
                span.set_status(opentelemetry::trace::Status::error(status.to_string()));
            } else if status.is_client_error() {
                span.set_attribute(KeyValue::new("error.type", "client_error"));
            }

            Ok(response)
        })
    }
}
