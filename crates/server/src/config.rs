use axum::http::{header, HeaderValue, Method};
use shared_types::{AppConfig, FeatureFlags};
use std::sync::OnceLock;
use tower_http::cors::{Any, CorsLayer};

static FLAGS: OnceLock<FeatureFlags> = OnceLock::new();

/// Path to the config file, relative to the project root.
const CONFIG_PATH: &str = "config.toml";

/// Default request body ceiling for document uploads (50 MiB).
const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Read `config.toml`, parse feature flags, and store them in the global
/// `OnceLock`. Safe to call multiple times; only the first call has effect.
///
/// If the file is missing or unparseable, all flags default to `false`.
pub fn load_feature_flags() {
    FLAGS.get_or_init(|| parse_flags(std::fs::read_to_string(CONFIG_PATH).ok().as_deref()));
}

fn parse_flags(contents: Option<&str>) -> FeatureFlags {
    match contents {
        Some(contents) => {
            let config: AppConfig = toml::from_str(contents).unwrap_or_else(|e| {
                tracing::warn!(path = CONFIG_PATH, error = %e, "config parse failed, all flags off");
                AppConfig::default()
            });
            tracing::info!(flags = ?config.features, "feature flags loaded");
            config.features
        }
        None => {
            tracing::info!(path = CONFIG_PATH, "config file not found, all flags off");
            FeatureFlags::default()
        }
    }
}

/// Get the loaded feature flags. Returns all-false defaults if
/// `load_feature_flags()` hasn't been called yet.
pub fn feature_flags() -> &'static FeatureFlags {
    static DEFAULT: FeatureFlags = FeatureFlags {
        telemetry: false,
        demo_seed: false,
        registration: false,
    };
    FLAGS.get().unwrap_or(&DEFAULT)
}

/// Largest accepted upload, from `MAX_UPLOAD_BYTES`.
pub fn max_upload_bytes() -> usize {
    std::env::var("MAX_UPLOAD_BYTES")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES)
}

/// Origins allowed by CORS, from the comma separated `CORS_ALLOWED_ORIGINS`.
/// Empty means any origin.
pub fn cors_allowed_origins() -> Vec<String> {
    std::env::var("CORS_ALLOWED_ORIGINS")
        .map(|v| split_origins(&v))
        .unwrap_or_default()
}

/// CORS policy for the REST API.
///
/// With explicit origins the layer also allows credentials so the session
/// cookie travels cross-origin. Unparseable origins are skipped.
pub fn cors_layer() -> CorsLayer {
    let methods = [Method::GET, Method::POST, Method::OPTIONS];
    let headers = [header::AUTHORIZATION, header::CONTENT_TYPE];
    let origins: Vec<HeaderValue> = cors_allowed_origins()
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(headers)
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(headers)
            .allow_credentials(true)
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}
