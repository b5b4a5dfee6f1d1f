use serde::{Deserialize, Serialize};

/// Feature flags controlling optional server behavior.
///
/// Loaded from `config.toml` at server startup. Every field defaults to
/// `false`, so a missing or incomplete config file disables them all.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FeatureFlags {
    /// Export traces and logs over OTLP.
    #[serde(default)]
    pub telemetry: bool,
    /// Insert the demo family office, family and users at startup.
    #[serde(default)]
    pub demo_seed: bool,
    /// Expose `POST /api/auth/register`.
    #[serde(default)]
    pub registration: bool,
}

/// Top-level config file structure matching `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub features: FeatureFlags,
}
