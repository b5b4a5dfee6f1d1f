/// Backend used when `PORTAL_API_URL` was not set at build time.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Where the client sends requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        Self { base_url }
    }

    /// Base URL baked in at compile time through `PORTAL_API_URL`.
    pub fn from_build_env() -> Self {
        Self::new(option_env!("PORTAL_API_URL").unwrap_or(DEFAULT_BASE_URL))
    }

    /// Absolute URL for an API path such as `/api/messages`.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_build_env()
    }
}
