//! API endpoint configuration.

/// Base URL used when none is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Where the generation service lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
}

impl Default for ApiConfig {
    /// Uses the base URL baked in at build time, or the local default.
    fn default() -> Self {
        Self::new(option_env!("IMAGE_STUDIO_API_BASE_URL").unwrap_or(""))
    }
}

impl ApiConfig {
    /// Creates a config from a base URL. A trailing slash is dropped and an
    /// empty value falls back to [`DEFAULT_API_BASE_URL`].
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self {
            base_url: normalize_base_url(base_url.as_ref()),
        }
    }

    /// The normalized base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the generation endpoint.
    pub fn generate_url(&self) -> String {
        format!("{}/api/generate", self.base_url)
    }

    /// URL of the edit endpoint.
    pub fn edit_url(&self) -> String {
        format!("{}/api/edit", self.base_url)
    }

    /// URL of the health endpoint.
    pub fn health_url(&self) -> String {
        format!("{}/health", self.base_url)
    }
}

fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
    if trimmed.is_empty() {
        DEFAULT_API_BASE_URL.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = ApiConfig::new("https://studio.example.com/");
        assert_eq!(config.base_url(), "https://studio.example.com");
        assert_eq!(
            config.generate_url(),
            "https://studio.example.com/api/generate"
        );
        assert_eq!(config.edit_url(), "https://studio.example.com/api/edit");
        assert_eq!(config.health_url(), "https://studio.example.com/health");
    }

    #[test]
    fn test_empty_falls_back_to_default() {
        assert_eq!(ApiConfig::new("").base_url(), DEFAULT_API_BASE_URL);
        assert_eq!(ApiConfig::new("/").base_url(), DEFAULT_API_BASE_URL);
        assert_eq!(ApiConfig::new("  ").base_url(), DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_only_one_slash_trimmed() {
        assert_eq!(
            ApiConfig::new("http://host:9000/base//").base_url(),
            "http://host:9000/base/"
        );
    }
}
