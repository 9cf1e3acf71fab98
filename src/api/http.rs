//! HTTP client for the generation service.

use crate::api::provider::ImageApi;
use crate::config::ApiConfig;
use crate::error::{Result, StudioError};
use crate::image::{ImageFile, ImageSize};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;

/// Builder for [`HttpImageApi`].
#[derive(Debug, Clone, Default)]
pub struct HttpImageApiBuilder {
    config: Option<ApiConfig>,
    client: Option<reqwest::Client>,
}

impl HttpImageApiBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL.
    ///
    /// A trailing slash is dropped. An empty value falls back to
    /// [`DEFAULT_API_BASE_URL`](crate::config::DEFAULT_API_BASE_URL), not to
    /// the build-time value used by [`ApiConfig::default`].
    pub fn base_url(mut self, base_url: impl AsRef<str>) -> Self {
        self.config = Some(ApiConfig::new(base_url));
        self
    }

    /// Sets the full endpoint configuration.
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Uses a preconfigured `reqwest` client.
    pub fn client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Builds the client.
    pub fn build(self) -> HttpImageApi {
        HttpImageApi {
            client: self.client.unwrap_or_default(),
            config: self.config.unwrap_or_default(),
        }
    }
}

/// [`ImageApi`] over HTTP: JSON for generation, multipart for edits.
#[derive(Debug, Clone)]
pub struct HttpImageApi {
    client: reqwest::Client,
    config: ApiConfig,
}

impl HttpImageApi {
    /// Creates a new [`HttpImageApiBuilder`].
    pub fn builder() -> HttpImageApiBuilder {
        HttpImageApiBuilder::new()
    }

    /// The endpoint configuration in use.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Reads an image response.
    ///
    /// The body is parsed before the status is checked, so a failure status
    /// with a non-JSON body surfaces as a parse error.
    async fn read_image(response: reqwest::Response) -> Result<String> {
        let status = response.status();
        let bytes = response.bytes().await?;
        let body: ImageResponse = serde_json::from_slice(&bytes)?;

        if !status.is_success() {
            return Err(StudioError::Api {
                status: status.as_u16(),
                detail: body.detail.as_ref().and_then(detail_message),
            });
        }

        body.image
            .ok_or_else(|| StudioError::Decode("response contained no image".into()))
    }
}

#[async_trait]
impl ImageApi for HttpImageApi {
    async fn generate(&self, prompt: &str, size: ImageSize) -> Result<String> {
        let start = Instant::now();
        let url = self.config.generate_url();
        tracing::debug!(%url, %size, "requesting image generation");

        let response = self
            .client
            .post(&url)
            .json(&GenerateRequest { prompt, size })
            .send()
            .await?;

        let image = Self::read_image(response).await?;
        tracing::debug!(
            duration_ms = start.elapsed().as_millis() as u64,
            payload_len = image.len(),
            "image generated"
        );
        Ok(image)
    }

    async fn edit(&self, prompt: &str, image: &ImageFile) -> Result<String> {
        let start = Instant::now();
        let url = self.config.edit_url();
        tracing::debug!(%url, file = %image.name, size = image.size(), "requesting image edit");

        let image_part = reqwest::multipart::Part::bytes(image.data.clone())
            .file_name(image.name.clone())
            .mime_str(&image.media_type)?;

        let form = reqwest::multipart::Form::new()
            .text("prompt", prompt.to_string())
            .part("image", image_part);

        let response = self.client.post(&url).multipart(form).send().await?;

        let edited = Self::read_image(response).await?;
        tracing::debug!(
            duration_ms = start.elapsed().as_millis() as u64,
            payload_len = edited.len(),
            "image edited"
        );
        Ok(edited)
    }

    async fn health(&self) -> Result<()> {
        let response = self.client.get(self.config.health_url()).send().await?;
        let status = response.status();
        let body: HealthResponse = response.json().await?;

        if status.is_success() && body.status == "ok" {
            Ok(())
        } else {
            Err(StudioError::Api {
                status: status.as_u16(),
                detail: Some(format!("service reported status '{}'", body.status)),
            })
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    prompt: &'a str,
    size: ImageSize,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    detail: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
}

/// Extracts a printable message from a `detail` field.
///
/// Strings are used verbatim; validation error lists are joined by their
/// `msg` entries.
fn detail_message(detail: &Value) -> Option<String> {
    match detail {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        _ => None,
    }
}
