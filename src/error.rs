//! Error types for the studio flows and the API client.

use std::fmt;

/// The two request flows of the studio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Text-to-image generation.
    Generate,
    /// Prompt-driven editing of an existing image.
    Edit,
}

impl Flow {
    /// Text shown when the server rejects the request without a `detail`.
    pub fn unable_message(&self) -> &'static str {
        match self {
            Self::Generate => "Unable to generate image.",
            Self::Edit => "Unable to edit image.",
        }
    }

    /// Text shown for transport and parse failures.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::Generate => "Something went wrong while generating the image.",
            Self::Edit => "Something went wrong while editing the image.",
        }
    }
}

impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generate => write!(f, "generate"),
            Self::Edit => write!(f, "edit"),
        }
    }
}

/// Errors that can occur while generating or editing an image.
#[derive(Debug, thiserror::Error)]
pub enum StudioError {
    /// The prompt was empty or whitespace only.
    #[error("empty {0} prompt")]
    EmptyPrompt(Flow),

    /// Neither an uploaded file nor a generated image is available to edit.
    #[error("no image available to edit")]
    NoImage,

    /// A request for this flow is already outstanding.
    #[error("{0} request already in progress")]
    Busy(Flow),

    /// Unknown size label.
    #[error("invalid size: {0}")]
    InvalidSize(String),

    /// The server answered with a non-success status.
    #[error("API error: {status} - {}", .detail.as_deref().unwrap_or("no detail"))]
    Api {
        /// HTTP status code.
        status: u16,
        /// Human-readable message from the `detail` field, if any.
        detail: Option<String>,
    },

    /// Network or HTTP error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to decode base64 data.
    #[error("failed to decode: {0}")]
    Decode(String),

    /// I/O error (e.g., reading an upload or saving a file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StudioError {
    /// Returns true for errors raised before any network activity.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::EmptyPrompt(_) | Self::NoImage | Self::Busy(_) | Self::InvalidSize(_)
        )
    }

    /// The message shown in the error line after `flow` failed with this error.
    pub fn user_message(&self, flow: Flow) -> String {
        match self {
            Self::EmptyPrompt(Flow::Generate) => {
                "Please enter a prompt to generate an image.".into()
            }
            Self::EmptyPrompt(Flow::Edit) => "Please enter a prompt to edit the image.".into(),
            Self::NoImage => "Please generate or upload an image to edit.".into(),
            Self::Busy(Flow::Generate) => "Already generating an image.".into(),
            Self::Busy(Flow::Edit) => "Already editing an image.".into(),
            Self::InvalidSize(label) => format!("Unsupported size: {label}."),
            Self::Api {
                detail: Some(detail),
                ..
            } => detail.clone(),
            Self::Api { detail: None, .. } => flow.unable_message().into(),
            Self::Network(_) | Self::Json(_) | Self::Decode(_) | Self::Io(_) => {
                flow.fallback_message().into()
            }
        }
    }
}

/// Result type alias for studio operations.
pub type Result<T> = std::result::Result<T, StudioError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_local() {
        assert!(StudioError::EmptyPrompt(Flow::Generate).is_local());
        assert!(StudioError::NoImage.is_local());
        assert!(StudioError::Busy(Flow::Edit).is_local());

        assert!(!StudioError::Api {
            status: 500,
            detail: None
        }
        .is_local());
        assert!(!StudioError::Decode("bad base64".into()).is_local());
    }

    #[test]
    fn test_user_message_prefers_detail() {
        let err = StudioError::Api {
            status: 429,
            detail: Some("rate limited".into()),
        };
        assert_eq!(err.user_message(Flow::Generate), "rate limited");

        let err = StudioError::Api {
            status: 500,
            detail: None,
        };
        assert_eq!(err.user_message(Flow::Generate), "Unable to generate image.");
        assert_eq!(err.user_message(Flow::Edit), "Unable to edit image.");
    }

    #[test]
    fn test_user_message_fallbacks() {
        let err = StudioError::Decode("bad".into());
        assert_eq!(
            err.user_message(Flow::Edit),
            "Something went wrong while editing the image."
        );

        let err: StudioError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert_eq!(
            err.user_message(Flow::Generate),
            "Something went wrong while generating the image."
        );
    }

    #[test]
    fn test_error_display() {
        let err = StudioError::Api {
            status: 404,
            detail: Some("Not found".into()),
        };
        assert_eq!(err.to_string(), "API error: 404 - Not found");

        let err = StudioError::Api {
            status: 502,
            detail: None,
        };
        assert_eq!(err.to_string(), "API error: 502 - no detail");
    }
}
