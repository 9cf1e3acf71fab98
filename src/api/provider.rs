//! Image API trait.

use crate::error::Result;
use crate::image::{ImageFile, ImageSize};
use async_trait::async_trait;

/// The remote generation service.
///
/// Both calls return the image as a base64 payload without a data URI
/// prefix.
#[async_trait]
pub trait ImageApi: Send + Sync {
    /// Generates an image from `prompt` at the given size.
    async fn generate(&self, prompt: &str, size: ImageSize) -> Result<String>;

    /// Edits `image` according to `prompt`.
    async fn edit(&self, prompt: &str, image: &ImageFile) -> Result<String>;

    /// Checks that the service is reachable and reports itself healthy.
    async fn health(&self) -> Result<()>;
}
