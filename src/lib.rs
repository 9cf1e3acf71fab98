#![warn(missing_docs)]
//! Image Studio - generate an image from a prompt, then refine it.
//!
//! This crate drives a remote image service exposing two endpoints:
//! `POST /api/generate` (JSON) and `POST /api/edit` (multipart). A
//! [`Studio`] session holds the form input, the generated, base and edited
//! images, the busy flags, and a single status/error line.
//!
//! # Quick Start
//!
//! ```no_run
//! use image_studio::{HttpImageApi, ImageFile, Studio};
//!
//! #[tokio::main]
//! async fn main() -> image_studio::Result<()> {
//!     let api = HttpImageApi::builder()
//!         .base_url("http://localhost:8000")
//!         .build();
//!     let studio = Studio::new(api);
//!
//!     // Edit an existing photo instead of a generated image.
//!     studio.select_upload(ImageFile::read("photo.png").await?);
//!     studio.set_edit_prompt("Add a calm moonlit glow");
//!     let edited = studio.submit_edit().await?;
//!     println!("{}", edited);
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `cli` (default): the `image-studio` binary.

pub mod api;
pub mod config;
mod error;
pub mod image;
pub mod studio;

// Re-export error types at crate root
pub use error::{Flow, Result, StudioError};

pub use api::{HttpImageApi, HttpImageApiBuilder, ImageApi};
pub use config::ApiConfig;
pub use image::{DataUri, ImageFile, ImageFormat, ImageSize, ImageSource};
pub use studio::{StatusLine, Studio, StudioState};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::api::{HttpImageApi, ImageApi};
    pub use crate::error::{Flow, Result, StudioError};
    pub use crate::image::{DataUri, ImageFile, ImageSize, ImageSource};
    pub use crate::studio::{StatusLine, Studio, StudioState};
}
