//! Client side of the generation service.

mod http;
mod provider;

pub use http::{HttpImageApi, HttpImageApiBuilder};
pub use provider::ImageApi;
