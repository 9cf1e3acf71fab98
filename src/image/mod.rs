//! Image values handled by the studio.

mod source;
mod types;

pub use source::ImageSource;
pub use types::{
    DataUri, ImageFile, ImageFormat, ImageSize, DEFAULT_FILE_NAME, OCTET_STREAM, PNG_MEDIA_TYPE,
};
