//! The base image: where the bytes for the next edit come from.

use crate::error::Result;
use crate::image::types::{DataUri, ImageFile, DEFAULT_FILE_NAME, PNG_MEDIA_TYPE};

/// The image currently designated as input to the edit flow.
///
/// An upload always wins over a generated image: generating replaces the
/// source with [`ImageSource::Generated`], and selecting a file replaces it
/// with [`ImageSource::Uploaded`], so only one can be authoritative.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ImageSource {
    /// A file chosen by the user, kept verbatim.
    Uploaded {
        /// The raw file, sent as is on edit.
        file: ImageFile,
        /// Displayable preview of the file.
        preview: DataUri,
    },
    /// The most recent generation result.
    Generated(DataUri),
    /// Nothing generated or uploaded yet.
    #[default]
    Empty,
}

impl ImageSource {
    /// Wraps an uploaded file, building its preview.
    pub fn uploaded(file: ImageFile) -> Self {
        let preview = file.to_data_uri();
        Self::Uploaded { file, preview }
    }

    /// Returns the displayable handle for the base image, if any.
    pub fn preview(&self) -> Option<&DataUri> {
        match self {
            Self::Uploaded { preview, .. } => Some(preview),
            Self::Generated(uri) => Some(uri),
            Self::Empty => None,
        }
    }

    /// Returns the uploaded file, if the source is an upload.
    pub fn uploaded_file(&self) -> Option<&ImageFile> {
        match self {
            Self::Uploaded { file, .. } => Some(file),
            _ => None,
        }
    }

    /// Resolves the file to send with an edit request.
    ///
    /// `Ok(None)` means there is no image at all; callers report that as a
    /// validation failure. An error means the generated preview could not
    /// be decoded.
    pub fn resolve(&self) -> Result<Option<ImageFile>> {
        match self {
            Self::Uploaded { file, .. } => Ok(Some(file.clone())),
            Self::Generated(uri) => {
                let data = uri.decode()?;
                let media_type = if uri.media_type().is_empty() {
                    PNG_MEDIA_TYPE
                } else {
                    uri.media_type()
                };
                Ok(Some(ImageFile::new(DEFAULT_FILE_NAME, media_type, data)))
            }
            Self::Empty => Ok(None),
        }
    }
}
