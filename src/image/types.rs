//! Core image types: sizes, data URIs and files.

use crate::error::{Result, StudioError};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Media type used for images returned by the API.
pub const PNG_MEDIA_TYPE: &str = "image/png";

/// Media type for uploads whose format cannot be detected.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// File name given to a generated image when it is sent back for editing.
pub const DEFAULT_FILE_NAME: &str = "image.png";

/// Image formats recognized from file extensions and magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    /// PNG format (lossless).
    #[default]
    Png,
    /// JPEG format (lossy).
    Jpeg,
    /// WebP format.
    WebP,
}

impl ImageFormat {
    /// Returns the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::WebP => "image/webp",
        }
    }

    /// Attempts to detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "webp" => Some(Self::WebP),
            _ => None,
        }
    }

    /// Detects image format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(Self::Png);
        }
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }
        if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
            return Some(Self::WebP);
        }
        None
    }
}

/// Target size for a generated image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ImageSize {
    /// 1024 x 1024 square.
    #[default]
    #[serde(rename = "1024x1024")]
    Square,
    /// 1536 x 1024 landscape.
    #[serde(rename = "1536x1024")]
    Landscape,
    /// 1024 x 1536 portrait.
    #[serde(rename = "1024x1536")]
    Portrait,
    /// Let the model choose.
    #[serde(rename = "auto")]
    Auto,
}

impl ImageSize {
    /// All sizes, in the order they are offered to the user.
    pub const ALL: [ImageSize; 4] = [Self::Square, Self::Landscape, Self::Portrait, Self::Auto];

    /// Returns the wire label (e.g., "1536x1024").
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Square => "1024x1024",
            Self::Landscape => "1536x1024",
            Self::Portrait => "1024x1536",
            Self::Auto => "auto",
        }
    }

    /// Returns the label shown next to the option (e.g., "1536 x 1024").
    pub fn display_label(&self) -> &'static str {
        match self {
            Self::Square => "1024 x 1024",
            Self::Landscape => "1536 x 1024",
            Self::Portrait => "1024 x 1536",
            Self::Auto => "Auto",
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ImageSize {
    type Err = StudioError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace(' ', "");
        Self::ALL
            .into_iter()
            .find(|size| size.as_str() == normalized)
            .ok_or_else(|| StudioError::InvalidSize(s.to_string()))
    }
}

/// An image embedded inline as `data:<media>;base64,<payload>`.
///
/// The payload is kept exactly as received; it is only decoded when the
/// bytes are needed (editing, saving).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    media_type: String,
    payload: String,
}

impl DataUri {
    /// Creates a data URI from a media type and a base64 payload.
    pub fn new(media_type: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            media_type: media_type.into(),
            payload: payload.into(),
        }
    }

    /// Wraps a base64 payload returned by the API as `image/png`.
    pub fn png(payload: impl Into<String>) -> Self {
        Self::new(PNG_MEDIA_TYPE, payload)
    }

    /// Encodes raw bytes as a data URI.
    pub fn from_bytes(media_type: impl Into<String>, data: &[u8]) -> Self {
        Self::new(
            media_type,
            base64::engine::general_purpose::STANDARD.encode(data),
        )
    }

    /// The declared media type; empty when the URI omitted it.
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// The base64 payload, as received.
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Decodes the payload into raw bytes.
    pub fn decode(&self) -> Result<Vec<u8>> {
        decode_base64_lenient(&self.payload).map_err(|e| StudioError::Decode(e.to_string()))
    }

    /// Decodes the payload and writes it to `path`.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<usize> {
        let data = self.decode()?;
        tokio::fs::write(path, &data).await?;
        Ok(data.len())
    }
}

impl fmt::Display for DataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data:{};base64,{}", self.media_type, self.payload)
    }
}

/// A named binary file, as sent in the `image` part of an edit request.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageFile {
    /// File name reported to the server.
    pub name: String,
    /// MIME type of the part.
    pub media_type: String,
    /// Raw file contents.
    pub data: Vec<u8>,
}

impl ImageFile {
    /// Creates a file from its parts.
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            data,
        }
    }

    /// Creates a file, detecting the media type from the name, then the bytes.
    pub fn detect(name: impl Into<String>, data: Vec<u8>) -> Self {
        let name = name.into();
        let format = Path::new(&name)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(ImageFormat::from_extension)
            .or_else(|| ImageFormat::from_magic_bytes(&data));
        let media_type = format.map(|f| f.mime_type()).unwrap_or(OCTET_STREAM);
        Self::new(name, media_type, data)
    }

    /// Reads a file from disk, keeping its bytes verbatim.
    pub async fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(DEFAULT_FILE_NAME)
            .to_string();
        Ok(Self::detect(name, data))
    }

    /// Returns the size of the file in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Builds a previewable data URI from the file contents.
    pub fn to_data_uri(&self) -> DataUri {
        DataUri::from_bytes(self.media_type.clone(), &self.data)
    }
}

impl fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageFile")
            .field("name", &self.name)
            .field("media_type", &self.media_type)
            .field("size", &self.data.len())
            .finish()
    }
}

/// Decodes a base64 payload that may be imperfectly formatted.
///
/// Anything up to and including `;base64,` is dropped, so a whole
/// `data:image/png;base64,...` URI decodes to the same bytes as its payload.
/// Whitespace inside the payload is ignored and missing `=` padding is
/// tolerated.
pub(crate) fn decode_base64_lenient(
    input: &str,
) -> std::result::Result<Vec<u8>, base64::DecodeError> {
    let b64 = match input.find(";base64,") {
        Some(pos) => &input[pos + 8..],
        None => input,
    };

    let cleaned: String = b64.chars().filter(|c| !c.is_ascii_whitespace()).collect();

    if let Ok(data) = base64::engine::general_purpose::STANDARD.decode(&cleaned) {
        return Ok(data);
    }

    base64::engine::general_purpose::STANDARD_NO_PAD.decode(cleaned.trim_end_matches('='))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: [u8; 12] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
    const JPEG_MAGIC: [u8; 12] = [0xFF, 0xD8, 0xFF, 0xE0, 0, 0, 0, 0, 0, 0, 0, 0];
    const WEBP_MAGIC: [u8; 12] = *b"RIFF\x00\x00\x00\x00WEBP";

    #[test]
    fn test_format_from_magic_bytes() {
        assert_eq!(
            ImageFormat::from_magic_bytes(&PNG_MAGIC),
            Some(ImageFormat::Png)
        );
        assert_eq!(
            ImageFormat::from_magic_bytes(&JPEG_MAGIC),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(
            ImageFormat::from_magic_bytes(&WEBP_MAGIC),
            Some(ImageFormat::WebP)
        );
        assert_eq!(ImageFormat::from_magic_bytes(b"GIF89a"), None);
    }

    #[test]
    fn test_size_labels() {
        assert_eq!(ImageSize::default(), ImageSize::Square);
        assert_eq!(ImageSize::Landscape.as_str(), "1536x1024");
        assert_eq!(ImageSize::Auto.to_string(), "auto");
        assert_eq!(
            serde_json::to_value(ImageSize::Portrait).unwrap(),
            serde_json::json!("1024x1536")
        );
    }

    #[test]
    fn test_size_from_str() {
        assert_eq!("1024x1536".parse::<ImageSize>().unwrap(), ImageSize::Portrait);
        assert_eq!("1536 x 1024".parse::<ImageSize>().unwrap(), ImageSize::Landscape);
        assert_eq!("AUTO".parse::<ImageSize>().unwrap(), ImageSize::Auto);
        assert!(matches!(
            "512x512".parse::<ImageSize>(),
            Err(StudioError::InvalidSize(label)) if label == "512x512"
        ));
    }

    #[test]
    fn test_data_uri_passes_payload_through() {
        let uri = DataUri::png("AAA=");
        assert_eq!(uri.to_string(), "data:image/png;base64,AAA=");
        assert_eq!(uri.payload(), "AAA=");
    }

    #[test]
    fn test_decode_lenient() {
        assert_eq!(decode_base64_lenient("AQID").unwrap(), vec![1, 2, 3]);
        assert_eq!(decode_base64_lenient("AQ\nID").unwrap(), vec![1, 2, 3]);
        assert_eq!(decode_base64_lenient("AQIDBA").unwrap(), vec![1, 2, 3, 4]);
        assert_eq!(
            decode_base64_lenient("data:image/png;base64,AQID").unwrap(),
            vec![1, 2, 3]
        );
        assert_eq!(
            decode_base64_lenient("data:image/png;base64,AQ\r\nIDBA==").unwrap(),
            vec![1, 2, 3, 4]
        );
        assert!(decode_base64_lenient("!!!").is_err());
    }

    #[test]
    fn test_image_file_detect() {
        let file = ImageFile::detect("photo.JPG", vec![0, 1, 2]);
        assert_eq!(file.media_type, "image/jpeg");

        let file = ImageFile::detect("upload", PNG_MAGIC.to_vec());
        assert_eq!(file.media_type, "image/png");

        let file = ImageFile::detect("notes.txt", b"hello".to_vec());
        assert_eq!(file.media_type, OCTET_STREAM);
        assert_eq!(file.data, b"hello");
    }

    #[test]
    fn test_image_file_preview_round_trips_bytes() {
        let file = ImageFile::new("a.png", "image/png", vec![9, 8, 7]);
        let preview = file.to_data_uri();
        assert_eq!(preview.media_type(), "image/png");
        assert_eq!(preview.decode().unwrap(), vec![9, 8, 7]);
    }
}
