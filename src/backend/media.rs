use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Serialize;
use tracing::debug;

use crate::error::{Result, RxVerifyError};

/// An image sent inline with a request, e.g. a photographed prescription.
///
/// The payload is held base64-encoded, the form the oracle's API expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaFile {
    pub mime_type: String,
    pub data: String,
}

impl MediaFile {
    /// Wrap already-encoded base64 data.
    pub fn from_base64(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    pub fn from_bytes(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: BASE64.encode(bytes),
        }
    }

    /// Read an image file. The mime type is sniffed from the file's magic
    /// bytes, falling back to its extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            RxVerifyError::ValidationError(format!(
                "Could not read image {}: {}",
                path.display(),
                e
            ))
        })?;

        let mime_type = infer::get(&bytes)
            .map(|kind| kind.mime_type().to_string())
            .or_else(|| {
                mime_guess::from_path(path)
                    .first()
                    .map(|mime| mime.essence_str().to_string())
            })
            .filter(|mime| mime.starts_with("image/"))
            .ok_or_else(|| {
                RxVerifyError::ValidationError(format!(
                    "Unsupported image type: {}",
                    path.display()
                ))
            })?;
        debug!(path = %path.display(), mime_type = %mime_type, "Loaded image");

        Ok(Self::from_bytes(&bytes, mime_type))
    }

    /// An image payload is usable when it has data and an `image/*` type.
    pub fn validate(&self) -> Result<()> {
        if self.data.is_empty() {
            return Err(RxVerifyError::ValidationError(
                "Image data cannot be empty".to_string(),
            ));
        }
        if !self.mime_type.starts_with("image/") {
            return Err(RxVerifyError::ValidationError(format!(
                "Expected an image, got '{}'",
                self.mime_type
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes_encodes_base64() {
        let media = MediaFile::from_bytes(b"abc", "image/png");
        assert_eq!(media.data, "YWJj");
        assert!(media.validate().is_ok());
    }

    #[test]
    fn test_serializes_as_inline_data() {
        let media = MediaFile::from_bytes(b"abc", "image/png");
        let json = serde_json::to_value(&media).unwrap();
        assert_eq!(json, serde_json::json!({"mimeType": "image/png", "data": "YWJj"}));
    }

    #[test]
    fn test_rejects_empty_and_non_image() {
        assert!(MediaFile::from_base64("", "image/png").validate().is_err());
        assert!(MediaFile::from_bytes(b"%PDF", "application/pdf").validate().is_err());
    }

    fn scratch_file(name: &str, bytes: &[u8]) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("rxverify-media-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    const JPEG_HEADER: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00];
    const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00];

    #[test]
    fn test_from_path_sniffs_content_over_extension() {
        let path = scratch_file("mislabelled.png", JPEG_HEADER);
        let media = MediaFile::from_path(&path).unwrap();
        assert_eq!(media.mime_type, "image/jpeg");
        assert_eq!(media.data, BASE64.encode(JPEG_HEADER));
    }

    #[test]
    fn test_from_path_without_extension() {
        let path = scratch_file("scan", PNG_HEADER);
        assert_eq!(MediaFile::from_path(&path).unwrap().mime_type, "image/png");
    }

    #[test]
    fn test_from_path_falls_back_to_extension() {
        let path = scratch_file("photo.webp", b"not really an image");
        assert_eq!(MediaFile::from_path(&path).unwrap().mime_type, "image/webp");
    }

    #[test]
    fn test_from_path_rejects_non_images() {
        let path = scratch_file("notes.txt", b"Ibuprofen 400 mg");
        let err = MediaFile::from_path(&path).unwrap_err();
        assert!(matches!(err, RxVerifyError::ValidationError(_)));

        let path = scratch_file("report.png", b"%PDF-1.7\n");
        let err = MediaFile::from_path(&path).unwrap_err();
        assert!(err.to_string().contains("Unsupported image type"));
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = MediaFile::from_path("no-such-prescription.jpg").unwrap_err();
        assert!(err.to_string().contains("Could not read image"));
    }
}
