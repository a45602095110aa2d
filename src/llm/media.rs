use std::io::Cursor;
use std::path::Path;

use base64::{engine::general_purpose, Engine as _};
use image::ImageFormat;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::llm::error::StudioError;

pub fn detect_mime_type(data: &[u8]) -> Option<String> {
    if data.len() > 12 {
        let ftyp = &data[4..12];
        if ftyp.starts_with(b"ftyp") {
            let brand = &ftyp[4..8];
            if brand == b"heic" || brand == b"heif" || brand == b"hevc" {
                return Some("image/heic".to_string());
            }
        }
    }

    infer::get(data).map(|kind| kind.mime_type().to_string())
}

pub fn normalize_image_mime_type(mime_type: &str) -> String {
    let lowered = mime_type.trim().to_ascii_lowercase();
    match lowered.as_str() {
        "image/jpg" => "image/jpeg".to_string(),
        _ => lowered,
    }
}

pub fn extension_for_mime(mime_type: &str) -> &'static str {
    match mime_type {
        "image/png" => "png",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "image/heic" => "heic",
        _ => "jpg",
    }
}

/// An uploaded source, reference, or portrait image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageFile {
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub mime_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl ImageFile {
    /// Accepts a `(bytes, mime)` pair only when it holds an image.
    ///
    /// Sniffed content wins over the declared type; a declared non-image type
    /// with no recognisable content is rejected.
    pub fn from_bytes(
        bytes: Vec<u8>,
        declared_mime: Option<&str>,
        display_name: Option<String>,
    ) -> Result<Self, StudioError> {
        if bytes.is_empty() {
            return Err(StudioError::UnsupportedMedia("empty file".to_string()));
        }

        let detected = detect_mime_type(&bytes);
        let mime_type = match (detected, declared_mime) {
            (Some(detected), _) => detected,
            (None, Some(declared)) => declared.to_string(),
            (None, None) => {
                return Err(StudioError::UnsupportedMedia(
                    "unrecognised file content".to_string(),
                ))
            }
        };
        let mime_type = normalize_image_mime_type(&mime_type);
        if !mime_type.starts_with("image/") {
            return Err(StudioError::UnsupportedMedia(mime_type));
        }

        Ok(ImageFile {
            bytes,
            mime_type,
            display_name,
        })
    }

    pub async fn load(path: &Path) -> Result<Self, StudioError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|err| StudioError::Io(format!("{}: {err}", path.display())))?;
        let display_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string());
        let file = ImageFile::from_bytes(bytes, None, display_name)?;
        debug!(
            "Loaded image {} ({} bytes, {})",
            path.display(),
            file.bytes.len(),
            file.mime_type
        );
        Ok(file)
    }

    pub fn base64(&self) -> String {
        general_purpose::STANDARD.encode(&self.bytes)
    }
}

/// Image bytes returned by the remote model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedImage {
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl GeneratedImage {
    pub fn from_base64(data: &str, mime_type: &str) -> Option<Self> {
        let bytes = general_purpose::STANDARD.decode(data.trim()).ok()?;
        if bytes.is_empty() {
            return None;
        }
        Some(GeneratedImage {
            bytes,
            mime_type: normalize_image_mime_type(mime_type),
        })
    }

    pub fn as_image_file(&self) -> ImageFile {
        ImageFile {
            bytes: self.bytes.clone(),
            mime_type: self.mime_type.clone(),
            display_name: None,
        }
    }

    pub fn extension(&self) -> &'static str {
        extension_for_mime(&self.mime_type)
    }

    /// Re-encodes as PNG so transparent exports keep an alpha channel.
    pub fn into_png(self) -> Self {
        if self.mime_type == "image/png" {
            return self;
        }
        let decoded = match image::load_from_memory(&self.bytes) {
            Ok(decoded) => decoded,
            Err(err) => {
                warn!("Could not decode {} output for PNG export: {}", self.mime_type, err);
                return self;
            }
        };
        let mut buffer = Cursor::new(Vec::new());
        if let Err(err) = decoded.to_rgba8().write_to(&mut buffer, ImageFormat::Png) {
            warn!("Could not encode PNG export: {}", err);
            return self;
        }
        GeneratedImage {
            bytes: buffer.into_inner(),
            mime_type: "image/png".to_string(),
        }
    }
}
