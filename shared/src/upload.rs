//! Image payloads and the encoders that turn them into request bodies.
//!
//! The prediction endpoint accepts two encodings. Which one a caller uses is
//! decided by its [`Platform`]: each platform has a [`Capability`], and the
//! [`EncoderRegistry`] maps capabilities to [`UploadEncoder`]s.

use std::collections::HashMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::MAX_UPLOAD_BYTES;
use crate::error::ValidationError;

pub const FILE_FIELD: &str = "file";
pub const DEFAULT_FILE_NAME: &str = "leaf.jpg";
pub const DEFAULT_CONTENT_TYPE: &str = "image/jpeg";
pub const ACCEPTED_TYPES: [&str; 2] = ["image/jpeg", "image/png"];

#[derive(Debug, Clone, PartialEq)]
pub enum ImageContent {
    Bytes(Vec<u8>),
    /// Base64 text as handed over by a picker, possibly data-URI prefixed.
    Base64(String),
}

/// An image the user selected and has not uploaded yet.
#[derive(Debug, Clone, PartialEq)]
pub struct PickedImage {
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
    pub content: ImageContent,
}

impl PickedImage {
    pub fn from_bytes(
        file_name: Option<String>,
        mime_type: Option<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: non_empty(file_name),
            mime_type: non_empty(mime_type),
            content: ImageContent::Bytes(bytes),
        }
    }

    pub fn from_base64(
        file_name: Option<String>,
        mime_type: Option<String>,
        data: impl Into<String>,
    ) -> Self {
        Self {
            file_name: non_empty(file_name),
            mime_type: non_empty(mime_type),
            content: ImageContent::Base64(data.into()),
        }
    }

    /// Payload size in bytes; decoded size for base64 content.
    pub fn size(&self) -> u64 {
        match &self.content {
            ImageContent::Bytes(bytes) => bytes.len() as u64,
            ImageContent::Base64(data) => {
                let payload = strip_data_uri(data).trim_end_matches('=');
                (payload.len() as u64 * 3) / 4
            }
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Drops a `data:<mime>;base64,` prefix if there is one.
pub fn strip_data_uri(data: &str) -> &str {
    if data.starts_with("data:") {
        if let Some((_, payload)) = data.split_once(',') {
            return payload;
        }
    }
    data
}

/// Pre-flight check for the browser form: JPEG or PNG, at most 10 MB.
pub fn validate_web_upload(image: Option<&PickedImage>) -> Result<&PickedImage, ValidationError> {
    let image = image.ok_or(ValidationError::NoSelection)?;
    check_type_and_size(image.mime_type.as_deref(), image.size())?;
    Ok(image)
}

pub fn check_type_and_size(mime_type: Option<&str>, size: u64) -> Result<(), ValidationError> {
    let mime = mime_type.unwrap_or_default();
    if !ACCEPTED_TYPES.contains(&mime) {
        return Err(ValidationError::UnsupportedType(mime.to_string()));
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(ValidationError::TooLarge {
            size,
            limit: MAX_UPLOAD_BYTES,
        });
    }
    Ok(())
}

/// One binary form part.
#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    pub field: &'static str,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Base64Body {
    pub image_base64: String,
}

/// Transport-neutral request body; the caller maps it onto its HTTP client.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadBody {
    Multipart(FilePart),
    Json(Base64Body),
}

pub trait UploadEncoder {
    fn encode(&self, image: &PickedImage) -> Result<UploadBody, ValidationError>;
}

/// `multipart/form-data` with the image under the `file` field.
#[derive(Debug, Clone, Copy, Default)]
pub struct MultipartEncoder;

impl UploadEncoder for MultipartEncoder {
    fn encode(&self, image: &PickedImage) -> Result<UploadBody, ValidationError> {
        let bytes = match &image.content {
            ImageContent::Bytes(bytes) => bytes.clone(),
            ImageContent::Base64(data) => STANDARD
                .decode(strip_data_uri(data).trim())
                .map_err(|e| ValidationError::InvalidBase64(e.to_string()))?,
        };

        Ok(UploadBody::Multipart(FilePart {
            field: FILE_FIELD,
            file_name: image
                .file_name
                .clone()
                .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string()),
            content_type: image
                .mime_type
                .clone()
                .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
            bytes,
        }))
    }
}

/// JSON `{ "image_base64": ... }` carrying the bare payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base64JsonEncoder;

impl UploadEncoder for Base64JsonEncoder {
    fn encode(&self, image: &PickedImage) -> Result<UploadBody, ValidationError> {
        let payload = match &image.content {
            ImageContent::Base64(data) => strip_data_uri(data).trim().to_string(),
            ImageContent::Bytes(bytes) => STANDARD.encode(bytes),
        };
        if payload.is_empty() {
            return Err(ValidationError::MissingPayload);
        }
        Ok(UploadBody::Json(Base64Body {
            image_base64: payload,
        }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Capability {
    /// Can hand the HTTP client a file or byte blob.
    BinaryForm,
    /// Only has the image as text.
    InlineBase64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Platform {
    /// Native HTTP client with direct file access.
    Native,
    /// Browser `<input type="file">`.
    BrowserFileInput,
    /// Browser image picker that only yields base64.
    BrowserPicker,
}

impl Platform {
    pub fn capability(self) -> Capability {
        match self {
            Platform::Native | Platform::BrowserFileInput => Capability::BinaryForm,
            Platform::BrowserPicker => Capability::InlineBase64,
        }
    }
}

pub struct EncoderRegistry {
    encoders: HashMap<Capability, Box<dyn UploadEncoder + Send + Sync>>,
}

impl EncoderRegistry {
    pub fn empty() -> Self {
        Self {
            encoders: HashMap::new(),
        }
    }

    pub fn register(
        &mut self,
        capability: Capability,
        encoder: impl UploadEncoder + Send + Sync + 'static,
    ) -> &mut Self {
        self.encoders.insert(capability, Box::new(encoder));
        self
    }

    pub fn encoder_for(&self, platform: Platform) -> Result<&dyn UploadEncoder, ValidationError> {
        self.encoders
            .get(&platform.capability())
            .map(|encoder| encoder.as_ref() as &dyn UploadEncoder)
            .ok_or_else(|| ValidationError::NoEncoder(platform.to_string()))
    }

    pub fn encode(
        &self,
        platform: Platform,
        image: &PickedImage,
    ) -> Result<UploadBody, ValidationError> {
        self.encoder_for(platform)?.encode(image)
    }
}

impl Default for EncoderRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry
            .register(Capability::BinaryForm, MultipartEncoder)
            .register(Capability::InlineBase64, Base64JsonEncoder);
        registry
    }
}
