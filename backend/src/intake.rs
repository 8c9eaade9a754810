//! Turns an incoming `POST /predict-disease` body into a [`PickedImage`].
//!
//! Browsers send either a multipart form (field `file`, or `image`) or JSON
//! `{ "image_base64": ... }`. Both end up as raw bytes that are sniffed and
//! size-checked here, so nothing invalid is forwarded upstream.

use actix_multipart::Multipart;
use actix_web::HttpRequest;
use actix_web::http::header::CONTENT_TYPE;
use actix_web::web;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use futures::{StreamExt, TryStreamExt};
use image::ImageFormat;
use shared::upload::{Base64Body, strip_data_uri};
use shared::{MAX_UPLOAD_BYTES, PickedImage, ValidationError};

use crate::error::GatewayError;

const FILE_FIELDS: [&str; 2] = ["file", "image"];

/// Raw body cap; base64 inflates a 10 MB image by a third.
pub const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

pub async fn read_upload(
    req: &HttpRequest,
    payload: web::Payload,
) -> Result<PickedImage, GatewayError> {
    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    let image = if content_type.starts_with("multipart/form-data") {
        read_multipart(Multipart::new(req.headers(), payload)).await?
    } else if content_type.contains("application/json") {
        let body = collect_body(payload).await?;
        parse_json_upload(&body)?
    } else {
        return Err(GatewayError::BadRequest(
            "No image sent (use 'file' or 'image' form field, or 'image_base64' JSON)".into(),
        ));
    };

    check_image(image)
}

async fn collect_body(mut payload: web::Payload) -> Result<Vec<u8>, GatewayError> {
    let mut body = Vec::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|e| GatewayError::BadRequest(e.to_string()))?;
        if body.len() + chunk.len() > MAX_BODY_BYTES {
            return Err(GatewayError::TooLarge);
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

async fn read_multipart(mut multipart: Multipart) -> Result<PickedImage, GatewayError> {
    while let Some(mut field) = multipart.try_next().await? {
        let disposition = field.content_disposition().cloned();
        let name = disposition
            .as_ref()
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();
        if !FILE_FIELDS.contains(&name.as_str()) {
            continue;
        }

        let file_name = disposition
            .as_ref()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);
        let mime_type = field.content_type().map(|m| m.essence_str().to_string());

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk?;
            if bytes.len() + chunk.len() > MAX_BODY_BYTES {
                return Err(GatewayError::TooLarge);
            }
            bytes.extend_from_slice(&chunk);
        }
        return Ok(PickedImage::from_bytes(file_name, mime_type, bytes));
    }

    Err(GatewayError::BadRequest(
        "No image sent (use 'file' or 'image' form field, or 'image_base64' JSON)".into(),
    ))
}

pub fn parse_json_upload(body: &[u8]) -> Result<PickedImage, GatewayError> {
    let request: Base64Body = serde_json::from_slice(body)
        .map_err(|e| GatewayError::BadRequest(format!("Invalid JSON: {}", e)))?;
    let payload = strip_data_uri(&request.image_base64).trim();
    if payload.is_empty() {
        return Err(ValidationError::MissingPayload.into());
    }
    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| ValidationError::InvalidBase64(e.to_string()))?;
    Ok(PickedImage::from_bytes(None, None, bytes))
}

/// Enforces the size cap and fills in name and type from the image bytes.
pub fn check_image(upload: PickedImage) -> Result<PickedImage, GatewayError> {
    let size = upload.size();
    if size > MAX_UPLOAD_BYTES {
        return Err(ValidationError::TooLarge {
            size,
            limit: MAX_UPLOAD_BYTES,
        }
        .into());
    }

    let shared::ImageContent::Bytes(bytes) = &upload.content else {
        return Ok(upload);
    };
    let (mime, extension) = match image::guess_format(bytes) {
        Ok(ImageFormat::Jpeg) => ("image/jpeg", "jpg"),
        Ok(ImageFormat::Png) => ("image/png", "png"),
        _ => {
            return Err(ValidationError::UnsupportedType(
                upload.mime_type.clone().unwrap_or_default(),
            )
            .into());
        }
    };

    let file_name = upload
        .file_name
        .clone()
        .unwrap_or_else(|| format!("upload.{}", extension));
    Ok(PickedImage {
        file_name: Some(file_name),
        mime_type: Some(mime.to_string()),
        content: upload.content,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ImageContent;

    const JPEG_MAGIC: [u8; 4] = [0xff, 0xd8, 0xff, 0xe0];
    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

    #[test]
    fn json_upload_decodes_payload() {
        let image = parse_json_upload(br#"{"image_base64":"data:image/jpeg;base64,/9j/4A=="}"#)
            .unwrap();
        assert_eq!(image.content, ImageContent::Bytes(JPEG_MAGIC.to_vec()));
    }

    #[test]
    fn json_upload_requires_payload() {
        let err = parse_json_upload(br#"{"image_base64":""}"#).unwrap_err();
        assert!(matches!(err, GatewayError::BadRequest(_)));
        assert!(parse_json_upload(b"not json").is_err());
    }

    #[test]
    fn sniffed_type_overrides_claimed_type() {
        let image = PickedImage::from_bytes(None, Some("application/octet-stream".into()), PNG_MAGIC.to_vec());
        let checked = check_image(image).unwrap();
        assert_eq!(checked.mime_type.as_deref(), Some("image/png"));
        assert_eq!(checked.file_name.as_deref(), Some("upload.png"));
    }

    #[test]
    fn keeps_client_file_name() {
        let image = PickedImage::from_bytes(Some("tomato.jpg".into()), None, JPEG_MAGIC.to_vec());
        let checked = check_image(image).unwrap();
        assert_eq!(checked.file_name.as_deref(), Some("tomato.jpg"));
        assert_eq!(checked.mime_type.as_deref(), Some("image/jpeg"));
    }

    #[test]
    fn rejects_non_images_and_oversized_uploads() {
        let gif = PickedImage::from_bytes(None, Some("image/gif".into()), b"GIF89a....".to_vec());
        assert!(matches!(check_image(gif), Err(GatewayError::BadRequest(_))));

        let mut big = PNG_MAGIC.to_vec();
        big.resize(11 * 1024 * 1024, 0);
        let big = PickedImage::from_bytes(None, None, big);
        assert!(matches!(check_image(big), Err(GatewayError::TooLarge)));
    }
}
