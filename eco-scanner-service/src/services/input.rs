//! Request input normalization.
//!
//! `POST /api/analyze` takes either a multipart upload (field `image`) or a
//! JSON body `{image, mimeType?}` carrying base64 or a data URI. Both end up
//! as an [`ImagePayload`].

use crate::config::LimitsConfig;
use crate::models::{BarcodeBody, ImageBody, ImagePayload};
use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRef, FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::HeaderMap;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use once_cell::sync::Lazy;
use regex::Regex;
use service_core::error::AppError;
use thiserror::Error;

pub const DEFAULT_MIME_TYPE: &str = "image/jpeg";

pub const NO_IMAGE_MESSAGE: &str = "No image provided. Send as file upload or base64 in body.";

pub const NO_BARCODE_MESSAGE: &str = "No barcode provided";

static DATA_URI_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^data:[^;]+;base64,").expect("data URI pattern is valid"));

#[derive(Debug, Error)]
pub enum InputError {
    #[error("{}", NO_IMAGE_MESSAGE)]
    NoImage,

    #[error("{}", NO_BARCODE_MESSAGE)]
    NoBarcode,

    #[error("Image exceeds the {limit} byte upload limit")]
    TooLarge { limit: usize },

    #[error("Image is empty")]
    EmptyImage,

    #[error("{0}")]
    Malformed(String),
}

impl From<InputError> for AppError {
    fn from(err: InputError) -> Self {
        match err {
            InputError::TooLarge { .. } => AppError::Rejected {
                context: "File too large",
                source: anyhow::Error::new(err),
            },
            InputError::Malformed(_) => AppError::Rejected {
                context: "Invalid request body",
                source: anyhow::Error::new(err),
            },
            other => AppError::BadRequest(anyhow::Error::new(other)),
        }
    }
}

impl ImagePayload {
    /// Build a payload from raw uploaded bytes.
    pub fn from_upload(bytes: &[u8], content_type: Option<&str>) -> Result<Self, InputError> {
        if bytes.is_empty() {
            return Err(InputError::EmptyImage);
        }

        Ok(Self {
            data: STANDARD.encode(bytes),
            mime_type: mime_or_default(content_type),
        })
    }

    /// Build a payload from a base64 string, dropping any `data:<mime>;base64,`
    /// prefix. The prefix's mime type is not consulted.
    pub fn from_base64(image: &str, mime_type: Option<&str>) -> Result<Self, InputError> {
        let data = DATA_URI_PREFIX.replace(image, "");
        if data.is_empty() {
            return Err(InputError::EmptyImage);
        }

        Ok(Self {
            data: data.into_owned(),
            mime_type: mime_or_default(mime_type),
        })
    }
}

fn mime_or_default(mime_type: Option<&str>) -> String {
    mime_type
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or(DEFAULT_MIME_TYPE)
        .to_string()
}

/// Image fields gathered from whichever body format the client used.
#[derive(Debug, Default)]
struct ImageFields {
    upload: Option<ImagePayload>,
    image: Option<String>,
    mime_type: Option<String>,
}

impl ImageFields {
    fn into_payload(self) -> Result<ImagePayload, InputError> {
        if let Some(upload) = self.upload {
            return Ok(upload);
        }

        match self.image.filter(|image| !image.is_empty()) {
            Some(image) => ImagePayload::from_base64(&image, self.mime_type.as_deref()),
            None => Err(InputError::NoImage),
        }
    }
}

impl From<ImageBody> for ImageFields {
    fn from(body: ImageBody) -> Self {
        Self {
            upload: None,
            image: body.image,
            mime_type: body.mime_type,
        }
    }
}

/// Read the multipart form, enforcing `limit` on the `image` file while it
/// streams in. Text fields `image` and `mimeType` are honoured as well.
async fn read_multipart(mut multipart: Multipart, limit: usize) -> Result<ImageFields, InputError> {
    let mut fields = ImageFields::default();

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| InputError::Malformed(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" if field.file_name().is_some() => {
                if fields.upload.is_some() {
                    continue;
                }

                let content_type = field.content_type().map(str::to_string);
                let mut buffer = Vec::new();
                while let Some(chunk) = field
                    .chunk()
                    .await
                    .map_err(|e| InputError::Malformed(e.body_text()))?
                {
                    if buffer.len() + chunk.len() > limit {
                        return Err(InputError::TooLarge { limit });
                    }
                    buffer.extend_from_slice(&chunk);
                }

                fields.upload = Some(ImagePayload::from_upload(&buffer, content_type.as_deref())?);
            }
            "image" => {
                fields.image = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| InputError::Malformed(e.body_text()))?,
                );
            }
            "mimeType" => {
                fields.mime_type = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| InputError::Malformed(e.body_text()))?,
                );
            }
            _ => {}
        }
    }

    Ok(fields)
}

/// Parse a JSON body. Bodies that are blank or not declared as JSON are
/// treated as empty, leaving every field unset.
fn read_json<T>(headers: &HeaderMap, bytes: &[u8]) -> Result<T, InputError>
where
    T: serde::de::DeserializeOwned + Default,
{
    if !is_json(headers) || bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }

    serde_json::from_slice(bytes).map_err(|e| InputError::Malformed(e.to_string()))
}

/// Parse the barcode route's body and pull out the barcode.
pub fn barcode_from_body(headers: &HeaderMap, bytes: &[u8]) -> Result<String, InputError> {
    read_json::<BarcodeBody>(headers, bytes)?
        .barcode()
        .ok_or(InputError::NoBarcode)
}

/// Lowercased media type of the request without parameters.
fn media_type(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(CONTENT_TYPE)?.to_str().ok()?;
    let essence = value.split(';').next().unwrap_or_default();
    Some(essence.trim().to_ascii_lowercase())
}

fn is_json(headers: &HeaderMap) -> bool {
    media_type(headers)
        .map(|mt| {
            mt == "application/json" || (mt.starts_with("application/") && mt.ends_with("+json"))
        })
        .unwrap_or(false)
}

fn is_multipart(headers: &HeaderMap) -> bool {
    media_type(headers).as_deref() == Some("multipart/form-data")
}

/// Extractor yielding the normalized image of an analyze request.
#[derive(Debug)]
pub struct AnalyzeInput(pub ImagePayload);

#[async_trait]
impl<S> FromRequest<S> for AnalyzeInput
where
    S: Send + Sync,
    LimitsConfig: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let limits = LimitsConfig::from_ref(state);

        let fields = if is_multipart(req.headers()) {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| InputError::Malformed(e.body_text()))?;
            read_multipart(multipart, limits.max_upload_bytes).await?
        } else {
            let headers = req.headers().clone();
            let bytes = Bytes::from_request(req, state)
                .await
                .map_err(|e| InputError::Malformed(e.body_text()))?;
            ImageFields::from(read_json::<ImageBody>(&headers, &bytes)?)
        };

        Ok(AnalyzeInput(fields.into_payload()?))
    }
}
