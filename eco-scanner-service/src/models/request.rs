use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An image ready to be sent to the model: base64 data plus its mime type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub data: String,
    pub mime_type: String,
}

/// One analysis job. Exactly one kind of input is ever present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisRequest {
    Image(ImagePayload),
    Barcode(String),
}

impl AnalysisRequest {
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisRequest::Image(_) => "image",
            AnalysisRequest::Barcode(_) => "barcode",
        }
    }
}

/// JSON body accepted by `POST /api/analyze`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageBody {
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
}

/// JSON body accepted by `POST /api/analyze-barcode`.
///
/// Barcodes arrive as strings from scanners but some clients send numbers or
/// booleans. Falsy scalars (`""`, `0`, `false`, `null`) count as missing;
/// arrays and objects are never a barcode.
#[derive(Debug, Default, Deserialize)]
pub struct BarcodeBody {
    #[serde(default)]
    pub barcode: Option<Value>,
}

impl BarcodeBody {
    pub fn barcode(&self) -> Option<String> {
        match self.barcode.as_ref()? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
            Value::Bool(true) => Some("true".to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn barcode_of(json: &str) -> Option<String> {
        serde_json::from_str::<BarcodeBody>(json).unwrap().barcode()
    }

    #[test]
    fn barcode_accepts_strings_and_numbers() {
        assert_eq!(barcode_of(r#"{"barcode":"8901030895557"}"#).as_deref(), Some("8901030895557"));
        assert_eq!(barcode_of(r#"{"barcode":8901030895557}"#).as_deref(), Some("8901030895557"));
    }

    #[test]
    fn empty_or_missing_barcode_is_none() {
        assert_eq!(barcode_of(r#"{}"#), None);
        assert_eq!(barcode_of(r#"{"barcode":""}"#), None);
        assert_eq!(barcode_of(r#"{"barcode":null}"#), None);
        assert_eq!(barcode_of(r#"{"barcode":false}"#), None);
    }

    #[test]
    fn barcode_follows_truthiness_of_scalars() {
        assert_eq!(barcode_of(r#"{"barcode":0}"#), None);
        assert_eq!(barcode_of(r#"{"barcode":0.0}"#), None);
        assert_eq!(barcode_of(r#"{"barcode":-0.0}"#), None);
        assert_eq!(barcode_of(r#"{"barcode":true}"#).as_deref(), Some("true"));
        assert_eq!(barcode_of(r#"{"barcode":42}"#).as_deref(), Some("42"));
        assert_eq!(barcode_of(r#"{"barcode":["1"]}"#), None);
        assert_eq!(barcode_of(r#"{"barcode":{"code":"1"}}"#), None);
    }

    #[test]
    fn image_body_reads_camel_case_mime_type() {
        let body: ImageBody =
            serde_json::from_str(r#"{"image":"aGk=","mimeType":"image/webp"}"#).unwrap();
        assert_eq!(body.image.as_deref(), Some("aGk="));
        assert_eq!(body.mime_type.as_deref(), Some("image/webp"));
    }
}
