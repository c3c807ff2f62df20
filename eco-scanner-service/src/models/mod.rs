pub mod request;

pub use request::{AnalysisRequest, BarcodeBody, HealthResponse, ImageBody, ImagePayload};
