//! HTTP handlers for the eco-scanner service.

pub mod analyze;
pub mod health;

pub use analyze::{analyze_barcode, analyze_image};
pub use health::health_check;
