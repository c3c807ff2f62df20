//! eco-scanner-service: product photo / barcode analysis gateway.
pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
