use eco_scanner_service::config::EcoScannerConfig;
use eco_scanner_service::startup::Application;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    let otlp_endpoint = std::env::var("OTLP_ENDPOINT").ok();
    init_tracing("eco-scanner-service", "info", otlp_endpoint.as_deref());

    let config = EcoScannerConfig::load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to build application: {}", e);
        std::io::Error::other(format!("Startup error: {}", e))
    })?;

    let port = app.port();
    tracing::info!(port, "Eco Scanner backend running on http://localhost:{}", port);
    tracing::info!("POST /api/analyze         (image upload or base64)");
    tracing::info!("POST /api/analyze-barcode (barcode string)");
    tracing::info!("GET  /api/health          (health check)");

    app.run_until_stopped().await
}
