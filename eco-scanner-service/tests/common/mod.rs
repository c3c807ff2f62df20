use eco_scanner_service::config::{EcoScannerConfig, GeminiSettings, LimitsConfig};
use eco_scanner_service::services::providers::mock::MockProvider;
use eco_scanner_service::startup::Application;
use service_core::config::Config as CoreConfig;
use std::sync::Arc;

pub struct TestApp {
    pub address: String,
    pub provider: Arc<MockProvider>,
    pub client: reqwest::Client,
}

pub fn test_config(limits: LimitsConfig) -> EcoScannerConfig {
    EcoScannerConfig {
        common: CoreConfig { port: 0 }, // Random port for testing
        gemini: GeminiSettings {
            api_key: "test-api-key".to_string(),
            model: "gemini-2.0-flash".to_string(),
            api_base: "http://127.0.0.1:9".to_string(),
            timeout_secs: 5,
        },
        limits,
    }
}

impl TestApp {
    pub async fn spawn(provider: MockProvider) -> Self {
        Self::spawn_with_limits(provider, LimitsConfig::default()).await
    }

    pub async fn spawn_with_limits(provider: MockProvider, limits: LimitsConfig) -> Self {
        let provider = Arc::new(provider);
        let app = Application::build_with_provider(test_config(limits), provider.clone())
            .await
            .expect("Failed to build test application");

        let address = format!("http://127.0.0.1:{}", app.port());

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to accept connections by polling health
        let client = reqwest::Client::new();
        let health_url = format!("{}/api/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(20)).await;
        }

        TestApp {
            address,
            provider,
            client,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }
}
