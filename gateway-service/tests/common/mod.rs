#![allow(dead_code)]

use gateway_service::config::{
    GatewayConfig, GoogleConfig, ModelConfig, UploadConfig, DEFAULT_GEMINI_API_BASE,
    DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_MODEL,
};
use gateway_service::services::providers::mock::MockProvider;
use gateway_service::services::providers::GenerationProvider;
use gateway_service::startup::Application;
use reqwest::multipart;
use service_core::config::Config as CoreConfig;
use std::sync::Arc;

/// Smallest valid PNG: signature plus IHDR/IDAT/IEND for a 1x1 pixel.
pub const PNG_BYTES: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

/// A few bytes of an MP3 frame header; content is never inspected.
pub const MP3_BYTES: &[u8] = &[0x49, 0x44, 0x33, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF];

/// Configuration for tests: random port, error passthrough on.
pub fn test_config() -> GatewayConfig {
    GatewayConfig {
        common: CoreConfig { port: 0 },
        google: GoogleConfig {
            api_key: "test-api-key".to_string(),
            api_base: DEFAULT_GEMINI_API_BASE.to_string(),
        },
        models: ModelConfig {
            model: DEFAULT_MODEL.to_string(),
        },
        uploads: UploadConfig {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            expose_provider_errors: true,
        },
    }
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub client: reqwest::Client,
}

impl TestApp {
    /// Spawn the gateway with the default test configuration.
    pub async fn spawn(provider: Arc<MockProvider>) -> Self {
        Self::spawn_with_config(test_config(), provider).await
    }

    /// Spawn the gateway on a random port around `provider`.
    pub async fn spawn_with_config(config: GatewayConfig, provider: Arc<dyn GenerationProvider>) -> Self {
        let app = Application::build_with_provider(config, provider)
            .await
            .expect("Failed to build test application");

        let port = app.port();

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to answer
        let client = reqwest::Client::new();
        let health_url = format!("http://127.0.0.1:{}/health", port);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(20)).await;
        }

        TestApp {
            address: format!("http://127.0.0.1:{}", port),
            port,
            client,
        }
    }

    /// POST a multipart form to `path`.
    pub async fn post_form(&self, path: &str, form: multipart::Form) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.address, path))
            .multipart(form)
            .send()
            .await
            .expect("Failed to execute request")
    }
}

/// A file part with the given name; the declared content type is ignored by
/// the gateway, which goes by the filename.
pub fn file_part(bytes: &[u8], filename: &str) -> multipart::Part {
    multipart::Part::bytes(bytes.to_vec())
        .file_name(filename.to_string())
        .mime_str("application/octet-stream")
        .unwrap()
}
