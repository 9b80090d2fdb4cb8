use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

/// Default request body cap (20 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub google: GoogleConfig,
    pub models: ModelConfig,
    pub uploads: UploadConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleConfig {
    pub api_key: String,
    /// Base URL of the Gemini REST API, overridable for local stubs.
    pub api_base: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Multimodal model used for every endpoint (e.g., gemini-2.0-flash)
    pub model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// Upper bound on a whole multipart request body, in bytes.
    pub max_upload_bytes: usize,
    /// Pass provider error messages through to clients verbatim.
    pub expose_provider_errors: bool,
}

impl GatewayConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(GatewayConfig {
            common: common_config,
            google: GoogleConfig {
                api_key: get_env("GOOGLE_API_KEY", None, is_prod)?,
                api_base: get_env("GEMINI_API_BASE", Some(DEFAULT_GEMINI_API_BASE), is_prod)?,
            },
            models: ModelConfig {
                model: get_env("GENAI_MODEL", Some(DEFAULT_MODEL), is_prod)?,
            },
            uploads: UploadConfig {
                max_upload_bytes: get_env(
                    "GATEWAY_MAX_UPLOAD_BYTES",
                    Some(&DEFAULT_MAX_UPLOAD_BYTES.to_string()),
                    is_prod,
                )?
                .parse()
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
                expose_provider_errors: parse_flag(
                    &get_env(
                        "GATEWAY_EXPOSE_PROVIDER_ERRORS",
                        Some(if is_prod { "false" } else { "true" }),
                        is_prod,
                    )?,
                    !is_prod,
                ),
            },
        })
    }
}

/// Read `key`, falling back to `default`; a variable without a default is
/// mandatory.
fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match (env::var(key), default) {
        (Ok(val), _) => Ok(val),
        (Err(_), Some(def)) => Ok(def.to_string()),
        (Err(_), None) if is_prod => Err(AppError::ConfigError(anyhow::anyhow!(
            "{} is required in production but not set",
            key
        ))),
        (Err(_), None) => Err(AppError::ConfigError(anyhow::anyhow!(
            "{} is required but not set",
            key
        ))),
    }
}

fn parse_flag(value: &str, fallback: bool) -> bool {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => fallback,
    }
}
