use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::str::FromStr;

/// Largest accepted multipart image upload (4.5 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 4_718_592;

/// Ceiling for any request body, JSON or multipart (10 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone, Deserialize)]
pub struct EcoScannerConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub gemini: GeminiSettings,
    pub limits: LimitsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiSettings {
    pub api_key: String,
    /// Model used for both image and barcode analysis (e.g., gemini-2.0-flash)
    pub model: String,
    pub api_base: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    pub max_upload_bytes: usize,
    pub max_body_bytes: usize,
}

impl EcoScannerConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;

        Ok(EcoScannerConfig {
            common: common_config,
            gemini: GeminiSettings {
                api_key: get_env("API_KEY", None)?,
                model: get_env("GEMINI_MODEL", Some("gemini-2.0-flash"))?,
                api_base: get_env("GEMINI_API_BASE", Some(DEFAULT_GEMINI_API_BASE))?,
                timeout_secs: get_parsed("GEMINI_TIMEOUT_SECS", 120)?,
            },
            limits: LimitsConfig {
                max_upload_bytes: get_parsed("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
                max_body_bytes: get_parsed("MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES)?,
            },
        })
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

fn get_env(key: &str, default: Option<&str>) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) if !val.trim().is_empty() => Ok(val),
        _ => match default {
            Some(def) => Ok(def.to_string()),
            None => Err(AppError::ConfigError(anyhow::anyhow!(
                "{} is required but not set",
                key
            ))),
        },
    }
}

fn get_parsed<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(val) => val.trim().parse().map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!("{} has an invalid value {:?}: {}", key, val, e))
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_required_key_is_a_config_error() {
        let err = get_env("ECO_SCANNER_TEST_SURELY_UNSET", None).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
        assert!(err.to_string().contains("ECO_SCANNER_TEST_SURELY_UNSET"));
    }

    #[test]
    fn optional_key_falls_back_to_default() {
        let value = get_env("ECO_SCANNER_TEST_ALSO_UNSET", Some("fallback")).unwrap();
        assert_eq!(value, "fallback");
    }

    #[test]
    fn default_upload_limit_is_four_and_a_half_mebibytes() {
        assert_eq!(DEFAULT_MAX_UPLOAD_BYTES, 9 * 1024 * 1024 / 2);
        assert_eq!(LimitsConfig::default().max_body_bytes, 10_485_760);
    }
}
