use std::env;

use anyhow::{anyhow, Result};
use slide2embed_core::DEFAULT_BASE_PATCH_PX;

/// Settings for the foundation-model backend, sourced from the
/// environment with working defaults for a local inference server.
#[derive(Debug, Clone)]
pub struct EncoderConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub model: String,
    pub device: String,
    pub base_patch_px: f64,
}

impl EncoderConfig {
    pub fn from_env() -> Result<Self> {
        let endpoint = env::var("SLIDE2EMBED_ENDPOINT")
            .unwrap_or_else(|_| "http://127.0.0.1:8080/v1/encode-slide".to_string());
        let api_key = env::var("SLIDE2EMBED_API_KEY").ok();
        let model = env::var("SLIDE2EMBED_MODEL").unwrap_or_else(|_| "titan".to_string());
        let device = env::var("SLIDE2EMBED_DEVICE").unwrap_or_else(|_| "cuda".to_string());
        let base_patch_px = match env::var("SLIDE2EMBED_BASE_PATCH_PX") {
            Ok(raw) => raw
                .trim()
                .parse::<f64>()
                .map_err(|_| anyhow!(format!("invalid SLIDE2EMBED_BASE_PATCH_PX: {raw}")))?,
            Err(_) => DEFAULT_BASE_PATCH_PX,
        };
        if !(base_patch_px > 0.0) {
            return Err(anyhow!("base patch size must be positive"));
        }
        Ok(Self {
            endpoint,
            api_key,
            model,
            device,
            base_patch_px,
        })
    }
}
