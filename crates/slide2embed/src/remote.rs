use anyhow::anyhow;
use ndarray::ArrayView2;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use slide2embed_core::{EncodeError, Result, SlideEncoder};

use crate::config::EncoderConfig;

/// Client for a slide-encoder inference server.
///
/// The request carries the feature tensor with a leading batch
/// dimension of one, as the model's entry point expects; the server
/// returns the embedding already squeezed to a single vector. The
/// server holds the model weights and runs inference-only, so calls
/// never mutate shared state.
pub struct HttpSlideEncoder {
    http: Client,
    config: EncoderConfig,
}

#[derive(Serialize)]
struct EncodeSlideRequest<'a> {
    model: &'a str,
    device: &'a str,
    /// Shape [1, tiles, dim].
    feats: Vec<Vec<Vec<f32>>>,
    /// Shape [1, tiles].
    coords_px: Vec<Vec<[i64; 2]>>,
    patch_size_lvl0: i64,
}

#[derive(Deserialize)]
struct EncodeSlideResponse {
    embedding: Vec<f32>,
}

impl HttpSlideEncoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }
}

impl SlideEncoder for HttpSlideEncoder {
    fn identifier(&self) -> &str {
        &self.config.model
    }

    fn encode_slide(
        &self,
        feats: ArrayView2<'_, f32>,
        coords_px: &[[i64; 2]],
        patch_size_lvl0: i64,
    ) -> Result<Vec<f32>> {
        let rows: Vec<Vec<f32>> = feats.outer_iter().map(|row| row.to_vec()).collect();
        let payload = EncodeSlideRequest {
            model: &self.config.model,
            device: &self.config.device,
            feats: vec![rows],
            coords_px: vec![coords_px.to_vec()],
            patch_size_lvl0,
        };
        let send = || -> anyhow::Result<Vec<f32>> {
            let mut request = self.http.post(&self.config.endpoint).json(&payload);
            if let Some(key) = &self.config.api_key {
                request = request.bearer_auth(key);
            }
            let response = request.send()?;
            if !response.status().is_success() {
                return Err(anyhow!(
                    "encode-slide request failed: {}",
                    response.status()
                ));
            }
            let parsed: EncodeSlideResponse = response.json()?;
            if parsed.embedding.is_empty() {
                return Err(anyhow!("encode-slide response held no embedding"));
            }
            Ok(parsed.embedding)
        };
        send().map_err(|err| EncodeError::Encoder(err.to_string()))
    }
}
