// Hugging Face 推理接口适配器
//
// POST {"inputs": prompt}，响应体为原始图片二进制

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error};

use crate::modules::chat::ports::{GeneratedImage, ImageError, ImagePort, ImageRequest};

pub const HUGGINGFACE_IMAGE_ENDPOINT: &str =
    "https://api-inference.huggingface.co/models/CompVis/stable-diffusion-v1-4";

/// Hugging Face 适配器配置
#[derive(Debug, Clone)]
pub struct HuggingFaceConfig {
    pub endpoint: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

impl Default for HuggingFaceConfig {
    fn default() -> Self {
        Self {
            endpoint: HUGGINGFACE_IMAGE_ENDPOINT.to_string(),
            api_key: String::new(),
            timeout_secs: 120,
        }
    }
}

/// Hugging Face 图片生成适配器
pub struct HuggingFaceImageAdapter {
    client: Client,
    config: HuggingFaceConfig,
}

impl HuggingFaceImageAdapter {
    pub fn new(config: HuggingFaceConfig) -> Result<Self, ImageError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ImageError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

#[async_trait]
impl ImagePort for HuggingFaceImageAdapter {
    fn provider_id(&self) -> &str {
        "huggingface"
    }

    async fn generate(&self, request: ImageRequest) -> Result<GeneratedImage, ImageError> {
        debug!(
            request_id = ?request.request_id,
            prompt_len = request.prompt.len(),
            "Sending image generation request"
        );

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&InferenceRequest {
                inputs: &request.prompt,
            })
            .send()
            .await
            .map_err(|e| ImageError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Image API error: {} - {}", status, error_text);
            return Err(ImageError::ApiError {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ImageError::NetworkError(e.to_string()))?;

        if bytes.is_empty() {
            return Err(ImageError::EmptyPayload);
        }

        Ok(GeneratedImage::new(bytes.to_vec(), content_type))
    }
}
