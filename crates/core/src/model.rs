//! External analysis client.
//!
//! [`VisionModel`] is the seam between the pipeline and whichever generative model reads the
//! prescription. [`GeminiClient`] talks to the Generative Language REST API; tests substitute
//! their own implementations.
//!
//! A non-2xx status, or a response without candidate text, is a hard failure. No fallback
//! analysis is invented at this layer.

use crate::config::ModelConfig;
use crate::constants::{
    PRESCRIPTION_MAX_OUTPUT_TOKENS, PRESCRIPTION_PROMPT, PRESCRIPTION_TEMPERATURE,
};
use crate::error::ModelError;
use async_trait::async_trait;
use rx_types::ImagePayload;
use serde::{Deserialize, Serialize};

/// Longest upstream error body kept in an error message.
const MAX_ERROR_BODY_CHARS: usize = 512;

#[async_trait]
pub trait VisionModel: Send + Sync {
    /// Free-text description of the prescription in `image`.
    async fn analyse_prescription(&self, image: &ImagePayload) -> Result<String, ModelError>;

    /// Free-text answer to `prompt`, optionally grounded on `image`.
    async fn generate(
        &self,
        prompt: &str,
        image: Option<&ImagePayload>,
    ) -> Result<String, ModelError>;
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text { text: &'a str },
    Image { inline_data: InlineData<'a> },
}

#[derive(Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate, if it has any.
    fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
            .filter(|text| !text.trim().is_empty())
    }
}

/// Client for the Generative Language `generateContent` endpoint.
///
/// The API key travels in the `x-goog-api-key` header so it never appears in URLs or in
/// transport error messages.
#[derive(Clone, Debug)]
pub struct GeminiClient {
    http: reqwest::Client,
    config: ModelConfig,
}

impl GeminiClient {
    /// Builds a client whose every request is bounded by the configured timeout.
    pub fn new(config: ModelConfig) -> Result<Self, ModelError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self { http, config })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.config.base_url(), model)
    }

    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest<'_>,
    ) -> Result<String, ModelError> {
        let response = self
            .http
            .post(self.endpoint(model))
            .header("x-goog-api-key", self.config.api_key())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(%status, model, "model request rejected");
            return Err(ModelError::Status {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        parsed.into_text().ok_or(ModelError::NoCandidate)
    }
}

#[async_trait]
impl VisionModel for GeminiClient {
    async fn analyse_prescription(&self, image: &ImagePayload) -> Result<String, ModelError> {
        tracing::info!(
            mime_type = image.mime_type(),
            bytes = image.decoded_len(),
            "sending prescription image to model"
        );

        let request = GenerateContentRequest {
            contents: [Content {
                parts: vec![
                    Part::Text {
                        text: PRESCRIPTION_PROMPT,
                    },
                    image_part(image),
                ],
            }],
            generation_config: Some(GenerationConfig {
                temperature: PRESCRIPTION_TEMPERATURE,
                max_output_tokens: PRESCRIPTION_MAX_OUTPUT_TOKENS,
            }),
        };

        self.generate_content(self.config.vision_model(), &request)
            .await
    }

    async fn generate(
        &self,
        prompt: &str,
        image: Option<&ImagePayload>,
    ) -> Result<String, ModelError> {
        let mut parts = vec![Part::Text { text: prompt }];
        let model = match image {
            Some(image) => {
                parts.push(image_part(image));
                self.config.vision_model()
            }
            None => self.config.text_model(),
        };

        let request = GenerateContentRequest {
            contents: [Content { parts }],
            generation_config: None,
        };

        self.generate_content(model, &request).await
    }
}

fn image_part(image: &ImagePayload) -> Part<'_> {
    Part::Image {
        inline_data: InlineData {
            mime_type: image.mime_type(),
            data: image.base64_data(),
        },
    }
}
