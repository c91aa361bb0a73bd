//! # RX Core
//!
//! Core business logic for prescription analysis.
//!
//! This crate turns a prescription image into a structured [`AnalysisResult`] and persists it:
//! - The external model reads the image and answers in free text ([`model`])
//! - Field extractors recover structure from that text ([`extract`])
//! - The repository writes a header row and the full analysis ([`repositories`])
//!
//! **No API concerns**: HTTP routing, CORS and request parsing belong in `api-rest` or
//! `api-shared`.

pub mod analysis;
pub mod config;
pub mod constants;
pub mod error;
pub mod extract;
pub mod identity;
pub mod medication_info;
pub mod model;
pub mod repositories;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;

pub use analysis::{AnalysisResult, Medication};
pub use config::{CoreConfig, ModelConfig, StoreBackend};
pub use error::{IdentityError, ModelError, PrescriptionError, PrescriptionResult};
pub use identity::{Identity, IdentityProvider, StaticTokenIdentity, SupabaseIdentity};
pub use model::{GeminiClient, VisionModel};
pub use repositories::{
    MemoryStore, PrescriptionDetails, PrescriptionRecord, PrescriptionRepository,
    PrescriptionStore, StoreError, SupabaseClient, SupabaseStore,
};

use constants::{DEFAULT_VISION_PROMPT, NO_RESPONSE_GENERATED};
use rx_types::ImagePayload;
use std::sync::Arc;

/// Prescription analysis and persistence, independent of any transport.
#[derive(Clone)]
pub struct PrescriptionService {
    model: Arc<dyn VisionModel>,
    repository: PrescriptionRepository,
}

impl PrescriptionService {
    pub fn new(model: Arc<dyn VisionModel>, repository: PrescriptionRepository) -> Self {
        Self { model, repository }
    }

    pub fn repository(&self) -> &PrescriptionRepository {
        &self.repository
    }

    /// Send `image` to the model and extract a structured record from its answer.
    ///
    /// # Errors
    ///
    /// Returns [`PrescriptionError::Model`] if the model call fails or yields no text. Extraction
    /// itself never fails.
    pub async fn analyse(&self, image: &ImagePayload) -> PrescriptionResult<AnalysisResult> {
        let text = self.model.analyse_prescription(image).await?;
        tracing::debug!(chars = text.len(), "model answered");

        let analysis = extract::analyse_text(&text);
        tracing::info!(
            medications = analysis.medication_list.len(),
            needs_workout = analysis.needs_workout,
            "prescription analysed"
        );
        Ok(analysis)
    }

    /// Persist `analysis` for `user_id`; see [`PrescriptionRepository::save`].
    pub async fn save(&self, user_id: &str, analysis: &AnalysisResult) -> PrescriptionResult<String> {
        self.repository.save(user_id, analysis).await
    }

    /// Free-form model call.
    ///
    /// With `vision` set and an image present, the image is sent with `prompt` (or a generic
    /// instruction). Otherwise the call is text-only and needs a prompt. A model answer without
    /// candidate text is reported as the literal "No response generated" rather than an error.
    ///
    /// # Errors
    ///
    /// - [`PrescriptionError::InvalidInput`] if there is nothing to send.
    /// - [`PrescriptionError::Model`] for transport or status failures.
    pub async fn generate(
        &self,
        prompt: Option<&str>,
        vision: bool,
        image: Option<&ImagePayload>,
    ) -> PrescriptionResult<String> {
        let prompt = prompt.map(str::trim).filter(|p| !p.is_empty());

        let answer = match (image.filter(|_| vision), prompt) {
            (Some(image), prompt) => {
                self.model
                    .generate(prompt.unwrap_or(DEFAULT_VISION_PROMPT), Some(image))
                    .await
            }
            (None, Some(prompt)) => self.model.generate(prompt, None).await,
            (None, None) => {
                return Err(PrescriptionError::InvalidInput(
                    "Request must include either a prompt or an image".into(),
                ))
            }
        };

        match answer {
            Ok(text) => Ok(text),
            Err(ModelError::NoCandidate) => Ok(NO_RESPONSE_GENERATED.to_owned()),
            Err(e) => Err(e.into()),
        }
    }
}
