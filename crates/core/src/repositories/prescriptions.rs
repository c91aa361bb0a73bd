//! Two-phase prescription persistence.
//!
//! [`PrescriptionRepository::save`] writes the header row, then the analysis row that references
//! the header's generated id. The two writes are causally ordered but not atomic: when the second
//! write fails the header stays in the store and the caller receives
//! [`PrescriptionError::SaveAnalysis`] carrying the orphaned id. Nothing is rolled back.

use super::{
    NewPrescription, NewPrescriptionAnalysis, PrescriptionRecord, PrescriptionStore,
};
use crate::analysis::AnalysisResult;
use crate::validation::validate_record_id;
use crate::{PrescriptionError, PrescriptionResult};
use serde::Serialize;
use std::sync::Arc;

/// A header together with its analysis blob, if that write ever landed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PrescriptionDetails {
    #[serde(flatten)]
    pub record: PrescriptionRecord,
    pub analysis: Option<AnalysisResult>,
}

#[derive(Clone)]
pub struct PrescriptionRepository {
    store: Arc<dyn PrescriptionStore>,
}

impl PrescriptionRepository {
    pub fn new(store: Arc<dyn PrescriptionStore>) -> Self {
        Self { store }
    }

    /// Persist `analysis` for `user_id` and return the header id.
    ///
    /// # Errors
    ///
    /// - [`PrescriptionError::SavePrescription`] if the header write fails; no analysis write is
    ///   attempted.
    /// - [`PrescriptionError::SaveAnalysis`] if the analysis write fails; the header remains.
    pub async fn save(&self, user_id: &str, analysis: &AnalysisResult) -> PrescriptionResult<String> {
        let header = NewPrescription::from_analysis(user_id, analysis);
        let prescription_id = self
            .store
            .insert_prescription(&header)
            .await
            .map_err(PrescriptionError::SavePrescription)?;

        let blob = NewPrescriptionAnalysis {
            prescription_id: prescription_id.clone(),
            analysis_data: analysis.clone(),
        };

        if let Err(source) = self.store.insert_analysis(&blob).await {
            tracing::warn!(
                %prescription_id,
                error = %source,
                "prescription header saved without its analysis"
            );
            return Err(PrescriptionError::SaveAnalysis {
                prescription_id,
                source,
            });
        }

        tracing::info!(%prescription_id, "prescription saved");
        Ok(prescription_id)
    }

    /// Headers owned by `user_id`, newest first.
    pub async fn history(&self, user_id: &str) -> PrescriptionResult<Vec<PrescriptionRecord>> {
        self.store
            .list_prescriptions(user_id)
            .await
            .map_err(PrescriptionError::Load)
    }

    /// Header plus analysis for `id`, only if it belongs to `user_id`.
    ///
    /// Records owned by someone else are reported as [`PrescriptionError::NotFound`] so that ids
    /// cannot be probed.
    pub async fn details(&self, user_id: &str, id: &str) -> PrescriptionResult<PrescriptionDetails> {
        validate_record_id(id)?;

        let record = self
            .store
            .get_prescription(id)
            .await
            .map_err(PrescriptionError::Load)?
            .filter(|record| record.user_id == user_id)
            .ok_or(PrescriptionError::NotFound)?;

        let analysis = self
            .store
            .get_analysis(id)
            .await
            .map_err(PrescriptionError::Load)?;

        Ok(PrescriptionDetails { record, analysis })
    }
}
