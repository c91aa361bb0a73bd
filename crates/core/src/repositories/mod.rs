//! Persistence of prescription analyses.
//!
//! Two tables are written per analysis: a `prescriptions` header row and a
//! `prescription_analyses` row holding the full [`AnalysisResult`] blob. [`PrescriptionStore`]
//! is the narrow interface a backend implements; [`PrescriptionRepository`] sequences the writes.
//!
//! - `memory`: in-process tables for local development and tests
//! - `supabase`: PostgREST tables of a managed Postgres instance

pub mod memory;
pub mod prescriptions;
pub mod supabase;

use crate::analysis::{AnalysisResult, Medication};
use crate::constants::UNKNOWN_FIELD;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub use memory::MemoryStore;
pub use prescriptions::{PrescriptionDetails, PrescriptionRepository};
pub use supabase::{SupabaseClient, SupabaseStore};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("store returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("store returned no row for the insert")]
    EmptyResponse,
    #[error("store rejected the write: {0}")]
    Rejected(String),
}

/// Header row to insert; the store assigns `id` and `created_at`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewPrescription {
    pub user_id: String,
    pub medication_name: String,
    pub dosage: String,
    pub frequency: String,
    pub duration: String,
    pub condition: String,
    pub summary: String,
    pub recommendations: Vec<String>,
}

impl NewPrescription {
    /// Project an analysis onto header columns. Only the first medication is recorded here; the
    /// full list lives in the analysis blob.
    pub fn from_analysis(user_id: &str, analysis: &AnalysisResult) -> Self {
        let field = |pick: fn(&Medication) -> &str| {
            analysis
                .primary_medication()
                .map(pick)
                .filter(|value| !value.is_empty())
                .unwrap_or(UNKNOWN_FIELD)
                .to_owned()
        };

        Self {
            user_id: user_id.to_owned(),
            medication_name: field(|m| m.name.as_str()),
            dosage: field(|m| m.dosage.as_str()),
            frequency: field(|m| m.frequency.as_str()),
            duration: field(|m| m.duration.as_str()),
            condition: analysis.condition.clone(),
            summary: analysis.summary.clone(),
            recommendations: analysis.recommendations.clone(),
        }
    }
}

/// Analysis row to insert, referencing a header that already exists.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewPrescriptionAnalysis {
    pub prescription_id: String,
    pub analysis_data: AnalysisResult,
}

/// A persisted prescription header.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrescriptionRecord {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    pub user_id: String,
    pub medication_name: String,
    pub dosage: String,
    pub frequency: String,
    pub duration: String,
    pub condition: String,
    pub summary: String,
    #[serde(default)]
    pub recommendations: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Row ids may be UUID strings or bigint sequences depending on the schema.
pub(crate) fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Number(id) => id.to_string(),
    })
}

#[async_trait]
pub trait PrescriptionStore: Send + Sync {
    /// Insert a header row and return its generated id.
    async fn insert_prescription(&self, row: &NewPrescription) -> Result<String, StoreError>;

    async fn insert_analysis(&self, row: &NewPrescriptionAnalysis) -> Result<(), StoreError>;

    /// Headers owned by `user_id`, newest first.
    async fn list_prescriptions(&self, user_id: &str)
        -> Result<Vec<PrescriptionRecord>, StoreError>;

    async fn get_prescription(&self, id: &str) -> Result<Option<PrescriptionRecord>, StoreError>;

    async fn get_analysis(
        &self,
        prescription_id: &str,
    ) -> Result<Option<AnalysisResult>, StoreError>;
}
