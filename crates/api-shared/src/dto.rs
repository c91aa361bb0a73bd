//! Request and response bodies.
//!
//! Field names follow the existing clients: analysis payloads are camelCase, stored prescription
//! rows keep their snake_case column names.

use rx_core::medication_info::MedicationInfo;
use rx_core::{AnalysisResult, Medication, PrescriptionDetails, PrescriptionRecord};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct MedicationDto {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub duration: String,
}

impl From<Medication> for MedicationDto {
    fn from(m: Medication) -> Self {
        Self {
            name: m.name,
            dosage: m.dosage,
            frequency: m.frequency,
            duration: m.duration,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisDto {
    pub medication_list: Vec<MedicationDto>,
    pub condition: String,
    pub summary: String,
    pub recommendations: Vec<String>,
    pub needs_workout: bool,
}

impl From<AnalysisResult> for AnalysisDto {
    fn from(a: AnalysisResult) -> Self {
        Self {
            medication_list: a.medication_list.into_iter().map(Into::into).collect(),
            condition: a.condition,
            summary: a.summary,
            recommendations: a.recommendations,
            needs_workout: a.needs_workout,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct AnalyzeReq {
    /// Base64 image, optionally as a `data:<mime>;base64,` URI.
    #[serde(default)]
    pub image: Option<String>,
    /// Accepted for compatibility; the authenticated caller is used instead.
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRes {
    pub analysis: AnalysisDto,
    pub prescription_id: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct PrescriptionRes {
    pub id: String,
    pub user_id: String,
    pub medication_name: String,
    pub dosage: String,
    pub frequency: String,
    pub duration: String,
    pub condition: String,
    pub summary: String,
    pub recommendations: Vec<String>,
    /// RFC 3339 timestamp.
    pub created_at: String,
}

impl From<PrescriptionRecord> for PrescriptionRes {
    fn from(r: PrescriptionRecord) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            medication_name: r.medication_name,
            dosage: r.dosage,
            frequency: r.frequency,
            duration: r.duration,
            condition: r.condition,
            summary: r.summary,
            recommendations: r.recommendations,
            created_at: r.created_at.to_rfc3339(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct PrescriptionDetailsRes {
    #[serde(flatten)]
    pub prescription: PrescriptionRes,
    /// Absent when the analysis write never completed.
    pub analysis: Option<AnalysisDto>,
}

impl From<PrescriptionDetails> for PrescriptionDetailsRes {
    fn from(d: PrescriptionDetails) -> Self {
        Self {
            prescription: d.record.into(),
            analysis: d.analysis.map(Into::into),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MedicationInfoRes {
    pub name: String,
    pub description: String,
    pub side_effects: Vec<String>,
    pub precautions: Vec<String>,
    pub interactions: Vec<String>,
    pub known: bool,
}

impl From<MedicationInfo> for MedicationInfoRes {
    fn from(i: MedicationInfo) -> Self {
        Self {
            name: i.name,
            description: i.description,
            side_effects: i.side_effects,
            precautions: i.precautions,
            interactions: i.interactions,
            known: i.known,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct GenerateReq {
    pub prompt: Option<String>,
    /// `"vision"` sends `image` along with the prompt.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub image: Option<String>,
}

impl GenerateReq {
    pub fn is_vision(&self) -> bool {
        self.kind.as_deref() == Some("vision")
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct GenerateRes {
    pub result: String,
}
