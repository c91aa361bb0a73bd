//! Structured prescription analysis.
//!
//! [`AnalysisResult`] is what the rest of the system consumes: it is returned to callers, stored
//! verbatim as the analysis blob, and projected into the prescription header row. Field names on
//! the wire are camelCase (`medicationList`, `needsWorkout`).

use serde::{Deserialize, Serialize};

/// One medication line recovered from the model output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medication {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub duration: String,
}

impl Medication {
    pub fn new(
        name: impl Into<String>,
        dosage: impl Into<String>,
        frequency: impl Into<String>,
        duration: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            dosage: dosage.into(),
            frequency: frequency.into(),
            duration: duration.into(),
        }
    }
}

/// Structured record extracted from free-form model output.
///
/// `medication_list` and `recommendations` are never empty when produced by
/// [`crate::extract::analyse_text`]; degraded inputs yield placeholder entries instead.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub medication_list: Vec<Medication>,
    pub condition: String,
    pub summary: String,
    pub recommendations: Vec<String>,
    pub needs_workout: bool,
}

impl AnalysisResult {
    /// First medication, which is what the prescription header row records.
    pub fn primary_medication(&self) -> Option<&Medication> {
        self.medication_list.first()
    }
}
