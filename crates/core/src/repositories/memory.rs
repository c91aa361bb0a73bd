//! In-process prescription tables.
//!
//! Rows live only as long as the process. Ids are random UUIDs and `created_at` is stamped at
//! insert time, mirroring what the managed database assigns.

use super::{NewPrescription, NewPrescriptionAnalysis, PrescriptionRecord, PrescriptionStore, StoreError};
use crate::analysis::AnalysisResult;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    /// Insertion order; newest last.
    prescriptions: Vec<PrescriptionRecord>,
    analyses: HashMap<String, AnalysisResult>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<std::sync::MutexGuard<'_, Tables>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Rejected("memory store lock poisoned".into()))
    }
}

#[async_trait]
impl PrescriptionStore for MemoryStore {
    async fn insert_prescription(&self, row: &NewPrescription) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        let record = PrescriptionRecord {
            id: id.clone(),
            user_id: row.user_id.clone(),
            medication_name: row.medication_name.clone(),
            dosage: row.dosage.clone(),
            frequency: row.frequency.clone(),
            duration: row.duration.clone(),
            condition: row.condition.clone(),
            summary: row.summary.clone(),
            recommendations: row.recommendations.clone(),
            created_at: Utc::now(),
        };
        self.tables()?.prescriptions.push(record);
        Ok(id)
    }

    async fn insert_analysis(&self, row: &NewPrescriptionAnalysis) -> Result<(), StoreError> {
        let mut tables = self.tables()?;
        if !tables
            .prescriptions
            .iter()
            .any(|record| record.id == row.prescription_id)
        {
            return Err(StoreError::Rejected(format!(
                "prescription {} does not exist",
                row.prescription_id
            )));
        }
        tables
            .analyses
            .insert(row.prescription_id.clone(), row.analysis_data.clone());
        Ok(())
    }

    async fn list_prescriptions(
        &self,
        user_id: &str,
    ) -> Result<Vec<PrescriptionRecord>, StoreError> {
        Ok(self
            .tables()?
            .prescriptions
            .iter()
            .rev()
            .filter(|record| record.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn get_prescription(&self, id: &str) -> Result<Option<PrescriptionRecord>, StoreError> {
        Ok(self
            .tables()?
            .prescriptions
            .iter()
            .find(|record| record.id == id)
            .cloned())
    }

    async fn get_analysis(
        &self,
        prescription_id: &str,
    ) -> Result<Option<AnalysisResult>, StoreError> {
        Ok(self.tables()?.analyses.get(prescription_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Medication;

    fn analysis() -> AnalysisResult {
        AnalysisResult {
            medication_list: vec![Medication::new("Ibuprofen", "200mg", "twice daily", "5 days")],
            condition: "Back pain".into(),
            summary: "Short course.".into(),
            recommendations: vec!["Take with food".into()],
            needs_workout: true,
        }
    }

    #[tokio::test]
    async fn insert_assigns_unique_uuid_ids() {
        let store = MemoryStore::new();
        let row = NewPrescription::from_analysis("user-1", &analysis());

        let a = store.insert_prescription(&row).await.unwrap();
        let b = store.insert_prescription(&row).await.unwrap();

        assert_ne!(a, b);
        assert!(Uuid::parse_str(&a).is_ok());
    }

    #[tokio::test]
    async fn analysis_requires_existing_header() {
        let store = MemoryStore::new();
        let err = store
            .insert_analysis(&NewPrescriptionAnalysis {
                prescription_id: "missing".into(),
                analysis_data: analysis(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Rejected(_)));
    }

    #[tokio::test]
    async fn unknown_ids_read_as_none() {
        let store = MemoryStore::new();
        assert!(store.get_prescription("nope").await.unwrap().is_none());
        assert!(store.get_analysis("nope").await.unwrap().is_none());
        assert!(store.list_prescriptions("nobody").await.unwrap().is_empty());
    }
}
