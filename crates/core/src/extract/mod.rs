//! Best-effort recovery of structured fields from free-text model output.
//!
//! Each submodule owns one output field and exposes a pure `&str -> value` function. None of them
//! can fail: when a heuristic finds nothing it degrades to a looser heuristic and finally to a
//! fixed default, so a caller always gets a usable [`AnalysisResult`].
//!
//! The extractors do not depend on each other's output, except that the workout flag also looks
//! at the extracted condition. Swapping a heuristic (or replacing all of them with structured model
//! output) only touches the relevant submodule.

pub mod condition;
pub mod medications;
pub mod recommendations;
pub mod summary;
pub mod workout;

use crate::analysis::AnalysisResult;

pub use condition::extract_condition;
pub use medications::extract_medications;
pub use recommendations::extract_recommendations;
pub use summary::summarise;
pub use workout::needs_workout;

/// Run every field extractor over `text` and assemble the result.
///
/// Deterministic: identical input always yields an identical result.
pub fn analyse_text(text: &str) -> AnalysisResult {
    let medication_list = extract_medications(text);
    let condition = extract_condition(text);
    let recommendations = extract_recommendations(text);
    let summary = summarise(text);
    let needs_workout = needs_workout(&condition, text);

    AnalysisResult {
        medication_list,
        condition,
        summary,
        recommendations,
        needs_workout,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Medication;
    use crate::constants::{
        CONDITION_NOT_SPECIFIED, CONSULT_PROVIDER, DEFAULT_RECOMMENDATIONS,
        UNIDENTIFIED_MEDICATION,
    };

    const STRUCTURED_REPORT: &str = "Prescription analysis\n\
medication: Amoxicillin, dosage: 500mg, frequency: 3 times daily, duration: 7 days\n\
condition: Upper respiratory tract infection\n\
\n\
Summary: The patient has been prescribed a week-long course of amoxicillin for a bacterial infection.\n\
\n\
Recommendations:\n\
- Take each dose with a full glass of water\n\
- Finish the course even if symptoms clear\n";

    #[test]
    fn structured_report_is_fully_recovered() {
        let result = analyse_text(STRUCTURED_REPORT);

        assert_eq!(
            result.medication_list,
            vec![Medication::new(
                "Amoxicillin",
                "500mg",
                "3 times daily",
                "7 days"
            )]
        );
        assert_eq!(result.condition, "Upper respiratory tract infection");
        assert_eq!(
            result.summary,
            "The patient has been prescribed a week-long course of amoxicillin for a bacterial infection."
        );
        assert_eq!(
            result.recommendations,
            vec![
                "Take each dose with a full glass of water".to_string(),
                "Finish the course even if symptoms clear".to_string(),
            ]
        );
        assert!(!result.needs_workout);
    }

    #[test]
    fn single_line_medication_and_condition() {
        let text = "medication: Amoxicillin, dosage: 500mg, frequency: 3 times daily, duration: 7 days\n\
condition: Upper respiratory tract infection";
        let result = analyse_text(text);

        assert_eq!(
            result.medication_list,
            vec![Medication::new(
                "Amoxicillin",
                "500mg",
                "3 times daily",
                "7 days"
            )]
        );
        assert_eq!(result.condition, "Upper respiratory tract infection");
        assert!(!result.needs_workout);
    }

    #[test]
    fn unstructured_text_degrades_to_defaults() {
        let result = analyse_text("The image is too blurry to read anything useful");

        assert_eq!(result.medication_list.len(), 1);
        assert_eq!(result.medication_list[0].name, UNIDENTIFIED_MEDICATION);
        assert_eq!(result.medication_list[0].dosage, CONSULT_PROVIDER);
        assert_eq!(result.medication_list[0].frequency, CONSULT_PROVIDER);
        assert_eq!(result.medication_list[0].duration, CONSULT_PROVIDER);
        assert_eq!(result.condition, CONDITION_NOT_SPECIFIED);
        assert_eq!(result.recommendations, DEFAULT_RECOMMENDATIONS.map(String::from));
        assert!(result.needs_workout);
    }

    #[test]
    fn repeated_runs_are_identical() {
        let first = analyse_text(STRUCTURED_REPORT);
        let second = analyse_text(STRUCTURED_REPORT);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
    }

    #[test]
    fn empty_input_still_yields_usable_result() {
        let result = analyse_text("");
        assert!(!result.medication_list.is_empty());
        assert!(!result.recommendations.is_empty());
        assert!(!result.summary.is_empty());
    }
}
