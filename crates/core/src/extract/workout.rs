//! Workout suitability flag.
//!
//! A coarse keyword heuristic, not a medical judgement: any denylisted term in the condition or
//! anywhere in the analysis text (substring, case-insensitive) marks the patient as unsuitable
//! for a workout plan.

use crate::constants::WORKOUT_DENYLIST;

pub fn needs_workout(condition: &str, text: &str) -> bool {
    let condition = condition.to_lowercase();
    let text = text.to_lowercase();

    match WORKOUT_DENYLIST
        .iter()
        .find(|term| condition.contains(*term) || text.contains(*term))
    {
        Some(term) => {
            tracing::debug!(term, "workout discouraged");
            false
        }
        None => true,
    }
}
