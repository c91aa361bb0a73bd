//! Treated-condition extraction.

use crate::constants::CONDITION_NOT_SPECIFIED;
use regex::Regex;
use std::sync::LazyLock;

static CONDITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:condition|diagnosis|treating|for|indicated for):\s*([^,\n.]+)")
        .expect("condition pattern is valid")
});

/// Text after the first `condition:`, `diagnosis:`, `treating:`, `for:` or `indicated for:` cue,
/// up to the next comma, full stop or line break.
pub fn extract_condition(text: &str) -> String {
    CONDITION
        .captures(text)
        .map(|caps| caps[1].trim().to_owned())
        .filter(|condition| !condition.is_empty())
        .unwrap_or_else(|| CONDITION_NOT_SPECIFIED.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_each_cue_word() {
        assert_eq!(extract_condition("Diagnosis: Type 2 diabetes"), "Type 2 diabetes");
        assert_eq!(extract_condition("treating: Hypertension."), "Hypertension");
        assert_eq!(
            extract_condition("Indicated for: seasonal allergies, mild"),
            "seasonal allergies"
        );
        assert_eq!(extract_condition("CONDITION:  Migraine\nnext line"), "Migraine");
    }

    #[test]
    fn first_cue_in_text_wins() {
        let text = "Diagnosis: Otitis media\nCondition: Ear pain";
        assert_eq!(extract_condition(text), "Otitis media");
    }

    #[test]
    fn missing_cue_defaults() {
        assert_eq!(extract_condition("no structure here"), CONDITION_NOT_SPECIFIED);
        assert_eq!(extract_condition("condition without a colon"), CONDITION_NOT_SPECIFIED);
    }
}
