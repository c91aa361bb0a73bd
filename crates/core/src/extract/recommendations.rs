//! Patient recommendation extraction.

use crate::constants::DEFAULT_RECOMMENDATIONS;
use regex::Regex;
use std::sync::LazyLock;

/// Body of a "recommendation(s):" section, up to the first blank line or the end of the text.
static SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)recommendations?:?(.*?)(?:\n\n|$)")
        .expect("recommendation section pattern is valid")
});

/// Line-leading list markers: `-`, `•`, `1.`
static LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n-|\n•|\n\d+\.").expect("list marker pattern is valid"));

/// Advice phrasing, checked in this order.
static ADVICE: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        r"(?i)should\s+([^,.]+)",
        r"(?i)advised\s+to\s+([^,.]+)",
        r"(?i)recommended\s+to\s+([^,.]+)",
    ]
    .map(|pattern| Regex::new(pattern).expect("advice pattern is valid"))
});

/// Advice clauses this short are usually sentence fragments.
const MIN_ADVICE_CHARS: usize = 10;

/// Recommendations found in `text`. Never returns an empty list.
pub fn extract_recommendations(text: &str) -> Vec<String> {
    let listed = section_items(text);
    if !listed.is_empty() {
        return listed;
    }

    let advice = advice_sentences(text);
    if !advice.is_empty() {
        return advice;
    }

    tracing::debug!("no recommendations recognised, using defaults");
    DEFAULT_RECOMMENDATIONS.iter().map(|r| r.to_string()).collect()
}

fn section_items(text: &str) -> Vec<String> {
    let Some(body) = SECTION.captures(text).and_then(|caps| caps.get(1)) else {
        return Vec::new();
    };

    LIST_MARKER
        .split(body.as_str())
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}

fn advice_sentences(text: &str) -> Vec<String> {
    ADVICE
        .iter()
        .flat_map(|pattern| pattern.captures_iter(text))
        .filter(|caps| caps[1].chars().count() > MIN_ADVICE_CHARS)
        .map(|caps| format!("{}.", caps[0].trim()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bulleted_and_numbered_sections_are_split() {
        let text = "Recommendations:\n- Drink plenty of fluids\n• Rest for two days\n3. Avoid alcohol\n\nOther notes follow.";
        assert_eq!(
            extract_recommendations(text),
            vec!["Drink plenty of fluids", "Rest for two days", "Avoid alcohol"]
        );
    }

    #[test]
    fn section_stops_at_blank_line() {
        let text = "Recommendation: take with food\n\n- not part of the section";
        assert_eq!(extract_recommendations(text), vec!["take with food"]);
    }

    #[test]
    fn empty_section_falls_through_to_advice() {
        let text = "Recommendations:\n\nThe patient should avoid strenuous exercise for a week.";
        assert_eq!(
            extract_recommendations(text),
            vec!["should avoid strenuous exercise for a week."]
        );
    }

    #[test]
    fn advice_patterns_are_collected_in_pattern_order() {
        let text = "You are advised to monitor blood pressure daily. \
You should take the tablet after breakfast. \
It is recommended to schedule a follow-up visit.";
        assert_eq!(
            extract_recommendations(text),
            vec![
                "should take the tablet after breakfast.",
                "advised to monitor blood pressure daily.",
                "recommended to schedule a follow-up visit.",
            ]
        );
    }

    #[test]
    fn short_advice_fragments_are_ignored() {
        let text = "You should rest. You should sleep.";
        assert_eq!(extract_recommendations(text), DEFAULT_RECOMMENDATIONS.to_vec());
    }

    #[test]
    fn advice_clause_must_exceed_ten_chars() {
        assert_eq!(
            extract_recommendations("You should drink more."),
            DEFAULT_RECOMMENDATIONS.to_vec()
        );
        assert_eq!(
            extract_recommendations("You should drink water."),
            vec!["should drink water."]
        );
    }

    #[test]
    fn defaults_are_fixed_and_ordered() {
        let recs = extract_recommendations("nothing useful");
        assert_eq!(
            recs,
            vec![
                "Take medication as prescribed",
                "Contact your healthcare provider with any questions or concerns",
                "Complete the full course of medication even if symptoms improve",
            ]
        );
    }
}
