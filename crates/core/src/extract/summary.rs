//! Summary extraction.

use crate::constants::GENERIC_SUMMARY;
use regex::Regex;
use std::sync::LazyLock;

static SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)summary:?(.*?)(?:\n\n|$)").expect("summary section pattern is valid")
});

static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+").expect("sentence pattern is valid"));

/// A "summary:" body shorter than this is not trusted.
const MIN_SECTION_CHARS: usize = 20;

/// Summary of `text`: an explicit summary section when it has substance, otherwise the first two
/// sentences, otherwise a generic completion message.
pub fn summarise(text: &str) -> String {
    if let Some(section) = summary_section(text) {
        return section.to_owned();
    }

    let sentences: Vec<&str> = SENTENCE_END
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if sentences.len() > 2 {
        return format!("{}.", sentences[..2].join(". "));
    }

    GENERIC_SUMMARY.to_owned()
}

fn summary_section(text: &str) -> Option<&str> {
    let body = SECTION.captures(text)?.get(1)?.as_str().trim();
    (body.chars().count() > MIN_SECTION_CHARS).then_some(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_summary_section_is_returned_verbatim() {
        let text = "Intro line. Another line. Third line.\nSUMMARY:   Seven-day antibiotic course for a chest infection.  \n\nMore text";
        assert_eq!(
            summarise(text),
            "Seven-day antibiotic course for a chest infection."
        );
    }

    #[test]
    fn summary_section_may_span_lines_until_blank_line() {
        let text = "Summary:\nCourse of antibiotics\nfor one week\n\nDetails below.";
        assert_eq!(summarise(text), "Course of antibiotics\nfor one week");
    }

    #[test]
    fn short_summary_section_falls_back_to_sentences() {
        let text = "Summary: ok\n\nThe prescription lists one drug. It is an antibiotic! Take it daily? Yes.";
        assert_eq!(summarise(text), "Summary: ok\n\nThe prescription lists one drug. It is an antibiotic.");
    }

    #[test]
    fn first_two_sentences_are_used() {
        let text = "Amoxicillin was prescribed. Dosage is 500mg!! Take three times daily. Finish the course.";
        assert_eq!(
            summarise(text),
            "Amoxicillin was prescribed. Dosage is 500mg."
        );
    }

    #[test]
    fn sentence_fallback_joins_with_single_space() {
        assert_eq!(
            summarise("Take one tablet. Rest well. Drink water."),
            "Take one tablet. Rest well."
        );
    }

    #[test]
    fn summary_section_must_exceed_twenty_chars() {
        let twenty = "Summary: abcdefghijklmnopqrst\n\n";
        assert_eq!(summarise(twenty), GENERIC_SUMMARY);

        let twenty_one = "Summary: abcdefghijklmnopqrstu\n\n";
        assert_eq!(summarise(twenty_one), "abcdefghijklmnopqrstu");
    }

    #[test]
    fn two_sentences_or_fewer_give_generic_message() {
        assert_eq!(summarise("One. Two."), GENERIC_SUMMARY);
        assert_eq!(summarise(""), GENERIC_SUMMARY);
        assert_eq!(summarise("..."), GENERIC_SUMMARY);
    }
}
