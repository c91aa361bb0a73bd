//! Medication list extraction.
//!
//! Three tiers, tried in order until one yields entries:
//! 1. structured `medication: … dosage: … frequency: … duration: …` records on one line
//! 2. loose cue words (`prescribed:`, `drug:`, `tablet:` …) with "As directed" placeholders
//! 3. a single placeholder telling the reader to consult a healthcare provider

use crate::analysis::Medication;
use crate::constants::{AS_DIRECTED, CONSULT_PROVIDER, UNIDENTIFIED_MEDICATION, UNKNOWN_MEDICATION};
use regex::Regex;
use std::sync::LazyLock;

static STRUCTURED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)medication:\s*([^,\n]+).*?dosage:\s*([^,\n]+).*?frequency:\s*([^,\n]+).*?duration:\s*([^,\n]+)",
    )
    .expect("structured medication pattern is valid")
});

static CUE_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:prescribed|medication|drug|tablet|capsule):\s*([^,\n.]+)")
        .expect("medication cue pattern is valid")
});

/// Extract every medication mentioned in `text`. Never returns an empty list.
pub fn extract_medications(text: &str) -> Vec<Medication> {
    let structured = structured_medications(text);
    if !structured.is_empty() {
        return structured;
    }

    let cued = cued_medications(text);
    if !cued.is_empty() {
        tracing::debug!(count = cued.len(), "medications recovered from cue words only");
        return cued;
    }

    tracing::debug!("no medication recognised, using placeholder");
    vec![Medication::new(
        UNIDENTIFIED_MEDICATION,
        CONSULT_PROVIDER,
        CONSULT_PROVIDER,
        CONSULT_PROVIDER,
    )]
}

fn structured_medications(text: &str) -> Vec<Medication> {
    STRUCTURED
        .captures_iter(text)
        .map(|caps| {
            Medication::new(
                caps[1].trim(),
                caps[2].trim(),
                caps[3].trim(),
                caps[4].trim(),
            )
        })
        .collect()
}

fn cued_medications(text: &str) -> Vec<Medication> {
    CUE_WORD
        .captures_iter(text)
        .map(|caps| {
            // A second colon ends the name ("tablet: Ibuprofen: 200mg").
            let name = caps[1].split(':').next().unwrap_or_default().trim();
            let name = if name.is_empty() {
                UNKNOWN_MEDICATION
            } else {
                name
            };
            Medication::new(name, AS_DIRECTED, AS_DIRECTED, AS_DIRECTED)
        })
        .collect()
}
