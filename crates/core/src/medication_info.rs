//! Patient-facing reference notes for common medications.
//!
//! The table is fixed and deliberately small. Unknown names get a generic entry that points the
//! patient back at their prescriber.

use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationInfo {
    pub name: String,
    pub description: String,
    pub side_effects: Vec<String>,
    pub precautions: Vec<String>,
    pub interactions: Vec<String>,
    /// `false` when the generic fallback was returned.
    pub known: bool,
}

struct Entry {
    name: &'static str,
    description: &'static str,
    side_effects: &'static [&'static str],
    precautions: &'static [&'static str],
    interactions: &'static [&'static str],
}

const ENTRIES: &[Entry] = &[
    Entry {
        name: "Amoxicillin",
        description: "Amoxicillin is a penicillin antibiotic that fights bacteria. It is used to treat many different types of infection caused by bacteria, such as tonsillitis, bronchitis, pneumonia, and infections of the ear, nose, throat, skin, or urinary tract.",
        side_effects: &[
            "Diarrhea or loose stools",
            "Stomach pain or discomfort",
            "Nausea or vomiting",
            "Headache",
            "Rash, itching, or hives",
            "Oral thrush (white patches in mouth)",
        ],
        precautions: &[
            "Tell your doctor if you have a history of allergic reactions to penicillin antibiotics",
            "Complete the full course even if you feel better",
            "Take with or without food but at evenly spaced intervals",
            "May reduce the effectiveness of birth control pills",
        ],
        interactions: &[
            "Probenecid (increases amoxicillin levels)",
            "Allopurinol (increased risk of rash)",
            "Blood thinners like warfarin",
            "Methotrexate (increased toxicity)",
            "Certain antibiotics may decrease effectiveness",
        ],
    },
    Entry {
        name: "Ibuprofen",
        description: "Ibuprofen is a nonsteroidal anti-inflammatory drug (NSAID) that reduces hormones causing inflammation and pain in the body. It's commonly used to reduce fever and treat pain or inflammation from headaches, toothaches, back pain, arthritis, or minor injury.",
        side_effects: &[
            "Stomach pain, heartburn, or indigestion",
            "Nausea or vomiting",
            "Diarrhea or constipation",
            "Dizziness or headache",
            "Drowsiness or fatigue",
            "Ringing in ears (tinnitus)",
            "Mild rash or itching",
        ],
        precautions: &[
            "Take with food or milk to prevent stomach upset",
            "Use the lowest effective dose for the shortest duration",
            "Avoid alcohol while taking this medication",
            "Not recommended for use during pregnancy, especially in the third trimester",
            "May increase risk of heart attack or stroke with long-term use",
        ],
        interactions: &[
            "Aspirin or other NSAIDs (increased bleeding risk)",
            "Blood pressure medications (may decrease effectiveness)",
            "Blood thinners like warfarin (increased bleeding risk)",
            "Lithium (increased lithium levels)",
            "Diuretics (reduced effectiveness)",
            "SSRIs (increased bleeding risk)",
        ],
    },
    Entry {
        name: "Lisinopril",
        description: "Lisinopril is an ACE inhibitor that helps relax blood vessels, lowering blood pressure and decreasing workload on the heart. It's used to treat high blood pressure, heart failure, and to improve survival after a heart attack.",
        side_effects: &[
            "Dry, persistent cough",
            "Dizziness or lightheadedness",
            "Headache",
            "Fatigue",
            "Nausea or vomiting",
            "Diarrhea",
            "Skin rash",
            "Increased potassium levels",
        ],
        precautions: &[
            "Monitor blood pressure regularly",
            "Report swelling of face, lips, tongue, or difficulty breathing immediately (may indicate angioedema)",
            "Avoid pregnancy (can cause serious birth defects)",
            "May cause sudden drops in blood pressure when standing up",
            "Maintain adequate hydration but avoid potassium supplements unless prescribed",
        ],
        interactions: &[
            "Potassium supplements or potassium-sparing diuretics",
            "NSAIDs (may reduce effectiveness)",
            "Lithium (increased lithium levels)",
            "Diabetes medications (may cause low blood sugar)",
            "Salt substitutes containing potassium",
        ],
    },
];

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

/// Look up `name` case-insensitively, falling back to a generic entry.
pub fn lookup(name: &str) -> MedicationInfo {
    let name = name.trim();

    match ENTRIES
        .iter()
        .find(|entry| entry.name.eq_ignore_ascii_case(name))
    {
        Some(entry) => MedicationInfo {
            name: entry.name.to_owned(),
            description: entry.description.to_owned(),
            side_effects: owned(entry.side_effects),
            precautions: owned(entry.precautions),
            interactions: owned(entry.interactions),
            known: true,
        },
        None => MedicationInfo {
            name: name.to_owned(),
            description: format!(
                "{name} is a medication prescribed by your doctor. Always follow your doctor's instructions when taking this medication."
            ),
            side_effects: vec![
                "Consult your healthcare provider about potential side effects".into(),
            ],
            precautions: vec![
                "Take as directed by your healthcare provider".into(),
                "Do not stop taking without consulting your doctor".into(),
            ],
            interactions: vec![
                "Consult your healthcare provider about potential drug interactions".into(),
            ],
            known: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_case_and_whitespace() {
        let info = lookup("  ibuprofen ");
        assert!(info.known);
        assert_eq!(info.name, "Ibuprofen");
        assert_eq!(info.side_effects.len(), 7);
    }

    #[test]
    fn unknown_names_get_generic_advice() {
        let info = lookup("Metformin");
        assert!(!info.known);
        assert!(info.description.starts_with("Metformin is a medication"));
        assert_eq!(info.precautions.len(), 2);
    }

    #[test]
    fn serialises_camel_case() {
        let value = serde_json::to_value(lookup("Lisinopril")).unwrap();
        assert!(value.get("sideEffects").is_some());
        assert_eq!(value["interactions"][0], "Potassium supplements or potassium-sparing diuretics");
    }
}
