//! Constants used throughout the prescription core crate.
//!
//! Fallback strings live here so that extractors, tests and API documentation agree on the exact
//! wording users see when heuristics degrade.

/// Default base URL of the generative language API.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model used for prescription images.
pub const DEFAULT_VISION_MODEL: &str = "gemini-1.5-flash";

/// Default model used for text-only prompts.
pub const DEFAULT_TEXT_MODEL: &str = "gemini-1.5-flash";

/// Default upper bound on a single model call, in seconds.
pub const DEFAULT_MODEL_TIMEOUT_SECS: u64 = 30;

/// Largest accepted model timeout, in seconds.
pub const MAX_MODEL_TIMEOUT_SECS: u64 = 300;

/// Request body ceiling for endpoints that carry an inline image, in bytes. Matches the model's
/// inline-data limit; base64 inflates the image by a third.
pub const MAX_IMAGE_BODY_BYTES: usize = 20 * 1024 * 1024;

/// Low temperature favours literal transcription over paraphrase.
pub const PRESCRIPTION_TEMPERATURE: f32 = 0.2;

/// Output token ceiling for prescription analysis.
pub const PRESCRIPTION_MAX_OUTPUT_TOKENS: u32 = 1024;

/// Instruction sent alongside every prescription image.
pub const PRESCRIPTION_PROMPT: &str = "Analyze this medical prescription image. Extract all \
medication details, including name, dosage, frequency, and duration. Identify the medical \
condition being treated if possible. Provide a structured analysis with recommendations for the \
patient.";

/// Prompt used by the generic proxy when a vision request carries no prompt.
pub const DEFAULT_VISION_PROMPT: &str = "Analyze this image";

/// Returned by the generic proxy when the model produced no text.
pub const NO_RESPONSE_GENERATED: &str = "No response generated";

/// Table holding prescription header rows.
pub const PRESCRIPTIONS_TABLE: &str = "prescriptions";

/// Table holding full analysis blobs keyed by prescription id.
pub const PRESCRIPTION_ANALYSES_TABLE: &str = "prescription_analyses";

/// Table mirroring identity-provider users.
pub const USERS_TABLE: &str = "users";

/// Header value used when the analysis has no medication to project.
pub const UNKNOWN_FIELD: &str = "Unknown";

/// Placeholder for medications found through loose cue words only.
pub const AS_DIRECTED: &str = "As directed";

/// Name used when a cue word matched but carried no usable text.
pub const UNKNOWN_MEDICATION: &str = "Unknown medication";

/// Placeholder medication name when nothing was recognised.
pub const UNIDENTIFIED_MEDICATION: &str = "Could not clearly identify medication";

/// Placeholder dosage/frequency/duration when nothing was recognised.
pub const CONSULT_PROVIDER: &str = "Please consult healthcare provider";

/// Condition reported when no cue word matched.
pub const CONDITION_NOT_SPECIFIED: &str = "Not specified";

/// Recommendations used when the text offers none, in this order.
pub const DEFAULT_RECOMMENDATIONS: [&str; 3] = [
    "Take medication as prescribed",
    "Contact your healthcare provider with any questions or concerns",
    "Complete the full course of medication even if symptoms improve",
];

/// Summary used when the text is too short to summarise.
pub const GENERIC_SUMMARY: &str =
    "Analysis completed. Please review the extracted medication details and recommendations.";

/// Terms that make a workout plan inadvisable.
pub const WORKOUT_DENYLIST: [&str; 12] = [
    "fracture",
    "broken",
    "respiratory",
    "infection",
    "surgery",
    "acute",
    "injury",
    "concussion",
    "fever",
    "flu",
    "covid",
    "pneumonia",
];
