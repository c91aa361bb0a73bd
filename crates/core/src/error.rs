use crate::repositories::StoreError;

/// Failures talking to the external vision/language model.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("model request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("model returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("no usable response from the external model")]
    NoCandidate,
}

/// Failures resolving a bearer token to a caller identity.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("invalid or expired credential: {0}")]
    Rejected(String),
    #[error("identity provider request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("identity provider returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to register user: {0}")]
    UserSync(#[source] StoreError),
}

#[derive(Debug, thiserror::Error)]
pub enum PrescriptionError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Image(#[from] rx_types::ImageError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("failed to save prescription: {0}")]
    SavePrescription(#[source] StoreError),
    #[error(
        "failed to save analysis (prescription {prescription_id} was kept): {source}"
    )]
    SaveAnalysis {
        prescription_id: String,
        #[source]
        source: StoreError,
    },
    #[error("failed to load prescriptions: {0}")]
    Load(#[source] StoreError),
    #[error("prescription not found")]
    NotFound,
}

pub type PrescriptionResult<T> = std::result::Result<T, PrescriptionError>;
