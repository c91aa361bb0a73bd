//! Core runtime configuration.
//!
//! Everything here is resolved once at process startup and then handed to services. Request
//! handlers never read environment variables; the `*_from_env_value` helpers take the raw value
//! so that binaries own the environment and tests can pass values directly.

use crate::constants::{
    DEFAULT_GEMINI_BASE_URL, DEFAULT_MODEL_TIMEOUT_SECS, DEFAULT_TEXT_MODEL,
    DEFAULT_VISION_MODEL, MAX_MODEL_TIMEOUT_SECS,
};
use crate::{PrescriptionError, PrescriptionResult};
use std::time::Duration;

/// Settings for the external generative model.
#[derive(Clone)]
pub struct ModelConfig {
    api_key: String,
    base_url: String,
    vision_model: String,
    text_model: String,
    timeout: Duration,
}

impl ModelConfig {
    pub fn new(
        api_key: String,
        base_url: Option<String>,
        vision_model: Option<String>,
        text_model: Option<String>,
        timeout: Duration,
    ) -> PrescriptionResult<Self> {
        if api_key.trim().is_empty() {
            return Err(PrescriptionError::InvalidInput(
                "GEMINI_API_KEY cannot be empty".into(),
            ));
        }

        let base_url = non_blank(base_url).unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.into());
        validate_http_url("GEMINI_BASE_URL", &base_url)?;

        Ok(Self {
            api_key: api_key.trim().to_owned(),
            base_url: base_url.trim_end_matches('/').to_owned(),
            vision_model: non_blank(vision_model).unwrap_or_else(|| DEFAULT_VISION_MODEL.into()),
            text_model: non_blank(text_model).unwrap_or_else(|| DEFAULT_TEXT_MODEL.into()),
            timeout,
        })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn vision_model(&self) -> &str {
        &self.vision_model
    }

    pub fn text_model(&self) -> &str {
        &self.text_model
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl std::fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("vision_model", &self.vision_model)
            .field("text_model", &self.text_model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Where prescriptions are persisted.
#[derive(Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// Managed Postgres behind a PostgREST endpoint, using the service-role key.
    Supabase { url: String, service_key: String },
    /// In-process tables; contents are lost on restart.
    Memory,
}

impl std::fmt::Debug for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreBackend::Supabase { url, .. } => f
                .debug_struct("Supabase")
                .field("url", url)
                .field("service_key", &"<redacted>")
                .finish(),
            StoreBackend::Memory => f.write_str("Memory"),
        }
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    model: ModelConfig,
    store: StoreBackend,
}

impl CoreConfig {
    pub fn new(model: ModelConfig, store: StoreBackend) -> Self {
        Self { model, store }
    }

    pub fn model(&self) -> &ModelConfig {
        &self.model
    }

    pub fn store(&self) -> &StoreBackend {
        &self.store
    }
}

/// Parse the model timeout in whole seconds.
///
/// `None` or blank yields the default; values outside `1..=MAX_MODEL_TIMEOUT_SECS` are rejected.
pub fn model_timeout_from_env_value(value: Option<String>) -> PrescriptionResult<Duration> {
    let Some(raw) = non_blank(value) else {
        return Ok(Duration::from_secs(DEFAULT_MODEL_TIMEOUT_SECS));
    };

    let secs: u64 = raw.parse().map_err(|_| {
        PrescriptionError::InvalidInput(format!("RX_MODEL_TIMEOUT_SECS is not a number: {raw}"))
    })?;

    if secs == 0 || secs > MAX_MODEL_TIMEOUT_SECS {
        return Err(PrescriptionError::InvalidInput(format!(
            "RX_MODEL_TIMEOUT_SECS must be between 1 and {MAX_MODEL_TIMEOUT_SECS}"
        )));
    }

    Ok(Duration::from_secs(secs))
}

/// Pick the store backend from `RX_STORE` and the Supabase connection values.
pub fn store_backend_from_env_values(
    kind: Option<String>,
    supabase_url: Option<String>,
    service_key: Option<String>,
) -> PrescriptionResult<StoreBackend> {
    let kind = non_blank(kind).map(|k| k.to_ascii_lowercase());

    match kind.as_deref().unwrap_or("supabase") {
        "memory" => Ok(StoreBackend::Memory),
        "supabase" => {
            let url = non_blank(supabase_url).ok_or_else(|| {
                PrescriptionError::InvalidInput("SUPABASE_URL must be set".into())
            })?;
            validate_http_url("SUPABASE_URL", &url)?;
            let service_key = non_blank(service_key).ok_or_else(|| {
                PrescriptionError::InvalidInput("SUPABASE_SERVICE_ROLE_KEY must be set".into())
            })?;
            Ok(StoreBackend::Supabase {
                url: url.trim_end_matches('/').to_owned(),
                service_key,
            })
        }
        other => Err(PrescriptionError::InvalidInput(format!(
            "unknown RX_STORE backend: {other} (expected supabase or memory)"
        ))),
    }
}

/// Parse `token:user-id` pairs separated by commas.
pub fn dev_tokens_from_env_value(value: Option<String>) -> PrescriptionResult<Vec<(String, String)>> {
    let Some(raw) = non_blank(value) else {
        return Ok(Vec::new());
    };

    raw.split(',')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once(':') {
            Some((token, user)) if !token.trim().is_empty() && !user.trim().is_empty() => {
                Ok((token.trim().to_owned(), user.trim().to_owned()))
            }
            _ => Err(PrescriptionError::InvalidInput(format!(
                "RX_DEV_TOKENS entry must look like token:user-id, got {pair}"
            ))),
        })
        .collect()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn validate_http_url(name: &str, url: &str) -> PrescriptionResult<()> {
    if url.starts_with("https://") || url.starts_with("http://") {
        Ok(())
    } else {
        Err(PrescriptionError::InvalidInput(format!(
            "{name} must be an http(s) URL"
        )))
    }
}
