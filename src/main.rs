use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, router};
use rx_core::config::{
    dev_tokens_from_env_value, model_timeout_from_env_value, store_backend_from_env_values,
};
use rx_core::{
    CoreConfig, GeminiClient, IdentityProvider, MemoryStore, ModelConfig, PrescriptionRepository,
    PrescriptionService, PrescriptionStore, StaticTokenIdentity, StoreBackend, SupabaseClient,
    SupabaseIdentity, SupabaseStore,
};

/// Main entry point for the RX service
///
/// Resolves configuration once, wires the model client, store and identity provider, then serves
/// the REST API (with Swagger UI) on `RX_REST_ADDR`.
///
/// # Environment Variables
/// - `RX_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `GEMINI_API_KEY`: key for the generative model (required)
/// - `GEMINI_BASE_URL`, `GEMINI_VISION_MODEL`, `GEMINI_TEXT_MODEL`: model overrides
/// - `RX_MODEL_TIMEOUT_SECS`: per-call model timeout (default: 30)
/// - `RX_STORE`: `supabase` (default) or `memory`
/// - `SUPABASE_URL`, `SUPABASE_SERVICE_ROLE_KEY`: required for the supabase store
/// - `RX_DEV_TOKENS`: `token:user,...` pairs; used as the identity provider with the memory store
///
/// # Returns
/// * `Ok(())` - If the server starts and shuts down cleanly
/// * `Err(anyhow::Error)` - If configuration is invalid or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rx_run=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("rx_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = core_config_from_env()?;
    tracing::info!(?cfg, "configuration resolved");

    let model = Arc::new(GeminiClient::new(cfg.model().clone())?);

    let (store, identity) = match cfg.store() {
        StoreBackend::Supabase { url, service_key } => {
            let client = SupabaseClient::new(url.clone(), service_key.clone());
            let store: Arc<dyn PrescriptionStore> = Arc::new(SupabaseStore::new(client.clone()));
            let identity: Arc<dyn IdentityProvider> = Arc::new(SupabaseIdentity::new(client));
            (store, identity)
        }
        StoreBackend::Memory => {
            let tokens = dev_tokens_from_env_value(std::env::var("RX_DEV_TOKENS").ok())?;
            if tokens.is_empty() {
                tracing::warn!("memory store without RX_DEV_TOKENS: every request will be rejected");
            }
            let store: Arc<dyn PrescriptionStore> = Arc::new(MemoryStore::new());
            let identity: Arc<dyn IdentityProvider> = Arc::new(StaticTokenIdentity::new(tokens));
            (store, identity)
        }
    };

    let service = PrescriptionService::new(model, PrescriptionRepository::new(store));
    let app = router(AppState::new(service, identity));

    let rest_addr = std::env::var("RX_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    tracing::info!("++ Starting RX REST on {}", rest_addr);

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    Ok(())
}

fn core_config_from_env() -> anyhow::Result<CoreConfig> {
    let env = |name: &str| std::env::var(name).ok();

    let model = ModelConfig::new(
        std::env::var("GEMINI_API_KEY")
            .map_err(|_| anyhow::anyhow!("GEMINI_API_KEY must be set"))?,
        env("GEMINI_BASE_URL"),
        env("GEMINI_VISION_MODEL"),
        env("GEMINI_TEXT_MODEL"),
        model_timeout_from_env_value(env("RX_MODEL_TIMEOUT_SECS"))?,
    )?;
    let store = store_backend_from_env_values(
        env("RX_STORE"),
        env("SUPABASE_URL"),
        env("SUPABASE_SERVICE_ROLE_KEY"),
    )?;

    Ok(CoreConfig::new(model, store))
}
