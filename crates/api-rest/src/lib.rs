//! # API REST
//!
//! REST API implementation for RX.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, bearer authentication)
//!
//! Uses `api-shared` for wire types and `rx-core` for everything else.

#![warn(rust_2018_idioms)]

pub mod error;
mod handlers;

pub use error::ApiError;

use api_shared::{auth::bearer_token, AuthHeaderError};
use axum::extract::DefaultBodyLimit;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderName, StatusCode};
use axum::routing::{get, post};
use axum::Router;
use rx_core::constants::MAX_IMAGE_BODY_BYTES;
use rx_core::{Identity, IdentityProvider, PrescriptionService};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    service: PrescriptionService,
    identity: Arc<dyn IdentityProvider>,
}

impl AppState {
    pub fn new(service: PrescriptionService, identity: Arc<dyn IdentityProvider>) -> Self {
        Self { service, identity }
    }

    /// Resolve the caller from the `Authorization` header.
    ///
    /// A missing or malformed header is a client error; a token the identity provider refuses
    /// is an authentication error.
    async fn authenticate(&self, headers: &HeaderMap) -> Result<Identity, ApiError> {
        let header = headers
            .get(AUTHORIZATION)
            .map(|value| value.to_str().map_err(|_| AuthHeaderError::Malformed))
            .transpose()?;
        let token = bearer_token(header)?;
        Ok(self.identity.authenticate(&token).await?)
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::analyze_prescription,
        handlers::list_prescriptions,
        handlers::get_prescription,
        handlers::medication_info,
        handlers::generate,
    ),
    components(schemas(
        api_shared::HealthRes,
        api_shared::ErrorRes,
        api_shared::MedicationDto,
        api_shared::AnalysisDto,
        api_shared::AnalyzeReq,
        api_shared::AnalyzeRes,
        api_shared::PrescriptionRes,
        api_shared::PrescriptionDetailsRes,
        api_shared::MedicationInfoRes,
        api_shared::GenerateReq,
        api_shared::GenerateRes,
    )),
    modifiers(&BearerAuth)
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

/// Browser clients call from arbitrary origins and send Supabase client headers.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([
            AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            CONTENT_TYPE,
        ])
}

/// `OPTIONS` without `Access-Control-Request-Method` is not a preflight, so the CORS layer passes
/// it through. Browsers and Supabase clients still expect an empty success.
async fn options_ok() -> StatusCode {
    StatusCode::OK
}

/// Build the REST router with Swagger UI and CORS applied to every route.
///
/// Image-carrying routes accept bodies up to [`MAX_IMAGE_BODY_BYTES`]; the rest keep axum's
/// default limit.
pub fn router(state: AppState) -> Router {
    let image_limit = DefaultBodyLimit::max(MAX_IMAGE_BODY_BYTES);

    Router::new()
        .route("/health", get(handlers::health).options(options_ok))
        .route(
            "/analyze-prescription",
            post(handlers::analyze_prescription)
                .options(options_ok)
                .layer(image_limit),
        )
        .route(
            "/prescriptions",
            get(handlers::list_prescriptions).options(options_ok),
        )
        .route(
            "/prescriptions/:id",
            get(handlers::get_prescription).options(options_ok),
        )
        .route(
            "/medications/:name",
            get(handlers::medication_info).options(options_ok),
        )
        .route(
            "/generate",
            post(handlers::generate).options(options_ok).layer(image_limit),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors_layer())
        .with_state(state)
}
