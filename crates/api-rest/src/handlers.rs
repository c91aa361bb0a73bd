use crate::{ApiError, AppState};
use api_shared::{
    AnalyzeReq, AnalyzeRes, GenerateReq, GenerateRes, HealthRes, HealthService,
    MedicationInfoRes, PrescriptionDetailsRes, PrescriptionRes,
};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::Json;
use rx_core::{medication_info, PrescriptionError};
use rx_types::ImagePayload;

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for monitoring and load balancers.
#[axum::debug_handler]
pub(crate) async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    post,
    path = "/analyze-prescription",
    request_body = AnalyzeReq,
    responses(
        (status = 200, description = "Prescription analysed and saved", body = AnalyzeRes),
        (status = 400, description = "Missing image or authorization header", body = api_shared::ErrorRes),
        (status = 401, description = "Token rejected by the identity provider", body = api_shared::ErrorRes),
        (status = 500, description = "Model or persistence failure", body = api_shared::ErrorRes)
    ),
    security(("bearer" = []))
)]
/// Analyse a prescription image and persist the result.
///
/// Runs authenticate, validate, analyse, persist and respond in that order. The first failing
/// step ends the request; nothing is returned from a partially completed pipeline.
///
/// # Errors
/// - `400` if the authorization header or the image is missing or malformed.
/// - `401` if the identity provider rejects the token.
/// - `500` if the model call or either persistence write fails. A failed analysis write still
///   leaves the prescription header stored.
#[axum::debug_handler]
pub(crate) async fn analyze_prescription(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<AnalyzeReq>, JsonRejection>,
) -> Result<Json<AnalyzeRes>, ApiError> {
    tracing::debug!(stage = "authenticating", "analyze-prescription");
    let caller = state.authenticate(&headers).await?;

    tracing::debug!(stage = "validating", user_id = %caller.user_id, "analyze-prescription");
    let req = json_body(body)?;
    if let Some(claimed) = req.user_id.as_deref() {
        if claimed != caller.user_id {
            tracing::warn!(
                claimed,
                user_id = %caller.user_id,
                "body userId differs from authenticated caller; using the caller"
            );
        }
    }
    let image = ImagePayload::parse(req.image.as_deref().unwrap_or_default())
        .map_err(PrescriptionError::from)?;

    tracing::debug!(stage = "analyzing", mime_type = image.mime_type(), "analyze-prescription");
    let analysis = state.service.analyse(&image).await?;

    tracing::debug!(stage = "persisting", "analyze-prescription");
    let prescription_id = state.service.save(&caller.user_id, &analysis).await?;

    tracing::info!(
        stage = "responding",
        user_id = %caller.user_id,
        %prescription_id,
        "prescription analysed"
    );
    Ok(Json(AnalyzeRes {
        analysis: analysis.into(),
        prescription_id,
    }))
}

#[utoipa::path(
    get,
    path = "/prescriptions",
    responses(
        (status = 200, description = "Caller's prescriptions, newest first", body = [PrescriptionRes]),
        (status = 400, description = "Missing authorization header", body = api_shared::ErrorRes),
        (status = 401, description = "Token rejected", body = api_shared::ErrorRes),
        (status = 500, description = "Store failure", body = api_shared::ErrorRes)
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub(crate) async fn list_prescriptions(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<PrescriptionRes>>, ApiError> {
    let caller = state.authenticate(&headers).await?;
    let records = state.service.repository().history(&caller.user_id).await?;
    Ok(Json(records.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/prescriptions/{id}",
    params(("id" = String, Path, description = "Prescription id")),
    responses(
        (status = 200, description = "Prescription with its analysis", body = PrescriptionDetailsRes),
        (status = 400, description = "Malformed id or missing authorization header", body = api_shared::ErrorRes),
        (status = 401, description = "Token rejected", body = api_shared::ErrorRes),
        (status = 404, description = "No such prescription for this caller", body = api_shared::ErrorRes),
        (status = 500, description = "Store failure", body = api_shared::ErrorRes)
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub(crate) async fn get_prescription(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<PrescriptionDetailsRes>, ApiError> {
    let caller = state.authenticate(&headers).await?;
    let details = state
        .service
        .repository()
        .details(&caller.user_id, &id)
        .await?;
    Ok(Json(details.into()))
}

#[utoipa::path(
    get,
    path = "/medications/{name}",
    params(("name" = String, Path, description = "Medication name, case-insensitive")),
    responses(
        (status = 200, description = "Reference information", body = MedicationInfoRes)
    )
)]
/// Reference notes for a medication; unknown names get generic advice.
#[axum::debug_handler]
pub(crate) async fn medication_info(
    State(_state): State<AppState>,
    Path(name): Path<String>,
) -> Json<MedicationInfoRes> {
    Json(medication_info::lookup(&name).into())
}

#[utoipa::path(
    post,
    path = "/generate",
    request_body = GenerateReq,
    responses(
        (status = 200, description = "Model answer", body = GenerateRes),
        (status = 400, description = "Neither prompt nor image supplied", body = api_shared::ErrorRes),
        (status = 401, description = "Token rejected", body = api_shared::ErrorRes),
        (status = 500, description = "Model failure", body = api_shared::ErrorRes)
    ),
    security(("bearer" = []))
)]
/// Forward a free-form prompt, optionally with an image, to the model.
#[axum::debug_handler]
pub(crate) async fn generate(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<GenerateReq>, JsonRejection>,
) -> Result<Json<GenerateRes>, ApiError> {
    state.authenticate(&headers).await?;
    let req = json_body(body)?;

    let image = match req.image.as_deref().filter(|image| !image.trim().is_empty()) {
        Some(image) => Some(ImagePayload::parse(image).map_err(PrescriptionError::from)?),
        None => None,
    };

    let result = state
        .service
        .generate(req.prompt.as_deref(), req.is_vision(), image.as_ref())
        .await?;
    Ok(Json(GenerateRes { result }))
}
