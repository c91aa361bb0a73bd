//! Managed Postgres tables reached through PostgREST.
//!
//! Every request carries the service-role key in both the `apikey` and `Authorization` headers.
//! Row-level security is therefore bypassed; ownership checks happen in
//! [`super::PrescriptionRepository`].

use super::{
    id_as_string, NewPrescription, NewPrescriptionAnalysis, PrescriptionRecord, PrescriptionStore,
    StoreError,
};
use crate::analysis::AnalysisResult;
use crate::constants::{PRESCRIPTIONS_TABLE, PRESCRIPTION_ANALYSES_TABLE};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

const MAX_ERROR_BODY_CHARS: usize = 512;

/// Thin PostgREST and auth client shared by the store and the identity provider.
#[derive(Clone)]
pub struct SupabaseClient {
    http: reqwest::Client,
    url: String,
    service_key: String,
}

impl std::fmt::Debug for SupabaseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseClient")
            .field("url", &self.url)
            .field("service_key", &"<redacted>")
            .finish()
    }
}

impl SupabaseClient {
    pub fn new(url: impl Into<String>, service_key: impl Into<String>) -> Self {
        let url: String = url.into();
        Self {
            http: reqwest::Client::new(),
            url: url.trim_end_matches('/').to_owned(),
            service_key: service_key.into(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.url, table)
    }

    fn service_request(&self, method: Method, url: String) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }

    /// `GET /auth/v1/user` on behalf of the holder of `access_token`.
    pub(crate) async fn auth_user(&self, access_token: &str) -> Result<Response, reqwest::Error> {
        self.http
            .get(format!("{}/auth/v1/user", self.url))
            .header("apikey", &self.service_key)
            .bearer_auth(access_token)
            .send()
            .await
    }

    /// Insert `row` into `table` with the given `Prefer` header.
    pub(crate) async fn insert<T: Serialize + ?Sized>(
        &self,
        table: &str,
        row: &T,
        prefer: &str,
    ) -> Result<Response, StoreError> {
        let response = self
            .service_request(Method::POST, self.table_url(table))
            .header("Prefer", prefer)
            .json(row)
            .send()
            .await?;
        ensure_success(response).await
    }

    /// Rows of `table` matching the PostgREST `query` pairs.
    pub(crate) async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>, StoreError> {
        let response = self
            .service_request(Method::GET, self.table_url(table))
            .query(query)
            .send()
            .await?;
        Ok(ensure_success(response).await?.json().await?)
    }
}

async fn ensure_success(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Status {
        status: status.as_u16(),
        body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
    })
}

#[derive(Deserialize)]
struct InsertedRow {
    #[serde(deserialize_with = "id_as_string")]
    id: String,
}

#[derive(Deserialize)]
struct AnalysisRow {
    analysis_data: AnalysisResult,
}

#[derive(Clone, Debug)]
pub struct SupabaseStore {
    client: SupabaseClient,
}

impl SupabaseStore {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PrescriptionStore for SupabaseStore {
    async fn insert_prescription(&self, row: &NewPrescription) -> Result<String, StoreError> {
        let inserted: Vec<InsertedRow> = self
            .client
            .insert(PRESCRIPTIONS_TABLE, row, "return=representation")
            .await?
            .json()
            .await?;
        inserted
            .into_iter()
            .next()
            .map(|row| row.id)
            .ok_or(StoreError::EmptyResponse)
    }

    async fn insert_analysis(&self, row: &NewPrescriptionAnalysis) -> Result<(), StoreError> {
        self.client
            .insert(PRESCRIPTION_ANALYSES_TABLE, row, "return=minimal")
            .await?;
        Ok(())
    }

    async fn list_prescriptions(
        &self,
        user_id: &str,
    ) -> Result<Vec<PrescriptionRecord>, StoreError> {
        let owner = format!("eq.{user_id}");
        self.client
            .select(
                PRESCRIPTIONS_TABLE,
                &[
                    ("select", "*"),
                    ("user_id", owner.as_str()),
                    ("order", "created_at.desc"),
                ],
            )
            .await
    }

    async fn get_prescription(&self, id: &str) -> Result<Option<PrescriptionRecord>, StoreError> {
        let id = format!("eq.{id}");
        let rows: Vec<PrescriptionRecord> = self
            .client
            .select(
                PRESCRIPTIONS_TABLE,
                &[("select", "*"), ("id", id.as_str()), ("limit", "1")],
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn get_analysis(
        &self,
        prescription_id: &str,
    ) -> Result<Option<AnalysisResult>, StoreError> {
        let id = format!("eq.{prescription_id}");
        let rows: Vec<AnalysisRow> = self
            .client
            .select(
                PRESCRIPTION_ANALYSES_TABLE,
                &[
                    ("select", "analysis_data"),
                    ("prescription_id", id.as_str()),
                    ("limit", "1"),
                ],
            )
            .await?;
        Ok(rows.into_iter().next().map(|row| row.analysis_data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Medication;
    use crate::test_support::spawn_upstream;
    use axum::extract::{Path, Query, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Seen {
        requests: Arc<Mutex<Vec<(String, HeaderMap, HashMap<String, String>, Option<Value>)>>>,
    }

    fn analysis() -> AnalysisResult {
        AnalysisResult {
            medication_list: vec![Medication::new("Lisinopril", "10mg", "daily", "30 days")],
            condition: "Hypertension".into(),
            summary: "Blood pressure control.".into(),
            recommendations: vec!["Monitor blood pressure".into()],
            needs_workout: true,
        }
    }

    fn header_row(id: Value, user: &str) -> Value {
        json!({
            "id": id,
            "user_id": user,
            "medication_name": "Lisinopril",
            "dosage": "10mg",
            "frequency": "daily",
            "duration": "30 days",
            "condition": "Hypertension",
            "summary": "Blood pressure control.",
            "recommendations": ["Monitor blood pressure"],
            "created_at": "2025-03-01T10:15:00+00:00"
        })
    }

    async fn postgrest() -> (SupabaseStore, Seen) {
        let seen = Seen::default();
        let app = Router::new()
            .route(
                "/rest/v1/:table",
                get(
                    |State(seen): State<Seen>,
                     Path(table): Path<String>,
                     headers: HeaderMap,
                     Query(query): Query<HashMap<String, String>>| async move {
                        seen.requests
                            .lock()
                            .unwrap()
                            .push((table.clone(), headers, query, None));
                        if table == PRESCRIPTIONS_TABLE {
                            Json(json!([header_row(json!(7), "user-1")]))
                        } else {
                            Json(json!([{ "analysis_data": analysis() }]))
                        }
                    },
                )
                .post(
                    |State(seen): State<Seen>,
                     Path(table): Path<String>,
                     headers: HeaderMap,
                     Json(body): Json<Value>| async move {
                        seen.requests.lock().unwrap().push((
                            table.clone(),
                            headers,
                            HashMap::new(),
                            Some(body),
                        ));
                        if table == PRESCRIPTIONS_TABLE {
                            (StatusCode::CREATED, Json(json!([{ "id": "rx-123" }])))
                        } else {
                            (StatusCode::CREATED, Json(json!([])))
                        }
                    },
                ),
            )
            .with_state(seen.clone());
        let base = spawn_upstream(app).await;
        (
            SupabaseStore::new(SupabaseClient::new(base, "service-key")),
            seen,
        )
    }

    #[tokio::test]
    async fn inserts_send_service_key_and_return_generated_id() {
        let (store, seen) = postgrest().await;
        let row = NewPrescription::from_analysis("user-1", &analysis());

        let id = store.insert_prescription(&row).await.unwrap();
        assert_eq!(id, "rx-123");
        store
            .insert_analysis(&NewPrescriptionAnalysis {
                prescription_id: id,
                analysis_data: analysis(),
            })
            .await
            .unwrap();

        let requests = seen.requests.lock().unwrap();
        let (table, headers, _, body) = &requests[0];
        assert_eq!(table, PRESCRIPTIONS_TABLE);
        assert_eq!(headers["apikey"], "service-key");
        assert_eq!(headers["authorization"], "Bearer service-key");
        assert_eq!(headers["prefer"], "return=representation");
        let body = body.as_ref().unwrap();
        assert_eq!(body["medication_name"], "Lisinopril");
        assert_eq!(body["user_id"], "user-1");

        let (table, _, _, body) = &requests[1];
        assert_eq!(table, PRESCRIPTION_ANALYSES_TABLE);
        let body = body.as_ref().unwrap();
        assert_eq!(body["prescription_id"], "rx-123");
        assert_eq!(body["analysis_data"]["medicationList"][0]["name"], "Lisinopril");
    }

    #[tokio::test]
    async fn reads_use_postgrest_filters() {
        let (store, seen) = postgrest().await;

        let history = store.list_prescriptions("user-1").await.unwrap();
        assert_eq!(history[0].id, "7");
        let analysis_row = store.get_analysis("7").await.unwrap();
        assert_eq!(analysis_row, Some(analysis()));

        let requests = seen.requests.lock().unwrap();
        let (_, _, query, _) = &requests[0];
        assert_eq!(query["user_id"], "eq.user-1");
        assert_eq!(query["order"], "created_at.desc");
        let (_, _, query, _) = &requests[1];
        assert_eq!(query["prescription_id"], "eq.7");
        assert_eq!(query["select"], "analysis_data");
    }

    #[tokio::test]
    async fn empty_insert_response_is_an_error() {
        let app = Router::new().route(
            "/rest/v1/:table",
            axum::routing::post(|| async { (StatusCode::CREATED, Json(json!([]))) }),
        );
        let store = SupabaseStore::new(SupabaseClient::new(spawn_upstream(app).await, "k"));
        let row = NewPrescription::from_analysis("user-1", &analysis());

        let err = store.insert_prescription(&row).await.unwrap_err();
        assert!(matches!(err, StoreError::EmptyResponse));
    }

    #[tokio::test]
    async fn rejected_write_surfaces_status_and_body() {
        let app = Router::new().route(
            "/rest/v1/:table",
            axum::routing::post(|| async {
                (
                    StatusCode::CONFLICT,
                    Json(json!({ "message": "violates foreign key constraint" })),
                )
            }),
        );
        let store = SupabaseStore::new(SupabaseClient::new(spawn_upstream(app).await, "k"));

        let err = store
            .insert_analysis(&NewPrescriptionAnalysis {
                prescription_id: "missing".into(),
                analysis_data: analysis(),
            })
            .await
            .unwrap_err();
        match err {
            StoreError::Status { status, body } => {
                assert_eq!(status, 409);
                assert!(body.contains("foreign key"));
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }
}
