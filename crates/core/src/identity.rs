//! Resolving bearer credentials to callers.
//!
//! [`IdentityProvider`] turns an opaque access token into an [`Identity`]. Tokens are never
//! inspected locally: [`SupabaseIdentity`] asks the auth service, and [`StaticTokenIdentity`]
//! serves a fixed table for local development.

use crate::constants::USERS_TABLE;
use crate::error::IdentityError;
use crate::repositories::SupabaseClient;
use async_trait::async_trait;
use reqwest::StatusCode;
use rx_types::NonEmptyText;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const MAX_ERROR_BODY_CHARS: usize = 512;

/// The authenticated caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: String,
    pub email: Option<String>,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn authenticate(&self, token: &NonEmptyText) -> Result<Identity, IdentityError>;
}

#[derive(Deserialize)]
struct AuthUser {
    id: String,
    email: Option<String>,
}

#[derive(Serialize)]
struct UserRow<'a> {
    id: &'a str,
    email: Option<&'a str>,
}

/// Validates tokens against `GET /auth/v1/user` and makes sure the caller has a `users` row.
#[derive(Clone, Debug)]
pub struct SupabaseIdentity {
    client: SupabaseClient,
}

impl SupabaseIdentity {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IdentityProvider for SupabaseIdentity {
    async fn authenticate(&self, token: &NonEmptyText) -> Result<Identity, IdentityError> {
        let response = self.client.auth_user(token.as_str()).await?;

        let status = response.status();
        if !status.is_success() {
            let body: String = response
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(MAX_ERROR_BODY_CHARS)
                .collect();
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => IdentityError::Rejected(body),
                _ => IdentityError::Status {
                    status: status.as_u16(),
                    body,
                },
            });
        }

        let user: AuthUser = response.json().await?;

        // Existing rows are left untouched.
        self.client
            .insert(
                USERS_TABLE,
                &UserRow {
                    id: &user.id,
                    email: user.email.as_deref(),
                },
                "resolution=ignore-duplicates,return=minimal",
            )
            .await
            .map_err(IdentityError::UserSync)?;

        tracing::debug!(user_id = %user.id, "caller authenticated");
        Ok(Identity {
            user_id: user.id,
            email: user.email,
        })
    }
}

/// Fixed token table for local development and tests.
#[derive(Clone, Debug, Default)]
pub struct StaticTokenIdentity {
    tokens: HashMap<String, Identity>,
}

impl StaticTokenIdentity {
    pub fn new<I, T, U>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (T, U)>,
        T: Into<String>,
        U: Into<String>,
    {
        let tokens = pairs
            .into_iter()
            .map(|(token, user)| {
                (
                    token.into(),
                    Identity {
                        user_id: user.into(),
                        email: None,
                    },
                )
            })
            .collect();
        Self { tokens }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl IdentityProvider for StaticTokenIdentity {
    async fn authenticate(&self, token: &NonEmptyText) -> Result<Identity, IdentityError> {
        self.tokens
            .get(token.as_str())
            .cloned()
            .ok_or_else(|| IdentityError::Rejected("unknown token".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::spawn_upstream;
    use axum::http::HeaderMap;
    use axum::routing::{get, post};
    use axum::{extract::State, http::StatusCode as AxumStatus, Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    fn token(value: &str) -> NonEmptyText {
        NonEmptyText::new(value).unwrap()
    }

    #[derive(Clone, Default)]
    struct Inserted(Arc<Mutex<Vec<(HeaderMap, Value)>>>);

    async fn auth_service() -> (SupabaseIdentity, Inserted) {
        let inserted = Inserted::default();
        let app = Router::new()
            .route(
                "/auth/v1/user",
                get(|headers: HeaderMap| async move {
                    match headers.get("authorization").and_then(|v| v.to_str().ok()) {
                        Some("Bearer good-token") => (
                            AxumStatus::OK,
                            Json(json!({ "id": "user-42", "email": "pat@example.com" })),
                        ),
                        _ => (
                            AxumStatus::UNAUTHORIZED,
                            Json(json!({ "msg": "invalid JWT" })),
                        ),
                    }
                }),
            )
            .route(
                "/rest/v1/users",
                post(
                    |State(inserted): State<Inserted>, headers: HeaderMap, Json(body): Json<Value>| async move {
                        inserted.0.lock().unwrap().push((headers, body));
                        AxumStatus::CREATED
                    },
                ),
            )
            .with_state(inserted.clone());
        let base = spawn_upstream(app).await;
        (
            SupabaseIdentity::new(SupabaseClient::new(base, "service-key")),
            inserted,
        )
    }

    #[tokio::test]
    async fn valid_token_resolves_and_registers_user() {
        let (identity, inserted) = auth_service().await;

        let caller = identity.authenticate(&token("good-token")).await.unwrap();
        assert_eq!(caller.user_id, "user-42");
        assert_eq!(caller.email.as_deref(), Some("pat@example.com"));

        let rows = inserted.0.lock().unwrap();
        assert_eq!(rows.len(), 1);
        let (headers, body) = &rows[0];
        assert_eq!(body["id"], "user-42");
        assert_eq!(body["email"], "pat@example.com");
        assert!(headers["prefer"]
            .to_str()
            .unwrap()
            .contains("resolution=ignore-duplicates"));
    }

    #[tokio::test]
    async fn rejected_token_is_reported_as_rejected() {
        let (identity, inserted) = auth_service().await;

        let err = identity.authenticate(&token("stale")).await.unwrap_err();
        assert!(matches!(err, IdentityError::Rejected(ref body) if body.contains("invalid JWT")));
        assert!(inserted.0.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn static_tokens_map_to_fixed_users() {
        let identity = StaticTokenIdentity::new([("dev-token", "dev-user")]);
        assert!(!identity.is_empty());

        let caller = identity.authenticate(&token("dev-token")).await.unwrap();
        assert_eq!(caller.user_id, "dev-user");
        assert!(matches!(
            identity.authenticate(&token("other")).await,
            Err(IdentityError::Rejected(_))
        ));
    }
}
