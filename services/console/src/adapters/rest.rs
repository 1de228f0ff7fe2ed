//! services/console/src/adapters/rest.rs
//!
//! This module contains the REST adapter, the concrete implementation of the
//! `Gateway` and `AuthPort` ports from the `core` crate. It speaks HTTP via
//! `reqwest` and normalizes every failure — network, 4xx, malformed body —
//! into the uniform `GatewayError` shape the core works with.
//!
//! The bearer token is read from the injected `SessionContext` at call time,
//! and any 401 expires that context before the error is returned, so the
//! "session expired" contract is enforced here once rather than per screen.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, StatusCode};
use school_console_core::ports::{
    AuthPort, EntityRoute, FieldErrors, Gateway, GatewayError, GatewayResult,
};
use school_console_core::session::SessionContext;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A REST adapter that implements the `Gateway` and `AuthPort` ports.
#[derive(Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
    session: Arc<SessionContext>,
}

impl HttpGateway {
    /// Creates a new `HttpGateway` against `base_url` (no trailing slash),
    /// authenticating through the given session context.
    pub fn new(
        base_url: impl Into<String>,
        request_timeout: Duration,
        session: Arc<SessionContext>,
    ) -> GatewayResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self.client.request(method, self.url(path));
        // Token read fresh for every request, never captured at build time.
        if let Some(token) = self.session.bearer_token() {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// Send a request and normalize the outcome. Every non-2xx answer comes
    /// back as a `GatewayError`; a 401 additionally expires the session.
    async fn send(&self, builder: RequestBuilder) -> GatewayResult<Value> {
        let response = builder
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            warn!("401 from API, expiring session");
            self.session.expire();
            return Err(GatewayError::SessionExpired);
        }

        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        if !status.is_success() {
            debug!(%status, "API rejected request");
            return Err(normalize_error_body(status, &body));
        }
        if body.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| GatewayError::Decode(e.to_string()))
    }
}

//=========================================================================================
// Error-Body Normalization
//=========================================================================================

/// Turn a FastAPI-style error body into the uniform error shape.
///
/// Handles `{"detail": "message"}`, `{"detail": [{"loc": [..., field],
/// "msg": ...}, ...]}` (validation errors keyed by the last loc element),
/// and anything else as a generic message for the status.
fn normalize_error_body(status: StatusCode, body: &str) -> GatewayError {
    let generic = format!("Request failed with status {}", status.as_u16());
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let detail = parsed.as_ref().and_then(|v| v.get("detail"));

    let error = match detail {
        Some(Value::String(message)) => GatewayError::rejected(message.clone()),
        Some(Value::Array(entries)) => {
            let mut field_errors = FieldErrors::new();
            for entry in entries {
                let field = entry
                    .get("loc")
                    .and_then(Value::as_array)
                    .and_then(|loc| loc.last())
                    .and_then(Value::as_str)
                    .unwrap_or("_");
                let message = entry
                    .get("msg")
                    .and_then(Value::as_str)
                    .unwrap_or("Invalid value");
                field_errors
                    .entry(field.to_string())
                    .or_default()
                    .push(message.to_string());
            }
            GatewayError::Rejected {
                message: "Validation failed".to_string(),
                field_errors,
            }
        }
        _ => GatewayError::rejected(generic),
    };

    if status == StatusCode::NOT_FOUND {
        return GatewayError::NotFound(error.to_string());
    }
    error
}

//=========================================================================================
// `Gateway` Trait Implementation
//=========================================================================================

#[async_trait]
impl Gateway for HttpGateway {
    async fn list(
        &self,
        route: &EntityRoute,
        query: &[(String, String)],
    ) -> GatewayResult<Vec<Value>> {
        let builder = self.request(Method::GET, &route.collection()).query(query);
        match self.send(builder).await? {
            Value::Array(items) => Ok(items),
            other => Err(GatewayError::Decode(format!(
                "expected a JSON array, got {other}"
            ))),
        }
    }

    async fn create(&self, route: &EntityRoute, body: Value) -> GatewayResult<Value> {
        self.send(self.request(Method::POST, &route.collection()).json(&body))
            .await
    }

    async fn update(&self, route: &EntityRoute, id: Uuid, body: Value) -> GatewayResult<Value> {
        self.send(self.request(Method::PUT, &route.item(id)).json(&body))
            .await
    }

    async fn patch(&self, route: &EntityRoute, id: Uuid, body: Value) -> GatewayResult<Value> {
        self.send(self.request(Method::PATCH, &route.item(id)).json(&body))
            .await
    }

    async fn delete(&self, route: &EntityRoute, id: Uuid) -> GatewayResult<()> {
        self.send(self.request(Method::DELETE, &route.item(id)))
            .await?;
        Ok(())
    }

    async fn post_action(
        &self,
        route: &EntityRoute,
        id: Uuid,
        action: &str,
        body: Value,
    ) -> GatewayResult<Value> {
        let path = route.action(id, action);
        self.send(self.request(Method::POST, &path).json(&body))
            .await
    }

    async fn fetch(&self, path: &str) -> GatewayResult<Value> {
        self.send(self.request(Method::GET, path)).await
    }
}

//=========================================================================================
// `AuthPort` Trait Implementation
//=========================================================================================

#[async_trait]
impl AuthPort for HttpGateway {
    /// Form-encoded password grant. On success the token is stored in the
    /// session context; on a rejected login nothing is stored and no session
    /// is expired (there is none to expire).
    async fn login(&self, username: &str, password: &str) -> GatewayResult<String> {
        let form = [
            ("grant_type", "password"),
            ("username", username),
            ("password", password),
            ("scope", ""),
            ("client_id", ""),
            ("client_secret", ""),
        ];
        let response = self
            .client
            .post(self.url("/auth/jwt/login"))
            .form(&form)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        if !status.is_success() {
            // Bad credentials are a rejection, not an expired session.
            return Err(normalize_error_body(status, &body));
        }

        let parsed: Value =
            serde_json::from_str(&body).map_err(|e| GatewayError::Decode(e.to_string()))?;
        let token = parsed
            .get("access_token")
            .and_then(Value::as_str)
            .ok_or_else(|| GatewayError::Decode("login response without access_token".into()))?
            .to_string();

        self.session.sign_in(token.clone());
        Ok(token)
    }

    /// Server-side logout; the local session is cleared even when the call
    /// fails, so the client never holds a token it decided to drop.
    async fn logout(&self) -> GatewayResult<()> {
        let outcome = self
            .send(self.request(Method::POST, "/auth/jwt/logout"))
            .await;
        self.session.sign_out();
        outcome.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_detail_becomes_the_rejection_message() {
        let err = normalize_error_body(
            StatusCode::BAD_REQUEST,
            r#"{"detail": "Class has sections"}"#,
        );
        match err {
            GatewayError::Rejected { message, field_errors } => {
                assert_eq!(message, "Class has sections");
                assert!(field_errors.is_empty());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn validation_detail_array_maps_to_field_errors() {
        let body = r#"{"detail": [
            {"loc": ["body", "name"], "msg": "field required", "type": "value_error.missing"},
            {"loc": ["body", "tuition_fees"], "msg": "value is not a valid integer", "type": "type_error.integer"},
            {"loc": ["body", "name"], "msg": "too short", "type": "value_error"}
        ]}"#;
        let err = normalize_error_body(StatusCode::UNPROCESSABLE_ENTITY, body);
        let GatewayError::Rejected { field_errors, .. } = err else {
            panic!("expected Rejected");
        };
        assert_eq!(
            field_errors["name"],
            vec!["field required".to_string(), "too short".to_string()]
        );
        assert_eq!(
            field_errors["tuition_fees"],
            vec!["value is not a valid integer".to_string()]
        );
    }

    #[test]
    fn unparseable_body_falls_back_to_a_generic_message() {
        let err = normalize_error_body(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");
        assert_eq!(err.to_string(), "Request failed with status 500");
    }

    #[test]
    fn not_found_status_maps_to_not_found() {
        let err = normalize_error_body(StatusCode::NOT_FOUND, r#"{"detail": "Payment not found"}"#);
        assert!(matches!(err, GatewayError::NotFound(_)));
    }
}
