//! crates/school_console_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the console's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the
//! core to be independent of the concrete HTTP client: screens and stores
//! talk to a `Gateway`, never to the network directly.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use uuid::Uuid;

//=========================================================================================
// Routes
//=========================================================================================

/// One REST collection. Collection requests use the trailing-slash form
/// (`GET /students/`), item requests the bare form (`PUT /students/{id}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityRoute {
    segment: &'static str,
}

impl EntityRoute {
    pub const fn new(segment: &'static str) -> Self {
        Self { segment }
    }

    /// Path for list/create requests, e.g. `/students/`.
    pub fn collection(&self) -> String {
        format!("/{}/", self.segment)
    }

    /// Path for item requests, e.g. `/students/{id}`.
    pub fn item(&self, id: Uuid) -> String {
        format!("/{}/{}", self.segment, id)
    }

    /// Path for a sub-resource action, e.g. `/auto-management/{id}/assign-students`.
    pub fn action(&self, id: Uuid, action: &str) -> String {
        format!("/{}/{}/{}", self.segment, id, action)
    }

    pub fn segment(&self) -> &'static str {
        self.segment
    }
}

//=========================================================================================
// Normalized Error Shape
//=========================================================================================

/// Per-field validation messages, keyed by field name.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// The uniform failure shape every gateway call is normalized into. Callers
/// never see transport-library errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GatewayError {
    /// The server rejected the request (4xx other than 401/404), possibly
    /// with structured per-field validation messages.
    #[error("{message}")]
    Rejected {
        message: String,
        field_errors: FieldErrors,
    },
    /// The requested record does not exist (404).
    #[error("Not found: {0}")]
    NotFound(String),
    /// 401 anywhere in the API. The session context has already been told to
    /// expire; this variant only tells the caller why its operation died.
    #[error("Session expired")]
    SessionExpired,
    /// Network-level failure; the operation must be treated as not applied.
    #[error("Network error: {0}")]
    Transport(String),
    /// The server answered 2xx but the body did not have the expected shape.
    #[error("Malformed response: {0}")]
    Decode(String),
}

impl GatewayError {
    pub fn rejected(message: impl Into<String>) -> Self {
        GatewayError::Rejected {
            message: message.into(),
            field_errors: FieldErrors::new(),
        }
    }

    /// Field-level messages, when the server supplied them.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            GatewayError::Rejected { field_errors, .. } if !field_errors.is_empty() => {
                Some(field_errors)
            }
            _ => None,
        }
    }
}

/// A convenience type alias for `Result<T, GatewayError>`.
pub type GatewayResult<T> = Result<T, GatewayError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The Remote Gateway: translates typed operations into HTTP calls and
/// normalizes every failure into `GatewayError`. It performs no side effect
/// beyond the network call — callers own store invalidation.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// List a collection, optionally scoped by query pairs
    /// (e.g. `class_id=<uuid>` for sections).
    async fn list(&self, route: &EntityRoute, query: &[(String, String)])
        -> GatewayResult<Vec<Value>>;

    /// Create one record; returns the server's copy.
    async fn create(&self, route: &EntityRoute, body: Value) -> GatewayResult<Value>;

    /// Full-record update (PUT).
    async fn update(&self, route: &EntityRoute, id: Uuid, body: Value) -> GatewayResult<Value>;

    /// Partial update (PATCH). Only the academic-year status toggle uses this.
    async fn patch(&self, route: &EntityRoute, id: Uuid, body: Value) -> GatewayResult<Value>;

    /// Delete one record.
    async fn delete(&self, route: &EntityRoute, id: Uuid) -> GatewayResult<()>;

    /// POST against a sub-resource of one record, e.g. bulk student
    /// assignment (`POST /auto-management/{id}/assign-students`).
    async fn post_action(
        &self,
        route: &EntityRoute,
        id: Uuid,
        action: &str,
        body: Value,
    ) -> GatewayResult<Value>;

    /// Bare GET of an arbitrary path, e.g. `/dashboard/` or
    /// `/auto-management/with-students`.
    async fn fetch(&self, path: &str) -> GatewayResult<Value>;
}

/// Authentication operations. Kept apart from `Gateway` because they manage
/// the session context rather than ride on it.
#[async_trait]
pub trait AuthPort: Send + Sync {
    /// Password-grant login. On success the adapter stores the bearer token
    /// in the session context and returns it.
    async fn login(&self, username: &str, password: &str) -> GatewayResult<String>;

    /// Server-side logout. The session context is cleared regardless of the
    /// server's answer.
    async fn logout(&self) -> GatewayResult<()>;
}
