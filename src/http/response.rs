//! Response shaping for the registration API.
//!
//! # Responsibilities
//! - Define the JSON bodies returned by each endpoint
//! - Map registry errors to HTTP status codes
//!
//! # Design Decisions
//! - Every error body has the same shape: `{"status":"error","message":...}`
//! - Messages are stable strings that clients can match on

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::registry::{ClientRecord, RegistryError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub status: String,
    pub url: String,
}

/// Body for endpoints that only report a status word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub status: String,
}

impl StatusMessage {
    pub fn new(status: &str) -> Self {
        Self {
            status: status.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub status: String,
    pub clients: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientList {
    pub clients: Vec<ClientView>,
}

/// Public view of a live client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientView {
    pub id: String,
    pub domain: String,
    pub port: u16,
    /// RFC 3339, second precision.
    pub last_heartbeat: String,
}

impl ClientView {
    pub fn new(record: &ClientRecord, domain: String) -> Self {
        Self {
            id: record.canonical_id.clone(),
            domain,
            port: record.port,
            last_heartbeat: record
                .last_heartbeat
                .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub status: String,
    pub message: String,
}

/// Errors surfaced to API callers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid json")]
    InvalidJson,
    #[error("missing id parameter")]
    MissingId,
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidJson | ApiError::MissingId => StatusCode::BAD_REQUEST,
            ApiError::Registry(e) => match e {
                RegistryError::InvalidIdentifier(_) | RegistryError::InvalidPort(_) => {
                    StatusCode::BAD_REQUEST
                }
                RegistryError::AlreadyRegistered(_) => StatusCode::CONFLICT,
                RegistryError::NotFound(_) => StatusCode::NOT_FOUND,
            },
        }
    }

    /// Stable message returned in the body.
    pub fn message(&self) -> &'static str {
        match self {
            ApiError::InvalidJson => "invalid json",
            ApiError::MissingId => "missing id parameter",
            ApiError::Registry(e) => match e {
                RegistryError::InvalidIdentifier(_) => "invalid subdomain format",
                RegistryError::InvalidPort(_) => "invalid port",
                RegistryError::AlreadyRegistered(_) => "subdomain already in use",
                RegistryError::NotFound(_) => "client not found",
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            status: "error".to_string(),
            message: self.message().to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::InvalidJson, StatusCode::BAD_REQUEST),
            (ApiError::MissingId, StatusCode::BAD_REQUEST),
            (RegistryError::InvalidIdentifier("x!".into()).into(), StatusCode::BAD_REQUEST),
            (RegistryError::InvalidPort(0).into(), StatusCode::BAD_REQUEST),
            (RegistryError::AlreadyRegistered("a".into()).into(), StatusCode::CONFLICT),
            (RegistryError::NotFound("a".into()).into(), StatusCode::NOT_FOUND),
        ];
        for (err, status) in cases {
            assert_eq!(err.status_code(), status, "{err}");
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_client_view_timestamp() {
        let record = ClientRecord {
            canonical_id: "prod_api".into(),
            display_name: "prod.api".into(),
            port: 3000,
            last_heartbeat: Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap(),
        };
        let view = ClientView::new(&record, "prod.api.localhost".into());

        assert_eq!(view.id, "prod_api");
        assert_eq!(view.domain, "prod.api.localhost");
        assert_eq!(view.last_heartbeat, "2024-05-01T12:30:00Z");
    }
}
