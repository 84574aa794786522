//! Error taxonomy surfaced by the client and the auth facade.

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::password::PasswordRule;
use crate::session::StoreError;

/// Fallback text when a failure body carries nothing readable.
const GENERIC_FAILURE: &str = "Request failed";

/// Errors returned by [`crate::client::ApiClient`] and [`crate::auth::AuthService`].
#[derive(Debug, Error)]
pub enum ApiError {
    /// Client-side rule violation; no request was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Backend answered with a non-success status.
    #[error("{}", .detail.summary())]
    RequestFailed {
        status: StatusCode,
        detail: FailureDetail,
    },

    /// A 401 could not be recovered by refreshing the access token.
    #[error("Session expired. Please log in again.")]
    SessionExpired,

    /// Transport failure (DNS, connect, TLS, body read).
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Success status with a body that does not have the expected shape.
    #[error("Unexpected response from {endpoint}: {reason}")]
    InvalidResponse { endpoint: String, reason: String },

    /// The OAuth provider redirected back with an error.
    #[error("OAuth failed: {0}")]
    OAuthFailed(String),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// Coarse classification of [`ApiError`], for callers that only branch on kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ValidationFailed,
    RequestFailed,
    SessionExpired,
    NetworkFailure,
    InvalidResponse,
    OAuthFailed,
    Storage,
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Validation(_) => ErrorKind::ValidationFailed,
            ApiError::RequestFailed { .. } => ErrorKind::RequestFailed,
            ApiError::SessionExpired => ErrorKind::SessionExpired,
            ApiError::Network(_) => ErrorKind::NetworkFailure,
            ApiError::InvalidResponse { .. } => ErrorKind::InvalidResponse,
            ApiError::OAuthFailed(_) => ErrorKind::OAuthFailed,
            ApiError::Storage(_) => ErrorKind::Storage,
        }
    }

    /// HTTP status of a backend failure.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Structured failure body of a backend failure.
    pub fn detail(&self) -> Option<&FailureDetail> {
        match self {
            ApiError::RequestFailed { detail, .. } => Some(detail),
            _ => None,
        }
    }

    pub(crate) fn invalid_response(endpoint: &str, reason: impl ToString) -> Self {
        ApiError::InvalidResponse {
            endpoint: endpoint.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Input rejected before contacting the backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error(transparent)]
    Password(#[from] PasswordRule),

    #[error("Please enter all 6 digits")]
    IncompleteOtp,

    #[error("Phone number must include country code (e.g., +1234567890)")]
    MissingCountryCode,

    #[error("Unsupported OAuth provider: {0}")]
    UnsupportedProvider(String),

    #[error("Not an OAuth callback URL: {0}")]
    NotOAuthCallback(String),

    #[error("Please upload an image file.")]
    NotAnImage,

    #[error("Image size must be less than 2MB.")]
    ImageTooLarge,

    #[error("Nothing to update")]
    EmptyProfileUpdate,
}

/// Structured view of a backend failure body.
///
/// The backend reports errors either as a top-level `error`/`detail`/`message`
/// string or as a map of field names to message lists. A bare list is read as
/// fields named by position. Field order follows the response body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FailureDetail {
    pub error: Option<String>,
    pub detail: Option<String>,
    pub message: Option<String>,
    pub fields: Vec<(String, Vec<String>)>,
}

impl FailureDetail {
    /// Builds the detail from a parsed failure body.
    pub fn from_body(body: &Value) -> Self {
        let mut out = FailureDetail::default();
        match body {
            Value::Object(map) => {
                for (key, value) in map {
                    let slot = match key.as_str() {
                        "error" => Some(&mut out.error),
                        "detail" => Some(&mut out.detail),
                        "message" => Some(&mut out.message),
                        _ => None,
                    };
                    match slot {
                        Some(slot) if is_truthy(value) => *slot = Some(value_text(value)),
                        _ => out.fields.push((key.clone(), field_messages(value))),
                    }
                }
            }
            // top-level lists are keyed by position
            Value::Array(items) => {
                for (index, value) in items.iter().enumerate() {
                    out.fields.push((index.to_string(), field_messages(value)));
                }
            }
            Value::String(text) if !text.is_empty() => out.message = Some(text.clone()),
            _ => {}
        }
        out
    }

    /// Human-readable message: `error`, then `detail`, then `message`, else
    /// every field as `"field: messages"` joined by `"; "`.
    pub fn summary(&self) -> String {
        if let Some(text) = self
            .error
            .as_ref()
            .or(self.detail.as_ref())
            .or(self.message.as_ref())
        {
            return text.clone();
        }

        if self.fields.is_empty() {
            return GENERIC_FAILURE.to_string();
        }

        self.fields
            .iter()
            .map(|(field, messages)| format!("{field}: {}", messages.join(", ")))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Messages reported for a single field.
    pub fn field(&self, name: &str) -> Option<&[String]> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, messages)| messages.as_slice())
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn field_messages(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().map(value_text).collect(),
        other => vec![value_text(other)],
    }
}
