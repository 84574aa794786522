use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::profile::UserProfile;
use crate::session::Session;

/// Email sign-in style response: `{message, tokens?, user?}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub tokens: Option<Session>,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

/// Phone and identity-token response, with the tokens at top level:
/// `{message, access?, refresh?, user?}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhoneAuthResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub access: Option<String>,
    #[serde(default)]
    pub refresh: Option<String>,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

impl PhoneAuthResponse {
    /// Both tokens, when both were issued.
    pub fn session(&self) -> Option<Session> {
        Some(Session::new(self.access.clone()?, self.refresh.clone()?))
    }
}

/// Response of `PATCH /auth/profile/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

/// Plain acknowledgement. Development backends may add fields such as an
/// `otp` echo; they are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Acknowledgement {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Acknowledgement {
    pub fn message_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.message.as_deref().unwrap_or(fallback)
    }
}
