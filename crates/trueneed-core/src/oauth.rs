//! OAuth providers and the frontend callback redirect.
//!
//! After the provider round-trip the backend redirects the browser to
//! `<frontend>/oauth/callback` with either the session in the query string
//! (`access`, `refresh`, `name`, `email`, `avatar_color`, `profile_image`)
//! or a single `error` parameter.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ValidationError;
use crate::profile::UserProfile;
use crate::session::Session;

/// Base used to resolve relative redirect inputs such as `/oauth/callback?...`.
const RELATIVE_BASE: &str = "http://localhost";

/// Identity providers the backend can broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OAuthProvider {
    Google,
    Apple,
    Microsoft,
}

impl OAuthProvider {
    pub const ALL: [OAuthProvider; 3] = [
        OAuthProvider::Google,
        OAuthProvider::Apple,
        OAuthProvider::Microsoft,
    ];

    /// Path segment used by the backend.
    pub fn as_str(self) -> &'static str {
        match self {
            OAuthProvider::Google => "google",
            OAuthProvider::Apple => "apple",
            OAuthProvider::Microsoft => "microsoft",
        }
    }
}

impl fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OAuthProvider {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ValidationError::UnsupportedProvider(wanted.to_string()))
    }
}

/// Response of `GET /auth/oauth/{provider}/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthStart {
    pub auth_url: String,
}

/// Outcome carried by a frontend callback URL.
#[derive(Debug, Clone, PartialEq)]
pub enum OAuthRedirect {
    Success {
        session: Session,
        user: UserProfile,
    },
    Failure {
        error: String,
    },
}

/// Parses a frontend callback URL.
///
/// `input` may be absolute or a path with query. Returns `None` when the path
/// is not `callback_path` or the query has neither an `error` nor the
/// `access`, `refresh` and `email` parameters.
pub fn parse_redirect(input: &str, callback_path: &str) -> Option<OAuthRedirect> {
    let url = match Url::parse(input) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Url::parse(RELATIVE_BASE).ok()?.join(input).ok()?
        }
        Err(err) => {
            tracing::debug!(error = %err, "unparsable OAuth redirect");
            return None;
        }
    };

    if url.path().trim_end_matches('/') != callback_path.trim_end_matches('/') {
        return None;
    }

    let mut access = None;
    let mut refresh = None;
    let mut name = None;
    let mut email = None;
    let mut avatar_color = None;
    let mut profile_image = None;
    let mut error = None;

    for (key, value) in url.query_pairs() {
        let value = value.into_owned();
        match key.as_ref() {
            "access" => access = Some(value),
            "refresh" => refresh = Some(value),
            "name" => name = Some(value),
            "email" => email = Some(value),
            "avatar_color" => avatar_color = Some(value),
            "profile_image" => profile_image = Some(value),
            "error" => error = Some(value),
            _ => {}
        }
    }

    if let Some(error) = non_empty(error) {
        return Some(OAuthRedirect::Failure { error });
    }

    let (access, refresh, email) = (non_empty(access)?, non_empty(refresh)?, non_empty(email)?);
    let name = non_empty(name).unwrap_or_else(|| email_local_part(&email).to_string());

    Some(OAuthRedirect::Success {
        session: Session { access, refresh },
        user: UserProfile {
            name,
            email: Some(email),
            avatar_color: non_empty(avatar_color),
            profile_image: non_empty(profile_image),
            ..UserProfile::default()
        },
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn email_local_part(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}
