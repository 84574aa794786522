use serde::{Deserialize, Serialize};

/// Session transitions published by [`crate::client::ApiClient`].
///
/// Hosts subscribe to decide how to react, e.g. returning to a signed-out
/// view on [`SessionEvent::Invalidated`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Tokens and profile were stored after a successful sign-in.
    SignedIn,
    /// The cached profile was replaced by a fresh copy from the backend.
    ProfileUpdated,
    /// The person signed out or deleted their account.
    SignedOut,
    /// A token refresh failed; the local session has been cleared.
    Invalidated,
}
