//! Core TrueNeed client library (config, session store, API client, auth, advisor).

pub mod advisor;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod oauth;
pub mod password;
pub mod profile;
pub mod session;
pub mod theme;

pub use client::ApiClient;
pub use error::{ApiError, ErrorKind, FailureDetail, ValidationError};
pub use events::SessionEvent;
pub use session::{Session, SessionStore};
