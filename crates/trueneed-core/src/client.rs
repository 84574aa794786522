//! Authenticated JSON client for the TrueNeed backend.
//!
//! Every call attaches the stored bearer token. A 401 on a call that carried
//! a token triggers exactly one refresh-and-retry cycle: the retried call's
//! outcome is final, so a second 401 surfaces as [`ApiError::RequestFailed`].
//! When the refresh itself fails the session is cleared and
//! [`SessionEvent::Invalidated`] is published.
//!
//! Calls are independent. Two overlapping 401s each run their own refresh.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tokio::sync::broadcast;

use crate::config::Config;
use crate::error::{ApiError, FailureDetail};
use crate::events::SessionEvent;
use crate::logging::mask_token;
use crate::session::SessionStore;

/// Endpoint exchanging a refresh token for a new access token.
pub const TOKEN_REFRESH_PATH: &str = "/auth/token/refresh/";

const EVENT_CAPACITY: usize = 16;

/// Method, JSON body and extra headers for one call.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<Value>,
    /// Merged over `Content-Type: application/json`; caller values win.
    pub headers: HeaderMap,
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access: String,
    /// Present when the backend rotates refresh tokens.
    #[serde(default)]
    refresh: Option<String>,
}

/// Backend client bound to a base URL and a [`SessionStore`].
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionStore,
    events: broadcast::Sender<SessionEvent>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, session: SessionStore) -> Self {
        Self::with_http(reqwest::Client::new(), base_url, session)
    }

    pub fn with_http(
        http: reqwest::Client,
        base_url: impl Into<String>,
        session: SessionStore,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            session,
            events,
        }
    }

    /// Builds a client from configuration, applying the request timeout.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn from_config(config: &Config, session: SessionStore) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        Ok(Self::with_http(
            http,
            config.effective_api_base_url(),
            session,
        ))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Receives every [`SessionEvent`] published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub(crate) fn publish(&self, event: SessionEvent) {
        // No subscribers is fine.
        self.events.send(event).ok();
    }

    /// Performs one authenticated call and returns the parsed JSON body.
    ///
    /// An empty success body is returned as `Value::Null`.
    ///
    /// # Errors
    /// - [`ApiError::RequestFailed`] on a non-success status
    /// - [`ApiError::SessionExpired`] when a 401 could not be recovered
    /// - [`ApiError::Network`] on transport failure
    /// - [`ApiError::InvalidResponse`] when a success body is not JSON
    pub async fn request(&self, endpoint: &str, options: RequestOptions) -> Result<Value, ApiError> {
        let url = self.url(endpoint);
        let access = self.session.access_token()?;

        tracing::debug!(
            method = %options.method,
            endpoint,
            token = %access.as_deref().map_or_else(|| "none".to_string(), mask_token),
            "API request"
        );

        let response = self.send(&url, &options, access.as_deref()).await?;

        if response.status() == StatusCode::UNAUTHORIZED && access.is_some() {
            return self.refresh_and_retry(endpoint, &url, &options).await;
        }

        handle_response(endpoint, response).await
    }

    /// Like [`ApiClient::request`], decoding the body into `T`.
    ///
    /// # Errors
    /// Same as [`ApiClient::request`], plus [`ApiError::InvalidResponse`] when
    /// the body does not match `T`.
    pub async fn request_as<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let body = self.request(endpoint, options).await?;
        serde_json::from_value(body).map_err(|e| ApiError::invalid_response(endpoint, e))
    }

    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn get(&self, endpoint: &str) -> Result<Value, ApiError> {
        self.request(endpoint, RequestOptions::new(Method::GET)).await
    }

    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn post(&self, endpoint: &str, body: Value) -> Result<Value, ApiError> {
        self.request(endpoint, RequestOptions::new(Method::POST).json(body))
            .await
    }

    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn patch(&self, endpoint: &str, body: Value) -> Result<Value, ApiError> {
        self.request(endpoint, RequestOptions::new(Method::PATCH).json(body))
            .await
    }

    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn delete(&self, endpoint: &str, body: Option<Value>) -> Result<Value, ApiError> {
        let mut options = RequestOptions::new(Method::DELETE);
        options.body = body;
        self.request(endpoint, options).await
    }

    /// Exchanges the stored refresh token for a new access token.
    ///
    /// Returns `Ok(false)` when no refresh token is stored or the backend does
    /// not issue a new access token. Only storage failures are errors.
    ///
    /// # Errors
    /// Returns an error if the session store cannot be read or written.
    pub async fn refresh_access_token(&self) -> Result<bool, ApiError> {
        let Some(refresh) = self.session.refresh_token()? else {
            tracing::debug!("no refresh token stored");
            return Ok(false);
        };

        let result = self
            .http
            .post(self.url(TOKEN_REFRESH_PATH))
            .json(&json!({ "refresh": refresh }))
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(error = %err, "token refresh request failed");
                return Ok(false);
            }
        };

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "token refresh rejected");
            return Ok(false);
        }

        let tokens: RefreshResponse = match response.json().await {
            Ok(tokens) => tokens,
            Err(err) => {
                tracing::warn!(error = %err, "token refresh response unreadable");
                return Ok(false);
            }
        };

        self.session.set_access_token(&tokens.access)?;
        if let Some(rotated) = tokens.refresh.as_deref() {
            self.session.set_refresh_token(rotated)?;
        }
        tracing::debug!(token = %mask_token(&tokens.access), "access token refreshed");
        Ok(true)
    }

    async fn refresh_and_retry(
        &self,
        endpoint: &str,
        url: &str,
        options: &RequestOptions,
    ) -> Result<Value, ApiError> {
        if !self.refresh_access_token().await? {
            self.session.clear()?;
            tracing::info!(endpoint, "session invalidated after failed token refresh");
            self.publish(SessionEvent::Invalidated);
            return Err(ApiError::SessionExpired);
        }

        let access = self.session.access_token()?;
        let retry = self.send(url, options, access.as_deref()).await?;
        handle_response(endpoint, retry).await
    }

    async fn send(
        &self,
        url: &str,
        options: &RequestOptions,
        access: Option<&str>,
    ) -> Result<reqwest::Response, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.extend(options.headers.clone());

        if let Some(token) = access {
            match HeaderValue::from_str(&format!("Bearer {token}")) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    headers.insert(AUTHORIZATION, value);
                }
                Err(err) => tracing::warn!(error = %err, "stored access token is not a valid header"),
            }
        }

        let mut builder = self
            .http
            .request(options.method.clone(), url)
            .headers(headers);
        if let Some(body) = &options.body {
            builder = builder.body(body.to_string());
        }

        Ok(builder.send().await?)
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.base_url)
    }
}

async fn handle_response(endpoint: &str, response: reqwest::Response) -> Result<Value, ApiError> {
    let status = response.status();
    let bytes = response.bytes().await?;

    let body = if bytes.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        match serde_json::from_slice(&bytes) {
            Ok(body) => body,
            Err(err) if status.is_success() => {
                return Err(ApiError::invalid_response(endpoint, err));
            }
            Err(_) => Value::Null,
        }
    };

    if status.is_success() {
        Ok(body)
    } else {
        tracing::debug!(%status, endpoint, "API request failed");
        Err(ApiError::RequestFailed {
            status,
            detail: FailureDetail::from_body(&body),
        })
    }
}
