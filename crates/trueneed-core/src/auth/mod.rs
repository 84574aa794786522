//! Auth facade over the backend's `/auth/*` endpoints.
//!
//! Each operation validates its input locally where rules are known, calls
//! the backend through [`ApiClient`], and persists returned tokens and
//! profile into the [`SessionStore`](crate::session::SessionStore).

mod types;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

pub use types::{Acknowledgement, AuthResponse, PhoneAuthResponse, ProfileResponse};

use crate::client::{ApiClient, RequestOptions};
use crate::config::Config;
use crate::error::{ApiError, ValidationError};
use crate::events::SessionEvent;
use crate::oauth::{self, OAuthProvider, OAuthRedirect, OAuthStart};
use crate::password::validate_password;
use crate::profile::{ProfileUpdate, UserProfile, avatar_color_for};
use crate::session::{Session, SessionStore};

/// Number of digits in an email or phone verification code.
pub const OTP_LENGTH: usize = 6;

const DEFAULT_CALLBACK_PATH: &str = "/oauth/callback";

/// Checks that `otp` is exactly six ASCII digits.
///
/// # Errors
/// Returns [`ValidationError::IncompleteOtp`] otherwise.
pub fn validate_otp(otp: &str) -> Result<(), ValidationError> {
    if otp.len() == OTP_LENGTH && otp.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::IncompleteOtp)
    }
}

/// Checks that `phone` carries a `+` country code prefix.
///
/// # Errors
/// Returns [`ValidationError::MissingCountryCode`] otherwise.
pub fn validate_phone_number(phone: &str) -> Result<(), ValidationError> {
    if phone.trim().starts_with('+') {
        Ok(())
    } else {
        Err(ValidationError::MissingCountryCode)
    }
}

/// True when an identity-token sign-in failed because the phone number has
/// no account yet and a name is needed to create one.
pub fn requires_registration(err: &ApiError) -> bool {
    err.detail()
        .and_then(|detail| detail.field("requires_registration"))
        .is_some_and(|values| values.iter().any(|v| v == "true"))
}

/// Named auth operations bound to one [`ApiClient`].
#[derive(Clone)]
pub struct AuthService {
    client: ApiClient,
    oauth_callback_path: String,
}

impl AuthService {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            oauth_callback_path: DEFAULT_CALLBACK_PATH.to_string(),
        }
    }

    /// Builds the client from configuration and wraps it.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn from_config(
        config: &Config,
        session: SessionStore,
    ) -> Result<Self, ApiError> {
        let client = ApiClient::from_config(config, session)?;
        Ok(Self::new(client).with_oauth_callback_path(&config.oauth_callback_path))
    }

    #[must_use]
    pub fn with_oauth_callback_path(mut self, path: &str) -> Self {
        self.oauth_callback_path = path.to_string();
        self
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Starts email registration; the backend mails a verification code.
    ///
    /// Without an explicit `avatar_color` the palette color for `name` is sent.
    ///
    /// # Errors
    /// [`ApiError::Validation`] when the password breaks a rule (nothing is
    /// sent), otherwise any [`ApiClient::request`] error.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        avatar_color: Option<&str>,
    ) -> Result<Acknowledgement, ApiError> {
        validate_password(password).map_err(ValidationError::from)?;
        let avatar_color = avatar_color.unwrap_or_else(|| avatar_color_for(name));

        let body = json!({
            "name": name,
            "email": email,
            "password": password,
            "password2": password,
            "avatar_color": avatar_color,
        });
        self.ack("/auth/register/", Method::POST, Some(body)).await
    }

    /// Completes email registration. Tokens and profile are stored when the
    /// backend issues them.
    ///
    /// # Errors
    /// [`ApiError::Validation`] for a malformed code, otherwise any
    /// [`ApiClient::request`] error.
    pub async fn verify_otp(&self, email: &str, otp: &str) -> Result<AuthResponse, ApiError> {
        validate_otp(otp)?;
        let response: AuthResponse = self
            .call(
                "/auth/verify-otp/",
                Method::POST,
                Some(json!({ "email": email, "otp": otp })),
            )
            .await?;
        self.persist_auth(&response)?;
        Ok(response)
    }

    /// # Errors
    /// Any [`ApiClient::request`] error.
    pub async fn resend_otp(&self, email: &str) -> Result<Acknowledgement, ApiError> {
        self.ack(
            "/auth/resend-otp/",
            Method::POST,
            Some(json!({ "email": email })),
        )
        .await
    }

    /// Signs in with email and password and stores the session.
    ///
    /// # Errors
    /// Any [`ApiClient::request`] error.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let response: AuthResponse = self
            .call(
                "/auth/login/",
                Method::POST,
                Some(json!({ "email": email, "password": password })),
            )
            .await?;

        if response.tokens.is_none() {
            tracing::warn!("login response carried no tokens");
        }
        self.persist_auth(&response)?;
        Ok(response)
    }

    /// Signs out locally, telling the backend first when a refresh token is
    /// stored. Backend failures are logged and ignored.
    ///
    /// # Errors
    /// Only when the local session cannot be cleared.
    pub async fn logout(&self) -> Result<(), ApiError> {
        if let Some(refresh) = self.client.session().refresh_token()? {
            let result = self
                .client
                .post("/auth/logout/", json!({ "refresh_token": refresh }))
                .await;
            if let Err(err) = result {
                tracing::warn!(error = %err, "backend logout failed; clearing local session anyway");
            }
        }
        self.sign_out()
    }

    /// Fetches the signed-in profile and refreshes the cached copy.
    ///
    /// # Errors
    /// Any [`ApiClient::request`] error.
    pub async fn current_user(&self) -> Result<UserProfile, ApiError> {
        let user: UserProfile = self.call("/auth/me/", Method::GET, None).await?;
        self.store_profile(&user)?;
        Ok(user)
    }

    /// Applies a partial profile update.
    ///
    /// # Errors
    /// [`ApiError::Validation`] for an empty update, otherwise any
    /// [`ApiClient::request`] error.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<ProfileResponse, ApiError> {
        if update.is_empty() {
            return Err(ValidationError::EmptyProfileUpdate.into());
        }
        let body =
            serde_json::to_value(update).map_err(|e| ApiError::invalid_response("/auth/profile/", e))?;
        let response: ProfileResponse = self
            .call("/auth/profile/", Method::PATCH, Some(body))
            .await?;

        if let Some(user) = &response.user {
            self.store_profile(user)?;
        }
        Ok(response)
    }

    /// Deletes the account and clears the local session.
    ///
    /// # Errors
    /// Any [`ApiClient::request`] error; the session is kept in that case.
    pub async fn delete_account(&self, password: Option<&str>) -> Result<Acknowledgement, ApiError> {
        let body = password.map(|password| json!({ "password": password }));
        let ack = self.ack("/auth/account/", Method::DELETE, body).await?;
        self.sign_out()?;
        Ok(ack)
    }

    /// # Errors
    /// Any [`ApiClient::request`] error.
    pub async fn forgot_password(&self, email: &str) -> Result<Acknowledgement, ApiError> {
        self.ack(
            "/auth/forgot-password/",
            Method::POST,
            Some(json!({ "email": email })),
        )
        .await
    }

    /// # Errors
    /// [`ApiError::Validation`] when the new password breaks a rule,
    /// otherwise any [`ApiClient::request`] error.
    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<Acknowledgement, ApiError> {
        validate_password(new_password).map_err(ValidationError::from)?;
        let body = json!({
            "token": token,
            "password": new_password,
            "password2": new_password,
        });
        self.ack("/auth/reset-password/", Method::POST, Some(body))
            .await
    }

    /// Asks the backend for the provider's authorization URL.
    ///
    /// # Errors
    /// Any [`ApiClient::request`] error.
    pub async fn oauth_login(&self, provider: OAuthProvider) -> Result<OAuthStart, ApiError> {
        let endpoint = format!("/auth/oauth/{provider}/");
        self.call(&endpoint, Method::GET, None).await
    }

    /// Exchanges an authorization code for a session.
    ///
    /// # Errors
    /// Any [`ApiClient::request`] error.
    pub async fn oauth_callback(
        &self,
        provider: OAuthProvider,
        code: &str,
        state: &str,
    ) -> Result<AuthResponse, ApiError> {
        let endpoint = format!("/auth/oauth/{provider}/callback/");
        let response: AuthResponse = self
            .call(
                &endpoint,
                Method::POST,
                Some(json!({ "code": code, "state": state })),
            )
            .await?;
        self.persist_auth(&response)?;
        Ok(response)
    }

    /// Stores the session carried by the frontend callback URL the backend
    /// redirected to after an OAuth round-trip.
    ///
    /// # Errors
    /// - [`ApiError::Validation`] when `url` is not a callback URL
    /// - [`ApiError::OAuthFailed`] when the redirect reports an error
    pub fn complete_oauth_redirect(&self, url: &str) -> Result<UserProfile, ApiError> {
        match oauth::parse_redirect(url, &self.oauth_callback_path) {
            Some(OAuthRedirect::Success { session, user }) => {
                self.sign_in(&session, &user)?;
                Ok(user)
            }
            Some(OAuthRedirect::Failure { error }) => Err(ApiError::OAuthFailed(error)),
            None => Err(ValidationError::NotOAuthCallback(url.to_string()).into()),
        }
    }

    /// Starts phone registration; the backend texts a verification code.
    ///
    /// # Errors
    /// [`ApiError::Validation`] for a number without country code or a
    /// password that breaks a rule, otherwise any [`ApiClient::request`] error.
    pub async fn phone_register(
        &self,
        phone: &str,
        name: &str,
        password: &str,
        avatar_color: Option<&str>,
    ) -> Result<Acknowledgement, ApiError> {
        validate_phone_number(phone)?;
        validate_password(password).map_err(ValidationError::from)?;
        let avatar_color = avatar_color.unwrap_or_else(|| avatar_color_for(name));

        let body = json!({
            "phone_number": phone.trim(),
            "name": name,
            "password": password,
            "password2": password,
            "avatar_color": avatar_color,
        });
        self.ack("/auth/phone/register/", Method::POST, Some(body))
            .await
    }

    /// # Errors
    /// [`ApiError::Validation`] for a number without country code, otherwise
    /// any [`ApiClient::request`] error.
    pub async fn phone_login(&self, phone: &str) -> Result<Acknowledgement, ApiError> {
        validate_phone_number(phone)?;
        self.ack(
            "/auth/phone/login/",
            Method::POST,
            Some(json!({ "phone_number": phone.trim() })),
        )
        .await
    }

    /// Verifies a texted code and stores the issued session.
    ///
    /// # Errors
    /// [`ApiError::Validation`] for a malformed number or code, otherwise any
    /// [`ApiClient::request`] error.
    pub async fn phone_verify_otp(
        &self,
        phone: &str,
        otp: &str,
    ) -> Result<PhoneAuthResponse, ApiError> {
        validate_phone_number(phone)?;
        validate_otp(otp)?;
        let response: PhoneAuthResponse = self
            .call(
                "/auth/phone/verify-otp/",
                Method::POST,
                Some(json!({ "phone_number": phone.trim(), "otp": otp })),
            )
            .await?;
        self.persist_phone_auth(&response)?;
        Ok(response)
    }

    /// Signs in with an ID token from the phone identity provider.
    ///
    /// Unknown numbers need `name` to create an account; see
    /// [`requires_registration`].
    ///
    /// # Errors
    /// Any [`ApiClient::request`] error.
    pub async fn firebase_phone_auth(
        &self,
        id_token: &str,
        name: Option<&str>,
        password: Option<&str>,
    ) -> Result<PhoneAuthResponse, ApiError> {
        let body = json!({
            "firebase_token": id_token,
            "name": name,
            "password": password,
        });
        let response: PhoneAuthResponse = self
            .call("/auth/firebase/phone/", Method::POST, Some(body))
            .await?;
        self.persist_phone_auth(&response)?;
        Ok(response)
    }

    async fn call<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<Value>,
    ) -> Result<T, ApiError> {
        let mut options = RequestOptions::new(method);
        options.body = body;
        self.client.request_as(endpoint, options).await
    }

    async fn ack(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<Value>,
    ) -> Result<Acknowledgement, ApiError> {
        let mut options = RequestOptions::new(method);
        options.body = body;
        match self.client.request(endpoint, options).await? {
            Value::Null => Ok(Acknowledgement::default()),
            value => serde_json::from_value(value).map_err(|e| ApiError::invalid_response(endpoint, e)),
        }
    }

    fn persist_auth(&self, response: &AuthResponse) -> Result<(), ApiError> {
        if let Some(session) = &response.tokens {
            let user = response.user.clone().unwrap_or_default();
            self.sign_in(session, &user)?;
        }
        Ok(())
    }

    fn persist_phone_auth(&self, response: &PhoneAuthResponse) -> Result<(), ApiError> {
        if let Some(session) = response.session() {
            let user = response.user.clone().unwrap_or_default();
            self.sign_in(&session, &user)?;
        }
        Ok(())
    }

    fn sign_in(&self, session: &Session, user: &UserProfile) -> Result<(), ApiError> {
        let store = self.client.session();
        store.set_tokens(session)?;
        store.set_user(user)?;
        tracing::info!(user = %user.display_name(), "signed in");
        self.client.publish(SessionEvent::SignedIn);
        Ok(())
    }

    fn store_profile(&self, user: &UserProfile) -> Result<(), ApiError> {
        self.client.session().set_user(user)?;
        self.client.publish(SessionEvent::ProfileUpdated);
        Ok(())
    }

    fn sign_out(&self) -> Result<(), ApiError> {
        self.client.session().clear()?;
        tracing::info!("signed out");
        self.client.publish(SessionEvent::SignedOut);
        Ok(())
    }
}
