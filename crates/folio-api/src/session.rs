//! Session management and the notify-on-failure call pattern.
//!
//! Views call through [`Session::call`]. Each failed call publishes exactly
//! one error notification and returns an [`ApiError`]; [`Followup::for_error`]
//! tells the view what to do next.

use std::sync::Arc;

use folio_auth::TokenStore;
use folio_notify::Broadcaster;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::info;

use crate::client::ApiClient;
use crate::errors::ApiError;
use crate::models::AuthPayload;

/// What a view should do after a failed call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Followup {
    /// Nothing beyond the notification already shown.
    None,
    /// Credentials were rejected (and cleared); send the user to login.
    RedirectToLogin,
    /// The plan doesn't cover this; offer an upgrade.
    OfferUpgrade,
}

impl Followup {
    /// Followup for an error returned by a [`Session`] call.
    pub fn for_error(err: &ApiError) -> Self {
        match err {
            ApiError::Unauthorized { .. } => Self::RedirectToLogin,
            ApiError::Entitlement { .. } => Self::OfferUpgrade,
            _ => Self::None,
        }
    }
}

/// Gateway, token store, and notifier bundled for the views.
#[derive(Clone, Debug)]
pub struct Session {
    client: ApiClient,
    notifier: Broadcaster,
}

impl Session {
    /// Bundle a gateway with the notifier failures are reported to.
    pub fn new(client: ApiClient, notifier: Broadcaster) -> Self {
        Self { client, notifier }
    }

    /// Underlying gateway.
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Notification queue.
    pub fn notifier(&self) -> &Broadcaster {
        &self.notifier
    }

    fn tokens(&self) -> &Arc<dyn TokenStore> {
        self.client.tokens()
    }

    /// Whether a token is stored.
    pub fn is_logged_in(&self) -> bool {
        self.tokens().get().is_some()
    }

    /// Call the API and decode the success payload as `T`.
    ///
    /// On any failure (including a payload of the wrong shape) publishes one
    /// error notification before returning the error.
    pub async fn call<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<&Value>,
    ) -> Result<T, ApiError> {
        let response = self.client.request(endpoint, method, body).await;
        self.report(response.into_json())
    }

    /// Publish the error of a failed result, passing the result through.
    pub fn report<T>(&self, result: Result<T, ApiError>) -> Result<T, ApiError> {
        if let Err(e) = &result {
            let _ = self.notifier.error(e.to_string());
        }
        result
    }

    /// Log in with email and password; persists the returned token.
    #[tracing::instrument(skip_all)]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthPayload, ApiError> {
        let body = json!({ "email": email, "password": password });
        let payload: AuthPayload = self.call("/auth/login", Method::POST, Some(&body)).await?;
        self.adopt(&payload)?;
        let _ = self.notifier.success("Signed in");
        Ok(payload)
    }

    /// Create an account. The server emails a verification code; no token
    /// is issued until [`Session::verify`] succeeds.
    #[tracing::instrument(skip_all)]
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<(), ApiError> {
        let body = json!({ "name": name, "email": email, "password": password });
        let _: Value = self.call("/auth/register", Method::POST, Some(&body)).await?;
        let _ = self
            .notifier
            .success("Account created. Check your email for a verification code.");
        Ok(())
    }

    /// Confirm a registration code; persists the returned token.
    #[tracing::instrument(skip_all)]
    pub async fn verify(&self, email: &str, code: &str) -> Result<AuthPayload, ApiError> {
        let body = json!({ "email": email, "code": code });
        let payload: AuthPayload = self
            .call("/auth/verify-email", Method::POST, Some(&body))
            .await?;
        self.adopt(&payload)?;
        let _ = self.notifier.success("Email verified");
        Ok(payload)
    }

    /// Forget the stored token.
    pub fn logout(&self) {
        self.tokens().clear();
        info!("logged out");
        let _ = self.notifier.success("Signed out");
    }

    /// Store the token from an auth payload before any later call reads it.
    fn adopt(&self, payload: &AuthPayload) -> Result<(), ApiError> {
        match payload.token.as_deref().map(str::trim) {
            Some(token) if !token.is_empty() => {
                self.tokens().set(token);
                info!("session token stored");
                Ok(())
            }
            _ => self.report(Err(ApiError::MissingField("token"))),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use folio_auth::MemoryTokenStore;
    use folio_notify::NotificationKind;
    use folio_settings::ApiSettings;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn session_for(uri: &str, tokens: Arc<dyn TokenStore>) -> Session {
        let settings = ApiSettings {
            base_url: uri.to_string(),
            ..ApiSettings::default()
        };
        Session::new(ApiClient::new(&settings, tokens).unwrap(), Broadcaster::default())
    }

    #[test]
    fn followup_mapping() {
        let unauthorized = ApiError::from_failure(401, "x".to_string());
        let forbidden = ApiError::from_failure(403, "x".to_string());
        let server = ApiError::from_failure(500, "x".to_string());
        assert_eq!(Followup::for_error(&unauthorized), Followup::RedirectToLogin);
        assert_eq!(Followup::for_error(&forbidden), Followup::OfferUpgrade);
        assert_eq!(Followup::for_error(&server), Followup::None);
        assert_eq!(
            Followup::for_error(&ApiError::MissingField("token")),
            Followup::None
        );
    }

    #[tokio::test]
    async fn login_stores_token_before_next_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/login"))
            .and(body_json(json!({"email": "a@b.c", "password": "pw"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "tok-new"})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/auth/me"))
            .and(header("authorization", "Bearer tok-new"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "u1", "email": "a@b.c"})))
            .expect(1)
            .mount(&server)
            .await;

        let tokens: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());
        let session = session_for(&server.uri(), Arc::clone(&tokens));

        let _ = session.login("a@b.c", "pw").await.unwrap();
        assert_eq!(tokens.get().as_deref(), Some("tok-new"));
        assert!(session.is_logged_in());

        let me: Value = session.call("/auth/me", Method::GET, None).await.unwrap();
        assert_eq!(me["id"], "u1");

        let visible = session.notifier().visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].kind, NotificationKind::Success);
    }

    #[tokio::test]
    async fn login_without_token_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user": null})))
            .mount(&server)
            .await;

        let session = session_for(&server.uri(), Arc::new(MemoryTokenStore::new()));
        let err = session.login("a@b.c", "pw").await.unwrap_err();
        assert!(matches!(err, ApiError::MissingField("token")));
        assert!(!session.is_logged_in());
        assert_eq!(session.notifier().len(), 1);
    }

    #[tokio::test]
    async fn failed_call_publishes_exactly_one_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!("Not authorized")))
            .mount(&server)
            .await;

        let tokens: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::with_token("stale"));
        let session = session_for(&server.uri(), Arc::clone(&tokens));

        let err = session
            .call::<Value>("/auth/me", Method::GET, None)
            .await
            .unwrap_err();
        assert_eq!(Followup::for_error(&err), Followup::RedirectToLogin);
        assert!(tokens.get().is_none());

        let visible = session.notifier().visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].kind, NotificationKind::Error);
        assert_eq!(visible[0].message, "Not authorized");
    }

    #[tokio::test]
    async fn register_does_not_store_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/register"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"token": "ignored"})))
            .mount(&server)
            .await;

        let session = session_for(&server.uri(), Arc::new(MemoryTokenStore::new()));
        session.register("Ann", "a@b.c", "pw").await.unwrap();
        assert!(!session.is_logged_in());
    }

    #[tokio::test]
    async fn verify_stores_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/verify-email"))
            .and(body_json(json!({"email": "a@b.c", "code": "123456"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "tok-v"})))
            .mount(&server)
            .await;

        let tokens: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());
        let session = session_for(&server.uri(), Arc::clone(&tokens));
        let _ = session.verify("a@b.c", "123456").await.unwrap();
        assert_eq!(tokens.get().as_deref(), Some("tok-v"));
    }

    #[tokio::test]
    async fn logout_clears_and_notifies() {
        let session = session_for("http://127.0.0.1:1", Arc::new(MemoryTokenStore::with_token("t")));
        session.logout();
        session.logout();
        assert!(!session.is_logged_in());
        assert_eq!(session.notifier().len(), 2);
    }
}
