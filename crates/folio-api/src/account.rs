//! Current account.

use reqwest::Method;

use crate::errors::ApiError;
use crate::models::{Plan, User};
use crate::session::{Followup, Session};

/// Fetch the logged-in account.
pub async fn me(session: &Session) -> Result<User, ApiError> {
    session.call("/auth/me", Method::GET, None).await
}

/// Plan of the current reader. Anonymous readers are on the free plan.
///
/// A rejected token is returned as an error so the caller can send the
/// reader to login. Any other failed lookup is reported and treated as free.
pub async fn current_plan(session: &Session) -> Result<Plan, ApiError> {
    if !session.is_logged_in() {
        return Ok(Plan::Free);
    }
    match me(session).await {
        Ok(user) => Ok(user.plan),
        Err(err) if Followup::for_error(&err) == Followup::RedirectToLogin => Err(err),
        Err(_) => Ok(Plan::Free),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ApiClient;
    use folio_auth::{MemoryTokenStore, TokenStore};
    use folio_notify::Broadcaster;
    use folio_settings::ApiSettings;
    use serde_json::json;
    use std::sync::Arc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn session_for(uri: &str, tokens: Arc<dyn TokenStore>) -> Session {
        let settings = ApiSettings {
            base_url: uri.to_string(),
            ..ApiSettings::default()
        };
        Session::new(ApiClient::new(&settings, tokens).unwrap(), Broadcaster::default())
    }

    #[tokio::test]
    async fn anonymous_plan_is_free_without_a_call() {
        let server = MockServer::start().await;
        let session = session_for(&server.uri(), Arc::new(MemoryTokenStore::new()));
        assert_eq!(current_plan(&session).await.unwrap(), Plan::Free);
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejected_token_is_not_downgraded_to_free() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/auth/me"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"detail": "Not authorized"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let tokens = Arc::new(MemoryTokenStore::with_token("stale"));
        let session = session_for(&server.uri(), tokens.clone());
        let err = current_plan(&session).await.unwrap_err();
        assert_eq!(Followup::for_error(&err), Followup::RedirectToLogin);
        assert_eq!(tokens.get(), None);
        assert_eq!(session.notifier().len(), 1);
    }

    #[tokio::test]
    async fn server_failure_degrades_to_free() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/auth/me"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let session = session_for(&server.uri(), Arc::new(MemoryTokenStore::with_token("t")));
        assert_eq!(current_plan(&session).await.unwrap(), Plan::Free);
        assert!(session.is_logged_in());
        assert_eq!(session.notifier().len(), 1);
    }

    #[tokio::test]
    async fn premium_plan_from_me() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/auth/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "u1", "email": "a@b.c", "plan": "premium"
            })))
            .mount(&server)
            .await;

        let session = session_for(&server.uri(), Arc::new(MemoryTokenStore::with_token("t")));
        let user = me(&session).await.unwrap();
        assert_eq!(user.email, "a@b.c");
        assert_eq!(current_plan(&session).await.unwrap(), Plan::Premium);
    }
}
