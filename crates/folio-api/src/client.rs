//! HTTP Request Gateway.

use std::sync::Arc;
use std::time::Duration;

use folio_auth::TokenStore;
use folio_settings::ApiSettings;
use reqwest::header::ACCEPT;
use reqwest::{Method, StatusCode};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::errors::ApiError;
use crate::response::ApiResponse;

/// Gateway to the external API.
///
/// Reads the token store on every call, so a token written by
/// [`TokenStore::set`] is used by the very next request.
///
/// # Contract
///
/// Whenever a response carries status 401, the gateway clears the token
/// store before returning. Callers only react (e.g. redirect to login);
/// they never clear the token themselves. A 403 leaves the token alone.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: String,
    tokens: Arc<dyn TokenStore>,
}

impl ApiClient {
    /// Build a gateway for `settings`, reading credentials from `tokens`.
    pub fn new(settings: &ApiSettings, tokens: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(settings.timeout_ms))
            .build()?;
        Ok(Self {
            http,
            base: join_base(&settings.base_url, &settings.path_prefix),
            tokens,
        })
    }

    /// Base URL with the path prefix applied.
    pub fn base_url(&self) -> &str {
        &self.base
    }

    /// Token store shared with this gateway.
    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    /// Absolute URL for a resource path.
    pub fn url_for(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base, endpoint.trim_start_matches('/'))
    }

    /// Perform a call and normalize the outcome.
    ///
    /// Never fails: transport errors become status 0 with a connectivity
    /// message, and server errors carry the best message the body offers.
    #[tracing::instrument(skip_all, fields(method = %method, endpoint = %endpoint))]
    pub async fn request(&self, endpoint: &str, method: Method, body: Option<&Value>) -> ApiResponse {
        let token = self.tokens.get();

        let mut req = self
            .http
            .request(method, self.url_for(endpoint))
            .header(ACCEPT, "application/json");
        if let Some(token) = &token {
            req = req.bearer_auth(token);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        debug!(authenticated = token.is_some(), "sending request");
        let resp = match req.send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!("no response from API: {e}");
                return ApiResponse::network_error();
            }
        };

        let status = resp.status();
        let text = match resp.text().await {
            Ok(text) => text,
            Err(e) => {
                warn!(status = status.as_u16(), "failed to read response body: {e}");
                String::new()
            }
        };

        if status == StatusCode::UNAUTHORIZED {
            info!("credentials rejected, clearing stored token");
            self.tokens.clear();
        }

        let response = ApiResponse::from_parts(status, &text);
        if let Some(message) = response.message() {
            warn!(status = response.status(), error = message, "request failed");
        }
        response
    }

    /// `GET` shorthand.
    pub async fn get(&self, endpoint: &str) -> ApiResponse {
        self.request(endpoint, Method::GET, None).await
    }

    /// `POST` shorthand.
    pub async fn post(&self, endpoint: &str, body: Option<&Value>) -> ApiResponse {
        self.request(endpoint, Method::POST, body).await
    }

    /// `PUT` shorthand.
    pub async fn put(&self, endpoint: &str, body: Option<&Value>) -> ApiResponse {
        self.request(endpoint, Method::PUT, body).await
    }

    /// `DELETE` shorthand.
    pub async fn delete(&self, endpoint: &str) -> ApiResponse {
        self.request(endpoint, Method::DELETE, None).await
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base", &self.base)
            .finish_non_exhaustive()
    }
}

fn join_base(base_url: &str, prefix: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        base.to_string()
    } else {
        format!("{base}/{prefix}")
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
