//! Billing links. Payment itself happens on the external checkout/portal.

use reqwest::Method;
use serde_json::json;

use crate::errors::ApiError;
use crate::models::{BillingLink, Plan};
use crate::session::Session;

/// Start a checkout for `plan`; returns the URL to open.
pub async fn checkout(session: &Session, plan: Plan) -> Result<BillingLink, ApiError> {
    let body = json!({ "plan": plan });
    session
        .call("/billing/checkout", Method::POST, Some(&body))
        .await
}

/// Open the billing portal for the current subscription.
pub async fn portal(session: &Session) -> Result<BillingLink, ApiError> {
    session.call("/billing/portal", Method::POST, None).await
}
