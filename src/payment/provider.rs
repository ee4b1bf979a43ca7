use super::types::{CheckoutRequest, CheckoutSession, SessionRecord};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

#[async_trait]
pub trait PaymentProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Create a hosted checkout session
    async fn create_session(&self, request: &CheckoutRequest) -> Result<CheckoutSession>;

    /// Look up an existing checkout session by id
    async fn retrieve_session(&self, session_id: &str) -> Result<SessionRecord>;
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    message: Option<String>,
}

pub struct StripeClient {
    client: reqwest::Client,
    api_base: Url,
    secret_key: Option<String>,
}

impl StripeClient {
    pub fn new(api_base: &str, secret_key: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        let api_base =
            Url::parse(api_base).with_context(|| format!("Invalid Stripe API URL: {}", api_base))?;

        Ok(Self {
            client,
            api_base,
            secret_key,
        })
    }

    fn secret_key(&self) -> Result<&str> {
        self.secret_key
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("Stripe secret key is not configured"))
    }

    /// `{api_base}/v1/checkout/sessions[/{id}]`, with the id encoded as a
    /// single path segment. Dot segments would be collapsed into the list
    /// route, so they are rejected.
    pub fn sessions_url(&self, session_id: Option<&str>) -> Result<Url> {
        if let Some(id) = session_id {
            if matches!(id, "" | "." | "..") {
                return Err(anyhow::anyhow!("Invalid checkout session id: '{}'", id));
            }
        }

        let mut url = self.api_base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| anyhow::anyhow!("Stripe API URL cannot be a base"))?;
            segments.pop_if_empty().extend(["v1", "checkout", "sessions"]);
            if let Some(id) = session_id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    async fn read_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read Stripe response")?;

        debug!("Stripe responded with HTTP {}: {}", status, body);

        if !status.is_success() {
            let message = serde_json::from_str::<StripeErrorBody>(&body)
                .ok()
                .and_then(|b| b.error.message)
                .unwrap_or_else(|| format!("Stripe request failed: HTTP {}", status));
            return Err(anyhow::anyhow!(message));
        }

        serde_json::from_str(&body).context("Failed to parse Stripe response")
    }
}

/// Form fields for `POST /v1/checkout/sessions`.
pub fn session_form(request: &CheckoutRequest) -> Vec<(String, String)> {
    let item = &request.line_item;
    vec![
        ("payment_method_types[0]".into(), "card".into()),
        ("line_items[0][price_data][currency]".into(), item.currency.clone()),
        (
            "line_items[0][price_data][product_data][name]".into(),
            item.name.clone(),
        ),
        (
            "line_items[0][price_data][product_data][description]".into(),
            item.description.clone(),
        ),
        (
            "line_items[0][price_data][unit_amount]".into(),
            item.unit_amount.to_string(),
        ),
        ("line_items[0][quantity]".into(), item.quantity.to_string()),
        ("mode".into(), "payment".into()),
        ("success_url".into(), request.success_url.clone()),
        ("cancel_url".into(), request.cancel_url.clone()),
    ]
}

#[async_trait]
impl PaymentProvider for StripeClient {
    fn name(&self) -> &'static str {
        "stripe"
    }

    async fn create_session(&self, request: &CheckoutRequest) -> Result<CheckoutSession> {
        let response = self
            .client
            .post(self.sessions_url(None)?)
            .basic_auth(self.secret_key()?, None::<&str>)
            .form(&session_form(request))
            .send()
            .await
            .context("Failed to reach Stripe")?;

        Self::read_response(response).await
    }

    async fn retrieve_session(&self, session_id: &str) -> Result<SessionRecord> {
        let response = self
            .client
            .get(self.sessions_url(Some(session_id))?)
            .basic_auth(self.secret_key()?, None::<&str>)
            .send()
            .await
            .context("Failed to reach Stripe")?;

        Self::read_response(response).await
    }
}
