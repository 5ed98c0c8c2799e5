// src/services/payment_client.rs
// DOCUMENTATION: Payment provider client
// PURPOSE: Create hosted checkout sessions and read their payment status back

use crate::errors::GalleryError;
use crate::models::{CheckoutSession, CheckoutSessionRequest};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use uuid::Uuid;

/// Hosted checkout provider
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a session and return its id
    async fn create_session(&self, req: &CheckoutSessionRequest) -> Result<String, GalleryError>;

    /// Look a session up by id
    async fn retrieve_session(&self, session_id: &str) -> Result<CheckoutSession, GalleryError>;
}

/// Stripe Checkout client
/// DOCUMENTATION: Talks form-encoded REST to /v1/checkout/sessions,
/// authenticating with the secret key as basic auth user
pub struct StripeClient {
    /// HTTP client for making requests
    client: Client,
    secret_key: String,
    /// e.g. https://api.stripe.com
    base_url: String,
}

/// Session object as returned by Stripe
#[derive(Debug, Deserialize)]
struct StripeSession {
    id: String,
    #[serde(default)]
    payment_status: String,
    #[serde(default)]
    metadata: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    #[serde(default)]
    message: String,
}

impl StripeSession {
    fn into_checkout_session(self) -> CheckoutSession {
        let gallery_id = self
            .metadata
            .get("gallery_id")
            .and_then(|value| Uuid::parse_str(value).ok());

        CheckoutSession {
            id: self.id,
            payment_status: self.payment_status,
            gallery_id,
        }
    }
}

/// Form fields of a single line item, card only, one time payment session
pub fn session_form(req: &CheckoutSessionRequest) -> Vec<(String, String)> {
    let item = "line_items[0]";
    vec![
        ("payment_method_types[0]".to_string(), "card".to_string()),
        (format!("{}[price_data][currency]", item), req.currency.clone()),
        (
            format!("{}[price_data][unit_amount]", item),
            req.unit_amount_minor.to_string(),
        ),
        (
            format!("{}[price_data][product_data][name]", item),
            req.product_name.clone(),
        ),
        (
            format!("{}[price_data][product_data][description]", item),
            req.description.clone(),
        ),
        (format!("{}[quantity]", item), "1".to_string()),
        ("mode".to_string(), "payment".to_string()),
        ("success_url".to_string(), req.success_url.clone()),
        ("cancel_url".to_string(), req.cancel_url.clone()),
        ("metadata[gallery_id]".to_string(), req.gallery_id.to_string()),
    ]
}

/// Session ids are opaque but never contain URL syntax
fn is_valid_session_id(session_id: &str) -> bool {
    !session_id.is_empty()
        && session_id.len() <= 255
        && session_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl StripeClient {
    pub fn new(
        secret_key: String,
        base_url: &str,
        timeout_secs: u64,
    ) -> Result<Self, GalleryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| GalleryError::InternalError(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            secret_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Turn a non-2xx response into a PaymentError carrying the provider message
    async fn error_from(response: reqwest::Response) -> GalleryError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<StripeErrorBody>(&body)
            .map(|parsed| parsed.error.message)
            .unwrap_or(body);

        log::error!("Stripe API error {}: {}", status, message);
        GalleryError::PaymentError(format!("Stripe returned {}: {}", status, message))
    }
}

#[async_trait]
impl PaymentProvider for StripeClient {
    async fn create_session(&self, req: &CheckoutSessionRequest) -> Result<String, GalleryError> {
        let url = format!("{}/v1/checkout/sessions", self.base_url);

        log::debug!(
            "Creating checkout session for gallery {} ({} {})",
            req.gallery_id,
            req.unit_amount_minor,
            req.currency
        );

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.secret_key, None::<&str>)
            .form(&session_form(req))
            .send()
            .await
            .map_err(|e| {
                log::error!("Stripe request failed: {}", e);
                GalleryError::PaymentError(format!("Request failed: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let session: StripeSession = response.json().await.map_err(|e| {
            log::error!("Failed to parse Stripe session: {}", e);
            GalleryError::PaymentError(format!("Parse error: {}", e))
        })?;

        log::info!(
            "Created checkout session {} for gallery {}",
            session.id,
            req.gallery_id
        );
        Ok(session.id)
    }

    async fn retrieve_session(&self, session_id: &str) -> Result<CheckoutSession, GalleryError> {
        if !is_valid_session_id(session_id) {
            return Err(GalleryError::InvalidInput(format!(
                "Malformed session id: {}",
                session_id
            )));
        }

        let url = format!("{}/v1/checkout/sessions/{}", self.base_url, session_id);

        let response = self
            .client
            .get(&url)
            .basic_auth(&self.secret_key, None::<&str>)
            .send()
            .await
            .map_err(|e| {
                log::error!("Stripe request failed: {}", e);
                GalleryError::PaymentError(format!("Request failed: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let session: StripeSession = response.json().await.map_err(|e| {
            log::error!("Failed to parse Stripe session: {}", e);
            GalleryError::PaymentError(format!("Parse error: {}", e))
        })?;

        Ok(session.into_checkout_session())
    }
}
