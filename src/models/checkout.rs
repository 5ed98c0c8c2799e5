// src/models/checkout.rs
// DOCUMENTATION: Checkout request/response bodies and payment session types
// PURPOSE: Shapes exchanged with the browser and with the payment provider

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{GalleryResponse, PhotoResponse};

/// Body of POST /create-checkout
/// All fields are required, names follow the browser client (camelCase)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckoutRequest {
    pub gallery_id: Uuid,
    pub gallery_name: String,
    pub photographer_name: String,
    pub photo_count: u32,
    /// Whole currency units, as displayed to the buyer
    pub price: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckoutResponse {
    pub session_id: String,
}

/// Single line item checkout session sent to the payment provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSessionRequest {
    pub gallery_id: Uuid,
    pub currency: String,
    /// Amount in hundredths of the currency unit
    pub unit_amount_minor: i64,
    pub product_name: String,
    pub description: String,
    pub success_url: String,
    pub cancel_url: String,
}

/// Session state as reported by the payment provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSession {
    pub id: String,
    pub payment_status: String,
    /// Gallery recorded in the session metadata at creation
    pub gallery_id: Option<Uuid>,
}

impl CheckoutSession {
    pub fn is_paid(&self) -> bool {
        self.payment_status == "paid"
    }

    /// Paid, and created for this gallery
    pub fn proves_payment_for(&self, gallery_id: Uuid) -> bool {
        self.is_paid() && self.gallery_id == Some(gallery_id)
    }
}

/// Query string of the success redirect
#[derive(Debug, Clone, Deserialize)]
pub struct SuccessQuery {
    pub gallery_id: Uuid,
    pub session_id: Option<String>,
}

/// Body returned on the success path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub gallery: GalleryResponse,
    pub photos: Vec<PhotoResponse>,
    /// The session was checked with the provider and is paid
    pub verified: bool,
}
