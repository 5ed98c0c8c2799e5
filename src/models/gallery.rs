// src/models/gallery.rs
// DOCUMENTATION: Core data structures for galleries
// PURPOSE: Database row, creation request and API response for a gallery

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::PhotoResponse;
use crate::services::pricing;

pub const DEFAULT_BRAND_COLOR: &str = "#0070f3";

/// Represents a gallery record from the database
/// DOCUMENTATION: Maps the galleries table; photo_count is computed from
/// the photos table at read time and never stored
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Gallery {
    /// Unique identifier (UUID v4)
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Photographer shown on the gallery page
    pub photographer_name: String,

    /// Hex color used by the gallery page
    pub brand_color: String,

    /// Number of files the creator announced when the gallery was created
    pub declared_photo_count: i32,

    /// Number of photo rows actually recorded
    pub photo_count: i64,

    /// Set once a checkout session for this gallery has been verified as paid
    pub paid: bool,

    pub created_at: DateTime<Utc>,
}

impl Gallery {
    /// Every announced photo has a row
    pub fn is_complete(&self) -> bool {
        self.photo_count >= i64::from(self.declared_photo_count)
    }

    /// Archive price in whole currency units, from the actual photo count
    pub fn price(&self) -> u32 {
        pricing::price_for(self.photo_count.max(0) as u64)
    }

    /// Convert database gallery into API response DTO
    pub fn to_response(&self) -> GalleryResponse {
        GalleryResponse {
            id: self.id,
            name: self.name.clone(),
            photographer_name: self.photographer_name.clone(),
            brand_color: self.brand_color.clone(),
            photo_count: self.photo_count,
            declared_photo_count: self.declared_photo_count,
            complete: self.is_complete(),
            paid: self.paid,
            price: self.price(),
            created_at: self.created_at,
        }
    }
}

fn default_brand_color() -> String {
    DEFAULT_BRAND_COLOR.to_string()
}

/// Accepts `#rrggbb`
fn validate_brand_color(color: &str) -> Result<(), ValidationError> {
    let valid = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());

    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("brand_color"))
    }
}

/// Request DTO for creating a new gallery
/// DOCUMENTATION: Body of POST /galleries, also built by the upload orchestrator
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateGalleryRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    #[validate(length(min = 1, max = 255))]
    pub photographer_name: String,

    #[serde(default = "default_brand_color")]
    #[validate(custom = "validate_brand_color")]
    pub brand_color: String,

    /// Number of photos that will be uploaded
    #[validate(range(min = 1, max = 10000))]
    pub photo_count: i32,
}

/// Response DTO for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryResponse {
    pub id: Uuid,
    pub name: String,
    pub photographer_name: String,
    pub brand_color: String,
    pub photo_count: i64,
    pub declared_photo_count: i32,
    /// false while photo_count < declared_photo_count (interrupted upload)
    pub complete: bool,
    pub paid: bool,
    /// Archive price in whole currency units
    pub price: u32,
    pub created_at: DateTime<Utc>,
}

/// Gallery with its photos, as shown on the public gallery page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryDetailResponse {
    pub gallery: GalleryResponse,
    pub photos: Vec<PhotoResponse>,
}
