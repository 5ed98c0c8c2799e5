// src/models/photo.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Uploaded photo belonging to a gallery
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Photo {
    pub id: Uuid,
    pub gallery_id: Uuid,
    /// Original file name as supplied by the uploader, not unique within a gallery
    pub filename: String,
    /// Object key inside the storage bucket
    pub storage_path: String,
    pub created_at: DateTime<Utc>,
}

/// Request to record a stored photo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePhotoRequest {
    pub gallery_id: Uuid,
    pub filename: String,
    pub storage_path: String,
}

/// Photo DTO for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoResponse {
    pub id: Uuid,
    pub filename: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

impl Photo {
    /// Convert database photo into API response DTO
    pub fn to_response(&self, url: String) -> PhotoResponse {
        PhotoResponse {
            id: self.id,
            filename: self.filename.clone(),
            url,
            created_at: self.created_at,
        }
    }
}
