// src/db/photo_repository.rs
// DOCUMENTATION: Photo database operations
// PURPOSE: Insert and list the photos of a gallery

use crate::errors::GalleryError;
use crate::models::{CreatePhotoRequest, Photo};
use sqlx::PgPool;
use uuid::Uuid;

pub struct PhotoRepository;

impl PhotoRepository {
    /// Record a photo that is already in object storage
    pub async fn create_photo(
        pool: &PgPool,
        req: &CreatePhotoRequest,
    ) -> Result<Photo, GalleryError> {
        let photo = sqlx::query_as::<_, Photo>(
            r#"
            INSERT INTO photos (gallery_id, filename, storage_path)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(req.gallery_id)
        .bind(&req.filename)
        .bind(&req.storage_path)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to create photo {}: {}", req.storage_path, e);
            GalleryError::DatabaseError(format!("Create photo failed: {}", e))
        })?;

        Ok(photo)
    }

    /// Get photos for a gallery
    /// DOCUMENTATION: Oldest first, id breaks ties so repeated reads agree
    pub async fn get_photos_by_gallery(
        pool: &PgPool,
        gallery_id: Uuid,
    ) -> Result<Vec<Photo>, GalleryError> {
        let photos = sqlx::query_as::<_, Photo>(
            r#"
            SELECT * FROM photos
            WHERE gallery_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(gallery_id)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch photos for gallery {}: {}", gallery_id, e);
            GalleryError::DatabaseError(format!("Fetch photos failed: {}", e))
        })?;

        Ok(photos)
    }
}
