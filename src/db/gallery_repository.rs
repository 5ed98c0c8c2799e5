// src/db/gallery_repository.rs
// DOCUMENTATION: Gallery database operations
// PURPOSE: All SQL touching the galleries table

use crate::errors::GalleryError;
use crate::models::{CreateGalleryRequest, Gallery};
use sqlx::PgPool;
use uuid::Uuid;

/// GalleryRepository: database operations for galleries
/// DOCUMENTATION: photo_count is always derived from the photos table
pub struct GalleryRepository;

impl GalleryRepository {
    /// Create new gallery
    /// DOCUMENTATION: Inserts the gallery and returns it with a zero photo count
    pub async fn create_gallery(
        pool: &PgPool,
        req: &CreateGalleryRequest,
    ) -> Result<Gallery, GalleryError> {
        let gallery = sqlx::query_as::<_, Gallery>(
            r#"
            INSERT INTO galleries (name, photographer_name, brand_color, declared_photo_count)
            VALUES ($1, $2, $3, $4)
            RETURNING
                id, name, photographer_name, brand_color, declared_photo_count,
                paid, created_at, 0::BIGINT AS photo_count
            "#,
        )
        .bind(&req.name)
        .bind(&req.photographer_name)
        .bind(&req.brand_color)
        .bind(req.photo_count)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to create gallery: {}", e);
            GalleryError::DatabaseError(e.to_string())
        })?;

        log::info!("Created gallery with id: {}", gallery.id);
        Ok(gallery)
    }

    /// Retrieve gallery by ID
    /// DOCUMENTATION: Missing rows are NotFound, query failures are DatabaseError
    pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Gallery, GalleryError> {
        sqlx::query_as::<_, Gallery>(
            r#"
            SELECT
                g.id, g.name, g.photographer_name, g.brand_color, g.declared_photo_count,
                g.paid, g.created_at,
                (SELECT COUNT(*) FROM photos p WHERE p.gallery_id = g.id) AS photo_count
            FROM galleries g
            WHERE g.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            log::error!("Database error fetching gallery {}: {}", id, e);
            GalleryError::DatabaseError(e.to_string())
        })?
        .ok_or_else(|| {
            log::warn!("Gallery not found: {}", id);
            GalleryError::NotFound(id.to_string())
        })
    }

    /// Flip the paid flag
    /// DOCUMENTATION: Idempotent, returns true only for the call that changed the row
    pub async fn mark_paid(pool: &PgPool, id: Uuid) -> Result<bool, GalleryError> {
        let rows = sqlx::query("UPDATE galleries SET paid = TRUE WHERE id = $1 AND paid = FALSE")
            .bind(id)
            .execute(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to mark gallery {} as paid: {}", id, e);
                GalleryError::DatabaseError(e.to_string())
            })?
            .rows_affected();

        if rows == 0 {
            // Already paid, or missing
            Self::get_by_id(pool, id).await?;
            return Ok(false);
        }

        log::info!("Gallery {} marked as paid", id);
        Ok(true)
    }
}
