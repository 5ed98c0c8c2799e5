// src/db/store.rs
// DOCUMENTATION: Gallery repository interface
// PURPOSE: Trait consumed by services, with the PostgreSQL implementation

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{GalleryRepository, PhotoRepository};
use crate::errors::GalleryError;
use crate::models::{CreateGalleryRequest, CreatePhotoRequest, Gallery, Photo};

/// Persistence for galleries and their photos
#[async_trait]
pub trait GalleryStore: Send + Sync {
    async fn create_gallery(&self, req: &CreateGalleryRequest) -> Result<Gallery, GalleryError>;

    /// NotFound when no gallery has this id
    async fn get_gallery(&self, id: Uuid) -> Result<Gallery, GalleryError>;

    /// Set paid = true. Returns whether this call changed the flag.
    async fn mark_paid(&self, id: Uuid) -> Result<bool, GalleryError>;

    /// Photos ordered by creation time ascending
    async fn list_photos(&self, gallery_id: Uuid) -> Result<Vec<Photo>, GalleryError>;

    async fn insert_photo(&self, req: &CreatePhotoRequest) -> Result<Photo, GalleryError>;
}

/// GalleryStore backed by PostgreSQL
#[derive(Clone)]
pub struct PgGalleryStore {
    pool: PgPool,
}

impl PgGalleryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GalleryStore for PgGalleryStore {
    async fn create_gallery(&self, req: &CreateGalleryRequest) -> Result<Gallery, GalleryError> {
        GalleryRepository::create_gallery(&self.pool, req).await
    }

    async fn get_gallery(&self, id: Uuid) -> Result<Gallery, GalleryError> {
        GalleryRepository::get_by_id(&self.pool, id).await
    }

    async fn mark_paid(&self, id: Uuid) -> Result<bool, GalleryError> {
        GalleryRepository::mark_paid(&self.pool, id).await
    }

    async fn list_photos(&self, gallery_id: Uuid) -> Result<Vec<Photo>, GalleryError> {
        PhotoRepository::get_photos_by_gallery(&self.pool, gallery_id).await
    }

    async fn insert_photo(&self, req: &CreatePhotoRequest) -> Result<Photo, GalleryError> {
        PhotoRepository::create_photo(&self.pool, req).await
    }
}
