// src/services/gallery_service.rs
// DOCUMENTATION: Business logic for galleries
// PURPOSE: Creation and the public gallery page view

use crate::db::GalleryStore;
use crate::errors::GalleryError;
use crate::models::{CreateGalleryRequest, Gallery, GalleryDetailResponse, Photo, PhotoResponse};
use crate::services::ObjectStorage;
use uuid::Uuid;
use validator::Validate;

pub struct GalleryService;

impl GalleryService {
    /// Validate and create a gallery with no photos yet
    pub async fn create_gallery(
        store: &dyn GalleryStore,
        req: &CreateGalleryRequest,
    ) -> Result<Gallery, GalleryError> {
        req.validate()
            .map_err(|e| GalleryError::ValidationError(e.to_string()))?;

        store.create_gallery(req).await
    }

    /// Photos with their public URLs, oldest first
    pub fn photo_responses(storage: &dyn ObjectStorage, photos: &[Photo]) -> Vec<PhotoResponse> {
        photos
            .iter()
            .map(|photo| photo.to_response(storage.public_url(&photo.storage_path)))
            .collect()
    }

    /// Gallery page: metadata, completeness, price and photo list
    pub async fn get_detail(
        store: &dyn GalleryStore,
        storage: &dyn ObjectStorage,
        id: Uuid,
    ) -> Result<GalleryDetailResponse, GalleryError> {
        let gallery = store.get_gallery(id).await?;
        let photos = store.list_photos(id).await?;

        if !gallery.is_complete() {
            log::debug!(
                "Gallery {} is incomplete: {}/{} photos",
                id,
                gallery.photo_count,
                gallery.declared_photo_count
            );
        }

        Ok(GalleryDetailResponse {
            gallery: gallery.to_response(),
            photos: Self::photo_responses(storage, &photos),
        })
    }
}
