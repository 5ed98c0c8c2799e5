// src/services/upload_service.rs
// DOCUMENTATION: Upload orchestration
// PURPOSE: Create a gallery, push its files to object storage and record one
// photo row per stored file

use crate::db::GalleryStore;
use crate::errors::GalleryError;
use crate::models::{CreateGalleryRequest, CreatePhotoRequest, GalleryResponse, Photo};
use crate::models::gallery::DEFAULT_BRAND_COLOR;
use crate::services::storage_client::{build_storage_path, content_type_for, sanitize_filename};
use crate::services::{BatchRunner, FailurePolicy, ItemFailure, ObjectStorage};
use chrono::Utc;
use serde::Serialize;
use std::time::Instant;
use uuid::Uuid;
use validator::Validate;

/// A file selected for upload
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Result of one upload run
/// DOCUMENTATION: `gallery` is reloaded after the run, so its photo_count and
/// complete flag reflect what was actually recorded
#[derive(Debug, Clone, Serialize)]
pub struct UploadReport {
    pub gallery: GalleryResponse,
    pub uploaded: usize,
    pub failures: Vec<ItemFailure>,
    pub cancelled: bool,
    pub aborted: bool,
    pub duration_seconds: f64,
}

pub struct UploadService;

impl UploadService {
    /// Create a gallery and upload every file into it
    ///
    /// # Arguments
    /// * `name` - Gallery display name
    /// * `photographer_name` - Shown on the gallery page
    /// * `brand_color` - `#rrggbb`, defaults when None
    /// * `files` - Photos in selection order
    pub async fn create_gallery_with_photos(
        store: &dyn GalleryStore,
        storage: &dyn ObjectStorage,
        runner: &BatchRunner,
        name: &str,
        photographer_name: &str,
        brand_color: Option<&str>,
        files: Vec<UploadFile>,
    ) -> Result<UploadReport, GalleryError> {
        let started = Instant::now();

        let photo_count = i32::try_from(files.len())
            .map_err(|_| GalleryError::ValidationError("Too many files".to_string()))?;

        let req = CreateGalleryRequest {
            name: name.trim().to_string(),
            photographer_name: photographer_name.trim().to_string(),
            brand_color: brand_color.unwrap_or(DEFAULT_BRAND_COLOR).to_string(),
            photo_count,
        };
        req.validate()
            .map_err(|e| GalleryError::ValidationError(e.to_string()))?;

        if files.iter().any(|f| sanitize_filename(&f.filename).is_empty()) {
            return Err(GalleryError::ValidationError(
                "Every file needs a name".to_string(),
            ));
        }

        let gallery = store.create_gallery(&req).await?;
        log::info!(
            "Uploading {} photos into gallery {} ({})",
            files.len(),
            gallery.id,
            gallery.name
        );

        let gallery_id = gallery.id;
        let millis = Utc::now().timestamp_millis();
        let items: Vec<(usize, UploadFile)> = files.into_iter().enumerate().collect();

        // 1. Storage writes, batched
        let transfers = runner
            .run(
                items,
                |(_, file)| file.filename.clone(),
                |(index, file)| async move {
                    let UploadFile { filename, data } = file;
                    let path = build_storage_path(gallery_id, index, &filename, millis);
                    storage
                        .upload(&path, data, content_type_for(&filename))
                        .await?;
                    Ok::<_, GalleryError>((filename, path))
                },
            )
            .await;

        let mut failures = transfers.failures;
        let cancelled = transfers.cancelled;
        let mut aborted = transfers.aborted;
        let mut uploaded = 0;

        // 2. Photo rows, one at a time so created_at follows selection order.
        // Every stored object gets its row, cancelled or not.
        for (index, (filename, storage_path)) in transfers.completed {
            let photo = CreatePhotoRequest {
                gallery_id,
                filename: filename.clone(),
                storage_path,
            };

            match store.insert_photo(&photo).await {
                Ok(_) => uploaded += 1,
                Err(e) => {
                    log::warn!("Recording photo {} ({}) failed: {}", index, filename, e);
                    failures.push(ItemFailure {
                        index,
                        label: filename,
                        error: e.to_string(),
                    });
                    if runner.policy() == FailurePolicy::AbortOnError {
                        aborted = true;
                        break;
                    }
                }
            }
        }

        failures.sort_by_key(|f| f.index);

        let gallery = store.get_gallery(gallery_id).await?;
        log::info!(
            "Upload into gallery {} finished: {}/{} photos, {} failures",
            gallery_id,
            uploaded,
            gallery.declared_photo_count,
            failures.len()
        );

        Ok(UploadReport {
            gallery: gallery.to_response(),
            uploaded,
            failures,
            cancelled,
            aborted,
            duration_seconds: started.elapsed().as_secs_f64(),
        })
    }

    /// Store and record one photo in an existing gallery
    pub async fn upload_photo(
        store: &dyn GalleryStore,
        storage: &dyn ObjectStorage,
        gallery_id: Uuid,
        filename: &str,
        data: Vec<u8>,
    ) -> Result<Photo, GalleryError> {
        let filename = sanitize_filename(filename);
        if filename.is_empty() {
            return Err(GalleryError::InvalidInput("filename is required".to_string()));
        }
        if data.is_empty() {
            return Err(GalleryError::InvalidInput(format!("{} is empty", filename)));
        }

        let gallery = store.get_gallery(gallery_id).await?;
        let index = usize::try_from(gallery.photo_count).unwrap_or_default();
        let path = build_storage_path(gallery_id, index, &filename, Utc::now().timestamp_millis());

        storage
            .upload(&path, data, content_type_for(&filename))
            .await?;

        let photo = store
            .insert_photo(&CreatePhotoRequest {
                gallery_id,
                filename,
                storage_path: path,
            })
            .await?;

        log::info!("Added photo {} to gallery {}", photo.id, gallery_id);
        Ok(photo)
    }
}
