// src/services/storage_client.rs
// DOCUMENTATION: Object storage client
// PURPOSE: Upload photo bytes, build public URLs and fetch bytes back for archives

use crate::errors::GalleryError;
use async_trait::async_trait;
use reqwest::{Client, Url};
use std::time::Duration;
use uuid::Uuid;

/// Blob storage holding gallery photos
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `data` under `path`. Existing objects are never overwritten.
    async fn upload(&self, path: &str, data: Vec<u8>, content_type: &str)
        -> Result<(), GalleryError>;

    /// Publicly readable URL of the object at `path`
    fn public_url(&self, path: &str) -> String;

    /// Read the object at `path`
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, GalleryError>;
}

/// Supabase Storage REST client
/// DOCUMENTATION: Objects live at /storage/v1/object/{bucket}/{path}, public
/// reads go through /storage/v1/object/public/{bucket}/{path}
pub struct SupabaseStorage {
    /// HTTP client for making requests
    client: Client,
    /// Project URL, e.g. https://xyz.supabase.co
    base_url: Url,
    /// Service role key
    service_key: String,
    bucket: String,
}

impl SupabaseStorage {
    /// Create a storage client
    ///
    /// # Arguments
    /// * `base_url` - Supabase project URL
    /// * `service_key` - Service role key used for writes
    /// * `bucket` - Bucket holding gallery photos
    /// * `timeout_secs` - Per request timeout
    pub fn new(
        base_url: &str,
        service_key: String,
        bucket: String,
        timeout_secs: u64,
    ) -> Result<Self, GalleryError> {
        let base_url = Url::parse(base_url).map_err(|e| {
            GalleryError::InvalidInput(format!("Invalid storage URL '{}': {}", base_url, e))
        })?;

        if base_url.cannot_be_a_base() {
            return Err(GalleryError::InvalidInput(format!(
                "Storage URL cannot be a base: {}",
                base_url
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| GalleryError::InternalError(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            service_key,
            bucket,
        })
    }

    /// Build an object URL under /storage/v1/object, one segment per path part
    fn object_url(&self, prefix: &[&str], path: &str) -> Url {
        let mut url = self.base_url.clone();
        // cannot_be_a_base was rejected in new()
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["storage", "v1", "object"])
                .extend(prefix)
                .push(&self.bucket)
                .extend(path.split('/').filter(|s| !s.is_empty()));
        }
        url
    }
}

#[async_trait]
impl ObjectStorage for SupabaseStorage {
    async fn upload(
        &self,
        path: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<(), GalleryError> {
        let url = self.object_url(&[], path);
        let size = data.len();

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
            .header("Content-Type", content_type)
            .header("x-upsert", "false")
            .body(data)
            .send()
            .await
            .map_err(|e| {
                log::error!("Storage upload of {} failed: {}", path, e);
                GalleryError::StorageError(format!("Upload request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            log::error!("Storage upload of {} returned {}: {}", path, status, body);
            return Err(GalleryError::StorageError(format!(
                "Upload of {} returned {}",
                path, status
            )));
        }

        log::debug!("Stored {} ({} bytes)", path, size);
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        self.object_url(&["public"], path).to_string()
    }

    async fn fetch(&self, path: &str) -> Result<Vec<u8>, GalleryError> {
        let url = self.object_url(&["public"], path);

        let response = self.client.get(url).send().await.map_err(|e| {
            log::error!("Storage fetch of {} failed: {}", path, e);
            GalleryError::StorageError(format!("Fetch request failed: {}", e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            log::warn!("Storage fetch of {} returned {}", path, status);
            return Err(GalleryError::StorageError(format!(
                "Fetch of {} returned {}",
                path, status
            )));
        }

        let bytes = response.bytes().await.map_err(|e| {
            GalleryError::StorageError(format!("Reading {} failed: {}", path, e))
        })?;

        Ok(bytes.to_vec())
    }
}

/// Replace characters that would change the meaning of an object key
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// Object key for the `index`-th photo of a gallery
/// DOCUMENTATION: `{gallery_id}/{unix_millis}-{index}-{filename}`, the
/// millisecond prefix keeps keys from separate upload runs apart
pub fn build_storage_path(gallery_id: Uuid, index: usize, filename: &str, millis: i64) -> String {
    format!(
        "{}/{}-{}-{}",
        gallery_id,
        millis,
        index,
        sanitize_filename(filename)
    )
}

/// Content type guessed from the file extension
pub fn content_type_for(filename: &str) -> &'static str {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "tif" | "tiff" => "image/tiff",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> SupabaseStorage {
        SupabaseStorage::new(
            "https://project.supabase.co",
            "service-key".to_string(),
            "photos".to_string(),
            5,
        )
        .unwrap()
    }

    #[test]
    fn test_public_url() {
        let url = storage().public_url("abc/1700000000000-0-beach.jpg");
        assert_eq!(
            url,
            "https://project.supabase.co/storage/v1/object/public/photos/abc/1700000000000-0-beach.jpg"
        );
    }

    #[test]
    fn test_public_url_encodes_spaces() {
        let url = storage().public_url("abc/1-0-my photo.jpg");
        assert!(url.ends_with("/public/photos/abc/1-0-my%20photo.jpg"));
    }

    #[test]
    fn test_upload_url_has_no_public_segment() {
        let s = storage();
        let url = s.object_url(&[], "abc/x.jpg");
        assert_eq!(
            url.as_str(),
            "https://project.supabase.co/storage/v1/object/photos/abc/x.jpg"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let result = SupabaseStorage::new("not a url", String::new(), "photos".into(), 5);
        assert!(result.is_err());
    }

    #[test]
    fn test_build_storage_path() {
        let id = Uuid::new_v4();
        let path = build_storage_path(id, 3, "IMG_0003.JPG", 1_700_000_000_000);
        assert_eq!(path, format!("{}/1700000000000-3-IMG_0003.JPG", id));
    }

    #[test]
    fn test_build_storage_path_strips_separators() {
        let id = Uuid::new_v4();
        let path = build_storage_path(id, 0, "../etc/passwd", 1);
        assert_eq!(path, format!("{}/1-0-.._etc_passwd", id));
    }

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("a.JPG"), "image/jpeg");
        assert_eq!(content_type_for("a.png"), "image/png");
        assert_eq!(content_type_for("README"), "application/octet-stream");
    }
}
