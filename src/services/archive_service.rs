// src/services/archive_service.rs
// DOCUMENTATION: Archive delivery
// PURPOSE: Fetch every photo of a paid gallery and pack them into one zip

use crate::db::GalleryStore;
use crate::errors::GalleryError;
use crate::models::Photo;
use crate::services::{BatchRunner, ItemFailure, ObjectStorage};
use std::collections::HashSet;
use std::io::{Cursor, Write};
use uuid::Uuid;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// A finished zip ready to be sent
#[derive(Debug)]
pub struct Archive {
    /// Download name, e.g. `Wedding.zip`
    pub filename: String,
    pub bytes: Vec<u8>,
    /// Entry names in archive order
    pub entries: Vec<String>,
    /// Photos that could not be fetched and were left out
    pub failures: Vec<ItemFailure>,
}

pub struct ArchiveService;

impl ArchiveService {
    /// Zip of a paid gallery
    /// DOCUMENTATION: PaymentRequired when unpaid, NotFound for unknown ids
    pub async fn build_for_gallery(
        store: &dyn GalleryStore,
        storage: &dyn ObjectStorage,
        runner: &BatchRunner,
        gallery_id: Uuid,
    ) -> Result<Archive, GalleryError> {
        let gallery = store.get_gallery(gallery_id).await?;
        if !gallery.paid {
            return Err(GalleryError::PaymentRequired(gallery_id.to_string()));
        }

        let photos = store.list_photos(gallery_id).await?;
        Self::assemble(storage, runner, gallery_id, &gallery.name, photos).await
    }

    /// Fetch `photos` and pack them in listing order
    ///
    /// # Arguments
    /// * `gallery_id` - Only used for logs and errors
    /// * `gallery_name` - Becomes the download file name
    /// * `photos` - Photos in listing order
    pub async fn assemble(
        storage: &dyn ObjectStorage,
        runner: &BatchRunner,
        gallery_id: Uuid,
        gallery_name: &str,
        photos: Vec<Photo>,
    ) -> Result<Archive, GalleryError> {
        let requested = photos.len();

        let report = runner
            .run(
                photos,
                |photo| photo.filename.clone(),
                |photo| async move {
                    let bytes = storage.fetch(&photo.storage_path).await?;
                    Ok::<_, GalleryError>((photo.filename, bytes))
                },
            )
            .await;

        if report.cancelled {
            return Err(GalleryError::Cancelled);
        }

        if report.completed.is_empty() {
            log::warn!(
                "Archive for gallery {} has no entries ({} photos, {} failures)",
                gallery_id,
                requested,
                report.failures.len()
            );
            return Err(GalleryError::EmptyArchive(gallery_id.to_string()));
        }

        let mut taken = HashSet::new();
        let files: Vec<(String, Vec<u8>)> = report
            .completed
            .into_iter()
            .map(|(_, (filename, bytes))| (unique_entry_name(&filename, &mut taken), bytes))
            .collect();
        let entries: Vec<String> = files.iter().map(|(name, _)| name.clone()).collect();

        let bytes = tokio::task::spawn_blocking(move || write_zip(files))
            .await
            .map_err(|e| GalleryError::ArchiveError(format!("Zip task failed: {}", e)))??;

        log::info!(
            "Built archive for gallery {}: {} entries, {} skipped, {} bytes",
            gallery_id,
            entries.len(),
            report.failures.len(),
            bytes.len()
        );

        Ok(Archive {
            filename: archive_filename(gallery_name),
            bytes,
            entries,
            failures: report.failures,
        })
    }
}

/// Serialize entries into an in-memory zip, uncompressed
fn write_zip(files: Vec<(String, Vec<u8>)>) -> Result<Vec<u8>, GalleryError> {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    for (name, bytes) in files {
        writer.start_file(name.as_str(), options).map_err(|e| {
            log::error!("Zip entry {} failed: {}", name, e);
            GalleryError::ArchiveError(format!("Entry {}: {}", name, e))
        })?;
        writer
            .write_all(&bytes)
            .map_err(|e| GalleryError::ArchiveError(format!("Entry {}: {}", name, e)))?;
    }

    let cursor = writer.finish().map_err(|e| {
        log::error!("Finishing zip failed: {}", e);
        GalleryError::ArchiveError(e.to_string())
    })?;

    Ok(cursor.into_inner())
}

/// `{gallery name}.zip` with characters unsafe in a file name replaced
pub fn archive_filename(gallery_name: &str) -> String {
    let cleaned: String = gallery_name
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, ' ' | '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches('.').trim();

    if cleaned.is_empty() {
        "gallery.zip".to_string()
    } else {
        format!("{}.zip", cleaned)
    }
}

/// Entry name for `filename` not yet in `taken`
/// DOCUMENTATION: Separators become `_`; repeats get ` (1)`, ` (2)`, ...
/// before the extension
pub fn unique_entry_name(filename: &str, taken: &mut HashSet<String>) -> String {
    let base: String = filename
        .trim()
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    let base = if base.is_empty() { "photo".to_string() } else { base };

    if taken.insert(base.clone()) {
        return base;
    }

    let (stem, extension) = match base.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem.to_string(), format!(".{}", ext)),
        _ => (base.clone(), String::new()),
    };

    let mut n = 1;
    loop {
        let candidate = format!("{} ({}){}", stem, n, extension);
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}
