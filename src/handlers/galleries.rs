// src/handlers/galleries.rs
// DOCUMENTATION: HTTP handlers for gallery operations
// PURPOSE: Parse requests, call services, return responses

use crate::config::Config;
use crate::errors::GalleryError;
use crate::models::CreateGalleryRequest;
use crate::services::{AppContext, ArchiveService, FailurePolicy, GalleryService, UploadService};
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct UploadPhotoQuery {
    pub filename: String,
}

/// POST /galleries
/// Create gallery metadata, photos follow through /galleries/{id}/photos
pub async fn create_gallery(
    ctx: web::Data<AppContext>,
    req: web::Json<CreateGalleryRequest>,
) -> Result<impl Responder, GalleryError> {
    let gallery = GalleryService::create_gallery(ctx.store.as_ref(), &req).await?;
    Ok(HttpResponse::Created().json(gallery.to_response()))
}

/// GET /galleries/{id}
/// Gallery page data: metadata, price and photos with public URLs
pub async fn get_gallery(
    ctx: web::Data<AppContext>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, GalleryError> {
    let detail =
        GalleryService::get_detail(ctx.store.as_ref(), ctx.storage.as_ref(), path.into_inner())
            .await?;
    Ok(HttpResponse::Ok().json(detail))
}

/// POST /galleries/{id}/photos?filename=...
/// Raw request body is the photo
pub async fn upload_photo(
    ctx: web::Data<AppContext>,
    path: web::Path<Uuid>,
    query: web::Query<UploadPhotoQuery>,
    body: web::Bytes,
) -> Result<impl Responder, GalleryError> {
    let photo = UploadService::upload_photo(
        ctx.store.as_ref(),
        ctx.storage.as_ref(),
        path.into_inner(),
        &query.filename,
        body.to_vec(),
    )
    .await?;

    let url = ctx.storage.public_url(&photo.storage_path);
    Ok(HttpResponse::Created().json(photo.to_response(url)))
}

/// GET /galleries/{id}/archive
/// Zip of every photo, paid galleries only
pub async fn download_archive(
    ctx: web::Data<AppContext>,
    config: web::Data<Config>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, GalleryError> {
    let runner = ctx.batch_runner(&config, FailurePolicy::ContinueOnError);
    let archive = ArchiveService::build_for_gallery(
        ctx.store.as_ref(),
        ctx.storage.as_ref(),
        &runner,
        path.into_inner(),
    )
    .await?;

    Ok(HttpResponse::Ok()
        .content_type("application/zip")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(archive.filename)],
        })
        .body(archive.bytes))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/galleries")
            .route("", web::post().to(create_gallery))
            .route("/{id}", web::get().to(get_gallery))
            .route("/{id}/photos", web::post().to(upload_photo))
            .route("/{id}/archive", web::get().to(download_archive)),
    );
}
