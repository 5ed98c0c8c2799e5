// src/handlers/checkout.rs
// DOCUMENTATION: HTTP handlers for checkout and payment return
// PURPOSE: Start hosted checkout sessions and handle the success redirect

use crate::config::Config;
use crate::errors::GalleryError;
use crate::models::{CreateCheckoutRequest, CreateCheckoutResponse, SuccessQuery, SuccessResponse};
use crate::services::{AppContext, CheckoutService, GalleryService};
use actix_web::{web, HttpResponse, Responder};

/// POST /create-checkout
/// Returns the provider session id the browser redirects to
pub async fn create_checkout(
    ctx: web::Data<AppContext>,
    config: web::Data<Config>,
    req: web::Json<CreateCheckoutRequest>,
) -> Result<impl Responder, GalleryError> {
    if ctx.checkout_limiter.check().is_err() {
        log::warn!("Checkout rate limit hit for gallery {}", req.gallery_id);
        return Err(GalleryError::RateLimitExceeded);
    }

    let session_id = CheckoutService::create_checkout(
        ctx.store.as_ref(),
        ctx.payments.as_ref(),
        &config,
        &req,
    )
    .await?;

    Ok(HttpResponse::Ok().json(CreateCheckoutResponse { session_id }))
}

/// GET /success?gallery_id=...&session_id=...
/// Verifies the session, then returns the gallery for display
pub async fn checkout_success(
    ctx: web::Data<AppContext>,
    query: web::Query<SuccessQuery>,
) -> Result<impl Responder, GalleryError> {
    let outcome = CheckoutService::complete_checkout(
        ctx.store.as_ref(),
        ctx.payments.as_ref(),
        query.gallery_id,
        query.session_id.as_deref(),
    )
    .await?;

    let detail =
        GalleryService::get_detail(ctx.store.as_ref(), ctx.storage.as_ref(), query.gallery_id)
            .await?;

    Ok(HttpResponse::Ok().json(SuccessResponse {
        gallery: detail.gallery,
        photos: detail.photos,
        verified: outcome.verified,
    }))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/create-checkout", web::post().to(create_checkout))
        .route("/success", web::get().to(checkout_success));
}
