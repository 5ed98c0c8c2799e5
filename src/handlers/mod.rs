// src/handlers/mod.rs
// DOCUMENTATION: Handlers module organization
// PURPOSE: Re-export handler components

pub mod checkout;
pub mod galleries;
pub mod health;

pub use checkout::config as checkout_config;
pub use galleries::config as galleries_config;
pub use health::config as health_config;

use crate::errors::GalleryError;
use actix_web::web;

/// Body, query and path extractors answer with the JSON error body on failure
/// DOCUMENTATION: Registered once here so the server and handler tests agree
pub fn extractor_config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(64 * 1024)
            .error_handler(|err, _req| GalleryError::InvalidInput(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| GalleryError::InvalidInput(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| GalleryError::InvalidInput(err.to_string()).into()),
    );
}
