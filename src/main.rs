// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Initialize config, database, collaborators and start HTTP server

use actix_web::{middleware::Logger, web, App, HttpServer};
use artydrop::config::{self, Config};
use artydrop::db::PgGalleryStore;
use artydrop::handlers;
use artydrop::services::{AppContext, StripeClient, SupabaseStorage};
use dotenv::dotenv;
use std::io;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Load configuration
    let config = Config::from_env();

    // 3. Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        let log_level = if !config.log_level.is_empty() {
            config.log_level.as_str()
        } else {
            "info,actix_web=info,sqlx=warn"
        };
        std::env::set_var("RUST_LOG", log_level);
    }
    env_logger::init();

    if let Err(e) = config.validate() {
        log::error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    log::info!("Starting artydrop gallery service...");
    log::info!("Environment: {}", config.environment);
    log::info!(
        "Server Address: {}:{}",
        config.server_address,
        config.server_port
    );

    // 4. Initialize database connection pool
    let pool = match config::init_db_pool(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    if config.apply_schema {
        if let Err(e) = config::apply_schema(&pool).await {
            log::error!("Failed to apply database schema: {}", e);
            std::process::exit(1);
        }
    }

    // 5. External collaborators
    let storage = match SupabaseStorage::new(
        &config.supabase_url,
        config.supabase_service_key.clone(),
        config.storage_bucket.clone(),
        config.http_timeout_secs,
    ) {
        Ok(storage) => storage,
        Err(e) => {
            log::error!("Failed to configure object storage: {}", e);
            std::process::exit(1);
        }
    };

    let payments = match StripeClient::new(
        config.stripe_secret_key.clone(),
        &config.stripe_api_base,
        config.http_timeout_secs,
    ) {
        Ok(payments) => payments,
        Err(e) => {
            log::error!("Failed to configure payment provider: {}", e);
            std::process::exit(1);
        }
    };

    let ctx = AppContext::new(
        Arc::new(PgGalleryStore::new(pool)),
        Arc::new(storage),
        Arc::new(payments),
        config.checkout_rate_per_minute,
    );
    log::info!(
        "Checkout limited to {} sessions/minute, batch concurrency {}",
        config.checkout_rate_per_minute,
        config.batch_concurrency
    );

    // 6. Start HTTP server
    let server_addr = format!("{}:{}", config.server_address, config.server_port);
    let max_upload_bytes = config.max_upload_bytes;
    let config_clone = config.clone();

    HttpServer::new(move || {
        App::new()
            // Application state (collaborators and config)
            .app_data(web::Data::new(ctx.clone()))
            .app_data(web::Data::new(config_clone.clone()))
            .app_data(web::PayloadConfig::new(max_upload_bytes))
            .configure(handlers::extractor_config)
            // Middleware
            .wrap(Logger::default())
            .wrap(actix_web::middleware::Compress::default())
            // Routes
            .configure(handlers::health_config)
            .configure(handlers::galleries_config)
            .configure(handlers::checkout_config)
    })
    .bind(&server_addr)?
    .run()
    .await
}
