// src/services/context.rs
// DOCUMENTATION: Shared application state
// PURPOSE: Bundle the repository, storage and payment seams handed to handlers

use crate::config::Config;
use crate::db::GalleryStore;
use crate::services::{BatchRunner, FailurePolicy, ObjectStorage, PaymentProvider};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;

/// Everything a request handler needs besides the config
#[derive(Clone)]
pub struct AppContext {
    pub store: Arc<dyn GalleryStore>,
    pub storage: Arc<dyn ObjectStorage>,
    pub payments: Arc<dyn PaymentProvider>,
    /// Process wide limit on checkout session creation
    pub checkout_limiter: Arc<DefaultDirectRateLimiter>,
}

impl AppContext {
    pub fn new(
        store: Arc<dyn GalleryStore>,
        storage: Arc<dyn ObjectStorage>,
        payments: Arc<dyn PaymentProvider>,
        checkout_per_minute: u32,
    ) -> Self {
        let per_minute = NonZeroU32::new(checkout_per_minute).unwrap_or(NonZeroU32::MIN);
        let checkout_limiter = Arc::new(RateLimiter::direct(Quota::per_minute(per_minute)));

        Self {
            store,
            storage,
            payments,
            checkout_limiter,
        }
    }

    /// Fresh runner sized from config, each request gets its own token
    pub fn batch_runner(&self, config: &Config, policy: FailurePolicy) -> BatchRunner {
        BatchRunner::new(config.batch_concurrency, policy)
    }
}
