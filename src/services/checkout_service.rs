// src/services/checkout_service.rs
// DOCUMENTATION: Checkout and payment completion
// PURPOSE: Turn a gallery into a provider checkout session and flip the paid
// flag once the provider confirms the session

use crate::config::Config;
use crate::db::GalleryStore;
use crate::errors::GalleryError;
use crate::models::{CheckoutSessionRequest, CreateCheckoutRequest, Gallery};
use crate::services::pricing;
use crate::services::PaymentProvider;
use uuid::Uuid;

/// What the success path found out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionOutcome {
    /// Provider confirmed a paid session for this gallery
    pub verified: bool,
    /// This call flipped paid from false to true
    pub newly_paid: bool,
}

pub struct CheckoutService;

impl CheckoutService {
    /// Session request for a gallery at its current price
    pub fn build_session_request(gallery: &Gallery, config: &Config) -> CheckoutSessionRequest {
        let base = config.public_base_url.trim_end_matches('/');

        CheckoutSessionRequest {
            gallery_id: gallery.id,
            currency: config.checkout_currency.clone(),
            unit_amount_minor: pricing::to_minor_units(gallery.price()),
            product_name: format!("Gallery: {}", gallery.name),
            description: format!(
                "{} photos by {}",
                gallery.photo_count, gallery.photographer_name
            ),
            success_url: format!(
                "{}/success?gallery_id={}&session_id={{CHECKOUT_SESSION_ID}}",
                base, gallery.id
            ),
            cancel_url: format!("{}/galleries/{}", base, gallery.id),
        }
    }

    /// Create a checkout session for the gallery named in `req`
    /// DOCUMENTATION: The amount always comes from the stored gallery. A
    /// photoCount or price that disagrees with it is rejected.
    pub async fn create_checkout(
        store: &dyn GalleryStore,
        payments: &dyn PaymentProvider,
        config: &Config,
        req: &CreateCheckoutRequest,
    ) -> Result<String, GalleryError> {
        let gallery = store.get_gallery(req.gallery_id).await?;

        if gallery.paid {
            return Err(GalleryError::AlreadyPaid(gallery.id.to_string()));
        }

        // Nothing to deliver yet
        if gallery.photo_count == 0 {
            return Err(GalleryError::InvalidInput(format!(
                "gallery {} has no photos",
                gallery.id
            )));
        }

        if i64::from(req.photo_count) != gallery.photo_count {
            return Err(GalleryError::InvalidInput(format!(
                "photoCount {} does not match gallery ({} photos)",
                req.photo_count, gallery.photo_count
            )));
        }

        if req.price != gallery.price() {
            return Err(GalleryError::InvalidInput(format!(
                "price {} does not match gallery price {}",
                req.price,
                gallery.price()
            )));
        }

        if req.gallery_name != gallery.name {
            log::debug!(
                "Checkout for gallery {} sent name '{}', using '{}'",
                gallery.id,
                req.gallery_name,
                gallery.name
            );
        }

        let session = Self::build_session_request(&gallery, config);
        payments.create_session(&session).await
    }

    /// Success redirect handling
    /// DOCUMENTATION: Marks the gallery paid only when the provider reports the
    /// session as paid for this gallery. Any other case is display-only.
    pub async fn complete_checkout(
        store: &dyn GalleryStore,
        payments: &dyn PaymentProvider,
        gallery_id: Uuid,
        session_id: Option<&str>,
    ) -> Result<CompletionOutcome, GalleryError> {
        // 404 before talking to the provider
        store.get_gallery(gallery_id).await?;

        let unverified = CompletionOutcome {
            verified: false,
            newly_paid: false,
        };

        let session_id = match session_id.map(str::trim).filter(|s| !s.is_empty()) {
            Some(id) => id,
            None => {
                log::debug!("Success visit for gallery {} without session id", gallery_id);
                return Ok(unverified);
            }
        };

        let session = match payments.retrieve_session(session_id).await {
            Ok(session) => session,
            Err(e) => {
                log::warn!(
                    "Could not verify session {} for gallery {}: {}",
                    session_id,
                    gallery_id,
                    e
                );
                return Ok(unverified);
            }
        };

        if !session.proves_payment_for(gallery_id) {
            log::warn!(
                "Session {} does not prove payment for gallery {} (status {}, gallery {:?})",
                session.id,
                gallery_id,
                session.payment_status,
                session.gallery_id
            );
            return Ok(unverified);
        }

        let newly_paid = store.mark_paid(gallery_id).await?;
        if newly_paid {
            log::info!("Gallery {} marked paid (session {})", gallery_id, session.id);
        }

        Ok(CompletionOutcome {
            verified: true,
            newly_paid,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{seed_gallery, test_config, InMemoryGalleryStore, MemoryStorage, MockPaymentProvider};

    fn checkout_request(gallery: &Gallery) -> CreateCheckoutRequest {
        CreateCheckoutRequest {
            gallery_id: gallery.id,
            gallery_name: gallery.name.clone(),
            photographer_name: gallery.photographer_name.clone(),
            photo_count: gallery.photo_count as u32,
            price: gallery.price(),
        }
    }

    #[tokio::test]
    async fn test_session_request_uses_actual_count() {
        let store = InMemoryGalleryStore::new();
        let storage = MemoryStorage::new();
        let names: Vec<String> = (0..60).map(|i| format!("{}.jpg", i)).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let gallery = seed_gallery(&store, &storage, &refs, 60).await;

        let session = CheckoutService::build_session_request(&gallery, &test_config());

        assert_eq!(session.unit_amount_minor, 500);
        assert_eq!(session.currency, "eur");
        assert_eq!(session.product_name, "Gallery: Wedding");
        assert_eq!(session.description, "60 photos by Ana");
        assert_eq!(
            session.success_url,
            format!(
                "http://localhost:8003/success?gallery_id={}&session_id={{CHECKOUT_SESSION_ID}}",
                gallery.id
            )
        );
        assert_eq!(
            session.cancel_url,
            format!("http://localhost:8003/galleries/{}", gallery.id)
        );
    }

    #[tokio::test]
    async fn test_create_checkout() {
        let store = InMemoryGalleryStore::new();
        let storage = MemoryStorage::new();
        let payments = MockPaymentProvider::new();
        let gallery = seed_gallery(&store, &storage, &["a.jpg", "b.jpg"], 2).await;

        let session_id = CheckoutService::create_checkout(
            &store,
            &payments,
            &test_config(),
            &checkout_request(&gallery),
        )
        .await
        .unwrap();

        assert!(session_id.starts_with("cs_test_"));
        let sent = payments.requests().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].unit_amount_minor, 300);
        assert_eq!(sent[0].gallery_id, gallery.id);
    }

    #[tokio::test]
    async fn test_checkout_amount_for_every_tier() {
        for (count, minor) in [(50, 300), (51, 500), (150, 500), (151, 800)] {
            let store = InMemoryGalleryStore::new();
            let storage = MemoryStorage::new();
            let payments = MockPaymentProvider::new();
            let names: Vec<String> = (0..count).map(|i| format!("{}.jpg", i)).collect();
            let refs: Vec<&str> = names.iter().map(String::as_str).collect();
            let gallery = seed_gallery(&store, &storage, &refs, count).await;

            CheckoutService::create_checkout(
                &store,
                &payments,
                &test_config(),
                &checkout_request(&gallery),
            )
            .await
            .unwrap();

            let sent = payments.requests().await;
            assert_eq!(sent[0].unit_amount_minor, minor, "{} photos", count);
        }
    }

    #[tokio::test]
    async fn test_create_checkout_rejects_empty_gallery() {
        let store = InMemoryGalleryStore::new();
        let storage = MemoryStorage::new();
        let payments = MockPaymentProvider::new();
        let gallery = seed_gallery(&store, &storage, &[], 5).await;

        let result = CheckoutService::create_checkout(
            &store,
            &payments,
            &test_config(),
            &checkout_request(&gallery),
        )
        .await;
        assert!(matches!(result, Err(GalleryError::InvalidInput(_))));
        assert!(payments.requests().await.is_empty());
    }

    #[tokio::test]
    async fn test_create_checkout_rejects_tampered_price() {
        let store = InMemoryGalleryStore::new();
        let storage = MemoryStorage::new();
        let payments = MockPaymentProvider::new();
        let gallery = seed_gallery(&store, &storage, &["a.jpg"], 1).await;

        let mut req = checkout_request(&gallery);
        req.price = 1;
        let result = CheckoutService::create_checkout(&store, &payments, &test_config(), &req).await;
        assert!(matches!(result, Err(GalleryError::InvalidInput(_))));

        let mut req = checkout_request(&gallery);
        req.photo_count = 500;
        let result = CheckoutService::create_checkout(&store, &payments, &test_config(), &req).await;
        assert!(matches!(result, Err(GalleryError::InvalidInput(_))));

        assert!(payments.requests().await.is_empty());
    }

    #[tokio::test]
    async fn test_create_checkout_provider_failure() {
        let store = InMemoryGalleryStore::new();
        let storage = MemoryStorage::new();
        let payments = MockPaymentProvider::failing();
        let gallery = seed_gallery(&store, &storage, &["a.jpg"], 1).await;

        let result = CheckoutService::create_checkout(
            &store,
            &payments,
            &test_config(),
            &checkout_request(&gallery),
        )
        .await;
        assert!(matches!(result, Err(GalleryError::PaymentError(_))));
    }

    #[tokio::test]
    async fn test_create_checkout_for_paid_gallery() {
        let store = InMemoryGalleryStore::new();
        let storage = MemoryStorage::new();
        let payments = MockPaymentProvider::new();
        let gallery = seed_gallery(&store, &storage, &["a.jpg"], 1).await;
        store.mark_paid(gallery.id).await.unwrap();

        let result = CheckoutService::create_checkout(
            &store,
            &payments,
            &test_config(),
            &checkout_request(&gallery),
        )
        .await;
        assert!(matches!(result, Err(GalleryError::AlreadyPaid(_))));
    }

    #[tokio::test]
    async fn test_verified_session_marks_paid_once() {
        let store = InMemoryGalleryStore::new();
        let storage = MemoryStorage::new();
        let payments = MockPaymentProvider::new();
        let gallery = seed_gallery(&store, &storage, &["a.jpg"], 1).await;

        let session_id = CheckoutService::create_checkout(
            &store,
            &payments,
            &test_config(),
            &checkout_request(&gallery),
        )
        .await
        .unwrap();
        payments.complete_payment(&session_id).await;

        let first = CheckoutService::complete_checkout(&store, &payments, gallery.id, Some(&session_id))
            .await
            .unwrap();
        let second = CheckoutService::complete_checkout(&store, &payments, gallery.id, Some(&session_id))
            .await
            .unwrap();

        assert_eq!(first, CompletionOutcome { verified: true, newly_paid: true });
        assert_eq!(second, CompletionOutcome { verified: true, newly_paid: false });
        assert!(store.get_gallery(gallery.id).await.unwrap().paid);
    }

    #[tokio::test]
    async fn test_unpaid_session_does_not_mark_paid() {
        let store = InMemoryGalleryStore::new();
        let storage = MemoryStorage::new();
        let payments = MockPaymentProvider::new();
        let gallery = seed_gallery(&store, &storage, &["a.jpg"], 1).await;

        let session_id = CheckoutService::create_checkout(
            &store,
            &payments,
            &test_config(),
            &checkout_request(&gallery),
        )
        .await
        .unwrap();

        let outcome = CheckoutService::complete_checkout(&store, &payments, gallery.id, Some(&session_id))
            .await
            .unwrap();

        assert!(!outcome.verified);
        assert!(!store.get_gallery(gallery.id).await.unwrap().paid);
    }

    #[tokio::test]
    async fn test_session_for_other_gallery_is_rejected() {
        let store = InMemoryGalleryStore::new();
        let storage = MemoryStorage::new();
        let payments = MockPaymentProvider::new();
        let paid_for = seed_gallery(&store, &storage, &["a.jpg"], 1).await;
        let other = seed_gallery(&store, &storage, &["b.jpg"], 1).await;

        let session_id = CheckoutService::create_checkout(
            &store,
            &payments,
            &test_config(),
            &checkout_request(&paid_for),
        )
        .await
        .unwrap();
        payments.complete_payment(&session_id).await;

        let outcome = CheckoutService::complete_checkout(&store, &payments, other.id, Some(&session_id))
            .await
            .unwrap();

        assert!(!outcome.verified);
        assert!(!store.get_gallery(other.id).await.unwrap().paid);
    }

    #[tokio::test]
    async fn test_missing_session_is_display_only() {
        let store = InMemoryGalleryStore::new();
        let storage = MemoryStorage::new();
        let payments = MockPaymentProvider::new();
        let gallery = seed_gallery(&store, &storage, &["a.jpg"], 1).await;

        let outcome = CheckoutService::complete_checkout(&store, &payments, gallery.id, None)
            .await
            .unwrap();
        assert!(!outcome.verified);

        let unknown = CheckoutService::complete_checkout(&store, &payments, gallery.id, Some("cs_unknown"))
            .await
            .unwrap();
        assert!(!unknown.verified);
    }

    #[tokio::test]
    async fn test_complete_unknown_gallery() {
        let store = InMemoryGalleryStore::new();
        let payments = MockPaymentProvider::new();

        let result = CheckoutService::complete_checkout(&store, &payments, Uuid::new_v4(), None).await;
        assert!(matches!(result, Err(GalleryError::NotFound(_))));
    }
}
