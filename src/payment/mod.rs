mod provider;
mod types;

pub use provider::{PaymentProvider, StripeClient};
pub use types::{CheckoutRequest, CheckoutSession, LineItem, PaymentStatus};

use crate::{config::RedirectUrls, error::ApiError};
use std::sync::Arc;
use tracing::info;

/// Checkout creation and payment verification against a provider.
pub struct PaymentService {
    provider: Arc<dyn PaymentProvider>,
    redirects: RedirectUrls,
}

impl PaymentService {
    pub fn new(provider: Arc<dyn PaymentProvider>, redirects: RedirectUrls) -> Self {
        info!(
            "Payment service initialized with {} (success: {}, cancel: {})",
            provider.name(),
            redirects.success_url,
            redirects.cancel_url
        );
        Self {
            provider,
            redirects,
        }
    }

    pub fn checkout_request(&self) -> CheckoutRequest {
        CheckoutRequest {
            line_item: LineItem::download_access(),
            success_url: self.redirects.success_url.clone(),
            cancel_url: self.redirects.cancel_url.clone(),
        }
    }

    pub async fn create_checkout_session(&self) -> Result<CheckoutSession, ApiError> {
        let session = self
            .provider
            .create_session(&self.checkout_request())
            .await
            .map_err(ApiError::PaymentProvider)?;

        info!("Created checkout session {}", session.id);
        Ok(session)
    }

    pub async fn verify_payment(&self, session_id: &str) -> Result<PaymentStatus, ApiError> {
        if session_id.is_empty() {
            return Err(ApiError::invalid_input("Missing session ID"));
        }

        let session = self
            .provider
            .retrieve_session(session_id)
            .await
            .map_err(ApiError::PaymentProvider)?;

        if session.is_paid() {
            info!("Payment confirmed for session {}", session.id);
            Ok(PaymentStatus::confirmed())
        } else {
            info!(
                "Payment not confirmed for session {} (status: {:?})",
                session.id, session.payment_status
            );
            Ok(PaymentStatus::not_confirmed())
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::types::SessionRecord;
    use super::*;
    use async_trait::async_trait;
    use std::{
        collections::HashMap,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Mutex,
        },
    };

    /// In-memory provider: sessions are created with an incrementing id and
    /// retrieved from a fixed status table.
    #[derive(Default)]
    pub struct MockProvider {
        pub statuses: HashMap<String, String>,
        pub fail_create: bool,
        pub created: Mutex<Vec<CheckoutRequest>>,
        pub retrievals: AtomicUsize,
    }

    impl MockProvider {
        pub fn with_session(mut self, id: &str, status: &str) -> Self {
            self.statuses.insert(id.to_string(), status.to_string());
            self
        }

        pub fn retrieval_count(&self) -> usize {
            self.retrievals.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PaymentProvider for MockProvider {
        fn name(&self) -> &'static str {
            "mock"
        }

        async fn create_session(&self, request: &CheckoutRequest) -> anyhow::Result<CheckoutSession> {
            if self.fail_create {
                return Err(anyhow::anyhow!("Invalid API Key provided"));
            }
            let mut created = self.created.lock().unwrap();
            created.push(request.clone());
            Ok(CheckoutSession {
                id: format!("cs_test_{}", created.len()),
            })
        }

        async fn retrieve_session(&self, session_id: &str) -> anyhow::Result<SessionRecord> {
            self.retrievals.fetch_add(1, Ordering::SeqCst);
            self.statuses
                .get(session_id)
                .map(|status| SessionRecord {
                    id: session_id.to_string(),
                    payment_status: Some(status.clone()),
                })
                .ok_or_else(|| {
                    anyhow::anyhow!("No such checkout.session: '{}'", session_id)
                })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::MockProvider;
    use super::*;

    fn redirects() -> RedirectUrls {
        RedirectUrls {
            success_url: "http://localhost:3000/success?session_id={CHECKOUT_SESSION_ID}".into(),
            cancel_url: "http://localhost:3000/cancel".into(),
        }
    }

    fn service(provider: &Arc<MockProvider>) -> PaymentService {
        PaymentService::new(provider.clone(), redirects())
    }

    #[tokio::test]
    async fn test_create_checkout_session() {
        let provider = Arc::new(MockProvider::default());
        let session = service(&provider).create_checkout_session().await.unwrap();
        assert_eq!(session.id, "cs_test_1");

        let created = provider.created.lock().unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].line_item, LineItem::download_access());
        assert_eq!(created[0].line_item.quantity, 1);
        assert_eq!(created[0].line_item.unit_amount, 100);
        assert_eq!(created[0].line_item.currency, "usd");
        assert!(created[0].success_url.ends_with("?session_id={CHECKOUT_SESSION_ID}"));
        assert_eq!(created[0].cancel_url, "http://localhost:3000/cancel");
    }

    #[tokio::test]
    async fn test_create_checkout_session_failure() {
        let provider = Arc::new(MockProvider {
            fail_create: true,
            ..Default::default()
        });
        let result = service(&provider).create_checkout_session().await;
        match result {
            Err(ApiError::PaymentProvider(e)) => {
                assert_eq!(e.to_string(), "Invalid API Key provided")
            }
            other => panic!("expected PaymentProvider error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_verify_paid() {
        let provider = Arc::new(MockProvider::default().with_session("cs_paid", "paid"));
        let status = service(&provider).verify_payment("cs_paid").await.unwrap();
        assert_eq!(status, PaymentStatus::confirmed());
    }

    #[tokio::test]
    async fn test_verify_unpaid() {
        let provider = Arc::new(MockProvider::default().with_session("cs_open", "unpaid"));
        let status = service(&provider).verify_payment("cs_open").await.unwrap();
        assert!(!status.success);
        assert_eq!(status.message.as_deref(), Some("Payment not confirmed"));
    }

    #[tokio::test]
    async fn test_verify_unknown_session_is_provider_error() {
        let provider = Arc::new(MockProvider::default());
        let result = service(&provider).verify_payment("cs_missing").await;
        assert!(matches!(result, Err(ApiError::PaymentProvider(_))));
        assert_eq!(provider.retrieval_count(), 1);
    }

    #[tokio::test]
    async fn test_verify_empty_session_id_skips_provider() {
        let provider = Arc::new(MockProvider::default());
        let result = service(&provider).verify_payment("").await;
        assert!(matches!(result, Err(ApiError::InvalidInput(_))));
        assert_eq!(provider.retrieval_count(), 0);
    }
}
