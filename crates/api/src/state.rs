//! Application state shared across handlers.

use std::sync::Arc;

use crate::ai::Advisor;
use crate::payments::PaymentGateway;
use crate::storage::Storage;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Storage, the advisor, and the payment
/// gateway are trait objects so the binary can swap backends (Postgres vs.
/// in-memory, real providers vs. test stubs) without touching handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    storage: Arc<dyn Storage>,
    advisor: Arc<dyn Advisor>,
    payments: Arc<dyn PaymentGateway>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(
        storage: Arc<dyn Storage>,
        advisor: Arc<dyn Advisor>,
        payments: Arc<dyn PaymentGateway>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                storage,
                advisor,
                payments,
            }),
        }
    }

    /// Get a reference to the storage backend.
    #[must_use]
    pub fn storage(&self) -> &dyn Storage {
        self.inner.storage.as_ref()
    }

    /// Get a reference to the language-model advisor.
    #[must_use]
    pub fn advisor(&self) -> &dyn Advisor {
        self.inner.advisor.as_ref()
    }

    /// Get a reference to the payment gateway.
    #[must_use]
    pub fn payments(&self) -> &dyn PaymentGateway {
        self.inner.payments.as_ref()
    }
}
