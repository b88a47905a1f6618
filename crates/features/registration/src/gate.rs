use crate::error::RegistrationError;
use moka::future::Cache;
use roster_domain::{Identifier, Registrant};
use roster_store::{Reservation, SharedStore};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// A successful admission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admitted {
    pub identifier: Identifier,
    /// Committed count right after this admission.
    pub admitted: u64,
    pub capacity: u32,
}

impl Admitted {
    #[must_use]
    pub fn remaining(&self) -> u64 {
        u64::from(self.capacity).saturating_sub(self.admitted)
    }
}

#[derive(Debug)]
struct AdmissionGateInner {
    store: SharedStore,
    capacity: u32,
    count_cache: Option<Cache<(), u64>>,
}

/// Admits registrants up to a fixed capacity, each identifier at most once.
///
/// All decisions are delegated to a single conditional reserve on the store, so the gate
/// holds no lock of its own and is safe to call from any number of tasks. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct AdmissionGate {
    inner: Arc<AdmissionGateInner>,
}

impl AdmissionGate {
    pub fn new(store: SharedStore, capacity: u32) -> Self {
        Self::with_count_cache(store, capacity, Duration::ZERO)
    }

    /// Like [`AdmissionGate::new`], serving [`AdmissionGate::current_count`] from a cache
    /// for up to `ttl`. A zero `ttl` disables the cache.
    pub fn with_count_cache(store: SharedStore, capacity: u32, ttl: Duration) -> Self {
        let count_cache =
            (!ttl.is_zero()).then(|| Cache::builder().max_capacity(1).time_to_live(ttl).build());

        info!(capacity, backend = store.backend(), ?ttl, "Admission gate ready");
        Self { inner: Arc::new(AdmissionGateInner { store, capacity, count_cache }) }
    }

    #[must_use]
    pub fn capacity(&self) -> u32 {
        self.inner.capacity
    }

    /// Attempts to admit `record`.
    ///
    /// The identifier is normalized first and the stored record carries the normalized form.
    ///
    /// # Errors
    /// * [`RegistrationError::DuplicateIdentifier`] if the identifier is already admitted,
    ///   even when capacity is also exhausted.
    /// * [`RegistrationError::CapacityReached`] if every spot is taken.
    /// * [`RegistrationError::StoreFailure`] if the store could not decide. Nothing was
    ///   committed and the same record may be submitted again.
    #[instrument(skip_all, fields(capacity = self.inner.capacity))]
    pub async fn try_register(&self, mut record: Registrant) -> Result<Admitted, RegistrationError> {
        let identifier = record.normalize_identifier();
        let capacity = self.inner.capacity;

        let outcome =
            match self.inner.store.conditional_reserve(&identifier, &record, capacity).await {
                Ok(outcome) => outcome,
                Err(source) => {
                    warn!(%identifier, error = %source, "Registration failed in the store");
                    return Err(RegistrationError::StoreFailure {
                        source,
                        context: Some(format!("Admitting {identifier}").into()),
                    });
                }
            };

        match outcome {
            Reservation::Reserved { admitted } => {
                self.invalidate_count().await;
                info!(%identifier, admitted, capacity, "Registrant admitted");
                Ok(Admitted { identifier, admitted, capacity })
            }
            Reservation::DuplicateIdentifier => {
                info!(%identifier, "Registration rejected: identifier already registered");
                Err(RegistrationError::DuplicateIdentifier { identifier, context: None })
            }
            Reservation::CapacityReached => {
                info!(%identifier, capacity, "Registration rejected: capacity reached");
                Err(RegistrationError::CapacityReached { capacity, context: None })
            }
        }
    }

    /// Number of admitted registrants, for display only. May lag behind by the cache TTL.
    ///
    /// A count read before an admission can land in the cache after that admission cleared it,
    /// so invalidation is best effort and staleness is bounded only by the TTL.
    ///
    /// # Errors
    /// [`RegistrationError::StoreFailure`] if the store cannot be queried.
    pub async fn current_count(&self) -> Result<u64, RegistrationError> {
        if let Some(cache) = &self.inner.count_cache
            && let Some(count) = cache.get(&()).await
        {
            return Ok(count);
        }

        let count = self.inner.store.count().await.map_err(|source| {
            RegistrationError::StoreFailure { source, context: Some("Counting registrants".into()) }
        })?;

        if let Some(cache) = &self.inner.count_cache {
            cache.insert((), count).await;
        }
        Ok(count)
    }

    /// Advisory spots left, never below zero.
    ///
    /// # Errors
    /// See [`AdmissionGate::current_count`].
    pub async fn remaining(&self) -> Result<u64, RegistrationError> {
        let count = self.current_count().await?;
        Ok(u64::from(self.inner.capacity).saturating_sub(count))
    }

    async fn invalidate_count(&self) {
        if let Some(cache) = &self.inner.count_cache {
            cache.invalidate(&()).await;
        }
    }
}
