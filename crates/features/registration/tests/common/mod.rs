#![allow(dead_code)]

use async_trait::async_trait;
use roster_domain::{Identifier, Registrant};
use roster_store::{MemoryRegistrantStore, RegistrantStore, Reservation, StoreError};
use std::sync::atomic::{AtomicU32, Ordering};

pub fn registrant(identifier: &str) -> Registrant {
    Registrant {
        identifier: identifier.to_owned(),
        full_name: "Mary Jackson".to_owned(),
        phone_number: "555-0123".to_owned(),
        year_of_study: "3".to_owned(),
        department: "Engineering".to_owned(),
        previous_experience: Some("Wind tunnels".to_owned()),
        writing_samples: None,
        motivation: "Supersonic flow".to_owned(),
        ideas: "Open the course to everyone".to_owned(),
    }
}

/// Wraps a memory store and fails the next `failures` calls before touching it.
#[derive(Debug, Default)]
pub struct FlakyStore {
    pub inner: MemoryRegistrantStore,
    failures: AtomicU32,
}

impl FlakyStore {
    pub fn failing(failures: u32) -> Self {
        Self { inner: MemoryRegistrantStore::new(), failures: AtomicU32::new(failures) }
    }

    fn trip(&self) -> Result<(), StoreError> {
        let tripped = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if tripped {
            return Err(StoreError::Unavailable {
                message: "connection reset".into(),
                context: Some("flaky test store".into()),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl RegistrantStore for FlakyStore {
    async fn conditional_reserve(
        &self,
        identifier: &Identifier,
        record: &Registrant,
        capacity: u32,
    ) -> Result<Reservation, StoreError> {
        self.trip()?;
        self.inner.conditional_reserve(identifier, record, capacity).await
    }

    async fn count(&self) -> Result<u64, StoreError> {
        self.trip()?;
        self.inner.count().await
    }

    fn backend(&self) -> &'static str {
        "flaky"
    }
}
