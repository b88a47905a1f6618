use crate::{RegistrantStore, Reservation, StoreError};
use async_trait::async_trait;
use fxhash::FxHashSet;
use parking_lot::Mutex;
use roster_domain::{Identifier, Registrant};
use std::sync::Arc;
use tracing::{debug, instrument};

#[derive(Debug, Default)]
struct Ledger {
    identifiers: FxHashSet<Identifier>,
    records: Vec<Registrant>,
}

/// Registrant store kept in process memory.
///
/// One mutex guards the identifier set and the records together, so the capacity check,
/// the uniqueness check and the insert happen under a single critical section. The lock
/// is never held across an `.await`.
#[derive(Debug, Default, Clone)]
pub struct MemoryRegistrantStore {
    ledger: Arc<Mutex<Ledger>>,
}

impl MemoryRegistrantStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the committed records in admission order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Registrant> {
        self.ledger.lock().records.clone()
    }

    fn reserve(&self, identifier: &Identifier, record: &Registrant, capacity: u32) -> Reservation {
        let mut ledger = self.ledger.lock();

        if ledger.identifiers.contains(identifier) {
            return Reservation::DuplicateIdentifier;
        }
        if ledger.records.len() >= capacity as usize {
            return Reservation::CapacityReached;
        }

        ledger.identifiers.insert(identifier.clone());
        ledger.records.push(record.clone());
        Reservation::Reserved { admitted: ledger.records.len() as u64 }
    }
}

#[async_trait]
impl RegistrantStore for MemoryRegistrantStore {
    #[instrument(skip(self, record), fields(backend = "memory", identifier = %identifier))]
    async fn conditional_reserve(
        &self,
        identifier: &Identifier,
        record: &Registrant,
        capacity: u32,
    ) -> Result<Reservation, StoreError> {
        let outcome = self.reserve(identifier, record, capacity);
        debug!(?outcome, capacity, "Conditional reserve decided");
        Ok(outcome)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.ledger.lock().records.len() as u64)
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registrant(identifier: &str) -> (Identifier, Registrant) {
        let record = Registrant {
            identifier: identifier.to_owned(),
            full_name: "Grace Hopper".to_owned(),
            phone_number: "555-0100".to_owned(),
            year_of_study: "3".to_owned(),
            department: "Computer Science".to_owned(),
            previous_experience: Some("Compilers".to_owned()),
            writing_samples: None,
            motivation: "Debugging".to_owned(),
            ideas: "Nanoseconds".to_owned(),
        };
        (Identifier::normalize(identifier), record)
    }

    #[test]
    fn duplicate_wins_over_capacity() {
        let store = MemoryRegistrantStore::new();
        let (id, record) = registrant("grace@navy.mil");
        assert_eq!(store.reserve(&id, &record, 1), Reservation::Reserved { admitted: 1 });
        assert_eq!(store.reserve(&id, &record, 1), Reservation::DuplicateIdentifier);

        let (other, record) = registrant("ada@example.org");
        assert_eq!(store.reserve(&other, &record, 1), Reservation::CapacityReached);
    }

    #[test]
    fn zero_capacity_admits_nobody() {
        let store = MemoryRegistrantStore::new();
        let (id, record) = registrant("grace@navy.mil");
        assert_eq!(store.reserve(&id, &record, 0), Reservation::CapacityReached);
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn rejected_reservations_leave_no_trace() {
        let store = MemoryRegistrantStore::new();
        let (id, record) = registrant("grace@navy.mil");
        store.reserve(&id, &record, 1);
        let (other, other_record) = registrant("ada@example.org");
        store.reserve(&other, &other_record, 1);

        let ledger = store.ledger.lock();
        assert_eq!(ledger.records.len(), 1);
        assert_eq!(ledger.identifiers.len(), 1);
        assert!(!ledger.identifiers.contains(&other));
    }
}
