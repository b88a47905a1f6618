//! # Registrant Store
//!
//! The storage contract admission control is built on. A store exposes exactly two
//! primitives:
//!
//! * [`RegistrantStore::conditional_reserve`]: in one indivisible step, check the committed
//!   count against the capacity, check the identifier is not taken, and insert the record
//!   only if both hold. Every call is linearizable with respect to every other call.
//! * [`RegistrantStore::count`]: the number of committed registrants at some instant.
//!
//! Splitting the reserve into separate count, lookup and insert calls is exactly the race
//! this contract exists to forbid.
//!
//! ```rust
//! use roster_domain::{Identifier, Registrant};
//! use roster_store::{MemoryRegistrantStore, RegistrantStore, Reservation};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), roster_store::StoreError> {
//! let store = MemoryRegistrantStore::new();
//! let record = Registrant {
//!     identifier: "ada@example.org".to_owned(),
//!     full_name: "Ada".to_owned(),
//!     phone_number: "1".to_owned(),
//!     year_of_study: "2".to_owned(),
//!     department: "Maths".to_owned(),
//!     previous_experience: None,
//!     writing_samples: None,
//!     motivation: "-".to_owned(),
//!     ideas: "-".to_owned(),
//! };
//! let identifier = Identifier::normalize(&record.identifier);
//!
//! let outcome = store.conditional_reserve(&identifier, &record, 1).await?;
//! assert_eq!(outcome, Reservation::Reserved { admitted: 1 });
//! assert_eq!(store.conditional_reserve(&identifier, &record, 1).await?, Reservation::DuplicateIdentifier);
//! # Ok(())
//! # }
//! ```

mod error;
mod memory;

pub use error::{StoreError, StoreErrorExt};
pub use memory::MemoryRegistrantStore;

use async_trait::async_trait;
use roster_domain::{Identifier, Registrant};
use std::fmt::Debug;
use std::sync::Arc;

/// Outcome of a conditional reserve that reached a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reservation {
    /// The record was committed; `admitted` is the committed count including it.
    Reserved { admitted: u64 },
    /// The committed count already equals the capacity. Nothing was written.
    CapacityReached,
    /// A record with the same normalized identifier is committed. Nothing was written.
    ///
    /// Reported in preference to [`Reservation::CapacityReached`] when both apply.
    DuplicateIdentifier,
}

/// Durable keyed collection of admitted registrants.
#[async_trait]
pub trait RegistrantStore: Debug + Send + Sync {
    /// Atomically admits `record` under `identifier` if the store holds fewer than
    /// `capacity` records and none with that identifier.
    ///
    /// # Errors
    /// Returns [`StoreError`] when the decision could not be made; in that case nothing
    /// was committed and the call may be retried.
    async fn conditional_reserve(
        &self,
        identifier: &Identifier,
        record: &Registrant,
        capacity: u32,
    ) -> Result<Reservation, StoreError>;

    /// Number of committed registrants.
    ///
    /// # Errors
    /// Returns [`StoreError`] when the engine cannot be queried.
    async fn count(&self) -> Result<u64, StoreError>;

    /// Short backend name for logs and diagnostics.
    fn backend(&self) -> &'static str;
}

/// Shared handle type passed around by the application.
pub type SharedStore = Arc<dyn RegistrantStore>;
