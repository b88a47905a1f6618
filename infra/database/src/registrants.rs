use crate::Database;
use async_trait::async_trait;
use roster_domain::{Identifier, Registrant};
use roster_store::{RegistrantStore, Reservation, StoreError};
use std::time::Duration;
use surrealdb::types::SurrealValue;
use tracing::{debug, instrument, warn};

const DEFAULT_MAX_ATTEMPTS: u32 = 5;
const INITIAL_BACKOFF: Duration = Duration::from_millis(5);

const RESERVE_QUERY: &str = "RETURN fn::reserve_registrant($identifier, $record, $capacity);";
const COUNT_QUERY: &str = "RETURN fn::registrant_count();";

#[derive(Debug, Clone, SurrealValue)]
struct RegistrantRow {
    identifier: String,
    full_name: String,
    phone_number: String,
    year_of_study: String,
    department: String,
    previous_experience: Option<String>,
    writing_samples: Option<String>,
    motivation: String,
    ideas: String,
}

impl RegistrantRow {
    fn new(identifier: &Identifier, record: &Registrant) -> Self {
        Self {
            identifier: identifier.to_string(),
            full_name: record.full_name.clone(),
            phone_number: record.phone_number.clone(),
            year_of_study: record.year_of_study.clone(),
            department: record.department.clone(),
            previous_experience: record.previous_experience.clone(),
            writing_samples: record.writing_samples.clone(),
            motivation: record.motivation.clone(),
            ideas: record.ideas.clone(),
        }
    }
}

#[derive(Debug, SurrealValue)]
struct ReserveOutcome {
    outcome: String,
    admitted: i64,
}

/// Registrant store backed by `SurrealDB`.
///
/// A reservation is one call to `fn::reserve_registrant`, executed as a single transaction.
/// Every admission rewrites the `admission:ledger` record, so overlapping reservations
/// conflict at commit instead of both passing the capacity check. Conflicts are retried
/// here with a short backoff; the unique index on `identifier` backs up the duplicate check.
#[derive(Debug, Clone)]
pub struct SurrealRegistrantStore {
    db: Database,
    max_attempts: u32,
}

impl SurrealRegistrantStore {
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db, max_attempts: DEFAULT_MAX_ATTEMPTS }
    }

    /// Number of times a conflicting reservation is attempted before giving up.
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = if max_attempts == 0 { 1 } else { max_attempts };
        self
    }

    async fn reserve_once(
        &self,
        identifier: &Identifier,
        row: &RegistrantRow,
        capacity: u32,
    ) -> Result<Reservation, Fault> {
        let mut response = self
            .db
            .query(RESERVE_QUERY)
            .bind(("identifier", identifier.to_string()))
            .bind(("record", row.clone()))
            .bind(("capacity", i64::from(capacity)))
            .await
            .map_err(Fault::classify)?;

        let outcome =
            response.take::<Option<ReserveOutcome>>(0).map_err(Fault::classify)?.ok_or_else(
                || Fault::Fatal(StoreError::Backend {
                    message: "Reservation returned no outcome".into(),
                    context: Some("fn::reserve_registrant".into()),
                }),
            )?;

        match outcome.outcome.as_str() {
            "reserved" => Ok(Reservation::Reserved { admitted: outcome.admitted.unsigned_abs() }),
            "capacity" => Ok(Reservation::CapacityReached),
            "duplicate" => Ok(Reservation::DuplicateIdentifier),
            other => Err(Fault::Fatal(StoreError::Backend {
                message: format!("Unknown reservation outcome '{other}'").into(),
                context: Some("fn::reserve_registrant".into()),
            })),
        }
    }
}

#[async_trait]
impl RegistrantStore for SurrealRegistrantStore {
    #[instrument(skip(self, record), fields(backend = "surrealdb", identifier = %identifier))]
    async fn conditional_reserve(
        &self,
        identifier: &Identifier,
        record: &Registrant,
        capacity: u32,
    ) -> Result<Reservation, StoreError> {
        let row = RegistrantRow::new(identifier, record);
        let mut backoff = INITIAL_BACKOFF;

        for attempt in 1..=self.max_attempts {
            match self.reserve_once(identifier, &row, capacity).await {
                Ok(outcome) => {
                    debug!(?outcome, attempt, capacity, "Conditional reserve decided");
                    return Ok(outcome);
                }
                Err(Fault::Duplicate) => {
                    debug!(attempt, "Unique index rejected a concurrent duplicate");
                    return Ok(Reservation::DuplicateIdentifier);
                }
                Err(Fault::Conflict(message)) if attempt < self.max_attempts => {
                    warn!(attempt, ?backoff, %message, "Reservation conflicted, retrying");
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                }
                Err(Fault::Conflict(message)) => {
                    return Err(StoreError::Conflict {
                        message: message.into(),
                        context: Some(format!("Gave up after {attempt} attempts").into()),
                    });
                }
                Err(Fault::Fatal(err)) => return Err(err),
            }
        }

        Err(StoreError::Internal {
            message: "Reservation loop exited without a decision".into(),
            context: None,
        })
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let mut response = self.db.query(COUNT_QUERY).await.map_err(into_store_error)?;
        let count = response.take::<Option<i64>>(0).map_err(into_store_error)?.unwrap_or_default();
        Ok(count.unsigned_abs())
    }

    fn backend(&self) -> &'static str {
        "surrealdb"
    }
}

#[derive(Debug)]
enum Fault {
    Conflict(String),
    Duplicate,
    Fatal(StoreError),
}

impl Fault {
    fn classify(err: surrealdb::Error) -> Self {
        let message = err.to_string();
        let lowered = message.to_lowercase();
        if lowered.contains("conflict") || lowered.contains("can be retried") {
            Self::Conflict(message)
        } else if lowered.contains("registrant_identifier") && lowered.contains("already contains")
        {
            Self::Duplicate
        } else {
            Self::Fatal(into_store_error(err))
        }
    }
}

fn into_store_error(err: surrealdb::Error) -> StoreError {
    let message = err.to_string();
    let lowered = message.to_lowercase();
    if lowered.contains("connection") || lowered.contains("not connected") {
        StoreError::Unavailable { message: message.into(), context: Some("SurrealDB".into()) }
    } else {
        StoreError::Backend { message: message.into(), context: Some("SurrealDB".into()) }
    }
}
