use crate::error::{DatabaseError, DatabaseErrorExt};
use fxhash::FxHashMap;
use sha2::{Digest, Sha256};
use surrealdb::Surreal;
use surrealdb::engine::any::Any;
use surrealdb::types::SurrealValue;

/// Schema scripts in application order. Applied scripts must never be edited.
const MIGRATIONS: &[(&str, &str)] = &[
    ("0001_registrants", include_str!("../migrations/0001_registrants.surql")),
    ("0002_reservation_functions", include_str!("../migrations/0002_reservation_functions.surql")),
];

#[derive(Debug)]
pub(crate) struct Migration {
    pub(crate) name: &'static str,
    pub(crate) script: &'static str,
    pub(crate) checksum: String,
}

impl Migration {
    fn new(name: &'static str, script: &'static str) -> Self {
        Self { name, script, checksum: hex::encode(Sha256::digest(script.as_bytes())) }
    }
}

#[derive(Debug, SurrealValue)]
pub(crate) struct AppliedMigration {
    pub(crate) name: String,
    pub(crate) checksum: String,
}

#[derive(Debug, Default)]
pub(crate) struct MigrationReport {
    pub(crate) applied: Vec<&'static str>,
    pub(crate) skipped: Vec<&'static str>,
}

#[derive(Debug)]
pub(crate) struct MigrationRunner<'a> {
    db: &'a Surreal<Any>,
}

impl<'a> MigrationRunner<'a> {
    pub(crate) const fn new(db: &'a Surreal<Any>) -> Self {
        Self { db }
    }

    pub(crate) async fn run(&self) -> Result<MigrationReport, DatabaseError> {
        self.db
            .query("DEFINE TABLE IF NOT EXISTS migration SCHEMALESS;")
            .await
            .context("Preparing migration table")?;

        let applied = self.applied().await?;
        let mut report = MigrationReport::default();

        for migration in MIGRATIONS.iter().map(|&(name, script)| Migration::new(name, script)) {
            if let Some(checksum) = applied.get(migration.name) {
                ensure_checksum_match(&migration, checksum)?;
                report.skipped.push(migration.name);
                continue;
            }

            self.apply(&migration).await?;
            report.applied.push(migration.name);
        }

        Ok(report)
    }

    async fn apply(&self, migration: &Migration) -> Result<(), DatabaseError> {
        let query = format!(
            "BEGIN TRANSACTION;
            {}
            CREATE migration CONTENT {{ name: $name, checksum: $checksum, applied_at: time::now() }};
            COMMIT TRANSACTION;",
            migration.script,
        );

        self.db
            .query(&query)
            .bind(("name", migration.name))
            .bind(("checksum", migration.checksum.clone()))
            .await
            .context(format!("Submitting migration {}", migration.name))?
            .check()
            .map_err(surrealdb::Error::from)
            .context(format!("Executing migration {}", migration.name))?;

        Ok(())
    }

    async fn applied(&self) -> Result<FxHashMap<String, String>, DatabaseError> {
        let entries = self
            .db
            .query("SELECT name, checksum FROM migration")
            .await
            .context("Loading applied migrations")?
            .take::<Vec<AppliedMigration>>(0)
            .context("Parsing applied migrations")?;

        Ok(entries.into_iter().map(|entry| (entry.name, entry.checksum)).collect())
    }
}

fn ensure_checksum_match(migration: &Migration, recorded: &str) -> Result<(), DatabaseError> {
    if recorded != migration.checksum {
        return Err(DatabaseError::Migration {
            message: format!(
                "Checksum mismatch for {} (recorded {recorded}, embedded {})",
                migration.name, migration.checksum
            )
            .into(),
            context: Some("Migration already applied with different contents".into()),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_ordered_and_unique() {
        let names: Vec<_> = MIGRATIONS.iter().map(|(name, _)| *name).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(names, sorted);
    }

    #[test]
    fn checksum_is_stable_sha256_hex() {
        let migration = Migration::new("demo", "DEFINE TABLE demo;");
        assert_eq!(migration.checksum.len(), 64);
        assert_eq!(migration.checksum, Migration::new("other", "DEFINE TABLE demo;").checksum);
    }

    #[test]
    fn altered_migration_is_rejected() {
        let migration = Migration::new("demo", "DEFINE TABLE demo;");
        let err = ensure_checksum_match(&migration, "deadbeef").unwrap_err();
        assert!(matches!(err, DatabaseError::Migration { .. }));
        assert!(ensure_checksum_match(&migration, &migration.checksum.clone()).is_ok());
    }
}
