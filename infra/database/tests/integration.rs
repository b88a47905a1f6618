use roster_database::*;
use roster_domain::{Identifier, Registrant};
use roster_store::{RegistrantStore, Reservation};
use std::sync::Arc;

async fn memory_db(database: &str) -> Database {
    Database::builder()
        .url("mem://")
        .session("roster_test", database)
        .init()
        .await
        .expect("connect to mem://")
}

fn registrant(identifier: &str) -> Registrant {
    Registrant {
        identifier: identifier.to_owned(),
        full_name: "Katherine Johnson".to_owned(),
        phone_number: "555-0199".to_owned(),
        year_of_study: "4".to_owned(),
        department: "Mathematics".to_owned(),
        previous_experience: None,
        writing_samples: Some("Trajectories".to_owned()),
        motivation: "Orbits".to_owned(),
        ideas: "Re-entry".to_owned(),
    }
}

#[tokio::test]
async fn connect_in_memory_and_health_check() {
    let db = memory_db("health").await;

    db.health().await.expect("health check");
    assert_eq!(db.namespace(), "roster_test");
    assert_eq!(db.database(), "health");
}

#[tokio::test]
async fn missing_parameters_fail_validation() {
    let err = Database::builder().init().await.unwrap_err();
    assert!(matches!(err, DatabaseError::Validation { .. }));

    let err = Database::builder().url("mem://").init().await.unwrap_err();
    assert!(matches!(err, DatabaseError::Validation { .. }));
}

#[tokio::test]
async fn sequential_reservations_follow_capacity_and_uniqueness() {
    let store = SurrealRegistrantStore::new(memory_db("sequential").await);
    let capacity = 3;

    for (i, email) in ["a@x.org", "b@x.org", "c@x.org"].into_iter().enumerate() {
        let outcome = store
            .conditional_reserve(&Identifier::normalize(email), &registrant(email), capacity)
            .await
            .expect("reserve");
        assert_eq!(outcome, Reservation::Reserved { admitted: i as u64 + 1 });
    }

    let duplicate = store
        .conditional_reserve(&Identifier::normalize("A@X.org"), &registrant("A@X.org"), capacity)
        .await
        .expect("reserve");
    assert_eq!(duplicate, Reservation::DuplicateIdentifier);

    let full = store
        .conditional_reserve(&Identifier::normalize("d@x.org"), &registrant("d@x.org"), capacity)
        .await
        .expect("reserve");
    assert_eq!(full, Reservation::CapacityReached);

    assert_eq!(store.count().await.expect("count"), 3);
    assert_eq!(store.backend(), "surrealdb");
}

#[tokio::test]
async fn zero_capacity_admits_nobody() {
    let store = SurrealRegistrantStore::new(memory_db("closed").await);

    let outcome = store
        .conditional_reserve(&Identifier::normalize("a@x.org"), &registrant("a@x.org"), 0)
        .await
        .expect("reserve");

    assert_eq!(outcome, Reservation::CapacityReached);
    assert_eq!(store.count().await.expect("count"), 0);
}

#[tokio::test]
async fn reinitializing_the_same_database_skips_applied_migrations() {
    let db = memory_db("migrations").await;
    let store = SurrealRegistrantStore::new(db.clone());
    store
        .conditional_reserve(&Identifier::normalize("a@x.org"), &registrant("a@x.org"), 5)
        .await
        .expect("reserve");

    let applied: Vec<String> = db
        .query("SELECT VALUE name FROM migration ORDER BY name")
        .await
        .expect("query")
        .take(0)
        .expect("names");
    assert_eq!(applied, vec!["0001_registrants", "0002_reservation_functions"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_distinct_submissions_fill_capacity_exactly() {
    let store = Arc::new(SurrealRegistrantStore::new(memory_db("stampede").await));
    let capacity = 20;

    let handles: Vec<_> = (0..capacity * 2)
        .map(|i| {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                let email = format!("applicant{i}@uni.edu");
                store
                    .conditional_reserve(&Identifier::normalize(&email), &registrant(&email), capacity)
                    .await
            })
        })
        .collect();

    let (mut reserved, mut full) = (0, 0);
    let mut admitted_counts = Vec::new();
    for handle in handles {
        match handle.await.expect("task") {
            Ok(Reservation::Reserved { admitted }) => {
                reserved += 1;
                admitted_counts.push(admitted);
            }
            Ok(Reservation::CapacityReached) => full += 1,
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    assert_eq!((reserved, full), (20, 20));
    assert!(admitted_counts.iter().all(|n| (1..=20).contains(n)));
    assert_eq!(store.count().await.expect("count"), 20);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_same_identifier_admits_exactly_one() {
    let store = Arc::new(SurrealRegistrantStore::new(memory_db("race").await));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                let raw = if i % 2 == 0 { "Same@Example.org" } else { " same@example.org" };
                store.conditional_reserve(&Identifier::normalize(raw), &registrant(raw), 20).await
            })
        })
        .collect();

    let (mut admitted, mut duplicates) = (0, 0);
    for handle in handles {
        match handle.await.expect("task") {
            Ok(Reservation::Reserved { .. }) => admitted += 1,
            Ok(Reservation::DuplicateIdentifier) => duplicates += 1,
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    assert_eq!((admitted, duplicates), (1, 7));
    assert_eq!(store.count().await.expect("count"), 1);
}
