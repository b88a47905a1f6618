use roster_domain::config::{
    ApiConfig, DatabaseConfig, RegistrationConfig, ServerConfig, StoreBackend,
};
use serde_json::json;

#[test]
fn config_defaults_are_sane() {
    let server = ServerConfig::default();
    assert_eq!(server.port, 5000);
    assert!(server.ssl.is_none());
    assert!(server.cors_origins.is_empty());

    let db = DatabaseConfig::default();
    assert_eq!(db.url, "mem://");
    assert_eq!(db.namespace, "roster");
    assert_eq!(db.database, "registrations");
    assert!(db.credentials.is_none());

    let registration = RegistrationConfig::default();
    assert_eq!(registration.capacity, 20);
    assert_eq!(registration.store, StoreBackend::Database);
}

#[test]
fn api_config_deserializes_partial_documents() {
    let raw = json!({
        "server": { "address": "::", "port": 8080, "cors_origins": ["https://apply.example.org"] },
        "registration": { "capacity": 35, "store": "memory" },
        "logging": { "level": "debug", "json": true }
    });

    let cfg: ApiConfig = serde_json::from_value(raw).expect("config deserialize");
    assert_eq!(cfg.server.port, 8080);
    assert_eq!(cfg.server.cors_origins, vec!["https://apply.example.org".to_owned()]);
    assert_eq!(cfg.registration.capacity, 35);
    assert_eq!(cfg.registration.store, StoreBackend::Memory);
    assert_eq!(cfg.registration.count_cache_ttl_ms, 1000);
    assert_eq!(cfg.database.namespace, "roster");
    assert_eq!(cfg.logging.level, "debug");
    assert!(cfg.logging.json);
}

#[test]
fn api_config_is_copy_on_write() {
    let shared = ApiConfig::default();
    let mut tuned = shared.clone();
    tuned.registration.capacity = 5;

    assert_eq!(shared.registration.capacity, 20);
    assert_eq!(tuned.registration.capacity, 5);
}
