use roster_logger::{LevelFilter, Logger, LoggerError};

#[test]
fn second_init_is_rejected() {
    let _logger = Logger::builder()
        .name("roster-init-first")
        .level(LevelFilter::INFO)
        .init()
        .expect("first init should succeed");

    let err = Logger::builder()
        .name("roster-init-second")
        .init()
        .expect_err("second init should fail");

    assert!(matches!(err, LoggerError::Subscriber { .. }), "unexpected error: {err}");
}
