use roster_domain::constants::{DEFAULT_CAPACITY, REGISTRATION_TAG, SYSTEM_TAG};

#[test]
fn constants_are_stable() {
    assert_eq!(DEFAULT_CAPACITY, 20);
    assert_eq!(SYSTEM_TAG, "System");
    assert_eq!(REGISTRATION_TAG, "Registration");
}
