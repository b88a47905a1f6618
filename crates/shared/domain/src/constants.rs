//! Names and defaults shared between the HTTP layer and the docs.

/// `OpenAPI` tag for operational endpoints.
pub const SYSTEM_TAG: &str = "System";
/// `OpenAPI` tag for registration endpoints.
pub const REGISTRATION_TAG: &str = "Registration";

/// Default number of registrants admitted when no capacity is configured.
pub const DEFAULT_CAPACITY: u32 = 20;
