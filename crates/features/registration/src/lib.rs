//! Registration feature: admits registrants up to a fixed capacity.
//!
//! [`AdmissionGate`] sits in front of a [`roster_store::RegistrantStore`] and turns its
//! single conditional reserve into admissions and typed rejections. With the `server`
//! feature the crate also provides the HTTP handlers and their router.

mod error;
mod gate;
#[cfg(feature = "server")]
mod handlers;

pub use error::{RegistrationError, RegistrationErrorExt, RejectionReason};
pub use gate::{AdmissionGate, Admitted};
#[cfg(feature = "server")]
pub use handlers::{
    CountResponse, RegisterRejection, RegisterRequest, RegisterResponse, registration_router,
};
