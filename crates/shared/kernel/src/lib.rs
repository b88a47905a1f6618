//! Kernel utilities shared by the server and its feature crates.
//! Keep this crate lightweight: configuration loading plus, with the `server` feature,
//! the shared API state and the system routes.
//!
//! ## Config loading
//! ```rust,no_run
//! use roster_kernel::config::load_config;
//! use roster_kernel::domain::config::ApiConfig;
//!
//! let cfg: ApiConfig = load_config(Some("server")).unwrap();
//! assert!(cfg.registration.capacity > 0);
//! ```
pub mod config;
#[cfg(feature = "server")]
pub mod server;

pub use roster_domain as domain;
