#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Roster macros
//!
//! Attribute macros shared by every crate in the workspace:
//!
//! * [`roster_error`] turns an enum into a `thiserror` error with `.context(..)` support.
//! * [`api_model`] and [`api_handler`] keep HTTP DTOs and handlers consistent with `OpenAPI`.
//! * [`main`] boots an async `main` on a profiled Tokio runtime (re-exported by `roster-runtime`).
//!
//! Examples are `ignore`d here because a proc-macro crate cannot use its own macros in doctests.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemFn, ItemStruct, parse_macro_input};

/// Turns an `async fn main` into a synchronous `main` running on a Roster runtime profile.
///
/// Accepted profiles: `server`, `compact`, `default` (or no argument).
///
/// ```rust,ignore
/// #[roster_runtime::main(server)]
/// async fn main() -> anyhow::Result<()> {
///     Ok(())
/// }
/// ```
#[proc_macro_attribute]
pub fn main(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::runtime::expand_main(args.into(), input).into()
}

/// Declares an API data transfer object.
///
/// Adds `Debug`, `Serialize` and `Deserialize` when missing, derives `utoipa::ToSchema`
/// under the `server` feature, and applies `rename_all = "camelCase"` plus
/// `deny_unknown_fields` unless overridden.
///
/// ```rust,ignore
/// #[api_model(deny_unknown_fields = false)]
/// pub struct CountResponse {
///     pub count: u64,
/// }
/// ```
#[proc_macro_attribute]
pub fn api_model(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::api::expand_api_model(attr.into(), input).into()
}

/// Registers an Axum handler with `utoipa::path` when the `server` feature is enabled.
///
/// ```rust,ignore
/// #[api_handler(get, path = "/health", responses((status = OK, body = HealthResponse)))]
/// pub async fn health_handler() -> impl IntoResponse { /* ... */ }
/// ```
#[proc_macro_attribute]
pub fn api_handler(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::api::expand_api_handler(args.into(), input).into()
}

/// Defines a crate error enum.
///
/// Generated items:
///
/// * `#[derive(Debug, thiserror::Error)]` unless already present.
/// * `<Name>Ext<T>` with `.context(..)` for `Result<T, Name>` and for `Result<T, Source>`
///   of every variant carrying a `source` field.
/// * `From<Source>` for those variants.
/// * `From<&'static str>` and `From<String>` if an `Internal` variant exists.
/// * A private `format_context` helper used inside `#[error(..)]` strings.
///
/// Every variant must use named fields; variants with a `source` must also carry
/// `context: Option<Cow<'static, str>>`.
///
/// ```rust,ignore
/// #[roster_derive::roster_error]
/// pub enum StoreError {
///     #[error("Store unavailable{}: {message}", format_context(.context))]
///     Unavailable { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
///     #[error("Internal store error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
/// ```
#[proc_macro_attribute]
pub fn roster_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand(input).into()
}
