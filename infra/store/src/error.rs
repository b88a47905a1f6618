use std::borrow::Cow;

/// Faults below the atomicity boundary of a registrant store.
///
/// A store returning any of these must not have committed anything for the call.
#[roster_derive::roster_error]
pub enum StoreError {
    /// The backing engine cannot be reached or refused the connection.
    #[error("Registrant store unavailable{}: {message}", format_context(.context))]
    Unavailable { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Concurrent reservations kept conflicting and the store gave up.
    #[error("Registrant store conflict{}: {message}", format_context(.context))]
    Conflict { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The engine executed the request but reported a failure.
    #[error("Registrant store backend error{}: {message}", format_context(.context))]
    Backend { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal registrant store error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
