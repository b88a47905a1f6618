use roster_domain::Identifier;
use roster_store::StoreError;
use std::borrow::Cow;

/// Why a registration was not admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectionReason {
    CapacityReached,
    DuplicateIdentifier,
    StoreFailure,
}

impl RejectionReason {
    /// Stable machine-readable code used in API responses.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::CapacityReached => "capacity_reached",
            Self::DuplicateIdentifier => "duplicate_identifier",
            Self::StoreFailure => "store_failure",
        }
    }
}

#[roster_derive::roster_error]
pub enum RegistrationError {
    /// Every spot is taken. Terminal.
    #[error("Registration capacity of {capacity} reached{}", format_context(.context))]
    CapacityReached { capacity: u32, context: Option<Cow<'static, str>> },

    /// Someone with the same normalized identifier is already admitted. Terminal.
    #[error("Identifier '{identifier}' already registered{}", format_context(.context))]
    DuplicateIdentifier { identifier: Identifier, context: Option<Cow<'static, str>> },

    /// The store could not decide. Nothing was committed; the call may be repeated.
    #[error("Registrant store failure{}: {source}", format_context(.context))]
    StoreFailure {
        #[source]
        source: StoreError,
        context: Option<Cow<'static, str>>,
    },
}

impl RegistrationError {
    #[must_use]
    pub const fn reason(&self) -> RejectionReason {
        match self {
            Self::CapacityReached { .. } => RejectionReason::CapacityReached,
            Self::DuplicateIdentifier { .. } => RejectionReason::DuplicateIdentifier,
            Self::StoreFailure { .. } => RejectionReason::StoreFailure,
        }
    }

    /// Only infrastructure faults are worth retrying; business rejections are final.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreFailure { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_store_failures_are_retryable() {
        let full = RegistrationError::CapacityReached { capacity: 20, context: None };
        let duplicate = RegistrationError::DuplicateIdentifier {
            identifier: Identifier::normalize("a@b.c"),
            context: None,
        };
        let store: RegistrationError =
            StoreError::Unavailable { message: "down".into(), context: None }.into();

        assert!(!full.is_retryable());
        assert!(!duplicate.is_retryable());
        assert!(store.is_retryable());
        assert_eq!(store.reason(), RejectionReason::StoreFailure);
        assert_eq!(full.reason().code(), "capacity_reached");
    }

    #[test]
    fn display_carries_context() {
        let err = RegistrationError::CapacityReached {
            capacity: 3,
            context: Some("Admitting ada@example.org".into()),
        };
        assert_eq!(err.to_string(), "Registration capacity of 3 reached (Admitting ada@example.org)");
    }
}
