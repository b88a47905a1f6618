use roster_derive::roster_error;
use std::borrow::Cow;

#[roster_error]
pub enum LedgerError {
    #[error("Ledger I/O error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Ledger is sealed at {limit} entries")]
    Sealed { limit: u32 },

    #[error("Internal ledger error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn open() -> Result<(), LedgerError> {
    Err(std::io::Error::other("disk gone")).context("Opening ledger")
}

fn main() {
    let err = open().unwrap_err();
    assert_eq!(err.to_string(), "Ledger I/O error (Opening ledger): disk gone");

    let err: LedgerError = "broken invariant".into();
    assert!(matches!(err, LedgerError::Internal { .. }));

    let sealed: Result<(), LedgerError> = Err(LedgerError::Sealed { limit: 3 });
    let err = sealed.context("ignored").unwrap_err();
    assert_eq!(err.to_string(), "Ledger is sealed at 3 entries");
}
