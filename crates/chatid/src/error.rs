use std::borrow::Cow;

/// A result type defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All errors that `chatid` can produce.
///
/// Every failure is local and synchronous. None of them is transient, so
/// retrying the same input yields the same error; callers decide whether to
/// propagate it or treat it as a data-corruption signal.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The input ran out before a fixed-width field could be read.
    #[error("truncated input: field needs {needed} bytes, {available} available")]
    TruncatedInput {
        /// Width of the field that could not be read.
        needed: usize,
        /// Bytes that were left in the input.
        available: usize,
    },

    /// A field was read in full but its value is not legal where it appears,
    /// e.g. an unknown kind tag or a boolean byte other than `0`/`1`.
    #[error("malformed {field}: {reason}")]
    MalformedField {
        /// Name of the offending field.
        field: &'static str,
        /// Human readable explanation.
        reason: Cow<'static, str>,
    },

    /// A reduction was asked to pick from an empty candidate set.
    #[error("empty input set")]
    EmptyInputSet,
}

impl Error {
    pub(crate) fn malformed(field: &'static str, reason: impl Into<Cow<'static, str>>) -> Self {
        Self::MalformedField {
            field,
            reason: reason.into(),
        }
    }
}

impl From<hex::FromHexError> for Error {
    fn from(err: hex::FromHexError) -> Self {
        Self::malformed("hex", err.to_string())
    }
}
