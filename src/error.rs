use thiserror::Error;

/// Result type alias which returns [`GroupsigError`]
pub type GroupsigResult<A> = Result<A, GroupsigError>;

/// Errors which may occur while running a group signature operation.
///
/// The variants mirror the library's status taxonomy: precondition
/// failures detectable without cryptography map to `InvalidArgument`,
/// operations a scheme does not provide map to `Unsupported`, logical
/// negatives of non-predicate operations (an open that matches no GML
/// entry, a link over signatures the member did not produce) map to
/// `Fail`, and collaborator failures map to `Internal`. Predicates such
/// as `verify` report their outcome through `Ok(bool)` instead.
#[derive(Debug, Error)]
pub enum GroupsigError {
    /// A precondition failed: null-equivalent argument, wrong key kind,
    /// malformed message, or a similar caller mistake.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The scheme codes carried by the arguments do not agree.
    #[error("scheme mismatch between arguments")]
    SchemeMismatch,

    /// The selected scheme does not provide the requested operation.
    #[error("operation {op} is not supported by scheme {scheme}")]
    Unsupported {
        scheme: &'static str,
        op: &'static str,
    },

    /// Logical negative: the inputs are well formed but the requested
    /// relation does not hold (no GML entry matches, the signatures do
    /// not all belong to the member key, ...).
    #[error("operation failed: {0}")]
    Fail(&'static str),

    /// De(serialization) of an artifact or element failed.
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    /// The process environment has not been initialized with `init`.
    #[error("environment not initialized")]
    Uninitialized,

    /// A collaborator (curve library, randomness source) misbehaved in a
    /// way the library cannot classify.
    #[error("internal error: {0}")]
    Internal(&'static str),
}

/// Error raised when encoding or decoding bytes into artifacts or
/// algebraic elements.
#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("unexpected scheme code {got}, expected {expected}")]
    SchemeCode { got: u8, expected: u8 },

    #[error("unexpected key kind {got}, expected {expected}")]
    KeyKind { got: u8, expected: u8 },

    #[error("buffer too short while reading {0}")]
    Truncated(&'static str),

    #[error("declared length inconsistent with remaining buffer")]
    BadLength,

    #[error("mandatory field {0} is absent")]
    MissingField(&'static str),

    #[error("trailing bytes after artifact")]
    TrailingBytes,

    #[error("element validation failed: {0}")]
    InvalidElement(String),

    #[error("invalid base64 text: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("invalid utf-8 or malformed text encoding")]
    Text,
}
