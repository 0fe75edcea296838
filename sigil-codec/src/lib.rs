//! Strict CBOR reading for the Oasis transaction signer
//!
//! Payloads submitted for signing are adversarial input: this crate wraps
//! [`minicbor`] with typed, type-checked readers and adds an independent
//! canonical-form pass over the raw bytes. Schema decoding built on top of
//! these primitives lives in `sigil-primitives`.

use thiserror::Error;

/// Canonical-form validation of raw CBOR bytes
pub mod canonical;

/// Typed, strict readers over a [`minicbor::Decoder`]
pub mod read;

/// Shared re-export of the minicbor lib across all of sigil
pub use minicbor;

/// Failure taxonomy for the whole review pipeline.
///
/// The variants are flat on purpose: the host transport reports them as
/// numeric codes (see [`Error::code`]), so nesting would only be flattened
/// again at the boundary.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("no more data")]
    NoData,

    #[error("initialized with an empty buffer")]
    InitContextEmpty,

    #[error("unexpected buffer end")]
    UnexpectedBufferEnd,

    #[error("unexpected data at end of buffer")]
    UnexpectedDataAtEnd,

    #[error("display index out of range")]
    DisplayIdxOutOfRange,

    #[error("display page out of range")]
    DisplayPageOutOfRange,

    #[error("unexpected data type")]
    UnexpectedType,

    #[error("unexpected method")]
    UnexpectedMethod,

    #[error("unexpected value")]
    UnexpectedValue,

    #[error("unexpected number of items")]
    UnexpectedNumberItems,

    #[error("unexpected field")]
    UnexpectedField,

    #[error("unexpected characters")]
    UnexpectedCharacters,

    #[error("value out of range")]
    ValueOutOfRange,

    #[error("unexpected CBOR error")]
    CborUnexpected,

    #[error("required field nonce is missing")]
    RequiredNonce,

    #[error("required field method is missing")]
    RequiredMethod,

    #[error("context does not match the expected prefix")]
    ContextMismatch,

    #[error("context size exceeds the maximum")]
    ContextUnexpectedSize,

    #[error("context contains non-printable characters")]
    ContextInvalidChars,

    #[error("no context prefix known for this method")]
    ContextUnknownPrefix,

    #[error("internal crypto error")]
    InternalCryptoError,
}

impl Error {
    /// Stable numeric code reported over the host transport.
    pub fn code(&self) -> u8 {
        match self {
            Error::NoData => 1,
            Error::InitContextEmpty => 2,
            Error::UnexpectedBufferEnd => 3,
            Error::UnexpectedDataAtEnd => 4,
            Error::DisplayIdxOutOfRange => 5,
            Error::DisplayPageOutOfRange => 6,
            Error::UnexpectedType => 7,
            Error::UnexpectedMethod => 8,
            Error::UnexpectedValue => 9,
            Error::UnexpectedNumberItems => 10,
            Error::UnexpectedField => 11,
            Error::UnexpectedCharacters => 12,
            Error::ValueOutOfRange => 13,
            Error::CborUnexpected => 14,
            Error::RequiredNonce => 15,
            Error::RequiredMethod => 16,
            Error::ContextMismatch => 17,
            Error::ContextUnexpectedSize => 18,
            Error::ContextInvalidChars => 19,
            Error::ContextUnknownPrefix => 20,
            Error::InternalCryptoError => 21,
        }
    }
}

impl From<minicbor::decode::Error> for Error {
    fn from(e: minicbor::decode::Error) -> Self {
        if e.is_end_of_input() {
            Error::UnexpectedBufferEnd
        } else if e.is_type_mismatch() {
            Error::UnexpectedType
        } else {
            Error::CborUnexpected
        }
    }
}
