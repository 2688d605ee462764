//! Error types for the parts of the crate that can fail: decompression,
//! delta parsing, revision application and formatting.
//!
//! The diff engine itself never fails (`spec.md` §7): a deadline expiring
//! mid-search yields a conservative but valid edit script rather than an
//! error. Only input parsing and patch application surface `Result`.

use thiserror::Error;

/// The compressed payload produced by [`crate::codec::compress`] could not
/// be decompressed.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
#[error("malformed compressed payload")]
pub struct CodecError;

/// A single patch token (`+...`, `-...`, `=...`) failed to parse.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum PatchParseError {
    /// The token did not begin with `+`, `-` or `=`.
    #[error("unknown patch sigil {0:?}")]
    UnknownSigil(char),
    /// A `-`/`=` token's length was not a positive base-10 integer.
    #[error("invalid patch length {0:?}")]
    InvalidLength(String),
    /// A `+` token's payload failed to decompress.
    #[error("invalid compressed insertion payload")]
    InvalidPayload(#[from] CodecError),
}

/// A [`crate::Revision`] could not be applied to the given text.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ApplyError {
    /// A `-`/`=` patch claimed more text than remained at its position.
    #[error("patch at offset {offset} claims length {length} but only {remaining} bytes remain")]
    Overrun {
        offset: usize,
        length: usize,
        remaining: usize,
    },
    /// After all patches were applied, the walk did not reach the end of
    /// the input text.
    #[error("revision consumed {consumed} of {total} bytes of the original text")]
    TrailingText { consumed: usize, total: usize },
}

/// An unrecognized format tag was passed to [`crate::format::format`].
#[derive(Debug, Error, PartialEq, Eq, Clone)]
#[error("unknown diff format {0:?}")]
pub struct UnknownFormat(pub String);
