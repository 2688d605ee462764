//! Compresses/decompresses an insertion payload so it survives the delta
//! textual form (`spec.md` §4.1).
//!
//! Two interoperable schemes are implemented, selected at build time via
//! Cargo features — exactly one of `deflate-codec` (default) or
//! `url-codec` must be enabled. Both satisfy the same contract:
//! `decompress(compress(s)) == Ok(s)` for all `s`, and the compressed form
//! never contains a tab or a bare `+`/`-`/`=` that could be mistaken for a
//! patch sigil.

#[cfg(all(feature = "deflate-codec", feature = "url-codec"))]
compile_error!("enable exactly one of the `deflate-codec`/`url-codec` features, not both");

#[cfg(not(any(feature = "deflate-codec", feature = "url-codec")))]
compile_error!("enable exactly one of the `deflate-codec`/`url-codec` features");

#[cfg(feature = "deflate-codec")]
mod deflate;
#[cfg(feature = "url-codec")]
mod urlenc;

use crate::error::CodecError;

/// Compresses `s` into a form safe to embed in a delta string.
#[cfg(feature = "deflate-codec")]
pub fn compress(s: &str) -> String {
    deflate::compress(s)
}

#[cfg(feature = "url-codec")]
pub fn compress(s: &str) -> String {
    urlenc::compress(s)
}

/// Inverts [`compress`]. Returns [`CodecError`] on malformed input rather
/// than panicking.
#[cfg(feature = "deflate-codec")]
pub fn decompress(s: &str) -> Result<String, CodecError> {
    deflate::decompress(s)
}

#[cfg(feature = "url-codec")]
pub fn decompress(s: &str) -> Result<String, CodecError> {
    urlenc::decompress(s)
}
