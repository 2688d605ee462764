//! RFC 1951 deflate at the fastest level, then unpadded standard base64.
//! Neither deflate nor base64 output ever contains a tab or bare
//! `+`/`-`/`=` in a position a delta parser would mistake for a sigil,
//! since the whole payload is itself valid base64 text.

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use flate2::write::DeflateEncoder;
use flate2::read::DeflateDecoder;
use flate2::Compression;
use std::io::{Read, Write};

use crate::error::CodecError;

pub fn compress(s: &str) -> String {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::fast());
    encoder
        .write_all(s.as_bytes())
        .expect("writing to an in-memory buffer cannot fail");
    let bytes = encoder
        .finish()
        .expect("finishing an in-memory deflate stream cannot fail");
    STANDARD_NO_PAD.encode(bytes)
}

pub fn decompress(s: &str) -> Result<String, CodecError> {
    let bytes = STANDARD_NO_PAD.decode(s).map_err(|_| CodecError)?;
    let mut decoder = DeflateDecoder::new(&bytes[..]);
    let mut out = String::new();
    decoder.read_to_string(&mut out).map_err(|_| CodecError)?;
    Ok(out)
}
