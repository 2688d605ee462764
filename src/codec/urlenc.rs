//! Percent-encodes UTF-8 bytes, then unescapes the whitelist of printable
//! punctuation named in `spec.md` §4.1/§6 (plus space) back to their literal
//! form for readability. `+`/`=` are in that whitelist and do end up
//! literal in the payload, but never at a position a delta parser would
//! mistake for a sigil: the leading sigil of a patch token is already
//! consumed before the payload is looked at, and `\t` (the only field
//! separator) is never unescaped, so nothing here can be confused with a
//! patch boundary. `-` stays escaped as `%2D`, since it is not in the
//! whitelist.
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::CodecError;

/// Characters left unescaped after percent-encoding, per `spec.md` §4.1/§6:
/// `! * ' ( ) ; / ? : @ & = + $ , # ~` and space.
const SAFE_PUNCTUATION: &[char] = &[
    '!', '*', '\'', '(', ')', ';', '/', '?', ':', '@', '&', '=', '+', '$', ',', '#', '~',
];

fn encode_set() -> AsciiSet {
    let mut set = NON_ALPHANUMERIC;
    for &c in SAFE_PUNCTUATION {
        set = set.remove(c as u8);
    }
    set.remove(b' ')
}

pub fn compress(s: &str) -> String {
    let set = encode_set();
    utf8_percent_encode(s, &set).collect()
}

pub fn decompress(s: &str) -> Result<String, CodecError> {
    percent_decode_str(s)
        .decode_utf8()
        .map(|cow| cow.into_owned())
        .map_err(|_| CodecError)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitelisted_punctuation_stays_literal() {
        let compressed = compress("a;b?c:d");
        assert_eq!(compressed, "a;b?c:d");
    }

    #[test]
    fn tab_and_hyphen_are_always_escaped_but_plus_and_equals_stay_literal() {
        let compressed = compress("+-=\t");
        assert!(!compressed.contains('\t'));
        assert!(!compressed.contains('-'));
        assert_eq!(compressed, "+%2D=%09");
    }
}
