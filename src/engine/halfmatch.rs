//! Half-match shortcut (`spec.md` §4.3 step 4, Glossary "Half-match"): a
//! time-optimization that looks for a substring of at least half the
//! longer text occurring in both inputs, so the two halves around it can
//! be diffed independently instead of paying for a full bisection.

use crate::util::{common_prefix, common_suffix};

/// The result of splitting `a`/`b` around a shared substring.
pub(super) struct HalfMatch {
    pub a_prefix: Vec<u32>,
    pub a_suffix: Vec<u32>,
    pub b_prefix: Vec<u32>,
    pub b_suffix: Vec<u32>,
    pub common: Vec<u32>,
}

/// Attempts to find a half-match between `a` and `b`. Tries seed
/// positions `⌈len/4⌉` and `⌈len/2⌉` of the longer text and keeps
/// whichever yields the longer shared substring.
pub(super) fn find(a: &[u32], b: &[u32]) -> Option<HalfMatch> {
    let (long, short, a_is_long) = if a.len() >= b.len() { (a, b, true) } else { (b, a, false) };

    if long.len() < 4 || short.len() * 2 < long.len() {
        return None;
    }

    let seed1 = (long.len() + 3) / 4;
    let seed2 = (long.len() + 1) / 2;
    let hm1 = half_match_at(long, short, seed1);
    let hm2 = half_match_at(long, short, seed2);

    let raw = match (hm1, hm2) {
        (None, None) => return None,
        (Some(hm), None) | (None, Some(hm)) => hm,
        (Some(hm1), Some(hm2)) => {
            if hm1.common.len() >= hm2.common.len() {
                hm1
            } else {
                hm2
            }
        }
    };

    Some(if a_is_long {
        HalfMatch {
            a_prefix: raw.long_prefix,
            a_suffix: raw.long_suffix,
            b_prefix: raw.short_prefix,
            b_suffix: raw.short_suffix,
            common: raw.common,
        }
    } else {
        HalfMatch {
            a_prefix: raw.short_prefix,
            a_suffix: raw.short_suffix,
            b_prefix: raw.long_prefix,
            b_suffix: raw.long_suffix,
            common: raw.common,
        }
    })
}

struct RawHalfMatch {
    long_prefix: Vec<u32>,
    long_suffix: Vec<u32>,
    short_prefix: Vec<u32>,
    short_suffix: Vec<u32>,
    common: Vec<u32>,
}

/// Looks for occurrences of the quarter-length seed starting at `long[i..]`
/// inside `short`, keeping the occurrence that extends furthest in both
/// directions. Returns `None` unless the best match covers at least half
/// of `long`.
fn half_match_at(long: &[u32], short: &[u32], i: usize) -> Option<RawHalfMatch> {
    let seed_len = long.len() / 4;
    let seed = &long[i..i + seed_len];

    let mut best: Option<RawHalfMatch> = None;
    let mut search_from = 0usize;
    while let Some(rel) = find_subslice(&short[search_from..], seed) {
        let j = search_from + rel;
        let prefix_len = common_suffix(&long[..i], &short[..j]);
        let suffix_len = common_prefix(&long[i..], &short[j..]);
        let common_len = prefix_len + suffix_len;
        let improves = match &best {
            Some(b) => b.common.len() < common_len,
            None => true,
        };
        if improves {
            let common = short[j - prefix_len..j + suffix_len].to_vec();
            best = Some(RawHalfMatch {
                long_prefix: long[..i - prefix_len].to_vec(),
                long_suffix: long[i + suffix_len..].to_vec(),
                short_prefix: short[..j - prefix_len].to_vec(),
                short_suffix: short[j + suffix_len..].to_vec(),
                common,
            });
        }
        search_from = j + 1;
    }

    best.filter(|hm| hm.common.len() * 2 >= long.len())
}

fn find_subslice(haystack: &[u32], needle: &[u32]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    if needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}
