//! The diff engine: `diff_main`'s shortcuts and fall-through to the Myers
//! bisection core, plus the post-processing passes that turn a raw edit
//! script into the normalized, human-friendly form callers see.
//!
//! `spec.md` §9 recommends parameterizing the algorithm over an alphabet
//! type rather than hard-coding `char`; this crate takes the concrete step
//! of that redesign by running the whole engine over `&[u32]` unit
//! sequences. At the top level those units are Unicode scalar values; for
//! line/word mode they are token ids from [`crate::intern`]. The line-mode
//! reduction step only ever fires when `is_char_level` is `true`, since
//! reinterpreting token ids as characters would be meaningless.

mod bisect;
pub mod efficiency;
mod halfmatch;
pub mod merge;
pub mod semantic;

use crate::intern::{self, Mode};
use crate::options::DiffOptions;
use crate::util::{common_prefix, common_suffix};
use crate::{Diff, Op};

/// A single edit over raw units, before the leaf units have been
/// converted back to text. Mirrors [`crate::Diff`] one level down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawEdit {
    pub op: Op,
    pub units: Vec<u32>,
}

fn units_of(s: &str) -> Vec<u32> {
    s.chars().map(|c| c as u32).collect()
}

fn text_of(units: &[u32]) -> String {
    units.iter().map(|&u| char::from_u32(u).expect("unit originated from a valid char")).collect()
}

fn raw(op: Op, units: &[u32]) -> RawEdit {
    RawEdit { op, units: units.to_vec() }
}

/// Top-level entry point implementing `spec.md` §4.3's `diff(A, B)`:
/// equality shortcut, common-affix peel, `diff_main`, affix reinsertion,
/// merge, and (for more than two diffs) the semantic/efficiency cleanup
/// passes.
pub fn diff(a: &str, b: &str, opts: &DiffOptions) -> Vec<Diff> {
    let opts = opts.resolved();
    if a == b {
        return if a.is_empty() { Vec::new() } else { vec![Diff { op: Op::Unchanged, text: a.to_owned() }] };
    }

    let ua = units_of(a);
    let ub = units_of(b);
    let mut a_slice: &[u32] = &ua;
    let mut b_slice: &[u32] = &ub;
    let prefix_len = common_prefix(a_slice, b_slice);
    a_slice = &a_slice[prefix_len..];
    b_slice = &b_slice[prefix_len..];
    let suffix_len = common_suffix(a_slice, b_slice);
    a_slice = &a_slice[..a_slice.len() - suffix_len];
    b_slice = &b_slice[..b_slice.len() - suffix_len];

    let mut edits = diff_units(a_slice, b_slice, &opts, true, true);

    if prefix_len > 0 {
        edits.insert(0, raw(Op::Unchanged, &ua[..prefix_len]));
    }
    if suffix_len > 0 {
        edits.push(raw(Op::Unchanged, &ua[ua.len() - suffix_len..]));
    }

    let mut diffs = merge::merge(edits.into_iter().map(to_diff).collect());
    if diffs.len() > 2 {
        diffs = semantic::cleanup_semantic(diffs);
        diffs = efficiency::cleanup(diffs, opts.edit_cost);
    }
    diffs
}

/// `word_diff(A, B)` of `spec.md` §6: always diffs at word granularity
/// (never falling back to whole-character bisection on the raw text),
/// then refines each deleted/inserted pair with character-level detail.
pub fn word_diff(a: &str, b: &str, opts: &DiffOptions) -> Vec<Diff> {
    let opts = opts.resolved();
    if a == b {
        return if a.is_empty() { Vec::new() } else { vec![Diff { op: Op::Unchanged, text: a.to_owned() }] };
    }
    let tokenized = intern::tokenize_by(a, b, Mode::Words);
    let edits = diff_units(&tokenized.codes_a, &tokenized.codes_b, &opts, false, false);
    let mut diffs: Vec<Diff> = edits
        .into_iter()
        .map(|e| Diff { op: e.op, text: intern::expand(&e.units, &tokenized.dict) })
        .collect();
    diffs.retain(|d| !d.text.is_empty());
    diffs = merge::merge(diffs);
    diffs = semantic::cleanup_semantic(diffs);
    diffs = rediff_by_character(diffs, &opts);
    if diffs.len() > 2 {
        diffs = efficiency::cleanup(diffs, opts.edit_cost);
    }
    diffs
}

/// `diff_main(A, B, deadline, lines_allowed)` of `spec.md` §4.3.
///
/// `is_char_level` is `true` exactly when `a`/`b` hold Unicode scalar
/// values (as opposed to token ids); it gates the line-mode reduction
/// step, which is meaningless over an already-tokenized alphabet.
pub(crate) fn diff_units(
    a: &[u32],
    b: &[u32],
    opts: &DiffOptions,
    is_char_level: bool,
    lines_allowed: bool,
) -> Vec<RawEdit> {
    if a.is_empty() {
        return if b.is_empty() { Vec::new() } else { vec![raw(Op::Inserted, b)] };
    }
    if b.is_empty() {
        return vec![raw(Op::Deleted, a)];
    }

    let (longer, shorter, a_is_longer) = if a.len() >= b.len() { (a, b, true) } else { (b, a, false) };

    // Substring shortcut (`spec.md` §4.3 step 2).
    if let Some(pos) = find_subsequence(longer, shorter) {
        let prefix = &longer[..pos];
        let suffix = &longer[pos + shorter.len()..];
        let middle_op = if a_is_longer { Op::Deleted } else { Op::Inserted };
        let mut out = Vec::new();
        if !prefix.is_empty() {
            out.push(raw(middle_op, prefix));
        }
        out.push(raw(Op::Unchanged, shorter));
        if !suffix.is_empty() {
            out.push(raw(middle_op, suffix));
        }
        return out;
    }

    // Single-character shortcut (`spec.md` §4.3 step 3).
    if shorter.len() == 1 {
        return vec![raw(Op::Deleted, a), raw(Op::Inserted, b)];
    }

    // Half-match shortcut (`spec.md` §4.3 step 4); only worth the extra
    // scan when a deadline makes bisection expensive to risk.
    if opts.use_half_match && opts.deadline.is_some() {
        if let Some(m) = halfmatch::find(a, b) {
            let mut out = diff_units(&m.a_prefix, &m.b_prefix, opts, is_char_level, lines_allowed);
            out.push(raw(Op::Unchanged, &m.common));
            out.extend(diff_units(&m.a_suffix, &m.b_suffix, opts, is_char_level, lines_allowed));
            return out;
        }
    }

    // Line-mode reduction (`spec.md` §4.3 step 5): only at the character
    // level, and only once (`lines_allowed` is threaded through as
    // `false` on the tokenized recursion below).
    if is_char_level && lines_allowed && a.len() > opts.line_mode_threshold && b.len() > opts.line_mode_threshold {
        let text_a = text_of(a);
        let text_b = text_of(b);
        let tokenized = intern::tokenize_by(&text_a, &text_b, Mode::Lines);
        let token_edits = diff_units(&tokenized.codes_a, &tokenized.codes_b, opts, false, false);
        let mut diffs: Vec<Diff> = token_edits
            .into_iter()
            .map(|e| Diff { op: e.op, text: intern::expand(&e.units, &tokenized.dict) })
            .collect();
        diffs.retain(|d| !d.text.is_empty());
        diffs = merge::merge(diffs);
        diffs = semantic::cleanup_semantic(diffs);
        diffs = rediff_by_character(diffs, opts);
        return diffs.into_iter().map(|d| raw(d.op, &units_of(&d.text))).collect();
    }

    // Myers bisection core (`spec.md` §4.3 step 6).
    bisect_entry(a, b, opts, is_char_level)
}

fn bisect_entry(a: &[u32], b: &[u32], opts: &DiffOptions, is_char_level: bool) -> Vec<RawEdit> {
    bisect::diff_bisect(a, b, opts, is_char_level)
}

fn find_subsequence(haystack: &[u32], needle: &[u32]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn to_diff(edit: RawEdit) -> Diff {
    Diff { op: edit.op, text: text_of(&edit.units) }
}

/// Re-diff by character (`spec.md` §4.3.1): after line/word-mode diffs
/// have been expanded back to text, walk the list and, at each
/// `Unchanged` boundary, recursively re-diff the accumulated deleted and
/// inserted runs that preceded it if both are non-empty. A fixed-depth
/// refinement, not a loop: each such pair is re-diffed exactly once.
pub(crate) fn rediff_by_character(diffs: Vec<Diff>, opts: &DiffOptions) -> Vec<Diff> {
    let mut out = Vec::with_capacity(diffs.len());
    let mut pending_del: Option<String> = None;
    let mut pending_ins: Option<String> = None;

    let flush = |out: &mut Vec<Diff>, del: &mut Option<String>, ins: &mut Option<String>, opts: &DiffOptions| {
        match (del.take(), ins.take()) {
            (Some(d), Some(i)) if !d.is_empty() && !i.is_empty() => {
                out.extend(diff(&d, &i, opts));
            }
            (d, i) => {
                if let Some(d) = d.filter(|s| !s.is_empty()) {
                    out.push(Diff { op: Op::Deleted, text: d });
                }
                if let Some(i) = i.filter(|s| !s.is_empty()) {
                    out.push(Diff { op: Op::Inserted, text: i });
                }
            }
        }
    };

    for d in diffs {
        match d.op {
            Op::Deleted => {
                pending_del.get_or_insert_with(String::new).push_str(&d.text);
            }
            Op::Inserted => {
                pending_ins.get_or_insert_with(String::new).push_str(&d.text);
            }
            Op::Unchanged => {
                flush(&mut out, &mut pending_del, &mut pending_ins, opts);
                out.push(d);
            }
        }
    }
    flush(&mut out, &mut pending_del, &mut pending_ins, opts);
    merge::merge(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::DiffOptions;

    #[test]
    fn empty_inputs() {
        assert_eq!(diff("", "", &DiffOptions::default()), vec![]);
    }

    #[test]
    fn pure_insertion() {
        assert_eq!(
            diff("", "abc", &DiffOptions::default()),
            vec![Diff { op: Op::Inserted, text: "abc".into() }]
        );
    }

    #[test]
    fn pure_deletion() {
        assert_eq!(
            diff("abc", "", &DiffOptions::default()),
            vec![Diff { op: Op::Deleted, text: "abc".into() }]
        );
    }

    #[test]
    fn no_op_nonempty() {
        assert_eq!(
            diff("same", "same", &DiffOptions::default()),
            vec![Diff { op: Op::Unchanged, text: "same".into() }]
        );
    }

    #[test]
    fn substring_insertion() {
        assert_eq!(
            diff("abcxyz", "abcdxyz", &DiffOptions::default()),
            vec![
                Diff { op: Op::Unchanged, text: "abc".into() },
                Diff { op: Op::Inserted, text: "d".into() },
                Diff { op: Op::Unchanged, text: "xyz".into() },
            ]
        );
    }

    #[test]
    fn reconstruction_holds_for_prose() {
        let a = "This is the original text.";
        let b = "This is a revised text with multiple differences.";
        let d = diff(a, b, &DiffOptions::default());
        let new: String = d.iter().filter(|d| d.op != Op::Deleted).map(|d| d.text.as_str()).collect();
        let old: String = d.iter().filter(|d| d.op != Op::Inserted).map(|d| d.text.as_str()).collect();
        assert_eq!(new, b);
        assert_eq!(old, a);
    }
}
