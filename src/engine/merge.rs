//! `merge(diffs)` (`spec.md` §4.3.2): the invariant-restorer. Coalesces
//! runs of `Deleted`/`Inserted` into at most one `Deleted` followed by one
//! `Inserted`, factors out common affixes into neighboring `Unchanged`
//! diffs, drops empty diffs, then sweeps for the "shift" pattern where an
//! edit can slide across an `Unchanged` boundary to merge with a
//! neighbor. Iterates to a fixed point.
//!
//! Per `spec.md` §9's redesign note ("build a new list from the old"),
//! every pass here constructs a fresh `Vec<Diff>` rather than splicing and
//! rewriting entries of a shared mutable list in place.

use crate::{Diff, Op};

/// Normalizes `diffs` to the edit-list invariants in `spec.md` §3: no two
/// adjacent diffs share an op, no diff has empty text.
pub fn merge(mut diffs: Vec<Diff>) -> Vec<Diff> {
    loop {
        let (coalesced, changed_coalesce) = coalesce_and_factor(diffs);
        let (shifted, changed_shift) = shift_pattern(coalesced);
        diffs = shifted;
        if !changed_coalesce && !changed_shift {
            return diffs;
        }
    }
}

/// Coalesces consecutive `Deleted`/`Inserted` runs into a single
/// `Deleted` then a single `Inserted`, factoring their common prefix into
/// the preceding `Unchanged` (creating one if needed) and their common
/// suffix into the following `Unchanged` (creating one if needed), and
/// merges adjacent `Unchanged` diffs.
fn coalesce_and_factor(diffs: Vec<Diff>) -> (Vec<Diff>, bool) {
    let mut out: Vec<Diff> = Vec::with_capacity(diffs.len());
    let mut changed = false;
    let mut i = 0;

    while i < diffs.len() {
        match diffs[i].op {
            Op::Unchanged => {
                if diffs[i].text.is_empty() {
                    changed = true;
                    i += 1;
                    continue;
                }
                if let Some(last) = out.last_mut() {
                    if last.op == Op::Unchanged {
                        last.text.push_str(&diffs[i].text);
                        changed = true;
                        i += 1;
                        continue;
                    }
                }
                out.push(diffs[i].clone());
                i += 1;
            }
            Op::Deleted | Op::Inserted => {
                let start = i;
                let mut del = String::new();
                let mut ins = String::new();
                while i < diffs.len() && diffs[i].op != Op::Unchanged {
                    match diffs[i].op {
                        Op::Deleted => del.push_str(&diffs[i].text),
                        Op::Inserted => ins.push_str(&diffs[i].text),
                        Op::Unchanged => unreachable!(),
                    }
                    i += 1;
                }
                if i - start > 1 {
                    changed = true;
                }

                let prefix_len = common_prefix_len(&ins, &del);
                if prefix_len > 0 {
                    changed = true;
                    let prefix = ins[..prefix_len].to_string();
                    match out.last_mut() {
                        Some(last) if last.op == Op::Unchanged => last.text.push_str(&prefix),
                        _ => out.push(Diff { op: Op::Unchanged, text: prefix }),
                    }
                    del = del.split_off(prefix_len);
                    ins = ins.split_off(prefix_len);
                }

                let suffix_len = common_suffix_len(&ins, &del);
                let mut carried_suffix = String::new();
                if suffix_len > 0 {
                    changed = true;
                    carried_suffix = ins[ins.len() - suffix_len..].to_string();
                    del.truncate(del.len() - suffix_len);
                    ins.truncate(ins.len() - suffix_len);
                }

                if !del.is_empty() {
                    out.push(Diff { op: Op::Deleted, text: del });
                }
                if !ins.is_empty() {
                    out.push(Diff { op: Op::Inserted, text: ins });
                }
                if !carried_suffix.is_empty() {
                    out.push(Diff { op: Op::Unchanged, text: carried_suffix });
                }
            }
        }
    }

    (out, changed)
}

/// Slides a lone edit between two `Unchanged` diffs across the boundary
/// when the edit's text ends with the preceding equality or starts with
/// the following one, reducing the total diff count.
fn shift_pattern(diffs: Vec<Diff>) -> (Vec<Diff>, bool) {
    let mut out: Vec<Diff> = Vec::with_capacity(diffs.len());
    let mut changed = false;
    let mut i = 0;

    while i < diffs.len() {
        let candidate = diffs[i].op != Op::Unchanged
            && i + 1 < diffs.len()
            && diffs[i + 1].op == Op::Unchanged
            && matches!(out.last(), Some(prev) if prev.op == Op::Unchanged);

        if candidate {
            let x = out.last().unwrap().text.clone();
            let e = &diffs[i].text;
            let y = &diffs[i + 1].text;

            if !x.is_empty() && e.ends_with(x.as_str()) {
                let new_e = format!("{x}{}", &e[..e.len() - x.len()]);
                out.pop();
                out.push(Diff { op: diffs[i].op, text: new_e });
                out.push(Diff { op: Op::Unchanged, text: format!("{x}{y}") });
                i += 2;
                changed = true;
                continue;
            } else if !y.is_empty() && e.starts_with(y.as_str()) {
                out.pop();
                out.push(Diff { op: Op::Unchanged, text: format!("{x}{y}") });
                let new_e = format!("{}{y}", &e[y.len()..]);
                out.push(Diff { op: diffs[i].op, text: new_e });
                i += 2;
                changed = true;
                continue;
            }
        }

        out.push(diffs[i].clone());
        i += 1;
    }

    (out, changed)
}

/// Byte length of the longest common prefix of `a`/`b`, aligned to a
/// character boundary in both strings (so callers can safely byte-slice at
/// the returned index). Comparing raw bytes instead of `char`s would risk
/// splitting a multi-byte character whose leading byte happens to match a
/// different character's leading byte in the other string.
fn common_prefix_len(a: &str, b: &str) -> usize {
    let mut len = 0;
    for (ca, cb) in a.chars().zip(b.chars()) {
        if ca != cb {
            break;
        }
        len += ca.len_utf8();
    }
    len
}

/// Byte length of the longest common suffix of `a`/`b`, aligned to a
/// character boundary in both strings.
fn common_suffix_len(a: &str, b: &str) -> usize {
    let mut len = 0;
    for (ca, cb) in a.chars().rev().zip(b.chars().rev()) {
        if ca != cb {
            break;
        }
        len += ca.len_utf8();
    }
    len
}
