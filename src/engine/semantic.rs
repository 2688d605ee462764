//! `cleanup_semantic` (`spec.md` §4.3.3) and `semantic_score` (`spec.md`
//! §4.3.5): the pass that favors edits a human would recognize as a single
//! change over a minimal-but-scattered edit script.
//!
//! Three sub-passes, run in order: eliminating short equalities sandwiched
//! between larger changes, sliding equality boundaries to the most
//! "semantically clean" split point nearby, and folding any
//! delete/insert pairs left overlapping at their shared boundary into an
//! explicit equality.

use super::merge;
use crate::{Diff, Op};

/// Runs the full semantic cleanup pipeline on an already-[`merge`]d diff
/// list.
pub fn cleanup_semantic(diffs: Vec<Diff>) -> Vec<Diff> {
    let (diffs, changed) = eliminate_large_equalities(diffs);
    let diffs = if changed { merge::merge(diffs) } else { diffs };
    let diffs = semantic_lossless(diffs);
    eliminate_overlaps(diffs)
}

/// Converts an `Unchanged` diff to a `Deleted`+`Inserted` pair wherever it
/// is shorter than both the edit mass preceding it and the edit mass
/// following it — a short equality wedged between two substantial changes
/// reads as noise, not as shared content.
fn eliminate_large_equalities(diffs: Vec<Diff>) -> (Vec<Diff>, bool) {
    let mut diffs = diffs;
    let mut changed = false;
    let mut equalities: Vec<usize> = Vec::new();
    let mut last_equality: Option<String> = None;
    let (mut ins1, mut del1, mut ins2, mut del2) = (0usize, 0usize, 0usize, 0usize);
    let mut pointer: isize = 0;

    while (pointer as usize) < diffs.len() {
        let p = pointer as usize;
        if diffs[p].op == Op::Unchanged {
            equalities.push(p);
            ins1 = ins2;
            del1 = del2;
            ins2 = 0;
            del2 = 0;
            last_equality = Some(diffs[p].text.clone());
        } else {
            if diffs[p].op == Op::Inserted {
                ins2 += diffs[p].text.chars().count();
            } else {
                del2 += diffs[p].text.chars().count();
            }
            let eliminate = match &last_equality {
                Some(eq) => {
                    let eq_len = eq.chars().count();
                    eq_len <= ins1.max(del1) && eq_len <= ins2.max(del2)
                }
                None => false,
            };
            if eliminate {
                let idx = *equalities.last().unwrap();
                let text = last_equality.take().unwrap();
                diffs.insert(idx, Diff { op: Op::Deleted, text });
                diffs[idx + 1].op = Op::Inserted;
                equalities.pop();
                equalities.pop();
                pointer = equalities.last().map(|&i| i as isize).unwrap_or(-1);
                ins1 = 0;
                del1 = 0;
                ins2 = 0;
                del2 = 0;
                changed = true;
            }
        }
        pointer += 1;
    }

    (diffs, changed)
}

/// Slides each interior `Unchanged` boundary toward whichever nearby split
/// point scores highest on [`semantic_score`], so an edit lands on a word
/// or line boundary instead of mid-token.
fn semantic_lossless(mut diffs: Vec<Diff>) -> Vec<Diff> {
    if diffs.len() < 3 {
        return diffs;
    }
    let mut pointer = 1usize;

    while pointer + 1 < diffs.len() {
        if diffs[pointer - 1].op == Op::Unchanged && diffs[pointer + 1].op == Op::Unchanged {
            let original_eq1: Vec<char> = diffs[pointer - 1].text.chars().collect();
            let mut equality1 = original_eq1.clone();
            let mut edit: Vec<char> = diffs[pointer].text.chars().collect();
            let mut equality2: Vec<char> = diffs[pointer + 1].text.chars().collect();

            let common_offset = common_suffix_chars(&equality1, &edit);
            if common_offset > 0 {
                let common: Vec<char> = edit[edit.len() - common_offset..].to_vec();
                equality1.truncate(equality1.len() - common_offset);
                let mut new_edit = common.clone();
                new_edit.extend_from_slice(&edit[..edit.len() - common_offset]);
                edit = new_edit;
                let mut new_eq2 = common;
                new_eq2.extend_from_slice(&equality2);
                equality2 = new_eq2;
            }

            let mut best_eq1 = equality1.clone();
            let mut best_edit = edit.clone();
            let mut best_eq2 = equality2.clone();
            let mut best_score = semantic_score(&equality1, &edit) + semantic_score(&edit, &equality2);

            while !edit.is_empty() && !equality2.is_empty() && edit[0] == equality2[0] {
                equality1.push(edit[0]);
                edit.remove(0);
                edit.push(equality2[0]);
                equality2.remove(0);
                let score = semantic_score(&equality1, &edit) + semantic_score(&edit, &equality2);
                if score >= best_score {
                    best_score = score;
                    best_eq1 = equality1.clone();
                    best_edit = edit.clone();
                    best_eq2 = equality2.clone();
                }
            }

            if best_eq1 != original_eq1 {
                let mut at = pointer;
                if best_eq1.is_empty() {
                    diffs.remove(at - 1);
                    at -= 1;
                } else {
                    diffs[at - 1].text = best_eq1.into_iter().collect();
                }
                diffs[at].text = best_edit.into_iter().collect();
                if best_eq2.is_empty() {
                    if at + 1 < diffs.len() {
                        diffs.remove(at + 1);
                    }
                } else if at + 1 < diffs.len() {
                    diffs[at + 1].text = best_eq2.into_iter().collect();
                }
                pointer = at;
            }
        }
        pointer += 1;
    }

    diffs
}

/// Folds a `Deleted` immediately followed by `Inserted` into an explicit
/// `Unchanged` wherever their text overlaps at the shared boundary by at
/// least half the shorter side's length — the overlap almost always means
/// the bisection core split a repeated run in the wrong place.
fn eliminate_overlaps(mut diffs: Vec<Diff>) -> Vec<Diff> {
    let mut pointer = 1usize;
    while pointer < diffs.len() {
        if diffs[pointer - 1].op == Op::Deleted && diffs[pointer].op == Op::Inserted {
            let deletion: Vec<char> = diffs[pointer - 1].text.chars().collect();
            let insertion: Vec<char> = diffs[pointer].text.chars().collect();
            let overlap1 = common_overlap(&deletion, &insertion);
            let overlap2 = common_overlap(&insertion, &deletion);

            if overlap1 >= overlap2 {
                if overlap1 * 2 >= deletion.len() || overlap1 * 2 >= insertion.len() {
                    let eq: String = insertion[..overlap1].iter().collect();
                    diffs[pointer - 1].text = deletion[..deletion.len() - overlap1].iter().collect();
                    let new_insert: String = insertion[overlap1..].iter().collect();
                    diffs.insert(pointer, Diff { op: Op::Unchanged, text: eq });
                    diffs[pointer + 1].text = new_insert;
                    pointer += 1;
                }
            } else if overlap2 * 2 >= deletion.len() || overlap2 * 2 >= insertion.len() {
                let eq: String = deletion[..overlap2].iter().collect();
                let new_insert: String = insertion[..insertion.len() - overlap2].iter().collect();
                let new_delete: String = deletion[overlap2..].iter().collect();
                diffs[pointer - 1] = Diff { op: Op::Inserted, text: new_insert };
                diffs[pointer] = Diff { op: Op::Deleted, text: new_delete };
                diffs.insert(pointer, Diff { op: Op::Unchanged, text: eq });
                pointer += 1;
            }
            pointer += 1;
        }
        pointer += 1;
    }
    diffs
}

fn common_suffix_chars(a: &[char], b: &[char]) -> usize {
    a.iter().rev().zip(b.iter().rev()).take_while(|(x, y)| x == y).count()
}

fn common_overlap(a: &[char], b: &[char]) -> usize {
    let (a_len, b_len) = (a.len(), b.len());
    if a_len == 0 || b_len == 0 {
        return 0;
    }
    let text1 = if a_len > b_len { &a[a_len - b_len..] } else { a };
    let text2 = if b_len > a_len { &b[..a_len] } else { b };
    let max_len = text1.len().min(text2.len());
    if text1 == text2 {
        return max_len;
    }
    let mut best = 0;
    for len in 1..=max_len {
        if text1[text1.len() - len..] == text2[..len] {
            best = len;
        }
    }
    best
}

/// Scores how good a boundary between `one` (ending here) and `two`
/// (starting here) is, from 0 (mid-word, worst) to 6 (empty side, best).
/// Mirrors `spec.md` §4.3.5's table: blank-line boundaries outrank line
/// breaks, which outrank word boundaries, which outrank a split inside a
/// run of alphanumerics.
pub(super) fn semantic_score(one: &[char], two: &[char]) -> u32 {
    if one.is_empty() || two.is_empty() {
        return 6;
    }
    let c1 = *one.last().unwrap();
    let c2 = two[0];
    let non_alnum1 = !c1.is_alphanumeric();
    let non_alnum2 = !c2.is_alphanumeric();
    let space1 = non_alnum1 && c1.is_whitespace();
    let space2 = non_alnum2 && c2.is_whitespace();
    let nl1 = space1 && (c1 == '\n' || c1 == '\r');
    let nl2 = space2 && (c2 == '\n' || c2 == '\r');
    let blank1 = nl1 && ends_with_blank_line(one);
    let blank2 = nl2 && starts_with_blank_line(two);

    if blank1 || blank2 {
        5
    } else if nl1 || nl2 {
        4
    } else if non_alnum1 && !space1 && space2 {
        3
    } else if space1 || space2 {
        2
    } else if non_alnum1 || non_alnum2 {
        1
    } else {
        0
    }
}

fn ends_with_blank_line(chars: &[char]) -> bool {
    let mut i = chars.len();
    if i >= 1 && chars[i - 1] == '\n' {
        i -= 1;
        if i >= 1 && chars[i - 1] == '\r' {
            i -= 1;
        }
    } else {
        return false;
    }
    let mut j = i;
    while j > 0 && chars[j - 1] != '\n' {
        if !chars[j - 1].is_whitespace() {
            return false;
        }
        j -= 1;
    }
    j > 0
}

fn starts_with_blank_line(chars: &[char]) -> bool {
    let mut i = 0;
    if i < chars.len() && chars[i] == '\r' {
        i += 1;
    }
    if i < chars.len() && chars[i] == '\n' {
        i += 1;
    } else {
        return false;
    }
    let mut j = i;
    while j < chars.len() && chars[j] != '\n' {
        if !chars[j].is_whitespace() {
            return false;
        }
        j += 1;
    }
    j < chars.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(op: Op, text: &str) -> Diff {
        Diff { op, text: text.to_string() }
    }

    #[test]
    fn eliminates_short_equality_between_large_edits() {
        let diffs = vec![
            d(Op::Deleted, "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA"),
            d(Op::Unchanged, "B"),
            d(Op::Inserted, "CCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCC"),
        ];
        let out = cleanup_semantic(diffs);
        assert!(out.iter().all(|d| d.op != Op::Unchanged));
    }

    #[test]
    fn leaves_genuinely_shared_equality_alone() {
        let diffs = vec![d(Op::Deleted, "ab"), d(Op::Unchanged, "cd"), d(Op::Inserted, "ef")];
        let out = cleanup_semantic(diffs.clone());
        assert!(out.iter().any(|d| d.op == Op::Unchanged));
    }

    #[test]
    fn overlap_becomes_explicit_equality() {
        let diffs = vec![d(Op::Deleted, "mississippi"), d(Op::Inserted, "ississippii")];
        let out = eliminate_overlaps(diffs);
        assert!(out.iter().any(|d| d.op == Op::Unchanged));
        let reconstructed_old: String =
            out.iter().filter(|d| d.op != Op::Inserted).map(|d| d.text.as_str()).collect();
        let reconstructed_new: String =
            out.iter().filter(|d| d.op != Op::Deleted).map(|d| d.text.as_str()).collect();
        assert_eq!(reconstructed_old, "mississippi");
        assert_eq!(reconstructed_new, "ississippii");
    }

    #[test]
    fn score_prefers_line_break_over_plain_space() {
        let nl = vec!['a', '\n'];
        let word = vec!['b'];
        let space = vec!['a', ' '];
        assert!(semantic_score(&nl, &word) > semantic_score(&space, &word));
    }

    #[test]
    fn score_is_maximal_at_empty_boundary() {
        assert_eq!(semantic_score(&[], &['x']), 6);
        assert_eq!(semantic_score(&['x'], &[]), 6);
    }
}
