//! `cleanup(diffs, edit_cost)` (`spec.md` §4.3.4): trades a few extra
//! bytes of payload for fewer total diffs by dissolving short equalities
//! that sit between edits on both sides — each diff costs roughly
//! `edit_cost` bytes of transport overhead, so an equality shorter than
//! that is cheaper to fold into its neighbors than to keep.

use super::merge;
use crate::{Diff, Op};

/// Runs the efficiency cleanup pass. `edit_cost` is the per-diff overhead
/// (`spec.md` §4.3.4); [`crate::options::DiffOptions::edit_cost`] defaults
/// to 4, matching the reference heuristic.
pub fn cleanup(diffs: Vec<Diff>, edit_cost: u32) -> Vec<Diff> {
    let mut diffs = diffs;
    let mut changed = false;
    let mut equalities: Vec<usize> = Vec::new();
    let mut last_equality: Option<String> = None;
    let (mut pre_ins, mut pre_del, mut post_ins, mut post_del) = (false, false, false, false);
    let mut pointer: isize = 0;

    while (pointer as usize) < diffs.len() {
        let p = pointer as usize;
        if diffs[p].op == Op::Unchanged {
            if (diffs[p].text.chars().count() as u32) < edit_cost && (post_ins || post_del) {
                equalities.push(p);
                pre_ins = post_ins;
                pre_del = post_del;
                last_equality = Some(diffs[p].text.clone());
            } else {
                equalities.clear();
                last_equality = None;
            }
            post_ins = false;
            post_del = false;
        } else {
            if diffs[p].op == Op::Deleted {
                post_del = true;
            } else {
                post_ins = true;
            }

            let flag_count = [pre_ins, pre_del, post_ins, post_del].iter().filter(|b| **b).count();
            let dissolve = match &last_equality {
                Some(eq) => {
                    (pre_ins && pre_del && post_ins && post_del)
                        || ((eq.chars().count() as u32) < edit_cost / 2 && flag_count == 3)
                }
                None => false,
            };

            if dissolve {
                let idx = *equalities.last().unwrap();
                let text = last_equality.take().unwrap();
                diffs.insert(idx, Diff { op: Op::Deleted, text });
                diffs[idx + 1].op = Op::Inserted;
                equalities.pop();
                changed = true;

                if pre_ins && pre_del {
                    post_ins = true;
                    post_del = true;
                    equalities.clear();
                } else {
                    equalities.pop();
                    pointer = equalities.last().map(|&i| i as isize).unwrap_or(-1);
                    post_ins = false;
                    post_del = false;
                }
                last_equality = None;
            }
        }
        pointer += 1;
    }

    if changed {
        merge::merge(diffs)
    } else {
        diffs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(op: Op, text: &str) -> Diff {
        Diff { op, text: text.to_string() }
    }

    #[test]
    fn dissolves_equality_flanked_by_edits_on_both_sides() {
        let diffs = vec![
            d(Op::Deleted, "x"),
            d(Op::Unchanged, "12"),
            d(Op::Inserted, "xyz"),
            d(Op::Unchanged, "34"),
            d(Op::Deleted, "y"),
        ];
        let out = cleanup(diffs, 4);
        assert!(out.iter().all(|d| d.op != Op::Unchanged));
    }

    #[test]
    fn leaves_long_equality_alone() {
        let diffs = vec![
            d(Op::Deleted, "x"),
            d(Op::Unchanged, "this is a long shared run of text"),
            d(Op::Inserted, "y"),
        ];
        let out = cleanup(diffs, 4);
        assert!(out.iter().any(|d| d.op == Op::Unchanged));
    }

    #[test]
    fn reconstruction_preserved() {
        let diffs = vec![
            d(Op::Deleted, "x"),
            d(Op::Unchanged, "12"),
            d(Op::Inserted, "xyz"),
            d(Op::Unchanged, "34"),
            d(Op::Deleted, "y"),
        ];
        let old: String = diffs.iter().filter(|d| d.op != Op::Inserted).map(|d| d.text.as_str()).collect();
        let new: String = diffs.iter().filter(|d| d.op != Op::Deleted).map(|d| d.text.as_str()).collect();
        let out = cleanup(diffs, 4);
        let old2: String = out.iter().filter(|d| d.op != Op::Inserted).map(|d| d.text.as_str()).collect();
        let new2: String = out.iter().filter(|d| d.op != Op::Deleted).map(|d| d.text.as_str()).collect();
        assert_eq!(old, old2);
        assert_eq!(new, new2);
    }
}
