//! The Myers `O((N+M)D)` bisection core (`spec.md` §4.3): forward and
//! reverse greedy diagonal extension that meets in the middle, splitting
//! the problem into two independent halves at the overlap point.
//!
//! This is the "one D-loop per `diff_bisect` call" shape described
//! directly in `spec.md` — `v1`/`v2` are freshly sized per call and the
//! recursion happens by splitting the two input slices and calling back
//! into [`crate::engine::diff_units`], rather than mutating shared
//! diagonal arrays across the whole recursive run.

use super::{diff_units, RawEdit};
use crate::options::DiffOptions;
use crate::Op;

/// Runs the bisection search on `a`/`b` and returns the concatenation of
/// the two independently diffed halves found at the overlap point. Bails
/// out to a flat `[Deleted(a), Inserted(b)]` if `opts` has a deadline and
/// it passes before an overlap is found.
pub(super) fn diff_bisect(a: &[u32], b: &[u32], opts: &DiffOptions, is_char_level: bool) -> Vec<RawEdit> {
    let (n, m) = (a.len(), b.len());
    let max_d = ((n + m + 1) / 2) as i64;
    let v_offset = max_d;
    let v_len = 2 * max_d + 1;

    let mut v1 = vec![-1i64; v_len as usize];
    let mut v2 = vec![-1i64; v_len as usize];
    v1[(v_offset + 1) as usize] = 0;
    v2[(v_offset + 1) as usize] = 0;

    let delta = n as i64 - m as i64;
    let front = delta % 2 != 0;

    let (mut k1start, mut k1end) = (0i64, 0i64);
    let (mut k2start, mut k2end) = (0i64, 0i64);

    for d in 0..max_d {
        if opts.expired() {
            break;
        }

        // Forward path.
        let mut k1 = -d + k1start;
        while k1 <= d - k1end {
            let k1_offset = (v_offset + k1) as usize;
            let mut x1 = if k1 == -d
                || (k1 != d && v1[k1_offset - 1] < v1[k1_offset + 1])
            {
                v1[k1_offset + 1]
            } else {
                v1[k1_offset - 1] + 1
            };
            let mut y1 = x1 - k1;
            while x1 < n as i64 && y1 < m as i64 && a[x1 as usize] as i64 == b[y1 as usize] as i64 {
                x1 += 1;
                y1 += 1;
            }
            v1[k1_offset] = x1;
            if x1 > n as i64 {
                k1end += 2;
            } else if y1 > m as i64 {
                k1start += 2;
            } else if front {
                let k2_offset = v_offset + delta - k1;
                if (0..v_len).contains(&k2_offset) && v2[k2_offset as usize] != -1 {
                    let x2 = n as i64 - v2[k2_offset as usize];
                    if x1 >= x2 {
                        return split(a, b, x1 as usize, y1 as usize, opts, is_char_level);
                    }
                }
            }
            k1 += 2;
        }

        // Reverse path.
        let mut k2 = -d + k2start;
        while k2 <= d - k2end {
            let k2_offset = (v_offset + k2) as usize;
            let mut x2 = if k2 == -d
                || (k2 != d && v2[k2_offset - 1] < v2[k2_offset + 1])
            {
                v2[k2_offset + 1]
            } else {
                v2[k2_offset - 1] + 1
            };
            let mut y2 = x2 - k2;
            while x2 < n as i64
                && y2 < m as i64
                && a[n - 1 - x2 as usize] as i64 == b[m - 1 - y2 as usize] as i64
            {
                x2 += 1;
                y2 += 1;
            }
            v2[k2_offset] = x2;
            if x2 > n as i64 {
                k2end += 2;
            } else if y2 > m as i64 {
                k2start += 2;
            } else if !front {
                let k1_offset = v_offset + delta - k2;
                if (0..v_len).contains(&k1_offset) && v1[k1_offset as usize] != -1 {
                    let x1 = v1[k1_offset as usize];
                    let y1 = v_offset + x1 - k1_offset;
                    let x2_fwd = n as i64 - x2;
                    if x1 >= x2_fwd {
                        return split(a, b, x1 as usize, y1 as usize, opts, is_char_level);
                    }
                }
            }
            k2 += 2;
        }
    }

    // No snake found within the edit-distance bound (or the deadline
    // passed): fall through to a flat deletion followed by an insertion.
    vec![
        RawEdit { op: Op::Deleted, units: a.to_vec() },
        RawEdit { op: Op::Inserted, units: b.to_vec() },
    ]
}

fn split(
    a: &[u32],
    b: &[u32],
    x: usize,
    y: usize,
    opts: &DiffOptions,
    is_char_level: bool,
) -> Vec<RawEdit> {
    let mut left = diff_units(&a[..x], &b[..y], opts, is_char_level, false);
    let right = diff_units(&a[x..], &b[y..], opts, is_char_level, false);
    left.extend(right);
    left
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::DiffOptions;

    fn units(s: &str) -> Vec<u32> {
        s.chars().map(|c| c as u32).collect()
    }

    fn render(edits: &[RawEdit]) -> String {
        edits
            .iter()
            .map(|e| {
                let text: String = e.units.iter().map(|&u| char::from_u32(u).unwrap()).collect();
                match e.op {
                    Op::Unchanged => format!("={text}"),
                    Op::Deleted => format!("-{text}"),
                    Op::Inserted => format!("+{text}"),
                }
            })
            .collect::<Vec<_>>()
            .join("|")
    }

    #[test]
    fn finds_minimal_split_for_disjoint_strings() {
        let a = units("abcdef");
        let b = units("abXYef");
        let opts = DiffOptions::default();
        let edits = diff_bisect(&a, &b, &opts, true);
        // Whatever the exact split, the edits must round-trip to a and b.
        let old: String = edits
            .iter()
            .filter(|e| e.op != Op::Inserted)
            .flat_map(|e| e.units.iter())
            .map(|&u| char::from_u32(u).unwrap())
            .collect();
        let new: String = edits
            .iter()
            .filter(|e| e.op != Op::Deleted)
            .flat_map(|e| e.units.iter())
            .map(|&u| char::from_u32(u).unwrap())
            .collect();
        assert_eq!(old, "abcdef");
        assert_eq!(new, "abXYef");
        let _ = render(&edits);
    }
}
