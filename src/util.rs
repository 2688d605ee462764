//! Common-affix scans over unit sequences, shared by the top-level prefix/
//! suffix peel in [`crate::engine::diff`] and the half-match shortcut.

/// Length of the common prefix of two unit sequences.
pub fn common_prefix(a: &[u32], b: &[u32]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

/// Length of the common suffix of two unit sequences.
pub fn common_suffix(a: &[u32], b: &[u32]) -> usize {
    a.iter().rev().zip(b.iter().rev()).take_while(|(x, y)| x == y).count()
}
