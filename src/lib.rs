#![deny(missing_docs)]
//! A strict, non-fuzzy textual diff/patch/revision engine.
//!
//! Given two texts, [`diff`] computes a minimal (or near-minimal, under a
//! deadline) edit script using Myers' `O((N+M)D)` algorithm with the usual
//! common-affix peeling, substring and half-match shortcuts, then cleans
//! it up in two passes: a semantic pass that favors edits a human would
//! recognize as one change, and an efficiency pass that dissolves
//! equalities too short to be worth a separate diff entry. [`word_diff`]
//! does the same at word granularity with character-level refinement of
//! each changed span.
//!
//! The edit script ([`Diff`]) can be applied directly ([`apply_new`],
//! [`apply_old`]), or turned into a compact transport form ([`Revision`])
//! that serializes to and parses from a single-line delta string and can
//! be replayed against the original text ([`Revision::apply`],
//! [`apply_sequence`]). [`format`] renders an edit script for human
//! consumption instead (`gnu`, `md` or `html`).
//!
//! ```
//! use verbatim_diff::{diff, apply_new, apply_old};
//!
//! let diffs = diff("the quick fox", "the slow fox");
//! assert_eq!(apply_new(&diffs), "the slow fox");
//! assert_eq!(apply_old(&diffs), "the quick fox");
//! ```
//!
//! # Determinism and deadlines
//!
//! With a default [`DiffOptions`], `diff`/`word_diff` always return a
//! minimal edit script; there is no global timeout to race against.
//! [`DiffOptions::with_timeout`] trades that guarantee for a bound on
//! wall-clock time: past the deadline, the bisection core falls back to a
//! flat deletion-then-insertion for whatever span it was still searching,
//! which is always a valid (if non-minimal) script.

mod codec;
mod engine;
mod error;
mod format;
mod intern;
mod options;
mod patch;
mod util;

pub use error::{ApplyError, CodecError, PatchParseError, UnknownFormat};
pub use format::Format;
pub use options::DiffOptions;
pub use patch::{apply_sequence, Patch, Revision};

/// What a single [`Diff`] did to get from the old text to the new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// Present, unchanged, in both texts.
    Unchanged,
    /// Present only in the old text.
    Deleted,
    /// Present only in the new text.
    Inserted,
}

/// One span of an edit script: a contiguous run of text and what happened
/// to it (`spec.md` §3). An edit script is a `Vec<Diff>` with no two
/// adjacent diffs sharing an `op` and no diff holding empty `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diff {
    /// What this span of text did between the old and new text.
    pub op: Op,
    /// The literal text of this span, taken from whichever side(s) it
    /// appears in (identical in both for `Unchanged`).
    pub text: String,
}

/// Computes a minimal edit script turning `a` into `b`, at character
/// granularity, using [`DiffOptions::default`].
#[tracing::instrument(level = "debug", skip(a, b), fields(a_len = a.len(), b_len = b.len()))]
pub fn diff(a: &str, b: &str) -> Vec<Diff> {
    engine::diff(a, b, &DiffOptions::default())
}

/// Same as [`diff`], with explicit [`DiffOptions`] (e.g. a wall-clock
/// deadline via [`DiffOptions::with_timeout`]).
#[tracing::instrument(level = "debug", skip(a, b, opts), fields(a_len = a.len(), b_len = b.len()))]
pub fn diff_with_options(a: &str, b: &str, opts: &DiffOptions) -> Vec<Diff> {
    engine::diff(a, b, opts)
}

/// Computes an edit script at word granularity: whole words/whitespace
/// runs are the unit of comparison, with each changed span subsequently
/// refined to character-level detail.
#[tracing::instrument(level = "debug", skip(a, b), fields(a_len = a.len(), b_len = b.len()))]
pub fn word_diff(a: &str, b: &str) -> Vec<Diff> {
    engine::word_diff(a, b, &DiffOptions::default())
}

/// Reconstructs the new text from an edit script: the concatenation of
/// every non-`Deleted` span.
pub fn apply_new(diffs: &[Diff]) -> String {
    diffs.iter().filter(|d| d.op != Op::Deleted).map(|d| d.text.as_str()).collect()
}

/// Reconstructs the old text from an edit script: the concatenation of
/// every non-`Inserted` span.
pub fn apply_old(diffs: &[Diff]) -> String {
    diffs.iter().filter(|d| d.op != Op::Inserted).map(|d| d.text.as_str()).collect()
}

/// Computes the edit script for `a` -> `b` and packages it as a
/// [`Revision`], using [`DiffOptions::default`].
pub fn revision(a: &str, b: &str) -> Revision {
    Revision::from_diffs(&diff(a, b))
}

/// Same as [`revision`], with explicit [`DiffOptions`].
pub fn revision_with_options(a: &str, b: &str, opts: &DiffOptions) -> Revision {
    Revision::from_diffs(&diff_with_options(a, b, opts))
}

/// Renders `diffs` in the given [`Format`] (`spec.md` §4.5).
pub fn format(diffs: &[Diff], tag: Format) -> String {
    format::format(diffs, tag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn reconstructs_both_sides() {
        let a = "The quick brown fox jumps over the lazy dog.";
        let b = "The slow brown fox leaps over a lazy dog, barking.";
        let diffs = diff(a, b);
        assert_eq!(apply_new(&diffs), b);
        assert_eq!(apply_old(&diffs), a);
    }

    #[test]
    fn revision_round_trips_and_applies() {
        let a = "alpha beta gamma";
        let b = "alpha BETA gamma delta";
        let rev = revision(a, b);
        let delta = rev.to_delta();
        let parsed = Revision::parse(&delta).unwrap();
        assert_eq!(parsed.apply(a).unwrap(), b);
    }

    #[test]
    fn word_diff_is_refined_to_character_level() {
        let diffs = word_diff("the cats meow", "the cat meows");
        assert_eq!(apply_new(&diffs), "the cat meows");
        assert_eq!(apply_old(&diffs), "the cats meow");
        assert!(diffs.len() > 2, "word-level diff with a one-letter change should refine below whole words");
    }

    #[test]
    fn no_op_produces_unchanged_or_empty_script() {
        assert_eq!(
            diff("same text", "same text"),
            vec![Diff { op: Op::Unchanged, text: "same text".into() }]
        );
        assert_eq!(diff("", ""), vec![]);
    }

    proptest! {
        #[test]
        fn reconstruction_holds_for_arbitrary_ascii(a in "[a-zA-Z0-9 .,\n]{0,120}", b in "[a-zA-Z0-9 .,\n]{0,120}") {
            let diffs = diff(&a, &b);
            prop_assert_eq!(apply_new(&diffs), b);
            prop_assert_eq!(apply_old(&diffs), a);
        }

        #[test]
        fn revision_round_trip_holds_for_arbitrary_ascii(a in "[a-zA-Z0-9 .,\n]{0,120}", b in "[a-zA-Z0-9 .,\n]{0,120}") {
            let rev = revision(&a, &b);
            let parsed = Revision::parse(&rev.to_delta()).unwrap();
            prop_assert_eq!(parsed.apply(&a).unwrap(), b);
        }

        #[test]
        fn normal_form_has_no_adjacent_same_op_and_no_empty_text(a in "[a-zA-Z0-9 ]{0,60}", b in "[a-zA-Z0-9 ]{0,60}") {
            let diffs = diff(&a, &b);
            for d in &diffs {
                prop_assert!(!d.text.is_empty());
            }
            for pair in diffs.windows(2) {
                prop_assert_ne!(pair[0].op, pair[1].op);
            }
        }
    }
}
