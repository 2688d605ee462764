//! Patch/Revision transport format (`spec.md` §4.4): a per-edit record
//! (`Patch`) and an ordered list of them (`Revision`), with a delta
//! serializer/parser and an applier that walks the original text and
//! produces the new one.

use crate::codec;
use crate::error::{ApplyError, PatchParseError};
use crate::{Diff, Op};

/// A single patch operation: either a length (for `Unchanged`/`Deleted`,
/// which consume text without reproducing it) or a compressed insertion
/// payload (for `Inserted`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    /// What this patch does to the walk through the original text.
    pub op: Op,
    /// Number of Unicode scalar values this patch covers (`Unchanged`/
    /// `Deleted`) or contributes (`Inserted`).
    pub length: usize,
    /// The literal inserted text. `Some` only when `op == Op::Inserted`.
    pub text: Option<String>,
}

impl Patch {
    /// Builds the patch record for a single [`Diff`].
    pub fn from_diff(diff: &Diff) -> Patch {
        let length = diff.text.chars().count();
        match diff.op {
            Op::Inserted => Patch { op: Op::Inserted, length, text: Some(diff.text.clone()) },
            op => Patch { op, length, text: None },
        }
    }

    /// Serializes this patch to its delta token: `={len}`, `-{len}` or
    /// `+{compressed}`.
    pub fn to_token(&self) -> String {
        match self.op {
            Op::Unchanged => format!("={}", self.length),
            Op::Deleted => format!("-{}", self.length),
            Op::Inserted => format!("+{}", codec::compress(self.text.as_deref().unwrap_or(""))),
        }
    }

    /// Parses a single delta token produced by [`Patch::to_token`].
    pub fn parse(token: &str) -> Result<Patch, PatchParseError> {
        let mut chars = token.chars();
        let sigil = chars.next().unwrap_or('\0');
        let rest = chars.as_str();
        match sigil {
            '-' | '=' => {
                let length: usize =
                    rest.parse().map_err(|_| PatchParseError::InvalidLength(rest.to_string()))?;
                if length == 0 {
                    return Err(PatchParseError::InvalidLength(rest.to_string()));
                }
                let op = if sigil == '-' { Op::Deleted } else { Op::Unchanged };
                Ok(Patch { op, length, text: None })
            }
            '+' => {
                let text = codec::decompress(rest)?;
                let length = text.chars().count();
                Ok(Patch { op: Op::Inserted, length, text: Some(text) })
            }
            other => Err(PatchParseError::UnknownSigil(other)),
        }
    }
}

/// An ordered sequence of [`Patch`]es describing one edit from an old text
/// to a new one (`spec.md` §3/§4.4).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Revision {
    /// The patches, applied in order.
    pub patches: Vec<Patch>,
}

impl Revision {
    /// Builds a revision from an edit list, one patch per diff.
    pub fn from_diffs(diffs: &[Diff]) -> Revision {
        Revision { patches: diffs.iter().map(Patch::from_diff).collect() }
    }

    /// Parses a `\t`-joined delta string back into a revision. Empty
    /// tokens (two consecutive tabs) are ignored, per `spec.md` §6.
    pub fn parse(s: &str) -> Result<Revision, PatchParseError> {
        let patches = s
            .split('\t')
            .filter(|tok| !tok.is_empty())
            .map(Patch::parse)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Revision { patches })
    }

    /// Serializes back to the `\t`-joined delta string.
    pub fn to_delta(&self) -> String {
        self.patches.iter().map(Patch::to_token).collect::<Vec<_>>().join("\t")
    }

    /// Applies this revision to `text`: walks it by `Unchanged`/`Deleted`
    /// patch lengths and splices in `Inserted` text, producing the new
    /// text (`spec.md` §4.4).
    ///
    /// The tail-consuming bound check is `>`, not `>=`: a patch that
    /// exactly consumes the remaining text is accepted rather than
    /// spuriously rejected as an overrun (the documented fix from
    /// `spec.md` §9).
    #[tracing::instrument(level = "debug", skip(self, text), fields(patches = self.patches.len(), text_len = text.len()), err)]
    pub fn apply(&self, text: &str) -> Result<String, ApplyError> {
        let units: Vec<char> = text.chars().collect();
        let mut i = 0usize;
        let mut out = String::new();

        for patch in &self.patches {
            match patch.op {
                Op::Unchanged | Op::Deleted => {
                    if i + patch.length > units.len() {
                        return Err(ApplyError::Overrun {
                            offset: i,
                            length: patch.length,
                            remaining: units.len() - i,
                        });
                    }
                    if patch.op == Op::Unchanged {
                        out.extend(units[i..i + patch.length].iter());
                    }
                    i += patch.length;
                }
                Op::Inserted => out.push_str(patch.text.as_deref().unwrap_or("")),
            }
        }

        if i != units.len() {
            return Err(ApplyError::TrailingText { consumed: i, total: units.len() });
        }
        Ok(out)
    }
}

/// Applies `revisions` to `text` in order, aborting on the first failure
/// (`spec.md` §4.4's apply-sequence semantics).
#[tracing::instrument(level = "debug", skip(revisions, text), fields(revisions = revisions.len(), text_len = text.len()), err)]
pub fn apply_sequence(revisions: &[Revision], text: &str) -> Result<String, ApplyError> {
    let mut current = text.to_string();
    for revision in revisions {
        current = revision.apply(&current)?;
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::DiffOptions;

    fn d(op: Op, text: &str) -> Diff {
        Diff { op, text: text.to_string() }
    }

    #[test]
    fn round_trips_through_delta_string() {
        let diffs = vec![d(Op::Unchanged, "abc"), d(Op::Deleted, "xyz"), d(Op::Inserted, "123")];
        let revision = Revision::from_diffs(&diffs);
        let delta = revision.to_delta();
        let parsed = Revision::parse(&delta).unwrap();
        assert_eq!(parsed, revision);
    }

    #[test]
    fn apply_reconstructs_new_text() {
        let diffs = vec![d(Op::Unchanged, "Hello, "), d(Op::Deleted, "old"), d(Op::Inserted, "new"), d(Op::Unchanged, " world")];
        let revision = Revision::from_diffs(&diffs);
        assert_eq!(revision.apply("Hello, old world").unwrap(), "Hello, new world");
    }

    #[test]
    fn apply_accepts_a_patch_that_exactly_consumes_the_tail() {
        let diffs = vec![d(Op::Deleted, "abc")];
        let revision = Revision::from_diffs(&diffs);
        assert_eq!(revision.apply("abc").unwrap(), "");
    }

    #[test]
    fn apply_rejects_overrun() {
        let diffs = vec![d(Op::Unchanged, "abcdef")];
        let revision = Revision::from_diffs(&diffs);
        assert!(matches!(revision.apply("abc"), Err(ApplyError::Overrun { .. })));
    }

    #[test]
    fn apply_rejects_trailing_unconsumed_text() {
        let diffs = vec![d(Op::Unchanged, "ab")];
        let revision = Revision::from_diffs(&diffs);
        assert!(matches!(revision.apply("abcdef"), Err(ApplyError::TrailingText { .. })));
    }

    #[test]
    fn parse_ignores_consecutive_tabs() {
        let parsed = Revision::parse("=5\t\t-3").unwrap();
        assert_eq!(
            parsed,
            Revision {
                patches: vec![
                    Patch { op: Op::Unchanged, length: 5, text: None },
                    Patch { op: Op::Deleted, length: 3, text: None },
                ]
            }
        );
    }

    #[test]
    fn parse_rejects_unknown_sigil() {
        assert!(matches!(Patch::parse("?5"), Err(PatchParseError::UnknownSigil('?'))));
    }

    #[test]
    fn parse_rejects_non_positive_length() {
        assert!(matches!(Patch::parse("=0"), Err(PatchParseError::InvalidLength(_))));
        assert!(matches!(Patch::parse("-abc"), Err(PatchParseError::InvalidLength(_))));
    }

    #[test]
    fn apply_sequence_composes_revisions() {
        let opts = DiffOptions::default();
        let a = "one two three";
        let b = "one TWO three";
        let c = "one TWO three four";
        let r1 = Revision::from_diffs(&crate::engine::diff(a, b, &opts));
        let r2 = Revision::from_diffs(&crate::engine::diff(b, c, &opts));
        let result = apply_sequence(&[r1, r2], a).unwrap();
        assert_eq!(result, c);
    }

    #[test]
    fn apply_sequence_aborts_on_first_failure_without_needing_the_rest() {
        let bad = Revision { patches: vec![Patch { op: Op::Unchanged, length: 999, text: None }] };
        let second = Revision { patches: vec![Patch { op: Op::Deleted, length: 1, text: None }] };
        let err = apply_sequence(&[bad, second], "abc").unwrap_err();
        assert!(matches!(err, ApplyError::Overrun { .. }));
    }
}
