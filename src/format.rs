//! Renders an edit list as one of four textual formats (`spec.md` §4.5).

use crate::error::UnknownFormat;
use crate::patch::Patch;
use crate::{Diff, Op};

/// Output format for [`format`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// `={len}` / `+{compressed}` / `-{len}`, `\t`-separated. Same shape
    /// as [`crate::Revision::to_delta`].
    Delta,
    /// `"+ "{text}` / `"- "{text}` / `{text}`, newline-separated.
    Gnu,
    /// `++{text}++` / `~~{text}~~` / `{text}`, no separator.
    Md,
    /// `<span class="diff-inserted">…</span>` / `diff-deleted` / plain
    /// text, no separator.
    Html,
}

impl Format {
    /// Parses a format tag by name, for callers that take it as
    /// configuration (e.g. a CLI flag). Returns [`UnknownFormat`] for
    /// anything other than `delta`, `gnu`, `md` or `html`.
    pub fn parse(tag: &str) -> Result<Format, UnknownFormat> {
        match tag {
            "delta" => Ok(Format::Delta),
            "gnu" => Ok(Format::Gnu),
            "md" => Ok(Format::Md),
            "html" => Ok(Format::Html),
            other => Err(UnknownFormat(other.to_string())),
        }
    }
}

/// Renders `diffs` in the given format (`spec.md` §4.5/§6).
pub fn format(diffs: &[Diff], tag: Format) -> String {
    match tag {
        Format::Delta => diffs
            .iter()
            .map(|d| Patch::from_diff(d).to_token())
            .collect::<Vec<_>>()
            .join("\t"),
        Format::Gnu => diffs
            .iter()
            .map(|d| match d.op {
                Op::Inserted => format!("+ {}", d.text),
                Op::Deleted => format!("- {}", d.text),
                Op::Unchanged => d.text.clone(),
            })
            .collect::<Vec<_>>()
            .join("\n"),
        Format::Md => diffs
            .iter()
            .map(|d| match d.op {
                Op::Inserted => format!("++{}++", d.text),
                Op::Deleted => format!("~~{}~~", d.text),
                Op::Unchanged => d.text.clone(),
            })
            .collect(),
        Format::Html => diffs
            .iter()
            .map(|d| match d.op {
                Op::Inserted => format!(r#"<span class="diff-inserted">{}</span>"#, d.text),
                Op::Deleted => format!(r#"<span class="diff-deleted">{}</span>"#, d.text),
                Op::Unchanged => d.text.clone(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::expect;

    fn sample() -> Vec<Diff> {
        vec![
            Diff { op: Op::Unchanged, text: "Hello ".into() },
            Diff { op: Op::Deleted, text: "old".into() },
            Diff { op: Op::Inserted, text: "new".into() },
            Diff { op: Op::Unchanged, text: " world".into() },
        ]
    }

    #[test]
    fn gnu_format_prefixes_and_joins_with_newline() {
        expect!["Hello \n- old\n+ new\n world"].assert_eq(&format(&sample(), Format::Gnu));
    }

    #[test]
    fn md_format_wraps_without_separator() {
        expect!["Hello ~~old~~++new++ world"].assert_eq(&format(&sample(), Format::Md));
    }

    #[test]
    fn html_format_wraps_in_spans() {
        expect![[r#"Hello <span class="diff-deleted">old</span><span class="diff-inserted">new</span> world"#]]
            .assert_eq(&format(&sample(), Format::Html));
    }

    #[test]
    fn delta_format_matches_revision_to_delta() {
        let rendered = format(&sample(), Format::Delta);
        assert_eq!(rendered, crate::patch::Revision::from_diffs(&sample()).to_delta());
        let tokens: Vec<&str> = rendered.split('\t').collect();
        assert_eq!(tokens[0], "=6");
        assert_eq!(tokens[1], "-3");
        assert!(tokens[2].starts_with('+'));
        assert_eq!(tokens[3], "=6");
    }

    #[test]
    fn unknown_tag_is_rejected() {
        assert!(Format::parse("yaml").is_err());
        assert!(Format::parse("delta").is_ok());
    }

    #[test]
    fn every_diff_contributes_its_own_span_once() {
        let diffs = sample();
        let html = format(&diffs, Format::Html);
        for d in &diffs {
            let wrapped = match d.op {
                Op::Inserted => format!(r#"<span class="diff-inserted">{}</span>"#, d.text),
                Op::Deleted => format!(r#"<span class="diff-deleted">{}</span>"#, d.text),
                Op::Unchanged => d.text.clone(),
            };
            assert!(html.contains(&wrapped));
        }
    }
}
