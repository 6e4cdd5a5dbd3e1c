//! The sectionizer: raw article text in, ordered title/section document out.
//!
//! Wikipedia plain-text extracts mark section headers with `=` runs:
//!
//! ```text
//! == History ==
//! === Early period ===
//! ```
//!
//! Header depth is ignored: every header opens a new flat [`Section`]. The
//! body before the first header always becomes the implicit `"Introduction"`
//! section, so a document has at least one section even for empty input.
//!
//! The transformation is pure and total: any string, including the empty one,
//! produces a valid [`Document`]. Malformed header lines (a bare `=`) simply
//! yield an empty heading, never an error.

use serde::{Deserialize, Serialize};

/// Heading assigned to the body before the first explicit header.
pub const INTRODUCTION_HEADING: &str = "Introduction";

/// Character that opens a MediaWiki-style header line.
pub const HEADING_MARKER: char = '=';

/// What happens to line terminators in section text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEndings {
    /// Keep each line's terminator, so concatenating the section texts
    /// reconstructs the input minus its header lines.
    #[default]
    Preserve,
    /// Drop terminators and rejoin lines with a single `\n` (no trailing
    /// newline).
    Strip,
}

/// One titled slice of an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Header text with surrounding `=` markers and whitespace removed;
    /// `"Introduction"` for the implicit first section.
    pub heading: String,
    /// Every line between this header and the next, header lines excluded.
    pub text: String,
}

/// An article split into ordered sections.
///
/// `title` is supplied by the caller and never derived from the content.
/// Section order matches the order headers appear in the source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub title: Option<String>,
    pub sections: Vec<Section>,
}

impl Document {
    /// Sectionizes `raw` with the default [`LineEndings::Preserve`] policy.
    pub fn from_text(raw: &str, title: Option<String>) -> Self {
        Self::from_text_with(raw, title, LineEndings::default())
    }

    /// Sectionizes `raw` line by line.
    ///
    /// A line is a header iff it starts with [`HEADING_MARKER`]. Each header
    /// closes the section accumulated so far and opens a new one named by
    /// [`trim_heading`]. The final open section is always flushed, so the
    /// result holds exactly one section per header line, plus one.
    pub fn from_text_with(raw: &str, title: Option<String>, endings: LineEndings) -> Self {
        let mut sections = Vec::new();
        let mut heading = INTRODUCTION_HEADING.to_string();
        let mut buffer: Vec<&str> = Vec::new();

        let lines: Vec<&str> = match endings {
            LineEndings::Preserve => raw.split_inclusive('\n').collect(),
            LineEndings::Strip => raw.lines().collect(),
        };

        for line in lines {
            if line.starts_with(HEADING_MARKER) {
                sections.push(Section {
                    heading: std::mem::replace(&mut heading, trim_heading(line)),
                    text: join_lines(&buffer, endings),
                });
                buffer.clear();
            } else {
                buffer.push(line);
            }
        }

        // The last section is never closed by a following header.
        sections.push(Section {
            heading,
            text: join_lines(&buffer, endings),
        });

        Document { title, sections }
    }
}

/// Extracts the heading from a header line: strips `=` runs from both ends,
/// then surrounding whitespace. Interior `=` characters are preserved, so
/// `"== E = mc2 =="` trims to `"E = mc2"` rather than losing the sign.
pub fn trim_heading(line: &str) -> String {
    line.trim()
        .trim_matches(HEADING_MARKER)
        .trim()
        .to_string()
}

fn join_lines(lines: &[&str], endings: LineEndings) -> String {
    match endings {
        LineEndings::Preserve => lines.concat(),
        LineEndings::Strip => lines.join("\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn no_headers_yields_single_introduction() {
        let raw = "First line.\nSecond line.\n";
        let doc = Document::from_text(raw, None);
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].heading, INTRODUCTION_HEADING);
        assert_eq!(doc.sections[0].text, raw);
    }

    #[test]
    fn empty_input_yields_empty_introduction() {
        let doc = Document::from_text("", Some("Anything".into()));
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].heading, INTRODUCTION_HEADING);
        assert_eq!(doc.sections[0].text, "");
    }

    #[test]
    fn heading_markers_and_whitespace_are_trimmed() {
        let doc = Document::from_text("== History ==\n", None);
        assert_eq!(doc.sections.len(), 2);
        assert_eq!(doc.sections[1].heading, "History");
        assert_eq!(doc.sections[1].text, "");
    }

    #[test]
    fn interior_equals_sign_survives_trimming() {
        assert_eq!(trim_heading("== E = mc2 ==\n"), "E = mc2");
    }

    #[test]
    fn bare_marker_line_is_a_header_with_empty_heading() {
        let doc = Document::from_text("intro\n=\ntail\n", None);
        assert_eq!(doc.sections.len(), 2);
        assert_eq!(doc.sections[1].heading, "");
        assert_eq!(doc.sections[1].text, "tail\n");
    }

    #[test]
    fn trailing_section_after_last_header_is_emitted() {
        let doc = Document::from_text("== Aftermath ==\nlast line", None);
        assert_eq!(doc.sections.len(), 2);
        assert_eq!(doc.sections[1].heading, "Aftermath");
        assert_eq!(doc.sections[1].text, "last line");
    }

    #[test]
    fn section_order_matches_source_order() {
        let raw = "a\n== One ==\nb\n=== Two ===\nc\n== Three ==\nd\n";
        let doc = Document::from_text(raw, None);
        let headings: Vec<&str> = doc.sections.iter().map(|s| s.heading.as_str()).collect();
        assert_eq!(headings, [INTRODUCTION_HEADING, "One", "Two", "Three"]);
    }

    #[test]
    fn strip_policy_rejoins_without_terminators() {
        let doc = Document::from_text_with(
            "a\nb\n== H ==\nc\n",
            None,
            LineEndings::Strip,
        );
        assert_eq!(doc.sections.len(), 2);
        assert_eq!(doc.sections[0].text, "a\nb");
        assert_eq!(doc.sections[1].text, "c");
    }

    #[test]
    fn serializes_to_the_documented_shape() {
        let raw = "Intro line.\n== Background ==\nSome text.\n== Aftermath ==\nMore text.\n";
        let doc = Document::from_text(raw, Some("Test War".into()));
        assert_eq!(
            serde_json::to_value(&doc).unwrap(),
            json!({
                "title": "Test War",
                "sections": [
                    { "heading": "Introduction", "text": "Intro line.\n" },
                    { "heading": "Background", "text": "Some text.\n" },
                    { "heading": "Aftermath", "text": "More text.\n" },
                ],
            })
        );
    }

    #[test]
    fn missing_title_serializes_as_null() {
        let value = serde_json::to_value(Document::from_text("", None)).unwrap();
        assert!(value["title"].is_null());
    }

    /// Multi-line inputs where roughly a third of the lines are headers.
    fn raw_text() -> impl Strategy<Value = String> {
        let line = prop_oneof![
            2 => "[ a-z.]{0,12}",
            1 => "={1,3}[ a-zA-Z=]{0,10}",
        ];
        (prop::collection::vec(line, 0..16), any::<bool>()).prop_map(
            |(lines, trailing_newline)| {
                let mut raw = lines.join("\n");
                if trailing_newline && !raw.is_empty() {
                    raw.push('\n');
                }
                raw
            },
        )
    }

    proptest! {
        #[test]
        fn section_count_is_header_count_plus_one(raw in raw_text()) {
            let headers = raw
                .split_inclusive('\n')
                .filter(|line| line.starts_with(HEADING_MARKER))
                .count();
            let doc = Document::from_text(&raw, None);
            prop_assert_eq!(doc.sections.len(), headers + 1);
        }

        #[test]
        fn concatenated_texts_reconstruct_input_minus_headers(raw in raw_text()) {
            let expected: String = raw
                .split_inclusive('\n')
                .filter(|line| !line.starts_with(HEADING_MARKER))
                .collect();
            let doc = Document::from_text(&raw, None);
            let rebuilt: String = doc.sections.iter().map(|s| s.text.as_str()).collect();
            prop_assert_eq!(rebuilt, expected);
        }
    }
}
