//! Extracts the conflict info-box ("vevent" table) from rendered page HTML.
//!
//! The info-box carries the structured metadata worth keeping next to the
//! article body: belligerents, dates, casualties. It is rendered as a
//! `table.vevent`; not every conflict has one.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

use crate::types::ScrapeError;

/// Keeps lines that carry real content: non-blank after trimming and not
/// opening with reference/markup debris (brackets, commas, hyphens, the `c`
/// of citation stubs).
static INFORMATIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\-c()\[\],]").expect("hard-coded regex"));

/// Returns the info-box of a page as filtered plain text, or `None` when the
/// page has no `vevent` table.
pub fn extract_infobox(html: &str) -> Result<Option<String>, ScrapeError> {
    let document = Html::parse_document(html);
    let table = Selector::parse("table.vevent")
        .map_err(|err| ScrapeError::Selector(err.to_string()))?;

    let Some(infobox) = document.select(&table).next() else {
        return Ok(None);
    };

    let lines: Vec<&str> = infobox
        .text()
        .flat_map(|fragment| fragment.lines())
        .map(str::trim)
        .filter(|line| informative(line))
        .collect();

    Ok(Some(lines.join("\n")))
}

fn informative(line: &str) -> bool {
    !line.is_empty() && INFORMATIVE.is_match(line)
}
