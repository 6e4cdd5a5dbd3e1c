//! Walks Wikipedia category pages to enumerate conflict page ids.
//!
//! The century categories link to `Category:Conflicts_in_XXXX` subcategories,
//! one per year, and each of those lists the individual conflict pages. Both
//! levels render their members the same way, so a single extraction pass
//! handles them: anchors inside `div.mw-category`, or `div#mw-pages` on pages
//! that lack the former.

use reqwest::Client;
use scraper::{Html, Selector};
use url::Url;

use crate::types::ScrapeError;

/// Conflicts of 1901–2000, one subcategory per year.
pub const TWENTIETH_CENTURY_CATEGORY: &str = "Category:20th-century_conflicts_by_year";

/// Conflicts of 2001 onwards, one subcategory per year.
pub const TWENTY_FIRST_CENTURY_CATEGORY: &str = "Category:21st-century_conflicts_by_year";

/// Base of the article URL space (`<base>/wiki/<page>`).
pub const DEFAULT_WIKI_BASE: &str = "https://en.wikipedia.org/";

/// Fetches category pages and extracts their member ids.
#[derive(Debug, Clone)]
pub struct CategoryCrawler {
    client: Client,
    base: Url,
}

impl CategoryCrawler {
    /// Crawler rooted at the English Wikipedia.
    pub fn new(client: Client) -> Result<Self, ScrapeError> {
        Ok(Self::with_base(client, Url::parse(DEFAULT_WIKI_BASE)?))
    }

    /// Crawler rooted at an arbitrary wiki base (mirrors, mock servers).
    pub fn with_base(client: Client, base: Url) -> Self {
        Self { client, base }
    }

    /// Page ids of every member of `category`.
    ///
    /// Members may themselves be categories; the caller decides whether to
    /// recurse.
    pub async fn member_ids(&self, category: &str) -> Result<Vec<String>, ScrapeError> {
        let url = self.page_url(category)?;
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        extract_category_members(&body)
    }

    fn page_url(&self, page: &str) -> Result<Url, ScrapeError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ScrapeError::CannotBeBase(self.base.to_string()))?
            .pop_if_empty()
            .push("wiki")
            .push(page.trim());
        Ok(url)
    }
}

/// Pulls member page ids out of a rendered category page.
///
/// Each member anchor's `href` has the form `/wiki/<id>`; the id is the last
/// path segment.
pub fn extract_category_members(html: &str) -> Result<Vec<String>, ScrapeError> {
    let document = Html::parse_document(html);
    let primary = selector("div.mw-category a[href]")?;
    let fallback = selector("div#mw-pages a[href]")?;

    let mut anchors: Vec<_> = document.select(&primary).collect();
    if anchors.is_empty() {
        anchors = document.select(&fallback).collect();
    }

    let mut members = Vec::new();
    for anchor in anchors {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if let Some(id) = href.rsplit('/').next() {
            if !id.is_empty() {
                members.push(id.to_string());
            }
        }
    }
    Ok(members)
}

/// Pulls war titles out of a "List of wars ..." era page.
///
/// Each `table.wikitable` row names the war in its third column; defunct
/// entries link to "page does not exist" stubs and are skipped.
pub fn extract_war_titles(html: &str) -> Result<Vec<String>, ScrapeError> {
    let document = Html::parse_document(html);
    let rows = selector("table.wikitable tr")?;
    let cells = selector("td")?;
    let links = selector("a[title]")?;

    let mut titles = Vec::new();
    for row in document.select(&rows) {
        let entries: Vec<_> = row.select(&cells).collect();
        if entries.len() < 3 {
            continue;
        }
        let Some(anchor) = entries[2].select(&links).next() else {
            continue;
        };
        let Some(title) = anchor.value().attr("title") else {
            continue;
        };
        if !title.contains("page does not exist") {
            titles.push(title.to_string());
        }
    }
    Ok(titles)
}

fn selector(expr: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(expr).map_err(|err| ScrapeError::Selector(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn members_come_from_mw_category_blocks() {
        let html = r#"
            <div class="mw-category">
                <ul>
                    <li><a href="/wiki/Category:Conflicts_in_1901">Conflicts in 1901</a></li>
                    <li><a href="/wiki/Category:Conflicts_in_1902">Conflicts in 1902</a></li>
                </ul>
            </div>"#;
        let members = extract_category_members(html).unwrap();
        assert_eq!(
            members,
            ["Category:Conflicts_in_1901", "Category:Conflicts_in_1902"]
        );
    }

    #[test]
    fn falls_back_to_mw_pages_block() {
        let html = r#"
            <div id="mw-pages">
                <a href="/wiki/Winter_War">Winter War</a>
                <a href="/wiki/Boxer_Rebellion">Boxer Rebellion</a>
            </div>"#;
        let members = extract_category_members(html).unwrap();
        assert_eq!(members, ["Winter_War", "Boxer_Rebellion"]);
    }

    #[test]
    fn page_without_member_blocks_yields_nothing() {
        let members = extract_category_members("<p>Nothing here.</p>").unwrap();
        assert!(members.is_empty());
    }

    #[test]
    fn war_titles_come_from_the_third_column() {
        let html = r#"
            <table class="wikitable">
                <tr><th>Start</th><th>End</th><th>War</th></tr>
                <tr>
                    <td>1904</td><td>1905</td>
                    <td><a href="/wiki/Russo-Japanese_War" title="Russo-Japanese War">Russo-Japanese War</a></td>
                </tr>
                <tr>
                    <td>1911</td><td>1912</td>
                    <td><a href="/w/index.php" title="Forgotten War (page does not exist)">Forgotten War</a></td>
                </tr>
                <tr><td>lonely row</td></tr>
            </table>"#;
        let titles = extract_war_titles(html).unwrap();
        assert_eq!(titles, ["Russo-Japanese War"]);
    }
}
