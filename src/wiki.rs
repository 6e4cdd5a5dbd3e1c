//! Thin MediaWiki API client: plain-text extracts and parsed page HTML.
//!
//! Two endpoints cover everything the pipeline needs:
//!
//! * `action=query&prop=extracts&explaintext`: the article body as plain
//!   text with `== Heading ==` markers, i.e. exactly the sectionizer's input
//!   convention.
//! * `action=parse&prop=text`: the rendered page HTML, which is where the
//!   info-box lives.

use std::collections::HashMap;
use std::fmt;

use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::types::ScrapeError;

/// English Wikipedia API endpoint.
pub const DEFAULT_API_URL: &str = "https://en.wikipedia.org/w/api.php";

/// A page addressed either by its numeric id or by its title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRef {
    Id(u64),
    Title(String),
}

impl PageRef {
    pub fn title(title: impl Into<String>) -> Self {
        PageRef::Title(title.into())
    }

    /// Query parameter for the `action=query` endpoint.
    fn query_param(&self) -> (&'static str, String) {
        match self {
            PageRef::Id(id) => ("pageids", id.to_string()),
            PageRef::Title(title) => ("titles", title.clone()),
        }
    }

    /// Query parameter for the `action=parse` endpoint, which names its
    /// selectors differently.
    fn parse_param(&self) -> (&'static str, String) {
        match self {
            PageRef::Id(id) => ("pageid", id.to_string()),
            PageRef::Title(title) => ("page", title.clone()),
        }
    }
}

impl fmt::Display for PageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageRef::Id(id) => write!(f, "#{id}"),
            PageRef::Title(title) => f.write_str(title),
        }
    }
}

/// A fetched article: canonical id and title plus its plain-text body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikiPage {
    pub pageid: u64,
    pub title: String,
    pub content: String,
}

/// Client for a single MediaWiki API endpoint.
#[derive(Debug, Clone)]
pub struct WikiClient {
    client: Client,
    api: Url,
}

impl WikiClient {
    /// Client against the English Wikipedia.
    pub fn new(client: Client) -> Result<Self, ScrapeError> {
        Ok(Self::with_api(client, Url::parse(DEFAULT_API_URL)?))
    }

    /// Client against an arbitrary API endpoint (other wikis, mock servers).
    pub fn with_api(client: Client, api: Url) -> Self {
        Self { client, api }
    }

    /// Fetches the plain-text extract of a page.
    pub async fn page_content(&self, page: &PageRef) -> Result<WikiPage, ScrapeError> {
        let (key, value) = page.query_param();
        let response = self
            .client
            .get(self.api.clone())
            .query(&[
                ("action", "query"),
                ("prop", "extracts"),
                ("explaintext", "1"),
                ("redirects", "1"),
                ("format", "json"),
                (key, value.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: QueryResponse = response.json().await?;
        let pages = body
            .query
            .ok_or_else(|| ScrapeError::MalformedResponse("missing 'query' body".into()))?
            .pages;
        let node = pages
            .into_values()
            .next()
            .ok_or_else(|| unavailable(page, "no pages in response"))?;

        if node.missing.is_some() {
            return Err(unavailable(page, "page is missing"));
        }
        let Some(pageid) = node.pageid else {
            return Err(unavailable(page, "response carries no pageid"));
        };
        let Some(content) = node.extract else {
            return Err(unavailable(page, "no plain-text extract"));
        };

        Ok(WikiPage {
            pageid,
            title: node.title.unwrap_or_else(|| page.to_string()),
            content,
        })
    }

    /// Fetches the rendered HTML of a page.
    pub async fn page_html(&self, page: &PageRef) -> Result<String, ScrapeError> {
        let (key, value) = page.parse_param();
        let response = self
            .client
            .get(self.api.clone())
            .query(&[
                ("action", "parse"),
                ("prop", "text"),
                ("redirects", "1"),
                ("format", "json"),
                (key, value.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: ParseResponse = response.json().await?;
        let parse = body
            .parse
            .ok_or_else(|| unavailable(page, "no parse payload"))?;
        Ok(parse.text.content)
    }
}

fn unavailable(page: &PageRef, reason: &str) -> ScrapeError {
    ScrapeError::PageUnavailable {
        page: page.to_string(),
        reason: reason.to_string(),
    }
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    query: Option<QueryBody>,
}

#[derive(Debug, Deserialize)]
struct QueryBody {
    #[serde(default)]
    pages: HashMap<String, PageNode>,
}

#[derive(Debug, Deserialize)]
struct PageNode {
    pageid: Option<u64>,
    title: Option<String>,
    extract: Option<String>,
    missing: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ParseResponse {
    parse: Option<ParseBody>,
}

#[derive(Debug, Deserialize)]
struct ParseBody {
    text: ParseText,
}

#[derive(Debug, Deserialize)]
struct ParseText {
    #[serde(rename = "*")]
    content: String,
}
