//! Shared error type for the harvesting pipeline.

use thiserror::Error;

/// Errors surfaced by the fetching, parsing, and persistence layers.
///
/// The sectionizer itself is total over its input and never produces one of
/// these; everything here comes from obtaining input (network, disk) or from
/// responses that do not match the MediaWiki API's documented shape.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("file operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON (de)serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// A base URL that cannot carry path segments (e.g. `mailto:`).
    #[error("URL cannot be a base: {0}")]
    CannotBeBase(String),

    #[error("invalid selector: {0}")]
    Selector(String),

    /// The requested page does not exist or carries no usable payload.
    #[error("page '{page}' unavailable: {reason}")]
    PageUnavailable { page: String, reason: String },

    /// The API answered, but not in the shape we expect.
    #[error("unexpected API response: {0}")]
    MalformedResponse(String),
}
