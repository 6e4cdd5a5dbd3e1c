//! Harvests Wikipedia articles about historical conflicts and converts their
//! raw text into ordered title/section JSON documents.
//!
//! ```text
//! Category tree ──► categories::CategoryCrawler ──► conflict ids ──► dataset id cache
//!                                                        │
//! Conflict id ──► wiki::WikiClient ──┬─► plain-text extract ──► dataset content/
//!                                    └─► page HTML ──► infobox  ──► dataset meta/
//!
//! Saved content ──► document::Document::from_text ──► dataset json/ (title + sections)
//! ```
//!
//! The sectionizer in [`document`] is the core of the crate: a pure, total
//! transformation from raw article text to a [`document::Document`]. Everything
//! else is thin I/O plumbing around it: fetching pages, walking category
//! pages, extracting info-boxes, and laying files out on disk.

pub mod categories;
pub mod dataset;
pub mod document;
pub mod infobox;
pub mod pipeline;
pub mod types;
pub mod wiki;

pub use document::{Document, LineEndings, Section};
pub use types::ScrapeError;
