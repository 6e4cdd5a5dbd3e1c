//! Orchestration of the harvest: crawl ids, fetch pages, write files,
//! sectionize saved content.
//!
//! Every step is resumable by construction: ids are cached after the first
//! crawl, already-harvested pages are skipped by file existence, and per-page
//! failures are logged and counted instead of aborting the run.

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::categories::{CategoryCrawler, extract_war_titles};
use crate::dataset::DatasetLayout;
use crate::document::Document;
use crate::infobox::extract_infobox;
use crate::types::ScrapeError;
use crate::wiki::{PageRef, WikiClient, WikiPage};

/// Counters summarizing a harvest run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HarvestReport {
    /// Pages fetched and written this run.
    pub processed: usize,
    /// Pages skipped because their output already existed.
    pub skipped: usize,
    /// Pages that could not be fetched even after the title fallback.
    pub failed: usize,
    /// Pages whose info-box was found and saved.
    pub infoboxes: usize,
}

/// Walks the century categories into era subcategories and the eras into
/// conflict page ids, deduplicating while keeping first-seen order.
///
/// The result is cached in the layout's id file; when the cache exists it is
/// loaded instead of re-crawling.
pub async fn collect_conflict_ids(
    crawler: &CategoryCrawler,
    layout: &DatasetLayout,
    centuries: &[&str],
) -> Result<Vec<String>, ScrapeError> {
    if layout.ids_file().exists() {
        let ids = layout.load_ids().await?;
        info!(count = ids.len(), "reusing cached conflict ids");
        return Ok(ids);
    }

    let mut eras = Vec::new();
    for century in centuries {
        eras.extend(crawler.member_ids(century).await?);
    }
    info!(count = eras.len(), "conflict eras found");

    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    for era in &eras {
        for id in crawler.member_ids(era).await? {
            if seen.insert(id.clone()) {
                ids.push(id);
            }
        }
    }
    info!(count = ids.len(), "conflicts found");

    layout.save_ids(&ids).await?;
    Ok(ids)
}

/// Collects war titles from "List of wars ..." era pages.
///
/// Each era id names a list page whose wikitables carry one war per row;
/// duplicates across eras collapse, keeping first-seen order.
pub async fn collect_war_titles(
    client: &WikiClient,
    eras: &[String],
) -> Result<Vec<String>, ScrapeError> {
    let mut seen = HashSet::new();
    let mut titles = Vec::new();
    for era in eras {
        let html = client.page_html(&PageRef::title(era.trim())).await?;
        for title in extract_war_titles(&html)? {
            if seen.insert(title.clone()) {
                titles.push(title);
            }
        }
        info!(%era, count = titles.len(), "war titles collected so far");
    }
    Ok(titles)
}

/// Fetches raw content and info-boxes for each id into the dataset layout.
///
/// Pages whose content file already exists are skipped. A fetch failure is
/// logged and counted, never fatal. `delay` is the politeness pause between
/// pages that hit the network.
pub async fn harvest(
    client: &WikiClient,
    layout: &DatasetLayout,
    ids: &[String],
    delay: Duration,
    limit: Option<usize>,
) -> Result<HarvestReport, ScrapeError> {
    layout.ensure_dirs().await?;

    let ids = match limit {
        Some(limit) => &ids[..limit.min(ids.len())],
        None => ids,
    };

    let mut report = HarvestReport::default();
    for id in ids {
        if layout.has_content(id) {
            debug!(%id, "content already harvested");
            report.skipped += 1;
            continue;
        }

        let page = match resolve_page(client, id).await {
            Ok(page) => page,
            Err(err) => {
                warn!(%id, error = %err, "failed to collect page");
                report.failed += 1;
                continue;
            }
        };

        layout.write_content(id, &page.content).await?;
        info!(%id, title = %page.title, "content saved");

        // Info-box extraction is best-effort; the raw content is already safe.
        match client.page_html(&PageRef::title(&page.title)).await {
            Ok(html) => {
                if let Some(meta) = extract_infobox(&html)? {
                    layout.write_meta(id, &meta).await?;
                    report.infoboxes += 1;
                }
            }
            Err(err) => warn!(%id, error = %err, "failed to fetch page HTML"),
        }

        report.processed += 1;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    Ok(report)
}

/// Fetches every page named in a PetScan manifest and writes one sectionized
/// JSON document per conflict, titled from the manifest.
///
/// Entries whose JSON file already exists are skipped; fetch failures are
/// logged and counted.
pub async fn from_manifest(
    client: &WikiClient,
    layout: &DatasetLayout,
    manifest_path: &Path,
) -> Result<HarvestReport, ScrapeError> {
    let raw = fs::read_to_string(manifest_path).await?;
    let entries = parse_manifest(&raw)?;
    info!(count = entries.len(), "manifest entries loaded");

    layout.ensure_dirs().await?;

    let mut report = HarvestReport::default();
    for entry in entries {
        let (Some(id), Some(title)) = (entry.id, entry.title) else {
            continue;
        };
        if layout.has_document(&title) {
            report.skipped += 1;
            continue;
        }

        let fetched = match client.page_content(&PageRef::Id(id)).await {
            Ok(page) => Ok(page),
            Err(err) => {
                debug!(%title, error = %err, "pageid lookup failed, retrying by title");
                client.page_content(&PageRef::title(&title)).await
            }
        };
        let page = match fetched {
            Ok(page) => page,
            Err(err) => {
                warn!(%title, error = %err, "failed to collect page");
                report.failed += 1;
                continue;
            }
        };

        let document = Document::from_text(&page.content, Some(title.clone()));
        layout.write_document(&title, &document).await?;
        report.processed += 1;
    }

    Ok(report)
}

/// Sectionizes every saved content file into its JSON analogue.
///
/// The conflict name is the file stem with underscores restored to spaces;
/// it becomes both the document title and the JSON file name. Returns the
/// number of documents written.
pub async fn finalize(layout: &DatasetLayout) -> Result<usize, ScrapeError> {
    fs::create_dir_all(layout.json_dir()).await?;

    let mut converted = 0usize;
    let mut entries = fs::read_dir(layout.content_dir()).await?;
    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }
        let file_name = entry.file_name();
        let file_name = file_name.to_string_lossy();
        let stem = file_name.split('.').next().unwrap_or_default().trim();
        if stem.is_empty() {
            continue;
        }
        let name = stem.replace('_', " ");

        let raw = fs::read_to_string(entry.path()).await?;
        let document = Document::from_text(&raw, Some(name));
        layout.write_document(stem, &document).await?;
        converted += 1;
    }

    info!(count = converted, "content converted to JSON documents");
    Ok(converted)
}

/// Tries the raw id as a title first, then falls back to the id with `-`/`_`
/// separators restored to spaces, the way article titles are written.
async fn resolve_page(client: &WikiClient, id: &str) -> Result<WikiPage, ScrapeError> {
    match client.page_content(&PageRef::title(id)).await {
        Ok(page) => Ok(page),
        Err(err) => {
            let fallback = normalize_title(id);
            if fallback == id {
                return Err(err);
            }
            debug!(%id, error = %err, "retrying with normalized title");
            client.page_content(&PageRef::title(fallback)).await
        }
    }
}

fn normalize_title(id: &str) -> String {
    id.chars()
        .map(|c| if matches!(c, '-' | '_') { ' ' } else { c })
        .collect()
}

/// PetScan wraps its page list in `{"*": [{"a": {"*": [...]}}]}`.
#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(rename = "*")]
    batches: Vec<ManifestBatch>,
}

#[derive(Debug, Deserialize)]
struct ManifestBatch {
    a: ManifestBody,
}

#[derive(Debug, Deserialize)]
struct ManifestBody {
    #[serde(rename = "*")]
    pages: Vec<ManifestEntry>,
}

#[derive(Debug, Deserialize)]
struct ManifestEntry {
    id: Option<u64>,
    title: Option<String>,
}

fn parse_manifest(raw: &str) -> Result<Vec<ManifestEntry>, ScrapeError> {
    let manifest: Manifest = serde_json::from_str(raw)?;
    let batch = manifest
        .batches
        .into_iter()
        .next()
        .ok_or_else(|| ScrapeError::MalformedResponse("manifest has no batches".into()))?;
    Ok(batch.a.pages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles_are_normalized_from_slugs() {
        assert_eq!(normalize_title("Russo-Japanese_War"), "Russo Japanese War");
        assert_eq!(normalize_title("Winter War"), "Winter War");
    }

    #[test]
    fn petscan_manifest_parses_to_entries() {
        let raw = r#"{
            "n": "combination",
            "*": [ { "a": { "*": [
                { "id": 736, "title": "Winter War", "namespace": 0 },
                { "id": null, "title": "Broken entry" }
            ] } } ]
        }"#;
        let entries = parse_manifest(raw).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, Some(736));
        assert_eq!(entries[0].title.as_deref(), Some("Winter War"));
        assert_eq!(entries[1].id, None);
    }

    #[test]
    fn empty_manifest_is_an_error() {
        let err = parse_manifest(r#"{ "*": [] }"#).unwrap_err();
        assert!(matches!(err, ScrapeError::MalformedResponse(_)));
    }
}
