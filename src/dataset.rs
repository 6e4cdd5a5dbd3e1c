//! On-disk layout for harvested data.
//!
//! Everything lives under a single root:
//!
//! ```text
//! <root>/conflict_ids.txt   crawled page ids, one per line
//! <root>/content/<id>.txt   raw plain-text article bodies
//! <root>/meta/<id>.txt      info-box text, when the page has one
//! <root>/json/<name>.json   sectionized documents
//! ```
//!
//! File names are derived from page ids/titles and normalized so repeated
//! runs land on the same paths and can skip work already done.

use std::path::{Path, PathBuf};

use tokio::fs;

use crate::document::Document;
use crate::types::ScrapeError;

const IDS_FILE: &str = "conflict_ids.txt";

/// Root directory of a harvest run and the paths derived from it.
#[derive(Debug, Clone)]
pub struct DatasetLayout {
    root: PathBuf,
}

impl DatasetLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn content_dir(&self) -> PathBuf {
        self.root.join("content")
    }

    pub fn meta_dir(&self) -> PathBuf {
        self.root.join("meta")
    }

    pub fn json_dir(&self) -> PathBuf {
        self.root.join("json")
    }

    pub fn ids_file(&self) -> PathBuf {
        self.root.join(IDS_FILE)
    }

    /// Creates the root and all subdirectories.
    pub async fn ensure_dirs(&self) -> Result<(), ScrapeError> {
        fs::create_dir_all(self.content_dir()).await?;
        fs::create_dir_all(self.meta_dir()).await?;
        fs::create_dir_all(self.json_dir()).await?;
        Ok(())
    }

    pub fn content_path(&self, id: &str) -> PathBuf {
        self.content_dir().join(format!("{}.txt", sanitize_name(id)))
    }

    pub fn meta_path(&self, id: &str) -> PathBuf {
        self.meta_dir().join(format!("{}.txt", sanitize_name(id)))
    }

    pub fn json_path(&self, name: &str) -> PathBuf {
        self.json_dir().join(format!("{}.json", sanitize_name(name)))
    }

    /// `true` when the page's raw content has already been harvested.
    pub fn has_content(&self, id: &str) -> bool {
        self.content_path(id).exists()
    }

    /// `true` when the sectionized document has already been written.
    pub fn has_document(&self, name: &str) -> bool {
        self.json_path(name).exists()
    }

    pub async fn write_content(&self, id: &str, text: &str) -> Result<(), ScrapeError> {
        write_file(&self.content_path(id), text).await
    }

    pub async fn write_meta(&self, id: &str, text: &str) -> Result<(), ScrapeError> {
        write_file(&self.meta_path(id), text).await
    }

    /// Writes a sectionized document as pretty-printed JSON.
    pub async fn write_document(&self, name: &str, document: &Document) -> Result<(), ScrapeError> {
        let serialized = serde_json::to_string_pretty(document)?;
        write_file(&self.json_path(name), &serialized).await
    }

    /// Persists crawled ids, one per line, for reuse across runs.
    pub async fn save_ids(&self, ids: &[String]) -> Result<(), ScrapeError> {
        let mut contents = ids.join("\n");
        if !contents.is_empty() {
            contents.push('\n');
        }
        write_file(&self.ids_file(), &contents).await
    }

    /// Loads previously crawled ids, skipping blank lines.
    pub async fn load_ids(&self) -> Result<Vec<String>, ScrapeError> {
        let contents = fs::read_to_string(self.ids_file()).await?;
        Ok(contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}

async fn write_file(path: &Path, contents: &str) -> Result<(), ScrapeError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, contents).await?;
    Ok(())
}

/// Normalizes a page id or title into a file name: whitespace and anything
/// outside `[A-Za-z0-9._-]` becomes `_`.
pub fn sanitize_name(input: &str) -> String {
    input
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn sanitize_replaces_awkward_characters() {
        assert_eq!(sanitize_name("Winter War"), "Winter_War");
        assert_eq!(sanitize_name(" Boxer/Rebellion? "), "Boxer_Rebellion_");
        assert_eq!(sanitize_name("War_of_1812"), "War_of_1812");
    }

    #[tokio::test]
    async fn content_round_trips_and_is_detected() {
        let dir = tempdir().unwrap();
        let layout = DatasetLayout::new(dir.path());

        assert!(!layout.has_content("Winter War"));
        layout.write_content("Winter War", "body\n").await.unwrap();
        assert!(layout.has_content("Winter War"));

        let saved = fs::read_to_string(layout.content_path("Winter War"))
            .await
            .unwrap();
        assert_eq!(saved, "body\n");
    }

    #[tokio::test]
    async fn ids_round_trip_through_the_cache_file() {
        let dir = tempdir().unwrap();
        let layout = DatasetLayout::new(dir.path());

        let ids = vec!["Winter_War".to_string(), "Boxer_Rebellion".to_string()];
        layout.save_ids(&ids).await.unwrap();
        assert_eq!(layout.load_ids().await.unwrap(), ids);
    }

    #[tokio::test]
    async fn documents_serialize_with_title_then_sections() {
        let dir = tempdir().unwrap();
        let layout = DatasetLayout::new(dir.path());

        let doc = Document::from_text("intro\n== A ==\nbody\n", Some("Test War".into()));
        layout.write_document("Test War", &doc).await.unwrap();

        let saved = fs::read_to_string(layout.json_path("Test War"))
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&saved).unwrap();
        assert_eq!(value["title"], "Test War");
        assert_eq!(value["sections"][1]["heading"], "A");
    }
}
