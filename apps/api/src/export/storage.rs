//! Writes the artifacts of a pipeline run under the configured output directory.
//!
//! ```text
//! <root>/scraped-data/<keyword>_scraped_data.json
//! <root>/response-data/<keyword>_llm_response.json
//! <root>/csv-data/<keyword>_clinical_trials_data.csv
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::retrieval::TrialRecord;

const SCRAPED_DIR: &str = "scraped-data";
const RESPONSE_DIR: &str = "response-data";
const CSV_DIR: &str = "csv-data";

#[derive(Debug, Clone)]
pub struct OutputStore {
    root: PathBuf,
}

impl OutputStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Snapshot of every record scraped so far for `keyword`.
    pub async fn save_scraped(&self, keyword: &str, records: &[TrialRecord]) -> Result<PathBuf> {
        let json = serde_json::to_vec_pretty(records).context("Failed to serialize scraped records")?;
        self.write(SCRAPED_DIR, format!("{}_scraped_data.json", keyword_slug(keyword)), &json)
            .await
    }

    /// Every raw generated response collected so far for `keyword`.
    pub async fn save_responses(&self, keyword: &str, responses: &[String]) -> Result<PathBuf> {
        let json = serde_json::to_vec_pretty(responses).context("Failed to serialize responses")?;
        self.write(RESPONSE_DIR, format!("{}_llm_response.json", keyword_slug(keyword)), &json)
            .await
    }

    pub async fn save_csv(&self, keyword: &str, document: &str) -> Result<PathBuf> {
        self.write(
            CSV_DIR,
            format!("{}_clinical_trials_data.csv", keyword_slug(keyword)),
            document.as_bytes(),
        )
        .await
    }

    async fn write(&self, dir: &str, file_name: String, contents: &[u8]) -> Result<PathBuf> {
        let dir = self.root.join(dir);
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;

        let path = dir.join(file_name);
        tokio::fs::write(&path, contents)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;

        info!("Saved {}", path.display());
        Ok(path)
    }
}

/// File-name stem for a search keyword: spaces become `_`, and anything outside
/// `[A-Za-z0-9_-]` is replaced too so a keyword can never leave its directory.
pub fn keyword_slug(keyword: &str) -> String {
    let slug: String = keyword
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    if slug.is_empty() {
        "untitled".to_string()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str) -> TrialRecord {
        TrialRecord {
            title: title.to_string(),
            abstract_text: "Abstract not available".to_string(),
            url: "https://pubmed.ncbi.nlm.nih.gov/1/".to_string(),
        }
    }

    #[test]
    fn test_keyword_slug() {
        assert_eq!(keyword_slug("breast cancer"), "breast_cancer");
        assert_eq!(keyword_slug("  nsclc "), "nsclc");
        assert_eq!(keyword_slug("../etc/passwd"), "___etc_passwd");
        assert_eq!(keyword_slug("   "), "untitled");
    }

    #[tokio::test]
    async fn test_save_scraped_writes_pretty_json() {
        let dir = tempfile::tempdir().unwrap();
        let store = OutputStore::new(dir.path());

        let path = store
            .save_scraped("lung cancer", &[record("A trial")])
            .await
            .unwrap();

        assert_eq!(
            path,
            dir.path().join("scraped-data").join("lung_cancer_scraped_data.json")
        );
        let raw = tokio::fs::read_to_string(&path).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[0]["title"], "A trial");
        assert_eq!(value[0]["abstract"], "Abstract not available");
    }

    #[tokio::test]
    async fn test_save_responses_overwrites_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = OutputStore::new(dir.path());

        store.save_responses("melanoma", &["first".to_string()]).await.unwrap();
        let path = store
            .save_responses("melanoma", &["first".to_string(), "second".to_string()])
            .await
            .unwrap();

        let raw = tokio::fs::read_to_string(&path).await.unwrap();
        let value: Vec<String> = serde_json::from_str(&raw).unwrap();
        assert_eq!(value, vec!["first", "second"]);
        assert!(path.ends_with("response-data/melanoma_llm_response.json"));
    }

    #[tokio::test]
    async fn test_save_csv() {
        let dir = tempfile::tempdir().unwrap();
        let store = OutputStore::new(dir.path());

        let path = store.save_csv("glioma", "a,b\n1,2\n").await.unwrap();
        assert!(path.ends_with("csv-data/glioma_clinical_trials_data.csv"));
        assert_eq!(tokio::fs::read_to_string(&path).await.unwrap(), "a,b\n1,2\n");
    }
}
