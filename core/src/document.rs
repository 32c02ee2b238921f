use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// One indexed article. Immutable after creation; identity is
/// `unique_id`. The indexer's arena owns every `Article`; all other
/// structures refer to articles by id or by arena index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub unique_id: String,
    pub title: String,
    pub content: String,
    pub url: String,
    pub timestamp: String,
    pub topic: String,
}

/// Corpus input: one group per topic, carrying suggested queries and the
/// raw article records.
#[derive(Debug, Clone, Deserialize)]
pub struct TopicGroup {
    pub topic: String,
    #[serde(default)]
    pub queries: Vec<String>,
    pub articles: Vec<ArticleRecord>,
}

/// Raw article record at initial load. A missing required field is fatal
/// to indexing; absent content falls back to `"{title} {topic}"`.
#[derive(Debug, Clone, Deserialize)]
pub struct ArticleRecord {
    pub unique_id: String,
    pub title: String,
    pub content: Option<String>,
    pub url: String,
    pub timestamp: String,
}

/// Article supplied through incremental ingest. The id is optional and
/// derived from the URL when absent; topic and timestamp default.
#[derive(Debug, Clone, Deserialize)]
pub struct IncomingArticle {
    #[serde(default)]
    pub unique_id: Option<String>,
    pub title: String,
    pub content: String,
    pub url: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
}

/// Parse a corpus from a JSON reader.
pub fn read_corpus<R: std::io::Read>(reader: R) -> Result<Vec<TopicGroup>> {
    serde_json::from_reader(reader).context("malformed corpus JSON")
}

/// Load a corpus file. Any malformed record aborts the load; no partial
/// corpus is usable.
pub fn load_corpus<P: AsRef<Path>>(path: P) -> Result<Vec<TopicGroup>> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("opening corpus file {}", path.display()))?;
    read_corpus(BufReader::new(file))
        .with_context(|| format!("parsing corpus file {}", path.display()))
}
