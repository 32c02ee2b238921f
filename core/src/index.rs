use crate::bst::OrderedIndex;
use crate::document::{Article, ArticleRecord, IncomingArticle, TopicGroup};
use crate::graph::ArticleGraph;
use crate::tokenizer::{tokenize, QueryProcessor};
use crate::trie::Trie;
use anyhow::{ensure, Result};
use sha1::{Digest, Sha1};
use std::collections::{HashMap, HashSet};
use std::time::Instant;

/// Document frequency at or below which a token counts as rare for
/// relationship building. Fixed design constant.
pub const RARE_TOKEN_DOC_FREQ: usize = 5;

/// Topic assigned to incrementally ingested articles that carry none.
pub const DEFAULT_INGEST_TOPIC: &str = "Web Search";

const TOPIC_EDGE_WEIGHT: f64 = 1.0;
const RARE_EDGE_BASE_WEIGHT: f64 = 0.5;
const RARE_EDGE_INCREMENT: f64 = 0.3;

/// In-memory inverted index over a corpus of articles, together with the
/// exact-match structures that back ranking: vocabulary set and trie,
/// ordered id index, topic map, and the article-relationship graph.
///
/// Articles live in one owned arena (`articles`); every other structure
/// references them by `unique_id` or arena index. Nothing is ever
/// deleted. Mutation happens only through [`ArticleIndexer::add_articles`],
/// which bumps [`ArticleIndexer::generation`] so rankers can tell when
/// their IDF and fuzzy-vocabulary snapshots are stale.
pub struct ArticleIndexer {
    articles: Vec<Article>,
    by_id: HashMap<String, usize>,
    ordered: OrderedIndex,
    word_to_articles: HashMap<String, HashSet<String>>,
    article_word_counts: HashMap<String, HashMap<String, u32>>,
    vocabulary: HashSet<String>,
    vocabulary_trie: Trie,
    topic_to_articles: HashMap<String, Vec<String>>,
    graph: ArticleGraph,
    sample_queries: Vec<String>,
    query_processor: QueryProcessor,
    generation: u64,
}

impl ArticleIndexer {
    fn empty() -> Self {
        Self {
            articles: Vec::new(),
            by_id: HashMap::new(),
            ordered: OrderedIndex::new(),
            word_to_articles: HashMap::new(),
            article_word_counts: HashMap::new(),
            vocabulary: HashSet::new(),
            vocabulary_trie: Trie::new(),
            topic_to_articles: HashMap::new(),
            graph: ArticleGraph::new(),
            sample_queries: Vec::new(),
            query_processor: QueryProcessor::new(),
            generation: 0,
        }
    }

    /// Load a corpus, index every article, then build the relationship
    /// graph. A malformed or duplicate record is fatal: no partial corpus
    /// is an acceptable running state.
    pub fn from_groups(groups: &[TopicGroup]) -> Result<Self> {
        let start = Instant::now();
        let mut indexer = Self::empty();

        for group in groups {
            indexer
                .sample_queries
                .extend(group.queries.iter().cloned());
            for record in &group.articles {
                let article = article_from_record(record, &group.topic);
                ensure!(
                    !indexer.by_id.contains_key(&article.unique_id),
                    "duplicate article id {:?} in corpus",
                    article.unique_id
                );
                indexer.insert_article(article);
            }
        }
        indexer.rebuild_relationships();

        tracing::info!(
            articles = indexer.articles.len(),
            vocabulary = indexer.vocabulary.len(),
            elapsed = ?start.elapsed(),
            "corpus indexed"
        );
        Ok(indexer)
    }

    /// Store an article in the arena and every index structure. The
    /// caller guarantees the id is not already present.
    fn insert_article(&mut self, article: Article) {
        let idx = self.articles.len();
        self.by_id.insert(article.unique_id.clone(), idx);
        self.ordered.insert(&article.unique_id, idx);
        self.graph.add_vertex(&article.unique_id);
        self.topic_to_articles
            .entry(article.topic.clone())
            .or_default()
            .push(article.unique_id.clone());
        self.index_text(&article);
        self.articles.push(article);
    }

    /// Tokenize `title + " " + content` unfiltered and record term counts,
    /// inverted-index postings, and vocabulary entries.
    fn index_text(&mut self, article: &Article) {
        let text = format!("{} {}", article.title, article.content);
        let mut counts: HashMap<String, u32> = HashMap::new();
        for word in tokenize(&text) {
            *counts.entry(word).or_insert(0) += 1;
        }
        for word in counts.keys() {
            self.word_to_articles
                .entry(word.clone())
                .or_default()
                .insert(article.unique_id.clone());
            if self.vocabulary.insert(word.clone()) {
                self.vocabulary_trie.insert(word);
            }
        }
        self.article_word_counts
            .insert(article.unique_id.clone(), counts);
    }

    /// Recompute the full relationship edge set. Articles sharing a topic
    /// get an edge of weight 1.0; each shared rare token then contributes
    /// 0.5 when the pair has no edge yet and 0.3 on top of an existing
    /// edge. All edges are cleared first, so the pass can be rerun after
    /// incremental ingest without double-accumulating.
    pub fn rebuild_relationships(&mut self) {
        let start = Instant::now();
        self.graph.clear_edges();

        for ids in self.topic_to_articles.values() {
            for (i, a) in ids.iter().enumerate() {
                for b in &ids[i + 1..] {
                    self.graph.add_edge(a, b, TOPIC_EDGE_WEIGHT);
                }
            }
        }

        for (_, article_ids) in self
            .word_to_articles
            .iter()
            .filter(|(_, ids)| ids.len() <= RARE_TOKEN_DOC_FREQ)
        {
            let ids: Vec<&str> = article_ids.iter().map(String::as_str).collect();
            for i in 0..ids.len() {
                for j in i + 1..ids.len() {
                    let (a, b) = (ids[i], ids[j]);
                    match self.graph.edge_weight(a, b) {
                        None => self.graph.add_edge(a, b, RARE_EDGE_BASE_WEIGHT),
                        Some(w) => self.graph.add_edge(a, b, w + RARE_EDGE_INCREMENT),
                    }
                }
            }
        }

        tracing::debug!(elapsed = ?start.elapsed(), "relationship graph rebuilt");
    }

    /// Incrementally ingest a batch of articles. A record whose id (given
    /// or generated from its URL) already exists is silently skipped. New
    /// articles receive a graph vertex but no edges; call
    /// [`ArticleIndexer::rebuild_relationships`] to refresh the edge set.
    /// Returns the number of articles actually added; the caller must
    /// refresh any `TfIdfRanker` afterwards.
    pub fn add_articles(&mut self, batch: &[IncomingArticle]) -> usize {
        let mut added = 0;
        for record in batch {
            let unique_id = match &record.unique_id {
                Some(id) => id.clone(),
                None => generated_id(&record.url),
            };
            if self.by_id.contains_key(&unique_id) {
                tracing::debug!(%unique_id, "skipping duplicate article");
                continue;
            }
            self.insert_article(Article {
                unique_id,
                title: record.title.clone(),
                content: record.content.clone(),
                url: record.url.clone(),
                timestamp: record.timestamp.clone().unwrap_or_default(),
                topic: record
                    .topic
                    .clone()
                    .unwrap_or_else(|| DEFAULT_INGEST_TOPIC.to_string()),
            });
            added += 1;
        }
        if added > 0 {
            self.generation += 1;
        }
        tracing::info!(added, total = self.articles.len(), "incremental ingest");
        added
    }

    pub fn total_articles(&self) -> usize {
        self.articles.len()
    }

    /// Bumped once per mutating batch; rankers compare it against the
    /// generation their snapshots were taken at.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn get_article(&self, id: &str) -> Option<&Article> {
        self.by_id.get(id).map(|&idx| &self.articles[idx])
    }

    /// Exact lookup through the ordered index rather than the hash map.
    pub fn find_by_id_ordered(&self, id: &str) -> Option<&Article> {
        self.ordered.get(id).map(|idx| &self.articles[idx])
    }

    /// Every article in insertion order.
    pub fn all_articles(&self) -> &[Article] {
        &self.articles
    }

    /// Ids of articles containing the token, or `None` for a token no
    /// document contains.
    pub fn articles_with_token(&self, token: &str) -> Option<&HashSet<String>> {
        self.word_to_articles.get(&token.to_lowercase())
    }

    /// Number of distinct articles containing the token.
    pub fn document_frequency(&self, token: &str) -> usize {
        self.articles_with_token(token).map_or(0, HashSet::len)
    }

    /// Term counts for one article; `None` for an unknown id.
    pub fn article_word_freq(&self, id: &str) -> Option<&HashMap<String, u32>> {
        self.article_word_counts.get(id)
    }

    pub fn vocabulary(&self) -> &HashSet<String> {
        &self.vocabulary
    }

    pub fn vocabulary_trie(&self) -> &Trie {
        &self.vocabulary_trie
    }

    /// Graph neighbors of an article, heaviest edge first, capped at
    /// `limit`. Unknown ids yield an empty list.
    pub fn related_articles(&self, id: &str, limit: usize) -> Vec<String> {
        self.graph
            .neighbors(id)
            .into_iter()
            .take(limit)
            .map(|(neighbor, _)| neighbor)
            .collect()
    }

    pub fn graph(&self) -> &ArticleGraph {
        &self.graph
    }

    pub fn articles_by_topic(&self, topic: &str) -> Vec<&Article> {
        self.topic_to_articles
            .get(topic)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.get_article(id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Human-readable sample queries collected from the corpus groups.
    pub fn sample_queries(&self) -> &[String] {
        &self.sample_queries
    }

    pub fn query_processor(&self) -> &QueryProcessor {
        &self.query_processor
    }
}

fn article_from_record(record: &ArticleRecord, topic: &str) -> Article {
    let content = record
        .content
        .clone()
        .unwrap_or_else(|| format!("{} {}", record.title, topic));
    Article {
        unique_id: record.unique_id.clone(),
        title: record.title.clone(),
        content,
        url: record.url.clone(),
        timestamp: record.timestamp.clone(),
        topic: topic.to_string(),
    }
}

/// Stable id for a record without one: `web_` plus the first ten hex
/// characters of the SHA-1 of its URL.
fn generated_id(url: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(url.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    format!("web_{}", &digest[..10])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, title: &str, content: &str) -> ArticleRecord {
        ArticleRecord {
            unique_id: id.to_string(),
            title: title.to_string(),
            content: Some(content.to_string()),
            url: format!("https://news.example/{id}"),
            timestamp: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    fn group(topic: &str, articles: Vec<ArticleRecord>) -> TopicGroup {
        TopicGroup {
            topic: topic.to_string(),
            queries: Vec::new(),
            articles,
        }
    }

    #[test]
    fn inverted_index_maps_tokens_to_ids() {
        let groups = vec![group(
            "Malware",
            vec![
                record("m1", "Ransomware wave", "ransomware spreads fast"),
                record("m2", "Botnet takedown", "police disrupt botnet"),
            ],
        )];
        let indexer = ArticleIndexer::from_groups(&groups).unwrap();

        let ids = indexer.articles_with_token("ransomware").unwrap();
        assert_eq!(ids.len(), 1);
        assert!(ids.contains("m1"));
        assert!(indexer.articles_with_token("nosuchword").is_none());
        assert_eq!(indexer.document_frequency("botnet"), 1);
    }

    #[test]
    fn word_counts_sum_to_token_count() {
        let groups = vec![group(
            "Malware",
            vec![record("m1", "Worm worm", "the worm returns")],
        )];
        let indexer = ArticleIndexer::from_groups(&groups).unwrap();

        // "worm worm the worm returns" tokenizes to 5 tokens.
        let counts = indexer.article_word_freq("m1").unwrap();
        let total: u32 = counts.values().sum();
        assert_eq!(total, 5);
        assert_eq!(counts.get("worm"), Some(&3));
    }

    #[test]
    fn content_falls_back_to_title_and_topic() {
        let mut rec = record("m1", "Spyware found", "");
        rec.content = None;
        let groups = vec![group("Spyware", vec![rec])];
        let indexer = ArticleIndexer::from_groups(&groups).unwrap();
        assert_eq!(
            indexer.get_article("m1").unwrap().content,
            "Spyware found Spyware"
        );
    }

    #[test]
    fn duplicate_id_at_load_is_fatal() {
        let groups = vec![group(
            "Malware",
            vec![record("m1", "a", "x"), record("m1", "b", "y")],
        )];
        assert!(ArticleIndexer::from_groups(&groups).is_err());
    }

    #[test]
    fn add_articles_skips_duplicates_and_counts_new() {
        let groups = vec![group("Malware", vec![record("m1", "Worm", "worm")])];
        let mut indexer = ArticleIndexer::from_groups(&groups).unwrap();
        assert_eq!(indexer.generation(), 0);

        let batch = vec![
            IncomingArticle {
                unique_id: Some("m1".to_string()),
                title: "Duplicate".to_string(),
                content: "ignored".to_string(),
                url: "https://news.example/dup".to_string(),
                timestamp: None,
                topic: None,
            },
            IncomingArticle {
                unique_id: None,
                title: "Fresh report".to_string(),
                content: "zero day disclosed".to_string(),
                url: "https://news.example/fresh".to_string(),
                timestamp: None,
                topic: None,
            },
        ];
        assert_eq!(indexer.add_articles(&batch), 1);
        assert_eq!(indexer.total_articles(), 2);
        assert_eq!(indexer.generation(), 1);

        // Re-adding the same batch is a complete no-op.
        assert_eq!(indexer.add_articles(&batch), 0);
        assert_eq!(indexer.total_articles(), 2);
        assert_eq!(indexer.generation(), 1);
    }

    #[test]
    fn generated_ids_are_stable_and_tagged() {
        let a = generated_id("https://news.example/story");
        let b = generated_id("https://news.example/story");
        assert_eq!(a, b);
        assert!(a.starts_with("web_"));
        assert_eq!(a.len(), "web_".len() + 10);
    }

    #[test]
    fn incremental_articles_get_vertex_but_no_edges() {
        let groups = vec![group(
            "Phishing",
            vec![record("p1", "Spearphish", "credential theft campaign")],
        )];
        let mut indexer = ArticleIndexer::from_groups(&groups).unwrap();
        indexer.add_articles(&[IncomingArticle {
            unique_id: Some("p2".to_string()),
            title: "Spearphish again".to_string(),
            content: "credential theft campaign".to_string(),
            url: "https://news.example/p2".to_string(),
            timestamp: None,
            topic: Some("Phishing".to_string()),
        }]);

        assert!(indexer.graph().contains_vertex("p2"));
        assert!(indexer.related_articles("p2", 5).is_empty());

        // A full rebuild creates the missing edges.
        indexer.rebuild_relationships();
        assert_eq!(indexer.related_articles("p2", 5), vec!["p1".to_string()]);
    }

    #[test]
    fn ordered_lookup_agrees_with_map_lookup() {
        let groups = vec![group(
            "Malware",
            vec![record("b", "Beta", "two"), record("a", "Alpha", "one")],
        )];
        let indexer = ArticleIndexer::from_groups(&groups).unwrap();
        assert_eq!(
            indexer.find_by_id_ordered("a").map(|a| a.title.as_str()),
            Some("Alpha")
        );
        assert!(indexer.find_by_id_ordered("zzz").is_none());
    }
}
