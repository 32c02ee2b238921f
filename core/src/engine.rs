use crate::document::{Article, IncomingArticle, TopicGroup};
use crate::index::ArticleIndexer;
use crate::rank::{RankedArticles, TfIdfRanker};
use anyhow::Result;
use parking_lot::RwLock;

struct EngineState {
    indexer: ArticleIndexer,
    ranker: TfIdfRanker,
}

/// Single-writer, many-reader wrapper around the indexer and ranker.
///
/// Ranking and lookups read a consistent snapshot under a shared lock;
/// [`SearchEngine::add_articles`] takes the exclusive lock and refreshes
/// the IDF cache and fuzzy vocabulary before releasing it, so a reader
/// never observes a half-updated index or a stale ranker snapshot.
pub struct SearchEngine {
    state: RwLock<EngineState>,
}

impl SearchEngine {
    /// Build the engine from an in-memory corpus. Fails on any malformed
    /// or duplicate record.
    pub fn from_groups(groups: &[TopicGroup]) -> Result<Self> {
        let indexer = ArticleIndexer::from_groups(groups)?;
        let ranker = TfIdfRanker::new(&indexer);
        Ok(Self {
            state: RwLock::new(EngineState { indexer, ranker }),
        })
    }

    pub fn rank(
        &self,
        query: &str,
        top_k: usize,
        min_score: f64,
    ) -> (RankedArticles, Option<String>) {
        let state = self.state.read();
        state.ranker.rank(&state.indexer, query, top_k, min_score)
    }

    pub fn top_articles(&self, query: &str, limit: usize) -> Vec<Article> {
        let state = self.state.read();
        state.ranker.top_articles(&state.indexer, query, limit)
    }

    /// Ingest a batch and refresh the ranker's snapshots in the same
    /// exclusive critical section. Returns the number of newly added
    /// articles.
    pub fn add_articles(&self, batch: &[IncomingArticle]) -> usize {
        let mut state = self.state.write();
        let added = state.indexer.add_articles(batch);
        if added > 0 {
            let EngineState { indexer, ranker } = &mut *state;
            ranker.update_idf(indexer);
        }
        added
    }

    /// Recompute relationship edges across the whole corpus. Incremental
    /// ingest leaves new articles without edges until this runs.
    pub fn rebuild_relationships(&self) {
        self.state.write().indexer.rebuild_relationships();
    }

    pub fn get_article(&self, id: &str) -> Option<Article> {
        self.state.read().indexer.get_article(id).cloned()
    }

    pub fn related_articles(&self, id: &str, limit: usize) -> Vec<String> {
        self.state.read().indexer.related_articles(id, limit)
    }

    /// Ids of articles containing the token; empty for an unknown token.
    pub fn articles_with_token(&self, token: &str) -> Vec<String> {
        let state = self.state.read();
        let mut ids: Vec<String> = state
            .indexer
            .articles_with_token(token)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default();
        ids.sort();
        ids
    }

    pub fn total_articles(&self) -> usize {
        self.state.read().indexer.total_articles()
    }

    pub fn sample_queries(&self) -> Vec<String> {
        self.state.read().indexer.sample_queries().to_vec()
    }
}
