use crate::document::Article;
use crate::fuzzy::closest_match;
use crate::index::ArticleIndexer;
use std::collections::HashMap;
use std::time::Instant;

/// Default minimum score for a ranked result.
pub const DEFAULT_MIN_SCORE: f64 = 0.001;

/// IDF above which a matched term counts as important on its own.
const IMPORTANT_IDF_CUTOFF: f64 = 2.0;
/// Raw-score floor that lets an article in without an important match.
const SCORE_FLOOR: f64 = 0.05;
/// Fraction of the top score below which trailing results are cut.
const DYNAMIC_THRESHOLD_RATIO: f64 = 0.05;
/// Results always emitted before the dynamic threshold applies.
const GUARANTEED_RESULTS: usize = 10;
const MATCH_RATIO_BOOST: f64 = 0.5;
const IMPORTANT_MATCH_BOOST: f64 = 0.3;

/// Ranked articles with their final scores, best first.
pub type RankedArticles = Vec<(Article, f64)>;

/// TF-IDF ranker over an [`ArticleIndexer`].
///
/// Holds two snapshots of indexer state: the IDF cache and the sorted
/// fuzzy-candidate vocabulary (the trie enumeration is the dominant cost
/// of a misspelled query, so it is taken once per index generation, not
/// per query). After `ArticleIndexer::add_articles` the caller must call
/// [`TfIdfRanker::update_idf`] before ranking again; `SearchEngine` does
/// this automatically.
pub struct TfIdfRanker {
    idf: HashMap<String, f64>,
    fuzzy_vocab: Vec<String>,
    generation: u64,
}

impl TfIdfRanker {
    pub fn new(indexer: &ArticleIndexer) -> Self {
        let mut ranker = Self {
            idf: HashMap::new(),
            fuzzy_vocab: Vec::new(),
            generation: 0,
        };
        ranker.update_idf(indexer);
        ranker
    }

    /// Recompute the IDF cache and the fuzzy-candidate vocabulary from
    /// the indexer's current state.
    pub fn update_idf(&mut self, indexer: &ArticleIndexer) {
        let start = Instant::now();
        let total = indexer.total_articles();

        self.idf.clear();
        for word in indexer.vocabulary() {
            let df = indexer.document_frequency(word);
            let idf = if total == 0 || df == 0 {
                0.0
            } else {
                (total as f64 / df as f64).ln()
            };
            self.idf.insert(word.clone(), idf);
        }
        self.fuzzy_vocab = indexer.vocabulary_trie().words();
        self.generation = indexer.generation();

        tracing::debug!(terms = self.idf.len(), elapsed = ?start.elapsed(), "idf cache rebuilt");
    }

    /// Cached IDF for a token, 0.0 for a token outside the vocabulary.
    /// Tokens are expected lowercase, as produced by the tokenizer.
    pub fn idf(&self, token: &str) -> f64 {
        self.idf.get(token).copied().unwrap_or(0.0)
    }

    /// Term frequency: occurrences of `token` in the article divided by
    /// the article's total token count; 0.0 for an unknown or empty
    /// article.
    pub fn tf(&self, indexer: &ArticleIndexer, token: &str, article_id: &str) -> f64 {
        let Some(counts) = indexer.article_word_freq(article_id) else {
            return 0.0;
        };
        let total: u32 = counts.values().sum();
        if total == 0 {
            return 0.0;
        }
        let count = counts.get(token).copied().unwrap_or(0);
        f64::from(count) / f64::from(total)
    }

    pub fn tfidf(&self, indexer: &ArticleIndexer, token: &str, article_id: &str) -> f64 {
        self.tf(indexer, token, article_id) * self.idf(token)
    }

    /// Rank articles against a free-text query.
    ///
    /// Tokenizes and stop-word-filters the query, fuzzy-corrects tokens
    /// missing from the vocabulary, scores every article over the union
    /// of literal and corrected terms, boosts multi-term and important
    /// matches, and applies the recall-favoring two-stage threshold: the
    /// first ten results are kept regardless of the dynamic threshold,
    /// later ones only above it. Returns the ranked `(article, score)`
    /// list and, when any term was corrected, a "did you mean" suggestion.
    pub fn rank(
        &self,
        indexer: &ArticleIndexer,
        query: &str,
        top_k: usize,
        min_score: f64,
    ) -> (RankedArticles, Option<String>) {
        debug_assert_eq!(
            self.generation,
            indexer.generation(),
            "ranker snapshot is stale; call update_idf after add_articles"
        );
        let start = Instant::now();

        let filtered = indexer.query_processor().filter_query(query);
        if filtered.is_empty() {
            return (Vec::new(), None);
        }

        // Fuzzy-correct tokens missing from the vocabulary.
        let mut suggestion_parts: Vec<String> = Vec::with_capacity(filtered.len());
        let mut processed: Vec<String> = Vec::with_capacity(filtered.len());
        let mut has_typo = false;
        for word in &filtered {
            if indexer.vocabulary().contains(word) {
                suggestion_parts.push(word.clone());
                processed.push(word.clone());
            } else if let Some(best) = closest_match(word, &self.fuzzy_vocab) {
                suggestion_parts.push(best.to_string());
                processed.push(best.to_string());
                has_typo = true;
            } else {
                suggestion_parts.push(word.clone());
                processed.push(word.clone());
            }
        }
        let suggestion = has_typo.then(|| suggestion_parts.join(" "));

        // Both the literal and the corrected spelling contribute to
        // scoring.
        let mut search_terms = filtered.clone();
        search_terms.extend(
            processed
                .iter()
                .filter(|w| !filtered.contains(*w))
                .cloned(),
        );

        let mut scored: Vec<(usize, f64)> = Vec::new();
        for (idx, article) in indexer.all_articles().iter().enumerate() {
            let mut score = 0.0;
            let mut matched = 0usize;
            let mut important = 0usize;
            let title_lower = article.title.to_lowercase();

            for term in &search_terms {
                let term_score = self.tfidf(indexer, term, &article.unique_id);
                if term_score > 0.0 {
                    score += term_score;
                    matched += 1;
                    // Literal substring of the title, not token
                    // containment: a term may match inside a longer
                    // title word.
                    if title_lower.contains(term.as_str())
                        || self.idf(term) > IMPORTANT_IDF_CUTOFF
                    {
                        important += 1;
                    }
                }
            }

            if matched > 0 && (important > 0 || score > SCORE_FLOOR) {
                let mut boost =
                    1.0 + (matched as f64 / search_terms.len() as f64) * MATCH_RATIO_BOOST;
                if important > 0 {
                    boost += important as f64 * IMPORTANT_MATCH_BOOST;
                }
                scored.push((idx, score * boost));
            }
        }

        // Stable sort keeps insertion order for equal scores.
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        let Some(&(_, top_score)) = scored.first() else {
            return (Vec::new(), suggestion);
        };

        let dynamic_threshold = min_score.max(top_score * DYNAMIC_THRESHOLD_RATIO);
        let mut results: RankedArticles = Vec::new();
        for &(idx, score) in &scored {
            if score < dynamic_threshold && results.len() >= GUARANTEED_RESULTS {
                break;
            }
            if score > 0.0 {
                results.push((indexer.all_articles()[idx].clone(), score));
                if results.len() >= top_k {
                    break;
                }
            }
        }

        tracing::debug!(
            query,
            results = results.len(),
            corrected = suggestion.is_some(),
            elapsed = ?start.elapsed(),
            "query ranked"
        );
        (results, suggestion)
    }

    /// Top `limit` articles for a query, without scores or suggestion.
    pub fn top_articles(
        &self,
        indexer: &ArticleIndexer,
        query: &str,
        limit: usize,
    ) -> Vec<Article> {
        let (ranked, _) = self.rank(indexer, query, limit, DEFAULT_MIN_SCORE);
        ranked.into_iter().map(|(article, _)| article).collect()
    }
}
