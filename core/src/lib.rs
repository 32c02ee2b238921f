//! In-memory TF-IDF search core for a fixed corpus of short articles:
//! inverted-index builder, query tokenization and stop-word filtering,
//! fuzzy typo correction over a vocabulary trie, an article-relationship
//! graph for "related articles", and the ranking pipeline on top.
//!
//! The index is rebuilt from the document source on every run and only
//! grows; nothing is persisted and nothing is deleted.

pub mod bst;
pub mod document;
pub mod engine;
pub mod fuzzy;
pub mod graph;
pub mod history;
pub mod index;
pub mod rank;
pub mod tokenizer;
pub mod trie;

pub use document::{load_corpus, read_corpus, Article, ArticleRecord, IncomingArticle, TopicGroup};
pub use engine::SearchEngine;
pub use history::{NavigationHistory, Queue, RecentQueries, Stack};
pub use index::ArticleIndexer;
pub use rank::{RankedArticles, TfIdfRanker, DEFAULT_MIN_SCORE};
