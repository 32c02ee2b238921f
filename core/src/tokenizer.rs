use crate::trie::Trie;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WORD_RE: Regex = Regex::new(r"[a-z]+").expect("valid regex");
}

/// Query tokens shorter than this are dropped by the query filter.
pub const MIN_QUERY_TOKEN_LEN: usize = 3;

/// Closed-class words dropped from queries, plus "attack"/"attacks",
/// which appear in nearly every article of a security-news corpus.
/// Document text is never filtered against this table.
pub const STOP_WORDS: &[&str] = &[
    "what", "is", "a", "an", "the", "how", "does", "do", "are", "can", "i", "you", "we", "they",
    "this", "that", "these", "those", "in", "on", "at", "to", "for", "of", "with", "from", "by",
    "about", "into", "through", "during", "including", "against", "among", "throughout",
    "despite", "towards", "upon", "concerning", "up", "attack", "attacks",
];

/// Lowercase a text and split it into maximal runs of ASCII letters.
/// Digits, punctuation and symbols act purely as separators. Order is
/// preserved left to right.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    WORD_RE
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Query-side token filtering. Stop words live in a trie for
/// O(token-length) membership tests.
#[derive(Debug)]
pub struct QueryProcessor {
    stop_words: Trie,
}

impl QueryProcessor {
    pub fn new() -> Self {
        let mut stop_words = Trie::new();
        for word in STOP_WORDS {
            stop_words.insert(word);
        }
        Self { stop_words }
    }

    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(token)
    }

    /// Tokenize a query and drop stop words and tokens shorter than
    /// [`MIN_QUERY_TOKEN_LEN`]. Applies to queries only: indexed document
    /// text stays unfiltered so any word is searchable and IDF reflects
    /// true corpus statistics.
    pub fn filter_query(&self, query: &str) -> Vec<String> {
        tokenize(query)
            .into_iter()
            .filter(|t| t.len() >= MIN_QUERY_TOKEN_LEN && !self.is_stop_word(t))
            .collect()
    }
}

impl Default for QueryProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_non_letters() {
        assert_eq!(
            tokenize("Zero-Day: CVE-2024 exploited!"),
            vec!["zero", "day", "cve", "exploited"]
        );
    }

    #[test]
    fn digits_are_separators() {
        assert_eq!(tokenize("log4j2shell"), vec!["log", "j", "shell"]);
    }

    #[test]
    fn empty_input_yields_no_tokens() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("123 456 --- !!!").is_empty());
    }

    #[test]
    fn preserves_document_order() {
        assert_eq!(tokenize("beta alpha beta"), vec!["beta", "alpha", "beta"]);
    }

    #[test]
    fn filter_drops_stop_words_and_short_tokens() {
        let processor = QueryProcessor::new();
        assert_eq!(
            processor.filter_query("what is a firewall"),
            vec!["firewall"]
        );
        // "ip" survives tokenization but is too short.
        assert_eq!(
            processor.filter_query("how do ip attacks work"),
            vec!["work"]
        );
    }

    #[test]
    fn all_stop_word_query_filters_to_empty() {
        let processor = QueryProcessor::new();
        assert!(processor.filter_query("what is the attack").is_empty());
        assert!(processor.filter_query("").is_empty());
    }
}
