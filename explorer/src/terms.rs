//! Heuristic term extraction for natural-language node search.
//!
//! Keeps content words that are not stop words and collapses consecutive
//! capitalized words ("New York") into single multi-word terms. Recall over
//! precision: the output feeds a substring filter, not a ranker.

use lazy_static::lazy_static;
use std::collections::HashSet;

lazy_static! {
    static ref STOP_WORDS: HashSet<&'static str> = [
        // Articles, conjunctions, prepositions
        "a", "an", "the", "and", "or", "but", "nor", "so", "yet", "of", "in",
        "on", "at", "to", "for", "from", "by", "with", "without", "about",
        "into", "onto", "over", "under", "above", "below", "between", "through",
        "during", "before", "after", "against", "within", "along", "across",
        // Pronouns and determiners
        "i", "me", "my", "we", "us", "our", "you", "your", "he", "him", "his",
        "she", "her", "it", "its", "they", "them", "their", "this", "that",
        "these", "those", "which", "who", "whom", "whose", "what", "where",
        "when", "why", "how", "all", "any", "both", "each", "every", "few",
        "more", "most", "some", "such", "no", "not", "only", "same", "other",
        // Verbs common in queries
        "is", "are", "was", "were", "be", "been", "being", "am", "do", "does",
        "did", "have", "has", "had", "can", "could", "will", "would", "shall",
        "should", "may", "might", "must", "show", "find", "search", "list",
        "get", "give", "tell", "look", "see", "know", "want", "need", "related",
        // Fillers
        "there", "here", "then", "than", "as", "if", "because", "while",
        "also", "very", "just", "please",
    ]
    .iter()
    .copied()
    .collect();
}

/// Extract search terms from a natural-language query.
///
/// Empty or all-stop-word input yields an empty list; callers skip the store
/// query entirely in that case. Terms come back lowercased, deduplicated,
/// in first-seen order.
pub fn extract_search_terms(query: &str) -> Vec<String> {
    let tokens: Vec<&str> = query
        .split_whitespace()
        .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|t| !t.is_empty())
        .collect();

    let mut terms = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        if is_capitalized(tokens[i]) {
            // Collapse a run of capitalized words into one entity term
            let mut j = i + 1;
            while j < tokens.len() && is_capitalized(tokens[j]) {
                j += 1;
            }
            let mut run: Vec<String> = tokens[i..j].iter().map(|t| t.to_lowercase()).collect();
            // Sentence-initial "The"/"Where" etc. are capitalization noise
            while run.first().map(|w| STOP_WORDS.contains(w.as_str())).unwrap_or(false) {
                run.remove(0);
            }
            if run.len() > 1 {
                terms.push(run.join(" "));
            } else if let Some(word) = run.pop() {
                if keep_single(&word) {
                    terms.push(word);
                }
            }
            i = j;
        } else {
            let lower = tokens[i].to_lowercase();
            if keep_single(&lower) {
                terms.push(lower);
            }
            i += 1;
        }
    }

    // Deduplicate while preserving order
    let mut seen = HashSet::new();
    terms.retain(|term| seen.insert(term.clone()));
    terms
}

fn is_capitalized(token: &str) -> bool {
    token.chars().next().map(|c| c.is_uppercase()).unwrap_or(false)
}

/// A lone token survives if it is a content word: letters or digits, at
/// least two characters, not a stop word.
fn keep_single(lower: &str) -> bool {
    lower.chars().count() >= 2
        && lower.chars().all(|c| c.is_alphanumeric())
        && !STOP_WORDS.contains(lower)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_yields_no_terms() {
        assert!(extract_search_terms("").is_empty());
        assert!(extract_search_terms("   ").is_empty());
    }

    #[test]
    fn all_stop_words_yield_no_terms() {
        assert!(extract_search_terms("what is the of a").is_empty());
        assert!(extract_search_terms("show me all of them").is_empty());
    }

    #[test]
    fn content_words_survive() {
        let terms = extract_search_terms("find databases related to graphs");
        assert_eq!(terms, vec!["databases", "graphs"]);
    }

    #[test]
    fn capitalized_runs_collapse_into_one_term() {
        let terms = extract_search_terms("companies in New York City");
        assert_eq!(terms, vec!["companies", "new york city"]);
    }

    #[test]
    fn sentence_initial_stop_words_do_not_join_entities() {
        let terms = extract_search_terms("The Eiffel Tower");
        assert_eq!(terms, vec!["eiffel tower"]);
    }

    #[test]
    fn single_capitalized_entities_are_kept() {
        let terms = extract_search_terms("tell me about Paris");
        assert_eq!(terms, vec!["paris"]);
    }

    #[test]
    fn duplicates_removed_in_first_seen_order() {
        let terms = extract_search_terms("graphs and more graphs and engines");
        assert_eq!(terms, vec!["graphs", "engines"]);
    }

    #[test]
    fn punctuation_is_trimmed() {
        let terms = extract_search_terms("capital of France?");
        assert_eq!(terms, vec!["capital", "france"]);
    }
}
