//! Batchbot - Keyword Matcher
//!
//! Tokenizes input and classifies tokens against the lexicon. Exact
//! membership first, then a fuzzy fallback using normalized edit
//! similarity so typos like "creat" still resolve to "create".

use regex::Regex;

use crate::lexicon;

/// Classifies raw text into canonical keywords
pub struct KeywordMatcher {
    word_pattern: Regex,
    fuzzy_threshold: f64,
}

impl KeywordMatcher {
    pub fn new(fuzzy_threshold: f64) -> Self {
        Self {
            word_pattern: Regex::new(r"\w+").unwrap(),
            fuzzy_threshold,
        }
    }

    /// Split on non-word characters and lowercase
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        self.word_pattern
            .find_iter(text)
            .map(|m| m.as_str().to_lowercase())
            .collect()
    }

    /// Canonical keywords found in the text, deduplicated, in token order
    pub fn classify(&self, text: &str) -> Vec<&'static str> {
        let mut keywords = Vec::new();
        for token in self.tokenize(text) {
            if let Some(keyword) = self.match_token(&token) {
                if !keywords.contains(&keyword) {
                    keywords.push(keyword);
                }
            }
        }
        log::debug!("classified {:?} from {:?}", keywords, text);
        keywords
    }

    /// Resolve one token to a canonical keyword, if any.
    ///
    /// Synonym normalization first, then exact vocabulary membership,
    /// then the fuzzy fallback: the single best candidate with similarity
    /// at or above the threshold. Ties go to the first vocabulary entry,
    /// so only a strictly better score displaces an earlier candidate.
    pub fn match_token(&self, token: &str) -> Option<&'static str> {
        let normalized = lexicon::normalize(token);

        if let Some(exact) = lexicon::VOCABULARY.iter().copied().find(|k| *k == normalized) {
            return Some(exact);
        }

        let mut best: Option<(&'static str, f64)> = None;
        for candidate in lexicon::VOCABULARY.iter().copied() {
            let similarity = strsim::normalized_levenshtein(normalized, candidate);
            if similarity >= self.fuzzy_threshold
                && best.map_or(true, |(_, score)| similarity > score)
            {
                best = Some((candidate, similarity));
            }
        }
        best.map(|(keyword, _)| keyword)
    }
}
