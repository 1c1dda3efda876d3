//! Batchbot - Lexicon
//!
//! Static vocabulary tables: action verbs, entity nouns, slot keywords,
//! synonyms, month names, and the reserved-word stoplist. Pure data and
//! lookups — unknown tokens pass through unchanged, nothing here errors.

/// Full keyword vocabulary in fixed enumeration order. Fuzzy-match ties
/// are broken by the first entry in this order.
pub const VOCABULARY: &[&str] = &[
    // actions
    "create", "delete", "update",
    // entities
    "batch", "tablet", "cavity", "blister",
    // slot keywords
    "size", "expiry", "date",
];

/// Synonym -> canonical keyword
const SYNONYMS: &[(&str, &str)] = &[
    ("generate", "create"),
    ("make", "create"),
    ("start", "create"),
    ("remove", "delete"),
    ("drop", "delete"),
    ("erase", "delete"),
    ("change", "update"),
    ("modify", "update"),
];

/// Month names, full form. Three-letter prefixes are accepted too.
const MONTHS: &[(&str, u32)] = &[
    ("january", 1),
    ("february", 2),
    ("march", 3),
    ("april", 4),
    ("may", 5),
    ("june", 6),
    ("july", 7),
    ("august", 8),
    ("september", 9),
    ("october", 10),
    ("november", 11),
    ("december", 12),
];

pub const GREETINGS: &[&str] = &["hi", "hello", "hey"];

pub const EXIT_TOKENS: &[&str] = &["exit", "quit"];

/// Filler words that must never be mistaken for a batch name
const FILLERS: &[&str] = &[
    "is", "the", "of", "a", "an", "to", "for", "with", "and", "name",
    "please", "want", "my", "new",
];

/// Normalize a token: synonym -> canonical form, unknown tokens unchanged
pub fn normalize(token: &str) -> &str {
    for (synonym, canonical) in SYNONYMS {
        if *synonym == token {
            return canonical;
        }
    }
    token
}

/// Month number (1-12) for a full month name or 3-letter abbreviation
pub fn month_number(token: &str) -> Option<u32> {
    for (name, number) in MONTHS {
        if token == *name || (token.len() == 3 && name.starts_with(token)) {
            return Some(*number);
        }
    }
    None
}

/// Reserved words excluded from batch-name extraction: the vocabulary,
/// synonyms, month names, greetings, exit tokens, fillers, and the
/// literal tokens "default" and "today".
pub fn is_reserved(token: &str) -> bool {
    VOCABULARY.contains(&token)
        || SYNONYMS.iter().any(|(synonym, _)| *synonym == token)
        || month_number(token).is_some()
        || GREETINGS.contains(&token)
        || EXIT_TOKENS.contains(&token)
        || FILLERS.contains(&token)
        || token == "default"
        || token == "today"
}
