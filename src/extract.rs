//! Batchbot - Field Extractors
//!
//! Independent pure functions that each pull one typed value out of a
//! line of text. Absence of a match is `None`, never an error; the state
//! machine treats `None` as "not yet provided".

use std::collections::HashMap;

use chrono::{Datelike, Months, NaiveDate};
use regex::Regex;

use crate::lexicon;
use crate::matcher::KeywordMatcher;
use crate::types::{ActionKind, EntityKind, ExpiryDate, SlotName, SlotValue};

/// Fixed default payload requested with the literal token "default"
pub const DEFAULT_BATCH_NAME: &str = "default_batch";
pub const DEFAULT_SIZE: u64 = 100_000;

/// First canonical action keyword in token order
pub fn extract_action(matcher: &KeywordMatcher, text: &str) -> Option<ActionKind> {
    matcher
        .tokenize(text)
        .iter()
        .filter_map(|token| matcher.match_token(token))
        .find_map(ActionKind::from_canonical)
}

/// First canonical entity keyword in token order
pub fn extract_entity(matcher: &KeywordMatcher, text: &str) -> Option<EntityKind> {
    matcher
        .tokenize(text)
        .iter()
        .filter_map(|token| matcher.match_token(token))
        .find_map(EntityKind::from_canonical)
}

/// First number of 2+ digits that does not look like a calendar year.
/// Four-digit values in 1900-2100 are assumed to be years, never sizes.
pub fn extract_size(text: &str) -> Option<u64> {
    let number = Regex::new(r"\b\d{2,}\b").unwrap();
    for m in number.find_iter(text) {
        let digits = m.as_str();
        if digits.len() == 4 {
            if let Ok(year) = digits.parse::<u32>() {
                if (1900..=2100).contains(&year) {
                    continue;
                }
            }
        }
        if let Ok(value) = digits.parse::<u64>() {
            return Some(value);
        }
    }
    None
}

/// Normalized expiry date from one of three forms:
/// a month name (with or without an explicit 4-digit year), a numeric
/// `month/year` or `month-year` token, or the literal token "today".
///
/// A month name without a year resolves to the current year, rolling to
/// next year when the month is not after the current one, so the proposed
/// expiry is never in the past.
pub fn extract_expiry_date(text: &str, today: NaiveDate) -> Option<ExpiryDate> {
    let lowered = text.to_lowercase();
    let word = Regex::new(r"\w+").unwrap();

    for token in word.find_iter(&lowered) {
        if let Some(month) = lexicon::month_number(token.as_str()) {
            let year = match find_year(&lowered) {
                Some(year) => year,
                None if month <= today.month() => today.year() + 1,
                None => today.year(),
            };
            return Some(ExpiryDate { month, year });
        }
    }

    let numeric = Regex::new(r"\b(0?[1-9]|1[0-2])[/-](\d{4})\b").unwrap();
    if let Some(caps) = numeric.captures(&lowered) {
        let month = caps[1].parse().ok()?;
        let year = caps[2].parse().ok()?;
        return Some(ExpiryDate { month, year });
    }

    if word.find_iter(&lowered).any(|t| t.as_str() == "today") {
        return Some(ExpiryDate {
            month: today.month(),
            year: today.year(),
        });
    }

    None
}

/// First explicit 4-digit year in the text
fn find_year(text: &str) -> Option<i32> {
    let year = Regex::new(r"\b\d{4}\b").unwrap();
    year.find(text)?.as_str().parse().ok()
}

/// First alphanumeric/underscore/hyphen token of length >= 2 that is not
/// a reserved word and not a pure 3-6 digit number
pub fn extract_batch_name(text: &str) -> Option<String> {
    let candidate = Regex::new(r"\b[A-Za-z0-9_-]{2,}\b").unwrap();
    let pure_number = Regex::new(r"^\d{3,6}$").unwrap();

    for m in candidate.find_iter(text) {
        let token = m.as_str();
        if lexicon::is_reserved(&token.to_lowercase()) {
            continue;
        }
        if pure_number.is_match(token) {
            continue;
        }
        return Some(token.to_string());
    }
    None
}

/// First day of the next calendar month, the default expiry
pub fn default_expiry(today: NaiveDate) -> ExpiryDate {
    let first_of_month =
        NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap_or(today);
    let next = first_of_month + Months::new(1);
    ExpiryDate {
        month: next.month(),
        year: next.year(),
    }
}

/// If the text contains the literal token "default", return the fixed
/// default payload for all slots. Short-circuits all other extraction.
pub fn default_request(text: &str, today: NaiveDate) -> Option<HashMap<SlotName, SlotValue>> {
    let word = Regex::new(r"\w+").unwrap();
    if !word
        .find_iter(&text.to_lowercase())
        .any(|t| t.as_str() == "default")
    {
        return None;
    }

    let mut slots = HashMap::new();
    slots.insert(
        SlotName::BatchName,
        SlotValue::Text(DEFAULT_BATCH_NAME.to_string()),
    );
    slots.insert(SlotName::Size, SlotValue::Size(DEFAULT_SIZE));
    slots.insert(SlotName::ExpiryDate, SlotValue::Date(default_expiry(today)));
    Some(slots)
}

/// Run all slot extractors over one line of text. The result is ephemeral:
/// the state machine merges it into the dialogue state immediately.
pub fn extract_slots(text: &str, today: NaiveDate) -> HashMap<SlotName, SlotValue> {
    if let Some(defaults) = default_request(text, today) {
        return defaults;
    }

    let mut slots = HashMap::new();
    if let Some(date) = extract_expiry_date(text, today) {
        slots.insert(SlotName::ExpiryDate, SlotValue::Date(date));
    }
    if let Some(size) = extract_size(text) {
        slots.insert(SlotName::Size, SlotValue::Size(size));
    }
    if let Some(name) = extract_batch_name(text) {
        slots.insert(SlotName::BatchName, SlotValue::Text(name));
    }
    slots
}
