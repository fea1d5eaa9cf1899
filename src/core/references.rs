//! Marginal reference-word extraction for index pages.
//!
//! Dictionary pages print the first and last headword of the page in the
//! margin. OCR picks those up together with page numbers, running heads and
//! specks of noise, so candidates are cleaned and filtered against a loose
//! "looks like a headword" pattern before the outer two are kept.

use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::core::model::{ReferenceEntry, Word};

const TRIM_CHARS: &[char] = &[' ', '"', '“', '.', '\'', ':', '„'];

lazy_static! {
    static ref HEADWORD_PATTERN: Regex =
        Regex::new(r"^-?\p{L}[-.]?\p{L}+[/!]?$").expect("headword pattern compiles");
}

// `&amp;auml;` needs two rounds; nothing legitimate nests deeper than this.
const MAX_DECODE_ROUNDS: usize = 8;

fn decode_entities(raw: &str) -> String {
    let mut current = raw.to_string();
    for _ in 0..MAX_DECODE_ROUNDS {
        let decoded = html_escape::decode_html_entities(&current);
        if decoded == current.as_str() {
            break;
        }
        current = decoded.into_owned();
    }
    current
}

/// Decodes HTML entities until none are left, strips quote and punctuation
/// debris from both ends and composes the result to NFC.
pub fn normalize_token(raw: &str) -> String {
    decode_entities(raw).trim_matches(TRIM_CHARS).nfc().collect()
}

pub fn is_headword_like(token: &str) -> bool {
    HEADWORD_PATTERN.is_match(token)
}

pub fn extract_references<'a, I>(words: I, page_idx: usize) -> ReferenceEntry
where
    I: IntoIterator<Item = &'a Word>,
{
    let mut survivors: Vec<String> = words
        .into_iter()
        .map(|word| normalize_token(&word.content))
        .filter(|token| is_headword_like(token))
        .collect();

    if survivors.len() > 2 {
        let last = survivors.pop();
        survivors.truncate(1);
        survivors.extend(last);
    }

    ReferenceEntry {
        words: survivors,
        page_idx,
    }
}
