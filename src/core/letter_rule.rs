use serde::{Deserialize, Serialize};

use crate::core::model::ReferenceEntry;

/// Character a reference word is checked against: its lowercase first
/// character, or the second one for continuation markers like `-ing`.
pub fn check_char(word: &str) -> Option<char> {
    let mut chars = word.chars().flat_map(char::to_lowercase);
    match chars.next()? {
        '-' => chars.next(),
        c => Some(c),
    }
}

/// Lowercase first character of a section label.
pub fn letter_char(label: &str) -> Option<char> {
    label.chars().flat_map(char::to_lowercase).next()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LetterVerdict {
    /// At least one reference word starts with the current letter.
    Consistent,
    /// The letter changed without a title page; open a section with this label.
    Changed { label: String },
    /// Mismatch judged to be OCR noise; the entry stays in the current section.
    Kept,
}

/// Decides whether an index page still belongs to the current section.
pub trait LetterRule {
    fn judge(&self, current_label: &str, entry: &ReferenceEntry) -> LetterVerdict;
}

fn matches_current(current: Option<char>, entry: &ReferenceEntry) -> bool {
    let Some(current) = current else {
        return false;
    };
    [entry.first(), entry.last()]
        .into_iter()
        .flatten()
        .any(|word| check_char(word) == Some(current))
}

fn inferred_label(c: char) -> String {
    c.to_uppercase().collect()
}

/// Any mismatch starts a new section named after the first reference word.
#[derive(Debug, Default, Clone, Copy)]
pub struct CheckCharacterRule;

impl LetterRule for CheckCharacterRule {
    fn judge(&self, current_label: &str, entry: &ReferenceEntry) -> LetterVerdict {
        if matches_current(letter_char(current_label), entry) {
            return LetterVerdict::Consistent;
        }
        match entry.first().and_then(check_char) {
            Some(c) => LetterVerdict::Changed {
                label: inferred_label(c),
            },
            None => LetterVerdict::Kept,
        }
    }
}

/// Only moves forward through the alphabet. A mismatch pointing at an
/// earlier letter is treated as noise and kept in the current section.
#[derive(Debug, Default, Clone, Copy)]
pub struct SuccessorRule;

impl LetterRule for SuccessorRule {
    fn judge(&self, current_label: &str, entry: &ReferenceEntry) -> LetterVerdict {
        let current = letter_char(current_label);
        if matches_current(current, entry) {
            return LetterVerdict::Consistent;
        }
        let Some(candidate) = entry.first().and_then(check_char) else {
            return LetterVerdict::Kept;
        };
        let advances = match current {
            Some(cur) if cur.is_alphabetic() => candidate.is_alphabetic() && candidate > cur,
            // Placeholder or empty labels carry no letter to protect.
            _ => true,
        };
        if advances {
            LetterVerdict::Changed {
                label: inferred_label(candidate),
            }
        } else {
            LetterVerdict::Kept
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum LetterRuleKind {
    #[default]
    CheckChar,
    Successor,
}

impl LetterRuleKind {
    pub fn build(self) -> Box<dyn LetterRule> {
        match self {
            LetterRuleKind::CheckChar => Box::new(CheckCharacterRule),
            LetterRuleKind::Successor => Box::new(SuccessorRule),
        }
    }
}
