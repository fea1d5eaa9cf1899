//! Cross-page letter tracking.
//!
//! [`LetterTracker`] owns the growing list of letter sections. Each page is
//! classified, then either opens a section (title page), is attached to the
//! current section (index page), or is skipped. Index pages whose reference
//! words disagree with the current letter go through a [`LetterRule`], which
//! may open an inferred section with an unknown start page.

use log::{info, warn};
use thiserror::Error;

use crate::core::letter_rule::{CheckCharacterRule, LetterRule, LetterVerdict};
use crate::core::model::{
    Diagnostic, DiagnosticKind, LetterSection, Page, PageRef, ReferenceEntry, Severity, Word,
};
use crate::core::page_classifier::{classify_page, PageKind, PageRegions};
use crate::core::references::normalize_token;

pub const PLACEHOLDER_LABEL: &str = "-NOT FOUND-";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TrackerError {
    #[error("page {page_idx} arrived after page {last}; pages must be fed in ascending order")]
    OutOfOrder { page_idx: usize, last: usize },
}

pub struct LetterTracker {
    regions: PageRegions,
    rule: Box<dyn LetterRule>,
    sections: Vec<LetterSection>,
    last_page: Option<usize>,
}

impl LetterTracker {
    pub fn new(regions: PageRegions) -> Self {
        Self {
            regions,
            rule: Box::new(CheckCharacterRule),
            sections: Vec::new(),
            last_page: None,
        }
    }

    pub fn with_rule(mut self, rule: Box<dyn LetterRule>) -> Self {
        self.rule = rule;
        self
    }

    pub fn sections(&self) -> &[LetterSection] {
        &self.sections
    }

    pub fn into_sections(self) -> Vec<LetterSection> {
        self.sections
    }

    /// Classifies one page and folds it into the section list.
    pub fn process_page(
        &mut self,
        page_idx: usize,
        page: &Page,
    ) -> Result<Vec<Diagnostic>, TrackerError> {
        self.check_order(page_idx)?;
        let classification = classify_page(page, page_idx, &self.regions);

        let mut diagnostics = Vec::new();
        if classification.unparseable > 0 {
            diagnostics.push(Diagnostic::info(
                page_idx,
                DiagnosticKind::UnparseableRegion,
                format!(
                    "ignored {} word(s) without a usable bbox",
                    classification.unparseable
                ),
            ));
        }
        diagnostics.extend(self.apply(page_idx, classification.kind));

        self.last_page = Some(page_idx);
        for diagnostic in &diagnostics {
            match diagnostic.severity {
                Severity::Warning => warn!("{diagnostic}"),
                Severity::Info => info!("{diagnostic}"),
            }
        }
        Ok(diagnostics)
    }

    fn check_order(&self, page_idx: usize) -> Result<(), TrackerError> {
        match self.last_page {
            Some(last) if page_idx <= last => Err(TrackerError::OutOfOrder { page_idx, last }),
            _ => Ok(()),
        }
    }

    fn apply(&mut self, page_idx: usize, kind: PageKind) -> Vec<Diagnostic> {
        match kind {
            PageKind::Title(word) => {
                self.open_title(page_idx, &word);
                Vec::new()
            }
            PageKind::Index(entry) => self.attach_references(page_idx, entry),
            PageKind::Unclassified {
                references,
                title_words,
            } => vec![Diagnostic::info(
                page_idx,
                DiagnosticKind::UnclassifiedPage,
                format!(
                    "skipped: {} reference word(s) {:?}, {} title word(s)",
                    references.words.len(),
                    references.words,
                    title_words
                ),
            )],
        }
    }

    fn open_title(&mut self, page_idx: usize, word: &Word) {
        let label = normalize_token(&word.content);
        info!("page {page_idx}: title page {label:?}");
        self.sections
            .push(LetterSection::new(label, PageRef::Known(page_idx)));
    }

    fn attach_references(&mut self, page_idx: usize, entry: ReferenceEntry) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        if self.sections.is_empty() {
            diagnostics.push(Diagnostic::warning(
                page_idx,
                DiagnosticKind::OrderingAnomaly,
                format!(
                    "index page before any title page; opened placeholder {PLACEHOLDER_LABEL:?}. \
                     Check page order and start page"
                ),
            ));
            self.sections
                .push(LetterSection::new(PLACEHOLDER_LABEL, PageRef::Unknown));
        }

        let current_label = self
            .sections
            .last()
            .map(|section| section.label.clone())
            .unwrap_or_default();

        match self.rule.judge(&current_label, &entry) {
            LetterVerdict::Consistent => {}
            LetterVerdict::Changed { label } => {
                diagnostics.push(Diagnostic::warning(
                    page_idx,
                    DiagnosticKind::LetterMismatch,
                    format!(
                        "reference words {:?} do not match section {current_label:?}; \
                         inferred new section {label:?} with unknown start page",
                        entry.words
                    ),
                ));
                self.sections
                    .push(LetterSection::new(label, PageRef::Unknown));
            }
            LetterVerdict::Kept => {
                diagnostics.push(Diagnostic::warning(
                    page_idx,
                    DiagnosticKind::LetterMismatch,
                    format!(
                        "reference words {:?} do not match section {current_label:?}; \
                         kept in current section",
                        entry.words
                    ),
                ));
            }
        }

        if let Some(current) = self.sections.last_mut() {
            current.references.push(entry);
        }
        diagnostics
    }
}
