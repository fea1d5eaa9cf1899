use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::geometry::{parse_region, BBox};

/// One OCR word as delivered by the layout parser.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Word {
    pub content: String,
    /// Raw `title` attribute the word was read from.
    pub region_metadata: String,
}

impl Word {
    pub fn new(content: impl Into<String>, region_metadata: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            region_metadata: region_metadata.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Page {
    pub words: Vec<Word>,
    /// `title` attribute of the `ocr_page` element, if any.
    pub metadata: Option<String>,
}

impl Page {
    /// Page size as declared by the `ocr_page` bbox.
    pub fn extent(&self) -> Option<BBox> {
        self.metadata
            .as_deref()
            .and_then(|metadata| parse_region(metadata).ok())
    }
}

/// Page a section starts on. `Unknown` for sections inferred from reference words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Option<usize>", from = "Option<usize>")]
pub enum PageRef {
    Known(usize),
    Unknown,
}

impl From<PageRef> for Option<usize> {
    fn from(value: PageRef) -> Self {
        match value {
            PageRef::Known(idx) => Some(idx),
            PageRef::Unknown => None,
        }
    }
}

impl From<Option<usize>> for PageRef {
    fn from(value: Option<usize>) -> Self {
        value.map_or(PageRef::Unknown, PageRef::Known)
    }
}

impl fmt::Display for PageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageRef::Known(idx) => write!(f, "{idx}"),
            PageRef::Unknown => f.write_str("?"),
        }
    }
}

/// Marginal range markers found on one index page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    pub words: Vec<String>,
    pub page_idx: usize,
}

impl ReferenceEntry {
    pub fn first(&self) -> Option<&str> {
        self.words.first().map(String::as_str)
    }

    pub fn last(&self) -> Option<&str> {
        self.words.last().map(String::as_str)
    }

    pub fn is_usable(&self) -> bool {
        self.words.len() >= 2
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterSection {
    pub label: String,
    pub page: PageRef,
    pub references: Vec<ReferenceEntry>,
}

impl LetterSection {
    pub fn new(label: impl Into<String>, page: PageRef) -> Self {
        Self {
            label: label.into(),
            page,
            references: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    UnparseableRegion,
    OrderingAnomaly,
    LetterMismatch,
    UnclassifiedPage,
}

impl DiagnosticKind {
    pub fn label(&self) -> &'static str {
        match self {
            DiagnosticKind::UnparseableRegion => "unparseable-region",
            DiagnosticKind::OrderingAnomaly => "ordering-anomaly",
            DiagnosticKind::LetterMismatch => "letter-mismatch",
            DiagnosticKind::UnclassifiedPage => "unclassified-page",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
}

/// An audit record for one recoverable anomaly and what was done about it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub page_idx: usize,
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub decision: String,
}

impl Diagnostic {
    pub fn info(page_idx: usize, kind: DiagnosticKind, decision: impl Into<String>) -> Self {
        Self {
            page_idx,
            kind,
            severity: Severity::Info,
            decision: decision.into(),
        }
    }

    pub fn warning(page_idx: usize, kind: DiagnosticKind, decision: impl Into<String>) -> Self {
        Self {
            page_idx,
            kind,
            severity: Severity::Warning,
            decision: decision.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "page {}: {}: {}",
            self.page_idx,
            self.kind.label(),
            self.decision
        )
    }
}

/// Final output of a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Reconstruction {
    pub sections: Vec<LetterSection>,
    pub diagnostics: Vec<Diagnostic>,
    pub pages_processed: usize,
}

impl Reconstruction {
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }
}
