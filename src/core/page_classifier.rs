use serde::{Deserialize, Serialize};

use crate::core::geometry::BBox;
use crate::core::model::{Page, ReferenceEntry, Word};
use crate::core::references::extract_references;
use crate::core::region_filter::words_in;

/// Where titles and marginal reference words render on a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRegions {
    pub title: BBox,
    pub index: BBox,
}

impl Default for PageRegions {
    fn default() -> Self {
        Self {
            title: BBox::new(0, 300, 3200, 700),
            index: BBox::new(0, 0, 3200, 310),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageKind {
    Index(ReferenceEntry),
    Title(Word),
    Unclassified {
        references: ReferenceEntry,
        title_words: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub kind: PageKind,
    /// Words dropped from the region scans for lacking a usable bbox.
    pub unparseable: usize,
}

/// Index pages win over title pages; the title region is only scanned when
/// the index region yields fewer than two reference words.
pub fn classify_page(page: &Page, page_idx: usize, regions: &PageRegions) -> Classification {
    let index_words = words_in(page, &regions.index);
    let unparseable = index_words.unparseable;
    let references = extract_references(index_words.words, page_idx);
    if references.is_usable() {
        return Classification {
            kind: PageKind::Index(references),
            unparseable,
        };
    }

    let title_words = words_in(page, &regions.title).words;
    let kind = match title_words.as_slice() {
        [word] => PageKind::Title((*word).clone()),
        _ => PageKind::Unclassified {
            references,
            title_words: title_words.len(),
        },
    };
    Classification { kind, unparseable }
}
