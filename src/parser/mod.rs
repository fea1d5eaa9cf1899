pub mod files;
pub mod hocr;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::model::Page;

/// Ordered collection of OCR pages.
pub trait PageSource {
    fn page_count(&self) -> usize;

    /// Human-readable name for diagnostics, usually the file name.
    fn page_name(&self, page_idx: usize) -> String;

    fn load_page(&self, page_idx: usize) -> Result<Page>;
}

/// Directory of `.hocr` files, one per scanned page.
#[derive(Debug, Clone)]
pub struct HocrDirectory {
    root: PathBuf,
    files: Vec<PathBuf>,
}

impl HocrDirectory {
    pub fn open(root: &Path) -> Result<Self> {
        let files = files::discover_pages(root)?;
        Ok(Self {
            root: root.to_path_buf(),
            files,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl PageSource for HocrDirectory {
    fn page_count(&self) -> usize {
        self.files.len()
    }

    fn page_name(&self, page_idx: usize) -> String {
        self.files
            .get(page_idx)
            .and_then(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("#{page_idx}"))
    }

    fn load_page(&self, page_idx: usize) -> Result<Page> {
        let path = self
            .files
            .get(page_idx)
            .ok_or_else(|| anyhow::anyhow!("page {page_idx} is outside the collection"))?;
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let page = hocr::parse_hocr(&content)
            .with_context(|| format!("failed to parse hOCR file {}", path.display()))?;
        Ok(page)
    }
}

/// In-memory pages, mostly for tests and callers that parse elsewhere.
impl PageSource for Vec<Page> {
    fn page_count(&self) -> usize {
        self.len()
    }

    fn page_name(&self, page_idx: usize) -> String {
        format!("#{page_idx}")
    }

    fn load_page(&self, page_idx: usize) -> Result<Page> {
        self.get(page_idx)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("page {page_idx} is outside the collection"))
    }
}
