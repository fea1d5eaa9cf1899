use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info};
use serde::Deserialize;

use crate::core::geometry::BBox;
use crate::core::letter_rule::LetterRuleKind;
use crate::core::model::Reconstruction;
use crate::core::page_classifier::PageRegions;
use crate::core::tracker::LetterTracker;
use crate::export::html_report_export::HtmlReportExporter;
use crate::export::json_export::JsonExporter;
use crate::export::text_export::TextExporter;
use crate::export::Exporter;
use crate::parser::{HocrDirectory, PageSource};

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub input: PathBuf,
    pub regions: PageRegions,
    /// First page to process, inclusive.
    pub start_page: usize,
    /// Page to stop before. `None` runs to the end of the collection.
    pub end_page: Option<usize>,
    pub letter_rule: LetterRuleKind,
}

impl PipelineConfig {
    pub fn new(input: PathBuf) -> Self {
        Self {
            input,
            regions: PageRegions::default(),
            start_page: 0,
            end_page: None,
            letter_rule: LetterRuleKind::default(),
        }
    }

    /// Defaults, then the optional config file, then command-line overrides.
    pub fn resolve(
        input: PathBuf,
        config_file: Option<&Path>,
        overrides: FileConfig,
    ) -> Result<Self> {
        let mut config = Self::new(input);
        if let Some(path) = config_file {
            config.apply_file(FileConfig::load(path)?);
        }
        config.apply_file(overrides);
        Ok(config)
    }

    /// Overlays whatever the file sets.
    pub fn apply_file(&mut self, file: FileConfig) {
        if let Some(title) = file.title_region {
            self.regions.title = title;
        }
        if let Some(index) = file.index_region {
            self.regions.index = index;
        }
        if let Some(start) = file.start_page {
            self.start_page = start;
        }
        if file.end_page.is_some() {
            self.end_page = file.end_page;
        }
        if let Some(rule) = file.letter_rule {
            self.letter_rule = rule;
        }
    }

    pub fn page_range(&self, page_count: usize) -> Result<Range<usize>> {
        let end = self.end_page.map_or(page_count, |end| end.min(page_count));
        if self.start_page > end {
            anyhow::bail!(
                "start page {} lies past end page {} ({} page(s) available)",
                self.start_page,
                end,
                page_count
            );
        }
        Ok(self.start_page..end)
    }
}

/// Optional JSON configuration file. Every field may be omitted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub title_region: Option<BBox>,
    pub index_region: Option<BBox>,
    pub start_page: Option<usize>,
    pub end_page: Option<usize>,
    pub letter_rule: Option<LetterRuleKind>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = serde_json::from_str(&data)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        Ok(config)
    }
}

pub fn build_sections(config: &PipelineConfig) -> Result<Reconstruction> {
    let source = HocrDirectory::open(&config.input)?;
    info!(
        "found {} hOCR page(s) in {}",
        source.page_count(),
        source.root().display()
    );
    reconstruct(&source, config)
}

/// Runs every page in range through a fresh tracker. A page that cannot be
/// loaded aborts the run; no partial result is returned.
pub fn reconstruct<S: PageSource + ?Sized>(
    source: &S,
    config: &PipelineConfig,
) -> Result<Reconstruction> {
    let range = config.page_range(source.page_count())?;
    let mut tracker = LetterTracker::new(config.regions).with_rule(config.letter_rule.build());
    let mut diagnostics = Vec::new();

    for page_idx in range.clone() {
        let name = source.page_name(page_idx);
        debug!("page {page_idx}: {name}");
        let page = source
            .load_page(page_idx)
            .with_context(|| format!("stopped at page {page_idx} ({name})"))?;
        diagnostics.extend(tracker.process_page(page_idx, &page)?);
    }

    let sections = tracker.into_sections();
    info!(
        "{} letter section(s) from {} page(s), {} diagnostic(s)",
        sections.len(),
        range.len(),
        diagnostics.len()
    );

    Ok(Reconstruction {
        sections,
        diagnostics,
        pages_processed: range.len(),
    })
}

pub fn export_reconstruction(reconstruction: &Reconstruction, output: &Path) -> Result<()> {
    let json_exporter = JsonExporter::new(output.to_path_buf());
    json_exporter.export(reconstruction)?;

    let text_exporter = TextExporter::new(output.to_path_buf());
    text_exporter.export(reconstruction)?;

    let html_exporter = HtmlReportExporter::new(output.to_path_buf());
    html_exporter.export(reconstruction)?;

    Ok(())
}
