use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use anyhow::Result;

use crate::core::model::{LetterSection, Reconstruction};
use crate::export::Exporter;

#[derive(Debug, Clone)]
pub struct TextExporter {
    out_dir: PathBuf,
}

impl TextExporter {
    pub fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }

    fn format_section(out: &mut String, section: &LetterSection) {
        let _ = writeln!(
            out,
            "{}\t{}\t{}",
            section.label,
            section.page,
            section.references.len()
        );
        for entry in &section.references {
            let _ = writeln!(
                out,
                "  p{}: {} .. {}",
                entry.page_idx,
                entry.first().unwrap_or(""),
                entry.last().unwrap_or("")
            );
        }
    }

    /// Plain-text summary: one line per section, its references indented below.
    pub fn render(reconstruction: &Reconstruction) -> String {
        let mut out = String::new();
        for section in &reconstruction.sections {
            Self::format_section(&mut out, section);
        }
        let warnings = reconstruction.warnings().count();
        let _ = writeln!(
            out,
            "# {} section(s), {} page(s), {} warning(s)",
            reconstruction.sections.len(),
            reconstruction.pages_processed,
            warnings
        );
        out
    }
}

impl Exporter for TextExporter {
    fn export(&self, reconstruction: &Reconstruction) -> Result<()> {
        fs::create_dir_all(&self.out_dir)?;
        let path = self.out_dir.join("sections.txt");
        fs::write(path, Self::render(reconstruction))?;
        Ok(())
    }
}
