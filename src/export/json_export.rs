use std::fs;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::core::model::Reconstruction;
use crate::export::Exporter;

/// Writes `sections.json` (the whole reconstruction) and `diagnostics.jsonl`,
/// one compact diagnostic per line so reviews can grep or stream it.
#[derive(Debug, Clone)]
pub struct JsonExporter {
    out_dir: PathBuf,
}

impl JsonExporter {
    pub fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }

    fn write_sections(&self, reconstruction: &Reconstruction) -> Result<()> {
        let path = self.out_dir.join("sections.json");
        let data = serde_json::to_string_pretty(reconstruction)?;
        fs::write(&path, data).with_context(|| format!("failed to write {}", path.display()))
    }

    fn write_diagnostics(&self, reconstruction: &Reconstruction) -> Result<()> {
        let path = self.out_dir.join("diagnostics.jsonl");
        let file = fs::File::create(&path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        let mut out = BufWriter::new(file);
        for diagnostic in &reconstruction.diagnostics {
            serde_json::to_writer(&mut out, diagnostic)?;
            out.write_all(b"\n")?;
        }
        out.flush()?;
        Ok(())
    }
}

impl Exporter for JsonExporter {
    fn export(&self, reconstruction: &Reconstruction) -> Result<()> {
        fs::create_dir_all(&self.out_dir)?;
        self.write_sections(reconstruction)?;
        self.write_diagnostics(reconstruction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    use pretty_assertions::assert_eq;

    use crate::core::model::{Diagnostic, DiagnosticKind, LetterSection, PageRef};

    fn sample() -> Reconstruction {
        Reconstruction {
            sections: vec![
                LetterSection::new("A", PageRef::Known(4)),
                LetterSection::new("B", PageRef::Unknown),
            ],
            diagnostics: vec![
                Diagnostic::warning(6, DiagnosticKind::LetterMismatch, "inferred \"B\""),
                Diagnostic::info(7, DiagnosticKind::UnclassifiedPage, "skipped"),
            ],
            pages_processed: 8,
        }
    }

    #[test]
    fn unknown_page_serializes_as_null() -> Result<()> {
        let reconstruction = sample();
        let value = serde_json::to_value(&reconstruction)?;
        assert_eq!(value["sections"][0]["page"], 4);
        assert!(value["sections"][1]["page"].is_null());

        let back: Reconstruction = serde_json::from_value(value)?;
        assert_eq!(back.sections, reconstruction.sections);
        Ok(())
    }

    #[test]
    fn writes_one_diagnostic_per_line() -> Result<()> {
        let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis();
        let out = std::env::temp_dir().join(format!("dictstruct-json-{}-{now}", std::process::id()));
        let reconstruction = sample();

        JsonExporter::new(out.clone()).export(&reconstruction)?;

        let lines = fs::read_to_string(out.join("diagnostics.jsonl"))?;
        let parsed = lines
            .lines()
            .map(serde_json::from_str::<Diagnostic>)
            .collect::<Result<Vec<_>, _>>()?;
        assert_eq!(parsed, reconstruction.diagnostics);
        assert!(out.join("sections.json").exists());

        let _ = fs::remove_dir_all(&out);
        Ok(())
    }
}
