use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use anyhow::Result;

use crate::core::model::{Diagnostic, LetterSection, PageRef, Reconstruction, Severity};
use crate::export::Exporter;

/// Audit page listing every section and every heuristic decision, so a
/// reviewer can check guesses against the scans.
#[derive(Debug, Clone)]
pub struct HtmlReportExporter {
    out_dir: PathBuf,
}

impl HtmlReportExporter {
    pub fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }

    fn section_row(section: &LetterSection) -> String {
        let class = match section.page {
            PageRef::Known(_) => "title",
            PageRef::Unknown => "inferred",
        };
        let ranges = section
            .references
            .iter()
            .map(|entry| {
                format!(
                    "p{}: {} .. {}",
                    entry.page_idx,
                    html_escape::encode_text(entry.first().unwrap_or("")),
                    html_escape::encode_text(entry.last().unwrap_or(""))
                )
            })
            .collect::<Vec<_>>()
            .join("<br/>");
        format!(
            "<tr class='{class}'><td>{label}</td><td>{page}</td><td>{count}</td><td>{ranges}</td></tr>\n",
            label = html_escape::encode_text(&section.label),
            page = section.page,
            count = section.references.len(),
        )
    }

    fn diagnostic_row(diagnostic: &Diagnostic) -> String {
        let severity = match diagnostic.severity {
            Severity::Info => "info",
            Severity::Warning => "warning",
        };
        format!(
            "<tr class='{severity}'><td>{page}</td><td>{severity}</td><td>{kind}</td><td>{decision}</td></tr>\n",
            page = diagnostic.page_idx,
            kind = diagnostic.kind.label(),
            decision = html_escape::encode_text(&diagnostic.decision),
        )
    }

    pub fn render(reconstruction: &Reconstruction) -> String {
        let mut sections_html = String::new();
        for section in &reconstruction.sections {
            sections_html.push_str(&Self::section_row(section));
        }
        let mut diagnostics_html = String::new();
        for diagnostic in &reconstruction.diagnostics {
            diagnostics_html.push_str(&Self::diagnostic_row(diagnostic));
        }

        let mut html = String::new();
        let _ = write!(
            html,
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset='utf-8'>
<title>dictstruct report</title>
<style>
body {{ font-family: Arial, sans-serif; margin: 20px; }}
table {{ border-collapse: collapse; margin-bottom: 30px; }}
td, th {{ border: 1px solid #ddd; padding: 4px 8px; vertical-align: top; }}
tr.inferred {{ background: rgba(255,165,0,0.15); }}
tr.warning {{ background: rgba(255,0,0,0.1); }}
</style>
</head>
<body>
<h1>Letter sections</h1>
<p>{pages} page(s) processed, {count} section(s).</p>
<table>
<tr><th>Label</th><th>Start page</th><th>Index pages</th><th>Ranges</th></tr>
{sections}</table>
<h1>Diagnostics</h1>
<table>
<tr><th>Page</th><th>Severity</th><th>Kind</th><th>Decision</th></tr>
{diagnostics}</table>
</body>
</html>
"#,
            pages = reconstruction.pages_processed,
            count = reconstruction.sections.len(),
            sections = sections_html,
            diagnostics = diagnostics_html,
        );
        html
    }
}

impl Exporter for HtmlReportExporter {
    fn export(&self, reconstruction: &Reconstruction) -> Result<()> {
        fs::create_dir_all(&self.out_dir)?;
        let path = self.out_dir.join("report.html");
        fs::write(path, Self::render(reconstruction))?;
        Ok(())
    }
}
