pub mod html_report_export;
pub mod json_export;
pub mod text_export;

use anyhow::Result;

use crate::core::model::Reconstruction;

pub use html_report_export::HtmlReportExporter;
pub use json_export::JsonExporter;
pub use text_export::TextExporter;

pub trait Exporter {
    fn export(&self, reconstruction: &Reconstruction) -> Result<()>;
}
