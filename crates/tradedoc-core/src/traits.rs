use std::path::Path;

/// Pulls plain text out of a source document.
pub trait TextExtractor {
    fn extract_text(&self, path: &Path) -> anyhow::Result<String>;
}

/// Answers prompts during annotation. `Ok(None)` means the field was left blank.
pub trait FormFiller {
    fn ask(&mut self, prompt: &str, default: Option<&str>) -> anyhow::Result<Option<String>>;
    fn confirm(&mut self, prompt: &str, default: bool) -> anyhow::Result<bool>;
}

/// Renders structured summaries: titled tables and free markdown blocks.
pub trait ReportSink {
    fn table(&mut self, title: &str, columns: &[&str], rows: &[Vec<String>]) -> anyhow::Result<()>;
    fn markdown(&mut self, text: &str) -> anyhow::Result<()>;
}
