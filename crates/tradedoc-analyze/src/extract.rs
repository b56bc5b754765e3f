use anyhow::Context;
use std::path::Path;

use tradedoc_core::traits::TextExtractor;

/// Separator placed between pages of extracted text.
pub const PAGE_BREAK: char = '\x0c';

/// Pure-Rust text extraction through `lopdf`, one page at a time.
#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfExtractor;

impl TextExtractor for LopdfExtractor {
    fn extract_text(&self, path: &Path) -> anyhow::Result<String> {
        let doc = lopdf::Document::load(path).with_context(|| format!("failed to load PDF {}", path.display()))?;
        let mut pages = Vec::new();
        for page_number in doc.get_pages().keys() {
            match doc.extract_text(&[*page_number]) {
                Ok(text) => pages.push(text),
                Err(e) => {
                    tracing::debug!(path = %path.display(), page = page_number, error = %e, "page without extractable text");
                    pages.push(String::new());
                }
            }
        }
        Ok(pages.join(&PAGE_BREAK.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn non_pdf_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("fake.pdf");
        std::fs::write(&path, "not a pdf at all").unwrap();
        let err = LopdfExtractor.extract_text(&path).unwrap_err();
        assert!(err.to_string().contains("fake.pdf"));
    }
}
