use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

use tradedoc_core::store::list_sources;
use tradedoc_core::traits::TextExtractor;
use tradedoc_core::types::DocumentType;

use crate::extract::PAGE_BREAK;
use crate::keywords::count_keywords;

pub const TOP_KEYWORDS: usize = 10;

/// Surface statistics of one sample document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentAnalysis {
    pub filename: String,
    pub pages: usize,
    pub lines: usize,
    pub words: usize,
    pub keywords: BTreeMap<String, usize>,
    pub potential_dates: usize,
    pub potential_numbers: usize,
    pub preview: String,
}

/// `None` for blank text; there is nothing to learn from it.
pub fn analyze_text(filename: &str, text: &str, doc_type: DocumentType, preview_chars: usize) -> Option<DocumentAnalysis> {
    if text.trim().is_empty() {
        return None;
    }
    let words: Vec<&str> = text.split_whitespace().collect();
    Some(DocumentAnalysis {
        filename: filename.to_string(),
        pages: text.split(PAGE_BREAK).count(),
        lines: text.lines().filter(|l| !l.trim().is_empty()).count(),
        words: words.len(),
        keywords: count_keywords(text, doc_type),
        potential_dates: text.matches(['/', '-']).count(),
        potential_numbers: words.iter().filter(|w| w.chars().any(|c| c.is_ascii_digit())).count(),
        preview: text.chars().take(preview_chars).collect(),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeAnalysis {
    pub document_type: DocumentType,
    /// PDFs present for the type, sampled or not.
    pub available: usize,
    pub samples: Vec<DocumentAnalysis>,
}

impl TypeAnalysis {
    /// Keyword totals across samples, highest first, ties alphabetical.
    pub fn top_keywords(&self, limit: usize) -> Vec<(String, usize)> {
        let mut totals: BTreeMap<&str, usize> = BTreeMap::new();
        for sample in &self.samples {
            for (kw, n) in &sample.keywords {
                *totals.entry(kw.as_str()).or_default() += n;
            }
        }
        let mut ranked: Vec<(String, usize)> = totals.into_iter().map(|(k, n)| (k.to_string(), n)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(limit);
        ranked
    }

    pub fn avg_pages(&self) -> f64 { self.mean(|s| s.pages) }

    pub fn avg_lines(&self) -> f64 { self.mean(|s| s.lines) }

    fn mean(&self, f: impl Fn(&DocumentAnalysis) -> usize) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().map(f).sum::<usize>() as f64 / self.samples.len() as f64
    }
}

/// Sample up to `samples` PDFs from `<raw_dir>/<type subdir>/`.
///
/// Returns `None` when the folder is missing or holds no PDFs. Extraction
/// failures and blank documents are logged and skipped.
pub fn analyze_type(raw_dir: &Path, doc_type: DocumentType, extractor: &dyn TextExtractor, samples: usize, preview_chars: usize) -> Option<TypeAnalysis> {
    let folder = raw_dir.join(doc_type.subdir());
    if !folder.is_dir() {
        tracing::warn!("folder not found: {}", folder.display());
        return None;
    }
    let pdfs = list_sources(&folder);
    if pdfs.is_empty() {
        tracing::warn!("no PDFs in {}", doc_type.subdir());
        return None;
    }
    tracing::info!("analyzing {} of {} {} document(s)", samples.min(pdfs.len()), pdfs.len(), doc_type);

    let mut analyzed = Vec::new();
    for pdf in pdfs.iter().take(samples) {
        let filename = pdf.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
        match extractor.extract_text(pdf) {
            Ok(text) => match analyze_text(&filename, &text, doc_type, preview_chars) {
                Some(a) => analyzed.push(a),
                None => tracing::warn!("no text extracted from {}", filename),
            },
            Err(e) => tracing::warn!("error reading {}: {:#}", filename, e),
        }
    }
    Some(TypeAnalysis { document_type: doc_type, available: pdfs.len(), samples: analyzed })
}

#[cfg(test)]
mod tests {
    use super::*;

    const INVOICE: &str = "ACME EXPORT LTD\nInvoice No: INV-2024-001\nDate: 12/03/2024\n\nTotal amount due: 1,250.00 USD\n\x0cPayment terms: 30 days\n";

    #[test]
    fn text_statistics() {
        let a = analyze_text("inv.pdf", INVOICE, DocumentType::Invoice, 15).unwrap();
        assert_eq!(a.pages, 2);
        assert_eq!(a.lines, 5);
        assert_eq!(a.potential_dates, 4);
        assert_eq!(a.potential_numbers, 4);
        assert_eq!(a.preview, "ACME EXPORT LTD");
        assert_eq!(a.keywords.get("invoice"), Some(&1));
        assert_eq!(a.keywords.get("due"), Some(&1));
    }

    #[test]
    fn blank_text_is_skipped() {
        assert!(analyze_text("empty.pdf", " \n\x0c\n", DocumentType::Invoice, 10).is_none());
    }

    #[test]
    fn top_keywords_sum_and_rank() {
        let a = analyze_text("a", "total total tax", DocumentType::Invoice, 0).unwrap();
        let b = analyze_text("b", "tax payment total", DocumentType::Invoice, 0).unwrap();
        let t = TypeAnalysis { document_type: DocumentType::Invoice, available: 2, samples: vec![a, b] };
        assert_eq!(t.top_keywords(2), vec![("total".to_string(), 3), ("tax".to_string(), 2)]);
        assert!((t.avg_lines() - 1.0).abs() < 1e-9);
    }
}
