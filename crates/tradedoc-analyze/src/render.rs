use tradedoc_core::traits::ReportSink;

use crate::analysis::{TypeAnalysis, TOP_KEYWORDS};
use crate::keywords::suggested_fields;

const FILENAME_WIDTH: usize = 30;

/// One summary table per analyzed type.
pub fn render_summary(analyses: &[TypeAnalysis], sink: &mut dyn ReportSink) -> anyhow::Result<()> {
    for analysis in analyses.iter().filter(|a| !a.samples.is_empty()) {
        let rows: Vec<Vec<String>> = analysis
            .samples
            .iter()
            .map(|s| vec![s.filename.chars().take(FILENAME_WIDTH).collect(), s.pages.to_string(), s.lines.to_string(), s.keywords.len().to_string()])
            .collect();
        sink.table(&format!("{} Analysis", analysis.document_type.as_str().to_uppercase()), &["Filename", "Pages", "Lines", "Keywords"], &rows)?;
    }
    Ok(())
}

/// The schema-discovery report written to `document_analysis.md`.
pub fn render_report(analyses: &[TypeAnalysis], sink: &mut dyn ReportSink) -> anyhow::Result<()> {
    sink.markdown("# Document Analysis Report\n\nGenerated from PDF structure analysis.")?;
    for analysis in analyses.iter().filter(|a| !a.samples.is_empty()) {
        let doc_type = analysis.document_type;
        let mut section = format!(
            "## {}\n\nSample files examined: {} (of {} available)\n\n### Common Keywords Found\n\n",
            doc_type.as_str().to_uppercase().replace('_', " "),
            analysis.samples.len(),
            analysis.available
        );
        for (kw, n) in analysis.top_keywords(TOP_KEYWORDS) {
            section.push_str(&format!("- {}: {} occurrences\n", kw, n));
        }
        section.push_str("\n### Common Fields to Extract\n\n");
        for field in suggested_fields(doc_type) {
            section.push_str(&format!("- [ ] {}\n", field));
        }
        section.push_str(&format!(
            "\n### Document Statistics\n\n- Average pages: {:.1}\n- Average lines: {:.0}\n",
            analysis.avg_pages(),
            analysis.avg_lines()
        ));
        section.push_str("\n### Challenges/Notes\n\n- Add your observations here\n- Note any quality issues\n- Note variations in format\n\n---");
        sink.markdown(&section)?;
    }
    Ok(())
}
