use tradedoc_core::traits::ReportSink;

use crate::aggregate::{ratio, SetSummary};
use crate::quality::{QualityReport, SizeTier, MIN_COMPANY_COVERAGE, MIN_TYPES_PER_SET};

fn pct(part: usize, whole: usize) -> String { format!("{:.1}%", 100.0 * ratio(part, whole)) }

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map(|c| c.to_uppercase().chain(chars).collect()).unwrap_or_default()
}

fn set_tables(set: &SetSummary, sink: &mut dyn ReportSink) -> anyhow::Result<()> {
    sink.markdown(&format!("## {} Set", set.name.to_uppercase()))?;
    let mut rows = vec![
        vec!["Total Documents".to_string(), set.total.to_string()],
        vec!["Total Items (line items/cargo)".to_string(), set.total_items.to_string()],
        vec!["Avg Items/Doc".to_string(), format!("{:.1}", set.avg_items())],
        vec!["Has Company Info".to_string(), format!("{} ({})", set.with_company, pct(set.with_company, set.total))],
        vec!["Has Amounts".to_string(), format!("{} ({})", set.with_amounts, pct(set.with_amounts, set.total))],
    ];
    if set.skipped > 0 {
        rows.push(vec!["Unreadable (excluded)".to_string(), set.skipped.to_string()]);
    }
    sink.table("Statistics", &["Metric", "Value"], &rows)?;

    let type_rows: Vec<Vec<String>> = set
        .type_counts
        .iter()
        .map(|(t, n)| vec![t.clone(), n.to_string(), pct(*n, set.total), format!("{:.1}", set.avg_fields.get(t).copied().unwrap_or(0.0))])
        .collect();
    if !type_rows.is_empty() {
        sink.table("Document Type Distribution", &["Type", "Count", "Percentage", "Avg Fields"], &type_rows)?;
    }
    Ok(())
}

/// Emit the full quality report; `generated` is a preformatted timestamp.
pub fn render_quality_report(report: &QualityReport, generated: &str, sink: &mut dyn ReportSink) -> anyhow::Result<()> {
    let total = report.checks.total;
    sink.markdown(&format!("# Data Quality Report\n\nGenerated: {}", generated))?;

    let mut overview = format!("## Overall Summary\n\n- **Total Documents**: {}\n", total);
    for set in &report.sets {
        overview.push_str(&format!("- **{}**: {} documents ({})\n", capitalize(&set.name), set.total, pct(set.total, total)));
    }
    sink.markdown(&overview)?;

    for set in &report.sets {
        set_tables(set, sink)?;
    }

    let mut checks = String::from("## Quality Checks\n\n");
    if report.sets.len() >= 2 {
        checks.push_str(if report.checks.balanced { "- ✓ Split sizes are balanced\n" } else { "- ⚠️ **Warning**: Splits are imbalanced (difference > 50%)\n" });
    }
    for (name, n) in &report.checks.thin_sets {
        checks.push_str(&format!("- ⚠️ **Warning**: {} has only {} document type(s), expected at least {}\n", name, n, MIN_TYPES_PER_SET));
    }
    if report.checks.types_well_distributed() {
        checks.push_str("- ✓ Document types are well distributed\n");
    }
    sink.markdown(&checks)?;

    let mut recs = String::from("## Recommendations\n\n");
    recs.push_str(match report.checks.size_tier {
        SizeTier::Small => "- ⚠️ Dataset is small (<30 documents). Consider annotating more for better model performance.\n",
        SizeTier::Moderate => "- ℹ️ Dataset is moderate (30-100 documents). Good for initial testing.\n",
        SizeTier::Good => "- ✓ Dataset size is good (100+ documents).\n",
    });
    if report.checks.company_coverage_ok() {
        recs.push_str("- ✓ Good coverage of company information in annotations.\n");
    } else {
        recs.push_str(&format!(
            "- ⚠️ Less than {:.0}% of documents have company information ({:.1}%). Consider adding more details.\n",
            MIN_COMPANY_COVERAGE * 100.0,
            report.checks.company_coverage * 100.0
        ));
    }
    sink.markdown(&recs)?;

    sink.markdown(&format!("---\n\n**Status**: {}", report.verdict))
}
